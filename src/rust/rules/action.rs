use std::fmt;
use serde::Serialize;

/// Recommended handling for a bounced recipient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Permanently drop the address from the list
    Remove,
    /// Stop sending for now, the mailbox exists but is not accepting mail
    Suppress,
    /// Transient condition, resend later
    Retry,
    /// Sender-side configuration (authentication, relaying) needs fixing
    FixConfig,
    /// Sending infrastructure is listed and must be delisted
    Delist,
    /// Needs a human to look at it
    Review,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Remove,
        Action::Suppress,
        Action::Retry,
        Action::FixConfig,
        Action::Delist,
        Action::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Remove => "remove",
            Action::Suppress => "suppress",
            Action::Retry => "retry",
            Action::FixConfig => "fix_config",
            Action::Delist => "delist",
            Action::Review => "review",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The 16 bounce categories, in the class-index order of the shipped model
pub const KNOWN_LABELS: [&str; 16] = [
    "auth_failure",
    "blocked",
    "connection_error",
    "content_rejected",
    "domain_not_found",
    "greylisted",
    "invalid_address",
    "mailbox_disabled",
    "mailbox_full",
    "message_too_large",
    "policy_violation",
    "rate_limited",
    "relay_denied",
    "spam_detected",
    "temporary_failure",
    "user_unknown",
];

pub const ACTION_MAP: [(&str, Action); 16] = [
    ("user_unknown", Action::Remove),
    ("invalid_address", Action::Remove),
    ("domain_not_found", Action::Remove),
    ("mailbox_disabled", Action::Suppress),
    ("mailbox_full", Action::Retry),
    ("greylisted", Action::Retry),
    ("rate_limited", Action::Retry),
    ("temporary_failure", Action::Retry),
    ("connection_error", Action::Retry),
    ("auth_failure", Action::FixConfig),
    ("relay_denied", Action::FixConfig),
    ("blocked", Action::Delist),
    ("spam_detected", Action::Review),
    ("content_rejected", Action::Review),
    ("policy_violation", Action::Review),
    ("message_too_large", Action::Review),
];

/// Looks up the action for a label; unrecognized labels get [`Action::Review`].
pub fn get_action(label: &str) -> Action {
    ACTION_MAP
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, action)| *action)
        .unwrap_or(Action::Review)
}
