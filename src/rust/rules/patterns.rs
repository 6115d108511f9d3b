use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

/// Ordered (pattern, label) rules. The first matching pattern wins, so more
/// specific wording sits above broader wording. Wildcard spans are bounded.
pub const TEXT_PATTERNS: &[(&str, &str)] = &[
    (
        r"rate.?limit|too many (messages|connections|emails|recipients|requests)|throttl|sending (limit|quota)|daily (limit|quota)|message rate",
        "rate_limited",
    ),
    (
        r"(mailbox|inbox|mail box|account|user)\b.{0,30}\b(full|over.?quota|quota)|quota.{0,20}exceeded|exceeded.{0,20}quota|over.?quota|insufficient (storage|disk space)",
        "mailbox_full",
    ),
    (
        r"(no such|unknown|invalid) (user|recipient|mailbox)|user.{0,20}(unknown|not found|does ?n.?t exist|does not exist)|recipient.{0,20}(not found|unknown|does not exist)|mailbox.{0,20}(not found|does not exist|unavailable)|address rejected|no mailbox",
        "user_unknown",
    ),
    (
        r"(account|mailbox|user).{0,30}(disabled|suspended|inactive|deactivated|closed|locked)",
        "mailbox_disabled",
    ),
    (
        r"(domain|host).{0,30}(not found|does not exist|unknown)|no such domain|\bno mx\b|nxdomain|unrouteable|unroutable",
        "domain_not_found",
    ),
    (
        r"(invalid|bad|malformed|illegal).{0,20}(address|recipient|email)|address.{0,20}(invalid|malformed)|syntax error.{0,20}address",
        "invalid_address",
    ),
    (r"gr[ae]y.?list", "greylisted"),
    (
        r"\b(black.?list(ed)?|block.?list(ed)?|dnsbl|rbl)\b|spamhaus|barracuda|spamcop|sorbs|(listed|blocked) (on|in|at|by)|\bip\b.{0,30}\b(blocked|banned|listed)",
        "blocked",
    ),
    (r"\bspam\b|junk mail|unsolicited|bulk (mail|email)|phishing", "spam_detected"),
    (
        r"\b(spf|dkim|dmarc)\b.{0,30}(fail|invalid|reject|policy)|authentication (required|failed)|not authenticated|unauthenticated|auth.{0,20}fail",
        "auth_failure",
    ),
    (
        r"relay(ing)?.{0,20}(denied|not permitted|not allowed|prohibited)|(unable|not permitted) to relay|we do not relay",
        "relay_denied",
    ),
    (
        r"(message|mail|email).{0,20}(too (large|big)|exceeds.{0,20}size)|message size|size limit|maximum (message )?size",
        "message_too_large",
    ),
    (
        r"(content|attachment).{0,30}(rejected|blocked|not allowed|prohibited)|virus|malware|infected",
        "content_rejected",
    ),
    (r"polic(y|ies)|administrative prohibition|prohibited|violat", "policy_violation"),
    (
        r"connection (refused|timed out|reset|closed|lost)|timed out|could not connect|unable to connect|network (error|unreachable)|host unreachable|no route to host|tls.{0,20}(fail|error)",
        "connection_error",
    ),
    (
        r"temporar(y|ily)|try again later|please retry|service (unavailable|not available)|deferred|insufficient system",
        "temporary_failure",
    ),
];

lazy_static! {
    static ref COMPILED: Vec<(Regex, &'static str)> = TEXT_PATTERNS
        .iter()
        .map(|(pattern, label)| {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .unwrap();
            (regex, *label)
        })
        .collect();
}

/// Label of the first matching text pattern
pub fn get_text_based_fallback(message: &str) -> Option<&'static str> {
    COMPILED
        .iter()
        .find(|(regex, _)| regex.is_match(message))
        .map(|(_, label)| *label)
}
