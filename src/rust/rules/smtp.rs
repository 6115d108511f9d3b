use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// RFC 3463 enhanced status codes and the category they indicate
pub const SMTP_CODE_MAP: &[(&str, &str)] = &[
    ("5.1.1", "user_unknown"),
    ("5.1.2", "domain_not_found"),
    ("5.1.3", "invalid_address"),
    ("5.1.6", "mailbox_disabled"),
    ("5.1.10", "domain_not_found"),
    ("5.2.1", "mailbox_disabled"),
    ("5.2.2", "mailbox_full"),
    ("5.2.3", "message_too_large"),
    ("5.3.4", "message_too_large"),
    ("5.4.1", "relay_denied"),
    ("5.4.4", "domain_not_found"),
    ("5.4.7", "temporary_failure"),
    ("5.5.3", "policy_violation"),
    ("5.7.0", "policy_violation"),
    ("5.7.1", "policy_violation"),
    ("5.7.8", "auth_failure"),
    ("5.7.23", "auth_failure"),
    ("5.7.25", "auth_failure"),
    ("5.7.26", "auth_failure"),
    ("5.7.27", "domain_not_found"),
    ("5.7.350", "relay_denied"),
    ("5.7.510", "blocked"),
    ("5.7.511", "blocked"),
    ("5.7.606", "blocked"),
    ("4.2.1", "temporary_failure"),
    ("4.2.2", "mailbox_full"),
    ("4.3.1", "temporary_failure"),
    ("4.3.2", "temporary_failure"),
    ("4.4.1", "connection_error"),
    ("4.4.2", "connection_error"),
    ("4.4.7", "temporary_failure"),
    ("4.5.3", "rate_limited"),
    ("4.7.0", "temporary_failure"),
    ("4.7.1", "greylisted"),
    ("4.7.26", "auth_failure"),
    ("4.7.28", "rate_limited"),
];

/// Basic three-digit reply codes
pub const SMTP_MAIN_CODE_MAP: &[(&str, &str)] = &[
    ("421", "temporary_failure"),
    ("450", "temporary_failure"),
    ("451", "temporary_failure"),
    ("452", "mailbox_full"),
    ("454", "temporary_failure"),
    ("530", "auth_failure"),
    ("535", "auth_failure"),
    ("541", "spam_detected"),
    ("550", "user_unknown"),
    ("551", "invalid_address"),
    ("552", "mailbox_full"),
    ("553", "invalid_address"),
    ("554", "policy_violation"),
];

lazy_static! {
    static ref EXTENDED_CODE: Regex = Regex::new(r"\b([245]\.\d{1,3}\.\d{1,3})\b").unwrap();
    static ref MAIN_CODE: Regex = Regex::new(r"^(\d{3})[ -]").unwrap();
}

/// Status codes found in a bounce message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmtpCodes {
    /// Three-digit reply code, only when it opens the message
    pub main_code: Option<String>,
    /// First enhanced status code anywhere in the message
    pub extended_code: Option<String>,
}

pub fn extract_smtp_codes(message: &str) -> SmtpCodes {
    SmtpCodes {
        main_code: MAIN_CODE
            .captures(message)
            .map(|c| c[1].to_string()),
        extended_code: EXTENDED_CODE
            .captures(message)
            .map(|c| c[1].to_string()),
    }
}

pub(crate) fn lookup(table: &[(&str, &'static str)], code: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// Label implied by the status codes alone: enhanced code first, then main code
pub(crate) fn label_for_codes(codes: &SmtpCodes) -> Option<&'static str> {
    codes
        .extended_code
        .as_deref()
        .and_then(|code| lookup(SMTP_CODE_MAP, code))
        .or_else(|| codes.main_code.as_deref().and_then(|code| lookup(SMTP_MAIN_CODE_MAP, code)))
}
