//! Deterministic rules that back up the network: text patterns, SMTP status
//! codes, retry timing, blocklist names and the label → action table.

pub mod action;
pub mod blocklist;
pub mod patterns;
pub mod retry;
pub mod smtp;

pub use action::{get_action, Action, ACTION_MAP, KNOWN_LABELS};
pub use blocklist::{identify_blocklist, BlocklistEntry, BlocklistKind, BlocklistMatch, BLOCKLIST_SIGNATURES};
pub use patterns::{get_text_based_fallback, TEXT_PATTERNS};
pub use retry::{extract_retry_timing, MAX_RETRY_SECONDS};
pub use smtp::{extract_smtp_codes, SmtpCodes, SMTP_CODE_MAP, SMTP_MAIN_CODE_MAP};

/// Full fallback cascade: text patterns, then the enhanced status code, then
/// the three-digit reply code.
pub fn get_code_based_fallback(message: &str) -> Option<&'static str> {
    get_text_based_fallback(message).or_else(|| smtp::label_for_codes(&extract_smtp_codes(message)))
}
