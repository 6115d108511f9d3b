use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

/// Longest retry delay that is reported, one day
pub const MAX_RETRY_SECONDS: u64 = 86_400;

const UNIT: &str = r"(seconds?|secs?|s|minutes?|mins?|m|hours?|hrs?|h)\b";

lazy_static! {
    /// Tried in order. A template without a unit group is read as seconds.
    static ref RETRY_TEMPLATES: Vec<Regex> = [
        format!(r"(?:retry|try again|resend|come back)\s+(?:in|after)\s+(\d+)\s*{UNIT}"),
        format!(r"(?:wait|delay(?:ed)?|deferred)\s+(?:for\s+)?(\d+)\s*{UNIT}"),
        r"retry-after:\s*(\d+)\b".to_string(),
        format!(r"(\d+)\s*{UNIT}\s+(?:delay|backoff|cooldown|retry)"),
        format!(r"(?:in|after)\s+(\d+)\s*{UNIT}"),
    ]
    .iter()
    .map(|pattern| RegexBuilder::new(pattern).case_insensitive(true).build().unwrap())
    .collect();
}

fn unit_seconds(unit: &str) -> u64 {
    match unit.to_ascii_lowercase().chars().next() {
        Some('h') => 3_600,
        Some('m') => 60,
        _ => 1,
    }
}

/// Suggested retry delay in seconds, if the message states one in `[1, 86400]`.
///
/// Templates are tried in order and the first in-range value wins.
pub fn extract_retry_timing(message: &str) -> Option<u32> {
    RETRY_TEMPLATES.iter().find_map(|template| {
        let caps = template.captures(message)?;
        let value: u64 = caps[1].parse().ok()?;
        let multiplier = caps.get(2).map_or(1, |unit| unit_seconds(unit.as_str()));
        let seconds = value.checked_mul(multiplier)?;
        if (1..=MAX_RETRY_SECONDS).contains(&seconds) {
            u32::try_from(seconds).ok()
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes() {
        assert_eq!(extract_retry_timing("Retry in 5 minutes"), Some(300));
    }

    #[test]
    fn test_above_cap_is_rejected() {
        assert_eq!(extract_retry_timing("Wait 100000 seconds"), None);
    }

    #[test]
    fn test_unit_abbreviations() {
        assert_eq!(extract_retry_timing("try again in 30s"), Some(30));
        assert_eq!(extract_retry_timing("try again after 10 sec"), Some(10));
        assert_eq!(extract_retry_timing("please wait 2 hrs"), Some(7_200));
        assert_eq!(extract_retry_timing("deferred for 15 min"), Some(900));
        assert_eq!(extract_retry_timing("come back in 1 hour"), Some(3_600));
        assert_eq!(extract_retry_timing("24 hours"), None);
        assert_eq!(extract_retry_timing("try later in 24 h"), Some(86_400));
    }

    #[test]
    fn test_retry_after_header() {
        assert_eq!(extract_retry_timing("421 busy\nRetry-After: 120"), Some(120));
    }

    #[test]
    fn test_zero_and_missing() {
        assert_eq!(extract_retry_timing("retry in 0 seconds"), None);
        assert_eq!(extract_retry_timing("User unknown"), None);
        assert_eq!(extract_retry_timing("wait 99999999999999999999999 seconds"), None);
    }

    #[test]
    fn test_units_are_not_word_prefixes() {
        // "5 mailboxes" is not five minutes
        assert_eq!(extract_retry_timing("after 5 mailboxes"), None);
    }
}
