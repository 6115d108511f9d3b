use bounce_classifier::{
    extract_retry_timing, extract_smtp_codes, get_action, get_code_based_fallback,
    get_text_based_fallback, identify_blocklist, Action, BlocklistMatch, SmtpCodes, ACTION_MAP,
    KNOWN_LABELS,
};

#[test]
fn test_extract_smtp_codes() {
    assert_eq!(
        extract_smtp_codes("550 5.1.1 User unknown"),
        SmtpCodes {
            main_code: Some("550".into()),
            extended_code: Some("5.1.1".into()),
        }
    );
    assert_eq!(
        extract_smtp_codes("Connection refused"),
        SmtpCodes {
            main_code: None,
            extended_code: None,
        }
    );
}

#[test]
fn test_extract_retry_timing() {
    assert_eq!(extract_retry_timing("Retry in 5 minutes"), Some(300));
    assert_eq!(extract_retry_timing("Wait 100000 seconds"), None);
}

#[test]
fn test_text_pattern_beats_code() {
    assert_eq!(get_code_based_fallback("550 No such user here"), Some("user_unknown"));
    assert_eq!(get_text_based_fallback("550 No such user here"), Some("user_unknown"));
}

#[test]
fn test_code_fallback_for_quota() {
    assert_eq!(get_code_based_fallback("552 5.2.2 Mailbox quota exceeded"), Some("mailbox_full"));
}

#[test]
fn test_identify_two_blocklists() {
    match identify_blocklist("Blocked by spamhaus.org and barracuda") {
        Some(BlocklistMatch::Multiple(entries)) => {
            let names: Vec<_> = entries.iter().map(|e| e.name).collect();
            assert_eq!(names, vec!["Spamhaus", "Barracuda"]);
        }
        other => panic!("expected two blocklists, got {:?}", other),
    }
}

#[test]
fn test_actions_for_all_labels() {
    for label in KNOWN_LABELS {
        assert!(Action::ALL.contains(&get_action(label)));
        assert!(ACTION_MAP.iter().any(|(name, _)| *name == label));
    }
    assert_eq!(get_action("not_a_label"), Action::Review);
}

#[test]
fn test_fallback_is_not_an_error() {
    assert_eq!(get_code_based_fallback("Delivered fine"), None);
    assert_eq!(identify_blocklist("Delivered fine"), None);
    assert_eq!(extract_retry_timing("Delivered fine"), None);
}
