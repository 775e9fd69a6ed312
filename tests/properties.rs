use payout_core::{
    iban::{
        normalize_iban, validate_iban, validate_iban_checksum, validate_iban_length,
        validate_iban_structure,
    },
    money::{Currency, format_currency, from_lowest_denomination, to_lowest_denomination},
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_normalize_is_idempotent(raw in any::<String>()) {
        let once = normalize_iban(&raw);
        prop_assert_eq!(normalize_iban(&once), once);
    }

    #[test]
    fn prop_normalized_has_no_whitespace(raw in "[a-zA-Z0-9 \t\n]{0,40}") {
        let normalized = normalize_iban(&raw);
        prop_assert!(!normalized.chars().any(char::is_whitespace));
        prop_assert!(!normalized.chars().any(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn prop_predicates_never_panic(raw in any::<String>()) {
        let _ = validate_iban_structure(&raw);
        let _ = validate_iban_length(&raw);
        let _ = validate_iban_checksum(&raw);
        let _ = validate_iban(&raw);
    }

    #[test]
    fn prop_accepted_ibans_pass_every_check(raw in "[A-Z]{2}[0-9]{2}[A-Z0-9]{11,30}") {
        if let Ok(iban) = validate_iban(&raw) {
            prop_assert!(validate_iban_structure(iban.as_str()));
            prop_assert!(validate_iban_length(iban.as_str()));
            prop_assert!(validate_iban_checksum(iban.as_str()));
        }
    }

    #[test]
    fn prop_lowest_denomination_round_trip(minor in any::<i64>()) {
        prop_assert_eq!(to_lowest_denomination(from_lowest_denomination(minor)), Ok(minor));
    }

    #[test]
    fn prop_format_sign_matches_amount(minor in -1_000_000_000i64..1_000_000_000) {
        let formatted = format_currency(minor, Currency::Gbp, true);
        prop_assert_eq!(formatted.starts_with('-'), minor < 0);
        prop_assert!(formatted.trim_start_matches('-').starts_with('£'));
        let expected_minor_suffix = format!("{:02}", minor.unsigned_abs() % 100);
        prop_assert!(formatted.ends_with(&expected_minor_suffix));
    }
}

#[test]
fn grouped_display_of_a_valid_iban() {
    let iban = validate_iban("gb82 west 1234 5698 7654 32").unwrap();
    assert_eq!(normalize_iban(&iban.print_format()), iban.as_str());
}
