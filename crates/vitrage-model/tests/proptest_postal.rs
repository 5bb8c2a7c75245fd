// SPDX-License-Identifier: Apache-2.0

use proptest::prelude::*;
use proptest::test_runner::Config;
use vitrage_model::DutchPostalCode;

proptest! {
    #![proptest_config(Config::with_cases(128))]
    #[test]
    fn postal_parse_canonicalizes_and_is_idempotent(
        digits in 1000_u32..=9999_u32,
        a in proptest::char::range('a', 'z'),
        b in proptest::char::range('a', 'z'),
        spaced in any::<bool>()
    ) {
        let sep = if spaced { " " } else { "" };
        let raw = format!("{digits}{sep}{a}{b}");
        let parsed = DutchPostalCode::parse(&raw).expect("postal parse");
        let canonical = format!("{digits} {}{}", a.to_ascii_uppercase(), b.to_ascii_uppercase());
        prop_assert_eq!(parsed.as_str(), canonical.as_str());
        let reparsed = DutchPostalCode::parse(parsed.as_str()).expect("reparse");
        prop_assert_eq!(reparsed, parsed);
    }

    #[test]
    fn postal_rejects_wrong_lengths(raw in "[0-9]{1,3}|[0-9]{5,8}") {
        prop_assert!(DutchPostalCode::parse(&raw).is_err());
    }
}
