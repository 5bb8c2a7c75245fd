// SPDX-License-Identifier: Apache-2.0

use proptest::prelude::*;
use proptest::test_runner::Config;
use vitrage_model::Cents;
use vitrage_pricing::{
    calculate_price, total_with_vat, vat_amount, DEFAULT_VAT_RATE_PERMILLE,
};

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn computed_price_never_drops_below_base(
        base in 0_i64..5_000_00,
        width in 10_i64..=6000,
        height in 10_i64..=6000,
        rate in 0_i64..100_00,
        modifiers in proptest::collection::vec(-500_00_i64..500_00, 0..8)
    ) {
        let mods: Vec<Cents> = modifiers.into_iter().map(Cents::new).collect();
        let total = calculate_price(Cents::new(base), width, height, Cents::new(rate), &mods)
            .expect("valid inputs");
        prop_assert!(total >= Cents::new(base));
    }

    #[test]
    fn zero_rate_and_zero_modifiers_is_identity(
        base in 0_i64..5_000_00,
        width in 10_i64..=6000,
        height in 10_i64..=6000,
        count in 0_usize..6
    ) {
        let mods = vec![Cents::ZERO; count];
        let total = calculate_price(Cents::new(base), width, height, Cents::ZERO, &mods)
            .expect("valid inputs");
        prop_assert_eq!(total, Cents::new(base));
    }

    #[test]
    fn pricing_is_deterministic(
        base in 0_i64..5_000_00,
        width in 10_i64..=6000,
        height in 10_i64..=6000,
        rate in 0_i64..100_00,
        modifiers in proptest::collection::vec(-500_00_i64..500_00, 0..8)
    ) {
        let mods: Vec<Cents> = modifiers.into_iter().map(Cents::new).collect();
        let first = calculate_price(Cents::new(base), width, height, Cents::new(rate), &mods);
        let second = calculate_price(Cents::new(base), width, height, Cents::new(rate), &mods);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn vat_amount_plus_net_equals_gross(price in 0_i64..10_000_000) {
        let net = Cents::new(price);
        let vat = vat_amount(net, DEFAULT_VAT_RATE_PERMILLE);
        prop_assert_eq!(net + vat, total_with_vat(net, DEFAULT_VAT_RATE_PERMILLE));
        prop_assert!(vat >= Cents::ZERO);
    }
}
