//! Property-based tests for the reconciliation invariants.
//!
//! Run with: `cargo test --test proptest_tests`

use comprobante::core::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ── Proptest Strategies ─────────────────────────────────────────────────────

/// Unit price with up to 4 decimals (0.0000 to 99999.9999).
fn arb_price() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Quantity with up to 3 decimals (0.001 to 1000.000).
fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000i64).prop_map(|v| Decimal::new(v, 3))
}

fn arb_rate() -> impl Strategy<Value = Decimal> {
    prop_oneof![Just(dec!(18)), Just(dec!(10)), Just(dec!(8)), Just(dec!(0))]
}

fn arb_taxed_line() -> impl Strategy<Value = MonetaryLine> {
    (arb_price(), arb_quantity(), arb_rate())
        .prop_map(|(price, qty, rate)| MonetaryLineBuilder::new(price, qty).taxed(rate).build())
}

fn arb_line() -> impl Strategy<Value = MonetaryLine> {
    (arb_price(), arb_quantity(), arb_rate(), 0u8..3).prop_map(|(price, qty, rate, kind)| {
        let b = MonetaryLineBuilder::new(price, qty);
        match kind {
            0 => b.taxed(rate).build(),
            1 => b.exempt().build(),
            _ => b.unaffected().build(),
        }
    })
}

proptest! {
    #[test]
    fn taxed_line_reconciles(line in arb_taxed_line()) {
        let d = decompose(&line).unwrap();
        prop_assert_eq!(d.subtotal + d.tax, d.total);
        prop_assert_eq!(d.total, round2(line.unit_price * line.quantity));

        let rebuilt = d.subtotal * (Decimal::ONE + line.tax_rate / dec!(100));
        prop_assert!((rebuilt - d.total).abs() <= dec!(0.01));
    }

    #[test]
    fn decompose_is_deterministic(line in arb_line()) {
        prop_assert_eq!(decompose(&line).unwrap(), decompose(&line).unwrap());
    }

    #[test]
    fn mixed_total_is_sum_of_line_totals(lines in prop::collection::vec(arb_line(), 0..30)) {
        let amounts = aggregate_mixed(&lines).unwrap();
        let line_sum: Decimal = lines.iter().map(|l| decompose(l).unwrap().total).sum();

        prop_assert_eq!(amounts.total, line_sum);
        prop_assert_eq!(amounts.subtotal + amounts.tax, amounts.total);
        prop_assert_eq!(
            amounts.subtotal,
            amounts.taxed.subtotal + amounts.exempt.total + amounts.unaffected.total
        );
        prop_assert_eq!(
            amounts.total,
            amounts.taxed.total + amounts.exempt.total + amounts.unaffected.total
        );
        prop_assert_eq!(amounts.tax, amounts.taxed.tax);

        let by_rate_total: Decimal = amounts.tax_breakdown.values().map(|b| b.total).sum();
        prop_assert_eq!(by_rate_total, amounts.taxed.total);
        for bucket in amounts.tax_breakdown.values() {
            prop_assert_eq!(bucket.subtotal + bucket.tax, bucket.total);
        }
    }

    #[test]
    fn single_rate_reconciles(lines in prop::collection::vec(arb_taxed_line(), 1..20), rate in arb_rate()) {
        let amounts = aggregate_single_rate(&lines, rate).unwrap();
        let line_sum: Decimal = lines.iter().map(|l| decompose(l).unwrap().total).sum();
        prop_assert_eq!(amounts.total, line_sum);
        prop_assert_eq!(amounts.subtotal + amounts.tax, amounts.total);
    }

    #[test]
    fn correlative_is_fixed_width(last in 0u64..99_999_999u64) {
        let number = next_correlative("F001", last).unwrap();
        prop_assert_eq!(number.len(), "F001-".len() + CORRELATIVE_WIDTH);
        let sequential: u64 = number["F001-".len()..].parse().unwrap();
        prop_assert_eq!(sequential, last + 1);
    }
}

#[cfg(feature = "words")]
mod words {
    use comprobante::words::to_legal_words;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    proptest! {
        #[test]
        fn words_never_fail_in_range(cents in 0i64..100_000_000_000i64) {
            let amount = Decimal::new(cents, 2);
            let words = to_legal_words(amount).unwrap();
            let expected_suffix = format!(" CON {:02}/100", cents % 100);
            prop_assert!(words.ends_with(&expected_suffix));
            prop_assert!(!words.contains("  "));
            prop_assert!(!words.starts_with(' '));
        }
    }
}

#[cfg(feature = "identity")]
mod identity {
    use comprobante::identity::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn eight_digit_dni_always_valid(n in 0u32..100_000_000u32) {
            let number = format!("{n:08}");
            prop_assert!(validate_identity(IdentityDocumentType::NationalId, &number).valid);
        }

        #[test]
        fn validator_never_panics(s in ".{0,20}") {
            for t in [
                IdentityDocumentType::NationalId,
                IdentityDocumentType::TaxId,
                IdentityDocumentType::ForeignResidentCard,
                IdentityDocumentType::Passport,
            ] {
                let _ = validate_identity(t, &s);
                let strict = IdentityOptions::default().verify_tax_id_checksum(true);
                let _ = validate_identity_with(&strict, t, &s);
            }
        }
    }
}
