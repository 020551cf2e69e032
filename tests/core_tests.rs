use std::collections::HashSet;
use std::sync::Mutex;

use comprobante::core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn taxed(price: Decimal, qty: Decimal) -> MonetaryLine {
    MonetaryLineBuilder::new(price, qty).build()
}

// --- Line decomposition ---

#[test]
fn decomposition_reconciles_exactly() {
    let line = taxed(dec!(19.99), dec!(7));
    let d = decompose(&line).unwrap();
    // 139.93 / 1.18 = 118.5847...
    assert_eq!(d.total, dec!(139.93));
    assert_eq!(d.subtotal, dec!(118.58));
    assert_eq!(d.tax, dec!(21.35));
    assert_eq!(d.subtotal + d.tax, d.total);
}

#[test]
fn decomposition_is_idempotent() {
    let line = taxed(dec!(3.3333), dec!(3));
    assert_eq!(decompose(&line).unwrap(), decompose(&line).unwrap());
}

#[test]
fn affectation_codes() {
    assert_eq!(TaxAffectation::Taxed.code(), "10");
    assert_eq!(TaxAffectation::from_code("20"), Some(TaxAffectation::Exempt));
    assert_eq!(TaxAffectation::from_code("30"), Some(TaxAffectation::Unaffected));
    assert_eq!(TaxAffectation::from_code("40"), None);
}

// --- Aggregation ---

#[test]
fn single_rate_invoice() {
    let lines = vec![
        taxed(dec!(120), dec!(80)),
        taxed(dec!(49.90), dec!(1)),
    ];
    let a = aggregate_single_rate(&lines, STANDARD_IGV_RATE).unwrap();
    // 9649.90 / 1.18 = 8177.8813...
    assert_eq!(a.total, dec!(9649.90));
    assert_eq!(a.subtotal, dec!(8177.88));
    assert_eq!(a.tax, dec!(1472.02));
}

#[test]
fn mixed_invoice_standard_and_reduced() {
    let lines = vec![
        taxed(dec!(35.40), dec!(3)),
        MonetaryLineBuilder::new(dec!(27.50), dec!(2))
            .taxed(REDUCED_IGV_RATE)
            .build(),
        MonetaryLineBuilder::new(dec!(4.80), dec!(5)).exempt().build(),
    ];
    let a = aggregate_mixed(&lines).unwrap();

    // 106.20 / 1.18 = 90.00; 55.00 / 1.10 = 50.00
    assert_eq!(a.tax_breakdown[&dec!(18)].subtotal, dec!(90.00));
    assert_eq!(a.tax_breakdown[&dec!(18)].tax, dec!(16.20));
    assert_eq!(a.tax_breakdown[&dec!(10)].subtotal, dec!(50.00));
    assert_eq!(a.tax_breakdown[&dec!(10)].tax, dec!(5.00));
    assert_eq!(a.taxed.subtotal, dec!(140.00));
    assert_eq!(a.exempt.total, dec!(24.00));
    assert_eq!(a.unaffected.total, dec!(0.00));
    assert_eq!(a.subtotal, dec!(164.00));
    assert_eq!(a.tax, dec!(21.20));
    assert_eq!(a.total, dec!(185.20));
}

#[test]
fn mixed_amounts_serialize_as_strings() {
    let lines = vec![taxed(dec!(118), dec!(1))];
    let a = aggregate_mixed(&lines).unwrap();
    let json = serde_json::to_value(&a).unwrap();
    assert_eq!(json["total"], "118.00");
    assert_eq!(json["tax_breakdown"]["18"]["tax"], "18.00");

    let back: MixedInvoiceAmounts = serde_json::from_value(json).unwrap();
    assert_eq!(back, a);
}

#[test]
fn invalid_line_reported_with_position() {
    let lines = vec![
        taxed(dec!(1), dec!(1)),
        taxed(dec!(1), dec!(1)),
        taxed(dec!(-5), dec!(1)),
    ];
    let err = aggregate_mixed(&lines).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid line 3: unit price must not be negative, got -5"
    );
}

#[test]
fn negative_document_rate_is_rejected() {
    let lines = vec![taxed(dec!(10), dec!(1))];
    for rate in [dec!(-100), dec!(-18)] {
        assert!(matches!(
            aggregate_single_rate(&lines, rate),
            Err(ComprobanteError::InvalidAmount(_))
        ));
        assert!(matches!(
            InvoiceAmounts::from_total(dec!(10), rate),
            Err(ComprobanteError::InvalidAmount(_))
        ));
    }
}

#[test]
fn overflowing_amounts_are_errors() {
    let huge = MonetaryLineBuilder::new(Decimal::MAX, dec!(2)).build();
    assert!(matches!(
        decompose(&huge),
        Err(ComprobanteError::InvalidLine { .. })
    ));

    let max_exempt = MonetaryLineBuilder::new(Decimal::MAX, dec!(1)).exempt().build();
    assert!(matches!(
        aggregate_mixed(&[max_exempt.clone(), max_exempt]),
        Err(ComprobanteError::InvalidLine { index: Some(2), .. })
    ));
}

// --- Correlatives ---

#[test]
fn correlative_format() {
    assert_eq!(next_correlative("F001", 99).unwrap(), "F001-00000100");
    assert_eq!(next_correlative("B001", 0).unwrap(), "B001-00000001");
}

#[test]
fn concurrent_issuance_never_duplicates() {
    let issuer = CorrelativeIssuer::new(InMemoryCounterStore::new());
    let issued = Mutex::new(Vec::new());

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..50 {
                    let number = issuer.next("F001").unwrap();
                    issued.lock().unwrap().push(number);
                }
            });
        }
    });

    let issued = issued.into_inner().unwrap();
    let unique: HashSet<&String> = issued.iter().collect();
    assert_eq!(issued.len(), 400);
    assert_eq!(unique.len(), 400);
    assert!(unique.contains(&"F001-00000400".to_string()));
    assert_eq!(issuer.store().counter("F001").unwrap().last_number(), 400);
}

#[test]
fn aborted_commits_leave_no_gaps() {
    let issuer = CorrelativeIssuer::new(InMemoryCounterStore::new().with_series("B001", 9));
    let mut committed = Vec::new();

    for attempt in 0..6 {
        let result = issuer.issue("B001", |number| {
            if attempt % 2 == 1 {
                return Err(ComprobanteError::Persistence("rolled back".into()));
            }
            committed.push(number.to_string());
            Ok(())
        });
        assert_eq!(result.is_ok(), attempt % 2 == 0);
    }

    assert_eq!(
        committed,
        vec!["B001-00000010", "B001-00000011", "B001-00000012"]
    );
}

#[test]
fn series_survives_panicking_commit() {
    let issuer = CorrelativeIssuer::new(InMemoryCounterStore::new());
    let crashed = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _ = issuer.issue("F001", |_| -> Result<(), ComprobanteError> {
            panic!("storage driver crashed")
        });
    }));
    assert!(crashed.is_err());

    assert_eq!(issuer.next("F001").unwrap(), "F001-00000001");
    assert_eq!(issuer.next("F001").unwrap(), "F001-00000002");
}

#[test]
fn config_from_partial_json() {
    let config: ComprobanteConfig = serde_json::from_str(
        r#"{ "verify_tax_id_checksum": true, "unknown_detraction_category": "no_withholding" }"#,
    )
    .unwrap();
    assert!(config.verify_tax_id_checksum);
    assert_eq!(
        config.unknown_detraction_category,
        UnknownCategoryPolicy::NoWithholding
    );
    assert_eq!(config.standard_rate, dec!(18));
    assert_eq!(config.max_issue_attempts, 5);
}
