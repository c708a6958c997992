//! End-to-end computation of a realistic multi-line document through the
//! public API.

use ivacalc::{
    compute_document, compute_line, CostType, Document, DocumentHeader, LineItem, TaxAffectation,
    TaxRate,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn line(
    name: &str,
    quantity: Decimal,
    price: Decimal,
    rate: TaxRate,
    affectation: TaxAffectation,
) -> LineItem {
    LineItem {
        item_code: None,
        item_name: Some(name.to_string()),
        quantity,
        unit_price: price,
        discount: Decimal::ZERO,
        global_discount: Decimal::ZERO,
        tax_rate: rate,
        affectation,
        gravada_proportion: dec!(100),
        input_credit: true,
        input_credit_proportion: dec!(100),
        exchange_rate: Decimal::ONE,
        decimal_places: 0,
        cost_type: CostType::Direct,
    }
}

/// Guaraní invoice covering all four affectations, both rates and a
/// non-creditable line.
fn invoice() -> Document {
    let mut mixed = line(
        "mixed",
        dec!(1),
        dec!(200),
        TaxRate::Five,
        TaxAffectation::GravadoParcial,
    );
    mixed.gravada_proportion = dec!(50);

    let mut no_credit = line(
        "no-credit",
        dec!(1),
        dec!(11000),
        TaxRate::Ten,
        TaxAffectation::Gravado,
    );
    no_credit.input_credit = false;

    Document {
        header: DocumentHeader {
            currency: "PYG".to_string(),
            decimal_places: 0,
            exchange_rate: Decimal::ONE,
            document_date: None,
        },
        lines: vec![
            line(
                "goods",
                dec!(2),
                dec!(55000),
                TaxRate::Ten,
                TaxAffectation::Gravado,
            ),
            line(
                "reduced",
                dec!(1),
                dec!(20500),
                TaxRate::Five,
                TaxAffectation::Gravado,
            ),
            line(
                "books",
                dec!(3),
                dec!(10000),
                TaxRate::Zero,
                TaxAffectation::Exento,
            ),
            mixed,
            no_credit,
        ],
    }
}

#[test]
fn invoice_totals() {
    let (results, totals) = invoice().compute().unwrap();
    assert_eq!(results.len(), 5);

    // 110000 + 20500 + 30000 + 200 + 11000
    assert_eq!(totals.grand_total, dec!(171700));
    assert_eq!(totals.grand_total_mb, dec!(171700));

    assert_eq!(totals.taxable_base_10, dec!(110000));
    assert_eq!(totals.vat_10, dec!(11000));
    assert_eq!(totals.taxable_base_5, dec!(19622));
    assert_eq!(totals.vat_5, dec!(981));

    // fully taxed nets at each rate; mixed line contributes base + vat
    assert_eq!(totals.gross_subtotal_10, dec!(121000));
    assert_eq!(totals.gross_subtotal_5, dec!(20603));

    // exento net plus the mixed line's exempt base
    assert_eq!(totals.exempt_total, dec!(30098));
    assert_eq!(totals.exonerated_total, dec!(0));
    assert_eq!(totals.exempt_exonerated_subtotal, dec!(30098));

    assert_eq!(totals.credit_net_total, dec!(160700));
    assert_eq!(totals.credit_base_total, dec!(119622));
    assert_eq!(totals.credit_vat_total, dec!(10981));
    // prorated remainders of credit lines plus the full net of the
    // no-credit line
    assert_eq!(totals.non_creditable_total, dec!(41097));

    assert!(totals.warnings.is_empty());
}

#[test]
fn line_results_attribute_every_net() {
    let (results, _) = invoice().compute().unwrap();
    for result in &results {
        let attributed = result.taxable_base + result.vat + result.exempt_base;
        assert!(
            (attributed - result.net).abs() <= Decimal::ONE,
            "{:?}: attributed {} vs net {}",
            result.item_name,
            attributed,
            result.net
        );
    }
}

#[test]
fn recomputation_is_byte_identical() {
    let doc = invoice();
    let first = doc.compute().unwrap();
    let second = doc.compute().unwrap();
    assert_eq!(first, second);
}

#[test]
fn foreign_currency_document_mirrors_totals() {
    let doc = Document {
        header: DocumentHeader {
            currency: "USD".to_string(),
            decimal_places: 2,
            exchange_rate: dec!(7300),
            document_date: None,
        },
        lines: vec![line(
            "export",
            dec!(1),
            dec!(100),
            TaxRate::Ten,
            TaxAffectation::Gravado,
        )],
    };
    let (results, totals) = doc.compute().unwrap();

    assert_eq!(results[0].net, dec!(100.00));
    assert_eq!(results[0].net_mb, dec!(730000));
    assert_eq!(results[0].taxable_base, dec!(90.91));
    assert_eq!(results[0].vat, dec!(9.09));

    assert_eq!(totals.grand_total, dec!(100.00));
    assert_eq!(totals.grand_total_mb, dec!(730000));
    assert_eq!(totals.taxable_base_10, dec!(90.91));
    assert_eq!(totals.taxable_base_10_mb, dec!(663643));
    assert_eq!(totals.vat_10, dec!(9.09));
    assert_eq!(totals.vat_10_mb, dec!(66357));
}

#[test]
fn terse_json_document_computes_with_defaults() {
    let json = r#"{
        "header": {"currency": "PYG", "exchange_rate": 1},
        "lines": [
            {"item_name": "a", "unit_price": 110000, "tax_rate": 10, "affectation": "Gravado"},
            {"unit_price": 30000, "tax_rate": 0, "affectation": "Exento"}
        ]
    }"#;
    let doc: Document = serde_json::from_str(json).unwrap();
    let (results, totals) = doc.compute().unwrap();

    assert_eq!(results[0].taxable_base, dec!(100000));
    assert_eq!(results[0].vat, dec!(10000));
    assert_eq!(results[1].exempt_base, dec!(30000));
    assert_eq!(totals.grand_total, dec!(140000));
}

#[test]
fn compute_line_and_compute_document_compose() {
    // The two public operations are the same pipeline Document::compute
    // runs internally.
    let doc = invoice();
    let results: Vec<_> = doc
        .lines
        .iter()
        .map(|l| {
            let mut l = l.clone();
            l.exchange_rate = doc.header.exchange_rate;
            l.decimal_places = doc.header.decimal_places;
            compute_line(&l).unwrap()
        })
        .collect();
    let totals = compute_document(&doc.header, &results).unwrap();
    let (_, expected) = doc.compute().unwrap();
    assert_eq!(totals, expected);
}

#[test]
fn rejected_document_yields_no_partial_totals() {
    let mut doc = invoice();
    doc.lines[3].gravada_proportion = dec!(150);
    assert!(doc.compute().is_err());
}
