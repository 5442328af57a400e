use order_reconciler::models::{AuthoritativeOrder, Decision, ExtractedOrder, ShippingCase};
use order_reconciler::Reconciler;

/// End-to-end pass over the wire-shaped contracts: deserialize both sides
/// from JSON, reconcile, and check the serialized report carries everything
/// an auditor needs without re-running the engine.
#[test]
fn json_round_trip_reconciliation() {
    let extracted: ExtractedOrder = serde_json::from_str(
        r#"{
            "order_info": {
                "order_number": "8123456789",
                "customer_po": "PO2410000285",
                "delivery_address": "7 Main Road, Industrial Park",
                "total_price": "USD 7.157,16",
                "shipping_cost": "USD 129,00",
                "payment_terms": "Net 30"
            },
            "items": [
                {
                    "item_number": "1",
                    "product_code": "G1234A",
                    "description": "Inline filter assembly",
                    "quantity": "2 EA",
                    "unit_price": "USD 3.514,08",
                    "extended_price": "USD 7.028,16",
                    "discount": "",
                    "item_total": "USD 7.028,16",
                    "delivery_date": "10.01.2025"
                }
            ]
        }"#,
    )
    .unwrap();

    let authoritative: AuthoritativeOrder = serde_json::from_str(
        r#"{
            "order_number": "PO2410000285",
            "status": "Draft",
            "total_price": "7157.16",
            "supplier_name": "Example Instruments",
            "items": [
                {
                    "product_code": "G1234A",
                    "quantity": 2,
                    "total_price_incl_tax": "7028.16",
                    "line_identifier": "14"
                },
                {
                    "product_code": "SH-STANDARD",
                    "quantity": 1,
                    "total_price_incl_tax": "129.00",
                    "line_identifier": "15"
                }
            ]
        }"#,
    )
    .unwrap();

    let hint = order_reconciler::service::shipping::hint_from_order_info(&extracted.order_info);
    let outcome = Reconciler::default()
        .reconcile(&extracted, &authoritative, hint.as_ref())
        .unwrap();

    assert!(outcome.report.overall_pass);
    assert!(matches!(outcome.report.decision, Decision::Approved { .. }));
    assert_eq!(outcome.report.shipping.case, ShippingCase::BothExist);
    assert_eq!(outcome.date_updates.len(), 1);
    assert_eq!(outcome.date_updates[0].target_date, "03/01/2025");

    // The serialized report must be self-contained and re-readable.
    let json = serde_json::to_string(&outcome.report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["overall_pass"], true);
    assert_eq!(value["decision"]["decision"], "approved");
    assert_eq!(value["shipping"]["case"], "both_exist");
    assert_eq!(value["items"]["item_count_match"], true);
}
