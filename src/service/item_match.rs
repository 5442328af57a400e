use crate::models::{
    AuthoritativeItem, ExtractedItem, ExtractionCheck, ItemValidation, ItemValidationSet,
    PriceMismatch, QuantityMismatch,
};
use crate::service::normalize::{amounts_match, flagged_mismatch, normalize_amount, normalize_quantity};
use std::collections::HashMap;

/// Pairs extracted line items against authoritative merchandise lines by
/// product code (case-sensitive, exact) and compares quantity and line
/// total per item. A code present on only one side is always reported,
/// never dropped.
pub fn match_items(
    extracted: &[ExtractedItem],
    authoritative: &[AuthoritativeItem],
) -> ItemValidationSet {
    let extracted_by_code: HashMap<&str, &ExtractedItem> = extracted
        .iter()
        .map(|item| (item.product_code.as_str(), item))
        .collect();
    let authoritative_codes: HashMap<&str, &AuthoritativeItem> = authoritative
        .iter()
        .map(|item| (item.product_code.as_str(), item))
        .collect();

    let mut items = Vec::with_capacity(authoritative.len());
    let mut missing_in_ai = Vec::new();
    let mut all_items_valid = true;

    for auth_item in authoritative {
        let code = auth_item.product_code.as_str();
        match extracted_by_code.get(code) {
            Some(ext_item) => {
                let quantity = normalize_quantity(&ext_item.quantity);
                let price = normalize_amount(&ext_item.item_total).value;
                let quantity_match = quantity == auth_item.quantity;
                let price_match = amounts_match(&price, &auth_item.total_price_incl_tax);
                let passed = quantity_match && price_match;
                if !passed {
                    all_items_valid = false;
                }

                tracing::debug!(
                    code,
                    quantity_match,
                    price_match,
                    "compared extracted line against authoritative line"
                );

                items.push(ItemValidation {
                    product_code: auth_item.product_code.clone(),
                    authoritative_quantity: auth_item.quantity,
                    authoritative_price: auth_item.total_price_incl_tax.clone(),
                    extracted_quantity_raw: Some(ext_item.quantity.clone()),
                    extracted_quantity: Some(quantity),
                    extracted_price_raw: Some(ext_item.item_total.clone()),
                    extracted_price: Some(price.clone()),
                    price_difference: Some((&price - &auth_item.total_price_incl_tax).abs()),
                    quantity_match,
                    price_match,
                    passed,
                });
            }
            None => {
                all_items_valid = false;
                missing_in_ai.push(auth_item.product_code.clone());
                items.push(ItemValidation {
                    product_code: auth_item.product_code.clone(),
                    authoritative_quantity: auth_item.quantity,
                    authoritative_price: auth_item.total_price_incl_tax.clone(),
                    extracted_quantity_raw: None,
                    extracted_quantity: None,
                    extracted_price_raw: None,
                    extracted_price: None,
                    price_difference: None,
                    quantity_match: false,
                    price_match: false,
                    passed: false,
                });
            }
        }
    }

    let mut missing_in_authoritative = Vec::new();
    for ext_item in extracted {
        if !authoritative_codes.contains_key(ext_item.product_code.as_str()) {
            missing_in_authoritative.push(ext_item.product_code.clone());
            all_items_valid = false;
        }
    }

    ItemValidationSet {
        all_items_valid,
        // Length comparison only; deliberately independent of which codes
        // actually matched.
        item_count_match: extracted.len() == authoritative.len(),
        authoritative_item_count: authoritative.len(),
        extracted_item_count: extracted.len(),
        items,
        missing_in_ai,
        missing_in_authoritative,
    }
}

/// Extraction quality check for the audit record. Uses the stricter 0.005
/// flagging threshold so near-miss prices reach a human even when the order
/// itself is still approvable under the 0.01 tolerance.
pub fn check_extraction(
    extracted: &[ExtractedItem],
    authoritative: &[AuthoritativeItem],
) -> ExtractionCheck {
    let extracted_by_code: HashMap<&str, &ExtractedItem> = extracted
        .iter()
        .map(|item| (item.product_code.as_str(), item))
        .collect();

    let mut missing_product_codes = Vec::new();
    let mut quantity_mismatches = Vec::new();
    let mut price_mismatches = Vec::new();

    for auth_item in authoritative {
        let Some(ext_item) = extracted_by_code.get(auth_item.product_code.as_str()) else {
            missing_product_codes.push(auth_item.product_code.clone());
            continue;
        };

        let quantity = normalize_quantity(&ext_item.quantity);
        if quantity != auth_item.quantity {
            quantity_mismatches.push(QuantityMismatch {
                product_code: auth_item.product_code.clone(),
                authoritative_quantity: auth_item.quantity,
                extracted_quantity_raw: ext_item.quantity.clone(),
                extracted_quantity: quantity,
            });
        }

        let price = normalize_amount(&ext_item.item_total).value;
        if flagged_mismatch(&price, &auth_item.total_price_incl_tax) {
            price_mismatches.push(PriceMismatch {
                product_code: auth_item.product_code.clone(),
                authoritative_price: auth_item.total_price_incl_tax.clone(),
                extracted_price_raw: ext_item.item_total.clone(),
                extracted_price: price.clone(),
                difference: (&price - &auth_item.total_price_incl_tax).abs(),
            });
        }
    }

    let length_match = extracted.len() == authoritative.len();
    let is_valid = length_match
        && missing_product_codes.is_empty()
        && quantity_mismatches.is_empty()
        && price_mismatches.is_empty();

    ExtractionCheck {
        length_match,
        expected_count: authoritative.len(),
        extracted_count: extracted.len(),
        missing_product_codes,
        quantity_mismatches,
        price_mismatches,
        is_valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn auth(code: &str, quantity: i64, price: &str) -> AuthoritativeItem {
        AuthoritativeItem {
            product_code: code.to_string(),
            quantity,
            total_price_incl_tax: BigDecimal::from_str(price).unwrap(),
            line_identifier: format!("L-{code}"),
        }
    }

    fn ext(code: &str, quantity: &str, item_total: &str) -> ExtractedItem {
        ExtractedItem {
            product_code: code.to_string(),
            quantity: quantity.to_string(),
            item_total: item_total.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn matching_items_pass_on_both_dimensions() {
        let result = match_items(
            &[ext("G1234A", "2 EA", "USD 383.04")],
            &[auth("G1234A", 2, "383.04")],
        );
        assert!(result.all_items_valid);
        assert!(result.item_count_match);
        assert!(result.items[0].quantity_match);
        assert!(result.items[0].price_match);
        assert!(result.missing_in_ai.is_empty());
        assert!(result.missing_in_authoritative.is_empty());
    }

    #[test]
    fn authoritative_item_absent_from_extraction_is_reported() {
        let result = match_items(&[], &[auth("G1234A", 1, "100.00")]);
        assert!(!result.all_items_valid);
        assert_eq!(result.missing_in_ai, vec!["G1234A"]);
        assert!(!result.items[0].passed);
    }

    #[test]
    fn extracted_item_absent_from_authoritative_is_reported() {
        let result = match_items(
            &[ext("G1234A", "1 EA", "100.00"), ext("X9999", "1 EA", "5.00")],
            &[auth("G1234A", 1, "100.00")],
        );
        assert!(!result.all_items_valid);
        assert_eq!(result.missing_in_authoritative, vec!["X9999"]);
    }

    #[test]
    fn product_codes_are_case_sensitive() {
        let result = match_items(
            &[ext("g1234a", "1 EA", "100.00")],
            &[auth("G1234A", 1, "100.00")],
        );
        assert_eq!(result.missing_in_ai, vec!["G1234A"]);
        assert_eq!(result.missing_in_authoritative, vec!["g1234a"]);
    }

    #[test]
    fn count_match_is_length_only() {
        // Same length, different codes: count matches while content fails.
        let result = match_items(
            &[ext("A", "1 EA", "1.00")],
            &[auth("B", 1, "1.00")],
        );
        assert!(result.item_count_match);
        assert!(!result.all_items_valid);
    }

    #[test]
    fn matcher_is_idempotent() {
        let extracted = [
            ext("G1234A", "2 EA", "USD 383.04"),
            ext("G5678B", "1 EA", "USD 941,17"),
        ];
        let authoritative = [auth("G1234A", 2, "383.04"), auth("G5678B", 1, "941.17")];

        let first = match_items(&extracted, &authoritative);
        let second = match_items(&extracted, &authoritative);
        assert_eq!(first, second);
    }

    #[test]
    fn extraction_check_flags_sub_cent_price_drift() {
        // 941.176 vs 941.17: passes the 0.01 approval tolerance but must be
        // flagged at the 0.005 report threshold.
        let extracted = [ext("G1234A", "1 EA", "941.176")];
        let authoritative = [auth("G1234A", 1, "941.17")];

        let matched = match_items(&extracted, &authoritative);
        assert!(matched.all_items_valid);

        let check = check_extraction(&extracted, &authoritative);
        assert_eq!(check.price_mismatches.len(), 1);
        assert!(!check.is_valid);
    }
}
