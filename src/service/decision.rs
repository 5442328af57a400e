use crate::models::{Decision, ItemValidationSet, ShippingValidation, TotalPriceCheck};

/// One-shot approval evaluation. Every order-validation run produces a
/// single terminal decision; re-validation after correction is a fresh run.
///
/// Approval demands all five criteria at once: total-price match, all item
/// details valid, item count match, nothing missing from the extraction, and
/// a passing shipping check. Any failure routes the order back for review
/// with every failing criterion named in the reason. When no total-price
/// comparison was attempted at all, the evaluation is inconclusive and the
/// prior authoritative status must be left untouched.
pub fn decide(
    total_price: &TotalPriceCheck,
    items: &ItemValidationSet,
    shipping: &ShippingValidation,
) -> Decision {
    if !total_price.attempted {
        return Decision::Inconclusive {
            reason: "no extracted total price supplied; keeping current order status".to_string(),
        };
    }

    let mut failures = Vec::new();
    if !total_price.matched {
        failures.push("total price mismatch".to_string());
    }
    if !items.all_items_valid {
        failures.push("item price/quantity discrepancies".to_string());
    }
    if !items.item_count_match {
        failures.push("item count mismatch".to_string());
    }
    if !items.missing_in_ai.is_empty() {
        failures.push(format!(
            "{} items missing in AI extraction",
            items.missing_in_ai.len()
        ));
    }
    if !shipping.passed {
        failures.push("shipping validation failed".to_string());
    }

    if failures.is_empty() {
        Decision::Approved {
            reason: "total price, all item details, item count and shipping validated successfully"
                .to_string(),
        }
    } else {
        Decision::SentBackForReview {
            reason: format!("validation failed: {}", failures.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderStatus, ShippingCase};
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn total_check(attempted: bool, matched: bool) -> TotalPriceCheck {
        TotalPriceCheck {
            attempted,
            authoritative_total: BigDecimal::from_str("100.00").unwrap(),
            extracted_total_raw: attempted.then(|| "USD 100.00".to_string()),
            extracted_total: attempted.then(|| BigDecimal::from_str("100.00").unwrap()),
            difference: None,
            matched,
            message: String::new(),
        }
    }

    fn item_set(all_valid: bool, count_match: bool, missing_in_ai: Vec<String>) -> ItemValidationSet {
        ItemValidationSet {
            all_items_valid: all_valid,
            item_count_match: count_match,
            authoritative_item_count: 1,
            extracted_item_count: 1,
            items: vec![],
            missing_in_ai,
            missing_in_authoritative: vec![],
        }
    }

    fn shipping_check(passed: bool) -> ShippingValidation {
        ShippingValidation {
            case: if passed {
                ShippingCase::Neither
            } else {
                ShippingCase::AuthoritativeOnly
            },
            authoritative_charges: vec![],
            authoritative_total: None,
            extracted: None,
            difference: None,
            matched: passed,
            passed,
            message: String::new(),
        }
    }

    #[test]
    fn all_criteria_passing_approves() {
        let decision = decide(
            &total_check(true, true),
            &item_set(true, true, vec![]),
            &shipping_check(true),
        );
        assert!(matches!(decision, Decision::Approved { .. }));
        assert_eq!(decision.status(), Some(OrderStatus::Approved));
    }

    #[test]
    fn shipping_failure_alone_sends_back_with_shipping_in_the_reason() {
        let decision = decide(
            &total_check(true, true),
            &item_set(true, true, vec![]),
            &shipping_check(false),
        );
        assert_eq!(decision.status(), Some(OrderStatus::SentBackForReview));
        assert!(decision.reason().contains("shipping"));
    }

    #[test]
    fn every_failing_criterion_is_listed() {
        let decision = decide(
            &total_check(true, false),
            &item_set(false, false, vec!["G1234A".to_string()]),
            &shipping_check(false),
        );
        let reason = decision.reason();
        assert!(reason.contains("total price mismatch"));
        assert!(reason.contains("item price/quantity discrepancies"));
        assert!(reason.contains("item count mismatch"));
        assert!(reason.contains("1 items missing in AI extraction"));
        assert!(reason.contains("shipping validation failed"));
    }

    #[test]
    fn missing_extracted_total_is_inconclusive() {
        let decision = decide(
            &total_check(false, false),
            &item_set(true, true, vec![]),
            &shipping_check(true),
        );
        assert!(matches!(decision, Decision::Inconclusive { .. }));
        assert_eq!(decision.status(), None);
    }
}
