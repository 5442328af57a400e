use crate::models::{
    AuthoritativeItem, AuthoritativeOrder, ExtractedOrder, ReconcileOutcome, ShippingHint,
    TargetDateUpdate, TotalPriceCheck, ValidationReport,
};
use crate::service::decision::decide;
use crate::service::delivery_date::{target_date_for_raw, AddressOverride};
use crate::service::item_match::{check_extraction, match_items};
use crate::service::normalize::{amounts_match, normalize_amount};
use crate::service::shipping::reconcile_shipping;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine settings. Everything here is plain data so a run stays a pure
/// function of its inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Product-code prefix reserved for shipping/handling lines in the
    /// authoritative system.
    pub shipping_prefix: String,
    /// Output format for target delivery dates handed to the caller.
    pub target_date_format: String,
    pub address_override: AddressOverride,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shipping_prefix: "SH".to_string(),
            target_date_format: "%d/%m/%Y".to_string(),
            address_override: AddressOverride::default(),
        }
    }
}

/// Structural failures only. Data-quality problems never end up here; they
/// degrade into visible mismatches inside the report instead.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("authoritative order has no line items; nothing to reconcile against")]
    EmptyAuthoritativeOrder,
}

/// Reconciliation engine: one synchronous pass over one extracted order and
/// one authoritative snapshot. Owns no state beyond its configuration, so
/// runs are idempotent and independent callers need no coordination.
pub struct Reconciler {
    config: EngineConfig,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Reconciler {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Runs every validation and returns the report plus the proposed
    /// per-line target delivery dates. Performs no I/O and mutates nothing;
    /// applying the decision is the caller's job.
    pub fn reconcile(
        &self,
        extracted: &ExtractedOrder,
        authoritative: &AuthoritativeOrder,
        shipping_hint: Option<&ShippingHint>,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        if authoritative.items.is_empty() {
            return Err(ReconcileError::EmptyAuthoritativeOrder);
        }

        let prefix = self.config.shipping_prefix.as_str();
        let merchandise: Vec<AuthoritativeItem> = authoritative
            .merchandise_items(prefix)
            .into_iter()
            .cloned()
            .collect();

        let total_price = self.check_total_price(extracted, authoritative);
        let items = match_items(&extracted.items, &merchandise);
        let extraction = check_extraction(&extracted.items, &merchandise);
        let shipping = reconcile_shipping(&authoritative.items, &extracted.items, shipping_hint, prefix);
        let decision = decide(&total_price, &items, &shipping);

        let overall_pass =
            total_price.attempted && total_price.matched && items.all_items_valid && shipping.passed;

        let date_updates = self.target_dates(extracted, &merchandise);

        tracing::info!(
            attempted = total_price.attempted,
            total_match = total_price.matched,
            all_items_valid = items.all_items_valid,
            item_count_match = items.item_count_match,
            shipping_case = ?shipping.case,
            shipping_passed = shipping.passed,
            overall_pass,
            decision = decision.reason(),
            "reconciliation run complete"
        );

        Ok(ReconcileOutcome {
            report: ValidationReport {
                total_price,
                items,
                extraction,
                shipping,
                overall_pass,
                decision,
            },
            date_updates,
        })
    }

    /// Order-total comparison against the authoritative total. A missing
    /// extracted total means no comparison was attempted, which later forces
    /// the inconclusive decision; an empty string is attempted and simply
    /// mismatches as zero.
    fn check_total_price(
        &self,
        extracted: &ExtractedOrder,
        authoritative: &AuthoritativeOrder,
    ) -> TotalPriceCheck {
        match &extracted.order_info.total_price {
            Some(raw) => {
                let value = normalize_amount(raw).value;
                let difference = (&value - &authoritative.total_price).abs();
                let matched = amounts_match(&value, &authoritative.total_price);
                TotalPriceCheck {
                    attempted: true,
                    message: format!(
                        "authoritative total {} vs extracted total {}: {}",
                        authoritative.total_price,
                        value,
                        if matched { "match" } else { "mismatch" }
                    ),
                    authoritative_total: authoritative.total_price.clone(),
                    extracted_total_raw: Some(raw.clone()),
                    extracted_total: Some(value),
                    difference: Some(difference),
                    matched,
                }
            }
            None => TotalPriceCheck {
                attempted: false,
                authoritative_total: authoritative.total_price.clone(),
                extracted_total_raw: None,
                extracted_total: None,
                difference: None,
                matched: false,
                message: "no extracted total price provided for validation".to_string(),
            },
        }
    }

    /// One proposed target date per matched merchandise line that carries an
    /// extracted delivery date, addressed by the ERP line identifier.
    fn target_dates(
        &self,
        extracted: &ExtractedOrder,
        merchandise: &[AuthoritativeItem],
    ) -> Vec<TargetDateUpdate> {
        let address = extracted
            .order_info
            .delivery_address
            .as_deref()
            .unwrap_or("");

        let mut updates = Vec::new();
        for auth_item in merchandise {
            let Some(ext_item) = extracted
                .items
                .iter()
                .find(|item| item.product_code == auth_item.product_code)
            else {
                continue;
            };
            if ext_item.delivery_date.trim().is_empty() {
                continue;
            }

            let (target_date, calculation_error) = target_date_for_raw(
                &ext_item.delivery_date,
                address,
                &self.config.address_override,
                &self.config.target_date_format,
            );
            updates.push(TargetDateUpdate {
                product_code: auth_item.product_code.clone(),
                line_identifier: auth_item.line_identifier.clone(),
                original_date: ext_item.delivery_date.clone(),
                target_date,
                calculation_error,
            });
        }
        updates
    }
}
