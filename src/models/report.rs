use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Terminal order status written back to the ERP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Approved,
    SentBackForReview,
}

/// Outcome of one decision-engine evaluation. `Inconclusive` is the
/// "insufficient information, do not decide" exit: no extracted total was
/// supplied, so the prior authoritative status is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision")]
pub enum Decision {
    Approved { reason: String },
    SentBackForReview { reason: String },
    Inconclusive { reason: String },
}

impl Decision {
    /// Status to write back, if the evaluation reached one.
    pub fn status(&self) -> Option<OrderStatus> {
        match self {
            Decision::Approved { .. } => Some(OrderStatus::Approved),
            Decision::SentBackForReview { .. } => Some(OrderStatus::SentBackForReview),
            Decision::Inconclusive { .. } => None,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Decision::Approved { reason }
            | Decision::SentBackForReview { reason }
            | Decision::Inconclusive { reason } => reason,
        }
    }
}

/// Order-total comparison. `attempted` is false when the caller supplied no
/// extracted total at all, which later forces an inconclusive decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalPriceCheck {
    pub attempted: bool,
    pub authoritative_total: BigDecimal,
    pub extracted_total_raw: Option<String>,
    pub extracted_total: Option<BigDecimal>,
    pub difference: Option<BigDecimal>,
    pub matched: bool,
    pub message: String,
}

/// Per-product-code comparison of quantity and line total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemValidation {
    pub product_code: String,
    pub authoritative_quantity: i64,
    pub authoritative_price: BigDecimal,
    pub extracted_quantity_raw: Option<String>,
    pub extracted_quantity: Option<i64>,
    pub extracted_price_raw: Option<String>,
    pub extracted_price: Option<BigDecimal>,
    pub price_difference: Option<BigDecimal>,
    pub quantity_match: bool,
    pub price_match: bool,
    pub passed: bool,
}

/// Item-level matching result across the whole order.
///
/// `item_count_match` compares raw sequence lengths only. It can be true
/// while the matched content differs, or false while every matched item
/// agrees; approval outcomes depend on this exact semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemValidationSet {
    pub all_items_valid: bool,
    pub item_count_match: bool,
    pub authoritative_item_count: usize,
    pub extracted_item_count: usize,
    pub items: Vec<ItemValidation>,
    pub missing_in_ai: Vec<String>,
    pub missing_in_authoritative: Vec<String>,
}

/// A line total flagged by the stricter report threshold (>= 0.005). An item
/// can pass the 0.01 approval tolerance and still appear here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceMismatch {
    pub product_code: String,
    pub authoritative_price: BigDecimal,
    pub extracted_price_raw: String,
    pub extracted_price: BigDecimal,
    pub difference: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityMismatch {
    pub product_code: String,
    pub authoritative_quantity: i64,
    pub extracted_quantity_raw: String,
    pub extracted_quantity: i64,
}

/// Extraction quality check for the audit record: sequence-length match plus
/// the mismatch lists detected at the stricter flagging threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionCheck {
    pub length_match: bool,
    pub expected_count: usize,
    pub extracted_count: usize,
    pub missing_product_codes: Vec<String>,
    pub quantity_mismatches: Vec<QuantityMismatch>,
    pub price_mismatches: Vec<PriceMismatch>,
    pub is_valid: bool,
}

/// The four mutually exclusive shipping presence cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingCase {
    BothExist,
    AuthoritativeOnly,
    ExtractedOnly,
    Neither,
}

/// One authoritative shipping charge line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingCharge {
    pub product_code: String,
    pub price: BigDecimal,
}

/// Shipping charge located on the extracted side, either supplied out of
/// band by the caller or found by the line-item keyword scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingHint {
    pub source: String,
    pub raw_text: String,
    pub price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingValidation {
    pub case: ShippingCase,
    pub authoritative_charges: Vec<ShippingCharge>,
    pub authoritative_total: Option<BigDecimal>,
    pub extracted: Option<ShippingHint>,
    pub difference: Option<BigDecimal>,
    pub matched: bool,
    pub passed: bool,
    pub message: String,
}

/// Target delivery date proposed for one matched line, formatted in the
/// caller-configured format. A date that failed to parse passes through
/// unmodified with the error recorded instead of aborting the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDateUpdate {
    pub product_code: String,
    pub line_identifier: String,
    pub original_date: String,
    pub target_date: String,
    pub calculation_error: Option<String>,
}

/// Aggregate result of one reconciliation run. Built in a single pass and
/// handed out immutable; serializing it preserves everything needed to
/// audit the decision without re-running the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total_price: TotalPriceCheck,
    pub items: ItemValidationSet,
    pub extraction: ExtractionCheck,
    pub shipping: ShippingValidation,
    pub overall_pass: bool,
    pub decision: Decision,
}

/// Everything one run produces: the report plus the per-line target dates
/// for the ERP update collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    pub report: ValidationReport,
    pub date_updates: Vec<TargetDateUpdate>,
}
