use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Read snapshot of the order as held by the order-management system.
/// The engine never mutates this; it only proposes updates for the ERP
/// collaborator to apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthoritativeOrder {
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub total_price: BigDecimal,
    #[serde(default)]
    pub supplier_name: Option<String>,
    #[serde(default)]
    pub supplier_number: Option<String>,
    #[serde(default)]
    pub items: Vec<AuthoritativeItem>,
}

/// One authoritative line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthoritativeItem {
    pub product_code: String,
    pub quantity: i64,
    /// Line total including tax, the figure extracted item totals are
    /// compared against.
    pub total_price_incl_tax: BigDecimal,
    /// Opaque key the ERP uses to address this line in later updates.
    pub line_identifier: String,
}

impl AuthoritativeOrder {
    /// Merchandise lines only: shipping/handling charge lines carry the
    /// reserved product-code prefix and are matched separately.
    pub fn merchandise_items(&self, shipping_prefix: &str) -> Vec<&AuthoritativeItem> {
        self.items
            .iter()
            .filter(|item| !item.product_code.starts_with(shipping_prefix))
            .collect()
    }

    /// Shipping charge lines, identified by the reserved prefix.
    pub fn shipping_items(&self, shipping_prefix: &str) -> Vec<&AuthoritativeItem> {
        self.items
            .iter()
            .filter(|item| item.product_code.starts_with(shipping_prefix))
            .collect()
    }
}
