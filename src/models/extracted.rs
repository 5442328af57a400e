use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Order description produced by the document-understanding step.
/// All fields are raw strings exactly as they appeared on the scanned page;
/// nothing here is normalized. Immutable once deserialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedOrder {
    #[serde(default)]
    pub order_info: OrderInfo,
    #[serde(default)]
    pub items: Vec<ExtractedItem>,
}

/// Order-level free-text fields. Known fields are named; anything else the
/// extractor emitted lands in `extra`, insertion order preserved so that
/// keyword scans stay first-match-wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderInfo {
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub customer_number: Option<String>,
    #[serde(default)]
    pub customer_po: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub total_price: Option<String>,
    #[serde(default)]
    pub shipping_cost: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

/// One extracted line item. Quantity and the price fields keep whatever the
/// document said ("1 EA", "USD 383.04"); delivery_date is DD.MM.YYYY.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedItem {
    #[serde(default)]
    pub item_number: String,
    #[serde(default)]
    pub product_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit_price: String,
    #[serde(default)]
    pub extended_price: String,
    #[serde(default)]
    pub discount: String,
    #[serde(default)]
    pub item_total: String,
    #[serde(default)]
    pub delivery_date: String,
}
