pub mod authoritative;
pub mod extracted;
pub mod report;

pub use authoritative::{AuthoritativeItem, AuthoritativeOrder};
pub use extracted::{ExtractedItem, ExtractedOrder, OrderInfo};
pub use report::{
    Decision, ExtractionCheck, ItemValidation, ItemValidationSet, OrderStatus, PriceMismatch,
    QuantityMismatch, ReconcileOutcome, ShippingCase, ShippingCharge, ShippingHint,
    ShippingValidation, TargetDateUpdate, TotalPriceCheck, ValidationReport,
};
