pub mod decision;
pub mod delivery_date;
pub mod item_match;
pub mod normalize;
pub mod reconciler;
pub mod shipping;

pub use delivery_date::{calculate_target_date, AddressOverride};
pub use normalize::{normalize_amount, normalize_quantity, NormalizedAmount, SeparatorConvention};
pub use reconciler::{EngineConfig, ReconcileError, Reconciler};
