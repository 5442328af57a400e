pub mod handlers;

pub use handlers::{health_check, reconcile_order, AppState};
