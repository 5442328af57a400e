pub mod api;
pub mod config;
pub mod erp;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use erp::{OrderSystem, RestOrderSystem};
pub use service::{EngineConfig, ReconcileError, Reconciler};
