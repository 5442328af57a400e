pub mod client;

pub use client::{validate_po, ErpError, OrderSystem, RestOrderSystem};
