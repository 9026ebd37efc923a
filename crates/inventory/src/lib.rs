//! Inventory read models.
//!
//! This crate contains the inventory-owned data the replenishment core
//! consumes: recorded stock movements and current stock levels. It is
//! deliberately read-only from the perspective of the rest of the system
//! (no IO, no HTTP, no storage).

pub mod stock;

pub use stock::{StockLevel, StockTransaction, TransactionKind};
