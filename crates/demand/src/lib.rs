//! Demand aggregation.
//!
//! Turns raw outbound stock movements into the per-product daily demand
//! series the forecasting pipeline consumes. Pure domain logic, no IO.

pub mod aggregate;

pub use aggregate::{aggregate_daily_demand, DemandPoint};
