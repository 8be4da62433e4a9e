//! # Portfolio Crate
//!
//! This crate turns raw account and position data into the decision inputs of
//! the rebalancing engine, and those inputs into sized trade intents:
//!
//! - `SnapshotBuilder` normalizes account equity and open positions into a
//!   per-asset margin-value view (`PortfolioSnapshot`).
//! - `resolve_targets` converts configured percentage allocations into a
//!   normalized `TargetAllocation` whose weights sum to 1, with the cash
//!   asset carrying the remainder.
//! - `analyze` compares the two and decides whether a threshold rebalance is
//!   warranted.
//! - `TradePlanner` converts value deltas into integer-contract
//!   `TradeIntent`s, honoring leverage and minimum order granularity.
//!
//! Everything here is a value object recomputed every cycle; nothing is
//! cached across polls.

pub mod deviation;
pub mod error;
pub mod planner;
pub mod snapshot;
pub mod targets;

#[cfg(test)]
mod test_support;

// Re-export the key components to provide a clean, public-facing API.
pub use deviation::{analyze, DeviationReport};
pub use error::PortfolioError;
pub use planner::{TradePlanner, MIN_ADJUSTMENT};
pub use snapshot::{PortfolioSnapshot, SnapshotBuilder};
pub use targets::{resolve_targets, TargetAllocation};
