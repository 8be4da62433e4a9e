pub mod enums;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{OrderSide, TradeStatus};
pub use structs::{ExecutedTrade, Position, TradeIntent};
