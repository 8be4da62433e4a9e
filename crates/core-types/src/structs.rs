use crate::enums::{OrderSide, TradeStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single open perpetual-futures position, normalized at the gateway boundary.
///
/// `size` is a signed contract count: positive for long, negative for short.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub contract: String,
    pub size: Decimal,
    pub mark_price: Decimal,
    pub leverage: u8,
}

impl Position {
    /// The capital committed to this position in settlement currency.
    ///
    /// Under fixed leverage L, margin = |size| * mark_price / L. This is the
    /// central identity the planner inverts when sizing trades.
    pub fn margin_value(&self) -> Decimal {
        self.size.abs() * self.mark_price / Decimal::from(self.leverage)
    }
}

/// A planned, not-yet-executed order: a signed integer contract count with the
/// reference price and leverage it was sized against.
///
/// Intents are created fresh each rebalance cycle and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeIntent {
    pub contract: String,
    pub contracts: i64,
    pub reference_price: Decimal,
    pub leverage: u8,
}

impl TradeIntent {
    pub fn side(&self) -> OrderSide {
        if self.contracts > 0 {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }

    pub fn is_zero(&self) -> bool {
        self.contracts == 0
    }
}

/// The immutable record of one intent's outcome, appended to the execution
/// report and handed to the logger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutedTrade {
    pub contract: String,
    pub side: OrderSide,
    pub quantity: i64,
    pub fill_price: Decimal,
    pub status: TradeStatus,
    pub order_id: Option<i64>,
    pub error: Option<String>,
}

impl ExecutedTrade {
    /// `filled_size` is the signed size the exchange reports for the order,
    /// which may be smaller than the intent if an IOC order partially fills.
    pub fn executed(
        intent: &TradeIntent,
        order_id: i64,
        filled_size: i64,
        fill_price: Decimal,
    ) -> Self {
        Self {
            contract: intent.contract.clone(),
            side: intent.side(),
            quantity: filled_size.abs(),
            fill_price,
            status: TradeStatus::Executed,
            order_id: Some(order_id),
            error: None,
        }
    }

    pub fn failed(intent: &TradeIntent, error: String) -> Self {
        Self {
            contract: intent.contract.clone(),
            side: intent.side(),
            quantity: intent.contracts.abs(),
            fill_price: intent.reference_price,
            status: TradeStatus::Failed,
            order_id: None,
            error: Some(error),
        }
    }

    pub fn skipped(intent: &TradeIntent, reason: String) -> Self {
        Self {
            contract: intent.contract.clone(),
            side: intent.side(),
            quantity: intent.contracts.abs(),
            fill_price: intent.reference_price,
            status: TradeStatus::Skipped,
            order_id: None,
            error: Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn margin_value_divides_notional_by_leverage() {
        let position = Position {
            contract: "BTC_USDT".to_string(),
            size: dec!(-2),
            mark_price: dec!(30000),
            leverage: 3,
        };
        // |{-2}| * 30000 / 3 = 20000, sign of the position is irrelevant.
        assert_eq!(position.margin_value(), dec!(20000));
    }

    #[test]
    fn intent_side_follows_sign() {
        let mut intent = TradeIntent {
            contract: "ETH_USDT".to_string(),
            contracts: 4,
            reference_price: dec!(2000),
            leverage: 3,
        };
        assert_eq!(intent.side(), OrderSide::Buy);
        intent.contracts = -4;
        assert_eq!(intent.side(), OrderSide::Sell);
    }
}
