use rust_decimal::Decimal;
use serde::Deserialize;

// Gate.io encodes most numeric fields as strings; `rust_decimal`'s serde
// implementation accepts both strings and numbers, so the records below
// deserialize either form.

/// The futures account for the settlement currency, from
/// `GET /futures/usdt/accounts`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    /// Total account equity in settlement currency.
    pub total: Decimal,
    /// Equity not currently committed as position margin.
    pub available: Decimal,
}

/// A single open position from `GET /futures/usdt/positions`.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionResponse {
    pub contract: String,
    /// Signed contract count. Positive for long, negative for short.
    pub size: Decimal,
    pub mark_price: Decimal,
    /// Comes as a string, e.g. "3". "0" means cross-margin mode.
    pub leverage: String,
}

impl PositionResponse {
    /// The position's leverage as an integer, if it parses to something
    /// usable. Gate reports "0" for cross-margin positions, which callers
    /// should treat as "use the configured leverage".
    pub fn leverage_value(&self) -> Option<u8> {
        self.leverage.parse::<u8>().ok().filter(|l| *l >= 1)
    }
}

/// A single ticker from `GET /futures/usdt/tickers?contract=...`.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerResponse {
    pub contract: String,
    /// Last traded price.
    pub last: Decimal,
}

/// The response from a successful `POST /futures/usdt/orders` request.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    pub id: i64,
    /// The signed size the order was accepted with.
    pub size: i64,
    /// Average fill price. Zero until the order has filled.
    #[serde(default)]
    pub fill_price: Decimal,
    /// Gate order status, e.g. "finished" for a filled IOC market order.
    #[serde(default)]
    pub status: String,
}

/// Represents an error response from the Gate.io API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub label: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn position_deserializes_string_numerics() {
        let json = r#"{"contract":"BTC_USDT","size":-3,"mark_price":"30123.5","leverage":"3"}"#;
        let position: PositionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(position.size, dec!(-3));
        assert_eq!(position.mark_price, dec!(30123.5));
        assert_eq!(position.leverage_value(), Some(3));
    }

    #[test]
    fn cross_margin_leverage_is_none() {
        let json = r#"{"contract":"BTC_USDT","size":1,"mark_price":"100","leverage":"0"}"#;
        let position: PositionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(position.leverage_value(), None);
    }
}
