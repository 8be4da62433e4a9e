use api_client::error::ApiError;
use api_client::{Gateway, OrderResponse, PositionResponse};
use async_trait::async_trait;
use configuration::{AllocationConfig, PortfolioConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// A scriptable in-memory gateway for unit tests.
pub struct MockGateway {
    equity: Decimal,
    positions: Vec<PositionResponse>,
    prices: HashMap<String, Decimal>,
    fail_account: bool,
}

impl MockGateway {
    pub fn new(equity: Decimal) -> Self {
        Self {
            equity,
            positions: Vec::new(),
            prices: HashMap::new(),
            fail_account: false,
        }
    }

    pub fn with_position(mut self, contract: &str, size: Decimal, mark_price: Decimal, leverage: &str) -> Self {
        self.positions.push(PositionResponse {
            contract: contract.to_string(),
            size,
            mark_price,
            leverage: leverage.to_string(),
        });
        self
    }

    pub fn with_price(mut self, contract: &str, price: Decimal) -> Self {
        self.prices.insert(contract.to_string(), price);
        self
    }

    pub fn with_account_failure(mut self) -> Self {
        self.fail_account = true;
        self
    }

    /// The tracked contracts most tests share: BTC at 30%, ETH at 10%.
    pub fn portfolio_config() -> PortfolioConfig {
        Self::portfolio_config_with(vec![("BTC_USDT", dec!(30)), ("ETH_USDT", dec!(10))])
    }

    pub fn portfolio_config_with(allocations: Vec<(&str, Decimal)>) -> PortfolioConfig {
        PortfolioConfig {
            cash_asset: "USDT".to_string(),
            allocations: allocations
                .into_iter()
                .map(|(contract, target_pct)| AllocationConfig {
                    contract: contract.to_string(),
                    target_pct,
                    min_order_size: 1,
                    leverage: None,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn get_account_equity(&self) -> Result<Decimal, ApiError> {
        if self.fail_account {
            return Err(ApiError::Exchange {
                label: "SERVER_ERROR".to_string(),
                message: "account endpoint down".to_string(),
            });
        }
        Ok(self.equity)
    }

    async fn get_positions(&self) -> Result<Vec<PositionResponse>, ApiError> {
        Ok(self.positions.clone())
    }

    async fn get_price(&self, contract: &str) -> Result<Decimal, ApiError> {
        // Mirrors the live client: unknown contracts yield the zero sentinel.
        Ok(self.prices.get(contract).copied().unwrap_or(Decimal::ZERO))
    }

    async fn set_leverage(&self, _contract: &str, _leverage: u8) -> Result<(), ApiError> {
        Ok(())
    }

    async fn create_market_order(
        &self,
        _contract: &str,
        size: i64,
        _reduce_only: bool,
    ) -> Result<OrderResponse, ApiError> {
        Ok(OrderResponse {
            id: 1,
            size,
            fill_price: Decimal::ZERO,
            status: "finished".to_string(),
        })
    }
}
