use rust_decimal::Decimal;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub rebalance: RebalanceConfig,
    pub portfolio: PortfolioConfig,
}

/// Credentials and host selection for the exchange REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub key: String,
    pub secret: String,
    /// When true, all requests go to the futures testnet host.
    #[serde(default = "default_testnet")]
    pub testnet: bool,
}

impl ApiConfig {
    /// Whether both credentials are present. The poll loop refuses to start
    /// without them.
    pub fn is_configured(&self) -> bool {
        !self.key.is_empty() && !self.secret.is_empty()
    }
}

/// Parameters governing when and how a rebalance cycle fires.
#[derive(Debug, Clone, Deserialize)]
pub struct RebalanceConfig {
    /// Deviation threshold as a percentage (e.g. 5.0 for 5%). Any asset whose
    /// current weight drifts further than this from its target triggers a
    /// threshold rebalance.
    pub threshold_pct: Decimal,

    /// Minimum idle cash (settlement currency) that triggers a cash-flow
    /// rebalance, independent of deviation.
    pub min_cash_inflow: Decimal,

    /// Seconds between poll-loop iterations.
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    /// Fixed leverage applied to every contract unless overridden per asset.
    #[serde(default = "default_leverage")]
    pub leverage: u8,
}

/// The target allocation and per-contract trading constraints.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioConfig {
    /// The settlement currency all weights are denominated in. Never traded.
    #[serde(default = "default_cash_asset")]
    pub cash_asset: String,

    /// One entry per tradable contract. The cash asset's target weight is the
    /// remainder and is never listed here.
    pub allocations: Vec<AllocationConfig>,
}

/// Target weight and order granularity for a single perpetual contract.
#[derive(Debug, Clone, Deserialize)]
pub struct AllocationConfig {
    /// Contract name, e.g. "BTC_USDT".
    pub contract: String,

    /// Target portfolio weight as a percentage (0-100).
    pub target_pct: Decimal,

    /// Smallest order the exchange accepts for this contract, in contracts.
    #[serde(default = "default_min_order_size")]
    pub min_order_size: i64,

    /// Per-contract leverage override; falls back to `rebalance.leverage`.
    pub leverage: Option<u8>,
}

impl PortfolioConfig {
    /// The leverage to use for `contract`, honoring any per-asset override.
    pub fn leverage_for(&self, contract: &str, default: u8) -> u8 {
        self.allocations
            .iter()
            .find(|a| a.contract == contract)
            .and_then(|a| a.leverage)
            .unwrap_or(default)
    }

    pub fn contracts(&self) -> Vec<String> {
        self.allocations.iter().map(|a| a.contract.clone()).collect()
    }
}

fn default_testnet() -> bool {
    true
}

fn default_check_interval() -> u64 {
    300
}

fn default_leverage() -> u8 {
    1
}

fn default_cash_asset() -> String {
    "USDT".to_string()
}

fn default_min_order_size() -> i64 {
    1
}
