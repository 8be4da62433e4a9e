use crate::error::ConfigError;
use rust_decimal_macros::dec;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AllocationConfig, ApiConfig, Config, PortfolioConfig, RebalanceConfig};

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, applies any `REBALANCER__*` environment overrides
/// (e.g. `REBALANCER__API__KEY`), deserializes the result into our
/// strongly-typed `Config` struct, and validates it.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml"))
        // Environment variables win over the file, so secrets can stay out of it.
        .add_source(
            config::Environment::with_prefix("REBALANCER")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;

    validate(&config)?;
    Ok(config)
}

/// Rejects configurations that cannot produce a sane rebalance plan.
///
/// Note: non-cash weights summing above 100% is deliberately NOT rejected
/// here. The target resolver clamps the cash weight to zero and logs the
/// over-allocation instead, so a bad allocation degrades rather than stops
/// the poll loop.
fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.rebalance.leverage < 1 {
        return Err(ConfigError::ValidationError(
            "rebalance.leverage must be at least 1".to_string(),
        ));
    }
    if config.rebalance.threshold_pct < dec!(0) {
        return Err(ConfigError::ValidationError(
            "rebalance.threshold_pct must not be negative".to_string(),
        ));
    }
    for allocation in &config.portfolio.allocations {
        if allocation.target_pct < dec!(0) || allocation.target_pct > dec!(100) {
            return Err(ConfigError::ValidationError(format!(
                "target_pct for {} must be between 0 and 100",
                allocation.contract
            )));
        }
        if allocation.min_order_size < 1 {
            return Err(ConfigError::ValidationError(format!(
                "min_order_size for {} must be at least 1",
                allocation.contract
            )));
        }
        if allocation.leverage == Some(0) {
            return Err(ConfigError::ValidationError(format!(
                "leverage for {} must be at least 1",
                allocation.contract
            )));
        }
        if allocation.contract == config.portfolio.cash_asset {
            return Err(ConfigError::ValidationError(format!(
                "the cash asset {} cannot have a target allocation; its weight is the remainder",
                allocation.contract
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::*;

    fn base_config() -> Config {
        Config {
            api: ApiConfig {
                key: "k".to_string(),
                secret: "s".to_string(),
                testnet: true,
            },
            rebalance: RebalanceConfig {
                threshold_pct: dec!(5),
                min_cash_inflow: dec!(5),
                check_interval_secs: 300,
                leverage: 3,
            },
            portfolio: PortfolioConfig {
                cash_asset: "USDT".to_string(),
                allocations: vec![AllocationConfig {
                    contract: "BTC_USDT".to_string(),
                    target_pct: dec!(25),
                    min_order_size: 1,
                    leverage: None,
                }],
            },
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate(&base_config()).is_ok());
    }

    #[test]
    fn rejects_out_of_range_target() {
        let mut config = base_config();
        config.portfolio.allocations[0].target_pct = dec!(120);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn rejects_cash_asset_allocation() {
        let mut config = base_config();
        config.portfolio.allocations[0].contract = "USDT".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn leverage_override_falls_back_to_default() {
        let config = base_config();
        assert_eq!(config.portfolio.leverage_for("BTC_USDT", 3), 3);
        assert_eq!(config.portfolio.leverage_for("UNKNOWN", 3), 3);
    }
}
