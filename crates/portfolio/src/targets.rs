use configuration::PortfolioConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Tolerance for the over-allocation check. Anything past this is a
/// configuration error worth shouting about.
const OVER_ALLOCATION_EPSILON: Decimal = dec!(0.000001);

/// The normalized target-weight map. Weights are fractions in [0, 1] and sum
/// to exactly 1; the cash asset always carries the remainder.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetAllocation {
    weights: HashMap<String, Decimal>,
    cash_asset: String,
}

impl TargetAllocation {
    /// The target weight for `asset`, zero for anything untracked.
    pub fn weight(&self, asset: &str) -> Decimal {
        self.weights.get(asset).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn weights(&self) -> &HashMap<String, Decimal> {
        &self.weights
    }

    pub fn cash_asset(&self) -> &str {
        &self.cash_asset
    }
}

/// Converts configured percentages (0-100 per non-cash asset) into a
/// normalized `TargetAllocation`.
///
/// If the non-cash weights sum past 100%, the cash weight is clamped to zero
/// and the over-allocation is logged. This is a configuration error, not a
/// runtime one: the engine keeps running on the clamped targets rather than
/// crashing the poll loop.
pub fn resolve_targets(portfolio_config: &PortfolioConfig) -> TargetAllocation {
    let mut weights = HashMap::new();
    let mut non_cash_sum = Decimal::ZERO;

    for allocation in &portfolio_config.allocations {
        let fraction = allocation.target_pct / dec!(100);
        non_cash_sum += fraction;
        weights.insert(allocation.contract.clone(), fraction);
    }

    if non_cash_sum > dec!(1) + OVER_ALLOCATION_EPSILON {
        tracing::warn!(
            allocated_pct = %(non_cash_sum * dec!(100)),
            "Non-cash target weights exceed 100%; clamping cash weight to zero"
        );
    }

    let cash_weight = (dec!(1) - non_cash_sum).max(Decimal::ZERO);
    weights.insert(portfolio_config.cash_asset.clone(), cash_weight);

    TargetAllocation {
        weights,
        cash_asset: portfolio_config.cash_asset.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::AllocationConfig;

    fn config(allocations: Vec<(&str, Decimal)>) -> PortfolioConfig {
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

    #[test]
    fn cash_receives_the_remainder() {
        let targets = resolve_targets(&config(vec![
            ("BTC_USDT", dec!(25)),
            ("ETH_USDT", dec!(15)),
            ("LTC_USDT", dec!(10)),
        ]));
        assert_eq!(targets.weight("BTC_USDT"), dec!(0.25));
        assert_eq!(targets.weight("ETH_USDT"), dec!(0.15));
        assert_eq!(targets.weight("LTC_USDT"), dec!(0.10));
        assert_eq!(targets.weight("USDT"), dec!(0.50));
    }

    #[test]
    fn weights_always_sum_to_one() {
        let targets = resolve_targets(&config(vec![
            ("BTC_USDT", dec!(33.3)),
            ("ETH_USDT", dec!(41.2)),
        ]));
        let sum: Decimal = targets.weights().values().copied().sum();
        assert_eq!(sum, dec!(1));
    }

    #[test]
    fn over_allocation_clamps_cash_to_zero() {
        let targets = resolve_targets(&config(vec![
            ("BTC_USDT", dec!(80)),
            ("ETH_USDT", dec!(40)),
        ]));
        assert_eq!(targets.weight("USDT"), dec!(0));
        // Non-cash weights are kept as configured, not rescaled.
        assert_eq!(targets.weight("BTC_USDT"), dec!(0.80));
    }

    #[test]
    fn untracked_assets_have_zero_weight() {
        let targets = resolve_targets(&config(vec![("BTC_USDT", dec!(25))]));
        assert_eq!(targets.weight("DOGE_USDT"), dec!(0));
    }
}
