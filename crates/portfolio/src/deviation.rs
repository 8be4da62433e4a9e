use crate::snapshot::PortfolioSnapshot;
use crate::targets::TargetAllocation;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Per-asset `current_weight - target_weight`, each in [-1, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct DeviationReport {
    deviations: HashMap<String, Decimal>,
}

impl DeviationReport {
    pub fn deviation(&self, asset: &str) -> Decimal {
        self.deviations.get(asset).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn deviations(&self) -> &HashMap<String, Decimal> {
        &self.deviations
    }
}

/// Compares current weights against targets and decides whether a threshold
/// rebalance is warranted.
///
/// `threshold` is a fraction (0.05 for 5%): the trigger fires iff some asset's
/// absolute deviation exceeds it. An empty account (zero equity) reports all
/// weights as zero and never triggers, which avoids both division by zero and
/// spurious trading.
pub fn analyze(
    snapshot: &PortfolioSnapshot,
    targets: &TargetAllocation,
    threshold: Decimal,
) -> (bool, DeviationReport) {
    let weights = snapshot.weights();

    let deviations: HashMap<String, Decimal> = targets
        .weights()
        .iter()
        .map(|(asset, target_weight)| {
            let current = weights.get(asset).copied().unwrap_or(Decimal::ZERO);
            (asset.clone(), current - target_weight)
        })
        .collect();

    let needs_rebalance = !snapshot.total_equity().is_zero()
        && deviations.values().any(|dev| dev.abs() > threshold);

    (needs_rebalance, DeviationReport { deviations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotBuilder;
    use crate::targets::resolve_targets;
    use crate::test_support::MockGateway;
    use configuration::{AllocationConfig, PortfolioConfig};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn targets_30_10() -> TargetAllocation {
        resolve_targets(&PortfolioConfig {
            cash_asset: "USDT".to_string(),
            allocations: vec![
                AllocationConfig {
                    contract: "BTC_USDT".to_string(),
                    target_pct: dec!(30),
                    min_order_size: 1,
                    leverage: None,
                },
                AllocationConfig {
                    contract: "ETH_USDT".to_string(),
                    target_pct: dec!(10),
                    min_order_size: 1,
                    leverage: None,
                },
            ],
        })
    }

    async fn snapshot(gateway: MockGateway) -> PortfolioSnapshot {
        SnapshotBuilder::new(Arc::new(gateway), &MockGateway::portfolio_config(), 3)
            .build()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn drifted_portfolio_triggers_above_threshold() {
        // {BTC: 20, ETH: 10, cash: 70} vs targets {0.3, 0.1, 0.6}.
        let gateway = MockGateway::new(dec!(100))
            .with_position("BTC_USDT", dec!(2), dec!(30), "3")
            .with_position("ETH_USDT", dec!(5), dec!(6), "3");
        let snapshot = snapshot(gateway).await;

        let (needs_rebalance, report) = analyze(&snapshot, &targets_30_10(), dec!(0.05));
        assert!(needs_rebalance);
        assert_eq!(report.deviation("BTC_USDT"), dec!(-0.1));
        assert_eq!(report.deviation("ETH_USDT"), dec!(0));
        assert_eq!(report.deviation("USDT"), dec!(0.1));
    }

    #[tokio::test]
    async fn small_drift_stays_quiet() {
        let gateway = MockGateway::new(dec!(100))
            .with_position("BTC_USDT", dec!(2), dec!(30), "3")
            .with_position("ETH_USDT", dec!(5), dec!(6), "3");
        let snapshot = snapshot(gateway).await;

        // The largest deviation is 10%, below a 15% threshold.
        let (needs_rebalance, _) = analyze(&snapshot, &targets_30_10(), dec!(0.15));
        assert!(!needs_rebalance);
    }

    #[tokio::test]
    async fn zero_equity_never_triggers() {
        let snapshot = snapshot(MockGateway::new(dec!(0))).await;
        let (needs_rebalance, report) = analyze(&snapshot, &targets_30_10(), dec!(0.0));
        // Deviations read as fully under-allocated, but an empty account must
        // never trade regardless of the configured threshold.
        assert!(!needs_rebalance);
        assert_eq!(report.deviation("BTC_USDT"), dec!(-0.3));
    }
}
