use crate::snapshot::PortfolioSnapshot;
use crate::targets::TargetAllocation;
use api_client::Gateway;
use configuration::PortfolioConfig;
use core_types::TradeIntent;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::sync::Arc;

/// Value deltas below one unit of settlement currency are noise, not drift.
/// Filtering them here prevents churn from tiny deviations.
pub const MIN_ADJUSTMENT: Decimal = dec!(1);

/// Converts required value deltas into integer-contract trade intents,
/// honoring leverage and minimum order granularity.
///
/// Cash is never planned as a trade: its adjustment is the passive residual
/// of every other order.
pub struct TradePlanner {
    gateway: Arc<dyn Gateway>,
    portfolio_config: PortfolioConfig,
    default_leverage: u8,
}

impl TradePlanner {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        portfolio_config: PortfolioConfig,
        default_leverage: u8,
    ) -> Self {
        Self {
            gateway,
            portfolio_config,
            default_leverage,
        }
    }

    /// Plans one intent per non-cash asset whose value delta is worth trading.
    ///
    /// A missing or non-positive price skips that asset with a warning; it
    /// does not abort the plan. Price fetches happen sequentially, one
    /// contract at a time.
    pub async fn plan(
        &self,
        snapshot: &PortfolioSnapshot,
        targets: &TargetAllocation,
    ) -> Vec<TradeIntent> {
        let total_equity = snapshot.total_equity();
        let mut intents = Vec::new();

        for allocation in &self.portfolio_config.allocations {
            let contract = &allocation.contract;
            let target_value = total_equity * targets.weight(contract);
            let value_delta = target_value - snapshot.value(contract);

            if value_delta.abs() < MIN_ADJUSTMENT {
                tracing::debug!(%contract, %value_delta, "Value delta below minimum adjustment; skipping");
                continue;
            }

            let price = match self.gateway.get_price(contract).await {
                Ok(price) if price > Decimal::ZERO => price,
                Ok(price) => {
                    tracing::warn!(%contract, %price, "Invalid market price; skipping asset");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(%contract, error = %e, "Price fetch failed; skipping asset");
                    continue;
                }
            };

            let leverage = self
                .portfolio_config
                .leverage_for(contract, self.default_leverage);

            // Under fixed leverage L, margin = |size| * price / L. Solving for
            // the size that moves margin by value_delta: size = delta * L / price.
            let raw_size = value_delta * Decimal::from(leverage) / price;
            let contracts = finalize_size(raw_size, allocation.min_order_size);

            intents.push(TradeIntent {
                contract: contract.clone(),
                contracts,
                reference_price: price,
                leverage,
            });
        }

        intents
    }
}

/// Rounds a fractional contract count to a tradable integer.
///
/// Two distinct rules, applied in order:
/// 1. an intent that survived the minimum-adjustment filter is never rounded
///    away to nothing: a nonzero raw size that rounds to 0 becomes +/-1;
/// 2. anything below the exchange's minimum order size is bumped up to that
///    minimum, sign preserved.
fn finalize_size(raw_size: Decimal, min_order_size: i64) -> i64 {
    let mut contracts = raw_size
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0);

    if contracts == 0 && !raw_size.is_zero() {
        contracts = if raw_size.is_sign_positive() { 1 } else { -1 };
    }
    if contracts != 0 && contracts.abs() < min_order_size {
        contracts = if contracts > 0 {
            min_order_size
        } else {
            -min_order_size
        };
    }
    contracts
}
