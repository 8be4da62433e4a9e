use crate::error::PortfolioError;
use api_client::Gateway;
use configuration::PortfolioConfig;
use core_types::Position;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// A normalized per-asset view of the account in settlement currency.
///
/// Each tracked contract maps to the margin value of its open position (zero
/// if flat); the cash asset maps to whatever equity is not committed as
/// margin, floored at zero. Snapshots are value objects rebuilt from fresh
/// exchange state every cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSnapshot {
    values: HashMap<String, Decimal>,
    cash_asset: String,
    total_equity: Decimal,
}

impl PortfolioSnapshot {
    /// The margin value held in `asset`, zero for anything untracked.
    pub fn value(&self, asset: &str) -> Decimal {
        self.values.get(asset).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn cash_value(&self) -> Decimal {
        self.value(&self.cash_asset)
    }

    pub fn cash_asset(&self) -> &str {
        &self.cash_asset
    }

    /// Sum of all per-asset values (cash plus every margin value).
    pub fn total_equity(&self) -> Decimal {
        self.total_equity
    }

    /// Current portfolio weights. All zero when the account is empty, which
    /// keeps an empty account from ever triggering a rebalance.
    pub fn weights(&self) -> HashMap<String, Decimal> {
        self.values
            .iter()
            .map(|(asset, value)| {
                let weight = if self.total_equity.is_zero() {
                    Decimal::ZERO
                } else {
                    value / self.total_equity
                };
                (asset.clone(), weight)
            })
            .collect()
    }
}

/// Builds `PortfolioSnapshot`s from raw gateway data.
///
/// Data-unavailable failures (equity or position fetch) propagate; a single
/// position with a bad price is skipped with a warning instead, so one bad
/// ticker cannot abort the whole cycle.
pub struct SnapshotBuilder {
    gateway: Arc<dyn Gateway>,
    cash_asset: String,
    contracts: Vec<String>,
    default_leverage: u8,
}

impl SnapshotBuilder {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        portfolio_config: &PortfolioConfig,
        default_leverage: u8,
    ) -> Self {
        Self {
            gateway,
            cash_asset: portfolio_config.cash_asset.clone(),
            contracts: portfolio_config.contracts(),
            default_leverage,
        }
    }

    pub async fn build(&self) -> Result<PortfolioSnapshot, PortfolioError> {
        let total_reported = self.gateway.get_account_equity().await?;
        let raw_positions = self.gateway.get_positions().await?;

        // Every tracked contract is present in the snapshot, flat ones at zero.
        let mut values: HashMap<String, Decimal> = self
            .contracts
            .iter()
            .map(|c| (c.clone(), Decimal::ZERO))
            .collect();

        let mut used_margin = Decimal::ZERO;
        for raw in raw_positions {
            if !values.contains_key(&raw.contract) {
                tracing::debug!(contract = %raw.contract, "Ignoring position in untracked contract");
                continue;
            }
            if raw.size.is_zero() {
                continue;
            }
            if raw.mark_price <= Decimal::ZERO {
                tracing::warn!(
                    contract = %raw.contract,
                    mark_price = %raw.mark_price,
                    "Skipping position with non-positive mark price"
                );
                continue;
            }

            let position = Position {
                contract: raw.contract.clone(),
                size: raw.size,
                mark_price: raw.mark_price,
                leverage: raw.leverage_value().unwrap_or(self.default_leverage),
            };
            let margin = position.margin_value();
            values.insert(position.contract, margin);
            used_margin += margin;
        }

        // Cash is the residual equity, floored at zero so that an account
        // whose margin exceeds reported equity still produces a usable view.
        let cash = (total_reported - used_margin).max(Decimal::ZERO);
        values.insert(self.cash_asset.clone(), cash);

        let total_equity = values.values().copied().sum();
        Ok(PortfolioSnapshot {
            values,
            cash_asset: self.cash_asset.clone(),
            total_equity,
        })
    }
}
