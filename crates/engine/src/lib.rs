//! # Engine Crate
//!
//! The `Rebalancer` wires the snapshot builder, target resolver, deviation
//! analyzer, trade planner, and execution engine into the two rebalance entry
//! points the poll loop drives:
//!
//! - `threshold_rebalance` fires when any asset's weight drifts further from
//!   its target than the configured threshold;
//! - `cash_flow_rebalance` fires when idle cash exceeds the configured
//!   inflow minimum, independent of deviation ("a deposit arrived, deploy it").
//!
//! One loop iteration checks both triggers in that order. Every cycle
//! re-reads fresh exchange state; a cycle that cannot read state is aborted
//! and retried on the next poll rather than retried inline.

use api_client::Gateway;
use configuration::Config;
use executor::ExecutionEngine;
use portfolio::{analyze, resolve_targets, PortfolioSnapshot, SnapshotBuilder, TargetAllocation, TradePlanner};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

pub mod display;
pub mod error;

pub use error::EngineError;

/// The central orchestrator for the rebalancing service.
///
/// Configuration is taken by value at construction and never mutated: every
/// component reads the same immutable view for the lifetime of the process.
pub struct Rebalancer {
    config: Config,
    snapshot_builder: SnapshotBuilder,
    planner: TradePlanner,
    execution: ExecutionEngine,
}

impl Rebalancer {
    pub fn new(config: Config, gateway: Arc<dyn Gateway>) -> Self {
        let snapshot_builder = SnapshotBuilder::new(
            Arc::clone(&gateway),
            &config.portfolio,
            config.rebalance.leverage,
        );
        let planner = TradePlanner::new(
            Arc::clone(&gateway),
            config.portfolio.clone(),
            config.rebalance.leverage,
        );
        let execution = ExecutionEngine::new(gateway);

        Self {
            config,
            snapshot_builder,
            planner,
            execution,
        }
    }

    /// Rebalances when the portfolio has drifted past the deviation
    /// threshold. Returns true iff at least one trade executed.
    pub async fn threshold_rebalance(&self) -> Result<bool, EngineError> {
        let snapshot = self.snapshot_builder.build().await?;
        let targets = resolve_targets(&self.config.portfolio);
        let threshold = self.config.rebalance.threshold_pct / dec!(100);

        let (needs_rebalance, deviations) = analyze(&snapshot, &targets, threshold);
        if !needs_rebalance {
            tracing::debug!("No deviation exceeds the threshold; nothing to do");
            return Ok(false);
        }

        tracing::info!(
            threshold_pct = %self.config.rebalance.threshold_pct,
            deviations = ?deviations.deviations(),
            "Deviation threshold exceeded; rebalancing toward targets"
        );
        self.rebalance(&snapshot, &targets).await
    }

    /// Rebalances when idle cash exceeds the configured inflow minimum,
    /// regardless of deviation magnitude. Returns true iff at least one trade
    /// executed.
    pub async fn cash_flow_rebalance(&self) -> Result<bool, EngineError> {
        let snapshot = self.snapshot_builder.build().await?;
        let cash = snapshot.cash_value();
        if cash < self.config.rebalance.min_cash_inflow {
            tracing::debug!(%cash, "Idle cash below inflow minimum; nothing to deploy");
            return Ok(false);
        }

        tracing::info!(
            %cash,
            min_inflow = %self.config.rebalance.min_cash_inflow,
            "Idle cash above inflow minimum; deploying toward targets"
        );
        let targets = resolve_targets(&self.config.portfolio);
        self.rebalance(&snapshot, &targets).await
    }

    /// Plans and executes trades toward `targets` from the given snapshot.
    async fn rebalance(
        &self,
        snapshot: &PortfolioSnapshot,
        targets: &TargetAllocation,
    ) -> Result<bool, EngineError> {
        let intents = self.planner.plan(snapshot, targets).await;
        if intents.is_empty() {
            tracing::info!("No tradable adjustments after planning");
            return Ok(false);
        }

        let report = self.execution.execute(&intents).await;
        tracing::info!(
            executed = report.executed_count(),
            failed = report.failed_count(),
            "Rebalance pass complete"
        );
        Ok(report.any_executed())
    }

    /// Prints the current portfolio table (asset, value, current vs target
    /// weight, deviation).
    pub async fn print_status(&self) -> Result<(), EngineError> {
        let snapshot = self.snapshot_builder.build().await?;
        let targets = resolve_targets(&self.config.portfolio);
        let (_, deviations) = analyze(
            &snapshot,
            &targets,
            self.config.rebalance.threshold_pct / dec!(100),
        );
        println!(
            "{}",
            display::render_status(&snapshot, &targets, &deviations, &self.config.portfolio)
        );
        Ok(())
    }

    /// The polling control loop: one cycle per fixed interval, no overlap.
    /// A cycle that cannot read account data is logged and retried on the
    /// next tick; there is no inline retry or backoff.
    pub async fn run(&self) -> Result<(), EngineError> {
        let period = Duration::from_secs(self.config.rebalance.check_interval_secs);
        let mut interval = tokio::time::interval(period);
        tracing::info!(interval_secs = period.as_secs(), "Rebalancer started");

        loop {
            interval.tick().await;
            if let Err(e) = self.run_cycle().await {
                tracing::error!(error = %e, "Cycle aborted; retrying on the next poll");
            }
        }
    }

    async fn run_cycle(&self) -> Result<(), EngineError> {
        self.print_status().await?;

        tracing::info!("Checking for threshold-based rebalancing...");
        let threshold_traded = self.threshold_rebalance().await?;

        tracing::info!("Checking for cash-flow-based rebalancing...");
        let cash_flow_traded = self.cash_flow_rebalance().await?;

        if threshold_traded || cash_flow_traded {
            // Show the post-trade allocation so every cycle logs a full
            // before/after view.
            self.print_status().await?;
        } else {
            tracing::info!("No rebalancing needed this cycle");
        }
        Ok(())
    }
}
