//! # Executor Crate
//!
//! Sequences leverage configuration and order submission for a planned list
//! of trade intents, producing an audit-ready `ExecutionReport`.
//!
//! ## Failure model
//!
//! There is no rollback and no compensating-trade logic. A failed order is
//! recorded and the remaining intents still run; partial execution of a
//! multi-asset plan is an accepted terminal state, corrected by the next poll
//! cycle. The system is eventually consistent across cycles, not
//! transactional within one.

use api_client::Gateway;
use core_types::{ExecutedTrade, TradeIntent};
use rust_decimal::Decimal;
use std::sync::Arc;

pub mod report;

pub use report::ExecutionReport;

/// Executes trade intents one at a time against the gateway.
///
/// Orders are submitted strictly sequentially: the assets share one margin
/// pool, and interleaving partial fills across them is exactly the race this
/// avoids.
pub struct ExecutionEngine {
    gateway: Arc<dyn Gateway>,
}

impl ExecutionEngine {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Runs the whole plan, recording one `ExecutedTrade` per intent. Never
    /// fails as a whole: every per-trade outcome lands in the report.
    pub async fn execute(&self, intents: &[TradeIntent]) -> ExecutionReport {
        let mut report = ExecutionReport::new();
        for intent in intents {
            let outcome = self.execute_intent(intent).await;
            tracing::info!(
                contract = %outcome.contract,
                side = %outcome.side,
                quantity = outcome.quantity,
                status = %outcome.status,
                order_id = ?outcome.order_id,
                error = ?outcome.error,
                "Trade outcome"
            );
            report.push(outcome);
        }
        report
    }

    async fn execute_intent(&self, intent: &TradeIntent) -> ExecutedTrade {
        // The planner never emits zero-size intents; this is a last line of
        // defense before touching the exchange.
        if intent.is_zero() {
            tracing::warn!(contract = %intent.contract, "Skipping zero-size intent");
            return ExecutedTrade::skipped(intent, "zero-size intent after planning".to_string());
        }

        // A failed leverage call does not block the order: we proceed at
        // whatever leverage mode is currently active on the exchange and rely
        // on the next cycle to correct any margin drift.
        if let Err(e) = self
            .gateway
            .set_leverage(&intent.contract, intent.leverage)
            .await
        {
            tracing::warn!(
                contract = %intent.contract,
                leverage = intent.leverage,
                error = %e,
                "Failed to set leverage; submitting order at the currently active leverage"
            );
        }

        match self
            .gateway
            .create_market_order(&intent.contract, intent.contracts, false)
            .await
        {
            Ok(order) => {
                // IOC market orders usually report a fill price; fall back to
                // the planning reference when the exchange omits it.
                let fill_price = if order.fill_price > Decimal::ZERO {
                    order.fill_price
                } else {
                    intent.reference_price
                };
                ExecutedTrade::executed(intent, order.id, order.size, fill_price)
            }
            Err(e) => ExecutedTrade::failed(intent, e.to_string()),
        }
    }
}
