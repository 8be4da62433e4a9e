use chrono::{DateTime, Utc};
use core_types::{ExecutedTrade, TradeStatus};
use serde::Serialize;

/// The audit-ready record of one execution pass: every intent's outcome, in
/// submission order. Immutable once the pass completes.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    pub started_at: DateTime<Utc>,
    trades: Vec<ExecutedTrade>,
}

impl ExecutionReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            trades: Vec::new(),
        }
    }

    pub fn push(&mut self, trade: ExecutedTrade) {
        self.trades.push(trade);
    }

    pub fn trades(&self) -> &[ExecutedTrade] {
        &self.trades
    }

    pub fn executed_count(&self) -> usize {
        self.count(TradeStatus::Executed)
    }

    pub fn failed_count(&self) -> usize {
        self.count(TradeStatus::Failed)
    }

    /// True iff at least one order actually went through. This is the value
    /// the rebalance entry points report to the poll loop.
    pub fn any_executed(&self) -> bool {
        self.executed_count() > 0
    }

    fn count(&self, status: TradeStatus) -> usize {
        self.trades.iter().filter(|t| t.status == status).count()
    }
}

impl Default for ExecutionReport {
    fn default() -> Self {
        Self::new()
    }
}
