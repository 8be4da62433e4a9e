use comfy_table::Table;
use configuration::PortfolioConfig;
use portfolio::{DeviationReport, PortfolioSnapshot, TargetAllocation};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Renders the before/after portfolio table printed every cycle: one row per
/// tracked contract plus the cash asset, in configuration order.
pub fn render_status(
    snapshot: &PortfolioSnapshot,
    targets: &TargetAllocation,
    deviations: &DeviationReport,
    portfolio_config: &PortfolioConfig,
) -> String {
    let weights = snapshot.weights();
    let mut table = Table::new();
    table.set_header(vec![
        "Asset",
        "Value (USDT)",
        "Current %",
        "Target %",
        "Deviation %",
    ]);

    let mut assets = portfolio_config.contracts();
    assets.push(portfolio_config.cash_asset.clone());

    for asset in assets {
        let current = weights.get(&asset).copied().unwrap_or(Decimal::ZERO);
        table.add_row(vec![
            asset.clone(),
            format!("{:.2}", snapshot.value(&asset)),
            format_pct(current),
            format_pct(targets.weight(&asset)),
            format_pct(deviations.deviation(&asset)),
        ]);
    }

    format!(
        "Portfolio (total equity: {:.2} USDT)\n{table}",
        snapshot.total_equity()
    )
}

fn format_pct(fraction: Decimal) -> String {
    format!("{:.2}", fraction * dec!(100))
}
