//! Spreadsheet-friendly CSV output and a plain-text portfolio summary.
//!
//! CSV output carries raw, un-rounded values; only the text report formats
//! currency and percentages.

use crate::deal::DealMetrics;
use crate::error::Result;
use crate::schema::{Deal, FinancialPeriod, RecordKind, Unit};
use crate::utils::{format_currency, format_percent};
use crate::DashboardView;
use serde::Serialize;
use std::io::Write;

fn headerless_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().has_headers(false).from_writer(writer)
}

/// Writes the canonical header row for `kind`, the import template users fill in.
pub fn write_template_csv<W: Write>(kind: RecordKind, writer: W) -> Result<()> {
    let mut csv_writer = headerless_writer(writer);
    csv_writer.write_record(kind.columns())?;
    csv_writer.flush()?;
    Ok(())
}

fn write_records<W: Write, T: Serialize>(kind: RecordKind, records: &[T], writer: W) -> Result<()> {
    let mut csv_writer = headerless_writer(writer);
    csv_writer.write_record(kind.columns())?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_deals_csv<W: Write>(deals: &[Deal], writer: W) -> Result<()> {
    write_records(RecordKind::Deals, deals, writer)
}

pub fn write_units_csv<W: Write>(units: &[Unit], writer: W) -> Result<()> {
    write_records(RecordKind::Units, units, writer)
}

pub fn write_financials_csv<W: Write>(financials: &[FinancialPeriod], writer: W) -> Result<()> {
    write_records(RecordKind::Financials, financials, writer)
}

#[derive(Serialize)]
struct DealMetricsRow<'a> {
    id: &'a str,
    name: &'a str,
    status: &'a str,
    market_value: f64,
    debt_amount: f64,
    total_cost: f64,
    equity: f64,
    ltv: f64,
    cap_rate: f64,
    occupancy_rate: f64,
}

pub const DEAL_METRICS_COLUMNS: [&str; 10] = [
    "id",
    "name",
    "status",
    "market_value",
    "debt_amount",
    "total_cost",
    "equity",
    "ltv",
    "cap_rate",
    "occupancy_rate",
];

pub fn write_deal_metrics_csv<W: Write>(rows: &[(Deal, DealMetrics)], writer: W) -> Result<()> {
    let mut csv_writer = headerless_writer(writer);
    csv_writer.write_record(DEAL_METRICS_COLUMNS)?;

    for (deal, metrics) in rows {
        csv_writer.serialize(DealMetricsRow {
            id: &deal.id,
            name: &deal.name,
            status: &deal.status,
            market_value: deal.market_value,
            debt_amount: deal.debt_amount,
            total_cost: metrics.total_cost,
            equity: metrics.equity,
            ltv: metrics.ltv,
            cap_rate: metrics.cap_rate,
            occupancy_rate: metrics.occupancy_rate,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn render_summary_report(view: &DashboardView) -> String {
    let kpis = &view.metrics.kpis;
    let mut lines = vec![
        "Portfolio Summary".to_string(),
        "=================".to_string(),
        format!("Deals:          {}", kpis.total_deals),
        format!("Units:          {}", kpis.total_units),
        format!("Total Value:    {}", format_currency(kpis.total_value)),
        format!("Total Equity:   {}", format_currency(kpis.total_equity)),
        format!("Occupancy:      {}", format_percent(kpis.occupancy_rate)),
        format!("Avg Cap Rate:   {}", format_percent(kpis.avg_cap_rate)),
    ];

    if !view.state.filter.is_unfiltered() {
        let filter = &view.state.filter;
        lines.push(format!(
            "Filter:         status={}, type={}, location={}",
            filter.status, filter.property_type, filter.location
        ));
    }

    lines.push(String::new());
    lines.push("Deals".to_string());
    lines.push("-----".to_string());
    for (deal, metrics) in &view.deal_table {
        lines.push(format!(
            "{} | {} | {} | value {} | equity {} | LTV {} | cap {}",
            deal.id,
            deal.name,
            deal.status,
            format_currency(deal.market_value),
            format_currency(metrics.equity),
            format_percent(metrics.ltv),
            format_percent(metrics.cap_rate),
        ));
    }

    if let Some(detail) = &view.selected {
        lines.push(String::new());
        lines.push(format!("Selected: {} ({})", detail.deal.name, detail.deal.id));
        lines.push(format!(
            "Total Cost {} | Occupancy {} | Rent Upside {}/mo",
            format_currency(detail.metrics.total_cost),
            format_percent(detail.metrics.occupancy_rate),
            format_currency(detail.total_rent_upside()),
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DashboardState, MetricsConfig, PortfolioDashboard, RecordStore};

    fn to_string(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_template_headers() {
        let mut buffer = Vec::new();
        write_template_csv(RecordKind::Financials, &mut buffer).unwrap();
        assert_eq!(
            to_string(buffer),
            "id,deal_id,period,gross_rent,operating_expenses,noi,capex,debt_service\n"
        );
    }

    #[test]
    fn test_empty_export_still_has_header() {
        let mut buffer = Vec::new();
        write_deals_csv(&[], &mut buffer).unwrap();
        assert_eq!(to_string(buffer).lines().count(), 1);
    }

    #[test]
    fn test_deals_export_reimports_identically() {
        let store = RecordStore::sample();
        let mut buffer = Vec::new();
        write_deals_csv(&store.deals, &mut buffer).unwrap();

        let mut reloaded = RecordStore::default();
        reloaded
            .import_csv(RecordKind::Deals, buffer.as_slice())
            .unwrap();
        assert_eq!(reloaded.deals, store.deals);
    }

    #[test]
    fn test_units_export_keeps_free_form_status() {
        let store = RecordStore::sample();
        let mut buffer = Vec::new();
        write_units_csv(&store.units, &mut buffer).unwrap();
        assert!(to_string(buffer).contains(",Notice"));
    }

    #[test]
    fn test_deal_metrics_export_is_unrounded() {
        let store = RecordStore::sample();
        let view = PortfolioDashboard::compute(&store, &DashboardState::default(), &MetricsConfig::default());

        let mut buffer = Vec::new();
        write_deal_metrics_csv(&view.deal_table, &mut buffer).unwrap();
        let text = to_string(buffer);

        assert!(text.starts_with("id,name,status,market_value"));
        // 1_800_000 / 3_200_000
        assert!(text.contains("0.5625"));
    }

    #[test]
    fn test_summary_report() {
        let store = RecordStore::sample();
        let state = DashboardState::default().select_deal("D1");
        let view = PortfolioDashboard::compute(&store, &state, &MetricsConfig::default());

        let report = render_summary_report(&view);
        assert!(report.contains("Total Value:    $14,550,000"));
        assert!(report.contains("Selected: Sunset Apartments (D1)"));
        assert!(!report.contains("Filter:"));
    }
}
