//! Portfolio metrics engine.
//!
//! Only deals are narrowed by the active filter. Under the default
//! [`MetricsConfig`], occupancy, unit mix, the NOI chart and the average cap
//! rate all read the complete unit and financial collections.

use crate::config::{MetricsConfig, RecordScope, UnitMixOrder};
use crate::schema::{Deal, FinancialPeriod, Unit};
use crate::utils::ratio_or_zero;
use log::debug;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// A quarterly NOI sum is multiplied by this to annualize it.
pub const QUARTERS_PER_YEAR: f64 = 4.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioKpis {
    pub total_deals: usize,
    pub total_units: u64,
    pub total_value: f64,
    pub total_equity: f64,
    pub occupancy_rate: f64,
    pub avg_cap_rate: f64,
}

/// One bar of the portfolio value chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPoint {
    pub name: String,
    pub value: f64,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowPoint {
    pub period: String,
    pub noi: f64,
    pub cash_flow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitMixPoint {
    /// Chart label, e.g. `"2BR"`.
    pub name: String,
    pub bedrooms: u32,
    pub count: usize,
    pub avg_rent: f64,
}

/// Everything the portfolio view renders from one recomputation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub kpis: PortfolioKpis,
    pub portfolio_series: Vec<PortfolioPoint>,
    pub noi_series: Vec<CashFlowPoint>,
    pub unit_mix: Vec<UnitMixPoint>,
}

pub fn total_units(deals: &[Deal]) -> u64 {
    deals.iter().map(|d| u64::from(d.total_units)).sum()
}

pub fn total_value(deals: &[Deal]) -> f64 {
    deals.iter().map(|d| d.market_value).sum()
}

pub fn total_equity(deals: &[Deal]) -> f64 {
    deals.iter().map(|d| d.market_value - d.debt_amount).sum()
}

/// Share of units whose status is exactly `Occupied`; 0 for no units.
pub fn occupancy_rate(units: &[Unit]) -> f64 {
    let occupied = units
        .iter()
        .filter(|u| u.occupancy_status.is_occupied())
        .count();
    ratio_or_zero(occupied as f64, units.len() as f64)
}

/// Sum of NOI across `financials`, annualized as one quarter and divided by
/// `total_value`. The sum is not normalized by period count.
pub fn avg_cap_rate(financials: &[FinancialPeriod], total_value: f64) -> f64 {
    let noi: f64 = financials.iter().map(|f| f.noi).sum();
    ratio_or_zero(noi * QUARTERS_PER_YEAR, total_value)
}

pub fn compute_kpis(deals: &[Deal], units: &[Unit], financials: &[FinancialPeriod]) -> PortfolioKpis {
    let total_value = total_value(deals);

    PortfolioKpis {
        total_deals: deals.len(),
        total_units: total_units(deals),
        total_value,
        total_equity: total_equity(deals),
        occupancy_rate: occupancy_rate(units),
        avg_cap_rate: avg_cap_rate(financials, total_value),
    }
}

pub fn portfolio_series(deals: &[Deal]) -> Vec<PortfolioPoint> {
    deals
        .iter()
        .map(|d| PortfolioPoint {
            name: d.name.clone(),
            value: d.market_value,
            equity: d.market_value - d.debt_amount,
        })
        .collect()
}

/// Financial periods ordered by label (plain string order, stable for ties).
pub fn noi_series(financials: &[FinancialPeriod]) -> Vec<CashFlowPoint> {
    let mut ordered: Vec<&FinancialPeriod> = financials.iter().collect();
    ordered.sort_by(|a, b| a.period.cmp(&b.period));

    ordered
        .into_iter()
        .map(|f| CashFlowPoint {
            period: f.period.clone(),
            noi: f.noi,
            cash_flow: f.cash_flow(),
        })
        .collect()
}

pub fn unit_mix(units: &[Unit], order: UnitMixOrder) -> Vec<UnitMixPoint> {
    let mut index: HashMap<u32, usize> = HashMap::new();
    // (bedrooms, count, rent total)
    let mut groups: Vec<(u32, usize, f64)> = Vec::new();

    for unit in units {
        let slot = *index.entry(unit.bedrooms).or_insert_with(|| {
            groups.push((unit.bedrooms, 0, 0.0));
            groups.len() - 1
        });
        groups[slot].1 += 1;
        groups[slot].2 += unit.current_rent;
    }

    if order == UnitMixOrder::BedroomsAscending {
        groups.sort_by_key(|(bedrooms, _, _)| *bedrooms);
    }

    groups
        .into_iter()
        .map(|(bedrooms, count, rent_total)| UnitMixPoint {
            name: format!("{}BR", bedrooms),
            bedrooms,
            count,
            avg_rent: rent_total / count as f64,
        })
        .collect()
}

pub struct MetricsEngine<'a> {
    config: &'a MetricsConfig,
}

impl<'a> MetricsEngine<'a> {
    pub fn new(config: &'a MetricsConfig) -> Self {
        Self { config }
    }

    /// Derives all portfolio outputs. `deals` is expected to be already
    /// filtered; `units` and `financials` are the full collections.
    pub fn compute(
        &self,
        deals: &[Deal],
        units: &[Unit],
        financials: &[FinancialPeriod],
    ) -> PortfolioMetrics {
        let deal_ids: HashSet<&str> = deals.iter().map(|d| d.id.as_str()).collect();

        let units: Cow<'_, [Unit]> = match self.config.unit_scope {
            RecordScope::AllRecords => Cow::Borrowed(units),
            RecordScope::FilteredDeals => Cow::Owned(
                units
                    .iter()
                    .filter(|u| deal_ids.contains(u.deal_id.as_str()))
                    .cloned()
                    .collect(),
            ),
        };

        let financials: Cow<'_, [FinancialPeriod]> = match self.config.financial_scope {
            RecordScope::AllRecords => Cow::Borrowed(financials),
            RecordScope::FilteredDeals => Cow::Owned(
                financials
                    .iter()
                    .filter(|f| deal_ids.contains(f.deal_id.as_str()))
                    .cloned()
                    .collect(),
            ),
        };

        debug!(
            "Computing portfolio metrics over {} deals, {} units, {} financial periods",
            deals.len(),
            units.len(),
            financials.len()
        );

        PortfolioMetrics {
            kpis: compute_kpis(deals, &units, &financials),
            portfolio_series: portfolio_series(deals),
            noi_series: noi_series(&financials),
            unit_mix: unit_mix(&units, self.config.unit_mix_order),
        }
    }
}
