//! # Deal Metrics
//!
//! A library for deriving the numbers behind a real-estate portfolio dashboard
//! from three flat record collections: deals, their units, and periodic
//! financial statements.
//!
//! ## Core Concepts
//!
//! - **Record Store**: three in-memory collections, each replaced wholesale on import
//! - **Filter Selection**: exact-match status / property type / location, or `"all"`
//! - **Metrics Engine**: portfolio KPIs plus the value, NOI and unit-mix chart series
//! - **Per-Deal Derivation**: LTV, cap rate, occupancy and rent upside for one deal
//! - **Explicit State**: callers own a [`DashboardState`] and recompute a
//!   [`DashboardView`] after every change; the library holds no state
//!
//! ## Example
//!
//! ```rust
//! use deal_metrics::*;
//!
//! let store = RecordStore::sample();
//! let state = DashboardState::default()
//!     .with_filter(FilterSelection::all().with_status("Active"))
//!     .select_deal("D1");
//!
//! let view = PortfolioDashboard::compute(&store, &state, &MetricsConfig::default());
//!
//! assert_eq!(view.metrics.kpis.total_deals, 2);
//! assert_eq!(view.selected.unwrap().metrics.ltv, 0.5625);
//! ```

pub mod config;
pub mod deal;
pub mod engine;
pub mod error;
pub mod export;
pub mod filter;
pub mod ingestion;
pub mod sample;
pub mod schema;
pub mod store;
pub mod utils;

pub use config::{MetricsConfig, RecordScope, UnitMixOrder};
pub use deal::{
    derive_all, derive_deal_metrics, rent_upside, DealDetail, DealMetrics, UnitUpside,
    UpsideDirection,
};
pub use engine::{
    compute_kpis, noi_series, occupancy_rate, portfolio_series, unit_mix, CashFlowPoint,
    MetricsEngine, PortfolioKpis, PortfolioMetrics, PortfolioPoint, UnitMixPoint,
    QUARTERS_PER_YEAR,
};
pub use error::{DealMetricsError, Result};
pub use export::*;
pub use filter::{filter_deals, FilterOptions, FilterSelection, FilterValue};
pub use ingestion::{build_records, FromRawRecord, RawRecord};
pub use schema::*;
pub use store::RecordStore;
pub use utils::*;

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Caller-owned view state: the active filter and the deal being inspected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    #[serde(default)]
    pub filter: FilterSelection,
    #[serde(default)]
    pub selected_deal: Option<String>,
}

impl DashboardState {
    pub fn with_filter(mut self, filter: FilterSelection) -> Self {
        self.filter = filter;
        self
    }

    pub fn select_deal(mut self, deal_id: impl Into<String>) -> Self {
        self.selected_deal = Some(deal_id.into());
        self
    }

    pub fn clear_selection(mut self) -> Self {
        self.selected_deal = None;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub state: DashboardState,
    pub filter_options: FilterOptions,
    pub filtered_deals: Vec<Deal>,
    pub metrics: PortfolioMetrics,
    /// Per-deal figures for every filtered deal, in deal order.
    pub deal_table: Vec<(Deal, DealMetrics)>,
    pub selected: Option<DealDetail>,
}

pub struct PortfolioDashboard;

impl PortfolioDashboard {
    /// Recomputes every dashboard output from scratch.
    pub fn compute(store: &RecordStore, state: &DashboardState, config: &MetricsConfig) -> DashboardView {
        let filter_options = FilterOptions::from_deals(&store.deals);
        let filtered_deals = filter_deals(&store.deals, &state.filter);

        info!(
            "Computing dashboard: {} of {} deals pass filter",
            filtered_deals.len(),
            store.deals.len()
        );

        let metrics = MetricsEngine::new(config).compute(&filtered_deals, &store.units, &store.financials);
        let deal_table = derive_all(&filtered_deals, &store.units, &store.financials);

        let selected = state.selected_deal.as_deref().and_then(|id| {
            let detail = store
                .deal(id)
                .map(|deal| DealDetail::build(deal, &store.units, &store.financials));
            if detail.is_none() {
                debug!("Selected deal {} is not in the store", id);
            }
            detail
        });

        DashboardView {
            state: state.clone(),
            filter_options,
            filtered_deals,
            metrics,
            deal_table,
            selected,
        }
    }
}

pub fn compute_dashboard(store: &RecordStore, state: &DashboardState) -> DashboardView {
    PortfolioDashboard::compute(store, state, &MetricsConfig::default())
}
