use crate::engine::QUARTERS_PER_YEAR;
use crate::schema::{Deal, FinancialPeriod, Unit};
use crate::utils::ratio_or_zero;
use serde::{Deserialize, Serialize};

/// Ratios shown on a single deal's detail page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DealMetrics {
    pub total_cost: f64,
    pub equity: f64,
    pub ltv: f64,
    pub cap_rate: f64,
    pub occupancy_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum UpsideDirection {
    /// Current rent is below market.
    Positive,
    AtMarket,
    /// Current rent is above market.
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitUpside {
    pub unit: Unit,
    pub rent_upside: f64,
}

impl UnitUpside {
    pub fn new(unit: Unit) -> Self {
        let rent_upside = rent_upside(&unit);
        Self { unit, rent_upside }
    }

    pub fn direction(&self) -> UpsideDirection {
        if self.rent_upside > 0.0 {
            UpsideDirection::Positive
        } else if self.rent_upside < 0.0 {
            UpsideDirection::Negative
        } else {
            UpsideDirection::AtMarket
        }
    }
}

/// Market rent minus current rent. Negative values are kept.
pub fn rent_upside(unit: &Unit) -> f64 {
    unit.market_rent - unit.current_rent
}

pub fn related_units<'a>(deal: &Deal, units: &'a [Unit]) -> Vec<&'a Unit> {
    units.iter().filter(|u| u.deal_id == deal.id).collect()
}

pub fn related_financials<'a>(deal: &Deal, financials: &'a [FinancialPeriod]) -> Vec<&'a FinancialPeriod> {
    financials.iter().filter(|f| f.deal_id == deal.id).collect()
}

/// Derives the deal-level ratios from already-related units and periods.
pub fn derive_deal_metrics(
    deal: &Deal,
    units: &[&Unit],
    financials: &[&FinancialPeriod],
) -> DealMetrics {
    let noi: f64 = financials.iter().map(|f| f.noi).sum();
    let occupied = units.iter().filter(|u| u.occupancy_status.is_occupied()).count();

    DealMetrics {
        total_cost: deal.purchase_price + deal.renovation_budget,
        equity: deal.market_value - deal.debt_amount,
        ltv: ratio_or_zero(deal.debt_amount, deal.market_value),
        cap_rate: ratio_or_zero(noi * QUARTERS_PER_YEAR, deal.market_value),
        occupancy_rate: ratio_or_zero(occupied as f64, units.len() as f64),
    }
}

/// A deal together with its related records and derived figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealDetail {
    pub deal: Deal,
    pub metrics: DealMetrics,
    pub units: Vec<UnitUpside>,
    pub financials: Vec<FinancialPeriod>,
}

impl DealDetail {
    /// Relates units and financials to `deal` by `deal_id`. Records pointing
    /// at unknown deals are simply never picked up.
    pub fn build(deal: &Deal, units: &[Unit], financials: &[FinancialPeriod]) -> Self {
        let units = related_units(deal, units);
        let financials = related_financials(deal, financials);
        let metrics = derive_deal_metrics(deal, &units, &financials);

        Self {
            deal: deal.clone(),
            metrics,
            units: units.into_iter().cloned().map(UnitUpside::new).collect(),
            financials: financials.into_iter().cloned().collect(),
        }
    }

    pub fn total_rent_upside(&self) -> f64 {
        self.units.iter().map(|u| u.rent_upside).sum()
    }
}

/// Metrics for every deal in order, as used by the deal table and exports.
pub fn derive_all(
    deals: &[Deal],
    units: &[Unit],
    financials: &[FinancialPeriod],
) -> Vec<(Deal, DealMetrics)> {
    deals
        .iter()
        .map(|deal| {
            let related_u = related_units(deal, units);
            let related_f = related_financials(deal, financials);
            (deal.clone(), derive_deal_metrics(deal, &related_u, &related_f))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OccupancyStatus;

    fn deal(market_value: f64, debt_amount: f64) -> Deal {
        Deal {
            id: "D1".to_string(),
            name: "Sunset Apartments".to_string(),
            acquisition_date: None,
            total_units: 4,
            purchase_price: 2_800_000.0,
            renovation_budget: 250_000.0,
            market_value,
            debt_amount,
            status: "Active".to_string(),
            property_type: "Multifamily".to_string(),
            location: "Austin, TX".to_string(),
        }
    }

    fn unit(id: &str, deal_id: &str, current: f64, market: f64, status: &str) -> Unit {
        Unit {
            id: id.to_string(),
            deal_id: deal_id.to_string(),
            unit_number: id.to_string(),
            bedrooms: 2,
            bathrooms: 1.0,
            sqft: 900.0,
            current_rent: current,
            market_rent: market,
            occupancy_status: OccupancyStatus::from(status),
        }
    }

    fn period(id: &str, deal_id: &str, noi: f64) -> FinancialPeriod {
        FinancialPeriod {
            id: id.to_string(),
            deal_id: deal_id.to_string(),
            period: "2024-Q1".to_string(),
            gross_rent: 0.0,
            operating_expenses: 0.0,
            noi,
            capex: 0.0,
            debt_service: 0.0,
        }
    }

    #[test]
    fn test_ltv_and_zero_value_guard() {
        let metrics = derive_deal_metrics(&deal(2_000_000.0, 1_000_000.0), &[], &[]);
        assert_eq!(metrics.ltv, 0.5);
        assert_eq!(metrics.equity, 1_000_000.0);
        assert_eq!(metrics.total_cost, 3_050_000.0);

        let zero = derive_deal_metrics(&deal(0.0, 1_000_000.0), &[], &[]);
        assert_eq!(zero.ltv, 0.0);
        assert_eq!(zero.cap_rate, 0.0);
        assert_eq!(zero.occupancy_rate, 0.0);
        assert_eq!(zero.equity, -1_000_000.0);
    }

    #[test]
    fn test_detail_uses_only_related_records() {
        let d = deal(2_000_000.0, 1_000_000.0);
        let units = vec![
            unit("U1", "D1", 1_400.0, 1_600.0, "Occupied"),
            unit("U2", "D1", 1_700.0, 1_600.0, "Vacant"),
            unit("U3", "D9", 1_000.0, 1_000.0, "Occupied"),
        ];
        let financials = vec![period("F1", "D1", 25_000.0), period("F2", "D9", 90_000.0)];

        let detail = DealDetail::build(&d, &units, &financials);
        assert_eq!(detail.units.len(), 2);
        assert_eq!(detail.financials.len(), 1);
        assert_eq!(detail.metrics.occupancy_rate, 0.5);
        assert!((detail.metrics.cap_rate - 0.05).abs() < 1e-12);

        assert_eq!(detail.units[0].rent_upside, 200.0);
        assert_eq!(detail.units[0].direction(), UpsideDirection::Positive);
        assert_eq!(detail.units[1].rent_upside, -100.0);
        assert_eq!(detail.units[1].direction(), UpsideDirection::Negative);
        assert_eq!(detail.total_rent_upside(), 100.0);
    }

    #[test]
    fn test_dangling_deal_has_empty_relations() {
        let mut d = deal(1_000_000.0, 0.0);
        d.id = "D404".to_string();
        let units = vec![unit("U1", "D1", 1_000.0, 1_000.0, "Occupied")];

        let detail = DealDetail::build(&d, &units, &[]);
        assert!(detail.units.is_empty());
        assert!(detail.financials.is_empty());
        assert_eq!(detail.metrics.occupancy_rate, 0.0);
        assert_eq!(detail.metrics.cap_rate, 0.0);
    }

    #[test]
    fn test_at_market_unit() {
        let upside = UnitUpside::new(unit("U1", "D1", 1_000.0, 1_000.0, "Occupied"));
        assert_eq!(upside.direction(), UpsideDirection::AtMarket);
    }
}
