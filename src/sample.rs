//! Built-in demonstration portfolio, used when no files have been imported.

use crate::schema::{Deal, FinancialPeriod, OccupancyStatus, Unit};
use crate::store::RecordStore;
use chrono::NaiveDate;

#[allow(clippy::too_many_arguments)]
fn deal(
    id: &str,
    name: &str,
    acquired: (i32, u32, u32),
    total_units: u32,
    purchase_price: f64,
    renovation_budget: f64,
    market_value: f64,
    debt_amount: f64,
    status: &str,
    property_type: &str,
    location: &str,
) -> Deal {
    Deal {
        id: id.to_string(),
        name: name.to_string(),
        acquisition_date: NaiveDate::from_ymd_opt(acquired.0, acquired.1, acquired.2),
        total_units,
        purchase_price,
        renovation_budget,
        market_value,
        debt_amount,
        status: status.to_string(),
        property_type: property_type.to_string(),
        location: location.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn unit(
    id: &str,
    deal_id: &str,
    unit_number: &str,
    bedrooms: u32,
    bathrooms: f64,
    sqft: f64,
    current_rent: f64,
    market_rent: f64,
    status: &str,
) -> Unit {
    Unit {
        id: id.to_string(),
        deal_id: deal_id.to_string(),
        unit_number: unit_number.to_string(),
        bedrooms,
        bathrooms,
        sqft,
        current_rent,
        market_rent,
        occupancy_status: OccupancyStatus::from(status),
    }
}

fn period(
    id: &str,
    deal_id: &str,
    label: &str,
    gross_rent: f64,
    operating_expenses: f64,
    capex: f64,
    debt_service: f64,
) -> FinancialPeriod {
    FinancialPeriod {
        id: id.to_string(),
        deal_id: deal_id.to_string(),
        period: label.to_string(),
        gross_rent,
        operating_expenses,
        noi: gross_rent - operating_expenses,
        capex,
        debt_service,
    }
}

pub fn sample_deals() -> Vec<Deal> {
    vec![
        deal(
            "D1",
            "Sunset Apartments",
            (2022, 3, 15),
            48,
            2_800_000.0,
            250_000.0,
            3_200_000.0,
            1_800_000.0,
            "Active",
            "Multifamily",
            "Austin, TX",
        ),
        deal(
            "D2",
            "Harbor View Residences",
            (2021, 8, 2),
            72,
            4_900_000.0,
            400_000.0,
            5_500_000.0,
            3_000_000.0,
            "Active",
            "Multifamily",
            "Tampa, FL",
        ),
        deal(
            "D3",
            "Maple Court Townhomes",
            (2020, 11, 20),
            24,
            1_650_000.0,
            120_000.0,
            2_100_000.0,
            900_000.0,
            "Closed",
            "Townhome",
            "Austin, TX",
        ),
        deal(
            "D4",
            "Riverside Lofts",
            (2023, 5, 9),
            36,
            3_400_000.0,
            600_000.0,
            3_750_000.0,
            2_400_000.0,
            "Under Contract",
            "Mixed-Use",
            "Denver, CO",
        ),
    ]
}

pub fn sample_units() -> Vec<Unit> {
    vec![
        unit("U1", "D1", "101", 1, 1.0, 650.0, 1_150.0, 1_275.0, "Occupied"),
        unit("U2", "D1", "102", 2, 1.0, 875.0, 1_425.0, 1_600.0, "Occupied"),
        unit("U3", "D1", "201", 2, 2.0, 940.0, 1_500.0, 1_600.0, "Vacant"),
        unit("U4", "D2", "A-1", 2, 2.0, 1_020.0, 1_850.0, 1_800.0, "Occupied"),
        unit("U5", "D2", "A-2", 3, 2.0, 1_240.0, 2_100.0, 2_350.0, "Occupied"),
        unit("U6", "D2", "B-1", 1, 1.0, 700.0, 1_300.0, 1_400.0, "Occupied"),
        unit("U7", "D3", "7", 3, 2.5, 1_400.0, 2_050.0, 2_200.0, "Occupied"),
        unit("U8", "D3", "9", 3, 2.5, 1_400.0, 0.0, 2_200.0, "Vacant"),
        unit("U9", "D4", "L2", 0, 1.0, 520.0, 1_050.0, 1_150.0, "Notice"),
        unit("U10", "D4", "L3", 1, 1.0, 690.0, 1_375.0, 1_450.0, "Occupied"),
    ]
}

pub fn sample_financials() -> Vec<FinancialPeriod> {
    vec![
        period("F1", "D1", "2024-Q2", 72_400.0, 33_200.0, 6_000.0, 24_500.0),
        period("F2", "D1", "2024-Q1", 72_000.0, 32_900.0, 4_500.0, 24_500.0),
        period("F3", "D2", "2024-Q1", 121_500.0, 54_000.0, 9_000.0, 41_000.0),
        period("F4", "D2", "2024-Q2", 123_000.0, 55_100.0, 12_500.0, 41_000.0),
        period("F5", "D3", "2023-Q4", 48_300.0, 21_700.0, 2_000.0, 12_300.0),
        period("F6", "D4", "2024-Q2", 58_800.0, 27_400.0, 18_000.0, 33_600.0),
    ]
}

impl RecordStore {
    pub fn sample() -> Self {
        Self::new(sample_deals(), sample_units(), sample_financials())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_consistent() {
        let store = RecordStore::sample();
        assert_eq!(store.deals.len(), 4);

        for unit in &store.units {
            assert!(store.deal(&unit.deal_id).is_some(), "{} is dangling", unit.id);
        }
        for period in &store.financials {
            assert!((period.noi - (period.gross_rent - period.operating_expenses)).abs() < 1e-9);
        }
    }
}
