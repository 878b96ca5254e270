use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DealMetricsError;

/// A single real-estate acquisition tracked as one record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Deal {
    #[schemars(description = "Unique deal identifier (e.g., 'D1'). Rows without one are discarded at import.")]
    pub id: String,

    #[schemars(description = "Display name of the property (e.g., 'Sunset Apartments')")]
    #[serde(default)]
    pub name: String,

    #[schemars(description = "Acquisition date in YYYY-MM-DD format, if known")]
    #[serde(default)]
    pub acquisition_date: Option<NaiveDate>,

    #[schemars(description = "Number of rentable units in the property")]
    #[serde(default)]
    pub total_units: u32,

    #[schemars(description = "Price paid at acquisition")]
    #[serde(default)]
    pub purchase_price: f64,

    #[schemars(description = "Budget allocated to renovation after acquisition")]
    #[serde(default)]
    pub renovation_budget: f64,

    #[schemars(description = "Current estimated market value")]
    #[serde(default)]
    pub market_value: f64,

    #[schemars(description = "Outstanding debt secured against the property. Not required to be below market value.")]
    #[serde(default)]
    pub debt_amount: f64,

    #[schemars(description = "Lifecycle status, e.g. 'Active' or 'Closed'. Open-ended.")]
    #[serde(default)]
    pub status: String,

    #[schemars(description = "Property type, e.g. 'Multifamily'")]
    #[serde(default)]
    pub property_type: String,

    #[schemars(description = "Market or city the property is located in")]
    #[serde(default)]
    pub location: String,
}

/// Occupancy of a single unit. Anything other than the two known states is
/// carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OccupancyStatus {
    Occupied,
    Vacant,
    Other(String),
}

impl OccupancyStatus {
    pub fn is_occupied(&self) -> bool {
        matches!(self, Self::Occupied)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Occupied => "Occupied",
            Self::Vacant => "Vacant",
            Self::Other(other) => other.as_str(),
        }
    }
}

impl Default for OccupancyStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

// Matching is exact and case-sensitive: "occupied" is an Other.
impl From<String> for OccupancyStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Occupied" => Self::Occupied,
            "Vacant" => Self::Vacant,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for OccupancyStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<OccupancyStatus> for String {
    fn from(value: OccupancyStatus) -> Self {
        match value {
            OccupancyStatus::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OccupancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Unit {
    #[schemars(description = "Unique unit identifier")]
    pub id: String,

    #[schemars(description = "Identifier of the owning deal. Not validated; dangling references are tolerated.")]
    #[serde(default)]
    pub deal_id: String,

    #[schemars(description = "Unit label as used on site (e.g., '101', 'B-4')")]
    #[serde(default)]
    pub unit_number: String,

    #[serde(default)]
    pub bedrooms: u32,

    #[schemars(description = "Bathroom count; half baths are allowed (e.g., 1.5)")]
    #[serde(default)]
    pub bathrooms: f64,

    #[schemars(description = "Floor area in square feet")]
    #[serde(default)]
    pub sqft: f64,

    #[schemars(description = "Rent currently charged per month")]
    #[serde(default)]
    pub current_rent: f64,

    #[schemars(description = "Estimated achievable market rent per month")]
    #[serde(default)]
    pub market_rent: f64,

    #[schemars(with = "String")]
    #[schemars(description = "'Occupied', 'Vacant', or any other free-form status")]
    #[serde(default)]
    pub occupancy_status: OccupancyStatus,
}

/// One reporting period (typically a quarter) of a deal's operating statement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct FinancialPeriod {
    #[schemars(description = "Unique financial record identifier")]
    pub id: String,

    #[schemars(description = "Identifier of the owning deal")]
    #[serde(default)]
    pub deal_id: String,

    #[schemars(description = "Period label that sorts lexicographically, e.g. '2024-Q1'")]
    #[serde(default)]
    pub period: String,

    #[serde(default)]
    pub gross_rent: f64,

    #[serde(default)]
    pub operating_expenses: f64,

    #[schemars(description = "Net operating income: gross rent minus operating expenses")]
    #[serde(default)]
    pub noi: f64,

    #[schemars(description = "Capital expenditure during the period")]
    #[serde(default)]
    pub capex: f64,

    #[schemars(description = "Principal and interest paid during the period")]
    #[serde(default)]
    pub debt_service: f64,
}

impl FinancialPeriod {
    /// NOI left after capital expenditure and debt service.
    pub fn cash_flow(&self) -> f64 {
        self.noi - self.capex - self.debt_service
    }
}

/// The three record collections, each with its canonical column set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Deals,
    Units,
    Financials,
}

pub const DEAL_COLUMNS: [&str; 11] = [
    "id",
    "name",
    "acquisition_date",
    "total_units",
    "purchase_price",
    "renovation_budget",
    "market_value",
    "debt_amount",
    "status",
    "property_type",
    "location",
];

pub const UNIT_COLUMNS: [&str; 9] = [
    "id",
    "deal_id",
    "unit_number",
    "bedrooms",
    "bathrooms",
    "sqft",
    "current_rent",
    "market_rent",
    "occupancy_status",
];

pub const FINANCIAL_COLUMNS: [&str; 8] = [
    "id",
    "deal_id",
    "period",
    "gross_rent",
    "operating_expenses",
    "noi",
    "capex",
    "debt_service",
];

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [Self::Deals, Self::Units, Self::Financials];

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Deals => &DEAL_COLUMNS,
            Self::Units => &UNIT_COLUMNS,
            Self::Financials => &FINANCIAL_COLUMNS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deals => "deals",
            Self::Units => "units",
            Self::Financials => "financials",
        }
    }

    pub fn generate_json_schema(self) -> schemars::schema::RootSchema {
        match self {
            Self::Deals => schemars::schema_for!(Vec<Deal>),
            Self::Units => schemars::schema_for!(Vec<Unit>),
            Self::Financials => schemars::schema_for!(Vec<FinancialPeriod>),
        }
    }

    pub fn schema_as_json(self) -> Result<String, serde_json::Error> {
        let schema = self.generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = DealMetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deals" | "deal" => Ok(Self::Deals),
            "units" | "unit" => Ok(Self::Units),
            "financials" | "financial" => Ok(Self::Financials),
            other => Err(DealMetricsError::UnknownRecordKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let schema_json = RecordKind::Deals.schema_as_json().unwrap();
        for column in DEAL_COLUMNS {
            assert!(schema_json.contains(column), "missing {}", column);
        }

        let unit_schema = RecordKind::Units.schema_as_json().unwrap();
        assert!(unit_schema.contains("occupancy_status"));
    }

    #[test]
    fn test_occupancy_status_is_case_sensitive() {
        assert_eq!(OccupancyStatus::from("Occupied"), OccupancyStatus::Occupied);
        assert_eq!(OccupancyStatus::from("Vacant"), OccupancyStatus::Vacant);
        assert_eq!(
            OccupancyStatus::from("occupied"),
            OccupancyStatus::Other("occupied".to_string())
        );
        assert!(!OccupancyStatus::from("Notice").is_occupied());
    }

    #[test]
    fn test_unit_serialization_keeps_status_string() {
        let unit = Unit {
            id: "U1".to_string(),
            deal_id: "D1".to_string(),
            unit_number: "101".to_string(),
            bedrooms: 2,
            bathrooms: 1.5,
            sqft: 950.0,
            current_rent: 1450.0,
            market_rent: 1600.0,
            occupancy_status: OccupancyStatus::Other("Notice".to_string()),
        };

        let json = serde_json::to_string(&unit).unwrap();
        assert!(json.contains("\"occupancy_status\":\"Notice\""));

        let deserialized: Unit = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, unit);
    }

    #[test]
    fn test_record_kind_parsing() {
        assert_eq!("Deals".parse::<RecordKind>().unwrap(), RecordKind::Deals);
        assert_eq!("unit".parse::<RecordKind>().unwrap(), RecordKind::Units);
        assert!("tenants".parse::<RecordKind>().is_err());
        assert_eq!(RecordKind::Financials.columns().len(), 8);
    }

    #[test]
    fn test_cash_flow() {
        let period = FinancialPeriod {
            id: "F1".to_string(),
            deal_id: "D1".to_string(),
            period: "2024-Q1".to_string(),
            gross_rent: 72_000.0,
            operating_expenses: 32_900.0,
            noi: 39_100.0,
            capex: 5_000.0,
            debt_service: 24_000.0,
        };
        assert!((period.cash_flow() - 10_100.0).abs() < 1e-9);
    }
}
