use crate::error::{DealMetricsError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum UnitMixOrder {
    #[schemars(description = "Groups appear in the order their bedroom count is first encountered in the unit list.")]
    #[default]
    FirstSeen,

    #[schemars(description = "Groups are sorted by bedroom count, smallest first.")]
    BedroomsAscending,
}

/// Which units or financial periods feed the portfolio-level figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum RecordScope {
    #[schemars(description = "Every loaded record, regardless of the active deal filter.")]
    #[default]
    AllRecords,

    #[schemars(description = "Only records whose deal_id belongs to a deal that passes the active filter.")]
    FilteredDeals,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MetricsConfig {
    #[schemars(description = "Ordering of the unit-mix chart groups")]
    #[serde(default)]
    pub unit_mix_order: UnitMixOrder,

    #[schemars(description = "Units considered by the occupancy KPI and the unit-mix chart")]
    #[serde(default)]
    pub unit_scope: RecordScope,

    #[schemars(description = "Financial periods considered by the NOI chart and the average cap rate KPI")]
    #[serde(default)]
    pub financial_scope: RecordScope,
}

impl MetricsConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DealMetricsError::InvalidConfig(e.to_string()))
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(MetricsConfig)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unscoped_first_seen() {
        let config = MetricsConfig::default();
        assert_eq!(config.unit_mix_order, UnitMixOrder::FirstSeen);
        assert_eq!(config.unit_scope, RecordScope::AllRecords);
        assert_eq!(config.financial_scope, RecordScope::AllRecords);

        assert_eq!(MetricsConfig::from_json_str("{}").unwrap(), config);
    }

    #[test]
    fn test_partial_json_overrides() {
        let config =
            MetricsConfig::from_json_str(r#"{"unit_mix_order": "BedroomsAscending", "unit_scope": "FilteredDeals"}"#)
                .unwrap();
        assert_eq!(config.unit_mix_order, UnitMixOrder::BedroomsAscending);
        assert_eq!(config.unit_scope, RecordScope::FilteredDeals);
        assert_eq!(config.financial_scope, RecordScope::AllRecords);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let err = MetricsConfig::from_json_str(r#"{"unit_scope": "Sometimes"}"#).unwrap_err();
        assert!(matches!(err, DealMetricsError::InvalidConfig(_)));
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = MetricsConfig::schema_as_json().unwrap();
        assert!(schema_json.contains("unit_mix_order"));
        assert!(schema_json.contains("FilteredDeals"));
    }
}
