use crate::schema::Deal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Sentinel shown as the first choice of every filter dropdown.
pub const ALL: &str = "all";

/// One filter field: either the `"all"` sentinel or a value that must match
/// exactly (case-sensitive).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterValue {
    #[default]
    All,
    Exact(String),
}

impl FilterValue {
    pub fn exact(value: impl Into<String>) -> Self {
        Self::from(value.into())
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact(expected) => expected == candidate,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Exact(value)
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<FilterValue> for String {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::All => ALL.to_string(),
            FilterValue::Exact(v) => v,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Exact(v) => f.write_str(v),
        }
    }
}

/// The active dropdown selection on the portfolio view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FilterSelection {
    #[schemars(with = "String")]
    #[schemars(description = "Deal status to keep, or 'all'")]
    #[serde(default)]
    pub status: FilterValue,

    #[schemars(with = "String")]
    #[schemars(description = "Property type to keep, or 'all'")]
    #[serde(default)]
    pub property_type: FilterValue,

    #[schemars(with = "String")]
    #[schemars(description = "Location to keep, or 'all'")]
    #[serde(default)]
    pub location: FilterValue,
}

impl FilterSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: impl Into<FilterValue>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_property_type(mut self, property_type: impl Into<FilterValue>) -> Self {
        self.property_type = property_type.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<FilterValue>) -> Self {
        self.location = location.into();
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        self.status.is_all() && self.property_type.is_all() && self.location.is_all()
    }

    /// True iff every non-`all` field equals the deal's attribute.
    pub fn matches(&self, deal: &Deal) -> bool {
        self.status.matches(&deal.status)
            && self.property_type.matches(&deal.property_type)
            && self.location.matches(&deal.location)
    }
}

/// Keeps the deals accepted by `selection`, preserving input order.
pub fn filter_deals(deals: &[Deal], selection: &FilterSelection) -> Vec<Deal> {
    deals
        .iter()
        .filter(|deal| selection.matches(deal))
        .cloned()
        .collect()
}

/// Choices for each filter dropdown, always led by `"all"`.
///
/// Built from the unfiltered deal collection so narrowing one filter does not
/// shrink the others; rebuild only when the deals themselves change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub statuses: Vec<String>,
    pub property_types: Vec<String>,
    pub locations: Vec<String>,
}

impl FilterOptions {
    pub fn from_deals(deals: &[Deal]) -> Self {
        Self {
            statuses: distinct_with_all(deals.iter().map(|d| d.status.as_str())),
            property_types: distinct_with_all(deals.iter().map(|d| d.property_type.as_str())),
            locations: distinct_with_all(deals.iter().map(|d| d.location.as_str())),
        }
    }
}

fn distinct_with_all<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = vec![ALL.to_string()];
    for value in values {
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }
    out
}
