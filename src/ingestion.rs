//! Record-construction boundary.
//!
//! Imported rows arrive loosely typed (every CSV cell is text, JSON cells may be
//! numbers, strings or null). They are coerced exactly once here into the typed
//! records of [`crate::schema`]; nothing downstream re-validates.
//!
//! - A row without a non-empty `id` is discarded.
//! - Ids and the `deal_id` references to them are trimmed the same way.
//! - Numeric cells that are missing or unparsable become `0`. Only US-style
//!   numbers are understood (`$1,250.50`); `1,5`, `(500)` and `6%` become `0`.
//! - Text cells that are missing become the empty string.

use crate::error::{DealMetricsError, Result};
use crate::schema::{Deal, FinancialPeriod, OccupancyStatus, RecordKind, Unit};
use chrono::NaiveDate;
use log::{debug, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// A single imported row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: BTreeMap<String, Value>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: &str, value: impl Into<Value>) {
        self.fields.insert(column.to_string(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// The identifying key, if present and non-blank.
    pub fn identifier(&self, column: &str) -> Option<String> {
        match self.get(column)? {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// A key referring to another record, normalized like [`Self::identifier`]
    /// so it compares equal to the id it points at. Blank becomes empty.
    pub fn reference(&self, column: &str) -> String {
        self.identifier(column).unwrap_or_default()
    }

    pub fn text(&self, column: &str) -> String {
        match self.get(column) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    pub fn number(&self, column: &str) -> f64 {
        let parsed = match self.get(column) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => parse_lenient_number(s),
            _ => None,
        };
        parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
    }

    /// Whole, non-negative count (unit totals, bedrooms).
    pub fn count(&self, column: &str) -> u32 {
        let value = self.number(column).round();
        if value <= 0.0 {
            0
        } else if value >= u32::MAX as f64 {
            u32::MAX
        } else {
            value as u32
        }
    }

    pub fn date(&self, column: &str) -> Option<NaiveDate> {
        let Some(Value::String(s)) = self.get(column) else {
            return None;
        };
        let s = s.trim();
        let candidate = s.get(..10).filter(|_| s.len() > 10 && s.contains('T'));

        DATE_FORMATS.iter().find_map(|fmt| {
            NaiveDate::parse_from_str(s, fmt)
                .ok()
                .or_else(|| candidate.and_then(|c| NaiveDate::parse_from_str(c, fmt).ok()))
        })
    }
}

// Accepts US-style amounts: an optional `$`, `_` separators and commas only
// in thousands-group positions. "1,5" or "12,34,567" is not a number.
fn parse_lenient_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '_'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    if cleaned.contains(',') {
        let unsigned = cleaned.trim_start_matches(['-', '+']);
        let integer_part = unsigned.split('.').next().unwrap_or_default();
        let mut groups = integer_part.split(',');
        let leading_ok = groups
            .next()
            .is_some_and(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()));
        let rest_ok = groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()));
        if !leading_ok || !rest_ok || unsigned[integer_part.len()..].contains(',') {
            return None;
        }
        return cleaned.replace(',', "").parse::<f64>().ok();
    }

    cleaned.parse::<f64>().ok()
}

/// Conversion from an imported row into a typed record.
pub trait FromRawRecord: Sized {
    const KIND: RecordKind;

    /// Returns `None` when the identifying key is absent.
    fn from_raw(raw: &RawRecord) -> Option<Self>;
}

impl FromRawRecord for Deal {
    const KIND: RecordKind = RecordKind::Deals;

    fn from_raw(raw: &RawRecord) -> Option<Self> {
        Some(Deal {
            id: raw.identifier("id")?,
            name: raw.text("name"),
            acquisition_date: raw.date("acquisition_date"),
            total_units: raw.count("total_units"),
            purchase_price: raw.number("purchase_price"),
            renovation_budget: raw.number("renovation_budget"),
            market_value: raw.number("market_value"),
            debt_amount: raw.number("debt_amount"),
            status: raw.text("status"),
            property_type: raw.text("property_type"),
            location: raw.text("location"),
        })
    }
}

impl FromRawRecord for Unit {
    const KIND: RecordKind = RecordKind::Units;

    fn from_raw(raw: &RawRecord) -> Option<Self> {
        Some(Unit {
            id: raw.identifier("id")?,
            deal_id: raw.reference("deal_id"),
            unit_number: raw.text("unit_number"),
            bedrooms: raw.count("bedrooms"),
            bathrooms: raw.number("bathrooms"),
            sqft: raw.number("sqft"),
            current_rent: raw.number("current_rent"),
            market_rent: raw.number("market_rent"),
            occupancy_status: OccupancyStatus::from(raw.text("occupancy_status")),
        })
    }
}

impl FromRawRecord for FinancialPeriod {
    const KIND: RecordKind = RecordKind::Financials;

    fn from_raw(raw: &RawRecord) -> Option<Self> {
        Some(FinancialPeriod {
            id: raw.identifier("id")?,
            deal_id: raw.reference("deal_id"),
            period: raw.text("period"),
            gross_rent: raw.number("gross_rent"),
            operating_expenses: raw.number("operating_expenses"),
            noi: raw.number("noi"),
            capex: raw.number("capex"),
            debt_service: raw.number("debt_service"),
        })
    }
}

/// Converts rows into typed records, dropping those without an identifier.
pub fn build_records<T: FromRawRecord>(rows: &[RawRecord]) -> Vec<T> {
    let records: Vec<T> = rows.iter().filter_map(T::from_raw).collect();

    let discarded = rows.len() - records.len();
    if discarded > 0 {
        warn!(
            "Discarded {} of {} {} rows without an identifier",
            discarded,
            rows.len(),
            T::KIND
        );
    }
    debug!("Built {} {} records", records.len(), T::KIND);

    records
}

/// Reads a header-first delimited file into raw rows. Every cell is kept as
/// text; coercion happens in [`build_records`].
pub fn read_csv_rows<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let mut raw = RawRecord::new();
        for (column, cell) in headers.iter().zip(record.iter()) {
            if !cell.is_empty() {
                raw.insert(column, cell);
            }
        }
        rows.push(raw);
    }

    Ok(rows)
}

/// Parses a JSON array of objects into raw rows. Array elements that are not
/// objects are skipped.
pub fn read_json_rows(kind: RecordKind, json: &str) -> Result<Vec<RawRecord>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(DealMetricsError::UnexpectedJsonShape {
            kind: kind.to_string(),
            found: json_type_name(&value).to_string(),
        });
    };

    let total = items.len();
    let rows: Vec<RawRecord> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(RawRecord {
                fields: map.into_iter().collect(),
            }),
            _ => None,
        })
        .collect();

    if rows.len() < total {
        warn!(
            "Skipped {} non-object entries in {} JSON import",
            total - rows.len(),
            kind
        );
    }

    Ok(rows)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn import_csv<T: FromRawRecord, R: Read>(reader: R) -> Result<Vec<T>> {
    let rows = read_csv_rows(reader)?;
    Ok(build_records(&rows))
}

pub fn import_json<T: FromRawRecord>(json: &str) -> Result<Vec<T>> {
    let rows = read_json_rows(T::KIND, json)?;
    Ok(build_records(&rows))
}
