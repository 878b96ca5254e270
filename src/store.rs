use crate::error::Result;
use crate::ingestion::{import_csv, import_json};
use crate::schema::{Deal, FinancialPeriod, RecordKind, Unit};
use log::info;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// In-memory holder of the three record collections.
///
/// Each collection is replaced wholesale on reload; records are never edited
/// in place. Derivations read the store as an immutable snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordStore {
    #[serde(default)]
    pub deals: Vec<Deal>,
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub financials: Vec<FinancialPeriod>,
}

impl RecordStore {
    pub fn new(deals: Vec<Deal>, units: Vec<Unit>, financials: Vec<FinancialPeriod>) -> Self {
        Self {
            deals,
            units,
            financials,
        }
    }

    pub fn replace_deals(&mut self, deals: Vec<Deal>) {
        info!("Replacing {} deals with {}", self.deals.len(), deals.len());
        self.deals = deals;
    }

    pub fn replace_units(&mut self, units: Vec<Unit>) {
        info!("Replacing {} units with {}", self.units.len(), units.len());
        self.units = units;
    }

    pub fn replace_financials(&mut self, financials: Vec<FinancialPeriod>) {
        info!(
            "Replacing {} financial periods with {}",
            self.financials.len(),
            financials.len()
        );
        self.financials = financials;
    }

    /// Replaces one collection with the rows of a header-first CSV file.
    /// Returns the number of records loaded.
    pub fn import_csv<R: Read>(&mut self, kind: RecordKind, reader: R) -> Result<usize> {
        let loaded = match kind {
            RecordKind::Deals => {
                let deals: Vec<Deal> = import_csv(reader)?;
                let count = deals.len();
                self.replace_deals(deals);
                count
            }
            RecordKind::Units => {
                let units: Vec<Unit> = import_csv(reader)?;
                let count = units.len();
                self.replace_units(units);
                count
            }
            RecordKind::Financials => {
                let financials: Vec<FinancialPeriod> = import_csv(reader)?;
                let count = financials.len();
                self.replace_financials(financials);
                count
            }
        };
        Ok(loaded)
    }

    /// Replaces one collection with a JSON array of row objects.
    pub fn import_json(&mut self, kind: RecordKind, json: &str) -> Result<usize> {
        let loaded = match kind {
            RecordKind::Deals => {
                let deals: Vec<Deal> = import_json(json)?;
                let count = deals.len();
                self.replace_deals(deals);
                count
            }
            RecordKind::Units => {
                let units: Vec<Unit> = import_json(json)?;
                let count = units.len();
                self.replace_units(units);
                count
            }
            RecordKind::Financials => {
                let financials: Vec<FinancialPeriod> = import_json(json)?;
                let count = financials.len();
                self.replace_financials(financials);
                count
            }
        };
        Ok(loaded)
    }

    pub fn deal(&self, id: &str) -> Option<&Deal> {
        self.deals.iter().find(|d| d.id == id)
    }

    pub fn units_for_deal<'a>(&'a self, deal_id: &'a str) -> impl Iterator<Item = &'a Unit> + 'a {
        self.units.iter().filter(move |u| u.deal_id == deal_id)
    }

    pub fn financials_for_deal<'a>(
        &'a self,
        deal_id: &'a str,
    ) -> impl Iterator<Item = &'a FinancialPeriod> + 'a {
        self.financials.iter().filter(move |f| f.deal_id == deal_id)
    }

    pub fn len(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Deals => self.deals.len(),
            RecordKind::Units => self.units.len(),
            RecordKind::Financials => self.financials.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.deals.is_empty() && self.units.is_empty() && self.financials.is_empty()
    }
}
