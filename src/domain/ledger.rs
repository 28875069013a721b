use std::collections::{btree_map, BTreeMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::day_record::{DayRecord, Totals};

/// Every day record, keyed by calendar date.
///
/// Serializes as a bare JSON object whose keys are ISO `YYYY-MM-DD` dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    days: BTreeMap<NaiveDate, DayRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days.get(&date)
    }

    pub fn day_mut(&mut self, date: NaiveDate) -> Option<&mut DayRecord> {
        self.days.get_mut(&date)
    }

    /// Returns the record for `date`, inserting a zeroed one when absent.
    pub fn day_or_default(&mut self, date: NaiveDate) -> &mut DayRecord {
        self.days.entry(date).or_default()
    }

    /// Stores `record` under `date`, returning whatever it replaced.
    pub fn insert_day(&mut self, date: NaiveDate, record: DayRecord) -> Option<DayRecord> {
        self.days.insert(date, record)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days in ascending date order.
    pub fn iter(&self) -> btree_map::Iter<'_, NaiveDate, DayRecord> {
        self.days.iter()
    }

    /// Sum of each record's stored totals.
    pub fn grand_totals(&self) -> Totals {
        self.days
            .values()
            .fold(Totals::default(), |acc, record| acc + record.totals())
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = (&'a NaiveDate, &'a DayRecord);
    type IntoIter = btree_map::Iter<'a, NaiveDate, DayRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}
