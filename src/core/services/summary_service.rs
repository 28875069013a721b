use chrono::NaiveDate;

use crate::domain::{DayRecord, Ledger, Sale, Totals};

/// Read-only view of one day, sales listed newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary<'a> {
    pub date: NaiveDate,
    pub totals: Totals,
    pub transactions: usize,
    /// Each sale paired with its position in the day's chronological list.
    pub sales: Vec<(usize, &'a Sale)>,
}

impl<'a> DaySummary<'a> {
    pub fn from_record(date: NaiveDate, record: &'a DayRecord) -> Self {
        Self {
            date,
            totals: record.totals(),
            transactions: record.transaction_count(),
            sales: record.sales.iter().enumerate().rev().collect(),
        }
    }
}

pub struct SummaryService;

impl SummaryService {
    /// Grand totals across every day, taken from each record's stored totals.
    pub fn aggregate_all(ledger: &Ledger) -> Totals {
        ledger.grand_totals()
    }

    /// Every day, newest first.
    pub fn history(ledger: &Ledger) -> Vec<DaySummary<'_>> {
        let mut days: Vec<_> = ledger
            .iter()
            .map(|(date, record)| DaySummary::from_record(*date, record))
            .collect();
        days.sort_by(|a, b| b.date.cmp(&a.date));
        days
    }

    /// One day's view, or `None` when the ledger has no record for `date`.
    pub fn day(ledger: &Ledger, date: NaiveDate) -> Option<DaySummary<'_>> {
        ledger
            .day(date)
            .map(|record| DaySummary::from_record(date, record))
    }
}
