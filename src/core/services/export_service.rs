//! CSV export of a single day's sales.

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use tracing::info;

use crate::core::format::two_decimals;
use crate::core::utils::ensure_dir;
use crate::domain::DayRecord;
use crate::errors::{LedgerError, Result};

pub const CSV_HEADER: [&str; 4] = ["Time", "KG", "Amount", "Profit"];

pub struct ExportService;

impl ExportService {
    pub fn file_name(date: NaiveDate) -> String {
        format!("GasSales_{}.csv", date.format("%Y-%m-%d"))
    }

    /// Writes the header and one row per sale in chronological order.
    pub fn write_csv<W: Write>(record: &DayRecord, writer: W) -> Result<()> {
        if record.is_empty() {
            return Err(LedgerError::EmptyHistory);
        }
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(CSV_HEADER)?;
        for sale in &record.sales {
            csv.write_record([
                sale.time.clone(),
                two_decimals(sale.weight),
                two_decimals(sale.amount),
                two_decimals(sale.profit),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Writes `GasSales_<date>.csv` into `dir` and returns its path.
    pub fn export_to_dir(record: &DayRecord, date: NaiveDate, dir: &Path) -> Result<PathBuf> {
        if record.is_empty() {
            return Err(LedgerError::EmptyHistory);
        }
        ensure_dir(dir)?;
        let path = dir.join(Self::file_name(date));
        let file = File::create(&path)?;
        Self::write_csv(record, file)?;
        info!(path = %path.display(), sales = record.transaction_count(), "exported day");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sale;

    #[test]
    fn writes_header_and_two_decimal_rows() {
        let mut record = DayRecord::new();
        record.push_sale(Sale::new(2.0, 2000.0, 200.0, "08:00:00"));
        record.push_sale(Sale::new(1.0 / 3.0, 333.333, -5.5, "09:30:15"));

        let mut buffer = Vec::new();
        ExportService::write_csv(&record, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "Time,KG,Amount,Profit\n08:00:00,2.00,2000.00,200.00\n09:30:15,0.33,333.33,-5.50\n"
        );
    }

    #[test]
    fn empty_day_has_nothing_to_export() {
        let mut buffer = Vec::new();
        assert_eq!(
            ExportService::write_csv(&DayRecord::new(), &mut buffer),
            Err(LedgerError::EmptyHistory)
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(ExportService::file_name(date), "GasSales_2025-01-09.csv");
    }
}
