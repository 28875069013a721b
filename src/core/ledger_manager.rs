use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::NaiveDate;
use tracing::info;

use crate::core::clock::{Clock, SystemClock};
use crate::core::services::{ExportService, SaleService};
use crate::domain::{DayRecord, InputMode, Ledger, Pricing, Sale};
use crate::errors::{LedgerError, Result};
use crate::storage::StorageBackend;

const NEW_DAY_BACKUP_NOTE: &str = "before new day";

/// Outcome of a manual day reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDayReport {
    pub date: NaiveDate,
    pub discarded_sales: usize,
    pub backup: Option<String>,
}

/// Facade that runs every ledger operation as one load → transform → save cycle.
pub struct LedgerManager {
    storage: Box<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
}

impl LedgerManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    pub fn with_clock(storage: Box<dyn StorageBackend>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Fail-soft read of the whole ledger.
    pub fn load(&self) -> Ledger {
        self.storage.load()
    }

    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        self.storage.save(ledger)
    }

    /// Returns today's record, persisting a zeroed one first if none exists.
    pub fn get_or_create_today(&self) -> Result<DayRecord> {
        let today = self.today();
        let mut ledger = self.load();
        if let Some(record) = ledger.day(today) {
            return Ok(record.clone());
        }
        let record = ledger.day_or_default(today).clone();
        self.save(&ledger)?;
        info!(date = %today, "created day record");
        Ok(record)
    }

    pub fn sell(&self, value: f64, mode: InputMode, pricing: &Pricing) -> Result<Sale> {
        let today = self.today();
        let mut ledger = self.load();
        let sale = SaleService::record_sale(
            ledger.day_or_default(today),
            value,
            mode,
            pricing,
            self.clock.sale_time(),
        )?;
        self.save(&ledger)?;
        info!(date = %today, kg = sale.weight, amount = sale.amount, "sale registered");
        Ok(sale)
    }

    pub fn undo_last(&self) -> Result<Sale> {
        let today = self.today();
        let mut ledger = self.load();
        let record = ledger.day_mut(today).ok_or(LedgerError::EmptyHistory)?;
        let sale = SaleService::undo_last(record)?;
        self.save(&ledger)?;
        info!(date = %today, kg = sale.weight, "last sale undone");
        Ok(sale)
    }

    pub fn delete_sale(&self, date: NaiveDate, index: usize) -> Result<Sale> {
        let mut ledger = self.load();
        let record = ledger.day_mut(date).ok_or(LedgerError::UnknownDay(date))?;
        let sale = SaleService::delete_at(record, index)?;
        self.save(&ledger)?;
        info!(date = %date, index, "sale deleted");
        Ok(sale)
    }

    /// Resets today's record. Sales it held are snapshotted to a backup first.
    pub fn start_new_day(&self) -> Result<NewDayReport> {
        let today = self.today();
        let mut ledger = self.load();
        let backup = match ledger.day(today) {
            Some(record) if !record.is_empty() => {
                Some(self.storage.backup(&ledger, Some(NEW_DAY_BACKUP_NOTE))?)
            }
            _ => None,
        };
        let discarded_sales = SaleService::start_new_day(&mut ledger, today);
        self.save(&ledger)?;
        info!(date = %today, discarded_sales, "started new day");
        Ok(NewDayReport {
            date: today,
            discarded_sales,
            backup,
        })
    }

    /// Writes today's sales as CSV into `dir`.
    pub fn export_today(&self, dir: &Path) -> Result<PathBuf> {
        let today = self.today();
        let ledger = self.load();
        let record = ledger.day(today).ok_or(LedgerError::EmptyHistory)?;
        ExportService::export_to_dir(record, today, dir)
    }
}
