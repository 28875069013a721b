pub mod json_backend;
pub mod memory;

use chrono::NaiveDate;
use tracing::warn;

use crate::{
    domain::{DayRecord, Ledger},
    errors::Result,
};

/// Abstraction over persistence backends holding the whole ledger as one document.
pub trait StorageBackend: Send + Sync {
    /// Reads the persisted ledger. A missing document is an empty ledger.
    fn try_load(&self) -> Result<Ledger>;

    /// Overwrites the persisted ledger wholesale.
    fn save(&self, ledger: &Ledger) -> Result<()>;

    /// Writes a snapshot of `ledger` outside the live document and returns its name.
    fn backup(&self, ledger: &Ledger, note: Option<&str>) -> Result<String>;

    /// Snapshot names, newest first.
    fn list_backups(&self) -> Result<Vec<String>>;

    /// Moves a malformed document aside so the next save cannot overwrite it.
    /// Returns the backup name it now lives under, if anything was moved.
    fn set_aside_unreadable(&self) -> Result<Option<String>> {
        Ok(None)
    }

    /// Fail-soft load: unreadable or malformed state is treated as no data.
    fn load(&self) -> Ledger {
        match self.try_load() {
            Ok(ledger) => ledger,
            Err(err) => {
                warn!(error = %err, "ledger unreadable, starting from an empty ledger");
                match self.set_aside_unreadable() {
                    Ok(Some(name)) => warn!(backup = %name, "unreadable ledger kept as a backup"),
                    Ok(None) => {}
                    Err(err) => warn!(error = %err, "could not set the unreadable ledger aside"),
                }
                Ledger::new()
            }
        }
    }

    fn load_day(&self, date: NaiveDate) -> Option<DayRecord> {
        self.load().day(date).cloned()
    }

    /// Read-modify-write of a single day.
    fn save_day(&self, date: NaiveDate, record: DayRecord) -> Result<()> {
        let mut ledger = self.load();
        ledger.insert_day(date, record);
        self.save(&ledger)
    }
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;
