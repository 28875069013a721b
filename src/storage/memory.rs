use std::sync::{Mutex, MutexGuard};

use crate::{
    domain::Ledger,
    errors::{LedgerError, Result},
};

use super::StorageBackend;

/// Keeps the serialized ledger in memory, the way a browser key-value slot would.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    document: Mutex<Option<String>>,
    backups: Mutex<Vec<(String, String)>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a raw document, malformed or not.
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(document.into())),
            backups: Mutex::new(Vec::new()),
        }
    }

    pub fn document(&self) -> Option<String> {
        lock(&self.document).ok().and_then(|guard| guard.clone())
    }

    pub fn backup_document(&self, name: &str) -> Option<String> {
        lock(&self.backups).ok().and_then(|guard| {
            guard
                .iter()
                .find(|(entry, _)| entry == name)
                .map(|(_, doc)| doc.clone())
        })
    }
}

impl StorageBackend for MemoryStorage {
    fn try_load(&self) -> Result<Ledger> {
        match self.document() {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(Ledger::new()),
        }
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        let json = serde_json::to_string(ledger)?;
        *lock(&self.document)? = Some(json);
        Ok(())
    }

    fn backup(&self, ledger: &Ledger, note: Option<&str>) -> Result<String> {
        let json = serde_json::to_string(ledger)?;
        let mut backups = lock(&self.backups)?;
        let mut name = format!("snapshot-{}", backups.len() + 1);
        if let Some(note) = note.map(str::trim).filter(|note| !note.is_empty()) {
            name.push('-');
            name.push_str(note);
        }
        backups.push((name.clone(), json));
        Ok(name)
    }

    fn set_aside_unreadable(&self) -> Result<Option<String>> {
        let mut document = lock(&self.document)?;
        let unreadable = match document.as_deref() {
            Some(data) => serde_json::from_str::<Ledger>(data).is_err(),
            None => false,
        };
        if !unreadable {
            return Ok(None);
        }
        let Some(data) = document.take() else {
            return Ok(None);
        };
        let mut backups = lock(&self.backups)?;
        let name = format!("snapshot-{}-unreadable", backups.len() + 1);
        backups.push((name.clone(), data));
        Ok(Some(name))
    }

    fn list_backups(&self) -> Result<Vec<String>> {
        let backups = lock(&self.backups)?;
        Ok(backups.iter().rev().map(|(name, _)| name.clone()).collect())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| LedgerError::StorageUnavailable("memory store poisoned".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sale;
    use chrono::NaiveDate;

    #[test]
    fn save_day_is_read_modify_write() {
        let storage = MemoryStorage::new();
        let first = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let second = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();

        let mut record = storage.load_day(first).unwrap_or_default();
        record.push_sale(Sale::new(1.0, 1000.0, 100.0, "t"));
        storage.save_day(first, record).unwrap();
        storage.save_day(second, Default::default()).unwrap();

        let ledger = storage.load();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.day(first).unwrap().transaction_count(), 1);
    }

    #[test]
    fn malformed_document_loads_empty() {
        let storage = MemoryStorage::with_document("[1, 2");
        assert!(storage.try_load().is_err());
        assert!(storage.load().is_empty());
        assert_eq!(storage.document(), None);
        assert_eq!(
            storage.backup_document("snapshot-1-unreadable").as_deref(),
            Some("[1, 2")
        );
    }

    #[test]
    fn backups_list_newest_first() {
        let storage = MemoryStorage::new();
        let ledger = Ledger::new();
        storage.backup(&ledger, Some("a")).unwrap();
        storage.backup(&ledger, None).unwrap();
        assert_eq!(
            storage.list_backups().unwrap(),
            ["snapshot-2", "snapshot-1-a"]
        );
        assert_eq!(storage.backup_document("snapshot-1-a").as_deref(), Some("{}"));
    }
}
