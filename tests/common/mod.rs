use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use gas_ledger::{
    core::{FixedClock, LedgerManager},
    storage::JsonStorage,
};
use tempfile::TempDir;

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(hour, 0, 0)
        .expect("valid time")
}

/// Manager backed by JSON storage in a fresh temp dir and a pinned clock.
pub fn setup_manager(now: NaiveDateTime) -> (LedgerManager, Arc<FixedClock>, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let storage =
        JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).expect("json storage");
    let clock = Arc::new(FixedClock::new(now));
    let manager = LedgerManager::with_clock(Box::new(storage), clock.clone());
    (manager, clock, temp)
}
