use std::sync::Mutex;

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Time format stamped on each sale.
pub const SALE_TIME_FORMAT: &str = "%H:%M:%S";

/// Clock abstracts access to the local wall clock so ledger operations stay
/// deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current local timestamp.
    fn now(&self) -> NaiveDateTime;

    /// Returns the current local date. Defaults to `now().date()`.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Time-of-day label recorded on a sale.
    fn sale_time(&self) -> String {
        self.now().format(SALE_TIME_FORMAT).to_string()
    }
}

/// Real-time clock backed by the system local time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to an adjustable instant.
#[derive(Debug)]
pub struct FixedClock {
    at: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self { at: Mutex::new(at) }
    }

    pub fn set(&self, at: NaiveDateTime) {
        if let Ok(mut guard) = self.at.lock() {
            *guard = at;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.at.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_date_and_sale_time() {
        let at = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(7, 5, 9)
            .unwrap();
        let clock = FixedClock::new(at);
        assert_eq!(clock.today(), at.date());
        assert_eq!(clock.sale_time(), "07:05:09");

        let later = at + chrono::Duration::days(1);
        clock.set(later);
        assert_eq!(clock.today(), later.date());
    }
}
