//! Ledger data model: sales, day records, and the date-keyed ledger.

pub mod day_record;
pub mod ledger;
pub mod pricing;
pub mod sale;

pub use day_record::{DayRecord, Totals};
pub use ledger::Ledger;
pub use pricing::{InputMode, Pricing};
pub use sale::Sale;
