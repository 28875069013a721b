//! Ledger operations, the manager facade, and shared helpers.

pub mod clock;
pub mod format;
pub mod ledger_manager;
pub mod services;
pub mod utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ledger_manager::{LedgerManager, NewDayReport};
