#![doc(test(attr(deny(warnings))))]

//! Gas Ledger records per-day sales of a commodity sold by weight, keeps each
//! day's running totals consistent with its sales, and persists everything as
//! a single JSON document.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Gas Ledger tracing initialized.");
    });
}
