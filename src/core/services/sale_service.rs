//! Sale lifecycle: recording, undoing, deleting, and day resets.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{DayRecord, InputMode, Ledger, Pricing, Sale, Totals};
use crate::errors::{LedgerError, Result};

/// Weight, amount, and profit a quantity would produce at the given prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub weight: f64,
    pub amount: f64,
    pub profit: f64,
}

impl Quote {
    pub fn totals(&self) -> Totals {
        Totals {
            kg: self.weight,
            amount: self.amount,
            profit: self.profit,
        }
    }
}

/// Pure transformations over a [`DayRecord`] or [`Ledger`].
pub struct SaleService;

impl SaleService {
    /// Parses the operator's raw quantity, rejecting anything non-numeric.
    pub fn parse_quantity(input: &str) -> Result<f64> {
        let trimmed = input.trim();
        let value = trimmed.parse::<f64>().map_err(|_| {
            LedgerError::InvalidInput(format!("`{}` is not a number", trimmed))
        })?;
        Self::check_quantity(value)?;
        Ok(value)
    }

    /// Computes what a sale of `value` would record without mutating anything.
    pub fn quote(value: f64, mode: InputMode, pricing: &Pricing) -> Result<Quote> {
        Self::check_quantity(value)?;
        pricing.validate(mode)?;
        let (weight, amount) = match mode {
            InputMode::Money => (value / pricing.selling_per_kg, value),
            InputMode::Weight => (value, value * pricing.selling_per_kg),
        };
        let quote = Quote {
            weight,
            amount,
            profit: weight * pricing.margin_per_kg(),
        };
        if !quote.totals().is_finite() {
            return Err(LedgerError::InvalidInput(
                "quantity is too large to price".into(),
            ));
        }
        Ok(quote)
    }

    /// Appends a sale to `record` and returns it.
    pub fn record_sale(
        record: &mut DayRecord,
        value: f64,
        mode: InputMode,
        pricing: &Pricing,
        time: impl Into<String>,
    ) -> Result<Sale> {
        let quote = Self::quote(value, mode, pricing)?;
        // Non-finite totals would persist as `null` and poison the document.
        if !(record.totals() + quote.totals()).is_finite() {
            return Err(LedgerError::InvalidInput(
                "sale would push the day's totals out of range".into(),
            ));
        }
        let sale = Sale::new(quote.weight, quote.amount, quote.profit, time);
        record.push_sale(sale.clone());
        debug!(
            kg = sale.weight,
            amount = sale.amount,
            profit = sale.profit,
            "sale recorded"
        );
        Ok(sale)
    }

    /// Removes the most recent sale.
    pub fn undo_last(record: &mut DayRecord) -> Result<Sale> {
        record.pop_sale().ok_or(LedgerError::EmptyHistory)
    }

    /// Removes the sale at `index`, keeping the others in order.
    pub fn delete_at(record: &mut DayRecord, index: usize) -> Result<Sale> {
        let len = record.transaction_count();
        record
            .remove_sale(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })
    }

    /// Replaces the record for `date` with a zeroed one.
    ///
    /// The previous sales for that date are gone afterwards; returns how many
    /// were discarded.
    pub fn start_new_day(ledger: &mut Ledger, date: NaiveDate) -> usize {
        ledger
            .insert_day(date, DayRecord::new())
            .map(|previous| previous.transaction_count())
            .unwrap_or(0)
    }

    fn check_quantity(value: f64) -> Result<()> {
        if !value.is_finite() || value <= 0.0 {
            return Err(LedgerError::InvalidInput(
                "enter a valid amount or KG greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn pricing() -> Pricing {
        Pricing::new(1000.0, 900.0)
    }

    #[test]
    fn by_weight_computes_amount_and_profit() {
        let mut record = DayRecord::new();
        let sale =
            SaleService::record_sale(&mut record, 5.0, InputMode::Weight, &pricing(), "10:00:00")
                .unwrap();
        assert!((sale.amount - 5000.0).abs() < TOLERANCE);
        assert!((sale.profit - 500.0).abs() < TOLERANCE);
        assert_eq!(record.transaction_count(), 1);
    }

    #[test]
    fn by_money_derives_weight() {
        let mut record = DayRecord::new();
        let sale =
            SaleService::record_sale(&mut record, 2000.0, InputMode::Money, &pricing(), "10:00:00")
                .unwrap();
        assert_eq!(format!("{:.2}", sale.weight), "2.00");
        assert!((sale.profit - 200.0).abs() < TOLERANCE);
    }

    #[test]
    fn rejects_non_positive_and_non_numeric_quantities() {
        let mut record = DayRecord::new();
        for value in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let err =
                SaleService::record_sale(&mut record, value, InputMode::Weight, &pricing(), "t")
                    .expect_err("quantity must be rejected");
            assert!(matches!(err, LedgerError::InvalidInput(_)));
        }
        assert!(SaleService::parse_quantity("abc").is_err());
        assert!(SaleService::parse_quantity("").is_err());
        assert!(SaleService::parse_quantity("-3").is_err());
        assert_eq!(SaleService::parse_quantity(" 2.5 ").unwrap(), 2.5);
        assert!(record.is_empty());
    }

    #[test]
    fn zero_selling_price_rejected_in_money_mode() {
        let mut record = DayRecord::new();
        let err = SaleService::record_sale(
            &mut record,
            500.0,
            InputMode::Money,
            &Pricing::new(0.0, 0.0),
            "t",
        )
        .expect_err("division by zero must be rejected");
        assert!(matches!(err, LedgerError::InvalidInput(_)));
        assert!(record.is_empty());
    }

    #[test]
    fn rejects_quantities_whose_price_overflows() {
        let mut record = DayRecord::new();
        assert!(matches!(
            SaleService::quote(1e306, InputMode::Weight, &pricing()),
            Err(LedgerError::InvalidInput(_))
        ));
        let err = SaleService::record_sale(&mut record, 1e306, InputMode::Weight, &pricing(), "t")
            .expect_err("infinite amount must be rejected");
        assert!(matches!(err, LedgerError::InvalidInput(_)));
        assert!(record.is_empty());
    }

    #[test]
    fn rejects_sale_that_overflows_running_totals() {
        let mut record = DayRecord::new();
        SaleService::record_sale(&mut record, 1e305, InputMode::Weight, &pricing(), "a").unwrap();
        let before = record.clone();
        let err = SaleService::record_sale(&mut record, 1.7e305, InputMode::Weight, &pricing(), "b")
            .expect_err("running total would overflow");
        assert!(matches!(err, LedgerError::InvalidInput(_)));
        assert_eq!(record, before);
    }

    #[test]
    fn totals_match_sales_after_every_sale() {
        let mut record = DayRecord::new();
        let inputs = [
            (0.7, InputMode::Weight),
            (1234.5, InputMode::Money),
            (3.3, InputMode::Weight),
            (99.99, InputMode::Money),
        ];
        for (value, mode) in inputs {
            SaleService::record_sale(&mut record, value, mode, &pricing(), "t").unwrap();
            assert!(record.totals().approx_eq(&record.sum_of_sales(), TOLERANCE));
        }
    }

    #[test]
    fn undo_on_empty_record_fails() {
        let mut record = DayRecord::new();
        assert_eq!(
            SaleService::undo_last(&mut record),
            Err(LedgerError::EmptyHistory)
        );
    }

    #[test]
    fn undo_then_resell_restores_totals() {
        let mut record = DayRecord::new();
        SaleService::record_sale(&mut record, 2.0, InputMode::Weight, &pricing(), "a").unwrap();
        SaleService::record_sale(&mut record, 1.25, InputMode::Weight, &pricing(), "b").unwrap();
        let before = record.totals();

        SaleService::undo_last(&mut record).unwrap();
        SaleService::record_sale(&mut record, 1.25, InputMode::Weight, &pricing(), "b").unwrap();
        assert!(record.totals().approx_eq(&before, TOLERANCE));
    }

    #[test]
    fn delete_at_preserves_order_of_remaining_sales() {
        let mut record = DayRecord::new();
        for (idx, weight) in [1.0, 2.0, 3.0, 4.0].into_iter().enumerate() {
            SaleService::record_sale(
                &mut record,
                weight,
                InputMode::Weight,
                &pricing(),
                format!("t{idx}"),
            )
            .unwrap();
        }
        let removed = SaleService::delete_at(&mut record, 1).unwrap();
        assert_eq!(removed.time, "t1");
        let times: Vec<_> = record.sales.iter().map(|s| s.time.as_str()).collect();
        assert_eq!(times, ["t0", "t2", "t3"]);
        assert!(record.totals().approx_eq(&record.sum_of_sales(), TOLERANCE));
    }

    #[test]
    fn delete_at_out_of_range_fails() {
        let mut record = DayRecord::new();
        SaleService::record_sale(&mut record, 1.0, InputMode::Weight, &pricing(), "t").unwrap();
        assert_eq!(
            SaleService::delete_at(&mut record, 1),
            Err(LedgerError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn start_new_day_discards_existing_sales() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 2).unwrap();
        let mut ledger = Ledger::new();
        let record = ledger.day_or_default(date);
        SaleService::record_sale(record, 3.0, InputMode::Weight, &pricing(), "t").unwrap();

        let discarded = SaleService::start_new_day(&mut ledger, date);
        assert_eq!(discarded, 1);
        let fresh = ledger.day(date).unwrap();
        assert!(fresh.is_empty());
        assert_eq!(fresh.total_kg, 0.0);
        assert_eq!(fresh.total_amount, 0.0);
        assert_eq!(fresh.total_profit, 0.0);
    }
}
