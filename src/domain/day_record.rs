use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use super::sale::Sale;

/// Weight, amount, and profit summed over some set of sales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub kg: f64,
    pub amount: f64,
    pub profit: f64,
}

impl Totals {
    pub fn approx_eq(&self, other: &Totals, tolerance: f64) -> bool {
        (self.kg - other.kg).abs() <= tolerance
            && (self.amount - other.amount).abs() <= tolerance
            && (self.profit - other.profit).abs() <= tolerance
    }

    pub fn is_finite(&self) -> bool {
        self.kg.is_finite() && self.amount.is_finite() && self.profit.is_finite()
    }
}

impl Add for Totals {
    type Output = Totals;

    fn add(self, rhs: Totals) -> Totals {
        Totals {
            kg: self.kg + rhs.kg,
            amount: self.amount + rhs.amount,
            profit: self.profit + rhs.profit,
        }
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, rhs: Totals) {
        *self = *self + rhs;
    }
}

/// Running totals and the ordered sales of one calendar date.
///
/// The totals always equal the sum of the corresponding sale fields. Every
/// mutation goes through [`DayRecord::push_sale`], [`DayRecord::pop_sale`],
/// or [`DayRecord::remove_sale`], which keep both sides in step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub total_kg: f64,
    pub total_amount: f64,
    pub total_profit: f64,
    #[serde(default)]
    pub sales: Vec<Sale>,
}

impl DayRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn totals(&self) -> Totals {
        Totals {
            kg: self.total_kg,
            amount: self.total_amount,
            profit: self.total_profit,
        }
    }

    /// Totals recomputed from the sales list, ignoring the stored running totals.
    pub fn sum_of_sales(&self) -> Totals {
        self.sales.iter().fold(Totals::default(), |acc, sale| Totals {
            kg: acc.kg + sale.weight,
            amount: acc.amount + sale.amount,
            profit: acc.profit + sale.profit,
        })
    }

    pub fn transaction_count(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    pub fn push_sale(&mut self, sale: Sale) {
        self.total_kg += sale.weight;
        self.total_amount += sale.amount;
        self.total_profit += sale.profit;
        self.sales.push(sale);
    }

    pub fn pop_sale(&mut self) -> Option<Sale> {
        let sale = self.sales.pop()?;
        self.subtract(&sale);
        Some(sale)
    }

    pub fn remove_sale(&mut self, index: usize) -> Option<Sale> {
        if index >= self.sales.len() {
            return None;
        }
        let sale = self.sales.remove(index);
        self.subtract(&sale);
        Some(sale)
    }

    fn subtract(&mut self, sale: &Sale) {
        self.total_kg -= sale.weight;
        self.total_amount -= sale.amount;
        self.total_profit -= sale.profit;
        // An empty day carries no float residue.
        if self.sales.is_empty() {
            self.total_kg = 0.0;
            self.total_amount = 0.0;
            self.total_profit = 0.0;
        }
    }
}
