use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// How the operator's single number is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// The number is the currency amount the customer pays.
    #[default]
    Money,
    /// The number is the weight in kilograms.
    Weight,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Money => "money",
            InputMode::Weight => "weight",
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputMode {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "money" | "amount" => Ok(InputMode::Money),
            "weight" | "kg" => Ok(InputMode::Weight),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown input mode `{}` (use money or weight)",
                other
            ))),
        }
    }
}

/// Unit prices supplied by the caller on every ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub selling_per_kg: f64,
    pub cost_per_kg: f64,
}

impl Pricing {
    pub fn new(selling_per_kg: f64, cost_per_kg: f64) -> Self {
        Self {
            selling_per_kg,
            cost_per_kg,
        }
    }

    pub fn margin_per_kg(&self) -> f64 {
        self.selling_per_kg - self.cost_per_kg
    }

    /// Rejects prices that cannot produce a meaningful sale in `mode`.
    pub fn validate(&self, mode: InputMode) -> Result<()> {
        validate_price("selling price", self.selling_per_kg)?;
        validate_price("cost price", self.cost_per_kg)?;
        if mode == InputMode::Money && self.selling_per_kg == 0.0 {
            return Err(LedgerError::InvalidInput(
                "selling price must be greater than zero to sell by money".into(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_price(label: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(LedgerError::InvalidInput(format!(
            "{} must be a non-negative number",
            label
        )));
    }
    Ok(())
}
