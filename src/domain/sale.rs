use serde::{Deserialize, Serialize};

/// One recorded transaction. Never edited after creation, only removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "kg")]
    pub weight: f64,
    pub amount: f64,
    pub profit: f64,
    pub time: String,
}

impl Sale {
    pub fn new(weight: f64, amount: f64, profit: f64, time: impl Into<String>) -> Self {
        Self {
            weight,
            amount,
            profit,
            time: time.into(),
        }
    }
}
