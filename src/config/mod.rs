use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tracing::warn;

use crate::{
    core::utils::{ensure_dir, PathResolver},
    domain::{pricing::validate_price, InputMode, Pricing},
    errors::{LedgerError, Result},
};

const TMP_SUFFIX: &str = "tmp";

pub const DEFAULT_SELLING_PRICE: f64 = 1000.0;
pub const DEFAULT_COST_PRICE: f64 = 900.0;

/// Operator preferences persisted alongside the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub selling_price_per_kg: f64,
    pub cost_price_per_kg: f64,
    pub input_mode: InputMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            selling_price_per_kg: DEFAULT_SELLING_PRICE,
            cost_price_per_kg: DEFAULT_COST_PRICE,
            input_mode: InputMode::default(),
        }
    }
}

impl Settings {
    pub fn pricing(&self) -> Pricing {
        Pricing::new(self.selling_price_per_kg, self.cost_price_per_kg)
    }

    pub fn set_selling_price(&mut self, value: f64) -> Result<()> {
        validate_price("selling price", value)?;
        self.selling_price_per_kg = value;
        Ok(())
    }

    pub fn set_cost_price(&mut self, value: f64) -> Result<()> {
        validate_price("cost price", value)?;
        self.cost_price_per_kg = value;
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Loads settings, falling back to defaults when the file is missing or unreadable.
    pub fn load(&self) -> Settings {
        match self.try_load() {
            Ok(settings) => settings,
            Err(err) => {
                warn!(error = %err, path = %self.path.display(), "settings unreadable, using defaults");
                Settings::default()
            }
        }
    }

    pub fn try_load(&self) -> Result<Settings> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Settings::default()),
            Err(err) => return Err(err.into()),
        };
        let settings: Settings = serde_json::from_str(&data)?;
        settings.pricing().validate(InputMode::Weight).map_err(|err| {
            LedgerError::InvalidInput(format!("stored settings rejected: {}", err))
        })?;
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        let tmp = tmp_path(&self.path);
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    tmp.set_extension(format!("json.{}", TMP_SUFFIX));
    tmp
}
