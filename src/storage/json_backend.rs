use chrono::Local;
use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    domain::Ledger,
    errors::Result,
};

use super::StorageBackend;

const BACKUP_PREFIX: &str = "gas_sales";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;
const UNREADABLE_NOTE: &str = "unreadable";

/// Ledger persisted as a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    ledger_file: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let backups_dir = PathResolver::backup_dir_in(&app_root);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            ledger_file: PathResolver::ledger_file_in(&app_root),
            root: app_root,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_file
    }

    pub fn backup_path(&self, backup_name: &str) -> PathBuf {
        self.backups_dir.join(backup_name)
    }

    /// Timestamped backup name, suffixed `_02`, `_03`, ... when the second is taken.
    fn next_backup_name(&self, note: Option<&str>) -> String {
        let timestamp = Local::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut file_stem = format!("{}_{}", BACKUP_PREFIX, timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            file_stem.push('_');
            file_stem.push_str(&label);
        }
        let mut name = format!("{}.{}", file_stem, BACKUP_EXTENSION);
        let mut attempt = 2;
        while self.backup_path(&name).exists() {
            name = format!("{}_{:02}.{}", file_stem, attempt, BACKUP_EXTENSION);
            attempt += 1;
        }
        name
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        if backups.len() <= self.retention {
            return Ok(());
        }
        for entry in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backup_path(entry));
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn try_load(&self) -> Result<Ledger> {
        let data = match fs::read_to_string(&self.ledger_file) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Ledger::new()),
            Err(err) => return Err(err.into()),
        };
        if data.trim().is_empty() {
            return Ok(Ledger::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        let json = serde_json::to_string_pretty(ledger)?;
        let tmp = tmp_path(&self.ledger_file);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.ledger_file)?;
        debug!(days = ledger.len(), path = %self.ledger_file.display(), "ledger saved");
        Ok(())
    }

    fn backup(&self, ledger: &Ledger, note: Option<&str>) -> Result<String> {
        ensure_dir(&self.backups_dir)?;
        let name = self.next_backup_name(note);
        let json = serde_json::to_string_pretty(ledger)?;
        write_atomic(&self.backup_path(&name), &json)?;
        self.prune_backups()?;
        info!(backup = %name, "ledger snapshot written");
        Ok(name)
    }

    fn set_aside_unreadable(&self) -> Result<Option<String>> {
        // Only a document that reads but does not parse is moved; I/O failures stay put.
        let Ok(data) = fs::read_to_string(&self.ledger_file) else {
            return Ok(None);
        };
        if data.trim().is_empty() || serde_json::from_str::<Ledger>(&data).is_ok() {
            return Ok(None);
        }
        ensure_dir(&self.backups_dir)?;
        let name = self.next_backup_name(Some(UNREADABLE_NOTE));
        fs::rename(&self.ledger_file, self.backup_path(&name))?;
        Ok(Some(name))
    }

    fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let file_name = match path.file_name().and_then(|name| name.to_str()) {
                Some(name) if name.starts_with(BACKUP_PREFIX) => name.to_string(),
                _ => continue,
            };
            entries.push(file_name);
        }
        // Timestamps are fixed width, so name order is chronological.
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries)
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
