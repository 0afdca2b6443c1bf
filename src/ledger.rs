//! Append-only result store. Rows live in a JSON-rows file: a header row
//! first, then one positional 8-field array per saved result. Only this
//! module touches the store.

use std::env;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use thiserror::Error;

pub const HEADERS: [&str; 8] = [
    "timestamp_iso",
    "note",
    "roll",
    "base_gold",
    "wheel_multiplier",
    "narrative_pct",
    "raw_total",
    "final_award_gp",
];

/// Column index of `final_award_gp`, the one the aggregate scan sums.
const AWARD_COLUMN: usize = 7;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger not configured: {0}")]
    Config(String),
    #[error("could not open ledger: {0}")]
    Connection(String),
    #[error("header check failed: {0}")]
    Schema(String),
    #[error("append failed: {0}")]
    Append(String),
    #[error("fetch failed: {0}")]
    Fetch(String),
}

/// Where the store lives. Resolved once at startup; read-only afterwards.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub path: PathBuf,
}

impl LedgerConfig {
    /// Resolve the store location from the environment. Exactly one source
    /// is required: `GOLD_LEDGER_FILE` (or the legacy `LEDGER_FILE`) names
    /// the file directly, otherwise `GOLD_LEDGER_DIR` plus the sheet name
    /// in `GOLD_LEDGER_SHEET` (default "Sheet1").
    pub fn from_env() -> Result<Self, LedgerError> {
        if let Some(file) = env_nonempty("GOLD_LEDGER_FILE").or_else(|| env_nonempty("LEDGER_FILE"))
        {
            return Ok(Self { path: file.into() });
        }
        let Some(dir) = env_nonempty("GOLD_LEDGER_DIR") else {
            return Err(LedgerError::Config(
                "set GOLD_LEDGER_FILE or GOLD_LEDGER_DIR".into(),
            ));
        };
        let sheet = env_nonempty("GOLD_LEDGER_SHEET").unwrap_or_else(|| "Sheet1".into());
        Ok(Self {
            path: Path::new(&dir).join(format!("{sheet}.jsonl")),
        })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Totals derived by rescanning the award column.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LedgerAggregate {
    pub total_gold: f64,
    pub job_count: u64,
}

/// One saved result, never mutated after append.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub timestamp: DateTime<Local>,
    pub note: String,
    pub roll: i64,
    pub base_gold: f64,
    pub wheel_multiplier: f64,
    pub narrative_pct: f64,
    pub raw_total: f64,
    pub final_award_gp: i64,
}

/// Wire form of a record: a tuple struct serializes as a positional JSON
/// array, matching the header order.
#[derive(Debug, Serialize)]
struct Row(String, String, i64, f64, f64, f64, f64, i64);

impl ResultRecord {
    fn to_row(&self) -> Row {
        Row(
            self.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
            self.note.clone(),
            self.roll,
            round_to(self.base_gold, 2),
            self.wheel_multiplier,
            round_to(self.narrative_pct, 4),
            round_to(self.raw_total, 2),
            self.final_award_gp,
        )
    }
}

fn round_to(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value * scale).round() / scale
}

/// Handle to an opened store. Cheap to clone; every operation is a single
/// attempt with no retries.
#[derive(Debug, Clone)]
pub struct LedgerClient {
    path: PathBuf,
}

impl LedgerClient {
    /// Open (or create) the store at the configured path. Header setup is
    /// best-effort; a failure there leaves the store usable.
    pub fn connect(config: &LedgerConfig) -> Result<Self, LedgerError> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| LedgerError::Connection(format!("{}: {e}", parent.display())))?;
            }
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.path)
            .map_err(|e| LedgerError::Connection(format!("{}: {e}", config.path.display())))?;
        let client = Self {
            path: config.path.clone(),
        };
        let _ = client.ensure_schema();
        Ok(client)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the header row if the store is still empty. Idempotent.
    pub fn ensure_schema(&self) -> Result<(), LedgerError> {
        let empty = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        if !empty {
            return Ok(());
        }
        let header =
            serde_json::to_string(&HEADERS).map_err(|e| LedgerError::Schema(e.to_string()))?;
        self.append_line(&header)
            .map_err(|e| LedgerError::Schema(e.to_string()))
    }

    /// Append one result row. The caller surfaces failures; nothing is
    /// retried here.
    pub fn append(&self, record: &ResultRecord) -> Result<(), LedgerError> {
        let line = serde_json::to_string(&record.to_row())
            .map_err(|e| LedgerError::Append(e.to_string()))?;
        self.append_line(&line)
            .map_err(|e| LedgerError::Append(e.to_string()))
    }

    fn append_line(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }

    /// Full rescan of the award column: sum every parseable value and
    /// count the rows that held one. The header row and malformed lines
    /// are skipped, not errors.
    pub fn fetch_aggregate(&self) -> Result<LedgerAggregate, LedgerError> {
        let file = fs::File::open(&self.path)
            .map_err(|e| LedgerError::Fetch(format!("{}: {e}", self.path.display())))?;
        let mut aggregate = LedgerAggregate::default();
        for line in BufReader::new(file).lines().skip(1) {
            let line = line.map_err(|e| LedgerError::Fetch(e.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            let Ok(row) = serde_json::from_str::<Vec<serde_json::Value>>(&line) else {
                continue;
            };
            let Some(value) = row.get(AWARD_COLUMN).and_then(cell_as_f64) else {
                continue;
            };
            aggregate.total_gold += value;
            aggregate.job_count += 1;
        }
        Ok(aggregate)
    }
}

fn cell_as_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
