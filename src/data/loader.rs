use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::enrich::{enrich_daily, enrich_hourly};
use super::model::{DailyRecord, Dataset, HourlyRecord, SharedDataset};

pub const DAILY_FILE: &str = "day.csv";
pub const HOURLY_FILE: &str = "hour.csv";

const DAILY_COLUMNS: &[&str] = &[
    "instant", "dteday", "season", "yr", "mnth", "holiday", "weekday", "workingday",
    "weathersit", "temp", "atemp", "hum", "windspeed", "casual", "registered", "cnt",
];

const HOURLY_COLUMNS: &[&str] = &[
    "instant", "dteday", "season", "yr", "mnth", "hr", "holiday", "weekday", "workingday",
    "weathersit", "temp", "atemp", "hum", "windspeed", "casual", "registered", "cnt",
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("Data file '{0}' not found")]
    NotFound(PathBuf),

    #[error("Failed to read data file '{0}'")]
    Unreadable(PathBuf, #[source] io::Error),

    #[error("Data file '{path}' is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Malformed row in '{path}' at line {line}")]
    Malformed {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },
}

// ---------------------------------------------------------------------------
// CSV readers
// ---------------------------------------------------------------------------

/// Read `day.csv`-shaped data.
pub fn load_daily(path: &Path) -> Result<Vec<DailyRecord>, DataLoadError> {
    let records: Vec<DailyRecord> = read_records(path, DAILY_COLUMNS)?;
    check_rows(
        path,
        records
            .iter()
            .map(|r| (r.date, r.weekday, r.casual, r.registered, r.cnt)),
    );
    Ok(records)
}

/// Read `hour.csv`-shaped data.
pub fn load_hourly(path: &Path) -> Result<Vec<HourlyRecord>, DataLoadError> {
    let records: Vec<HourlyRecord> = read_records(path, HOURLY_COLUMNS)?;
    check_rows(
        path,
        records
            .iter()
            .map(|r| (r.date, r.weekday, r.casual, r.registered, r.cnt)),
    );
    Ok(records)
}

/// Read both files from `dir` and enrich them.
pub fn load(dir: &Path) -> Result<Dataset, DataLoadError> {
    let daily = load_daily(&dir.join(DAILY_FILE))?;
    let hourly = load_hourly(&dir.join(HOURLY_FILE))?;
    log::info!(
        "Loaded {} daily and {} hourly rows from {}",
        daily.len(),
        hourly.len(),
        dir.display()
    );
    Ok(Dataset::new(enrich_daily(&daily), enrich_hourly(&hourly)))
}

fn read_records<T: DeserializeOwned>(
    path: &Path,
    required: &[&str],
) -> Result<Vec<T>, DataLoadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataLoadError::NotFound(path.to_path_buf()),
        _ => DataLoadError::Unreadable(path.to_path_buf(), e),
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(path, 1, e))?
        .clone();
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(DataLoadError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize().enumerate() {
        // header is line 1
        records.push(result.map_err(|e| csv_error(path, row_no as u64 + 2, e))?);
    }
    Ok(records)
}

fn csv_error(path: &Path, fallback_line: u64, e: csv::Error) -> DataLoadError {
    if e.is_io_error() {
        return DataLoadError::Unreadable(path.to_path_buf(), e.into());
    }
    let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
    DataLoadError::Malformed {
        path: path.to_path_buf(),
        line,
        source: e,
    }
}

/// Soft checks: logged, never fatal.
fn check_rows(path: &Path, rows: impl Iterator<Item = (NaiveDate, u8, u32, u32, u32)>) {
    let (mut bad_totals, mut bad_weekdays) = (0usize, 0usize);
    for (date, weekday, casual, registered, cnt) in rows {
        if u64::from(casual) + u64::from(registered) != u64::from(cnt) {
            bad_totals += 1;
        }
        if u32::from(weekday) != date.weekday().num_days_from_sunday() {
            bad_weekdays += 1;
        }
    }
    if bad_totals > 0 {
        log::warn!(
            "{}: {bad_totals} rows where cnt != casual + registered",
            path.display()
        );
    }
    if bad_weekdays > 0 {
        log::warn!(
            "{}: {bad_weekdays} rows whose weekday code is not the date's day counted from Sunday",
            path.display()
        );
    }
}

// ---------------------------------------------------------------------------
// Data providers
// ---------------------------------------------------------------------------

/// Source of the enriched dataset. Implementations decide when I/O happens.
pub trait DataProvider {
    fn dataset(&self) -> Result<SharedDataset, DataLoadError>;

    /// Drop anything cached so the next [`DataProvider::dataset`] call reads again.
    fn reload(&mut self);

    /// Human-readable origin, for the status bar and logs.
    fn describe(&self) -> String;
}

/// Reads `day.csv` and `hour.csv` from a directory once and caches the result.
pub struct CsvDataProvider {
    data_dir: PathBuf,
    cache: OnceCell<SharedDataset>,
}

impl CsvDataProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        CsvDataProvider {
            data_dir: data_dir.into(),
            cache: OnceCell::new(),
        }
    }

    #[cfg(test)]
    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }
}

impl DataProvider for CsvDataProvider {
    fn dataset(&self) -> Result<SharedDataset, DataLoadError> {
        let ds = self.cache.get_or_try_init(|| {
            log::info!("Reading dataset from {}", self.data_dir.display());
            load(&self.data_dir).map(Arc::new)
        })?;
        Ok(Arc::clone(ds))
    }

    fn reload(&mut self) {
        if self.cache.take().is_some() {
            log::info!("Dropped cached dataset from {}", self.data_dir.display());
        }
    }

    fn describe(&self) -> String {
        self.data_dir.display().to_string()
    }
}

/// Serves a dataset built in memory; no I/O at all.
#[cfg(test)]
pub struct StaticDataProvider {
    dataset: SharedDataset,
}

#[cfg(test)]
impl StaticDataProvider {
    pub fn new(dataset: Dataset) -> Self {
        StaticDataProvider {
            dataset: Arc::new(dataset),
        }
    }
}

#[cfg(test)]
impl DataProvider for StaticDataProvider {
    fn dataset(&self) -> Result<SharedDataset, DataLoadError> {
        Ok(Arc::clone(&self.dataset))
    }

    fn reload(&mut self) {}

    fn describe(&self) -> String {
        "in-memory dataset".to_string()
    }
}
