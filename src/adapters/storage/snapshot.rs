//! Daily Snapshot Store
//!
//! Persists the enriched batch as one JSON document per UTC day. A later run
//! on the same day replaces that day's document.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::TokenRecord;
use crate::ports::{RecordSink, SinkError};

/// Default snapshot directory
pub const DEFAULT_SNAPSHOT_DIR: &str = "data/snapshots";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One persisted token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub pair_id: String,
    pub address: String,
    pub lp_address: String,
    pub symbol: String,
    pub name: String,
    pub market_cap: f64,
}

impl SnapshotEntry {
    /// Entry for a record with both identifiers, `None` otherwise
    fn from_record(record: &TokenRecord) -> Option<Self> {
        Some(Self {
            pair_id: record.pair_id()?.to_string(),
            address: record.address()?.to_string(),
            lp_address: record.pool_address().unwrap_or_default().to_string(),
            symbol: record.symbol.clone(),
            name: record.name.clone(),
            market_cap: record.market_cap,
        })
    }
}

/// The document stored for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySnapshot {
    pub date: String,
    pub tokens: Vec<SnapshotEntry>,
    pub total_tokens: usize,
    pub scraped_at: DateTime<Utc>,
}

/// JSON snapshot sink keyed by UTC date
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshot file for a given day
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("tokens_{}.json", date.format(DATE_FORMAT)))
    }

    /// Write (or replace) the snapshot for the day of `now`
    pub fn save_at(&self, records: &[TokenRecord], now: DateTime<Utc>) -> Result<DailySnapshot, SinkError> {
        let tokens: Vec<SnapshotEntry> = records.iter().filter_map(SnapshotEntry::from_record).collect();

        let dropped = records.len() - tokens.len();
        if dropped > 0 {
            tracing::debug!("{} records without address or pair id left out of snapshot", dropped);
        }

        let snapshot = DailySnapshot {
            date: now.format(DATE_FORMAT).to_string(),
            total_tokens: tokens.len(),
            tokens,
            scraped_at: now,
        };

        fs::create_dir_all(&self.dir)
            .map_err(|e| SinkError::DirectoryError(format!("{}: {}", self.dir.display(), e)))?;

        let content = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| SinkError::SerializationError(e.to_string()))?;

        let path = self.path_for(now.date_naive());
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| write_error(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| write_error(&path, e))?;

        tracing::info!(
            "Snapshot {} saved: {} tokens ({})",
            snapshot.date,
            snapshot.total_tokens,
            path.display()
        );

        Ok(snapshot)
    }

    /// Read a day's snapshot back; `None` if that day was never stored
    pub fn load(&self, date: NaiveDate) -> Result<Option<DailySnapshot>, SinkError> {
        let path = self.path_for(date);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| SinkError::ReadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let snapshot = serde_json::from_str(&content)
            .map_err(|e| SinkError::SerializationError(format!("{}: {}", path.display(), e)))?;
        Ok(Some(snapshot))
    }
}

fn write_error(path: &Path, e: std::io::Error) -> SinkError {
    SinkError::WriteError {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

#[async_trait]
impl RecordSink for SnapshotStore {
    fn name(&self) -> &str {
        "snapshot"
    }

    async fn accept(&self, records: &[TokenRecord]) -> Result<usize, SinkError> {
        self.save_at(records, Utc::now()).map(|s| s.total_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn complete(symbol: &str, address: &str) -> TokenRecord {
        let mut record = TokenRecord::new(symbol, format!("{} Token", symbol))
            .with_pair_id(format!("pair-{}", symbol))
            .with_address(address)
            .with_market(1.0, 5_000_000.0, 10_000.0);
        record.set_pool_address(format!("pool-{}", symbol));
        record
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("snapshots"));

        let saved = store.save_at(&[complete("AAA", "ADDR_A")], at(5, 9)).unwrap();
        assert_eq!(saved.date, "2024-03-05");
        assert!(dir.path().join("snapshots/tokens_2024-03-05.json").exists());

        let loaded = store.load(at(5, 9).date_naive()).unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.tokens[0].lp_address, "pool-AAA");
    }

    #[test]
    fn test_incomplete_records_are_filtered() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        let records = vec![
            complete("AAA", "ADDR_A"),
            TokenRecord::new("NOADDR", "No Address").with_pair_id("pair-x"),
            TokenRecord::new("NOPAIR", "No Pair").with_address("ADDR_B"),
        ];

        let saved = store.save_at(&records, at(5, 9)).unwrap();
        assert_eq!(saved.total_tokens, 1);
        assert_eq!(saved.tokens[0].symbol, "AAA");
    }

    #[test]
    fn test_same_day_is_replaced() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        store.save_at(&[complete("AAA", "ADDR_A")], at(5, 9)).unwrap();
        store
            .save_at(&[complete("BBB", "ADDR_B"), complete("CCC", "ADDR_C")], at(5, 18))
            .unwrap();
        store.save_at(&[complete("DDD", "ADDR_D")], at(6, 1)).unwrap();

        let day5 = store.load(at(5, 0).date_naive()).unwrap().unwrap();
        assert_eq!(day5.total_tokens, 2);
        assert_eq!(day5.scraped_at, at(5, 18));

        let day6 = store.load(at(6, 0).date_naive()).unwrap().unwrap();
        assert_eq!(day6.tokens[0].symbol, "DDD");

        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_load_missing_day() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());
        assert!(store.load(at(1, 0).date_naive()).unwrap().is_none());
    }

    #[test]
    fn test_document_field_names() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());
        store.save_at(&[complete("AAA", "ADDR_A")], at(5, 9)).unwrap();

        let raw = fs::read_to_string(store.path_for(at(5, 9).date_naive())).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["totalTokens"], 1);
        assert_eq!(json["tokens"][0]["pairId"], "pair-AAA");
        assert_eq!(json["tokens"][0]["lpAddress"], "pool-AAA");
        assert!(json["scrapedAt"].is_string());
    }

    #[tokio::test]
    async fn test_accept_reports_stored_count() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());
        let records = vec![complete("AAA", "ADDR_A"), TokenRecord::new("X", "Y")];

        assert_eq!(store.accept(&records).await.unwrap(), 1);
        assert_eq!(store.name(), "snapshot");
    }
}
