//! CSV Export
//!
//! Writes every record of the batch, complete or not, to a timestamped CSV file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use csv::WriterBuilder;

use crate::domain::TokenRecord;
use crate::ports::{RecordSink, SinkError};

/// Default export directory
pub const DEFAULT_EXPORT_DIR: &str = "exports";

pub const CSV_HEADER: [&str; 9] = [
    "PairID",
    "Address",
    "LPAddress",
    "Symbol",
    "Name",
    "Price",
    "MarketCap",
    "Volume24h",
    "UpdatedAt",
];

/// CSV sink; one file per run
#[derive(Debug, Clone)]
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Export file for a run started at `now`
    pub fn path_for(&self, now: DateTime<Utc>) -> PathBuf {
        self.dir.join(format!("tokens_{}.csv", now.format("%Y-%m-%d_%H-%M-%S")))
    }

    /// Write the batch to the file named after `now`
    pub fn export_at(&self, records: &[TokenRecord], now: DateTime<Utc>) -> Result<PathBuf, SinkError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| SinkError::DirectoryError(format!("{}: {}", self.dir.display(), e)))?;

        let path = self.path_for(now);
        let file = File::create(&path).map_err(|e| write_error(&path, e))?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        writer
            .write_record(CSV_HEADER)
            .map_err(|e| write_error(&path, e))?;

        for record in records {
            writer
                .write_record(row(record))
                .map_err(|e| write_error(&path, e))?;
        }
        writer.flush().map_err(|e| write_error(&path, e))?;

        tracing::info!("Exported {} records to {}", records.len(), path.display());
        Ok(path)
    }
}

fn row(record: &TokenRecord) -> [String; 9] {
    [
        record.pair_id().unwrap_or_default().to_string(),
        record.address().unwrap_or_default().to_string(),
        record.pool_address().unwrap_or_default().to_string(),
        record.symbol.clone(),
        record.name.clone(),
        record.price.to_string(),
        record.market_cap.to_string(),
        record.volume_24h.to_string(),
        record.observed_at().to_rfc3339_opts(SecondsFormat::Secs, true),
    ]
}

fn write_error(path: &Path, e: impl std::fmt::Display) -> SinkError {
    SinkError::WriteError {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

#[async_trait]
impl RecordSink for CsvExporter {
    fn name(&self) -> &str {
        "csv"
    }

    async fn accept(&self, records: &[TokenRecord]) -> Result<usize, SinkError> {
        self.export_at(records, Utc::now())?;
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let exporter = CsvExporter::new(dir.path().join("out"));

        let mut full = TokenRecord::observed("WIF", "dog, wif hat", now())
            .with_pair_id("pairW")
            .with_address("ADDRW")
            .with_market(2.5, 2_100_000_000.0, 12_500_000.0);
        full.set_pool_address("POOLW");
        let partial = TokenRecord::observed("BAR", "Bar", now());

        let path = exporter.export_at(&[full, partial], now()).unwrap();
        assert_eq!(path, dir.path().join("out/tokens_2024-03-05_14-07-09.csv"));

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "PairID,Address,LPAddress,Symbol,Name,Price,MarketCap,Volume24h,UpdatedAt");
        assert_eq!(
            lines[1],
            "pairW,ADDRW,POOLW,WIF,\"dog, wif hat\",2.5,2100000000,12500000,2024-03-05T14:07:09Z"
        );
        assert_eq!(lines[2], ",,,BAR,Bar,0,0,0,2024-03-05T14:07:09Z");
    }

    #[test]
    fn test_empty_batch_still_has_header() {
        let dir = TempDir::new().unwrap();
        let exporter = CsvExporter::new(dir.path());

        let path = exporter.export_at(&[], now()).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_accept_counts_all_records() {
        let dir = TempDir::new().unwrap();
        let exporter = CsvExporter::new(dir.path());
        let records = vec![TokenRecord::new("A", "A"), TokenRecord::new("B", "B")];

        assert_eq!(exporter.accept(&records).await.unwrap(), 2);
        assert_eq!(exporter.name(), "csv");
    }
}
