//! Report history store
//!
//! Persists generated production reports so past reconciliation runs can
//! be pulled up later without re-running the pipeline.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::types::ProductionReport;

/// Error type for report store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Sled-backed store of production reports.
///
/// Key: run timestamp as u64 big-endian bytes (sorts chronologically).
/// Value: JSON-serialized [`ProductionReport`].
///
/// Writes are not flushed individually; sled's background flushing is
/// durable enough here since a lost report can be regenerated from the
/// source data.
#[derive(Debug, Clone)]
pub struct ReportStore {
    db: sled::Db,
}

impl ReportStore {
    /// Open or create the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Persist a report under its run timestamp.
    pub fn store(&self, report: &ProductionReport) -> Result<(), StoreError> {
        let key = report.generated_at.to_be_bytes();
        let value = serde_json::to_vec(report)?;
        self.db.insert(key, value)?;
        debug!(generated_at = report.generated_at, "stored production report");
        Ok(())
    }

    /// The most recent `limit` reports, newest first.
    ///
    /// Entries that fail to deserialize (e.g. written by an older
    /// version) are skipped rather than failing the whole read.
    pub fn recent(&self, limit: usize) -> Vec<ProductionReport> {
        let mut reports = Vec::with_capacity(limit);
        for item in self.db.iter().rev() {
            if reports.len() >= limit {
                break;
            }
            if let Ok((_key, value)) = item {
                if let Ok(report) = serde_json::from_slice::<ProductionReport>(&value) {
                    reports.push(report);
                }
            }
        }
        reports
    }

    /// Number of stored reports.
    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AllocationResult, SummaryTotals};
    use chrono::NaiveDate;

    fn report(generated_at: u64) -> ProductionReport {
        ProductionReport {
            generated_at,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            totals: SummaryTotals::default(),
            wells: Vec::new(),
            allocation: AllocationResult::default(),
        }
    }

    #[test]
    fn stored_reports_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::open(dir.path()).unwrap();

        store.store(&report(1_700_000_000)).unwrap();
        assert_eq!(store.len(), 1);

        let loaded = store.recent(10);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].generated_at, 1_700_000_000);
        assert_eq!(
            loaded[0].start_date,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }

    #[test]
    fn recent_returns_newest_first_and_respects_limit() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::open(dir.path()).unwrap();

        for ts in [100_u64, 300, 200] {
            store.store(&report(ts)).unwrap();
        }

        let loaded = store.recent(2);
        let timestamps: Vec<_> = loaded.iter().map(|r| r.generated_at).collect();
        assert_eq!(timestamps, vec![300, 200]);
    }

    #[test]
    fn same_timestamp_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::open(dir.path()).unwrap();

        store.store(&report(42)).unwrap();
        store.store(&report(42)).unwrap();
        assert_eq!(store.len(), 1);
    }
}
