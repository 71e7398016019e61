//! Data access seam for the allocation pipeline.
//!
//! The pipeline itself is pure; everything it consumes arrives through
//! [`CalculationsRepository`]. Implementations handle storage details
//! internally:
//!
//! - [`MemoryRepository`] — pre-loaded rows, used by tests and the CLI
//! - `PgRepository` — production database (behind the `postgres` feature)

pub mod csv;
#[cfg(feature = "postgres")]
pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{DailySummaryRow, WellParameterRow};

#[cfg(feature = "postgres")]
pub use postgres::PgRepository;

/// Outcome of a daily-summary refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshOutcome {
    /// Days of data rebuilt for the range
    pub processed_days: usize,
}

/// Supplies input rows to, and rebuilds source data for, the pipeline.
#[async_trait]
pub trait CalculationsRepository: Send + Sync {
    /// Daily summary rows for the inclusive date range, ordered by date.
    async fn daily_summaries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailySummaryRow>>;

    /// Accepted per-well parameters joined with well metadata.
    ///
    /// Row order is load-bearing: the allocation engine's per-well output
    /// lists are positionally aligned to this list, so implementations
    /// must return rows in a stable query order.
    async fn accepted_parameters(&self) -> Result<Vec<WellParameterRow>>;

    /// Rebuild the daily summary rows for the range from the source
    /// datasets.
    async fn refresh_daily_summaries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RefreshOutcome>;
}

/// In-memory repository over pre-loaded rows.
///
/// Daily rows are filtered to the requested range and sorted by date;
/// well rows are returned in insertion order. `refresh` is a no-op that
/// reports the rows already present, since there are no source datasets
/// to rebuild from.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    daily: Vec<DailySummaryRow>,
    wells: Vec<WellParameterRow>,
}

impl MemoryRepository {
    pub fn new(daily: Vec<DailySummaryRow>, wells: Vec<WellParameterRow>) -> Self {
        Self { daily, wells }
    }
}

#[async_trait]
impl CalculationsRepository for MemoryRepository {
    async fn daily_summaries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailySummaryRow>> {
        let mut rows: Vec<DailySummaryRow> = self
            .daily
            .iter()
            .filter(|r| r.calc_date >= start && r.calc_date <= end)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.calc_date);
        Ok(rows)
    }

    async fn accepted_parameters(&self) -> Result<Vec<WellParameterRow>> {
        Ok(self.wells.clone())
    }

    async fn refresh_daily_summaries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RefreshOutcome> {
        let processed_days = self
            .daily
            .iter()
            .filter(|r| r.calc_date >= start && r.calc_date <= end)
            .count();
        Ok(RefreshOutcome { processed_days })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[tokio::test]
    async fn daily_summaries_filter_and_sort_by_date() {
        let repo = MemoryRepository::new(
            vec![
                DailySummaryRow::empty(date(20)),
                DailySummaryRow::empty(date(5)),
                DailySummaryRow::empty(date(12)),
            ],
            vec![],
        );

        let rows = repo.daily_summaries(date(1), date(15)).await.unwrap();
        let dates: Vec<_> = rows.iter().map(|r| r.calc_date).collect();
        assert_eq!(dates, vec![date(5), date(12)]);
    }

    #[tokio::test]
    async fn refresh_reports_rows_in_range() {
        let repo = MemoryRepository::new(
            vec![DailySummaryRow::empty(date(1)), DailySummaryRow::empty(date(30))],
            vec![],
        );

        let outcome = repo.refresh_daily_summaries(date(1), date(15)).await.unwrap();
        assert_eq!(outcome.processed_days, 1);
    }
}
