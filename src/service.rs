//! Allocation service — date-range resolution and pipeline orchestration
//!
//! Ties the repository seam to the calculation engine: resolve the
//! requested date range, load and aggregate the daily rows, load the
//! accepted well parameters, run the allocation, and hand back the
//! assembled [`ProductionReport`].

use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::FieldConfig;
use crate::engine::{AllocationEngine, SummaryAggregator};
use crate::repository::{CalculationsRepository, RefreshOutcome};
use crate::types::{AllocationInputs, ProductionReport};

/// Errors surfaced by the allocation service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid date `{0}` (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
    #[error("no daily summaries between {start} and {end}")]
    NoData { start: NaiveDate, end: NaiveDate },
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

/// Resolve optional date strings to a concrete inclusive range.
///
/// A missing or unparseable bound defaults to the first / last day of the
/// month containing `today`, matching the reporting convention of "this
/// month unless asked otherwise".
pub fn resolve_date_range(
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let start_date = start
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .unwrap_or_else(|| first_day_of_month(today));
    let end_date = end
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .unwrap_or_else(|| last_day_of_month(today));
    (start_date, end_date)
}

/// Strict parse of both bounds; rejects malformed dates and inverted
/// ranges. Used where silently substituting defaults would be wrong
/// (e.g. before a destructive refresh).
pub fn parse_date_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), ServiceError> {
    let start_date = NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .map_err(|_| ServiceError::InvalidDate(start.to_string()))?;
    let end_date = NaiveDate::parse_from_str(end, "%Y-%m-%d")
        .map_err(|_| ServiceError::InvalidDate(end.to_string()))?;
    if start_date > end_date {
        return Err(ServiceError::InvertedRange {
            start: start_date,
            end: end_date,
        });
    }
    Ok((start_date, end_date))
}

fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    next_month.and_then(|d| d.pred_opt()).unwrap_or(date)
}

/// Orchestrates the aggregation + allocation pipeline over a repository.
pub struct AllocationService<R> {
    repository: R,
    aggregator: SummaryAggregator,
}

impl<R: CalculationsRepository> AllocationService<R> {
    /// Service with the default calibration.
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            aggregator: SummaryAggregator::new(),
        }
    }

    /// Service calibrated from a field configuration.
    pub fn with_config(repository: R, config: &FieldConfig) -> Self {
        Self {
            repository,
            aggregator: SummaryAggregator::with_fuel_offset(config.calculation.fuel_gas_offset),
        }
    }

    /// Run the full pipeline for an inclusive date range.
    pub async fn generate_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ProductionReport, ServiceError> {
        let daily = self.repository.daily_summaries(start, end).await?;
        if daily.is_empty() {
            return Err(ServiceError::NoData { start, end });
        }
        info!(days = daily.len(), %start, %end, "aggregating daily summaries");
        let totals = self.aggregator.aggregate(&daily);

        let wells = self.repository.accepted_parameters().await?;
        debug!(wells = wells.len(), "running allocation");
        let allocation = AllocationEngine::allocate(&wells, &AllocationInputs::from(&totals));

        Ok(ProductionReport {
            generated_at: u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0),
            start_date: start,
            end_date: end,
            totals,
            wells,
            allocation,
        })
    }

    /// Rebuild the daily summary rows for a range from the source datasets.
    pub async fn refresh(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RefreshOutcome, ServiceError> {
        if start > end {
            return Err(ServiceError::InvertedRange { start, end });
        }
        Ok(self.repository.refresh_daily_summaries(start, end).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;
    use crate::types::DailySummaryRow;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_bounds_default_to_the_current_month() {
        let today = date(2024, 6, 17);
        let (start, end) = resolve_date_range(None, None, today);
        assert_eq!(start, date(2024, 6, 1));
        assert_eq!(end, date(2024, 6, 30));
    }

    #[test]
    fn unparseable_bounds_fall_back_like_missing_ones() {
        let today = date(2024, 2, 10);
        let (start, end) = resolve_date_range(Some("06/01/2024"), Some("garbage"), today);
        assert_eq!(start, date(2024, 2, 1));
        // 2024 is a leap year
        assert_eq!(end, date(2024, 2, 29));
    }

    #[test]
    fn explicit_bounds_win_over_defaults() {
        let today = date(2024, 6, 17);
        let (start, end) = resolve_date_range(Some("2024-03-05"), Some("2024-03-20"), today);
        assert_eq!(start, date(2024, 3, 5));
        assert_eq!(end, date(2024, 3, 20));
    }

    #[test]
    fn december_rolls_over_to_january() {
        let today = date(2023, 12, 2);
        let (_, end) = resolve_date_range(None, None, today);
        assert_eq!(end, date(2023, 12, 31));
    }

    #[test]
    fn strict_parse_rejects_bad_dates_and_inverted_ranges() {
        assert!(matches!(
            parse_date_range("2024-13-01", "2024-06-30"),
            Err(ServiceError::InvalidDate(_))
        ));
        assert!(matches!(
            parse_date_range("2024-06-30", "2024-06-01"),
            Err(ServiceError::InvertedRange { .. })
        ));
        let (start, end) = parse_date_range("2024-06-01", "2024-06-30").unwrap();
        assert_eq!(start, date(2024, 6, 1));
        assert_eq!(end, date(2024, 6, 30));
    }

    #[tokio::test]
    async fn empty_date_range_is_a_no_data_error() {
        let service = AllocationService::new(MemoryRepository::default());
        let err = service
            .generate_report(date(2024, 6, 1), date(2024, 6, 30))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NoData { .. }));
    }

    #[tokio::test]
    async fn report_carries_totals_wells_and_aligned_allocation() {
        let daily = vec![DailySummaryRow {
            calc_date: date(2024, 6, 1),
            export_gas: Some(100_000.0),
            flared_gas: Some(5_000.0),
            hp_gas_flow: Some(40_000.0),
            compressor_gas_rate: Some(20_000.0),
            comp_fuel_gas: Some(1_000.0),
        }];
        let wells = vec![crate::types::WellParameterRow {
            well_id: 1,
            well_name: "B-1".to_string(),
            well_type: Some("GS".to_string()),
            days_on: 10,
            avg_qg_inj: 5.0,
            qg_tot: 20.0,
            test_date: None,
        }];
        let service = AllocationService::new(MemoryRepository::new(daily, wells));

        let report = service
            .generate_report(date(2024, 6, 1), date(2024, 6, 30))
            .await
            .unwrap();

        assert_eq!(report.wells.len(), 1);
        assert_eq!(report.allocation.inj_volume_list.len(), report.wells.len());
        assert!((report.totals.export_gas_k - 100.0).abs() < 1e-9);
        assert!((report.totals.qg_total - (100.0 + 5.0 + 20.0 + 2210.379)).abs() < 1e-9);
    }
}
