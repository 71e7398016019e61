//! PostgreSQL repository (feature `postgres`)
//!
//! Production data access against the field database. The refresh
//! operation rebuilds the daily summary table for a range by
//! delete-then-insert, consolidating four source tables by date:
//!
//! - `daily_field_production` — export and flared gas per day
//! - `hp_gas` — HP gas metering, summed per day
//! - `compressor_info` — compressor gas rates, summed per day
//! - `prod_allocation_main` — one compressor fuel gas figure per month,
//!   applied to every day of that month; months with no row fall back to
//!   the first fetched month's figure

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::{debug, info};

use super::{CalculationsRepository, RefreshOutcome};
use crate::types::{DailySummaryRow, WellParameterRow};

/// Repository over a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
    prod_area_id: i32,
}

impl PgRepository {
    /// Connect to the database at `url` (e.g. from `DATABASE_URL`).
    pub async fn connect(url: &str, prod_area_id: i32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .context("failed to connect to the field database")?;
        Ok(Self { pool, prod_area_id })
    }

    /// Wrap an existing pool.
    pub fn with_pool(pool: PgPool, prod_area_id: i32) -> Self {
        Self { pool, prod_area_id }
    }

    /// Connect using `DATABASE_URL`, loading a `.env` file if present.
    pub async fn from_env(prod_area_id: i32) -> Result<Self> {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        Self::connect(&url, prod_area_id).await
    }

    /// Months (first days) covered by the inclusive range, ascending.
    fn months_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut months = Vec::new();
        let mut current = start.with_day(1).unwrap_or(start);
        let last = end.with_day(1).unwrap_or(end);
        while current <= last {
            months.push(current);
            current = if current.month() == 12 {
                match NaiveDate::from_ymd_opt(current.year() + 1, 1, 1) {
                    Some(d) => d,
                    None => break,
                }
            } else {
                match NaiveDate::from_ymd_opt(current.year(), current.month() + 1, 1) {
                    Some(d) => d,
                    None => break,
                }
            };
        }
        months
    }
}

#[async_trait]
impl CalculationsRepository for PgRepository {
    async fn daily_summaries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailySummaryRow>> {
        let rows = sqlx::query(
            "SELECT calc_date, export_gas, flared_gas, hp_gas_flow, \
                    compressor_gas_rate, comp_fuel_gas \
             FROM daily_summaries \
             WHERE calc_date BETWEEN $1 AND $2 \
             ORDER BY calc_date",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .context("failed to load daily summaries")?;

        rows.iter()
            .map(|row| {
                Ok(DailySummaryRow {
                    calc_date: row.try_get("calc_date")?,
                    export_gas: row.try_get("export_gas")?,
                    flared_gas: row.try_get("flared_gas")?,
                    hp_gas_flow: row.try_get("hp_gas_flow")?,
                    compressor_gas_rate: row.try_get("compressor_gas_rate")?,
                    comp_fuel_gas: row.try_get("comp_fuel_gas")?,
                })
            })
            .collect()
    }

    async fn accepted_parameters(&self) -> Result<Vec<WellParameterRow>> {
        let rows = sqlx::query(
            "SELECT ap.well_id, COALESCE(w.well_name, 'Unknown') AS well_name, \
                    ap.well_type, COALESCE(ap.days_on, 0) AS days_on, \
                    COALESCE(ap.avg_qg_inj, 0) AS avg_qg_inj, \
                    COALESCE(ap.qg, 0) AS qg_tot, ap.test_date \
             FROM accepted_parameters ap \
             JOIN wells w ON w.well_id = ap.well_id \
             ORDER BY ap.id",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to load accepted parameters")?;

        rows.iter()
            .map(|row| {
                Ok(WellParameterRow {
                    well_id: row.try_get("well_id")?,
                    well_name: row.try_get("well_name")?,
                    well_type: row.try_get("well_type")?,
                    days_on: row.try_get("days_on")?,
                    avg_qg_inj: row.try_get("avg_qg_inj")?,
                    qg_tot: row.try_get("qg_tot")?,
                    test_date: row.try_get("test_date")?,
                })
            })
            .collect()
    }

    async fn refresh_daily_summaries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RefreshOutcome> {
        let mut consolidated: BTreeMap<NaiveDate, DailySummaryRow> = BTreeMap::new();

        // Export and flared gas from daily field production
        let field_rows = sqlx::query(
            "SELECT date, export_gas, flared_gas \
             FROM daily_field_production \
             WHERE date BETWEEN $1 AND $2 AND prod_area_id = $3 \
             GROUP BY date, export_gas, flared_gas \
             ORDER BY date",
        )
        .bind(start)
        .bind(end)
        .bind(self.prod_area_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to load daily field production")?;

        for row in &field_rows {
            let date: NaiveDate = row.try_get("date")?;
            let entry = consolidated
                .entry(date)
                .or_insert_with(|| DailySummaryRow::empty(date));
            entry.export_gas = row.try_get("export_gas")?;
            entry.flared_gas = row.try_get("flared_gas")?;
        }

        // HP gas metering, summed per day
        let hp_rows = sqlx::query(
            "SELECT date, SUM(flow_rate_m3_per_day) AS hp_gas_flow \
             FROM hp_gas \
             WHERE date BETWEEN $1 AND $2 \
             GROUP BY date",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .context("failed to load HP gas metering")?;

        for row in &hp_rows {
            let date: NaiveDate = row.try_get("date")?;
            let entry = consolidated
                .entry(date)
                .or_insert_with(|| DailySummaryRow::empty(date));
            entry.hp_gas_flow = row.try_get("hp_gas_flow")?;
        }

        // Compressor gas rates, summed per day
        let comp_rows = sqlx::query(
            "SELECT compress_date, SUM(gas_rate) AS gas_rate \
             FROM compressor_info \
             WHERE compress_date BETWEEN $1 AND $2 \
             GROUP BY compress_date",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .context("failed to load compressor readings")?;

        for row in &comp_rows {
            let date: NaiveDate = row.try_get("compress_date")?;
            let entry = consolidated
                .entry(date)
                .or_insert_with(|| DailySummaryRow::empty(date));
            entry.compressor_gas_rate = row.try_get("gas_rate")?;
        }

        // Monthly compressor fuel gas, applied to every day of its month
        let mut monthly_fuel: BTreeMap<NaiveDate, Option<f64>> = BTreeMap::new();
        for month in Self::months_in_range(start, end) {
            let row = sqlx::query(
                "SELECT comp_fuel_gas \
                 FROM prod_allocation_main \
                 WHERE month = $1 AND prod_area_id = $2 \
                 ORDER BY paid DESC \
                 LIMIT 1",
            )
            .bind(month)
            .bind(self.prod_area_id)
            .fetch_optional(&self.pool)
            .await
            .context("failed to load monthly comp fuel gas")?;

            if let Some(row) = row {
                monthly_fuel.insert(month, row.try_get("comp_fuel_gas")?);
            }
        }
        let first_month_value = monthly_fuel.values().next().copied().flatten();
        for (date, entry) in &mut consolidated {
            let month = date.with_day(1).unwrap_or(*date);
            entry.comp_fuel_gas = match monthly_fuel.get(&month) {
                Some(value) => *value,
                None => first_month_value,
            };
        }

        if consolidated.is_empty() {
            debug!(%start, %end, "no source data for refresh");
            return Ok(RefreshOutcome { processed_days: 0 });
        }

        // Replace the range atomically
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM daily_summaries WHERE calc_date BETWEEN $1 AND $2")
            .bind(start)
            .bind(end)
            .execute(&mut *tx)
            .await
            .context("failed to clear existing daily summaries")?;

        for row in consolidated.values() {
            sqlx::query(
                "INSERT INTO daily_summaries \
                 (calc_date, export_gas, flared_gas, hp_gas_flow, \
                  compressor_gas_rate, comp_fuel_gas) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(row.calc_date)
            .bind(row.export_gas)
            .bind(row.flared_gas)
            .bind(row.hp_gas_flow)
            .bind(row.compressor_gas_rate)
            .bind(row.comp_fuel_gas)
            .execute(&mut *tx)
            .await
            .context("failed to insert daily summary")?;
        }
        tx.commit().await?;

        let processed_days = consolidated.len();
        info!(%start, %end, processed_days, "refreshed daily summaries");
        Ok(RefreshOutcome { processed_days })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn months_in_range_cover_partial_months() {
        let months = PgRepository::months_in_range(date(2024, 11, 15), date(2025, 2, 3));
        assert_eq!(
            months,
            vec![
                date(2024, 11, 1),
                date(2024, 12, 1),
                date(2025, 1, 1),
                date(2025, 2, 1),
            ]
        );
    }

    #[test]
    fn single_month_range_yields_one_month() {
        let months = PgRepository::months_in_range(date(2024, 6, 1), date(2024, 6, 30));
        assert_eq!(months, vec![date(2024, 6, 1)]);
    }
}
