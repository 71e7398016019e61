//! Daily summary aggregation
//!
//! Sums the five daily field measurements over a date range and derives
//! the scaled ("K") and composite totals the allocation engine consumes.

use crate::config::defaults::{FUEL_GAS_OFFSET, UNIT_SCALE};
use crate::types::{DailySummaryRow, SummaryTotals};

/// Aggregates daily summary rows into field totals.
///
/// Missing measurements count as zero. The fuel-gas offset enters
/// `qg_total` (and therefore `total_burun` and `reservoir`) even for an
/// empty input — it is a fixed calibration term, not data.
#[derive(Debug, Clone, Copy)]
pub struct SummaryAggregator {
    fuel_gas_offset: f64,
}

impl Default for SummaryAggregator {
    fn default() -> Self {
        Self {
            fuel_gas_offset: FUEL_GAS_OFFSET,
        }
    }
}

impl SummaryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregator with a non-default calibration offset.
    pub fn with_fuel_offset(fuel_gas_offset: f64) -> Self {
        Self { fuel_gas_offset }
    }

    /// Aggregate a sequence of daily rows into field totals.
    pub fn aggregate(&self, rows: &[DailySummaryRow]) -> SummaryTotals {
        let export_gas_sum: f64 = rows.iter().map(|r| r.export_gas.unwrap_or(0.0)).sum();
        let flared_gas_sum: f64 = rows.iter().map(|r| r.flared_gas.unwrap_or(0.0)).sum();
        let hp_gas_flow_sum: f64 = rows.iter().map(|r| r.hp_gas_flow.unwrap_or(0.0)).sum();
        let comp_gas_rate_sum: f64 = rows
            .iter()
            .map(|r| r.compressor_gas_rate.unwrap_or(0.0))
            .sum();
        let comp_fuel_gas_sum: f64 = rows.iter().map(|r| r.comp_fuel_gas.unwrap_or(0.0)).sum();

        let export_gas_k = export_gas_sum / UNIT_SCALE;
        let flared_gas_k = flared_gas_sum / UNIT_SCALE;
        let hp_gas_flow_k = hp_gas_flow_sum / UNIT_SCALE;
        let comp_gas_rate_k = comp_gas_rate_sum / UNIT_SCALE;
        let comp_fuel_gas_k = comp_fuel_gas_sum / UNIT_SCALE;

        let qg_inj = hp_gas_flow_k + comp_gas_rate_k;
        let qg_total = export_gas_k + flared_gas_k + comp_gas_rate_k + self.fuel_gas_offset;
        let total_burun = qg_total;
        let reservoir = total_burun - comp_gas_rate_k;

        SummaryTotals {
            export_gas_sum,
            flared_gas_sum,
            hp_gas_flow_sum,
            comp_gas_rate_sum,
            comp_fuel_gas_sum,
            export_gas_k,
            flared_gas_k,
            hp_gas_flow_k,
            comp_gas_rate_k,
            comp_fuel_gas_k,
            qg_inj,
            qg_total,
            total_burun,
            reservoir,
        }
    }
}
