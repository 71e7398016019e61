//! Daily field summary types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day of consolidated field measurements.
///
/// Rows are assembled by the refresh process, which joins four source
/// datasets by date: daily field production (export/flared gas), HP gas
/// metering, compressor readings, and the monthly compressor fuel gas
/// figure. Any measurement can be missing for a given day; missing values
/// count as zero when aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummaryRow {
    /// Calendar day the measurements belong to
    pub calc_date: NaiveDate,
    /// Export gas (m³/day)
    #[serde(default)]
    pub export_gas: Option<f64>,
    /// Flared gas (m³/day)
    #[serde(default)]
    pub flared_gas: Option<f64>,
    /// High-pressure gas flow (m³/day)
    #[serde(default)]
    pub hp_gas_flow: Option<f64>,
    /// Compressor gas rate (m³/day)
    #[serde(default)]
    pub compressor_gas_rate: Option<f64>,
    /// Compressor fuel gas for the day's month (m³/day)
    #[serde(default)]
    pub comp_fuel_gas: Option<f64>,
}

impl DailySummaryRow {
    /// An empty row for a date, with no measurements yet.
    pub fn empty(calc_date: NaiveDate) -> Self {
        Self {
            calc_date,
            export_gas: None,
            flared_gas: None,
            hp_gas_flow: None,
            compressor_gas_rate: None,
            comp_fuel_gas: None,
        }
    }
}
