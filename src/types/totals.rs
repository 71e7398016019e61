//! Aggregated field totals

use serde::{Deserialize, Serialize};

/// Field-level totals derived from a date range of daily summary rows.
///
/// Plain sums are in m³; the `_k` variants and everything derived from
/// them are in thousand m³ (Mm³). `total_burun` is numerically identical
/// to `qg_total` but kept as its own field — downstream consumers treat
/// "total gas at the Burun point" as a distinct quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryTotals {
    // Plain sums over the date range (m³)
    pub export_gas_sum: f64,
    pub flared_gas_sum: f64,
    pub hp_gas_flow_sum: f64,
    pub comp_gas_rate_sum: f64,
    pub comp_fuel_gas_sum: f64,

    // Scaled sums (Mm³)
    pub export_gas_k: f64,
    pub flared_gas_k: f64,
    pub hp_gas_flow_k: f64,
    pub comp_gas_rate_k: f64,
    pub comp_fuel_gas_k: f64,

    /// Total injected gas: HP gas flow plus compressor gas (Mm³)
    pub qg_inj: f64,
    /// Total gas balance: export + flared + compressor + fuel offset (Mm³)
    pub qg_total: f64,
    /// Total gas accounted for at the Burun metering point (Mm³)
    pub total_burun: f64,
    /// Reservoir gas: Burun total minus compressor gas (Mm³)
    pub reservoir: f64,
}
