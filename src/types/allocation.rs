//! Allocation engine input and output types

use serde::{Deserialize, Serialize};

use super::SummaryTotals;

/// The subset of the field totals the allocation engine consumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationInputs {
    /// Total gas at the Burun point (Mm³)
    pub total_burun: f64,
    /// Reservoir gas (Mm³)
    pub reservoir: f64,
    /// Scaled HP gas flow (Mm³)
    pub hp_gas_flow_k: f64,
    /// Unscaled HP gas flow sum (m³)
    pub hp_gas_flow_sum: f64,
    /// Unscaled compressor gas rate sum (m³)
    pub comp_gas_rate_sum: f64,
}

impl From<&SummaryTotals> for AllocationInputs {
    fn from(totals: &SummaryTotals) -> Self {
        Self {
            total_burun: totals.total_burun,
            reservoir: totals.reservoir,
            hp_gas_flow_k: totals.hp_gas_flow_k,
            hp_gas_flow_sum: totals.hp_gas_flow_sum,
            comp_gas_rate_sum: totals.comp_gas_rate_sum,
        }
    }
}

/// Everything the allocation engine produces for one invocation.
///
/// Scalar fields are accumulator sums, reconciliation differences, and
/// matching ratios; the `_list` fields are per-well sequences positionally
/// aligned to the input well rows. Abbreviations follow the field's
/// reconciliation vocabulary:
///
/// - `lp` — contribution of all non-gas-storage wells
/// - `rgpvaa` — reservoir (net) gas production volume after allocation
/// - `tgpvaa` — total (gross) gas production volume after allocation
/// - `ivaa` — injection volume after allocation
///
/// A fresh value object per invocation; nothing here is shared or retained
/// by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationResult {
    // Volumes before allocation
    pub total_injection_volume: f64,
    pub total_gas_production_volume: f64,
    pub reservoir_gas_production_volume: f64,
    pub tot_gas_prod_lp_for_tot_gas_prod_volume: f64,
    pub tot_gas_prod_lp_for_res_gas_prod_volume: f64,
    pub tot_gas_prod_glw_for_tot_gas_prod_volume: f64,
    pub tot_gas_prod_glw_for_res_gas_prod_volume: f64,
    pub res_gas_production_gs_sum: f64,

    // Per-well volumes before allocation
    pub inj_volume_list: Vec<f64>,
    pub tot_gas_prod_volume_list: Vec<f64>,
    pub res_gas_prod_volume_list: Vec<f64>,

    // First-difference reconciliation
    pub gas_inj: f64,
    pub gas_inj_first_diff: f64,
    pub tot_gas_prod_lp_first_diff: f64,
    pub res_gas_prod_first_diff: f64,
    pub gsw_first_diff: f64,
    pub associated_gas: f64,
    pub associated_gas_tot_gas_difference: f64,
    /// Matching ratio: associated gas over the LP net subtotal.
    /// Non-finite when the subtotal is zero; propagated as-is.
    pub associated_gas_tot_gas_div: f64,

    // Volumes after allocation
    pub rgpvaa_sum: f64,
    pub rgpvaa_list: Vec<f64>,
    pub tgpvaa_sum: f64,
    pub tgpvaa_list: Vec<f64>,
    pub ivaa_sum: f64,
    pub ivaa_list: Vec<f64>,
    pub res_gas_nf: f64,
    pub tot_gas_prod_glw: f64,
    pub tot_gas_prod_glw_diff: f64,
    /// Gross redistribution ratio for plain wells. Non-finite when no GLW
    /// gross volume was produced; propagated as-is.
    pub tot_gas_prod_glw_div: f64,
    pub rgpvaa_sum_if_gs: f64,
    pub tgpvaa_sum_if_gs: f64,
    pub tgpvaa_sum_if_glw: f64,
    pub tot_gas_prod_glw_diff_if_glw: f64,
    pub rgpvaa_plain_sum_diff: f64,
    pub tgpvaa_plain_sum_diff: f64,

    // Final check residuals — near zero when the allocation is
    // self-consistent; surfaced raw for a human to judge
    pub gas_inj_final_check: f64,
    pub total_burun_final_check: f64,
    pub reservoir_final_check: f64,
    pub hp_gas_flow_k_final_check: f64,
}
