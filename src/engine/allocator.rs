//! Well-level allocation engine
//!
//! Redistributes the aggregated field volumes across wells according to
//! well-type rules. Five ordered passes, each consuming sums accumulated
//! by the one before it, so the pass order is fixed:
//!
//! 1. Volumes before allocation — per-well injection, gross and net
//!    volumes, with GS/GLW subtotals and the LP (non-GS) remainders
//! 2. First-difference reconciliation against the metered targets
//! 3. Reservoir (net) volume after allocation — GS pass-through, ratio
//!    scaling for everything else
//! 4. Gross volume after allocation and the implied injection volumes
//! 5. Final-check residuals
//!
//! Per-well output lists are positionally aligned with the input rows; a
//! well with zero days-on still gets a zero entry in every list so indices
//! stay aligned across passes. Division by zero is not guarded — a broken
//! reconciliation surfaces as non-finite ratios and residuals rather than
//! being silently masked.

use tracing::warn;

use crate::config::defaults::UNIT_SCALE;
use crate::types::{AllocationInputs, AllocationResult, WellClass, WellParameterRow};

/// The allocation calculation. Stateless; every invocation returns a
/// fresh [`AllocationResult`].
pub struct AllocationEngine;

impl AllocationEngine {
    /// Run the five allocation passes over the well rows.
    ///
    /// `wells` order is preserved into every per-well output list. The
    /// contents are not validated: unrecognized well types take the plain
    /// branch, and an empty input yields zero sums with non-finite ratios.
    pub fn allocate(wells: &[WellParameterRow], inputs: &AllocationInputs) -> AllocationResult {
        let mut result = AllocationResult::default();

        Self::volumes_before_allocation(wells, &mut result);
        Self::first_difference(inputs, &mut result);
        Self::reservoir_volumes_after_allocation(wells, inputs, &mut result);
        Self::volumes_after_allocation(wells, &mut result);
        Self::final_check(inputs, &mut result);

        result
    }

    /// Pass 1 — injection, gross and net volumes per well.
    fn volumes_before_allocation(wells: &[WellParameterRow], result: &mut AllocationResult) {
        // Gross production of GS wells, tracked separately to carve the
        // LP remainder out of the field total.
        let mut tot_gas_production_gs_sum = 0.0;

        for well in wells {
            let days_on = well.days_on as f64;
            let producing = well.days_on > 0;

            let inj_volume = if producing { days_on * well.avg_qg_inj } else { 0.0 };
            result.inj_volume_list.push(inj_volume);
            if producing {
                result.total_injection_volume += inj_volume;
            }

            let gas_prod_volume = if producing { days_on * well.qg_tot } else { 0.0 };
            result.tot_gas_prod_volume_list.push(gas_prod_volume);
            if producing {
                result.total_gas_production_volume += gas_prod_volume;
            }

            match well.class() {
                WellClass::Gs => tot_gas_production_gs_sum += gas_prod_volume,
                WellClass::Glw => {
                    result.tot_gas_prod_glw_for_tot_gas_prod_volume += gas_prod_volume;
                }
                _ => {}
            }

            // Net (reservoir) volume is tracked for every row, producing
            // or not, to keep the lists index-aligned for passes 3 and 4.
            let net_volume = gas_prod_volume - inj_volume;
            result.res_gas_prod_volume_list.push(net_volume);
            result.reservoir_gas_production_volume += net_volume;

            match well.class() {
                WellClass::Gs => result.res_gas_production_gs_sum += net_volume,
                WellClass::Glw => {
                    result.tot_gas_prod_glw_for_res_gas_prod_volume += net_volume;
                }
                _ => {}
            }
        }

        // "LP" is the contribution of everything that is not a GS well.
        result.tot_gas_prod_lp_for_tot_gas_prod_volume =
            result.total_gas_production_volume - tot_gas_production_gs_sum;
        result.tot_gas_prod_lp_for_res_gas_prod_volume =
            result.reservoir_gas_production_volume - result.res_gas_production_gs_sum;
    }

    /// Pass 2 — first differences against the metered targets.
    ///
    /// Targets: TOT gas prod LP ↔ `total_burun`, res gas prod ↔
    /// `reservoir`, GSW ↔ `hp_gas_flow_k`.
    fn first_difference(inputs: &AllocationInputs, result: &mut AllocationResult) {
        result.gas_inj = (inputs.hp_gas_flow_sum + inputs.comp_gas_rate_sum) / UNIT_SCALE;

        result.gas_inj_first_diff = result.gas_inj - result.total_injection_volume;
        result.tot_gas_prod_lp_first_diff =
            inputs.total_burun - result.tot_gas_prod_lp_for_tot_gas_prod_volume;
        result.res_gas_prod_first_diff =
            inputs.reservoir - result.reservoir_gas_production_volume;
        result.gsw_first_diff = inputs.hp_gas_flow_k - result.res_gas_production_gs_sum;

        result.associated_gas = inputs.reservoir - inputs.hp_gas_flow_k;
        result.associated_gas_tot_gas_difference =
            result.associated_gas - result.tot_gas_prod_lp_for_res_gas_prod_volume;

        if result.tot_gas_prod_lp_for_res_gas_prod_volume == 0.0 {
            warn!("LP net production subtotal is zero; matching ratio will be non-finite");
        }
        result.associated_gas_tot_gas_div =
            result.associated_gas / result.tot_gas_prod_lp_for_res_gas_prod_volume;
    }

    /// Pass 3 — reservoir volume after allocation.
    fn reservoir_volumes_after_allocation(
        wells: &[WellParameterRow],
        inputs: &AllocationInputs,
        result: &mut AllocationResult,
    ) {
        for (i, well) in wells.iter().enumerate() {
            let entry = if well.class() == WellClass::Gs {
                // GS net volume is already metered; it passes through.
                let v = result.res_gas_prod_volume_list[i];
                result.rgpvaa_sum_if_gs += v;
                v
            } else {
                let v = result.res_gas_prod_volume_list[i] * result.associated_gas_tot_gas_div;
                if well.class() == WellClass::Nf {
                    result.res_gas_nf += v;
                }
                v
            };
            result.rgpvaa_list.push(entry);
            result.rgpvaa_sum += entry;
        }

        result.tot_gas_prod_glw = inputs.total_burun - result.res_gas_nf;
        result.tot_gas_prod_glw_diff =
            result.tot_gas_prod_glw - result.tot_gas_prod_glw_for_tot_gas_prod_volume;
        if result.tot_gas_prod_glw_for_tot_gas_prod_volume == 0.0 {
            warn!("GLW gross production subtotal is zero; redistribution ratio will be non-finite");
        }
        result.tot_gas_prod_glw_div =
            result.tot_gas_prod_glw / result.tot_gas_prod_glw_for_tot_gas_prod_volume;
    }

    /// Pass 4 — gross volume after allocation and the implied injection.
    fn volumes_after_allocation(wells: &[WellParameterRow], result: &mut AllocationResult) {
        for (i, well) in wells.iter().enumerate() {
            let class = well.class();

            let entry = match class {
                WellClass::Gs => {
                    let v = result.rgpvaa_list[i];
                    result.tgpvaa_sum_if_gs += v;
                    v
                }
                // NF keeps its allocated net volume as gross.
                WellClass::Nf => result.rgpvaa_list[i],
                _ => result.tot_gas_prod_volume_list[i] * result.tot_gas_prod_glw_div,
            };

            // A GLW well contributes its scaled gross volume to the
            // overall total above and, again, to the GLW-only total here.
            if class == WellClass::Glw {
                result.tgpvaa_sum_if_glw +=
                    result.tot_gas_prod_volume_list[i] * result.tot_gas_prod_glw_div;
            }

            result.tgpvaa_list.push(entry);
            result.tgpvaa_sum += entry;

            let inj_after = entry - result.rgpvaa_list[i];
            result.ivaa_list.push(inj_after);
            result.ivaa_sum += inj_after;
        }

        result.rgpvaa_plain_sum_diff = result.rgpvaa_sum - result.rgpvaa_sum_if_gs;
        result.tgpvaa_plain_sum_diff = result.tgpvaa_sum - result.tgpvaa_sum_if_gs;
        result.tot_gas_prod_glw_diff_if_glw = result.tgpvaa_sum_if_glw - result.tot_gas_prod_glw;
    }

    /// Pass 5 — residuals that should vanish when the allocation is
    /// self-consistent. No tolerance is enforced; the raw values are
    /// surfaced for a human to judge.
    fn final_check(inputs: &AllocationInputs, result: &mut AllocationResult) {
        result.gas_inj_final_check = result.ivaa_sum - result.gas_inj;
        result.total_burun_final_check = result.tgpvaa_plain_sum_diff - inputs.total_burun;
        result.reservoir_final_check = result.rgpvaa_sum - inputs.reservoir;
        result.hp_gas_flow_k_final_check = result.tgpvaa_sum_if_gs - inputs.hp_gas_flow_k;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn well(name: &str, well_type: Option<&str>, days_on: i64, avg_qg_inj: f64, qg_tot: f64) -> WellParameterRow {
        WellParameterRow {
            well_id: 0,
            well_name: name.to_string(),
            well_type: well_type.map(str::to_string),
            days_on,
            avg_qg_inj,
            qg_tot,
            test_date: None,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < TOL
    }

    fn approx_list(xs: &[f64], ys: &[f64]) -> bool {
        xs.len() == ys.len() && xs.iter().zip(ys).all(|(a, b)| approx(*a, *b))
    }

    #[test]
    fn single_gs_well_passes_through() {
        let wells = vec![well("B-101", Some("GS"), 10, 5.0, 20.0)];
        let inputs = AllocationInputs {
            total_burun: 300.0,
            reservoir: 250.0,
            hp_gas_flow_k: 50.0,
            hp_gas_flow_sum: 30_000.0,
            comp_gas_rate_sum: 20_000.0,
        };

        let r = AllocationEngine::allocate(&wells, &inputs);

        assert!(approx_list(&r.inj_volume_list, &[50.0]));
        assert!(approx_list(&r.tot_gas_prod_volume_list, &[200.0]));
        assert!(approx_list(&r.res_gas_prod_volume_list, &[150.0]));
        assert!(approx(r.total_injection_volume, 50.0));
        assert!(approx(r.total_gas_production_volume, 200.0));
        assert!(approx(r.reservoir_gas_production_volume, 150.0));
        assert!(approx(r.res_gas_production_gs_sum, 150.0));
        assert!(approx(r.tot_gas_prod_lp_for_tot_gas_prod_volume, 0.0));
        assert!(approx(r.tot_gas_prod_lp_for_res_gas_prod_volume, 0.0));

        assert!(approx(r.gas_inj, 50.0));
        assert!(approx(r.gas_inj_first_diff, 0.0));

        // GS net volume is passed through, not scaled
        assert!(approx_list(&r.rgpvaa_list, &[150.0]));
        assert!(approx(r.rgpvaa_sum_if_gs, 150.0));
        assert!(approx(r.rgpvaa_sum, 150.0));
        assert!(approx_list(&r.tgpvaa_list, &[150.0]));
        assert!(approx(r.tgpvaa_sum_if_gs, 150.0));
        assert!(approx_list(&r.ivaa_list, &[0.0]));
    }

    #[test]
    fn mixed_field_exercises_every_branch() {
        let wells = vec![
            well("B-1", Some("GS"), 10, 2.0, 8.0),
            well("B-2", Some("GLW"), 10, 1.0, 6.0),
            well("B-3", Some("NF"), 5, 0.0, 4.0),
            well("B-4", None, 4, 0.5, 5.0),
        ];
        let inputs = AllocationInputs {
            total_burun: 200.0,
            reservoir: 138.0,
            hp_gas_flow_k: 50.0,
            hp_gas_flow_sum: 30_000.0,
            comp_gas_rate_sum: 2_000.0,
        };

        let r = AllocationEngine::allocate(&wells, &inputs);

        // Pass 1
        assert!(approx_list(&r.inj_volume_list, &[20.0, 10.0, 0.0, 2.0]));
        assert!(approx_list(&r.tot_gas_prod_volume_list, &[80.0, 60.0, 20.0, 20.0]));
        assert!(approx_list(&r.res_gas_prod_volume_list, &[60.0, 50.0, 20.0, 18.0]));
        assert!(approx(r.total_injection_volume, 32.0));
        assert!(approx(r.total_gas_production_volume, 180.0));
        assert!(approx(r.reservoir_gas_production_volume, 148.0));
        assert!(approx(r.res_gas_production_gs_sum, 60.0));
        assert!(approx(r.tot_gas_prod_lp_for_tot_gas_prod_volume, 100.0));
        assert!(approx(r.tot_gas_prod_lp_for_res_gas_prod_volume, 88.0));
        assert!(approx(r.tot_gas_prod_glw_for_tot_gas_prod_volume, 60.0));
        assert!(approx(r.tot_gas_prod_glw_for_res_gas_prod_volume, 50.0));

        // Pass 2
        assert!(approx(r.gas_inj, 32.0));
        assert!(approx(r.gas_inj_first_diff, 0.0));
        assert!(approx(r.tot_gas_prod_lp_first_diff, 100.0));
        assert!(approx(r.res_gas_prod_first_diff, -10.0));
        assert!(approx(r.gsw_first_diff, -10.0));
        assert!(approx(r.associated_gas, 88.0));
        assert!(approx(r.associated_gas_tot_gas_difference, 0.0));
        assert!(approx(r.associated_gas_tot_gas_div, 1.0));

        // Pass 3: GS passes through, the rest scales by 1.0, NF accumulates
        assert!(approx_list(&r.rgpvaa_list, &[60.0, 50.0, 20.0, 18.0]));
        assert!(approx(r.rgpvaa_sum, 148.0));
        assert!(approx(r.rgpvaa_sum_if_gs, 60.0));
        assert!(approx(r.res_gas_nf, 20.0));
        assert!(approx(r.tot_gas_prod_glw, 180.0));
        assert!(approx(r.tot_gas_prod_glw_diff, 120.0));
        assert!(approx(r.tot_gas_prod_glw_div, 3.0));

        // Pass 4: GS and NF pass through, GLW and plain scale gross by 3.0
        assert!(approx_list(&r.tgpvaa_list, &[60.0, 180.0, 20.0, 60.0]));
        assert!(approx(r.tgpvaa_sum, 320.0));
        assert!(approx(r.tgpvaa_sum_if_gs, 60.0));
        assert!(approx(r.tgpvaa_sum_if_glw, 180.0));
        assert!(approx(r.tot_gas_prod_glw_diff_if_glw, 0.0));
        assert!(approx_list(&r.ivaa_list, &[0.0, 130.0, 0.0, 42.0]));
        assert!(approx(r.ivaa_sum, 172.0));
        assert!(approx(r.rgpvaa_plain_sum_diff, 88.0));
        assert!(approx(r.tgpvaa_plain_sum_diff, 260.0));

        // Pass 5
        assert!(approx(r.gas_inj_final_check, 140.0));
        assert!(approx(r.total_burun_final_check, 60.0));
        assert!(approx(r.reservoir_final_check, 10.0));
        assert!(approx(r.hp_gas_flow_k_final_check, 10.0));
    }

    #[test]
    fn zero_days_on_keeps_lists_aligned_but_totals_untouched() {
        let wells = vec![
            well("B-down", None, 0, 5.0, 20.0),
            well("B-up", None, 2, 1.0, 3.0),
        ];
        let inputs = AllocationInputs::default();

        let r = AllocationEngine::allocate(&wells, &inputs);

        // The down well still occupies index 0 of every list
        assert!(approx_list(&r.inj_volume_list, &[0.0, 2.0]));
        assert!(approx_list(&r.tot_gas_prod_volume_list, &[0.0, 6.0]));
        assert!(approx_list(&r.res_gas_prod_volume_list, &[0.0, 4.0]));
        // But contributes nothing to the producing totals
        assert!(approx(r.total_injection_volume, 2.0));
        assert!(approx(r.total_gas_production_volume, 6.0));
        // Net volume accumulates unconditionally (adding zero here)
        assert!(approx(r.reservoir_gas_production_volume, 4.0));
    }

    #[test]
    fn only_down_wells_produce_all_zero_volumes() {
        let wells = vec![well("B-down", None, 0, 5.0, 20.0)];
        let r = AllocationEngine::allocate(&wells, &AllocationInputs::default());

        assert!(approx_list(&r.inj_volume_list, &[0.0]));
        assert!(approx_list(&r.tot_gas_prod_volume_list, &[0.0]));
        assert!(approx_list(&r.res_gas_prod_volume_list, &[0.0]));
        assert!(approx(r.total_injection_volume, 0.0));
        assert!(approx(r.total_gas_production_volume, 0.0));
        assert!(approx(r.reservoir_gas_production_volume, 0.0));
    }

    #[test]
    fn permuting_wells_permutes_every_output_list() {
        let original = vec![
            well("B-1", Some("GS"), 10, 2.0, 8.0),
            well("B-2", Some("GLW"), 10, 1.0, 6.0),
            well("B-3", Some("NF"), 5, 0.0, 4.0),
            well("B-4", None, 4, 0.5, 5.0),
        ];
        // Permutation: position i of `permuted` is position PERM[i] of `original`
        const PERM: [usize; 4] = [2, 0, 3, 1];
        let permuted: Vec<_> = PERM.iter().map(|&i| original[i].clone()).collect();

        let inputs = AllocationInputs {
            total_burun: 200.0,
            reservoir: 138.0,
            hp_gas_flow_k: 50.0,
            hp_gas_flow_sum: 30_000.0,
            comp_gas_rate_sum: 2_000.0,
        };

        let r_orig = AllocationEngine::allocate(&original, &inputs);
        let r_perm = AllocationEngine::allocate(&permuted, &inputs);

        let lists = [
            (&r_orig.inj_volume_list, &r_perm.inj_volume_list),
            (&r_orig.tot_gas_prod_volume_list, &r_perm.tot_gas_prod_volume_list),
            (&r_orig.res_gas_prod_volume_list, &r_perm.res_gas_prod_volume_list),
            (&r_orig.rgpvaa_list, &r_perm.rgpvaa_list),
            (&r_orig.tgpvaa_list, &r_perm.tgpvaa_list),
            (&r_orig.ivaa_list, &r_perm.ivaa_list),
        ];
        for (orig_list, perm_list) in lists {
            for (i, &j) in PERM.iter().enumerate() {
                assert!(approx(perm_list[i], orig_list[j]));
            }
        }
        // Order-independent scalars agree as well
        assert!(approx(r_orig.rgpvaa_sum, r_perm.rgpvaa_sum));
        assert!(approx(r_orig.tgpvaa_sum, r_perm.tgpvaa_sum));
        assert!(approx(r_orig.ivaa_sum, r_perm.ivaa_sum));
    }

    #[test]
    fn final_checks_vanish_when_allocation_is_exact() {
        // Constructed so both matching ratios are exactly 1: the metered
        // targets equal the measured subtotals, so redistribution is the
        // identity and every residual collapses to zero.
        let wells = vec![
            well("B-1", Some("GLW"), 10, 1.0, 5.0),
            well("B-2", Some("GLW"), 10, 2.0, 6.0),
            well("B-3", Some("GLW"), 10, 3.0, 7.0),
        ];
        // net = [40, 40, 40] -> 120; gross = [50, 60, 70] -> 180; inj -> 60
        let inputs = AllocationInputs {
            total_burun: 180.0,
            reservoir: 120.0,
            hp_gas_flow_k: 0.0,
            hp_gas_flow_sum: 60_000.0,
            comp_gas_rate_sum: 0.0,
        };

        let r = AllocationEngine::allocate(&wells, &inputs);

        assert!(approx(r.associated_gas_tot_gas_div, 1.0));
        assert!(approx(r.tot_gas_prod_glw_div, 1.0));
        assert!(approx(r.gas_inj_final_check, 0.0));
        assert!(approx(r.total_burun_final_check, 0.0));
        assert!(approx(r.reservoir_final_check, 0.0));
        assert!(approx(r.hp_gas_flow_k_final_check, 0.0));
        assert!(approx(r.tot_gas_prod_glw_diff_if_glw, 0.0));
    }

    #[test]
    fn glw_wells_feed_both_gross_totals() {
        let wells = vec![
            well("B-glw", Some("GLW"), 10, 0.0, 6.0),
            well("B-plain", None, 10, 0.0, 4.0),
        ];
        let inputs = AllocationInputs {
            total_burun: 120.0,
            reservoir: 100.0,
            hp_gas_flow_k: 0.0,
            hp_gas_flow_sum: 0.0,
            comp_gas_rate_sum: 0.0,
        };

        let r = AllocationEngine::allocate(&wells, &inputs);

        // glw_div = (120 - 0) / 60 = 2
        assert!(approx(r.tot_gas_prod_glw_div, 2.0));
        // The GLW well's scaled gross volume appears once in the overall
        // total and once more in the GLW-only total
        assert!(approx_list(&r.tgpvaa_list, &[120.0, 80.0]));
        assert!(approx(r.tgpvaa_sum, 200.0));
        assert!(approx(r.tgpvaa_sum_if_glw, 120.0));
    }

    #[test]
    fn empty_wells_yield_zero_sums_and_non_finite_ratios() {
        let inputs = AllocationInputs {
            total_burun: 100.0,
            reservoir: 80.0,
            hp_gas_flow_k: 10.0,
            hp_gas_flow_sum: 5_000.0,
            comp_gas_rate_sum: 1_000.0,
        };

        let r = AllocationEngine::allocate(&[], &inputs);

        assert!(r.inj_volume_list.is_empty());
        assert!(r.rgpvaa_list.is_empty());
        assert!(approx(r.total_injection_volume, 0.0));
        assert!(approx(r.rgpvaa_sum, 0.0));
        // Division by the zero subtotals propagates per IEEE-754
        assert!(r.associated_gas_tot_gas_div.is_infinite());
        assert!(r.tot_gas_prod_glw_div.is_infinite());
        assert!(approx(r.gas_inj, 6.0));
        assert!(approx(r.gas_inj_final_check, -6.0));
    }

    #[test]
    fn unrecognized_well_types_take_the_plain_branch() {
        let tagged = vec![well("B-1", Some("HP"), 10, 1.0, 5.0)];
        let untagged = vec![well("B-1", None, 10, 1.0, 5.0)];
        let inputs = AllocationInputs {
            total_burun: 60.0,
            reservoir: 45.0,
            hp_gas_flow_k: 5.0,
            hp_gas_flow_sum: 10_000.0,
            comp_gas_rate_sum: 0.0,
        };

        let a = AllocationEngine::allocate(&tagged, &inputs);
        let b = AllocationEngine::allocate(&untagged, &inputs);

        assert!(approx_list(&a.rgpvaa_list, &b.rgpvaa_list));
        assert!(approx_list(&a.tgpvaa_list, &b.tgpvaa_list));
        assert!(approx(a.tgpvaa_sum_if_glw, 0.0));
        assert!(approx(a.res_gas_nf, 0.0));
    }
}
