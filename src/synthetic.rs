//! Synthetic field scenario generation
//!
//! Produces a plausible month of daily field measurements and a matching
//! well list for demos and smoke testing without real field exports.
//! Seeded, so the same scenario can be regenerated exactly.

use chrono::{Datelike, NaiveDate};
use rand::prelude::*;
use rand_distr::{Distribution, Normal};

use crate::types::{DailySummaryRow, WellParameterRow};

// ============================================================================
// Field baselines (m³/day unless noted)
// ============================================================================

/// Baseline export gas
const BASE_EXPORT_GAS: f64 = 120_000.0;
/// Baseline flared gas
const BASE_FLARED_GAS: f64 = 3_500.0;
/// Baseline HP gas flow
const BASE_HP_GAS_FLOW: f64 = 45_000.0;
/// Baseline compressor gas rate
const BASE_COMP_GAS_RATE: f64 = 18_000.0;
/// Baseline compressor fuel gas
const BASE_COMP_FUEL_GAS: f64 = 1_200.0;
/// Baseline well injection rate (Mm³/day)
const BASE_QG_INJ: f64 = 2.5;
/// Baseline well gross gas rate (Mm³/day)
const BASE_QG_TOT: f64 = 8.0;

/// Well type tags cycled through the generated well list, weighted the
/// way the field roster runs: mostly plain producers.
const WELL_TYPE_CYCLE: [Option<&str>; 6] = [
    Some("GS"),
    None,
    Some("GLW"),
    None,
    Some("NF"),
    None,
];

/// A generated scenario: one month of daily rows plus a well roster.
#[derive(Debug, Clone)]
pub struct SyntheticScenario {
    pub daily: Vec<DailySummaryRow>,
    pub wells: Vec<WellParameterRow>,
}

/// Sample a normal distribution clamped at zero; degenerate parameters
/// fall back to the mean.
fn sample(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    Normal::new(mean, std_dev)
        .map(|dist| dist.sample(rng))
        .unwrap_or(mean)
        .max(0.0)
}

/// Generate a scenario covering the month containing `month_start`.
pub fn generate(month_start: NaiveDate, well_count: usize, seed: u64) -> SyntheticScenario {
    let mut rng = StdRng::seed_from_u64(seed);

    let first = month_start.with_day(1).unwrap_or(month_start);
    let days_in_month = days_in_month(first);

    // One comp fuel gas figure for the whole month, like the real data
    let comp_fuel_gas = sample(&mut rng, BASE_COMP_FUEL_GAS, BASE_COMP_FUEL_GAS * 0.05);

    let daily = (0..days_in_month)
        .filter_map(|offset| first.checked_add_days(chrono::Days::new(u64::from(offset))))
        .map(|calc_date| DailySummaryRow {
            calc_date,
            export_gas: Some(sample(&mut rng, BASE_EXPORT_GAS, BASE_EXPORT_GAS * 0.08)),
            flared_gas: Some(sample(&mut rng, BASE_FLARED_GAS, BASE_FLARED_GAS * 0.25)),
            hp_gas_flow: Some(sample(&mut rng, BASE_HP_GAS_FLOW, BASE_HP_GAS_FLOW * 0.06)),
            compressor_gas_rate: Some(sample(
                &mut rng,
                BASE_COMP_GAS_RATE,
                BASE_COMP_GAS_RATE * 0.1,
            )),
            comp_fuel_gas: Some(comp_fuel_gas),
        })
        .collect();

    let wells = (0..well_count)
        .map(|i| {
            let well_type = WELL_TYPE_CYCLE[i % WELL_TYPE_CYCLE.len()];
            // A few wells sit out the whole period
            let days_on = if rng.gen_ratio(1, 10) {
                0
            } else {
                rng.gen_range(1..=i64::from(days_in_month))
            };
            let injects = matches!(well_type, Some("GS") | Some("GLW"));
            WellParameterRow {
                well_id: i as i64 + 1,
                well_name: format!("B-{:03}", i + 1),
                well_type: well_type.map(str::to_string),
                days_on,
                avg_qg_inj: if injects {
                    sample(&mut rng, BASE_QG_INJ, BASE_QG_INJ * 0.3)
                } else {
                    0.0
                },
                qg_tot: sample(&mut rng, BASE_QG_TOT, BASE_QG_TOT * 0.4),
                test_date: Some(first),
            }
        })
        .collect();

    SyntheticScenario { daily, wells }
}

fn days_in_month(first: NaiveDate) -> u32 {
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next_month
        .map(|n| n.signed_duration_since(first).num_days())
        .and_then(|d| u32::try_from(d).ok())
        .unwrap_or(30)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn june() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn scenario_covers_the_whole_month() {
        let scenario = generate(june(), 12, 7);
        assert_eq!(scenario.daily.len(), 30);
        assert_eq!(scenario.wells.len(), 12);
        assert_eq!(scenario.daily[0].calc_date, june());
        assert_eq!(
            scenario.daily.last().unwrap().calc_date,
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
        );
    }

    #[test]
    fn same_seed_reproduces_the_same_scenario() {
        let a = generate(june(), 8, 42);
        let b = generate(june(), 8, 42);
        assert_eq!(a.daily, b.daily);
        assert_eq!(a.wells, b.wells);
    }

    #[test]
    fn mid_month_start_is_normalized_to_the_first() {
        let scenario = generate(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(), 4, 1);
        assert_eq!(
            scenario.daily[0].calc_date,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        // 2024 is a leap year
        assert_eq!(scenario.daily.len(), 29);
    }

    #[test]
    fn days_on_never_exceeds_the_month() {
        let scenario = generate(june(), 40, 3);
        assert!(scenario.wells.iter().all(|w| (0..=30).contains(&w.days_on)));
    }

    #[test]
    fn only_injection_capable_wells_get_injection_rates() {
        let scenario = generate(june(), 24, 9);
        for well in &scenario.wells {
            let injects = matches!(well.well_type.as_deref(), Some("GS") | Some("GLW"));
            if !injects {
                assert_eq!(well.avg_qg_inj, 0.0);
            }
        }
    }
}
