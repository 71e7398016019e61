//! Production Allocation Report CLI
//!
//! Runs the aggregation + allocation pipeline over exported field data
//! (CSV) or a generated synthetic scenario, and prints a reconciliation
//! report.
//!
//! Usage:
//!   allocation-report --daily data/sample/daily_summaries.csv \
//!                     --wells data/sample/accepted_parameters.csv
//!   allocation-report --synthetic 12 --month 2024-06
//!   allocation-report --daily ... --wells ... --json
//!   allocation-report --daily ... --wells ... --report-db reports.db
//!
//! # Environment Variables
//!
//! - `BURUN_ALLOC_CONFIG`: Path to the field configuration TOML
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use burun_alloc::repository::csv;
use burun_alloc::{
    config, AllocationService, FieldConfig, MemoryRepository, ProductionReport, ReportStore,
    WellClass,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "allocation-report")]
#[command(about = "Gas production allocation reconciliation report")]
#[command(version)]
struct Args {
    /// CSV of daily field summaries (columns: date, export_gas, flared_gas,
    /// hp_gas_flow, compressor_gas_rate, comp_fuel_gas)
    #[arg(long, value_name = "FILE", requires = "wells")]
    daily: Option<PathBuf>,

    /// CSV of accepted well parameters (columns: well_id, well_name,
    /// well_type, days_on, avg_qg_inj, qg_tot)
    #[arg(long, value_name = "FILE", requires = "daily")]
    wells: Option<PathBuf>,

    /// Generate a synthetic scenario with this many wells instead of
    /// reading CSVs
    #[arg(long, value_name = "N", conflicts_with_all = ["daily", "wells"])]
    synthetic: Option<usize>,

    /// Month for the synthetic scenario (YYYY-MM)
    #[arg(long, default_value = "2024-06")]
    month: String,

    /// RNG seed for the synthetic scenario
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Start date (YYYY-MM-DD); defaults to the first day of the data month
    #[arg(long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD); defaults to the last day of the data month
    #[arg(long)]
    end: Option<String>,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Persist the generated report to this sled database path
    #[arg(long, value_name = "DIR")]
    report_db: Option<PathBuf>,

    /// Field configuration TOML (overrides $BURUN_ALLOC_CONFIG)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let field_config = match &args.config {
        Some(path) => FieldConfig::from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => FieldConfig::load(),
    };
    config::init(field_config.clone());

    // Assemble the input rows and the default reporting range
    let (repository, data_range) = match (&args.daily, &args.wells, args.synthetic) {
        (Some(daily_path), Some(wells_path), None) => {
            let daily = csv::load_daily_summaries(daily_path)?;
            let wells = csv::load_well_parameters(wells_path)?;
            let range = date_span(&daily);
            (MemoryRepository::new(daily, wells), range)
        }
        (None, None, Some(well_count)) => {
            let month = parse_month(&args.month)?;
            let scenario = burun_alloc::synthetic::generate(month, well_count, args.seed);
            info!(wells = well_count, month = %month, seed = args.seed, "generated synthetic scenario");
            let range = date_span(&scenario.daily);
            (MemoryRepository::new(scenario.daily, scenario.wells), range)
        }
        _ => bail!("either --daily/--wells or --synthetic must be given (see --help)"),
    };

    // Explicit --start/--end win; otherwise cover the loaded data
    let (start, end) = match data_range {
        Some((data_start, data_end)) => {
            let start = parse_bound(args.start.as_deref())?.unwrap_or(data_start);
            let end = parse_bound(args.end.as_deref())?.unwrap_or(data_end);
            (start, end)
        }
        None => burun_alloc::resolve_date_range(
            args.start.as_deref(),
            args.end.as_deref(),
            chrono::Local::now().date_naive(),
        ),
    };

    let service = AllocationService::with_config(repository, &field_config);
    let report = service.generate_report(start, end).await?;

    if let Some(path) = &args.report_db {
        let store = ReportStore::open(path)?;
        store.store(&report)?;
        info!(path = %path.display(), "report persisted");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Earliest and latest dates present in the loaded rows.
fn date_span(rows: &[burun_alloc::DailySummaryRow]) -> Option<(NaiveDate, NaiveDate)> {
    rows.iter().map(|r| r.calc_date).fold(None, |span, date| {
        Some(match span {
            None => (date, date),
            Some((lo, hi)) => (lo.min(date), hi.max(date)),
        })
    })
}

fn parse_month(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .with_context(|| format!("invalid month `{raw}` (expected YYYY-MM)"))
}

fn parse_bound(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date `{s}` (expected YYYY-MM-DD)"))
    })
    .transpose()
}

// ============================================================================
// Text report
// ============================================================================

fn class_tag(class: WellClass) -> &'static str {
    match class {
        WellClass::Gs => "GS",
        WellClass::Glw => "GLW",
        WellClass::Nf => "NF",
        WellClass::Plain => "-",
    }
}

fn print_report(report: &ProductionReport) {
    let totals = &report.totals;
    let alloc = &report.allocation;

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  Production Allocation Report                                ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!(
        "  Field: {}    Range: {} — {}    Wells: {}",
        config::get().field.name,
        report.start_date,
        report.end_date,
        report.wells.len()
    );
    println!();

    println!("  FIELD TOTALS (Mm³)");
    println!("  ──────────────────────────────────────────────");
    println!("    Export gas       {:>14.3}", totals.export_gas_k);
    println!("    Flared gas       {:>14.3}", totals.flared_gas_k);
    println!("    HP gas flow      {:>14.3}", totals.hp_gas_flow_k);
    println!("    Compressor gas   {:>14.3}", totals.comp_gas_rate_k);
    println!("    Comp fuel gas    {:>14.3}", totals.comp_fuel_gas_k);
    println!("    Qg injected      {:>14.3}", totals.qg_inj);
    println!("    Qg total         {:>14.3}", totals.qg_total);
    println!("    Total Burun      {:>14.3}", totals.total_burun);
    println!("    Reservoir        {:>14.3}", totals.reservoir);
    println!();

    println!("  PER-WELL VOLUMES (Mm³)");
    println!(
        "    {:<14} {:>4} {:>5} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Well", "Type", "Days", "Inj", "Gross", "Net", "NetAlloc", "GrossAlloc", "InjAlloc"
    );
    println!("    ──────────────────────────────────────────────────────────────────────────────────────────");
    for (i, well) in report.wells.iter().enumerate() {
        println!(
            "    {:<14} {:>4} {:>5} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
            well.well_name,
            class_tag(well.class()),
            well.days_on,
            alloc.inj_volume_list[i],
            alloc.tot_gas_prod_volume_list[i],
            alloc.res_gas_prod_volume_list[i],
            alloc.rgpvaa_list[i],
            alloc.tgpvaa_list[i],
            alloc.ivaa_list[i],
        );
    }
    println!();

    println!("  FIRST DIFFERENCES (target − measured, Mm³)");
    println!("  ──────────────────────────────────────────────");
    println!("    Gas injection    {:>14.3}", alloc.gas_inj_first_diff);
    println!("    TOT gas prod LP  {:>14.3}", alloc.tot_gas_prod_lp_first_diff);
    println!("    Res gas prod     {:>14.3}", alloc.res_gas_prod_first_diff);
    println!("    GSW              {:>14.3}", alloc.gsw_first_diff);
    println!("    Associated gas   {:>14.3}", alloc.associated_gas);
    println!("    Matching ratio   {:>14.6}", alloc.associated_gas_tot_gas_div);
    println!("    GLW ratio        {:>14.6}", alloc.tot_gas_prod_glw_div);
    println!();

    println!("  FINAL CHECK (≈ 0 when self-consistent, Mm³)");
    println!("  ──────────────────────────────────────────────");
    println!("    Gas injection    {:>14.6}", alloc.gas_inj_final_check);
    println!("    Total Burun      {:>14.6}", alloc.total_burun_final_check);
    println!("    Reservoir        {:>14.6}", alloc.reservoir_final_check);
    println!("    HP gas flow K    {:>14.6}", alloc.hp_gas_flow_k_final_check);
}
