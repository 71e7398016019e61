//! Shared data structures for the gas production allocation pipeline
//!
//! This module defines the core types flowing through the pipeline:
//! - `DailySummaryRow` — consolidated per-day field measurements
//! - `SummaryTotals` — aggregated and scaled field totals
//! - `WellParameterRow`, `WellClass` — accepted well test parameters
//! - `AllocationInputs`, `AllocationResult` — allocation engine I/O
//! - `ProductionReport` — the assembled report handed to callers

mod allocation;
mod daily;
mod report;
mod totals;
mod well;

pub use allocation::*;
pub use daily::*;
pub use report::*;
pub use totals::*;
pub use well::*;
