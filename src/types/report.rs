//! Assembled production report

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AllocationResult, SummaryTotals, WellParameterRow};

/// Complete output of one pipeline run: the range it covered, the field
/// totals, the well rows the allocation ran over, and the allocation
/// result whose per-well lists align with `wells`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionReport {
    /// Unix timestamp (seconds) of the run; also the report store key
    pub generated_at: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub totals: SummaryTotals,
    pub wells: Vec<WellParameterRow>,
    pub allocation: AllocationResult,
}
