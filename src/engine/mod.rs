//! Calculation Engine Module
//!
//! Deterministic arithmetic for gas production reconciliation. Everything
//! here is a pure function of its inputs — no I/O, no shared state.
//!
//! - `SummaryAggregator` — sums a date range of daily field measurements
//!   and derives the scaled and composite totals
//! - `AllocationEngine` — redistributes the aggregate volumes across wells
//!   in five ordered passes and computes the final-check residuals

mod aggregator;
mod allocator;

pub use aggregator::SummaryAggregator;
pub use allocator::AllocationEngine;
