//! burun-alloc: Gas Production Allocation
//!
//! Daily field aggregation and well-level allocation reconciliation for
//! gas production accounting.
//!
//! ## Pipeline
//!
//! - **Summary aggregation**: daily field measurements (export gas,
//!   flared gas, HP gas flow, compressor gas rate, compressor fuel gas)
//!   summed over a date range into scaled and composite totals
//! - **Allocation**: the aggregate volumes redistributed across wells by
//!   well-type rules (GS pass-through, GLW gross redistribution, NF
//!   exclusion), with first-difference and final-check residuals showing
//!   how well the books balance
//!
//! Input rows arrive through the [`repository::CalculationsRepository`]
//! seam; [`service::AllocationService`] orchestrates a run and returns a
//! [`types::ProductionReport`].

pub mod config;
pub mod engine;
pub mod report_store;
pub mod repository;
pub mod service;
pub mod synthetic;
pub mod types;

// Re-export field configuration
pub use config::FieldConfig;

// Re-export the calculation engine
pub use engine::{AllocationEngine, SummaryAggregator};

// Re-export the repository seam
pub use repository::{CalculationsRepository, MemoryRepository, RefreshOutcome};

// Re-export the service layer
pub use service::{parse_date_range, resolve_date_range, AllocationService, ServiceError};

// Re-export the report store
pub use report_store::{ReportStore, StoreError};

// Re-export commonly used types
pub use types::{
    AllocationInputs, AllocationResult, DailySummaryRow, ProductionReport, SummaryTotals,
    WellClass, WellParameterRow,
};
