//! Field Configuration Module
//!
//! Per-field calibration loaded from TOML, replacing the hardcoded
//! constants of earlier versions with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `BURUN_ALLOC_CONFIG` environment variable (path to TOML file)
//! 2. `field_config.toml` in the current working directory
//! 3. Built-in defaults (matching the original calibration)
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(FieldConfig::load());
//!
//! // Anywhere in the codebase:
//! let offset = config::get().calculation.fuel_gas_offset;
//! ```

pub mod defaults;
mod field_config;

pub use field_config::*;

use std::sync::OnceLock;

/// Global field configuration, initialized once at startup.
static FIELD_CONFIG: OnceLock<FieldConfig> = OnceLock::new();

/// Initialize the global field configuration.
///
/// Must be called exactly once before any calls to `get()`.
pub fn init(config: FieldConfig) {
    if FIELD_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// Get a reference to the global field configuration.
///
/// Panics if `init()` has not been called. A missing config is a fatal
/// startup error, not a recoverable condition.
#[allow(clippy::expect_used)]
pub fn get() -> &'static FieldConfig {
    FIELD_CONFIG
        .get()
        .expect("config::get() called before config::init() — this is a startup bug")
}

/// Check whether the config has been initialized.
///
/// Useful for tests and optional config paths.
pub fn is_initialized() -> bool {
    FIELD_CONFIG.get().is_some()
}
