//! Field configuration — calibration values as operator-tunable TOML
//!
//! Every struct implements `Default` with values matching the original
//! constants, so behavior is unchanged when no config file is present.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use super::defaults;

/// Root configuration for a field deployment.
///
/// Load with `FieldConfig::load()` which searches:
/// 1. `$BURUN_ALLOC_CONFIG` env var
/// 2. `./field_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Field identification
    #[serde(default)]
    pub field: FieldInfo,

    /// Calculation calibration
    #[serde(default)]
    pub calculation: CalculationConfig,
}

/// Field / deployment identification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// Display name used in report headers
    #[serde(default = "default_field_name")]
    pub name: String,

    /// Production area id scoping the daily refresh queries
    #[serde(default = "default_prod_area_id")]
    pub prod_area_id: i32,
}

impl Default for FieldInfo {
    fn default() -> Self {
        Self {
            name: default_field_name(),
            prod_area_id: defaults::PROD_AREA_ID,
        }
    }
}

/// Calibration values entering the calculations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationConfig {
    /// Fuel-gas offset added to the total gas balance (Mm³)
    #[serde(default = "default_fuel_gas_offset")]
    pub fuel_gas_offset: f64,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            fuel_gas_offset: defaults::FUEL_GAS_OFFSET,
        }
    }
}

fn default_field_name() -> String {
    "Burun".to_string()
}

fn default_prod_area_id() -> i32 {
    defaults::PROD_AREA_ID
}

fn default_fuel_gas_offset() -> f64 {
    defaults::FUEL_GAS_OFFSET
}

impl FieldConfig {
    /// Load configuration using the documented search order.
    ///
    /// Never fails: a missing file means defaults, an unreadable or
    /// malformed file is logged and falls back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("BURUN_ALLOC_CONFIG") {
            return Self::load_or_default(Path::new(&path));
        }

        let local = Path::new("field_config.toml");
        if local.exists() {
            return Self::load_or_default(local);
        }

        info!("no field config found, using built-in defaults");
        Self::default()
    }

    /// Load from an explicit path, falling back to defaults on failure.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::from_path(path) {
            Ok(config) => {
                info!(path = %path.display(), field = %config.field.name, "loaded field config");
                config
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to load field config, using defaults");
                Self::default()
            }
        }
    }

    /// Load from an explicit path, surfacing the error.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_calibration() {
        let config = FieldConfig::default();
        assert!((config.calculation.fuel_gas_offset - 2210.379).abs() < 1e-12);
        assert_eq!(config.field.prod_area_id, 1);
        assert_eq!(config.field.name, "Burun");
    }

    #[test]
    fn partial_toml_fills_missing_sections_with_defaults() {
        let config: FieldConfig = toml::from_str(
            r#"
            [field]
            name = "Test Field"
            "#,
        )
        .unwrap();
        assert_eq!(config.field.name, "Test Field");
        assert_eq!(config.field.prod_area_id, 1);
        assert!((config.calculation.fuel_gas_offset - 2210.379).abs() < 1e-12);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: FieldConfig = toml::from_str(
            r#"
            [field]
            prod_area_id = 3

            [calculation]
            fuel_gas_offset = 1000.0
            "#,
        )
        .unwrap();
        assert_eq!(config.field.prod_area_id, 3);
        assert!((config.calculation.fuel_gas_offset - 1000.0).abs() < 1e-12);
    }
}
