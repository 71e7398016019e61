//! Built-in calibration defaults
//!
//! These match the values the field has always reconciled against; a
//! config file only needs to override them when the calibration changes.

/// Fuel-gas calibration offset added to the total gas balance (Mm³).
pub const FUEL_GAS_OFFSET: f64 = 2210.379;

/// Raw daily measurements are m³; reconciliation runs in thousand m³ (Mm³).
pub const UNIT_SCALE: f64 = 1000.0;

/// Production area the daily refresh consolidates.
pub const PROD_AREA_ID: i32 = 1;
