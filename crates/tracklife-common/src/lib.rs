//! # tracklife-common
//!
//! Shared types for the tracklife battery-life estimator.
//!
//! This crate provides:
//! - Time conversion constants used by every current model
//! - The error taxonomy ([`ConfigError`], [`ComputeError`])
//!
//! ## Unit conventions
//!
//! All currents are milliamps (mA), all energies millijoules (mJ), all
//! capacities milliamp-hours (mAh). Durations carry their unit in the field
//! name (`_ms`, `_s`, `_h`). Conversion to microamps happens only at the
//! presentation layer, never inside the models.

use thiserror::Error;

// ============================================================================
// Time Constants
// ============================================================================

/// Seconds in one day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Hours in one day.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Hours in one month, as used by the battery self-discharge model (30 days).
pub const HOURS_PER_MONTH: f64 = 720.0;

/// Spreading factors supported by the radio model.
pub const SPREADING_FACTORS: [u8; 6] = [7, 8, 9, 10, 11, 12];

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while validating a usage configuration.
///
/// All validation happens before any arithmetic runs, so a computation
/// either fully succeeds or fails up front.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Spreading factor outside the supported 7-12 range. The time-on-air
    /// formula diverges outside this range, so it is rejected rather than
    /// producing a non-physical result.
    #[error("Unsupported spreading factor: {0} (supported: 7-12)")]
    SpreadingFactor(u8),

    /// Message repetition below 1.
    #[error("Message repetition must be at least 1, got {0}")]
    Repetition(u32),

    /// A numeric field that must be non-negative was negative.
    #[error("Field '{field}' must be non-negative, got {value}")]
    NegativeField {
        /// Configuration field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A hardware profile table has no entry for a requested key. Only
    /// possible with synthetic profiles that deserialize a partial table.
    #[error("Hardware profile table '{table}' has no entry '{entry}'")]
    MissingProfileEntry {
        /// Profile table name.
        table: &'static str,
        /// Missing entry key.
        entry: String,
    },
}

/// Errors raised by the aggregation step itself.
#[derive(Debug, Error, PartialEq)]
pub enum ComputeError {
    /// The total average current is zero, so no finite lifetime exists.
    /// This is reported explicitly instead of returning an infinite
    /// sentinel value.
    #[error("Total average current is zero; battery lifetime is undefined")]
    ZeroTotalCurrent,
}

/// Round a value to one decimal place.
///
/// Used for the percentage breakdown in the estimate result.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
