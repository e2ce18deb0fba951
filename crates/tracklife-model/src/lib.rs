//! # tracklife-model
//!
//! Usage configuration, hardware profile registry, and the battery life
//! estimation core.
//!
//! This crate provides:
//! - Scenario loading from YAML ([`load_scenario`])
//! - The hardware constant registry ([`HardwareProfile`])
//! - Usage configuration types ([`UsageConfig`])
//! - The estimator itself ([`compute_battery_life`])
//!
//! ## Scenario files
//!
//! A scenario is a YAML document describing one deployment. Omitted
//! sections fall back to inactive defaults:
//!
//! ```yaml
//! product: micro
//! radio:
//!   spreading_factor: 10
//!   tx_power: dbm14
//! accelerometer_on: true
//! heartbeat:
//!   msgs_per_day: 24
//! gps:
//!   msgs_per_day: 24
//!   ttff_s: 49
//!   conv_time_s: 90
//! ```

pub mod config;
pub mod estimate;
pub mod profile;

use std::path::Path;
use thiserror::Error;
use tracing::info;
use tracklife_common::{ComputeError, ConfigError};

pub use config::{
    AgpsUsage, BleUsage, CustomBleUsage, CustomUsage, GpsUsage, HeartbeatUsage, RadioSettings,
    UsageConfig, WifiUsage,
};
pub use estimate::{compute_battery_life, BatteryEstimate, Category};
pub use profile::{
    BatterySpec, BatteryType, BleMode, BleOp, HardwareProfile, PayloadSpec, PayloadTable, Product,
    TxPower,
};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while loading a scenario or computing an estimate.
#[derive(Debug, Error)]
pub enum ModelError {
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Computation error.
    #[error("Computation error: {0}")]
    Compute(#[from] ComputeError),
}

// ============================================================================
// Scenario Loading
// ============================================================================

/// Load a usage scenario from a YAML file.
///
/// The configuration is validated before it is returned, so a successfully
/// loaded scenario is always computable (modulo profile table gaps with
/// synthetic profiles).
pub fn load_scenario(path: &Path) -> Result<UsageConfig, ModelError> {
    let yaml = std::fs::read_to_string(path)?;
    let config = load_scenario_from_str(&yaml)?;
    info!(path = %path.display(), product = ?config.product, "scenario loaded");
    Ok(config)
}

/// Parse a usage scenario from a YAML string.
pub fn load_scenario_from_str(yaml: &str) -> Result<UsageConfig, ModelError> {
    let config: UsageConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SCENARIO: &str = "\
product: micro
radio:
  spreading_factor: 10
  tx_power: dbm14
accelerometer_on: true
heartbeat:
  msgs_per_day: 24
gps:
  msgs_per_day: 24
  ttff_s: 49
  conv_time_s: 90
agps:
  msgs_per_day: 24
  on_time_s: 8
  satellites: 5
wifi:
  msgs_per_day: 24
  bssids: 4
ble:
  msgs_per_day: 24
  beacons: 4
  operation: fast_scan
";

    #[test]
    fn test_load_sample_scenario_and_compute() {
        let config = load_scenario_from_str(SAMPLE_SCENARIO).unwrap();
        let profile = HardwareProfile::default();
        let estimate = compute_battery_life(&config, &profile).unwrap();

        assert!(estimate.lifetime_days > 0.0);
        let sum: f64 = estimate.breakdown.values().sum();
        assert!((sum - 100.0).abs() <= 0.5);
        // GPS dominates this scenario by a wide margin.
        let gps_pct = estimate.breakdown[&Category::Gps];
        assert!(gps_pct > 50.0, "GPS share was {gps_pct}%");
    }

    #[test]
    fn test_invalid_scenario_is_rejected_at_load() {
        let yaml = SAMPLE_SCENARIO.replace("spreading_factor: 10", "spreading_factor: 6");
        assert!(matches!(
            load_scenario_from_str(&yaml),
            Err(ModelError::Config(ConfigError::SpreadingFactor(6))),
        ));
    }

    #[test]
    fn test_unknown_product_is_a_yaml_error() {
        let yaml = SAMPLE_SCENARIO.replace("product: micro", "product: nano");
        assert!(matches!(load_scenario_from_str(&yaml), Err(ModelError::Yaml(_))));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = load_scenario(Path::new("/nonexistent/scenario.yaml")).unwrap_err();
        assert!(matches!(err, ModelError::Io(_)));
    }
}
