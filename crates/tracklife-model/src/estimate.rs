//! Battery life estimation.
//!
//! Combines the radio model from `tracklife-lora` with the positioning and
//! fixed-draw models into one total average current, then converts that to
//! an expected lifetime and a per-category percentage breakdown.
//!
//! Every function here is pure: identical inputs produce identical outputs,
//! and nothing is cached or mutated between calls.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;
use tracklife_common::{
    round_one_decimal, ComputeError, HOURS_PER_DAY, HOURS_PER_MONTH, SECONDS_PER_DAY,
};

use crate::config::{AgpsUsage, BleUsage, CustomBleUsage, GpsUsage, UsageConfig, WifiUsage};
use crate::profile::{BatterySpec, HardwareProfile};
use crate::ModelError;

// ============================================================================
// Categories
// ============================================================================

/// Consumer categories reported in the breakdown.
///
/// Message categories combine their radio and positioning contributions;
/// the remaining variants are fixed draws. Ordered for deterministic
/// report output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Heartbeat transmissions.
    Heartbeat,
    /// Application-defined message transmissions.
    Custom,
    /// GPS fixes plus their uplink transmissions.
    Gps,
    /// Assisted-GPS fixes plus their uplink transmissions.
    Agps,
    /// Wi-Fi scans plus their uplink transmissions.
    Wifi,
    /// BLE positioning scans plus their uplink transmissions.
    Ble,
    /// Continuous BLE usage by daily duration.
    CustomBle,
    /// Accelerometer, when enabled.
    Accelerometer,
    /// Quiescent sleep current.
    Quiescent,
    /// Battery self-discharge.
    Leakage,
}

impl Category {
    /// Human-readable category name for reports.
    pub fn description(self) -> &'static str {
        match self {
            Category::Heartbeat => "Heartbeat",
            Category::Custom => "Custom messages",
            Category::Gps => "GPS",
            Category::Agps => "Assisted GPS",
            Category::Wifi => "Wi-Fi",
            Category::Ble => "BLE positioning",
            Category::CustomBle => "BLE usage",
            Category::Accelerometer => "Accelerometer",
            Category::Quiescent => "Quiescent",
            Category::Leakage => "Battery leakage",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

// ============================================================================
// Estimate Result
// ============================================================================

/// Result of a battery life computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryEstimate {
    /// Expected operating time in days, derated by practical capacity.
    pub lifetime_days: f64,
    /// Total average current in mA, including leakage.
    pub total_current_ma: f64,
    /// Percentage share of the total per category, rounded to one decimal.
    /// Always contains every category; zero entries are kept so callers
    /// can decide whether to suppress them.
    pub breakdown: BTreeMap<Category, f64>,
}

// ============================================================================
// Positioning Models
// ============================================================================

/// Average GPS current in mA.
///
/// Heuristic approximation, not a measured quantity: an upper bound that
/// assumes every fix is a cold start is blended against an estimate that
/// assumes one cold start per day with hot starts and standby in between,
/// and the smaller of the two wins. The min policy is deliberate; the
/// hardware behaves closer to whichever regime is cheaper.
pub fn gps_average_current_ma(profile: &HardwareProfile, usage: &GpsUsage) -> f64 {
    let cold_usage_s = (usage.ttff_s + usage.conv_time_s).min(profile.gps_timeout_s);

    let cold_starts_only =
        cold_usage_s * profile.gps_current_ma * usage.msgs_per_day / SECONDS_PER_DAY;

    // One cold start per day; every other fix is a hot start and the
    // receiver sits in standby in between.
    let with_hot_starts = (cold_usage_s * profile.gps_current_ma
        + (usage.msgs_per_day - 1.0) * usage.conv_time_s * profile.gps_current_ma
        + (SECONDS_PER_DAY - usage.conv_time_s * usage.msgs_per_day)
            * profile.gps_standby_current_ma)
        / SECONDS_PER_DAY;

    cold_starts_only.min(with_hot_starts)
}

/// Average assisted-GPS current in mA.
pub fn agps_average_current_ma(profile: &HardwareProfile, usage: &AgpsUsage) -> f64 {
    usage.on_time_s * profile.gps_current_ma * usage.msgs_per_day / SECONDS_PER_DAY
}

/// Average Wi-Fi scan current in mA.
pub fn wifi_average_current_ma(profile: &HardwareProfile, usage: &WifiUsage) -> f64 {
    profile.wifi_on_time_s * profile.wifi_current_ma * usage.msgs_per_day / SECONDS_PER_DAY
}

/// Average BLE positioning scan current in mA.
pub fn ble_scan_average_current_ma(
    profile: &HardwareProfile,
    usage: &BleUsage,
) -> Result<f64, ModelError> {
    let op = profile.ble_op(usage.operation)?;
    Ok(op.duty_s * op.current_ma * usage.msgs_per_day / SECONDS_PER_DAY)
}

/// Average current of continuous BLE usage in mA.
///
/// Duration-based rather than message-triggered: the mode current is
/// weighted by the fraction of the day it is active.
pub fn custom_ble_average_current_ma(
    profile: &HardwareProfile,
    usage: &CustomBleUsage,
) -> Result<f64, ModelError> {
    let op = profile.ble_op(usage.operation)?;
    Ok(op.current_ma * usage.usage_hours_per_day / HOURS_PER_DAY)
}

// ============================================================================
// Fixed Draws
// ============================================================================

/// Average battery self-discharge current in mA.
///
/// Assumes the remaining capacity decays roughly linearly over the service
/// life, so the average leaked charge corresponds to half the nominal
/// capacity at the monthly leakage rate.
pub fn leakage_current_ma(battery: &BatterySpec) -> f64 {
    (battery.capacity_mah / 2.0) * (battery.leakage_per_month / HOURS_PER_MONTH)
}

// ============================================================================
// Aggregator
// ============================================================================

/// Compute the battery life estimate for one usage configuration.
///
/// Validates the configuration, sums every subsystem contribution into one
/// total average current, and derives the lifetime and the percentage
/// breakdown. The message repetition count multiplies the radio current of
/// every category uniformly.
pub fn compute_battery_life(
    config: &UsageConfig,
    profile: &HardwareProfile,
) -> Result<BatteryEstimate, ModelError> {
    config.validate()?;

    let battery = profile.battery(config.product)?;
    let tx_current_ma = profile.tx_current_ma(config.radio.tx_power)?;
    let sf = config.radio.spreading_factor;
    let repetition = config.radio.repetition as f64;
    let hw = &profile.radio;

    let radio = |payload_len: u32, msgs_per_day: f64| -> Result<f64, ModelError> {
        let i = tracklife_lora::average_current_ma(hw, sf, tx_current_ma, payload_len, msgs_per_day)?;
        Ok(i * repetition)
    };

    let payload = &profile.payload;
    let mut currents: BTreeMap<Category, f64> = BTreeMap::new();
    currents.insert(
        Category::Heartbeat,
        radio(payload.heartbeat.length(0), config.heartbeat.msgs_per_day)?,
    );
    currents.insert(
        Category::Custom,
        radio(config.custom.payload_len, config.custom.msgs_per_day)?,
    );
    currents.insert(
        Category::Gps,
        radio(payload.gps.length(0), config.gps.msgs_per_day)?
            + gps_average_current_ma(profile, &config.gps),
    );
    currents.insert(
        Category::Agps,
        radio(payload.agps.length(config.agps.satellites), config.agps.msgs_per_day)?
            + agps_average_current_ma(profile, &config.agps),
    );
    currents.insert(
        Category::Wifi,
        radio(payload.wifi.length(config.wifi.bssids), config.wifi.msgs_per_day)?
            + wifi_average_current_ma(profile, &config.wifi),
    );
    currents.insert(
        Category::Ble,
        radio(payload.ble.length(config.ble.beacons), config.ble.msgs_per_day)?
            + ble_scan_average_current_ma(profile, &config.ble)?,
    );
    currents.insert(
        Category::CustomBle,
        custom_ble_average_current_ma(profile, &config.custom_ble)?,
    );
    currents.insert(
        Category::Accelerometer,
        if config.accelerometer_on {
            profile.accelerometer_current_ma
        } else {
            0.0
        },
    );
    currents.insert(Category::Quiescent, profile.quiescent_current_ma);
    currents.insert(Category::Leakage, leakage_current_ma(&battery));

    let total_current_ma: f64 = currents.values().sum();
    if total_current_ma <= 0.0 {
        return Err(ComputeError::ZeroTotalCurrent.into());
    }

    for (category, current_ma) in &currents {
        debug!(%category, current_ma, "category contribution");
    }

    let practical_capacity_mah = battery.capacity_mah * battery.practical_capacity;
    let lifetime_days = practical_capacity_mah / total_current_ma / HOURS_PER_DAY;

    let breakdown = currents
        .iter()
        .map(|(category, current_ma)| {
            (*category, round_one_decimal(current_ma / total_current_ma * 100.0))
        })
        .collect();

    debug!(lifetime_days, total_current_ma, "battery life computed");

    Ok(BatteryEstimate {
        lifetime_days,
        total_current_ma,
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CustomUsage, HeartbeatUsage, RadioSettings};
    use crate::profile::{BleMode, Product, TxPower};

    fn base_config(product: Product) -> UsageConfig {
        UsageConfig {
            product,
            radio: RadioSettings {
                spreading_factor: 10,
                tx_power: TxPower::Dbm14,
                repetition: 1,
            },
            accelerometer_on: false,
            custom: CustomUsage::default(),
            heartbeat: HeartbeatUsage::default(),
            gps: GpsUsage::default(),
            agps: AgpsUsage::default(),
            wifi: WifiUsage::default(),
            ble: BleUsage::default(),
            custom_ble: CustomBleUsage::default(),
        }
    }

    fn busy_config(product: Product) -> UsageConfig {
        let mut config = base_config(product);
        config.accelerometer_on = true;
        config.heartbeat.msgs_per_day = 24.0;
        config.gps.msgs_per_day = 24.0;
        config.agps.msgs_per_day = 24.0;
        config.wifi.msgs_per_day = 24.0;
        config.ble.msgs_per_day = 24.0;
        config
    }

    #[test]
    fn test_gps_min_policy_regression_vector() {
        // ttff 49 s, conv 90 s, 24 fixes/day: the hot-start blend wins.
        // (139*22 + 23*90*22 + (86400 - 2160)*0.05) / 86400 = 52810/86400.
        let profile = HardwareProfile::default();
        let usage = GpsUsage { msgs_per_day: 24.0, ttff_s: 49.0, conv_time_s: 90.0 };
        let i = gps_average_current_ma(&profile, &usage);
        assert!((i - 52_810.0 / 86_400.0).abs() < 1e-12, "got {i}");
    }

    #[test]
    fn test_gps_min_policy_prefers_cold_only_at_low_rates() {
        // At one fix per day the standby term dominates the hot-start
        // blend, so the cold-start-only bound is smaller.
        let profile = HardwareProfile::default();
        let usage = GpsUsage { msgs_per_day: 1.0, ttff_s: 20.0, conv_time_s: 30.0 };
        let cold_only = 50.0 * 22.0 * 1.0 / SECONDS_PER_DAY;
        let i = gps_average_current_ma(&profile, &usage);
        assert!((i - cold_only).abs() < 1e-12, "got {i}");
    }

    #[test]
    fn test_gps_cold_usage_capped_by_fix_timeout() {
        let profile = HardwareProfile::default();
        let capped = GpsUsage { msgs_per_day: 1.0, ttff_s: 400.0, conv_time_s: 100.0 };
        let at_cap = GpsUsage { msgs_per_day: 1.0, ttff_s: 200.0, conv_time_s: 100.0 };
        assert_eq!(
            gps_average_current_ma(&profile, &capped),
            gps_average_current_ma(&profile, &at_cap),
        );
    }

    #[test]
    fn test_simple_positioning_models() {
        let profile = HardwareProfile::default();
        let agps = AgpsUsage { msgs_per_day: 24.0, on_time_s: 8.0, satellites: 5 };
        assert!((agps_average_current_ma(&profile, &agps) - 4_224.0 / 86_400.0).abs() < 1e-12);

        let wifi = WifiUsage { msgs_per_day: 24.0, bssids: 4 };
        assert!((wifi_average_current_ma(&profile, &wifi) - 0.05).abs() < 1e-12);

        let ble = BleUsage { msgs_per_day: 24.0, beacons: 4, operation: BleMode::FastScan };
        let i = ble_scan_average_current_ma(&profile, &ble).unwrap();
        assert!((i - 384.0 / 86_400.0).abs() < 1e-12);
    }

    #[test]
    fn test_custom_ble_is_duration_weighted() {
        let profile = HardwareProfile::default();
        let usage = CustomBleUsage {
            operation: BleMode::FastAdv,
            usage_hours_per_day: 6.0,
        };
        let i = custom_ble_average_current_ma(&profile, &usage).unwrap();
        assert!((i - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_usage_baseline_is_fixed_draws_plus_leakage() {
        let profile = HardwareProfile::default();
        let config = base_config(Product::Micro);
        let estimate = compute_battery_life(&config, &profile).unwrap();

        let battery = profile.battery(Product::Micro).unwrap();
        let expected = profile.quiescent_current_ma + leakage_current_ma(&battery);
        assert_eq!(estimate.total_current_ma, expected);
    }

    #[test]
    fn test_accelerometer_adds_exactly_its_constant() {
        let profile = HardwareProfile::default();
        let mut config = base_config(Product::Micro);
        let without = compute_battery_life(&config, &profile).unwrap();
        config.accelerometer_on = true;
        let with = compute_battery_life(&config, &profile).unwrap();
        let delta = with.total_current_ma - without.total_current_ma;
        assert!((delta - profile.accelerometer_current_ma).abs() < 1e-15);
    }

    #[test]
    fn test_micro_accelerometer_lifetime_bound() {
        // Micro product, accelerometer only: lifetime is bounded by
        // 450 * 0.9 / (quiescent + accelerometer + leakage) / 24 days.
        let profile = HardwareProfile::default();
        let mut config = base_config(Product::Micro);
        config.accelerometer_on = true;
        let estimate = compute_battery_life(&config, &profile).unwrap();

        let battery = profile.battery(Product::Micro).unwrap();
        let bound = 450.0 * 0.9
            / (profile.quiescent_current_ma
                + profile.accelerometer_current_ma
                + leakage_current_ma(&battery))
            / HOURS_PER_DAY;
        assert!(estimate.lifetime_days <= bound + 1e-9);
        assert!(estimate.lifetime_days > 500.0, "got {}", estimate.lifetime_days);
    }

    #[test]
    fn test_lifetime_positive_for_busy_config() {
        let profile = HardwareProfile::default();
        let estimate = compute_battery_life(&busy_config(Product::Compact), &profile).unwrap();
        assert!(estimate.lifetime_days > 0.0);
        assert!(estimate.total_current_ma > 0.0);
    }

    #[test]
    fn test_breakdown_sums_to_one_hundred() {
        let profile = HardwareProfile::default();
        for product in [Product::Micro, Product::Compact, Product::Industrial] {
            let estimate = compute_battery_life(&busy_config(product), &profile).unwrap();
            let sum: f64 = estimate.breakdown.values().sum();
            assert!((sum - 100.0).abs() <= 0.5, "{product:?}: sum {sum}");
        }
    }

    #[test]
    fn test_breakdown_always_contains_every_category() {
        let profile = HardwareProfile::default();
        let estimate = compute_battery_life(&base_config(Product::Micro), &profile).unwrap();
        assert_eq!(estimate.breakdown.len(), 10);
        assert_eq!(estimate.breakdown[&Category::Heartbeat], 0.0);
    }

    #[test]
    fn test_repetition_scales_radio_contribution_linearly() {
        // Heartbeat-only traffic: doubling the repetition must exactly
        // double the LoRa contribution and nothing else.
        let profile = HardwareProfile::default();
        let mut config = base_config(Product::Compact);
        config.heartbeat.msgs_per_day = 24.0;

        let battery = profile.battery(Product::Compact).unwrap();
        let fixed = profile.quiescent_current_ma + leakage_current_ma(&battery);

        let single = compute_battery_life(&config, &profile).unwrap();
        config.radio.repetition = 2;
        let double = compute_battery_life(&config, &profile).unwrap();

        let lora_single = single.total_current_ma - fixed;
        let lora_double = double.total_current_ma - fixed;
        assert!(lora_single > 0.0);
        assert!((lora_double - 2.0 * lora_single).abs() < 1e-12);
    }

    #[test]
    fn test_zero_total_current_is_an_error() {
        let mut profile = HardwareProfile::default();
        profile.quiescent_current_ma = 0.0;
        profile.batteries.insert(
            Product::Micro,
            BatterySpec {
                capacity_mah: 450.0,
                practical_capacity: 0.9,
                leakage_per_month: 0.0,
            },
        );
        let config = base_config(Product::Micro);
        let err = compute_battery_life(&config, &profile).unwrap_err();
        assert!(matches!(err, ModelError::Compute(ComputeError::ZeroTotalCurrent)));
    }

    #[test]
    fn test_invalid_spreading_factor_surfaces_as_config_error() {
        let profile = HardwareProfile::default();
        let mut config = base_config(Product::Micro);
        config.radio.spreading_factor = 13;
        assert!(matches!(
            compute_battery_life(&config, &profile),
            Err(ModelError::Config(_)),
        ));
    }
}
