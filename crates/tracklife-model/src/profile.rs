//! Hardware profile registry.
//!
//! All hardware constant tables live here as one immutable [`HardwareProfile`]
//! value that is passed into the estimator, not read from globals. The
//! defaults are the datasheet/characterization values for the supported
//! tracker products; tests and callers can deserialize a synthetic profile
//! to exercise the models with different hardware.
//!
//! BTreeMap is used for all tables so that iteration order (and therefore
//! report output) is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracklife_common::ConfigError;
use tracklife_lora::RadioHardware;

// ============================================================================
// Battery Types and Products
// ============================================================================

/// Battery chemistry classes with their derating behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryType {
    /// Primary lithium thionyl chloride cell.
    Primary,
    /// Rechargeable lithium polymer cell.
    Rechargeable,
}

impl BatteryType {
    /// Self-discharge per month, as a ratio of nominal capacity.
    pub fn leakage_per_month(self) -> f64 {
        match self {
            BatteryType::Primary => 0.003,
            BatteryType::Rechargeable => 0.05,
        }
    }

    /// Usable fraction of nominal capacity after derating.
    pub fn practical_capacity(self) -> f64 {
        match self {
            BatteryType::Primary => 0.80,
            BatteryType::Rechargeable => 0.90,
        }
    }
}

/// Tracker product variants, each selecting a battery specification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    /// Industrial tracker, 19 Ah primary cell.
    Industrial,
    /// Compact tracker, 8 Ah primary cell.
    Compact,
    /// Microtracker, 450 mAh rechargeable cell.
    Micro,
    /// Smart badge, 1.3 Ah rechargeable cell.
    SmartBadge,
}

impl Product {
    /// Human-readable product name for reports.
    pub fn description(self) -> &'static str {
        match self {
            Product::Industrial => "Industrial Tracker",
            Product::Compact => "Compact Tracker",
            Product::Micro => "Microtracker",
            Product::SmartBadge => "Smart Badge",
        }
    }

    /// All product variants, in report order.
    pub const ALL: [Product; 4] = [
        Product::Industrial,
        Product::Compact,
        Product::Micro,
        Product::SmartBadge,
    ];
}

/// Battery specification of one product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatterySpec {
    /// Nominal capacity in mAh.
    pub capacity_mah: f64,
    /// Usable fraction of nominal capacity.
    pub practical_capacity: f64,
    /// Self-discharge per month, as a ratio of nominal capacity.
    pub leakage_per_month: f64,
}

impl BatterySpec {
    fn new(capacity_mah: f64, battery_type: BatteryType) -> Self {
        BatterySpec {
            capacity_mah,
            practical_capacity: battery_type.practical_capacity(),
            leakage_per_month: battery_type.leakage_per_month(),
        }
    }
}

// ============================================================================
// Radio TX Power
// ============================================================================

/// Transmit power settings of the SX1262.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TxPower {
    /// 14 dBm output.
    Dbm14,
    /// 17 dBm output.
    Dbm17,
    /// 19 dBm output.
    Dbm19,
}

impl TxPower {
    /// Human-readable setting name for reports.
    pub fn description(self) -> &'static str {
        match self {
            TxPower::Dbm14 => "14 dBm",
            TxPower::Dbm17 => "17 dBm",
            TxPower::Dbm19 => "19 dBm",
        }
    }

    /// All TX power settings, in report order.
    pub const ALL: [TxPower; 3] = [TxPower::Dbm14, TxPower::Dbm17, TxPower::Dbm19];
}

// ============================================================================
// BLE Operation Modes
// ============================================================================

/// BLE operation modes, each with a fixed duty time and current draw.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BleMode {
    /// Fast advertisement bursts.
    FastAdv,
    /// Slow advertisement bursts.
    SlowAdv,
    /// Connected link maintenance.
    Connected,
    /// Fast scan window.
    FastScan,
    /// Slow scan window.
    SlowScan,
}

impl BleMode {
    /// Human-readable mode name for reports.
    pub fn description(self) -> &'static str {
        match self {
            BleMode::FastAdv => "Fast advertisement (2s)",
            BleMode::SlowAdv => "Slow advertisement (10s)",
            BleMode::Connected => "Connected (2s)",
            BleMode::FastScan => "Fast BLE scan (8s)",
            BleMode::SlowScan => "Slow BLE scan (30s)",
        }
    }

    /// All BLE modes, in report order.
    pub const ALL: [BleMode; 5] = [
        BleMode::FastAdv,
        BleMode::SlowAdv,
        BleMode::Connected,
        BleMode::FastScan,
        BleMode::SlowScan,
    ];
}

/// Timing and current of one BLE operation mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BleOp {
    /// Duty time of one operation, in seconds.
    pub duty_s: f64,
    /// Current draw while the operation runs, in mA.
    pub current_ma: f64,
}

// ============================================================================
// Payload Lengths
// ============================================================================

/// Payload length formula for a message category: `base + per_unit * count`.
///
/// The variable part scales with the number of reported satellites, BSSIDs,
/// or beacons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayloadSpec {
    /// Fixed payload bytes.
    pub base: u32,
    /// Additional bytes per reported unit.
    pub per_unit: u32,
}

impl PayloadSpec {
    /// Fixed-length payload.
    pub const fn fixed(base: u32) -> Self {
        PayloadSpec { base, per_unit: 0 }
    }

    /// Total payload length for a given unit count.
    pub fn length(&self, unit_count: u32) -> u32 {
        self.base + self.per_unit * unit_count
    }
}

/// Payload length table for all message categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PayloadTable {
    /// Heartbeat message payload.
    pub heartbeat: PayloadSpec,
    /// GPS position message payload.
    pub gps: PayloadSpec,
    /// Assisted-GPS message payload; scales with satellite count.
    pub agps: PayloadSpec,
    /// Wi-Fi positioning message payload; scales with BSSID count.
    pub wifi: PayloadSpec,
    /// BLE positioning message payload; scales with beacon count.
    pub ble: PayloadSpec,
}

impl Default for PayloadTable {
    fn default() -> Self {
        // Per-unit scaling reproduces the fixed frame sizes of the wire
        // format at the default counts: AGPS 30 B at 5 satellites, Wi-Fi
        // and BLE 33 B at 4 BSSIDs/beacons.
        PayloadTable {
            heartbeat: PayloadSpec::fixed(5),
            gps: PayloadSpec::fixed(17),
            agps: PayloadSpec { base: 5, per_unit: 5 },
            wifi: PayloadSpec { base: 5, per_unit: 7 },
            ble: PayloadSpec { base: 5, per_unit: 7 },
        }
    }
}

// ============================================================================
// Hardware Profile
// ============================================================================

/// Immutable registry of every hardware constant the estimator needs.
///
/// Constructed once (usually via `Default`) and passed by reference into
/// [`crate::compute_battery_life`]. Deserializing a partial profile merges
/// field-by-field over the defaults, so synthetic test profiles only need
/// to name what they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HardwareProfile {
    /// Radio and MCU parameters used by the time-on-air energy model.
    pub radio: RadioHardware,
    /// Battery specification per product.
    pub batteries: BTreeMap<Product, BatterySpec>,
    /// SX1262 TX current per transmit power setting, in mA.
    pub tx_currents_ma: BTreeMap<TxPower, f64>,
    /// Timing and current per BLE operation mode.
    pub ble_ops: BTreeMap<BleMode, BleOp>,
    /// GPS receiver current while acquiring, in mA.
    pub gps_current_ma: f64,
    /// GPS receiver standby current between fixes, in mA.
    pub gps_standby_current_ma: f64,
    /// GPS fix timeout cap, in seconds. A cold start never runs longer.
    pub gps_timeout_s: f64,
    /// Wi-Fi scan current, in mA.
    pub wifi_current_ma: f64,
    /// Wi-Fi scan on-time per positioning message, in seconds.
    pub wifi_on_time_s: f64,
    /// Accelerometer current when enabled, in mA.
    pub accelerometer_current_ma: f64,
    /// Quiescent (sleep) current, always drawn, in mA.
    pub quiescent_current_ma: f64,
    /// Message payload length table.
    pub payload: PayloadTable,
}

impl Default for HardwareProfile {
    fn default() -> Self {
        let batteries = BTreeMap::from([
            (Product::Industrial, BatterySpec::new(19_000.0, BatteryType::Primary)),
            (Product::Compact, BatterySpec::new(8_000.0, BatteryType::Primary)),
            (Product::Micro, BatterySpec::new(450.0, BatteryType::Rechargeable)),
            (Product::SmartBadge, BatterySpec::new(1_300.0, BatteryType::Rechargeable)),
        ]);
        let tx_currents_ma = BTreeMap::from([
            (TxPower::Dbm14, 45.0),
            (TxPower::Dbm17, 75.0),
            (TxPower::Dbm19, 85.0),
        ]);
        let ble_ops = BTreeMap::from([
            (BleMode::FastAdv, BleOp { duty_s: 2.0, current_ma: 10.0 }),
            (BleMode::SlowAdv, BleOp { duty_s: 10.0, current_ma: 3.5 }),
            (BleMode::Connected, BleOp { duty_s: 2.0, current_ma: 3.6 }),
            (BleMode::FastScan, BleOp { duty_s: 8.0, current_ma: 2.0 }),
            (BleMode::SlowScan, BleOp { duty_s: 30.0, current_ma: 0.5 }),
        ]);

        HardwareProfile {
            radio: RadioHardware::default(),
            batteries,
            tx_currents_ma,
            ble_ops,
            gps_current_ma: 22.0,
            gps_standby_current_ma: 0.05,
            gps_timeout_s: 300.0,
            wifi_current_ma: 60.0,
            wifi_on_time_s: 3.0,
            accelerometer_current_ma: 0.0065,
            quiescent_current_ma: 0.010,
            payload: PayloadTable::default(),
        }
    }
}

impl HardwareProfile {
    /// Battery specification for a product.
    pub fn battery(&self, product: Product) -> Result<BatterySpec, ConfigError> {
        self.batteries.get(&product).copied().ok_or_else(|| {
            ConfigError::MissingProfileEntry {
                table: "batteries",
                entry: product.description().to_string(),
            }
        })
    }

    /// TX current for a transmit power setting, in mA.
    pub fn tx_current_ma(&self, tx_power: TxPower) -> Result<f64, ConfigError> {
        self.tx_currents_ma.get(&tx_power).copied().ok_or_else(|| {
            ConfigError::MissingProfileEntry {
                table: "tx_currents_ma",
                entry: tx_power.description().to_string(),
            }
        })
    }

    /// Timing and current of a BLE operation mode.
    pub fn ble_op(&self, mode: BleMode) -> Result<BleOp, ConfigError> {
        self.ble_ops.get(&mode).copied().ok_or_else(|| {
            ConfigError::MissingProfileEntry {
                table: "ble_ops",
                entry: mode.description().to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_battery_specs() {
        let profile = HardwareProfile::default();
        let compact = profile.battery(Product::Compact).unwrap();
        assert_eq!(compact.capacity_mah, 8_000.0);
        assert_eq!(compact.practical_capacity, 0.80);
        assert_eq!(compact.leakage_per_month, 0.003);

        let micro = profile.battery(Product::Micro).unwrap();
        assert_eq!(micro.capacity_mah, 450.0);
        assert_eq!(micro.practical_capacity, 0.90);
        assert_eq!(micro.leakage_per_month, 0.05);
    }

    #[test]
    fn test_default_tables_cover_all_variants() {
        let profile = HardwareProfile::default();
        for product in Product::ALL {
            assert!(profile.battery(product).is_ok());
        }
        for tx_power in TxPower::ALL {
            assert!(profile.tx_current_ma(tx_power).is_ok());
        }
        for mode in BleMode::ALL {
            assert!(profile.ble_op(mode).is_ok());
        }
    }

    #[test]
    fn test_payload_defaults_match_wire_frame_sizes() {
        let table = PayloadTable::default();
        assert_eq!(table.heartbeat.length(0), 5);
        assert_eq!(table.gps.length(0), 17);
        assert_eq!(table.agps.length(5), 30);
        assert_eq!(table.wifi.length(4), 33);
        assert_eq!(table.ble.length(4), 33);
    }

    #[test]
    fn test_profile_yaml_override() {
        // Synthetic profiles override field by field over the defaults.
        let yaml = "quiescent_current_ma: 0.02\ngps_current_ma: 25.0\n";
        let profile: HardwareProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profile.quiescent_current_ma, 0.02);
        assert_eq!(profile.gps_current_ma, 25.0);
        assert_eq!(profile.wifi_current_ma, 60.0);
        assert!(profile.battery(Product::Industrial).is_ok());
    }

    #[test]
    fn test_partial_table_reports_missing_entry() {
        let yaml = "ble_ops:\n  fast_scan:\n    duty_s: 8.0\n    current_ma: 2.0\n";
        let profile: HardwareProfile = serde_yaml::from_str(yaml).unwrap();
        assert!(profile.ble_op(BleMode::FastScan).is_ok());
        let err = profile.ble_op(BleMode::SlowScan).unwrap_err();
        assert!(matches!(err, ConfigError::MissingProfileEntry { table: "ble_ops", .. }));
    }

    #[test]
    fn test_enum_snake_case_names() {
        assert_eq!(serde_yaml::to_string(&Product::SmartBadge).unwrap().trim(), "smart_badge");
        assert_eq!(serde_yaml::to_string(&BleMode::FastScan).unwrap().trim(), "fast_scan");
        assert_eq!(serde_yaml::to_string(&TxPower::Dbm14).unwrap().trim(), "dbm14");
    }
}
