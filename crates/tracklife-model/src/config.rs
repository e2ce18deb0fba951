//! Usage configuration types.
//!
//! A [`UsageConfig`] describes how a tracker is operated: which product it
//! is, how the radio is configured, and how often each message category
//! fires. It is the sole input of the estimator and is usually loaded from
//! a YAML scenario file.

use serde::{Deserialize, Serialize};
use tracklife_common::ConfigError;

use crate::profile::{BleMode, Product, TxPower};

// ============================================================================
// Radio Settings
// ============================================================================

/// Radio configuration shared by every LoRa transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RadioSettings {
    /// LoRa spreading factor (7-12).
    pub spreading_factor: u8,
    /// Transmit power setting.
    pub tx_power: TxPower,
    /// Number of times each message is transmitted. Applied uniformly to
    /// all message categories.
    #[serde(default = "default_repetition")]
    pub repetition: u32,
}

fn default_repetition() -> u32 {
    1
}

// ============================================================================
// Message Category Settings
// ============================================================================

/// Application-defined message stream with a caller-chosen payload length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomUsage {
    /// Messages per day.
    pub msgs_per_day: f64,
    /// Payload length in bytes.
    pub payload_len: u32,
}

/// Periodic heartbeat messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeartbeatUsage {
    /// Messages per day.
    pub msgs_per_day: f64,
}

/// GPS position fixes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GpsUsage {
    /// Position messages per day.
    pub msgs_per_day: f64,
    /// Time to first fix from a cold start, in seconds.
    pub ttff_s: f64,
    /// Convergence time of a hot-start fix, in seconds.
    pub conv_time_s: f64,
}

impl Default for GpsUsage {
    fn default() -> Self {
        GpsUsage {
            msgs_per_day: 0.0,
            ttff_s: 49.0,
            conv_time_s: 90.0,
        }
    }
}

/// Assisted-GPS position fixes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgpsUsage {
    /// Position messages per day.
    pub msgs_per_day: f64,
    /// Receiver on-time per fix, in seconds.
    pub on_time_s: f64,
    /// Number of satellites reported per message. Scales the payload.
    pub satellites: u32,
}

impl Default for AgpsUsage {
    fn default() -> Self {
        AgpsUsage {
            msgs_per_day: 0.0,
            on_time_s: 8.0,
            satellites: 5,
        }
    }
}

/// Wi-Fi positioning scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WifiUsage {
    /// Position messages per day.
    pub msgs_per_day: f64,
    /// Number of BSSIDs reported per message. Scales the payload.
    pub bssids: u32,
}

impl Default for WifiUsage {
    fn default() -> Self {
        WifiUsage {
            msgs_per_day: 0.0,
            bssids: 4,
        }
    }
}

/// BLE positioning scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BleUsage {
    /// Position messages per day.
    pub msgs_per_day: f64,
    /// Number of beacons reported per message. Scales the payload.
    pub beacons: u32,
    /// Scan mode used for each positioning message.
    pub operation: BleMode,
}

impl Default for BleUsage {
    fn default() -> Self {
        BleUsage {
            msgs_per_day: 0.0,
            beacons: 4,
            operation: BleMode::FastScan,
        }
    }
}

/// Continuous BLE usage beyond positioning, by daily duration.
///
/// Unlike [`BleUsage`] this does not fire per message: the mode runs for a
/// total number of hours per day regardless of message traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomBleUsage {
    /// BLE operation mode.
    pub operation: BleMode,
    /// Hours per day the mode is active.
    pub usage_hours_per_day: f64,
}

impl Default for CustomBleUsage {
    fn default() -> Self {
        CustomBleUsage {
            operation: BleMode::FastAdv,
            usage_hours_per_day: 0.0,
        }
    }
}

// ============================================================================
// Usage Configuration
// ============================================================================

/// Complete usage description of one tracker deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsageConfig {
    /// Product variant, selecting the battery specification.
    pub product: Product,
    /// Radio settings shared by all transmissions.
    pub radio: RadioSettings,
    /// Whether the accelerometer is powered.
    #[serde(default)]
    pub accelerometer_on: bool,
    /// Application-defined message stream.
    #[serde(default)]
    pub custom: CustomUsage,
    /// Heartbeat messages.
    #[serde(default)]
    pub heartbeat: HeartbeatUsage,
    /// GPS position fixes.
    #[serde(default)]
    pub gps: GpsUsage,
    /// Assisted-GPS position fixes.
    #[serde(default)]
    pub agps: AgpsUsage,
    /// Wi-Fi positioning scans.
    #[serde(default)]
    pub wifi: WifiUsage,
    /// BLE positioning scans.
    #[serde(default)]
    pub ble: BleUsage,
    /// Continuous BLE usage by daily duration.
    #[serde(default)]
    pub custom_ble: CustomBleUsage,
}

impl UsageConfig {
    /// Validate every numeric field before computation.
    ///
    /// Checks the spreading factor range, the repetition lower bound, and
    /// non-negativity of every rate and duration. The estimator calls this
    /// first, so a configuration either fully passes or the computation
    /// never starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        tracklife_lora::validate_spreading_factor(self.radio.spreading_factor)?;
        if self.radio.repetition < 1 {
            return Err(ConfigError::Repetition(self.radio.repetition));
        }

        let non_negative = [
            ("custom.msgs_per_day", self.custom.msgs_per_day),
            ("heartbeat.msgs_per_day", self.heartbeat.msgs_per_day),
            ("gps.msgs_per_day", self.gps.msgs_per_day),
            ("gps.ttff_s", self.gps.ttff_s),
            ("gps.conv_time_s", self.gps.conv_time_s),
            ("agps.msgs_per_day", self.agps.msgs_per_day),
            ("agps.on_time_s", self.agps.on_time_s),
            ("wifi.msgs_per_day", self.wifi.msgs_per_day),
            ("ble.msgs_per_day", self.ble.msgs_per_day),
            ("custom_ble.usage_hours_per_day", self.custom_ble.usage_hours_per_day),
        ];
        for (field, value) in non_negative {
            if value < 0.0 || !value.is_finite() {
                return Err(ConfigError::NegativeField { field, value });
            }
        }
        Ok(())
    }
}
