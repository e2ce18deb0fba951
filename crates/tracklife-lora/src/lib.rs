//! # tracklife-lora
//!
//! LoRa PHY calculations for the tracklife battery estimator.
//!
//! This crate provides:
//! - Time-on-air calculation ([`time_on_air_ms`])
//! - Per-transmission energy ([`energy_per_transmission_mj`])
//! - Average current contribution of a message stream ([`average_current_ma`])
//! - Configurable radio hardware parameters ([`RadioHardware`])
//!
//! The model covers one uplink transmission: the TX burst itself, the two
//! class-A receive windows that open after it, and the MCU staying awake
//! from TX start until the second window has closed.

use serde::{Deserialize, Serialize};
use tracklife_common::{ConfigError, SECONDS_PER_DAY, SPREADING_FACTORS};

// ============================================================================
// Radio Hardware Parameters
// ============================================================================

/// Hardware parameters of the radio and its host MCU.
///
/// Defaults match the SX1262-based tracker boards this estimator was
/// characterized against. The struct is deserializable so tests and callers
/// can supply synthetic hardware profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RadioHardware {
    /// Supply voltage in volts.
    pub supply_voltage_v: f64,
    /// MCU current while awake, in mA.
    pub mcu_current_ma: f64,
    /// Receiver current while an RX window is open, in mA.
    pub rx_current_ma: f64,
    /// Length of one RX window, in symbols.
    pub rx_window_symbols: u32,
    /// Number of RX windows opened after each transmission.
    pub rx_windows: u32,
    /// Time the MCU stays awake after time-on-air waiting for both RX
    /// windows to open and close, in ms.
    pub post_tx_wake_ms: f64,
}

impl Default for RadioHardware {
    fn default() -> Self {
        RadioHardware {
            supply_voltage_v: 3.6,
            mcu_current_ma: 0.3,
            rx_current_ma: 10.0,
            rx_window_symbols: 8,
            rx_windows: 2,
            post_tx_wake_ms: 2000.0,
        }
    }
}

// ============================================================================
// PHY Calculations
// ============================================================================

/// Bandwidth-derived symbol rate divisor: 125 kHz expressed in symbols/ms.
const SYMBOL_RATE_KHZ: f64 = 125.0;

/// Preamble length in symbols (8 programmed + 4.25 sync/SFD).
const PREAMBLE_SYMBOLS: f64 = 12.25;

/// Validate a spreading factor against the supported 7-12 range.
pub fn validate_spreading_factor(sf: u8) -> Result<(), ConfigError> {
    if SPREADING_FACTORS.contains(&sf) {
        Ok(())
    } else {
        Err(ConfigError::SpreadingFactor(sf))
    }
}

/// Duration of one LoRa symbol in ms at 125 kHz bandwidth.
fn symbol_time_ms(sf: u8) -> f64 {
    (1u32 << sf) as f64 / SYMBOL_RATE_KHZ
}

/// Calculate the time on air for one transmission, in ms.
///
/// Uses the LoRa payload symbol formula at coding rate 4/5 with an explicit
/// 13-byte PHY overhead. Low-data-rate optimization is in effect for SF11
/// and SF12, which changes the denominator from `4*sf` to `4*sf - 8`.
pub fn time_on_air_ms(sf: u8, payload_len: u32) -> Result<f64, ConfigError> {
    validate_spreading_factor(sf)?;

    let t_sym = symbol_time_ms(sf);
    let sf_f = sf as f64;

    let denom = if sf >= 11 { 4.0 * sf_f - 8.0 } else { 4.0 * sf_f };
    let numer = (payload_len as f64 + 12.0) * 8.0 - 4.0 * (sf_f - 7.0) + 16.0;
    let payload_symbols = 8.0 + (numer / denom).ceil() * 5.0;

    Ok(t_sym * payload_symbols + PREAMBLE_SYMBOLS * t_sym)
}

/// Energy consumed by one complete transmission, in mJ.
///
/// Sum of the TX burst, the RX windows that follow it, and the MCU staying
/// awake for the time on air plus the post-TX window.
pub fn energy_per_transmission_mj(
    hw: &RadioHardware,
    sf: u8,
    tx_current_ma: f64,
    payload_len: u32,
) -> Result<f64, ConfigError> {
    let toa_ms = time_on_air_ms(sf, payload_len)?;
    let t_sym = symbol_time_ms(sf);
    let v = hw.supply_voltage_v;

    let tx_energy = toa_ms * v * tx_current_ma / 1000.0;
    let rx_energy = hw.rx_windows as f64
        * hw.rx_window_symbols as f64
        * t_sym
        * v
        * hw.rx_current_ma
        / 1000.0;
    let mcu_energy = (toa_ms + hw.post_tx_wake_ms) * v * hw.mcu_current_ma / 1000.0;

    Ok(tx_energy + rx_energy + mcu_energy)
}

/// Average current of a message stream, in mA.
///
/// Converts the per-transmission energy back to the charge domain and
/// spreads it over a day at the given message rate.
pub fn average_current_ma(
    hw: &RadioHardware,
    sf: u8,
    tx_current_ma: f64,
    payload_len: u32,
    msgs_per_day: f64,
) -> Result<f64, ConfigError> {
    let energy_mj = energy_per_transmission_mj(hw, sf, tx_current_ma, payload_len)?;
    Ok(energy_mj / hw.supply_voltage_v * msgs_per_day / SECONDS_PER_DAY)
}
