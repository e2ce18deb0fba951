//! Report formatting for battery life estimates.
//!
//! Presentation only: the estimator always returns the full breakdown, and
//! this module decides what a human wants to see (categories with a zero
//! share are suppressed from the text table).

use tracklife_model::{BatteryEstimate, HardwareProfile, Product, TxPower, UsageConfig};

/// Render an estimate as a human-readable text report.
pub fn format_text(config: &UsageConfig, estimate: &BatteryEstimate) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Product:               {}\n",
        config.product.description()
    ));
    out.push_str(&format!(
        "Radio:                 SF{}, {}, {}x repetition\n",
        config.radio.spreading_factor,
        config.radio.tx_power.description(),
        config.radio.repetition
    ));
    out.push_str(&format!(
        "Total average current: {:.4} mA\n",
        estimate.total_current_ma
    ));
    out.push_str(&format!(
        "Estimated battery life: {:.2} days ({:.1} months)\n",
        estimate.lifetime_days,
        estimate.lifetime_days / 30.0
    ));

    out.push_str("\nConsumption breakdown:\n");
    for (category, percent) in &estimate.breakdown {
        if *percent == 0.0 {
            continue;
        }
        out.push_str(&format!("  {:<18} {:>5.1} %\n", category.to_string(), percent));
    }

    out
}

/// Render an estimate as a JSON document.
pub fn format_json(estimate: &BatteryEstimate) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(estimate)
}

/// Render the built-in hardware tables.
///
/// Companion of the `profiles` subcommand so users can see which products,
/// power settings, and BLE modes a scenario may reference.
pub fn format_profiles(profile: &HardwareProfile) -> String {
    let mut out = String::new();

    out.push_str("Products:\n");
    for product in Product::ALL {
        if let Ok(battery) = profile.battery(product) {
            out.push_str(&format!(
                "  {:<20} {:>7.0} mAh, practical {:.0}%, leakage {:.1}%/month\n",
                product.description(),
                battery.capacity_mah,
                battery.practical_capacity * 100.0,
                battery.leakage_per_month * 100.0
            ));
        }
    }

    out.push_str("\nTX power settings:\n");
    for tx_power in TxPower::ALL {
        if let Ok(current) = profile.tx_current_ma(tx_power) {
            out.push_str(&format!(
                "  {:<20} {:>5.0} mA TX current\n",
                tx_power.description(),
                current
            ));
        }
    }

    out.push_str("\nBLE operation modes:\n");
    for mode in tracklife_model::BleMode::ALL {
        if let Ok(op) = profile.ble_op(mode) {
            out.push_str(&format!(
                "  {:<26} {:>4.0} s at {:.1} mA\n",
                mode.description(),
                op.duty_s,
                op.current_ma
            ));
        }
    }

    out
}
