//! 3GPP TR 37.885 V2V path loss.
//!
//! All functions take the distance in metres and the carrier frequency in
//! GHz and return dB.  Distances below 1 m are clamped to 1 m.

use crate::{ChannelCondition, Scenario};

/// Standard deviation of LOS shadowing, dB.
pub const SIGMA_LOS_DB: f64 = 3.0;

/// Standard deviation of NLOS shadowing, dB.
pub const SIGMA_NLOS_DB: f64 = 4.0;

/// Standard deviation of the NLOSv vehicle-blockage loss, dB.
pub const SIGMA_BLOCKAGE_DB: f64 = 4.5;

#[inline]
fn clamp(d: f64) -> f64 {
    d.max(1.0)
}

/// LOS path loss.
pub fn los(scenario: Scenario, d: f64, fc_ghz: f64) -> f64 {
    let d = clamp(d);
    if scenario.is_highway() {
        32.4 + 20.0 * d.log10() + 20.0 * fc_ghz.log10()
    } else {
        38.77 + 16.7 * d.log10() + 18.2 * fc_ghz.log10()
    }
}

/// NLOS path loss; identical for highway and urban.
pub fn nlos(d: f64, fc_ghz: f64) -> f64 {
    let d = clamp(d);
    36.85 + 30.0 * d.log10() + 18.9 * fc_ghz.log10()
}

/// Mean additional loss of a blocking vehicle.
pub fn blockage_mean(d: f64) -> f64 {
    let d = clamp(d);
    9.0 + (15.0 * d.log10() - 41.0).max(0.0)
}

/// NLOSv path loss: LOS plus the mean vehicle blockage loss.
pub fn nlos_v(scenario: Scenario, d: f64, fc_ghz: f64) -> f64 {
    los(scenario, d, fc_ghz) + blockage_mean(d)
}

/// Probability that the link is LOS at distance `d`.
pub fn los_probability(scenario: Scenario, d: f64) -> f64 {
    if scenario.is_highway() {
        if d <= 475.0 {
            (2.1013e-6 * d * d - 0.002 * d + 1.0193).min(1.0)
        } else {
            (0.54 - 0.001 * (d - 475.0)).max(0.0)
        }
    } else {
        (1.05 * (-0.0114 * d).exp()).min(1.0)
    }
}

/// Mean loss for a resolved (never `All`) condition.
pub fn mean_loss(scenario: Scenario, condition: ChannelCondition, d: f64, fc_ghz: f64) -> f64 {
    match condition {
        ChannelCondition::Los | ChannelCondition::All => los(scenario, d, fc_ghz),
        ChannelCondition::Nlos  => nlos(d, fc_ghz),
        ChannelCondition::NlosV => nlos_v(scenario, d, fc_ghz),
    }
}

/// Shadowing standard deviation for a resolved condition.
pub fn shadowing_sigma(condition: ChannelCondition) -> f64 {
    match condition {
        ChannelCondition::Los | ChannelCondition::All => SIGMA_LOS_DB,
        ChannelCondition::Nlos  => SIGMA_NLOS_DB,
        ChannelCondition::NlosV => SIGMA_LOS_DB.hypot(SIGMA_BLOCKAGE_DB),
    }
}
