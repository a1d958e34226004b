//! Channel configuration: scenario tag, channel condition, weather.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ChannelError, ChannelResult};

// ── Scenario ──────────────────────────────────────────────────────────────────

/// 3GPP V2V propagation scenario.
///
/// `Extended-*` variants use the 3-D distance between the endpoints; the
/// base variants use the ground (2-D) distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scenario {
    #[serde(rename = "V2V-Highway")]
    V2vHighway,
    #[serde(rename = "V2V-Urban")]
    V2vUrban,
    #[serde(rename = "Extended-V2V-Highway")]
    ExtendedV2vHighway,
    #[serde(rename = "Extended-V2V-Urban")]
    ExtendedV2vUrban,
}

impl Scenario {
    pub fn label(self) -> &'static str {
        match self {
            Scenario::V2vHighway         => "V2V-Highway",
            Scenario::V2vUrban           => "V2V-Urban",
            Scenario::ExtendedV2vHighway => "Extended-V2V-Highway",
            Scenario::ExtendedV2vUrban   => "Extended-V2V-Urban",
        }
    }

    pub fn is_highway(self) -> bool {
        matches!(self, Scenario::V2vHighway | Scenario::ExtendedV2vHighway)
    }

    pub fn is_extended(self) -> bool {
        matches!(self, Scenario::ExtendedV2vHighway | Scenario::ExtendedV2vUrban)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Scenario {
    type Err = ChannelError;

    fn from_str(s: &str) -> ChannelResult<Self> {
        match s {
            "V2V-Highway"          => Ok(Scenario::V2vHighway),
            "V2V-Urban"            => Ok(Scenario::V2vUrban),
            "Extended-V2V-Highway" => Ok(Scenario::ExtendedV2vHighway),
            "Extended-V2V-Urban"   => Ok(Scenario::ExtendedV2vUrban),
            other => Err(ChannelError::InvalidConfig(format!(
                "unknown scenario {other:?} (expected V2V-Highway, V2V-Urban, \
                 Extended-V2V-Highway or Extended-V2V-Urban)"
            ))),
        }
    }
}

// ── ChannelCondition ──────────────────────────────────────────────────────────

/// Line-of-sight condition applied to every loss query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelCondition {
    Los,
    Nlos,
    /// LOS path blocked by another vehicle.
    NlosV,
    /// Drawn per query from the distance-dependent LOS probability.
    All,
}

impl ChannelCondition {
    /// Label written in the channel trace (`los`, `nlos`, `nlos-v`, `all`).
    pub fn label(self) -> &'static str {
        match self {
            ChannelCondition::Los   => "los",
            ChannelCondition::Nlos  => "nlos",
            ChannelCondition::NlosV => "nlos-v",
            ChannelCondition::All   => "all",
        }
    }
}

impl fmt::Display for ChannelCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts both the one-letter codes (`l`, `n`, `v`, `a`) and the labels.
impl FromStr for ChannelCondition {
    type Err = ChannelError;

    fn from_str(s: &str) -> ChannelResult<Self> {
        match s {
            "l" | "los"             => Ok(ChannelCondition::Los),
            "n" | "nlos"            => Ok(ChannelCondition::Nlos),
            "v" | "nlos-v" | "nlosv" => Ok(ChannelCondition::NlosV),
            "a" | "all"             => Ok(ChannelCondition::All),
            other => Err(ChannelError::InvalidConfig(format!(
                "unknown channel condition {other:?} (expected l, n, v or a)"
            ))),
        }
    }
}

// ── WeatherParams ─────────────────────────────────────────────────────────────

/// Rain (and optionally wet-snow) attenuation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherParams {
    /// Rain intensity R in mm/h.
    pub rain_mm_h: f64,
    /// Regression coefficient k of `γ = k·R^α`.
    pub k: f64,
    /// Regression coefficient α of `γ = k·R^α`.
    pub alpha: f64,
    /// Mean annual 0 °C isotherm height above sea level, km.
    pub h0_km: f64,
    /// Site altitude above sea level, m.
    pub altitude_m: f64,
    /// Apply the ITU-R P.530 rain + wet-snow factor.
    pub combined_rain_snow: bool,
}

impl WeatherParams {
    /// Weather condition code written in the extended sample layout:
    /// 1 sunny, 2 rainy, 3 rain and snow.
    pub fn condition_code(&self) -> u8 {
        if self.combined_rain_snow {
            3
        } else if self.rain_mm_h > 0.0 {
            2
        } else {
            1
        }
    }
}

impl Default for WeatherParams {
    fn default() -> Self {
        Self {
            rain_mm_h:          50.0,
            k:                  0.8606,
            alpha:              0.7656,
            h0_km:              0.0,
            altitude_m:         0.0,
            combined_rain_snow: false,
        }
    }
}

// ── ChannelConfig ─────────────────────────────────────────────────────────────

/// Everything the propagation model needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub scenario:     Scenario,
    pub condition:    ChannelCondition,
    /// Carrier frequency in Hz.
    pub frequency_hz: f64,
    /// Add log-normal shadowing to every loss query.
    pub shadowing:    bool,
    pub weather:      WeatherParams,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            scenario:     Scenario::V2vUrban,
            condition:    ChannelCondition::NlosV,
            frequency_hz: 60e9,
            shadowing:    false,
            weather:      WeatherParams::default(),
        }
    }
}

impl ChannelConfig {
    /// Carrier frequency in GHz, the unit of the path loss formulas.
    pub fn frequency_ghz(&self) -> f64 {
        self.frequency_hz / 1e9
    }

    /// Reject values that make the formulas meaningless.
    ///
    /// Zero rain and zero regression coefficients are accepted; they yield
    /// degenerate (zero) attenuation.
    pub fn validate(&self) -> ChannelResult<()> {
        if !(self.frequency_hz.is_finite() && self.frequency_hz > 0.0) {
            return Err(ChannelError::InvalidConfig(format!(
                "frequency must be positive, got {} Hz",
                self.frequency_hz
            )));
        }
        let w = &self.weather;
        if !(w.rain_mm_h.is_finite() && w.rain_mm_h >= 0.0) {
            return Err(ChannelError::InvalidConfig(format!(
                "rain intensity must be non-negative, got {} mm/h",
                w.rain_mm_h
            )));
        }
        for (name, v) in [("k", w.k), ("alpha", w.alpha), ("h0", w.h0_km), ("altitude", w.altitude_m)] {
            if !v.is_finite() {
                return Err(ChannelError::InvalidConfig(format!("{name} must be finite, got {v}")));
            }
        }
        Ok(())
    }
}
