//! `ScenarioConfig` — every parameter of one measurement scenario.
//!
//! # Layering
//!
//! ```text
//! Profile defaults (simple | nrv2v)
//!   └─▶ JSON overlay   (ScenarioConfig::merge_json, partial objects allowed)
//!         └─▶ CLI flags (applied field by field by the binary)
//!               └─▶ validate()
//! ```
//!
//! Units follow the trace columns: traffic timings in milliseconds, horizon
//! and periods in seconds, speed in km/h, distances in metres.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vx_channel::{ChannelCondition, ChannelConfig, Scenario, WeatherParams};
use vx_core::SimTime;
use vx_output::SampleLayout;
use vx_traffic::{nr_spectral_efficiency, OnOffConfig};

use crate::{SimError, SimResult};

// ── Profile ───────────────────────────────────────────────────────────────────

/// Named default sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// 1000 s highway run, LOS, 1 s sampling, compact sample layout.
    Simple,
    /// 80 s urban NLOSv run, 0.1 s sampling, extended sample layout.
    #[default]
    Nrv2v,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Simple => "simple",
            Profile::Nrv2v => "nrv2v",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(Profile::Simple),
            "nrv2v" => Ok(Profile::Nrv2v),
            other => Err(SimError::Config(format!("unknown profile {other:?} (expected simple or nrv2v)"))),
        }
    }
}

// ── Sections ──────────────────────────────────────────────────────────────────

/// ON/OFF application timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrafficConfig {
    /// Application start, ms.
    pub start_ms:      u64,
    /// Application stop, ms.
    pub stop_ms:       u64,
    /// Constant ON period, ms.
    pub on_ms:         u64,
    /// Mean of the exponential OFF period, ms.  0 disables OFF periods.
    pub off_mean_ms:   u64,
    pub data_rate_bps: f64,
    /// Payload bytes, header included.
    pub packet_size:   u32,
    /// Stamp the sequence/timestamp header; without it Rx rows carry no delay.
    pub seq_ts_header: bool,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            start_ms:      10,
            stop_ms:       500,
            on_ms:         100,
            off_mean_ms:   100,
            data_rate_bps: 100e6,
            packet_size:   512,
            seq_ts_header: true,
        }
    }
}

/// Platoon placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeometryConfig {
    /// Common vehicle speed, km/h.
    pub speed_kmh:              f64,
    /// Distance between the two groups, m.
    pub inter_group_distance_m: f64,
    /// Both groups on one lane (platoon) instead of adjacent lanes.
    pub same_lane:              bool,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self { speed_kmh: 60.0, inter_group_distance_m: 20.0, same_lane: false }
    }
}

impl GeometryConfig {
    /// m/s.
    pub fn speed_ms(&self) -> f64 {
        self.speed_kmh / 3.6
    }

    /// Rear-to-front distance inside a group: `max(2, 2·v)` m.
    pub fn intra_group_distance_m(&self) -> f64 {
        (2.0 * self.speed_ms()).max(2.0)
    }
}

/// Radio resources of the serial link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RadioConfig {
    pub bandwidth_hz:         f64,
    /// MCS index 0..=28 (NR 64QAM table).
    pub mcs:                  u8,
    /// Recorded in the manifest; the serial link always runs at `mcs`.
    pub use_amc:              bool,
    /// Recorded in the manifest; no antenna gain is modelled.
    pub antenna_elements:     u32,
    /// Each group gets half the resources; otherwise both share one link.
    pub orthogonal_resources: bool,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            bandwidth_hz:         250e6,
            mcs:                  28,
            use_amc:              false,
            antenna_elements:     4,
            orthogonal_resources: true,
        }
    }
}

/// External mobility driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    /// Floating-car-data CSV to replay.  `None` leaves the platoon on its
    /// constant-velocity course.
    pub vehicle_trace:   Option<PathBuf>,
    /// Seconds between synchronizations.
    pub sync_interval_s: f64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { vehicle_trace: None, sync_interval_s: 1.0 }
    }
}

// ── ScenarioConfig ────────────────────────────────────────────────────────────

/// Full scenario configuration, written verbatim to `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    pub profile:         Profile,
    /// Exclusive run horizon, s.
    pub horizon_s:       f64,
    /// Channel sampling period Δt, s.
    pub sample_period_s: f64,
    /// Run seed; run `i` of a batch uses `seed + i`.
    pub seed:            u64,
    /// Independent executions in a batch.
    pub runs:            u32,
    pub layout:          SampleLayout,
    pub traffic:         TrafficConfig,
    pub geometry:        GeometryConfig,
    pub channel:         ChannelConfig,
    pub radio:           RadioConfig,
    pub driver:          DriverConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::profile(Profile::default())
    }
}

impl ScenarioConfig {
    /// The defaults of `profile`.
    pub fn profile(profile: Profile) -> Self {
        match profile {
            Profile::Simple => Self {
                profile,
                horizon_s:       1000.0,
                sample_period_s: 1.0,
                seed:            1,
                runs:            1,
                layout:          SampleLayout::Compact,
                traffic:         TrafficConfig::default(),
                geometry:        GeometryConfig::default(),
                channel:         ChannelConfig {
                    scenario:  Scenario::V2vHighway,
                    condition: ChannelCondition::Los,
                    weather:   WeatherParams { rain_mm_h: 10.0, k: 1.0, alpha: 0.1, ..WeatherParams::default() },
                    ..ChannelConfig::default()
                },
                radio:           RadioConfig::default(),
                driver:          DriverConfig::default(),
            },
            Profile::Nrv2v => Self {
                profile,
                horizon_s:       80.0,
                sample_period_s: 0.1,
                seed:            1,
                runs:            1,
                layout:          SampleLayout::Extended,
                traffic:         TrafficConfig::default(),
                geometry:        GeometryConfig::default(),
                channel:         ChannelConfig::default(),
                radio:           RadioConfig::default(),
                driver:          DriverConfig::default(),
            },
        }
    }

    /// Overlay a (possibly partial) JSON object on this configuration.
    ///
    /// Objects merge key by key; any other value replaces the current one.
    /// Unknown keys are rejected.
    pub fn merge_json(&self, overlay: Value) -> SimResult<Self> {
        let mut base = serde_json::to_value(self).map_err(|e| SimError::Config(e.to_string()))?;
        merge(&mut base, overlay);
        serde_json::from_value(base).map_err(|e| SimError::Config(e.to_string()))
    }

    /// `merge_json` over the text of a JSON document.
    pub fn merge_json_str(&self, json: &str) -> SimResult<Self> {
        let overlay: Value = serde_json::from_str(json).map_err(|e| SimError::Config(e.to_string()))?;
        self.merge_json(overlay)
    }

    pub fn horizon(&self) -> SimTime {
        SimTime::from_secs_f64(self.horizon_s)
    }

    pub fn sample_period(&self) -> SimTime {
        SimTime::from_secs_f64(self.sample_period_s)
    }

    pub fn sync_interval(&self) -> SimTime {
        SimTime::from_secs_f64(self.driver.sync_interval_s)
    }

    pub fn app_start(&self) -> SimTime {
        SimTime::from_millis(self.traffic.start_ms)
    }

    pub fn app_stop(&self) -> SimTime {
        SimTime::from_millis(self.traffic.stop_ms)
    }

    /// Source parameters for both groups.
    pub fn on_off(&self) -> OnOffConfig {
        OnOffConfig {
            packet_size:   self.traffic.packet_size,
            data_rate_bps: self.traffic.data_rate_bps,
            on_time:       SimTime::from_millis(self.traffic.on_ms),
            off_mean:      SimTime::from_millis(self.traffic.off_mean_ms),
            stamp_header:  self.traffic.seq_ts_header,
        }
    }

    /// Reject configurations the orchestrator cannot run.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.horizon_s.is_finite() && self.horizon_s > 0.0) {
            return Err(SimError::Config(format!("horizon must be positive, got {} s", self.horizon_s)));
        }
        if !self.sample_period_s.is_finite() || self.sample_period().is_zero() {
            return Err(SimError::Config(format!(
                "sampling period must be positive, got {} s",
                self.sample_period_s
            )));
        }
        if self.runs == 0 {
            return Err(SimError::Config("run count must be at least 1".into()));
        }
        if self.traffic.stop_ms <= self.traffic.start_ms {
            return Err(SimError::Config(format!(
                "application stop ({} ms) must be after start ({} ms)",
                self.traffic.stop_ms, self.traffic.start_ms
            )));
        }
        self.on_off().validate()?;

        let g = &self.geometry;
        if !(g.speed_kmh.is_finite() && g.speed_kmh >= 0.0) {
            return Err(SimError::Config(format!("speed must be non-negative, got {} km/h", g.speed_kmh)));
        }
        if !(g.inter_group_distance_m.is_finite() && g.inter_group_distance_m >= 0.0) {
            return Err(SimError::Config(format!(
                "inter-group distance must be non-negative, got {} m",
                g.inter_group_distance_m
            )));
        }

        let r = &self.radio;
        if nr_spectral_efficiency(r.mcs).is_none() {
            return Err(SimError::Config(format!("MCS {} out of range 0..=28", r.mcs)));
        }
        if !(r.bandwidth_hz.is_finite() && r.bandwidth_hz > 0.0) {
            return Err(SimError::Config(format!("bandwidth must be positive, got {} Hz", r.bandwidth_hz)));
        }

        if !self.driver.sync_interval_s.is_finite() || self.sync_interval().is_zero() {
            return Err(SimError::Config(format!(
                "driver sync interval must be positive, got {} s",
                self.driver.sync_interval_s
            )));
        }

        self.channel.validate()?;
        Ok(())
    }
}

fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
