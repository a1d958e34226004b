//! Plain data row types written by trace streams.

use std::fmt;

use serde::{Deserialize, Serialize};
use vx_core::{GroupId, SimTime};

/// Direction of an observed packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Tx,
    Rx,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Tx => "Tx",
            Direction::Rx => "Rx",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed transmission or reception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketRow {
    pub direction: Direction,
    /// Group whose stream the row belongs to.  Not written; each group has
    /// its own stream.
    pub group:     GroupId,
    pub time:      SimTime,
    /// Payload size in bytes.
    pub size:      u32,
    /// One-way delay in nanoseconds; only ever set on `Rx` rows.
    pub delay_ns:  Option<u64>,
}

impl PacketRow {
    pub fn tx(group: GroupId, time: SimTime, size: u32) -> Self {
        Self { direction: Direction::Tx, group, time, size, delay_ns: None }
    }

    pub fn rx(group: GroupId, time: SimTime, size: u32, delay_ns: Option<u64>) -> Self {
        Self { direction: Direction::Rx, group, time, size, delay_ns }
    }
}

/// Column layout of the channel sample stream.  Chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleLayout {
    /// `time  path_loss  distance  weather_att  period`
    Compact,
    /// `time  speed_kmh  rain  path_loss  distance  weather_att  weather_cond
    ///  scenario  rain  k  alpha  channel_condition`
    #[default]
    Extended,
}

/// One channel sample.  Purely observational.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSampleRow<'a> {
    pub time:              SimTime,
    pub speed_kmh:         f64,
    /// Rain intensity in mm/h.
    pub rain:              f64,
    /// Path loss in dB.
    pub path_loss:         f64,
    /// 3-D distance between the sampled endpoints in metres.
    pub distance:          f64,
    /// Weather attenuation in dB.
    pub weather_att:       f64,
    /// 1 sunny, 2 rainy, 3 rain + snow.
    pub weather_cond:      u8,
    pub scenario:          &'a str,
    pub k:                 f64,
    pub alpha:             f64,
    pub channel_condition: &'a str,
    /// Sampling period; compact layout only.
    pub period:            SimTime,
}
