//! Radio link stand-in.
//!
//! The link serializes packets at a fixed capacity and adds free-space
//! propagation delay.  Capacity follows the NR spectral efficiency of the
//! configured MCS; nothing in the channel model affects delivery.

use vx_core::SimTime;

use crate::{TrafficError, TrafficResult};

/// m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Spectral efficiency (bit/s/Hz) per MCS index, NR PDSCH 64QAM table
/// (TS 38.214 table 5.1.3.1-1).
const NR_SPECTRAL_EFFICIENCY: [f64; 29] = [
    0.2344, 0.3066, 0.3770, 0.4902, 0.6016, 0.7402, 0.8770, 1.0273, 1.1758, 1.3262,
    1.3281, 1.4766, 1.6953, 1.9141, 2.1602, 2.4063, 2.5703, 2.5664, 2.7305, 3.0293,
    3.3223, 3.6094, 3.9023, 4.2129, 4.5234, 4.8164, 5.1152, 5.3320, 5.5547,
];

/// Spectral efficiency of `mcs`, or `None` above MCS 28.
pub fn nr_spectral_efficiency(mcs: u8) -> Option<f64> {
    NR_SPECTRAL_EFFICIENCY.get(mcs as usize).copied()
}

/// Carries packets from a source to its sink.
pub trait Link {
    /// Accept `bytes` at `now` for a receiver `distance` metres away and
    /// return the arrival time.
    fn transmit(&mut self, now: SimTime, bytes: u32, distance: f64) -> SimTime;

    /// Capacity in bit/s.
    fn capacity_bps(&self) -> f64;
}

/// FIFO link: one packet on the air at a time.
#[derive(Debug, Clone)]
pub struct SerialLink {
    capacity_bps: f64,
    busy_until:   SimTime,
}

impl SerialLink {
    pub fn new(capacity_bps: f64) -> TrafficResult<Self> {
        if !(capacity_bps.is_finite() && capacity_bps > 0.0) {
            return Err(TrafficError::Config(format!("link capacity must be positive, got {capacity_bps} bit/s")));
        }
        Ok(Self { capacity_bps, busy_until: SimTime::ZERO })
    }

    /// Link over `bandwidth_hz` at `mcs`, keeping `share` (0, 1] of the
    /// resources.
    pub fn nr(bandwidth_hz: f64, mcs: u8, share: f64) -> TrafficResult<Self> {
        let se = nr_spectral_efficiency(mcs)
            .ok_or_else(|| TrafficError::Config(format!("MCS {mcs} out of range 0..=28")))?;
        if !(share > 0.0 && share <= 1.0) {
            return Err(TrafficError::Config(format!("resource share must be in (0, 1], got {share}")));
        }
        Self::new(bandwidth_hz * se * share)
    }

    /// Time at which the last accepted packet finishes serializing.
    pub fn busy_until(&self) -> SimTime {
        self.busy_until
    }
}

impl Link for SerialLink {
    fn transmit(&mut self, now: SimTime, bytes: u32, distance: f64) -> SimTime {
        let start = now.max(self.busy_until);
        let serialization = SimTime::from_secs_f64(f64::from(bytes) * 8.0 / self.capacity_bps);
        self.busy_until = start + serialization;
        self.busy_until + SimTime::from_secs_f64(distance / SPEED_OF_LIGHT)
    }

    fn capacity_bps(&self) -> f64 {
        self.capacity_bps
    }
}
