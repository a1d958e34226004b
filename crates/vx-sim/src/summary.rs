//! End-of-run counters, written as `summary.json`.

use serde::Serialize;
use vx_core::SimTime;
use vx_traffic::PacketCounters;

/// Per-group packet statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupSummary {
    /// One-based group number, as in `group-<n>.txt`.
    pub group:          u32,
    pub tx:             u64,
    pub rx:             u64,
    pub bytes_received: u64,
    /// Packet reception ratio `rx / tx`; `null` when nothing was sent.
    pub prr:            Option<f64>,
}

impl GroupSummary {
    pub fn new(group: u32, counters: PacketCounters, bytes_received: u64) -> Self {
        Self {
            group,
            tx: counters.tx,
            rx: counters.rx,
            bytes_received,
            prr: counters.reception_ratio(),
        }
    }
}

/// What one run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed:    u64,
    /// Exclusive horizon, ns.
    pub horizon: SimTime,
    /// Events handled by the loop.
    pub events:  u64,
    /// Channel sample records written.
    pub samples: u64,
    pub groups:  Vec<GroupSummary>,
}

impl RunSummary {
    pub fn total_tx(&self) -> u64 {
        self.groups.iter().map(|g| g.tx).sum()
    }

    pub fn total_rx(&self) -> u64 {
        self.groups.iter().map(|g| g.rx).sum()
    }
}
