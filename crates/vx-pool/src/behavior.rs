//! The per-endpoint mobility-control behavior.

use vx_core::{NodeId, SimTime};

/// Grants the external driver control over one endpoint's motion between
/// `start` and `stop`.
///
/// Started on checkout with `stop` at the run horizon; stopped early on
/// release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedControl {
    pub node:  NodeId,
    pub start: SimTime,
    pub stop:  SimTime,
}

impl SpeedControl {
    pub fn new(node: NodeId, start: SimTime, stop: SimTime) -> Self {
        Self { node, start, stop }
    }

    /// Whether the behavior is in control at `now` (`start <= now < stop`).
    pub fn is_active(&self, now: SimTime) -> bool {
        self.start <= now && now < self.stop
    }

    /// Stop at `now`.  Returns `false` if already stopped.
    pub fn stop_now(&mut self, now: SimTime) -> bool {
        if now >= self.stop {
            return false;
        }
        self.stop = now.max(self.start);
        true
    }
}
