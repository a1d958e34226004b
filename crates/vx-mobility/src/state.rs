//! Per-node movement state.

use vx_core::{SimTime, Vector3};

/// Constant-velocity motion state for a single endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MobilityState {
    /// Position at `anchor_time`.
    pub anchor_position: Vector3,

    /// Simulated time at which `anchor_position` was valid.
    pub anchor_time: SimTime,

    /// Constant velocity in m/s.
    pub velocity: Vector3,
}

impl MobilityState {
    /// A node standing still at `position` from time zero.
    #[inline]
    pub fn stationary(position: Vector3) -> Self {
        Self {
            anchor_position: position,
            anchor_time:     SimTime::ZERO,
            velocity:        Vector3::ZERO,
        }
    }

    /// Position at `now`.
    ///
    /// Queries earlier than the anchor return the anchor position; motion is
    /// never extrapolated backwards.
    pub fn position(&self, now: SimTime) -> Vector3 {
        let dt = now.saturating_sub(self.anchor_time).as_secs_f64();
        self.anchor_position + self.velocity.scale(dt)
    }

    /// Overwrite the position at `now`, keeping the velocity.
    pub fn set_position(&mut self, position: Vector3, now: SimTime) {
        self.anchor_position = position;
        self.anchor_time = now;
    }

    /// Change the velocity at `now`, keeping the position continuous.
    pub fn set_velocity(&mut self, velocity: Vector3, now: SimTime) {
        self.anchor_position = self.position(now);
        self.anchor_time = now;
        self.velocity = velocity;
    }

    /// Scalar speed in m/s.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }
}
