//! Driver-facing interfaces.

use vx_core::{NodeId, SimTime};
use vx_mobility::MobilityStore;

use crate::PoolResult;

/// Checkout/release callbacks handed to an external mobility driver.
pub trait NodeLifecycle {
    /// Hand out the next endpoint and start its control behavior.
    fn setup_node(&mut self, now: SimTime, mobility: &mut MobilityStore) -> PoolResult<NodeId>;

    /// Return `node`: stop its behavior and park it outside the area.
    fn shutdown_node(&mut self, node: NodeId, now: SimTime, mobility: &mut MobilityStore) -> PoolResult<()>;

    /// Whether the driver may steer `node` at `now`.
    fn is_controlled(&self, node: NodeId, now: SimTime) -> bool;
}

/// An external mobility process synchronized at fixed intervals.
pub trait MobilityDriver {
    /// Bring endpoint state up to `now`, checking endpoints out and in
    /// through `lifecycle`.
    fn sync(&mut self, now: SimTime, lifecycle: &mut dyn NodeLifecycle, mobility: &mut MobilityStore) -> PoolResult<()>;
}

/// Driver that never moves anything.  Used when no trace is configured;
/// the scenario's constant-velocity motion runs undisturbed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDriver;

impl MobilityDriver for NullDriver {
    fn sync(&mut self, _now: SimTime, _lifecycle: &mut dyn NodeLifecycle, _mobility: &mut MobilityStore) -> PoolResult<()> {
        Ok(())
    }
}
