//! The `MobilityStore` — movement state for every endpoint.

use vx_core::{NodeId, SimTime, Vector3};

use crate::{MobilityError, MobilityResult, MobilityState};

/// Holds movement state for every endpoint, indexed by `NodeId`.
///
/// Nodes are added once at scenario build and never removed: a released
/// endpoint is parked (position overwritten), not deleted, so its `NodeId`
/// stays valid for the whole run.
#[derive(Debug, Default)]
pub struct MobilityStore {
    /// Per-node state, indexed by `NodeId`.
    pub states: Vec<MobilityState>,
}

impl MobilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node at `position` moving with `velocity`; returns its ID.
    pub fn add_node(&mut self, position: Vector3, velocity: Vector3) -> NodeId {
        let id = NodeId(self.states.len() as u32);
        self.states.push(MobilityState {
            anchor_position: position,
            anchor_time:     SimTime::ZERO,
            velocity,
        });
        id
    }

    /// Number of nodes in the store.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.states.len()
    }

    pub fn state(&self, node: NodeId) -> MobilityResult<&MobilityState> {
        self.states.get(node.index()).ok_or(MobilityError::UnknownNode(node))
    }

    fn state_mut(&mut self, node: NodeId) -> MobilityResult<&mut MobilityState> {
        self.states.get_mut(node.index()).ok_or(MobilityError::UnknownNode(node))
    }

    /// Position of `node` at `now`.
    pub fn position(&self, node: NodeId, now: SimTime) -> MobilityResult<Vector3> {
        Ok(self.state(node)?.position(now))
    }

    pub fn velocity(&self, node: NodeId) -> MobilityResult<Vector3> {
        Ok(self.state(node)?.velocity)
    }

    /// Overwrite the position of `node` at `now` (teleport).
    pub fn set_position(&mut self, node: NodeId, position: Vector3, now: SimTime) -> MobilityResult<()> {
        self.state_mut(node)?.set_position(position, now);
        Ok(())
    }

    /// Change the velocity of `node` at `now`.
    pub fn set_velocity(&mut self, node: NodeId, velocity: Vector3, now: SimTime) -> MobilityResult<()> {
        self.state_mut(node)?.set_velocity(velocity, now);
        Ok(())
    }

    /// 3-D distance between two nodes at `now`.
    pub fn distance(&self, a: NodeId, b: NodeId, now: SimTime) -> MobilityResult<f64> {
        Ok(self.position(a, now)?.distance(self.position(b, now)?))
    }
}
