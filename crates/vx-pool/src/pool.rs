//! `NodePool` — fixed endpoint ring.

use rustc_hash::FxHashMap;
use tracing::debug;
use vx_core::{NodeId, SimRng, SimTime, Vector3};
use vx_mobility::MobilityStore;

use crate::{NodeLifecycle, PoolError, PoolResult, SpeedControl};

/// Base of the parking area; each release adds `U{0..24}` to x and y.
const PARK_ORIGIN: Vector3 = Vector3::new(-100.0, 320.0, 250.0);
const PARK_JITTER: u32 = 25;

/// Lifecycle state of one pool endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointState {
    /// Never handed out.
    Free,
    /// Checked out and under driver control.
    Active,
    /// Released and parked outside the area.
    Parked,
}

/// Ring over a fixed set of endpoints.
///
/// Checkout hands out the endpoint under the cursor and advances the cursor
/// modulo the pool size, so an endpoint released just now is not the next
/// one handed out unless the ring wraps onto it.  Live endpoints under the
/// cursor are skipped, never reissued.  Checkout fails once every endpoint
/// is live.
#[derive(Debug)]
pub struct NodePool {
    nodes:     Vec<NodeId>,
    slots:     FxHashMap<NodeId, usize>,
    states:    Vec<EndpointState>,
    behaviors: Vec<Option<SpeedControl>>,
    cursor:    usize,
    live:      usize,
    horizon:   SimTime,
    rng:       SimRng,
}

impl NodePool {
    /// Pool over `nodes`; behaviors started on checkout stop at `horizon`.
    /// `rng` draws the parking jitter.
    pub fn new(nodes: Vec<NodeId>, horizon: SimTime, rng: SimRng) -> Self {
        let slots = nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        let n = nodes.len();
        Self {
            nodes,
            slots,
            states: vec![EndpointState::Free; n],
            behaviors: vec![None; n],
            cursor: 0,
            live: 0,
            horizon,
            rng,
        }
    }

    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Endpoints checked out and not yet released.
    pub fn live(&self) -> usize {
        self.live
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.slots.contains_key(&node)
    }

    pub fn state(&self, node: NodeId) -> PoolResult<EndpointState> {
        Ok(self.states[self.slot(node)?])
    }

    pub fn behavior(&self, node: NodeId) -> PoolResult<Option<&SpeedControl>> {
        Ok(self.behaviors[self.slot(node)?].as_ref())
    }

    fn slot(&self, node: NodeId) -> PoolResult<usize> {
        self.slots.get(&node).copied().ok_or(PoolError::UnknownNode(node))
    }

    /// Hand out the first endpoint at or after the cursor that is not live,
    /// and start its behavior.
    pub fn checkout(&mut self, now: SimTime) -> PoolResult<NodeId> {
        let capacity = self.capacity();
        if self.live >= capacity {
            return Err(PoolError::Exhausted { capacity, live: self.live });
        }
        // live < capacity, so at least one slot is Free or Parked.
        let slot = (0..capacity)
            .map(|step| (self.cursor + step) % capacity)
            .find(|&slot| self.states[slot] != EndpointState::Active)
            .ok_or(PoolError::Exhausted { capacity, live: self.live })?;
        if slot != self.cursor {
            debug!(cursor = self.cursor, slot, "skipped live endpoints");
        }
        self.cursor = (slot + 1) % capacity;
        let node = self.nodes[slot];

        self.live += 1;
        self.states[slot] = EndpointState::Active;
        self.behaviors[slot] = Some(SpeedControl::new(node, now, self.horizon));

        debug!(%node, time = %now, live = self.live, "endpoint checked out");
        Ok(node)
    }

    /// Stop the endpoint's behavior (if running) and park it.
    pub fn release(&mut self, node: NodeId, now: SimTime, mobility: &mut MobilityStore) -> PoolResult<()> {
        let slot = self.slot(node)?;

        let stopped = match self.behaviors[slot].as_mut() {
            Some(behavior) => behavior.stop_now(now),
            None => false,
        };
        if self.states[slot] == EndpointState::Active {
            self.live -= 1;
        }
        self.states[slot] = EndpointState::Parked;

        let park = Vector3::new(
            PARK_ORIGIN.x + f64::from(self.rng.gen_range(0..PARK_JITTER)),
            PARK_ORIGIN.y + f64::from(self.rng.gen_range(0..PARK_JITTER)),
            PARK_ORIGIN.z,
        );
        mobility.set_position(node, park, now)?;
        mobility.set_velocity(node, Vector3::ZERO, now)?;

        debug!(%node, time = %now, stopped, parked_at = %park, live = self.live, "endpoint released");
        Ok(())
    }
}

impl NodeLifecycle for NodePool {
    fn setup_node(&mut self, now: SimTime, _mobility: &mut MobilityStore) -> PoolResult<NodeId> {
        self.checkout(now)
    }

    fn shutdown_node(&mut self, node: NodeId, now: SimTime, mobility: &mut MobilityStore) -> PoolResult<()> {
        self.release(node, now, mobility)
    }

    fn is_controlled(&self, node: NodeId, now: SimTime) -> bool {
        self.slots
            .get(&node)
            .and_then(|&slot| self.behaviors[slot].as_ref())
            .is_some_and(|b| b.is_active(now))
    }
}
