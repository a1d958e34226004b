//! Floating-car-data replay driver.
//!
//! # CSV format
//!
//! One row per vehicle per trace step:
//!
//! ```csv
//! time_s,vehicle,x,y,z,vx,vy
//! 0.0,veh0,0.0,0.0,0.0,16.7,0.0
//! 0.0,veh1,33.3,0.0,0.0,16.7,0.0
//! 1.0,veh0,16.7,0.0,0.0,16.7,0.0
//! ```
//!
//! At each sync the driver consumes every row with `time_s <= now` that
//! has not been consumed yet (the window).  Within a window the last row
//! per vehicle wins.
//!
//! - A vehicle seen for the first time is checked out of the pool.
//! - Every vehicle in the window has its position and velocity written,
//!   provided its endpoint is under control.
//! - A mapped vehicle absent from a non-empty window has left and is
//!   released.  Once the trace is exhausted every remaining vehicle is
//!   released.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};
use vx_core::{NodeId, SimTime, Vector3};
use vx_mobility::MobilityStore;

use crate::{MobilityDriver, NodeLifecycle, PoolError, PoolResult};

// ── CSV record ────────────────────────────────────────────────────────────────

/// One trace row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FcdRecord {
    pub time_s:  f64,
    pub vehicle: String,
    pub x:       f64,
    pub y:       f64,
    pub z:       f64,
    pub vx:      f64,
    pub vy:      f64,
}

impl FcdRecord {
    fn position(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    fn velocity(&self) -> Vector3 {
        Vector3::new(self.vx, self.vy, 0.0)
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// Replays a vehicle trace through the pool callbacks.
#[derive(Debug, Default)]
pub struct FcdDriver {
    /// Pending rows by timestamp, in file order within a timestamp.
    steps:   BTreeMap<SimTime, Vec<FcdRecord>>,
    /// Vehicle name → endpoint currently standing in for it.
    mapping: BTreeMap<String, NodeId>,
}

impl FcdDriver {
    /// Load a trace from a CSV file.
    pub fn from_path(path: &Path) -> PoolResult<Self> {
        let file = std::fs::File::open(path)?;
        let driver = Self::from_reader(file)?;
        info!(path = %path.display(), steps = driver.steps.len(), "loaded vehicle trace");
        Ok(driver)
    }

    /// Like [`from_path`][Self::from_path] but accepts any `Read` source.
    pub fn from_reader<R: Read>(reader: R) -> PoolResult<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut steps: BTreeMap<SimTime, Vec<FcdRecord>> = BTreeMap::new();

        for result in csv_reader.deserialize::<FcdRecord>() {
            let row = result.map_err(|e| PoolError::Parse(e.to_string()))?;
            if !(row.time_s.is_finite() && row.time_s >= 0.0) {
                return Err(PoolError::Parse(format!(
                    "invalid time {} for vehicle {:?}",
                    row.time_s, row.vehicle
                )));
            }
            steps.entry(SimTime::from_secs_f64(row.time_s)).or_default().push(row);
        }
        Ok(Self { steps, mapping: BTreeMap::new() })
    }

    /// Rows not yet consumed.
    pub fn pending_rows(&self) -> usize {
        self.steps.values().map(Vec::len).sum()
    }

    /// Endpoint currently mapped to `vehicle`.
    pub fn node_for(&self, vehicle: &str) -> Option<NodeId> {
        self.mapping.get(vehicle).copied()
    }

    pub fn mapped(&self) -> usize {
        self.mapping.len()
    }

    /// Take every pending row at or before `now`, last row per vehicle.
    fn take_window(&mut self, now: SimTime) -> BTreeMap<String, FcdRecord> {
        let mut window = BTreeMap::new();
        while let Some(entry) = self.steps.first_entry() {
            if *entry.key() > now {
                break;
            }
            for row in entry.remove() {
                window.insert(row.vehicle.clone(), row);
            }
        }
        window
    }
}

impl MobilityDriver for FcdDriver {
    fn sync(&mut self, now: SimTime, lifecycle: &mut dyn NodeLifecycle, mobility: &mut MobilityStore) -> PoolResult<()> {
        let window = self.take_window(now);
        if window.is_empty() && !self.steps.is_empty() {
            return Ok(());
        }

        // Departures first so their endpoints are back in the pool.
        let departed: Vec<String> = self
            .mapping
            .keys()
            .filter(|v| !window.contains_key(*v))
            .cloned()
            .collect();
        for vehicle in departed {
            if let Some(node) = self.mapping.remove(&vehicle) {
                debug!(%vehicle, %node, time = %now, "vehicle left");
                lifecycle.shutdown_node(node, now, mobility)?;
            }
        }

        for (vehicle, row) in window {
            let node = match self.mapping.get(&vehicle) {
                Some(&node) => node,
                None => {
                    let node = lifecycle.setup_node(now, mobility)?;
                    debug!(%vehicle, %node, time = %now, "vehicle entered");
                    self.mapping.insert(vehicle, node);
                    node
                }
            };
            if lifecycle.is_controlled(node, now) {
                mobility.set_position(node, row.position(), now)?;
                mobility.set_velocity(node, row.velocity(), now)?;
            }
        }
        Ok(())
    }
}
