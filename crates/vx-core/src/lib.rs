//! `vx-core` — foundational types for the `vx` vehicular measurement harness.
//!
//! This crate is a dependency of every other `vx-*` crate.  It intentionally
//! has no `vx-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).  Each sub-crate owns its error enum.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `GroupId`                                   |
//! | [`geo`]         | `Vector3`, Euclidean distance                         |
//! | [`time`]        | `SimTime` (ns), `SimClock`                            |
//! | [`rng`]         | `NodeRng` (per-node), `SimRng` (global streams)       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::Vector3;
pub use ids::{GroupId, NodeId};
pub use rng::{NodeRng, SimRng};
pub use time::{SimClock, SimTime};
