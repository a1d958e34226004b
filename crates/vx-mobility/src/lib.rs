//! `vx-mobility` — endpoint position and velocity state.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`state`]   | `MobilityState` — anchored constant-velocity motion of one node    |
//! | [`store`]   | `MobilityStore` — `Vec<MobilityState>` indexed by `NodeId`         |
//! | [`error`]   | `MobilityError`, `MobilityResult<T>`                               |
//!
//! # Movement model (constant velocity)
//!
//! Each endpoint stores an anchor position, the time the anchor was taken,
//! and a velocity:
//!
//! ```text
//! position(now) = anchor_position + velocity * (now - anchor_time)
//! ```
//!
//! Positions are evaluated lazily on query; nothing is advanced per event.
//! `set_position` and `set_velocity` re-anchor at the supplied `now`, so an
//! external driver can overwrite state at any instant without disturbing
//! motion that is already in progress on other nodes.

pub mod error;
pub mod state;
pub mod store;


pub use error::{MobilityError, MobilityResult};
pub use state::MobilityState;
pub use store::MobilityStore;
