//! `vx-pool` — endpoint lifecycle for an external mobility driver.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`pool`]     | `NodePool` — ring over a fixed endpoint set, `EndpointState`     |
//! | [`behavior`] | `SpeedControl` — per-endpoint mobility-control behavior          |
//! | [`driver`]   | `NodeLifecycle`, `MobilityDriver`, `NullDriver`                  |
//! | [`fcd`]      | `FcdDriver` — floating-car-data CSV replay                       |
//! | [`error`]    | `PoolError`, `PoolResult<T>`                                     |
//!
//! # Lifecycle
//!
//! ```text
//!            checkout            release
//!   Free ──────────────▶ Active ─────────▶ Parked
//!                          ▲                  │
//!                          └──────────────────┘
//!                          checkout (ring wrap)
//! ```
//!
//! Endpoints are never created or destroyed during a run; their protocol
//! state (sources, sinks, addresses) survives every hand-out.

pub mod behavior;
pub mod driver;
pub mod error;
pub mod fcd;
pub mod pool;

#[cfg(test)]
mod tests;

pub use behavior::SpeedControl;
pub use driver::{MobilityDriver, NodeLifecycle, NullDriver};
pub use error::{PoolError, PoolResult};
pub use fcd::{FcdDriver, FcdRecord};
pub use pool::{EndpointState, NodePool};
