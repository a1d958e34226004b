//! `vx-sim` — scenario orchestrator for the vx measurement harness.
//!
//! # Event loop
//!
//! ```text
//! build:  place 2 groups × (rear, front), wire sources, sinks, tracers,
//!         the channel sampler and the node pool; queue DriverSync ticks,
//!         the first Sample, and every SourceStart/SourceStop
//! loop:   while the earliest event is before the horizon:
//!           pop → observer.on_event → handle
//!             SourceStart/Timer → source actions → Schedule | Transmit
//!             Transmit          → Tx row, link, Deliver at arrival time
//!             Deliver           → sink, Rx row (with delay if stamped)
//!             Sample            → channel row, re-enqueue at now + Δt
//!             DriverSync        → driver.sync(now, pool, mobility)
//! end:    flush every stream, RunSummary
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`config`]   | `ScenarioConfig`, its sections, `Profile` (`simple`, `nrv2v`)    |
//! | [`builder`]  | `SimBuilder`                                                     |
//! | [`sim`]      | `Sim`, `Event`, `GroupContext`, `TraceSinks`                     |
//! | [`observer`] | `SimObserver`, `NoopObserver`                                    |
//! | [`summary`]  | `RunSummary`, `GroupSummary`                                     |
//! | [`error`]    | `SimError`, `SimResult<T>`                                       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use vx_sim::{NoopObserver, Profile, ScenarioConfig, SimBuilder, TraceSinks};
//!
//! let config = ScenarioConfig::profile(Profile::Nrv2v);
//! let mut sim = SimBuilder::new(config)
//!     .with_defaults()?
//!     .build(TraceSinks::create(&run_dir)?)?;
//! let summary = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod sim;
pub mod summary;


pub use builder::SimBuilder;
pub use config::{DriverConfig, GeometryConfig, Profile, RadioConfig, ScenarioConfig, TrafficConfig};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Event, GroupContext, Sim, TraceSinks};
pub use summary::{GroupSummary, RunSummary};
