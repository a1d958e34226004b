//! `vx-schedule` — the ordered event queue and the periodic-task contract.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`event_queue`] | `EventQueue<E>` (`BTreeMap<SimTime, VecDeque<E>>`)       |
//! | [`periodic`]    | `PeriodicTask` trait                                     |
//!
//! # Ordering model (summary)
//!
//! ```text
//! pop order  = ascending SimTime
//! same time  = insertion (schedule) order
//! horizon    = exclusive; entries at t >= horizon are never popped by
//!              `pop_before`
//! ```

pub mod event_queue;
pub mod periodic;


pub use event_queue::EventQueue;
pub use periodic::PeriodicTask;
