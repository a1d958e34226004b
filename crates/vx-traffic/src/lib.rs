//! `vx-traffic` — application traffic and packet observation.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                          |
//! |------------|-------------------------------------------------------------------|
//! | [`packet`] | `Packet`, `SeqTsHeader` (12-byte sequence + timestamp header)     |
//! | [`delay`]  | `extract_delay` — one-way delay from a received payload            |
//! | [`source`] | `OnOffSource`, `OnOffConfig`, `SourceAction`, `SourceTimer`        |
//! | [`sink`]   | `PacketSink`                                                       |
//! | [`link`]   | `Link` trait, `SerialLink`, NR MCS spectral efficiency table       |
//! | [`tracer`] | `TrafficTracer` — per-group Tx/Rx trace stream and counters        |
//! | [`error`]  | `TrafficError`, `TrafficResult<T>`                                 |
//!
//! # Design notes
//!
//! Traffic components never touch the event queue.  The source returns
//! [`SourceAction`]s (schedule a timer, transmit a packet) and the
//! simulation loop applies them, the same request/apply split used for
//! every other component.  Cancelled timers are not removed from the queue;
//! they carry an epoch and the source ignores any timer whose epoch is stale.

pub mod delay;
pub mod error;
pub mod link;
pub mod packet;
pub mod sink;
pub mod source;
pub mod tracer;


pub use delay::extract_delay;
pub use error::{TrafficError, TrafficResult};
pub use link::{nr_spectral_efficiency, Link, SerialLink, SPEED_OF_LIGHT};
pub use packet::{Packet, SeqTsHeader};
pub use sink::PacketSink;
pub use source::{OnOffConfig, OnOffSource, SourceAction, SourceTimer};
pub use tracer::{PacketCounters, TrafficTracer};
