//! `vx-output` — measurement output for the vx harness.
//!
//! Every stream is flat, tab-separated, newline-terminated and append-only.
//! A run produces:
//!
//! | File           | Writer                    | Rows                                  |
//! |----------------|---------------------------|---------------------------------------|
//! | `group-1.txt`  | [`TsvTrace`]              | [`PacketRow`] for group 1             |
//! | `group-2.txt`  | [`TsvTrace`]              | [`PacketRow`] for group 2             |
//! | `channel.txt`  | [`TsvTrace`]              | [`ChannelSampleRow`] in a [`SampleLayout`] |
//! | `summary.json` | [`write_json`]            | end-of-run counters                   |
//! | `manifest.json`| [`write_json`]            | effective configuration               |
//!
//! All trace streams implement [`TraceWriter`].  Writers are generic over
//! `std::io::Write`, so tests can trace into a `Vec<u8>`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use vx_output::{Direction, PacketRow, TraceWriter, TsvTrace};
//!
//! let mut trace = TsvTrace::new(File::create(dir.join("group-1.txt"))?);
//! trace.write_packet(&PacketRow::tx(group, now, 512))?;
//! trace.finish()?;
//! ```

pub mod error;
pub mod report;
pub mod row;
pub mod tsv;
pub mod writer;

#[cfg(test)]
mod tests;

pub use error::{OutputError, OutputResult};
pub use report::write_json;
pub use row::{ChannelSampleRow, Direction, PacketRow, SampleLayout};
pub use tsv::TsvTrace;
pub use writer::TraceWriter;
