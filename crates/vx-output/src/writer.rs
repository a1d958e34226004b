//! The `TraceWriter` trait implemented by trace streams.

use crate::{ChannelSampleRow, OutputResult, PacketRow, SampleLayout};

/// An append-only measurement stream.
///
/// Callers that must not fail mid-run (the traffic tracers) keep the first
/// error themselves and report it after the run.
pub trait TraceWriter {
    /// Append one packet event line.
    fn write_packet(&mut self, row: &PacketRow) -> OutputResult<()>;

    /// Append one channel sample line in `layout`.
    fn write_sample(&mut self, row: &ChannelSampleRow<'_>, layout: SampleLayout) -> OutputResult<()>;

    /// Flush buffered lines to the underlying sink.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
