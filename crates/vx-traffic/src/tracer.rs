//! `TrafficTracer<W>` — per-group Tx/Rx observation.

use std::io::Write;
use std::net::Ipv4Addr;

use serde::Serialize;
use tracing::trace;
use vx_core::{GroupId, SimTime};
use vx_output::{OutputError, OutputResult, PacketRow, TraceWriter, TsvTrace};

use crate::{extract_delay, Packet};

/// Monotonic per-group packet counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PacketCounters {
    pub tx: u64,
    pub rx: u64,
}

impl PacketCounters {
    /// `rx / tx`, or `None` before anything was sent.
    pub fn reception_ratio(&self) -> Option<f64> {
        (self.tx > 0).then(|| self.rx as f64 / self.tx as f64)
    }
}

/// Handler object bound to one group and one trace stream.
///
/// The handlers never fail: a write error is kept (first one only) and
/// retrieved with [`take_error`][Self::take_error] after the run.
pub struct TrafficTracer<W: Write> {
    group:      GroupId,
    trace:      TsvTrace<W>,
    counters:   PacketCounters,
    last_error: Option<OutputError>,
}

impl<W: Write> TrafficTracer<W> {
    pub fn new(group: GroupId, trace: TsvTrace<W>) -> Self {
        Self { group, trace, counters: PacketCounters::default(), last_error: None }
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    pub fn counters(&self) -> PacketCounters {
        self.counters
    }

    /// Record a transmission: `Tx  <time>  <size>`.
    pub fn on_transmit(&mut self, now: SimTime, packet: &Packet) {
        let row = PacketRow::tx(self.group, now, packet.size());
        let result = self.trace.write_packet(&row);
        self.store_err(result);
        self.counters.tx += 1;
    }

    /// Record a reception: `Rx  <time>  <size>[  <delay_ns>]`.
    pub fn on_receive(&mut self, now: SimTime, packet: &Packet, from: Ipv4Addr) {
        let delay_ns = extract_delay(&packet.payload, now);
        trace!(group = self.group.number(), %from, size = packet.size(), ?delay_ns, "rx");
        let row = PacketRow::rx(self.group, now, packet.size(), delay_ns);
        let result = self.trace.write_packet(&row);
        self.store_err(result);
        self.counters.rx += 1;
    }

    /// Flush the stream; a failure is stored like any other write error.
    pub fn finish(&mut self) {
        let result = self.trace.finish();
        self.store_err(result);
    }

    /// Take the stored write error (if any) after the run.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush and return the underlying sink.
    pub fn into_inner(self) -> OutputResult<W> {
        self.trace.into_inner()
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}
