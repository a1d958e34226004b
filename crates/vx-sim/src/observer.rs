//! Simulation observer trait for progress reporting and test instrumentation.

use vx_core::SimTime;

use crate::{Event, RunSummary};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] as the event loop
/// advances.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct Progress { every: u64 }
///
/// impl SimObserver for Progress {
///     fn on_sample(&mut self, now: SimTime, samples: u64) {
///         if samples % self.every == 0 {
///             println!("{now} s: {samples} channel samples");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called for every event popped from the queue, before it is handled.
    fn on_event(&mut self, _now: SimTime, _event: &Event) {}

    /// Called after each channel sample is written.  `samples` counts the
    /// records written so far, this one included.
    fn on_sample(&mut self, _now: SimTime, _samples: u64) {}

    /// Called once after the horizon is reached and every stream is flushed.
    fn on_sim_end(&mut self, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
