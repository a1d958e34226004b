//! The `PeriodicTask` trait — work that re-arms itself after every firing.

use vx_core::SimTime;

/// A stateful task fired by the event loop at a self-chosen cadence.
///
/// The task never schedules itself.  Each call to [`fire`][Self::fire]
/// performs one step and returns the delay until the next firing; the loop
/// re-enqueues the task at `now + delay`.  There is no terminal state: the
/// task keeps firing until the loop stops at its horizon.
///
/// `C` is whatever borrowed simulation state the task reads during a step
/// (e.g. the mobility store and propagation model for the channel sampler).
///
/// # Example
///
/// ```rust,ignore
/// struct Heartbeat { period: SimTime, beats: u64 }
///
/// impl PeriodicTask<()> for Heartbeat {
///     type Error = std::convert::Infallible;
///     fn fire(&mut self, _now: SimTime, _ctx: &mut ()) -> Result<SimTime, Self::Error> {
///         self.beats += 1;
///         Ok(self.period)
///     }
/// }
/// ```
pub trait PeriodicTask<C: ?Sized> {
    type Error;

    /// Perform one step at `now` and return the delay until the next one.
    ///
    /// An error is fatal to the task; the loop does not re-enqueue it.
    fn fire(&mut self, now: SimTime, ctx: &mut C) -> Result<SimTime, Self::Error>;
}
