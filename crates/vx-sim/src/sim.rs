//! The `Sim` struct and its event loop.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};
use vx_channel::ChannelSampler;
use vx_core::{GroupId, NodeId, SimClock, SimTime};
use vx_mobility::MobilityStore;
use vx_pool::{MobilityDriver, NodePool};
use vx_schedule::{EventQueue, PeriodicTask};
use vx_traffic::{Link, OnOffSource, Packet, PacketSink, SerialLink, SourceAction, SourceTimer, TrafficTracer};

use crate::{GroupSummary, RunSummary, ScenarioConfig, SimError, SimObserver, SimResult};

// ── Events ────────────────────────────────────────────────────────────────────

/// Everything the loop can have queued.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Application start of a group's source.
    SourceStart(GroupId),
    /// Application stop of a group's source.
    SourceStop(GroupId),
    /// A timer requested by a source through [`SourceAction::Schedule`].
    SourceTimer { group: GroupId, timer: SourceTimer, epoch: u64 },
    /// `packet` reaches the group's front endpoint.
    Deliver { group: GroupId, packet: Packet },
    /// The channel sampler is due.
    Sample,
    /// The external driver synchronizes endpoint state.
    DriverSync,
}

// ── Trace sinks ───────────────────────────────────────────────────────────────

/// The three output streams of one run.
pub struct TraceSinks<W> {
    /// `group-1.txt`, `group-2.txt`.
    pub groups:  [W; 2],
    /// `channel.txt`.
    pub channel: W,
}

impl TraceSinks<File> {
    /// Create (truncate) the run's trace files in `dir`.
    pub fn create(dir: &Path) -> SimResult<Self> {
        let open = |name: &str| -> SimResult<File> {
            File::create(dir.join(name)).map_err(|e| SimError::Output(e.into()))
        };
        Ok(Self {
            groups:  [open("group-1.txt")?, open("group-2.txt")?],
            channel: open("channel.txt")?,
        })
    }
}

// ── Per-group measurement context ─────────────────────────────────────────────

/// One rear → front traffic pair and everything observing it.
pub struct GroupContext<W: Write> {
    pub id:     GroupId,
    /// Source endpoint.
    pub rear:   NodeId,
    /// Sink endpoint.
    pub front:  NodeId,
    pub source: OnOffSource,
    pub sink:   PacketSink,
    pub tracer: TrafficTracer<W>,
    /// Index into the sim's links.
    pub link:   usize,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<W>` owns every piece of run state: the mobility store, the two group
/// contexts, the links, the channel sampler, the node pool and its driver,
/// and the event queue.  Nothing lives outside it, so several runs can exist
/// side by side.
///
/// Each popped event is handled in one step:
///
/// | Event          | Handling                                                |
/// |----------------|---------------------------------------------------------|
/// | `SourceStart`  | start the source, apply its actions                     |
/// | `SourceStop`   | stop the source; outstanding timers go stale            |
/// | `SourceTimer`  | forward to the source, apply its actions                |
/// | `Deliver`      | sink receives, tracer writes the `Rx` row               |
/// | `Sample`       | fire the sampler, re-enqueue at `now + Δt`              |
/// | `DriverSync`   | driver syncs through the pool callbacks                 |
///
/// Applying a `Transmit` action writes the `Tx` row, hands the packet to the
/// group's link and enqueues a `Deliver` at the arrival time.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<W: Write> {
    pub config:   ScenarioConfig,
    /// `now` and the exclusive horizon.
    pub clock:    SimClock,
    pub mobility: MobilityStore,
    pub groups:   Vec<GroupContext<W>>,
    pub links:    Vec<SerialLink>,
    pub sampler:  ChannelSampler<W>,
    pub pool:     NodePool,
    pub(crate) driver: Box<dyn MobilityDriver>,
    pub(crate) queue:  EventQueue<Event>,
    events:       u64,
}

impl<W: Write> Sim<W> {
    pub(crate) fn new(
        config: ScenarioConfig,
        mobility: MobilityStore,
        groups: Vec<GroupContext<W>>,
        links: Vec<SerialLink>,
        sampler: ChannelSampler<W>,
        pool: NodePool,
        driver: Box<dyn MobilityDriver>,
    ) -> Self {
        let mut sim = Self {
            clock: SimClock::new(config.horizon()),
            config,
            mobility,
            groups,
            links,
            sampler,
            pool,
            driver,
            queue: EventQueue::new(),
            events: 0,
        };
        sim.schedule_initial();
        sim
    }

    /// Declare the up-front work: driver ticks, the first sample, and the
    /// application start/stop of every group.
    ///
    /// Driver ticks are queued first so a sample sharing their timestamp
    /// sees synchronized positions.
    fn schedule_initial(&mut self) {
        let interval = self.config.sync_interval();
        let mut t = SimTime::ZERO;
        while !self.clock.is_past_horizon(t) {
            self.queue.push(t, Event::DriverSync);
            t = t.saturating_add(interval);
        }
        self.queue.push(SimTime::ZERO, Event::Sample);
        let (start, stop) = (self.config.app_start(), self.config.app_stop());
        for group in &self.groups {
            self.queue.push(start, Event::SourceStart(group.id));
            self.queue.push(stop, Event::SourceStop(group.id));
        }
    }

    /// Events handled so far.
    pub fn events(&self) -> u64 {
        self.events
    }

    /// Events still queued.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run until the horizon, flush every stream and return the counters.
    ///
    /// Any component error aborts the run; rows already written stay in
    /// the streams.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        info!(
            seed = self.config.seed,
            horizon = %self.clock.horizon,
            period = %self.sampler.period(),
            "run started"
        );

        while let Some((now, event)) = self.queue.pop_before(self.clock.horizon) {
            self.clock.advance_to(now);
            observer.on_event(now, &event);
            self.handle(now, event, observer)?;
            self.events += 1;
        }
        self.clock.advance_to(self.clock.horizon);
        self.queue.clear();

        self.finish()?;
        let summary = self.summary();
        for g in &summary.groups {
            info!(group = g.group, tx = g.tx, rx = g.rx, prr = ?g.prr, "group summary");
        }
        info!(events = summary.events, samples = summary.samples, "run finished");
        observer.on_sim_end(&summary);
        Ok(summary)
    }

    /// Current counters.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed:    self.config.seed,
            horizon: self.clock.horizon,
            events:  self.events,
            samples: self.sampler.samples(),
            groups:  self
                .groups
                .iter()
                .map(|g| GroupSummary::new(g.id.number(), g.tracer.counters(), g.sink.bytes()))
                .collect(),
        }
    }

    /// Flush and hand back the output sinks.
    pub fn into_sinks(self) -> SimResult<TraceSinks<W>> {
        let mut groups = self.groups.into_iter();
        let mut next = || -> SimResult<W> {
            match groups.next() {
                Some(g) => Ok(g.tracer.into_inner()?),
                None => Err(SimError::Config("scenario has fewer than two groups".into())),
            }
        };
        let first = next()?;
        let second = next()?;
        Ok(TraceSinks { groups: [first, second], channel: self.sampler.into_inner()? })
    }

    // ── Event handling ────────────────────────────────────────────────────

    fn handle<O: SimObserver>(&mut self, now: SimTime, event: Event, observer: &mut O) -> SimResult<()> {
        match event {
            Event::SourceStart(group) => {
                let slot = self.slot(group)?;
                debug!(group = group.number(), time = %now, "source started");
                let actions = self.groups[slot].source.start(now);
                self.apply(slot, now, actions)?;
            }
            Event::SourceStop(group) => {
                let slot = self.slot(group)?;
                debug!(group = group.number(), time = %now, "source stopped");
                self.groups[slot].source.stop(now);
            }
            Event::SourceTimer { group, timer, epoch } => {
                let slot = self.slot(group)?;
                let actions = self.groups[slot].source.on_timer(now, timer, epoch);
                self.apply(slot, now, actions)?;
            }
            Event::Deliver { group, packet } => {
                let slot = self.slot(group)?;
                let ctx = &mut self.groups[slot];
                if ctx.sink.receive(&packet) {
                    ctx.tracer.on_receive(now, &packet, packet.src);
                }
            }
            Event::Sample => {
                let delay = self.sampler.fire(now, &mut self.mobility)?;
                observer.on_sample(now, self.sampler.samples());
                self.queue.push(now.saturating_add(delay), Event::Sample);
            }
            Event::DriverSync => {
                self.driver.sync(now, &mut self.pool, &mut self.mobility)?;
            }
        }
        Ok(())
    }

    /// Carry out the requests a source returned.
    fn apply(&mut self, slot: usize, now: SimTime, actions: Vec<SourceAction>) -> SimResult<()> {
        for action in actions {
            let ctx = &mut self.groups[slot];
            match action {
                SourceAction::Schedule { after, timer, epoch } => {
                    self.queue.push(
                        now.saturating_add(after),
                        Event::SourceTimer { group: ctx.id, timer, epoch },
                    );
                }
                SourceAction::Transmit(packet) => {
                    ctx.tracer.on_transmit(now, &packet);
                    let distance = self.mobility.distance(ctx.rear, ctx.front, now)?;
                    let arrival = self.links[ctx.link].transmit(now, packet.size(), distance);
                    self.queue.push(arrival, Event::Deliver { group: ctx.id, packet });
                }
            }
        }
        Ok(())
    }

    fn slot(&self, group: GroupId) -> SimResult<usize> {
        self.groups
            .iter()
            .position(|g| g.id == group)
            .ok_or_else(|| SimError::Config(format!("no traffic group {}", group.number())))
    }

    /// Flush every stream; the first stored tracer error fails the run.
    fn finish(&mut self) -> SimResult<()> {
        self.sampler.finish()?;
        for g in &mut self.groups {
            g.tracer.finish();
            if let Some(e) = g.tracer.take_error() {
                return Err(e.into());
            }
        }
        Ok(())
    }
}
