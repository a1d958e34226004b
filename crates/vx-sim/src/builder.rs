//! Fluent builder for constructing a [`Sim`].

use std::io::Write;
use std::net::Ipv4Addr;

use tracing::info;
use vx_channel::{ChannelSampler, PropagationModel, SamplerConfig, VehicularPropagationModel};
use vx_core::{GroupId, NodeRng, SimRng, Vector3};
use vx_mobility::MobilityStore;
use vx_output::TsvTrace;
use vx_pool::{FcdDriver, MobilityDriver, NodePool, NullDriver};
use vx_traffic::{OnOffSource, PacketSink, SerialLink, TrafficTracer};

use crate::{GroupContext, ScenarioConfig, Sim, SimError, SimResult, TraceSinks};

/// Seed offsets of the shared random streams.
const MODEL_STREAM: u64 = 1;
const PARK_STREAM: u64 = 2;

/// Shared random stream `offset` of run `seed`.
fn stream(seed: u64, offset: u64) -> SimRng {
    SimRng::new(seed).child(offset)
}

/// Fluent builder for [`Sim<W>`].
///
/// # Required inputs
///
/// - [`ScenarioConfig`], validated in [`build`][Self::build]
/// - a propagation model, via [`model`][Self::model] or
///   [`with_defaults`][Self::with_defaults]
/// - the three output sinks, passed to [`build`][Self::build]
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default        |
/// |-----------------|----------------|
/// | `.driver(d)`    | `NullDriver`   |
///
/// # Example
///
/// ```rust,ignore
/// let sinks = TraceSinks::create(&run_dir)?;
/// let mut sim = SimBuilder::new(config).with_defaults()?.build(sinks)?;
/// let summary = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: ScenarioConfig,
    model:  Option<Box<dyn PropagationModel>>,
    driver: Option<Box<dyn MobilityDriver>>,
}

impl SimBuilder {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config, model: None, driver: None }
    }

    /// Attach the propagation model the channel sampler queries.
    pub fn model(mut self, model: Box<dyn PropagationModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Attach the external mobility driver.
    pub fn driver(mut self, driver: Box<dyn MobilityDriver>) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Fill in whatever the configuration describes: the vehicular model
    /// for `config.channel` and, when `config.driver.vehicle_trace` is set,
    /// an [`FcdDriver`] replaying it.  Inputs already attached are kept.
    pub fn with_defaults(mut self) -> SimResult<Self> {
        if self.model.is_none() {
            let model = VehicularPropagationModel::new(self.config.channel, stream(self.config.seed, MODEL_STREAM))?;
            self.model = Some(Box::new(model));
        }
        if self.driver.is_none() {
            if let Some(path) = &self.config.driver.vehicle_trace {
                self.driver = Some(Box::new(FcdDriver::from_path(path)?));
            }
        }
        Ok(self)
    }

    /// Validate the configuration, place the platoon and wire every
    /// component to its stream.
    pub fn build<W: Write>(self, sinks: TraceSinks<W>) -> SimResult<Sim<W>> {
        let config = self.config;
        config.validate()?;
        let model = self.model.ok_or(SimError::MissingModel)?;
        let driver = self.driver.unwrap_or_else(|| Box::new(NullDriver));

        // ── Geometry ──────────────────────────────────────────────────────
        let geo = &config.geometry;
        let v = geo.speed_ms();
        let d = geo.intra_group_distance_m();
        let gap = geo.inter_group_distance_m;
        let velocity = Vector3::new(v, 0.0, 0.0);
        let placements = if geo.same_lane {
            [
                [Vector3::new(0.0, 0.0, 0.0), Vector3::new(d, 0.0, 0.0)],
                [Vector3::new(d + gap, 0.0, 0.0), Vector3::new(2.0 * d + gap, 0.0, 0.0)],
            ]
        } else {
            [
                [Vector3::new(0.0, 0.0, 0.0), Vector3::new(d, 0.0, 0.0)],
                [Vector3::new(d, gap, 0.0), Vector3::new(2.0 * d, gap, 0.0)],
            ]
        };

        let mut mobility = MobilityStore::new();
        let pairs: Vec<_> = placements
            .iter()
            .map(|[rear, front]| (mobility.add_node(*rear, velocity), mobility.add_node(*front, velocity)))
            .collect();

        // ── Links ─────────────────────────────────────────────────────────
        let radio = &config.radio;
        let links = if radio.orthogonal_resources {
            vec![
                SerialLink::nr(radio.bandwidth_hz, radio.mcs, 0.5)?,
                SerialLink::nr(radio.bandwidth_hz, radio.mcs, 0.5)?,
            ]
        } else {
            vec![SerialLink::nr(radio.bandwidth_hz, radio.mcs, 1.0)?]
        };

        // ── Groups ────────────────────────────────────────────────────────
        let mut groups = Vec::with_capacity(2);
        for (i, ((rear, front), sink)) in pairs.iter().copied().zip(sinks.groups).enumerate() {
            let id = GroupId(i as u8);
            let subnet = id.number() as u8;
            let local = Ipv4Addr::new(10, 1, subnet, 1);
            let remote = Ipv4Addr::new(10, 1, subnet, 2);

            let source = OnOffSource::new(config.on_off(), local, remote, NodeRng::new(config.seed, rear))?;
            let mut packet_sink = PacketSink::new(remote);
            packet_sink.start();

            groups.push(GroupContext {
                id,
                rear,
                front,
                source,
                sink: packet_sink,
                tracer: TrafficTracer::new(id, TsvTrace::new(sink)),
                link: if radio.orthogonal_resources { i } else { 0 },
            });
        }

        // ── Channel sampler (first endpoint of each group) ────────────────
        let (a, _) = pairs[0];
        let (b, _) = pairs[1];
        let sampler = ChannelSampler::new(
            a,
            b,
            SamplerConfig {
                period:    config.sample_period(),
                layout:    config.layout,
                speed_kmh: geo.speed_kmh,
                weather:   config.channel.weather,
            },
            model,
            TsvTrace::new(sinks.channel),
            &mobility,
        )?;

        // ── Node pool (group 1 endpoints) ─────────────────────────────────
        let (rear, front) = pairs[0];
        let pool = NodePool::new(vec![rear, front], config.horizon(), stream(config.seed, PARK_STREAM));

        info!(
            profile = %config.profile,
            scenario = %config.channel.scenario,
            condition = %config.channel.condition,
            intra_group_m = d,
            inter_group_m = gap,
            same_lane = geo.same_lane,
            links = links.len(),
            "scenario built"
        );

        Ok(Sim::new(config, mobility, groups, links, sampler, pool, driver))
    }
}
