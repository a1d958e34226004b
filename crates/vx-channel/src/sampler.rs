//! `ChannelSampler` — the periodic channel measurement task.

use std::io::Write;

use tracing::info;
use vx_core::{NodeId, SimTime};
use vx_mobility::MobilityStore;
use vx_output::{ChannelSampleRow, SampleLayout, TraceWriter, TsvTrace};
use vx_schedule::PeriodicTask;

use crate::{ChannelError, ChannelResult, PropagationModel, WeatherParams};

/// Per-run constants written alongside every sample.
#[derive(Debug, Clone, Copy)]
pub struct SamplerConfig {
    /// Sampling period Δt; must be nonzero.
    pub period:    SimTime,
    pub layout:    SampleLayout,
    /// Vehicle speed column, km/h.
    pub speed_kmh: f64,
    pub weather:   WeatherParams,
}

/// Samples path loss, 3-D distance and weather attenuation between two
/// endpoints, appending one record per firing.
///
/// The model is resolved once at construction.  Each [`fire`] returns the
/// period; the event loop re-enqueues the task at `now + period` until the
/// horizon.
///
/// [`fire`]: PeriodicTask::fire
pub struct ChannelSampler<W: Write> {
    a:       NodeId,
    b:       NodeId,
    config:  SamplerConfig,
    model:   Box<dyn PropagationModel>,
    trace:   TsvTrace<W>,
    samples: u64,
}

impl<W: Write> ChannelSampler<W> {
    /// Bind a sampler to endpoints `a` and `b`.
    ///
    /// Fails if the period is zero or either endpoint is unknown to
    /// `mobility`.
    pub fn new(
        a: NodeId,
        b: NodeId,
        config: SamplerConfig,
        model: Box<dyn PropagationModel>,
        trace: TsvTrace<W>,
        mobility: &MobilityStore,
    ) -> ChannelResult<Self> {
        if config.period.is_zero() {
            return Err(ChannelError::InvalidConfig("sampling period must be nonzero".into()));
        }
        for node in [a, b] {
            if !mobility.contains(node) {
                return Err(ChannelError::UnknownEndpoint(node));
            }
        }
        Ok(Self { a, b, config, model, trace, samples: 0 })
    }

    /// Records written so far.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn period(&self) -> SimTime {
        self.config.period
    }

    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.a, self.b)
    }

    /// Flush the sample stream.
    pub fn finish(&mut self) -> ChannelResult<()> {
        self.trace.finish()?;
        Ok(())
    }

    /// Flush and hand back the underlying sink.
    pub fn into_inner(self) -> ChannelResult<W> {
        Ok(self.trace.into_inner()?)
    }
}

impl<W: Write> PeriodicTask<MobilityStore> for ChannelSampler<W> {
    type Error = ChannelError;

    fn fire(&mut self, now: SimTime, mobility: &mut MobilityStore) -> ChannelResult<SimTime> {
        let pa = mobility.position(self.a, now)?;
        let pb = mobility.position(self.b, now)?;

        let path_loss = self.model.loss(pa, pb);
        let distance = pa.distance(pb);
        let weather_att = self.model.weather_attenuation(distance, pa.z, pb.z);

        let w = &self.config.weather;
        let row = ChannelSampleRow {
            time:              now,
            speed_kmh:         self.config.speed_kmh,
            rain:              w.rain_mm_h,
            path_loss,
            distance,
            weather_att,
            weather_cond:      w.condition_code(),
            scenario:          self.model.scenario_label(),
            k:                 w.k,
            alpha:             w.alpha,
            channel_condition: self.model.condition_label(),
            period:            self.config.period,
        };
        self.trace.write_sample(&row, self.config.layout)?;
        self.samples += 1;

        info!(time = %now, path_loss, distance, weather_att, "channel sample");
        Ok(self.config.period)
    }
}
