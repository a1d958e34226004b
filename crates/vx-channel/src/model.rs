//! The `PropagationModel` trait and the default V2V implementation.

use rand::Rng;
use rand_distr::StandardNormal;
use vx_core::{SimRng, Vector3};

use crate::{pathloss, weather, ChannelCondition, ChannelConfig, ChannelResult};

/// Path loss and weather attenuation between two positions.
///
/// `loss` takes `&mut self` because stochastic models (condition draws,
/// shadowing) advance their RNG on every query.
pub trait PropagationModel {
    /// Path loss between `a` and `b`, dB.
    fn loss(&mut self, a: Vector3, b: Vector3) -> f64;

    /// Weather attenuation over `distance` metres between endpoints at
    /// heights `z_a` and `z_b`, dB.
    fn weather_attenuation(&self, distance: f64, z_a: f64, z_b: f64) -> f64;

    /// Configured channel condition label for trace output.
    fn condition_label(&self) -> &str;

    /// Scenario tag for trace output.
    fn scenario_label(&self) -> &str;
}

/// 3GPP TR 37.885 V2V model with ITU-R rain/wet-snow attenuation.
#[derive(Debug, Clone)]
pub struct VehicularPropagationModel {
    config: ChannelConfig,
    rng:    SimRng,
}

impl VehicularPropagationModel {
    /// Validate `config` and build a model drawing from `rng`.
    pub fn new(config: ChannelConfig, rng: SimRng) -> ChannelResult<Self> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Distance the loss formulas see: ground distance for base scenarios,
    /// 3-D distance for `Extended-*`.
    pub fn link_distance(&self, a: Vector3, b: Vector3) -> f64 {
        if self.config.scenario.is_extended() {
            a.distance(b)
        } else {
            a.distance_2d(b)
        }
    }

    /// Resolve `All` into LOS or NLOSv by drawing against P_LOS(d).
    fn resolve_condition(&mut self, d: f64) -> ChannelCondition {
        match self.config.condition {
            ChannelCondition::All => {
                let p = pathloss::los_probability(self.config.scenario, d).clamp(0.0, 1.0);
                if self.rng.gen_bool(p) {
                    ChannelCondition::Los
                } else {
                    ChannelCondition::NlosV
                }
            }
            fixed => fixed,
        }
    }
}

impl PropagationModel for VehicularPropagationModel {
    fn loss(&mut self, a: Vector3, b: Vector3) -> f64 {
        let d = self.link_distance(a, b);
        let condition = self.resolve_condition(d);
        let mean = pathloss::mean_loss(self.config.scenario, condition, d, self.config.frequency_ghz());
        if self.config.shadowing {
            let z: f64 = self.rng.inner().sample(StandardNormal);
            mean + z * pathloss::shadowing_sigma(condition)
        } else {
            mean
        }
    }

    fn weather_attenuation(&self, distance: f64, z_a: f64, z_b: f64) -> f64 {
        weather::attenuation(&self.config.weather, distance, z_a, z_b)
    }

    fn condition_label(&self) -> &str {
        self.config.condition.label()
    }

    fn scenario_label(&self) -> &str {
        self.config.scenario.label()
    }
}
