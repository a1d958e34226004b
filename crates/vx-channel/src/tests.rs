//! Unit tests for vx-channel.

use vx_core::{SimRng, SimTime, Vector3};
use vx_mobility::MobilityStore;
use vx_output::{SampleLayout, TsvTrace};
use vx_schedule::PeriodicTask;

use crate::{
    pathloss, weather, ChannelCondition, ChannelConfig, ChannelError, ChannelSampler,
    PropagationModel, SamplerConfig, Scenario, VehicularPropagationModel, WeatherParams,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

fn rain(rain_mm_h: f64, k: f64, alpha: f64) -> WeatherParams {
    WeatherParams { rain_mm_h, k, alpha, ..WeatherParams::default() }
}

/// Fixed-output model so sampler tests do not depend on the 3GPP formulas.
struct FlatModel;

impl PropagationModel for FlatModel {
    fn loss(&mut self, _a: Vector3, _b: Vector3) -> f64 {
        70.5
    }
    fn weather_attenuation(&self, distance: f64, _z_a: f64, _z_b: f64) -> f64 {
        distance / 100.0
    }
    fn condition_label(&self) -> &str {
        "los"
    }
    fn scenario_label(&self) -> &str {
        "V2V-Highway"
    }
}

#[cfg(test)]
mod config {
    use super::*;

    #[test]
    fn scenario_parses_all_tags() {
        for s in [
            Scenario::V2vHighway,
            Scenario::V2vUrban,
            Scenario::ExtendedV2vHighway,
            Scenario::ExtendedV2vUrban,
        ] {
            assert_eq!(s.label().parse::<Scenario>().unwrap(), s);
        }
        assert!(matches!("Rural".parse::<Scenario>(), Err(ChannelError::InvalidConfig(_))));
    }

    #[test]
    fn condition_accepts_letters_and_labels() {
        assert_eq!("v".parse::<ChannelCondition>().unwrap(), ChannelCondition::NlosV);
        assert_eq!("nlos-v".parse::<ChannelCondition>().unwrap(), ChannelCondition::NlosV);
        assert_eq!("a".parse::<ChannelCondition>().unwrap(), ChannelCondition::All);
        assert_eq!(ChannelCondition::Los.label(), "los");
        assert!("x".parse::<ChannelCondition>().is_err());
    }

    #[test]
    fn serde_uses_trace_labels() {
        let json = serde_json::to_string(&Scenario::ExtendedV2vUrban).unwrap();
        assert_eq!(json, "\"Extended-V2V-Urban\"");
        let c: ChannelCondition = serde_json::from_str("\"nlos-v\"").unwrap();
        assert_eq!(c, ChannelCondition::NlosV);
    }

    #[test]
    fn weather_condition_code() {
        assert_eq!(rain(0.0, 1.0, 1.0).condition_code(), 1);
        assert_eq!(rain(10.0, 1.0, 0.1).condition_code(), 2);
        let snow = WeatherParams { combined_rain_snow: true, ..rain(10.0, 1.0, 0.1) };
        assert_eq!(snow.condition_code(), 3);
    }

    #[test]
    fn validate_rejects_bad_frequency_and_negative_rain() {
        let mut c = ChannelConfig::default();
        assert!(c.validate().is_ok());
        c.frequency_hz = 0.0;
        assert!(c.validate().is_err());
        c = ChannelConfig::default();
        c.weather.rain_mm_h = -1.0;
        assert!(c.validate().is_err());
        c = ChannelConfig::default();
        c.weather = rain(0.0, 0.0, 0.0);
        assert!(c.validate().is_ok(), "zero weather parameters are degenerate but valid");
    }
}

#[cfg(test)]
mod path_loss {
    use super::*;

    #[test]
    fn los_highway_and_urban_at_ten_metres() {
        let hw = pathloss::los(Scenario::V2vHighway, 10.0, 60.0);
        assert!(close(hw, 32.4 + 20.0 + 20.0 * 60f64.log10(), 1e-9));
        let urban = pathloss::los(Scenario::V2vUrban, 10.0, 60.0);
        assert!(close(urban, 38.77 + 16.7 + 18.2 * 60f64.log10(), 1e-9));
    }

    #[test]
    fn distance_clamped_to_one_metre() {
        let at_zero = pathloss::los(Scenario::V2vUrban, 0.0, 60.0);
        let at_one = pathloss::los(Scenario::V2vUrban, 1.0, 60.0);
        assert_eq!(at_zero, at_one);
    }

    #[test]
    fn blockage_mean_grows_past_threshold() {
        assert_eq!(pathloss::blockage_mean(10.0), 9.0);
        assert!(close(pathloss::blockage_mean(1000.0), 13.0, 1e-9));
        let d = 20.0;
        let v = pathloss::nlos_v(Scenario::V2vUrban, d, 60.0);
        assert!(close(v - pathloss::los(Scenario::V2vUrban, d, 60.0), 9.0, 1e-9));
    }

    #[test]
    fn nlos_same_for_both_scenarios() {
        let n = pathloss::nlos(10.0, 60.0);
        assert!(close(n, 36.85 + 30.0 + 18.9 * 60f64.log10(), 1e-9));
        assert_eq!(
            pathloss::mean_loss(Scenario::V2vHighway, ChannelCondition::Nlos, 10.0, 60.0),
            pathloss::mean_loss(Scenario::V2vUrban, ChannelCondition::Nlos, 10.0, 60.0),
        );
    }

    #[test]
    fn los_probability_bounds() {
        assert_eq!(pathloss::los_probability(Scenario::V2vHighway, 0.0), 1.0);
        assert!(close(pathloss::los_probability(Scenario::V2vHighway, 575.0), 0.44, 1e-9));
        assert_eq!(pathloss::los_probability(Scenario::V2vHighway, 2000.0), 0.0);
        assert_eq!(pathloss::los_probability(Scenario::V2vUrban, 0.0), 1.0);
        let p = pathloss::los_probability(Scenario::V2vUrban, 100.0);
        assert!(close(p, 1.05 * (-1.14f64).exp(), 1e-12));
    }

    #[test]
    fn nlosv_sigma_combines_los_and_blockage() {
        assert_eq!(pathloss::shadowing_sigma(ChannelCondition::Los), 3.0);
        assert_eq!(pathloss::shadowing_sigma(ChannelCondition::Nlos), 4.0);
        assert!(close(pathloss::shadowing_sigma(ChannelCondition::NlosV), 29.25f64.sqrt(), 1e-12));
    }
}

#[cfg(test)]
mod weather_attenuation {
    use super::*;

    #[test]
    fn rain_scales_linearly_with_distance() {
        let w = rain(10.0, 1.0, 0.1);
        let gamma = weather::specific_attenuation(&w);
        assert!(close(gamma, 10f64.powf(0.1), 1e-12));
        assert!(close(weather::attenuation(&w, 1000.0, 0.0, 0.0), gamma, 1e-12));
        assert!(close(weather::attenuation(&w, 20.0, 0.0, 0.0), gamma * 0.02, 1e-12));
    }

    #[test]
    fn zero_parameters_give_zero_attenuation() {
        let w = rain(0.0, 0.0, 0.7656);
        assert_eq!(weather::attenuation(&w, 20.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn snow_factor_limits() {
        assert_eq!(weather::snow_factor(10.0), 0.0);
        assert_eq!(weather::snow_factor(0.0), 0.0);
        assert_eq!(weather::snow_factor(-1500.0), 1.0);
        let mid = weather::snow_factor(-360.0);
        assert!(mid > 1.0 && mid < 4.0, "wet snow enhances attenuation near the melting layer: {mid}");
    }

    #[test]
    fn combined_rain_snow_applies_factor() {
        let mut w = rain(50.0, 0.8606, 0.7656);
        let plain = weather::attenuation(&w, 20.0, 0.0, 0.0);
        w.combined_rain_snow = true;
        let dh = weather::height_offset(&w, 0.0, 0.0);
        assert_eq!(dh, -360.0);
        let combined = weather::attenuation(&w, 20.0, 0.0, 0.0);
        assert!(close(combined, plain * weather::snow_factor(dh), 1e-12));
    }
}

#[cfg(test)]
mod model {
    use super::*;

    fn model(condition: ChannelCondition, scenario: Scenario, shadowing: bool, seed: u64) -> VehicularPropagationModel {
        let config = ChannelConfig { condition, scenario, shadowing, ..ChannelConfig::default() };
        VehicularPropagationModel::new(config, SimRng::new(seed)).unwrap()
    }

    #[test]
    fn base_scenario_ignores_height() {
        let m = model(ChannelCondition::Los, Scenario::V2vUrban, false, 1);
        let d = m.link_distance(Vector3::ZERO, Vector3::new(3.0, 4.0, 100.0));
        assert_eq!(d, 5.0);
        let ext = model(ChannelCondition::Los, Scenario::ExtendedV2vUrban, false, 1);
        assert!(ext.link_distance(Vector3::ZERO, Vector3::new(3.0, 4.0, 12.0)) == 13.0);
    }

    #[test]
    fn fixed_condition_without_shadowing_is_deterministic_mean() {
        let mut m = model(ChannelCondition::NlosV, Scenario::V2vUrban, false, 7);
        let b = Vector3::new(20.0, 0.0, 0.0);
        let expected = pathloss::nlos_v(Scenario::V2vUrban, 20.0, 60.0);
        for _ in 0..5 {
            assert!(close(m.loss(Vector3::ZERO, b), expected, 1e-9));
        }
        assert_eq!(m.condition_label(), "nlos-v");
        assert_eq!(m.scenario_label(), "V2V-Urban");
    }

    #[test]
    fn all_condition_at_short_range_is_los() {
        // P_LOS(3 m) saturates at 1 in the urban scenario.
        let mut m = model(ChannelCondition::All, Scenario::V2vUrban, false, 3);
        let b = Vector3::new(3.0, 0.0, 0.0);
        let los = pathloss::los(Scenario::V2vUrban, 3.0, 60.0);
        for _ in 0..20 {
            assert!(close(m.loss(Vector3::ZERO, b), los, 1e-9));
        }
    }

    #[test]
    fn shadowing_is_seed_deterministic() {
        let b = Vector3::new(40.0, 0.0, 0.0);
        let mut m1 = model(ChannelCondition::All, Scenario::V2vHighway, true, 42);
        let mut m2 = model(ChannelCondition::All, Scenario::V2vHighway, true, 42);
        let s1: Vec<f64> = (0..50).map(|_| m1.loss(Vector3::ZERO, b)).collect();
        let s2: Vec<f64> = (0..50).map(|_| m2.loss(Vector3::ZERO, b)).collect();
        assert_eq!(s1, s2);
        assert!(s1.windows(2).any(|w| w[0] != w[1]), "shadowing should vary");
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let config = ChannelConfig { frequency_hz: -1.0, ..ChannelConfig::default() };
        assert!(VehicularPropagationModel::new(config, SimRng::new(0)).is_err());
    }
}

#[cfg(test)]
mod sampler {
    use super::*;

    fn pair() -> MobilityStore {
        let mut store = MobilityStore::new();
        let v = Vector3::new(16.0, 0.0, 0.0);
        store.add_node(Vector3::ZERO, v);
        store.add_node(Vector3::new(0.0, 20.0, 0.0), v);
        store
    }

    fn sampler_config(layout: SampleLayout) -> SamplerConfig {
        SamplerConfig {
            period:    SimTime::from_millis(100),
            layout,
            speed_kmh: 60.0,
            weather:   rain(50.0, 0.8606, 0.7656),
        }
    }

    fn sampler(store: &MobilityStore, layout: SampleLayout) -> ChannelSampler<Vec<u8>> {
        let (a, b) = (vx_core::NodeId(0), vx_core::NodeId(1));
        ChannelSampler::new(a, b, sampler_config(layout), Box::new(FlatModel), TsvTrace::new(Vec::new()), store)
            .unwrap()
    }

    #[test]
    fn fire_returns_period_and_appends_one_record() {
        let mut store = pair();
        let mut s = sampler(&store, SampleLayout::Extended);
        for i in 0..3u64 {
            let next = s.fire(SimTime::from_millis(100 * i), &mut store).unwrap();
            assert_eq!(next, SimTime::from_millis(100));
        }
        assert_eq!(s.samples(), 3);
        let out = String::from_utf8(s.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "0.1\t60\t50\t70.5\t20\t0.2\t2\tV2V-Highway\t50\t0.8606\t0.7656\tlos");
    }

    #[test]
    fn compact_layout_records_period() {
        let mut store = pair();
        let mut s = sampler(&store, SampleLayout::Compact);
        s.fire(SimTime::ZERO, &mut store).unwrap();
        let out = String::from_utf8(s.into_inner().unwrap()).unwrap();
        assert_eq!(out, "0\t70.5\t20\t0.2\t0.1\n");
    }

    #[test]
    fn unknown_endpoint_rejected_at_bind() {
        let store = pair();
        let r = ChannelSampler::new(
            vx_core::NodeId(0),
            vx_core::NodeId(5),
            sampler_config(SampleLayout::Extended),
            Box::new(FlatModel),
            TsvTrace::new(Vec::new()),
            &store,
        );
        assert!(matches!(r, Err(ChannelError::UnknownEndpoint(n)) if n == vx_core::NodeId(5)));
    }

    #[test]
    fn zero_period_rejected() {
        let store = pair();
        let mut cfg = sampler_config(SampleLayout::Extended);
        cfg.period = SimTime::ZERO;
        let r = ChannelSampler::new(
            vx_core::NodeId(0),
            vx_core::NodeId(1),
            cfg,
            Box::new(FlatModel),
            TsvTrace::new(Vec::new()),
            &store,
        );
        assert!(matches!(r, Err(ChannelError::InvalidConfig(_))));
    }
}
