//! platoon: two vehicle groups, one mmWave channel, measured end to end.
//!
//! Each group is a rear → front pair driving at a common speed; the rear
//! runs an ON/OFF source towards the front.  Every run writes
//!
//! ```text
//! <output>/run-<i>/group-1.txt     Tx/Rx trace, group 1
//! <output>/run-<i>/group-2.txt     Tx/Rx trace, group 2
//! <output>/run-<i>/channel.txt     channel samples between the groups
//! <output>/run-<i>/manifest.json   effective configuration (seed + i)
//! <output>/run-<i>/summary.json    counters and reception ratio
//! <output>/summary.json            all runs
//! ```
//!
//! Configuration precedence: `--profile` defaults, then `--config` JSON,
//! then individual flags.  Log level via `RUST_LOG` (default `info`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vx_channel::{ChannelCondition, Scenario};
use vx_core::SimTime;
use vx_output::write_json;
use vx_sim::{Profile, RunSummary, ScenarioConfig, SimBuilder, SimObserver, TraceSinks};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "platoon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Default set to start from (simple | nrv2v).
    #[arg(long, default_value = "nrv2v")]
    profile: Profile,

    /// JSON file overlaid on the profile; partial objects are fine.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory receiving run-<i>/ subdirectories.
    #[arg(short, long, default_value = "output/platoon")]
    output: PathBuf,

    /// Run horizon, s.
    #[arg(long)]
    horizon: Option<f64>,

    /// Channel sampling period, s.
    #[arg(long)]
    sample_period: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Number of independent runs; run i uses seed + i.
    #[arg(long)]
    runs: Option<u32>,

    /// Application start, ms.
    #[arg(long)]
    start_time: Option<u64>,

    /// Application stop, ms.
    #[arg(long)]
    stop_time: Option<u64>,

    /// ON period, ms.
    #[arg(long)]
    on_period: Option<u64>,

    /// Mean OFF period, ms.
    #[arg(long)]
    off_period: Option<u64>,

    /// Source rate while ON, bit/s.
    #[arg(long)]
    data_rate: Option<f64>,

    /// Payload size, bytes.
    #[arg(long)]
    packet_size: Option<u32>,

    /// Send packets without the sequence/timestamp header.
    #[arg(long)]
    no_seq_ts: bool,

    #[arg(long)]
    use_amc: Option<bool>,

    #[arg(long)]
    mcs: Option<u8>,

    #[arg(long)]
    antenna_elements: Option<u32>,

    #[arg(long)]
    bandwidth: Option<f64>,

    /// Orthogonal resources per group (true) or one shared link (false).
    #[arg(long)]
    orthogonal_resources: Option<bool>,

    /// Distance between the two groups, m.
    #[arg(long)]
    inter_group_distance: Option<f64>,

    /// Vehicle speed, km/h.
    #[arg(long)]
    speed: Option<f64>,

    /// Groups on one lane (true) or adjacent lanes (false).
    #[arg(long)]
    same_lane: Option<bool>,

    /// V2V-Highway | V2V-Urban | Extended-V2V-Highway | Extended-V2V-Urban.
    #[arg(long)]
    scenario: Option<Scenario>,

    /// l (LOS) | n (NLOS) | v (NLOSv) | a (all).
    #[arg(long)]
    channel_condition: Option<ChannelCondition>,

    #[arg(long)]
    shadowing: Option<bool>,

    /// Rain intensity, mm/h.
    #[arg(long)]
    rain: Option<f64>,

    #[arg(long)]
    combined_rain_snow: Option<bool>,

    /// Rain regression coefficient k.
    #[arg(long)]
    k: Option<f64>,

    /// Rain regression coefficient alpha.
    #[arg(long)]
    alpha: Option<f64>,

    /// Site altitude above sea level, m.
    #[arg(long)]
    altitude: Option<f64>,

    /// Mean annual 0 °C isotherm height, km.
    #[arg(long)]
    h0: Option<f64>,

    /// Floating-car-data CSV driving the group 1 endpoints.
    #[arg(long)]
    vehicle_trace: Option<PathBuf>,
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

impl Cli {
    /// Profile → JSON overlay → flags, then validate.
    fn resolve(&self) -> Result<ScenarioConfig> {
        let mut config = ScenarioConfig::profile(self.profile);
        if let Some(path) = &self.config {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            config = config
                .merge_json_str(&text)
                .with_context(|| format!("applying {}", path.display()))?;
        }

        set(&mut config.horizon_s, self.horizon);
        set(&mut config.sample_period_s, self.sample_period);
        set(&mut config.seed, self.seed);
        set(&mut config.runs, self.runs);

        let t = &mut config.traffic;
        set(&mut t.start_ms, self.start_time);
        set(&mut t.stop_ms, self.stop_time);
        set(&mut t.on_ms, self.on_period);
        set(&mut t.off_mean_ms, self.off_period);
        set(&mut t.data_rate_bps, self.data_rate);
        set(&mut t.packet_size, self.packet_size);
        if self.no_seq_ts {
            t.seq_ts_header = false;
        }

        let r = &mut config.radio;
        set(&mut r.use_amc, self.use_amc);
        set(&mut r.mcs, self.mcs);
        set(&mut r.antenna_elements, self.antenna_elements);
        set(&mut r.bandwidth_hz, self.bandwidth);
        set(&mut r.orthogonal_resources, self.orthogonal_resources);

        let g = &mut config.geometry;
        set(&mut g.inter_group_distance_m, self.inter_group_distance);
        set(&mut g.speed_kmh, self.speed);
        set(&mut g.same_lane, self.same_lane);

        let c = &mut config.channel;
        set(&mut c.scenario, self.scenario);
        set(&mut c.condition, self.channel_condition);
        set(&mut c.shadowing, self.shadowing);
        let w = &mut c.weather;
        set(&mut w.rain_mm_h, self.rain);
        set(&mut w.combined_rain_snow, self.combined_rain_snow);
        set(&mut w.k, self.k);
        set(&mut w.alpha, self.alpha);
        set(&mut w.altitude_m, self.altitude);
        set(&mut w.h0_km, self.h0);

        if self.vehicle_trace.is_some() {
            config.driver.vehicle_trace = self.vehicle_trace.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

// ── Progress observer ─────────────────────────────────────────────────────────

/// Logs every 10 % of simulated time.
struct Progress {
    horizon:      SimTime,
    next_percent: u64,
    started:      Instant,
}

impl Progress {
    fn new(horizon: SimTime) -> Self {
        Self { horizon, next_percent: 10, started: Instant::now() }
    }
}

impl SimObserver for Progress {
    fn on_sample(&mut self, now: SimTime, samples: u64) {
        let percent = (u128::from(now.as_nanos()) * 100 / u128::from(self.horizon.as_nanos().max(1))) as u64;
        if percent >= self.next_percent {
            info!(percent, samples, time = %now, "progress");
            self.next_percent = percent / 10 * 10 + 10;
        }
    }

    fn on_sim_end(&mut self, summary: &RunSummary) {
        info!(
            seed = summary.seed,
            wall_ms = self.started.elapsed().as_millis() as u64,
            "simulation complete"
        );
    }
}

// ── Runs ──────────────────────────────────────────────────────────────────────

fn run_once(config: ScenarioConfig, dir: &Path) -> Result<RunSummary> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    write_json(&dir.join("manifest.json"), &config)?;

    let mut observer = Progress::new(config.horizon());
    let mut sim = SimBuilder::new(config).with_defaults()?.build(TraceSinks::create(dir)?)?;
    let summary = sim.run(&mut observer)?;

    write_json(&dir.join("summary.json"), &summary)?;
    Ok(summary)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    let config = cli.resolve()?;
    info!(
        profile = %config.profile,
        runs = config.runs,
        seed = config.seed,
        output = %cli.output.display(),
        "starting"
    );

    let mut summaries = Vec::with_capacity(config.runs as usize);
    for i in 0..config.runs {
        let run = ScenarioConfig { seed: config.seed.wrapping_add(u64::from(i)), ..config.clone() };
        let dir = cli.output.join(format!("run-{i}"));
        let summary = run_once(run, &dir).with_context(|| format!("run {i} failed"))?;
        summaries.push(summary);
    }
    write_json(&cli.output.join("summary.json"), &summaries)?;

    println!("{:<6} {:<8} {:<8} {:<10} {:<10} {:<8}", "Run", "Group", "Tx", "Rx", "PRR", "Samples");
    println!("{}", "-".repeat(54));
    for (i, s) in summaries.iter().enumerate() {
        for g in &s.groups {
            let prr = g.prr.map_or_else(|| "-".to_owned(), |p| format!("{p:.4}"));
            println!("{:<6} {:<8} {:<8} {:<10} {:<10} {:<8}", i, g.group, g.tx, g.rx, prr, s.samples);
        }
    }

    Ok(())
}
