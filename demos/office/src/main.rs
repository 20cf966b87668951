//! office — one pedestrian working through a day at the office.
//!
//! Runs the statistics driver and the event-capture driver over the same
//! scenario and seed, then writes the records to `output/office/` as CSV
//! plus a `summary.json`.
//!
//! ```text
//! cargo run -p office --release [-- config.json]
//! RUST_LOG=debug cargo run -p office     # scheduler transitions
//! ```
//!
//! The optional JSON file overrides any of the `DemoConfig` fields below.

mod floor;

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ped_behavior::VisionParams;
use ped_core::{AgentEngagementStatus, AgentState, SimConfig, SimTime};
use ped_motion::MotionParams;
use ped_output::{CsvSink, CsvTraceWriter, ResultSink, dominant_frequency};
use ped_scenario::{ScenarioBuilder, load_sequences_reader};
use ped_sim::{
    AgentSim, CaptureConfig, EventCaptureDriver, EventCriteria, FieldInterval, SimBuilder,
    SimObserver, StatisticsDriver, Trainer, VisibilityCriterion,
};
use ped_spatial::GridFloor;

use floor::{DOOR, build_floor, register_activities};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR: &str = "output/office";

// Cells on the 32-column grid: the door's cell and its four neighbours.
const SEQUENCES_CSV: &str = "\
name,activities,rate_per_hour,trigger_cells\n\
coffee,kitchen,1.5,\n\
print,printer;kitchen,1.0,\n\
meeting,meeting,0.25,\n\
visitor,door;desk_a,0.75,318;349;350;351;382\n\
";

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    sim:                  SimConfig,
    motion:               MotionParams,
    vision:               VisionParams,
    sample_interval_secs: f64,
    frequency_analysis:   bool,
    /// Inclusive dB range counted as "near the kitchen".
    noise_min_db:         f64,
    noise_max_db:         f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sim:                  SimConfig { duration_secs: 8.0 * 3_600.0, ..SimConfig::default() },
            motion:               MotionParams::default(),
            vision:               VisionParams::default(),
            sample_interval_secs: 1.0,
            frequency_analysis:   true,
            noise_min_db:         45.0,
            noise_max_db:         70.0,
        }
    }
}

fn load_config() -> Result<DemoConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening {path}"))?;
            serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {path}"))
        }
        None => Ok(DemoConfig::default()),
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs every tenth percent and counts status changes.
#[derive(Default)]
struct ProgressLog {
    last_status: Option<AgentEngagementStatus>,
    transitions: u64,
}

impl SimObserver for ProgressLog {
    fn on_tick_end(&mut self, _time: SimTime, _state: &AgentState, status: AgentEngagementStatus) {
        if self.last_status.is_some_and(|s| s != status) {
            self.transitions += 1;
        }
        self.last_status = Some(status);
    }

    fn on_progress(&mut self, percent: u32) {
        if percent % 10 == 0 {
            info!(percent, "progress");
        }
    }

    fn on_sim_end(&mut self, time: SimTime) {
        info!(hours = time.hours(), transitions = self.transitions, "run complete");
    }
}

// ── Assembly ──────────────────────────────────────────────────────────────────

fn build_sim(config: &DemoConfig) -> Result<AgentSim<GridFloor>> {
    let floor = build_floor()?;
    let mut builder = ScenarioBuilder::new();
    register_activities(&mut builder)?;
    let ids = load_sequences_reader(Cursor::new(SEQUENCES_CSV), &mut builder)?;
    info!(sequences = ids.len(), "scenario loaded");

    Ok(SimBuilder::new(floor, builder.build()?)
        .config(config.sim.clone())
        .motion(config.motion.clone())
        .vision(config.vision.clone())
        .build()?)
}

/// Walk desk_a → kitchen alone to calibrate the motion parameters.
fn calibrate(config: &DemoConfig) -> Result<()> {
    let floor = build_floor()?;
    let mut builder = ScenarioBuilder::new();
    register_activities(&mut builder)?;
    let scenario = builder.build()?;

    let desk = scenario.activity(scenario.activity_id("desk_a").context("desk_a")?).default_pose();
    let kitchen = scenario.activity(scenario.activity_id("kitchen").context("kitchen")?);
    let start = AgentState::at_rest(desk.location, desk.direction);

    let mut trainer = Trainer::new(
        &floor,
        kitchen,
        config.motion.clone(),
        start,
        config.sim.time_step_secs,
    )?;
    let outcome = trainer.run(120.0)?;
    match outcome.arrival_secs {
        Some(secs) => println!(
            "Calibration: desk_a → kitchen in {secs:.1} s over {:.2} m",
            outcome.walked_distance_m
        ),
        None => println!("Calibration: kitchen not reached within 120 s"),
    }
    Ok(())
}

fn capture_config(config: &DemoConfig, floor: &GridFloor) -> CaptureConfig {
    CaptureConfig {
        sample_interval_secs: config.sample_interval_secs,
        criteria: EventCriteria {
            field_intervals: vec![FieldInterval::new("noise", config.noise_min_db, config.noise_max_db)],
            visibility: Some(VisibilityCriterion {
                target:  floor.region_around(DOOR, 1.0),
                visible: true,
            }),
            engaged_in: Vec::new(),
        },
        frequency_analysis: config.frequency_analysis,
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = load_config()?;
    println!("=== office — single-pedestrian occupancy ===");
    println!(
        "Duration: {:.1} h  |  Δt: {} s  |  Seed: {}",
        config.sim.duration_secs / 3_600.0,
        config.sim.time_step_secs,
        config.sim.seed
    );
    println!();

    calibrate(&config)?;

    std::fs::create_dir_all(OUTPUT_DIR)?;
    let mut sink = CsvSink::new(Path::new(OUTPUT_DIR))?;

    // 1. Statistics run.
    let t0 = Instant::now();
    let mut stats_driver = StatisticsDriver::new(build_sim(&config)?);
    let stats = stats_driver.run_into(&mut ProgressLog::default(), &mut sink)?;
    println!();
    println!("Statistics run ({:.2} s wall clock)", t0.elapsed().as_secs_f64());
    println!("  walked              : {:.0} m ({:.0} m/h)", stats.walked_distance_m, stats.walked_distance_per_hour);
    println!(
        "  free/walking/engaged: {:.3} / {:.3} / {:.3}",
        stats.free_fraction, stats.walking_fraction, stats.engaged_fraction
    );
    println!("  visual sequences    : {}  ({} detections)", stats.visual_sequence_count, stats.detections);
    if let Some(avg) = stats.avg_delay_fraction {
        println!("  mean detect delay   : {:.1} s", avg * stats.duration_secs);
    }

    // 2. Event-capture run, same seed.
    let t0 = Instant::now();
    let sim = build_sim(&config)?;
    let criteria = capture_config(&config, sim.env());
    let mut capture_driver = EventCaptureDriver::new(sim, criteria)?;
    let mut trace = CsvTraceWriter::create(&Path::new(OUTPUT_DIR).join("trace.csv"))?;
    let capture = capture_driver.run_into(&mut ProgressLog::default(), Some(&mut trace), &mut sink)?;
    sink.finish()?;

    let summary = File::create(Path::new(OUTPUT_DIR).join("summary.json"))?;
    serde_json::to_writer_pretty(summary, &(&stats, &capture))?;

    println!();
    println!("Event-capture run ({:.2} s wall clock)", t0.elapsed().as_secs_f64());
    println!(
        "  capture probability : {:.3}  ({} of {} samples)",
        capture.capture_probability,
        capture.captured,
        capture.samples()
    );
    println!("  cells visited       : {}", capture.visited_cells());
    if let Some(peak) = capture.spectrum.as_deref().and_then(dominant_frequency) {
        println!("  dominant period     : {:.0} s", 1.0 / peak.frequency_hz);
    }
    println!();
    println!("Records written to {OUTPUT_DIR}/");

    Ok(())
}
