//! # VCU Timing Core — simulation harness
//!
//! Host-side soak runner for the vigilance core. Steps the full
//! per-tick pipeline with a quiescent input profile, optionally
//! simulating a driver who acknowledges the vigilance push at a fixed
//! period, and logs every state transition. Useful for exercising the
//! escalation sequence and timing constants without target hardware.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use vcu_common::consts::{FAST_TICKS_PER_SLOW, fast_ticks};
use vcu_common::io::{ChannelSample, TickInputs};
use vcu_core::config::load_config;
use vcu_core::cycle::VcuCore;

/// VCU Timing Core — vigilance escalation simulator
#[derive(Parser, Debug)]
#[command(name = "vcu_core")]
#[command(version)]
#[command(about = "Deterministic vigilance timing core simulation")]
struct Args {
    /// Path to the timing configuration TOML.
    #[arg(default_value = "config/vcu.toml")]
    config: PathBuf,

    /// Number of fast ticks to run (0 = until interrupted).
    #[arg(long, default_value_t = 0)]
    ticks: u64,

    /// Simulated driver acknowledge period [s] (0 = no acknowledges,
    /// the core escalates to the penalty brake).
    #[arg(long, default_value_t = 0.0)]
    push_period_s: f64,

    /// Status log interval in slow ticks.
    #[arg(long, default_value_t = 20)]
    status_every: u64,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("VCU Timing Core v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("VCU Timing Core shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = if args.config.exists() {
        load_config(&args.config)?
    } else {
        info!(
            "No config at {}, using built-in defaults",
            args.config.display()
        );
        vcu_common::config::VcuConfig::default()
    };
    info!(
        "Config OK: T1(25-75)={}s, T2={}s, T3={}s, T4={}s",
        config.t1_schedule_s[3], config.t2_s, config.t3_s, config.t4_s
    );

    let mut core = VcuCore::new(config);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let push_period_ticks = if args.push_period_s > 0.0 {
        fast_ticks(args.push_period_s) as u64
    } else {
        0
    };

    let mut tick: u64 = 0;
    let mut min_step = std::time::Duration::MAX;
    let mut max_step = std::time::Duration::ZERO;
    while running.load(Ordering::SeqCst) && (args.ticks == 0 || tick < args.ticks) {
        tick += 1;

        let mut inputs = TickInputs::quiescent();
        if push_period_ticks > 0 && tick % push_period_ticks == 0 {
            inputs.vigilance_push = ChannelSample::both(true);
        }

        let started = std::time::Instant::now();
        let out = core.step(&inputs);
        let elapsed = started.elapsed();
        min_step = min_step.min(elapsed);
        max_step = max_step.max(elapsed);

        let stats = core.stats();
        if stats.fast_ticks % (FAST_TICKS_PER_SLOW as u64 * args.status_every) == 0 {
            info!(
                state = ?out.state,
                band = ?out.speed_band,
                remaining = core.fsm().remaining_ticks(),
                brake = out.penalty_brake_applied,
                transitions = stats.state_transitions,
                "status at slow tick {}",
                stats.slow_ticks,
            );
        }
    }

    let stats = core.stats();
    info!(
        "Simulation done: {} fast ticks, {} slow ticks, {} transitions, final state {:?}",
        stats.fast_ticks,
        stats.slow_ticks,
        stats.state_transitions,
        core.state(),
    );
    if stats.fast_ticks > 0 {
        info!("Step duration: min={min_step:?}, max={max_step:?}");
    }
    Ok(())
}

fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
