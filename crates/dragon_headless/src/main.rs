//! Headless dragon duel runner.
//!
//! This binary runs the duel without graphics, controlled via JSON on stdin/stdout.
//! Designed for bots, CI testing, and replay verification.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode - read commands from stdin
//! cargo run -p dragon_headless
//!
//! # Play a scripted scenario and record it
//! cargo run -p dragon_headless -- play --scenario duel --record duel.bin
//!
//! # Verify determinism
//! cargo run -p dragon_headless -- verify --scenario duel --runs 10
//!
//! # Verify a replay
//! cargo run -p dragon_headless -- replay --file duel.bin --verify
//! ```
//!
//! # Protocol
//!
//! Input (stdin): JSON commands, one per line
//! Output (stdout): JSON responses, one per line
//! Logs (stderr): Debug information
//!
//! See the protocol module for command/response format.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dragon_core::replay::Replay;
use dragon_headless::{
    game_runner::{benchmark, verify_determinism, GameRunner},
    runner::{HeadlessConfig, HeadlessRunner},
    scenario::Scenario,
};

#[derive(Parser)]
#[command(name = "dragon_headless")]
#[command(about = "Headless dragon duel runner for scripted testing and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive match driven by JSON commands on stdin
    Run {
        /// Scenario name or file providing arena and sprite sizes
        #[arg(short, long)]
        scenario: Option<String>,

        /// Output state after every tick command
        #[arg(long)]
        auto_state: bool,

        /// Save a replay of the session here on quit
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Play a scripted scenario to completion
    Play {
        /// Scenario name or RON file
        #[arg(short, long, default_value = "duel")]
        scenario: String,

        /// Save a replay of the run
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Verify determinism by running the same scenario multiple times
    Verify {
        /// Scenario to test
        #[arg(short, long, default_value = "duel")]
        scenario: String,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },

    /// Play back a recorded replay
    Replay {
        /// Replay file to load
        #[arg(short, long)]
        file: PathBuf,

        /// Check the replay reproduces its recorded final hash
        #[arg(long)]
        verify: bool,
    },

    /// Measure simulation throughput
    Benchmark {
        /// Scenario whose script drives the benchmark
        #[arg(short, long, default_value = "double_knockout")]
        scenario: String,

        /// Number of ticks to run
        #[arg(short, long, default_value = "1000000")]
        ticks: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for protocol)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Some(Commands::Run {
            scenario,
            auto_state,
            record,
        }) => cmd_run(scenario, auto_state, record),
        Some(Commands::Play { scenario, record }) => cmd_play(&scenario, record),
        Some(Commands::Verify { scenario, runs }) => cmd_verify(&scenario, runs),
        Some(Commands::Replay { file, verify }) => cmd_replay(file, verify),
        Some(Commands::Benchmark { scenario, ticks }) => cmd_benchmark(&scenario, ticks),
        None => cmd_run(None, false, None),
    }
}

fn load_scenario(name: &str) -> Scenario {
    match Scenario::resolve(name) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Failed to load scenario '{}': {}", name, e);
            std::process::exit(1);
        }
    }
}

fn save_replay(replay: &Replay, path: &Path) {
    if let Err(e) = replay.save(path) {
        eprintln!("Failed to save replay: {}", e);
        std::process::exit(1);
    }
    tracing::info!("Replay saved to {}", path.display());
}

/// Run an interactive match
fn cmd_run(scenario: Option<String>, auto_state: bool, record: Option<PathBuf>) {
    let config = HeadlessConfig {
        auto_state_output: auto_state,
        record_replay: record.is_some(),
    };
    let mut runner = match scenario {
        Some(name) => HeadlessRunner::from_scenario(config, &load_scenario(&name)),
        None => HeadlessRunner::with_config(config),
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    if let Err(e) = runner.run(stdin.lock(), stdout.lock()) {
        eprintln!("I/O error: {}", e);
        std::process::exit(1);
    }

    if let (Some(path), Some(replay)) = (record, runner.take_replay()) {
        save_replay(&replay, &path);
    }
}

/// Play a scripted scenario and print the outcome as JSON
fn cmd_play(scenario: &str, record: Option<PathBuf>) {
    let scenario = load_scenario(scenario);
    let run = GameRunner::new()
        .recording(record.is_some())
        .run(&scenario);

    match serde_json::to_string_pretty(&run.outcome) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize outcome: {}", e);
            std::process::exit(1);
        }
    }

    if let (Some(path), Some(replay)) = (record, run.replay) {
        save_replay(&replay, &path);
    }
}

/// Verify determinism by running the same scenario multiple times
fn cmd_verify(scenario: &str, runs: u32) {
    let scenario = load_scenario(scenario);
    tracing::info!(
        "Verifying determinism: {} ({} runs)",
        scenario.name,
        runs
    );

    if verify_determinism(&scenario, runs) {
        eprintln!("PASS: All {} runs produced identical results", runs);
    } else {
        eprintln!("FAIL: Non-determinism detected!");
        std::process::exit(1);
    }
}

/// Replay a recorded match
fn cmd_replay(file: PathBuf, verify: bool) {
    if verify {
        tracing::info!("Verifying replay: {}", file.display());
    } else {
        tracing::info!("Playing replay: {}", file.display());
    }

    let replay = match Replay::load(&file) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to load replay: {}", e);
            std::process::exit(1);
        }
    };

    eprintln!("Loaded replay:");
    eprintln!("  Inputs: {}", replay.inputs.len());
    eprintln!("  Ticks: {}", replay.tick_count());
    eprintln!("  Final tick: {}", replay.final_tick);

    if verify {
        match replay.verify() {
            Ok(sim) => {
                eprintln!("PASS: Replay verification successful");
                eprintln!("  Expected hash: {:016x}", replay.final_hash);
                eprintln!("  Actual hash:   {:016x}", sim.state_hash());
            }
            Err(e) => {
                eprintln!("FAIL: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        let sim = replay.play();
        match serde_json::to_string_pretty(&sim.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize snapshot: {}", e);
                std::process::exit(1);
            }
        }
    }
}

/// Measure ticks per second
fn cmd_benchmark(scenario: &str, ticks: u64) {
    let scenario = load_scenario(scenario);
    eprintln!("Running {} ticks of '{}'...", ticks, scenario.name);

    let report = benchmark(&scenario, ticks);

    eprintln!("\n{}", "=".repeat(50));
    eprintln!("BENCHMARK RESULTS");
    eprintln!("{}", "=".repeat(50));
    eprintln!("Ticks: {}", report.ticks);
    eprintln!("Duration: {:.3}s", report.elapsed.as_secs_f64());
    eprintln!("Ticks/second: {:.1}", report.ticks_per_second());
    eprintln!("State hash: {:016x}", report.final_hash);
}
