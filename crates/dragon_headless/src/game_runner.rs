//! Scripted match execution for headless testing.
//!
//! Runs a [`Scenario`] to completion (or its tick limit) without any
//! controller attached, and reports how it ended.

use std::time::{Duration, Instant};

use dragon_core::actor::ActorSlot;
use dragon_core::replay::Replay;
use dragon_core::simulation::Simulation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::scenario::Scenario;

/// How a scripted run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Scenario name.
    pub scenario: String,
    /// Ticks simulated.
    pub ticks: u64,
    /// Winner's display name, `None` if the tick limit was reached first.
    pub winner: Option<String>,
    /// Winning slot.
    pub winner_slot: Option<ActorSlot>,
    /// Both dragons fell on the same tick.
    pub double_knockout: bool,
    /// Final health of both dragons.
    pub health: [u32; 2],
    /// Final state hash.
    pub final_hash: u64,
}

/// A finished run plus the replay that reproduces it, if recorded.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    /// Summary of the run.
    pub outcome: ScenarioOutcome,
    /// Final simulation state.
    pub simulation: Simulation,
    /// Recorded inputs.
    pub replay: Option<Replay>,
}

/// High-level runner for scripted scenarios.
#[derive(Debug, Clone, Default)]
pub struct GameRunner {
    /// Record a replay of every run.
    pub record: bool,
}

impl GameRunner {
    /// Create a new game runner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable replay recording.
    #[must_use]
    pub fn recording(mut self, record: bool) -> Self {
        self.record = record;
        self
    }

    /// Play the scenario's script until someone falls or the limit is hit.
    #[must_use]
    pub fn run(&self, scenario: &Scenario) -> ScenarioRun {
        let setup = scenario.setup();
        let arena = scenario.arena();
        let mut sim = Simulation::with_setup(setup.clone());
        let mut replay = self.record.then(|| Replay::new(setup));
        let mut double_knockout = false;

        info!("Running scenario: {}", scenario.name);

        for tick in 0..scenario.max_ticks {
            let intents = scenario.intents_at(tick);
            if let Some(replay) = &mut replay {
                replay.record_tick(intents, arena);
            }
            let events = sim.tick(&intents, arena);
            for hit in &events.hits {
                debug!(
                    "Tick {}: {:?} hit {:?} ({} health left)",
                    sim.get_tick(),
                    hit.attacker,
                    hit.defender,
                    hit.remaining_health
                );
            }
            if let Some(result) = events.result {
                double_knockout = result.double_knockout;
                break;
            }
        }

        if let Some(replay) = &mut replay {
            replay.finalize(&sim);
        }

        let outcome = ScenarioOutcome {
            scenario: scenario.name.clone(),
            ticks: sim.get_tick(),
            winner: sim.winner_name().map(String::from),
            winner_slot: sim.winner(),
            double_knockout,
            health: ActorSlot::ALL.map(|slot| sim.actor(slot).health()),
            final_hash: sim.state_hash(),
        };

        match &outcome.winner {
            Some(winner) => info!("{} wins after {} ticks", winner, outcome.ticks),
            None => info!("No winner after {} ticks", outcome.ticks),
        }

        ScenarioRun {
            outcome,
            simulation: sim,
            replay,
        }
    }
}

/// Run a scenario several times and check every run ends identically.
#[must_use]
pub fn verify_determinism(scenario: &Scenario, runs: u32) -> bool {
    let runner = GameRunner::new();
    let hashes: Vec<u64> = (0..runs)
        .map(|_| runner.run(scenario).outcome.final_hash)
        .collect();
    debug!("Determinism hashes: {:?}", hashes);
    hashes.windows(2).all(|w| w[0] == w[1])
}

/// Throughput measurement from [`benchmark`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkReport {
    /// Ticks simulated.
    pub ticks: u64,
    /// Wall-clock time taken.
    pub elapsed: Duration,
    /// Hash of the final state.
    pub final_hash: u64,
}

impl BenchmarkReport {
    /// Ticks per second.
    #[must_use]
    pub fn ticks_per_second(&self) -> f64 {
        self.ticks as f64 / self.elapsed.as_secs_f64().max(f64::EPSILON)
    }
}

/// Run `ticks` ticks of the scenario's script, restarting whenever the
/// match ends so every tick does real work.
#[must_use]
pub fn benchmark(scenario: &Scenario, ticks: u64) -> BenchmarkReport {
    let arena = scenario.arena();
    let script = scenario.expand();
    let mut sim = Simulation::with_setup(scenario.setup());
    let mut cursor = 0usize;

    let start = Instant::now();
    for _ in 0..ticks {
        if sim.is_over() {
            sim.restart();
            cursor = 0;
        }
        let intents = script.get(cursor).copied().unwrap_or_default();
        sim.tick(&intents, arena);
        cursor += 1;
    }

    BenchmarkReport {
        ticks,
        elapsed: start.elapsed(),
        final_hash: sim.state_hash(),
    }
}
