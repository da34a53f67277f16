//! Replay system for recording and playing back matches.
//!
//! A replay stores the match setup and every input the driver fed the
//! simulation, in order. Because the simulation is deterministic, playing
//! the inputs back reproduces the match exactly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::error::{GameError, Result};
use crate::input::InputIntents;
use crate::simulation::{MatchSetup, Simulation};

/// Replay file format version for compatibility.
pub const REPLAY_VERSION: u32 = 1;

/// One recorded driver action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayInput {
    /// A tick with the intents and arena the driver supplied.
    Tick {
        /// Sampled intents.
        intents: InputIntents,
        /// Arena bounds for this tick.
        arena: Arena,
    },
    /// A restart request.
    Restart,
}

/// Complete replay data structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    /// Replay format version.
    pub version: u32,
    /// Setup the match started from.
    pub setup: MatchSetup,
    /// Driver inputs in the order they were applied.
    pub inputs: Vec<ReplayInput>,
    /// Match tick when recording stopped.
    pub final_tick: u64,
    /// State hash when recording stopped.
    pub final_hash: u64,
}

impl Replay {
    /// Start an empty replay for a match with the given setup.
    #[must_use]
    pub fn new(setup: MatchSetup) -> Self {
        Self {
            version: REPLAY_VERSION,
            setup,
            inputs: Vec::new(),
            final_tick: 0,
            final_hash: 0,
        }
    }

    /// Record one tick's input.
    pub fn record_tick(&mut self, intents: InputIntents, arena: Arena) {
        self.inputs.push(ReplayInput::Tick { intents, arena });
    }

    /// Record a restart request.
    pub fn record_restart(&mut self) {
        self.inputs.push(ReplayInput::Restart);
    }

    /// Store the end state for later verification.
    pub fn finalize(&mut self, sim: &Simulation) {
        self.final_tick = sim.get_tick();
        self.final_hash = sim.state_hash();
    }

    /// Number of recorded ticks.
    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.inputs
            .iter()
            .filter(|input| matches!(input, ReplayInput::Tick { .. }))
            .count()
    }

    /// Re-run every recorded input on a fresh simulation.
    #[must_use]
    pub fn play(&self) -> Simulation {
        let mut sim = Simulation::with_setup(self.setup.clone());
        for input in &self.inputs {
            match input {
                ReplayInput::Tick { intents, arena } => {
                    sim.tick(intents, *arena);
                }
                ReplayInput::Restart => {
                    sim.restart();
                }
            }
        }
        sim
    }

    /// Play the replay and check it reproduces the recorded end state.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ReplayDiverged`] if the final hash differs.
    pub fn verify(&self) -> Result<Simulation> {
        let sim = self.play();
        let actual_hash = sim.state_hash();
        if actual_hash != self.final_hash || sim.get_tick() != self.final_tick {
            return Err(GameError::ReplayDiverged {
                tick: sim.get_tick(),
                expected_hash: self.final_hash,
                actual_hash,
            });
        }
        tracing::debug!(tick = sim.get_tick(), hash = actual_hash, "Replay verified");
        Ok(sim)
    }

    /// Save the replay to a file.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = bincode::serialize(self).map_err(|e| GameError::encode("replay", &e))?;
        std::fs::write(path, bytes).map_err(|source| GameError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load a replay from a file.
    ///
    /// # Errors
    /// Returns an error if file reading, deserialization or the version
    /// check fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| GameError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let replay: Self =
            bincode::deserialize(&bytes).map_err(|e| GameError::decode("replay", &e))?;

        if replay.version != REPLAY_VERSION {
            return Err(GameError::ReplayVersionMismatch {
                expected: REPLAY_VERSION,
                found: replay.version,
            });
        }

        Ok(replay)
    }
}
