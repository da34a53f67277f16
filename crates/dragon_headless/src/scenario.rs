//! Scenario loading and configuration.
//!
//! Scenarios define a scripted duel for headless testing: arena bounds,
//! optional sprite sizes, a tick limit, and a timeline of intents for
//! both dragons.

use std::path::Path;

use dragon_core::arena::Arena;
use dragon_core::input::{ActorIntents, InputIntents};
use dragon_core::math::Size;
use dragon_core::simulation::MatchSetup;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// Arena or sprite dimensions are unusable.
    #[error("Invalid {what} size {width}x{height}")]
    InvalidSize {
        /// Which box was rejected.
        what: &'static str,
        /// Rejected width.
        width: i32,
        /// Rejected height.
        height: i32,
    },
}

/// One segment of a scripted timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// How many ticks to hold these intents.
    pub ticks: u32,
    /// First dragon's intents.
    #[serde(default)]
    pub first: ActorIntents,
    /// Second dragon's intents.
    #[serde(default)]
    pub second: ActorIntents,
}

impl ScriptStep {
    /// Hold the given intents for a number of ticks.
    #[must_use]
    pub const fn new(ticks: u32, first: ActorIntents, second: ActorIntents) -> Self {
        Self {
            ticks,
            first,
            second,
        }
    }
}

/// A complete scenario configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Arena dimensions (width, height) in pixels.
    #[serde(default = "default_arena_size")]
    pub arena_size: (i32, i32),
    /// Sprite size of the first dragon, placeholder if absent.
    #[serde(default)]
    pub first_size: Option<(i32, i32)>,
    /// Sprite size of the second dragon, placeholder if absent.
    #[serde(default)]
    pub second_size: Option<(i32, i32)>,
    /// Display names (first, second); "Red Dragon" and "Blue Dragon" if absent.
    #[serde(default)]
    pub names: Option<(String, String)>,
    /// Hard tick limit; the run stops here even if nobody has fallen.
    pub max_ticks: u64,
    /// Scripted intents, played in order. Idle once exhausted.
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

fn default_arena_size() -> (i32, i32) {
    let arena = Arena::default();
    (arena.width, arena.height)
}

impl Default for Scenario {
    fn default() -> Self {
        Self::duel()
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string (useful for embedded scenarios).
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Check the arena is non-empty and each sprite is positive and no
    /// larger than the arena.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let (arena_width, arena_height) = self.arena_size;
        if arena_width <= 0 || arena_height <= 0 {
            return Err(ScenarioError::InvalidSize {
                what: "arena",
                width: arena_width,
                height: arena_height,
            });
        }

        let sprites = [
            ("first dragon", self.first_size),
            ("second dragon", self.second_size),
        ];
        for (what, size) in sprites {
            let Some((width, height)) = size else {
                continue;
            };
            if width <= 0 || height <= 0 || width > arena_width || height > arena_height {
                return Err(ScenarioError::InvalidSize {
                    what,
                    width,
                    height,
                });
            }
        }
        Ok(())
    }

    /// Resolve a built-in scenario by name, or load it from a file path.
    pub fn resolve(name_or_path: &str) -> Result<Self, ScenarioError> {
        match Self::builtin(name_or_path) {
            Some(scenario) => Ok(scenario),
            None => Self::load(name_or_path),
        }
    }

    /// Look up a built-in scenario.
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "duel" => Some(Self::duel()),
            "standoff" => Some(Self::standoff()),
            "double_knockout" => Some(Self::double_knockout()),
            _ => None,
        }
    }

    /// Red closes the gap and swings until Blue falls.
    #[must_use]
    pub fn duel() -> Self {
        Self {
            name: "duel".to_string(),
            description: "Red walks up to Blue and attacks until Blue falls".to_string(),
            arena_size: default_arena_size(),
            first_size: None,
            second_size: None,
            names: None,
            max_ticks: 600,
            script: vec![
                // 800px apart; 144 steps of 5px leaves the boxes 20px apart.
                ScriptStep::new(144, ActorIntents::right(), ActorIntents::IDLE),
                ScriptStep::new(60, ActorIntents::attack(), ActorIntents::IDLE),
            ],
        }
    }

    /// Both dragons swing at the air from their corners; nobody wins.
    #[must_use]
    pub fn standoff() -> Self {
        Self {
            name: "standoff".to_string(),
            description: "Both dragons attack from their starting corners".to_string(),
            arena_size: default_arena_size(),
            first_size: None,
            second_size: None,
            names: None,
            max_ticks: 300,
            script: vec![ScriptStep::new(
                300,
                ActorIntents::attack(),
                ActorIntents::attack(),
            )],
        }
    }

    /// Both dragons meet in the middle and trade blows on the same ticks.
    #[must_use]
    pub fn double_knockout() -> Self {
        Self {
            name: "double_knockout".to_string(),
            description: "Symmetric approach and exchange ending in a double knockout"
                .to_string(),
            arena_size: default_arena_size(),
            first_size: None,
            second_size: None,
            names: None,
            max_ticks: 600,
            script: vec![
                // Each walks 340px; the boxes end up 20px apart.
                ScriptStep::new(68, ActorIntents::right(), ActorIntents::left()),
                ScriptStep::new(60, ActorIntents::attack(), ActorIntents::attack()),
            ],
        }
    }

    /// Arena bounds for this scenario.
    #[must_use]
    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_size.0, self.arena_size.1)
    }

    /// Match setup with this scenario's sprite sizes and names.
    #[must_use]
    pub fn setup(&self) -> MatchSetup {
        let defaults = MatchSetup::default();
        let size_or = |size: Option<(i32, i32)>, fallback: Size| {
            size.map_or(fallback, |(width, height)| Size::new(width, height))
        };
        let setup = MatchSetup::with_sizes(
            size_or(self.first_size, defaults.first.size),
            size_or(self.second_size, defaults.second.size),
        );
        match &self.names {
            Some((first, second)) => setup.named(first.as_str(), second.as_str()),
            None => setup,
        }
    }

    /// Total scripted ticks.
    #[must_use]
    pub fn script_len(&self) -> u64 {
        self.script.iter().map(|step| u64::from(step.ticks)).sum()
    }

    /// Intents for the given zero-based script tick.
    #[must_use]
    pub fn intents_at(&self, tick: u64) -> InputIntents {
        let mut remaining = tick;
        for step in &self.script {
            let ticks = u64::from(step.ticks);
            if remaining < ticks {
                return InputIntents::new(step.first, step.second);
            }
            remaining -= ticks;
        }
        InputIntents::IDLE
    }

    /// Expand the script into one entry per tick, capped at the tick limit.
    #[must_use]
    pub fn expand(&self) -> Vec<InputIntents> {
        let len = self.script_len().min(self.max_ticks);
        (0..len).map(|tick| self.intents_at(tick)).collect()
    }
}
