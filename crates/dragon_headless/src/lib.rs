//! Headless duel runner for scripted testing and CI verification.
//!
//! This crate drives the duel without a window, controlled via JSON
//! commands on stdin, with match state output on stdout. This enables:
//!
//! - **Bot testing**: An agent can play either dragon without graphics
//! - **CI verification**: Automated testing of match logic and determinism
//! - **Replay verification**: Check that replays produce identical results
//!
//! # Protocol
//!
//! Communication uses JSON lines (one JSON object per line):
//!
//! - **stdin**: Commands from controller (key_down, tick, query, etc.)
//! - **stdout**: State updates and responses (JSON)
//! - **stderr**: Debug logs (human-readable)
//!
//! See [`protocol`] module for the full command/response specification.
//!
//! # Example
//!
//! ```bash
//! # Run interactively
//! echo '{"cmd":"tick","count":60}' | cargo run -p dragon_headless -- run
//!
//! # Play a scripted scenario
//! cargo run -p dragon_headless -- play --scenario crates/dragon_headless/scenarios/duel.ron
//!
//! # Verify a recorded replay
//! cargo run -p dragon_headless -- replay --file duel.bin --verify
//! ```

pub mod game_runner;
pub mod protocol;
pub mod runner;
pub mod scenario;

pub use game_runner::{GameRunner, ScenarioOutcome, ScenarioRun};
pub use protocol::{Command, Response};
pub use runner::{HeadlessConfig, HeadlessRunner};
pub use scenario::{Scenario, ScenarioError, ScriptStep};
