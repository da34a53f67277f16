//! Headless runner implementation.
//!
//! Plays the role of the window driver: holds the keyboard state, samples
//! it once per tick, and feeds the simulation. Commands arrive as JSON
//! lines and every command produces one or more JSON responses.

use std::io::{self, BufRead, Write};

use dragon_core::arena::Arena;
use dragon_core::input::{ControlScheme, HeldKeys, InputIntents, Key};
use dragon_core::replay::Replay;
use dragon_core::simulation::{MatchSetup, Simulation, TickEvents};
use tracing::{debug, info, warn};

use crate::protocol::{Command, Response};
use crate::scenario::Scenario;

/// Headless runner configuration.
#[derive(Debug, Clone, Default)]
pub struct HeadlessConfig {
    /// Output state after every tick command (vs only on query).
    pub auto_state_output: bool,
    /// Record every input into a replay.
    pub record_replay: bool,
}

/// Headless runner for externally controlled matches.
#[derive(Debug)]
pub struct HeadlessRunner {
    config: HeadlessConfig,
    sim: Simulation,
    held: HeldKeys,
    controls: ControlScheme,
    arena: Arena,
    replay: Option<Replay>,
}

impl Default for HeadlessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessRunner {
    /// Create a new headless runner with default config.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HeadlessConfig::default())
    }

    /// Create a runner with custom configuration.
    #[must_use]
    pub fn with_config(config: HeadlessConfig) -> Self {
        Self::build(config, MatchSetup::default(), Arena::default())
    }

    /// Create a runner using a scenario's arena and sprite sizes.
    ///
    /// The scenario's script is not played; the controller drives the match.
    #[must_use]
    pub fn from_scenario(config: HeadlessConfig, scenario: &Scenario) -> Self {
        Self::build(config, scenario.setup(), scenario.arena())
    }

    fn build(config: HeadlessConfig, setup: MatchSetup, arena: Arena) -> Self {
        let replay = config.record_replay.then(|| Replay::new(setup.clone()));
        Self {
            config,
            sim: Simulation::with_setup(setup),
            held: HeldKeys::new(),
            controls: ControlScheme::default(),
            arena,
            replay,
        }
    }

    /// Current simulation.
    #[must_use]
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Current arena bounds.
    #[must_use]
    pub const fn arena(&self) -> Arena {
        self.arena
    }

    /// Keys currently held.
    #[must_use]
    pub fn held_keys(&self) -> &HeldKeys {
        &self.held
    }

    /// Stop recording and return the finished replay, if recording.
    pub fn take_replay(&mut self) -> Option<Replay> {
        let mut replay = self.replay.take()?;
        replay.finalize(&self.sim);
        Some(replay)
    }

    /// Process one command and return its responses.
    pub fn handle(&mut self, cmd: Command) -> Vec<Response> {
        let name = cmd.name();
        match cmd {
            Command::KeyDown { key } => self.key_down(key),
            Command::KeyUp { key } => {
                self.held.release(key);
                vec![Response::ack(name)]
            }
            Command::ReleaseAll => {
                self.held.clear();
                vec![Response::ack(name)]
            }
            Command::Tick { count } => self.advance(count, None),
            Command::Step {
                first,
                second,
                count,
            } => self.advance(count, Some(InputIntents::new(first, second))),
            Command::Resize { width, height } => {
                if width <= 0 || height <= 0 {
                    warn!("Rejected arena resize to {}x{}", width, height);
                    return vec![Response::error(
                        format!("arena must be positive, got {width}x{height}"),
                        Some(name),
                    )];
                }
                self.arena = Arena::new(width, height);
                debug!("Arena resized to {}x{}", width, height);
                vec![Response::ack(name)]
            }
            Command::Restart => {
                if self.try_restart() {
                    vec![self.state_response()]
                } else {
                    vec![Response::error("match is still running", Some(name))]
                }
            }
            Command::Query => vec![self.state_response()],
            Command::Hash => vec![Response::StateHash {
                tick: self.sim.get_tick(),
                hash: self.sim.state_hash(),
            }],
            Command::Quit => vec![Response::Bye],
        }
    }

    /// Run the command loop until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        info!("Headless runner started");
        output.write_all(Response::ready(self.sim.get_tick()).to_json_line().as_bytes())?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let responses = match Command::from_json(line) {
                Ok(cmd) => {
                    debug!("Received command: {}", cmd.name());
                    self.handle(cmd)
                }
                Err(e) => {
                    warn!("Failed to parse command: {}", e);
                    vec![Response::error(format!("Invalid command: {e}"), None)]
                }
            };

            let quit = responses.iter().any(|r| matches!(r, Response::Bye));
            for response in &responses {
                output.write_all(response.to_json_line().as_bytes())?;
            }
            output.flush()?;

            if quit {
                info!("Quit command received");
                break;
            }
        }

        Ok(())
    }

    fn key_down(&mut self, key: Key) -> Vec<Response> {
        let newly_pressed = self.held.press(key);
        let mut responses = vec![Response::ack("key_down")];
        if newly_pressed && self.controls.is_restart(key) && self.try_restart() {
            responses.push(self.state_response());
        }
        responses
    }

    fn try_restart(&mut self) -> bool {
        if !self.sim.restart() {
            return false;
        }
        if let Some(replay) = &mut self.replay {
            replay.record_restart();
        }
        info!("Match restarted");
        true
    }

    fn advance(&mut self, count: u32, explicit: Option<InputIntents>) -> Vec<Response> {
        let mut hits = Vec::new();
        let mut responses = Vec::new();

        for _ in 0..count {
            if self.sim.is_over() {
                break;
            }
            let intents = explicit.unwrap_or_else(|| self.controls.sample(&self.held));
            let events = self.step(intents);
            hits.extend(events.hits);
            if let Some(result) = events.result {
                let winner = self.sim.actor(result.winner).name().to_string();
                responses.push(Response::GameOver {
                    winner,
                    tick: result.tick,
                    double_knockout: result.double_knockout,
                });
            }
        }

        responses.insert(
            0,
            Response::Ticked {
                tick: self.sim.get_tick(),
                hits,
            },
        );
        if self.config.auto_state_output {
            responses.push(self.state_response());
        }
        responses
    }

    fn step(&mut self, intents: InputIntents) -> TickEvents {
        if let Some(replay) = &mut self.replay {
            replay.record_tick(intents, self.arena);
        }
        self.sim.tick(&intents, self.arena)
    }

    fn state_response(&self) -> Response {
        Response::State {
            snapshot: self.sim.snapshot(),
            hash: self.sim.state_hash(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragon_core::actor::ActorSlot;

    #[test]
    fn test_held_key_moves_every_tick() {
        let mut runner = HeadlessRunner::new();
        runner.handle(Command::KeyDown { key: Key::D });
        runner.handle(Command::Tick { count: 10 });
        let first = runner.simulation().actor(ActorSlot::First);
        assert_eq!(first.position().x, 150);

        runner.handle(Command::KeyUp { key: Key::D });
        runner.handle(Command::Tick { count: 10 });
        assert_eq!(runner.simulation().actor(ActorSlot::First).position().x, 150);
    }

    #[test]
    fn test_restart_rejected_while_running() {
        let mut runner = HeadlessRunner::new();
        let responses = runner.handle(Command::Restart);
        assert!(matches!(responses[0], Response::Error { .. }));
    }

    #[test]
    fn test_resize_rejects_non_positive() {
        let mut runner = HeadlessRunner::new();
        let responses = runner.handle(Command::Resize {
            width: 0,
            height: 700,
        });
        assert!(matches!(responses[0], Response::Error { .. }));
        assert_eq!(runner.arena(), Arena::default());
    }

    #[test]
    fn test_ticked_reports_tick() {
        let mut runner = HeadlessRunner::new();
        let responses = runner.handle(Command::Tick { count: 3 });
        assert_eq!(
            responses,
            vec![Response::Ticked {
                tick: 3,
                hits: Vec::new()
            }]
        );
    }
}
