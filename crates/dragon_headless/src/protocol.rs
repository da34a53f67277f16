//! JSON protocol for headless match control.
//!
//! The headless runner communicates via JSON lines (one JSON object per line):
//!
//! **Input (stdin):** Commands from the controller
//! **Output (stdout):** Match state updates and responses
//!
//! # Protocol Flow
//!
//! 1. Runner starts, outputs `{"type":"ready","version":"1.0","tick":0}`
//! 2. Controller presses and releases keys, then asks for ticks
//! 3. Held keys are sampled once per tick, exactly like the window driver
//! 4. When a dragon falls, the runner outputs a `game_over` line
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0","tick":0}
//! -> {"cmd":"key_down","key":"d"}
//! <- {"type":"ack","cmd":"key_down"}
//! -> {"cmd":"tick","count":144}
//! <- {"type":"ticked","tick":144,"hits":[]}
//! -> {"cmd":"key_up","key":"d"}
//! <- {"type":"ack","cmd":"key_up"}
//! -> {"cmd":"query"}
//! <- {"type":"state","snapshot":{...},"hash":1234}
//! ```

use dragon_core::input::{ActorIntents, Key};
use dragon_core::simulation::HitEvent;
use dragon_core::snapshot::MatchSnapshot;
use serde::{Deserialize, Serialize};

/// Protocol version reported in the ready line.
pub const PROTOCOL_VERSION: &str = "1.0";

// ============================================================================
// Input Commands (Controller -> Runner)
// ============================================================================

/// Commands that can be sent to the headless runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Press and hold a key.
    KeyDown { key: Key },

    /// Release a held key.
    KeyUp { key: Key },

    /// Release every held key.
    ReleaseAll,

    /// Advance N ticks, sampling held keys before each one.
    Tick {
        #[serde(default = "default_tick_count")]
        count: u32,
    },

    /// Advance N ticks with explicit intents, ignoring held keys.
    Step {
        #[serde(default)]
        first: ActorIntents,
        #[serde(default)]
        second: ActorIntents,
        #[serde(default = "default_tick_count")]
        count: u32,
    },

    /// Change the arena bounds used for subsequent ticks.
    Resize { width: i32, height: i32 },

    /// Restart a finished match.
    Restart,

    /// Query current match state without advancing time.
    Query,

    /// Report the current state hash.
    Hash,

    /// Quit the runner.
    Quit,
}

fn default_tick_count() -> u32 {
    1
}

// ============================================================================
// Output Responses (Runner -> Controller)
// ============================================================================

/// Responses sent from the headless runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Runner is ready to accept commands.
    Ready { version: String, tick: u64 },

    /// Acknowledgment of a command.
    Ack { cmd: String },

    /// Error processing a command.
    Error {
        message: String,
        cmd: Option<String>,
    },

    /// Result of a tick or step command.
    Ticked { tick: u64, hits: Vec<HitEvent> },

    /// Full match state.
    State { snapshot: MatchSnapshot, hash: u64 },

    /// A dragon fell and the match is over.
    GameOver {
        winner: String,
        tick: u64,
        double_knockout: bool,
    },

    /// State hash for determinism verification.
    StateHash { tick: u64, hash: u64 },

    /// Goodbye message before shutdown.
    Bye,
}

// ============================================================================
// Helpers
// ============================================================================

impl Response {
    /// Create a ready response.
    pub fn ready(tick: u64) -> Self {
        Self::Ready {
            version: PROTOCOL_VERSION.to_string(),
            tick,
        }
    }

    /// Create an acknowledgment.
    pub fn ack(cmd: &str) -> Self {
        Self::Ack {
            cmd: cmd.to_string(),
        }
    }

    /// Create an error response.
    pub fn error(message: impl Into<String>, cmd: Option<&str>) -> Self {
        Self::Error {
            message: message.into(),
            cmd: cmd.map(String::from),
        }
    }

    /// Serialize to JSON line (with newline).
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"type":"error","message":"Serialization failed: {}"}}"#,
                e
            )
        });
        json.push('\n');
        json
    }
}

impl Command {
    /// Parse from a JSON line.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get command name for acknowledgment.
    pub fn name(&self) -> &'static str {
        match self {
            Self::KeyDown { .. } => "key_down",
            Self::KeyUp { .. } => "key_up",
            Self::ReleaseAll => "release_all",
            Self::Tick { .. } => "tick",
            Self::Step { .. } => "step",
            Self::Resize { .. } => "resize",
            Self::Restart => "restart",
            Self::Query => "query",
            Self::Hash => "hash",
            Self::Quit => "quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragon_core::simulation::Simulation;

    #[test]
    fn test_parse_key_commands() {
        let down = Command::from_json(r#"{"cmd":"key_down","key":"space"}"#).unwrap();
        assert_eq!(down, Command::KeyDown { key: Key::Space });

        let up = Command::from_json(r#"{"cmd":"key_up","key":"w"}"#).unwrap();
        assert_eq!(up, Command::KeyUp { key: Key::W });
    }

    #[test]
    fn test_default_tick_count() {
        let cmd = Command::from_json(r#"{"cmd":"tick"}"#).unwrap();
        assert_eq!(cmd, Command::Tick { count: 1 });
    }

    #[test]
    fn test_parse_sparse_step() {
        let cmd = Command::from_json(r#"{"cmd":"step","first":{"attack":true},"count":3}"#)
            .unwrap();
        assert_eq!(
            cmd,
            Command::Step {
                first: ActorIntents::attack(),
                second: ActorIntents::IDLE,
                count: 3,
            }
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(Command::from_json(r#"{"cmd":"key_down","key":"f13"}"#).is_err());
    }

    #[test]
    fn test_serialize_state_response() {
        let resp = Response::State {
            snapshot: Simulation::new().snapshot(),
            hash: 12345,
        };
        let json = resp.to_json_line();
        assert!(json.ends_with('\n'));
        assert!(json.contains(r#""type":"state""#));
        assert!(json.contains(r#""name":"Red Dragon""#));
        assert!(json.contains(r#""health_band":"healthy""#));
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::Restart.name(), "restart");
        assert_eq!(Command::Tick { count: 5 }.name(), "tick");
    }
}
