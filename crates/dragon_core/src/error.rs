//! Error types for the duel simulation.
//!
//! The tick loop itself never fails. These errors only surface at the
//! edges: snapshot serialization and replay files.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for simulation persistence and replay.
#[derive(Debug, Error)]
pub enum GameError {
    /// Binary encoding or decoding failed.
    #[error("Failed to {action} {what}: {message}")]
    Serialization {
        /// "serialize" or "deserialize".
        action: &'static str,
        /// What was being encoded, e.g. "simulation" or "replay".
        what: &'static str,
        /// Underlying error message.
        message: String,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// Path of the file involved.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Replay was written by an incompatible format version.
    #[error("Replay version mismatch: expected {expected}, got {found}")]
    ReplayVersionMismatch {
        /// Version this build understands.
        expected: u32,
        /// Version found in the file.
        found: u32,
    },

    /// Replaying the recorded inputs did not reproduce the recorded result.
    #[error("Replay diverged at tick {tick}: expected hash {expected_hash}, got {actual_hash}")]
    ReplayDiverged {
        /// Final tick reached by the playback.
        tick: u64,
        /// Hash stored in the replay.
        expected_hash: u64,
        /// Hash produced by playback.
        actual_hash: u64,
    },
}

impl GameError {
    pub(crate) fn encode(what: &'static str, err: &bincode::Error) -> Self {
        Self::Serialization {
            action: "serialize",
            what,
            message: err.to_string(),
        }
    }

    pub(crate) fn decode(what: &'static str, err: &bincode::Error) -> Self {
        Self::Serialization {
            action: "deserialize",
            what,
            message: err.to_string(),
        }
    }
}
