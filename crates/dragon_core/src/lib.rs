//! # Dragon Core
//!
//! Deterministic simulation core for Dragon Duel.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No input capture (callers pass sampled [`input::InputIntents`])
//! - No system randomness
//! - No floating-point math (fractions use fixed-point)
//!
//! This separation enables:
//! - Headless drivers and CI verification
//! - Replay recording and verification
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`actor`] - Dragon state: position, health, facing, attack cooldown
//! - [`arena`] - Playfield bounds and directional reach checks
//! - [`input`] - Held keys and their mapping to per-tick intents
//! - [`simulation`] - Fixed-tick match loop and win resolution
//! - [`snapshot`] - Read-only view handed to presentation layers
//! - [`replay`] - Input recording and playback
//! - [`math`] - Integer geometry and fixed-point helpers

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod actor;
pub mod arena;
pub mod error;
pub mod input;
pub mod math;
pub mod replay;
pub mod simulation;
pub mod snapshot;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::actor::{
        Actor, ActorSlot, ActorSpec, AttackState, Facing, ATTACK_COOLDOWN_TICKS, MAX_HEALTH,
    };
    pub use crate::arena::{in_attack_range, Arena, ATTACK_RANGE};
    pub use crate::error::{GameError, Result};
    pub use crate::input::{ActorIntents, ControlScheme, HeldKeys, InputIntents, Key, KeyBindings};
    pub use crate::math::{Fixed, Rect, Size, Vec2i};
    pub use crate::replay::{Replay, ReplayInput};
    pub use crate::simulation::{
        HitEvent, MatchResult, MatchSetup, MatchState, Simulation, TickEvents, ATTACK_DAMAGE,
        MOVE_SPEED,
    };
    pub use crate::snapshot::{ActorSnapshot, HealthBand, MatchSnapshot};
}
