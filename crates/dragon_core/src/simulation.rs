//! Core match loop.
//!
//! The simulation runs at a fixed tick rate and advances both dragons
//! deterministically. The driver samples input once per tick and passes
//! the arena bounds in, so the simulation itself never touches a window,
//! a clock or a keyboard.
//!
//! # Determinism
//!
//! - Integer positions, no floating-point math
//! - No randomness
//! - Fixed evaluation order (first actor, then second)
//! - Same inputs always produce same outputs
//!
//! # Example
//!
//! ```
//! use dragon_core::arena::Arena;
//! use dragon_core::input::{ActorIntents, InputIntents};
//! use dragon_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new();
//! let intents = InputIntents::new(ActorIntents::right(), ActorIntents::IDLE);
//!
//! sim.tick(&intents, Arena::default());
//! assert_eq!(sim.get_tick(), 1);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorSlot, ActorSpec, Facing};
use crate::arena::{in_attack_range, Arena, ATTACK_RANGE};
use crate::error::{GameError, Result};
use crate::input::{ActorIntents, InputIntents};
use crate::math::{Size, Vec2i};
use crate::snapshot::MatchSnapshot;

/// Ticks per second the driver is expected to run at.
pub const TICK_RATE: u32 = 60;

/// Duration of one tick in milliseconds.
pub const TICK_DURATION_MS: u32 = 1000 / TICK_RATE;

/// Pixels moved per tick per held direction.
pub const MOVE_SPEED: i32 = 5;

/// Health removed per tick by a connecting attack.
pub const ATTACK_DAMAGE: u32 = 10;

/// Collision box used when no sprite size is available.
pub const PLACEHOLDER_SIZE: Size = Size::new(100, 100);

/// Starting top-left corner of the first actor.
pub const FIRST_START: Vec2i = Vec2i::new(100, 400);

/// Starting top-left corner of the second actor.
pub const SECOND_START: Vec2i = Vec2i::new(900, 400);

/// Overall match status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchState {
    /// Ticks advance the match.
    #[default]
    Running,
    /// A winner is recorded; ticks are ignored until restart.
    Over,
}

/// Names and sprite-derived sizes for the two actors.
///
/// Starting positions and facings are fixed; only presentation details
/// vary between setups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    /// Spec for [`ActorSlot::First`].
    pub first: ActorSpec,
    /// Spec for [`ActorSlot::Second`].
    pub second: ActorSpec,
}

impl Default for MatchSetup {
    fn default() -> Self {
        Self::with_sizes(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE)
    }
}

impl MatchSetup {
    /// Standard setup with the given collision box sizes.
    #[must_use]
    pub fn with_sizes(first: Size, second: Size) -> Self {
        Self {
            first: ActorSpec {
                name: "Red Dragon".to_string(),
                position: FIRST_START,
                size: first,
                facing: Facing::Right,
            },
            second: ActorSpec {
                name: "Blue Dragon".to_string(),
                position: SECOND_START,
                size: second,
                facing: Facing::Left,
            },
        }
    }

    /// Replace the display names.
    #[must_use]
    pub fn named(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.first.name = first.into();
        self.second.name = second.into();
        self
    }

    fn spawn(&self) -> [Actor; 2] {
        [Actor::new(&self.first), Actor::new(&self.second)]
    }
}

/// An attack that connected this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitEvent {
    /// Who attacked.
    pub attacker: ActorSlot,
    /// Who was hit.
    pub defender: ActorSlot,
    /// Damage applied.
    pub damage: u32,
    /// Defender health after the hit.
    pub remaining_health: u32,
}

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Recorded winner.
    pub winner: ActorSlot,
    /// Tick on which the match ended.
    pub tick: u64,
    /// Both actors fell on the same tick.
    pub double_knockout: bool,
}

/// Events generated during a simulation tick.
///
/// Presentation layers use these to trigger effects and sounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// Actors whose attack started this tick.
    pub attacks_started: Vec<ActorSlot>,
    /// Hits that landed this tick, in resolution order.
    pub hits: Vec<HitEvent>,
    /// Set on the tick the match ends.
    pub result: Option<MatchResult>,
}

impl TickEvents {
    /// True if nothing happened.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attacks_started.is_empty() && self.hits.is_empty() && self.result.is_none()
    }
}

/// The duel simulation.
///
/// Owns both actors exclusively. Callers observe them through shared
/// references and change them only by ticking or restarting.
///
/// # Tick Order
///
/// 1. **Cooldowns** - every actor's attack cycle advances
/// 2. **Movement** - held directions move each actor inside the arena
/// 3. **Facing** - actors are turned toward each other
/// 4. **Attacks** - attack intents start new cycles
/// 5. **Hits** - first-on-second, then second-on-first
/// 6. **Victory** - a defeated actor ends the match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Simulation {
    /// Running ticks since match start.
    tick: u64,
    setup: MatchSetup,
    actors: [Actor; 2],
    state: MatchState,
    winner: Option<ActorSlot>,
}

impl Simulation {
    /// Create a match with the standard setup.
    ///
    /// # Example
    ///
    /// ```
    /// use dragon_core::simulation::{MatchState, Simulation};
    ///
    /// let sim = Simulation::new();
    /// assert_eq!(sim.get_tick(), 0);
    /// assert_eq!(sim.state(), MatchState::Running);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_setup(MatchSetup::default())
    }

    /// Create a match from an explicit setup.
    #[must_use]
    pub fn with_setup(setup: MatchSetup) -> Self {
        let actors = setup.spawn();
        Self {
            tick: 0,
            setup,
            actors,
            state: MatchState::Running,
            winner: None,
        }
    }

    /// Number of running ticks since match start.
    #[must_use]
    pub const fn get_tick(&self) -> u64 {
        self.tick
    }

    /// Setup used to spawn the actors.
    #[must_use]
    pub fn setup(&self) -> &MatchSetup {
        &self.setup
    }

    /// One actor.
    #[must_use]
    pub fn actor(&self, slot: ActorSlot) -> &Actor {
        &self.actors[slot.index()]
    }

    /// Both actors in slot order.
    #[must_use]
    pub fn actors(&self) -> &[Actor; 2] {
        &self.actors
    }

    /// Current match state.
    #[must_use]
    pub const fn state(&self) -> MatchState {
        self.state
    }

    /// True once a winner is recorded.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state == MatchState::Over
    }

    /// Recorded winner, if any.
    #[must_use]
    pub const fn winner(&self) -> Option<ActorSlot> {
        self.winner
    }

    /// Display name of the recorded winner, if any.
    #[must_use]
    pub fn winner_name(&self) -> Option<&str> {
        self.winner.map(|slot| self.actor(slot).name())
    }

    /// Read-only view for presentation.
    #[must_use]
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::capture(self)
    }

    /// Advance the match by one tick.
    ///
    /// Does nothing once the match is over; the tick counter stops too.
    pub fn tick(&mut self, intents: &InputIntents, arena: Arena) -> TickEvents {
        let mut events = TickEvents::default();

        if self.state == MatchState::Over {
            return events;
        }

        // 1. Attack cycles
        for actor in &mut self.actors {
            actor.tick();
        }

        // 2. Movement with manual facing
        for slot in ActorSlot::ALL {
            apply_movement_intents(
                &mut self.actors[slot.index()],
                intents.for_slot(slot),
                arena,
            );
        }

        // 3. Relative facing always wins over manual facing
        self.face_each_other();

        // 4. Attack requests
        for slot in ActorSlot::ALL {
            if intents.for_slot(slot).attack && self.actors[slot.index()].request_attack() {
                events.attacks_started.push(slot);
            }
        }

        // 5. Hits, both directions against this tick's positions
        for slot in ActorSlot::ALL {
            if let Some(hit) = self.resolve_attack(slot) {
                events.hits.push(hit);
            }
        }

        self.tick += 1;

        // 6. Victory
        events.result = self.evaluate_winner();

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(tick = self.tick, state_hash = hash, "Simulation state hash");
        }

        events
    }

    /// Start a fresh match from the same setup.
    ///
    /// Only honoured while the match is over; returns whether it happened.
    pub fn restart(&mut self) -> bool {
        if self.state != MatchState::Over {
            tracing::debug!(tick = self.tick, "Restart ignored while match is running");
            return false;
        }

        self.actors = self.setup.spawn();
        self.state = MatchState::Running;
        self.winner = None;
        self.tick = 0;
        tracing::info!("Match restarted");
        true
    }

    fn face_each_other(&mut self) {
        let [first, second] = &mut self.actors;
        if first.position().x < second.position().x {
            first.face(Facing::Right);
            second.face(Facing::Left);
        } else {
            first.face(Facing::Left);
            second.face(Facing::Right);
        }
    }

    fn resolve_attack(&mut self, attacker_slot: ActorSlot) -> Option<HitEvent> {
        let defender_slot = attacker_slot.opponent();
        let attacker = &self.actors[attacker_slot.index()];
        let defender = &self.actors[defender_slot.index()];

        if !attacker.is_attacking() || !in_attack_range(attacker, defender, ATTACK_RANGE) {
            return None;
        }

        let defender = &mut self.actors[defender_slot.index()];
        defender.apply_damage(ATTACK_DAMAGE);

        tracing::debug!(
            tick = self.tick,
            attacker = ?attacker_slot,
            defender = ?defender_slot,
            remaining = defender.health(),
            "Attack connected"
        );

        Some(HitEvent {
            attacker: attacker_slot,
            defender: defender_slot,
            damage: ATTACK_DAMAGE,
            remaining_health: defender.health(),
        })
    }

    /// Record a winner once either actor is defeated.
    ///
    /// The first actor is checked first, so a double knockout goes to the
    /// second actor.
    fn evaluate_winner(&mut self) -> Option<MatchResult> {
        if self.winner.is_some() {
            return None;
        }

        let first_down = !self.actors[0].is_alive();
        let second_down = !self.actors[1].is_alive();

        let winner = if first_down {
            ActorSlot::Second
        } else if second_down {
            ActorSlot::First
        } else {
            return None;
        };

        self.winner = Some(winner);
        self.state = MatchState::Over;

        tracing::info!(
            tick = self.tick,
            winner = self.actor(winner).name(),
            double_knockout = first_down && second_down,
            "Match over"
        );

        Some(MatchResult {
            winner,
            tick: self.tick,
            double_knockout: first_down && second_down,
        })
    }

    /// Compute a hash of the full match state.
    ///
    /// Two simulations fed the same setup and inputs always produce the
    /// same hash.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tick.hash(&mut hasher);
        self.state.hash(&mut hasher);
        self.winner.hash(&mut hasher);
        for actor in &self.actors {
            actor.hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Serialize the full match state to bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| GameError::encode("simulation", &e))
    }

    /// Restore match state from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data).map_err(|e| GameError::decode("simulation", &e))
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply held directions in the fixed order up, down, left, right.
/// Horizontal moves also set facing.
fn apply_movement_intents(actor: &mut Actor, intents: ActorIntents, arena: Arena) {
    if intents.move_up {
        actor.apply_movement(0, -MOVE_SPEED, arena);
    }
    if intents.move_down {
        actor.apply_movement(0, MOVE_SPEED, arena);
    }
    if intents.move_left {
        actor.apply_movement(-MOVE_SPEED, 0, arena);
        actor.face(Facing::Left);
    }
    if intents.move_right {
        actor.apply_movement(MOVE_SPEED, 0, arena);
        actor.face(Facing::Right);
    }
}
