//! Held-key state and its mapping to per-tick intents.
//!
//! The window layer reports key presses and releases as they happen; the
//! driver keeps them in a [`HeldKeys`] set and samples it once at the start
//! of every tick with [`ControlScheme::sample`]. Holding a key therefore
//! produces the same intent on every tick until it is released.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::actor::ActorSlot;

/// Keys the duel reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// W.
    W,
    /// A.
    A,
    /// S.
    S,
    /// D.
    D,
    /// Q.
    Q,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Space bar.
    Space,
    /// R.
    R,
}

/// Boolean intents for one actor during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorIntents {
    /// Move toward smaller y.
    pub move_up: bool,
    /// Move toward larger y.
    pub move_down: bool,
    /// Move toward smaller x and face left.
    pub move_left: bool,
    /// Move toward larger x and face right.
    pub move_right: bool,
    /// Try to start an attack.
    pub attack: bool,
}

impl ActorIntents {
    /// No intents at all.
    pub const IDLE: Self = Self {
        move_up: false,
        move_down: false,
        move_left: false,
        move_right: false,
        attack: false,
    };

    /// Only the attack intent.
    #[must_use]
    pub const fn attack() -> Self {
        Self {
            attack: true,
            ..Self::IDLE
        }
    }

    /// Only a rightward move.
    #[must_use]
    pub const fn right() -> Self {
        Self {
            move_right: true,
            ..Self::IDLE
        }
    }

    /// Only a leftward move.
    #[must_use]
    pub const fn left() -> Self {
        Self {
            move_left: true,
            ..Self::IDLE
        }
    }

    /// True if no intent is set.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }
}

/// Intents for both actors during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputIntents {
    /// Intents for [`ActorSlot::First`].
    pub first: ActorIntents,
    /// Intents for [`ActorSlot::Second`].
    pub second: ActorIntents,
}

impl InputIntents {
    /// Neither actor does anything.
    pub const IDLE: Self = Self {
        first: ActorIntents::IDLE,
        second: ActorIntents::IDLE,
    };

    /// Build from per-actor intents.
    #[must_use]
    pub const fn new(first: ActorIntents, second: ActorIntents) -> Self {
        Self { first, second }
    }

    /// Intents for one slot.
    #[must_use]
    pub const fn for_slot(&self, slot: ActorSlot) -> ActorIntents {
        match slot {
            ActorSlot::First => self.first,
            ActorSlot::Second => self.second,
        }
    }
}

/// Keys assigned to one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Move up.
    pub up: Key,
    /// Move down.
    pub down: Key,
    /// Move left.
    pub left: Key,
    /// Move right.
    pub right: Key,
    /// Attack.
    pub attack: Key,
}

impl KeyBindings {
    /// WASD to move, Q to attack.
    #[must_use]
    pub const fn first_player() -> Self {
        Self {
            up: Key::W,
            down: Key::S,
            left: Key::A,
            right: Key::D,
            attack: Key::Q,
        }
    }

    /// Arrow keys to move, Space to attack.
    #[must_use]
    pub const fn second_player() -> Self {
        Self {
            up: Key::Up,
            down: Key::Down,
            left: Key::Left,
            right: Key::Right,
            attack: Key::Space,
        }
    }

    /// Sample this actor's intents from the held keys.
    #[must_use]
    pub fn sample(&self, held: &HeldKeys) -> ActorIntents {
        ActorIntents {
            move_up: held.is_held(self.up),
            move_down: held.is_held(self.down),
            move_left: held.is_held(self.left),
            move_right: held.is_held(self.right),
            attack: held.is_held(self.attack),
        }
    }
}

/// Full key layout for a two-player match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlScheme {
    /// Bindings for the first actor.
    pub first: KeyBindings,
    /// Bindings for the second actor.
    pub second: KeyBindings,
    /// Restarts a finished match.
    pub restart: Key,
}

impl Default for ControlScheme {
    fn default() -> Self {
        Self {
            first: KeyBindings::first_player(),
            second: KeyBindings::second_player(),
            restart: Key::R,
        }
    }
}

impl ControlScheme {
    /// Sample both actors' intents from the held keys.
    #[must_use]
    pub fn sample(&self, held: &HeldKeys) -> InputIntents {
        InputIntents {
            first: self.first.sample(held),
            second: self.second.sample(held),
        }
    }

    /// True if pressing `key` should request a restart.
    ///
    /// Restart is edge-triggered on press, unlike movement.
    #[must_use]
    pub fn is_restart(&self, key: Key) -> bool {
        key == self.restart
    }
}

/// Keys currently held down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    keys: BTreeSet<Key>,
}

impl HeldKeys {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns `true` if the key was not already held.
    pub fn press(&mut self, key: Key) -> bool {
        self.keys.insert(key)
    }

    /// Record a key release.
    pub fn release(&mut self, key: Key) {
        self.keys.remove(&key);
    }

    /// True if the key is held.
    #[must_use]
    pub fn is_held(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}
