//! Dragon actor state.
//!
//! An [`Actor`] owns everything about one combatant: where it is, how big
//! its collision box is, how much health it has left, which way it faces and
//! where it is in its attack cycle. Fields are private so the health and
//! cooldown invariants can only change through the operations below.
//!
//! # Attack state machine
//!
//! ```text
//! Idle --request_attack (cooldown == 0)--> Attacking
//! Attacking --tick (cooldown reaches 0)--> Idle
//! ```
//!
//! The cooldown and the attacking window are the same 30 ticks, so an actor
//! is hit-eligible for the entire cycle and can attack again on the tick it
//! returns to idle.

use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::math::{Rect, Size, Vec2i};

/// Health every actor starts with.
pub const MAX_HEALTH: u32 = 100;

/// Length of one attack cycle in ticks (about half a second at 60 Hz).
pub const ATTACK_COOLDOWN_TICKS: u32 = 30;

/// Which of the two match participants an actor is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActorSlot {
    /// Starts on the left, controlled with WASD + Q.
    First,
    /// Starts on the right, controlled with the arrows + Space.
    Second,
}

impl ActorSlot {
    /// Both slots in evaluation order.
    pub const ALL: [Self; 2] = [Self::First, Self::Second];

    /// The opposing slot.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// Array index for this slot.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

/// Horizontal facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing toward smaller x.
    Left,
    /// Facing toward larger x.
    Right,
}

/// Where an actor is in its attack cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AttackState {
    /// Not attacking. The cooldown may still be running.
    #[default]
    Idle,
    /// Inside the attack window; hits can land.
    Attacking,
}

/// Everything needed to (re)create an actor at match start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSpec {
    /// Display name.
    pub name: String,
    /// Initial top-left position.
    pub position: Vec2i,
    /// Collision box size.
    pub size: Size,
    /// Initial facing.
    pub facing: Facing,
}

/// One combatant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    name: String,
    position: Vec2i,
    size: Size,
    health: u32,
    facing: Facing,
    attack_state: AttackState,
    cooldown: u32,
}

impl Actor {
    /// Create an actor at full health, idle, with no cooldown.
    #[must_use]
    pub fn new(spec: &ActorSpec) -> Self {
        Self {
            name: spec.name.clone(),
            position: spec.position,
            size: spec.size,
            health: MAX_HEALTH,
            facing: spec.facing,
            attack_state: AttackState::Idle,
            cooldown: 0,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-left corner of the collision box.
    #[must_use]
    pub const fn position(&self) -> Vec2i {
        self.position
    }

    /// Collision box size.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Remaining health, always within `0..=MAX_HEALTH`.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        MAX_HEALTH
    }

    /// Current facing.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Current attack state.
    #[must_use]
    pub const fn attack_state(&self) -> AttackState {
        self.attack_state
    }

    /// Ticks left before another attack may start.
    #[must_use]
    pub const fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// True during the attack window.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.attack_state == AttackState::Attacking
    }

    /// True while health is above zero.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Collision box used for all hit tests.
    #[must_use]
    pub const fn bounding_box(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    /// Advance the attack cycle by one tick.
    pub fn tick(&mut self) {
        if self.cooldown > 0 {
            self.cooldown -= 1;
        }
        if self.attack_state == AttackState::Attacking && self.cooldown == 0 {
            self.attack_state = AttackState::Idle;
        }
    }

    /// Move by `(dx, dy)`, committing each axis only if the box stays
    /// inside the arena on that axis. A blocked axis is left untouched.
    pub fn apply_movement(&mut self, dx: i32, dy: i32, arena: Arena) {
        let new_x = self.position.x.saturating_add(dx);
        let new_y = self.position.y.saturating_add(dy);

        if arena.contains_span_x(new_x, self.size.width) {
            self.position.x = new_x;
        }
        if arena.contains_span_y(new_y, self.size.height) {
            self.position.y = new_y;
        }
    }

    /// Start an attack if the cooldown has expired.
    ///
    /// Returns `true` if the attack started. Requests during the cooldown
    /// are dropped without touching it.
    pub fn request_attack(&mut self) -> bool {
        if self.cooldown != 0 {
            return false;
        }
        self.attack_state = AttackState::Attacking;
        self.cooldown = ATTACK_COOLDOWN_TICKS;
        true
    }

    /// Subtract `amount` from health, flooring at zero.
    pub fn apply_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    pub(crate) fn face(&mut self, facing: Facing) {
        self.facing = facing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_at(x: i32, y: i32) -> ActorSpec {
        ActorSpec {
            name: "Test Dragon".to_string(),
            position: Vec2i::new(x, y),
            size: Size::new(100, 100),
            facing: Facing::Right,
        }
    }

    fn arena() -> Arena {
        Arena::new(1200, 700)
    }

    #[test]
    fn test_new_actor_is_full_health_and_idle() {
        let actor = Actor::new(&spec_at(100, 400));
        assert_eq!(actor.health(), MAX_HEALTH);
        assert_eq!(actor.attack_state(), AttackState::Idle);
        assert_eq!(actor.cooldown(), 0);
        assert!(actor.is_alive());
    }

    #[test]
    fn test_movement_inside_arena() {
        let mut actor = Actor::new(&spec_at(100, 400));
        actor.apply_movement(5, -5, arena());
        assert_eq!(actor.position(), Vec2i::new(105, 395));
    }

    #[test]
    fn test_movement_blocked_at_left_wall() {
        let mut actor = Actor::new(&spec_at(2, 400));
        actor.apply_movement(-5, 0, arena());
        assert_eq!(actor.position(), Vec2i::new(2, 400));
    }

    #[test]
    fn test_movement_flush_with_right_wall_is_allowed() {
        let mut actor = Actor::new(&spec_at(1095, 400));
        actor.apply_movement(5, 0, arena());
        assert_eq!(actor.position().x, 1100);
        actor.apply_movement(5, 0, arena());
        assert_eq!(actor.position().x, 1100);
    }

    #[test]
    fn test_diagonal_into_wall_slides_along_open_axis() {
        let mut actor = Actor::new(&spec_at(0, 300));
        actor.apply_movement(-5, 5, arena());
        assert_eq!(actor.position(), Vec2i::new(0, 305));
    }

    #[test]
    fn test_degenerate_sizes_never_escape_or_overflow() {
        let mut narrow = Actor::new(&ActorSpec {
            size: Size::new(-100, 100),
            ..spec_at(900, 400)
        });
        for _ in 0..300 {
            narrow.apply_movement(5, 0, arena());
        }
        assert_eq!(narrow.position().x, 900);

        let mut huge = Actor::new(&ActorSpec {
            size: Size::new(2_147_483_600, 100),
            ..spec_at(100, 400)
        });
        huge.apply_movement(5, 0, arena());
        assert_eq!(huge.position().x, 100);
    }

    #[test]
    fn test_request_attack_starts_cycle() {
        let mut actor = Actor::new(&spec_at(100, 400));
        assert!(actor.request_attack());
        assert!(actor.is_attacking());
        assert_eq!(actor.cooldown(), ATTACK_COOLDOWN_TICKS);
    }

    #[test]
    fn test_request_attack_during_cooldown_is_ignored() {
        let mut actor = Actor::new(&spec_at(100, 400));
        actor.request_attack();
        actor.tick();
        actor.tick();
        assert!(!actor.request_attack());
        assert_eq!(actor.cooldown(), ATTACK_COOLDOWN_TICKS - 2);
    }

    #[test]
    fn test_attack_window_ends_when_cooldown_expires() {
        let mut actor = Actor::new(&spec_at(100, 400));
        actor.request_attack();
        for _ in 0..ATTACK_COOLDOWN_TICKS - 1 {
            actor.tick();
            assert!(actor.is_attacking());
        }
        actor.tick();
        assert_eq!(actor.attack_state(), AttackState::Idle);
        assert_eq!(actor.cooldown(), 0);
        assert!(actor.request_attack());
    }

    #[test]
    fn test_tick_on_idle_actor_is_noop() {
        let mut actor = Actor::new(&spec_at(100, 400));
        let before = actor.clone();
        actor.tick();
        assert_eq!(actor, before);
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut actor = Actor::new(&spec_at(100, 400));
        actor.apply_damage(95);
        assert_eq!(actor.health(), 5);
        actor.apply_damage(10);
        assert_eq!(actor.health(), 0);
        assert!(!actor.is_alive());
        actor.apply_damage(10);
        assert_eq!(actor.health(), 0);
    }

    #[test]
    fn test_bounding_box_matches_position_and_size() {
        let actor = Actor::new(&spec_at(40, 60));
        assert_eq!(actor.bounding_box(), Rect::new(40, 60, 100, 100));
    }

    #[test]
    fn test_slot_opponent() {
        assert_eq!(ActorSlot::First.opponent(), ActorSlot::Second);
        assert_eq!(ActorSlot::Second.opponent(), ActorSlot::First);
        assert_eq!(ActorSlot::Second.index(), 1);
    }
}
