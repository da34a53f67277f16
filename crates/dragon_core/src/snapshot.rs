//! Read-only match view for presentation layers.

use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorSlot, Facing};
use crate::math::{Fixed, Size, Vec2i};
use crate::simulation::{MatchState, Simulation};

/// Health bar color band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthBand {
    /// More than 60% health left.
    Healthy,
    /// More than 30% health left.
    Warning,
    /// 30% or less.
    Critical,
}

impl HealthBand {
    /// Classify a health value against its maximum.
    #[must_use]
    pub fn classify(health: u32, max_health: u32) -> Self {
        let fraction = health_fraction(health, max_health);
        if fraction > Fixed::from_num(3) / Fixed::from_num(5) {
            Self::Healthy
        } else if fraction > Fixed::from_num(3) / Fixed::from_num(10) {
            Self::Warning
        } else {
            Self::Critical
        }
    }
}

/// Health as a fraction of the maximum, in `0..=1`.
#[must_use]
pub fn health_fraction(health: u32, max_health: u32) -> Fixed {
    if max_health == 0 {
        return Fixed::ZERO;
    }
    Fixed::from_num(health) / Fixed::from_num(max_health)
}

/// Everything a renderer needs about one actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    /// Which participant this is.
    pub slot: ActorSlot,
    /// Display name.
    pub name: String,
    /// Top-left corner.
    pub position: Vec2i,
    /// Collision box size.
    pub size: Size,
    /// Current facing.
    pub facing: Facing,
    /// Remaining health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Inside the attack window.
    pub attacking: bool,
    /// Health bar color band.
    pub health_band: HealthBand,
}

impl ActorSnapshot {
    fn capture(slot: ActorSlot, actor: &Actor) -> Self {
        Self {
            slot,
            name: actor.name().to_string(),
            position: actor.position(),
            size: actor.size(),
            facing: actor.facing(),
            health: actor.health(),
            max_health: actor.max_health(),
            attacking: actor.is_attacking(),
            health_band: HealthBand::classify(actor.health(), actor.max_health()),
        }
    }
}

/// Everything a renderer needs about the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Running ticks since match start.
    pub tick: u64,
    /// Match status.
    pub state: MatchState,
    /// Winner's display name once the match is over.
    pub winner: Option<String>,
    /// Both actors in slot order.
    pub actors: [ActorSnapshot; 2],
}

impl MatchSnapshot {
    /// Capture the current state of a simulation.
    #[must_use]
    pub fn capture(sim: &Simulation) -> Self {
        Self {
            tick: sim.get_tick(),
            state: sim.state(),
            winner: sim.winner_name().map(str::to_string),
            actors: ActorSlot::ALL.map(|slot| ActorSnapshot::capture(slot, sim.actor(slot))),
        }
    }

    /// Snapshot of one actor.
    #[must_use]
    pub fn actor(&self, slot: ActorSlot) -> &ActorSnapshot {
        &self.actors[slot.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::input::{ActorIntents, InputIntents};

    #[test]
    fn test_health_band_thresholds() {
        assert_eq!(HealthBand::classify(100, 100), HealthBand::Healthy);
        assert_eq!(HealthBand::classify(61, 100), HealthBand::Healthy);
        assert_eq!(HealthBand::classify(60, 100), HealthBand::Warning);
        assert_eq!(HealthBand::classify(31, 100), HealthBand::Warning);
        assert_eq!(HealthBand::classify(30, 100), HealthBand::Critical);
        assert_eq!(HealthBand::classify(0, 100), HealthBand::Critical);
    }

    #[test]
    fn test_health_fraction() {
        assert_eq!(health_fraction(50, 100), Fixed::from_num(1) / Fixed::from_num(2));
        assert_eq!(health_fraction(0, 0), Fixed::ZERO);
    }

    #[test]
    fn test_snapshot_of_fresh_match() {
        let snapshot = Simulation::new().snapshot();
        assert_eq!(snapshot.tick, 0);
        assert_eq!(snapshot.state, MatchState::Running);
        assert_eq!(snapshot.winner, None);

        let first = snapshot.actor(ActorSlot::First);
        assert_eq!(first.name, "Red Dragon");
        assert_eq!(first.health, 100);
        assert_eq!(first.max_health, 100);
        assert!(!first.attacking);
        assert_eq!(first.health_band, HealthBand::Healthy);
        assert_eq!(snapshot.actor(ActorSlot::Second).facing, Facing::Left);
    }

    #[test]
    fn test_snapshot_reports_attacking_flag() {
        let mut sim = Simulation::new();
        sim.tick(
            &InputIntents::new(ActorIntents::IDLE, ActorIntents::attack()),
            Arena::default(),
        );
        let snapshot = sim.snapshot();
        assert!(!snapshot.actor(ActorSlot::First).attacking);
        assert!(snapshot.actor(ActorSlot::Second).attacking);
    }
}
