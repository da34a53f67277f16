//! Test fixtures and helpers.
//!
//! Pre-built matches and input scripts for consistent testing.

use dragon_core::actor::{Actor, ActorSpec, Facing};
use dragon_core::arena::Arena;
use dragon_core::input::{ActorIntents, InputIntents};
use dragon_core::math::{Size, Vec2i};
use dragon_core::simulation::{MatchSetup, Simulation, TickEvents, PLACEHOLDER_SIZE};

/// Standard 1200x700 arena.
#[must_use]
pub fn arena() -> Arena {
    Arena::default()
}

/// A placeholder-sized actor at `(x, 400)`.
#[must_use]
pub fn actor_at(x: i32, facing: Facing) -> Actor {
    Actor::new(&ActorSpec {
        name: format!("Dragon@{x}"),
        position: Vec2i::new(x, 400),
        size: PLACEHOLDER_SIZE,
        facing,
    })
}

/// Standard setup with the actors moved to the given x positions.
#[must_use]
pub fn setup_at(first_x: i32, second_x: i32) -> MatchSetup {
    let mut setup = MatchSetup::default();
    setup.first.position = Vec2i::new(first_x, 400);
    setup.second.position = Vec2i::new(second_x, 400);
    setup
}

/// Standard setup with custom actor sizes at the given x positions.
#[must_use]
pub fn sized_setup_at(first_x: i32, second_x: i32, size: Size) -> MatchSetup {
    let mut setup = setup_at(first_x, second_x);
    setup.first.size = size;
    setup.second.size = size;
    setup
}

/// A match where the first actor already stands within reach of the second.
#[must_use]
pub fn close_quarters() -> Simulation {
    Simulation::with_setup(setup_at(820, 900))
}

/// Intents where only the first actor acts.
#[must_use]
pub fn first_only(intents: ActorIntents) -> InputIntents {
    InputIntents::new(intents, ActorIntents::IDLE)
}

/// Intents where only the second actor acts.
#[must_use]
pub fn second_only(intents: ActorIntents) -> InputIntents {
    InputIntents::new(ActorIntents::IDLE, intents)
}

/// Tick `count` times with the same intents, collecting every event.
pub fn advance(sim: &mut Simulation, intents: InputIntents, count: u32) -> Vec<TickEvents> {
    (0..count).map(|_| sim.tick(&intents, arena())).collect()
}

/// A scripted brawl: both actors close in, then trade blows.
#[must_use]
pub fn brawl_script() -> Vec<InputIntents> {
    let approach = InputIntents::new(ActorIntents::right(), ActorIntents::left());
    let trade = InputIntents::new(ActorIntents::attack(), ActorIntents::attack());
    let mut script = vec![approach; 70];
    script.extend(std::iter::repeat(trade).take(40));
    script
}
