//! Match-level behaviour tests.
//!
//! Drive whole matches through the public API and check the combat
//! rules, victory resolution and restart behaviour end to end.

use dragon_core::prelude::*;
use dragon_core::simulation::{FIRST_START, SECOND_START};
use dragon_test_utils::determinism::verify_determinism;
use dragon_test_utils::fixtures::{
    advance, arena, brawl_script, close_quarters, first_only, second_only, setup_at,
    sized_setup_at,
};

// =============================================================================
// Reach scenarios
// =============================================================================

#[test]
fn distant_attack_misses_then_close_attack_lands() {
    let mut sim = Simulation::new();
    let first = sim.actor(ActorSlot::First);
    assert_eq!(first.position(), Vec2i::new(100, 400));
    assert_eq!(first.facing(), Facing::Right);
    assert_eq!(sim.actor(ActorSlot::Second).facing(), Facing::Left);

    // 800 pixels apart: the swing cannot reach.
    let events = sim.tick(&first_only(ActorIntents::attack()), arena());
    assert_eq!(events.attacks_started, vec![ActorSlot::First]);
    assert!(events.hits.is_empty());
    assert_eq!(sim.actor(ActorSlot::Second).health(), MAX_HEALTH);

    // Walk to x=820 while the cooldown runs out.
    advance(&mut sim, first_only(ActorIntents::right()), 144);
    assert_eq!(sim.actor(ActorSlot::First).position().x, 820);
    assert_eq!(sim.actor(ActorSlot::First).facing(), Facing::Right);
    assert_eq!(sim.actor(ActorSlot::First).attack_state(), AttackState::Idle);

    let events = sim.tick(&first_only(ActorIntents::attack()), arena());
    assert_eq!(events.hits.len(), 1);
    assert_eq!(sim.actor(ActorSlot::Second).health(), 90);
}

#[test]
fn walking_past_opponent_turns_both_around() {
    let mut sim = Simulation::with_setup(setup_at(500, 560));
    advance(&mut sim, first_only(ActorIntents::right()), 20);

    assert_eq!(sim.actor(ActorSlot::First).position().x, 600);
    assert_eq!(sim.actor(ActorSlot::First).facing(), Facing::Left);
    assert_eq!(sim.actor(ActorSlot::Second).facing(), Facing::Right);
}

#[test]
fn holding_left_does_not_turn_actor_away() {
    let mut sim = close_quarters();
    let events = advance(
        &mut sim,
        first_only(ActorIntents {
            move_left: true,
            attack: true,
            ..ActorIntents::IDLE
        }),
        1,
    );

    // Manual facing is overridden by relative position, so the swing lands.
    assert_eq!(sim.actor(ActorSlot::First).facing(), Facing::Right);
    assert_eq!(events[0].hits.len(), 1);
}

#[test]
fn mutual_hits_land_on_same_tick() {
    let mut sim = Simulation::with_setup(setup_at(500, 560));
    let events = sim.tick(
        &InputIntents::new(ActorIntents::attack(), ActorIntents::attack()),
        arena(),
    );

    assert_eq!(events.hits.len(), 2);
    assert_eq!(events.hits[0].attacker, ActorSlot::First);
    assert_eq!(events.hits[1].attacker, ActorSlot::Second);
    assert_eq!(sim.actor(ActorSlot::First).health(), 90);
    assert_eq!(sim.actor(ActorSlot::Second).health(), 90);
}

// =============================================================================
// Victory
// =============================================================================

#[test]
fn ten_spaced_attacks_defeat_opponent() {
    let mut sim = Simulation::new();
    let mut defender = Actor::new(&sim.setup().second);
    let mut attacker = Actor::new(&ActorSpec {
        position: Vec2i::new(820, 400),
        ..sim.setup().first.clone()
    });

    // Ten swings, each followed by a full cooldown before the next.
    for swing in 0..10 {
        assert!(attacker.request_attack(), "swing {swing} should start");
        assert!(in_attack_range(&attacker, &defender, ATTACK_RANGE));
        defender.apply_damage(ATTACK_DAMAGE);
        for _ in 0..ATTACK_COOLDOWN_TICKS {
            attacker.tick();
        }
    }
    assert_eq!(defender.health(), 0);
    assert!(!defender.is_alive());

    // The same outcome through the match loop: each tick of the swing lands.
    let mut results = Vec::new();
    for _ in 0..144 {
        sim.tick(&first_only(ActorIntents::right()), arena());
    }
    for events in advance(&mut sim, first_only(ActorIntents::attack()), 40) {
        results.extend(events.result);
    }

    assert_eq!(sim.state(), MatchState::Over);
    assert_eq!(sim.winner(), Some(ActorSlot::First));
    assert_eq!(sim.actor(ActorSlot::Second).health(), 0);
    assert_eq!(results.len(), 1, "winner is recorded exactly once");
}

#[test]
fn second_actor_can_win() {
    let mut sim = Simulation::with_setup(setup_at(100, 180));
    for events in advance(&mut sim, second_only(ActorIntents::attack()), 10) {
        assert!(events.hits.iter().all(|hit| hit.attacker == ActorSlot::Second));
    }

    assert_eq!(sim.winner(), Some(ActorSlot::Second));
    assert_eq!(sim.winner_name(), Some("Blue Dragon"));
    assert_eq!(sim.snapshot().winner.as_deref(), Some("Blue Dragon"));
}

#[test]
fn over_match_ignores_all_input() {
    let mut sim = close_quarters();
    advance(&mut sim, first_only(ActorIntents::attack()), 10);
    assert!(sim.is_over());

    let frozen = sim.clone();
    let everything = ActorIntents {
        move_up: true,
        move_down: false,
        move_left: true,
        move_right: false,
        attack: true,
    };
    for events in advance(&mut sim, InputIntents::new(everything, everything), 50) {
        assert!(events.is_empty());
    }
    assert_eq!(sim, frozen);
    assert_eq!(sim.state_hash(), frozen.state_hash());
}

// =============================================================================
// Restart
// =============================================================================

#[test]
fn restart_returns_to_documented_start() {
    let mut sim = Simulation::new();
    advance(&mut sim, first_only(ActorIntents::right()), 144);
    advance(&mut sim, first_only(ActorIntents::attack()), 10);
    assert_eq!(sim.winner(), Some(ActorSlot::First));

    assert!(sim.restart());

    let snapshot = sim.snapshot();
    assert_eq!(snapshot.state, MatchState::Running);
    assert_eq!(snapshot.winner, None);
    assert_eq!(snapshot.tick, 0);
    assert_eq!(snapshot.actor(ActorSlot::First).position, FIRST_START);
    assert_eq!(snapshot.actor(ActorSlot::Second).position, SECOND_START);
    assert_eq!(snapshot.actor(ActorSlot::First).facing, Facing::Right);
    assert_eq!(snapshot.actor(ActorSlot::Second).facing, Facing::Left);
    for actor in &snapshot.actors {
        assert_eq!(actor.health, MAX_HEALTH);
        assert!(!actor.attacking);
    }
    assert_eq!(sim, Simulation::new());
}

#[test]
fn restarted_match_can_be_won_again() {
    let mut sim = close_quarters();
    advance(&mut sim, first_only(ActorIntents::attack()), 10);
    assert!(sim.restart());
    assert!(!sim.restart(), "second restart while running is ignored");

    advance(&mut sim, second_only(ActorIntents::left()), 4);
    advance(&mut sim, second_only(ActorIntents::attack()), 10);
    assert_eq!(sim.winner(), Some(ActorSlot::Second));
}

// =============================================================================
// Sprite-derived sizes
// =============================================================================

#[test]
fn larger_sprites_extend_reach_contact() {
    let big = Size::new(200, 150);
    let setup = MatchSetup::with_sizes(big, big);
    let mut sim = Simulation::with_setup(setup);

    // Gap between boxes is 600 pixels.
    advance(&mut sim, first_only(ActorIntents::right()), 104);
    assert_eq!(sim.actor(ActorSlot::First).position().x, 620);
    let events = sim.tick(&first_only(ActorIntents::attack()), arena());
    assert!(events.hits.is_empty());

    // Still inside the attack window, one more step makes contact.
    let stepped = advance(&mut sim, first_only(ActorIntents::right()), 1);
    assert_eq!(stepped[0].hits.len(), 1);
    assert_eq!(sim.actor(ActorSlot::Second).health(), 90);
}

#[test]
fn tall_sprites_hit_across_the_same_gap() {
    let sim_setup = sized_setup_at(600, 820, Size::new(200, 150));
    let mut sim = Simulation::with_setup(sim_setup);

    // Boxes 20 pixels apart: both reach strips overlap the attacker.
    let events = sim.tick(
        &InputIntents::new(ActorIntents::attack(), ActorIntents::attack()),
        arena(),
    );
    assert_eq!(events.hits.len(), 2);
    assert!(sim
        .actors()
        .iter()
        .all(|actor| actor.health() == MAX_HEALTH - ATTACK_DAMAGE));
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn brawl_ends_identically_on_every_run() {
    let script = brawl_script();
    let result = verify_determinism(
        5,
        script.len() as u64,
        Simulation::new,
        |sim, tick| {
            sim.tick(&script[tick as usize], arena());
        },
        Simulation::state_hash,
    );

    result.assert_deterministic();
    assert_eq!(result.unique_hashes().len(), 1);
    assert_eq!(result.hashes.len(), 5);
}
