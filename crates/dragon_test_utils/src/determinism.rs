//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulation
//! produces identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! A duel must replay bit-for-bit from its recorded inputs. Sources of
//! non-determinism include:
//!
//! - **Floating-point math**: positions are integers and fractions use
//!   [`dragon_core::math::Fixed`].
//!
//! - **Hash iteration order**: held keys live in an ordered set.
//!
//! - **Evaluation order**: actors are always processed first, then second.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Actor, arena and input rules in isolation
//! 2. **Property tests**: Random input scripts still produce deterministic outputs
//! 3. **Integration tests**: Full matches are reproducible and replayable

use std::thread;

use dragon_core::arena::Arena;
use dragon_core::input::InputIntents;
use dragon_core::simulation::Simulation;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick, given the tick index
/// * `hash` - Function to compute state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S, u64),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for tick in 0..ticks {
            step(&mut state, tick);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Feed a script of intents through a simulation on the default arena.
pub fn run_script(sim: &mut Simulation, script: &[InputIntents]) {
    let arena = Arena::default();
    for intents in script {
        sim.tick(intents, arena);
    }
}

/// Run the same script twice from the same setup and compare final hashes.
pub fn verify_simulation_determinism<F>(setup_fn: F, script: &[InputIntents]) -> bool
where
    F: Fn() -> Simulation,
{
    let arena = Arena::default();
    let result = verify_determinism(
        2,
        script.len() as u64,
        &setup_fn,
        |sim, tick| {
            sim.tick(&script[tick as usize], arena);
        },
        Simulation::state_hash,
    );
    result.is_deterministic
}

/// Run N copies of a scripted match on scoped threads and collect hashes.
///
/// Catches state that leaks between threads or depends on scheduling.
pub fn run_parallel_scripts<F>(setup_fn: F, num_sims: usize, script: &[InputIntents]) -> Vec<u64>
where
    F: Fn() -> Simulation + Sync,
{
    thread::scope(|s| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                s.spawn(|| {
                    let mut sim = setup_fn();
                    run_script(&mut sim, script);
                    sim.state_hash()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("simulation thread panicked"))
            .collect()
    })
}

/// Compare two runs tick-by-tick, finding the first divergence.
///
/// # Returns
///
/// `None` if the runs stay identical, `Some(tick)` if they diverge
/// at that tick (0 means the setups already differed).
pub fn find_first_divergence<F>(setup_fn: F, script: &[InputIntents]) -> Option<u64>
where
    F: Fn() -> Simulation,
{
    let arena = Arena::default();
    let mut sim1 = setup_fn();
    let mut sim2 = setup_fn();

    if sim1.state_hash() != sim2.state_hash() {
        return Some(0);
    }

    for (tick, intents) in (1..).zip(script) {
        sim1.tick(intents, arena);
        sim2.tick(intents, arena);

        if sim1.state_hash() != sim2.state_hash() {
            return Some(tick);
        }
    }

    None
}

/// Verify that a serialization round-trip preserves the match exactly,
/// and that the restored match keeps evolving identically.
pub fn verify_serialization_determinism<F>(
    setup_fn: F,
    before: &[InputIntents],
    after: &[InputIntents],
) -> bool
where
    F: Fn() -> Simulation,
{
    let mut sim = setup_fn();
    run_script(&mut sim, before);

    let Ok(bytes) = sim.serialize() else {
        return false;
    };
    let Ok(mut restored) = Simulation::deserialize(&bytes) else {
        return false;
    };

    if restored.state_hash() != sim.state_hash() {
        return false;
    }

    run_script(&mut sim, after);
    run_script(&mut restored, after);
    restored.state_hash() == sim.state_hash()
}

/// Proptest strategies for simulation testing.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing.
pub mod strategies {
    use dragon_core::arena::Arena;
    use dragon_core::input::{ActorIntents, InputIntents};
    use proptest::prelude::*;

    /// Any combination of the five intent flags.
    pub fn arb_actor_intents() -> impl Strategy<Value = ActorIntents> {
        (
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(
                |(move_up, move_down, move_left, move_right, attack)| ActorIntents {
                    move_up,
                    move_down,
                    move_left,
                    move_right,
                    attack,
                },
            )
    }

    /// Intents for both actors.
    pub fn arb_input_intents() -> impl Strategy<Value = InputIntents> {
        (arb_actor_intents(), arb_actor_intents())
            .prop_map(|(first, second)| InputIntents::new(first, second))
    }

    /// A script of per-tick intents.
    pub fn arb_script(max_len: usize) -> impl Strategy<Value = Vec<InputIntents>> {
        proptest::collection::vec(arb_input_intents(), 0..max_len)
    }

    /// Movement deltas, including ones larger than the arena.
    pub fn arb_delta() -> impl Strategy<Value = i32> {
        -2000i32..2000i32
    }

    /// Arenas big enough to hold a placeholder-sized actor.
    pub fn arb_arena() -> impl Strategy<Value = Arena> {
        (100i32..2000, 100i32..1200).prop_map(|(width, height)| Arena::new(width, height))
    }

    /// Damage amounts, including overkill.
    pub fn arb_damage() -> impl Strategy<Value = u32> {
        0u32..250u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{brawl_script, close_quarters, setup_at};
    use dragon_core::input::ActorIntents;
    use proptest::prelude::*;

    #[test]
    fn test_verify_determinism_simple() {
        let result = verify_determinism(3, 100, || 0u64, |n, _| *n += 1, |n| *n);

        assert!(result.is_deterministic);
        assert_eq!(result.hashes, vec![100, 100, 100]);
    }

    #[test]
    #[should_panic(expected = "non-deterministic")]
    fn test_assert_deterministic_panics_on_mismatch() {
        let result = DeterminismResult {
            is_deterministic: false,
            hashes: vec![1, 2],
            ticks: 10,
        };
        result.assert_deterministic();
    }

    #[test]
    fn test_idle_match_is_deterministic() {
        let script = vec![InputIntents::IDLE; 200];
        assert!(verify_simulation_determinism(Simulation::new, &script));
    }

    #[test]
    fn test_brawl_is_deterministic() {
        assert!(verify_simulation_determinism(Simulation::new, &brawl_script()));
    }

    #[test]
    fn test_no_divergence_in_close_quarters() {
        let script = vec![InputIntents::new(ActorIntents::attack(), ActorIntents::left()); 60];
        assert_eq!(find_first_divergence(close_quarters, &script), None);
    }

    #[test]
    fn test_divergent_setups_detected_at_zero() {
        use std::cell::Cell;
        let calls = Cell::new(0);
        let divergence = find_first_divergence(
            || {
                calls.set(calls.get() + 1);
                Simulation::with_setup(setup_at(100 + calls.get(), 900))
            },
            &[],
        );
        assert_eq!(divergence, Some(0));
    }

    #[test]
    fn test_serialization_mid_brawl() {
        let script = brawl_script();
        let (before, after) = script.split_at(75);
        assert!(verify_serialization_determinism(
            Simulation::new,
            before,
            after
        ));
    }

    #[test]
    fn test_parallel_brawls_agree() {
        let hashes = run_parallel_scripts(Simulation::new, 4, &brawl_script());
        assert_eq!(hashes.len(), 4);
        assert!(hashes.windows(2).all(|w| w[0] == w[1]));
    }

    proptest! {
        /// Random input scripts replay to the same state.
        #[test]
        fn prop_random_scripts_are_deterministic(
            script in strategies::arb_script(200),
        ) {
            prop_assert!(verify_simulation_determinism(Simulation::new, &script));
        }

        /// Random scripts from close quarters never diverge tick-by-tick.
        #[test]
        fn prop_close_quarters_never_diverges(
            script in strategies::arb_script(120),
        ) {
            prop_assert_eq!(find_first_divergence(close_quarters, &script), None);
        }
    }
}
