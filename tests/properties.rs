//! Property-based invariant tests for the sequence engine.
//!
//! Verifies:
//! 1. Correct play: level grows by exactly one per round and the game never ends
//! 2. Forgiving mode: one mismatch replays the same sequence with input cleared
//! 3. Strict mode: one mismatch ends the game with final score == level
//! 4. Best score never decreases and always covers the level reached
//! 5. Scheduler: playback steps fire in index order at i * interval

use echo_memory::{
    Engine, GameConfig, GameState, MemoryStore, RecordingSink, Scheduler, ScriptedSource, Signal,
    SinkEvent,
};
use proptest::prelude::*;

type TestEngine = Engine<RecordingSink, ScriptedSource, MemoryStore>;

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_signal() -> impl Strategy<Value = Signal> {
    (0..Signal::COUNT).prop_map(|i| Signal::ALL[i])
}

fn arb_script() -> impl Strategy<Value = Vec<Signal>> {
    prop::collection::vec(arb_signal(), 1..12)
}

#[derive(Clone, Debug)]
enum Op {
    Begin,
    Submit(Signal),
    SubmitCorrect,
    Wait(u64),
    Strict(bool),
    EndGame,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Begin),
        3 => arb_signal().prop_map(Op::Submit),
        6 => Just(Op::SubmitCorrect),
        4 => (0u64..3_000).prop_map(Op::Wait),
        1 => any::<bool>().prop_map(Op::Strict),
        1 => Just(Op::EndGame),
    ]
}

fn new_engine(script: Vec<Signal>, strict: bool) -> TestEngine {
    let config = GameConfig {
        strict_mode: strict,
        ..GameConfig::default()
    };
    Engine::new(
        config,
        RecordingSink::new(),
        ScriptedSource::new(script),
        MemoryStore::new(),
    )
}

fn run_until_input(e: &mut TestEngine) {
    while e.state() != GameState::AwaitingInput {
        let due = e.scheduler().next_due().expect("engine stalled");
        e.tick(due);
    }
}

fn wrong_for(sig: Signal) -> Signal {
    *Signal::ALL.iter().find(|s| **s != sig).unwrap()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Correct play
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn correct_play_grows_by_one(script in arb_script(), rounds in 1usize..10) {
        let mut e = new_engine(script, false);
        e.begin();
        run_until_input(&mut e);
        for round in 1..=rounds {
            prop_assert_eq!(e.level() as usize, round);
            prop_assert_eq!(e.target().len(), round);
            let target = e.target().to_vec();
            for sig in target {
                e.submit_signal(sig);
            }
            run_until_input(&mut e);
        }
        prop_assert_eq!(e.level() as usize, rounds + 1);
        prop_assert_eq!(e.best_score() as usize, rounds + 1);
        let ended = e
            .sink()
            .events()
            .iter()
            .any(|ev| matches!(ev, SinkEvent::GameOver { .. }));
        prop_assert!(!ended);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2 & 3. One mismatch, both modes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn forgiving_mismatch_replays(
        script in arb_script(),
        rounds in 0usize..6,
        miss_at in 0usize..8,
    ) {
        let mut e = new_engine(script, false);
        e.begin();
        run_until_input(&mut e);
        for _ in 0..rounds {
            let target = e.target().to_vec();
            for sig in target {
                e.submit_signal(sig);
            }
            run_until_input(&mut e);
        }
        let target = e.target().to_vec();
        let level = e.level();
        let idx = miss_at % target.len();
        for sig in &target[..idx] {
            e.submit_signal(*sig);
        }
        e.sink_mut().drain();
        e.submit_signal(wrong_for(target[idx]));
        prop_assert_eq!(e.state(), GameState::Repeating);
        prop_assert!(e.player_input().is_empty());

        run_until_input(&mut e);
        prop_assert_eq!(e.target(), target.as_slice());
        prop_assert_eq!(e.level(), level);
        prop_assert_eq!(e.sink().presented(), target);
        prop_assert!(e.player_input().is_empty());
    }

    #[test]
    fn strict_mismatch_ends_at_level(
        script in arb_script(),
        rounds in 0usize..6,
        miss_at in 0usize..8,
    ) {
        let mut e = new_engine(script, true);
        e.begin();
        run_until_input(&mut e);
        for _ in 0..rounds {
            let target = e.target().to_vec();
            for sig in target {
                e.submit_signal(sig);
            }
            run_until_input(&mut e);
        }
        let target = e.target().to_vec();
        let level = e.level();
        let idx = miss_at % target.len();
        for sig in &target[..idx] {
            e.submit_signal(*sig);
        }
        e.submit_signal(wrong_for(target[idx]));
        prop_assert_eq!(e.state(), GameState::Over);
        let final_score = e.sink().events().iter().find_map(|ev| match ev {
            SinkEvent::GameOver { final_score, .. } => Some(*final_score),
            _ => None,
        });
        prop_assert_eq!(final_score, Some(level));
        prop_assert_eq!(e.best_score(), level);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Best score monotonic under arbitrary input
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn best_score_monotonic(script in arb_script(), ops in prop::collection::vec(arb_op(), 1..80)) {
        let mut e = new_engine(script, false);
        let mut now = 0u64;
        let mut best = e.best_score();
        let mut max_level = 0u32;
        for op in ops {
            match op {
                Op::Begin => e.begin(),
                Op::Submit(sig) => e.submit_signal(sig),
                Op::SubmitCorrect => {
                    let idx = e.player_input().len();
                    if let Some(sig) = e.target().get(idx).copied() {
                        e.submit_signal(sig);
                    }
                }
                Op::Wait(ms) => {
                    now += ms;
                    e.tick(now);
                }
                Op::Strict(on) => e.set_strict_mode(on),
                Op::EndGame => e.end_game(),
            }
            prop_assert!(e.best_score() >= best);
            best = e.best_score();
            max_level = max_level.max(e.level());
            prop_assert!(e.best_score() >= e.level());
            prop_assert_eq!(e.target().len() as u32, e.level());
        }
        prop_assert_eq!(e.best_score(), max_level);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Scheduler ordering
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn playback_fires_in_index_order(
        seq in prop::collection::vec(arb_signal(), 0..20),
        interval in 1u64..1_000,
        settle in 0u64..500,
        start in 0u64..10_000,
    ) {
        let mut s: Scheduler<Option<(usize, Signal)>> = Scheduler::new();
        s.advance(start);
        let mut idx = 0usize;
        s.schedule_playback(&seq, interval, settle, |sig| {
            let step = Some((idx, sig));
            idx += 1;
            step
        }, None);

        let mut fired = Vec::new();
        while let Some(step) = s.pop_due(u64::MAX) {
            fired.push((s.now(), step));
        }
        prop_assert_eq!(fired.len(), seq.len() + 1);
        for (i, (at, step)) in fired.iter().take(seq.len()).enumerate() {
            prop_assert_eq!(*at, start + i as u64 * interval);
            prop_assert_eq!(*step, Some((i, seq[i])));
        }
        let (done_at, done) = fired[seq.len()];
        prop_assert_eq!(done_at, start + seq.len() as u64 * interval + settle);
        prop_assert_eq!(done, None);
    }
}
