//! Where new signals come from.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::signal::Signal;

/// Supplies the next signal appended to the target sequence.
pub trait SignalSource {
    fn next_signal(&mut self) -> Signal;
}

impl<F: FnMut() -> Signal> SignalSource for F {
    fn next_signal(&mut self) -> Signal {
        self()
    }
}

/// Uniform draw with replacement over [`Signal::ALL`]. Same seed, same game.
#[derive(Clone, Debug)]
pub struct SeededSource {
    rng: ChaCha8Rng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl SignalSource for SeededSource {
    fn next_signal(&mut self) -> Signal {
        Signal::from_index(self.rng.gen_range(0..Signal::COUNT)).unwrap_or(Signal::Red)
    }
}

/// Replays a fixed script, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    script: Vec<Signal>,
    pos: usize,
}

impl ScriptedSource {
    /// Panics on an empty script.
    pub fn new(script: impl Into<Vec<Signal>>) -> Self {
        let script = script.into();
        assert!(!script.is_empty(), "ScriptedSource needs at least one signal");
        Self { script, pos: 0 }
    }
}

impl SignalSource for ScriptedSource {
    fn next_signal(&mut self) -> Signal {
        let sig = self.script[self.pos % self.script.len()];
        self.pos += 1;
        sig
    }
}
