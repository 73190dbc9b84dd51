//! Sequence engine: the game state machine.
//!
//! ```text
//!   Idle/Over --begin--> Starting --350ms--> Advancing(+1 signal) --> Presenting
//!   Presenting --playback done--> AwaitingInput
//!   AwaitingInput --full match--> Advancing (after 780ms)
//!   AwaitingInput --mismatch, forgiving--> Repeating --850ms--> Presenting
//!   AwaitingInput --mismatch, strict--> Over
//! ```
//!
//! The engine never blocks. Every delayed step goes through the scheduler and
//! is dispatched from [`Engine::tick`]; player input is only accepted in
//! [`GameState::AwaitingInput`].

use tracing::{debug, info, trace};

use crate::config::GameConfig;
use crate::scheduler::{Millis, Scheduler};
use crate::score::{BestScore, ScoreStore};
use crate::signal::Signal;
use crate::sink::PresentationSink;
use crate::source::SignalSource;

pub const STATUS_GET_READY: &str = "Get ready...";
pub const STATUS_WRONG_MOVE: &str = "Wrong move! Watch the pattern again...";
pub const REASON_GAME_OVER: &str = "Game Over!";
pub const REASON_STRICT: &str = "Wrong move in Strict Mode!";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameState {
    #[default]
    Idle,
    Starting,
    Presenting,
    AwaitingInput,
    Advancing,
    Repeating,
    Over,
}

/// Scheduled work, dispatched by [`Engine::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Grow the sequence by one and present it.
    Advance,
    /// Present the current sequence again after a forgiven mistake.
    Replay,
    /// Flash one signal of a playback.
    Present(Signal),
    /// Playback finished; open input.
    InputOpen,
}

pub struct Engine<P, R, S> {
    config: GameConfig,
    sink: P,
    source: R,
    store: S,
    scheduler: Scheduler<Step>,
    state: GameState,
    target: Vec<Signal>,
    input: Vec<Signal>,
    level: u32,
    best: BestScore,
    strict: bool,
}

impl<P, R, S> Engine<P, R, S>
where
    P: PresentationSink,
    R: SignalSource,
    S: ScoreStore,
{
    /// Reads the best score from `store` once.
    pub fn new(config: GameConfig, sink: P, source: R, store: S) -> Self {
        let best = BestScore::load(&store);
        let strict = config.strict_mode;
        Self {
            config,
            sink,
            source,
            store,
            scheduler: Scheduler::new(),
            state: GameState::Idle,
            target: Vec::new(),
            input: Vec::new(),
            level: 0,
            best,
            strict,
        }
    }

    // --- Inputs -------------------------------------------------------------

    /// Start a game. No-op while one is running.
    pub fn begin(&mut self) {
        if self.is_started() {
            trace!(state = ?self.state, "begin ignored, game already running");
            return;
        }
        self.scheduler.cancel_all();
        self.target.clear();
        self.input.clear();
        self.level = 0;
        self.state = GameState::Starting;
        info!(strict = self.strict, "game started");
        self.sink.status(STATUS_GET_READY);
        self.scheduler
            .schedule_once(self.config.start_delay_ms, Step::Advance);
    }

    /// Player picked `signal`. Dropped unless input is open.
    pub fn submit_signal(&mut self, signal: Signal) {
        if self.state != GameState::AwaitingInput {
            trace!(state = ?self.state, %signal, "input ignored");
            return;
        }
        self.sink.player_signal(signal);
        self.input.push(signal);
        let idx = self.input.len() - 1;

        if self.target.get(idx) != Some(&signal) {
            self.on_mismatch(idx);
            return;
        }
        if self.input.len() == self.target.len() {
            debug!(level = self.level, "round complete");
            self.state = GameState::Advancing;
            self.scheduler
                .schedule_once(self.config.advance_delay_ms, Step::Advance);
        }
    }

    /// Takes effect on the next mismatch.
    pub fn set_strict_mode(&mut self, enabled: bool) {
        self.strict = enabled;
    }

    /// Force game over. No-op when no game is running.
    pub fn end_game(&mut self) {
        if !self.is_started() {
            return;
        }
        self.finish(REASON_GAME_OVER);
    }

    /// Drop the current game silently. The best score is kept.
    pub fn reset(&mut self) {
        self.clear_game();
        self.state = GameState::Idle;
    }

    /// Dispatch every scheduled step due at or before `now`, in order.
    pub fn tick(&mut self, now: Millis) {
        while let Some(step) = self.scheduler.pop_due(now) {
            self.dispatch(step);
        }
    }

    // --- Observers ----------------------------------------------------------

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_started(&self) -> bool {
        !matches!(self.state, GameState::Idle | GameState::Over)
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn best_score(&self) -> u32 {
        self.best.value()
    }

    pub fn target(&self) -> &[Signal] {
        &self.target
    }

    pub fn player_input(&self) -> &[Signal] {
        &self.input
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut P {
        &mut self.sink
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scheduler(&self) -> &Scheduler<Step> {
        &self.scheduler
    }

    // --- Transitions --------------------------------------------------------

    fn dispatch(&mut self, step: Step) {
        match step {
            Step::Advance => self.advance(),
            Step::Replay => self.present(),
            Step::Present(signal) => self.sink.present_signal(signal),
            Step::InputOpen => {
                self.state = GameState::AwaitingInput;
                self.sink.status(&format!("Level {}", self.level));
            }
        }
    }

    fn advance(&mut self) {
        self.input.clear();
        self.level += 1;
        if self.best.offer(self.level, &mut self.store) {
            self.sink.best_score_changed(self.best.value());
        }
        let next = self.source.next_signal();
        self.target.push(next);
        debug!(level = self.level, %next, "sequence extended");
        self.present();
    }

    fn present(&mut self) {
        // Never let two playbacks overlap.
        self.scheduler.cancel_all();
        self.state = GameState::Presenting;
        self.sink.status(&format!("Level {} - Watch", self.level));
        self.scheduler.schedule_playback(
            &self.target,
            self.config.step_interval_ms,
            self.config.settle_delay_ms,
            Step::Present,
            Step::InputOpen,
        );
    }

    fn on_mismatch(&mut self, idx: usize) {
        if self.strict {
            self.finish(REASON_STRICT);
            return;
        }
        debug!(level = self.level, idx, "wrong move, replaying");
        self.sink.error_feedback();
        self.input.clear();
        self.state = GameState::Repeating;
        self.sink.status(STATUS_WRONG_MOVE);
        self.scheduler
            .schedule_once(self.config.repeat_delay_ms, Step::Replay);
    }

    fn finish(&mut self, reason: &str) {
        if self.best.offer(self.level, &mut self.store) {
            self.sink.best_score_changed(self.best.value());
        }
        let final_score = self.level;
        info!(final_score, best = self.best.value(), reason, "game over");
        self.sink.error_feedback();
        self.sink.game_over(final_score, reason);
        self.clear_game();
        self.state = GameState::Over;
    }

    fn clear_game(&mut self) {
        self.scheduler.cancel_all();
        self.target.clear();
        self.input.clear();
        self.level = 0;
    }
}
