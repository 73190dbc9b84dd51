//! Presentation sink: everything the player sees or hears goes through here.
//!
//! The engine never touches the DOM or audio directly. The browser build plugs
//! in `web::DomSink`; tests and headless runs use [`RecordingSink`].

use crate::signal::Signal;

pub trait PresentationSink {
    /// Cue for one signal of a playback.
    fn present_signal(&mut self, signal: Signal);
    /// Cue for a signal the player just selected.
    fn player_signal(&mut self, signal: Signal);
    fn status(&mut self, text: &str);
    fn game_over(&mut self, final_score: u32, reason: &str);
    /// Distinct failure cue on a wrong move.
    fn error_feedback(&mut self);
    fn best_score_changed(&mut self, best: u32);
}

/// One recorded sink call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkEvent {
    Present(Signal),
    Player(Signal),
    Status(String),
    GameOver { final_score: u32, reason: String },
    ErrorFeedback,
    BestScore(u32),
}

#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Take everything recorded so far.
    pub fn drain(&mut self) -> Vec<SinkEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn last_status(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            SinkEvent::Status(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Signals presented by playback, in order.
    pub fn presented(&self) -> Vec<Signal> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Present(s) => Some(*s),
                _ => None,
            })
            .collect()
    }
}

impl PresentationSink for RecordingSink {
    fn present_signal(&mut self, signal: Signal) {
        self.events.push(SinkEvent::Present(signal));
    }

    fn player_signal(&mut self, signal: Signal) {
        self.events.push(SinkEvent::Player(signal));
    }

    fn status(&mut self, text: &str) {
        self.events.push(SinkEvent::Status(text.to_string()));
    }

    fn game_over(&mut self, final_score: u32, reason: &str) {
        self.events.push(SinkEvent::GameOver {
            final_score,
            reason: reason.to_string(),
        });
    }

    fn error_feedback(&mut self) {
        self.events.push(SinkEvent::ErrorFeedback);
    }

    fn best_score_changed(&mut self, best: u32) {
        self.events.push(SinkEvent::BestScore(best));
    }
}
