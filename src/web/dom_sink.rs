// DOM presentation: status line, high score, pad flashes and sounds.
use web_sys::{Document, Element};

use super::audio::Audio;
use super::later;
use crate::signal::Signal;
use crate::sink::PresentationSink;

// Flash lengths and tone lengths, ms.
const GAME_FLASH_MS: i32 = 260;
const USER_FLASH_MS: i32 = 180;
const GAME_OVER_FLASH_MS: i32 = 220;

pub struct DomSink {
    doc: Document,
    status: Option<Element>,
    high_score: Option<Element>,
    audio: Audio,
}

impl DomSink {
    pub fn new(doc: &Document) -> Self {
        Self {
            doc: doc.clone(),
            status: doc.get_element_by_id("status-text"),
            high_score: doc.get_element_by_id("high-score"),
            audio: Audio::new(),
        }
    }

    /// Must run inside a user gesture handler.
    pub fn unlock_audio(&mut self) {
        self.audio.unlock();
    }

    fn flash(&self, signal: Signal, class: &'static str, ms: i32) {
        if let Some(pad) = self.doc.get_element_by_id(signal.id()) {
            flash_class(pad, class, ms);
        }
    }
}

fn flash_class(el: Element, class: &'static str, ms: i32) {
    let _ = el.class_list().add_1(class);
    later(ms, move || {
        let _ = el.class_list().remove_1(class);
    });
}

impl PresentationSink for DomSink {
    fn present_signal(&mut self, signal: Signal) {
        self.flash(signal, "flash", GAME_FLASH_MS);
        self.audio.tone(signal.tone_hz(), GAME_FLASH_MS as f64);
    }

    fn player_signal(&mut self, signal: Signal) {
        self.flash(signal, "userflash", USER_FLASH_MS);
        self.audio.tone(signal.tone_hz(), USER_FLASH_MS as f64);
    }

    fn status(&mut self, text: &str) {
        if let Some(el) = &self.status {
            el.set_text_content(Some(text));
        }
    }

    fn game_over(&mut self, final_score: u32, reason: &str) {
        if let Some(el) = &self.status {
            el.set_inner_html(&format!(
                "{reason} Your score was <b>{final_score}</b><br>Press any key to restart"
            ));
        }
        if let Some(body) = self.doc.body() {
            let body: Element = body.into();
            flash_class(body, "game-over", GAME_OVER_FLASH_MS);
        }
    }

    fn error_feedback(&mut self) {
        self.audio.error_buzz();
    }

    fn best_score_changed(&mut self, best: u32) {
        if let Some(el) = &self.high_score {
            el.set_text_content(Some(&best.to_string()));
        }
    }
}
