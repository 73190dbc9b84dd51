//! Browser front end.
//!
//! Owns the single engine instance for the page, forwards DOM events into it
//! and pumps its scheduler from a `requestAnimationFrame` loop, backed by a
//! coarse `setInterval` tick for background tabs where frames stop. Expected
//! markup: pads with class `btn` whose ids are signal ids, `#status-text`,
//! `#high-score` and an optional `#strict-toggle` checkbox.
use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, window};

use crate::config::GameConfig;
use crate::engine::Engine;
use crate::signal::Signal;
use crate::sink::PresentationSink;
use crate::source::SeededSource;

mod audio;
#[cfg(feature = "console_log")]
pub mod console;
mod dom_sink;
mod storage;

pub use dom_sink::DomSink;
pub use storage::LocalStorageStore;

type WebEngine = Engine<DomSink, SeededSource, LocalStorageStore>;

// One game per page.
thread_local! {
    static GAME: RefCell<Option<WebEngine>> = RefCell::new(None);
}

pub fn start(config_json: Option<String>) -> Result<(), JsValue> {
    if GAME.with(|cell| cell.borrow().is_some()) {
        return Ok(());
    }
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let config = match config_json {
        Some(json) => parse_config(&json)?,
        None => GameConfig::default(),
    };
    let store = LocalStorageStore::new(&win, config.best_score_key.clone());
    let mut engine = Engine::new(
        config,
        DomSink::new(&doc),
        SeededSource::new(seed()),
        store,
    );
    let best = engine.best_score();
    engine.sink_mut().best_score_changed(best);
    if let Some(toggle) = strict_toggle(&doc) {
        engine.set_strict_mode(toggle.checked());
    }
    GAME.with(|cell| *cell.borrow_mut() = Some(engine));

    // Any key starts (or restarts) a game
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::KeyboardEvent| {
            with_game(|game| {
                game.sink_mut().unlock_audio();
                game.begin();
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Pad clicks
    let pads = doc.query_selector_all(".btn")?;
    for i in 0..pads.length() {
        let Some(pad) = pads.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let signal: Signal = match pad.id().parse() {
            Ok(sig) => sig,
            Err(err) => {
                warn!(%err, "pad without a signal id");
                continue;
            }
        };
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_game(|game| {
                game.sink_mut().unlock_audio();
                game.submit_signal(signal);
            });
        }) as Box<dyn FnMut(_)>);
        pad.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Strict mode checkbox
    if let Some(toggle) = strict_toggle(&doc) {
        let input = toggle.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let enabled = input.checked();
            with_game(|game| game.set_strict_mode(enabled));
        }) as Box<dyn FnMut(_)>);
        toggle.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_frame_loop();
    start_interval_tick(&win)?;
    Ok(())
}

fn strict_toggle(doc: &Document) -> Option<HtmlInputElement> {
    doc.get_element_by_id("strict-toggle")?.dyn_into().ok()
}

#[cfg(feature = "serde_json")]
fn parse_config(json: &str) -> Result<GameConfig, JsValue> {
    GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(not(feature = "serde_json"))]
fn parse_config(_json: &str) -> Result<GameConfig, JsValue> {
    warn!("config override ignored, built without serde_json");
    Ok(GameConfig::default())
}

/// Catch the scheduler up to the current time, then run `f`.
fn with_game(f: impl FnOnce(&mut WebEngine)) {
    GAME.with(|cell| {
        if let Some(game) = cell.borrow_mut().as_mut() {
            game.tick(now_ms());
            f(game);
        }
    });
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        GAME.with(|cell| {
            if let Some(game) = cell.borrow_mut().as_mut() {
                game.tick(ts as u64);
            }
        });
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

/// Period of the fallback tick. Browsers throttle background timers to about
/// once a second; the engine catches up in order either way.
const FALLBACK_TICK_MS: i32 = 100;

fn start_interval_tick(win: &web_sys::Window) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move || {
        GAME.with(|cell| {
            if let Some(game) = cell.borrow_mut().as_mut() {
                game.tick(now_ms());
            }
        });
    }) as Box<dyn FnMut()>);
    win.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        FALLBACK_TICK_MS,
    )?;
    closure.forget();
    Ok(())
}

fn now_ms() -> u64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0) as u64
}

/// Run `f` once after `delay_ms`. Used for purely cosmetic follow-ups.
pub(crate) fn later(delay_ms: i32, f: impl FnOnce() + 'static) {
    let Some(win) = window() else {
        return;
    };
    let cb = Closure::once_into_js(f);
    let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay_ms);
}

#[cfg(feature = "rng")]
fn seed() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(err) => {
            warn!(%err, "getrandom failed, seeding from clock");
            clock_seed()
        }
    }
}

#[cfg(not(feature = "rng"))]
fn seed() -> u64 {
    clock_seed()
}

// Not crypto secure; only has to differ between page loads.
fn clock_seed() -> u64 {
    let now = window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0);
    (now * 1000.0) as u64 ^ 0x9E37_79B9_7F4A_7C15
}
