//! Echo Memory core crate.
//!
//! The game grows a random sequence of colored signals, plays it back and asks
//! the player to repeat it. Everything timing- and rule-related lives in the
//! headless [`Engine`], which talks to the outside world only through the
//! [`PresentationSink`], [`SignalSource`] and [`ScoreStore`] traits and is
//! driven by [`Engine::tick`]. The `web` module plugs the DOM, Web Audio and
//! `localStorage` into those seams for the wasm build.
//!
//! ```
//! use echo_memory::{Engine, GameConfig, GameState, MemoryStore, RecordingSink, ScriptedSource, Signal};
//!
//! let mut game = Engine::new(
//!     GameConfig::default(),
//!     RecordingSink::new(),
//!     ScriptedSource::new(vec![Signal::Green]),
//!     MemoryStore::new(),
//! );
//! game.begin();
//! game.tick(2_000);
//! assert_eq!(game.state(), GameState::AwaitingInput);
//! game.submit_signal(Signal::Green);
//! assert_eq!(game.state(), GameState::Advancing);
//! ```

use wasm_bindgen::prelude::*;

pub mod config;
pub mod engine;
pub mod error;
pub mod scheduler;
pub mod score;
pub mod signal;
pub mod sink;
pub mod source;
pub mod web;

pub use config::GameConfig;
pub use engine::{Engine, GameState, Step};
pub use error::{Error, Result};
pub use scheduler::{CancelHandle, Millis, Scheduler};
pub use score::{BestScore, MemoryStore, ScoreStore, parse_best_score};
pub use signal::Signal;
pub use sink::{PresentationSink, RecordingSink, SinkEvent};
pub use source::{ScriptedSource, SeededSource, SignalSource};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(feature = "console_log")]
    web::console::init();
}

/// Wire the page up. `config_json` optionally overrides timings (needs the
/// `serde_json` feature). Calling it again is a no-op.
#[wasm_bindgen]
pub fn start_game(config_json: Option<String>) -> std::result::Result<(), JsValue> {
    web::start(config_json)
}
