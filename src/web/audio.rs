// Web Audio tones for pad presses and the error buzz.
use tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::{AudioContext, AudioContextState, OscillatorType};

use super::later;

const VOLUME: f32 = 0.06;

/// Lazily created audio context. Browsers only allow it to run after a user
/// gesture, so [`Audio::unlock`] is called from input handlers.
#[derive(Default)]
pub struct Audio {
    ctx: Option<AudioContext>,
}

impl Audio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unlock(&mut self) {
        if self.ctx.is_none() {
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(err) => {
                    warn!(?err, "Web Audio unavailable");
                    return;
                }
            }
        }
        if let Some(ctx) = &self.ctx {
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    fn running(&self) -> Option<&AudioContext> {
        self.ctx
            .as_ref()
            .filter(|ctx| ctx.state() == AudioContextState::Running)
    }

    pub fn tone(&self, hz: f32, duration_ms: f64) {
        if let Some(ctx) = self.running() {
            if let Err(err) = play_tone(ctx, hz, duration_ms, OscillatorType::Sine) {
                warn!(?err, hz, "tone failed");
            }
        }
    }

    /// Two descending sawtooth blips.
    pub fn error_buzz(&self) {
        let Some(ctx) = self.running() else {
            return;
        };
        let _ = play_tone(ctx, 180.0, 160.0, OscillatorType::Sawtooth);
        let ctx = ctx.clone();
        later(120, move || {
            let _ = play_tone(&ctx, 120.0, 220.0, OscillatorType::Sawtooth);
        });
    }
}

fn play_tone(
    ctx: &AudioContext,
    hz: f32,
    duration_ms: f64,
    kind: OscillatorType,
) -> Result<(), JsValue> {
    let osc = ctx.create_oscillator()?;
    let gain = ctx.create_gain()?;
    osc.set_type(kind);
    osc.frequency().set_value(hz);

    let start = ctx.current_time();
    let end = start + duration_ms / 1000.0;
    gain.gain().set_value_at_time(VOLUME, start)?;
    gain.gain().exponential_ramp_to_value_at_time(0.0001, end)?;

    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;
    osc.start()?;
    osc.stop_with_when(end)?;
    Ok(())
}
