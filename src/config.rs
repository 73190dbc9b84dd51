//! Game tuning. All durations are milliseconds.

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Pause between "Get ready..." and the first round.
    pub start_delay_ms: u64,
    /// Spacing of signals during playback.
    pub step_interval_ms: u64,
    /// Extra wait after the last played signal before input opens.
    pub settle_delay_ms: u64,
    /// Pause after a forgiven mistake before the replay starts.
    pub repeat_delay_ms: u64,
    /// Pause after a completed round before the sequence grows.
    pub advance_delay_ms: u64,
    /// Initial strict mode; can be toggled at runtime.
    pub strict_mode: bool,
    /// Storage key for the persisted best score.
    pub best_score_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 350,
            step_interval_ms: 620,
            settle_delay_ms: 120,
            repeat_delay_ms: 850,
            advance_delay_ms: 780,
            strict_mode: false,
            best_score_key: "simonHighScore".to_string(),
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Time from the start of a playback until input opens.
    pub fn playback_duration_ms(&self, len: usize) -> u64 {
        len as u64 * self.step_interval_ms + self.settle_delay_ms
    }
}
