//! Crate error type.
//!
//! Nothing in here ever reaches the player: the engine logs store failures and
//! keeps going, and the browser layer converts to `JsValue` at the boundary.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown signal: '{0}'")]
    UnknownSignal(String),

    #[error("Score storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Malformed best score: '{raw}'")]
    MalformedScore { raw: String },

    #[error("Failed to write best score: {0}")]
    StorageWrite(String),

    #[cfg(feature = "serde_json")]
    #[error("Invalid game config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
