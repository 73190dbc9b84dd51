//! Best-score persistence.
//!
//! The store holds a single integer. Anything unreadable counts as "no best
//! score yet" and the value only ever goes up.

use tracing::{info, warn};

use crate::error::{Error, Result};

/// Key-value slot holding the best score.
pub trait ScoreStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> Result<Option<u32>>;
    fn write(&mut self, value: u32) -> Result<()>;
}

/// Parse a persisted best score. Blank input means "absent".
pub fn parse_best_score(raw: &str) -> Result<Option<u32>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| Error::MalformedScore {
            raw: raw.to_string(),
        })
}

/// In-memory store. Keeps the raw text so malformed data can be seeded.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    raw: Option<String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u32) -> Self {
        Self {
            raw: Some(value.to_string()),
            writes: 0,
        }
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            writes: 0,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ScoreStore for MemoryStore {
    fn read(&self) -> Result<Option<u32>> {
        match &self.raw {
            Some(raw) => parse_best_score(raw),
            None => Ok(None),
        }
    }

    fn write(&mut self, value: u32) -> Result<()> {
        self.raw = Some(value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Monotonic best score backed by a [`ScoreStore`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BestScore {
    value: u32,
}

impl BestScore {
    /// Read once at startup. Missing or unreadable data yields 0.
    pub fn load<S: ScoreStore + ?Sized>(store: &S) -> Self {
        let value = match store.read() {
            Ok(v) => v.unwrap_or(0),
            Err(err) => {
                warn!(%err, "ignoring stored best score");
                0
            }
        };
        Self { value }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Raise to `level` if it beats the current best and write through.
    /// A failed write keeps the raised value in memory.
    pub fn offer<S: ScoreStore + ?Sized>(&mut self, level: u32, store: &mut S) -> bool {
        if level <= self.value {
            return false;
        }
        self.value = level;
        info!(best = level, "new best score");
        if let Err(err) = store.write(level) {
            warn!(%err, best = level, "best score not persisted");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn read(&self) -> Result<Option<u32>> {
            Err(Error::StorageUnavailable("no localStorage".into()))
        }
        fn write(&mut self, _value: u32) -> Result<()> {
            Err(Error::StorageWrite("quota exceeded".into()))
        }
    }

    #[test]
    fn test_parse_best_score() {
        assert_eq!(parse_best_score("12").unwrap(), Some(12));
        assert_eq!(parse_best_score(" 7\n").unwrap(), Some(7));
        assert_eq!(parse_best_score("").unwrap(), None);
        assert!(matches!(
            parse_best_score("-3"),
            Err(Error::MalformedScore { .. })
        ));
        assert!(parse_best_score("12abc").is_err());
    }

    #[test]
    fn test_load_defaults() {
        assert_eq!(BestScore::load(&MemoryStore::new()).value(), 0);
        assert_eq!(BestScore::load(&MemoryStore::with_value(9)).value(), 9);
        assert_eq!(BestScore::load(&MemoryStore::with_raw("NaN")).value(), 0);
    }

    #[test]
    fn test_offer_only_raises() {
        let mut store = MemoryStore::with_value(5);
        let mut best = BestScore::load(&store);
        assert!(!best.offer(3, &mut store));
        assert!(!best.offer(5, &mut store));
        assert_eq!(store.writes(), 0);
        assert!(best.offer(6, &mut store));
        assert_eq!(best.value(), 6);
        assert_eq!(store.raw(), Some("6"));
        assert_eq!(store.writes(), 1);
    }

    #[traced_test]
    #[test]
    fn test_broken_store_degrades() {
        let mut store = BrokenStore;
        let mut best = BestScore::load(&store);
        assert_eq!(best.value(), 0);
        assert!(logs_contain("ignoring stored best score"));

        assert!(best.offer(2, &mut store));
        assert_eq!(best.value(), 2);
        assert!(logs_contain("best score not persisted"));
    }
}
