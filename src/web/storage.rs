//! `window.localStorage` backed best-score slot.

use web_sys::{Storage, Window};

use crate::error::{Error, Result};
use crate::score::{ScoreStore, parse_best_score};

pub struct LocalStorageStore {
    storage: Option<Storage>,
    key: String,
}

impl LocalStorageStore {
    /// Storage can be missing (privacy mode, sandboxed iframes); reads then
    /// fail and the best score starts at 0.
    pub fn new(win: &Window, key: impl Into<String>) -> Self {
        Self {
            storage: win.local_storage().ok().flatten(),
            key: key.into(),
        }
    }

    fn storage(&self) -> Result<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| Error::StorageUnavailable("localStorage disabled".into()))
    }
}

impl ScoreStore for LocalStorageStore {
    fn read(&self) -> Result<Option<u32>> {
        let raw = self
            .storage()?
            .get_item(&self.key)
            .map_err(|e| Error::StorageUnavailable(format!("{e:?}")))?;
        match raw {
            Some(raw) => parse_best_score(&raw),
            None => Ok(None),
        }
    }

    fn write(&mut self, value: u32) -> Result<()> {
        self.storage()?
            .set_item(&self.key, &value.to_string())
            .map_err(|e| Error::StorageWrite(format!("{e:?}")))
    }
}
