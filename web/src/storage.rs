use gloo::storage::{LocalStorage, Storage};
use minesnake_core::{GameError, HighScoreStore, Result};

/// High score kept in the browser's `localStorage`.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct LocalStore;

impl HighScoreStore for LocalStore {
    fn get(&self, key: &str) -> Option<u64> {
        LocalStorage::get(key).ok()
    }

    fn set(&mut self, key: &str, value: u64) -> Result<()> {
        LocalStorage::set(key, value).map_err(|err| {
            log::debug!("localStorage write failed: {err}");
            GameError::StorageUnavailable
        })
    }
}
