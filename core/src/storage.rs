use hashbrown::HashMap;

use crate::*;

/// Key the best score is persisted under.
pub const HIGH_SCORE_KEY: &str = "minesnake.highscore";

/// Where the best score survives between sessions.
pub trait HighScoreStore {
    fn get(&self, key: &str) -> Option<u64>;
    fn set(&mut self, key: &str, value: u64) -> Result<()>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: HashMap<String, u64>,
}

impl HighScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<u64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: u64) -> Result<()> {
        self.values.insert(key.into(), value);
        Ok(())
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for &mut S {
    fn get(&self, key: &str) -> Option<u64> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: u64) -> Result<()> {
        (**self).set(key, value)
    }
}
