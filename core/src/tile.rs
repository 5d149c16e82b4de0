use serde::{Deserialize, Serialize};

/// Derived adjacency number of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileNumber {
    /// The tile is itself a mine, never shown.
    Mine,
    /// Count of mines among the 8 neighbours.
    Count(u8),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    mine: bool,
    covered: bool,
    number: Option<TileNumber>,
}

impl Tile {
    pub const fn covered(mine: bool) -> Self {
        Self {
            mine,
            covered: true,
            number: None,
        }
    }

    /// Mine-free tile that starts out revealed.
    pub const fn open() -> Self {
        Self {
            mine: false,
            covered: false,
            number: None,
        }
    }

    pub const fn is_mine(&self) -> bool {
        self.mine
    }

    pub const fn is_covered(&self) -> bool {
        self.covered
    }

    pub const fn number(&self) -> Option<TileNumber> {
        self.number
    }

    pub const fn is_open_zero(&self) -> bool {
        !self.covered && matches!(self.number, Some(TileNumber::Count(0)))
    }

    /// Returns whether the tile was covered before.
    pub(crate) fn uncover(&mut self) -> bool {
        core::mem::replace(&mut self.covered, false)
    }

    /// Sets the number once; later calls never overwrite it.
    pub(crate) fn derive_number(&mut self, number: TileNumber) -> bool {
        if self.number.is_some() {
            return false;
        }
        self.number = Some(number);
        true
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::covered(false)
    }
}
