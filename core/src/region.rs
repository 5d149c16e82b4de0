use core::ops::{Index, IndexMut};
use ndarray::Array2;

use crate::*;

/// A `REGION_SIZE`² block of tiles. Which tiles exist never changes after
/// generation, only their coverage and derived numbers do.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    coords: RegionCoord,
    tiles: Array2<Tile>,
}

impl Region {
    pub fn from_fn(coords: RegionCoord, mut tile_at: impl FnMut(LocalCoord) -> Tile) -> Self {
        let size = REGION_SIZE as usize;
        Self {
            coords,
            tiles: Array2::from_shape_fn((size, size), |local| tile_at(local)),
        }
    }

    pub fn coords(&self) -> RegionCoord {
        self.coords
    }

    pub fn origin(&self) -> Coord2 {
        region_origin(self.coords)
    }

    pub fn mine_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_mine()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LocalCoord, &Tile)> {
        self.tiles.indexed_iter()
    }
}

impl Index<LocalCoord> for Region {
    type Output = Tile;

    fn index(&self, local: LocalCoord) -> &Self::Output {
        &self.tiles[local.to_nd_index()]
    }
}

impl IndexMut<LocalCoord> for Region {
    fn index_mut(&mut self, local: LocalCoord) -> &mut Self::Output {
        &mut self.tiles[local.to_nd_index()]
    }
}
