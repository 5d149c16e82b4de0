use hashbrown::HashSet;
use rand::prelude::*;
use rand::rngs::SmallRng;

use crate::*;

/// Apples may not spawn within this squared distance of the head.
pub const APPLE_HEAD_CLEARANCE_SQ: i64 = 64;

/// Apples keep at least this squared distance from each other.
pub const APPLE_SPACING_SQ: i64 = 1024;

/// Chance to accept a sampled tile that is still covered.
pub const COVERED_APPLE_CHANCE: f64 = 0.9;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Apples {
    positions: HashSet<Coord2>,
}

impl Apples {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.positions.contains(&coords)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.positions.iter().copied()
    }

    pub(crate) fn insert(&mut self, coords: Coord2) -> bool {
        self.positions.insert(coords)
    }

    pub(crate) fn remove(&mut self, coords: Coord2) -> bool {
        self.positions.remove(&coords)
    }

    fn is_spaced_from_all(&self, coords: Coord2) -> bool {
        self.positions
            .iter()
            .all(|&apple| squared_distance(apple, coords) > APPLE_SPACING_SQ)
    }

    /// Samples one random tile per generated region and keeps the ones that qualify as apples.
    ///
    /// A rejected sample is not retried. Returns the newly placed apples.
    pub fn spawn<G: RegionGenerator>(
        &mut self,
        world: &World<G>,
        snake: &Snake,
        rng: &mut SmallRng,
    ) -> Vec<Coord2> {
        let head = snake.head();
        let mut spawned = Vec::new();

        for region in world.regions() {
            let local = (
                rng.random_range(0..REGION_SIZE as usize),
                rng.random_range(0..REGION_SIZE as usize),
            );
            let tile = region[local];
            let origin = region.origin();
            let coords = (origin.0 + local.0 as Coord, origin.1 + local.1 as Coord);

            if tile.is_mine() {
                continue;
            }
            if tile.is_covered() && !rng.random_bool(COVERED_APPLE_CHANCE) {
                continue;
            }
            if squared_distance(coords, head) <= APPLE_HEAD_CLEARANCE_SQ
                || snake.occupies(coords)
                || !self.is_spaced_from_all(coords)
            {
                continue;
            }

            self.insert(coords);
            spawned.push(coords);
        }

        spawned
    }
}
