use hashbrown::HashMap;

use crate::*;

/// Unbounded grid of tiles, generated one region at a time and never evicted.
#[derive(Clone, Debug)]
pub struct World<G = RandomRegionGenerator> {
    generator: G,
    regions: HashMap<RegionCoord, Region>,
    generation_order: Vec<RegionCoord>,
}

impl World {
    pub fn new(seed: u64) -> Self {
        Self::with_generator(RandomRegionGenerator::new(seed))
    }
}

impl<G: RegionGenerator> World<G> {
    pub fn with_generator(generator: G) -> Self {
        Self {
            generator,
            regions: HashMap::new(),
            generation_order: Vec::new(),
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn region(&self, coords: RegionCoord) -> Option<&Region> {
        self.regions.get(&coords)
    }

    /// Returns the region at `coords`, generating it on first access.
    pub fn get_or_generate(&mut self, coords: RegionCoord) -> &mut Region {
        let Self {
            generator,
            regions,
            generation_order,
        } = self;
        regions.entry(coords).or_insert_with(|| {
            generation_order.push(coords);
            generator.generate(coords)
        })
    }

    /// Generates every missing region overlapping `bounds` or touching them within one region of margin.
    ///
    /// Returns how many regions were created.
    pub fn ensure_covers(&mut self, bounds: Bounds) -> usize {
        let before = self.regions.len();
        for coords in bounds.expand(REGION_SIZE).regions() {
            self.get_or_generate(coords);
        }
        self.regions.len() - before
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Regions in the order they were generated.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.generation_order
            .iter()
            .filter_map(|coords| self.regions.get(coords))
    }

    pub fn tile(&self, coords: Coord2) -> Option<&Tile> {
        let (region, local) = split_coords(coords);
        self.regions.get(&region).map(|region| &region[local])
    }

    fn tile_slot(&mut self, coords: Coord2) -> Option<&mut Tile> {
        let (region, local) = split_coords(coords);
        self.regions.get_mut(&region).map(|region| &mut region[local])
    }

    /// Tile at `coords`, generating its region if needed.
    pub(crate) fn tile_mut(&mut self, coords: Coord2) -> &mut Tile {
        let (region, local) = split_coords(coords);
        &mut self.get_or_generate(region)[local]
    }

    /// Tiles outside the generated world count as covered.
    pub fn is_covered(&self, coords: Coord2) -> bool {
        self.tile(coords).is_none_or(Tile::is_covered)
    }

    pub fn is_mine(&self, coords: Coord2) -> bool {
        self.tile(coords).is_some_and(Tile::is_mine)
    }

    /// Uncovers a single tile. Returns whether it was covered before.
    pub fn uncover(&mut self, coords: Coord2) -> bool {
        self.tile_mut(coords).uncover()
    }

    /// Number of mines around `coords`, or `None` while any neighbour is still ungenerated.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> Option<u8> {
        neighbors(coords)
            .map(|pos| self.tile(pos).map(|tile| u8::from(tile.is_mine())))
            .sum()
    }

    /// Derives the number of every tile within `bounds` (grown by one tile) that has none yet.
    ///
    /// Numbers that are already set are left alone, so repeated passes are no-ops. Returns how many numbers were
    /// newly derived.
    pub fn compute_numbers(&mut self, bounds: Bounds) -> usize {
        let mut derived = 0;
        for coords in bounds.expand(1).iter() {
            let Some(tile) = self.tile(coords) else {
                continue;
            };
            if tile.number().is_some() {
                continue;
            }

            let number = if tile.is_mine() {
                TileNumber::Mine
            } else {
                match self.adjacent_mine_count(coords) {
                    Some(count) => TileNumber::Count(count),
                    None => continue,
                }
            };

            if let Some(tile) = self.tile_slot(coords) {
                if tile.derive_number(number) {
                    derived += 1;
                }
            }
        }
        derived
    }

    /// One step of flood reveal: uncovers every covered safe tile in `bounds` next to an open zero.
    ///
    /// Candidates are collected before any tile is uncovered, so a single call spreads the open area by at most one
    /// tile. Returns the tiles uncovered by this step.
    pub fn auto_reveal(&mut self, bounds: Bounds) -> Vec<Coord2> {
        let spread: Vec<Coord2> = bounds
            .iter()
            .filter(|&coords| {
                self.tile(coords)
                    .is_some_and(|tile| tile.is_covered() && !tile.is_mine())
            })
            .filter(|&coords| {
                neighbors(coords).any(|pos| self.tile(pos).is_some_and(Tile::is_open_zero))
            })
            .collect();

        for &coords in &spread {
            if let Some(tile) = self.tile_slot(coords) {
                tile.uncover();
            }
        }
        spread
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Regions with mines only at the listed world coordinates, everything covered.
    struct FixedMines(Vec<Coord2>, Vec<Coord2>);

    impl RegionGenerator for FixedMines {
        fn generate(&self, coords: RegionCoord) -> Region {
            let origin = region_origin(coords);
            Region::from_fn(coords, |(lx, ly)| {
                let pos = (origin.0 + lx as Coord, origin.1 + ly as Coord);
                if self.1.contains(&pos) {
                    Tile::open()
                } else {
                    Tile::covered(self.0.contains(&pos))
                }
            })
        }
    }

    fn world(mines: &[Coord2], open: &[Coord2]) -> World<FixedMines> {
        World::with_generator(FixedMines(mines.to_vec(), open.to_vec()))
    }

    #[test]
    fn get_or_generate_is_idempotent() {
        let mut world = World::new(99);
        let first = world.get_or_generate((2, -3)).clone();
        world.uncover((32, -48));
        assert_eq!(world.region_count(), 1);
        let again = world.get_or_generate((2, -3));
        assert_eq!(again.coords(), first.coords());
        assert!(!again[(0, 0)].is_covered());
        assert_eq!(world.region_count(), 1);
    }

    #[test]
    fn ensure_covers_adds_one_region_margin() {
        let mut world = World::new(1);
        let created = world.ensure_covers(Bounds::new((0, 0), (16, 16)));
        assert_eq!(created, 9);
        assert!(world.region((-1, -1)).is_some());
        assert!(world.region((1, 1)).is_some());
        assert_eq!(world.ensure_covers(Bounds::new((0, 0), (16, 16))), 0);
    }

    #[test]
    fn regions_iterate_in_generation_order() {
        let mut world = World::new(5);
        for coords in [(4, 4), (-1, 0), (0, 7)] {
            world.get_or_generate(coords);
        }
        let order: Vec<_> = world.regions().map(Region::coords).collect();
        assert_eq!(order, [(4, 4), (-1, 0), (0, 7)]);
    }

    #[test]
    fn negative_tile_lookup_resolves_to_last_local_tile() {
        let mut world = world(&[(-1, -1)], &[]);
        world.get_or_generate((-1, -1));
        assert!(world.is_mine((-1, -1)));
        assert!(world.region((-1, -1)).is_some_and(|region| region[(15, 15)].is_mine()));
    }

    #[test]
    fn numbers_count_mines_across_region_borders() {
        let mines = [(-1, -1), (0, -1), (1, 1)];
        let mut world = world(&mines, &[]);
        let view = Bounds::new((0, 0), (2, 2));
        world.ensure_covers(view);

        world.compute_numbers(view);

        assert_eq!(world.tile((0, 0)).and_then(Tile::number), Some(TileNumber::Count(3)));
        assert_eq!(world.tile((1, 1)).and_then(Tile::number), Some(TileNumber::Mine));
        assert_eq!(world.tile((-1, -1)).and_then(Tile::number), Some(TileNumber::Mine));
        assert_eq!(world.tile((5, 5)).and_then(Tile::number), None);
    }

    #[test]
    fn numbers_are_idempotent() {
        let mut world = World::new(42);
        let view = Bounds::new((-20, -20), (20, 20));
        world.ensure_covers(view);

        let first = world.compute_numbers(view);
        let snapshot: Vec<_> = view.iter().map(|pos| world.tile(pos).copied()).collect();
        assert!(first > 0);
        assert_eq!(world.compute_numbers(view), 0);
        let again: Vec<_> = view.iter().map(|pos| world.tile(pos).copied()).collect();
        assert_eq!(snapshot, again);
    }

    #[test]
    fn numbers_wait_for_ungenerated_neighbors() {
        let mut world = world(&[], &[]);
        world.get_or_generate((0, 0));

        world.compute_numbers(Bounds::new((0, 0), (16, 16)));

        assert_eq!(world.tile((0, 0)).and_then(Tile::number), None);
        assert_eq!(world.tile((15, 15)).and_then(Tile::number), None);
        assert_eq!(world.tile((1, 1)).and_then(Tile::number), Some(TileNumber::Count(0)));
    }

    #[test]
    fn auto_reveal_spreads_one_ring_per_step() {
        let mut world = world(&[(5, 0)], &[(0, 0)]);
        let view = Bounds::new((0, 0), (4, 1));
        world.ensure_covers(view);
        world.compute_numbers(view);

        assert_eq!(world.auto_reveal(view), [(1, 0)]);
        world.compute_numbers(view);
        assert_eq!(world.auto_reveal(view), [(2, 0)]);
        assert_eq!(world.auto_reveal(view), [(3, 0)]);
        // (4, 0) borders the mine so the spread stops there
        assert_eq!(world.auto_reveal(Bounds::new((0, 0), (6, 1))), [(4, 0)]);
        assert!(world.auto_reveal(Bounds::new((0, 0), (6, 1))).is_empty());
        assert!(world.is_covered((5, 0)));
    }
}
