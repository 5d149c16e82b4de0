use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Chance that a tile becomes a mine, measured from the center of its own region.
///
/// Every region therefore has the same density pattern: slightly safer towards
/// its middle, denser towards its edges.
pub fn mine_probability((x, y): LocalCoord) -> f64 {
    let center = (REGION_SIZE as f64 - 1.0) / 2.0;
    let dist = (x as f64 - center).hypot(y as f64 - center);
    let falloff = 1.0 + (-dist / (4.0 * REGION_SIZE as f64)).exp();
    1.0 / (3.0 * falloff.powi(3))
}

/// Generation strategy placing each mine independently, with a seeded stream per region so that the contents of a
/// region do not depend on the order regions were requested in.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomRegionGenerator {
    seed: u64,
}

impl RandomRegionGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn region_seed(&self, (rx, ry): RegionCoord) -> u64 {
        let packed = (u64::from(rx as u32) << 32) | u64::from(ry as u32);
        splitmix64(self.seed ^ splitmix64(packed))
    }
}

impl RegionGenerator for RandomRegionGenerator {
    fn generate(&self, coords: RegionCoord) -> Region {
        let mut rng = SmallRng::seed_from_u64(self.region_seed(coords));
        let is_start = coords == START_REGION;

        let region = Region::from_fn(coords, |local| {
            let mine = rng.random_bool(mine_probability(local));
            if is_start && in_start_area(local) {
                Tile::open()
            } else {
                Tile::covered(mine)
            }
        });

        log::trace!(
            "Generated region {:?} with {} mines",
            coords,
            region.mine_count()
        );
        region
    }
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
