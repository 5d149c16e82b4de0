use crate::*;
pub use random::*;

mod random;

pub trait RegionGenerator {
    fn generate(&self, coords: RegionCoord) -> Region;
}

/// The region the snake spawns in.
pub const START_REGION: RegionCoord = (0, 0);

/// Edge length of the mine-free, pre-revealed square centered in the start region.
pub const START_AREA_SIZE: usize = 8;

pub const fn in_start_area((x, y): LocalCoord) -> bool {
    let lo = (REGION_SIZE as usize - START_AREA_SIZE) / 2;
    let hi = lo + START_AREA_SIZE;
    x >= lo && x < hi && y >= lo && y < hi
}
