use serde::{Deserialize, Serialize};

/// Single world axis, unbounded in both directions.
pub type Coord = i32;

/// World tile coordinates `(x, y)`, `y` grows downwards.
pub type Coord2 = (Coord, Coord);

/// Region grid coordinates `(rx, ry)`.
pub type RegionCoord = (i32, i32);

/// Offset of a tile inside its region, each axis in `0..REGION_SIZE`.
pub type LocalCoord = (usize, usize);

/// Edge length of a square region, in tiles.
pub const REGION_SIZE: Coord = 16;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for LocalCoord {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0, self.1]
    }
}

/// Region containing `coords`, using floored division so `-1` lands in region `-1`.
pub const fn region_of((x, y): Coord2) -> RegionCoord {
    (x.div_euclid(REGION_SIZE), y.div_euclid(REGION_SIZE))
}

/// Offset of `coords` inside its region, using floored modulo so `-1` maps to `15`.
pub const fn local_of((x, y): Coord2) -> LocalCoord {
    (
        x.rem_euclid(REGION_SIZE) as usize,
        y.rem_euclid(REGION_SIZE) as usize,
    )
}

pub const fn split_coords(coords: Coord2) -> (RegionCoord, LocalCoord) {
    (region_of(coords), local_of(coords))
}

/// World coordinates of the top-left tile of a region.
pub const fn region_origin((rx, ry): RegionCoord) -> Coord2 {
    (rx * REGION_SIZE, ry * REGION_SIZE)
}

pub const fn squared_distance(a: Coord2, b: Coord2) -> i64 {
    let dx = (a.0 - b.0) as i64;
    let dy = (a.1 - b.1) as i64;
    dx * dx + dy * dy
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    pub const fn vector(self) -> Coord2 {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    pub const fn is_reverse_of(self, other: Self) -> bool {
        self as u8 == other.opposite() as u8
    }

    /// Direction of a single orthogonal step `from -> to`, if it is one.
    pub fn between(from: Coord2, to: Coord2) -> Option<Self> {
        let delta = (to.0 - from.0, to.1 - from.1);
        Self::ALL.into_iter().find(|dir| dir.vector() == delta)
    }

    pub const fn step(self, (x, y): Coord2) -> Coord2 {
        let (dx, dy) = self.vector();
        (x + dx, y + dy)
    }
}

/// Half-open rectangle of world tiles, `min` inclusive and `max` exclusive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Coord2,
    pub max: Coord2,
}

impl Bounds {
    pub const fn new(min: Coord2, max: Coord2) -> Self {
        Self { min, max }
    }

    /// Rectangle of `size` tiles with `center` at its middle.
    pub const fn around(center: Coord2, (width, height): Coord2) -> Self {
        let min = (center.0 - width / 2, center.1 - height / 2);
        Self {
            min,
            max: (min.0 + width, min.1 + height),
        }
    }

    pub const fn expand(self, by: Coord) -> Self {
        Self {
            min: (self.min.0 - by, self.min.1 - by),
            max: (self.max.0 + by, self.max.1 + by),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.min.0 >= self.max.0 || self.min.1 >= self.max.1
    }

    pub const fn contains(&self, (x, y): Coord2) -> bool {
        x >= self.min.0 && x < self.max.0 && y >= self.min.1 && y < self.max.1
    }

    pub const fn width(&self) -> Coord {
        self.max.0 - self.min.0
    }

    pub const fn height(&self) -> Coord {
        self.max.1 - self.min.1
    }

    /// Every tile row by row.
    pub fn iter(self) -> impl Iterator<Item = Coord2> {
        (self.min.1..self.max.1).flat_map(move |y| (self.min.0..self.max.0).map(move |x| (x, y)))
    }

    /// Every region overlapping these bounds, row by row.
    pub fn regions(self) -> impl Iterator<Item = RegionCoord> {
        let (rx0, ry0) = region_of(self.min);
        let (rx1, ry1) = region_of((self.max.0 - 1, self.max.1 - 1));
        let (rx1, ry1) = if self.is_empty() {
            (rx0 - 1, ry0 - 1)
        } else {
            (rx1, ry1)
        };
        (ry0..=ry1).flat_map(move |ry| (rx0..=rx1).map(move |rx| (rx, ry)))
    }
}

const DISPLACEMENTS: [(Coord, Coord); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// The 8 neighbours of a tile; the world has no edges so every one exists.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    index: u8,
}

impl NeighborIter {
    pub const fn new(center: Coord2) -> Self {
        Self { center, index: 0 }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        let (dx, dy) = *DISPLACEMENTS.get(usize::from(self.index))?;
        self.index += 1;
        Some((self.center.0 + dx, self.center.1 + dy))
    }
}

pub const fn neighbors(center: Coord2) -> NeighborIter {
    NeighborIter::new(center)
}
