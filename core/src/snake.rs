use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::*;

/// What blocks a forward step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    /// The target tile is still covered.
    Cell,
    /// The target tile is occupied by the snake's own body.
    Snake,
}

/// Classifies a step onto `target`, covered tiles first.
///
/// `body` must already leave out the tail segment that the step would vacate.
pub fn classify_step<G: RegionGenerator>(
    world: &World<G>,
    mut body: impl Iterator<Item = Coord2>,
    target: Coord2,
) -> Option<Collision> {
    if world.is_covered(target) {
        Some(Collision::Cell)
    } else if body.any(|segment| segment == target) {
        Some(Collision::Snake)
    } else {
        None
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    /// Tail first, head last; consecutive segments are one orthogonal step apart.
    segments: VecDeque<Coord2>,
    direction: Direction,
}

impl Snake {
    pub const SPAWN: [Coord2; 3] = [(6, 8), (7, 8), (8, 8)];

    pub fn spawn() -> Self {
        Self {
            segments: Self::SPAWN.into(),
            direction: Direction::Right,
        }
    }

    /// Builds a snake from tail to head. Returns `None` unless the segments form a connected orthogonal chain.
    pub fn from_segments(
        segments: impl IntoIterator<Item = Coord2>,
        direction: Direction,
    ) -> Option<Self> {
        let segments: VecDeque<Coord2> = segments.into_iter().collect();
        if segments.is_empty() {
            return None;
        }
        let connected = segments
            .iter()
            .zip(segments.iter().skip(1))
            .all(|(&a, &b)| Direction::between(a, b).is_some());
        connected.then_some(Self {
            segments,
            direction,
        })
    }

    pub fn head(&self) -> Coord2 {
        self.segments.back().copied().unwrap_or_default()
    }

    pub fn tail(&self) -> Coord2 {
        self.segments.front().copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments from tail to head.
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = Coord2> + ExactSizeIterator + '_ {
        self.segments.iter().copied()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Direction of the last body step, which is what a turn must not reverse.
    pub fn heading(&self) -> Direction {
        let mut rev = self.segments.iter().rev();
        match (rev.next(), rev.next()) {
            (Some(&head), Some(&neck)) => Direction::between(neck, head).unwrap_or(self.direction),
            _ => self.direction,
        }
    }

    pub fn occupies(&self, coords: Coord2) -> bool {
        self.segments.contains(&coords)
    }

    /// Body segments that block a forward step: everything but the tail that is about to move away.
    pub fn blocking_segments(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.segments().skip(1)
    }

    /// Moves the head onto `target`, keeping the tail when `grow` is set.
    pub(crate) fn advance(&mut self, target: Coord2, grow: bool) {
        self.segments.push_back(target);
        if !grow {
            self.segments.pop_front();
        }
    }
}
