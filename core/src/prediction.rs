use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::*;

/// Speculative outcome of one forward step of the virtual snake.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectedState {
    /// The path is clear.
    Move,
    /// The step would bump for the first time and use the courtesy turn.
    Courtesy,
    /// The step would bump with the courtesy turn already spent.
    Break,
}

/// A queued direction change together with what it is expected to do once the simulation reaches it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTurn {
    pub direction: Direction,
    pub outcome: ProjectedState,
    /// Segment the step adds to the virtual snake, if it moves at all.
    pub segment: Option<Coord2>,
    /// Whether the step also drops the virtual tail; an apple keeps it.
    pub pops_tail: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QueueOutcome {
    Queued,
    /// The turn would reverse the virtual snake onto itself.
    Reversal,
    /// The queue is at capacity, the press is dropped.
    Full,
}

/// Mutable copy of the snake used to play queued turns forward without touching the real game.
struct Projector {
    body: VecDeque<Coord2>,
    courtesy: bool,
}

impl Projector {
    fn new(snake: &Snake, courtesy: bool) -> Self {
        Self {
            body: snake.segments().collect(),
            courtesy,
        }
    }

    fn head(&self) -> Option<Coord2> {
        self.body.back().copied()
    }

    fn classify<G: RegionGenerator>(
        &self,
        direction: Direction,
        world: &World<G>,
    ) -> (ProjectedState, Coord2) {
        let target = direction.step(self.head().unwrap_or_default());
        let collision = classify_step(world, self.body.iter().copied().skip(1), target);
        let state = match collision {
            None => ProjectedState::Move,
            Some(_) if !self.courtesy => ProjectedState::Courtesy,
            Some(_) => ProjectedState::Break,
        };
        (state, target)
    }

    fn step<G: RegionGenerator>(
        &mut self,
        direction: Direction,
        world: &World<G>,
        apples: &Apples,
    ) -> PendingTurn {
        let (outcome, target) = self.classify(direction, world);
        let mut turn = PendingTurn {
            direction,
            outcome,
            segment: None,
            pops_tail: false,
        };
        match outcome {
            ProjectedState::Move => {
                turn.segment = Some(target);
                turn.pops_tail = !apples.contains(target);
                self.body.push_back(target);
                if turn.pops_tail {
                    self.body.pop_front();
                }
                self.courtesy = false;
            }
            ProjectedState::Courtesy => self.courtesy = true,
            ProjectedState::Break => self.courtesy = false,
        }
        turn
    }
}

/// Direction changes queued between ticks, replayed against the current world to show where the snake is about
/// to go.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    capacity: usize,
    pending: VecDeque<PendingTurn>,
    /// Real tail segments hidden because queued moves will have popped them.
    tail_sans: usize,
    state: ProjectedState,
}

impl Prediction {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            pending: VecDeque::with_capacity(capacity),
            tail_sans: 0,
            state: ProjectedState::Move,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.pending.len() >= self.capacity
    }

    /// Queued turns, the next to run first.
    pub fn pending(&self) -> impl Iterator<Item = &PendingTurn> {
        self.pending.iter()
    }

    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.pending.iter().map(|turn| turn.direction)
    }

    /// Segments the queued turns add in front of the real head.
    pub fn extra_snake(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.pending.iter().filter_map(|turn| turn.segment)
    }

    pub fn tail_sans(&self) -> usize {
        self.tail_sans
    }

    /// Outcome of one more forward step past the last queued turn.
    pub fn state(&self) -> ProjectedState {
        self.state
    }

    /// The snake as it will look once every queued turn has run, tail first.
    pub fn virtual_snake<'a>(&'a self, snake: &'a Snake) -> impl Iterator<Item = Coord2> + 'a {
        snake.segments().chain(self.extra_snake()).skip(self.tail_sans)
    }

    /// Direction the virtual snake's last segment points, which a new turn must not reverse.
    pub fn from_dir(&self, snake: &Snake) -> Direction {
        let mut segments: Vec<Coord2> = self.virtual_snake(snake).collect();
        let head = segments.pop();
        let neck = segments.pop();
        head.zip(neck)
            .and_then(|(head, neck)| Direction::between(neck, head))
            .unwrap_or_else(|| snake.heading())
    }

    /// Validates and queues a direction change, then re-projects the whole queue.
    pub fn push<G: RegionGenerator>(
        &mut self,
        direction: Direction,
        world: &World<G>,
        snake: &Snake,
        apples: &Apples,
        courtesy: bool,
    ) -> QueueOutcome {
        if self.is_full() {
            log::debug!("Input queue full, dropped {direction:?}");
            return QueueOutcome::Full;
        }
        if direction.is_reverse_of(self.from_dir(snake)) {
            log::debug!("Rejected reversing turn {direction:?}");
            return QueueOutcome::Reversal;
        }

        self.pending.push_back(PendingTurn {
            direction,
            outcome: ProjectedState::Move,
            segment: None,
            pops_tail: false,
        });
        self.rebuild(world, snake, apples, courtesy);
        QueueOutcome::Queued
    }

    /// Removes the next turn for the simulation to execute along with its speculative segment.
    pub(crate) fn consume(&mut self) -> Option<Direction> {
        let turn = self.pending.pop_front()?;
        if turn.pops_tail {
            self.tail_sans = self.tail_sans.saturating_sub(1);
        }
        Some(turn.direction)
    }

    /// Replays the queued directions against the current snake and world.
    ///
    /// Run after every real tick and world change so the projection never drifts from the simulation.
    pub(crate) fn rebuild<G: RegionGenerator>(
        &mut self,
        world: &World<G>,
        snake: &Snake,
        apples: &Apples,
        courtesy: bool,
    ) {
        let mut projector = Projector::new(snake, courtesy);
        self.tail_sans = 0;
        for turn in self.pending.iter_mut() {
            *turn = projector.step(turn.direction, world, apples);
            if turn.pops_tail {
                self.tail_sans += 1;
            }
        }

        let next = self
            .pending
            .back()
            .map(|turn| turn.direction)
            .unwrap_or_else(|| snake.direction());
        self.state = projector.classify(next, world).0;
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
        self.tail_sans = 0;
        self.state = ProjectedState::Move;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_world() -> World {
        let mut world = World::new(8);
        world.ensure_covers(Bounds::new((0, 0), (16, 16)));
        world
    }

    fn push(
        prediction: &mut Prediction,
        world: &World,
        snake: &Snake,
        direction: Direction,
    ) -> QueueOutcome {
        prediction.push(direction, world, snake, &Apples::new(), false)
    }

    #[test]
    fn reversal_is_rejected_and_perpendicular_accepted() {
        let world = open_world();
        let snake = Snake::spawn();

        let mut prediction = Prediction::new(5);
        assert_eq!(push(&mut prediction, &world, &snake, Direction::Left), QueueOutcome::Reversal);
        assert!(prediction.is_empty());
        assert_eq!(push(&mut prediction, &world, &snake, Direction::Up), QueueOutcome::Queued);

        let mut prediction = Prediction::new(5);
        assert_eq!(push(&mut prediction, &world, &snake, Direction::Down), QueueOutcome::Queued);
        assert_eq!(prediction.directions().collect::<Vec<_>>(), [Direction::Down]);
    }

    #[test]
    fn reversal_checks_against_last_queued_turn() {
        let world = open_world();
        let snake = Snake::spawn();
        let mut prediction = Prediction::new(5);

        assert_eq!(push(&mut prediction, &world, &snake, Direction::Up), QueueOutcome::Queued);
        assert_eq!(prediction.from_dir(&snake), Direction::Up);
        // Left is fine after Up even though the real snake still faces right
        assert_eq!(push(&mut prediction, &world, &snake, Direction::Left), QueueOutcome::Queued);
        assert_eq!(push(&mut prediction, &world, &snake, Direction::Right), QueueOutcome::Reversal);
        assert_eq!(prediction.len(), 2);
    }

    #[test]
    fn sixth_press_is_dropped() {
        let world = open_world();
        let snake = Snake::spawn();
        let mut prediction = Prediction::new(5);
        let turns = [
            Direction::Up,
            Direction::Right,
            Direction::Up,
            Direction::Right,
            Direction::Down,
        ];
        for dir in turns {
            assert_eq!(push(&mut prediction, &world, &snake, dir), QueueOutcome::Queued);
        }

        assert_eq!(push(&mut prediction, &world, &snake, Direction::Right), QueueOutcome::Full);
        assert_eq!(prediction.directions().collect::<Vec<_>>(), turns);
    }

    #[test]
    fn extra_snake_tracks_queued_moves() {
        let world = open_world();
        let snake = Snake::spawn();
        let mut prediction = Prediction::new(5);

        push(&mut prediction, &world, &snake, Direction::Up);
        push(&mut prediction, &world, &snake, Direction::Up);

        assert_eq!(prediction.extra_snake().collect::<Vec<_>>(), [(8, 7), (8, 6)]);
        assert_eq!(prediction.tail_sans(), 2);
        assert_eq!(
            prediction.virtual_snake(&snake).collect::<Vec<_>>(),
            [(8, 8), (8, 7), (8, 6)]
        );
        assert_eq!(prediction.state(), ProjectedState::Move);
    }

    #[test]
    fn consume_drops_matching_segment() {
        let world = open_world();
        let mut snake = Snake::spawn();
        let apples = Apples::new();
        let mut prediction = Prediction::new(5);
        push(&mut prediction, &world, &snake, Direction::Up);
        push(&mut prediction, &world, &snake, Direction::Left);

        let direction = prediction.consume();
        assert_eq!(direction, Some(Direction::Up));
        assert_eq!(prediction.tail_sans(), 1);
        snake.advance(Direction::Up.step(snake.head()), false);
        prediction.rebuild(&world, &snake, &apples, false);

        assert_eq!(prediction.extra_snake().collect::<Vec<_>>(), [(7, 7)]);
        assert_eq!(prediction.tail_sans(), 1);
        assert_eq!(
            prediction.virtual_snake(&snake).collect::<Vec<_>>(),
            [(8, 8), (8, 7), (7, 7)]
        );
    }

    #[test]
    fn covered_tile_projects_courtesy_then_break() {
        let world = open_world();
        // head at (11, 8), (12, 8) lies outside the start area and is covered
        let snake = Snake::from_segments([(9, 8), (10, 8), (11, 8)], Direction::Right).unwrap();
        let mut prediction = Prediction::new(5);

        prediction.rebuild(&world, &snake, &Apples::new(), false);
        assert_eq!(prediction.state(), ProjectedState::Courtesy);

        push(&mut prediction, &world, &snake, Direction::Right);
        let turn = prediction.pending().next().copied().unwrap();
        assert_eq!(turn.outcome, ProjectedState::Courtesy);
        assert_eq!(turn.segment, None);
        assert_eq!(prediction.tail_sans(), 0);
        assert_eq!(prediction.state(), ProjectedState::Break);

        prediction.rebuild(&world, &snake, &Apples::new(), true);
        assert_eq!(prediction.pending().next().map(|turn| turn.outcome), Some(ProjectedState::Break));
    }

    #[test]
    fn apple_keeps_virtual_tail() {
        let world = open_world();
        let snake = Snake::spawn();
        let mut apples = Apples::new();
        apples.insert((9, 8));
        let mut prediction = Prediction::new(5);

        prediction.push(Direction::Right, &world, &snake, &apples, false);

        assert_eq!(prediction.tail_sans(), 0);
        assert_eq!(prediction.virtual_snake(&snake).count(), 4);
    }
}
