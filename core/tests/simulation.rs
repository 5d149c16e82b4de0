use std::time::Duration;

use minesnake_core::*;

const FRAME: Duration = Duration::from_millis(16);

fn simulation(seed: u64) -> Simulation {
    Simulation::new(GameConfig::default(), seed, MemoryStore::default()).unwrap()
}

fn started(seed: u64) -> Simulation {
    let mut sim = simulation(seed);
    sim.frame(FRAME);
    assert_eq!(
        sim.handle_input(Input::Turn(Direction::Right)),
        InputOutcome::Started
    );
    sim
}

#[test]
fn start_area_is_open_and_mine_free_for_any_seed() {
    for seed in [0, 1, 2, 3, 0xdead_beef, u64::MAX] {
        let mut world = World::new(seed);
        world.get_or_generate(START_REGION);
        for x in 4..12 {
            for y in 4..12 {
                let tile = world.tile((x, y)).unwrap();
                assert!(!tile.is_mine(), "seed {seed}: mine at ({x}, {y})");
                assert!(!tile.is_covered(), "seed {seed}: ({x}, {y}) covered");
            }
        }
    }
}

#[test]
fn negative_coordinates_land_in_negative_regions() {
    assert_eq!(local_of((-1, 3)), (15, 3));
    assert_eq!(region_of((-1, 3)), (-1, 0));

    let mut world = World::new(9);
    world.get_or_generate((-1, 0));
    assert!(world.tile((-1, 3)).is_some());
    assert!(world.tile((0, 3)).is_none());
}

#[test]
fn reversing_right_is_rejected_perpendicular_turns_accepted() {
    let mut sim = started(4);
    assert_eq!(
        sim.handle_input(Input::Turn(Direction::Left)),
        InputOutcome::Queue(QueueOutcome::Reversal)
    );
    assert!(sim.state().prediction().is_empty());
    assert_eq!(
        sim.handle_input(Input::Turn(Direction::Up)),
        InputOutcome::Queue(QueueOutcome::Queued)
    );

    let mut sim = started(4);
    assert_eq!(
        sim.handle_input(Input::Turn(Direction::Down)),
        InputOutcome::Queue(QueueOutcome::Queued)
    );
}

#[test]
fn sixth_queued_turn_is_dropped() {
    let mut sim = started(12);
    let turns = [
        Direction::Up,
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Up,
    ];
    for direction in turns {
        assert_eq!(
            sim.handle_input(Input::Turn(direction)),
            InputOutcome::Queue(QueueOutcome::Queued)
        );
    }

    assert_eq!(
        sim.handle_input(Input::Turn(Direction::Right)),
        InputOutcome::Queue(QueueOutcome::Full)
    );
    let queued: Vec<_> = sim.state().prediction().directions().collect();
    assert_eq!(queued, turns);
}

#[test]
fn numbers_never_change_once_derived() {
    let mut sim = simulation(21);
    for _ in 0..30 {
        sim.frame(FRAME);
    }
    let view = sim.view_bounds();
    let numbers: Vec<_> = view
        .iter()
        .map(|pos| sim.state().world().tile(pos).and_then(Tile::number))
        .collect();
    assert!(numbers.iter().all(Option::is_some));

    for _ in 0..30 {
        sim.frame(FRAME);
    }
    let again: Vec<_> = view
        .iter()
        .map(|pos| sim.state().world().tile(pos).and_then(Tile::number))
        .collect();
    assert_eq!(numbers, again);
}

#[test]
fn open_area_keeps_growing_while_paused() {
    let mut sim = simulation(5);
    sim.frame(FRAME);
    let view = sim.view_bounds();
    let open = |sim: &Simulation| {
        view.iter()
            .filter(|&pos| !sim.state().world().is_covered(pos))
            .count()
    };

    let start = open(&sim);
    for _ in 0..60 {
        sim.frame(FRAME);
    }
    assert!(open(&sim) > start);
    assert_eq!(sim.state().phase(), Phase::Paused);
    assert_eq!(sim.state().snake().head(), (8, 8));
}

#[test]
fn running_game_keeps_snake_connected() {
    let mut sim = started(33);
    let mut longest = sim.state().snake().len();
    for frame in 0..400 {
        if frame % 40 == 0 {
            let turn = [Direction::Up, Direction::Left, Direction::Down, Direction::Right][frame / 40 % 4];
            sim.handle_input(Input::Turn(turn));
        }
        sim.frame(FRAME);
        let snake = sim.state().snake();
        let segments: Vec<_> = snake.segments().collect();
        for pair in segments.windows(2) {
            assert!(Direction::between(pair[0], pair[1]).is_some());
        }
        if sim.state().phase() == Phase::Running {
            assert!(snake.len() >= longest);
        }
        longest = snake.len();
    }
}
