use core::time::Duration;

use rand::prelude::*;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the first direction press.
    #[default]
    Paused,
    Running,
    /// Frozen while the death explosion plays.
    Exploding,
}

impl Phase {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    SelfCollision,
    Explosion,
}

/// What a single tick did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    Skipped,
    Moved,
    Ate,
    /// The courtesy turn absorbed a blocked step.
    Bumped(Collision),
    /// A covered tile was uncovered in place.
    Probed { coords: Coord2, bonus: u64 },
    Died(DeathCause),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// The press started a paused game.
    Started,
    Queue(QueueOutcome),
    /// Debug overlay state after the press.
    Debug(bool),
    Ignored,
}

/// Score for probing a covered tile, growing with snake length and distance from the origin.
pub fn probe_bonus(snake_len: usize, (x, y): Coord2) -> u64 {
    let length = snake_len.saturating_sub(1) as u64;
    let distance = u64::from(x.unsigned_abs()) + u64::from(y.unsigned_abs());
    length * distance / REGION_SIZE as u64
}

/// Everything a single run mutates. Replaced wholesale on reset.
#[derive(Clone, Debug)]
pub struct GameState {
    world: World,
    snake: Snake,
    apples: Apples,
    prediction: Prediction,
    effects: Effects,
    explosion: Option<Explosion>,
    phase: Phase,
    courtesy: bool,
    score: u64,
    camera: Coord2,
}

impl GameState {
    pub fn new(seed: u64, config: &GameConfig) -> Self {
        let snake = Snake::spawn();
        let camera = snake.head();
        Self {
            world: World::new(seed),
            snake,
            apples: Apples::new(),
            prediction: Prediction::new(config.queue_capacity),
            effects: Effects::default(),
            explosion: None,
            phase: Phase::Paused,
            courtesy: false,
            score: 0,
            camera,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn apples(&self) -> &Apples {
        &self.apples
    }

    pub fn prediction(&self) -> &Prediction {
        &self.prediction
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn explosion(&self) -> Option<&Explosion> {
        self.explosion.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the last tick used up the courtesy turn.
    pub fn courtesy_pending(&self) -> bool {
        self.courtesy
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn camera(&self) -> Coord2 {
        self.camera
    }

    fn rebuild_prediction(&mut self) {
        let Self {
            world,
            snake,
            apples,
            prediction,
            courtesy,
            ..
        } = self;
        prediction.rebuild(&*world, &*snake, &*apples, *courtesy);
    }
}

/// Fixed-cadence driver owning the game state, fed wall-clock frame deltas and decoded inputs.
#[derive(Clone, Debug)]
pub struct Simulation<S = MemoryStore> {
    config: GameConfig,
    state: GameState,
    rng: SmallRng,
    store: S,
    high_score: u64,
    debug: DebugToggle,
    view_size: Coord2,
    now: Duration,
    since_turn: Duration,
    since_sub_tick: Duration,
    sub_ticks: u64,
}

impl<S: HighScoreStore> Simulation<S> {
    pub fn new(config: GameConfig, seed: u64, store: S) -> Result<Self> {
        let config = config.validate()?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let high_score = store.get(HIGH_SCORE_KEY).unwrap_or(0);
        let world_seed = rng.random();
        log::debug!("Simulation seed {seed}, best score {high_score}");

        Ok(Self {
            config,
            state: GameState::new(world_seed, &config),
            rng,
            store,
            high_score,
            debug: DebugToggle::new(config.debug_presses),
            view_size: config.view_size,
            now: Duration::ZERO,
            since_turn: Duration::ZERO,
            since_sub_tick: Duration::ZERO,
            sub_ticks: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn is_debug(&self) -> bool {
        self.debug.is_enabled()
    }

    /// Time simulated so far, the clock effects are stamped with.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Sub-ticks run so far, across resets.
    pub fn sub_ticks(&self) -> u64 {
        self.sub_ticks
    }

    pub fn set_view_size(&mut self, (width, height): Coord2) {
        self.view_size = (width.max(1), height.max(1));
    }

    /// Tiles visible around the camera.
    pub fn view_bounds(&self) -> Bounds {
        Bounds::around(self.state.camera, self.view_size)
    }

    pub fn handle_input(&mut self, input: Input) -> InputOutcome {
        let direction = match input {
            Input::DebugToggle => {
                if self.debug.press() {
                    log::debug!("Debug overlay {}", self.debug.is_enabled());
                }
                return InputOutcome::Debug(self.debug.is_enabled());
            }
            Input::Turn(direction) => direction,
        };

        match self.state.phase {
            Phase::Exploding => InputOutcome::Ignored,
            Phase::Paused => {
                self.start(direction);
                InputOutcome::Started
            }
            Phase::Running => {
                let GameState {
                    world,
                    snake,
                    apples,
                    prediction,
                    courtesy,
                    ..
                } = &mut self.state;
                let outcome = prediction.push(direction, &*world, &*snake, &*apples, *courtesy);
                InputOutcome::Queue(outcome)
            }
        }
    }

    fn start(&mut self, direction: Direction) {
        let snake = &mut self.state.snake;
        if !direction.is_reverse_of(snake.heading()) {
            snake.set_direction(direction);
        }
        log::info!("Run started heading {:?}", snake.direction());
        self.state.phase = Phase::Running;
        self.since_turn = Duration::ZERO;
        self.state.rebuild_prediction();
    }

    /// Runs one animation frame: world generation, sub-ticks, camera, then as many ticks as are due.
    pub fn frame(&mut self, dt: Duration) {
        let dt = if dt > self.config.max_frame_delta() {
            log::debug!("Frame gap of {dt:?}, not catching up");
            self.since_turn = Duration::ZERO;
            self.since_sub_tick = Duration::ZERO;
            Duration::ZERO
        } else {
            dt
        };
        self.now += dt;

        if self.state.phase == Phase::Exploding {
            self.update_explosion();
            return;
        }

        let view = self.view_bounds();
        self.state.world.ensure_covers(view);

        let sub_tick = self.config.sub_tick_time();
        self.since_sub_tick += dt;
        while self.since_sub_tick >= sub_tick {
            self.since_sub_tick -= sub_tick;
            self.sub_tick(view);
        }

        self.state.camera = self.state.snake.head();
        self.state.effects.prune(
            self.now,
            self.config.reveal_effect_time(),
            self.config.popup_effect_time(),
        );

        if !self.state.phase.is_running() {
            self.since_turn = Duration::ZERO;
            return;
        }
        let turn_time = self.config.turn_time();
        self.since_turn += dt;
        while self.since_turn >= turn_time && self.state.phase.is_running() {
            self.since_turn -= turn_time;
            self.turn_logic();
        }
    }

    /// Derives numbers, spreads open zeros by one ring, and tries to place apples.
    pub fn sub_tick(&mut self, view: Bounds) {
        self.sub_ticks += 1;
        let state = &mut self.state;
        state.world.compute_numbers(view);
        for coords in state.world.auto_reveal(view) {
            state.effects.reveal(coords, self.now);
        }
        let spawned = state.apples.spawn(&state.world, &state.snake, &mut self.rng);
        if !spawned.is_empty() {
            log::trace!("Spawned apples at {spawned:?}");
        }
        state.rebuild_prediction();
    }

    /// Executes one simulation tick.
    pub fn turn_logic(&mut self) -> TurnOutcome {
        if !self.state.phase.is_running() {
            return TurnOutcome::Skipped;
        }

        let direction = self
            .state
            .prediction
            .consume()
            .unwrap_or(self.state.snake.direction());
        self.state.snake.set_direction(direction);
        let target = direction.step(self.state.snake.head());
        let collision = classify_step(
            &self.state.world,
            self.state.snake.blocking_segments(),
            target,
        );

        let outcome = match (collision, self.state.courtesy) {
            (None, _) => {
                self.state.courtesy = false;
                let ate = self.state.apples.remove(target);
                self.state.snake.advance(target, ate);
                if ate {
                    self.award(self.config.apple_score, target);
                    TurnOutcome::Ate
                } else {
                    TurnOutcome::Moved
                }
            }
            (Some(collision), false) => {
                self.state.courtesy = true;
                TurnOutcome::Bumped(collision)
            }
            (Some(Collision::Snake), true) => self.die(DeathCause::SelfCollision),
            (Some(Collision::Cell), true) => {
                self.state.courtesy = false;
                self.state.world.uncover(target);
                self.state.effects.reveal(target, self.now);
                if self.state.world.is_mine(target) {
                    self.die(DeathCause::Explosion)
                } else {
                    let bonus = probe_bonus(self.state.snake.len(), target);
                    self.award(bonus, target);
                    TurnOutcome::Probed {
                        coords: target,
                        bonus,
                    }
                }
            }
        };

        if self.state.phase.is_running() {
            self.state.rebuild_prediction();
        }
        outcome
    }

    fn award(&mut self, amount: u64, coords: Coord2) {
        self.state.score += amount;
        self.state.effects.popup(coords, amount, self.now);

        if self.state.score > self.high_score {
            self.high_score = self.state.score;
            if let Err(err) = self.store.set(HIGH_SCORE_KEY, self.high_score) {
                log::warn!("Could not save high score {}: {err}", self.high_score);
            }
        }
    }

    fn die(&mut self, cause: DeathCause) -> TurnOutcome {
        log::info!("Snake died ({cause:?}) with score {}", self.state.score);
        let explosion = Explosion::new(
            self.state.snake.head(),
            cause,
            self.config.explosion_particles,
            self.config.explosion_frames,
            &mut self.rng,
        );
        self.state.explosion = Some(explosion);
        self.state.phase = Phase::Exploding;
        self.state.prediction.clear();
        TurnOutcome::Died(cause)
    }

    fn update_explosion(&mut self) {
        let finished = match self.state.explosion.as_mut() {
            Some(explosion) => {
                explosion.update();
                explosion.is_finished()
            }
            None => true,
        };
        if finished {
            self.reset();
        }
    }

    /// Starts a fresh run on a new world. The high score carries over.
    pub fn reset(&mut self) {
        let seed = self.rng.random();
        log::info!(
            "New run, last score {}, best {}",
            self.state.score,
            self.high_score
        );
        self.state = GameState::new(seed, &self.config);
        self.since_turn = Duration::ZERO;
        self.since_sub_tick = Duration::ZERO;
    }
}

#[cfg(test)]
impl<S: HighScoreStore> Simulation<S> {
    fn running_with(&mut self, snake: Snake) {
        self.state.world.ensure_covers(self.view_bounds());
        self.state.snake = snake;
        self.state.phase = Phase::Running;
    }
}
