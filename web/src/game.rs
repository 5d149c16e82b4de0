use std::time::Duration;

use minesnake_core::{Coord2, GameConfig, Input, Phase, ProjectedState, Simulation, TileNumber};
use wasm_bindgen::prelude::*;

use crate::storage::LocalStore;
use crate::utils::js_random_seed;

/// Tile codes returned by [`WebGame::tiles`].
const TILE_UNKNOWN: i8 = -3;
const TILE_COVERED: i8 = -2;
const TILE_MINE: i8 = -1;

fn flatten(points: impl Iterator<Item = Coord2>) -> Vec<i32> {
    points.flat_map(|(x, y)| [x, y]).collect()
}

/// The simulation as seen from the JavaScript renderer: it feeds frames and key codes in and reads flat arrays
/// back out.
#[wasm_bindgen]
pub struct WebGame {
    sim: Simulation<LocalStore>,
    last_timestamp: Option<f64>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebGame, JsError> {
        let seed = crate::Args::from_location()
            .seed
            .unwrap_or_else(js_random_seed);
        let sim = Simulation::new(GameConfig::default(), seed, LocalStore)?;
        Ok(Self {
            sim,
            last_timestamp: None,
        })
    }

    /// Advances the game to the `requestAnimationFrame` timestamp, in milliseconds.
    pub fn frame(&mut self, timestamp: f64) {
        let elapsed = self
            .last_timestamp
            .map_or(0.0, |last| (timestamp - last).max(0.0));
        self.last_timestamp = Some(timestamp);
        self.sim.frame(Duration::from_secs_f64(elapsed / 1000.0));
    }

    /// Feeds a `KeyboardEvent.code`; returns whether the key belongs to the game.
    pub fn key_down(&mut self, code: &str) -> bool {
        match Input::from_key(code) {
            Some(input) => {
                let outcome = self.sim.handle_input(input);
                log::trace!("{code} -> {outcome:?}");
                true
            }
            None => false,
        }
    }

    pub fn resize(&mut self, cols: i32, rows: i32) {
        self.sim.set_view_size((cols, rows));
    }

    /// `[min_x, min_y, width, height]` of the visible tiles.
    pub fn view(&self) -> Vec<i32> {
        let view = self.sim.view_bounds();
        vec![view.min.0, view.min.1, view.width(), view.height()]
    }

    /// Visible tiles row by row: a mine count, or one of the negative codes.
    pub fn tiles(&self) -> Vec<i8> {
        let world = self.sim.state().world();
        self.sim
            .view_bounds()
            .iter()
            .map(|pos| match world.tile(pos) {
                None => TILE_UNKNOWN,
                Some(tile) if tile.is_covered() => TILE_COVERED,
                Some(tile) => match tile.number() {
                    Some(TileNumber::Mine) => TILE_MINE,
                    Some(TileNumber::Count(count)) => count as i8,
                    None => TILE_UNKNOWN,
                },
            })
            .collect()
    }

    /// Snake segments, tail first, as `[x0, y0, x1, y1, ..]`.
    pub fn snake(&self) -> Vec<i32> {
        flatten(self.sim.state().snake().segments())
    }

    pub fn apples(&self) -> Vec<i32> {
        flatten(self.sim.state().apples().iter())
    }

    pub fn score(&self) -> f64 {
        self.sim.score() as f64
    }

    pub fn high_score(&self) -> f64 {
        self.sim.high_score() as f64
    }

    /// 0 paused, 1 running, 2 exploding.
    pub fn phase(&self) -> u8 {
        match self.sim.state().phase() {
            Phase::Paused => 0,
            Phase::Running => 1,
            Phase::Exploding => 2,
        }
    }

    pub fn is_debug(&self) -> bool {
        self.sim.is_debug()
    }

    /// Reveal effects as `[x, y, age_ms, ..]`.
    pub fn reveals(&self) -> Vec<f64> {
        let now = self.sim.now();
        self.sim
            .state()
            .effects()
            .reveals()
            .iter()
            .flat_map(|effect| {
                let age = now.saturating_sub(effect.started_at).as_secs_f64() * 1000.0;
                [effect.coords.0 as f64, effect.coords.1 as f64, age]
            })
            .collect()
    }

    /// Score popups as `[x, y, amount, age_ms, ..]`.
    pub fn popups(&self) -> Vec<f64> {
        let now = self.sim.now();
        self.sim
            .state()
            .effects()
            .popups()
            .iter()
            .flat_map(|popup| {
                let age = now.saturating_sub(popup.started_at).as_secs_f64() * 1000.0;
                [
                    popup.coords.0 as f64,
                    popup.coords.1 as f64,
                    popup.amount as f64,
                    age,
                ]
            })
            .collect()
    }

    /// Explosion particles as `[x, y, alpha, ..]`, empty unless exploding.
    pub fn particles(&self) -> Vec<f64> {
        self.sim
            .state()
            .explosion()
            .map(|explosion| {
                explosion
                    .particles()
                    .iter()
                    .flat_map(|p| [p.x, p.y, p.alpha])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Speculative segments beyond the real head, for the debug overlay.
    pub fn extra_snake(&self) -> Vec<i32> {
        flatten(self.sim.state().prediction().extra_snake())
    }

    pub fn tail_sans(&self) -> usize {
        self.sim.state().prediction().tail_sans()
    }

    /// 0 move, 1 courtesy, 2 break.
    pub fn projected_state(&self) -> u8 {
        match self.sim.state().prediction().state() {
            ProjectedState::Move => 0,
            ProjectedState::Courtesy => 1,
            ProjectedState::Break => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_flatten_pairwise() {
        assert_eq!(flatten([(1, 2), (-3, 4)].into_iter()), vec![1, 2, -3, 4]);
        assert!(flatten(std::iter::empty()).is_empty());
    }
}
