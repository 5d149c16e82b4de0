use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use apples::*;
pub use effects::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use input::*;
pub use prediction::*;
pub use region::*;
pub use snake::*;
pub use storage::*;
pub use tile::*;
pub use types::*;
pub use world::*;

mod apples;
mod effects;
mod engine;
mod error;
mod generator;
mod input;
mod prediction;
mod region;
mod snake;
mod storage;
mod tile;
mod types;
mod world;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Interval between simulation ticks.
    pub turn_time_ms: u32,
    /// Frame gaps longer than this reset the tick clocks instead of catching up.
    pub max_frame_delta_ms: u32,
    pub queue_capacity: usize,
    /// Frames the death explosion lasts before the game resets.
    pub explosion_frames: u32,
    pub explosion_particles: usize,
    /// Presses of the debug key needed to flip the overlay.
    pub debug_presses: u8,
    pub apple_score: u64,
    pub reveal_effect_ms: u32,
    pub popup_effect_ms: u32,
    /// Visible area in tiles until the renderer reports its own.
    pub view_size: Coord2,
}

impl GameConfig {
    pub fn validate(self) -> Result<Self> {
        if self.turn_time_ms == 0 {
            return Err(GameError::InvalidConfig("turn time must be positive"));
        }
        if self.max_frame_delta_ms < self.turn_time_ms {
            return Err(GameError::InvalidConfig("frame gap limit must cover a whole turn"));
        }
        if self.queue_capacity == 0 {
            return Err(GameError::InvalidConfig("input queue needs room for one turn"));
        }
        if self.debug_presses == 0 {
            return Err(GameError::InvalidConfig("debug toggle needs at least one press"));
        }
        if self.view_size.0 < 1 || self.view_size.1 < 1 {
            return Err(GameError::InvalidConfig("view must be at least one tile"));
        }
        Ok(self)
    }

    pub fn turn_time(&self) -> Duration {
        Duration::from_millis(self.turn_time_ms.into())
    }

    /// Cadence of number derivation, auto reveal and apple spawning.
    pub fn sub_tick_time(&self) -> Duration {
        self.turn_time() / 3
    }

    pub fn max_frame_delta(&self) -> Duration {
        Duration::from_millis(self.max_frame_delta_ms.into())
    }

    pub fn reveal_effect_time(&self) -> Duration {
        Duration::from_millis(self.reveal_effect_ms.into())
    }

    pub fn popup_effect_time(&self) -> Duration {
        Duration::from_millis(self.popup_effect_ms.into())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            turn_time_ms: 200,
            max_frame_delta_ms: 1000,
            queue_capacity: 5,
            explosion_frames: 250,
            explosion_particles: 150,
            debug_presses: 5,
            apple_score: 100,
            reveal_effect_ms: 300,
            popup_effect_ms: 1000,
            view_size: (64, 40),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"turn_time_ms": 150}"#).unwrap();
        assert_eq!(config.turn_time(), Duration::from_millis(150));
        assert_eq!(config.sub_tick_time(), Duration::from_millis(50));
        assert_eq!(config.queue_capacity, 5);
    }

    #[test]
    fn validate_rejects_degenerate_values() {
        let config = GameConfig {
            turn_time_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let config = GameConfig {
            queue_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            max_frame_delta_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = GameConfig {
            max_frame_delta_ms: 200,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(GameConfig::default().validate(), Ok(GameConfig::default()));
    }
}
