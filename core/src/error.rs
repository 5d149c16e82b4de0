use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("High score storage is unavailable")]
    StorageUnavailable,
}

pub type Result<T> = core::result::Result<T, GameError>;
