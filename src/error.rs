//! Centralized error types for the chase engine.
//!
//! Most failures inside a running session are recovered locally and only logged; the types
//! here cover what is surfaced to the host (configuration, setup during `start()`) and what
//! collaborators report back to the engine.

/// Main error type for the chase engine.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Presentation error: {0}")]
    Presentation(#[from] PresentationError),

    #[error("Leaderboard error: {0}")]
    Leaderboard(#[from] LeaderboardError),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Collectible error: {0}")]
    Collectible(#[from] CollectibleError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Errors raised while loading or validating [`crate::config::GameConfig`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors reported by the presentation layer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PresentationError {
    #[error("Element not found: {0}")]
    MissingElement(String),

    #[error("Presentation unavailable: {0}")]
    Unavailable(String),
}

/// Errors reported by the leaderboard client.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    #[error("Network failure: {0}")]
    Network(String),

    #[error("Submission rejected: {0}")]
    Rejected(String),
}

/// Errors reported by the audio sink.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("Audio element unavailable: {0}")]
    Unavailable(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// Errors raised while laying out collectible markers.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CollectibleError {
    #[error("Marker spacing must be positive, got {0}")]
    InvalidSpacing(f32),

    #[error("Playfield is empty ({width}x{height})")]
    EmptyPlayfield { width: f32, height: f32 },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::Load(Box::new(error))
    }
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
