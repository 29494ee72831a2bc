//! Tuning configuration for a game session.
//!
//! Defaults come from [`crate::constants`]; `PAGECHASE_*` environment variables override them,
//! with nested keys separated by `__` (for example `PAGECHASE_TIMINGS__RESTART_DELAY_MS=250`).

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{ConfigError, GameResult};

/// The prefix used for environment overrides.
pub const ENV_PREFIX: &str = "PAGECHASE_";

/// A gated section of the page, in unlock order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub id: String,
    pub name: String,
    /// Collectible score required before this section's key spawns.
    pub threshold: u32,
    /// Top edge of the section's band, in document space.
    pub top: f32,
    /// Bottom edge of the section's band, in document space.
    pub bottom: f32,
}

impl SectionSpec {
    pub fn new(id: &str, name: &str, threshold: u32, top: f32, bottom: f32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            threshold,
            top,
            bottom,
        }
    }
}

/// The playable area: the full page width between the header and footer lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    /// The header's bottom edge; nothing moves above it.
    pub header: f32,
    /// The footer's top edge; nothing moves below it.
    pub footer: f32,
}

impl Playfield {
    pub fn height(&self) -> f32 {
        self.footer - self.header
    }
}

/// Delays for every timer the engine schedules, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub unlock_animation_ms: u32,
    pub regeneration_delay_ms: u32,
    pub intro_fallback_ms: u32,
    pub restart_delay_ms: u32,
    pub death_animation_ms: u32,
    pub respawn_countdown_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            unlock_animation_ms: UNLOCK_ANIMATION_MS,
            regeneration_delay_ms: REGENERATION_DELAY_MS,
            intro_fallback_ms: INTRO_FALLBACK_MS,
            restart_delay_ms: RESTART_DELAY_MS,
            death_animation_ms: DEATH_ANIMATION_MS,
            respawn_countdown_ms: RESPAWN_COUNTDOWN_MS,
        }
    }
}

/// Every tuning value of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub base_player_speed: f32,
    pub base_opponent_speed: f32,
    pub wrap_margin: f32,
    pub key_radius: f32,
    pub collectible_radius: f32,
    pub collectible_spacing: f32,
    pub power_pellet_interval: usize,
    pub max_tick_dt: f32,
    pub starting_lives: u8,
    pub extra_life_score: u32,
    pub player_spawn: Vec2,
    pub playfield: Playfield,
    pub timings: Timings,
    pub sections: Vec<SectionSpec>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_player_speed: BASE_PLAYER_SPEED,
            base_opponent_speed: BASE_OPPONENT_SPEED,
            wrap_margin: WRAP_MARGIN,
            key_radius: KEY_COLLECT_RADIUS,
            collectible_radius: COLLECTIBLE_RADIUS,
            collectible_spacing: COLLECTIBLE_SPACING,
            power_pellet_interval: POWER_PELLET_INTERVAL,
            max_tick_dt: MAX_TICK_DT,
            starting_lives: STARTING_LIVES,
            extra_life_score: EXTRA_LIFE_SCORE,
            player_spawn: Vec2::new(640.0, 700.0),
            playfield: Playfield {
                width: 1280.0,
                header: 64.0,
                footer: 3200.0,
            },
            timings: Timings::default(),
            sections: vec![
                SectionSpec::new("about", "About", 300, 800.0, 1400.0),
                SectionSpec::new("projects", "Projects", 700, 1400.0, 2100.0),
                SectionSpec::new("experience", "Experience", 1200, 2100.0, 2700.0),
                SectionSpec::new("contact", "Contact", 1800, 2700.0, 3200.0),
            ],
        }
    }
}

impl GameConfig {
    /// Loads the configuration from defaults merged with `PAGECHASE_*` environment variables.
    pub fn load() -> GameResult<Self> {
        let figment = Figment::from(Serialized::defaults(GameConfig::default())).merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(figment)
    }

    /// Extracts and validates a configuration from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> GameResult<Self> {
        let config: GameConfig = figment.extract().map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_player_speed > 0.0 && self.base_opponent_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "speeds must be positive (player {}, opponent {})",
                self.base_player_speed, self.base_opponent_speed
            )));
        }
        if !(self.collectible_spacing > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "collectible spacing must be positive, got {}",
                self.collectible_spacing
            )));
        }
        if !(self.max_tick_dt > 0.0) {
            return Err(ConfigError::Invalid(format!("max tick dt must be positive, got {}", self.max_tick_dt)));
        }
        if self.playfield.width <= 0.0 || self.playfield.height() <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "playfield is empty ({}x{})",
                self.playfield.width,
                self.playfield.height()
            )));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid("starting lives must be at least 1".to_string()));
        }

        for pair in self.sections.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(ConfigError::Invalid(format!(
                    "section thresholds must increase: '{}' ({}) follows '{}' ({})",
                    pair[1].id, pair[1].threshold, pair[0].id, pair[0].threshold
                )));
            }
        }

        Ok(())
    }
}
