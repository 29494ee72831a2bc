//! Mutable per-session state and the snapshots handed to the presentation layer.

use glam::Vec2;
use thousands::Separable;

use crate::config::GameConfig;
use crate::direction::Direction;
use crate::systems::lifecycle::GameStage;
use crate::systems::movement::Resolution;
use crate::systems::power::PowerStatus;

/// The player's kinematic state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub direction: Direction,
    /// Current speed in units per second; only difficulty changes it.
    pub speed: f32,
}

impl PlayerState {
    pub fn new(position: Vec2, speed: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            direction: Direction::default(),
            speed,
        }
    }

    /// Starts moving in `direction` at the current speed.
    pub fn steer(&mut self, direction: Direction) {
        self.direction = direction;
        self.velocity = direction.as_vec2() * self.speed;
    }

    /// Changes speed, keeping any motion in progress going at the new speed.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        if self.velocity != Vec2::ZERO {
            self.velocity = self.direction.as_vec2() * speed;
        }
    }

    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    pub fn respawn(&mut self, spawn: Vec2) {
        self.position = spawn;
        self.velocity = Vec2::ZERO;
        self.direction = Direction::default();
    }

    pub fn apply(&mut self, resolution: &Resolution) {
        self.position = resolution.position;
        self.velocity = resolution.velocity;
    }
}

/// The root aggregate of one play-through.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub score: u32,
    /// Drives section unlocking; only collectibles add to it.
    pub collectible_score: u32,
    pub lives: u8,
    pub extra_life_awarded: bool,
    pub player: PlayerState,
}

impl GameSession {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            collectible_score: 0,
            lives: config.starting_lives,
            extra_life_awarded: false,
            player: PlayerState::new(config.player_spawn, config.base_player_speed),
        }
    }

    /// Resets every field in place for a fresh play-through.
    pub fn reset(&mut self, config: &GameConfig) {
        *self = Self::new(config);
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Points from a collectible count toward both the score and the collectible score.
    pub fn add_collectible(&mut self, points: u32) {
        self.add_score(points);
        self.collectible_score = self.collectible_score.saturating_add(points);
    }
}

/// What the HUD shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudSnapshot {
    pub stage: GameStage,
    pub score: u32,
    pub collectible_score: u32,
    pub lives: u8,
    pub sections_unlocked: usize,
    pub total_sections: usize,
    /// The collectible score the next key needs, if any section is still locked.
    pub next_threshold: Option<u32>,
    pub power: PowerStatus,
}

/// Everything the end-of-game summary displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndOfGameSummary {
    pub is_win: bool,
    /// The score as it was when the game ended.
    pub score: u32,
    pub player_name: Option<String>,
    /// Whether the leaderboard accepted the score.
    pub submitted: bool,
}

impl EndOfGameSummary {
    pub fn formatted_score(&self) -> String {
        self.score.separate_with_commas()
    }

    pub fn headline(&self) -> &'static str {
        if self.is_win {
            "You unlocked everything!"
        } else {
            "Game over"
        }
    }
}
