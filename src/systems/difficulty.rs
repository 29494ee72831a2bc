//! Difficulty scaling as a pure function of how many sections are unlocked.

use crate::constants::*;

/// Speeds and power mode timing for the current progression.
///
/// Always derived from the unlocked count, never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyParameters {
    pub player_speed: f32,
    pub opponent_speed: f32,
    pub power_mode_duration_ms: u32,
    pub power_mode_warning_ms: u32,
}

/// Base speeds the difficulty curve scales from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyModel {
    pub base_player_speed: f32,
    pub base_opponent_speed: f32,
}

impl Default for DifficultyModel {
    fn default() -> Self {
        Self::new(BASE_PLAYER_SPEED, BASE_OPPONENT_SPEED)
    }
}

impl DifficultyModel {
    pub fn new(base_player_speed: f32, base_opponent_speed: f32) -> Self {
        Self {
            base_player_speed,
            base_opponent_speed,
        }
    }

    pub fn compute(&self, sections_unlocked: usize) -> DifficultyParameters {
        compute_difficulty(sections_unlocked, self.base_player_speed, self.base_opponent_speed)
    }
}

/// Derives the difficulty parameters for `sections_unlocked`.
///
/// Opponents are capped at [`OPPONENT_SPEED_CAP`] of the player's speed so the game stays
/// winnable at every level.
pub fn compute_difficulty(sections_unlocked: usize, base_player_speed: f32, base_opponent_speed: f32) -> DifficultyParameters {
    let multiplier = 1.0 + sections_unlocked as f32 * SPEED_STEP_PER_SECTION;
    let player_speed = base_player_speed * multiplier;
    let opponent_speed = (base_opponent_speed * multiplier).min(player_speed * OPPONENT_SPEED_CAP);

    let unlocked = u32::try_from(sections_unlocked).unwrap_or(u32::MAX);
    let power_mode_duration_ms = POWER_MODE_BASE_MS
        .saturating_sub(unlocked.saturating_mul(POWER_MODE_STEP_MS))
        .max(POWER_MODE_FLOOR_MS);
    let power_mode_warning_ms = POWER_WARNING_BASE_MS
        .saturating_sub(unlocked.saturating_mul(POWER_WARNING_STEP_MS))
        .max(POWER_WARNING_FLOOR_MS);

    DifficultyParameters {
        player_speed,
        opponent_speed,
        power_mode_duration_ms,
        power_mode_warning_ms,
    }
}
