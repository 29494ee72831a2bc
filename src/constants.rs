//! This module contains the tuning defaults used by the simulation.
//!
//! Every value here is a default for a field of [`crate::config::GameConfig`]; none of them
//! are wire-level contracts.

/// The delta time assumed for the first tick after the loop is launched, in seconds.
pub const FIRST_TICK_DT: f32 = 1.0 / 60.0;
/// The largest delta time a single tick may integrate, in seconds.
///
/// Backgrounded tabs deliver huge timestamp gaps; clamping keeps the player from tunneling.
pub const MAX_TICK_DT: f32 = 1.0 / 30.0;

/// How far past either horizontal edge an entity travels before it re-enters on the other side.
pub const WRAP_MARGIN: f32 = 30.0;
/// Distance within which the player collects a key pickup.
pub const KEY_COLLECT_RADIUS: f32 = 35.0;
/// Distance within which the player collects a collectible marker.
pub const COLLECTIBLE_RADIUS: f32 = 14.0;
/// Grid spacing between generated collectible markers.
pub const COLLECTIBLE_SPACING: f32 = 40.0;
/// Every n-th generated marker is a power pellet.
pub const POWER_PELLET_INTERVAL: usize = 29;

/// Player speed with no sections unlocked, in units per second.
pub const BASE_PLAYER_SPEED: f32 = 180.0;
/// Opponent speed with no sections unlocked, in units per second.
pub const BASE_OPPONENT_SPEED: f32 = 140.0;
/// Speed multiplier added per unlocked section.
pub const SPEED_STEP_PER_SECTION: f32 = 0.15;
/// Opponents never move faster than this fraction of the player's speed.
pub const OPPONENT_SPEED_CAP: f32 = 0.85;

/// Power mode duration with no sections unlocked.
pub const POWER_MODE_BASE_MS: u32 = 7000;
/// Power mode duration lost per unlocked section.
pub const POWER_MODE_STEP_MS: u32 = 1000;
/// Power mode never lasts less than this.
pub const POWER_MODE_FLOOR_MS: u32 = 3000;
/// Lead time of the "power mode ending" warning with no sections unlocked.
pub const POWER_WARNING_BASE_MS: u32 = 2000;
/// Warning lead time lost per unlocked section.
pub const POWER_WARNING_STEP_MS: u32 = 300;
/// The warning never starts later than this before expiry.
pub const POWER_WARNING_FLOOR_MS: u32 = 1500;

/// Time the section unlock visuals take before regeneration is scheduled.
pub const UNLOCK_ANIMATION_MS: u32 = 600;
/// Delay between the unlock visuals finishing and collectibles being regenerated.
pub const REGENERATION_DELAY_MS: u32 = 800;
/// Upper bound on how long the intro audio may hold the game in `Starting`.
pub const INTRO_FALLBACK_MS: u32 = 5000;
/// Delay between `stop()` and `start()` when restarting.
pub const RESTART_DELAY_MS: u32 = 100;
/// Length of the death animation.
pub const DEATH_ANIMATION_MS: u32 = 1500;
/// Length of the countdown shown before play resumes after a death.
pub const RESPAWN_COUNTDOWN_MS: u32 = 3000;

/// Lives at the start of every game.
pub const STARTING_LIVES: u8 = 3;
/// Score at which the single extra life is awarded.
pub const EXTRA_LIFE_SCORE: u32 = 10_000;

/// Points for a regular collectible marker.
pub const DOT_POINTS: u32 = 10;
/// Points for a power pellet.
pub const POWER_PELLET_POINTS: u32 = 50;
/// Points for collecting a key pickup.
pub const KEY_POINTS: u32 = 500;
/// Points for each opponent eaten during one power mode, in order.
pub const OPPONENT_EATEN_POINTS: [u32; 4] = [200, 400, 800, 1600];
