//! Narrow interfaces to everything outside the simulation core.
//!
//! The engine never reaches for globals: every collaborator is injected into
//! [`crate::game::Game`] at construction time through [`Collaborators`]. Cosmetic hooks have
//! no-op default implementations so hosts (and tests) only implement what they observe.

use glam::Vec2;
use smallvec::SmallVec;
use strum_macros::{AsRefStr, EnumIter};

use crate::error::{AudioError, LeaderboardError, PresentationError};
use crate::game::session::{EndOfGameSummary, HudSnapshot};
use crate::systems::collectibles::Collectible;
use crate::systems::movement::{Axis, Boundary};
use crate::systems::power::PowerStatus;
use crate::systems::progression::{KeyPickup, Section};

/// Answers geometric questions about the page: header/footer lines and locked sections.
pub trait CollisionOracle {
    /// Whether `point` lies inside a section that is still locked.
    fn is_within_locked_section(&self, point: Vec2) -> bool;

    /// The boundary on `axis` that `point` has crossed, if any.
    fn boundary_at(&self, axis: Axis, point: Vec2) -> Option<Boundary>;

    /// Notified once a section has been unlocked so its geometry stops blocking movement.
    fn section_unlocked(&mut self, _section_id: &str) {}

    /// Restores every section to its locked geometry.
    fn reset(&mut self) {}
}

/// Everything opponents need to know for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpponentParams {
    pub player_position: Vec2,
    pub player_speed: f32,
    pub opponent_speed: f32,
    pub power_mode: PowerStatus,
}

/// A contact between the player and an opponent, as judged by the opponent controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentContact {
    /// An opponent caught the player.
    CaughtPlayer,
    /// The player ate a vulnerable opponent.
    Eaten { opponent: usize },
}

/// Drives the opponents. Their decision logic is not part of this crate.
pub trait OpponentController {
    fn update_state(&mut self, params: &OpponentParams, dt: f32);

    /// Reports this tick's contacts in the order they happened.
    fn check_collisions(&mut self) -> SmallVec<[OpponentContact; 4]>;

    /// Moves every opponent back to its start and clears special states (frightened, eaten).
    fn reset(&mut self);
}

/// Why a countdown is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum CountdownReason {
    /// The intro countdown that plays alongside the intro audio.
    Intro,
    /// The countdown after a life was lost.
    Respawn,
}

/// The page around the game: HUD, overlays, modals and transient sprites.
pub trait PresentationLayer {
    /// Disables page scrolling and shows the game UI. Failing here aborts `start()`.
    fn prepare_game_ui(&mut self) -> Result<(), PresentationError>;

    /// Restores the page to how it looked before the game began.
    fn restore_baseline(&mut self);

    /// Hides in-game UI ahead of the end-of-game summary.
    fn hide_game_ui(&mut self) {}

    /// The document-space point at the center of the visible viewport.
    fn viewport_center(&self) -> Vec2;

    /// Blurs and locks a section. An error means the section's anchor is missing.
    fn lock_section(&mut self, _section: &Section) -> Result<(), PresentationError> {
        Ok(())
    }

    fn reveal_section(&mut self, _section: &Section) {}

    fn show_key(&mut self, _key: &KeyPickup) {}

    fn remove_key(&mut self) {}

    fn show_collectibles(&mut self, _markers: &[Collectible]) {}

    fn clear_collectibles(&mut self) {}

    fn show_countdown(&mut self, _reason: CountdownReason) {}

    fn flash_boundary(&mut self, _boundary: &Boundary) {}

    fn play_death_animation(&mut self) {}

    fn set_paused(&mut self, _paused: bool) {}

    fn update_hud(&mut self, _hud: &HudSnapshot) {}

    /// Asks the player for a name. `None` means the player declined.
    fn prompt_player_name(&mut self) -> Option<String> {
        None
    }

    fn show_end_of_game_summary(&mut self, summary: &EndOfGameSummary);

    fn show_leaderboard(&mut self) {}
}

/// Acknowledgement returned by the leaderboard for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub success: bool,
}

/// Persists scores. Transport and storage are not part of this crate.
pub trait LeaderboardClient {
    fn fetch_player_name(&mut self) -> Result<Option<String>, LeaderboardError>;

    fn submit_score(&mut self, name: &str, score: u32, is_win: bool) -> Result<SubmitReceipt, LeaderboardError>;
}

/// Sound effects the engine asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
pub enum Sound {
    Intro,
    Collect,
    PowerUp,
    EatOpponent,
    KeySpawned,
    SectionUnlocked,
    Death,
    ExtraLife,
    GameOver,
    Victory,
}

/// Plays sounds. When the intro sound finishes, the host calls
/// [`crate::game::Game::intro_audio_ended`].
pub trait AudioSink {
    fn play(&mut self, sound: Sound) -> Result<(), AudioError>;

    fn stop_all(&mut self) {}
}

/// The host's per-frame callback (`requestAnimationFrame` in a browser).
pub trait FrameHost {
    /// Asks the host to call [`crate::game::Game::tick`] on its next frame.
    fn request_frame(&mut self);
}

/// Every collaborator a [`crate::game::Game`] is built with.
pub struct Collaborators {
    pub collision: Box<dyn CollisionOracle>,
    pub opponents: Box<dyn OpponentController>,
    pub presentation: Box<dyn PresentationLayer>,
    pub leaderboard: Box<dyn LeaderboardClient>,
    pub audio: Box<dyn AudioSink>,
    pub frames: Box<dyn FrameHost>,
}
