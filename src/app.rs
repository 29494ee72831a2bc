//! A headless host: stand-in collaborators and a simulated 60 Hz clock.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use smallvec::SmallVec;
use strum::IntoEnumIterator;
use tracing::{debug, info, trace};

use pagechase::collaborators::{
    AudioSink, Collaborators, CountdownReason, FrameHost, LeaderboardClient, OpponentContact, OpponentController,
    OpponentParams, PresentationLayer, Sound, SubmitReceipt,
};
use pagechase::config::GameConfig;
use pagechase::direction::Direction;
use pagechase::error::{AudioError, GameResult, LeaderboardError, PresentationError};
use pagechase::events::GameCommand;
use pagechase::game::session::{EndOfGameSummary, HudSnapshot};
use pagechase::game::Game;
use pagechase::playfield::PlayfieldBounds;
use pagechase::systems::collectibles::Collectible;
use pagechase::systems::lifecycle::GameStage;
use pagechase::systems::movement::Boundary;
use pagechase::systems::progression::{KeyPickup, Section};

/// One 60 Hz frame, in milliseconds.
const FRAME_MS: f64 = 1000.0 / 60.0;

/// How long the pretend intro sound plays.
const INTRO_LENGTH_MS: f64 = 2_000.0;

/// Distance at which an opponent touches the player.
const CATCH_RADIUS: f32 = 18.0;

/// Host state shared between the stand-in collaborators and the loop.
#[derive(Default)]
struct HostState {
    now_ms: Cell<f64>,
    frame_requested: Cell<bool>,
    intro_started_at: Cell<Option<f64>>,
    sounds_played: RefCell<HashMap<Sound, u32>>,
}

struct ConsolePresentation {
    center: Vec2,
}

impl PresentationLayer for ConsolePresentation {
    fn prepare_game_ui(&mut self) -> Result<(), PresentationError> {
        debug!("Scrolling disabled, game UI shown");
        Ok(())
    }

    fn restore_baseline(&mut self) {
        debug!("Page restored");
    }

    fn viewport_center(&self) -> Vec2 {
        self.center
    }

    fn reveal_section(&mut self, section: &Section) {
        info!(section = %section.name, "Section revealed");
    }

    fn show_key(&mut self, key: &KeyPickup) {
        info!(x = key.position.x, y = key.position.y, "Key appeared");
    }

    fn show_collectibles(&mut self, markers: &[Collectible]) {
        debug!(markers = markers.len(), "Collectibles shown");
    }

    fn show_countdown(&mut self, reason: CountdownReason) {
        info!(reason = reason.as_ref(), "3... 2... 1...");
    }

    fn flash_boundary(&mut self, boundary: &Boundary) {
        trace!(kind = boundary.kind.as_ref(), "Boundary flashed");
    }

    fn update_hud(&mut self, hud: &HudSnapshot) {
        trace!(score = hud.score, lives = hud.lives, unlocked = hud.sections_unlocked, "HUD");
    }

    fn show_end_of_game_summary(&mut self, summary: &EndOfGameSummary) {
        info!(
            headline = summary.headline(),
            score = %summary.formatted_score(),
            player = summary.player_name.as_deref().unwrap_or("anonymous"),
            submitted = summary.submitted,
            "End of game"
        );
    }
}

struct ConsoleAudio {
    host: Rc<HostState>,
}

impl ConsoleAudio {
    fn new(host: Rc<HostState>) -> Self {
        host.sounds_played.replace(Sound::iter().map(|sound| (sound, 0)).collect());
        Self { host }
    }
}

impl AudioSink for ConsoleAudio {
    fn play(&mut self, sound: Sound) -> Result<(), AudioError> {
        let mut played = self.host.sounds_played.borrow_mut();
        let Some(count) = played.get_mut(&sound) else {
            return Err(AudioError::Unavailable(format!("{} was never loaded", sound.as_ref())));
        };
        *count += 1;

        if sound == Sound::Intro {
            self.host.intro_started_at.set(Some(self.host.now_ms.get()));
        }
        trace!(sound = sound.as_ref(), "Sound");
        Ok(())
    }
}

#[derive(Default)]
struct LocalLeaderboard {
    scores: Vec<(String, u32, bool)>,
}

impl LeaderboardClient for LocalLeaderboard {
    fn fetch_player_name(&mut self) -> Result<Option<String>, LeaderboardError> {
        Ok(Some("demo".to_string()))
    }

    fn submit_score(&mut self, name: &str, score: u32, is_win: bool) -> Result<SubmitReceipt, LeaderboardError> {
        self.scores.push((name.to_string(), score, is_win));
        info!(name, score, is_win, entries = self.scores.len(), "Score recorded");
        Ok(SubmitReceipt { success: true })
    }
}

struct HostFrames {
    host: Rc<HostState>,
}

impl FrameHost for HostFrames {
    fn request_frame(&mut self) {
        self.host.frame_requested.set(true);
    }
}

/// Opponents that walk straight at the player, or away from it while power mode lasts.
struct ChasingOpponents {
    homes: Vec<Vec2>,
    positions: Vec<Vec2>,
    player: Vec2,
    energized: bool,
}

impl ChasingOpponents {
    fn new(homes: Vec<Vec2>) -> Self {
        Self {
            positions: homes.clone(),
            homes,
            player: Vec2::ZERO,
            energized: false,
        }
    }
}

impl OpponentController for ChasingOpponents {
    fn update_state(&mut self, params: &OpponentParams, dt: f32) {
        self.player = params.player_position;
        self.energized = params.power_mode.is_energized();

        let (speed, sign) = if self.energized {
            (params.opponent_speed * 0.5, -1.0)
        } else {
            (params.opponent_speed, 1.0)
        };
        for position in &mut self.positions {
            let heading = (self.player - *position).normalize_or_zero() * sign;
            *position += heading * speed * dt;
        }
    }

    fn check_collisions(&mut self) -> SmallVec<[OpponentContact; 4]> {
        let mut contacts = SmallVec::new();
        for (opponent, position) in self.positions.iter_mut().enumerate() {
            if position.distance(self.player) > CATCH_RADIUS {
                continue;
            }
            if self.energized {
                *position = self.homes[opponent];
                contacts.push(OpponentContact::Eaten { opponent });
            } else {
                contacts.push(OpponentContact::CaughtPlayer);
            }
        }
        contacts
    }

    fn reset(&mut self) {
        self.positions.clone_from(&self.homes);
    }
}

/// Drives one [`Game`] with a simulated clock and a simple autopilot.
pub struct App {
    pub game: Game,
    host: Rc<HostState>,
    intro_reported: bool,
    limit_ms: f64,
}

impl App {
    pub fn new(config: GameConfig, limit_ms: f64) -> GameResult<Self> {
        let host = Rc::new(HostState::default());
        let spawn = config.player_spawn;
        let corners = vec![
            Vec2::new(40.0, config.playfield.header + 40.0),
            Vec2::new(config.playfield.width - 40.0, config.playfield.header + 40.0),
        ];

        let collaborators = Collaborators {
            collision: Box::new(PlayfieldBounds::from_config(&config)),
            opponents: Box::new(ChasingOpponents::new(corners)),
            presentation: Box::new(ConsolePresentation { center: spawn }),
            leaderboard: Box::new(LocalLeaderboard::default()),
            audio: Box::new(ConsoleAudio::new(host.clone())),
            frames: Box::new(HostFrames { host: host.clone() }),
        };

        info!(limit_ms, "Initializing headless host");
        Ok(App {
            game: Game::new(config, collaborators)?,
            host,
            intro_reported: false,
            limit_ms,
        })
    }

    /// Runs one frame. Returns `false` once the game has ended or the time limit is reached.
    pub fn run(&mut self) -> bool {
        let now = self.host.now_ms.get() + FRAME_MS;
        self.host.now_ms.set(now);
        self.game.pump_timers(now);

        if !self.intro_reported {
            if let Some(started) = self.host.intro_started_at.get() {
                if now - started >= INTRO_LENGTH_MS {
                    self.intro_reported = true;
                    self.game.intro_audio_ended();
                }
            }
        }

        if self.host.frame_requested.replace(false) {
            self.steer();
            self.game.tick(now);
        }

        !matches!(self.game.stage(), GameStage::Ended { .. }) && now < self.limit_ms
    }

    pub fn now_ms(&self) -> f64 {
        self.host.now_ms.get()
    }

    /// Logs how often each sound played, in declaration order.
    pub fn log_sounds(&self) {
        let played = self.host.sounds_played.borrow();
        for sound in Sound::iter() {
            let count = played.get(&sound).copied().unwrap_or_default();
            debug!(sound = sound.as_ref(), count, "Sound usage");
        }
    }

    /// Heads for the key when there is one, else the nearest collectible.
    fn steer(&mut self) {
        let player = self.game.session().player.position;
        let target = self.game.progression().key().map(|key| key.position).or_else(|| {
            self.game
                .collectibles()
                .markers()
                .iter()
                .map(|marker| marker.position)
                .min_by(|a, b| a.distance_squared(player).total_cmp(&b.distance_squared(player)))
        });

        let Some(target) = target else {
            return;
        };
        let delta = target - player;
        let direction = if delta.x.abs() >= delta.y.abs() {
            if delta.x < 0.0 {
                Direction::Left
            } else {
                Direction::Right
            }
        } else if delta.y < 0.0 {
            Direction::Up
        } else {
            Direction::Down
        };

        if let Err(error) = self.game.handle_command(GameCommand::MovePlayer(direction)) {
            debug!(%error, "Steering rejected");
        }
    }
}
