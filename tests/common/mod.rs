#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use pagechase::collaborators::{
    AudioSink, Collaborators, CountdownReason, FrameHost, LeaderboardClient, OpponentContact, OpponentController,
    OpponentParams, PresentationLayer, Sound, SubmitReceipt,
};
use pagechase::config::{GameConfig, Playfield, SectionSpec};
use pagechase::error::{AudioError, LeaderboardError, PresentationError};
use pagechase::game::session::{EndOfGameSummary, HudSnapshot};
use pagechase::game::tick::TickOutcome;
use pagechase::game::Game;
use pagechase::playfield::PlayfieldBounds;
use pagechase::systems::collectibles::Collectible;
use pagechase::systems::movement::Boundary;
use pagechase::systems::progression::{KeyPickup, Section};
use smallvec::SmallVec;

/// One 60 Hz frame.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Everything the fakes observed, plus the knobs that change how they behave.
#[derive(Debug, Default)]
pub struct Record {
    // Knobs
    pub fail_prepare: bool,
    pub missing_sections: Vec<String>,
    pub prompt_name: Option<String>,
    pub stored_name: Option<String>,
    pub fetch_fails: bool,
    pub submit_fails: bool,
    pub audio_fails: bool,
    pub center: Vec2,
    pub queued_contacts: Vec<OpponentContact>,

    // Observations
    pub prepared: usize,
    pub baseline_restored: usize,
    pub hidden_ui: usize,
    pub locked: Vec<String>,
    pub revealed: Vec<String>,
    pub keys_shown: Vec<Vec2>,
    pub keys_removed: usize,
    pub collectibles_shown: Vec<usize>,
    pub collectibles_cleared: usize,
    pub countdowns: Vec<CountdownReason>,
    pub boundary_flashes: usize,
    pub death_animations: usize,
    pub paused: Vec<bool>,
    pub hud: Vec<HudSnapshot>,
    pub prompts: usize,
    pub summaries: Vec<EndOfGameSummary>,
    pub leaderboards_shown: usize,
    pub fetches: usize,
    pub submissions: Vec<(String, u32, bool)>,
    pub sounds: Vec<Sound>,
    pub frames_requested: usize,
    pub opponent_updates: Vec<OpponentParams>,
    pub opponent_resets: usize,
}

pub type Shared = Rc<RefCell<Record>>;

struct FakePresentation(Shared);

impl PresentationLayer for FakePresentation {
    fn prepare_game_ui(&mut self) -> Result<(), PresentationError> {
        let mut record = self.0.borrow_mut();
        if record.fail_prepare {
            return Err(PresentationError::MissingElement("#game-container".to_string()));
        }
        record.prepared += 1;
        Ok(())
    }

    fn restore_baseline(&mut self) {
        self.0.borrow_mut().baseline_restored += 1;
    }

    fn hide_game_ui(&mut self) {
        self.0.borrow_mut().hidden_ui += 1;
    }

    fn viewport_center(&self) -> Vec2 {
        self.0.borrow().center
    }

    fn lock_section(&mut self, section: &Section) -> Result<(), PresentationError> {
        let mut record = self.0.borrow_mut();
        if record.missing_sections.contains(&section.id) {
            return Err(PresentationError::MissingElement(section.id.clone()));
        }
        record.locked.push(section.id.clone());
        Ok(())
    }

    fn reveal_section(&mut self, section: &Section) {
        self.0.borrow_mut().revealed.push(section.id.clone());
    }

    fn show_key(&mut self, key: &KeyPickup) {
        self.0.borrow_mut().keys_shown.push(key.position);
    }

    fn remove_key(&mut self) {
        self.0.borrow_mut().keys_removed += 1;
    }

    fn show_collectibles(&mut self, markers: &[Collectible]) {
        self.0.borrow_mut().collectibles_shown.push(markers.len());
    }

    fn clear_collectibles(&mut self) {
        self.0.borrow_mut().collectibles_cleared += 1;
    }

    fn show_countdown(&mut self, reason: CountdownReason) {
        self.0.borrow_mut().countdowns.push(reason);
    }

    fn flash_boundary(&mut self, _boundary: &Boundary) {
        self.0.borrow_mut().boundary_flashes += 1;
    }

    fn play_death_animation(&mut self) {
        self.0.borrow_mut().death_animations += 1;
    }

    fn set_paused(&mut self, paused: bool) {
        self.0.borrow_mut().paused.push(paused);
    }

    fn update_hud(&mut self, hud: &HudSnapshot) {
        self.0.borrow_mut().hud.push(*hud);
    }

    fn prompt_player_name(&mut self) -> Option<String> {
        let mut record = self.0.borrow_mut();
        record.prompts += 1;
        record.prompt_name.clone()
    }

    fn show_end_of_game_summary(&mut self, summary: &EndOfGameSummary) {
        self.0.borrow_mut().summaries.push(summary.clone());
    }

    fn show_leaderboard(&mut self) {
        self.0.borrow_mut().leaderboards_shown += 1;
    }
}

struct FakeLeaderboard(Shared);

impl LeaderboardClient for FakeLeaderboard {
    fn fetch_player_name(&mut self) -> Result<Option<String>, LeaderboardError> {
        let mut record = self.0.borrow_mut();
        record.fetches += 1;
        if record.fetch_fails {
            return Err(LeaderboardError::Network("offline".to_string()));
        }
        Ok(record.stored_name.clone())
    }

    fn submit_score(&mut self, name: &str, score: u32, is_win: bool) -> Result<SubmitReceipt, LeaderboardError> {
        let mut record = self.0.borrow_mut();
        if record.submit_fails {
            return Err(LeaderboardError::Network("timeout".to_string()));
        }
        record.submissions.push((name.to_string(), score, is_win));
        Ok(SubmitReceipt { success: true })
    }
}

struct FakeAudio(Shared);

impl AudioSink for FakeAudio {
    fn play(&mut self, sound: Sound) -> Result<(), AudioError> {
        let mut record = self.0.borrow_mut();
        if record.audio_fails {
            return Err(AudioError::Unavailable("no audio element".to_string()));
        }
        record.sounds.push(sound);
        Ok(())
    }
}

struct FakeFrames(Shared);

impl FrameHost for FakeFrames {
    fn request_frame(&mut self) {
        self.0.borrow_mut().frames_requested += 1;
    }
}

/// Opponents that report whatever contacts the test queued.
struct ScriptedOpponents(Shared);

impl OpponentController for ScriptedOpponents {
    fn update_state(&mut self, params: &OpponentParams, _dt: f32) {
        self.0.borrow_mut().opponent_updates.push(*params);
    }

    fn check_collisions(&mut self) -> SmallVec<[OpponentContact; 4]> {
        self.0.borrow_mut().queued_contacts.drain(..).collect()
    }

    fn reset(&mut self) {
        self.0.borrow_mut().opponent_resets += 1;
    }
}

/// A 400x400 page with two stacked sections below the open top half.
pub fn small_config() -> GameConfig {
    GameConfig {
        playfield: Playfield {
            width: 400.0,
            header: 0.0,
            footer: 400.0,
        },
        player_spawn: Vec2::new(200.0, 100.0),
        sections: vec![
            SectionSpec::new("about", "About", 300, 200.0, 300.0),
            SectionSpec::new("work", "Work", 700, 300.0, 400.0),
        ],
        ..GameConfig::default()
    }
}

/// A game wired to recording fakes, with a hand-driven clock.
pub struct Harness {
    pub game: Game,
    pub record: Shared,
    pub now: f64,
}

impl Harness {
    pub fn new(config: GameConfig) -> Self {
        Self::with(config, |_| {})
    }

    pub fn with(config: GameConfig, setup: impl FnOnce(&mut Record)) -> Self {
        let record = Shared::default();
        record.borrow_mut().center = Vec2::new(200.0, 20.0);
        setup(&mut record.borrow_mut());

        let collaborators = Collaborators {
            collision: Box::new(PlayfieldBounds::from_config(&config)),
            opponents: Box::new(ScriptedOpponents(record.clone())),
            presentation: Box::new(FakePresentation(record.clone())),
            leaderboard: Box::new(FakeLeaderboard(record.clone())),
            audio: Box::new(FakeAudio(record.clone())),
            frames: Box::new(FakeFrames(record.clone())),
        };

        let game = Game::new(config, collaborators).unwrap();
        Self { game, record, now: 0.0 }
    }

    /// Starts a game and lets the intro finish.
    pub fn start_active(&mut self) {
        self.game.start().unwrap();
        self.game.intro_audio_ended();
    }

    /// Moves the clock forward, firing due timers.
    pub fn advance(&mut self, ms: f64) -> usize {
        self.now += ms;
        self.game.pump_timers(self.now)
    }

    /// Moves the clock forward one frame and ticks.
    pub fn frame(&mut self) -> TickOutcome {
        self.advance(FRAME_MS);
        self.game.tick(self.now)
    }

    /// Queues contacts for the next tick, then runs it.
    pub fn frame_with(&mut self, contacts: &[OpponentContact]) -> TickOutcome {
        self.record.borrow_mut().queued_contacts.extend_from_slice(contacts);
        self.frame()
    }

    /// Catches the player and plays out the death sequence.
    pub fn die_and_settle(&mut self) {
        self.frame_with(&[OpponentContact::CaughtPlayer]);
        let timings = self.game.config().timings;
        self.advance(f64::from(timings.death_animation_ms + timings.respawn_countdown_ms) + 1.0);
    }
}
