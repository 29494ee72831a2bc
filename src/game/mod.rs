//! The composition root of a game session.
//!
//! [`Game`] owns every component and collaborator and is the only place they meet. The
//! host drives it with three kinds of calls: [`Game::tick`] on each frame it was asked for,
//! [`Game::pump_timers`] whenever time passes, and [`Game::handle_event`] for input and page
//! events.

use tracing::{debug, trace, warn};

use crate::collaborators::{Collaborators, Sound};
use crate::config::GameConfig;
use crate::error::GameResult;
use crate::events::{GameCommand, GameEvent};
use crate::systems::collectibles::{CollectibleField, FieldLayout};
use crate::systems::difficulty::{DifficultyModel, DifficultyParameters};
use crate::systems::life::LifeSystem;
use crate::systems::lifecycle::{GameStage, LifecycleController};
use crate::systems::movement::MovementResolver;
use crate::systems::power::{PowerMode, PowerStatus};
use crate::systems::progression::ProgressionTracker;
use crate::systems::timers::{DueTimer, TimerKind, TimerRegistry};

use self::session::{EndOfGameSummary, GameSession, HudSnapshot};
use self::tick::TickOrchestrator;

pub mod life;
pub mod lifecycle;
pub mod session;
pub mod tick;

/// One embedded game, from the idle page through any number of play-throughs.
pub struct Game {
    config: GameConfig,
    collab: Collaborators,
    session: GameSession,
    lifecycle: LifecycleController,
    progression: ProgressionTracker,
    life: LifeSystem,
    power: PowerMode,
    collectibles: CollectibleField,
    difficulty: DifficultyModel,
    movement: MovementResolver,
    timers: TimerRegistry,
    ticker: TickOrchestrator,
    /// The latest host time seen, in milliseconds.
    now_ms: f64,
    /// Remembered across play-throughs so the player is only asked once.
    player_name: Option<String>,
    last_summary: Option<EndOfGameSummary>,
}

impl Game {
    /// Builds an idle game. Nothing touches the page until [`Game::start`].
    pub fn new(config: GameConfig, collab: Collaborators) -> GameResult<Game> {
        config.validate()?;

        let difficulty = DifficultyModel::new(config.base_player_speed, config.base_opponent_speed);
        let movement = MovementResolver::new(config.playfield.width, config.wrap_margin);

        debug!(
            sections = config.sections.len(),
            width = config.playfield.width,
            height = config.playfield.height(),
            "Game created"
        );

        Ok(Game {
            session: GameSession::new(&config),
            progression: ProgressionTracker::new(&config.sections),
            lifecycle: LifecycleController::new(),
            life: LifeSystem::new(),
            power: PowerMode::new(),
            collectibles: CollectibleField::new(),
            difficulty,
            movement,
            timers: TimerRegistry::new(),
            ticker: TickOrchestrator::new(),
            now_ms: 0.0,
            player_name: None,
            last_summary: None,
            config,
            collab,
        })
    }

    /// Routes a host event to its handler.
    pub fn handle_event(&mut self, event: GameEvent) -> GameResult<()> {
        match event {
            GameEvent::Command(command) => self.handle_command(command),
            GameEvent::IntroAudioEnded => {
                self.intro_audio_ended();
                Ok(())
            }
            GameEvent::VisibilityChanged { hidden } => {
                self.visibility_changed(hidden);
                Ok(())
            }
            GameEvent::Summary(choice) => {
                self.handle_summary_choice(choice);
                Ok(())
            }
        }
    }

    pub fn handle_command(&mut self, command: GameCommand) -> GameResult<()> {
        match command {
            GameCommand::Start => self.start().map(|_| ()),
            GameCommand::MovePlayer(direction) => {
                if self.lifecycle.is_active() {
                    self.session.player.steer(direction);
                } else {
                    trace!(%direction, stage = self.lifecycle.stage().as_ref(), "Movement ignored");
                }
                Ok(())
            }
            GameCommand::TogglePause => {
                if self.lifecycle.is_paused() {
                    self.resume();
                } else {
                    self.pause();
                }
                Ok(())
            }
            GameCommand::Restart => {
                self.restart();
                Ok(())
            }
            GameCommand::Quit => {
                self.stop();
                Ok(())
            }
        }
    }

    /// Advances the clock to `now_ms`, firing every timer that has come due in deadline order.
    ///
    /// Follow-up timers scheduled by a firing timer are based on its deadline, so they also
    /// fire in this call when `now_ms` is far enough ahead.
    pub fn pump_timers(&mut self, now_ms: f64) -> usize {
        let target = now_ms.max(self.now_ms);
        let mut fired = 0;
        while let Some(due) = self.timers.pop_due(target) {
            self.now_ms = self.now_ms.max(due.deadline_ms);
            self.dispatch_timer(due);
            fired += 1;
        }
        self.now_ms = target;
        fired
    }

    fn dispatch_timer(&mut self, due: DueTimer) {
        trace!(kind = due.kind.as_ref(), deadline_ms = due.deadline_ms, "Timer fired");
        match due.kind {
            TimerKind::IntroFallback => self.on_intro_fallback(),
            TimerKind::RestartDelay => self.on_restart_delay(),
            TimerKind::UnlockAnimationDone { .. } => {
                self.progression
                    .on_unlock_animation_done(&mut self.timers, self.now_ms, self.config.timings.regeneration_delay_ms);
            }
            TimerKind::RegenerateCollectibles => self.regenerate_collectibles(),
            TimerKind::DeathAnimationDone => self.on_death_animation_done(),
            TimerKind::RespawnComplete => self.on_respawn_complete(),
            TimerKind::PowerWarning => self.power.on_warning(),
            TimerKind::PowerExpired => self.power.on_expired(),
        }
    }

    /// The current difficulty, derived fresh from the unlocked count.
    pub fn difficulty(&self) -> DifficultyParameters {
        self.difficulty.compute(self.progression.sections_unlocked())
    }

    /// Re-derives difficulty and pushes the new player speed into the session.
    fn apply_difficulty(&mut self) -> DifficultyParameters {
        let params = self.difficulty();
        self.session.player.set_speed(params.player_speed);
        debug!(
            sections_unlocked = self.progression.sections_unlocked(),
            player_speed = params.player_speed,
            opponent_speed = params.opponent_speed,
            power_mode_ms = params.power_mode_duration_ms,
            "Difficulty applied"
        );
        params
    }

    fn field_layout(&self) -> FieldLayout {
        FieldLayout {
            playfield: self.config.playfield,
            spacing: self.config.collectible_spacing,
            power_pellet_interval: self.config.power_pellet_interval,
        }
    }

    /// Lays collectibles out over the unlocked playfield and shows them.
    fn populate_collectibles(&mut self) -> GameResult<usize> {
        let layout = self.field_layout();
        let placed = self.collectibles.regenerate(&layout, &*self.collab.collision)?;
        self.collab.presentation.show_collectibles(self.collectibles.markers());
        Ok(placed)
    }

    /// The delayed regeneration after an unlock. Failure is logged; the guard is always lifted.
    fn regenerate_collectibles(&mut self) {
        if !self.progression.is_regenerating() {
            trace!("Stale regeneration timer ignored");
            return;
        }

        match self.populate_collectibles() {
            Ok(placed) => debug!(placed, "Collectibles regenerated after unlock"),
            Err(error) => warn!(%error, "Collectible regeneration failed"),
        }
        self.progression.finish_regeneration(&self.timers);
    }

    /// Every section unlocked, no key waiting and nothing left to collect.
    pub fn is_cleared(&self) -> bool {
        self.progression.all_unlocked() && self.progression.key().is_none() && self.collectibles.is_empty()
    }

    fn play(&mut self, sound: Sound) {
        if let Err(error) = self.collab.audio.play(sound) {
            warn!(sound = sound.as_ref(), %error, "Sound playback failed");
        }
    }

    fn award_extra_life(&mut self) {
        if self.life.award_extra_life(&mut self.session, self.config.extra_life_score) {
            self.play(Sound::ExtraLife);
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            stage: self.lifecycle.stage(),
            score: self.session.score,
            collectible_score: self.session.collectible_score,
            lives: self.session.lives,
            sections_unlocked: self.progression.sections_unlocked(),
            total_sections: self.progression.sections().len(),
            next_threshold: self.progression.current_section().map(|section| section.threshold),
            power: self.power.status(),
        }
    }

    fn push_hud(&mut self) {
        let hud = self.hud();
        self.collab.presentation.update_hud(&hud);
    }

    pub fn stage(&self) -> GameStage {
        self.lifecycle.stage()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn progression(&self) -> &ProgressionTracker {
        &self.progression
    }

    pub fn collectibles(&self) -> &CollectibleField {
        &self.collectibles
    }

    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    pub fn power_status(&self) -> PowerStatus {
        self.power.status()
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    pub fn last_summary(&self) -> Option<&EndOfGameSummary> {
        self.last_summary.as_ref()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Deaths across every play-through of this game.
    pub fn deaths(&self) -> u32 {
        self.life.deaths()
    }
}
