//! The per-frame driver.
//!
//! Within one tick the order is fixed: movement, then collectibles, thresholds and contacts,
//! then the win check. A catch detected in this tick therefore vetoes a win in the same tick.

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::collaborators::{OpponentContact, OpponentParams, Sound};
use crate::constants::{FIRST_TICK_DT, KEY_POINTS};
use crate::formatter;
use crate::systems::collectibles::CollectibleKind;

use super::Game;

/// What the host should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Another frame has been requested.
    Continue,
    /// The loop stopped; no frame was requested.
    Halted,
}

/// Frame timing state for the game loop.
#[derive(Debug, Default)]
pub struct TickOrchestrator {
    last_timestamp_ms: Option<f64>,
    frame_pending: bool,
    ticks: u64,
}

impl TickOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous tick, clamped to `[0, max_dt]`. The first tick after a
    /// reset assumes one 60 Hz frame.
    pub fn delta(&mut self, now_ms: f64, max_dt: f32) -> f32 {
        let dt = match self.last_timestamp_ms.replace(now_ms) {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => FIRST_TICK_DT,
        };
        dt.clamp(0.0, max_dt)
    }

    /// Forgets the previous timestamp so a paused or respawning game doesn't see one huge step.
    pub fn reset(&mut self) {
        self.last_timestamp_ms = None;
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Game {
    /// Runs one frame of the game at host time `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> TickOutcome {
        self.ticker.frame_pending = false;
        if !self.lifecycle.is_active() {
            trace!(stage = self.lifecycle.stage().as_ref(), "Tick skipped");
            return TickOutcome::Halted;
        }

        self.now_ms = self.now_ms.max(now_ms);
        let dt = self.ticker.delta(now_ms, self.config.max_tick_dt);
        self.ticker.ticks += 1;
        formatter::increment_tick();

        self.step_player(dt);
        self.collect_markers();
        self.step_progression();
        self.step_opponents(dt);

        if self.lifecycle.is_active() && !self.progression.is_regenerating() && self.is_cleared() {
            self.win_game();
        }

        self.push_hud();

        if self.lifecycle.is_active() {
            self.request_frame();
            TickOutcome::Continue
        } else {
            TickOutcome::Halted
        }
    }

    /// Starts the frame loop unless a frame is already on its way.
    pub(super) fn launch_loop(&mut self) {
        self.ticker.reset();
        if !self.ticker.frame_pending {
            self.request_frame();
        }
    }

    fn request_frame(&mut self) {
        self.ticker.frame_pending = true;
        self.collab.frames.request_frame();
    }

    fn step_player(&mut self, dt: f32) {
        let player = self.session.player;
        let resolution = self
            .movement
            .resolve(player.position, player.velocity, dt, &*self.collab.collision);
        self.session.player.apply(&resolution);

        if let Some(boundary) = resolution.boundary_hit {
            trace!(kind = boundary.kind.as_ref(), coordinate = boundary.coordinate, "Boundary hit");
            self.collab.presentation.flash_boundary(&boundary);
        }
    }

    fn collect_markers(&mut self) {
        let collected = self
            .collectibles
            .collect_near(self.session.player.position, self.config.collectible_radius);
        if collected.is_empty() {
            return;
        }

        for kind in &collected {
            self.session.add_collectible(kind.points());
            if *kind == CollectibleKind::PowerPellet {
                let params = self.difficulty();
                self.power.activate(&params, &mut self.timers, self.now_ms);
                self.play(Sound::PowerUp);
            }
        }
        self.play(Sound::Collect);
        self.award_extra_life();
    }

    fn step_progression(&mut self) {
        let spawn = self.collab.presentation.viewport_center();
        if let Some(key) =
            self.progression
                .check_section_threshold(self.session.collectible_score, &mut self.collectibles, spawn)
        {
            self.collab.presentation.clear_collectibles();
            self.collab.presentation.show_key(&key);
            self.play(Sound::KeySpawned);
        }

        let Some(collected) = self
            .progression
            .check_key_collision(self.session.player.position, self.config.key_radius)
        else {
            return;
        };

        self.collab.presentation.remove_key();
        self.session.add_score(KEY_POINTS);
        self.award_extra_life();

        if collected.newly_unlocked {
            if let Some(section) = self.progression.section(collected.section) {
                self.collab.presentation.reveal_section(section);
                self.collab.collision.section_unlocked(&section.id);
            }
            self.play(Sound::SectionUnlocked);
        }

        self.apply_difficulty();
        self.progression.begin_unlock_sequence(
            collected.section,
            &mut self.timers,
            self.now_ms,
            self.config.timings.unlock_animation_ms,
        );
    }

    fn step_opponents(&mut self, dt: f32) {
        let params = OpponentParams {
            player_position: self.session.player.position,
            player_speed: self.session.player.speed,
            opponent_speed: self.difficulty().opponent_speed,
            power_mode: self.power.status(),
        };
        self.collab.opponents.update_state(&params, dt);

        let contacts: SmallVec<[OpponentContact; 4]> = self.collab.opponents.check_collisions();
        for contact in contacts {
            match contact {
                OpponentContact::CaughtPlayer => self.on_caught(),
                OpponentContact::Eaten { opponent } => {
                    if !self.lifecycle.is_active() {
                        continue;
                    }
                    let points = self.power.award_for_eaten();
                    self.session.add_score(points);
                    self.play(Sound::EatOpponent);
                    debug!(opponent, points, "Opponent eaten");
                    self.award_extra_life();
                }
            }
        }
    }
}
