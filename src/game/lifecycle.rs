//! Starting, stopping, restarting and pausing a session.

use tracing::{debug, error, info, trace, warn};

use crate::collaborators::{CountdownReason, Sound};
use crate::error::GameResult;
use crate::systems::lifecycle::{GameStage, ResumeTarget, StartTicket};
use crate::systems::power::PowerMode;
use crate::systems::timers::{TimerKind, TimerOwner};

use super::Game;

impl Game {
    /// Starts a new play-through.
    ///
    /// While a start is already in flight this returns that start's ticket without doing
    /// anything else. A setup failure rolls everything back to `Idle` and is returned.
    pub fn start(&mut self) -> GameResult<StartTicket> {
        if self.lifecycle.is_starting() {
            trace!(epoch = self.lifecycle.ticket().epoch, "Start already in flight");
            return Ok(self.lifecycle.ticket());
        }

        let Some(ticket) = self.lifecycle.begin_start() else {
            debug!(stage = self.lifecycle.stage().as_ref(), "Start ignored, a game is already running");
            return Ok(self.lifecycle.ticket());
        };

        if let Err(error) = self.prepare_session() {
            error!(%error, epoch = ticket.epoch, "Game setup failed");
            self.timers.discard();
            self.collectibles.clear();
            self.lifecycle.abort_start();
            self.collab.presentation.restore_baseline();
            return Err(error);
        }

        info!(epoch = ticket.epoch, "Game starting");
        Ok(ticket)
    }

    /// Resets every piece of session state and begins the intro countdown.
    fn prepare_session(&mut self) -> GameResult<()> {
        // A fresh registry per play-through; handles from the previous one are inert.
        self.timers.discard();
        self.collab.presentation.prepare_game_ui()?;
        self.lifecycle.set_ui_engaged(true);

        self.session.reset(&self.config);
        self.power = PowerMode::new();
        self.progression.reset();
        self.collab.collision.reset();
        self.collab.opponents.reset();
        self.ticker.reset();
        self.last_summary = None;
        self.apply_difficulty();

        let overlays = self.progression.initialize_overlays(&mut *self.collab.presentation);
        let placed = self.populate_collectibles()?;
        debug!(overlays, placed, "Playfield prepared");

        self.collab.presentation.show_countdown(CountdownReason::Intro);
        let fallback = self.timers.schedule(
            TimerOwner::LIFECYCLE,
            TimerKind::IntroFallback,
            self.now_ms,
            self.config.timings.intro_fallback_ms,
        );
        self.lifecycle.set_intro_fallback(fallback);

        if let Err(error) = self.collab.audio.play(Sound::Intro) {
            warn!(%error, "Intro audio unavailable, waiting on the fallback timer");
        }

        self.push_hud();
        Ok(())
    }

    /// The host reports that the intro sound finished.
    pub fn intro_audio_ended(&mut self) {
        if !self.lifecycle.is_starting() {
            trace!(stage = self.lifecycle.stage().as_ref(), "Intro end ignored");
            return;
        }

        if let Some(handle) = self.lifecycle.take_intro_fallback() {
            self.timers.cancel(handle);
        }

        if self.lifecycle.is_paused() {
            self.lifecycle.mark_intro_finished();
        } else {
            self.finish_start();
        }
    }

    pub(super) fn on_intro_fallback(&mut self) {
        self.lifecycle.take_intro_fallback();
        if self.lifecycle.stage() != GameStage::Starting {
            trace!(stage = self.lifecycle.stage().as_ref(), "Stale intro fallback ignored");
            return;
        }

        warn!("Intro audio never reported completion, starting anyway");
        self.finish_start();
    }

    fn finish_start(&mut self) {
        if !self.lifecycle.finish_start() {
            return;
        }

        info!(epoch = self.lifecycle.ticket().epoch, "Game active");
        self.push_hud();
        self.launch_loop();
    }

    /// Tears the session down from any stage. Calling it again is a no-op.
    pub fn stop(&mut self) {
        let stage = self.lifecycle.stage();
        if stage == GameStage::Idle && self.timers.is_empty() && !self.lifecycle.ui_engaged() {
            trace!("Stop ignored, nothing to tear down");
            return;
        }

        let progression = self.progression.cleanup(&mut self.timers);
        let life = self.life.cancel(&mut self.timers);
        let power = self.power.cancel(&mut self.timers);
        let discarded = self.timers.discard();

        let markers = self.collectibles.clear();
        self.collab.presentation.remove_key();
        self.collab.presentation.clear_collectibles();
        self.collab.opponents.reset();
        self.collab.audio.stop_all();
        self.collab.presentation.restore_baseline();

        self.lifecycle.reset_to_idle();
        self.ticker.reset();

        info!(
            from = stage.as_ref(),
            cancelled = progression + life + power + discarded,
            markers,
            "Game stopped"
        );
    }

    /// Stops the current session and starts a fresh one after a short delay.
    ///
    /// The delay is a lifecycle timer, so stopping again before it fires cancels the restart.
    pub fn restart(&mut self) {
        self.stop();

        let delay_ms = self.config.timings.restart_delay_ms;
        let handle = self
            .timers
            .schedule(TimerOwner::LIFECYCLE, TimerKind::RestartDelay, self.now_ms, delay_ms);
        self.lifecycle.set_restart_timer(handle);
        info!(delay_ms, "Restart scheduled");
    }

    pub(super) fn on_restart_delay(&mut self) {
        if self.lifecycle.take_restart_timer().is_none() {
            trace!("Stale restart timer ignored");
            return;
        }

        if let Err(error) = self.start() {
            error!(%error, "Restart failed");
        }
    }

    /// Pauses an active or starting game. Timers stop counting down until [`Game::resume`].
    pub fn pause(&mut self) -> bool {
        if !self.lifecycle.pause() {
            trace!(stage = self.lifecycle.stage().as_ref(), "Pause ignored");
            return false;
        }

        self.timers.suspend(self.now_ms);
        self.collab.presentation.set_paused(true);
        self.push_hud();
        info!("Game paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        let Some(target) = self.lifecycle.resume() else {
            trace!(stage = self.lifecycle.stage().as_ref(), "Resume ignored");
            return false;
        };

        self.timers.resume(self.now_ms);
        self.ticker.reset();
        self.collab.presentation.set_paused(false);
        info!(to = target.as_ref(), "Game resumed");

        match target {
            ResumeTarget::Active => {
                self.push_hud();
                self.launch_loop();
            }
            ResumeTarget::Starting => {
                if self.lifecycle.take_intro_finished() {
                    self.finish_start();
                } else {
                    self.push_hud();
                }
            }
        }
        true
    }

    /// Pauses automatically when the page is hidden.
    pub fn visibility_changed(&mut self, hidden: bool) {
        if hidden && self.lifecycle.is_active() {
            debug!("Page hidden, pausing");
            self.pause();
        }
    }
}
