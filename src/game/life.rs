//! Getting caught, respawning, and the end of a play-through.

use tracing::{debug, info, trace, warn};

use crate::collaborators::{CountdownReason, Sound};
use crate::events::SummaryChoice;
use crate::systems::life::DeathOutcome;
use crate::systems::lifecycle::{DyingSequence, GameStage};
use crate::systems::timers::TimerOwner;

use super::session::EndOfGameSummary;
use super::Game;

impl Game {
    /// An opponent caught the player. Ignored unless the game is `Active`, so a second
    /// contact in the same frame never costs a second life.
    pub fn on_caught(&mut self) {
        if !self.lifecycle.begin_dying() {
            trace!(stage = self.lifecycle.stage().as_ref(), "Caught event ignored");
            return;
        }

        let lives = self.life.lose_life(&mut self.session);
        let cancelled = self.power.cancel(&mut self.timers);
        self.session.player.halt();

        self.play(Sound::Death);
        self.collab.presentation.play_death_animation();
        self.life
            .schedule_death_animation(&mut self.timers, self.now_ms, self.config.timings.death_animation_ms);
        self.push_hud();

        info!(lives, cancelled_power_timers = cancelled, "Player caught");
    }

    pub(super) fn on_death_animation_done(&mut self) {
        if self.lifecycle.stage() != GameStage::Dying(DyingSequence::Animating) {
            trace!(stage = self.lifecycle.stage().as_ref(), "Stale death animation timer ignored");
            return;
        }

        match self.life.outcome(&self.session) {
            DeathOutcome::GameOver => self.game_over(),
            DeathOutcome::Respawn => {
                self.lifecycle.begin_respawn();
                self.session.player.respawn(self.config.player_spawn);
                self.collab.opponents.reset();
                self.collab.presentation.show_countdown(CountdownReason::Respawn);
                self.life
                    .schedule_respawn(&mut self.timers, self.now_ms, self.config.timings.respawn_countdown_ms);
                self.push_hud();
                debug!(lives = self.session.lives, "Respawn countdown started");
            }
        }
    }

    pub(super) fn on_respawn_complete(&mut self) {
        if !self.lifecycle.finish_respawn() {
            trace!(stage = self.lifecycle.stage().as_ref(), "Stale respawn timer ignored");
            return;
        }

        self.life.respawned();
        self.ticker.reset();
        self.push_hud();
        info!(lives = self.session.lives, "Player respawned");
        self.launch_loop();
    }

    pub fn game_over(&mut self) {
        self.handle_game_end(false);
    }

    pub fn win_game(&mut self) {
        self.handle_game_end(true);
    }

    /// Ends the play-through and always shows the summary, whatever the leaderboard does.
    fn handle_game_end(&mut self, is_win: bool) {
        // Captured before anything below can reset the session.
        let score = self.session.score;

        if !self.lifecycle.end(is_win) {
            trace!(is_win, stage = self.lifecycle.stage().as_ref(), "Game end ignored");
            return;
        }

        let cancelled = self.progression.cleanup(&mut self.timers)
            + self.life.cancel(&mut self.timers)
            + self.power.cancel(&mut self.timers)
            + self.timers.cancel_owned(TimerOwner::all());
        self.session.player.halt();
        self.collab.presentation.remove_key();
        self.collab.presentation.hide_game_ui();
        self.play(if is_win { Sound::Victory } else { Sound::GameOver });
        info!(is_win, score, cancelled, "Game ended");

        let player_name = self.resolve_player_name();
        let submitted = match player_name.as_deref() {
            Some(name) => match self.collab.leaderboard.submit_score(name, score, is_win) {
                Ok(receipt) => {
                    if !receipt.success {
                        warn!(score, "Leaderboard rejected the score");
                    }
                    receipt.success
                }
                Err(error) => {
                    warn!(%error, score, "Score submission failed");
                    false
                }
            },
            None => {
                debug!("No player name, score not submitted");
                false
            }
        };

        let summary = EndOfGameSummary {
            is_win,
            score,
            player_name,
            submitted,
        };
        self.collab.presentation.show_end_of_game_summary(&summary);
        self.last_summary = Some(summary);
        self.push_hud();
    }

    /// The cached name, else the leaderboard's, else whatever the player types.
    fn resolve_player_name(&mut self) -> Option<String> {
        if let Some(name) = &self.player_name {
            return Some(name.clone());
        }

        let fetched = match self.collab.leaderboard.fetch_player_name() {
            Ok(name) => name,
            Err(error) => {
                warn!(%error, "Could not fetch player name");
                None
            }
        };

        let name = fetched
            .or_else(|| self.collab.presentation.prompt_player_name())
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        self.player_name = name.clone();
        name
    }

    /// A button on the end-of-game summary was pressed.
    pub fn handle_summary_choice(&mut self, choice: SummaryChoice) {
        if !self.lifecycle.is_ended() {
            trace!(?choice, stage = self.lifecycle.stage().as_ref(), "Summary choice ignored");
            return;
        }

        debug!(?choice, "Summary choice");
        match choice {
            SummaryChoice::Retry => self.restart(),
            SummaryChoice::Quit => self.stop(),
            SummaryChoice::ShowLeaderboard => self.collab.presentation.show_leaderboard(),
        }
    }
}
