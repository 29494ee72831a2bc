//! The top-level stage machine of a session.
//!
//! `Idle -> Starting -> Active -> {Dying -> Active | Ended}`; `Paused` can be entered from
//! `Active` or `Starting` and remembers which one to return to.

use strum_macros::AsRefStr;
use tracing::{debug, warn};

use crate::systems::timers::TimerHandle;

/// Which stage a paused session returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum ResumeTarget {
    Starting,
    Active,
}

/// The state machine for the multi-stage death sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum DyingSequence {
    /// The death animation is playing.
    Animating,
    /// Positions are reset and the respawn countdown is showing.
    Respawning,
}

/// The overall stage of the game from a high-level perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr)]
pub enum GameStage {
    /// No game is running; the page looks as it did before the game.
    #[default]
    Idle,
    /// Setup is done and the intro countdown is playing.
    Starting,
    /// The main gameplay loop is running.
    Active,
    Paused { resume_to: ResumeTarget },
    /// The player was caught and the death sequence is in progress.
    Dying(DyingSequence),
    /// The game has ended and the summary is showing.
    Ended { won: bool },
}

/// Identifies one start attempt. Concurrent `start()` calls share the in-flight ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StartTicket {
    pub epoch: u32,
}

#[derive(Debug, Default)]
pub struct LifecycleController {
    stage: GameStage,
    epoch: u32,
    intro_fallback: Option<TimerHandle>,
    intro_finished: bool,
    restart_timer: Option<TimerHandle>,
    ui_engaged: bool,
}

impl LifecycleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> GameStage {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        self.stage == GameStage::Active
    }

    /// True while a start is in flight, including while it is paused.
    pub fn is_starting(&self) -> bool {
        matches!(
            self.stage,
            GameStage::Starting
                | GameStage::Paused {
                    resume_to: ResumeTarget::Starting
                }
        )
    }

    pub fn is_dying(&self) -> bool {
        matches!(self.stage, GameStage::Dying(_))
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.stage, GameStage::Ended { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.stage, GameStage::Paused { .. })
    }

    pub fn ticket(&self) -> StartTicket {
        StartTicket { epoch: self.epoch }
    }

    /// Whether the page has been switched into game mode since the last `stop()`.
    pub fn ui_engaged(&self) -> bool {
        self.ui_engaged
    }

    pub fn set_ui_engaged(&mut self, engaged: bool) {
        self.ui_engaged = engaged;
    }

    /// Begins a new start attempt from `Idle` or `Ended`.
    pub fn begin_start(&mut self) -> Option<StartTicket> {
        if !matches!(self.stage, GameStage::Idle | GameStage::Ended { .. }) {
            return None;
        }

        self.epoch = self.epoch.wrapping_add(1);
        self.intro_finished = false;
        self.intro_fallback = None;
        self.transition(GameStage::Starting);
        Some(self.ticket())
    }

    /// Rolls a failed start back to `Idle`.
    pub fn abort_start(&mut self) {
        self.intro_fallback = None;
        self.intro_finished = false;
        self.ui_engaged = false;
        self.transition(GameStage::Idle);
    }

    pub fn set_intro_fallback(&mut self, handle: TimerHandle) {
        self.intro_fallback = Some(handle);
    }

    pub fn take_intro_fallback(&mut self) -> Option<TimerHandle> {
        self.intro_fallback.take()
    }

    /// Records that the intro finished while the start was paused.
    pub fn mark_intro_finished(&mut self) {
        self.intro_finished = true;
    }

    pub fn take_intro_finished(&mut self) -> bool {
        std::mem::take(&mut self.intro_finished)
    }

    /// `Starting -> Active`.
    pub fn finish_start(&mut self) -> bool {
        self.transition_from(GameStage::Starting, GameStage::Active)
    }

    /// Pauses from `Active` or `Starting`.
    pub fn pause(&mut self) -> bool {
        let resume_to = match self.stage {
            GameStage::Active => ResumeTarget::Active,
            GameStage::Starting => ResumeTarget::Starting,
            _ => return false,
        };
        self.transition(GameStage::Paused { resume_to });
        true
    }

    /// Leaves `Paused`, returning the stage it went back to.
    pub fn resume(&mut self) -> Option<ResumeTarget> {
        let GameStage::Paused { resume_to } = self.stage else {
            return None;
        };

        self.transition(match resume_to {
            ResumeTarget::Active => GameStage::Active,
            ResumeTarget::Starting => GameStage::Starting,
        });
        Some(resume_to)
    }

    /// `Active -> Dying(Animating)`. Any other stage (including `Dying`) refuses.
    pub fn begin_dying(&mut self) -> bool {
        self.transition_from(GameStage::Active, GameStage::Dying(DyingSequence::Animating))
    }

    pub fn begin_respawn(&mut self) -> bool {
        self.transition_from(
            GameStage::Dying(DyingSequence::Animating),
            GameStage::Dying(DyingSequence::Respawning),
        )
    }

    pub fn finish_respawn(&mut self) -> bool {
        self.transition_from(GameStage::Dying(DyingSequence::Respawning), GameStage::Active)
    }

    /// Ends the game. Refuses when nothing is running or the game already ended.
    pub fn end(&mut self, won: bool) -> bool {
        if matches!(self.stage, GameStage::Idle | GameStage::Ended { .. }) {
            return false;
        }
        self.intro_fallback = None;
        self.transition(GameStage::Ended { won });
        true
    }

    pub fn set_restart_timer(&mut self, handle: TimerHandle) {
        self.restart_timer = Some(handle);
    }

    pub fn take_restart_timer(&mut self) -> Option<TimerHandle> {
        self.restart_timer.take()
    }

    /// Returns to `Idle`, forgetting every handle and in-flight flag.
    pub fn reset_to_idle(&mut self) {
        self.intro_fallback = None;
        self.intro_finished = false;
        self.restart_timer = None;
        self.ui_engaged = false;
        self.transition(GameStage::Idle);
    }

    fn transition_from(&mut self, expected: GameStage, next: GameStage) -> bool {
        if self.stage != expected {
            return false;
        }
        self.transition(next);
        true
    }

    fn transition(&mut self, next: GameStage) {
        let old = self.stage;
        if old == next {
            return;
        }

        if !is_valid_transition(old, next) {
            warn!(old_stage = ?old, new_stage = ?next, "Unexpected game stage transition");
        }
        debug!(old_stage = ?old, new_stage = ?next, epoch = self.epoch, "Game stage changed");
        self.stage = next;
    }
}

/// Whether the stage machine permits `old -> new`. `Idle` is always reachable through `stop()`.
pub fn is_valid_transition(old: GameStage, new: GameStage) -> bool {
    use GameStage::*;

    match (old, new) {
        (_, Idle) => true,
        (Idle | Ended { .. }, Starting) => true,
        (Starting, Active) => true,
        (Starting, Paused { resume_to: ResumeTarget::Starting }) => true,
        (Active, Paused { resume_to: ResumeTarget::Active }) => true,
        (Paused { resume_to: ResumeTarget::Starting }, Starting) => true,
        (Paused { resume_to: ResumeTarget::Active }, Active) => true,
        (Active, Dying(DyingSequence::Animating)) => true,
        (Dying(DyingSequence::Animating), Dying(DyingSequence::Respawning)) => true,
        (Dying(DyingSequence::Respawning), Active) => true,
        (Active | Dying(_) | Starting | Paused { .. }, Ended { .. }) => true,
        _ => false,
    }
}
