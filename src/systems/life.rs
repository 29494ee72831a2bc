use tracing::info;

use crate::game::session::GameSession;
use crate::systems::timers::{TimerHandle, TimerKind, TimerOwner, TimerRegistry};

/// What happens once the death animation has played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathOutcome {
    Respawn,
    GameOver,
}

/// Lives bookkeeping and the timers of the death sequence.
#[derive(Debug, Default)]
pub struct LifeSystem {
    death_timer: Option<TimerHandle>,
    respawn_timer: Option<TimerHandle>,
    deaths: u32,
}

impl LifeSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes one life, returning how many remain.
    pub fn lose_life(&mut self, session: &mut GameSession) -> u8 {
        session.lives = session.lives.saturating_sub(1);
        self.deaths += 1;
        session.lives
    }

    /// Awards the single extra life once the score reaches `threshold`.
    pub fn award_extra_life(&mut self, session: &mut GameSession, threshold: u32) -> bool {
        if session.extra_life_awarded || session.score < threshold {
            return false;
        }

        session.extra_life_awarded = true;
        session.lives = session.lives.saturating_add(1);
        info!(score = session.score, lives = session.lives, "Extra life awarded");
        true
    }

    pub fn outcome(&self, session: &GameSession) -> DeathOutcome {
        if session.lives == 0 {
            DeathOutcome::GameOver
        } else {
            DeathOutcome::Respawn
        }
    }

    pub fn schedule_death_animation(&mut self, timers: &mut TimerRegistry, now_ms: f64, animation_ms: u32) {
        self.death_timer = Some(timers.schedule(TimerOwner::LIFE, TimerKind::DeathAnimationDone, now_ms, animation_ms));
    }

    pub fn schedule_respawn(&mut self, timers: &mut TimerRegistry, now_ms: f64, countdown_ms: u32) {
        self.death_timer = None;
        self.respawn_timer = Some(timers.schedule(TimerOwner::LIFE, TimerKind::RespawnComplete, now_ms, countdown_ms));
    }

    pub fn respawned(&mut self) {
        self.respawn_timer = None;
    }

    /// Cancels whatever part of the death sequence is still pending.
    pub fn cancel(&mut self, timers: &mut TimerRegistry) -> usize {
        [self.death_timer.take(), self.respawn_timer.take()]
            .into_iter()
            .flatten()
            .filter(|handle| timers.cancel(*handle))
            .count()
    }

    /// Deaths since this system was created, across sessions.
    pub fn deaths(&self) -> u32 {
        self.deaths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_lives_run_out() {
        let mut session = GameSession::new(&GameConfig::default());
        let mut life = LifeSystem::new();

        assert_eq!(life.lose_life(&mut session), 2);
        assert_eq!(life.outcome(&session), DeathOutcome::Respawn);
        life.lose_life(&mut session);
        assert_eq!(life.lose_life(&mut session), 0);
        assert_eq!(life.outcome(&session), DeathOutcome::GameOver);
        assert_eq!(life.lose_life(&mut session), 0);
    }

    #[test]
    fn test_extra_life_awarded_once() {
        let mut session = GameSession::new(&GameConfig::default());
        let mut life = LifeSystem::new();

        session.score = 9_990;
        assert!(!life.award_extra_life(&mut session, 10_000));
        session.score = 10_000;
        assert!(life.award_extra_life(&mut session, 10_000));
        session.score = 20_000;
        assert!(!life.award_extra_life(&mut session, 10_000));
        assert_eq!(session.lives, 4);
    }

    #[test]
    fn test_cancel_drops_pending_sequence() {
        let mut life = LifeSystem::new();
        let mut timers = TimerRegistry::new();
        life.schedule_death_animation(&mut timers, 0.0, 1_500);

        assert_eq!(life.cancel(&mut timers), 1);
        assert!(timers.is_empty());
        assert_eq!(life.cancel(&mut timers), 0);
    }
}
