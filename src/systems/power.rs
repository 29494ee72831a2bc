use tracing::debug;

use crate::constants::OPPONENT_EATEN_POINTS;
use crate::systems::difficulty::DifficultyParameters;
use crate::systems::timers::{TimerKind, TimerOwner, TimerRegistry};

/// Power mode as seen by opponents and the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerStatus {
    #[default]
    Normal,
    Energized {
        /// The warning lead time has been reached; opponents start flashing.
        flashing: bool,
    },
}

impl PowerStatus {
    pub fn is_energized(&self) -> bool {
        matches!(self, PowerStatus::Energized { .. })
    }

    pub fn is_flashing(&self) -> bool {
        matches!(self, PowerStatus::Energized { flashing: true })
    }
}

/// Time-boxed power mode, driven by two power-owned timers (warning and expiry).
#[derive(Debug, Default)]
pub struct PowerMode {
    status: PowerStatus,
    /// Opponents eaten during the current power mode.
    combo: usize,
}

impl PowerMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> PowerStatus {
        self.status
    }

    /// Starts (or restarts) power mode using the current difficulty's timing.
    pub fn activate(&mut self, params: &DifficultyParameters, timers: &mut TimerRegistry, now_ms: f64) {
        let replaced = timers.cancel_owned(TimerOwner::POWER);
        let warning_at = params.power_mode_duration_ms.saturating_sub(params.power_mode_warning_ms);

        timers.schedule(TimerOwner::POWER, TimerKind::PowerWarning, now_ms, warning_at);
        timers.schedule(TimerOwner::POWER, TimerKind::PowerExpired, now_ms, params.power_mode_duration_ms);

        self.status = PowerStatus::Energized { flashing: false };
        self.combo = 0;
        debug!(
            duration_ms = params.power_mode_duration_ms,
            warning_at, replaced, "Power mode activated"
        );
    }

    pub fn on_warning(&mut self) {
        if let PowerStatus::Energized { flashing } = &mut self.status {
            *flashing = true;
        }
    }

    pub fn on_expired(&mut self) {
        if self.status.is_energized() {
            debug!(combo = self.combo, "Power mode expired");
        }
        self.status = PowerStatus::Normal;
        self.combo = 0;
    }

    /// Points for eating the next opponent; the value doubles with each one in the same power mode.
    pub fn award_for_eaten(&mut self) -> u32 {
        let points = OPPONENT_EATEN_POINTS[self.combo.min(OPPONENT_EATEN_POINTS.len() - 1)];
        self.combo += 1;
        points
    }

    /// Ends power mode immediately and cancels its timers.
    pub fn cancel(&mut self, timers: &mut TimerRegistry) -> usize {
        let cancelled = timers.cancel_owned(TimerOwner::POWER);
        self.status = PowerStatus::Normal;
        self.combo = 0;
        cancelled
    }
}
