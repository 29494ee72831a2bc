//! The session's cancellation registry for delayed callbacks.
//!
//! Every delayed step of the simulation (unlock visuals, regeneration, intro fallback, death
//! sequence, power mode, restart) is an entry here instead of a free-floating callback. Entries
//! are tagged with the [`TimerOwner`] that scheduled them so owners can cancel their own work,
//! and [`TimerRegistry::discard`] drops the whole registry at once when a session stops.

use bitflags::bitflags;
use smallvec::SmallVec;
use strum_macros::AsRefStr;
use tracing::trace;

bitflags! {
    /// The components that schedule timers.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TimerOwner: u8 {
        const PROGRESSION = 1 << 0;
        const LIFECYCLE = 1 << 1;
        const LIFE = 1 << 2;
        const POWER = 1 << 3;
    }
}

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum TimerKind {
    /// Forces `Starting -> Active` when the intro audio never reports completion.
    IntroFallback,
    /// Starts a fresh session after `restart()` stopped the previous one.
    RestartDelay,
    /// The unlock visuals for a section have finished.
    UnlockAnimationDone { section: usize },
    /// Collectibles should be laid out over the enlarged playfield.
    RegenerateCollectibles,
    /// The death animation has finished.
    DeathAnimationDone,
    /// The respawn countdown has finished.
    RespawnComplete,
    /// Power mode is about to run out.
    PowerWarning,
    /// Power mode has run out.
    PowerExpired,
}

/// Identifies one scheduled timer. Handles from a discarded registry never match again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    id: u64,
    generation: u32,
}

/// A timer that has come due and been removed from the registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DueTimer {
    pub handle: TimerHandle,
    pub owner: TimerOwner,
    pub kind: TimerKind,
    pub deadline_ms: f64,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    handle: TimerHandle,
    owner: TimerOwner,
    kind: TimerKind,
    deadline_ms: f64,
}

/// Delayed callbacks for one session, keyed by host time in milliseconds.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    generation: u32,
    next_id: u64,
    entries: SmallVec<[Entry; 8]>,
    suspended_at: Option<f64>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `kind` to fire `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, owner: TimerOwner, kind: TimerKind, now_ms: f64, delay_ms: u32) -> TimerHandle {
        let handle = TimerHandle {
            id: self.next_id,
            generation: self.generation,
        };
        self.next_id += 1;

        // While suspended, time is frozen at the moment of suspension.
        let base = self.suspended_at.unwrap_or(now_ms);
        let deadline_ms = base + f64::from(delay_ms);
        self.entries.push(Entry {
            handle,
            owner,
            kind,
            deadline_ms,
        });

        trace!(kind = kind.as_ref(), owner = ?owner, deadline_ms, "Timer scheduled");
        handle
    }

    /// Cancels one timer. Returns `false` if it already fired, was cancelled, or is stale.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.handle != handle);
        before != self.entries.len()
    }

    /// Cancels every timer whose owner intersects `owners`, returning how many were removed.
    pub fn cancel_owned(&mut self, owners: TimerOwner) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.owner.intersects(owners));
        before - self.entries.len()
    }

    /// Drops every pending timer and invalidates all outstanding handles.
    pub fn discard(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        self.generation = self.generation.wrapping_add(1);
        self.suspended_at = None;
        dropped
    }

    /// Freezes every deadline until [`TimerRegistry::resume`].
    pub fn suspend(&mut self, now_ms: f64) {
        if self.suspended_at.is_none() {
            self.suspended_at = Some(now_ms);
        }
    }

    /// Unfreezes deadlines, pushing each one back by the time spent suspended.
    pub fn resume(&mut self, now_ms: f64) {
        if let Some(suspended_at) = self.suspended_at.take() {
            let paused_for = (now_ms - suspended_at).max(0.0);
            for entry in self.entries.iter_mut() {
                entry.deadline_ms += paused_for;
            }
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended_at.is_some()
    }

    /// Removes and returns the earliest timer due at `now_ms`.
    ///
    /// Ties fire in scheduling order. Nothing is due while the registry is suspended.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<DueTimer> {
        if self.suspended_at.is_some() {
            return None;
        }

        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.deadline_ms <= now_ms)
            .min_by(|(_, a), (_, b)| a.deadline_ms.total_cmp(&b.deadline_ms).then(a.handle.id.cmp(&b.handle.id)))
            .map(|(index, _)| index)?;

        let entry = self.entries.remove(index);
        Some(DueTimer {
            handle: entry.handle,
            owner: entry.owner,
            kind: entry.kind,
            deadline_ms: entry.deadline_ms,
        })
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|entry| entry.handle == handle)
    }

    /// Number of pending timers owned by any of `owners`.
    pub fn pending_for(&self, owners: TimerOwner) -> usize {
        self.entries.iter().filter(|entry| entry.owner.intersects(owners)).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<f64> {
        self.entries.iter().map(|entry| entry.deadline_ms).min_by(f64::total_cmp)
    }
}
