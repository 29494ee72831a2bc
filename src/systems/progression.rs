//! Threshold-gated section unlocking.
//!
//! The tracker walks the ordered section list one section at a time:
//!
//! - `Locked`: waiting for the collectible score to reach the current section's threshold.
//!   Crossing it clears every uncollected marker and spawns exactly one key.
//! - `KeyPending`: waiting for the player to touch the key. Collecting it unlocks the section.
//! - `Unlocking`: the unlock visuals play, then collectibles are regenerated for the larger
//!   playfield. The win check is suppressed for the whole phase.

use glam::Vec2;
use smallvec::SmallVec;
use strum_macros::AsRefStr;
use tracing::{debug, info, warn};

use crate::collaborators::PresentationLayer;
use crate::config::SectionSpec;
use crate::systems::collectibles::CollectibleField;
use crate::systems::timers::{TimerHandle, TimerKind, TimerOwner, TimerRegistry};

/// A gated region of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub name: String,
    pub threshold: u32,
    pub unlocked: bool,
}

impl From<&SectionSpec> for Section {
    fn from(spec: &SectionSpec) -> Self {
        Self {
            id: spec.id.clone(),
            name: spec.name.clone(),
            threshold: spec.threshold,
            unlocked: false,
        }
    }
}

/// The one-shot pickup that finalizes a section unlock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPickup {
    pub position: Vec2,
    pub collected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr)]
pub enum ProgressionPhase {
    #[default]
    Locked,
    KeyPending,
    Unlocking,
}

/// Returned when the player collects the live key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCollected {
    /// Index of the section that was unlocked.
    pub section: usize,
    /// Whether this collection performed the unlock (always true unless already unlocked).
    pub newly_unlocked: bool,
}

#[derive(Debug)]
pub struct ProgressionTracker {
    sections: Vec<Section>,
    current: usize,
    phase: ProgressionPhase,
    key: Option<KeyPickup>,
    handles: SmallVec<[TimerHandle; 2]>,
}

impl ProgressionTracker {
    pub fn new(specs: &[SectionSpec]) -> Self {
        Self {
            sections: specs.iter().map(Section::from).collect(),
            current: 0,
            phase: ProgressionPhase::Locked,
            key: None,
            handles: SmallVec::new(),
        }
    }

    /// Locks every section's overlay, skipping (and logging) sections whose anchor is missing.
    ///
    /// Returns the number of overlays that were set up.
    pub fn initialize_overlays(&self, presentation: &mut dyn PresentationLayer) -> usize {
        let mut ready = 0;
        for section in self.sections.iter().filter(|section| !section.unlocked) {
            match presentation.lock_section(section) {
                Ok(()) => ready += 1,
                Err(error) => warn!(section = %section.id, %error, "Skipping lock overlay for section"),
            }
        }
        ready
    }

    /// Spawns the current section's key once `collectible_score` reaches its threshold.
    ///
    /// Clears every uncollected marker in the same step. Does nothing unless the tracker is
    /// `Locked`, so repeated calls before or after the key exists never spawn a second one.
    pub fn check_section_threshold(
        &mut self,
        collectible_score: u32,
        field: &mut CollectibleField,
        spawn_point: Vec2,
    ) -> Option<KeyPickup> {
        if self.phase != ProgressionPhase::Locked || self.key.is_some() {
            return None;
        }
        let section = self.sections.get(self.current)?;
        if collectible_score < section.threshold {
            return None;
        }

        let cleared = field.clear();
        let key = KeyPickup {
            position: spawn_point,
            collected: false,
        };
        self.key = Some(key);
        self.phase = ProgressionPhase::KeyPending;

        info!(
            section = %section.id,
            threshold = section.threshold,
            collectible_score,
            cleared,
            "Section threshold reached, key spawned"
        );
        Some(key)
    }

    /// Collects the live key if `player` is within `radius` of it, unlocking the current section.
    pub fn check_key_collision(&mut self, player: Vec2, radius: f32) -> Option<KeyCollected> {
        if self.phase != ProgressionPhase::KeyPending {
            return None;
        }
        let key = self.key.as_mut()?;
        if key.collected || key.position.distance(player) > radius {
            return None;
        }

        key.collected = true;
        let section = self.current;
        let newly_unlocked = self.unlock_section(section);
        self.current += 1;
        self.key = None;
        self.phase = ProgressionPhase::Unlocking;

        Some(KeyCollected { section, newly_unlocked })
    }

    /// Marks section `index` unlocked. Idempotent, and refuses to skip ahead of a locked predecessor.
    ///
    /// Returns whether this call changed anything.
    pub fn unlock_section(&mut self, index: usize) -> bool {
        if index > 0 && !self.sections.get(index - 1).is_some_and(|previous| previous.unlocked) {
            warn!(index, "Refusing to unlock a section ahead of its predecessor");
            return false;
        }

        match self.sections.get_mut(index) {
            Some(section) if !section.unlocked => {
                section.unlocked = true;
                info!(section = %section.id, name = %section.name, "Section unlocked");
                true
            }
            Some(_) => false,
            None => {
                warn!(index, "Unlock requested for unknown section");
                false
            }
        }
    }

    /// Schedules the unlock visuals timer for `section`.
    pub fn begin_unlock_sequence(&mut self, section: usize, timers: &mut TimerRegistry, now_ms: f64, animation_ms: u32) {
        let handle = timers.schedule(
            TimerOwner::PROGRESSION,
            TimerKind::UnlockAnimationDone { section },
            now_ms,
            animation_ms,
        );
        self.handles.push(handle);
    }

    /// The unlock visuals have finished; regeneration follows after `delay_ms`.
    pub fn on_unlock_animation_done(&mut self, timers: &mut TimerRegistry, now_ms: f64, delay_ms: u32) {
        self.handles.retain(|handle| timers.is_pending(*handle));
        if self.phase != ProgressionPhase::Unlocking {
            debug!(phase = self.phase.as_ref(), "Stale unlock animation timer ignored");
            return;
        }

        let handle = timers.schedule(TimerOwner::PROGRESSION, TimerKind::RegenerateCollectibles, now_ms, delay_ms);
        self.handles.push(handle);
    }

    /// Regeneration has run (successfully or not); progression returns to `Locked`.
    pub fn finish_regeneration(&mut self, timers: &TimerRegistry) {
        self.handles.retain(|handle| timers.is_pending(*handle));
        if self.phase == ProgressionPhase::Unlocking {
            self.phase = ProgressionPhase::Locked;
        }
    }

    /// Cancels every progression timer and drops the key without any other side effect.
    pub fn cleanup(&mut self, timers: &mut TimerRegistry) -> usize {
        let cancelled = self.handles.drain(..).filter(|handle| timers.cancel(*handle)).count();
        self.key = None;
        if self.phase != ProgressionPhase::Locked {
            self.phase = ProgressionPhase::Locked;
        }
        cancelled
    }

    /// Relocks every section and returns to the first one.
    pub fn reset(&mut self) {
        for section in self.sections.iter_mut() {
            section.unlocked = false;
        }
        self.current = 0;
        self.phase = ProgressionPhase::Locked;
        self.key = None;
        self.handles.clear();
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.sections.get(self.current)
    }

    pub fn sections_unlocked(&self) -> usize {
        self.sections.iter().filter(|section| section.unlocked).count()
    }

    pub fn all_unlocked(&self) -> bool {
        self.sections.iter().all(|section| section.unlocked)
    }

    pub fn phase(&self) -> ProgressionPhase {
        self.phase
    }

    pub fn key(&self) -> Option<&KeyPickup> {
        self.key.as_ref()
    }

    /// True while collectibles are being regenerated after an unlock.
    pub fn is_regenerating(&self) -> bool {
        self.phase == ProgressionPhase::Unlocking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<SectionSpec> {
        vec![
            SectionSpec::new("about", "About", 300, 500.0, 900.0),
            SectionSpec::new("work", "Work", 700, 900.0, 1300.0),
        ]
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let mut tracker = ProgressionTracker::new(&specs());
        assert!(tracker.unlock_section(0));
        assert!(!tracker.unlock_section(0));
        assert_eq!(tracker.sections_unlocked(), 1);
    }

    #[test]
    fn test_unlock_refuses_out_of_order() {
        let mut tracker = ProgressionTracker::new(&specs());
        assert!(!tracker.unlock_section(1));
        assert!(!tracker.sections()[1].unlocked);
    }

    #[test]
    fn test_threshold_spawns_one_key() {
        let mut tracker = ProgressionTracker::new(&specs());
        let mut field = CollectibleField::new();

        assert!(tracker.check_section_threshold(299, &mut field, Vec2::ZERO).is_none());
        assert!(tracker.check_section_threshold(300, &mut field, Vec2::ZERO).is_some());
        assert!(tracker.check_section_threshold(300, &mut field, Vec2::ZERO).is_none());
        assert_eq!(tracker.phase(), ProgressionPhase::KeyPending);
    }

    #[test]
    fn test_key_collection_advances_and_guards_regeneration() {
        let mut tracker = ProgressionTracker::new(&specs());
        let mut field = CollectibleField::new();
        let mut timers = TimerRegistry::new();
        tracker.check_section_threshold(300, &mut field, Vec2::new(100.0, 100.0));

        assert!(tracker.check_key_collision(Vec2::new(200.0, 100.0), 35.0).is_none());
        let collected = tracker.check_key_collision(Vec2::new(120.0, 110.0), 35.0).unwrap();
        assert_eq!(collected, KeyCollected { section: 0, newly_unlocked: true });
        assert!(tracker.is_regenerating());
        assert_eq!(tracker.current_section().map(|s| s.id.as_str()), Some("work"));

        tracker.begin_unlock_sequence(0, &mut timers, 0.0, 600);
        let due = timers.pop_due(600.0).unwrap();
        assert_eq!(due.kind, TimerKind::UnlockAnimationDone { section: 0 });
        tracker.on_unlock_animation_done(&mut timers, 600.0, 800);
        assert_eq!(timers.pop_due(1_400.0).map(|t| t.kind), Some(TimerKind::RegenerateCollectibles));
        tracker.finish_regeneration(&timers);
        assert_eq!(tracker.phase(), ProgressionPhase::Locked);
    }

    #[test]
    fn test_cleanup_cancels_pending_timers() {
        let mut tracker = ProgressionTracker::new(&specs());
        let mut timers = TimerRegistry::new();
        let mut field = CollectibleField::new();
        tracker.check_section_threshold(300, &mut field, Vec2::ZERO);
        tracker.check_key_collision(Vec2::ZERO, 35.0);
        tracker.begin_unlock_sequence(0, &mut timers, 0.0, 600);

        assert_eq!(tracker.cleanup(&mut timers), 1);
        assert!(timers.is_empty());
        assert!(tracker.key().is_none());
        assert!(!tracker.is_regenerating());
    }
}
