//! Collectible markers laid out over the unlocked part of the page.

use glam::Vec2;
use smallvec::SmallVec;
use strum_macros::AsRefStr;
use tracing::debug;

use crate::collaborators::CollisionOracle;
use crate::config::Playfield;
use crate::constants::{DOT_POINTS, POWER_PELLET_POINTS};
use crate::error::CollectibleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
pub enum CollectibleKind {
    Dot,
    PowerPellet,
}

impl CollectibleKind {
    /// Points awarded for collecting this kind, both to the score and the collectible score.
    pub const fn points(self) -> u32 {
        match self {
            CollectibleKind::Dot => DOT_POINTS,
            CollectibleKind::PowerPellet => POWER_PELLET_POINTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collectible {
    pub position: Vec2,
    pub kind: CollectibleKind,
}

/// Layout parameters for [`CollectibleField::regenerate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldLayout {
    pub playfield: Playfield,
    pub spacing: f32,
    /// Every n-th marker becomes a power pellet; `0` disables power pellets.
    pub power_pellet_interval: usize,
}

/// The live collectible markers.
#[derive(Debug, Default)]
pub struct CollectibleField {
    markers: Vec<Collectible>,
}

impl CollectibleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every marker with a fresh grid over the unlocked playfield.
    ///
    /// Grid points inside locked sections are skipped. Returns the number of markers placed.
    pub fn regenerate(&mut self, layout: &FieldLayout, oracle: &dyn CollisionOracle) -> Result<usize, CollectibleError> {
        let FieldLayout {
            playfield,
            spacing,
            power_pellet_interval,
        } = *layout;

        if !(spacing > 0.0) {
            return Err(CollectibleError::InvalidSpacing(spacing));
        }
        if playfield.width <= 0.0 || playfield.height() <= 0.0 {
            return Err(CollectibleError::EmptyPlayfield {
                width: playfield.width,
                height: playfield.height(),
            });
        }

        self.markers.clear();

        let columns = (playfield.width / spacing).floor() as usize;
        let rows = (playfield.height() / spacing).floor() as usize;
        let origin = Vec2::new(spacing / 2.0, playfield.header + spacing / 2.0);

        let mut placed = 0usize;
        for row in 0..rows {
            for column in 0..columns {
                let position = origin + Vec2::new(column as f32, row as f32) * spacing;
                if oracle.is_within_locked_section(position) {
                    continue;
                }

                placed += 1;
                let kind = if power_pellet_interval > 0 && placed % power_pellet_interval == 0 {
                    CollectibleKind::PowerPellet
                } else {
                    CollectibleKind::Dot
                };
                self.markers.push(Collectible { position, kind });
            }
        }

        debug!(markers = placed, columns, rows, "Collectibles regenerated");
        Ok(placed)
    }

    /// Removes every marker, returning how many were still uncollected.
    pub fn clear(&mut self) -> usize {
        let cleared = self.markers.len();
        self.markers.clear();
        cleared
    }

    /// Removes and returns every marker within `radius` of `point`.
    pub fn collect_near(&mut self, point: Vec2, radius: f32) -> SmallVec<[CollectibleKind; 4]> {
        let radius_squared = radius * radius;
        let mut collected = SmallVec::new();
        self.markers.retain(|marker| {
            if marker.position.distance_squared(point) <= radius_squared {
                collected.push(marker.kind);
                false
            } else {
                true
            }
        });
        collected
    }

    pub fn markers(&self) -> &[Collectible] {
        &self.markers
    }

    pub fn remaining(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
