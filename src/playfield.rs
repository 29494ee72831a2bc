//! A [`CollisionOracle`] built from plain geometry.
//!
//! Hosts that can measure the page feed it the header and footer lines and each section's
//! vertical band; the demo binary and the tests use it as is.

use glam::Vec2;
use tracing::debug;

use crate::collaborators::CollisionOracle;
use crate::config::GameConfig;
use crate::systems::movement::{Axis, Boundary, BoundaryKind};

#[derive(Debug, Clone, PartialEq)]
struct Band {
    id: String,
    top: f32,
    bottom: f32,
    locked: bool,
}

impl Band {
    /// Both edges are open so a player clamped onto either one can keep moving along it.
    fn contains(&self, y: f32) -> bool {
        y > self.top && y < self.bottom
    }
}

/// Header and footer lines plus one band per section; locked bands block movement.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayfieldBounds {
    header: f32,
    footer: f32,
    bands: Vec<Band>,
}

impl PlayfieldBounds {
    pub fn new(header: f32, footer: f32) -> Self {
        Self {
            header,
            footer,
            bands: Vec::new(),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        config
            .sections
            .iter()
            .fold(Self::new(config.playfield.header, config.playfield.footer), |bounds, section| {
                bounds.with_section(&section.id, section.top, section.bottom)
            })
    }

    /// Adds a locked section occupying `top..bottom`.
    pub fn with_section(mut self, id: &str, top: f32, bottom: f32) -> Self {
        self.bands.push(Band {
            id: id.to_string(),
            top,
            bottom,
            locked: true,
        });
        self
    }

    pub fn is_locked(&self, section_id: &str) -> bool {
        self.bands.iter().any(|band| band.id == section_id && band.locked)
    }
}

impl CollisionOracle for PlayfieldBounds {
    fn is_within_locked_section(&self, point: Vec2) -> bool {
        self.bands.iter().any(|band| band.locked && band.contains(point.y))
    }

    fn boundary_at(&self, axis: Axis, point: Vec2) -> Option<Boundary> {
        if axis == Axis::Horizontal {
            return None;
        }

        if point.y < self.header {
            return Some(Boundary {
                kind: BoundaryKind::Header,
                coordinate: self.header,
            });
        }
        if point.y > self.footer {
            return Some(Boundary {
                kind: BoundaryKind::Footer,
                coordinate: self.footer,
            });
        }

        self.bands
            .iter()
            .find(|band| band.locked && band.contains(point.y))
            .map(|band| {
                // Push back out through whichever edge is closer.
                let coordinate = if point.y - band.top <= band.bottom - point.y {
                    band.top
                } else {
                    band.bottom
                };
                Boundary {
                    kind: BoundaryKind::LockedSection,
                    coordinate,
                }
            })
    }

    fn section_unlocked(&mut self, section_id: &str) {
        for band in self.bands.iter_mut().filter(|band| band.id == section_id) {
            band.locked = false;
            debug!(section = section_id, top = band.top, bottom = band.bottom, "Section geometry opened");
        }
    }

    fn reset(&mut self) {
        for band in &mut self.bands {
            band.locked = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speculoos::prelude::*;

    fn bounds() -> PlayfieldBounds {
        PlayfieldBounds::new(50.0, 1000.0).with_section("about", 400.0, 700.0)
    }

    #[test]
    fn test_header_and_footer() {
        let bounds = bounds();
        assert_that(&bounds.boundary_at(Axis::Vertical, Vec2::new(0.0, 10.0)).map(|b| b.kind))
            .is_equal_to(Some(BoundaryKind::Header));
        assert_that(&bounds.boundary_at(Axis::Vertical, Vec2::new(0.0, 1200.0)).map(|b| b.coordinate))
            .is_equal_to(Some(1000.0));
        assert_that(&bounds.boundary_at(Axis::Horizontal, Vec2::new(-500.0, 10.0))).is_none();
    }

    #[test]
    fn test_locked_band_blocks_until_unlocked() {
        let mut bounds = bounds();
        let inside = Vec2::new(100.0, 410.0);

        assert_that(&bounds.is_within_locked_section(inside)).is_true();
        assert_that(&bounds.boundary_at(Axis::Vertical, inside)).is_equal_to(Some(Boundary {
            kind: BoundaryKind::LockedSection,
            coordinate: 400.0,
        }));

        bounds.section_unlocked("about");
        assert_that(&bounds.is_within_locked_section(inside)).is_false();
        assert_that(&bounds.boundary_at(Axis::Vertical, inside)).is_none();

        bounds.reset();
        assert_that(&bounds.is_locked("about")).is_true();
    }

    #[test]
    fn test_band_edges_are_resting_points() {
        let bounds = bounds();
        for y in [400.0, 700.0] {
            let edge = Vec2::new(100.0, y);
            assert_that(&bounds.is_within_locked_section(edge)).is_false();
            assert_that(&bounds.boundary_at(Axis::Vertical, edge)).is_none();
        }
    }
}
