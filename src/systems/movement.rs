//! Position integration for the player.
//!
//! The horizontal axis wraps around the page; the vertical axis is bounded by the header,
//! the footer and any section that is still locked.

use glam::Vec2;
use strum_macros::AsRefStr;

use crate::collaborators::CollisionOracle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// What kind of line stopped the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum BoundaryKind {
    Header,
    Footer,
    LockedSection,
}

/// A boundary line on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub kind: BoundaryKind,
    /// The coordinate of the line on the queried axis.
    pub coordinate: f32,
}

/// The outcome of integrating one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Set when the step ran into a vertical boundary; the caller owns any feedback.
    pub boundary_hit: Option<Boundary>,
}

impl Resolution {
    fn unchanged(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            boundary_hit: None,
        }
    }
}

/// Integrates velocity over elapsed time with wrap-around and boundary clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementResolver {
    width: f32,
    wrap_margin: f32,
}

impl MovementResolver {
    pub fn new(width: f32, wrap_margin: f32) -> Self {
        Self { width, wrap_margin }
    }

    /// Advances `position` by `velocity * dt`.
    ///
    /// `dt` is expected to be clamped by the caller already. Crossing a vertical boundary
    /// clamps `y` onto it and zeroes the velocity.
    pub fn resolve(&self, position: Vec2, velocity: Vec2, dt: f32, bounds: &dyn CollisionOracle) -> Resolution {
        if dt <= 0.0 || velocity == Vec2::ZERO {
            return Resolution::unchanged(position, velocity);
        }

        let mut next = position + velocity * dt;
        next.x = self.wrap_x(next.x);

        match bounds.boundary_at(Axis::Vertical, next) {
            Some(boundary) => {
                next.y = boundary.coordinate;
                Resolution {
                    position: next,
                    velocity: Vec2::ZERO,
                    boundary_hit: Some(boundary),
                }
            }
            None => Resolution {
                position: next,
                velocity,
                boundary_hit: None,
            },
        }
    }

    /// Wraps `x` into `[-margin, width + margin)`.
    pub fn wrap_x(&self, x: f32) -> f32 {
        let span = self.width + 2.0 * self.wrap_margin;
        if x >= -self.wrap_margin && x < self.width + self.wrap_margin {
            return x;
        }
        let offset = (x + self.wrap_margin).rem_euclid(span);
        // rem_euclid rounds up to `span` itself for tiny negative inputs.
        let offset = if offset >= span { 0.0 } else { offset };
        offset - self.wrap_margin
    }
}
