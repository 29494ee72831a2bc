//! The simulation components.
//!
//! Each component owns its own state and borrows only the pieces it touches (the timer
//! registry, a collaborator) for the duration of a call. [`crate::game::Game`] wires them
//! together.

pub mod collectibles;
pub mod difficulty;
pub mod life;
pub mod lifecycle;
pub mod movement;
pub mod power;
pub mod progression;
pub mod timers;
