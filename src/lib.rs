//! Chase-game engine that gates page sections behind collectible progression.
//!
//! The crate is the simulation core only. Rendering, audio, opponent decision logic and the
//! leaderboard are collaborators injected through [`collaborators::Collaborators`].

pub mod collaborators;
pub mod config;
pub mod constants;
pub mod direction;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod logging;
pub mod playfield;
pub mod systems;
