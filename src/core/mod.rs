//! Core engine types: artifacts, players, state, RNG, configuration, errors.
//!
//! This module contains the fundamental building blocks that are game-agnostic.
//! Games configure these through [`GameBuilder`](crate::engine::GameBuilder)
//! rather than modifying the core.

pub mod artifact;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use artifact::{ArtifactId, Dice, Piece, Player, Tile};
pub use config::{EngineConfig, RuleEvaluation};
pub use error::{BuildError, EngineError};
pub use player::{PlayerId, PlayerMap, MAX_PLAYERS};
pub use rng::{GameRng, GameRngState};
pub use state::{ArtifactState, GameState};
