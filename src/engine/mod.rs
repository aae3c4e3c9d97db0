//! The engine: game definition, build-time registration and event handling.
//!
//! ```text
//! GameBuilder ──compile()──► GameProgress ──handle_event()──► GameProgress
//!                                │
//!                                └─ Arc<GameEngine> { Game, EngineCapabilities, phases }
//! ```
//!
//! [`GameEngine`] is shared by every progress derived from the same
//! compiled game. [`EvaluationContext`] is what conditions, mutators and
//! pre-processors see: the game definition, the configured resolver, and
//! occupancy queries backed by bitboards when they are enabled.

mod builder;
mod context;
mod game;
mod progress;

#[cfg(test)]
pub(crate) mod test_support;

pub use builder::GameBuilder;
pub use context::{EngineCapabilities, EvaluationContext};
pub use game::Game;
pub use progress::{GameEngine, GameProgress};
