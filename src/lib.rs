//! # rust-boards
//!
//! A generic, deterministic rule engine for turn-based board games.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: No hardcoded boards, pieces or rules. Games declare
//!    tiles, relations, pieces with movement patterns, and a phase tree of
//!    condition-gated rules.
//!
//! 2. **Immutable States**: Every accepted event produces a new `GameState`;
//!    nothing is mutated in place. Duplicate events are detectable no-ops.
//!
//! 3. **Configuration Over Globals**: Acceleration and instrumentation
//!    switches live in `EngineConfig`, passed in when the game is compiled.
//!
//! ## Architecture
//!
//! - **Geometric resolution is ground truth**: compiled pattern tables,
//!   bitboards and attack rays are caches that must agree with it.
//!
//! - **Persistent Data Structures**: O(1) cloning of states via `im-rs`.
//!
//! - **Deterministic randomness**: dice come from an explicit seeded
//!   `GameRng` and enter the engine as events.
//!
//! ## Modules
//!
//! - `core`: Artifact ids and definitions, players, state, RNG, configuration, errors
//! - `board`: Tiles, relations, directions, paths, dense board indexing
//! - `patterns`: Movement patterns and path resolvers
//! - `accel`: Bitboards, occupancy indices, attack rays, mobility
//! - `flows`: Conditions, events, rules, phases, pre-processors
//! - `engine`: Game definition, builder, event handling
//! - `observer`: Evaluation observers, batching, state hashing

pub mod accel;
pub mod board;
pub mod core;
pub mod engine;
pub mod flows;
pub mod observer;
pub mod patterns;

// Re-export commonly used types
pub use crate::core::{
    ArtifactId, ArtifactState, BuildError, Dice, EngineConfig, EngineError, GameRng, GameState, Piece, Player,
    PlayerId, PlayerMap, RuleEvaluation, Tile,
};

pub use crate::board::{Board, BoardShape, Direction, TilePath, TileRelation, Topology};

pub use crate::patterns::{CompiledResolver, GeometricResolver, PathResolver, Pattern};

pub use crate::accel::{AccelerationContext, AttackRays, Bitboard, OccupancyIndex};

pub use crate::flows::{
    ConditionOutcome, ConditionResponse, GameEvent, GameEventCondition, GamePhase, GameStateCondition,
    PhaseBuilder, Rule, StateMutator,
};

pub use crate::engine::{EvaluationContext, Game, GameBuilder, GameEngine, GameProgress};

pub use crate::observer::{BatchingObserver, EvaluationObserver, RecordingObserver, RuleSkipReason, StateHash};
