//! Movement patterns and path resolution.
//!
//! - [`Pattern`]: declarative description of how a piece may move
//! - [`PathResolver`]: the seam conditions call to turn a pattern into a
//!   concrete [`TilePath`](crate::board::TilePath)
//! - [`GeometricResolver`]: walks the relation graph (ground truth)
//! - [`CompiledResolver`]: precomputed reach tables that must agree with the
//!   geometric walk on acceptance and distance
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use rust_boards::board::{Board, Direction, TileRelation};
//! use rust_boards::core::{ArtifactId, Tile};
//! use rust_boards::patterns::{GeometricResolver, PathResolver, Pattern};
//!
//! let tiles = (0..5).map(|i| Tile::new(format!("tile{i}"))).collect();
//! let relations = (0..4)
//!     .map(|i| TileRelation::new(format!("tile{i}"), format!("tile{}", i + 1), "east"))
//!     .collect();
//! let board = Arc::new(Board::new(tiles, relations).unwrap());
//!
//! let resolver = GeometricResolver::new(board);
//! let pattern = Pattern::direction(Direction::east(), true);
//! let path = resolver
//!     .resolve_pattern(&pattern, &ArtifactId::new("tile0"), &ArtifactId::new("tile4"))
//!     .unwrap();
//! assert_eq!(path.distance(), 4);
//! ```

mod compiled;
mod geometric;
mod pattern;

pub use compiled::CompiledResolver;
pub use geometric::GeometricResolver;
pub use pattern::Pattern;

use crate::board::TilePath;
use crate::core::{ArtifactId, Piece};

/// Resolves patterns into concrete tile paths.
///
/// Resolution is purely geometric: occupancy and blocking are for
/// conditions to decide.
pub trait PathResolver: Send + Sync + std::fmt::Debug {
    /// Resolve one pattern from `from` to `to`.
    ///
    /// Returns `None` when unreachable, when `from == to`, or when either
    /// tile is unknown.
    fn resolve_pattern(&self, pattern: &Pattern, from: &ArtifactId, to: &ArtifactId) -> Option<TilePath>;

    /// Resolve a piece's move: the shortest path over all its patterns,
    /// ties going to the pattern declared first.
    fn resolve(&self, piece: &Piece, from: &ArtifactId, to: &ArtifactId) -> Option<TilePath> {
        piece
            .patterns
            .iter()
            .map(|pattern| self.resolve_pattern(pattern, from, to))
            .fold(None, geometric::shorter)
    }
}
