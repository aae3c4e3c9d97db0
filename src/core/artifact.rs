//! Artifact identification and definitions.
//!
//! Every game object (tile, piece, player, die, counter) is an *artifact*
//! with a stable string id. Artifacts never carry mutable state themselves;
//! their per-snapshot state lives in [`GameState`](super::GameState).
//!
//! ## Ordering
//!
//! `ArtifactId` orders by the ordinal (byte-wise) comparison of its string.
//! Board shapes and snapshots rely on this ordering for stable indices.
//!
//! ```
//! use rust_boards::core::ArtifactId;
//!
//! let a = ArtifactId::new("tile-a");
//! let b = ArtifactId::new("tile-b");
//! assert!(a < b);
//! assert_eq!(a.as_str(), "tile-a");
//! ```

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::patterns::Pattern;

/// Unique identifier for any artifact.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Create an artifact id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArtifactId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ArtifactId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A board tile.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: ArtifactId,
}

impl Tile {
    /// Create a tile.
    pub fn new(id: impl Into<ArtifactId>) -> Self {
        Self { id: id.into() }
    }
}

/// A player.
///
/// `index` is assigned from declaration order when the game is built and is
/// what per-player bitboards are keyed by.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub id: ArtifactId,
    pub index: PlayerId,
}

/// A movable piece with its movement patterns.
///
/// Patterns are attached at build time and never change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: ArtifactId,

    /// Owning player. `None` for neutral pieces.
    pub owner: Option<ArtifactId>,

    /// Movement patterns, in declaration order.
    pub patterns: Vec<Pattern>,
}

impl Piece {
    /// Create an unowned piece without patterns.
    pub fn new(id: impl Into<ArtifactId>) -> Self {
        Self {
            id: id.into(),
            owner: None,
            patterns: Vec::new(),
        }
    }

    /// Set the owner (builder pattern).
    #[must_use]
    pub fn owned_by(mut self, owner: impl Into<ArtifactId>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Add a movement pattern (builder pattern).
    #[must_use]
    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Check ownership.
    #[must_use]
    pub fn is_owned_by(&self, player: &ArtifactId) -> bool {
        self.owner.as_ref() == Some(player)
    }
}

/// A die.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dice {
    pub id: ArtifactId,

    /// Number of faces (values are `1..=sides`).
    pub sides: u32,
}

impl Dice {
    /// Create a six-sided die.
    pub fn d6(id: impl Into<ArtifactId>) -> Self {
        Self {
            id: id.into(),
            sides: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Direction;

    #[test]
    fn test_ordinal_ordering() {
        let mut ids = vec![
            ArtifactId::new("tile-b"),
            ArtifactId::new("Tile-z"),
            ArtifactId::new("tile-a"),
        ];
        ids.sort();

        // Uppercase sorts before lowercase in ordinal comparison
        assert_eq!(ids[0].as_str(), "Tile-z");
        assert_eq!(ids[1].as_str(), "tile-a");
        assert_eq!(ids[2].as_str(), "tile-b");
    }

    #[test]
    fn test_piece_builder() {
        let piece = Piece::new("rook")
            .owned_by("white")
            .with_pattern(Pattern::direction(Direction::north(), true));

        assert!(piece.is_owned_by(&ArtifactId::new("white")));
        assert!(!piece.is_owned_by(&ArtifactId::new("black")));
        assert_eq!(piece.patterns.len(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ArtifactId::new("dice-1")), "dice-1");
    }

    #[test]
    fn test_serialization() {
        let id = ArtifactId::new("tile-3");
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: ArtifactId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
