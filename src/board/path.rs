//! Resolved tile paths.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::direction::Direction;
use super::layout::TileRelation;
use crate::core::ArtifactId;

/// An ordered, non-empty, contiguous sequence of traversed relations.
///
/// Produced by resolvers. Rule code only builds one by hand for synthetic
/// moves (e.g. castling) through [`TilePath::synthetic`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePath {
    relations: SmallVec<[TileRelation; 4]>,
}

impl TilePath {
    /// Build a path from relations.
    ///
    /// Returns `None` if empty or if consecutive relations do not connect.
    pub fn new(relations: impl IntoIterator<Item = TileRelation>) -> Option<Self> {
        let relations: SmallVec<[TileRelation; 4]> = relations.into_iter().collect();
        if relations.is_empty() {
            return None;
        }
        if relations.windows(2).any(|w| w[0].to != w[1].from) {
            return None;
        }
        Some(Self { relations })
    }

    /// Single-relation path that need not exist on the board.
    pub fn synthetic(
        from: impl Into<ArtifactId>,
        to: impl Into<ArtifactId>,
        direction: impl Into<Direction>,
        distance: u32,
    ) -> Self {
        let mut relations = SmallVec::new();
        relations.push(TileRelation::new(from, to, direction).with_distance(distance.max(1)));
        Self { relations }
    }

    /// Path extended by one more relation, or `None` if it does not connect.
    #[must_use]
    pub fn extended(&self, relation: TileRelation) -> Option<Self> {
        if self.to() != &relation.from {
            return None;
        }
        let mut relations = self.relations.clone();
        relations.push(relation);
        Some(Self { relations })
    }

    #[must_use]
    pub fn from(&self) -> &ArtifactId {
        &self.relations[0].from
    }

    #[must_use]
    pub fn to(&self) -> &ArtifactId {
        &self.relations[self.relations.len() - 1].to
    }

    /// Sum of relation distances.
    #[must_use]
    pub fn distance(&self) -> u32 {
        self.relations.iter().map(|r| r.distance).sum()
    }

    #[must_use]
    pub fn relations(&self) -> &[TileRelation] {
        &self.relations
    }

    /// Number of relations traversed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Always false; paths are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Visited tiles, origin included.
    pub fn tiles(&self) -> impl Iterator<Item = &ArtifactId> {
        std::iter::once(self.from()).chain(self.relations.iter().map(|r| &r.to))
    }

    /// Directions taken, in order.
    pub fn directions(&self) -> impl Iterator<Item = &Direction> {
        self.relations.iter().map(|r| &r.direction)
    }

    /// Check whether the path passes through `tile` (origin included).
    #[must_use]
    pub fn visits(&self, tile: &ArtifactId) -> bool {
        self.tiles().any(|t| t == tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_path() {
        let path = TilePath::new([
            TileRelation::new("a", "b", "east"),
            TileRelation::new("b", "c", "east").with_distance(2),
        ])
        .unwrap();

        assert_eq!(path.from(), &ArtifactId::new("a"));
        assert_eq!(path.to(), &ArtifactId::new("c"));
        assert_eq!(path.distance(), 3);
        assert_eq!(path.len(), 2);
        assert_eq!(path.tiles().count(), 3);
        assert!(path.visits(&ArtifactId::new("b")));
    }

    #[test]
    fn test_rejects_empty_and_gaps() {
        assert!(TilePath::new(Vec::new()).is_none());
        assert!(TilePath::new([
            TileRelation::new("a", "b", "east"),
            TileRelation::new("c", "d", "east"),
        ])
        .is_none());
    }

    #[test]
    fn test_extended() {
        let path = TilePath::synthetic("e1", "g1", "castle", 2);
        assert_eq!(path.distance(), 2);

        let longer = path.extended(TileRelation::new("g1", "h1", "east")).unwrap();
        assert_eq!(longer.distance(), 3);
        assert!(path.extended(TileRelation::new("a1", "b1", "east")).is_none());
    }
}
