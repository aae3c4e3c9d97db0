//! Tiles and the directed relation graph connecting them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::direction::{Direction, Topology};
use crate::core::{ArtifactId, BuildError, Tile};

/// Directed edge between two tiles.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRelation {
    pub from: ArtifactId,
    pub to: ArtifactId,
    pub direction: Direction,
    /// Movement cost, at least 1.
    pub distance: u32,
}

impl TileRelation {
    /// Create a relation of distance 1.
    pub fn new(
        from: impl Into<ArtifactId>,
        to: impl Into<ArtifactId>,
        direction: impl Into<Direction>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            direction: direction.into(),
            distance: 1,
        }
    }

    /// Set the distance (builder pattern).
    #[must_use]
    pub fn with_distance(mut self, distance: u32) -> Self {
        self.distance = distance;
        self
    }
}

/// Board definition: tiles plus directed relations.
///
/// The relation graph may contain cycles (ring boards); everything that
/// walks it keeps a visited set.
#[derive(Clone, Debug)]
pub struct Board {
    tiles: Vec<Tile>,
    relations: Vec<TileRelation>,
    directions: Vec<Direction>,
    topology: Topology,

    /// Outgoing relation indices per tile, in declaration order.
    outgoing: FxHashMap<ArtifactId, SmallVec<[usize; 8]>>,
}

impl Board {
    /// Validate and index a board.
    ///
    /// Directions are taken from the relations in first-use order.
    pub fn new(tiles: Vec<Tile>, relations: Vec<TileRelation>) -> Result<Self, BuildError> {
        let mut outgoing: FxHashMap<ArtifactId, SmallVec<[usize; 8]>> = FxHashMap::default();
        for tile in &tiles {
            if outgoing.insert(tile.id.clone(), SmallVec::new()).is_some() {
                return Err(BuildError::DuplicateArtifact(tile.id.clone()));
            }
        }

        let mut directions: Vec<Direction> = Vec::new();
        for (index, relation) in relations.iter().enumerate() {
            if relation.distance == 0 {
                return Err(BuildError::InvalidDistance {
                    from: relation.from.clone(),
                    to: relation.to.clone(),
                });
            }
            if !outgoing.contains_key(&relation.to) {
                return Err(BuildError::UnknownTile(relation.to.clone()));
            }
            let Some(list) = outgoing.get_mut(&relation.from) else {
                return Err(BuildError::UnknownTile(relation.from.clone()));
            };
            list.push(index);

            if !directions.contains(&relation.direction) {
                directions.push(relation.direction.clone());
            }
        }

        let topology = Topology::classify(&directions);

        Ok(Self {
            tiles,
            relations,
            directions,
            topology,
            outgoing,
        })
    }

    /// Tiles in declaration order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// All relations in declaration order.
    #[must_use]
    pub fn relations(&self) -> &[TileRelation] {
        &self.relations
    }

    /// Relation by declaration index.
    #[must_use]
    pub fn relation(&self, index: usize) -> Option<&TileRelation> {
        self.relations.get(index)
    }

    /// Directions used by at least one relation.
    #[must_use]
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[must_use]
    pub fn contains_tile(&self, tile: &ArtifactId) -> bool {
        self.outgoing.contains_key(tile)
    }

    /// Outgoing relations of a tile, in declaration order.
    pub fn relations_from<'a>(&'a self, tile: &ArtifactId) -> impl Iterator<Item = &'a TileRelation> + 'a {
        self.outgoing
            .get(tile)
            .into_iter()
            .flat_map(|list| list.iter())
            .map(move |&i| &self.relations[i])
    }

    /// First declared relation leaving `tile` in `direction`.
    #[must_use]
    pub fn relation_from(&self, tile: &ArtifactId, direction: &Direction) -> Option<&TileRelation> {
        self.relations_from(tile).find(|r| &r.direction == direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Board {
        let tiles = (0..n).map(|i| Tile::new(format!("tile-{i}"))).collect();
        let relations = (0..n - 1)
            .flat_map(|i| {
                [
                    TileRelation::new(format!("tile-{i}").as_str(), format!("tile-{}", i + 1).as_str(), "east"),
                    TileRelation::new(format!("tile-{}", i + 1).as_str(), format!("tile-{i}").as_str(), "west"),
                ]
            })
            .collect();
        Board::new(tiles, relations).unwrap()
    }

    #[test]
    fn test_lookup() {
        let board = line(3);

        assert_eq!(board.tiles().len(), 3);
        assert_eq!(board.relations().len(), 4);
        assert_eq!(board.directions().len(), 2);
        assert_eq!(board.relations_from(&ArtifactId::new("tile-1")).count(), 2);

        let east = board
            .relation_from(&ArtifactId::new("tile-0"), &Direction::east())
            .unwrap();
        assert_eq!(east.to, ArtifactId::new("tile-1"));
        assert!(board.relation_from(&ArtifactId::new("tile-0"), &Direction::west()).is_none());
    }

    #[test]
    fn test_rejects_unknown_tile() {
        let result = Board::new(
            vec![Tile::new("a")],
            vec![TileRelation::new("a", "b", "east")],
        );
        assert_eq!(result.unwrap_err(), BuildError::UnknownTile(ArtifactId::new("b")));
    }

    #[test]
    fn test_rejects_zero_distance() {
        let result = Board::new(
            vec![Tile::new("a"), Tile::new("b")],
            vec![TileRelation::new("a", "b", "east").with_distance(0)],
        );
        assert!(matches!(result, Err(BuildError::InvalidDistance { .. })));
    }

    #[test]
    fn test_rejects_duplicate_tile() {
        let result = Board::new(vec![Tile::new("a"), Tile::new("a")], vec![]);
        assert_eq!(result.unwrap_err(), BuildError::DuplicateArtifact(ArtifactId::new("a")));
    }
}
