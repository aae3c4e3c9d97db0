//! Dense board indexing.
//!
//! `BoardShape` assigns every tile a stable index (ordinal sort by tile id)
//! and every direction a stable index (ordinal sort by name), then flattens
//! the relation graph into a `(tile, direction) -> neighbor` table. The
//! compiled resolver, bitboards and attack rays all work on these indices.

use rustc_hash::FxHashMap;

use super::direction::{Direction, Topology};
use super::layout::Board;
use crate::core::ArtifactId;

/// One entry of the neighbor table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbor {
    /// Destination tile index.
    pub tile: u32,
    /// Index into [`Board::relations`].
    pub relation: u32,
    pub distance: u32,
}

/// Stable tile/direction indexing plus a flattened neighbor table.
#[derive(Clone, Debug)]
pub struct BoardShape {
    tiles: Vec<ArtifactId>,
    tile_index: FxHashMap<ArtifactId, u32>,
    directions: Vec<Direction>,
    direction_index: FxHashMap<Direction, u32>,
    /// `tile * direction_count + direction`
    neighbors: Vec<Option<Neighbor>>,
    topology: Topology,
}

impl BoardShape {
    /// Index a board.
    ///
    /// When several relations leave a tile in the same direction, the first
    /// declared one wins, matching [`Board::relation_from`].
    pub fn new(board: &Board) -> Self {
        let mut tiles: Vec<ArtifactId> = board.tiles().iter().map(|t| t.id.clone()).collect();
        tiles.sort();
        let tile_index: FxHashMap<ArtifactId, u32> = tiles
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i as u32))
            .collect();

        let mut directions: Vec<Direction> = board.directions().to_vec();
        directions.sort();
        let direction_index: FxHashMap<Direction, u32> = directions
            .iter()
            .enumerate()
            .map(|(i, d)| (d.clone(), i as u32))
            .collect();

        let direction_count = directions.len();
        let mut neighbors = vec![None; tiles.len() * direction_count];

        for (relation_idx, relation) in board.relations().iter().enumerate() {
            let from = tile_index[&relation.from] as usize;
            let dir = direction_index[&relation.direction] as usize;
            let slot = &mut neighbors[from * direction_count + dir];
            if slot.is_none() {
                *slot = Some(Neighbor {
                    tile: tile_index[&relation.to],
                    relation: relation_idx as u32,
                    distance: relation.distance,
                });
            }
        }

        Self {
            tiles,
            tile_index,
            directions,
            direction_index,
            neighbors,
            topology: board.topology(),
        }
    }

    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn direction_count(&self) -> usize {
        self.directions.len()
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Index of a tile.
    #[must_use]
    pub fn tile_index(&self, tile: &ArtifactId) -> Option<u32> {
        self.tile_index.get(tile).copied()
    }

    /// Tile id at an index.
    #[must_use]
    pub fn tile_id(&self, index: u32) -> &ArtifactId {
        &self.tiles[index as usize]
    }

    /// Tiles in index order.
    #[must_use]
    pub fn tiles(&self) -> &[ArtifactId] {
        &self.tiles
    }

    /// Index of a direction.
    #[must_use]
    pub fn direction_index(&self, direction: &Direction) -> Option<u32> {
        self.direction_index.get(direction).copied()
    }

    /// Direction at an index.
    #[must_use]
    pub fn direction(&self, index: u32) -> &Direction {
        &self.directions[index as usize]
    }

    /// Directions in index order.
    #[must_use]
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Neighbor of `tile` in `direction`, if any.
    #[inline]
    #[must_use]
    pub fn neighbor(&self, tile: u32, direction: u32) -> Option<Neighbor> {
        self.neighbors[tile as usize * self.directions.len() + direction as usize]
    }
}
