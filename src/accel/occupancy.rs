//! Occupancy queries: "is this tile empty / whose piece stands here".
//!
//! [`NaiveOccupancy`] scans the `GameState` on every query and is always
//! correct. [`BitboardOccupancy`] answers from an
//! [`AccelerationContext`](super::AccelerationContext) in O(1). The two must
//! agree for every tile and player at every reachable state.

use super::bitboard::Bitboard;
use super::context::AccelerationContext;
use super::snapshot::PieceLayout;
use crate::board::BoardShape;
use crate::core::{ArtifactId, GameState, PlayerId};

/// Occupancy capability.
pub trait OccupancyIndex {
    fn shape(&self) -> &BoardShape;

    fn player_count(&self) -> usize;

    fn is_empty_at(&self, tile: u32) -> bool;

    fn is_owned_at(&self, tile: u32, player: PlayerId) -> bool;

    fn global_mask(&self) -> Bitboard;

    fn player_mask(&self, player: PlayerId) -> Bitboard;

    /// Unknown tiles count as empty.
    fn is_empty(&self, tile: &ArtifactId) -> bool {
        self.shape().tile_index(tile).map_or(true, |t| self.is_empty_at(t))
    }

    fn is_owned_by(&self, tile: &ArtifactId, player: PlayerId) -> bool {
        self.shape()
            .tile_index(tile)
            .is_some_and(|t| self.is_owned_at(t, player))
    }

    /// First player (by index) owning a piece on `tile`.
    fn owner_at(&self, tile: u32) -> Option<PlayerId> {
        PlayerId::all(self.player_count()).find(|&p| self.is_owned_at(tile, p))
    }
}

/// Linear scan over piece states.
pub struct NaiveOccupancy<'a> {
    state: &'a GameState,
    shape: &'a BoardShape,
    layout: &'a PieceLayout,
}

impl<'a> NaiveOccupancy<'a> {
    pub fn new(state: &'a GameState, shape: &'a BoardShape, layout: &'a PieceLayout) -> Self {
        Self { state, shape, layout }
    }

    /// Declared pieces on the board as (piece, tile index).
    fn placed(&self) -> impl Iterator<Item = (&'a ArtifactId, u32)> + '_ {
        self.state.pieces().filter_map(|(piece, tile)| {
            self.layout.piece_index(piece)?;
            Some((piece, self.shape.tile_index(tile)?))
        })
    }
}

impl OccupancyIndex for NaiveOccupancy<'_> {
    fn shape(&self) -> &BoardShape {
        self.shape
    }

    fn player_count(&self) -> usize {
        self.layout.player_count()
    }

    fn is_empty_at(&self, tile: u32) -> bool {
        !self.placed().any(|(_, t)| t == tile)
    }

    fn is_owned_at(&self, tile: u32, player: PlayerId) -> bool {
        self.placed()
            .any(|(piece, t)| t == tile && self.layout.owner_of(piece) == Some(player))
    }

    fn global_mask(&self) -> Bitboard {
        Bitboard::from_indices(self.shape.tile_count(), self.placed().map(|(_, t)| t))
    }

    fn player_mask(&self, player: PlayerId) -> Bitboard {
        Bitboard::from_indices(
            self.shape.tile_count(),
            self.placed()
                .filter(|(piece, _)| self.layout.owner_of(piece) == Some(player))
                .map(|(_, t)| t),
        )
    }
}

/// O(1) queries over a bitboard snapshot.
pub struct BitboardOccupancy<'a> {
    context: &'a AccelerationContext,
}

impl<'a> BitboardOccupancy<'a> {
    pub fn new(context: &'a AccelerationContext) -> Self {
        Self { context }
    }
}

impl OccupancyIndex for BitboardOccupancy<'_> {
    fn shape(&self) -> &BoardShape {
        self.context.shape()
    }

    fn player_count(&self) -> usize {
        self.context.layout().player_count()
    }

    #[inline]
    fn is_empty_at(&self, tile: u32) -> bool {
        !self.context.bitboards().global.contains(tile)
    }

    #[inline]
    fn is_owned_at(&self, tile: u32, player: PlayerId) -> bool {
        self.context
            .bitboards()
            .player(player)
            .is_some_and(|mask| mask.contains(tile))
    }

    fn global_mask(&self) -> Bitboard {
        self.context.bitboards().global.clone()
    }

    fn player_mask(&self, player: PlayerId) -> Bitboard {
        self.context
            .bitboards()
            .player(player)
            .cloned()
            .unwrap_or_else(|| Bitboard::with_tiles(self.shape().tile_count()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::board::{Board, TileRelation};
    use crate::core::{ArtifactState, Piece, Player, Tile};

    #[test]
    fn test_naive_and_bitboard_agree() {
        let board = Board::new(
            vec![Tile::new("a"), Tile::new("b"), Tile::new("c")],
            vec![TileRelation::new("a", "b", "east"), TileRelation::new("b", "c", "east")],
        )
        .unwrap();
        let shape = Arc::new(BoardShape::new(&board));
        let players = vec![
            Player { id: "white".into(), index: PlayerId::new(0) },
            Player { id: "black".into(), index: PlayerId::new(1) },
        ];
        let layout = Arc::new(PieceLayout::new(
            &[Piece::new("w").owned_by("white"), Piece::new("k").owned_by("black")],
            &players,
        ));
        let state = GameState::new([
            ("w".into(), ArtifactState::piece_on("a")),
            ("k".into(), ArtifactState::piece_on("c")),
        ]);

        let ctx = AccelerationContext::build(Arc::clone(&shape), Arc::clone(&layout), &state);
        let naive = NaiveOccupancy::new(&state, &shape, &layout);
        let fast = BitboardOccupancy::new(&ctx);

        for tile in ["a", "b", "c", "missing"] {
            let tile = ArtifactId::new(tile);
            assert_eq!(naive.is_empty(&tile), fast.is_empty(&tile));
            for player in PlayerId::all(2) {
                assert_eq!(naive.is_owned_by(&tile, player), fast.is_owned_by(&tile, player));
            }
        }
        assert_eq!(naive.global_mask(), fast.global_mask());
        assert_eq!(naive.player_mask(PlayerId::new(1)), fast.player_mask(PlayerId::new(1)));
        assert_eq!(fast.owner_at(2), Some(PlayerId::new(1)));
        assert_eq!(naive.owner_at(1), None);
    }
}
