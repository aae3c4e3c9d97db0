//! Occupancy snapshots derived from a [`GameState`].
//!
//! Snapshots are caches, never authoritative: each one is a pure function of
//! `(GameState, BoardShape, PieceLayout)` and can be rebuilt at any time.
//! Only pieces declared in the game definition are tracked.

use rustc_hash::FxHashMap;

use super::bitboard::Bitboard;
use crate::board::BoardShape;
use crate::core::{ArtifactId, GameState, Piece, Player, PlayerId, PlayerMap};

/// Dense piece indexing (ordinal sort by piece id) with owners resolved to
/// [`PlayerId`]s.
#[derive(Clone, Debug)]
pub struct PieceLayout {
    pieces: Vec<ArtifactId>,
    index: FxHashMap<ArtifactId, u32>,
    owners: Vec<Option<PlayerId>>,
    player_count: usize,
}

impl PieceLayout {
    /// Index `pieces`. Owners that are not among `players` become `None`.
    pub fn new(pieces: &[Piece], players: &[Player]) -> Self {
        let player_ids: FxHashMap<&ArtifactId, PlayerId> =
            players.iter().map(|p| (&p.id, p.index)).collect();

        let mut sorted: Vec<&Piece> = pieces.iter().collect();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));

        let owners = sorted
            .iter()
            .map(|piece| piece.owner.as_ref().and_then(|o| player_ids.get(o).copied()))
            .collect();
        let index = sorted
            .iter()
            .enumerate()
            .map(|(i, piece)| (piece.id.clone(), i as u32))
            .collect();

        Self {
            pieces: sorted.into_iter().map(|p| p.id.clone()).collect(),
            index,
            owners,
            player_count: players.len(),
        }
    }

    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    #[must_use]
    pub fn piece_index(&self, piece: &ArtifactId) -> Option<u32> {
        self.index.get(piece).copied()
    }

    #[must_use]
    pub fn piece_id(&self, index: u32) -> &ArtifactId {
        &self.pieces[index as usize]
    }

    /// Owner of a declared piece.
    #[must_use]
    pub fn owner_of(&self, piece: &ArtifactId) -> Option<PlayerId> {
        self.piece_index(piece).and_then(|i| self.owner_at(i))
    }

    #[must_use]
    pub fn owner_at(&self, index: u32) -> Option<PlayerId> {
        self.owners.get(index as usize).copied().flatten()
    }
}

/// Where every declared piece stands, by index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PieceMapSnapshot {
    /// Tile index per piece index; `None` when captured or off-board.
    tile_of: Vec<Option<u32>>,
    /// Pieces per tile index.
    counts: Vec<u32>,
}

impl PieceMapSnapshot {
    pub fn build(state: &GameState, shape: &BoardShape, layout: &PieceLayout) -> Self {
        let mut snapshot = Self {
            tile_of: vec![None; layout.piece_count()],
            counts: vec![0; shape.tile_count()],
        };

        for (piece, tile) in state.pieces() {
            let (Some(p), Some(t)) = (layout.piece_index(piece), shape.tile_index(tile)) else {
                continue;
            };
            snapshot.tile_of[p as usize] = Some(t);
            snapshot.counts[t as usize] += 1;
        }

        snapshot
    }

    #[must_use]
    pub fn tile_of(&self, piece: u32) -> Option<u32> {
        self.tile_of.get(piece as usize).copied().flatten()
    }

    #[must_use]
    pub fn count_at(&self, tile: u32) -> u32 {
        self.counts.get(tile as usize).copied().unwrap_or(0)
    }

    /// Piece indices standing on `tile`.
    pub fn pieces_at(&self, tile: u32) -> impl Iterator<Item = u32> + '_ {
        self.tile_of
            .iter()
            .enumerate()
            .filter(move |(_, t)| **t == Some(tile))
            .map(|(p, _)| p as u32)
    }

    /// Move one piece. Returns the tiles whose occupancy changed.
    pub(crate) fn relocate(&mut self, piece: u32, to: Option<u32>) -> [Option<u32>; 2] {
        let from = self.tile_of[piece as usize];
        if from == to {
            return [None, None];
        }
        if let Some(t) = from {
            self.counts[t as usize] -= 1;
        }
        if let Some(t) = to {
            self.counts[t as usize] += 1;
        }
        self.tile_of[piece as usize] = to;
        [from, to]
    }
}

/// Global and per-player occupancy masks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitboardSnapshot {
    pub global: Bitboard,
    pub per_player: PlayerMap<Bitboard>,
}

impl BitboardSnapshot {
    /// Full rebuild from a piece map.
    pub fn build(pieces: &PieceMapSnapshot, shape: &BoardShape, layout: &PieceLayout) -> Self {
        let tile_count = shape.tile_count();
        let mut snapshot = Self {
            global: Bitboard::with_tiles(tile_count),
            per_player: PlayerMap::new(layout.player_count(), |_| Bitboard::with_tiles(tile_count)),
        };

        for (piece, tile) in pieces.tile_of.iter().enumerate() {
            let Some(tile) = *tile else { continue };
            snapshot.global.set(tile);
            if let Some(owner) = layout.owner_at(piece as u32) {
                snapshot.per_player[owner].set(tile);
            }
        }

        snapshot
    }

    /// Recompute the bits of one tile from the piece map.
    pub(crate) fn refresh_tile(&mut self, tile: u32, pieces: &PieceMapSnapshot, layout: &PieceLayout) {
        if pieces.count_at(tile) == 0 {
            self.global.clear(tile);
        } else {
            self.global.set(tile);
        }

        for player in PlayerId::all(layout.player_count()) {
            self.per_player[player].clear(tile);
        }
        for piece in pieces.pieces_at(tile) {
            if let Some(owner) = layout.owner_at(piece) {
                self.per_player[owner].set(tile);
            }
        }
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&Bitboard> {
        self.per_player.get(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, TileRelation};
    use crate::core::{ArtifactState, Tile};

    fn setup() -> (BoardShape, PieceLayout) {
        let board = Board::new(
            vec![Tile::new("t0"), Tile::new("t1"), Tile::new("t2")],
            vec![TileRelation::new("t0", "t1", "east"), TileRelation::new("t1", "t2", "east")],
        )
        .unwrap();
        let players = vec![
            Player { id: "white".into(), index: PlayerId::new(0) },
            Player { id: "black".into(), index: PlayerId::new(1) },
        ];
        let pieces = vec![
            Piece::new("w1").owned_by("white"),
            Piece::new("b1").owned_by("black"),
            Piece::new("neutral"),
        ];
        (BoardShape::new(&board), PieceLayout::new(&pieces, &players))
    }

    #[test]
    fn test_layout_sorted() {
        let (_, layout) = setup();
        assert_eq!(layout.piece_id(0), &ArtifactId::new("b1"));
        assert_eq!(layout.owner_of(&"w1".into()), Some(PlayerId::new(0)));
        assert_eq!(layout.owner_of(&"neutral".into()), None);
    }

    #[test]
    fn test_build_masks() {
        let (shape, layout) = setup();
        let state = GameState::new([
            ("w1".into(), ArtifactState::piece_on("t0")),
            ("b1".into(), ArtifactState::piece_on("t2")),
            ("neutral".into(), ArtifactState::piece_on("t1")),
            ("ghost".into(), ArtifactState::piece_on("t1")),
        ]);

        let pieces = PieceMapSnapshot::build(&state, &shape, &layout);
        let boards = BitboardSnapshot::build(&pieces, &shape, &layout);

        assert_eq!(boards.global.count_ones(), 3);
        assert_eq!(pieces.count_at(1), 1);
        assert!(boards.per_player[PlayerId::new(0)].contains(0));
        assert!(boards.per_player[PlayerId::new(1)].contains(2));
        assert!(boards.per_player[PlayerId::new(0)].is_disjoint(&boards.per_player[PlayerId::new(1)]));
    }

    #[test]
    fn test_relocate_and_refresh() {
        let (shape, layout) = setup();
        let state = GameState::new([
            ("w1".into(), ArtifactState::piece_on("t0")),
            ("b1".into(), ArtifactState::piece_on("t0")),
        ]);
        let mut pieces = PieceMapSnapshot::build(&state, &shape, &layout);
        let mut boards = BitboardSnapshot::build(&pieces, &shape, &layout);

        let w1 = layout.piece_index(&"w1".into()).unwrap();
        for tile in pieces.relocate(w1, Some(1)).into_iter().flatten() {
            boards.refresh_tile(tile, &pieces, &layout);
        }

        // Black still stands on t0, so the global bit survives
        assert!(boards.global.contains(0));
        assert!(!boards.per_player[PlayerId::new(0)].contains(0));
        assert!(boards.per_player[PlayerId::new(0)].contains(1));
    }
}
