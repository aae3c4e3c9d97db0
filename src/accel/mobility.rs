//! Sliding mobility: how many tiles a piece (or a whole side) can reach
//! with its repeatable directional patterns.

use super::bitboard::Bitboard;
use super::occupancy::OccupancyIndex;
use super::rays::{is_capture, AttackRays, MAX_RAY_LENGTH};
use super::snapshot::PieceLayout;
use crate::core::{GameState, Piece, PlayerId};

/// Mobility evaluator over an occupancy index.
///
/// Uses precomputed rays when available and not neutralized, otherwise walks
/// the neighbor table with the same stopping rules.
pub struct Mobility<'a> {
    occupancy: &'a dyn OccupancyIndex,
    rays: Option<&'a AttackRays>,
}

impl<'a> Mobility<'a> {
    pub fn new(occupancy: &'a dyn OccupancyIndex, rays: Option<&'a AttackRays>) -> Self {
        Self {
            occupancy,
            rays: rays.filter(|r| !r.is_neutralized()),
        }
    }

    /// Tiles a piece standing on `tile` can slide to.
    pub fn targets(&self, piece: &Piece, tile: u32, mover: Option<PlayerId>) -> Bitboard {
        let shape = self.occupancy.shape();
        let mut targets = Bitboard::with_tiles(shape.tile_count());

        for pattern in piece.patterns.iter().filter(|p| p.is_sliding()) {
            for direction in pattern.directions() {
                let Some(dir) = shape.direction_index(direction) else {
                    continue;
                };
                match self.rays {
                    Some(rays) => {
                        for t in rays.sliding_targets(tile, dir, self.occupancy, mover) {
                            targets.set(t);
                        }
                    }
                    None => self.walk(tile, dir, mover, &mut targets),
                }
            }
        }

        targets
    }

    fn walk(&self, origin: u32, dir: u32, mover: Option<PlayerId>, targets: &mut Bitboard) {
        let shape = self.occupancy.shape();
        let mut visited = Bitboard::with_tiles(shape.tile_count());
        visited.set(origin);

        let mut current = origin;
        for _ in 0..MAX_RAY_LENGTH {
            let Some(neighbor) = shape.neighbor(current, dir) else {
                return;
            };
            if visited.contains(neighbor.tile) {
                return;
            }
            visited.set(neighbor.tile);

            if !self.occupancy.is_empty_at(neighbor.tile) {
                if is_capture(self.occupancy, neighbor.tile, mover) {
                    targets.set(neighbor.tile);
                }
                return;
            }
            targets.set(neighbor.tile);
            current = neighbor.tile;
        }
    }

    /// Number of distinct target tiles for one piece.
    pub fn count(&self, piece: &Piece, tile: u32, mover: Option<PlayerId>) -> u32 {
        self.targets(piece, tile, mover).count_ones()
    }

    /// Summed sliding mobility of every piece `player` owns in `state`.
    pub fn player_total(&self, state: &GameState, pieces: &[Piece], layout: &PieceLayout, player: PlayerId) -> u32 {
        let shape = self.occupancy.shape();
        pieces
            .iter()
            .filter(|piece| layout.owner_of(&piece.id) == Some(player))
            .filter_map(|piece| {
                let tile = shape.tile_index(state.piece_tile(&piece.id)?)?;
                Some(self.count(piece, tile, Some(player)))
            })
            .sum()
    }
}
