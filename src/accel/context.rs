//! Per-state acceleration caches.
//!
//! An [`AccelerationContext`] pairs one `GameState` with its piece map and
//! bitboards. The engine produces a fresh context for every accepted
//! transition, by full rebuild unless incremental patching is enabled.
//!
//! ## Incremental patching
//!
//! Patching touches only pieces whose state changed and recomputes the bits
//! of the tiles they left and entered from the piece map. Clearing a tile
//! bit blindly on departure desyncs occupancy when two pieces share a tile,
//! so bits are always derived from per-tile counts. With
//! `verify_incremental` set, each patch is compared against a full rebuild
//! and the rebuild wins on mismatch.

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::warn;

use super::snapshot::{BitboardSnapshot, PieceLayout, PieceMapSnapshot};
use crate::board::BoardShape;
use crate::core::{EngineConfig, GameState};

/// Occupancy caches for one state.
#[derive(Clone, Debug)]
pub struct AccelerationContext {
    shape: Arc<BoardShape>,
    layout: Arc<PieceLayout>,
    pieces: PieceMapSnapshot,
    bitboards: BitboardSnapshot,
}

impl AccelerationContext {
    /// Full rebuild for `state`.
    pub fn build(shape: Arc<BoardShape>, layout: Arc<PieceLayout>, state: &GameState) -> Self {
        let pieces = PieceMapSnapshot::build(state, &shape, &layout);
        let bitboards = BitboardSnapshot::build(&pieces, &shape, &layout);
        Self {
            shape,
            layout,
            pieces,
            bitboards,
        }
    }

    /// Context for `next`, given that `self` describes `previous`.
    pub fn advance(&self, previous: &GameState, next: &GameState, config: &EngineConfig) -> Self {
        if !config.incremental_bitboards {
            return Self::build(Arc::clone(&self.shape), Arc::clone(&self.layout), next);
        }

        let patched = self.patched(previous, next);
        if !config.verify_incremental {
            return patched;
        }

        let rebuilt = Self::build(Arc::clone(&self.shape), Arc::clone(&self.layout), next);
        if patched.pieces != rebuilt.pieces || patched.bitboards != rebuilt.bitboards {
            warn!(
                sequence = next.sequence(),
                "incremental bitboard patch disagrees with full rebuild; using rebuild"
            );
        }
        rebuilt
    }

    fn patched(&self, previous: &GameState, next: &GameState) -> Self {
        let mut patched = self.clone();
        let mut touched: SmallVec<[u32; 8]> = SmallVec::new();

        for artifact in previous.changed_artifacts(next) {
            let Some(piece) = self.layout.piece_index(&artifact) else {
                continue;
            };
            let to = next.piece_tile(&artifact).and_then(|t| self.shape.tile_index(t));
            touched.extend(patched.pieces.relocate(piece, to).into_iter().flatten());
        }

        for tile in touched {
            patched.bitboards.refresh_tile(tile, &patched.pieces, &self.layout);
        }
        patched
    }

    #[must_use]
    pub fn shape(&self) -> &BoardShape {
        &self.shape
    }

    #[must_use]
    pub fn layout(&self) -> &PieceLayout {
        &self.layout
    }

    #[must_use]
    pub fn pieces(&self) -> &PieceMapSnapshot {
        &self.pieces
    }

    #[must_use]
    pub fn bitboards(&self) -> &BitboardSnapshot {
        &self.bitboards
    }
}
