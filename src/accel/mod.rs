//! Acceleration layer: bitboards, occupancy, attack rays.
//!
//! Everything here is a cache derived from a [`GameState`](crate::core::GameState)
//! and the board definition. Correctness is defined by agreement with the
//! unaccelerated path:
//!
//! - [`BitboardOccupancy`] must agree with [`NaiveOccupancy`]
//! - incremental snapshot patches must agree with a full rebuild
//! - ray-based [`Mobility`] must agree with a neighbor-table walk
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use rust_boards::accel::{AccelerationContext, BitboardOccupancy, OccupancyIndex, PieceLayout};
//! use rust_boards::board::{Board, BoardShape, TileRelation};
//! use rust_boards::core::{ArtifactState, GameState, Piece, Player, PlayerId, Tile};
//!
//! let board = Board::new(
//!     vec![Tile::new("a"), Tile::new("b")],
//!     vec![TileRelation::new("a", "b", "east")],
//! )
//! .unwrap();
//! let players = [Player { id: "white".into(), index: PlayerId::new(0) }];
//! let layout = PieceLayout::new(&[Piece::new("w").owned_by("white")], &players);
//! let state = GameState::new([("w".into(), ArtifactState::piece_on("b"))]);
//!
//! let ctx = AccelerationContext::build(Arc::new(BoardShape::new(&board)), Arc::new(layout), &state);
//! let occupancy = BitboardOccupancy::new(&ctx);
//! assert!(occupancy.is_empty(&"a".into()));
//! assert!(occupancy.is_owned_by(&"b".into(), PlayerId::new(0)));
//! ```

mod bitboard;
mod context;
mod mobility;
mod occupancy;
mod rays;
mod snapshot;

pub use bitboard::Bitboard;
pub use context::AccelerationContext;
pub use mobility::Mobility;
pub use occupancy::{BitboardOccupancy, NaiveOccupancy, OccupancyIndex};
pub use rays::{AttackRays, MAX_LINEAR_TILES, MAX_RAY_LENGTH, MAX_RAY_SLOTS};
pub use snapshot::{BitboardSnapshot, PieceLayout, PieceMapSnapshot};
