//! Board topology: tiles, directed relations, resolved paths and the dense
//! index (`BoardShape`) the acceleration layer runs on.
//!
//! ## Example
//!
//! ```
//! use rust_boards::board::{Board, BoardShape, Direction, TileRelation, Topology};
//! use rust_boards::core::Tile;
//!
//! let board = Board::new(
//!     vec![Tile::new("a"), Tile::new("b")],
//!     vec![
//!         TileRelation::new("a", "b", "east"),
//!         TileRelation::new("b", "a", "west"),
//!     ],
//! )
//! .unwrap();
//!
//! let shape = BoardShape::new(&board);
//! assert_eq!(shape.tile_count(), 2);
//! assert_eq!(board.topology(), Topology::Arbitrary);
//! assert!(board.relation_from(&"a".into(), &Direction::east()).is_some());
//! ```

mod direction;
mod layout;
mod path;
mod shape;

pub use direction::{Direction, Topology};
pub use layout::{Board, TileRelation};
pub use path::TilePath;
pub use shape::{BoardShape, Neighbor};
