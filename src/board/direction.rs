//! Directions and topology classification.

use serde::{Deserialize, Serialize};

/// A named movement axis ("north", "clockwise", ...).
///
/// Games may use any vocabulary; the well-known compass names are only
/// significant for [`Topology`] classification.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Direction(String);

pub const NORTH: &str = "north";
pub const SOUTH: &str = "south";
pub const EAST: &str = "east";
pub const WEST: &str = "west";
pub const NORTH_EAST: &str = "north-east";
pub const NORTH_WEST: &str = "north-west";
pub const SOUTH_EAST: &str = "south-east";
pub const SOUTH_WEST: &str = "south-west";

const ORTHOGONAL: [&str; 4] = [NORTH, SOUTH, EAST, WEST];
const DIAGONAL: [&str; 4] = [NORTH_EAST, NORTH_WEST, SOUTH_EAST, SOUTH_WEST];

impl Direction {
    /// Create a direction from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn north() -> Self {
        Self::new(NORTH)
    }

    pub fn south() -> Self {
        Self::new(SOUTH)
    }

    pub fn east() -> Self {
        Self::new(EAST)
    }

    pub fn west() -> Self {
        Self::new(WEST)
    }

    pub fn north_east() -> Self {
        Self::new(NORTH_EAST)
    }

    pub fn north_west() -> Self {
        Self::new(NORTH_WEST)
    }

    pub fn south_east() -> Self {
        Self::new(SOUTH_EAST)
    }

    pub fn south_west() -> Self {
        Self::new(SOUTH_WEST)
    }

    /// The four orthogonal compass directions.
    pub fn orthogonal() -> Vec<Self> {
        ORTHOGONAL.iter().map(|d| Self::new(*d)).collect()
    }

    /// The four diagonal compass directions.
    pub fn diagonal() -> Vec<Self> {
        DIAGONAL.iter().map(|d| Self::new(*d)).collect()
    }

    #[must_use]
    pub fn is_orthogonal(&self) -> bool {
        ORTHOGONAL.contains(&self.0.as_str())
    }

    #[must_use]
    pub fn is_diagonal(&self) -> bool {
        DIAGONAL.contains(&self.0.as_str())
    }
}

impl From<&str> for Direction {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Board topology, classified by the direction vocabulary actually used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    /// Exactly the four orthogonal directions.
    Orthogonal,
    /// Exactly the four orthogonal plus the four diagonal directions.
    OrthogonalAndDiagonal,
    /// Anything else (rings, hex grids, custom tracks).
    Arbitrary,
}

impl Topology {
    /// Classify a set of used directions (duplicates are ignored).
    pub fn classify<'a>(directions: impl IntoIterator<Item = &'a Direction>) -> Self {
        let mut orthogonal = [false; 4];
        let mut diagonal = [false; 4];

        for direction in directions {
            let name = direction.as_str();
            if let Some(i) = ORTHOGONAL.iter().position(|d| *d == name) {
                orthogonal[i] = true;
            } else if let Some(i) = DIAGONAL.iter().position(|d| *d == name) {
                diagonal[i] = true;
            } else {
                return Topology::Arbitrary;
            }
        }

        let all_orthogonal = orthogonal.iter().all(|&b| b);
        let any_diagonal = diagonal.iter().any(|&b| b);
        let all_diagonal = diagonal.iter().all(|&b| b);

        match (all_orthogonal, any_diagonal, all_diagonal) {
            (true, false, _) => Topology::Orthogonal,
            (true, true, true) => Topology::OrthogonalAndDiagonal,
            _ => Topology::Arbitrary,
        }
    }
}
