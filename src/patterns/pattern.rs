//! Movement pattern descriptions.

use serde::{Deserialize, Serialize};

use crate::board::Direction;

/// How a piece may move.
///
/// Patterns are plain data; resolvers interpret them by exhaustive matching.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern {
    /// Move along one direction, once or repeatedly.
    Direction { direction: Direction, repeatable: bool },

    /// Move along any one of several directions (no turning mid-move).
    MultiDirection { directions: Vec<Direction>, repeatable: bool },

    /// Follow an exact ordered sequence of directions (e.g. a knight's L).
    Fixed { directions: Vec<Direction> },

    /// Any route over the relation graph; resolves to a minimum-distance path.
    Any,

    /// Never resolves.
    Null,
}

impl Pattern {
    pub fn direction(direction: Direction, repeatable: bool) -> Self {
        Self::Direction { direction, repeatable }
    }

    pub fn multi_direction(directions: impl IntoIterator<Item = Direction>, repeatable: bool) -> Self {
        Self::MultiDirection {
            directions: directions.into_iter().collect(),
            repeatable,
        }
    }

    pub fn fixed(directions: impl IntoIterator<Item = Direction>) -> Self {
        Self::Fixed {
            directions: directions.into_iter().collect(),
        }
    }

    /// Whether this pattern slides along rays (repeatable and directional).
    #[must_use]
    pub fn is_sliding(&self) -> bool {
        matches!(
            self,
            Self::Direction { repeatable: true, .. } | Self::MultiDirection { repeatable: true, .. }
        )
    }

    /// Directions this pattern may start out in. Empty for `Any`/`Null`.
    #[must_use]
    pub fn directions(&self) -> &[Direction] {
        match self {
            Self::Direction { direction, .. } => std::slice::from_ref(direction),
            Self::MultiDirection { directions, .. } | Self::Fixed { directions } => directions,
            Self::Any | Self::Null => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sliding() {
        assert!(Pattern::direction(Direction::north(), true).is_sliding());
        assert!(!Pattern::direction(Direction::north(), false).is_sliding());
        assert!(Pattern::multi_direction(Direction::diagonal(), true).is_sliding());
        assert!(!Pattern::fixed([Direction::north(), Direction::north(), Direction::east()]).is_sliding());
        assert!(!Pattern::Any.is_sliding());
    }

    #[test]
    fn test_directions() {
        assert_eq!(Pattern::direction(Direction::west(), false).directions(), &[Direction::west()]);
        assert_eq!(Pattern::multi_direction(Direction::orthogonal(), false).directions().len(), 4);
        assert!(Pattern::Null.directions().is_empty());
    }

    #[test]
    fn test_serialization() {
        let pattern = Pattern::fixed([Direction::north(), Direction::east()]);
        let json = serde_json::to_string(&pattern).unwrap();
        let deserialized: Pattern = serde_json::from_str(&json).unwrap();
        assert_eq!(pattern, deserialized);
    }
}
