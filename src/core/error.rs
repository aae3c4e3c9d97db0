//! Error types.
//!
//! Two disjoint classes:
//! - [`BuildError`]: malformed board/phase definitions, raised while the game
//!   is being built and never recovered from.
//! - [`EngineError`]: defects inside the engine or a misbehaving mutator.
//!
//! Play-time rejections are not errors; they are
//! [`ConditionResponse`](crate::flows::ConditionResponse) values.

use thiserror::Error;

use super::artifact::ArtifactId;

/// Construction-time fault.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("phase number must be positive (phase '{label}')")]
    InvalidPhaseNumber { label: String },

    #[error("phase {number} has no condition")]
    MissingCondition { number: u32 },

    #[error("phase {number} has neither a rule nor child phases")]
    MissingRule { number: u32 },

    #[error("phase {number} declares both rules and child phases")]
    AmbiguousPhase { number: u32 },

    #[error("composite condition mixes All and Any at one level")]
    MixedComposition,

    #[error("composite condition has no children")]
    EmptyComposition,

    #[error("game has no root phase")]
    MissingRootPhase,

    #[error("duplicate artifact id '{0}'")]
    DuplicateArtifact(ArtifactId),

    #[error("unknown tile '{0}'")]
    UnknownTile(ArtifactId),

    #[error("unknown player '{0}'")]
    UnknownPlayer(ArtifactId),

    #[error("{count} players declared, at most {max} supported")]
    TooManyPlayers { count: usize, max: usize },

    #[error("unknown direction '{0}'")]
    UnknownDirection(String),

    #[error("relation {from} -> {to} must have a positive distance")]
    InvalidDistance { from: ArtifactId, to: ArtifactId },
}

/// Engine defect.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("mutator referenced unknown artifact '{0}'")]
    UnknownArtifact(ArtifactId),

    #[error("canonical serialization failed: {0}")]
    Serialization(#[from] bincode::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = BuildError::MissingCondition { number: 3 };
        assert_eq!(err.to_string(), "phase 3 has no condition");

        let err = EngineError::UnknownArtifact(ArtifactId::new("ghost"));
        assert_eq!(err.to_string(), "mutator referenced unknown artifact 'ghost'");
    }
}
