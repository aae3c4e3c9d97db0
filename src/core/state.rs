//! Immutable game state.
//!
//! ## ArtifactState
//!
//! The per-snapshot value attached to one artifact: where a piece stands,
//! what a die shows, which player is active, or a game-defined `i64`
//! counter/sentinel. Equality is value-based.
//!
//! ## GameState
//!
//! A mapping from artifact to its latest `ArtifactState` plus a monotonically
//! increasing sequence position. States are never mutated: every accepted
//! event produces a successor through [`GameState::next`].
//!
//! Uses `im::OrdMap` so successors share structure with their predecessor
//! (O(1) clone) and iteration is in canonical artifact order.
//!
//! ## State Values (i64 only)
//!
//! Game-defined state uses `ArtifactState::Value(i64)`:
//! - Booleans / sentinels: use 0/1 (e.g. a "game ended" artifact)
//! - Enums: use discriminant values

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::artifact::ArtifactId;

/// State of one artifact in one snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactState {
    /// Piece standing on a tile.
    Piece { tile: ArtifactId },

    /// Piece removed from the board.
    Captured,

    /// Die face. `None` means not rolled yet or already consumed.
    Dice { value: Option<u32> },

    /// Whether a player is the active player.
    ActivePlayer { active: bool },

    /// Game-defined value.
    Value(i64),
}

impl ArtifactState {
    /// Piece standing on `tile`.
    pub fn piece_on(tile: impl Into<ArtifactId>) -> Self {
        Self::Piece { tile: tile.into() }
    }

    /// Die showing `value`.
    #[must_use]
    pub const fn rolled(value: u32) -> Self {
        Self::Dice { value: Some(value) }
    }

    /// Die with no usable value.
    #[must_use]
    pub const fn unrolled() -> Self {
        Self::Dice { value: None }
    }
}

/// Immutable snapshot of all artifact states.
///
/// Equality compares both the artifact mapping and the sequence position.
/// Use [`same_content`](Self::same_content) to ignore the sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    states: OrdMap<ArtifactId, ArtifactState>,
    sequence: u64,
}

impl GameState {
    /// Create an initial state (sequence 0).
    ///
    /// Later entries for the same artifact overwrite earlier ones.
    pub fn new(states: impl IntoIterator<Item = (ArtifactId, ArtifactState)>) -> Self {
        Self {
            states: states.into_iter().collect(),
            sequence: 0,
        }
    }

    /// Sequence position (number of accepted transitions since the initial state).
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Overlay `changes` onto this state.
    ///
    /// Entries overwrite by artifact id. If nothing actually changes the
    /// result is an identical clone and the sequence does not advance, which
    /// lets duplicate events be detected as no-ops.
    #[must_use]
    pub fn next(&self, changes: impl IntoIterator<Item = (ArtifactId, ArtifactState)>) -> Self {
        let mut states = self.states.clone();
        let mut changed = false;

        for (artifact, state) in changes {
            if states.get(&artifact) != Some(&state) {
                states.insert(artifact, state);
                changed = true;
            }
        }

        if !changed {
            return self.clone();
        }

        Self {
            states,
            sequence: self.sequence + 1,
        }
    }

    /// Check whether two states hold the same artifact mapping.
    #[must_use]
    pub fn same_content(&self, other: &GameState) -> bool {
        self.states == other.states
    }

    /// Artifacts whose state differs between `self` and `other`
    /// (present in either, in canonical order).
    #[must_use]
    pub fn changed_artifacts(&self, other: &GameState) -> Vec<ArtifactId> {
        let mut changed: Vec<ArtifactId> = other
            .states
            .iter()
            .filter(|(id, state)| self.states.get(*id) != Some(*state))
            .map(|(id, _)| id.clone())
            .collect();

        changed.extend(
            self.states
                .keys()
                .filter(|id| !other.states.contains_key(*id))
                .cloned(),
        );
        changed.sort();
        changed
    }

    // === Queries ===

    /// Get an artifact's state.
    #[must_use]
    pub fn get(&self, artifact: &ArtifactId) -> Option<&ArtifactState> {
        self.states.get(artifact)
    }

    /// Tile a piece currently stands on. `None` if captured or unknown.
    #[must_use]
    pub fn piece_tile(&self, piece: &ArtifactId) -> Option<&ArtifactId> {
        match self.states.get(piece) {
            Some(ArtifactState::Piece { tile }) => Some(tile),
            _ => None,
        }
    }

    /// Check whether a piece has been captured.
    #[must_use]
    pub fn is_captured(&self, piece: &ArtifactId) -> bool {
        matches!(self.states.get(piece), Some(ArtifactState::Captured))
    }

    /// Current die value, if rolled and unused.
    #[must_use]
    pub fn dice_value(&self, dice: &ArtifactId) -> Option<u32> {
        match self.states.get(dice) {
            Some(ArtifactState::Dice { value }) => *value,
            _ => None,
        }
    }

    /// Game-defined value of an artifact.
    #[must_use]
    pub fn value_of(&self, artifact: &ArtifactId) -> Option<i64> {
        match self.states.get(artifact) {
            Some(ArtifactState::Value(value)) => Some(*value),
            _ => None,
        }
    }

    /// The active player, if any player state marks one active.
    #[must_use]
    pub fn active_player(&self) -> Option<&ArtifactId> {
        self.states.iter().find_map(|(id, state)| match state {
            ArtifactState::ActivePlayer { active: true } => Some(id),
            _ => None,
        })
    }

    /// Iterate pieces on the board as (piece, tile), in canonical order.
    pub fn pieces(&self) -> impl Iterator<Item = (&ArtifactId, &ArtifactId)> {
        self.states.iter().filter_map(|(id, state)| match state {
            ArtifactState::Piece { tile } => Some((id, tile)),
            _ => None,
        })
    }

    /// Iterate dice as (dice, value), in canonical order.
    pub fn dice(&self) -> impl Iterator<Item = (&ArtifactId, Option<u32>)> {
        self.states.iter().filter_map(|(id, state)| match state {
            ArtifactState::Dice { value } => Some((id, *value)),
            _ => None,
        })
    }

    /// Iterate all entries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&ArtifactId, &ArtifactState)> {
        self.states.iter()
    }

    /// Number of artifacts with state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check if no artifact has state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
