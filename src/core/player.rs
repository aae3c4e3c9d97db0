//! Dense player indices.
//!
//! Players are artifacts identified by [`ArtifactId`](super::ArtifactId).
//! [`PlayerId`] is their position in declaration order, the compact key
//! the acceleration layer uses for per-player bitboards ([`PlayerMap`]).

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Most players a game may declare.
pub const MAX_PLAYERS: usize = u8::MAX as usize;

/// 0-based player index in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Indices of the first `player_count` players (at most [`MAX_PLAYERS`]).
    ///
    /// ```
    /// use rust_boards::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(2).collect();
    /// assert_eq!(players, vec![PlayerId::new(0), PlayerId::new(1)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count.min(MAX_PLAYERS)).map(|i| PlayerId(i as u8))
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One value per player, indexed by [`PlayerId`].
///
/// A board may declare no players at all (puzzles, pure geometry), so the
/// map may be empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build one entry per player with `factory`.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: PlayerId::all(player_count).map(factory).collect(),
        }
    }

    /// `None` for players outside the map.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}
