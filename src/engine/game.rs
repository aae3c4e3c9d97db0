//! Game definition: the artifacts a game is made of.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::board::Board;
use crate::core::{ArtifactId, Dice, Piece, Player, PlayerId};

/// Immutable game definition produced by
/// [`GameBuilder`](super::GameBuilder).
#[derive(Clone, Debug)]
pub struct Game {
    board: Arc<Board>,
    players: Vec<Player>,
    pieces: Vec<Piece>,
    dice: Vec<Dice>,
    custom: Vec<ArtifactId>,
    piece_index: FxHashMap<ArtifactId, usize>,
    player_index: FxHashMap<ArtifactId, PlayerId>,
}

impl Game {
    pub(crate) fn new(
        board: Arc<Board>,
        players: Vec<Player>,
        pieces: Vec<Piece>,
        dice: Vec<Dice>,
        custom: Vec<ArtifactId>,
    ) -> Self {
        let piece_index = pieces
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        let player_index = players.iter().map(|p| (p.id.clone(), p.index)).collect();
        Self {
            board,
            players,
            pieces,
            dice,
            custom,
            piece_index,
            player_index,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn shared_board(&self) -> Arc<Board> {
        Arc::clone(&self.board)
    }

    /// Players in declaration order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Pieces in declaration order.
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    #[must_use]
    pub fn dice(&self) -> &[Dice] {
        &self.dice
    }

    /// Game-defined artifacts (counters, sentinels).
    #[must_use]
    pub fn custom_artifacts(&self) -> &[ArtifactId] {
        &self.custom
    }

    #[must_use]
    pub fn piece(&self, id: &ArtifactId) -> Option<&Piece> {
        self.piece_index.get(id).map(|&i| &self.pieces[i])
    }

    #[must_use]
    pub fn player(&self, id: &ArtifactId) -> Option<&Player> {
        self.player_index(id).map(|index| &self.players[index.index()])
    }

    #[must_use]
    pub fn player_index(&self, id: &ArtifactId) -> Option<PlayerId> {
        self.player_index.get(id).copied()
    }

    #[must_use]
    pub fn die(&self, id: &ArtifactId) -> Option<&Dice> {
        self.dice.iter().find(|d| &d.id == id)
    }

    /// Check whether any artifact of the game carries this id.
    #[must_use]
    pub fn contains_artifact(&self, id: &ArtifactId) -> bool {
        self.board.contains_tile(id)
            || self.piece_index.contains_key(id)
            || self.player_index.contains_key(id)
            || self.die(id).is_some()
            || self.custom.contains(id)
    }
}
