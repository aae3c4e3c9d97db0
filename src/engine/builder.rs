//! Build-time registration of a game.
//!
//! `GameBuilder` collects the board, artifacts, phases and configuration,
//! validates them, and compiles the whole thing into a [`GameProgress`]
//! positioned at the initial state (sequence 0).

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::{debug, instrument};

use super::context::EngineCapabilities;
use super::game::Game;
use super::progress::{GameEngine, GameProgress};
use crate::accel::{AttackRays, PieceLayout};
use crate::board::{Board, BoardShape, Direction, TileRelation};
use crate::core::{
    ArtifactId, ArtifactState, BuildError, Dice, EngineConfig, GameState, Piece, Player, PlayerId, Tile, MAX_PLAYERS,
};
use crate::flows::PhaseBuilder;
use crate::patterns::{CompiledResolver, GeometricResolver, PathResolver};

/// Registration surface for a game definition.
///
/// ```
/// use rust_boards::board::{Direction, TileRelation};
/// use rust_boards::core::Piece;
/// use rust_boards::engine::GameBuilder;
/// use rust_boards::flows::{AlwaysCondition, MovePieceEvent, MovePieceMutator, PathResolvesCondition, PhaseBuilder, Rule};
/// use rust_boards::patterns::Pattern;
///
/// let progress = GameBuilder::new()
///     .with_tiles(["a", "b", "c"])
///     .with_relation(TileRelation::new("a", "b", "east"))
///     .with_relation(TileRelation::new("b", "c", "east"))
///     .with_player("white")
///     .with_piece_at(
///         Piece::new("rook").owned_by("white").with_pattern(Pattern::direction(Direction::east(), true)),
///         "a",
///     )
///     .with_phase(
///         PhaseBuilder::new(1, "move")
///             .with_condition(AlwaysCondition)
///             .with_rule(Rule::<MovePieceEvent>::new("slide", PathResolvesCondition, MovePieceMutator::new())),
///     )
///     .compile()
///     .unwrap();
///
/// let moved = progress.move_piece(&"rook".into(), &"c".into()).unwrap();
/// assert_eq!(moved.state().piece_tile(&"rook".into()), Some(&"c".into()));
/// ```
#[derive(Default)]
pub struct GameBuilder {
    tiles: Vec<Tile>,
    relations: Vec<TileRelation>,
    directions: Vec<Direction>,
    players: Vec<ArtifactId>,
    pieces: Vec<(Piece, Option<ArtifactId>)>,
    dice: Vec<Dice>,
    custom: Vec<(ArtifactId, Option<i64>)>,
    phases: Vec<PhaseBuilder>,
    config: EngineConfig,
    starting_player: Option<ArtifactId>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tile(mut self, tile: impl Into<ArtifactId>) -> Self {
        self.tiles.push(Tile::new(tile));
        self
    }

    #[must_use]
    pub fn with_tiles<T: Into<ArtifactId>>(mut self, tiles: impl IntoIterator<Item = T>) -> Self {
        self.tiles.extend(tiles.into_iter().map(Tile::new));
        self
    }

    #[must_use]
    pub fn with_relation(mut self, relation: TileRelation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Declare a direction. Once any direction is declared, relations and
    /// piece patterns may only use declared directions.
    #[must_use]
    pub fn with_direction(mut self, direction: impl Into<Direction>) -> Self {
        self.directions.push(direction.into());
        self
    }

    /// Add a player. Declaration order defines [`PlayerId`]s.
    #[must_use]
    pub fn with_player(mut self, player: impl Into<ArtifactId>) -> Self {
        self.players.push(player.into());
        self
    }

    /// Add a piece that starts off the board.
    #[must_use]
    pub fn with_piece(mut self, piece: Piece) -> Self {
        self.pieces.push((piece, None));
        self
    }

    /// Add a piece standing on `tile`.
    #[must_use]
    pub fn with_piece_at(mut self, piece: Piece, tile: impl Into<ArtifactId>) -> Self {
        self.pieces.push((piece, Some(tile.into())));
        self
    }

    /// Add a die (initially unrolled).
    #[must_use]
    pub fn with_dice(mut self, dice: Dice) -> Self {
        self.dice.push(dice);
        self
    }

    /// Add a game-defined counter with an initial value.
    #[must_use]
    pub fn with_counter(mut self, id: impl Into<ArtifactId>, value: i64) -> Self {
        self.custom.push((id.into(), Some(value)));
        self
    }

    /// Add a game-defined sentinel with no initial state (e.g. "game over").
    #[must_use]
    pub fn with_sentinel(mut self, id: impl Into<ArtifactId>) -> Self {
        self.custom.push((id.into(), None));
        self
    }

    /// Add a root phase. Roots are tried in declaration order.
    #[must_use]
    pub fn with_phase(mut self, phase: PhaseBuilder) -> Self {
        self.phases.push(phase);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Player active in the initial state (defaults to the first player).
    #[must_use]
    pub fn starting_player(mut self, player: impl Into<ArtifactId>) -> Self {
        self.starting_player = Some(player.into());
        self
    }

    /// Validate everything and produce the initial [`GameProgress`].
    #[instrument(skip_all, fields(tiles = self.tiles.len(), pieces = self.pieces.len(), phases = self.phases.len()))]
    pub fn compile(self) -> Result<GameProgress, BuildError> {
        if self.phases.is_empty() {
            return Err(BuildError::MissingRootPhase);
        }
        self.check_directions()?;
        if self.players.len() > MAX_PLAYERS {
            return Err(BuildError::TooManyPlayers {
                count: self.players.len(),
                max: MAX_PLAYERS,
            });
        }

        let board = Arc::new(Board::new(self.tiles, self.relations)?);

        let mut seen: FxHashSet<&ArtifactId> = board.tiles().iter().map(|t| &t.id).collect();
        let ids = self
            .players
            .iter()
            .chain(self.pieces.iter().map(|(p, _)| &p.id))
            .chain(self.dice.iter().map(|d| &d.id))
            .chain(self.custom.iter().map(|(id, _)| id));
        for id in ids {
            if !seen.insert(id) {
                return Err(BuildError::DuplicateArtifact(id.clone()));
            }
        }

        let players: Vec<Player> = self
            .players
            .iter()
            .enumerate()
            .map(|(i, id)| Player {
                id: id.clone(),
                index: PlayerId::new(i as u8),
            })
            .collect();

        let starting = match &self.starting_player {
            Some(id) if !self.players.contains(id) => return Err(BuildError::UnknownPlayer(id.clone())),
            Some(id) => Some(id),
            None => self.players.first(),
        };

        let mut initial: Vec<(ArtifactId, ArtifactState)> = Vec::new();
        for player in &players {
            initial.push((
                player.id.clone(),
                ArtifactState::ActivePlayer {
                    active: Some(&player.id) == starting,
                },
            ));
        }
        for (piece, start) in &self.pieces {
            if let Some(owner) = &piece.owner {
                if !self.players.contains(owner) {
                    return Err(BuildError::UnknownPlayer(owner.clone()));
                }
            }
            if let Some(tile) = start {
                if !board.contains_tile(tile) {
                    return Err(BuildError::UnknownTile(tile.clone()));
                }
                initial.push((piece.id.clone(), ArtifactState::piece_on(tile.clone())));
            }
        }
        initial.extend(self.dice.iter().map(|d| (d.id.clone(), ArtifactState::unrolled())));
        initial.extend(
            self.custom
                .iter()
                .filter_map(|(id, value)| Some((id.clone(), ArtifactState::Value((*value)?)))),
        );

        let phases = self
            .phases
            .into_iter()
            .map(PhaseBuilder::build)
            .collect::<Result<Vec<_>, _>>()?;

        let pieces: Vec<Piece> = self.pieces.into_iter().map(|(piece, _)| piece).collect();
        let shape = Arc::new(BoardShape::new(&board));
        let layout = Arc::new(PieceLayout::new(&pieces, &players));

        let resolver: Arc<dyn PathResolver> = if self.config.compiled_patterns {
            let compiled = CompiledResolver::compile(Arc::clone(&board), Arc::clone(&shape), &pieces);
            debug!(entries = compiled.entry_count(), "compiled movement patterns");
            Arc::new(compiled)
        } else {
            Arc::new(GeometricResolver::new(Arc::clone(&board)))
        };
        let rays = self.config.bitboards.then(|| Arc::new(AttackRays::generate(&shape)));

        let capabilities = EngineCapabilities::new(resolver, shape, layout, rays, self.config);
        let custom = self.custom.into_iter().map(|(id, _)| id).collect();
        let game = Game::new(board, players, pieces, self.dice, custom);

        let engine = Arc::new(GameEngine::new(game, capabilities, phases));
        Ok(GameProgress::initial(engine, GameState::new(initial)))
    }

    fn check_directions(&self) -> Result<(), BuildError> {
        if self.directions.is_empty() {
            return Ok(());
        }
        let used = self
            .relations
            .iter()
            .map(|r| &r.direction)
            .chain(self.pieces.iter().flat_map(|(p, _)| p.patterns.iter().flat_map(|pattern| pattern.directions())));
        for direction in used {
            if !self.directions.contains(direction) {
                return Err(BuildError::UnknownDirection(direction.as_str().to_owned()));
            }
        }
        Ok(())
    }
}
