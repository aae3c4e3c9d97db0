//! Built-in conditions and mutators.
//!
//! These are substrate pieces games compose rules from; they encode no
//! particular game.

use super::condition::{ConditionResponse, GameEventCondition, GameStateCondition};
use super::events::{DiceMoveEvent, GameEvent, PieceMovement, RollDiceEvent};
use super::rule::StateMutator;
use crate::core::{ArtifactId, ArtifactState, EngineError, GameState, Piece};
use crate::engine::EvaluationContext;

// === State conditions ===

/// Always valid.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysCondition;

impl GameStateCondition for AlwaysCondition {
    fn evaluate(&self, _: &EvaluationContext<'_>, _: &GameState) -> ConditionResponse {
        ConditionResponse::valid()
    }
}

impl<E: GameEvent> GameEventCondition<E> for AlwaysCondition {
    fn evaluate(&self, _: &EvaluationContext<'_>, _: &GameState, _: &E) -> ConditionResponse {
        ConditionResponse::valid()
    }
}

/// Never valid.
#[derive(Clone, Debug)]
pub struct NeverCondition {
    reason: String,
}

impl NeverCondition {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl GameStateCondition for NeverCondition {
    fn evaluate(&self, _: &EvaluationContext<'_>, _: &GameState) -> ConditionResponse {
        ConditionResponse::invalid(self.reason.clone())
    }
}

impl<E: GameEvent> GameEventCondition<E> for NeverCondition {
    fn evaluate(&self, _: &EvaluationContext<'_>, _: &GameState, _: &E) -> ConditionResponse {
        ConditionResponse::invalid(self.reason.clone())
    }
}

/// Valid when a game-defined value equals `value`.
#[derive(Clone, Debug)]
pub struct ValueEqualsCondition {
    artifact: ArtifactId,
    value: i64,
}

impl ValueEqualsCondition {
    pub fn new(artifact: impl Into<ArtifactId>, value: i64) -> Self {
        Self {
            artifact: artifact.into(),
            value,
        }
    }
}

impl GameStateCondition for ValueEqualsCondition {
    fn evaluate(&self, _: &EvaluationContext<'_>, state: &GameState) -> ConditionResponse {
        ConditionResponse::check(state.value_of(&self.artifact) == Some(self.value), || {
            format!("{} is not {}", self.artifact, self.value)
        })
    }
}

/// Valid while an artifact carries no game-defined value (e.g. no "game
/// ended" sentinel yet).
#[derive(Clone, Debug)]
pub struct ValueAbsentCondition {
    artifact: ArtifactId,
}

impl ValueAbsentCondition {
    pub fn new(artifact: impl Into<ArtifactId>) -> Self {
        Self {
            artifact: artifact.into(),
        }
    }
}

impl GameStateCondition for ValueAbsentCondition {
    fn evaluate(&self, _: &EvaluationContext<'_>, state: &GameState) -> ConditionResponse {
        match state.value_of(&self.artifact) {
            None => ConditionResponse::valid(),
            Some(value) => ConditionResponse::invalid(format!("{} is set to {value}", self.artifact)),
        }
    }
}

/// Dice state check: some die rolled and unused, or every die unrolled.
#[derive(Clone, Copy, Debug)]
pub struct DiceRolledCondition {
    rolled: bool,
}

impl DiceRolledCondition {
    /// Valid when at least one die shows an unused value.
    #[must_use]
    pub fn rolled() -> Self {
        Self { rolled: true }
    }

    /// Valid when no die shows a value.
    #[must_use]
    pub fn unrolled() -> Self {
        Self { rolled: false }
    }

    fn check(&self, state: &GameState) -> ConditionResponse {
        let any_rolled = state.dice().any(|(_, value)| value.is_some());
        match (self.rolled, any_rolled) {
            (true, true) | (false, false) => ConditionResponse::valid(),
            (true, false) => ConditionResponse::invalid("no dice rolled"),
            (false, true) => ConditionResponse::invalid("dice already rolled"),
        }
    }
}

impl GameStateCondition for DiceRolledCondition {
    fn evaluate(&self, _: &EvaluationContext<'_>, state: &GameState) -> ConditionResponse {
        self.check(state)
    }
}

impl<E: GameEvent> GameEventCondition<E> for DiceRolledCondition {
    fn evaluate(&self, _: &EvaluationContext<'_>, state: &GameState, _: &E) -> ConditionResponse {
        self.check(state)
    }
}

/// Every die named by the roll is declared and shows a face in `1..=sides`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RollValuesValidCondition;

impl GameEventCondition<RollDiceEvent> for RollValuesValidCondition {
    fn evaluate(&self, ctx: &EvaluationContext<'_>, _: &GameState, event: &RollDiceEvent) -> ConditionResponse {
        if event.values.is_empty() {
            return ConditionResponse::invalid("no dice values");
        }
        for (dice, value) in &event.values {
            let Some(definition) = ctx.game().die(dice) else {
                return ConditionResponse::invalid(format!("unknown die {dice}"));
            };
            if !(1..=definition.sides).contains(value) {
                return ConditionResponse::invalid(format!("{dice} cannot show {value} on {} sides", definition.sides));
            }
        }
        ConditionResponse::valid()
    }
}

// === Movement conditions ===

fn moving_piece<'g>(ctx: &EvaluationContext<'g>, event: &impl PieceMovement) -> Result<&'g Piece, ConditionResponse> {
    ctx.game()
        .piece(event.piece())
        .ok_or_else(|| ConditionResponse::not_applicable(format!("unknown piece {}", event.piece())))
}

/// The piece stands on the event's source tile.
#[derive(Clone, Copy, Debug, Default)]
pub struct PieceOnSourceCondition;

impl<E: GameEvent + PieceMovement> GameEventCondition<E> for PieceOnSourceCondition {
    fn evaluate(&self, _: &EvaluationContext<'_>, state: &GameState, event: &E) -> ConditionResponse {
        ConditionResponse::check(state.piece_tile(event.piece()) == Some(event.from()), || {
            format!("{} is not on {}", event.piece(), event.from())
        })
    }
}

/// One of the piece's patterns resolves from source to destination.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathResolvesCondition;

impl<E: GameEvent + PieceMovement> GameEventCondition<E> for PathResolvesCondition {
    fn evaluate(&self, ctx: &EvaluationContext<'_>, _: &GameState, event: &E) -> ConditionResponse {
        let piece = match moving_piece(ctx, event) {
            Ok(piece) => piece,
            Err(response) => return response,
        };
        ConditionResponse::check(
            ctx.resolver().resolve(piece, event.from(), event.to()).is_some(),
            || format!("{} cannot move {} -> {}", piece.id, event.from(), event.to()),
        )
    }
}

/// Every tile strictly between source and destination is empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathUnblockedCondition;

impl<E: GameEvent + PieceMovement> GameEventCondition<E> for PathUnblockedCondition {
    fn evaluate(&self, ctx: &EvaluationContext<'_>, _: &GameState, event: &E) -> ConditionResponse {
        let occupancy = ctx.occupancy();
        let path = event.path();
        let blocked = path
            .relations()
            .iter()
            .take(path.len() - 1)
            .find(|relation| !occupancy.is_empty(&relation.to));

        match blocked {
            None => ConditionResponse::valid(),
            Some(relation) => ConditionResponse::invalid(format!("path blocked at {}", relation.to)),
        }
    }
}

/// The destination is not occupied by a piece of the mover's own side.
#[derive(Clone, Copy, Debug, Default)]
pub struct DestinationNotFriendlyCondition;

impl<E: GameEvent + PieceMovement> GameEventCondition<E> for DestinationNotFriendlyCondition {
    fn evaluate(&self, ctx: &EvaluationContext<'_>, _: &GameState, event: &E) -> ConditionResponse {
        let piece = match moving_piece(ctx, event) {
            Ok(piece) => piece,
            Err(response) => return response,
        };
        let Some(player) = piece.owner.as_ref().and_then(|o| ctx.game().player_index(o)) else {
            return ConditionResponse::valid();
        };
        ConditionResponse::check(!ctx.occupancy().is_owned_by(event.to(), player), || {
            format!("{} is occupied by a friendly piece", event.to())
        })
    }
}

/// The die named by the event shows exactly the path distance.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiceMatchesPathCondition;

impl GameEventCondition<DiceMoveEvent> for DiceMatchesPathCondition {
    fn evaluate(&self, _: &EvaluationContext<'_>, state: &GameState, event: &DiceMoveEvent) -> ConditionResponse {
        match state.dice_value(&event.dice) {
            Some(value) if value == event.path.distance() => ConditionResponse::valid(),
            Some(value) => ConditionResponse::invalid(format!(
                "{} shows {value}, path needs {}",
                event.dice,
                event.path.distance()
            )),
            None => ConditionResponse::invalid(format!("{} is not available", event.dice)),
        }
    }
}

/// The moving piece belongs to the active player.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActivePlayerOwnsPieceCondition;

impl<E: GameEvent + PieceMovement> GameEventCondition<E> for ActivePlayerOwnsPieceCondition {
    fn evaluate(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &E) -> ConditionResponse {
        let piece = match moving_piece(ctx, event) {
            Ok(piece) => piece,
            Err(response) => return response,
        };
        match state.active_player() {
            Some(active) if piece.is_owned_by(active) => ConditionResponse::valid(),
            Some(active) => ConditionResponse::invalid(format!("{} does not belong to {active}", piece.id)),
            None => ConditionResponse::ignore("no active player"),
        }
    }
}

// === Mutators ===

/// State changes for moving `piece` to `to`, capturing opposing occupants
/// when `capture` is set.
fn move_changes(
    ctx: &EvaluationContext<'_>,
    state: &GameState,
    piece: &ArtifactId,
    to: &ArtifactId,
    capture: bool,
) -> Result<Vec<(ArtifactId, ArtifactState)>, EngineError> {
    let mover = ctx
        .game()
        .piece(piece)
        .ok_or_else(|| EngineError::UnknownArtifact(piece.clone()))?;
    if !ctx.game().board().contains_tile(to) {
        return Err(EngineError::UnknownArtifact(to.clone()));
    }

    let mut changes = vec![(piece.clone(), ArtifactState::piece_on(to.clone()))];
    if capture {
        for (other, tile) in state.pieces() {
            if other == piece || tile != to {
                continue;
            }
            let opposing = ctx
                .game()
                .piece(other)
                .is_some_and(|occupant| occupant.owner != mover.owner);
            if opposing {
                changes.push((other.clone(), ArtifactState::Captured));
            }
        }
    }
    Ok(changes)
}

/// Moves the piece to the event's destination.
#[derive(Clone, Copy, Debug, Default)]
pub struct MovePieceMutator {
    capture: bool,
}

impl MovePieceMutator {
    #[must_use]
    pub fn new() -> Self {
        Self { capture: false }
    }

    /// Capture opposing pieces on the destination.
    #[must_use]
    pub fn capturing() -> Self {
        Self { capture: true }
    }
}

impl<E: GameEvent + PieceMovement> StateMutator<E> for MovePieceMutator {
    fn apply(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &E) -> Result<GameState, EngineError> {
        Ok(state.next(move_changes(ctx, state, event.piece(), event.to(), self.capture)?))
    }
}

/// Moves the piece and marks the die used.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiceMoveMutator {
    capture: bool,
}

impl DiceMoveMutator {
    #[must_use]
    pub fn new() -> Self {
        Self { capture: false }
    }

    #[must_use]
    pub fn capturing() -> Self {
        Self { capture: true }
    }
}

impl StateMutator<DiceMoveEvent> for DiceMoveMutator {
    fn apply(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &DiceMoveEvent) -> Result<GameState, EngineError> {
        if ctx.game().die(&event.dice).is_none() {
            return Err(EngineError::UnknownArtifact(event.dice.clone()));
        }
        let mut changes = move_changes(ctx, state, &event.piece, &event.to, self.capture)?;
        changes.push((event.dice.clone(), ArtifactState::unrolled()));
        Ok(state.next(changes))
    }
}

/// Records rolled values.
///
/// Host-supplied rolls should be gated by [`RollValuesValidCondition`]; a
/// face or die that still reaches this mutator unchecked is an
/// [`EngineError`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RollDiceMutator;

impl StateMutator<RollDiceEvent> for RollDiceMutator {
    fn apply(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &RollDiceEvent) -> Result<GameState, EngineError> {
        let mut changes = Vec::with_capacity(event.values.len());
        for (dice, value) in &event.values {
            let definition = ctx
                .game()
                .die(dice)
                .ok_or_else(|| EngineError::UnknownArtifact(dice.clone()))?;
            if *value == 0 || *value > definition.sides {
                return Err(EngineError::Invariant(format!(
                    "{dice} rolled {value} on {} sides",
                    definition.sides
                )));
            }
            changes.push((dice.clone(), ArtifactState::rolled(*value)));
        }
        Ok(state.next(changes))
    }
}

/// Passes the turn to the next player in declaration order (wrapping).
#[derive(Clone, Copy, Debug, Default)]
pub struct NextPlayerMutator {
    clear_dice: bool,
}

impl NextPlayerMutator {
    #[must_use]
    pub fn new() -> Self {
        Self { clear_dice: false }
    }

    /// Also reset every die to unrolled.
    #[must_use]
    pub fn clearing_dice(mut self) -> Self {
        self.clear_dice = true;
        self
    }
}

impl<E: GameEvent> StateMutator<E> for NextPlayerMutator {
    fn apply(&self, ctx: &EvaluationContext<'_>, state: &GameState, _: &E) -> Result<GameState, EngineError> {
        let players = ctx.game().players();
        if players.is_empty() {
            return Ok(state.clone());
        }

        let current = state
            .active_player()
            .and_then(|active| players.iter().position(|p| &p.id == active));
        let next = current.map_or(0, |i| (i + 1) % players.len());

        let mut changes: Vec<(ArtifactId, ArtifactState)> = players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), ArtifactState::ActivePlayer { active: i == next }))
            .collect();
        if self.clear_dice {
            changes.extend(state.dice().map(|(id, _)| (id.clone(), ArtifactState::unrolled())));
        }
        Ok(state.next(changes))
    }
}
