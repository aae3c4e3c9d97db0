//! Shared fixtures for unit tests.

use super::{EvaluationContext, Game, GameBuilder, GameProgress};
use crate::board::{Direction, TileRelation};
use crate::core::{Dice, GameState, Piece};
use crate::flows::{
    ActivePlayerOwnsPieceCondition, AlwaysCondition, Composite, CompositeEventCondition,
    DestinationNotFriendlyCondition, DiceRolledCondition, EndTurnEvent, GameEventCondition, MovePieceEvent,
    MovePieceMutator, NextPlayerMutator, PathResolvesCondition, PathUnblockedCondition, PhaseBuilder,
    PieceOnSourceCondition, RollDiceEvent, RollDiceMutator, RollValuesValidCondition, Rule,
};
use crate::patterns::Pattern;

/// A line of `t0..tN` with east and west relations (east declared first).
///
/// `white-1` starts on `t0`, `black-1` on the last tile, `white-2` is held
/// in reserve. One die `d1`, white to move. A single leaf phase carries a
/// move rule, a roll rule and an end-turn rule, in that order. Rolls are
/// accepted only while the dice are unrolled and only with valid faces.
pub(crate) struct TestBed {
    progress: GameProgress,
}

impl TestBed {
    pub(crate) fn line(n: usize) -> Self {
        let last = format!("t{}", n - 1);
        let mut builder = GameBuilder::new().with_tiles((0..n).map(|i| format!("t{i}")));
        for i in 0..n - 1 {
            builder = builder.with_relation(TileRelation::new(format!("t{i}"), format!("t{}", i + 1), "east"));
        }
        for i in 0..n - 1 {
            builder = builder.with_relation(TileRelation::new(format!("t{}", i + 1), format!("t{i}"), "west"));
        }

        let east = Pattern::direction(Direction::east(), true);
        let west = Pattern::direction(Direction::west(), true);

        let progress = builder
            .with_player("white")
            .with_player("black")
            .with_piece_at(Piece::new("white-1").owned_by("white").with_pattern(east.clone()), "t0")
            .with_piece_at(Piece::new("black-1").owned_by("black").with_pattern(west), last)
            .with_piece(Piece::new("white-2").owned_by("white").with_pattern(east))
            .with_dice(Dice::d6("d1"))
            .with_sentinel("game-over")
            .with_phase(
                PhaseBuilder::new(1, "play")
                    .with_condition(AlwaysCondition)
                    .with_rule(Rule::<MovePieceEvent>::new("move", move_condition(), MovePieceMutator::capturing()))
                    .with_rule(Rule::<RollDiceEvent>::new("roll", roll_condition(), RollDiceMutator))
                    .with_rule(Rule::<EndTurnEvent>::new(
                        "end turn",
                        AlwaysCondition,
                        NextPlayerMutator::new().clearing_dice(),
                    )),
            )
            .compile()
            .expect("test bed compiles");

        Self { progress }
    }

    pub(crate) fn progress(&self) -> &GameProgress {
        &self.progress
    }

    pub(crate) fn game(&self) -> &Game {
        self.progress.game()
    }

    pub(crate) fn state(&self) -> &GameState {
        self.progress.state()
    }

    /// Context for the initial state, with acceleration.
    pub(crate) fn context(&self) -> EvaluationContext<'_> {
        self.progress.context()
    }

    /// Context for an arbitrary state (naive occupancy).
    pub(crate) fn context_for<'a>(&'a self, state: &'a GameState) -> EvaluationContext<'a> {
        self.progress.engine().context(state, None)
    }
}

fn move_condition() -> CompositeEventCondition<MovePieceEvent> {
    let children: [Box<dyn GameEventCondition<MovePieceEvent>>; 5] = [
        Box::new(PieceOnSourceCondition),
        Box::new(ActivePlayerOwnsPieceCondition),
        Box::new(PathResolvesCondition),
        Box::new(PathUnblockedCondition),
        Box::new(DestinationNotFriendlyCondition),
    ];
    children
        .into_iter()
        .fold(Composite::builder(), |builder, child| builder.all(child))
        .build()
        .expect("non-empty composite")
}

fn roll_condition() -> CompositeEventCondition<RollDiceEvent> {
    Composite::builder()
        .all(Box::new(DiceRolledCondition::unrolled()) as Box<dyn GameEventCondition<RollDiceEvent>>)
        .all(Box::new(RollValuesValidCondition))
        .build()
        .expect("non-empty composite")
}
