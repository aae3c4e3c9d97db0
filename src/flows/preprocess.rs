//! Event pre-processing.
//!
//! A pre-processor sees an event before rule matching and may replace it by
//! zero or more derived events. The motivating case is dice movement: one
//! "move this piece there" request becomes one [`DiceMoveEvent`] per die
//! used.
//!
//! ## SingleStepPathFinder
//!
//! Breadth-first growth over candidates. Each round extends every live
//! candidate by one step: for every unused die (in order), every pattern of
//! the piece (in order) and every tile (in board order), a step is taken if
//! the pattern resolves there with a distance equal to the die value. The
//! first candidate, in insertion order, to land on the destination wins.
//! This is a deterministic tie-break, not a fewest-dice or shortest search.

use smallvec::SmallVec;

use super::events::{DiceMoveEvent, GameEvent, MovePieceEvent};
use crate::board::{Board, TilePath};
use crate::core::{ArtifactId, GameState, Piece};
use crate::engine::EvaluationContext;
use crate::patterns::PathResolver;

/// Result of pre-processing one event.
#[derive(Debug)]
pub enum PreProcessOutcome {
    /// Evaluate the original event unchanged.
    PassThrough,
    /// Evaluate these events, in order, instead.
    Expanded(Vec<Box<dyn GameEvent>>),
}

/// Expands incoming events before rule matching.
pub trait EventPreProcessor: Send + Sync {
    fn process(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &dyn GameEvent) -> PreProcessOutcome;
}

/// One step of a dice path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiceStep {
    pub dice: ArtifactId,
    pub value: u32,
    pub path: TilePath,
}

#[derive(Clone)]
struct Candidate {
    tile: ArtifactId,
    used: SmallVec<[bool; 4]>,
    steps: Vec<DiceStep>,
}

/// Finds a sequence of single-die steps between two tiles.
pub struct SingleStepPathFinder<'a> {
    board: &'a Board,
    resolver: &'a dyn PathResolver,
}

impl<'a> SingleStepPathFinder<'a> {
    pub fn new(board: &'a Board, resolver: &'a dyn PathResolver) -> Self {
        Self { board, resolver }
    }

    /// Steps moving `piece` from `from` to `to` using `dice` (`(die, value)`,
    /// each usable once). `None` if no combination reaches `to`.
    pub fn find(
        &self,
        piece: &Piece,
        from: &ArtifactId,
        to: &ArtifactId,
        dice: &[(ArtifactId, u32)],
    ) -> Option<Vec<DiceStep>> {
        if from == to || dice.is_empty() {
            return None;
        }

        let mut frontier = vec![Candidate {
            tile: from.clone(),
            used: SmallVec::from_elem(false, dice.len()),
            steps: Vec::new(),
        }];

        while !frontier.is_empty() {
            let mut next = Vec::new();

            for candidate in &frontier {
                for (index, (die, value)) in dice.iter().enumerate() {
                    if candidate.used[index] {
                        continue;
                    }
                    for step in self.single_steps(piece, &candidate.tile, *value) {
                        let mut grown = candidate.clone();
                        grown.used[index] = true;
                        grown.tile = step.to().clone();
                        grown.steps.push(DiceStep {
                            dice: die.clone(),
                            value: *value,
                            path: step,
                        });

                        if &grown.tile == to {
                            return Some(grown.steps);
                        }
                        next.push(grown);
                    }
                }
            }

            frontier = next;
        }

        None
    }

    /// Paths from `from` whose distance equals `value`, pattern by pattern.
    fn single_steps(&self, piece: &Piece, from: &ArtifactId, value: u32) -> Vec<TilePath> {
        let mut steps = Vec::new();
        for pattern in &piece.patterns {
            for tile in self.board.tiles() {
                if &tile.id == from {
                    continue;
                }
                if let Some(path) = self.resolver.resolve_pattern(pattern, from, &tile.id) {
                    if path.distance() == value {
                        steps.push(path);
                    }
                }
            }
        }
        steps
    }
}

/// Expands a [`MovePieceEvent`] into [`DiceMoveEvent`]s using the rolled
/// dice in the current state.
#[derive(Clone, Copy, Debug, Default)]
pub struct DicePathPreProcessor;

impl EventPreProcessor for DicePathPreProcessor {
    fn process(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &dyn GameEvent) -> PreProcessOutcome {
        let Some(event) = event.downcast_ref::<MovePieceEvent>() else {
            return PreProcessOutcome::PassThrough;
        };
        let Some(piece) = ctx.game().piece(&event.piece) else {
            return PreProcessOutcome::PassThrough;
        };

        let dice: Vec<(ArtifactId, u32)> = state
            .dice()
            .filter_map(|(id, value)| Some((id.clone(), value?)))
            .collect();

        let finder = SingleStepPathFinder::new(ctx.game().board(), ctx.resolver());
        match finder.find(piece, &event.from, &event.to, &dice) {
            Some(steps) => PreProcessOutcome::Expanded(
                steps
                    .into_iter()
                    .map(|step| {
                        Box::new(DiceMoveEvent {
                            piece: event.piece.clone(),
                            from: step.path.from().clone(),
                            to: step.path.to().clone(),
                            path: step.path,
                            dice: step.dice,
                        }) as Box<dyn GameEvent>
                    })
                    .collect(),
            ),
            None => PreProcessOutcome::PassThrough,
        }
    }
}
