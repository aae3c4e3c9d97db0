//! Geometric pattern resolution by walking the relation graph.
//!
//! This is the ground truth every accelerated resolver is checked against.
//! Walks never revisit a tile already on the current path, so cyclic (ring)
//! boards terminate.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::pattern::Pattern;
use super::PathResolver;
use crate::board::{Board, Direction, TilePath};
use crate::core::ArtifactId;

/// Resolver that walks [`Board`] relations directly.
#[derive(Clone, Debug)]
pub struct GeometricResolver {
    board: Arc<Board>,
}

impl GeometricResolver {
    pub fn new(board: Arc<Board>) -> Self {
        Self { board }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Follow `direction` from `from`, stopping on arrival at `to`.
    fn walk_direction(
        &self,
        direction: &Direction,
        repeatable: bool,
        from: &ArtifactId,
        to: &ArtifactId,
    ) -> Option<TilePath> {
        let mut visited: FxHashSet<&ArtifactId> = FxHashSet::default();
        visited.insert(from);

        let mut current = from;
        let mut relations = Vec::new();

        loop {
            let relation = self.board.relation_from(current, direction)?;
            if !visited.insert(&relation.to) {
                return None;
            }
            relations.push(relation.clone());
            current = &relation.to;

            if current == to {
                return TilePath::new(relations);
            }
            if !repeatable {
                return None;
            }
        }
    }

    fn walk_fixed(&self, directions: &[Direction], from: &ArtifactId, to: &ArtifactId) -> Option<TilePath> {
        let mut visited: FxHashSet<&ArtifactId> = FxHashSet::default();
        visited.insert(from);

        let mut current = from;
        let mut relations = Vec::with_capacity(directions.len());

        for direction in directions {
            let relation = self.board.relation_from(current, direction)?;
            if !visited.insert(&relation.to) {
                return None;
            }
            relations.push(relation.clone());
            current = &relation.to;
        }

        if current == to {
            TilePath::new(relations)
        } else {
            None
        }
    }

    /// Minimum-distance route over any relation.
    fn search_any(&self, from: &ArtifactId, to: &ArtifactId) -> Option<TilePath> {
        let mut settled: FxHashSet<ArtifactId> = FxHashSet::default();
        settled.insert(from.clone());

        let mut candidates: Vec<TilePath> = Vec::new();
        let mut frontier: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();

        for relation in self.board.relations_from(from) {
            if let Some(path) = TilePath::new([relation.clone()]) {
                frontier.push(Reverse((path.distance(), candidates.len())));
                candidates.push(path);
            }
        }

        while let Some(Reverse((_, index))) = frontier.pop() {
            let path = candidates[index].clone();
            let tip = path.to().clone();

            if &tip == to {
                return Some(path);
            }
            if !settled.insert(tip.clone()) {
                continue;
            }

            for relation in self.board.relations_from(&tip) {
                if settled.contains(&relation.to) || path.visits(&relation.to) {
                    continue;
                }
                if let Some(next) = path.extended(relation.clone()) {
                    frontier.push(Reverse((next.distance(), candidates.len())));
                    candidates.push(next);
                }
            }
        }

        None
    }
}

/// Pick the shorter of two optional paths; ties keep the first.
pub(crate) fn shorter(best: Option<TilePath>, candidate: Option<TilePath>) -> Option<TilePath> {
    match (best, candidate) {
        (Some(b), Some(c)) if c.distance() < b.distance() => Some(c),
        (Some(b), _) => Some(b),
        (None, c) => c,
    }
}

impl PathResolver for GeometricResolver {
    fn resolve_pattern(&self, pattern: &Pattern, from: &ArtifactId, to: &ArtifactId) -> Option<TilePath> {
        if from == to || !self.board.contains_tile(from) || !self.board.contains_tile(to) {
            return None;
        }

        match pattern {
            Pattern::Direction { direction, repeatable } => {
                self.walk_direction(direction, *repeatable, from, to)
            }
            Pattern::MultiDirection { directions, repeatable } => directions
                .iter()
                .map(|d| self.walk_direction(d, *repeatable, from, to))
                .fold(None, shorter),
            Pattern::Fixed { directions } => {
                if directions.is_empty() {
                    None
                } else {
                    self.walk_fixed(directions, from, to)
                }
            }
            Pattern::Any => self.search_any(from, to),
            Pattern::Null => None,
        }
    }
}
