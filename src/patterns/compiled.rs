//! Precompiled pattern resolution.
//!
//! Each distinct pattern is compiled once per game definition into a reach
//! table: for every origin tile index, the destinations the pattern can land
//! on together with the route (relation indices) and its distance. Direction
//! patterns are compiled by stepping the [`BoardShape`] neighbor table, which
//! acts as the transition function of a small automaton whose state is
//! `(tile, direction, step)`. Pieces sharing a pattern set share one merged
//! table.
//!
//! ## Contract
//!
//! For every `(piece, from, to)`, [`CompiledResolver`] must agree with
//! [`GeometricResolver`] on acceptance and on path distance. Queries the
//! table cannot answer (patterns or pieces not known at compile time) fall
//! back to the geometric walk.
//!
//! The tables are purely geometric and do not consult
//! [`AttackRays`](crate::accel::AttackRays). Rays are only useful together
//! with occupancy (a slide stops at the first occupied tile), while
//! resolution depends on the board alone.
//! Occupancy-aware reach is [`Mobility`](crate::accel::Mobility)'s job.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use super::geometric::GeometricResolver;
use super::pattern::Pattern;
use super::PathResolver;
use crate::board::{Board, BoardShape, Direction, TilePath};
use crate::core::{ArtifactId, Piece};

#[derive(Clone, Debug)]
struct Route {
    distance: u32,
    relations: SmallVec<[u32; 8]>,
}

/// Destinations per origin tile index.
#[derive(Clone, Debug, Default)]
struct ReachTable {
    per_origin: Vec<FxHashMap<u32, Route>>,
}

impl ReachTable {
    fn lookup(&self, from: u32, to: u32) -> Option<&Route> {
        self.per_origin.get(from as usize)?.get(&to)
    }

    /// Merge `other` in, keeping strictly shorter routes (ties keep ours).
    fn merge_shorter(&mut self, other: &ReachTable) {
        for (mine, theirs) in self.per_origin.iter_mut().zip(&other.per_origin) {
            for (&to, route) in theirs {
                match mine.get(&to) {
                    Some(existing) if existing.distance <= route.distance => {}
                    _ => {
                        mine.insert(to, route.clone());
                    }
                }
            }
        }
    }

    fn entry_count(&self) -> usize {
        self.per_origin.iter().map(|reach| reach.len()).sum()
    }
}

/// Table-driven resolver; see the module docs for the parity contract.
#[derive(Clone, Debug)]
pub struct CompiledResolver {
    board: Arc<Board>,
    shape: Arc<BoardShape>,
    pattern_tables: Vec<ReachTable>,
    pattern_index: FxHashMap<Pattern, usize>,
    set_tables: Vec<ReachTable>,
    piece_sets: FxHashMap<ArtifactId, usize>,
    fallback: GeometricResolver,
}

impl CompiledResolver {
    /// Compile every pattern used by `pieces`.
    pub fn compile(board: Arc<Board>, shape: Arc<BoardShape>, pieces: &[Piece]) -> Self {
        let adjacency = Adjacency::new(&board, &shape);

        let mut pattern_tables = Vec::new();
        let mut pattern_index: FxHashMap<Pattern, usize> = FxHashMap::default();
        let mut set_index: FxHashMap<Vec<Pattern>, usize> = FxHashMap::default();
        let mut set_tables = Vec::new();
        let mut piece_sets = FxHashMap::default();

        for piece in pieces {
            for pattern in &piece.patterns {
                if !pattern_index.contains_key(pattern) {
                    pattern_index.insert(pattern.clone(), pattern_tables.len());
                    pattern_tables.push(compile_pattern(pattern, &shape, &adjacency));
                }
            }

            let set = match set_index.get(&piece.patterns) {
                Some(&set) => set,
                None => {
                    let mut merged = ReachTable {
                        per_origin: vec![FxHashMap::default(); shape.tile_count()],
                    };
                    for pattern in &piece.patterns {
                        merged.merge_shorter(&pattern_tables[pattern_index[pattern]]);
                    }
                    set_index.insert(piece.patterns.clone(), set_tables.len());
                    set_tables.push(merged);
                    set_tables.len() - 1
                }
            };
            piece_sets.insert(piece.id.clone(), set);
        }

        Self {
            fallback: GeometricResolver::new(Arc::clone(&board)),
            board,
            shape,
            pattern_tables,
            pattern_index,
            set_tables,
            piece_sets,
        }
    }

    /// Table lookup for a compiled piece. `None` if unreachable or unknown.
    #[must_use]
    pub fn try_resolve(&self, piece: &ArtifactId, from: &ArtifactId, to: &ArtifactId) -> Option<TilePath> {
        let set = *self.piece_sets.get(piece)?;
        let from = self.shape.tile_index(from)?;
        let to = self.shape.tile_index(to)?;
        self.set_tables[set].lookup(from, to).and_then(|r| self.to_path(r))
    }

    /// Number of compiled (origin, destination) entries across all tables.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.pattern_tables.iter().map(ReachTable::entry_count).sum::<usize>()
            + self.set_tables.iter().map(ReachTable::entry_count).sum::<usize>()
    }

    fn to_path(&self, route: &Route) -> Option<TilePath> {
        TilePath::new(
            route
                .relations
                .iter()
                .filter_map(|&r| self.board.relation(r as usize).cloned()),
        )
    }
}

impl PathResolver for CompiledResolver {
    fn resolve_pattern(&self, pattern: &Pattern, from: &ArtifactId, to: &ArtifactId) -> Option<TilePath> {
        let Some(&index) = self.pattern_index.get(pattern) else {
            trace!(?pattern, "pattern not compiled, walking geometrically");
            return self.fallback.resolve_pattern(pattern, from, to);
        };
        let from = self.shape.tile_index(from)?;
        let to = self.shape.tile_index(to)?;
        self.pattern_tables[index].lookup(from, to).and_then(|r| self.to_path(r))
    }

    fn resolve(&self, piece: &Piece, from: &ArtifactId, to: &ArtifactId) -> Option<TilePath> {
        match self.piece_sets.get(&piece.id) {
            Some(_) => self.try_resolve(&piece.id, from, to),
            None => {
                trace!(piece = %piece.id, "piece not compiled, walking geometrically");
                self.fallback.resolve(piece, from, to)
            }
        }
    }
}

/// All outgoing relations per tile index, in declaration order.
struct Adjacency {
    edges: Vec<SmallVec<[(u32, u32, u32); 8]>>,
}

impl Adjacency {
    fn new(board: &Board, shape: &BoardShape) -> Self {
        let mut edges = vec![SmallVec::new(); shape.tile_count()];
        for (index, relation) in board.relations().iter().enumerate() {
            if let (Some(from), Some(to)) = (shape.tile_index(&relation.from), shape.tile_index(&relation.to)) {
                edges[from as usize].push((to, index as u32, relation.distance));
            }
        }
        Self { edges }
    }
}

fn compile_pattern(pattern: &Pattern, shape: &BoardShape, adjacency: &Adjacency) -> ReachTable {
    let tile_count = shape.tile_count() as u32;
    let mut table = ReachTable {
        per_origin: Vec::with_capacity(tile_count as usize),
    };

    for origin in 0..tile_count {
        let mut reach = FxHashMap::default();
        match pattern {
            Pattern::Direction { direction, repeatable } => {
                compile_ray(shape, origin, direction, *repeatable, &mut reach);
            }
            Pattern::MultiDirection { directions, repeatable } => {
                for direction in directions {
                    let mut ray = FxHashMap::default();
                    compile_ray(shape, origin, direction, *repeatable, &mut ray);
                    for (to, route) in ray {
                        match reach.get(&to) {
                            Some(Route { distance, .. }) if *distance <= route.distance => {}
                            _ => {
                                reach.insert(to, route);
                            }
                        }
                    }
                }
            }
            Pattern::Fixed { directions } => compile_fixed(shape, origin, directions, &mut reach),
            Pattern::Any => compile_any(adjacency, origin, &mut reach),
            Pattern::Null => {}
        }
        table.per_origin.push(reach);
    }

    table
}

fn compile_ray(
    shape: &BoardShape,
    origin: u32,
    direction: &Direction,
    repeatable: bool,
    reach: &mut FxHashMap<u32, Route>,
) {
    let Some(dir) = shape.direction_index(direction) else {
        return;
    };

    let mut visited = vec![false; shape.tile_count()];
    visited[origin as usize] = true;

    let mut current = origin;
    let mut route = Route {
        distance: 0,
        relations: SmallVec::new(),
    };

    while let Some(neighbor) = shape.neighbor(current, dir) {
        if visited[neighbor.tile as usize] {
            break;
        }
        visited[neighbor.tile as usize] = true;

        route.distance += neighbor.distance;
        route.relations.push(neighbor.relation);
        reach.insert(neighbor.tile, route.clone());

        current = neighbor.tile;
        if !repeatable {
            break;
        }
    }
}

fn compile_fixed(shape: &BoardShape, origin: u32, directions: &[Direction], reach: &mut FxHashMap<u32, Route>) {
    if directions.is_empty() {
        return;
    }

    let mut visited = vec![false; shape.tile_count()];
    visited[origin as usize] = true;

    let mut current = origin;
    let mut route = Route {
        distance: 0,
        relations: SmallVec::new(),
    };

    for direction in directions {
        let Some(dir) = shape.direction_index(direction) else {
            return;
        };
        let Some(neighbor) = shape.neighbor(current, dir) else {
            return;
        };
        if visited[neighbor.tile as usize] {
            return;
        }
        visited[neighbor.tile as usize] = true;
        route.distance += neighbor.distance;
        route.relations.push(neighbor.relation);
        current = neighbor.tile;
    }

    reach.insert(current, route);
}

/// Single-source shortest routes (Dijkstra, ties by insertion order).
fn compile_any(adjacency: &Adjacency, origin: u32, reach: &mut FxHashMap<u32, Route>) {
    let mut settled = vec![false; adjacency.edges.len()];
    settled[origin as usize] = true;

    let mut candidates: Vec<(u32, Route)> = Vec::new();
    let mut frontier: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();

    for &(to, relation, distance) in &adjacency.edges[origin as usize] {
        let mut relations = SmallVec::new();
        relations.push(relation);
        frontier.push(Reverse((distance, candidates.len())));
        candidates.push((to, Route { distance, relations }));
    }

    while let Some(Reverse((_, index))) = frontier.pop() {
        let (tip, route) = candidates[index].clone();
        if settled[tip as usize] {
            continue;
        }
        settled[tip as usize] = true;

        for &(to, relation, distance) in &adjacency.edges[tip as usize] {
            if settled[to as usize] {
                continue;
            }
            let mut next = route.clone();
            next.distance += distance;
            next.relations.push(relation);
            frontier.push(Reverse((next.distance, candidates.len())));
            candidates.push((to, next));
        }

        reach.insert(tip, route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TileRelation;
    use crate::core::Tile;

    fn grid(size: usize) -> Arc<Board> {
        let name = |x: usize, y: usize| format!("{}{}", (b'a' + x as u8) as char, y + 1);
        let mut tiles = Vec::new();
        let mut relations = Vec::new();
        for x in 0..size {
            for y in 0..size {
                tiles.push(Tile::new(name(x, y)));
                if y + 1 < size {
                    relations.push(TileRelation::new(name(x, y), name(x, y + 1), "north"));
                    relations.push(TileRelation::new(name(x, y + 1), name(x, y), "south"));
                }
                if x + 1 < size {
                    relations.push(TileRelation::new(name(x, y), name(x + 1, y), "east"));
                    relations.push(TileRelation::new(name(x + 1, y), name(x, y), "west"));
                }
            }
        }
        Arc::new(Board::new(tiles, relations).unwrap())
    }

    fn compiled(board: &Arc<Board>, pieces: &[Piece]) -> CompiledResolver {
        let shape = Arc::new(BoardShape::new(board));
        CompiledResolver::compile(Arc::clone(board), shape, pieces)
    }

    #[test]
    fn test_rook_lookup() {
        let board = grid(4);
        let rook = Piece::new("rook")
            .with_pattern(Pattern::multi_direction(Direction::orthogonal(), true));
        let resolver = compiled(&board, std::slice::from_ref(&rook));

        let path = resolver
            .try_resolve(&rook.id, &ArtifactId::new("a1"), &ArtifactId::new("a4"))
            .unwrap();
        assert_eq!(path.distance(), 3);
        assert_eq!(path.to(), &ArtifactId::new("a4"));

        assert!(resolver
            .try_resolve(&rook.id, &ArtifactId::new("a1"), &ArtifactId::new("b2"))
            .is_none());
    }

    #[test]
    fn test_shared_pattern_sets() {
        let board = grid(3);
        let pattern = Pattern::direction(Direction::north(), false);
        let pieces = vec![
            Piece::new("p1").with_pattern(pattern.clone()),
            Piece::new("p2").with_pattern(pattern),
        ];
        let resolver = compiled(&board, &pieces);

        assert_eq!(resolver.set_tables.len(), 1);
        assert_eq!(resolver.pattern_tables.len(), 1);
        assert!(resolver.entry_count() > 0);
    }

    #[test]
    fn test_unknown_piece_falls_back() {
        let board = grid(3);
        let resolver = compiled(&board, &[]);
        let knight = Piece::new("knight")
            .with_pattern(Pattern::fixed([Direction::north(), Direction::north(), Direction::east()]));

        let path = resolver
            .resolve(&knight, &ArtifactId::new("a1"), &ArtifactId::new("b3"))
            .unwrap();
        assert_eq!(path.distance(), 3);
        assert!(resolver.try_resolve(&knight.id, &ArtifactId::new("a1"), &ArtifactId::new("b3")).is_none());
    }

    #[test]
    fn test_agrees_with_geometric_on_grid() {
        let board = grid(4);
        let pieces = vec![
            Piece::new("rook").with_pattern(Pattern::multi_direction(Direction::orthogonal(), true)),
            Piece::new("knight")
                .with_pattern(Pattern::fixed([Direction::north(), Direction::north(), Direction::east()]))
                .with_pattern(Pattern::fixed([Direction::east(), Direction::east(), Direction::south()])),
            Piece::new("walker").with_pattern(Pattern::Any),
        ];
        let fast = compiled(&board, &pieces);
        let slow = GeometricResolver::new(Arc::clone(&board));

        for piece in &pieces {
            for from in board.tiles() {
                for to in board.tiles() {
                    let a = fast.resolve(piece, &from.id, &to.id).map(|p| p.distance());
                    let b = slow.resolve(piece, &from.id, &to.id).map(|p| p.distance());
                    assert_eq!(a, b, "{} {} -> {}", piece.id, from.id, to.id);
                }
            }
        }
    }
}
