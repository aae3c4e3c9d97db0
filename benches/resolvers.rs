//! Geometric vs compiled path resolution, plus occupancy rebuild cost.
//!
//! Run with: `cargo bench --bench resolvers`

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_boards::accel::{AccelerationContext, PieceLayout};
use rust_boards::board::{Board, BoardShape, Direction, TileRelation};
use rust_boards::core::{ArtifactId, ArtifactState, GameState, Piece, Player, PlayerId, Tile};
use rust_boards::patterns::{CompiledResolver, GeometricResolver, PathResolver, Pattern};

fn grid(n: usize) -> Arc<Board> {
    let id = |file: usize, rank: usize| format!("{file}:{rank}");
    let mut tiles = Vec::new();
    let mut relations = Vec::new();
    let steps = [
        (Direction::north(), 0, 1),
        (Direction::south(), 0, -1),
        (Direction::east(), 1, 0),
        (Direction::west(), -1, 0),
        (Direction::north_east(), 1, 1),
        (Direction::north_west(), -1, 1),
        (Direction::south_east(), 1, -1),
        (Direction::south_west(), -1, -1),
    ];
    for rank in 0..n as isize {
        for file in 0..n as isize {
            tiles.push(Tile::new(id(file as usize, rank as usize)));
            for (direction, df, dr) in &steps {
                let (f, r) = (file + df, rank + dr);
                if (0..n as isize).contains(&f) && (0..n as isize).contains(&r) {
                    relations.push(TileRelation::new(
                        id(file as usize, rank as usize),
                        id(f as usize, r as usize),
                        direction.clone(),
                    ));
                }
            }
        }
    }
    Arc::new(Board::new(tiles, relations).unwrap())
}

fn pieces() -> Vec<Piece> {
    vec![
        Piece::new("queen")
            .with_pattern(Pattern::multi_direction(Direction::orthogonal(), true))
            .with_pattern(Pattern::multi_direction(Direction::diagonal(), true)),
        Piece::new("knight").with_pattern(Pattern::fixed([Direction::north(), Direction::north(), Direction::east()])),
        Piece::new("wanderer").with_pattern(Pattern::Any),
    ]
}

/// Resolve every destination from one corner, per piece and resolver.
fn benchmark_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resolve");

    for n in [8, 16] {
        let board = grid(n);
        let shape = Arc::new(BoardShape::new(&board));
        let pieces = pieces();
        let geometric = GeometricResolver::new(Arc::clone(&board));
        let compiled = CompiledResolver::compile(Arc::clone(&board), shape, &pieces);
        let from = ArtifactId::new("0:0");
        let targets: Vec<ArtifactId> = board.tiles().iter().map(|t| t.id.clone()).collect();

        for piece in &pieces {
            group.bench_with_input(BenchmarkId::new(format!("geometric/{}", piece.id), n), &n, |b, _| {
                b.iter(|| {
                    targets
                        .iter()
                        .filter(|to| geometric.resolve(piece, &from, black_box(to)).is_some())
                        .count()
                });
            });
            group.bench_with_input(BenchmarkId::new(format!("compiled/{}", piece.id), n), &n, |b, _| {
                b.iter(|| {
                    targets
                        .iter()
                        .filter(|to| compiled.resolve(piece, &from, black_box(to)).is_some())
                        .count()
                });
            });
        }
    }
    group.finish();
}

/// Full acceleration rebuild for a populated board.
fn benchmark_rebuild(c: &mut Criterion) {
    let board = grid(8);
    let shape = Arc::new(BoardShape::new(&board));
    let players = vec![
        Player {
            id: "white".into(),
            index: PlayerId::new(0),
        },
        Player {
            id: "black".into(),
            index: PlayerId::new(1),
        },
    ];
    let pieces: Vec<Piece> = (0..32)
        .map(|i| Piece::new(format!("p{i}")).owned_by(if i < 16 { "white" } else { "black" }))
        .collect();
    let layout = Arc::new(PieceLayout::new(&pieces, &players));
    let state = GameState::new(pieces.iter().enumerate().map(|(i, piece)| {
        let rank = if i < 16 { i / 8 } else { 6 + (i - 16) / 8 };
        (piece.id.clone(), ArtifactState::piece_on(format!("{}:{rank}", i % 8)))
    }));

    c.bench_function("rebuild/8x8/32", |b| {
        b.iter(|| AccelerationContext::build(Arc::clone(&shape), Arc::clone(&layout), black_box(&state)));
    });
}

criterion_group!(benches, benchmark_resolution, benchmark_rebuild);
criterion_main!(benches);
