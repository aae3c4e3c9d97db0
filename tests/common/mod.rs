//! Board and piece fixtures shared by the integration suites.

#![allow(dead_code)]

use std::sync::Arc;

use rust_boards::board::{Board, Direction, TileRelation};
use rust_boards::core::{GameRng, Piece, Tile};
use rust_boards::patterns::Pattern;

/// Tile id on an `n × n` grid: files `a..`, ranks `1..`.
pub fn square(file: usize, rank: usize) -> String {
    format!("{}{}", (b'a' + file as u8) as char, rank + 1)
}

/// `n × n` grid with orthogonal and diagonal relations in both directions.
pub fn grid(n: usize) -> Arc<Board> {
    let mut tiles = Vec::new();
    for rank in 0..n {
        for file in 0..n {
            tiles.push(Tile::new(square(file, rank)));
        }
    }

    let steps: [(Direction, isize, isize); 8] = [
        (Direction::north(), 0, 1),
        (Direction::south(), 0, -1),
        (Direction::east(), 1, 0),
        (Direction::west(), -1, 0),
        (Direction::north_east(), 1, 1),
        (Direction::north_west(), -1, 1),
        (Direction::south_east(), 1, -1),
        (Direction::south_west(), -1, -1),
    ];

    let mut relations = Vec::new();
    for rank in 0..n as isize {
        for file in 0..n as isize {
            for (direction, df, dr) in &steps {
                let (f, r) = (file + df, rank + dr);
                if (0..n as isize).contains(&f) && (0..n as isize).contains(&r) {
                    relations.push(TileRelation::new(
                        square(file as usize, rank as usize),
                        square(f as usize, r as usize),
                        direction.clone(),
                    ));
                }
            }
        }
    }
    Arc::new(Board::new(tiles, relations).unwrap())
}

/// Directed ring `r0 -> r1 -> ... -> r0` plus the reverse direction.
pub fn ring(n: usize) -> Arc<Board> {
    let tiles = (0..n).map(|i| Tile::new(format!("r{i}"))).collect();
    let mut relations = Vec::new();
    for i in 0..n {
        relations.push(TileRelation::new(format!("r{i}"), format!("r{}", (i + 1) % n), "clockwise"));
        relations.push(TileRelation::new(format!("r{}", (i + 1) % n), format!("r{i}"), "counter"));
    }
    Arc::new(Board::new(tiles, relations).unwrap())
}

/// Random directed graph over a small direction vocabulary with
/// distances `1..=3`. Duplicate (tile, direction) relations are allowed.
pub fn random_board(rng: &mut GameRng, tiles: usize, relations: usize) -> Arc<Board> {
    let vocabulary = ["up", "down", "left", "right", "warp"];
    let tile_list = (0..tiles).map(|i| Tile::new(format!("n{i:02}"))).collect();
    let relation_list = (0..relations)
        .map(|_| {
            let from = rng.gen_range_usize(0..tiles);
            let mut to = rng.gen_range_usize(0..tiles);
            if to == from {
                to = (to + 1) % tiles;
            }
            let direction = vocabulary[rng.gen_range_usize(0..vocabulary.len())];
            let distance = rng.roll(3);
            TileRelation::new(format!("n{from:02}"), format!("n{to:02}"), direction).with_distance(distance)
        })
        .collect();
    Arc::new(Board::new(tile_list, relation_list).unwrap())
}

/// Chess-like movers for compass boards.
pub fn compass_pieces() -> Vec<Piece> {
    let orthogonal = Direction::orthogonal();
    let diagonal = Direction::diagonal();
    let all: Vec<Direction> = orthogonal.iter().chain(&diagonal).cloned().collect();

    let mut knight = Piece::new("knight");
    for (long, short) in [
        (Direction::north(), Direction::east()),
        (Direction::north(), Direction::west()),
        (Direction::south(), Direction::east()),
        (Direction::south(), Direction::west()),
        (Direction::east(), Direction::north()),
        (Direction::east(), Direction::south()),
        (Direction::west(), Direction::north()),
        (Direction::west(), Direction::south()),
    ] {
        knight = knight.with_pattern(Pattern::fixed([long.clone(), long, short]));
    }

    vec![
        Piece::new("rook").with_pattern(Pattern::multi_direction(orthogonal.clone(), true)),
        Piece::new("bishop").with_pattern(Pattern::multi_direction(diagonal.clone(), true)),
        Piece::new("queen")
            .with_pattern(Pattern::multi_direction(orthogonal, true))
            .with_pattern(Pattern::multi_direction(diagonal, true)),
        Piece::new("king").with_pattern(Pattern::multi_direction(all, false)),
        Piece::new("pawn").with_pattern(Pattern::direction(Direction::north(), false)),
        knight,
        Piece::new("wanderer").with_pattern(Pattern::Any),
        Piece::new("statue").with_pattern(Pattern::Null),
        Piece::new("idle"),
    ]
}

/// Movers for boards with an arbitrary direction vocabulary.
pub fn vocabulary_pieces(directions: &[&str]) -> Vec<Piece> {
    let directions: Vec<Direction> = directions.iter().map(|d| Direction::new(*d)).collect();
    let mut pieces = vec![
        Piece::new("slider").with_pattern(Pattern::multi_direction(directions.clone(), true)),
        Piece::new("stepper").with_pattern(Pattern::multi_direction(directions.clone(), false)),
        Piece::new("wanderer").with_pattern(Pattern::Any),
    ];
    if directions.len() >= 2 {
        pieces.push(
            Piece::new("hopper")
                .with_pattern(Pattern::fixed([directions[0].clone(), directions[1].clone()]))
                .with_pattern(Pattern::direction(directions[0].clone(), true)),
        );
    }
    pieces
}
