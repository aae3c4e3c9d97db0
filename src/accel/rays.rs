//! Precomputed sliding rays.
//!
//! For every `(tile, direction)` the generator records the tiles reached by
//! repeatedly stepping in that direction, stopping at the board edge, on a
//! cycle (ring and wrap-around boards) or at [`MAX_RAY_LENGTH`].
//!
//! ## Degenerate shapes
//!
//! Boards with more than [`MAX_RAY_SLOTS`] tile×direction slots, or with a
//! single direction over more than [`MAX_LINEAR_TILES`] tiles, neutralize
//! the generator: every ray is empty and consumers fall back to walking the
//! neighbor table.

use smallvec::SmallVec;

use super::occupancy::OccupancyIndex;
use crate::board::BoardShape;
use crate::core::PlayerId;

/// Longest ray recorded.
pub const MAX_RAY_LENGTH: usize = 4096;

/// Largest `tile_count * direction_count` the generator accepts.
pub const MAX_RAY_SLOTS: usize = 1_000_000;

/// Largest single-direction board the generator accepts.
pub const MAX_LINEAR_TILES: usize = 64;

type Ray = SmallVec<[u32; 8]>;

/// Rays per `(tile, direction)`, indexed `tile * direction_count + direction`.
#[derive(Clone, Debug, Default)]
pub struct AttackRays {
    direction_count: usize,
    rays: Vec<Ray>,
    neutralized: bool,
}

impl AttackRays {
    pub fn generate(shape: &BoardShape) -> Self {
        let tile_count = shape.tile_count();
        let direction_count = shape.direction_count();
        let slots = tile_count.saturating_mul(direction_count);

        if slots > MAX_RAY_SLOTS || (direction_count == 1 && tile_count > MAX_LINEAR_TILES) {
            return Self {
                direction_count,
                rays: Vec::new(),
                neutralized: true,
            };
        }

        let mut rays = Vec::with_capacity(slots);
        let mut visited = vec![false; tile_count];

        for tile in 0..tile_count as u32 {
            for dir in 0..direction_count as u32 {
                rays.push(trace_ray(shape, tile, dir, &mut visited));
            }
        }

        Self {
            direction_count,
            rays,
            neutralized: false,
        }
    }

    #[must_use]
    pub fn is_neutralized(&self) -> bool {
        self.neutralized
    }

    /// Tiles along the ray, nearest first. Empty when neutralized.
    #[must_use]
    pub fn ray(&self, tile: u32, direction: u32) -> &[u32] {
        self.rays
            .get(tile as usize * self.direction_count + direction as usize)
            .map_or(&[], |ray| ray.as_slice())
    }

    /// Reachable targets along one ray for a piece owned by `mover`.
    ///
    /// The walk stops at the first occupied tile, which is included only
    /// when an opponent holds it.
    pub fn sliding_targets(
        &self,
        tile: u32,
        direction: u32,
        occupancy: &dyn OccupancyIndex,
        mover: Option<PlayerId>,
    ) -> Ray {
        let mut targets = Ray::new();
        for &step in self.ray(tile, direction) {
            if occupancy.is_empty_at(step) {
                targets.push(step);
                continue;
            }
            if is_capture(occupancy, step, mover) {
                targets.push(step);
            }
            break;
        }
        targets
    }
}

/// Whether the occupant of `tile` can be captured by `mover`.
pub(crate) fn is_capture(occupancy: &dyn OccupancyIndex, tile: u32, mover: Option<PlayerId>) -> bool {
    matches!(occupancy.owner_at(tile), Some(owner) if Some(owner) != mover)
}

fn trace_ray(shape: &BoardShape, origin: u32, direction: u32, visited: &mut [bool]) -> Ray {
    let mut ray = Ray::new();
    visited[origin as usize] = true;

    let mut current = origin;
    while ray.len() < MAX_RAY_LENGTH {
        let Some(neighbor) = shape.neighbor(current, direction) else {
            break;
        };
        if visited[neighbor.tile as usize] {
            break;
        }
        visited[neighbor.tile as usize] = true;
        ray.push(neighbor.tile);
        current = neighbor.tile;
    }

    visited[origin as usize] = false;
    for &tile in &ray {
        visited[tile as usize] = false;
    }
    ray
}
