//! Deterministic randomness for dice and shuffles.
//!
//! The engine never reaches for ambient randomness. Hosts own a `GameRng`,
//! roll with it, and submit the outcome as an event, so identical event
//! sequences with identical seeds reproduce identical states.
//!
//! ```
//! use rust_boards::core::{ArtifactId, GameRng};
//!
//! let dice = [ArtifactId::new("d1"), ArtifactId::new("d2")];
//!
//! let mut rng1 = GameRng::new(7);
//! let mut rng2 = GameRng::new(7);
//! assert_eq!(rng1.roll_dice(&dice, 6), rng2.roll_dice(&dice, 6));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::artifact::ArtifactId;
use crate::flows::RollDiceEvent;

/// Seeded, forkable RNG.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork an independent, deterministic branch (e.g. for simulations).
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Roll one die with `sides` faces (`1..=sides`).
    pub fn roll(&mut self, sides: u32) -> u32 {
        self.inner.gen_range(1..=sides.max(1))
    }

    /// Roll every die and package the result as an event.
    pub fn roll_dice(&mut self, dice: &[ArtifactId], sides: u32) -> RollDiceEvent {
        let values = dice
            .iter()
            .map(|id| (id.clone(), self.roll(sides)))
            .collect();
        RollDiceEvent { values }
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Get the current state for checkpointing.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

/// Serializable RNG checkpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter).
    pub word_pos: u128,
    pub fork_counter: u64,
}
