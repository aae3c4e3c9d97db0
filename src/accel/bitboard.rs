//! Bit-packed tile sets.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A set of tile indices, one bit per tile.
///
/// Boards up to 128 tiles stay inline; larger boards spill to the heap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bitboard {
    words: SmallVec<[u64; 2]>,
}

impl Bitboard {
    /// Empty set sized for `tile_count` tiles.
    #[must_use]
    pub fn with_tiles(tile_count: usize) -> Self {
        Self {
            words: SmallVec::from_elem(0, tile_count.div_ceil(64)),
        }
    }

    /// Build from tile indices.
    pub fn from_indices(tile_count: usize, indices: impl IntoIterator<Item = u32>) -> Self {
        let mut board = Self::with_tiles(tile_count);
        for index in indices {
            board.set(index);
        }
        board
    }

    #[inline]
    fn locate(index: u32) -> (usize, u64) {
        ((index / 64) as usize, 1u64 << (index % 64))
    }

    /// Add a tile. Grows if the index is past the current size.
    pub fn set(&mut self, index: u32) {
        let (word, bit) = Self::locate(index);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= bit;
    }

    /// Remove a tile.
    pub fn clear(&mut self, index: u32) {
        let (word, bit) = Self::locate(index);
        if let Some(w) = self.words.get_mut(word) {
            *w &= !bit;
        }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        let (word, bit) = Self::locate(index);
        self.words.get(word).is_some_and(|w| w & bit != 0)
    }

    /// Number of tiles in the set.
    #[must_use]
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Check that no tile is in both sets.
    #[must_use]
    pub fn is_disjoint(&self, other: &Bitboard) -> bool {
        self.words.iter().zip(&other.words).all(|(a, b)| a & b == 0)
    }

    /// Set union.
    #[must_use]
    pub fn union(&self, other: &Bitboard) -> Bitboard {
        let len = self.words.len().max(other.words.len());
        let words = (0..len)
            .map(|i| self.word(i) | other.word(i))
            .collect();
        Bitboard { words }
    }

    /// Set intersection.
    #[must_use]
    pub fn intersection(&self, other: &Bitboard) -> Bitboard {
        let len = self.words.len().min(other.words.len());
        let words = (0..len)
            .map(|i| self.word(i) & other.word(i))
            .collect();
        Bitboard { words }
    }

    fn word(&self, index: usize) -> u64 {
        self.words.get(index).copied().unwrap_or(0)
    }

    /// Tile indices in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = u32> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut remaining = word;
            std::iter::from_fn(move || {
                if remaining == 0 {
                    return None;
                }
                let bit = remaining.trailing_zeros();
                remaining &= remaining - 1;
                Some(i as u32 * 64 + bit)
            })
        })
    }
}

impl std::ops::BitOr for &Bitboard {
    type Output = Bitboard;

    fn bitor(self, rhs: Self) -> Bitboard {
        self.union(rhs)
    }
}

impl std::ops::BitAnd for &Bitboard {
    type Output = Bitboard;

    fn bitand(self, rhs: Self) -> Bitboard {
        self.intersection(rhs)
    }
}
