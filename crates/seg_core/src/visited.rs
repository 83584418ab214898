//! Dense per-voxel visited flags for one segmentation run.
//!
//! One bit per voxel, addressed by the grid's linear index. Words are
//! atomic so a single generation's frontier may be expanded from several
//! threads; marking stays a plain read-modify-write when used sequentially.
//!
//! Flags only ever transition unvisited → visited. A set is owned by
//! exactly one engine run, discarded with it, and never reused across
//! seeds.

use std::sync::atomic::{AtomicU64, Ordering};

const WORD_BITS: usize = 64;

/// One visited flag per voxel of a grid.
pub struct VisitedSet {
  words: Vec<AtomicU64>,
  bits: usize,
}

impl VisitedSet {
  /// Fresh set with every voxel unvisited.
  pub fn new(bits: usize) -> Self {
    let words = (bits + WORD_BITS - 1) / WORD_BITS;
    Self {
      words: (0..words).map(|_| AtomicU64::new(0)).collect(),
      bits,
    }
  }

  /// Number of flags the set tracks (visited or not).
  pub fn capacity(&self) -> usize {
    self.bits
  }

  /// Mark a voxel visited. Returns `true` if the flag was newly set.
  ///
  /// Idempotent; the atomic read-modify-write makes concurrent marks of the
  /// same voxel resolve to exactly one `true`.
  #[inline(always)]
  pub fn mark(&self, index: usize) -> bool {
    debug_assert!(index < self.bits);
    let mask = 1u64 << (index % WORD_BITS);
    let prev = self.words[index / WORD_BITS].fetch_or(mask, Ordering::Relaxed);
    prev & mask == 0
  }

  /// Whether a voxel has been visited.
  #[inline(always)]
  pub fn is_marked(&self, index: usize) -> bool {
    debug_assert!(index < self.bits);
    let mask = 1u64 << (index % WORD_BITS);
    self.words[index / WORD_BITS].load(Ordering::Relaxed) & mask != 0
  }

  /// Number of visited voxels.
  pub fn count(&self) -> usize {
    self
      .words
      .iter()
      .map(|w| w.load(Ordering::Relaxed).count_ones() as usize)
      .sum()
  }
}

#[cfg(test)]
#[path = "visited_test.rs"]
mod visited_test;
