//! Closed intensity interval a voxel must fall within to join the region.

use crate::error::{SegError, SegResult};
use crate::types::CalibratedValue;

/// Inclusive calibrated-intensity interval `[low, high]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdBand {
  /// Lower bound, inclusive.
  pub low: CalibratedValue,
  /// Upper bound, inclusive.
  pub high: CalibratedValue,
}

impl ThresholdBand {
  /// Band centered on a seed's calibrated value with half-width
  /// `sensitivity`.
  ///
  /// `sensitivity` must be at least 1; smaller values fail with
  /// `InvalidParameter` and the caller is expected to re-prompt.
  pub fn around(seed_value: CalibratedValue, sensitivity: i64) -> SegResult<Self> {
    if sensitivity < 1 {
      return Err(SegError::invalid(format!(
        "sensitivity must be a positive integer, got {}",
        sensitivity
      )));
    }
    Ok(Self {
      low: seed_value.saturating_sub(sensitivity),
      high: seed_value.saturating_add(sensitivity),
    })
  }

  /// Whether a calibrated value lies inside the band, bounds included.
  #[inline(always)]
  pub fn contains(&self, value: CalibratedValue) -> bool {
    value >= self.low && value <= self.high
  }
}

#[cfg(test)]
#[path = "band_test.rs"]
mod band_test;
