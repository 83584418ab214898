//! Error types for segmentation runs.

use thiserror::Error;

use crate::grid::GridDims;

/// Result type for segmentation operations.
pub type SegResult<T> = Result<T, SegError>;

/// Errors that can occur while preparing or running a segmentation.
///
/// All variants are terminal for the current run: the engine never retries
/// internally, and validation failures are reported before any run state is
/// mutated.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SegError {
  /// A caller-supplied parameter is outside its valid range.
  #[error("invalid parameter: {reason}")]
  InvalidParameter {
    /// What was wrong with the parameter.
    reason: String,
  },

  /// The seed coordinate lies outside the grid extent.
  #[error("seed ({x}, {y}, {z}) outside grid extent {dims}")]
  OutOfBounds {
    /// Requested x coordinate.
    x: i64,
    /// Requested y coordinate.
    y: i64,
    /// Requested z coordinate.
    z: i64,
    /// Extent of the grid the seed was checked against.
    dims: GridDims,
  },

  /// Calibration metadata was absent or unusable.
  ///
  /// Produced by metadata collaborators (see the `scan_meta` crate); the
  /// engine itself assumes calibration constants are already valid.
  #[error("missing calibration: {reason}")]
  MissingCalibration {
    /// Which constant was missing or malformed.
    reason: String,
  },
}

impl SegError {
  /// Shorthand for an `InvalidParameter` error.
  pub fn invalid(reason: impl Into<String>) -> Self {
    SegError::InvalidParameter {
      reason: reason.into(),
    }
  }
}
