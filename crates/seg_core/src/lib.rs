//! seg_core - Framework/engine independent region-growing segmentation
//!
//! This crate segments a connected anatomical structure out of a CT-like
//! scalar voxel volume. Starting from a seed voxel, it grows the maximal
//! 6-connected set of voxels whose calibrated intensity stays within a
//! tolerance band around the seed's value, then converts the voxel count
//! into physical volume using per-axis spacing from scan metadata.
//!
//! # Features
//!
//! - **Generation-based growth**: frontier expansion with per-generation
//!   deduplication and a multiplicative growth cap
//! - **Calibrated thresholding**: linear rescale (intercept + slope · raw)
//!   applied before every band test
//! - **Bitset bookkeeping**: dense visited flags and O(1) duplicate
//!   suppression keyed by one linear voxel index
//! - **Opt-in parallelism**: rayon expansion of large frontiers with
//!   results identical to the sequential path
//!
//! # Example
//!
//! ```
//! use seg_core::{
//!   grow_region, physical_volume, CalibrationConstants, DenseVolume, GridDims, GrowthConfig,
//!   SeedRequest, VoxelSpacing,
//! };
//!
//! // Uniform phantom: every voxel calibrates to -1000 (air).
//! let volume = DenseVolume::filled(GridDims::new(16, 16, 8), 24);
//! let calibration = CalibrationConstants::new(-1024, 1);
//!
//! let region = grow_region(
//!   &volume,
//!   calibration,
//!   SeedRequest::new(8, 8, 4, 200),
//!   &GrowthConfig::default(),
//! )
//! .unwrap();
//!
//! let spacing = VoxelSpacing::new(0.742, 0.742, 5.0).unwrap();
//! println!(
//!   "{} voxels, {:.1} mm^3",
//!   region.len(),
//!   physical_volume(region.len(), spacing)
//! );
//! ```

pub mod band;
pub mod error;
pub mod grid;
pub mod types;

// Re-export commonly used items
pub use band::ThresholdBand;
pub use error::{SegError, SegResult};
pub use grid::{DenseVolume, GridDims, ScalarVolume, VoxelCoord, FACE_OFFSETS};
pub use types::{CalibratedValue, CalibrationConstants, RawSample, SeedRequest};

// Per-run state
pub mod region;
pub mod visited;
pub use region::SegmentedRegion;
pub use visited::VisitedSet;

// The region-growing engine
pub mod engine;
pub use engine::{
  grow_region, grow_region_timed, grow_region_with_band, GrowthConfig, GrowthPhase, GrowthStats,
  RegionGrower, DEFAULT_GROWTH_THRESHOLD,
};

// Physical measurements and patient-space geometry
pub mod measure;
pub use measure::{physical_volume, ScanGeometry, VoxelSpacing};

// Render handoff
pub mod overlay;
pub use overlay::RgbOverlay;

// Job queue for interactive collaborators
pub mod task_queue;
pub use task_queue::{AsyncSegmenter, SegmentCompletion, SegmentRequest, SegmentStage};
