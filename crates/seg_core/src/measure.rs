//! Physical measurements: voxel spacing, region volume, patient-space
//! geometry.
//!
//! Spacing comes from scan metadata (see the `scan_meta` crate) and is the
//! only bridge between voxel counts and real-world millimeters.

use glam::{DAffine3, DVec3};

use crate::error::{SegError, SegResult};

/// Physical size of one voxel per axis, in millimeters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelSpacing {
  /// Extent along x (in-plane column spacing).
  pub dx: f64,
  /// Extent along y (in-plane row spacing).
  pub dy: f64,
  /// Extent along z (slice thickness).
  pub dz: f64,
}

impl VoxelSpacing {
  /// Validated spacing; every axis must be positive and finite.
  pub fn new(dx: f64, dy: f64, dz: f64) -> SegResult<Self> {
    for (axis, value) in [("dx", dx), ("dy", dy), ("dz", dz)] {
      if !value.is_finite() || value <= 0.0 {
        return Err(SegError::invalid(format!(
          "voxel spacing {} must be positive and finite, got {}",
          axis, value
        )));
      }
    }
    Ok(Self { dx, dy, dz })
  }

  /// Isotropic spacing (all axes equal).
  pub fn isotropic(size: f64) -> SegResult<Self> {
    Self::new(size, size, size)
  }

  /// Volume of a single voxel in mm³.
  #[inline]
  pub fn voxel_volume(&self) -> f64 {
    self.dx * self.dy * self.dz
  }

  /// Spacing as a scale vector.
  #[inline]
  pub fn as_scale(&self) -> DVec3 {
    DVec3::new(self.dx, self.dy, self.dz)
  }
}

/// Physical volume of `voxel_count` voxels in mm³.
///
/// Pure function; usable with any count, not only those produced by a grow
/// run. Counts are unsigned by construction, so only the spacing needs
/// validation; callers holding raw spacing values should build them
/// through [`VoxelSpacing::new`] first.
#[inline]
pub fn physical_volume(voxel_count: usize, spacing: VoxelSpacing) -> f64 {
  voxel_count as f64 * spacing.voxel_volume()
}

/// Placement of the voxel grid in patient space.
///
/// Built from spacing plus the position of voxel (0, 0, 0); converts between
/// fractional voxel indices and patient-space millimeters.
#[derive(Clone, Copy, Debug)]
pub struct ScanGeometry {
  spacing: VoxelSpacing,
  transform: DAffine3,
}

impl ScanGeometry {
  /// Geometry with voxel (0, 0, 0) at `origin` and axes scaled by spacing.
  pub fn new(spacing: VoxelSpacing, origin: DVec3) -> Self {
    Self {
      spacing,
      transform: DAffine3::from_translation(origin) * DAffine3::from_scale(spacing.as_scale()),
    }
  }

  /// The spacing this geometry was built from.
  pub fn spacing(&self) -> VoxelSpacing {
    self.spacing
  }

  /// Patient-space position of a (fractional) voxel index.
  #[inline]
  pub fn voxel_to_patient(&self, index: DVec3) -> DVec3 {
    self.transform.transform_point3(index)
  }

  /// Voxel index of a patient-space position.
  #[inline]
  pub fn patient_to_voxel(&self, position: DVec3) -> DVec3 {
    self.transform.inverse().transform_point3(position)
  }
}

#[cfg(test)]
#[path = "measure_test.rs"]
mod measure_test;
