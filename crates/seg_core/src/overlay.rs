//! Render-ready RGB overlay of a segmented region.
//!
//! Produces the buffer an external viewer displays: a fresh RGB volume,
//! black everywhere except the region's voxels, which are painted in a
//! magenta that fades very slowly with discovery order so early voxels
//! (near the seed) read brightest.

use crate::grid::{GridDims, VoxelCoord};
use crate::region::SegmentedRegion;

/// Per-voxel fade applied along the discovery order.
const FADE_PER_VOXEL: f64 = 0.001;

/// Dense RGB voxel buffer in the grid's linear-index order.
pub struct RgbOverlay {
  dims: GridDims,
  rgb: Vec<[u8; 3]>,
}

impl RgbOverlay {
  /// All-black overlay for a grid.
  pub fn new(dims: GridDims) -> Self {
    Self {
      rgb: vec![[0, 0, 0]; dims.voxel_count()],
      dims,
    }
  }

  /// Paint a region into the overlay.
  ///
  /// Voxel `i` in discovery order gets `255 - 0.001 * i` in the red and
  /// blue channels, clamped at zero.
  pub fn paint(&mut self, region: &SegmentedRegion) {
    for (i, &v) in region.iter().enumerate() {
      let fade = (FADE_PER_VOXEL * i as f64) as i64;
      let val = (255 - fade).clamp(0, 255) as u8;
      self.rgb[self.dims.linear_index(v)] = [val, 0, val];
    }
  }

  /// Overlay built directly from a region.
  pub fn from_region(region: &SegmentedRegion) -> Self {
    let mut overlay = Self::new(region.dims());
    overlay.paint(region);
    overlay
  }

  /// Grid extent of the overlay.
  pub fn dims(&self) -> GridDims {
    self.dims
  }

  /// Color at a coordinate.
  #[inline]
  pub fn color(&self, coord: VoxelCoord) -> [u8; 3] {
    self.rgb[self.dims.linear_index(coord)]
  }

  /// Raw buffer in linear-index order (for handoff to a renderer).
  pub fn as_slice(&self) -> &[[u8; 3]] {
    &self.rgb
  }
}

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;
