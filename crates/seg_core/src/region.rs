//! The accumulated segmented region handed to external renderers.

use crate::grid::{GridDims, VoxelCoord};
use crate::visited::VisitedSet;

/// Ordered, duplicate-free set of voxels belonging to a grown region.
///
/// Voxels appear in discovery order. Membership is backed by a bitset keyed
/// by the grid's linear index, so duplicate suppression is O(1) per
/// candidate instead of a scan over the accumulated list; the contents are
/// identical either way.
///
/// Distinct from the engine's visited state: visited also covers candidates
/// that were examined and rejected by the threshold test.
pub struct SegmentedRegion {
  dims: GridDims,
  voxels: Vec<VoxelCoord>,
  members: VisitedSet,
}

impl SegmentedRegion {
  /// Empty region over a grid.
  pub fn new(dims: GridDims) -> Self {
    Self {
      voxels: Vec::new(),
      members: VisitedSet::new(dims.voxel_count()),
      dims,
    }
  }

  /// Grid extent this region belongs to.
  pub fn dims(&self) -> GridDims {
    self.dims
  }

  /// Insert a voxel. Returns `false` (and keeps the list unchanged) if the
  /// coordinate is already a member.
  pub fn insert(&mut self, coord: VoxelCoord) -> bool {
    if self.members.mark(self.dims.linear_index(coord)) {
      self.voxels.push(coord);
      true
    } else {
      false
    }
  }

  /// Whether a coordinate belongs to the region.
  #[inline]
  pub fn contains(&self, coord: VoxelCoord) -> bool {
    self.members.is_marked(self.dims.linear_index(coord))
  }

  /// Number of member voxels.
  pub fn len(&self) -> usize {
    self.voxels.len()
  }

  /// Whether the region is empty.
  pub fn is_empty(&self) -> bool {
    self.voxels.is_empty()
  }

  /// Member voxels in discovery order.
  pub fn voxels(&self) -> &[VoxelCoord] {
    &self.voxels
  }

  /// Iterate members in discovery order.
  pub fn iter(&self) -> impl Iterator<Item = &VoxelCoord> {
    self.voxels.iter()
  }

  /// Consume the region, keeping only the ordered voxel list.
  pub fn into_voxels(self) -> Vec<VoxelCoord> {
    self.voxels
  }
}

impl std::fmt::Debug for SegmentedRegion {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SegmentedRegion")
      .field("dims", &self.dims)
      .field("len", &self.voxels.len())
      .finish()
  }
}

#[cfg(test)]
#[path = "region_test.rs"]
mod region_test;
