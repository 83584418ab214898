//! Generation-based region-growing engine.
//!
//! The engine grows a 6-connected region outward from a seed voxel,
//! admitting voxels whose calibrated intensity falls inside a threshold
//! band centered on the seed's value.
//!
//! # Run Lifecycle
//!
//! ```text
//!   Idle ──seed()──▶ Seeded ──step()──▶ Growing ──(stop rule)──▶ Done
//!
//!   Idle:    fresh visited/region state, nothing validated yet
//!   Seeded:  seed accepted, band derived, frontier = {seed}
//!   Growing: one frontier expansion per step()
//!   Done:    region complete, ready to hand off
//! ```
//!
//! # Generation Step
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────────────┐
//!  │ For each frontier voxel v:                                       │
//!  │   already visited?  → skip entirely                              │
//!  │   mark v visited, test v against the band                        │
//!  │   on pass: propose each face neighbor that is                    │
//!  │     in bounds ∧ unvisited ∧ in band                              │
//!  ├──────────────────────────────────────────────────────────────────┤
//!  │ Merge proposals in frontier order:                               │
//!  │   candidate already in region → discard                          │
//!  │   otherwise → append to region AND to the next frontier          │
//!  └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Stopping Rule
//!
//! Expansion continues while `frontier_len < prev_len * growth_threshold`.
//! An empty frontier always satisfies the comparison for a non-empty
//! previous generation, so exhaustion is the dominant exit; the
//! multiplicative bound only cuts off pathological regrowth. The comparison
//! is kept in exactly this form, since a plain emptiness check would change
//! where truncated runs stop.
//!
//! # Parallel Expansion
//!
//! With [`GrowthConfig::with_parallel`], one generation's frontier is
//! expanded with rayon. Visited marking is an atomic per-voxel
//! read-modify-write, proposals are collected per parent and merged in
//! frontier order, and duplicate suppression is linearized at that merge.
//! Any frontier voxel racing a sibling's unvisited check is already a
//! region member, so the merge discards it either way: parallel and
//! sequential runs produce identical regions, in identical order.

use smallvec::SmallVec;

use crate::band::ThresholdBand;
use crate::error::{SegError, SegResult};
use crate::grid::{GridDims, ScalarVolume, VoxelCoord, FACE_OFFSETS};
use crate::region::SegmentedRegion;
use crate::types::{CalibrationConstants, SeedRequest};
use crate::visited::VisitedSet;

/// Default multiplicative growth cap per generation.
pub const DEFAULT_GROWTH_THRESHOLD: usize = 100;

/// Frontier size above which the parallel path fans out with rayon.
/// Below this, thread coordination costs more than the expansion itself.
const PARALLEL_CUTOVER: usize = 512;

// =============================================================================
// Configuration
// =============================================================================

/// Tunables for one segmentation run.
#[derive(Clone, Debug)]
pub struct GrowthConfig {
  /// Stop once a generation is at least this many times larger than the
  /// previous one. Safety bound against runaway growth; rarely the exit
  /// path for anatomically bounded regions.
  pub growth_threshold: usize,

  /// Expand each generation's frontier on the rayon pool.
  /// Results are identical to the sequential path.
  pub parallel: bool,
}

impl Default for GrowthConfig {
  fn default() -> Self {
    Self {
      growth_threshold: DEFAULT_GROWTH_THRESHOLD,
      parallel: false,
    }
  }
}

impl GrowthConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_growth_threshold(mut self, threshold: usize) -> Self {
    self.growth_threshold = threshold;
    self
  }

  pub fn with_parallel(mut self, parallel: bool) -> Self {
    self.parallel = parallel;
    self
  }
}

// =============================================================================
// Phase & stats
// =============================================================================

/// Lifecycle phase of a [`RegionGrower`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthPhase {
  /// No seed accepted yet.
  Idle,
  /// Seed validated, frontier initialized, no expansion performed.
  Seeded,
  /// At least one generation expanded, stop rule not yet fired.
  Growing,
  /// Stop rule fired; the region is final.
  Done,
}

/// Counters describing a finished (or in-flight) run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrowthStats {
  /// Non-empty generations expanded.
  pub generations: usize,
  /// Voxels whose visited flag was newly set (accepted or rejected).
  pub voxels_visited: usize,
  /// Largest frontier seen.
  pub peak_frontier: usize,
  /// True when the growth cap fired with a non-empty frontier, i.e. the
  /// run was truncated rather than exhausted.
  pub capped: bool,
  /// Wall time of the run in microseconds. Filled by
  /// [`grow_region_timed`]; zero when the engine is stepped manually.
  pub elapsed_us: u64,
}

// =============================================================================
// RegionGrower
// =============================================================================

/// One segmentation run over a borrowed volume.
///
/// Owns its visited and region state exclusively for the run's lifetime;
/// both start fresh at construction and are never reused across seeds.
pub struct RegionGrower<'v, V: ScalarVolume + ?Sized> {
  volume: &'v V,
  calibration: CalibrationConstants,
  config: GrowthConfig,
  dims: GridDims,
  phase: GrowthPhase,
  band: Option<ThresholdBand>,
  visited: VisitedSet,
  region: SegmentedRegion,
  frontier: Vec<VoxelCoord>,
  prev_len: usize,
  stats: GrowthStats,
}

impl<'v, V: ScalarVolume + ?Sized> RegionGrower<'v, V> {
  /// Fresh engine in the `Idle` phase.
  pub fn new(volume: &'v V, calibration: CalibrationConstants, config: GrowthConfig) -> Self {
    let dims = volume.dims();
    Self {
      volume,
      calibration,
      config,
      dims,
      phase: GrowthPhase::Idle,
      band: None,
      visited: VisitedSet::new(dims.voxel_count()),
      region: SegmentedRegion::new(dims),
      frontier: Vec::new(),
      prev_len: 0,
      stats: GrowthStats::default(),
    }
  }

  /// Current lifecycle phase.
  pub fn phase(&self) -> GrowthPhase {
    self.phase
  }

  /// The band derived (or supplied) at seeding, if any.
  pub fn band(&self) -> Option<ThresholdBand> {
    self.band
  }

  /// Run counters so far.
  pub fn stats(&self) -> GrowthStats {
    self.stats
  }

  /// The region accumulated so far.
  pub fn region(&self) -> &SegmentedRegion {
    &self.region
  }

  /// Consume the engine, keeping the region.
  pub fn into_region(self) -> SegmentedRegion {
    self.region
  }

  /// Accept a seed request: validate the sensitivity, then the coordinate,
  /// derive the band from the seed's calibrated value, and enter `Seeded`.
  ///
  /// Fails with `InvalidParameter` (sensitivity < 1) or `OutOfBounds`
  /// before any run state is touched. Returns the derived band.
  pub fn seed(&mut self, request: &SeedRequest) -> SegResult<ThresholdBand> {
    if self.phase != GrowthPhase::Idle {
      return Err(SegError::invalid("engine already seeded; use a fresh instance per run"));
    }
    if request.sensitivity < 1 {
      return Err(SegError::invalid(format!(
        "sensitivity must be a positive integer, got {}",
        request.sensitivity
      )));
    }
    if !self.dims.in_bounds(request.x, request.y, request.z) {
      return Err(self.out_of_bounds(request.x, request.y, request.z));
    }
    let seed = VoxelCoord::new(request.x as usize, request.y as usize, request.z as usize);
    let seed_value = self
      .calibration
      .calibrate(self.volume.raw(seed.x, seed.y, seed.z));
    let band = ThresholdBand::around(seed_value, request.sensitivity)?;
    self.accept_seed(seed, band);
    Ok(band)
  }

  /// Accept a seed with a caller-supplied band instead of deriving one.
  ///
  /// The seed joins the region only if its own calibrated value passes the
  /// band, preserving the invariant that every member passed the test.
  pub fn seed_with_band(&mut self, x: i64, y: i64, z: i64, band: ThresholdBand) -> SegResult<()> {
    if self.phase != GrowthPhase::Idle {
      return Err(SegError::invalid("engine already seeded; use a fresh instance per run"));
    }
    if !self.dims.in_bounds(x, y, z) {
      return Err(self.out_of_bounds(x, y, z));
    }
    self.accept_seed(VoxelCoord::new(x as usize, y as usize, z as usize), band);
    Ok(())
  }

  fn out_of_bounds(&self, x: i64, y: i64, z: i64) -> SegError {
    SegError::OutOfBounds {
      x,
      y,
      z,
      dims: self.dims,
    }
  }

  fn accept_seed(&mut self, seed: VoxelCoord, band: ThresholdBand) {
    let seed_value = self
      .calibration
      .calibrate(self.volume.raw(seed.x, seed.y, seed.z));
    if band.contains(seed_value) {
      self.region.insert(seed);
    }
    self.band = Some(band);
    self.frontier = vec![seed];
    self.prev_len = 1;
    self.stats.peak_frontier = 1;
    self.phase = GrowthPhase::Seeded;
  }

  /// Expand one generation. Returns `true` while the run is still growing,
  /// `false` once the stop rule has fired and the phase is `Done`.
  ///
  /// Callers wanting an external generation cap (bounded latency) can stop
  /// stepping at any point and take the partial region; the engine itself
  /// models no cancellation.
  pub fn step(&mut self) -> SegResult<bool> {
    match self.phase {
      GrowthPhase::Idle => return Err(SegError::invalid("engine not seeded")),
      GrowthPhase::Seeded => self.phase = GrowthPhase::Growing,
      GrowthPhase::Growing => {}
      GrowthPhase::Done => return Ok(false),
    }

    // Stop rule, checked against the previous generation's size before
    // expanding. An empty frontier with a non-empty predecessor still
    // passes (0 < prev * threshold) and drains on the following step.
    let cap = self.prev_len.saturating_mul(self.config.growth_threshold);
    if self.frontier.len() >= cap {
      self.stats.capped = !self.frontier.is_empty();
      self.phase = GrowthPhase::Done;
      return Ok(false);
    }

    let band = match self.band {
      Some(band) => band,
      None => return Err(SegError::invalid("engine not seeded")),
    };
    self.prev_len = self.frontier.len();
    let (proposals, newly_visited) = if self.config.parallel && self.frontier.len() >= PARALLEL_CUTOVER
    {
      self.expand_parallel(band)
    } else {
      self.expand_sequential(band)
    };
    self.stats.voxels_visited += newly_visited;
    if self.prev_len > 0 {
      self.stats.generations += 1;
    }

    // Merge point: duplicate suppression against the accumulated region,
    // in frontier order. Survivors are both region members and the next
    // frontier.
    let mut next = Vec::with_capacity(proposals.len());
    for candidate in proposals {
      if self.region.insert(candidate) {
        next.push(candidate);
      }
    }
    self.frontier = next;
    self.stats.peak_frontier = self.stats.peak_frontier.max(self.frontier.len());
    Ok(true)
  }

  /// Step to completion.
  pub fn run(&mut self) -> SegResult<()> {
    while self.step()? {}
    Ok(())
  }

  fn expand_sequential(&self, band: ThresholdBand) -> (Vec<VoxelCoord>, usize) {
    let mut proposals = Vec::new();
    let mut newly_visited = 0;
    for &v in &self.frontier {
      if let Some(props) = self.expand_voxel(v, band) {
        newly_visited += 1;
        proposals.extend(props);
      }
    }
    (proposals, newly_visited)
  }

  fn expand_parallel(&self, band: ThresholdBand) -> (Vec<VoxelCoord>, usize) {
    use rayon::prelude::*;

    // Ordered collect keeps proposals in frontier order, so the merge sees
    // the same sequence as the sequential path.
    let per_parent: Vec<Option<SmallVec<[VoxelCoord; 6]>>> = self
      .frontier
      .par_iter()
      .map(|&v| self.expand_voxel(v, band))
      .collect();

    let newly_visited = per_parent.iter().filter(|p| p.is_some()).count();
    let proposals = per_parent.into_iter().flatten().flatten().collect();
    (proposals, newly_visited)
  }

  /// Expand a single frontier voxel.
  ///
  /// `None` when the voxel was already visited (skipped entirely). `Some`
  /// with its surviving neighbor proposals otherwise; empty when the voxel
  /// failed the band test.
  #[inline]
  fn expand_voxel(&self, v: VoxelCoord, band: ThresholdBand) -> Option<SmallVec<[VoxelCoord; 6]>> {
    if !self.visited.mark(self.dims.linear_index(v)) {
      return None;
    }
    let value = self.calibration.calibrate(self.volume.raw(v.x, v.y, v.z));
    let mut proposals = SmallVec::new();
    if !band.contains(value) {
      return Some(proposals);
    }
    for (dx, dy, dz) in FACE_OFFSETS {
      let (nx, ny, nz) = (v.x as i64 + dx, v.y as i64 + dy, v.z as i64 + dz);
      if !self.dims.in_bounds(nx, ny, nz) {
        continue;
      }
      let n = VoxelCoord::new(nx as usize, ny as usize, nz as usize);
      if self.visited.is_marked(self.dims.linear_index(n)) {
        continue;
      }
      let n_value = self.calibration.calibrate(self.volume.raw(n.x, n.y, n.z));
      if band.contains(n_value) {
        proposals.push(n);
      }
    }
    Some(proposals)
  }
}

// =============================================================================
// One-shot entry points
// =============================================================================

/// Grow the region reachable from a seed request.
#[cfg_attr(
  feature = "tracing",
  tracing::instrument(skip_all, name = "engine::grow_region")
)]
pub fn grow_region<V: ScalarVolume + ?Sized>(
  volume: &V,
  calibration: CalibrationConstants,
  seed: SeedRequest,
  config: &GrowthConfig,
) -> SegResult<SegmentedRegion> {
  let mut grower = RegionGrower::new(volume, calibration, config.clone());
  grower.seed(&seed)?;
  grower.run()?;
  Ok(grower.into_region())
}

/// Grow with a caller-supplied band instead of deriving one from the seed.
pub fn grow_region_with_band<V: ScalarVolume + ?Sized>(
  volume: &V,
  calibration: CalibrationConstants,
  seed: (i64, i64, i64),
  band: ThresholdBand,
  config: &GrowthConfig,
) -> SegResult<SegmentedRegion> {
  let mut grower = RegionGrower::new(volume, calibration, config.clone());
  grower.seed_with_band(seed.0, seed.1, seed.2, band)?;
  grower.run()?;
  Ok(grower.into_region())
}

/// Same as [`grow_region`] but also returns run counters with wall time.
pub fn grow_region_timed<V: ScalarVolume + ?Sized>(
  volume: &V,
  calibration: CalibrationConstants,
  seed: SeedRequest,
  config: &GrowthConfig,
) -> SegResult<(SegmentedRegion, GrowthStats)> {
  use web_time::Instant;

  let start = Instant::now();
  let mut grower = RegionGrower::new(volume, calibration, config.clone());
  grower.seed(&seed)?;
  grower.run()?;
  let mut stats = grower.stats();
  stats.elapsed_us = start.elapsed().as_micros() as u64;
  Ok((grower.into_region(), stats))
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;
