//! Manifest parsing for raw scan volumes.
//!
//! Spacing and rescale constants can be given directly, or left to be
//! extracted from a `[tags]` table of DICOM-style attributes via the
//! `scan_meta` crate. Explicit entries win over tags.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use scan_meta::TagMap;
use seg_core::{CalibrationConstants, VoxelSpacing};

/// Root manifest describing one raw scan volume.
#[derive(Debug, Deserialize)]
pub struct Manifest {
	/// Voxels along x.
	pub width: usize,
	/// Voxels along y.
	pub height: usize,
	/// Voxels along z (slice count).
	pub depth: usize,
	/// Path to the sample file, relative to the manifest.
	/// Samples are i16 little-endian in x-fastest, then y, then z order.
	pub data: PathBuf,
	/// Physical voxel spacing (overrides `tags`).
	pub spacing: Option<SpacingEntry>,
	/// Linear rescale constants (overrides `tags`).
	pub rescale: Option<RescaleEntry>,
	/// DICOM-style tagged attributes, e.g. `"0028,1052" = "-1024"`.
	#[serde(default)]
	pub tags: HashMap<String, String>,
}

/// Per-axis spacing in millimeters.
#[derive(Debug, Deserialize)]
pub struct SpacingEntry {
	pub dx: f64,
	pub dy: f64,
	pub dz: f64,
}

/// Rescale intercept and slope.
#[derive(Debug, Deserialize)]
pub struct RescaleEntry {
	pub intercept: i32,
	pub slope: i32,
}

impl Manifest {
	/// Load and parse a manifest file.
	pub fn load(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read manifest: {}", path.display()))?;
		toml::from_str(&text)
			.with_context(|| format!("Failed to parse manifest: {}", path.display()))
	}

	/// Expected number of samples in the data file.
	pub fn voxel_count(&self) -> usize {
		self.width * self.height * self.depth
	}

	/// Resolve rescale constants from the explicit entry or the tag table.
	pub fn calibration(&self) -> Result<CalibrationConstants> {
		if let Some(rescale) = &self.rescale {
			return Ok(CalibrationConstants::new(rescale.intercept, rescale.slope));
		}
		if self.tags.is_empty() {
			bail!("manifest has neither [rescale] nor [tags]");
		}
		Ok(scan_meta::calibration_constants(&self.tag_map())?)
	}

	/// Resolve voxel spacing from the explicit entry or the tag table.
	pub fn voxel_spacing(&self) -> Result<VoxelSpacing> {
		if let Some(spacing) = &self.spacing {
			return Ok(VoxelSpacing::new(spacing.dx, spacing.dy, spacing.dz)?);
		}
		if self.tags.is_empty() {
			bail!("manifest has neither [spacing] nor [tags]");
		}
		Ok(scan_meta::voxel_spacing(&self.tag_map())?)
	}

	fn tag_map(&self) -> TagMap {
		let mut map = TagMap::new();
		for (tag, value) in &self.tags {
			map.insert(tag.as_str(), value.as_str());
		}
		map
	}
}
