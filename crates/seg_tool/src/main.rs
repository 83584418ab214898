//! Region segmentation runner for raw scan volumes.
//!
//! Batch equivalent of an interactive seed pick: point it at a manifest
//! describing a raw volume, give it a seed coordinate and a sensitivity,
//! and it reports the grown region's voxel count and physical volume.
//! Optionally dumps an RGB overlay of the region for external viewers.

mod manifest;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use seg_core::{
	grow_region_timed, physical_volume, DenseVolume, GridDims, GrowthConfig, RgbOverlay,
	SeedRequest, SegmentedRegion,
};

use manifest::Manifest;

/// Region-growing segmentation over a raw scan volume.
#[derive(Parser, Debug)]
#[command(name = "grow_region")]
#[command(about = "Grows a calibrated-intensity region from a seed voxel")]
struct Args {
	/// Path to the volume manifest TOML file.
	#[arg(short, long)]
	manifest: PathBuf,

	/// Seed voxel coordinate.
	#[arg(long, num_args = 3, required = true, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
	seed: Vec<i64>,

	/// Half-width of the accepted intensity band, in calibrated units.
	#[arg(short, long, default_value_t = 200)]
	sensitivity: i64,

	/// Multiplicative growth cap per generation.
	#[arg(long, default_value_t = seg_core::DEFAULT_GROWTH_THRESHOLD)]
	growth_threshold: usize,

	/// Expand frontiers on the rayon pool.
	#[arg(long)]
	parallel: bool,

	/// Write an RGB overlay of the region to this path (raw RGB8 triples,
	/// same linear order as the input volume).
	#[arg(long)]
	overlay_out: Option<PathBuf>,
}

fn main() -> Result<()> {
	let args = Args::parse();
	if args.seed.len() != 3 {
		bail!("--seed takes exactly three coordinates");
	}

	println!("Loading manifest from: {}", args.manifest.display());
	let manifest = Manifest::load(&args.manifest)?;
	let volume = load_volume(&args.manifest, &manifest)?;
	let spacing = manifest.voxel_spacing()?;
	let calibration = manifest.calibration()?;

	println!(
		"Growing from seed ({}, {}, {}) with sensitivity {}",
		args.seed[0], args.seed[1], args.seed[2], args.sensitivity
	);

	let config = GrowthConfig::default()
		.with_growth_threshold(args.growth_threshold)
		.with_parallel(args.parallel);
	let seed = SeedRequest::new(args.seed[0], args.seed[1], args.seed[2], args.sensitivity);
	let (region, stats) = grow_region_timed(&volume, calibration, seed, &config)?;

	println!("Voxels found: {}", region.len());
	println!(
		"Volume: {:.2} mm^3",
		physical_volume(region.len(), spacing)
	);
	println!(
		"Generations: {}, peak frontier: {}, {:.1} ms",
		stats.generations,
		stats.peak_frontier,
		stats.elapsed_us as f64 / 1000.0
	);
	if stats.capped {
		println!("Warning: growth cap fired; the region was truncated");
	}

	if let Some(overlay_path) = &args.overlay_out {
		write_overlay(overlay_path, &region)?;
		println!("  \u{2713} {}", overlay_path.display());
	}

	Ok(())
}

/// Read the manifest's raw sample file (i16 little-endian) into a volume.
fn load_volume(manifest_path: &Path, manifest: &Manifest) -> Result<DenseVolume> {
	let data_path = manifest_path
		.parent()
		.unwrap_or(Path::new("."))
		.join(&manifest.data);
	let bytes = std::fs::read(&data_path)
		.with_context(|| format!("Failed to read volume data: {}", data_path.display()))?;

	if bytes.len() != manifest.voxel_count() * 2 {
		bail!(
			"{} holds {} bytes, expected {} for a {}x{}x{} i16 volume",
			data_path.display(),
			bytes.len(),
			manifest.voxel_count() * 2,
			manifest.width,
			manifest.height,
			manifest.depth
		);
	}

	let samples: Vec<i32> = bytes
		.chunks_exact(2)
		.map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as i32)
		.collect();

	let dims = GridDims::new(manifest.width, manifest.height, manifest.depth);
	Ok(DenseVolume::new(dims, samples)?)
}

/// Dump the region as raw RGB8 triples in linear-index order.
fn write_overlay(path: &Path, region: &SegmentedRegion) -> Result<()> {
	let overlay = RgbOverlay::from_region(region);
	let mut bytes = Vec::with_capacity(overlay.as_slice().len() * 3);
	for rgb in overlay.as_slice() {
		bytes.extend_from_slice(rgb);
	}
	std::fs::write(path, bytes)
		.with_context(|| format!("Failed to write overlay: {}", path.display()))
}
