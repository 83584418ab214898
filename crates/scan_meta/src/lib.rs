//! Calibration-metadata extraction for scan volumes.
//!
//! CT scans carry their rescale constants and voxel spacing as tagged text
//! attributes. This crate turns those strings into the typed constants the
//! segmentation core consumes: [`CalibrationConstants`] and
//! [`VoxelSpacing`]. Acquisition itself stays external: callers implement
//! [`TagSource`] over whatever header store they already have.
//!
//! The relevant attributes:
//!
//! | Tag         | Attribute         | Format                         |
//! |-------------|-------------------|--------------------------------|
//! | `0028,1052` | Rescale intercept | integer, may be padded         |
//! | `0028,1053` | Rescale slope     | integer, may be padded         |
//! | `0028,0030` | Pixel spacing     | `row\column`, mm, backslash-separated |
//! | `0018,0050` | Slice thickness   | decimal mm                     |
//! | `0028,0010` | Rows              | integer                        |
//! | `0028,0011` | Columns           | integer                        |
//!
//! Absent or unparseable values surface as [`MetaError`], which converts
//! into the core's `MissingCalibration` error kind.

use seg_core::{CalibrationConstants, SegError, VoxelSpacing};
use thiserror::Error;

/// Tag identifiers for the attributes this crate reads.
pub mod tags {
    /// Rescale intercept.
    pub const RESCALE_INTERCEPT: &str = "0028,1052";
    /// Rescale slope.
    pub const RESCALE_SLOPE: &str = "0028,1053";
    /// In-plane pixel spacing (row\column pair).
    pub const PIXEL_SPACING: &str = "0028,0030";
    /// Slice thickness.
    pub const SLICE_THICKNESS: &str = "0018,0050";
    /// Image rows.
    pub const ROWS: &str = "0028,0010";
    /// Image columns.
    pub const COLUMNS: &str = "0028,0011";
}

/// Result type for metadata extraction.
pub type MetaResult<T> = Result<T, MetaError>;

/// Errors raised while extracting scan metadata.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum MetaError {
    /// A required tag was absent from the source.
    #[error("tag {tag} is missing")]
    MissingTag {
        /// The absent tag.
        tag: String,
    },

    /// A tag was present but its value could not be used.
    #[error("tag {tag} holds unusable value {value:?}")]
    Malformed {
        /// The offending tag.
        tag: String,
        /// The raw value as read.
        value: String,
    },
}

impl From<MetaError> for SegError {
    fn from(err: MetaError) -> Self {
        SegError::MissingCalibration {
            reason: err.to_string(),
        }
    }
}

/// Read access to tagged header attributes.
///
/// Implementations wrap whatever already holds the scan header (a DICOM
/// object, a sidecar file, a test fixture) and return the raw attribute
/// text, untrimmed.
pub trait TagSource {
    /// The raw value of a tag, or `None` when absent.
    fn tag(&self, tag: &str) -> Option<String>;
}

/// In-memory tag store for fixtures and manifest-driven tools.
#[derive(Debug, Clone, Default)]
pub struct TagMap {
    entries: std::collections::HashMap<String, String>,
}

impl TagMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a tag value.
    pub fn insert(&mut self, tag: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(tag.into(), value.into());
        self
    }
}

impl TagSource for TagMap {
    fn tag(&self, tag: &str) -> Option<String> {
        self.entries.get(tag).cloned()
    }
}

fn require_tag(source: &impl TagSource, tag: &str) -> MetaResult<String> {
    source.tag(tag).ok_or_else(|| MetaError::MissingTag {
        tag: tag.to_string(),
    })
}

fn parse_int(tag: &str, value: &str) -> MetaResult<i32> {
    value.trim().parse().map_err(|_| MetaError::Malformed {
        tag: tag.to_string(),
        value: value.to_string(),
    })
}

fn parse_positive_mm(tag: &str, value: &str) -> MetaResult<f64> {
    let parsed: f64 = value.trim().parse().map_err(|_| MetaError::Malformed {
        tag: tag.to_string(),
        value: value.to_string(),
    })?;
    if !parsed.is_finite() || parsed <= 0.0 {
        return Err(MetaError::Malformed {
            tag: tag.to_string(),
            value: value.to_string(),
        });
    }
    Ok(parsed)
}

/// Extract the rescale constants.
pub fn calibration_constants(source: &impl TagSource) -> MetaResult<CalibrationConstants> {
    let intercept = require_tag(source, tags::RESCALE_INTERCEPT)?;
    let slope = require_tag(source, tags::RESCALE_SLOPE)?;
    Ok(CalibrationConstants::new(
        parse_int(tags::RESCALE_INTERCEPT, &intercept)?,
        parse_int(tags::RESCALE_SLOPE, &slope)?,
    ))
}

/// Extract per-axis voxel spacing in millimeters.
///
/// Pixel spacing is a backslash-separated `row\column` pair; slice
/// thickness supplies the z extent.
pub fn voxel_spacing(source: &impl TagSource) -> MetaResult<VoxelSpacing> {
    let spacing = require_tag(source, tags::PIXEL_SPACING)?;
    let mut parts = spacing.trim().split('\\');
    let malformed = || MetaError::Malformed {
        tag: tags::PIXEL_SPACING.to_string(),
        value: spacing.clone(),
    };
    let row = parts.next().ok_or_else(malformed)?;
    let column = parts.next().ok_or_else(malformed)?;
    let dy = parse_positive_mm(tags::PIXEL_SPACING, row)?;
    let dx = parse_positive_mm(tags::PIXEL_SPACING, column)?;

    let thickness = require_tag(source, tags::SLICE_THICKNESS)?;
    let dz = parse_positive_mm(tags::SLICE_THICKNESS, &thickness)?;

    VoxelSpacing::new(dx, dy, dz).map_err(|_| MetaError::Malformed {
        tag: tags::PIXEL_SPACING.to_string(),
        value: spacing.clone(),
    })
}

/// Extract the in-plane image extent as `(columns, rows)`.
pub fn image_extent(source: &impl TagSource) -> MetaResult<(usize, usize)> {
    let rows = require_tag(source, tags::ROWS)?;
    let columns = require_tag(source, tags::COLUMNS)?;
    let rows = parse_int(tags::ROWS, &rows)?;
    let columns = parse_int(tags::COLUMNS, &columns)?;
    if rows <= 0 || columns <= 0 {
        return Err(MetaError::Malformed {
            tag: tags::ROWS.to_string(),
            value: format!("{}x{}", columns, rows),
        });
    }
    Ok((columns as usize, rows as usize))
}
