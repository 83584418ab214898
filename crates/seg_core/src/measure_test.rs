use glam::DVec3;

use super::*;

#[test]
fn volume_is_count_times_voxel_volume() {
  let spacing = VoxelSpacing::new(0.5, 0.5, 2.0).unwrap();
  assert_eq!(physical_volume(0, spacing), 0.0);
  assert_eq!(physical_volume(1, spacing), 0.5);
  assert_eq!(physical_volume(1000, spacing), 500.0);
}

#[test]
fn volume_matches_reference_arithmetic() {
  // Typical CT spacing: 0.742mm in-plane, 5mm slices.
  let spacing = VoxelSpacing::new(0.742, 0.742, 5.0).unwrap();
  let expected = 12345.0 * 0.742 * 0.742 * 5.0;
  assert!((physical_volume(12345, spacing) - expected).abs() < 1e-9);
}

#[test]
fn non_positive_spacing_is_rejected() {
  assert!(VoxelSpacing::new(0.0, 1.0, 1.0).is_err());
  assert!(VoxelSpacing::new(1.0, -0.5, 1.0).is_err());
  assert!(VoxelSpacing::new(1.0, 1.0, 0.0).is_err());
}

#[test]
fn non_finite_spacing_is_rejected() {
  assert!(VoxelSpacing::new(f64::NAN, 1.0, 1.0).is_err());
  assert!(VoxelSpacing::new(1.0, f64::INFINITY, 1.0).is_err());
}

#[test]
fn isotropic_spacing_fills_all_axes() {
  let spacing = VoxelSpacing::isotropic(0.8).unwrap();
  assert_eq!(spacing.dx, 0.8);
  assert_eq!(spacing.dy, 0.8);
  assert_eq!(spacing.dz, 0.8);
}

#[test]
fn geometry_scales_and_translates() {
  let spacing = VoxelSpacing::new(0.5, 0.5, 2.0).unwrap();
  let geometry = ScanGeometry::new(spacing, DVec3::new(-100.0, -100.0, 50.0));

  let p = geometry.voxel_to_patient(DVec3::new(0.0, 0.0, 0.0));
  assert!((p - DVec3::new(-100.0, -100.0, 50.0)).length() < 1e-12);

  let p = geometry.voxel_to_patient(DVec3::new(2.0, 4.0, 1.0));
  assert!((p - DVec3::new(-99.0, -98.0, 52.0)).length() < 1e-12);
}

#[test]
fn geometry_roundtrips() {
  let spacing = VoxelSpacing::new(0.742, 0.742, 5.0).unwrap();
  let geometry = ScanGeometry::new(spacing, DVec3::new(-187.3, -201.9, 1042.5));

  let index = DVec3::new(103.0, 57.0, 12.0);
  let back = geometry.patient_to_voxel(geometry.voxel_to_patient(index));
  assert!((index - back).length() < 1e-10);
}
