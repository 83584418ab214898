use super::*;

#[test]
fn calibrate_applies_linear_rescale() {
  let cal = CalibrationConstants::new(-1024, 1);
  assert_eq!(cal.calibrate(0), -1024);
  assert_eq!(cal.calibrate(1024), 0);
  assert_eq!(cal.calibrate(3000), 1976);
}

#[test]
fn calibrate_identity_passes_raw_through() {
  let cal = CalibrationConstants::IDENTITY;
  for raw in [-2048, -1, 0, 1, 4095] {
    assert_eq!(cal.calibrate(raw), raw as i64);
  }
}

#[test]
fn calibrate_widens_before_multiplying() {
  // i32::MAX * i32::MAX overflows i32 and i64 would be needed even for
  // far smaller scanner extremes; the result must be exact.
  let cal = CalibrationConstants::new(i32::MAX, i32::MAX);
  let expected = i32::MAX as i64 + i32::MAX as i64 * i32::MAX as i64;
  assert_eq!(cal.calibrate(i32::MAX), expected);

  let cal = CalibrationConstants::new(i32::MIN, i32::MIN);
  let expected = i32::MIN as i64 + i32::MIN as i64 * i32::MAX as i64;
  assert_eq!(cal.calibrate(i32::MAX), expected);
}

#[test]
fn seed_request_holds_signed_coordinates() {
  let seed = SeedRequest::new(-1, 0, 3, 200);
  assert_eq!(seed.x, -1);
  assert_eq!(seed.sensitivity, 200);
}
