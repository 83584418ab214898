use super::*;

#[test]
fn band_is_centered_on_seed_value() {
  let band = ThresholdBand::around(-600, 200).unwrap();
  assert_eq!(band.low, -800);
  assert_eq!(band.high, -400);
}

#[test]
fn band_bounds_are_inclusive() {
  let band = ThresholdBand::around(100, 50).unwrap();
  assert!(band.contains(50));
  assert!(band.contains(100));
  assert!(band.contains(150));
  assert!(!band.contains(49));
  assert!(!band.contains(151));
}

#[test]
fn zero_sensitivity_is_rejected() {
  assert!(matches!(
    ThresholdBand::around(0, 0),
    Err(SegError::InvalidParameter { .. })
  ));
}

#[test]
fn negative_sensitivity_is_rejected() {
  assert!(matches!(
    ThresholdBand::around(0, -5),
    Err(SegError::InvalidParameter { .. })
  ));
}

#[test]
fn minimum_sensitivity_is_one() {
  let band = ThresholdBand::around(10, 1).unwrap();
  assert!(band.contains(9));
  assert!(band.contains(11));
  assert!(!band.contains(12));
}
