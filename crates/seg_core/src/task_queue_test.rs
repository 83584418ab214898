use super::*;
use crate::grid::{DenseVolume, GridDims};

fn shared_volume(w: usize, h: usize, d: usize, value: i32) -> Arc<dyn ScalarVolume> {
  Arc::new(DenseVolume::filled(GridDims::new(w, h, d), value))
}

#[test]
fn stage_starts_idle() {
  let stage = SegmentStage::new();
  assert!(stage.is_idle());
  assert_eq!(stage.pending_count(), 0);
  assert_eq!(stage.completed_count(), 0);
}

#[test]
fn tick_processes_enqueued_jobs() {
  let mut stage = SegmentStage::new();
  let volume = shared_volume(3, 3, 3, 0);

  let id_a = stage.enqueue(
    Arc::clone(&volume),
    CalibrationConstants::IDENTITY,
    SeedRequest::new(1, 1, 1, 5),
    GrowthConfig::default(),
  );
  let id_b = stage.enqueue(
    volume,
    CalibrationConstants::IDENTITY,
    SeedRequest::new(0, 0, 0, 5),
    GrowthConfig::default(),
  );
  assert_ne!(id_a, id_b);
  assert_eq!(stage.pending_count(), 2);

  assert_eq!(stage.tick(), 2);
  assert_eq!(stage.pending_count(), 0);

  let mut completions = stage.drain_completions();
  assert_eq!(completions.len(), 2);
  completions.sort_by_key(|c| c.id);
  for completion in &completions {
    let region = completion.result.as_ref().unwrap();
    assert_eq!(region.len(), 27);
  }
  assert!(stage.is_idle());
}

#[test]
fn tick_with_no_work_is_a_no_op() {
  let mut stage = SegmentStage::new();
  assert_eq!(stage.tick(), 0);
}

#[test]
fn invalid_requests_complete_with_errors() {
  let mut stage = SegmentStage::new();
  let volume = shared_volume(3, 3, 3, 0);

  stage.enqueue(
    volume,
    CalibrationConstants::IDENTITY,
    SeedRequest::new(-1, 0, 0, 5),
    GrowthConfig::default(),
  );
  stage.tick();

  let completions = stage.drain_completions();
  assert_eq!(completions.len(), 1);
  assert!(completions[0].result.is_err());
}

#[test]
fn async_segmenter_delivers_completions() {
  let mut segmenter = AsyncSegmenter::new();
  let volume = shared_volume(4, 4, 4, -500);

  let id = segmenter.submit(
    volume,
    CalibrationConstants::IDENTITY,
    SeedRequest::new(2, 2, 2, 10),
    GrowthConfig::default(),
  );

  let completion = segmenter.recv().expect("worker should deliver");
  assert_eq!(completion.id, id);
  assert_eq!(completion.result.unwrap().len(), 64);
}

#[test]
fn async_segmenter_preserves_submission_ids() {
  let mut segmenter = AsyncSegmenter::new();
  let volume = shared_volume(2, 2, 2, 0);

  for expected in 0..3u64 {
    let id = segmenter.submit(
      Arc::clone(&volume),
      CalibrationConstants::IDENTITY,
      SeedRequest::new(0, 0, 0, 1),
      GrowthConfig::default(),
    );
    assert_eq!(id, expected);
  }

  let mut seen = Vec::new();
  for _ in 0..3 {
    seen.push(segmenter.recv().expect("worker should deliver").id);
  }
  seen.sort();
  assert_eq!(seen, vec![0, 1, 2]);
}
