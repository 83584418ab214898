//! Job queue for segmentation runs.
//!
//! Following the stage pattern: Enqueue → Tick → Completions. Interactive
//! collaborators resolve a seed pick into a [`SeedRequest`] and submit it
//! here; the core has no notion of events or listeners.
//!
//! [`SegmentStage`] is the tick-driven variant (rayon fan-out per tick,
//! suited to a frame loop). [`AsyncSegmenter`] runs jobs on a dedicated
//! worker thread and hands completions back over a channel, for callers
//! without a tick to drive.

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{self as channel, Receiver, Sender, TryRecvError};
use rayon::prelude::*;
use web_time::Instant;

use crate::engine::{grow_region, GrowthConfig};
use crate::error::SegResult;
use crate::grid::ScalarVolume;
use crate::region::SegmentedRegion;
use crate::types::{CalibrationConstants, SeedRequest};

/// Request to grow one region.
#[derive(Clone)]
pub struct SegmentRequest {
  /// Unique identifier for this request.
  pub id: u64,
  /// The volume to segment. Shared, read-only for the run's duration.
  pub volume: Arc<dyn ScalarVolume>,
  /// Rescale constants for the volume.
  pub calibration: CalibrationConstants,
  /// Seed coordinate and sensitivity.
  pub seed: SeedRequest,
  /// Engine tunables.
  pub config: GrowthConfig,
}

/// Completed segmentation result.
pub struct SegmentCompletion {
  /// Request ID this completion corresponds to.
  pub id: u64,
  /// The grown region, or the validation error that rejected the request.
  pub result: SegResult<SegmentedRegion>,
  /// Raw grow time in microseconds.
  pub grow_time_us: u64,
}

fn run_request(request: SegmentRequest) -> SegmentCompletion {
  let start = Instant::now();
  let result = grow_region(
    &*request.volume,
    request.calibration,
    request.seed,
    &request.config,
  );
  SegmentCompletion {
    id: request.id,
    result,
    grow_time_us: start.elapsed().as_micros() as u64,
  }
}

// =============================================================================
// Tick-driven stage
// =============================================================================

/// Segmentation stage that processes queued requests in parallel per tick.
pub struct SegmentStage {
  /// Pending requests waiting to be processed.
  pending: Vec<SegmentRequest>,
  /// Completed results ready to be collected.
  completed: Vec<SegmentCompletion>,
  /// Next request ID.
  next_id: u64,
}

impl Default for SegmentStage {
  fn default() -> Self {
    Self::new()
  }
}

impl SegmentStage {
  /// Create a new segmentation stage.
  pub fn new() -> Self {
    Self {
      pending: Vec::new(),
      completed: Vec::new(),
      next_id: 0,
    }
  }

  /// Enqueue a segmentation request, returning the assigned ID.
  pub fn enqueue(
    &mut self,
    volume: Arc<dyn ScalarVolume>,
    calibration: CalibrationConstants,
    seed: SeedRequest,
    config: GrowthConfig,
  ) -> u64 {
    let id = self.next_id;
    self.next_id += 1;

    self.pending.push(SegmentRequest {
      id,
      volume,
      calibration,
      seed,
      config,
    });

    id
  }

  /// Process pending requests in parallel and move completions to output.
  /// Returns the number of jobs processed this tick.
  pub fn tick(&mut self) -> usize {
    if self.pending.is_empty() {
      return 0;
    }

    let requests = std::mem::take(&mut self.pending);
    let count = requests.len();

    let completions: Vec<SegmentCompletion> =
      requests.into_par_iter().map(run_request).collect();

    self.completed.extend(completions);
    count
  }

  /// Take all completed results.
  pub fn drain_completions(&mut self) -> Vec<SegmentCompletion> {
    std::mem::take(&mut self.completed)
  }

  /// Number of pending requests.
  pub fn pending_count(&self) -> usize {
    self.pending.len()
  }

  /// Number of completed results waiting to be drained.
  pub fn completed_count(&self) -> usize {
    self.completed.len()
  }

  /// True when no work remains.
  pub fn is_idle(&self) -> bool {
    self.pending.is_empty() && self.completed.is_empty()
  }
}

// =============================================================================
// Channel-based worker
// =============================================================================

/// Non-blocking segmentation worker.
///
/// Jobs are submitted over a channel to a dedicated thread and completions
/// are polled (or awaited) from another. Dropping the segmenter shuts the
/// worker down after in-flight jobs finish.
pub struct AsyncSegmenter {
  /// `None` only while dropping; taking the sender closes the channel.
  requests: Option<Sender<SegmentRequest>>,
  completions: Receiver<SegmentCompletion>,
  worker: Option<JoinHandle<()>>,
  next_id: u64,
}

impl Default for AsyncSegmenter {
  fn default() -> Self {
    Self::new()
  }
}

impl AsyncSegmenter {
  /// Spawn the worker thread.
  pub fn new() -> Self {
    let (req_tx, req_rx) = channel::unbounded::<SegmentRequest>();
    let (done_tx, done_rx) = channel::unbounded::<SegmentCompletion>();

    let worker = std::thread::spawn(move || {
      for request in req_rx.iter() {
        // Receiver gone means the segmenter was dropped mid-flight;
        // nothing left to report to.
        if done_tx.send(run_request(request)).is_err() {
          break;
        }
      }
    });

    Self {
      requests: Some(req_tx),
      completions: done_rx,
      worker: Some(worker),
      next_id: 0,
    }
  }

  /// Submit a job, returning its assigned ID.
  pub fn submit(
    &mut self,
    volume: Arc<dyn ScalarVolume>,
    calibration: CalibrationConstants,
    seed: SeedRequest,
    config: GrowthConfig,
  ) -> u64 {
    let id = self.next_id;
    self.next_id += 1;

    // Send fails only when the worker is gone, which only happens at drop.
    if let Some(requests) = &self.requests {
      let _ = requests.send(SegmentRequest {
        id,
        volume,
        calibration,
        seed,
        config,
      });
    }

    id
  }

  /// Poll for a completion without blocking.
  pub fn try_recv(&self) -> Option<SegmentCompletion> {
    match self.completions.try_recv() {
      Ok(completion) => Some(completion),
      Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
    }
  }

  /// Block until the next completion (or the worker shuts down).
  pub fn recv(&self) -> Option<SegmentCompletion> {
    self.completions.recv().ok()
  }
}

impl Drop for AsyncSegmenter {
  fn drop(&mut self) {
    // Closing the request channel ends the worker's receive loop.
    self.requests.take();
    if let Some(worker) = self.worker.take() {
      let _ = worker.join();
    }
  }
}

#[cfg(test)]
#[path = "task_queue_test.rs"]
mod task_queue_test;
