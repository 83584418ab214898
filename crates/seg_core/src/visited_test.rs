use super::*;

#[test]
fn fresh_set_is_all_unvisited() {
  let set = VisitedSet::new(100);
  assert_eq!(set.capacity(), 100);
  assert_eq!(set.count(), 0);
  for i in 0..100 {
    assert!(!set.is_marked(i));
  }
}

#[test]
fn mark_reports_first_set_only() {
  let set = VisitedSet::new(70);
  assert!(set.mark(0));
  assert!(!set.mark(0));
  assert!(set.mark(69));
  assert!(!set.mark(69));
  assert_eq!(set.count(), 2);
}

#[test]
fn marks_do_not_bleed_across_word_boundaries() {
  let set = VisitedSet::new(130);
  set.mark(63);
  set.mark(64);
  set.mark(128);
  assert!(set.is_marked(63));
  assert!(set.is_marked(64));
  assert!(set.is_marked(128));
  assert!(!set.is_marked(62));
  assert!(!set.is_marked(65));
  assert!(!set.is_marked(129));
}

#[test]
fn population_is_monotonic() {
  let set = VisitedSet::new(256);
  let mut last = 0;
  for i in (0..256).step_by(3) {
    set.mark(i);
    let now = set.count();
    assert!(now >= last);
    last = now;
  }
}

#[test]
fn concurrent_marks_resolve_to_one_winner() {
  use std::sync::Arc;

  let set = Arc::new(VisitedSet::new(64));
  let mut handles = Vec::new();
  for _ in 0..8 {
    let set = Arc::clone(&set);
    handles.push(std::thread::spawn(move || {
      (0..64).filter(|&i| set.mark(i)).count()
    }));
  }
  let wins: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
  assert_eq!(wins, 64);
  assert_eq!(set.count(), 64);
}
