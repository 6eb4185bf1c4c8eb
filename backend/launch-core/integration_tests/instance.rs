use crate::helpers::{endpoint, unique_key};

use launch_core::instance::InstanceLock;

use std::sync::{Arc, Barrier};
use std::thread;

use tempfile::TempDir;

const CONTENDERS: usize = 8;

/// **VALUE**: Concurrent launches with one key produce exactly one primary.
///
/// **WHY THIS MATTERS**: Two primaries would both bind the channel and both
/// own windows; users would see duplicate clients.
///
/// **BUG THIS CATCHES**: A check-then-create lock (exists? then create) that
/// lets several launches slip through the gap at the same time.
#[test]
fn given_concurrent_launches_when_try_acquire_then_exactly_one_primary() {
    // GIVEN: Several contenders released at the same instant
    let dir = TempDir::new().expect("temp dir");
    let endpoint = endpoint(dir.path(), &unique_key("race"));
    let barrier = Arc::new(Barrier::new(CONTENDERS));

    // WHEN: All of them try to acquire
    let handles: Vec<_> = (0..CONTENDERS)
        .map(|_| {
            let endpoint = endpoint.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                InstanceLock::try_acquire(&endpoint).expect("acquire should not error")
            })
        })
        .collect();
    // Keep every lock alive until all are counted.
    let locks: Vec<InstanceLock> = handles
        .into_iter()
        .map(|handle| handle.join().expect("contender panicked"))
        .collect();

    // THEN: Exactly one primary, the rest secondary
    let primaries = locks.iter().filter(|lock| lock.is_primary()).count();
    assert_eq!(primaries, 1, "exactly one contender must become primary");
}

/// **VALUE**: The key is reusable once the primary goes away.
#[test]
fn given_primary_dropped_when_next_launch_then_primary() {
    let dir = TempDir::new().expect("temp dir");
    let endpoint = endpoint(dir.path(), &unique_key("handover"));

    let first = InstanceLock::try_acquire(&endpoint).expect("first");
    assert!(first.is_primary());
    assert!(!InstanceLock::try_acquire(&endpoint).expect("second").is_primary());

    drop(first);

    assert!(InstanceLock::try_acquire(&endpoint).expect("third").is_primary());
}
