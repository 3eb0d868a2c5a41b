//! Allocation-failure paths, driven through instrumented memory sources.
//!
//! A well-behaved system allocator never takes these branches, so they
//! are exercised here with [`FailingSource`] and [`CountingSource`]
//! substituted for the real provider.

use carve::{Arena, ArenaConfig, ArenaError};
use carve_test_utils::{CountingSource, FailingSource};

#[test]
fn first_allocation_failure_surfaces() {
    let mut arena = Arena::new_in(FailingSource::immediate());
    let result = arena.alloc(16);
    assert!(matches!(result, Err(ArenaError::AllocationFailed { .. })));
    // The arena is coherent and empty, not poisoned.
    assert_eq!(arena.capacity(), 0);
    assert_eq!(arena.used(), 0);
}

#[test]
fn eager_construction_failure_surfaces() {
    let result = Arena::with_config_in(ArenaConfig::new(64), FailingSource::immediate());
    assert!(matches!(result, Err(ArenaError::AllocationFailed { .. })));
}

#[test]
fn growth_failure_preserves_existing_allocations() {
    // One successful provider call: the initial buffer. Growth fails.
    let mut arena = Arena::new_in(FailingSource::new(1));
    let first = arena.alloc(16).unwrap();
    arena.get_mut(first).unwrap().fill(0x5A);

    let result = arena.alloc(64);
    assert!(matches!(result, Err(ArenaError::AllocationFailed { .. })));

    // No partial allocation: bookkeeping and content are untouched.
    assert_eq!(arena.capacity(), 16);
    assert_eq!(arena.used(), 16);
    assert!(arena.get(first).unwrap().iter().all(|&b| b == 0x5A));
}

#[test]
fn caller_can_retry_with_a_smaller_request() {
    // The single successful provider call builds the initial buffer.
    let mut arena =
        Arena::with_config_in(ArenaConfig::new(16), FailingSource::new(1)).unwrap();
    arena.alloc(8).unwrap();
    assert!(arena.alloc(1024).is_err());
    // Retry policy belongs to the caller; a fitting request still works.
    let h = arena.alloc(8).unwrap();
    assert_eq!(h.offset(), 8);
}

#[test]
fn growth_goes_through_reallocate_not_a_fresh_buffer() {
    let source = CountingSource::new();
    let counters = source.counters();
    let mut arena = Arena::with_config_in(ArenaConfig::new(16), source).unwrap();
    assert_eq!(counters.allocates(), 1);

    arena.alloc(16).unwrap(); // exact fit
    assert_eq!(counters.reallocates(), 0);

    arena.alloc(8).unwrap(); // growth
    assert_eq!(counters.allocates(), 1);
    assert_eq!(counters.reallocates(), 1);
}

#[test]
fn clear_makes_no_provider_calls() {
    let source = CountingSource::new();
    let counters = source.counters();
    let mut arena = Arena::with_config_in(ArenaConfig::new(64), source).unwrap();
    arena.alloc(32).unwrap();
    arena.clear();
    arena.alloc(32).unwrap();
    assert_eq!(counters.allocates(), 1);
    assert_eq!(counters.reallocates(), 0);
    assert_eq!(counters.releases(), 0);
}

#[test]
fn free_releases_exactly_once() {
    let source = CountingSource::new();
    let counters = source.counters();
    let mut arena = Arena::with_config_in(ArenaConfig::new(64), source).unwrap();
    arena.free();
    arena.free(); // idempotent: no second release
    assert_eq!(counters.releases(), 1);
}

#[test]
fn drop_releases_the_buffer() {
    let source = CountingSource::new();
    let counters = source.counters();
    {
        let mut arena = Arena::new_in(source);
        arena.alloc(32).unwrap();
    }
    assert_eq!(counters.releases(), 1);
}

#[test]
fn drop_after_free_does_not_double_release() {
    let source = CountingSource::new();
    let counters = source.counters();
    {
        let mut arena = Arena::new_in(source);
        arena.alloc(32).unwrap();
        arena.free();
    }
    assert_eq!(counters.releases(), 1);
}
