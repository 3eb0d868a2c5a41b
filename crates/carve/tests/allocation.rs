//! End-to-end allocation lifecycles against the default system source.
//!
//! Module-level unit tests cover each operation in isolation; these
//! scenarios chain them the way callers do: fill, grow, resolve, clear,
//! refill, free.

use carve::{Arena, ArenaConfig, ArenaError};

#[test]
fn exact_fit_then_growth_preserves_prefix() {
    let mut arena = Arena::with_capacity(16).unwrap();

    // Fits exactly: no growth.
    let first = arena.alloc(16).unwrap();
    assert_eq!(arena.capacity(), 16);
    arena.get_mut(first).unwrap().copy_from_slice(b"0123456789abcdef");

    // offset + size = 24 > 16: triggers growth.
    let second = arena.alloc(8).unwrap();
    assert!(arena.capacity() >= 24);
    assert_eq!(arena.capacity(), 32); // doubling

    // The relocated buffer still holds the first block byte-for-byte.
    assert_eq!(arena.get(first).unwrap(), b"0123456789abcdef");
    assert!(arena.get(second).unwrap().iter().all(|&b| b == 0));
}

#[test]
fn interleaved_records_stay_addressable_across_many_growths() {
    let mut arena = Arena::new();
    let mut records = Vec::new();

    // Mixed sizes and alignments, enough volume to force repeated
    // buffer relocation from the 1-byte cold start.
    for i in 0..200usize {
        let size = 1 + (i * 7) % 96;
        let align = 1usize << (i % 5);
        let h = arena.alloc_aligned(size, align).unwrap();
        let stamp = (i % 255) as u8 + 1;
        arena.get_mut(h).unwrap().fill(stamp);
        records.push((h, size, stamp));
    }

    for (h, size, stamp) in records {
        let block = arena.get(h).unwrap();
        assert_eq!(block.len(), size);
        assert!(block.iter().all(|&b| b == stamp));
    }
}

#[test]
fn full_lifecycle_clear_then_free_then_reuse() {
    let mut arena = Arena::with_capacity(64).unwrap();

    let before_clear = arena.alloc_bytes(b"generation zero").unwrap();
    arena.clear();

    // Same storage, fresh generation: old handle stale, new block zeroed.
    assert!(matches!(
        arena.get(before_clear),
        Err(ArenaError::StaleHandle { .. })
    ));
    assert_eq!(arena.capacity(), 64);
    let after_clear = arena.alloc(15).unwrap();
    assert_eq!(after_clear.offset(), 0);
    assert!(arena.get(after_clear).unwrap().iter().all(|&b| b == 0));

    arena.free();
    assert_eq!(arena.capacity(), 0);
    assert_eq!(arena.used(), 0);
    assert!(matches!(
        arena.get(after_clear),
        Err(ArenaError::StaleHandle { .. })
    ));

    // Freed arena is back in its lazy state; using it re-initializes.
    let reborn = arena.alloc_bytes(b"generation two").unwrap();
    assert_eq!(arena.get(reborn).unwrap(), b"generation two");
}

#[test]
fn handles_are_arena_scoped() {
    let mut a = Arena::new();
    let mut b = Arena::new();
    let ha = a.alloc_bytes(b"from a").unwrap();
    let hb = b.alloc_bytes(b"from b").unwrap();

    assert!(matches!(b.get(ha), Err(ArenaError::ForeignHandle { .. })));
    assert!(matches!(a.get(hb), Err(ArenaError::ForeignHandle { .. })));

    // The right arenas still resolve their own handles.
    assert_eq!(a.get(ha).unwrap(), b"from a");
    assert_eq!(b.get(hb).unwrap(), b"from b");
}

#[test]
fn array_allocation_bounds() {
    let mut arena = Arena::new();

    let table = arena.alloc_array(16, 32).unwrap();
    assert_eq!(table.len(), 512);

    assert_eq!(
        arena.alloc_array(usize::MAX / 2, 3),
        Err(ArenaError::SizeOverflow {
            elem_size: usize::MAX / 2,
            count: 3
        })
    );
    // The failed request did not move the bump offset.
    assert_eq!(arena.used(), 512);
}

#[test]
fn ceiling_bounds_growth_not_existing_content() {
    let config = ArenaConfig {
        initial_capacity: 32,
        max_capacity: 48,
        ..ArenaConfig::default()
    };
    let mut arena = Arena::with_config(config).unwrap();
    let h = arena.alloc_bytes(&[9u8; 32]).unwrap();

    // Doubling would want 64; the ceiling clamps growth to 48.
    arena.alloc(16).unwrap();
    assert_eq!(arena.capacity(), 48);

    assert!(matches!(
        arena.alloc(1),
        Err(ArenaError::CapacityExceeded { .. })
    ));
    assert!(arena.get(h).unwrap().iter().all(|&b| b == 9));
}

#[test]
fn default_alignment_is_word_sized() {
    let mut arena = Arena::new();
    arena.alloc(1).unwrap();
    let h = arena.alloc(8).unwrap();
    assert_eq!(h.offset() % ArenaConfig::DEFAULT_ALIGN, 0);
    let addr = arena.get(h).unwrap().as_ptr() as usize;
    assert_eq!(addr % ArenaConfig::DEFAULT_ALIGN, 0);
}
