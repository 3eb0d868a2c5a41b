//! Block handles and arena identity.
//!
//! A [`BlockHandle`] encodes the logical location of an allocation within
//! an [`Arena`](crate::Arena): an offset, never an address, so it stays
//! valid when growth relocates the backing buffer. Handles are
//! generation-scoped: the `generation` field allows O(1) staleness checks
//! after `clear`/`free` without a lookup table.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ArenaId`] allocation.
static ARENA_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for an [`Arena`](crate::Arena).
///
/// Allocated from a monotonic atomic counter at arena construction. Two
/// distinct arenas always have different IDs, even if one is dropped and
/// another is created at the same address. Resolving a handle against an
/// arena that did not issue it is therefore detected rather than
/// silently returning foreign bytes (no ABA reuse).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(u64);

impl ArenaId {
    /// Allocate a fresh, unique instance ID.
    ///
    /// Each call returns an ID that has never been returned before
    /// within this process. Thread-safe.
    pub(crate) fn next() -> Self {
        Self(ARENA_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Logical location of a block within an [`Arena`](crate::Arena).
///
/// Handles are cheap `Copy` descriptors. They do not own memory and are
/// resolved on demand via [`Arena::get`](crate::Arena::get) and
/// [`Arena::get_mut`](crate::Arena::get_mut). A handle is live only
/// while its issuing generation matches the arena's current generation;
/// [`Arena::clear`](crate::Arena::clear) and
/// [`Arena::free`](crate::Arena::free) bump the generation and turn all
/// outstanding handles stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct BlockHandle {
    /// The arena that issued this handle.
    pub(crate) arena: ArenaId,
    /// Arena generation when this allocation was made.
    pub(crate) generation: u32,
    /// Byte offset from the arena's logical base.
    pub(crate) offset: usize,
    /// Length of the allocation in bytes.
    pub(crate) len: usize,
}

impl BlockHandle {
    /// Create a new handle.
    pub(crate) fn new(arena: ArenaId, generation: u32, offset: usize, len: usize) -> Self {
        Self {
            arena,
            generation,
            offset,
            len,
        }
    }

    /// The arena that issued this handle.
    pub fn arena(&self) -> ArenaId {
        self.arena
    }

    /// The generation this handle belongs to.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Byte offset of the block from the arena's logical base.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length of the block in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this is a zero-length block.
    ///
    /// Allocations of zero bytes are rejected, so handles produced by an
    /// arena are never empty; this exists for API completeness.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for BlockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BlockHandle(arena={}, gen={}, off={}, len={})",
            self.arena, self.generation, self.offset, self.len
        )
    }
}
