//! Allocator error types.

use std::error::Error;
use std::fmt;

use crate::handle::ArenaId;

/// Errors that can occur during arena operations.
///
/// Every fallible operation reports to its immediate caller; nothing is
/// retried internally and no allocation is ever partially performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// An allocation of zero bytes was requested.
    ZeroSize,
    /// The requested alignment is not a power of two.
    InvalidAlignment {
        /// The rejected alignment.
        align: usize,
    },
    /// The requested alignment exceeds the arena's configured maximum.
    ///
    /// The backing buffer's base is only guaranteed aligned to
    /// [`max_align`](crate::ArenaConfig::max_align); a larger request
    /// could resolve to a misaligned address after relocation.
    AlignmentTooLarge {
        /// The rejected alignment.
        align: usize,
        /// The configured maximum alignment.
        max: usize,
    },
    /// `elem_size * count` overflowed in an array allocation.
    SizeOverflow {
        /// Size of one element in bytes.
        elem_size: usize,
        /// Number of elements requested.
        count: usize,
    },
    /// Satisfying the request would grow the arena past its capacity
    /// ceiling.
    CapacityExceeded {
        /// Number of bytes the request needed.
        requested: usize,
        /// The configured maximum capacity.
        max: usize,
    },
    /// The memory source could not satisfy an allocate or reallocate
    /// request.
    AllocationFailed {
        /// Number of bytes requested from the source.
        requested: usize,
    },
    /// A `BlockHandle` from a generation that has been reclaimed by
    /// `clear` or `free`.
    StaleHandle {
        /// The generation encoded in the handle.
        handle_generation: u32,
        /// The arena's current generation.
        arena_generation: u32,
    },
    /// A `BlockHandle` issued by a different arena.
    ForeignHandle {
        /// The arena encoded in the handle.
        handle_arena: ArenaId,
        /// The arena the handle was resolved against.
        arena: ArenaId,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSize => write!(f, "allocation size must be non-zero"),
            Self::InvalidAlignment { align } => {
                write!(f, "alignment {align} is not a power of two")
            }
            Self::AlignmentTooLarge { align, max } => {
                write!(f, "alignment {align} exceeds configured maximum {max}")
            }
            Self::SizeOverflow { elem_size, count } => {
                write!(
                    f,
                    "array allocation overflows: {elem_size} bytes x {count} elements"
                )
            }
            Self::CapacityExceeded { requested, max } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} bytes, maximum {max} bytes"
                )
            }
            Self::AllocationFailed { requested } => {
                write!(f, "memory source failed to provide {requested} bytes")
            }
            Self::StaleHandle {
                handle_generation,
                arena_generation,
            } => {
                write!(
                    f,
                    "stale handle: generation {handle_generation}, arena is at {arena_generation}"
                )
            }
            Self::ForeignHandle {
                handle_arena,
                arena,
            } => {
                write!(
                    f,
                    "handle from arena {handle_arena} resolved against arena {arena}"
                )
            }
        }
    }
}

impl Error for ArenaError {}
