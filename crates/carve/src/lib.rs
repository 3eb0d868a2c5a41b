//! Growable bump arena allocation with relocation-safe handles.
//!
//! An [`Arena`] is a single growable byte buffer from which callers carve
//! out sequential, aligned, zero-initialized blocks. There is no
//! per-block deallocation: everything allocated from an arena shares one
//! lifetime and is reclaimed together, by [`Arena::clear`],
//! [`Arena::free`], or by dropping the arena.
//!
//! # Architecture
//!
//! ```text
//! Arena (bump core)
//! ├── MemorySource (allocate / reallocate / release — substitutable)
//! │   └── Vec<u8> backing buffer, over-allocated for base alignment
//! ├── ArenaConfig (alignment defaults, capacity ceiling)
//! └── BlockHandle × N (ArenaId + generation + offset + len)
//! ```
//!
//! # Relocation safety
//!
//! Growth may move the backing buffer, so an allocation never returns an
//! address. It returns a [`BlockHandle`] (the owning arena's identity
//! plus a byte offset), resolved against the *current* buffer on every
//! [`Arena::get`] / [`Arena::get_mut`] call. Addresses handed out
//! by a resolve call are borrows of the arena and cannot outlive a later
//! mutation, so a buffer move can never leave a caller holding a pointer
//! into freed memory.
//!
//! # Misuse contract
//!
//! Handles issued before a [`clear`](Arena::clear) or
//! [`free`](Arena::free) are dangling: the offsets they name may be
//! reused by later allocations. Resolving one is a caller error. The
//! arena detects this cheaply (generation and identity checks) and
//! returns [`ArenaError::StaleHandle`] / [`ArenaError::ForeignHandle`]
//! instead of handing out reused bytes — treat these as assertions on
//! your own lifetime discipline, not as a control-flow mechanism.
//!
//! # Example
//!
//! ```rust
//! use carve::Arena;
//!
//! let mut arena = Arena::new();
//! let greeting = arena.alloc_bytes(b"hello").unwrap();
//! let scratch = arena.alloc_aligned(256, 64).unwrap();
//!
//! // Growth may have relocated the buffer; handles resolve regardless.
//! assert_eq!(arena.get(greeting).unwrap(), b"hello");
//! assert!(arena.get(scratch).unwrap().iter().all(|&b| b == 0));
//!
//! arena.clear();
//! assert!(arena.get(greeting).is_err()); // stale after clear
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod handle;
pub mod source;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use handle::{ArenaId, BlockHandle};
pub use source::{MemorySource, SourceExhausted, SystemSource};
