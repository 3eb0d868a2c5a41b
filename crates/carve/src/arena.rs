//! The bump allocator core: offset bookkeeping, growth, and handle
//! resolution.
//!
//! An [`Arena`] owns one growable buffer obtained from a
//! [`MemorySource`]. Allocation advances a single bump offset; there is
//! no per-block free list. Growth doubles the buffer (or jumps straight
//! to an oversized request in one step) and preserves existing content.
//! Handles store offsets, never addresses, so they survive relocation.

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::handle::{ArenaId, BlockHandle};
use crate::source::{MemorySource, SystemSource};

/// Round `offset` up to the next multiple of `align`.
///
/// `align` must be a power of two. Returns `None` on overflow.
fn align_up(offset: usize, align: usize) -> Option<usize> {
    let mask = align - 1;
    Some(offset.checked_add(mask)? & !mask)
}

/// Distance from `buf`'s base address to the next `align`-aligned
/// address. `align` must be a power of two; the result is `< align`.
fn base_pad(buf: &[u8], align: usize) -> usize {
    let addr = buf.as_ptr() as usize;
    addr.wrapping_neg() & (align - 1)
}

/// A growable bump allocator issuing relocation-safe [`BlockHandle`]s.
///
/// Blocks are carved sequentially from one backing buffer: each
/// allocation rounds the bump offset up to the requested alignment,
/// zero-fills the block, and returns a handle. Nothing is freed
/// individually: [`clear`](Arena::clear) recycles the whole buffer and
/// [`free`](Arena::free) releases it.
///
/// The arena is single-owner and not internally synchronized; every
/// mutating operation takes `&mut self`, so Rust enforces the
/// single-writer discipline at compile time. Use one arena per thread,
/// or wrap it in external mutual exclusion.
///
/// # Example
///
/// ```rust
/// use carve::{Arena, ArenaError};
///
/// let mut arena = Arena::with_capacity(16)?;
/// let a = arena.alloc(16)?;      // exact fit, no growth
/// let b = arena.alloc(8)?;       // grows the buffer; `a` stays valid
/// assert!(arena.capacity() >= 24);
/// assert_eq!(arena.get(a)?.len(), 16);
/// assert_eq!(arena.get(b)?.len(), 8);
/// # Ok::<(), ArenaError>(())
/// ```
pub struct Arena<S: MemorySource = SystemSource> {
    source: S,
    /// Physical backing storage: `capacity + max_align - 1` bytes.
    /// `None` until the first allocation when lazily initialized.
    buffer: Option<Vec<u8>>,
    /// Logical capacity in bytes (excludes alignment headroom).
    capacity: usize,
    /// Bump pointer: next free logical byte. `offset <= capacity`.
    offset: usize,
    /// Distance from the physical base to the `max_align`-aligned
    /// logical base. Recomputed whenever the buffer may have moved.
    pad: usize,
    /// Bumped by `clear`/`free`; handles from older generations are
    /// stale.
    generation: u32,
    id: ArenaId,
    config: ArenaConfig,
}

impl Arena<SystemSource> {
    /// Create an empty arena backed by the global allocator.
    ///
    /// No buffer is allocated until the first allocation, which sizes it
    /// exactly to the request.
    pub fn new() -> Self {
        Self::new_in(SystemSource)
    }

    /// Create an arena with `capacity` bytes allocated up front.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArenaError> {
        Self::with_config(ArenaConfig::new(capacity))
    }

    /// Create an arena from an explicit configuration.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        Self::with_config_in(config, SystemSource)
    }
}

impl Default for Arena<SystemSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MemorySource> Arena<S> {
    /// Create an empty arena backed by a custom memory source.
    pub fn new_in(source: S) -> Self {
        Self {
            source,
            buffer: None,
            capacity: 0,
            offset: 0,
            pad: 0,
            generation: 0,
            id: ArenaId::next(),
            config: ArenaConfig::default(),
        }
    }

    /// Create an arena from an explicit configuration and memory source.
    pub fn with_config_in(config: ArenaConfig, source: S) -> Result<Self, ArenaError> {
        config.validate()?;
        let mut arena = Self {
            source,
            buffer: None,
            capacity: 0,
            offset: 0,
            pad: 0,
            generation: 0,
            id: ArenaId::next(),
            config,
        };
        if arena.config.initial_capacity > 0 {
            arena.grow_to(arena.config.initial_capacity)?;
        }
        Ok(arena)
    }

    /// This arena's process-unique identity.
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// The current generation. Bumped by [`clear`](Arena::clear) and
    /// [`free`](Arena::free).
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The active configuration.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Logical capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes consumed by allocations so far, including alignment gaps.
    pub fn used(&self) -> usize {
        self.offset
    }

    /// Bytes left before the next growth step.
    pub fn remaining(&self) -> usize {
        self.capacity - self.offset
    }

    /// Physical size of the backing buffer in bytes, including the
    /// base-alignment headroom. Zero while unallocated.
    pub fn memory_bytes(&self) -> usize {
        self.buffer.as_ref().map_or(0, Vec::len)
    }

    /// Allocate `size` bytes at the configured default alignment.
    ///
    /// The returned block reads as zeroes. Fails with
    /// [`ArenaError::ZeroSize`] when `size == 0`.
    pub fn alloc(&mut self, size: usize) -> Result<BlockHandle, ArenaError> {
        self.alloc_aligned(size, self.config.default_align)
    }

    /// Allocate `size` bytes aligned to `align`.
    ///
    /// `align` must be a power of two no larger than the configured
    /// [`max_align`](ArenaConfig::max_align). The resolved address of
    /// the block satisfies `addr % align == 0`, and keeps satisfying it
    /// after any number of growth relocations.
    pub fn alloc_aligned(&mut self, size: usize, align: usize) -> Result<BlockHandle, ArenaError> {
        if size == 0 {
            return Err(ArenaError::ZeroSize);
        }
        if !align.is_power_of_two() {
            return Err(ArenaError::InvalidAlignment { align });
        }
        if align > self.config.max_align {
            return Err(ArenaError::AlignmentTooLarge {
                align,
                max: self.config.max_align,
            });
        }

        let overflow = ArenaError::CapacityExceeded {
            requested: size,
            max: self.config.max_capacity,
        };
        let aligned = align_up(self.offset, align).ok_or(overflow)?;
        let end = aligned.checked_add(size).ok_or(overflow)?;
        if end > self.capacity {
            self.grow_to(end)?;
        }

        let handle = BlockHandle::new(self.id, self.generation, aligned, size);
        self.offset = end;

        // The region may hold stale bytes from before a clear(); the
        // zero-fill contract is per allocation, not per buffer.
        let start = self.pad + aligned;
        let buf = self
            .buffer
            .as_mut()
            .expect("capacity covers the request, so the buffer exists");
        buf[start..start + size].fill(0);
        Ok(handle)
    }

    /// Allocate `count` elements of `elem_size` bytes each, at the
    /// default alignment.
    ///
    /// The total is computed with overflow checking:
    /// `alloc_array(usize::MAX / 2, 3)` fails with
    /// [`ArenaError::SizeOverflow`] instead of wrapping to a small
    /// request.
    pub fn alloc_array(&mut self, elem_size: usize, count: usize) -> Result<BlockHandle, ArenaError> {
        let total = elem_size
            .checked_mul(count)
            .ok_or(ArenaError::SizeOverflow { elem_size, count })?;
        self.alloc(total)
    }

    /// Allocate a block holding a copy of `bytes`, at the default
    /// alignment.
    pub fn alloc_bytes(&mut self, bytes: &[u8]) -> Result<BlockHandle, ArenaError> {
        let handle = self.alloc(bytes.len())?;
        let start = self.pad + handle.offset;
        let buf = self
            .buffer
            .as_mut()
            .expect("a block was just allocated, so the buffer exists");
        buf[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(handle)
    }

    /// Resolve a handle to its block for reading.
    ///
    /// Resolving a handle issued before the last
    /// [`clear`](Arena::clear)/[`free`](Arena::free), or by a different
    /// arena, is caller misuse; it is detected and reported as
    /// [`ArenaError::StaleHandle`] / [`ArenaError::ForeignHandle`].
    pub fn get(&self, handle: BlockHandle) -> Result<&[u8], ArenaError> {
        self.check_handle(handle)?;
        let start = self.pad + handle.offset;
        let buf = self
            .buffer
            .as_ref()
            .expect("live handles imply an allocated buffer");
        Ok(&buf[start..start + handle.len])
    }

    /// Resolve a handle to its block for writing.
    ///
    /// Same misuse contract as [`get`](Arena::get).
    pub fn get_mut(&mut self, handle: BlockHandle) -> Result<&mut [u8], ArenaError> {
        self.check_handle(handle)?;
        let start = self.pad + handle.offset;
        let buf = self
            .buffer
            .as_mut()
            .expect("live handles imply an allocated buffer");
        Ok(&mut buf[start..start + handle.len])
    }

    /// Reset the bump offset to zero without releasing the buffer.
    ///
    /// Capacity is unchanged; subsequent allocations reuse the same
    /// storage from offset 0 and are re-zeroed on handout. All
    /// outstanding handles become stale.
    pub fn clear(&mut self) {
        self.offset = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Release the backing buffer to the memory source.
    ///
    /// Capacity and offset report zero afterwards and all outstanding
    /// handles become stale. Idempotent: freeing an already-freed arena
    /// is a no-op. The arena is left in its freshly-constructed lazy
    /// state, so allocating again re-initializes it.
    pub fn free(&mut self) {
        if let Some(buf) = self.buffer.take() {
            self.source.release(buf);
        }
        self.capacity = 0;
        self.offset = 0;
        self.pad = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    fn check_handle(&self, handle: BlockHandle) -> Result<(), ArenaError> {
        if handle.arena != self.id {
            return Err(ArenaError::ForeignHandle {
                handle_arena: handle.arena,
                arena: self.id,
            });
        }
        if handle.generation != self.generation {
            return Err(ArenaError::StaleHandle {
                handle_generation: handle.generation,
                arena_generation: self.generation,
            });
        }
        Ok(())
    }

    /// Ensure a logical capacity of at least `required` bytes.
    ///
    /// Content at logical offsets `< self.offset` is preserved
    /// byte-for-byte. On failure the arena is left unchanged.
    fn grow_to(&mut self, required: usize) -> Result<(), ArenaError> {
        let max = self.config.max_capacity;
        if required > max {
            return Err(ArenaError::CapacityExceeded {
                requested: required,
                max,
            });
        }
        let headroom = self.config.max_align - 1;

        let Some(buf) = self.buffer.as_mut() else {
            // First allocation: size the buffer exactly to the request,
            // or to the configured up-front capacity if that is larger.
            let capacity = required.max(self.config.initial_capacity);
            let physical = capacity
                .checked_add(headroom)
                .ok_or(ArenaError::CapacityExceeded {
                    requested: required,
                    max,
                })?;
            let buf = self
                .source
                .allocate(physical)
                .map_err(|_| ArenaError::AllocationFailed {
                    requested: physical,
                })?;
            self.pad = base_pad(&buf, self.config.max_align);
            self.capacity = capacity;
            self.buffer = Some(buf);
            return Ok(());
        };

        // Double, floored at the request so one oversized allocation
        // needs exactly one growth step, and clamped to the ceiling.
        let capacity = self.capacity.saturating_mul(2).clamp(required, max);
        let physical = capacity
            .checked_add(headroom)
            .ok_or(ArenaError::CapacityExceeded {
                requested: required,
                max,
            })?;
        self.source
            .reallocate(buf, physical)
            .map_err(|_| ArenaError::AllocationFailed {
                requested: physical,
            })?;
        let new_pad = base_pad(buf, self.config.max_align);
        if new_pad != self.pad {
            // The relocated base landed at a different alignment phase;
            // shift live content so logical offsets stay stable.
            buf.copy_within(self.pad..self.pad + self.offset, new_pad);
        }
        self.pad = new_pad;
        self.capacity = capacity;
        Ok(())
    }
}

impl<S: MemorySource> Drop for Arena<S> {
    fn drop(&mut self) {
        self.free();
    }
}
