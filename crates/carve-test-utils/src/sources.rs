//! Reusable [`MemorySource`] test fixtures.

use std::cell::Cell;
use std::rc::Rc;

use carve::{MemorySource, SourceExhausted, SystemSource};

/// Fails deterministically after a configurable number of successful
/// provider calls.
///
/// `allocate` and `reallocate` count against the budget; `release`
/// always succeeds. Useful for testing that allocation failures surface
/// as errors and leave the arena coherent.
pub struct FailingSource {
    inner: SystemSource,
    succeed_count: usize,
    calls: usize,
}

impl FailingSource {
    /// Create a source that succeeds `succeed_count` times then fails.
    pub fn new(succeed_count: usize) -> Self {
        Self {
            inner: SystemSource,
            succeed_count,
            calls: 0,
        }
    }

    /// A source that fails on the very first provider call.
    pub fn immediate() -> Self {
        Self::new(0)
    }

    fn charge(&mut self, requested: usize) -> Result<(), SourceExhausted> {
        let n = self.calls;
        self.calls += 1;
        if n >= self.succeed_count {
            return Err(SourceExhausted { requested });
        }
        Ok(())
    }
}

impl MemorySource for FailingSource {
    fn allocate(&mut self, size: usize) -> Result<Vec<u8>, SourceExhausted> {
        self.charge(size)?;
        self.inner.allocate(size)
    }

    fn reallocate(&mut self, buf: &mut Vec<u8>, new_size: usize) -> Result<(), SourceExhausted> {
        self.charge(new_size)?;
        self.inner.reallocate(buf, new_size)
    }
}

/// Shared call counters for a [`CountingSource`].
///
/// The counters live behind `Rc<Cell<_>>` so a test can keep reading
/// them after handing the source to an arena by value.
#[derive(Clone, Default)]
pub struct SourceCounters {
    allocates: Rc<Cell<usize>>,
    reallocates: Rc<Cell<usize>>,
    releases: Rc<Cell<usize>>,
}

impl SourceCounters {
    pub fn allocates(&self) -> usize {
        self.allocates.get()
    }

    pub fn reallocates(&self) -> usize {
        self.reallocates.get()
    }

    pub fn releases(&self) -> usize {
        self.releases.get()
    }
}

/// Delegates to [`SystemSource`] while counting every provider call.
pub struct CountingSource {
    inner: SystemSource,
    counters: SourceCounters,
}

impl CountingSource {
    pub fn new() -> Self {
        Self {
            inner: SystemSource,
            counters: SourceCounters::default(),
        }
    }

    /// A clone of this source's counters, for reading after the source
    /// has been moved into an arena.
    pub fn counters(&self) -> SourceCounters {
        self.counters.clone()
    }
}

impl Default for CountingSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySource for CountingSource {
    fn allocate(&mut self, size: usize) -> Result<Vec<u8>, SourceExhausted> {
        self.counters.allocates.set(self.counters.allocates.get() + 1);
        self.inner.allocate(size)
    }

    fn reallocate(&mut self, buf: &mut Vec<u8>, new_size: usize) -> Result<(), SourceExhausted> {
        self.counters
            .reallocates
            .set(self.counters.reallocates.get() + 1);
        self.inner.reallocate(buf, new_size)
    }

    fn release(&mut self, buf: Vec<u8>) {
        self.counters.releases.set(self.counters.releases.get() + 1);
        drop(buf);
    }
}
