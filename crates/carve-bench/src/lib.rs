//! Benchmark workloads for the carve allocator.
//!
//! Provides deterministic allocation traces so criterion runs are
//! reproducible across machines and invocations: a seeded LCG shapes
//! the request stream instead of a PRNG crate.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// One allocation request in a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request {
    /// Requested size in bytes, `1..=max_size`.
    pub size: usize,
    /// Requested alignment, a power of two in `1..=64`.
    pub align: usize,
}

/// Generate a deterministic mixed-size, mixed-alignment trace.
///
/// The same seed always produces the same trace.
pub fn mixed_trace(seed: u64, len: usize, max_size: usize) -> Vec<Request> {
    let mut state = seed;
    let mut step = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        state
    };

    let mut trace = Vec::with_capacity(len);
    for _ in 0..len {
        let size = 1 + (step() >> 33) as usize % max_size;
        let align = 1usize << ((step() >> 59) as u32 % 7);
        trace.push(Request { size, align });
    }
    trace
}

/// Upper bound on the arena footprint of a trace: every request padded
/// to its worst-case alignment gap. Useful for pre-sizing an arena so a
/// benchmark measures allocation, not growth.
pub fn trace_footprint(trace: &[Request]) -> usize {
    trace.iter().map(|r| r.size + (r.align - 1)).sum()
}
