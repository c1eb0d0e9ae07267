//! Benchmark workloads for the carve region arena.
//!
//! Provides deterministic allocation traces for benchmarks:
//!
//! - [`small_objects`]: many short allocations, the common bump case
//! - [`mixed_sizes`]: small requests interleaved with occasional large ones
//!   that force chain growth
//! - [`replay`]: drive an [`Arena`] through a trace

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use carve_arena::{Arena, ByteHandle};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// One step of an allocation trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Allocate this many bytes.
    Alloc(u32),
    /// Grow the most recent allocation to this many bytes.
    GrowLast(u32),
    /// Grow the allocation made this many steps ago to this many bytes.
    GrowOlder {
        /// Distance back from the most recent allocation (0 = most recent).
        back: usize,
        /// New size in bytes.
        new_size: u32,
    },
}

/// `n` allocations of 8–64 bytes.
pub fn small_objects(n: usize, seed: u64) -> Vec<Step> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| Step::Alloc(rng.random_range(8..=64))).collect()
}

/// `n` steps mixing small allocations, buffer-style growth of the latest
/// allocation, copying growth of older ones, and rare large requests.
pub fn mixed_sizes(n: usize, seed: u64) -> Vec<Step> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut last_size = 0u32;
    let mut steps = Vec::with_capacity(n);
    for i in 0..n {
        let roll: u32 = rng.random_range(0..100);
        let step = if i == 0 || roll < 60 {
            last_size = rng.random_range(1..=128);
            Step::Alloc(last_size)
        } else if roll < 85 {
            last_size = last_size.saturating_mul(2).max(1);
            Step::GrowLast(last_size)
        } else if roll < 97 {
            Step::GrowOlder {
                back: rng.random_range(1..=8),
                new_size: rng.random_range(64..=256),
            }
        } else {
            last_size = rng.random_range(4096..=16384);
            Step::Alloc(last_size)
        };
        steps.push(step);
    }
    steps
}

/// Run `steps` against `arena`, returning the live handle of every
/// allocation in issue order.
///
/// Growth of an allocation that does not exist yet (too few allocations
/// made so far) is skipped.
pub fn replay(arena: &mut Arena, steps: &[Step]) -> Vec<ByteHandle> {
    let mut handles: Vec<ByteHandle> = Vec::with_capacity(steps.len());
    for &step in steps {
        match step {
            Step::Alloc(size) => handles.push(arena.alloc(size)),
            Step::GrowLast(new_size) => {
                if let Some(last) = handles.last_mut() {
                    *last = arena
                        .realloc(Some(*last), new_size)
                        .expect("trace handles come from this arena");
                }
            }
            Step::GrowOlder { back, new_size } => {
                if let Some(idx) = handles.len().checked_sub(back + 1) {
                    handles[idx] = arena
                        .realloc(Some(handles[idx]), new_size)
                        .expect("trace handles come from this arena");
                }
            }
        }
    }
    handles
}
