//! Arena identities and allocation handles.
//!
//! A [`ByteHandle`] encodes the location of an allocation within an arena's
//! region chain. It is generation-scoped: the `generation` field allows O(1)
//! staleness checks after a reset or free without any lookup table.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ArenaId`] allocation.
static ARENA_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for an [`Arena`](crate::Arena).
///
/// Allocated from a monotonic atomic counter. Two arenas never share an ID
/// within a process, so a handle presented to the wrong arena is always
/// detected, even when the two arenas have identical region layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(u64);

impl ArenaId {
    /// Allocate a fresh, unique arena ID. Thread-safe.
    pub fn next() -> Self {
        Self(ARENA_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Location of a byte allocation within an arena.
///
/// Handles are plain `Copy` values and do not borrow the arena. They resolve
/// to a byte slice through [`Arena::get`](crate::Arena::get) and
/// [`Arena::get_mut`](crate::Arena::get_mut), which reject handles from
/// other arenas, from earlier generations, and into replaced regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct ByteHandle {
    /// Arena that issued this handle.
    pub(crate) arena: ArenaId,
    /// Arena generation when this allocation was made.
    pub(crate) generation: u32,
    /// Index of the region in the chain.
    pub(crate) region: u32,
    /// Revision of the region when this allocation was made.
    pub(crate) revision: u32,
    /// Byte offset within the region.
    pub(crate) offset: u32,
    /// Length of the allocation in bytes.
    pub(crate) len: u32,
}

impl ByteHandle {
    pub(crate) fn new(
        arena: ArenaId,
        generation: u32,
        region: u32,
        revision: u32,
        offset: u32,
        len: u32,
    ) -> Self {
        Self {
            arena,
            generation,
            region,
            revision,
            offset,
            len,
        }
    }

    /// The arena this handle belongs to.
    pub fn arena(&self) -> ArenaId {
        self.arena
    }

    /// The generation this handle belongs to.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Index of the region holding the allocation.
    pub fn region(&self) -> u32 {
        self.region
    }

    /// Byte offset of the allocation within its region.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Length of the allocation in bytes.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether this is a zero-length allocation.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn with_len(self, len: u32) -> Self {
        Self { len, ..self }
    }
}

impl fmt::Display for ByteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ByteHandle(arena={}, gen={}, region={}.{}, off={}, len={})",
            self.arena, self.generation, self.region, self.revision, self.offset, self.len
        )
    }
}
