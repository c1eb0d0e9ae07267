//! The caller-facing region arena.
//!
//! [`Arena`] owns a [`RegionChain`] and hands out [`ByteHandle`]s into it.
//! The lifecycle is:
//! 1. `alloc()` / `realloc()` — bump-allocate, appending regions on demand
//! 2. `get()` / `get_mut()` — resolve a handle to its bytes
//! 3. `reset()` — recycle all capacity for a new generation
//! 4. `free()` — release every region; the arena is empty and reusable

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::handle::{ArenaId, ByteHandle};
use crate::region::{Region, RegionChain};

/// Region-based bump arena.
///
/// Allocations are reclaimed only in bulk, by [`Arena::reset`] or
/// [`Arena::free`]. Each of those advances the arena generation, which
/// turns every outstanding [`ByteHandle`] stale.
///
/// # Chain layout
///
/// ```text
/// chain: [ region 0 (head) ] → [ region 1 ] → … → [ region n (tail) ]
///             ▲ allocation walks from the head to the first region with room;
///               a new tail is appended when none has room
/// ```
///
/// The arena is not internally synchronised. Every mutating operation takes
/// `&mut self`.
pub struct Arena {
    /// Identity checked against every presented handle.
    id: ArenaId,
    /// Region storage, head to tail.
    chain: RegionChain,
    /// Current generation (advanced by `reset()` and `free()`).
    generation: u32,
}

impl Arena {
    /// Create an empty arena with the default configuration.
    ///
    /// No memory is allocated until the first `alloc()`.
    pub fn new() -> Self {
        Self {
            id: ArenaId::next(),
            chain: RegionChain::new(ArenaConfig::new()),
            generation: 0,
        }
    }

    /// Create an empty arena with a custom configuration.
    ///
    /// Returns `Err(ArenaError::InvalidConfig)` if `config` fails
    /// validation.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        Ok(Self {
            id: ArenaId::next(),
            chain: RegionChain::new(config),
            generation: 0,
        })
    }

    /// Allocate `size` zeroed bytes.
    ///
    /// The first allocation creates the head region, sized to `size` or the
    /// configured minimum, whichever is larger. Later requests walk the
    /// chain from the head and append a new tail when no region has room.
    ///
    /// Never fails: exhausting system memory while creating a region aborts
    /// the process.
    pub fn alloc(&mut self, size: u32) -> ByteHandle {
        if self.chain.is_empty() {
            let head = self.chain.make_region(size);
            self.chain.push(head);
        }
        let (region, offset) = self.chain.alloc(size);
        self.handle(region, offset, size)
    }

    /// Allocate a copy of `bytes`.
    ///
    /// Returns `Err(ArenaError::TooLarge)` if `bytes` is longer than
    /// `u32::MAX`.
    pub fn alloc_copy(&mut self, bytes: &[u8]) -> Result<ByteHandle, ArenaError> {
        let len = u32::try_from(bytes.len()).map_err(|_| ArenaError::TooLarge {
            requested: bytes.len(),
        })?;
        let handle = self.alloc(len);
        self.region_mut(handle)
            .slice_mut(handle.offset, handle.len)
            .copy_from_slice(bytes);
        Ok(handle)
    }

    /// Grow or shrink an allocation to `new_size` bytes.
    ///
    /// With `None`, this is exactly `alloc(new_size)`. Otherwise the old
    /// size is `handle.len()` and the first `min(old, new)` bytes are
    /// preserved. In order of preference:
    ///
    /// - **In place**: the allocation is the most recent one in its region
    ///   and the region can absorb the difference. The returned handle has
    ///   the same offset. Growth advances the cursor. Shrinking scrubs the
    ///   released tail to zero but leaves the cursor alone, so the tail stays
    ///   dead space and later allocations never overlap the old span.
    /// - **Region replacement**: the allocation alone fills its entire
    ///   region. That region is swapped for a larger one at the same chain
    ///   position and the old one is dropped; handles into the old region
    ///   report [`ArenaError::RegionReplaced`] afterwards. This includes
    ///   zero-length handles issued at the end of the full region.
    /// - **Fresh allocation**: `alloc(new_size)` plus a copy. The old span
    ///   stays allocated as dead space until reset/free.
    ///
    /// Returns an error without side effects if the handle is foreign,
    /// stale, points into a replaced region, or is out of bounds.
    pub fn realloc(
        &mut self,
        handle: Option<ByteHandle>,
        new_size: u32,
    ) -> Result<ByteHandle, ArenaError> {
        let Some(handle) = handle else {
            return Ok(self.alloc(new_size));
        };
        self.validate(handle)?;

        let old_size = handle.len;
        let region = self.region_mut(handle);
        if region.is_last(handle.offset, old_size) && region.resize_last(old_size, new_size) {
            tracing::trace!(%handle, new_size, "resized in place");
            return Ok(handle.with_len(new_size));
        }

        if new_size > old_size && region.is_filled_by(handle.offset, old_size) {
            return Ok(self.replace_region(handle, new_size));
        }

        let fresh = self.alloc(new_size);
        let kept = old_size.min(new_size);
        tracing::trace!(from = %handle, to = %fresh, kept, "reallocated with copy");
        self.chain
            .copy((handle.region, handle.offset), (fresh.region, fresh.offset), kept);
        Ok(fresh)
    }

    /// Swap a region consumed entirely by `handle` for a larger one holding
    /// the same bytes followed by zeroes.
    fn replace_region(&mut self, handle: ByteHandle, new_size: u32) -> ByteHandle {
        let index = handle.region as usize;
        let capacity = self.chain.config().grown_capacity(new_size);
        let (old, region) = self.chain.replace(index, capacity, new_size);
        region
            .slice_mut(0, handle.len)
            .copy_from_slice(old.slice(handle.offset, handle.len));

        ByteHandle::new(
            self.id,
            self.generation,
            handle.region,
            region.revision(),
            0,
            new_size,
        )
    }

    /// Read the bytes of an allocation.
    pub fn get(&self, handle: ByteHandle) -> Result<&[u8], ArenaError> {
        self.validate(handle)?;
        Ok(self.region(handle).slice(handle.offset, handle.len))
    }

    /// Mutably access the bytes of an allocation.
    pub fn get_mut(&mut self, handle: ByteHandle) -> Result<&mut [u8], ArenaError> {
        self.validate(handle)?;
        Ok(self.region_mut(handle).slice_mut(handle.offset, handle.len))
    }

    /// Recycle all capacity for a new generation.
    ///
    /// Every region's cursor returns to zero and its storage is scrubbed.
    /// No region is freed. All outstanding handles become stale.
    pub fn reset(&mut self) {
        self.chain.reset();
        self.advance_generation();
        tracing::debug!(
            generation = self.generation,
            regions = self.chain.len(),
            capacity = self.chain.total_capacity(),
            "arena reset"
        );
    }

    /// Release every region.
    ///
    /// The arena returns to its empty state and may be used again; the next
    /// `alloc()` creates a new head region. All outstanding handles become
    /// stale.
    pub fn free(&mut self) {
        let released = self.chain.total_capacity();
        self.chain.clear();
        self.advance_generation();
        tracing::debug!(generation = self.generation, released, "arena freed");
    }

    /// This arena's identity.
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// Current generation number.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The configuration regions are sized with.
    pub fn config(&self) -> &ArenaConfig {
        self.chain.config()
    }

    /// Whether the arena holds no regions.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Number of regions in the chain.
    pub fn region_count(&self) -> usize {
        self.chain.len()
    }

    /// Iterate over the regions from head to tail.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.chain.iter()
    }

    /// The tail region, if any.
    pub fn tail(&self) -> Option<&Region> {
        self.chain.tail()
    }

    /// Total capacity across all regions in bytes.
    pub fn capacity(&self) -> usize {
        self.chain.total_capacity()
    }

    /// Total bytes bumped across all regions, including dead space left by
    /// reallocation.
    pub fn used(&self) -> usize {
        self.chain.total_used()
    }

    /// Memory held by region storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.chain.total_capacity()
    }

    fn handle(&self, region: u32, offset: u32, len: u32) -> ByteHandle {
        let revision = self.chain.get(region as usize).map_or(0, Region::revision);
        ByteHandle::new(self.id, self.generation, region, revision, offset, len)
    }

    /// Check that `handle` resolves to live bytes in this arena.
    fn validate(&self, handle: ByteHandle) -> Result<(), ArenaError> {
        if handle.arena != self.id {
            return Err(ArenaError::ForeignHandle {
                handle_arena: handle.arena,
                arena: self.id,
            });
        }
        if handle.generation != self.generation {
            return Err(ArenaError::StaleHandle {
                handle_generation: handle.generation,
                current_generation: self.generation,
            });
        }
        let out_of_bounds = |used: usize| ArenaError::OutOfBounds {
            region: handle.region,
            offset: handle.offset,
            len: handle.len,
            used: used as u32,
        };
        let region = self
            .chain
            .get(handle.region as usize)
            .ok_or_else(|| out_of_bounds(0))?;
        if region.revision() != handle.revision {
            return Err(ArenaError::RegionReplaced {
                region: handle.region,
                handle_revision: handle.revision,
                current_revision: region.revision(),
            });
        }
        if !region.contains(handle.offset, handle.len) {
            return Err(out_of_bounds(region.used()));
        }
        Ok(())
    }

    /// The region a validated handle points into.
    fn region(&self, handle: ByteHandle) -> &Region {
        self.chain
            .get(handle.region as usize)
            .expect("handle validated against this chain")
    }

    fn region_mut(&mut self, handle: ByteHandle) -> &mut Region {
        self.chain
            .get_mut(handle.region as usize)
            .expect("handle validated against this chain")
    }

    fn advance_generation(&mut self) {
        // Wraps after u32::MAX resets; a handle that old aliases generation 0.
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_arena() -> Arena {
        Arena::with_config(ArenaConfig {
            min_region_size: 64,
            growth_multiplier: 2,
        })
        .unwrap()
    }

    #[test]
    fn new_arena_is_empty() {
        let arena = Arena::new();
        assert!(arena.is_empty());
        assert_eq!(arena.region_count(), 0);
        assert_eq!(arena.generation(), 0);
        assert!(arena.tail().is_none());
    }

    #[test]
    fn with_config_rejects_invalid() {
        let result = Arena::with_config(ArenaConfig {
            min_region_size: 0,
            growth_multiplier: 2,
        });
        assert!(matches!(result, Err(ArenaError::InvalidConfig { .. })));
    }

    #[test]
    fn first_alloc_creates_head_region() {
        let mut arena = Arena::new();
        let h = arena.alloc(10);
        assert_eq!(arena.region_count(), 1);
        assert_eq!(arena.tail().unwrap().capacity(), 512);
        assert_eq!(h.region(), 0);
        assert_eq!(h.offset(), 0);
        assert_eq!(h.len(), 10);
    }

    #[test]
    fn alloc_returns_zeroed_bytes() {
        let mut arena = Arena::new();
        let h = arena.alloc(100);
        assert!(arena.get(h).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn sequential_allocs_dont_overlap() {
        let mut arena = Arena::new();
        let a = arena.alloc(5);
        arena.get_mut(a).unwrap().copy_from_slice(b"hello");
        let b = arena.alloc(3);
        arena.get_mut(b).unwrap().copy_from_slice(b"abc");
        assert_eq!(b.offset(), 5);
        assert_eq!(arena.get(a).unwrap(), b"hello");
        assert_eq!(arena.get(b).unwrap(), b"abc");
        assert_eq!(arena.used(), 8);
    }

    #[test]
    fn zero_size_alloc_is_valid() {
        let mut arena = Arena::new();
        let h = arena.alloc(0);
        assert!(h.is_empty());
        assert!(arena.get(h).unwrap().is_empty());
        assert_eq!(arena.region_count(), 1);
    }

    #[test]
    fn alloc_copy_round_trip() {
        let mut arena = Arena::new();
        let h = arena.alloc_copy(b"region").unwrap();
        assert_eq!(arena.get(h).unwrap(), b"region");
    }

    #[test]
    fn realloc_none_allocates() {
        let mut arena = Arena::new();
        let h = arena.realloc(None, 24).unwrap();
        assert_eq!(h.len(), 24);
        assert_eq!(arena.used(), 24);
    }

    #[test]
    fn realloc_latest_grows_in_place() {
        let mut arena = Arena::new();
        let p = arena.alloc(10);
        arena.get_mut(p).unwrap().copy_from_slice(b"0123456789");
        let p2 = arena.realloc(Some(p), 20).unwrap();
        assert_eq!(p2.region(), p.region());
        assert_eq!(p2.offset(), p.offset());
        let bytes = arena.get(p2).unwrap();
        assert_eq!(&bytes[..10], b"0123456789");
        assert!(bytes[10..].iter().all(|&b| b == 0));
        assert_eq!(arena.used(), 20);
    }

    #[test]
    fn realloc_latest_shrinks_in_place() {
        let mut arena = Arena::new();
        let p = arena.alloc_copy(b"abcdef").unwrap();
        let p2 = arena.realloc(Some(p), 2).unwrap();
        assert_eq!(p2.offset(), p.offset());
        assert_eq!(arena.get(p2).unwrap(), b"ab");
        // The released tail stays bumped as dead space.
        assert_eq!(arena.used(), 6);
        assert_eq!(arena.get(p).unwrap(), b"ab\0\0\0\0");
    }

    #[test]
    fn shrunk_allocation_never_overlaps_later_ones() {
        let mut arena = Arena::new();
        let a = arena.alloc_copy(b"abcdefghij").unwrap();
        let a2 = arena.realloc(Some(a), 4).unwrap();
        let b = arena.alloc_copy(b"XXXXXX").unwrap();
        assert!(b.offset() >= a.offset() + a.len());
        assert_eq!(arena.get(b).unwrap(), b"XXXXXX");

        // The old, longer handle sees the kept prefix and a scrubbed tail.
        assert_eq!(arena.get(a).unwrap(), b"abcd\0\0\0\0\0\0");
        assert_eq!(arena.get(a2).unwrap(), b"abcd");

        // Writing through either handle leaves `b` untouched.
        arena.get_mut(a).unwrap().fill(0x11);
        let grown = arena.realloc(Some(a2), 20).unwrap();
        arena.get_mut(grown).unwrap().fill(0x22);
        assert_eq!(arena.get(b).unwrap(), b"XXXXXX");
    }

    #[test]
    fn shrink_then_regrow_exposes_zeroed_tail() {
        let mut arena = Arena::new();
        let p = arena.alloc_copy(b"abcdefgh").unwrap();
        let p = arena.realloc(Some(p), 3).unwrap();
        let p = arena.realloc(Some(p), 12).unwrap();
        let bytes = arena.get(p).unwrap();
        assert_eq!(&bytes[..3], b"abc");
        assert!(bytes[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn empty_handle_at_end_of_full_region_is_replaced_with_it() {
        let mut arena = small_arena();
        let p = arena.alloc(64);
        let empty = arena.alloc(0);
        assert_eq!((empty.region(), empty.offset()), (0, 64));
        let _ = arena.realloc(Some(p), 100).unwrap();
        assert!(matches!(
            arena.get(empty),
            Err(ArenaError::RegionReplaced { .. })
        ));
    }

    #[test]
    fn realloc_older_allocation_copies() {
        let mut arena = Arena::new();
        let a = arena.alloc_copy(b"first").unwrap();
        let b = arena.alloc_copy(b"second").unwrap();
        let a2 = arena.realloc(Some(a), 8).unwrap();
        assert_ne!(a2.offset(), a.offset());
        assert_eq!(&arena.get(a2).unwrap()[..5], b"first");
        assert_eq!(&arena.get(a2).unwrap()[5..], &[0, 0, 0]);
        assert_eq!(arena.get(a).unwrap(), b"first");
        assert_eq!(arena.get(b).unwrap(), b"second");
    }

    #[test]
    fn realloc_older_allocation_shrink_copies_prefix() {
        let mut arena = Arena::new();
        let a = arena.alloc_copy(b"abcdef").unwrap();
        let _b = arena.alloc(4);
        let a2 = arena.realloc(Some(a), 3).unwrap();
        assert_ne!(a2.offset(), a.offset());
        assert_eq!(arena.get(a2).unwrap(), b"abc");
    }

    #[test]
    fn realloc_without_headroom_moves_to_new_region() {
        let mut arena = small_arena();
        let p = arena.alloc(60);
        arena.get_mut(p).unwrap().fill(9);
        let p2 = arena.realloc(Some(p), 100).unwrap();
        assert_eq!(arena.region_count(), 2);
        assert_eq!(p2.region(), 1);
        assert!(arena.get(p2).unwrap()[..60].iter().all(|&b| b == 9));
    }

    #[test]
    fn realloc_full_region_replaces_it() {
        let mut arena = small_arena();
        let p = arena.alloc(64);
        arena.get_mut(p).unwrap().fill(3);
        let p2 = arena.realloc(Some(p), 100).unwrap();

        assert_eq!(arena.region_count(), 1);
        assert_eq!(p2.region(), 0);
        assert_eq!(p2.offset(), 0);
        assert_eq!(arena.tail().unwrap().capacity(), 200);
        assert_eq!(arena.tail().unwrap().revision(), 1);
        let bytes = arena.get(p2).unwrap();
        assert!(bytes[..64].iter().all(|&b| b == 3));
        assert!(bytes[64..].iter().all(|&b| b == 0));

        assert!(matches!(
            arena.get(p),
            Err(ArenaError::RegionReplaced {
                region: 0,
                handle_revision: 0,
                current_revision: 1,
            })
        ));
    }

    #[test]
    fn replacing_non_tail_region_keeps_tail() {
        let mut arena = small_arena();
        let p = arena.alloc(64);
        let q = arena.alloc(10); // appends region 1
        assert_eq!(q.region(), 1);
        let tail_capacity = arena.tail().unwrap().capacity();

        let p2 = arena.realloc(Some(p), 80).unwrap();
        assert_eq!(p2.region(), 0);
        assert_eq!(arena.region_count(), 2);
        assert_eq!(arena.tail().unwrap().capacity(), tail_capacity);
        assert!(arena.get(q).is_ok());
    }

    #[test]
    fn foreign_handle_rejected() {
        let mut a = Arena::new();
        let mut b = Arena::new();
        let h = a.alloc(8);
        let _ = b.alloc(8);
        assert!(matches!(
            b.realloc(Some(h), 16),
            Err(ArenaError::ForeignHandle { .. })
        ));
        assert!(matches!(b.get(h), Err(ArenaError::ForeignHandle { .. })));
        // Nothing was allocated in `b` by the failed call.
        assert_eq!(b.used(), 8);
    }

    #[test]
    fn stale_handle_rejected_after_reset() {
        let mut arena = Arena::new();
        let h = arena.alloc(8);
        arena.reset();
        assert_eq!(
            arena.get(h),
            Err(ArenaError::StaleHandle {
                handle_generation: 0,
                current_generation: 1,
            })
        );
        assert!(matches!(
            arena.realloc(Some(h), 16),
            Err(ArenaError::StaleHandle { .. })
        ));
    }

    #[test]
    fn reset_keeps_regions_and_zeroes() {
        let mut arena = small_arena();
        let h = arena.alloc(50);
        arena.get_mut(h).unwrap().fill(0xFF);
        let _ = arena.alloc(100);
        let capacity = arena.capacity();
        let regions = arena.region_count();

        arena.reset();
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.capacity(), capacity);
        assert_eq!(arena.region_count(), regions);

        let again = arena.alloc(50);
        assert_eq!((again.region(), again.offset()), (0, 0));
        assert!(arena.get(again).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn free_empties_arena() {
        let mut arena = Arena::new();
        let h = arena.alloc(1000);
        arena.free();
        assert!(arena.is_empty());
        assert_eq!(arena.capacity(), 0);
        assert!(matches!(arena.get(h), Err(ArenaError::StaleHandle { .. })));

        let fresh = arena.alloc(10);
        assert_eq!(arena.region_count(), 1);
        assert_eq!(arena.tail().unwrap().capacity(), 512);
        assert_eq!((fresh.region(), fresh.offset()), (0, 0));
    }

    #[test]
    fn free_on_empty_arena_is_noop() {
        let mut arena = Arena::new();
        arena.free();
        assert!(arena.is_empty());
        assert_eq!(arena.generation(), 1);
    }
}
