//! Fixed-capacity regions and the region chain.
//!
//! A [`Region`] is a contiguous boxed byte slice with bump allocation.
//! A [`RegionChain`] is an ordered list of regions that appends a new,
//! larger region when a request fits nowhere in the existing ones.

use crate::config::ArenaConfig;

/// A single contiguous region with bump allocation.
///
/// The backing storage is allocated to full capacity at creation and never
/// resized. Growth happens only by appending or substituting whole regions
/// in the owning [`RegionChain`].
pub struct Region {
    /// Backing storage, `capacity` bytes, zeroed at creation.
    data: Box<[u8]>,
    /// Bump pointer: next free byte.
    cursor: usize,
    /// Bumped each time the region at this chain position is replaced.
    revision: u32,
}

impl Region {
    /// Create a zeroed region of exactly `capacity` bytes.
    pub fn new(capacity: u32) -> Self {
        Self::with_revision(capacity, 0)
    }

    pub(crate) fn with_revision(capacity: u32, revision: u32) -> Self {
        Self::claimed(capacity, 0, revision)
    }

    /// Create a zeroed region whose first `len` bytes are already claimed.
    ///
    /// The capacity is raised to `len` if smaller, so the claim always fits.
    pub(crate) fn claimed(capacity: u32, len: u32, revision: u32) -> Self {
        Self {
            data: vec![0u8; capacity.max(len) as usize].into_boxed_slice(),
            cursor: len as usize,
            revision,
        }
    }

    /// Bump-allocate `len` bytes from this region only.
    ///
    /// Returns the offset of the claimed span, or `None` if the remaining
    /// capacity is insufficient. The span is zero-filled.
    pub fn alloc(&mut self, len: u32) -> Option<u32> {
        let len = len as usize;
        if len > self.remaining() {
            return None;
        }
        let start = self.cursor;
        self.cursor += len;
        // Zero-init the claimed span.
        self.data[start..self.cursor].fill(0);
        Some(start as u32)
    }

    /// Whether `[offset, offset + len)` ends exactly at the cursor, i.e. it
    /// is the most recent allocation in this region.
    pub fn is_last(&self, offset: u32, len: u32) -> bool {
        offset as usize + len as usize == self.cursor
    }

    /// Whether `[offset, offset + len)` is a single allocation that consumed
    /// the whole region.
    pub fn is_filled_by(&self, offset: u32, len: u32) -> bool {
        offset == 0 && len as usize == self.cursor && self.cursor == self.data.len()
    }

    /// Whether `[offset, offset + len)` lies inside the bumped bytes.
    pub fn contains(&self, offset: u32, len: u32) -> bool {
        offset as usize + len as usize <= self.cursor
    }

    /// Resize the most recent allocation from `old_len` to `new_len` bytes.
    ///
    /// Growth advances the cursor and zero-fills the gained bytes; it returns
    /// `false` (and changes nothing) when the remaining capacity is too
    /// small. Shrinking scrubs the released tail but leaves the cursor where
    /// it is: the cursor never moves backwards within a generation, so no
    /// later allocation can overlap a span handed out earlier.
    pub(crate) fn resize_last(&mut self, old_len: u32, new_len: u32) -> bool {
        let (old_len, new_len) = (old_len as usize, new_len as usize);
        debug_assert!(old_len <= self.cursor);
        if new_len > old_len {
            let delta = new_len - old_len;
            if delta > self.remaining() {
                return false;
            }
            let start = self.cursor;
            self.cursor += delta;
            self.data[start..self.cursor].fill(0);
        } else {
            let start = self.cursor - (old_len - new_len);
            self.data[start..self.cursor].fill(0);
        }
        true
    }

    /// Get a shared slice at the given offset and length.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the region's capacity.
    pub fn slice(&self, offset: u32, len: u32) -> &[u8] {
        let start = offset as usize;
        let end = start + len as usize;
        &self.data[start..end]
    }

    /// Get a mutable slice at the given offset and length.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the region's capacity.
    pub fn slice_mut(&mut self, offset: u32, len: u32) -> &mut [u8] {
        let start = offset as usize;
        let end = start + len as usize;
        &mut self.data[start..end]
    }

    /// Reset the bump pointer to zero and scrub the storage.
    ///
    /// All previous allocations become invalid. The backing memory is kept.
    pub fn reset(&mut self) {
        self.data.fill(0);
        self.cursor = 0;
    }

    /// Number of bytes currently allocated.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Remaining free capacity in bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// How many times the region at this chain position has been replaced.
    pub fn revision(&self) -> u32 {
        self.revision
    }
}

/// An ordered chain of [`Region`]s with overflow-based bump allocation.
///
/// The first region is the head and the last is the tail. Allocation walks
/// from a starting region towards the tail and takes the first region with
/// enough room; if none has room, a new region sized by
/// [`ArenaConfig::grown_capacity`] is appended. Allocations never span
/// regions.
pub struct RegionChain {
    regions: Vec<Region>,
    config: ArenaConfig,
}

impl RegionChain {
    /// Create an empty chain. No region is allocated until first use.
    pub fn new(config: ArenaConfig) -> Self {
        Self {
            regions: Vec::new(),
            config,
        }
    }

    /// Build a region for a request of `requested` bytes, applying the
    /// configured minimum.
    pub fn make_region(&self, requested: u32) -> Region {
        Region::new(self.config.region_capacity(requested))
    }

    /// Append `region` as the new tail and return its index.
    pub fn push(&mut self, region: Region) -> u32 {
        let index = self.regions.len() as u32;
        tracing::debug!(
            region = index,
            capacity = region.capacity(),
            "appended region"
        );
        self.regions.push(region);
        index
    }

    /// Bump-allocate `len` bytes, walking from the head.
    ///
    /// Returns `(region_index, offset)`.
    pub fn alloc(&mut self, len: u32) -> (u32, u32) {
        self.alloc_from(0, len)
    }

    /// Bump-allocate `len` bytes, walking from region `start` towards the
    /// tail and appending a new region when none has room.
    ///
    /// Returns `(region_index, offset)`.
    pub fn alloc_from(&mut self, start: usize, len: u32) -> (u32, u32) {
        for index in start..self.regions.len() {
            if let Some(offset) = self.regions[index].alloc(len) {
                return (index as u32, offset);
            }
        }

        let region = Region::claimed(self.config.grown_capacity(len), len, 0);
        (self.push(region), 0)
    }

    /// Substitute the region at `index` with a fresh region of `capacity`
    /// bytes (subject to the configured minimum) whose first `len` bytes are
    /// claimed, keeping its chain position.
    ///
    /// The new region carries the next revision number. Returns the old
    /// region, so the caller can copy out of it before dropping it, and the
    /// new one.
    pub(crate) fn replace(
        &mut self,
        index: usize,
        capacity: u32,
        len: u32,
    ) -> (Region, &mut Region) {
        let slot = &mut self.regions[index];
        let revision = slot.revision.wrapping_add(1);
        let fresh = Region::claimed(self.config.region_capacity(capacity), len, revision);
        tracing::debug!(
            region = index,
            revision,
            capacity = fresh.capacity(),
            "replaced full region"
        );
        let old = std::mem::replace(slot, fresh);
        (old, slot)
    }

    /// Copy `len` bytes between two spans of the chain.
    ///
    /// The spans may lie in the same region but must not overlap.
    pub(crate) fn copy(&mut self, src: (u32, u32), dst: (u32, u32), len: u32) {
        let (src_region, src_offset) = (src.0 as usize, src.1);
        let (dst_region, dst_offset) = (dst.0 as usize, dst.1);
        if src_region == dst_region {
            let from = src_offset as usize;
            self.regions[src_region].data.copy_within(
                from..from + len as usize,
                dst_offset as usize,
            );
            return;
        }

        let (source, target) = if src_region < dst_region {
            let (lo, hi) = self.regions.split_at_mut(dst_region);
            (&lo[src_region], &mut hi[0])
        } else {
            let (lo, hi) = self.regions.split_at_mut(src_region);
            (&hi[0], &mut lo[dst_region])
        };
        target
            .slice_mut(dst_offset, len)
            .copy_from_slice(source.slice(src_offset, len));
    }

    /// The region at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    /// Mutable access to the region at `index`, if any.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Region> {
        self.regions.get_mut(index)
    }

    /// The first region, if any.
    pub fn head(&self) -> Option<&Region> {
        self.regions.first()
    }

    /// The last region, if any.
    pub fn tail(&self) -> Option<&Region> {
        self.regions.last()
    }

    /// Iterate over the regions from head to tail.
    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    /// Reset every region's bump pointer without deallocating.
    ///
    /// After reset, allocations start from the head again.
    pub fn reset(&mut self) {
        for region in &mut self.regions {
            region.reset();
        }
    }

    /// Drop every region.
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Number of regions in the chain.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the chain holds no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Total capacity across all regions in bytes.
    pub fn total_capacity(&self) -> usize {
        self.regions.iter().map(Region::capacity).sum()
    }

    /// Total bumped bytes across all regions.
    pub fn total_used(&self) -> usize {
        self.regions.iter().map(Region::used).sum()
    }

    /// The configuration this chain sizes regions with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }
}
