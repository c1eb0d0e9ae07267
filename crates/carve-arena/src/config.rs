//! Arena configuration parameters.

use crate::error::ArenaError;

/// Configuration for the region arena.
///
/// Controls how large new regions are. Validated at construction; all
/// values are immutable after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Smallest capacity (in bytes) any region is created with.
    ///
    /// Default: 512. Keeps tiny requests from producing a long chain of
    /// tiny regions. Must be at least 1.
    pub min_region_size: u32,

    /// Factor applied to a request that overflows the tail region.
    ///
    /// Default: 2. The appended region gets `requested * growth_multiplier`
    /// bytes (saturating at `u32::MAX`) so later requests of a similar size
    /// land in the same region. Must be at least 1.
    pub growth_multiplier: u32,
}

impl ArenaConfig {
    /// Default minimum region size in bytes.
    pub const DEFAULT_MIN_REGION_SIZE: u32 = 512;

    /// Default growth multiplier for overflow regions.
    pub const DEFAULT_GROWTH_MULTIPLIER: u32 = 2;

    /// Create a config with the default values.
    pub const fn new() -> Self {
        Self {
            min_region_size: Self::DEFAULT_MIN_REGION_SIZE,
            growth_multiplier: Self::DEFAULT_GROWTH_MULTIPLIER,
        }
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.min_region_size == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "min_region_size must be >= 1 (got 0)".into(),
            });
        }
        if self.growth_multiplier == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "growth_multiplier must be >= 1 (got 0)".into(),
            });
        }
        Ok(())
    }

    /// Capacity of a region created for a request of `requested` bytes.
    pub fn region_capacity(&self, requested: u32) -> u32 {
        requested.max(self.min_region_size)
    }

    /// Capacity of the region appended when `requested` bytes overflow the
    /// tail (or when a full region is replaced).
    pub fn grown_capacity(&self, requested: u32) -> u32 {
        self.region_capacity(requested.saturating_mul(self.growth_multiplier))
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new()
    }
}
