//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use crate::handle::ArenaId;

/// Errors that can occur during arena operations.
///
/// Out-of-memory is not represented here: region creation goes through the
/// global allocator, which aborts the process on exhaustion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The handle was issued by a different arena.
    ForeignHandle {
        /// Arena that issued the handle.
        handle_arena: ArenaId,
        /// Arena the handle was presented to.
        arena: ArenaId,
    },
    /// The handle was issued before the latest `reset()` or `free()`.
    StaleHandle {
        /// The generation encoded in the handle.
        handle_generation: u32,
        /// The arena's current generation.
        current_generation: u32,
    },
    /// The region the handle points into has since been replaced by a
    /// larger one.
    RegionReplaced {
        /// Index of the region in the chain.
        region: u32,
        /// Region revision encoded in the handle.
        handle_revision: u32,
        /// Current revision of the region at that index.
        current_revision: u32,
    },
    /// The handle's span is not inside the used part of its region.
    OutOfBounds {
        /// Index of the region in the chain.
        region: u32,
        /// Offset of the span within the region.
        offset: u32,
        /// Length of the span.
        len: u32,
        /// Bytes currently bumped in the region.
        used: u32,
    },
    /// A request does not fit in a 32-bit allocation size.
    TooLarge {
        /// Number of bytes requested.
        requested: usize,
    },
    /// Arena configuration failed validation.
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignHandle {
                handle_arena,
                arena,
            } => {
                write!(
                    f,
                    "foreign handle: issued by arena {handle_arena}, presented to arena {arena}"
                )
            }
            Self::StaleHandle {
                handle_generation,
                current_generation,
            } => {
                write!(
                    f,
                    "stale handle: generation {handle_generation}, current {current_generation}"
                )
            }
            Self::RegionReplaced {
                region,
                handle_revision,
                current_revision,
            } => {
                write!(
                    f,
                    "region {region} was replaced: handle revision {handle_revision}, current {current_revision}"
                )
            }
            Self::OutOfBounds {
                region,
                offset,
                len,
                used,
            } => {
                write!(
                    f,
                    "span {offset}..{} is outside the {used} used bytes of region {region}",
                    *offset as u64 + *len as u64
                )
            }
            Self::TooLarge { requested } => {
                write!(f, "request of {requested} bytes exceeds the 32-bit size limit")
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid arena config: {reason}")
            }
        }
    }
}

impl Error for ArenaError {}
