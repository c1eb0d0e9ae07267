//! Region-based bump arena with generation-checked byte handles.
//!
//! Hands out zero-initialised byte allocations from a chain of
//! fixed-capacity regions. Memory is reclaimed only in bulk: `reset()`
//! recycles every region for a new generation, `free()` releases them all.
//!
//! # Architecture
//!
//! ```text
//! Arena (caller-facing API, generation counter, ArenaId)
//! └── RegionChain (ordered, head → tail, owned exclusively by the arena)
//!     └── Region[] (boxed [u8] of fixed capacity + bump cursor + revision)
//! ```
//!
//! # Handles
//!
//! Allocations are returned as [`ByteHandle`]s: region index, offset and
//! length plus the arena identity, generation and region revision they were
//! issued under. Handles never dangle; resolving one that is foreign, stale
//! or points into a replaced region returns an [`ArenaError`] instead.
//!
//! # Reallocation
//!
//! [`Arena::realloc`] extends the most recent allocation of a region in
//! place when capacity permits, replaces a region wholesale when a single
//! allocation fills it, and otherwise falls back to allocate-and-copy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod handle;
pub mod region;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use handle::{ArenaId, ByteHandle};
pub use region::{Region, RegionChain};
