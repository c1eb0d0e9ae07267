//! Carve: region-based bump arena allocation.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the carve sub-crates. For most users, adding `carve` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use carve::prelude::*;
//!
//! let mut arena = Arena::new();
//!
//! // Bump-allocate and fill a buffer.
//! let greeting = arena.alloc_copy(b"hello").unwrap();
//!
//! // Growing the most recent allocation happens in place.
//! let grown = arena.realloc(Some(greeting), 11).unwrap();
//! assert_eq!(grown.offset(), greeting.offset());
//! arena.get_mut(grown).unwrap()[5..].copy_from_slice(b" world");
//! assert_eq!(arena.get(grown).unwrap(), b"hello world");
//!
//! // Reset recycles every region; old handles are rejected afterwards.
//! arena.reset();
//! assert!(matches!(arena.get(grown), Err(ArenaError::StaleHandle { .. })));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `carve-arena` | `Arena`, regions, handles, config, errors |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Region arena, handles, and configuration (`carve-arena`).
///
/// Most users only need [`arena::Arena`] and [`arena::ByteHandle`] from
/// this module; they are also available in the [`prelude`].
pub use carve_arena as arena;

/// Common imports for typical carve usage.
///
/// ```rust
/// use carve::prelude::*;
/// ```
pub mod prelude {
    pub use carve_arena::{Arena, ArenaConfig, ArenaError, ByteHandle};
}
