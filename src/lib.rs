//! # Libris
//!
//! Library lending tracker built on a slab-backed red-black ordered map.
//!
//! ## Architecture
//!
//! The crate splits into two layers:
//!
//! - **RbTree**: [`OrderedMap`], a red-black tree over a `slab::Slab` node
//!   arena, keyed by a caller-supplied total order
//! - **Library**: the lending tracker and its command language, composing
//!   three independent map instances (subscribers by id, holders by book,
//!   borrow-count buckets)
//!
//! ## Design Principles
//!
//! 1. **Arena ownership**: nodes link to each other by slab key, never by
//!    reference; the arena is the single owner of all node memory
//! 2. **Sealed internals**: node identity, colors and links never cross the
//!    map's module boundary
//! 3. **Synchronous execution**: single-threaded throughout; `&mut`
//!    exclusivity stands in for locking
//! 4. **Errors as values**: lending and parse failures are `thiserror`
//!    enums, and their display text is the user-facing response
//!
//! ## Balance Guarantee
//!
//! The map keeps every root-to-leaf path within twice the black-height, so
//! `put`, `get` and `remove` stay O(log n) across arbitrary interleavings
//! of insertion and deletion.

// ============================================================================
// Module declarations
// ============================================================================

/// Ordered map: red-black tree over a slab arena
pub mod rbtree;

/// Lending tracker: subscribers, lending state, command language
pub mod library;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use library::{Command, Library, LibraryError, ParseError, Subscriber};
pub use rbtree::OrderedMap;
