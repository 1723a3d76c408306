//! Tree node for slab-based storage.
//!
//! ## Design
//!
//! `Node` holds one key/value pair together with its color tag and the
//! navigation links of a binary search tree. The links are slab keys
//! (`usize`), not references: the arena in [`OrderedMap`] owns every node,
//! so there is no shared ownership between a parent and its children.
//!
//! ## Slab Integration
//!
//! Per official slab docs (https://docs.rs/slab/0.4.11):
//! - Keys are `usize` values returned by `slab.insert()`
//! - Keys may be reused after `slab.remove()`
//! - O(1) insert, remove, and lookup
//!
//! ## Links
//!
//! - `left` / `right`: child positions, exclusively owned by this node
//! - `parent`: non-owning back-link, used only for upward navigation
//!   during rotation and rebalancing
//!
//! `None` stands for an absent node. Absent nodes read as BLACK; that rule
//! lives in a single accessor on the map, never in per-site null checks.
//!
//! [`OrderedMap`]: crate::rbtree::OrderedMap

/// Node color tag.
///
/// The red-black invariants constrain how colors may be arranged:
/// no RED node has a RED parent, and every root-to-absent path carries
/// the same number of BLACK nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Tree node stored in the slab.
///
/// Contains the payload plus the color tag and navigation links.
/// The links are slab keys (`usize`), not direct references.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    /// The lookup key
    pub key: K,

    /// The stored value
    pub value: V,

    /// Color tag for rebalancing
    pub color: Color,

    /// Parent node (slab key), None if this is the root
    pub parent: Option<usize>,

    /// Left child (slab key), None if absent
    pub left: Option<usize>,

    /// Right child (slab key), None if absent
    pub right: Option<usize>,
}

impl<K, V> Node<K, V> {
    /// Create a new unlinked node with the given parent back-link and color.
    ///
    /// A freshly inserted node never has children: `put` only splices new
    /// nodes in at leaf positions.
    #[inline]
    pub fn new(key: K, value: V, parent: Option<usize>, color: Color) -> Self {
        Self {
            key,
            value,
            color,
            parent,
            left: None,
            right: None,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
