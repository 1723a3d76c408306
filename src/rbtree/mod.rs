//! Ordered-map module: a red-black tree over a slab arena.
//!
//! ## Architecture
//!
//! The map is a classic red-black tree with one ownership twist:
//!
//! - **Slab-based storage**: all nodes live in one `slab::Slab` arena and
//!   link to each other by `usize` key, sidestepping shared ownership
//!   between parents and children entirely
//! - **Caller-supplied order**: the comparator is fixed at construction and
//!   retained for the map's lifetime
//! - **Private node type**: node keys, colors and links never cross the
//!   module boundary; collaborators see key-based operations only
//!
//! ## Components
//!
//! - `Node` (private): key/value payload, color tag, and slab-key links
//! - [`OrderedMap`]: the map itself - insertion, lookup, deletion,
//!   rebalancing, and in-order traversal
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | put / get / remove | O(log n) |
//! | len / is_empty | O(1) |
//! | for_each | O(n) |
//! | max_depth | O(n) |
//!
//! ## Example
//!
//! ```
//! use libris::rbtree::OrderedMap;
//!
//! let mut map: OrderedMap<u32, &str> = OrderedMap::empty(|a: &u32, b: &u32| a.cmp(b));
//!
//! map.put(7, "seven");
//! map.put(3, "three");
//! map.remove(&7);
//!
//! assert_eq!(map.get(&3), Some(&"three"));
//! assert!(!map.contains_key(&7));
//! ```

pub mod map;
pub(crate) mod node;

pub use map::OrderedMap;
