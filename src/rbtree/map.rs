//! Red-black ordered map over a slab arena.
//!
//! ## Architecture
//!
//! `OrderedMap` is a self-balancing binary search tree:
//!
//! - **Slab-based storage**: every node lives in a `slab::Slab` arena and is
//!   addressed by its `usize` key; `left`/`right`/`parent` links are slab
//!   keys, so the arena is the single owner of all node memory
//! - **Caller-supplied order**: keys are compared with the function handed
//!   to [`OrderedMap::empty`], never with a hardwired `Ord`
//! - **Red-black balancing**: recoloring plus left/right rotations keep the
//!   longest root-to-leaf path within twice the black-height
//!
//! ## Invariants
//!
//! Between any two public calls (never mid-rebalance):
//!
//! 1. Every node is RED or BLACK
//! 2. The root, if present, is BLACK
//! 3. A RED node never has a RED parent
//! 4. Every path from a node down to an absent position carries the same
//!    number of BLACK nodes
//! 5. In-order traversal yields strictly increasing keys, each key once
//!
//! Absent children read as BLACK. That rule lives in the single `color`
//! accessor; nothing else inspects an `Option<usize>` link for color.
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | put | O(log n) |
//! | get / contains_key | O(log n) |
//! | remove | O(log n) |
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
//! map.put(2, "two");
//! map.put(1, "one");
//!
//! assert_eq!(map.get(&1), Some(&"one"));
//! assert_eq!(map.len(), 2);
//! ```
//!
//! ## Concurrency
//!
//! Single-threaded by design: the map is mutably owned by exactly one caller
//! at a time and Rust's `&mut` rules stand in for any internal locking.

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use slab::Slab;

use crate::rbtree::node::{Color, Node};

/// Red-black tree keyed by a caller-supplied total order.
///
/// Holds at most one value per distinct key. The order function must be a
/// consistent total order (antisymmetric, transitive, reflexive on equal
/// keys); feeding an inconsistent comparator produces an unspecified but
/// memory-safe arrangement.
///
/// The third type parameter defaults to a plain function pointer so the
/// common case reads as `OrderedMap<K, V>`.
pub struct OrderedMap<K, V, C = fn(&K, &K) -> Ordering> {
    /// Node arena; links inside nodes are keys into this slab
    nodes: Slab<Node<K, V>>,

    /// Root node (slab key), None for an empty tree
    root: Option<usize>,

    /// Cached entry count, kept in step by put/remove
    len: usize,

    /// The total order over keys, fixed for the map's lifetime
    order: C,
}

impl<K, V, C> OrderedMap<K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    /// Create an empty map with the given key order.
    ///
    /// The order function is required by the signature itself; there is no
    /// way to construct a map without one.
    pub fn empty(order: C) -> Self {
        Self {
            nodes: Slab::new(),
            root: None,
            len: 0,
            order,
        }
    }

    /// Create an empty map with pre-allocated node storage.
    ///
    /// # Example
    ///
    /// ```
    /// use libris::rbtree::OrderedMap;
    ///
    /// let map: OrderedMap<u32, u32> =
    ///     OrderedMap::with_capacity(|a: &u32, b: &u32| a.cmp(b), 1024);
    /// assert!(map.capacity() >= 1024);
    /// ```
    pub fn with_capacity(order: C, capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            root: None,
            len: 0,
            order,
        }
    }

    // ========================================================================
    // Size and capacity
    // ========================================================================

    /// Number of entries in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the map holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// True if the map holds at least one entry.
    #[inline]
    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    /// Pre-allocated node slots in the arena.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Look up the value for `key`.
    ///
    /// Iterative descent from the root: left on smaller, right on larger,
    /// done on equal. O(log n).
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find_node(key).map(|idx| &self.node(idx).value)
    }

    /// Look up the value for `key`, mutably.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.find_node(key)?;
        Some(&mut self.node_mut(idx).value)
    }

    /// True if `key` has an entry.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_node(key).is_some()
    }

    /// Value stored at the tree's root.
    ///
    /// This is a debugging accessor, not a minimum-key query: which entry
    /// sits at the root depends on the rebalancing history. Callers that
    /// only need *some* entry of a non-empty map (for example, any member of
    /// a bucket that is known to be uniform) rely on exactly that.
    ///
    /// # Panics
    ///
    /// Panics if the map is empty. Calling this on an empty map is a
    /// programmer error, not a recoverable condition.
    pub fn first_entry(&self) -> &V {
        let root = self.root.expect("first_entry called on an empty map");
        &self.node(root).value
    }

    /// Internal descent shared by `get`, `get_mut` and `remove`.
    ///
    /// Returns the slab key of the node holding `key`, if any. Node keys
    /// never escape this module.
    fn find_node(&self, key: &K) -> Option<usize> {
        let mut cur = self.root;
        while let Some(idx) = cur {
            cur = match (self.order)(key, &self.node(idx).key) {
                Ordering::Equal => return Some(idx),
                Ordering::Less => self.node(idx).left,
                Ordering::Greater => self.node(idx).right,
            };
        }
        None
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Insert `key` -> `value`, overwriting in place if `key` is present.
    ///
    /// An overwrite changes no structure and leaves `len` untouched. A new
    /// key is spliced in as a RED leaf and the tree is rebalanced from
    /// there. O(log n).
    pub fn put(&mut self, key: K, value: V) {
        let Some(mut cur) = self.root else {
            let idx = self.nodes.insert(Node::new(key, value, None, Color::Black));
            self.root = Some(idx);
            self.len = 1;
            return;
        };

        loop {
            match (self.order)(&key, &self.node(cur).key) {
                Ordering::Equal => {
                    self.node_mut(cur).value = value;
                    return;
                }
                Ordering::Less => match self.node(cur).left {
                    Some(l) => cur = l,
                    None => {
                        let idx = self
                            .nodes
                            .insert(Node::new(key, value, Some(cur), Color::Red));
                        self.node_mut(cur).left = Some(idx);
                        self.len += 1;
                        self.fix_insert(idx);
                        return;
                    }
                },
                Ordering::Greater => match self.node(cur).right {
                    Some(r) => cur = r,
                    None => {
                        let idx = self
                            .nodes
                            .insert(Node::new(key, value, Some(cur), Color::Red));
                        self.node_mut(cur).right = Some(idx);
                        self.len += 1;
                        self.fix_insert(idx);
                        return;
                    }
                },
            }
        }
    }

    /// Restore the red-black invariants after splicing in the RED leaf `z`.
    ///
    /// Iterative restatement of the recursive fixup: each red-uncle round
    /// moves the violation two levels up, everything else terminates with
    /// at most two rotations.
    fn fix_insert(&mut self, mut z: usize) {
        loop {
            let Some(parent) = self.node(z).parent else {
                // reached the root: it must be black
                self.node_mut(z).color = Color::Black;
                return;
            };
            if self.node(parent).color == Color::Black {
                return;
            }

            // a red parent is never the root, so the grandparent exists
            let grand = self.node(parent).parent.expect("red node has a parent");
            let uncle = self.sibling(parent);

            if self.color(uncle) == Color::Red {
                // red uncle: pull a black level down from the grandparent
                // and retry from there
                let u = uncle.expect("red uncle exists");
                self.node_mut(parent).color = Color::Black;
                self.node_mut(u).color = Color::Black;
                self.node_mut(grand).color = Color::Red;
                z = grand;
                continue;
            }

            // black uncle: fold the triangle shape into the line shape
            let parent_is_left = self.is_left_child(parent);
            if parent_is_left && self.is_right_child(z) {
                self.rotate_left(parent);
                z = parent;
            } else if !parent_is_left && self.is_left_child(z) {
                self.rotate_right(parent);
                z = parent;
            }

            // line shape: the parent takes the grandparent's place
            let parent = self.node(z).parent.expect("line case keeps a parent");
            self.node_mut(parent).color = Color::Black;
            self.node_mut(grand).color = Color::Red;
            if parent_is_left {
                self.rotate_right(grand);
            } else {
                self.rotate_left(grand);
            }
            return;
        }
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    /// Remove the entry for `key`. No-op if the key is absent.
    ///
    /// A node with two children trades payloads with its in-order
    /// predecessor (the maximum of its left subtree), which has at most one
    /// child and is the node physically spliced out. A BLACK node takes its
    /// child's color and runs the deletion fixup *before* the splice, while
    /// its parent and sibling are still reachable. O(log n).
    pub fn remove(&mut self, key: &K) {
        let Some(mut n) = self.find_node(key) else {
            return;
        };

        if self.node(n).left.is_some() && self.node(n).right.is_some() {
            // two children: swap payload with the in-order predecessor and
            // delete that node instead
            let mut pred = self.node(n).left.expect("left child checked above");
            while let Some(r) = self.node(pred).right {
                pred = r;
            }
            let (a, b) = self
                .nodes
                .get2_mut(n, pred)
                .expect("node and predecessor are distinct live nodes");
            mem::swap(&mut a.key, &mut b.key);
            mem::swap(&mut a.value, &mut b.value);
            n = pred;
        }

        let child = self.node(n).right.or(self.node(n).left);
        if self.node(n).color == Color::Black {
            self.node_mut(n).color = self.color(child);
            self.fix_delete(n);
        }
        self.replace_node(n, child);
        self.nodes.remove(n);
        self.len -= 1;

        if let Some(root) = self.root {
            if self.node(root).color == Color::Red {
                self.node_mut(root).color = Color::Black;
            }
        }
    }

    /// Restore the red-black invariants around the node `z` being vacated.
    ///
    /// `z` has conceptually lost one black unit of height. Iterative
    /// restatement of the recursive fixup: the both-nephews-black case may
    /// push the deficiency to the parent, every other case terminates.
    fn fix_delete(&mut self, mut z: usize) {
        loop {
            let Some(parent) = self.node(z).parent else {
                // the deficiency reached the root and vanishes
                return;
            };
            let z_is_left = self.node(parent).left == Some(z);

            // case 1: red sibling - rotate it above the parent so the
            // remaining cases see a black sibling
            if self.color(self.sibling(z)) == Color::Red {
                let sib = self.sibling(z).expect("red sibling exists");
                self.node_mut(parent).color = Color::Red;
                self.node_mut(sib).color = Color::Black;
                if z_is_left {
                    self.rotate_left(parent);
                } else {
                    self.rotate_right(parent);
                }
            }

            let sib = self
                .sibling(z)
                .expect("a black-deficient node always has a sibling");
            let (near, far) = if z_is_left {
                (self.node(sib).left, self.node(sib).right)
            } else {
                (self.node(sib).right, self.node(sib).left)
            };

            // case 2: black sibling with two black children - recolor it and
            // push the deficiency up to the parent
            if self.color(near) == Color::Black && self.color(far) == Color::Black {
                self.node_mut(sib).color = Color::Red;
                if self.node(parent).color == Color::Black {
                    z = parent;
                    continue;
                }
                self.node_mut(parent).color = Color::Black;
                return;
            }

            // case 3: near child red, far child black - rotate the sibling
            // so the red child lands on the far side
            let sib = if self.color(near) == Color::Red && self.color(far) == Color::Black {
                let nr = near.expect("near child is red");
                self.node_mut(sib).color = Color::Red;
                self.node_mut(nr).color = Color::Black;
                if z_is_left {
                    self.rotate_right(sib);
                } else {
                    self.rotate_left(sib);
                }
                self.sibling(z).expect("rotation keeps a sibling")
            } else {
                sib
            };

            // case 4: far child red - terminal recolor plus one rotation
            let far = if z_is_left {
                self.node(sib).right
            } else {
                self.node(sib).left
            };
            let parent_color = self.node(parent).color;
            self.node_mut(sib).color = parent_color;
            self.node_mut(parent).color = Color::Black;
            let f = far.expect("far child is red in the terminal case");
            self.node_mut(f).color = Color::Black;
            if z_is_left {
                self.rotate_left(parent);
            } else {
                self.rotate_right(parent);
            }
            return;
        }
    }

    // ========================================================================
    // Rotation primitives
    // ========================================================================

    /// Left rotation around `n`: its right child takes its place, `n`
    /// becomes that child's left child, and the displaced inner subtree is
    /// relinked under `n`. Preserves in-order key sequence.
    fn rotate_left(&mut self, n: usize) {
        let r = self.node(n).right.expect("rotate_left needs a right child");
        self.replace_node(n, Some(r));
        let inner = self.node(r).left;
        self.node_mut(n).right = inner;
        if let Some(i) = inner {
            self.node_mut(i).parent = Some(n);
        }
        self.node_mut(r).left = Some(n);
        self.node_mut(n).parent = Some(r);
    }

    /// Mirror of [`Self::rotate_left`].
    fn rotate_right(&mut self, n: usize) {
        let l = self.node(n).left.expect("rotate_right needs a left child");
        self.replace_node(n, Some(l));
        let inner = self.node(l).right;
        self.node_mut(n).left = inner;
        if let Some(i) = inner {
            self.node_mut(i).parent = Some(n);
        }
        self.node_mut(l).right = Some(n);
        self.node_mut(n).parent = Some(l);
    }

    /// Point `oldn`'s parent slot (or the root) at `newn` and fix `newn`'s
    /// back-link. `oldn` keeps its own links; rotation and splicing rewire
    /// those afterwards as needed.
    fn replace_node(&mut self, oldn: usize, newn: Option<usize>) {
        let parent = self.node(oldn).parent;
        match parent {
            None => self.root = newn,
            Some(p) => {
                if self.node(p).left == Some(oldn) {
                    self.node_mut(p).left = newn;
                } else {
                    self.node_mut(p).right = newn;
                }
            }
        }
        if let Some(nw) = newn {
            self.node_mut(nw).parent = parent;
        }
    }

    // ========================================================================
    // Traversal and introspection
    // ========================================================================

    /// In-order walk: `visit` runs once per value, in ascending key order.
    ///
    /// Traversal never mutates the tree. Recursion depth is bounded by the
    /// tree height, itself at most twice the black-height.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&V),
    {
        self.in_order(self.root, &mut visit);
    }

    fn in_order<F>(&self, n: Option<usize>, visit: &mut F)
    where
        F: FnMut(&V),
    {
        if let Some(idx) = n {
            self.in_order(self.node(idx).left, visit);
            visit(&self.node(idx).value);
            self.in_order(self.node(idx).right, visit);
        }
    }

    /// Longest root-to-leaf path, counted in nodes. Empty tree: 0.
    ///
    /// O(n); a verification aid for the balance bound, not a production
    /// query.
    pub fn max_depth(&self) -> usize {
        self.depth_below(self.root)
    }

    fn depth_below(&self, n: Option<usize>) -> usize {
        match n {
            None => 0,
            Some(idx) => {
                let left = self.depth_below(self.node(idx).left);
                let right = self.depth_below(self.node(idx).right);
                1 + left.max(right)
            }
        }
    }

    // ========================================================================
    // Node access and navigation helpers
    // ========================================================================

    /// Color of a possibly-absent node. Absent nodes are BLACK.
    #[inline]
    fn color(&self, n: Option<usize>) -> Color {
        match n {
            Some(idx) => self.node(idx).color,
            None => Color::Black,
        }
    }

    #[inline]
    fn node(&self, idx: usize) -> &Node<K, V> {
        self.nodes.get(idx).expect("stale node key")
    }

    #[inline]
    fn node_mut(&mut self, idx: usize) -> &mut Node<K, V> {
        self.nodes.get_mut(idx).expect("stale node key")
    }

    fn is_left_child(&self, n: usize) -> bool {
        let p = self.node(n).parent.expect("child position needs a parent");
        self.node(p).left == Some(n)
    }

    fn is_right_child(&self, n: usize) -> bool {
        let p = self.node(n).parent.expect("child position needs a parent");
        self.node(p).right == Some(n)
    }

    /// The other child of `n`'s parent, if any.
    fn sibling(&self, n: usize) -> Option<usize> {
        let p = self.node(n).parent.expect("sibling needs a parent");
        if self.node(p).left == Some(n) {
            self.node(p).right
        } else {
            self.node(p).left
        }
    }
}

impl<K, V, C> fmt::Debug for OrderedMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedMap")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
