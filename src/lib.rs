//! # avltree: An Ordered In-Memory AVL Tree
//!
//! This crate provides an ordered key-value map backed by an AVL tree: a binary
//! search tree that keeps itself height-balanced through **per-node balance
//! factors** and **local rotations**, guaranteeing logarithmic insertion,
//! lookup and removal.
//!
//! ## Design Overview
//!
//! **Balance Factors**: Every node stores `height(right) - height(left)`. The
//! AVL invariant keeps this in `{-1, 0, 1}`. Balance factors are maintained
//! incrementally while walking back up from the modified position; subtree
//! heights are never rescanned.
//!
//! **Fixup Propagation**: After an insertion or removal, balance changes are
//! pushed up the parent chain until a node absorbs the height change, or a
//! rotation restores the imbalanced subtree.
//!
//! - Insertion stops after at most one (single or double) rotation.
//! - Removal may rotate at several levels, one per ancestor whose subtree
//!   height shrinks.
//!
//! **Node Arena**: Nodes live in a slot arena owned by the tree. Child links own
//! their subtree structurally; parent links are non-owning back references used
//! by the fixup walks and by predecessor / successor lookups. Public
//! [`NodeId`] handles stay attached to their entry across rotations and swaps.
//!
//! ### Rotations
//!
//! ```text
//!         n                         l
//!        / \     rotate_right      / \
//!       l   c   ─────────────►    a   n
//!      / \      ◄─────────────       / \
//!     a   b      rotate_left        b   c
//! ```
//!
//! A double rotation (zig-zag) is a rotation at the child followed by the
//! opposite rotation at the imbalanced node.
//!
//! ## Basic Usage
//!
//! ```
//! use avltree::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Insert key-value pairs
//! tree.insert("key1", "value1");
//! tree.insert("key2", "value2");
//!
//! // Lookup values
//! assert_eq!(tree.get("key1"), Some(&"value1"));
//!
//! // Remove entries
//! assert_eq!(tree.remove("key1"), Some("value1"));
//! assert_eq!(tree.remove("key1"), None);
//! ```
//!
//! ## Thread Safety
//!
//! The tree has no interior mutability. It is `Send` and `Sync` whenever its
//! keys and values are, and follows the usual borrowing rules: wrap it in a
//! lock if it must be mutated from several threads.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::mem;

use tracing::trace;

mod bst;
pub mod error;
pub mod iter;
mod node;
#[cfg(feature = "serde")]
mod serialize;
#[cfg(test)]
mod util;

use error::{Error, Result};
use node::{Arena, Link, Node, Side};

pub use node::NodeId;

// ---------------------------------------------------------------------------
// Core Tree Structure
// ---------------------------------------------------------------------------

/// An ordered map backed by an AVL tree.
///
/// # Type Parameters
///
/// - `K`: The key type. Must implement `Ord` for every operation that searches
///   by key.
/// - `V`: The value type.
///
/// # Internal Structure
///
/// The tree consists of:
/// - A **root link** pointing at the root node, or `None` when empty.
/// - A **node arena** owning every node. Vacated slots are reused by later
///   insertions.
///
/// Dropping the tree drops every key and value it still holds.
#[derive(Clone)]
pub struct Tree<K, V> {
	/// The root node, if any. The root never has a parent.
	root: Link,

	/// Storage for all nodes reachable from `root`.
	nodes: Arena<K, V>,
}

impl<K, V> Default for Tree<K, V> {
	fn default() -> Self {
		Self::new()
	}
}

// ---------------------------------------------------------------------------
// Tree Implementation: Metadata and Node Handles
// ---------------------------------------------------------------------------

impl<K, V> Tree<K, V> {
	// -----------------------------------------------------------------------
	// Construction
	// -----------------------------------------------------------------------

	/// Creates a new, empty tree. Does not allocate.
	///
	/// # Example
	///
	/// ```
	/// use avltree::Tree;
	///
	/// let tree: Tree<String, i32> = Tree::new();
	/// assert!(tree.is_empty());
	/// assert_eq!(tree.height(), 0);
	/// ```
	pub fn new() -> Self {
		Tree {
			root: None,
			nodes: Arena::new(),
		}
	}

	/// Creates an empty tree with room for `capacity` entries before the node
	/// storage needs to grow.
	pub fn with_capacity(capacity: usize) -> Self {
		Tree {
			root: None,
			nodes: Arena::with_capacity(capacity),
		}
	}

	// -----------------------------------------------------------------------
	// Tree Metadata
	// -----------------------------------------------------------------------

	/// Returns the number of entries in the tree.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Returns `true` if the tree contains no entries.
	pub fn is_empty(&self) -> bool {
		self.root.is_none()
	}

	/// Returns the height of the tree: 0 when empty, 1 for a single node.
	///
	/// Runs in O(log n) by following the taller child at every level, as
	/// recorded by the balance factors.
	///
	/// # Example
	///
	/// ```
	/// use avltree::Tree;
	///
	/// let tree: Tree<i32, ()> = (0..7).map(|k| (k, ())).collect();
	/// assert_eq!(tree.height(), 3);
	/// ```
	pub fn height(&self) -> usize {
		let mut height = 0;
		let mut curr = self.root;
		while let Some(index) = curr {
			height += 1;
			let node = &self.nodes[index];
			curr = if node.balance > 0 {
				node.right
			} else {
				node.left
			};
		}
		height
	}

	/// Removes all entries from the tree.
	///
	/// Every outstanding [`NodeId`] becomes invalid.
	pub fn clear(&mut self) {
		self.root = None;
		self.nodes.clear();
	}

	// -----------------------------------------------------------------------
	// Node Handles
	// -----------------------------------------------------------------------

	fn resolve(&self, id: NodeId) -> Result<u32> {
		self.nodes.resolve(id).ok_or(Error::InvalidNode(id))
	}

	fn handle(&self, link: Link) -> Option<NodeId> {
		link.map(|index| self.nodes.id(index))
	}

	/// Returns a handle to the root node, or `None` if the tree is empty.
	pub fn root(&self) -> Option<NodeId> {
		self.handle(self.root)
	}

	/// Returns the key stored in a node.
	pub fn key(&self, id: NodeId) -> Result<&K> {
		let index = self.resolve(id)?;
		Ok(&self.nodes[index].key)
	}

	/// Returns the value stored in a node.
	pub fn value(&self, id: NodeId) -> Result<&V> {
		let index = self.resolve(id)?;
		Ok(&self.nodes[index].value)
	}

	/// Returns a mutable reference to the value stored in a node.
	pub fn value_mut(&mut self, id: NodeId) -> Result<&mut V> {
		let index = self.resolve(id)?;
		Ok(&mut self.nodes[index].value)
	}

	/// Returns a node's balance factor: `height(right) - height(left)`.
	pub fn balance(&self, id: NodeId) -> Result<i8> {
		let index = self.resolve(id)?;
		Ok(self.nodes[index].balance)
	}

	/// Returns a node's parent, or `None` for the root.
	pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
		let index = self.resolve(id)?;
		Ok(self.handle(self.nodes[index].parent))
	}

	/// Returns a node's left child.
	pub fn left(&self, id: NodeId) -> Result<Option<NodeId>> {
		let index = self.resolve(id)?;
		Ok(self.handle(self.nodes[index].left))
	}

	/// Returns a node's right child.
	pub fn right(&self, id: NodeId) -> Result<Option<NodeId>> {
		let index = self.resolve(id)?;
		Ok(self.handle(self.nodes[index].right))
	}

	/// Returns the node holding the next smaller key.
	///
	/// # Example
	///
	/// ```
	/// use avltree::Tree;
	///
	/// let tree: Tree<i32, ()> = [(1, ()), (2, ()), (3, ())].into_iter().collect();
	/// let two = tree.find(&2).unwrap();
	/// let one = tree.predecessor(two).unwrap().unwrap();
	/// assert_eq!(tree.key(one), Ok(&1));
	/// assert_eq!(tree.predecessor(one), Ok(None));
	/// ```
	pub fn predecessor(&self, id: NodeId) -> Result<Option<NodeId>> {
		let index = self.resolve(id)?;
		Ok(self.handle(self.predecessor_index(index)))
	}

	/// Returns the node holding the next larger key.
	pub fn successor(&self, id: NodeId) -> Result<Option<NodeId>> {
		let index = self.resolve(id)?;
		Ok(self.handle(self.successor_index(index)))
	}

	// -----------------------------------------------------------------------
	// Ordered Access
	// -----------------------------------------------------------------------

	/// Returns the entry with the smallest key.
	pub fn first_key_value(&self) -> Option<(&K, &V)> {
		self.first_index().map(|index| {
			let node = &self.nodes[index];
			(&node.key, &node.value)
		})
	}

	/// Returns the entry with the largest key.
	pub fn last_key_value(&self) -> Option<(&K, &V)> {
		self.last_index().map(|index| {
			let node = &self.nodes[index];
			(&node.key, &node.value)
		})
	}

	/// Removes and returns the entry with the smallest key.
	pub fn pop_first(&mut self) -> Option<(K, V)> {
		let index = self.first_index()?;
		let node = self.remove_index(index);
		Some((node.key, node.value))
	}

	/// Removes and returns the entry with the largest key.
	pub fn pop_last(&mut self) -> Option<(K, V)> {
		let index = self.last_index()?;
		let node = self.remove_index(index);
		Some((node.key, node.value))
	}

	// -----------------------------------------------------------------------
	// Iteration
	// -----------------------------------------------------------------------

	/// Returns an iterator over the entries in ascending key order.
	///
	/// # Example
	///
	/// ```
	/// use avltree::Tree;
	///
	/// let mut tree = Tree::new();
	/// tree.insert(3, "c");
	/// tree.insert(1, "a");
	/// tree.insert(2, "b");
	///
	/// let keys: Vec<_> = tree.iter().map(|(k, _)| *k).collect();
	/// assert_eq!(keys, vec![1, 2, 3]);
	/// ```
	pub fn iter(&self) -> iter::Iter<'_, K, V> {
		iter::Iter::new(self)
	}

	/// Returns an iterator over the keys in ascending order.
	pub fn keys(&self) -> iter::Keys<'_, K, V> {
		iter::Keys::new(self)
	}

	/// Returns an iterator over the values in ascending key order.
	pub fn values(&self) -> iter::Values<'_, K, V> {
		iter::Values::new(self)
	}

	/// Returns an iterator visiting every node before its children (node, left
	/// subtree, right subtree).
	///
	/// # Example
	///
	/// ```
	/// use avltree::Tree;
	///
	/// let tree: Tree<i32, ()> = [(10, ()), (20, ()), (30, ())].into_iter().collect();
	/// let keys: Vec<_> = tree.pre_order().map(|(k, _)| *k).collect();
	/// assert_eq!(keys, vec![20, 10, 30]);
	/// ```
	pub fn pre_order(&self) -> iter::PreOrder<'_, K, V> {
		iter::PreOrder::new(self)
	}

	/// Returns an unpositioned cursor over the tree.
	///
	/// The cursor must be positioned with one of the `seek*` methods before
	/// `next` / `prev` yield anything.
	///
	/// # Example
	///
	/// ```
	/// use avltree::Tree;
	///
	/// let tree: Tree<i32, i32> = (0..10).map(|k| (k * 10, k)).collect();
	///
	/// let mut iter = tree.raw_iter();
	/// iter.seek(&25);
	/// assert_eq!(iter.next(), Some((&30, &3)));
	/// assert_eq!(iter.prev(), Some((&30, &3)));
	/// assert_eq!(iter.prev(), Some((&20, &2)));
	/// ```
	pub fn raw_iter(&self) -> iter::RawIter<'_, K, V> {
		iter::RawIter::new(self)
	}
}

// ---------------------------------------------------------------------------
// Tree Implementation: Keyed Operations
// ---------------------------------------------------------------------------

impl<K: Ord, V> Tree<K, V> {
	// -----------------------------------------------------------------------
	// Public API: Read Operations
	// -----------------------------------------------------------------------

	/// Returns a reference to the value corresponding to the key.
	///
	/// # Example
	///
	/// ```
	/// use avltree::Tree;
	///
	/// let mut tree: Tree<String, i32> = Tree::new();
	/// tree.insert("one".to_string(), 1);
	///
	/// assert_eq!(tree.get("one"), Some(&1));
	/// assert_eq!(tree.get("two"), None);
	/// ```
	pub fn get<Q>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		self.find_index(key).map(|index| &self.nodes[index].value)
	}

	/// Returns the stored key and value corresponding to the key.
	pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		self.find_index(key).map(|index| {
			let node = &self.nodes[index];
			(&node.key, &node.value)
		})
	}

	/// Returns a mutable reference to the value corresponding to the key.
	pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		self.find_index(key).map(|index| &mut self.nodes[index].value)
	}

	/// Returns `true` if the tree contains the specified key.
	pub fn contains_key<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		self.find_index(key).is_some()
	}

	/// Returns a handle to the node holding the key.
	pub fn find<Q>(&self, key: &Q) -> Option<NodeId>
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		self.handle(self.find_index(key))
	}

	// -----------------------------------------------------------------------
	// Public API: Write Operations
	// -----------------------------------------------------------------------

	/// Inserts a key-value pair into the tree.
	///
	/// If the key already exists, its value is overwritten in place and the old
	/// value is returned; the tree structure does not change. Otherwise a new
	/// leaf is attached and the tree is rebalanced.
	///
	/// # Algorithm
	///
	/// 1. Descend from the root by three-way key comparison
	/// 2. Attach the new leaf (balance 0) below the last node visited
	/// 3. Adjust the parent's balance by -1 (left) or +1 (right)
	/// 4. If the parent is not level afterwards, its subtree grew: run
	///    [`insert_fix`](Self::insert_fix) from there
	///
	/// # Example
	///
	/// ```
	/// use avltree::Tree;
	///
	/// let mut tree: Tree<i32, &str> = Tree::new();
	///
	/// assert_eq!(tree.insert(1, "one"), None);        // New key
	/// assert_eq!(tree.insert(1, "uno"), Some("one")); // Update existing
	/// ```
	pub fn insert(&mut self, key: K, value: V) -> Option<V> {
		let Some(mut curr) = self.root else {
			let index = self.nodes.alloc(Node::new(key, value, None));
			self.root = Some(index);
			return None;
		};

		loop {
			let node = &mut self.nodes[curr];
			let side = match key.cmp(&node.key) {
				Ordering::Less => Side::Left,
				Ordering::Greater => Side::Right,
				Ordering::Equal => return Some(mem::replace(&mut node.value, value)),
			};

			match node.child(side) {
				Some(next) => curr = next,
				None => {
					let leaf = self.nodes.alloc(Node::new(key, value, Some(curr)));
					let parent = &mut self.nodes[curr];
					parent.set_child(side, Some(leaf));
					parent.update_balance(side.sign());

					// A level parent means the new leaf filled its shorter side.
					if parent.balance != 0 {
						self.insert_fix(curr, leaf);
					}
					return None;
				}
			}
		}
	}

	/// Removes a key from the tree, returning the value if it existed.
	///
	/// Removing a missing key is a no-op.
	///
	/// # Example
	///
	/// ```
	/// use avltree::Tree;
	///
	/// let mut tree: Tree<i32, &str> = Tree::new();
	/// tree.insert(1, "one");
	///
	/// assert_eq!(tree.remove(&1), Some("one"));
	/// assert_eq!(tree.remove(&1), None); // Already removed
	/// ```
	pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		self.remove_entry(key).map(|(_, v)| v)
	}

	/// Removes a key from the tree, returning the stored key and value.
	///
	/// # Algorithm
	///
	/// 1. Find the node holding the key
	/// 2. If it has two children, swap its position with its in-order
	///    predecessor, which has at most one child
	/// 3. Splice the node out, letting its only child (if any) take its place
	/// 4. Rebalance from the former parent via [`remove_fix`](Self::remove_fix)
	pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		let index = self.find_index(key)?;
		let node = self.remove_index(index);
		Some((node.key, node.value))
	}
}

// ---------------------------------------------------------------------------
// Balancing Engine
// ---------------------------------------------------------------------------

impl<K, V> Tree<K, V> {
	// -----------------------------------------------------------------------
	// Rotation Primitives
	// -----------------------------------------------------------------------

	/// Promotes `n`'s left child into `n`'s position.
	///
	/// `n` becomes the promoted node's right child and inherits its former right
	/// subtree as its new left child. Balance factors are left to the caller.
	pub(crate) fn rotate_right(&mut self, n: u32) {
		let Some(pivot) = self.nodes[n].left else {
			unreachable!("rotate_right on node {} without a left child", n);
		};
		trace!(node = n, pivot, "rotate right");

		let inner = self.nodes[pivot].right;
		self.replace_in_parent(n, Some(pivot));
		self.nodes[pivot].right = Some(n);
		self.nodes[n].parent = Some(pivot);
		self.nodes[n].left = inner;
		if let Some(inner) = inner {
			self.nodes[inner].parent = Some(n);
		}
	}

	/// Promotes `n`'s right child into `n`'s position. Mirror of
	/// [`rotate_right`](Self::rotate_right).
	pub(crate) fn rotate_left(&mut self, n: u32) {
		let Some(pivot) = self.nodes[n].right else {
			unreachable!("rotate_left on node {} without a right child", n);
		};
		trace!(node = n, pivot, "rotate left");

		let inner = self.nodes[pivot].left;
		self.replace_in_parent(n, Some(pivot));
		self.nodes[pivot].left = Some(n);
		self.nodes[n].parent = Some(pivot);
		self.nodes[n].right = inner;
		if let Some(inner) = inner {
			self.nodes[inner].parent = Some(n);
		}
	}

	/// Promotes `n`'s child on side `heavy` into `n`'s position.
	#[inline]
	fn promote(&mut self, n: u32, heavy: Side) {
		match heavy {
			Side::Left => self.rotate_right(n),
			Side::Right => self.rotate_left(n),
		}
	}

	// -----------------------------------------------------------------------
	// Insertion Fixup
	// -----------------------------------------------------------------------

	/// Propagates a subtree height increase upward after an insertion.
	///
	/// `p` is a node whose subtree just grew by one level and `n` is the child
	/// of `p` the growth came from. At every step the parent `g` of `p` takes
	/// the growth on `p`'s side:
	///
	/// - balance 0: `g`'s height is unchanged, stop
	/// - balance ±1: `g` grew too, continue with `g`
	/// - balance ±2: rotate, which restores `g`'s original height, stop
	///
	/// # Rotation Cases
	///
	/// With `s` the sign of the heavy side:
	///
	/// | shape                      | rotation         | p  | g  | n |
	/// |----------------------------|------------------|----|----|---|
	/// | `n` on same side as `p`    | single at `g`    | 0  | 0  | - |
	/// | zig-zag, `n.balance == s`  | double via `n`   | 0  | -s | 0 |
	/// | zig-zag, `n.balance == 0`  | double via `n`   | 0  | 0  | 0 |
	/// | zig-zag, `n.balance == -s` | double via `n`   | s  | 0  | 0 |
	pub(crate) fn insert_fix(&mut self, mut p: u32, mut n: u32) {
		while let Some(g) = self.nodes[p].parent {
			let side = self.side_of(g, p);
			self.nodes[g].update_balance(side.sign());

			match self.nodes[g].balance {
				0 => return,
				-1 | 1 => {
					n = p;
					p = g;
				}
				_ => {
					if self.side_of(p, n) == side {
						self.promote(g, side);
						self.nodes[p].balance = 0;
						self.nodes[g].balance = 0;
					} else {
						let s = side.sign();
						let nb = self.nodes[n].balance;
						self.promote(p, side.opposite());
						self.promote(g, side);

						let (pb, gb) = if nb == s {
							(0, -s)
						} else if nb == -s {
							(s, 0)
						} else {
							(0, 0)
						};
						self.nodes[p].balance = pb;
						self.nodes[g].balance = gb;
						self.nodes[n].balance = 0;
					}
					return;
				}
			}
		}
	}

	// -----------------------------------------------------------------------
	// Removal
	// -----------------------------------------------------------------------

	/// Unlinks a node, rebalances, and frees its slot.
	pub(crate) fn remove_index(&mut self, index: u32) -> Node<K, V> {
		if self.nodes[index].has_two_children() {
			let Some(pred) = self.predecessor_index(index) else {
				unreachable!("node {} with a left child has no predecessor", index);
			};
			trace!(node = index, pred, "swap with predecessor");

			// The swap moves nodes, but each position keeps its balance.
			self.swap_nodes(index, pred);
			let balance = self.nodes[index].balance;
			self.nodes[index].balance = self.nodes[pred].balance;
			self.nodes[pred].balance = balance;
		}

		let (parent, child) = {
			let node = &self.nodes[index];
			(node.parent, node.left.or(node.right))
		};
		// Losing height on the left tips the parent right, and vice versa.
		let diff = parent.map(|p| -self.side_of(p, index).sign());
		trace!(node = index, ?parent, ?child, "splice");

		self.replace_in_parent(index, child);
		if let (Some(p), Some(diff)) = (parent, diff) {
			self.remove_fix(p, diff);
		}

		self.nodes.free(index)
	}

	/// Propagates a subtree height decrease upward after a removal.
	///
	/// One of `n`'s subtrees just lost a level; `diff` is +1 if it was the left
	/// one and -1 if it was the right one. With `b = n.balance + diff`:
	///
	/// - `b == ±1`: `n` was level before, its height is unchanged, stop
	/// - `b == 0`: `n` lost a level, continue with its parent
	/// - `b == ±2`: rotate toward the heavy child `c` (see below)
	///
	/// # Rotation Cases
	///
	/// With `s` the sign of the heavy side:
	///
	/// | heavy child           | rotation        | n  | c  | g | continue |
	/// |-----------------------|-----------------|----|----|---|----------|
	/// | `c.balance == 0`      | single at `n`   | s  | -s | - | no       |
	/// | `c.balance == s`      | single at `n`   | 0  | 0  | - | yes      |
	/// | `g.balance == -s`     | double via `g`  | 0  | s  | 0 | yes      |
	/// | `g.balance == 0`      | double via `g`  | 0  | 0  | 0 | yes      |
	/// | `g.balance == s`      | double via `g`  | -s | 0  | 0 | yes      |
	///
	/// where `g` is `c`'s child on the side away from `s` (the zig-zag case,
	/// `c.balance == -s`).
	pub(crate) fn remove_fix(&mut self, mut n: u32, mut diff: i8) {
		loop {
			// Taken before any rotation moves `n` down a level.
			let parent = self.nodes[n].parent;
			let next_diff = parent.map(|p| -self.side_of(p, n).sign());
			let balance = self.nodes[n].balance + diff;

			match balance {
				-1 | 1 => {
					self.nodes[n].balance = balance;
					return;
				}
				0 => {
					self.nodes[n].balance = 0;
				}
				_ => {
					let heavy = if balance < 0 {
						Side::Left
					} else {
						Side::Right
					};
					let s = heavy.sign();
					let Some(c) = self.nodes[n].child(heavy) else {
						unreachable!("node {} is doubly heavy without a child on that side", n);
					};
					let cb = self.nodes[c].balance;

					if cb == 0 {
						self.promote(n, heavy);
						self.nodes[n].balance = s;
						self.nodes[c].balance = -s;
						return;
					} else if cb == s {
						self.promote(n, heavy);
						self.nodes[n].balance = 0;
						self.nodes[c].balance = 0;
					} else {
						let Some(g) = self.nodes[c].child(heavy.opposite()) else {
							unreachable!("node {} leans inward without an inner child", c);
						};
						let gb = self.nodes[g].balance;
						self.promote(c, heavy.opposite());
						self.promote(n, heavy);

						let (nb, cb) = if gb == -s {
							(0, s)
						} else if gb == s {
							(-s, 0)
						} else {
							(0, 0)
						};
						self.nodes[n].balance = nb;
						self.nodes[c].balance = cb;
						self.nodes[g].balance = 0;
					}
				}
			}

			match (parent, next_diff) {
				(Some(p), Some(d)) => {
					n = p;
					diff = d;
				}
				_ => return,
			}
		}
	}
}

// ---------------------------------------------------------------------------
// Trait Implementations
// ---------------------------------------------------------------------------

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Tree<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

/// Trees compare equal when they hold the same entries, whatever their shape.
impl<K: PartialEq, V: PartialEq> PartialEq for Tree<K, V> {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().eq(other.iter())
	}
}

impl<K: Eq, V: Eq> Eq for Tree<K, V> {}

impl<K: Ord, V> FromIterator<(K, V)> for Tree<K, V> {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut tree = Tree::new();
		tree.extend(iter);
		tree
	}
}

impl<K: Ord, V> Extend<(K, V)> for Tree<K, V> {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (key, value) in iter {
			self.insert(key, value);
		}
	}
}

impl<'t, K, V> IntoIterator for &'t Tree<K, V> {
	type Item = (&'t K, &'t V);
	type IntoIter = iter::Iter<'t, K, V>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

// ===========================================================================
// Test-Only Validation Module
// ===========================================================================

/// Invariant validation for testing.
#[cfg(any(test, feature = "test-utils"))]
impl<K: Ord + fmt::Debug, V> Tree<K, V> {
	/// Validates all tree invariants. Panics with diagnostic info if any
	/// invariant is violated.
	///
	/// # Invariants Checked
	///
	/// 1. Root link: the root has no parent
	/// 2. Parent links: every child points back at the node holding it
	/// 3. Key ordering: left subtree < node < right subtree
	/// 4. Balance accuracy: stored balance equals height(right) - height(left)
	/// 5. AVL bound: every balance is in {-1, 0, 1}
	/// 6. Length consistency: reachable nodes match `len()`
	pub fn assert_invariants(&self) {
		let Some(root) = self.root else {
			assert_eq!(self.len(), 0, "Empty tree reports {} entries", self.len());
			return;
		};

		// Invariant 1: Root link
		assert_eq!(self.nodes[root].parent, None, "Root {:?} has a parent", self.nodes[root].key);

		let mut count = 0;
		let height = self.validate_node_recursive(root, None, None, &mut count);

		// Invariant 6: Length consistency
		assert_eq!(count, self.len(), "Reached {} nodes but len() is {}", count, self.len());
		assert_eq!(height, self.height(), "Computed height {} != height() {}", height, self.height());
	}

	/// Recursively validates a subtree and returns its height.
	///
	/// # Arguments
	/// * `index` - Root of the subtree
	/// * `lower` - Exclusive lower key bound from ancestors, None if leftmost
	/// * `upper` - Exclusive upper key bound from ancestors, None if rightmost
	/// * `count` - Running count of visited nodes
	fn validate_node_recursive(
		&self,
		index: u32,
		lower: Option<&K>,
		upper: Option<&K>,
		count: &mut usize,
	) -> usize {
		let node = &self.nodes[index];
		*count += 1;

		// Invariant 3: Key ordering
		if let Some(lower) = lower {
			assert!(node.key > *lower, "Key {:?} not greater than lower bound {:?}", node.key, lower);
		}
		if let Some(upper) = upper {
			assert!(node.key < *upper, "Key {:?} not less than upper bound {:?}", node.key, upper);
		}

		let left = self.validate_child(index, node.left, lower, Some(&node.key), count);
		let right = self.validate_child(index, node.right, Some(&node.key), upper, count);
		let actual = right as isize - left as isize;

		// Invariant 4: Balance accuracy
		assert_eq!(
			node.balance as isize, actual,
			"Key {:?} stores balance {} but subtree heights give {}",
			node.key, node.balance, actual
		);

		// Invariant 5: AVL bound
		assert!(actual.abs() <= 1, "Key {:?} is out of balance: {}", node.key, actual);

		1 + left.max(right)
	}

	fn validate_child(
		&self,
		parent: u32,
		child: Link,
		lower: Option<&K>,
		upper: Option<&K>,
		count: &mut usize,
	) -> usize {
		let Some(child) = child else {
			return 0;
		};

		// Invariant 2: Parent links
		assert_eq!(
			self.nodes[child].parent,
			Some(parent),
			"Child {:?} of {:?} does not point back at it",
			self.nodes[child].key,
			self.nodes[parent].key
		);
		self.validate_node_recursive(child, lower, upper, count)
	}
}
