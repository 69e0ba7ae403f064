//! Iterators for the `Tree` data structure
//!
//! All iterators borrow the tree and walk it through the parent links, so none
//! of them allocate except [`PreOrder`], which keeps a stack of pending right
//! subtrees.
use crate::node::Link;
use crate::Tree;
use std::borrow::Borrow;
use std::iter::FusedIterator;

/// In-order iterator over the entries of the tree.
///
/// Created by [`Tree::iter`]. Yields entries in ascending key order and can be
/// consumed from both ends.
pub struct Iter<'t, K, V> {
	tree: &'t Tree<K, V>,
	front: Link,
	back: Link,
	remaining: usize,
}

impl<'t, K, V> Iter<'t, K, V> {
	pub(crate) fn new(tree: &'t Tree<K, V>) -> Iter<'t, K, V> {
		Iter {
			tree,
			front: tree.first_index(),
			back: tree.last_index(),
			remaining: tree.len(),
		}
	}

	#[inline]
	fn entry(&self, index: u32) -> (&'t K, &'t V) {
		let node = &self.tree.nodes[index];
		(&node.key, &node.value)
	}
}

impl<'t, K, V> Iterator for Iter<'t, K, V> {
	type Item = (&'t K, &'t V);

	fn next(&mut self) -> Option<Self::Item> {
		if self.remaining == 0 {
			return None;
		}
		let index = self.front?;
		self.remaining -= 1;
		self.front = self.tree.successor_index(index);
		Some(self.entry(index))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
	fn next_back(&mut self) -> Option<Self::Item> {
		if self.remaining == 0 {
			return None;
		}
		let index = self.back?;
		self.remaining -= 1;
		self.back = self.tree.predecessor_index(index);
		Some(self.entry(index))
	}
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
	fn clone(&self) -> Self {
		Iter {
			tree: self.tree,
			front: self.front,
			back: self.back,
			remaining: self.remaining,
		}
	}
}

/// In-order iterator over the keys of the tree. Created by [`Tree::keys`].
pub struct Keys<'t, K, V> {
	inner: Iter<'t, K, V>,
}

impl<'t, K, V> Keys<'t, K, V> {
	pub(crate) fn new(tree: &'t Tree<K, V>) -> Keys<'t, K, V> {
		Keys {
			inner: Iter::new(tree),
		}
	}
}

impl<'t, K, V> Iterator for Keys<'t, K, V> {
	type Item = &'t K;

	fn next(&mut self) -> Option<&'t K> {
		self.inner.next().map(|(k, _)| k)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
	fn next_back(&mut self) -> Option<Self::Item> {
		self.inner.next_back().map(|(k, _)| k)
	}
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// In-order iterator over the values of the tree. Created by [`Tree::values`].
pub struct Values<'t, K, V> {
	inner: Iter<'t, K, V>,
}

impl<'t, K, V> Values<'t, K, V> {
	pub(crate) fn new(tree: &'t Tree<K, V>) -> Values<'t, K, V> {
		Values {
			inner: Iter::new(tree),
		}
	}
}

impl<'t, K, V> Iterator for Values<'t, K, V> {
	type Item = &'t V;

	fn next(&mut self) -> Option<&'t V> {
		self.inner.next().map(|(_, v)| v)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
	fn next_back(&mut self) -> Option<Self::Item> {
		self.inner.next_back().map(|(_, v)| v)
	}
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// Pre-order iterator: each node, then its left subtree, then its right
/// subtree. Created by [`Tree::pre_order`].
pub struct PreOrder<'t, K, V> {
	tree: &'t Tree<K, V>,
	stack: Vec<u32>,
}

impl<'t, K, V> PreOrder<'t, K, V> {
	pub(crate) fn new(tree: &'t Tree<K, V>) -> PreOrder<'t, K, V> {
		PreOrder {
			tree,
			stack: tree.root.into_iter().collect(),
		}
	}
}

impl<'t, K, V> Iterator for PreOrder<'t, K, V> {
	type Item = (&'t K, &'t V);

	fn next(&mut self) -> Option<Self::Item> {
		let index = self.stack.pop()?;
		let node = &self.tree.nodes[index];
		self.stack.extend(node.right);
		self.stack.extend(node.left);
		Some((&node.key, &node.value))
	}
}

impl<K, V> FusedIterator for PreOrder<'_, K, V> {}

/// Raw seekable cursor over the entries of the tree.
///
/// The cursor sits in a gap between two adjacent entries (or before the first
/// / after the last). [`next`](Self::next) yields the entry after the gap and
/// moves past it; [`prev`](Self::prev) yields the entry before the gap and
/// moves before it. A freshly created cursor is unpositioned and yields
/// nothing until one of the `seek*` methods is called.
///
/// ```text
///   seek(&25):      10   20 │ 30   40      next() -> 30
///   seek_for_prev:  10   20 │ 30   40      prev() -> 20
/// ```
pub struct RawIter<'t, K, V> {
	tree: &'t Tree<K, V>,
	/// Entry `prev` would yield.
	before: Link,
	/// Entry `next` would yield.
	after: Link,
}

impl<'t, K, V> RawIter<'t, K, V> {
	pub(crate) fn new(tree: &'t Tree<K, V>) -> RawIter<'t, K, V> {
		RawIter {
			tree,
			before: None,
			after: None,
		}
	}

	/// Positions the cursor just before the first entry.
	pub fn seek_to_first(&mut self) {
		self.before = None;
		self.after = self.tree.first_index();
	}

	/// Positions the cursor just after the last entry.
	pub fn seek_to_last(&mut self) {
		self.before = self.tree.last_index();
		self.after = None;
	}

	/// Moves past and returns the entry after the cursor.
	#[allow(clippy::should_implement_trait)]
	pub fn next(&mut self) -> Option<(&'t K, &'t V)> {
		let index = self.after?;
		self.before = Some(index);
		self.after = self.tree.successor_index(index);
		let node = &self.tree.nodes[index];
		Some((&node.key, &node.value))
	}

	/// Moves before and returns the entry before the cursor.
	pub fn prev(&mut self) -> Option<(&'t K, &'t V)> {
		let index = self.before?;
		self.after = Some(index);
		self.before = self.tree.predecessor_index(index);
		let node = &self.tree.nodes[index];
		Some((&node.key, &node.value))
	}
}

impl<'t, K: Ord, V> RawIter<'t, K, V> {
	/// Positions the cursor so that `next` yields the first entry with a key
	/// `>= key`.
	pub fn seek<Q>(&mut self, key: &Q)
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		self.after = self.tree.lower_bound(key);
		self.before = match self.after {
			Some(index) => self.tree.predecessor_index(index),
			None => self.tree.last_index(),
		};
	}

	/// Positions the cursor so that `prev` yields the last entry with a key
	/// `<= key`.
	pub fn seek_for_prev<Q>(&mut self, key: &Q)
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		self.before = self.tree.floor(key);
		self.after = match self.before {
			Some(index) => self.tree.successor_index(index),
			None => self.tree.first_index(),
		};
	}

	/// Like [`seek`](Self::seek), but returns whether an entry with exactly
	/// `key` is next.
	pub fn seek_exact<Q>(&mut self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		self.seek(key);
		match self.after {
			Some(index) => Borrow::<Q>::borrow(&self.tree.nodes[index].key) == key,
			None => false,
		}
	}
}
