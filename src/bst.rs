//! Plain binary-search-tree operations over the node arena.
//!
//! Nothing in here looks at balance factors: lookups, neighbour walks and the
//! topology-only node swap are shared by the balancing engine in `lib.rs`, the
//! iterators and the public node-handle accessors.

use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::node::{Link, Side};
use crate::Tree;

impl<K, V> Tree<K, V> {
	// -----------------------------------------------------------------------
	// Structure Queries
	// -----------------------------------------------------------------------

	/// Which child of `parent` the node `child` is.
	#[inline]
	pub(crate) fn side_of(&self, parent: u32, child: u32) -> Side {
		if self.nodes[parent].left == Some(child) {
			Side::Left
		} else {
			debug_assert_eq!(self.nodes[parent].right, Some(child), "broken parent link");
			Side::Right
		}
	}

	/// Leftmost node of the subtree rooted at `index`.
	pub(crate) fn leftmost(&self, mut index: u32) -> u32 {
		while let Some(left) = self.nodes[index].left {
			index = left;
		}
		index
	}

	/// Rightmost node of the subtree rooted at `index`.
	pub(crate) fn rightmost(&self, mut index: u32) -> u32 {
		while let Some(right) = self.nodes[index].right {
			index = right;
		}
		index
	}

	pub(crate) fn first_index(&self) -> Link {
		self.root.map(|root| self.leftmost(root))
	}

	pub(crate) fn last_index(&self) -> Link {
		self.root.map(|root| self.rightmost(root))
	}

	/// In-order predecessor: the node with the largest key smaller than `index`'s.
	pub(crate) fn predecessor_index(&self, index: u32) -> Link {
		if let Some(left) = self.nodes[index].left {
			return Some(self.rightmost(left));
		}
		let mut curr = index;
		let mut parent = self.nodes[curr].parent;
		while let Some(p) = parent {
			if self.nodes[p].right == Some(curr) {
				return Some(p);
			}
			curr = p;
			parent = self.nodes[p].parent;
		}
		None
	}

	/// In-order successor: the node with the smallest key larger than `index`'s.
	pub(crate) fn successor_index(&self, index: u32) -> Link {
		if let Some(right) = self.nodes[index].right {
			return Some(self.leftmost(right));
		}
		let mut curr = index;
		let mut parent = self.nodes[curr].parent;
		while let Some(p) = parent {
			if self.nodes[p].left == Some(curr) {
				return Some(p);
			}
			curr = p;
			parent = self.nodes[p].parent;
		}
		None
	}

	// -----------------------------------------------------------------------
	// Relinking
	// -----------------------------------------------------------------------

	/// Puts `new` where `old` currently hangs: in `old`'s parent, or at the root.
	///
	/// `new`'s parent link is updated; `old`'s links are left untouched.
	pub(crate) fn replace_in_parent(&mut self, old: u32, new: Link) {
		let parent = self.nodes[old].parent;
		match parent {
			Some(p) => {
				let side = self.side_of(p, old);
				self.nodes[p].set_child(side, new);
			}
			None => self.root = new,
		}
		if let Some(n) = new {
			self.nodes[n].parent = parent;
		}
	}

	/// Exchanges the positions of two nodes in the tree.
	///
	/// Only the parent / child links (and the root reference) change. Each node
	/// keeps its key, value and balance, so a [`NodeId`](crate::NodeId) pointing at
	/// either node still sees the same entry afterwards. Adjacent nodes (one the
	/// direct child of the other) and siblings are handled.
	pub(crate) fn swap_nodes(&mut self, x: u32, y: u32) {
		if x == y {
			return;
		}

		let (xp, xl, xr) = {
			let n = &self.nodes[x];
			(n.parent, n.left, n.right)
		};
		let (yp, yl, yr) = {
			let n = &self.nodes[y];
			(n.parent, n.left, n.right)
		};
		// Capture sides before any link changes; siblings share a parent.
		let x_side = xp.map(|p| self.side_of(p, x));
		let y_side = yp.map(|p| self.side_of(p, y));

		// A link to one of the pair must point at the other after the swap.
		let fix = |link: Link| match link {
			Some(i) if i == x => Some(y),
			Some(i) if i == y => Some(x),
			other => other,
		};

		{
			let n = &mut self.nodes[x];
			n.parent = fix(yp);
			n.left = fix(yl);
			n.right = fix(yr);
		}
		{
			let n = &mut self.nodes[y];
			n.parent = fix(xp);
			n.left = fix(xl);
			n.right = fix(xr);
		}

		for child in [fix(yl), fix(yr)].into_iter().flatten() {
			self.nodes[child].parent = Some(x);
		}
		for child in [fix(xl), fix(xr)].into_iter().flatten() {
			self.nodes[child].parent = Some(y);
		}

		for (node, parent, side) in [(x, fix(yp), y_side), (y, fix(xp), x_side)] {
			match (parent, side) {
				(Some(p), Some(side)) if p != x && p != y => {
					self.nodes[p].set_child(side, Some(node));
				}
				(None, _) => self.root = Some(node),
				_ => {}
			}
		}
	}
}

impl<K: Ord, V> Tree<K, V> {
	// -----------------------------------------------------------------------
	// Key Search
	// -----------------------------------------------------------------------

	/// Locates the node holding exactly `key`.
	pub(crate) fn find_index<Q>(&self, key: &Q) -> Link
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		let mut curr = self.root;
		while let Some(index) = curr {
			let node = &self.nodes[index];
			curr = match key.cmp(node.key.borrow()) {
				Ordering::Less => node.left,
				Ordering::Greater => node.right,
				Ordering::Equal => return Some(index),
			};
		}
		None
	}

	/// First node whose key is `>= key`.
	pub(crate) fn lower_bound<Q>(&self, key: &Q) -> Link
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		let mut curr = self.root;
		let mut candidate = None;
		while let Some(index) = curr {
			let node = &self.nodes[index];
			match key.cmp(node.key.borrow()) {
				Ordering::Less => {
					candidate = Some(index);
					curr = node.left;
				}
				Ordering::Greater => curr = node.right,
				Ordering::Equal => return Some(index),
			}
		}
		candidate
	}

	/// Last node whose key is `<= key`.
	pub(crate) fn floor<Q>(&self, key: &Q) -> Link
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		let mut curr = self.root;
		let mut candidate = None;
		while let Some(index) = curr {
			let node = &self.nodes[index];
			match key.cmp(node.key.borrow()) {
				Ordering::Less => curr = node.left,
				Ordering::Greater => {
					candidate = Some(index);
					curr = node.right;
				}
				Ordering::Equal => return Some(index),
			}
		}
		candidate
	}
}
