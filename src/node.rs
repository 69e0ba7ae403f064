//! # Node Storage for the AVL Tree
//!
//! Nodes are stored in a slot arena owned by the tree. Links between nodes are
//! plain slot indices:
//!
//! - `left` / `right` are owning in the structural sense: a slot is only ever
//!   vacated after its node has been unlinked from its parent.
//! - `parent` is a non-owning back link, used for upward fixup walks and for
//!   predecessor / successor lookups.
//!
//! ```text
//!             ┌──────────────┐
//!             │ slot 0: 20   │  parent: None
//!             │ balance: 0   │
//!             └──┬────────┬──┘
//!       left     │        │     right
//!                ▼        ▼
//!     ┌──────────────┐  ┌──────────────┐
//!     │ slot 2: 10   │  │ slot 1: 30   │  parent: Some(0)
//!     └──────────────┘  └──────────────┘
//! ```
//!
//! Vacated slots are recycled through a free list. Each slot carries a
//! generation counter which is bumped on every vacate, so a [`NodeId`] handed
//! out before a removal never aliases the node that later reuses its slot.

use std::fmt;
use std::ops::{Index, IndexMut};

/// Internal link to another node in the same arena.
pub(crate) type Link = Option<u32>;

/// Which child of a node a link refers to.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub(crate) enum Side {
	Left,
	Right,
}

impl Side {
	/// The other side.
	#[inline]
	pub(crate) fn opposite(self) -> Side {
		match self {
			Side::Left => Side::Right,
			Side::Right => Side::Left,
		}
	}

	/// Balance contribution of a subtree on this side growing by one level.
	#[inline]
	pub(crate) fn sign(self) -> i8 {
		match self {
			Side::Left => -1,
			Side::Right => 1,
		}
	}
}

/// A stable handle to a node in a [`Tree`](crate::Tree).
///
/// The handle keeps referring to the same key and value while the node moves
/// around the tree during rotations and swaps. Once the node is removed the
/// handle becomes stale and every handle-based accessor reports
/// [`Error::InvalidNode`](crate::error::Error::InvalidNode).
#[derive(PartialEq, Eq, Hash, Copy, Clone)]
pub struct NodeId {
	pub(crate) index: u32,
	pub(crate) generation: u32,
}

impl fmt::Debug for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "NodeId({}v{})", self.index, self.generation)
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}v{}", self.index, self.generation)
	}
}

/// A single tree node.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
	pub(crate) key: K,
	pub(crate) value: V,
	pub(crate) parent: Link,
	pub(crate) left: Link,
	pub(crate) right: Link,
	/// height(right) - height(left). In {-1, 0, 1} between operations.
	pub(crate) balance: i8,
}

impl<K, V> Node<K, V> {
	/// Creates a detached leaf with balance 0.
	pub(crate) fn new(key: K, value: V, parent: Link) -> Node<K, V> {
		Node {
			key,
			value,
			parent,
			left: None,
			right: None,
			balance: 0,
		}
	}

	#[inline]
	pub(crate) fn child(&self, side: Side) -> Link {
		match side {
			Side::Left => self.left,
			Side::Right => self.right,
		}
	}

	#[inline]
	pub(crate) fn set_child(&mut self, side: Side, link: Link) {
		match side {
			Side::Left => self.left = link,
			Side::Right => self.right = link,
		}
	}

	#[inline]
	pub(crate) fn update_balance(&mut self, diff: i8) {
		self.balance += diff;
	}

	#[inline]
	pub(crate) fn has_two_children(&self) -> bool {
		self.left.is_some() && self.right.is_some()
	}
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Node<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Node")
			.field("key", &self.key)
			.field("value", &self.value)
			.field("parent", &self.parent)
			.field("left", &self.left)
			.field("right", &self.right)
			.field("balance", &self.balance)
			.finish()
	}
}

#[derive(Clone)]
struct Slot<K, V> {
	generation: u32,
	node: Option<Node<K, V>>,
}

/// Slot arena holding every node of a tree.
#[derive(Clone)]
pub(crate) struct Arena<K, V> {
	slots: Vec<Slot<K, V>>,
	free: Vec<u32>,
	len: usize,
}

impl<K, V> Arena<K, V> {
	pub(crate) fn new() -> Arena<K, V> {
		Arena {
			slots: Vec::new(),
			free: Vec::new(),
			len: 0,
		}
	}

	pub(crate) fn with_capacity(capacity: usize) -> Arena<K, V> {
		Arena {
			slots: Vec::with_capacity(capacity),
			free: Vec::new(),
			len: 0,
		}
	}

	/// Number of occupied slots.
	#[inline]
	pub(crate) fn len(&self) -> usize {
		self.len
	}

	/// Stores a node, reusing a vacated slot when one is available.
	pub(crate) fn alloc(&mut self, node: Node<K, V>) -> u32 {
		self.len += 1;
		if let Some(index) = self.free.pop() {
			self.slots[index as usize].node = Some(node);
			index
		} else {
			let index = u32::try_from(self.slots.len()).unwrap_or_else(|_| {
				unreachable!("arena exceeded {} nodes", u32::MAX);
			});
			self.slots.push(Slot {
				generation: 0,
				node: Some(node),
			});
			index
		}
	}

	/// Vacates a slot and hands back the node it held.
	pub(crate) fn free(&mut self, index: u32) -> Node<K, V> {
		let slot = &mut self.slots[index as usize];
		let Some(node) = slot.node.take() else {
			unreachable!("freeing vacant arena slot {}", index);
		};
		slot.generation = slot.generation.wrapping_add(1);
		self.free.push(index);
		self.len -= 1;
		node
	}

	/// Drops every node. Generations are bumped so outstanding handles go stale.
	pub(crate) fn clear(&mut self) {
		self.free.clear();
		for (index, slot) in self.slots.iter_mut().enumerate() {
			if slot.node.take().is_some() {
				slot.generation = slot.generation.wrapping_add(1);
			}
			self.free.push(index as u32);
		}
		// Hand out low slots first after a clear.
		self.free.reverse();
		self.len = 0;
	}

	/// Builds the public handle for an occupied slot.
	#[inline]
	pub(crate) fn id(&self, index: u32) -> NodeId {
		NodeId {
			index,
			generation: self.slots[index as usize].generation,
		}
	}

	/// Resolves a public handle to a slot index, if the handle is still live.
	pub(crate) fn resolve(&self, id: NodeId) -> Option<u32> {
		let slot = self.slots.get(id.index as usize)?;
		if slot.generation == id.generation && slot.node.is_some() {
			Some(id.index)
		} else {
			None
		}
	}
}

impl<K, V> Index<u32> for Arena<K, V> {
	type Output = Node<K, V>;

	#[inline]
	fn index(&self, index: u32) -> &Node<K, V> {
		match self.slots[index as usize].node {
			Some(ref node) => node,
			None => unreachable!("link to vacant arena slot {}", index),
		}
	}
}

impl<K, V> IndexMut<u32> for Arena<K, V> {
	#[inline]
	fn index_mut(&mut self, index: u32) -> &mut Node<K, V> {
		match self.slots[index as usize].node {
			Some(ref mut node) => node,
			None => unreachable!("link to vacant arena slot {}", index),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn side_sign_and_opposite() {
		assert_eq!(Side::Left.sign(), -1);
		assert_eq!(Side::Right.sign(), 1);
		assert_eq!(Side::Left.opposite(), Side::Right);
		assert_eq!(Side::Right.opposite(), Side::Left);
	}

	#[test]
	fn arena_reuses_slots_with_new_generation() {
		let mut arena: Arena<i32, i32> = Arena::new();
		let a = arena.alloc(Node::new(1, 10, None));
		let b = arena.alloc(Node::new(2, 20, None));
		assert_eq!(arena.len(), 2);

		let old = arena.id(a);
		let node = arena.free(a);
		assert_eq!(node.key, 1);
		assert_eq!(arena.resolve(old), None);

		let c = arena.alloc(Node::new(3, 30, None));
		assert_eq!(c, a, "vacated slot should be reused");
		assert_ne!(arena.id(c), old);
		assert_eq!(arena.resolve(old), None);
		assert_eq!(arena.resolve(arena.id(b)), Some(b));
		assert_eq!(arena[c].key, 3);
	}

	#[test]
	fn arena_clear_invalidates_handles() {
		let mut arena: Arena<i32, i32> = Arena::new();
		let a = arena.alloc(Node::new(1, 10, None));
		let id = arena.id(a);
		arena.clear();
		assert_eq!(arena.len(), 0);
		assert_eq!(arena.resolve(id), None);
		assert_eq!(arena.alloc(Node::new(2, 20, None)), 0);
	}

	#[test]
	fn resolve_rejects_out_of_range() {
		let arena: Arena<i32, i32> = Arena::new();
		assert_eq!(
			arena.resolve(NodeId {
				index: 7,
				generation: 0
			}),
			None
		);
	}
}
