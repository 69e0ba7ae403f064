//! # Error Types for the AVL Tree
//!
//! Key lookups never fail: a missing key is reported as `None`, and removing a
//! missing key is a no-op. The only fallible operations are the node-handle
//! accessors ([`Tree::key`](crate::Tree::key), [`Tree::parent`](crate::Tree::parent),
//! [`Tree::predecessor`](crate::Tree::predecessor) and friends), which take a
//! [`NodeId`] that may have outlived its node.
//!
//! ## Handle Lifecycle
//!
//! ```text
//! find(&key) ──► Some(NodeId) ──► rotations / swaps ──► still valid
//!                                        │
//!                                        ▼
//!                                  remove(&key) ──► Err(InvalidNode)
//! ```

use thiserror::Error;

use crate::NodeId;

/// Errors that can occur during node-handle operations.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
	/// The handle does not refer to a live node of this tree.
	///
	/// This happens once the node was removed, directly or via `pop_first`,
	/// `pop_last` or `clear`. A handle never silently resolves to a newer node
	/// that reuses the same storage slot.
	///
	/// Handles are only meaningful for the tree that produced them.
	#[error("node handle {0} does not refer to a live node")]
	InvalidNode(NodeId),
}

/// A Result type alias using our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;
