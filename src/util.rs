//! Test utilities for loading exact tree shapes from JSON fixtures
//!
//! Each fixture node is `{"key": k, "left": {...}, "right": {...}}` with both
//! children optional. Values are `key * 10`. Balance factors are derived from
//! the fixture's shape, so a fixture may describe a tree that is not AVL
//! balanced (handy for exercising the rotation primitives directly).
use crate::node::{Link, Node};
use crate::Tree;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
struct TreeNode {
	key: i32,
	#[serde(default)]
	left: Option<Box<TreeNode>>,
	#[serde(default)]
	right: Option<Box<TreeNode>>,
}

/// Allocates `tree_node` and its subtree; returns the slot and subtree height.
fn translate_node(tree: &mut Tree<i32, i32>, tree_node: TreeNode, parent: Link) -> (u32, i8) {
	let index = tree.nodes.alloc(Node::new(tree_node.key, tree_node.key * 10, parent));

	let mut child = |child: Option<Box<TreeNode>>| match child {
		Some(child) => {
			let (child, height) = translate_node(tree, *child, Some(index));
			(Some(child), height)
		}
		None => (None, 0),
	};
	let (left, left_height) = child(tree_node.left);
	let (right, right_height) = child(tree_node.right);

	let node = &mut tree.nodes[index];
	node.left = left;
	node.right = right;
	node.balance = right_height - left_height;
	(index, 1 + left_height.max(right_height))
}

pub fn sample_tree(json: &str) -> Tree<i32, i32> {
	let json_tree: TreeNode = serde_json::from_str(json).unwrap();
	let mut tree = Tree::new();
	let (root, _) = translate_node(&mut tree, json_tree, None);
	tree.root = Some(root);
	tree
}
