//! Serde support, enabled by the `serde` feature.
//!
//! A tree serializes as a map in ascending key order. Deserialization inserts
//! entries one by one, so a duplicated key keeps its last value.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Tree;

impl<K: Serialize, V: Serialize> Serialize for Tree<K, V> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.len()))?;
		for (key, value) in self.iter() {
			map.serialize_entry(key, value)?;
		}
		map.end()
	}
}

struct TreeVisitor<K, V> {
	marker: PhantomData<fn() -> Tree<K, V>>,
}

impl<'de, K, V> Visitor<'de> for TreeVisitor<K, V>
where
	K: Deserialize<'de> + Ord,
	V: Deserialize<'de>,
{
	type Value = Tree<K, V>;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("a map")
	}

	fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
		let mut tree = Tree::with_capacity(access.size_hint().unwrap_or(0));
		while let Some((key, value)) = access.next_entry()? {
			tree.insert(key, value);
		}
		Ok(tree)
	}
}

impl<'de, K, V> Deserialize<'de> for Tree<K, V>
where
	K: Deserialize<'de> + Ord,
	V: Deserialize<'de>,
{
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_map(TreeVisitor {
			marker: PhantomData,
		})
	}
}
