// Copyright © SurrealDB Ltd
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Criterion benchmarks comparing the AVL tree against the standard maps.
//!
//! This benchmark suite compares:
//! - `avltree::Tree` - Height-balanced binary search tree in a node arena
//! - `std::collections::BTreeMap` - Standard library B-tree
//! - `std::collections::HashMap` - Standard library hash map (point operations only)
//!
//! Sequential keys drive the rotation-heavy paths, random keys the typical
//! case.

use avltree::Tree;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::collections::{BTreeMap, HashMap};
use std::hint::black_box;

const SEED: u64 = 42;

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

// ============================================================================
// Helper Functions
// ============================================================================

/// Generate sequential keys from 0 to count-1
fn sequential_keys(count: usize) -> Vec<i64> {
	(0..count as i64).collect()
}

/// Generate random keys using a seeded RNG
fn random_keys(count: usize) -> Vec<i64> {
	let mut rng = StdRng::seed_from_u64(SEED);
	(0..count).map(|_| rng.random()).collect()
}

/// Generate keys that don't exist in a sequential key set
fn missing_keys(count: usize) -> Vec<i64> {
	(0..count as i64).map(|i| -(i + 1)).collect()
}

fn build_tree(keys: &[i64]) -> Tree<i64, i64> {
	let mut tree = Tree::with_capacity(keys.len());
	for &k in keys {
		tree.insert(k, k);
	}
	tree
}

// ============================================================================
// Insert Benchmarks
// ============================================================================

fn bench_insert(c: &mut Criterion, name: &str, make_keys: fn(usize) -> Vec<i64>) {
	let mut group = c.benchmark_group(name);

	for count in SIZES {
		let keys = make_keys(count);
		group.throughput(Throughput::Elements(count as u64));

		group.bench_with_input(BenchmarkId::new("avltree", count), &keys, |b, keys| {
			b.iter_batched(
				Tree::new,
				|mut tree| {
					for &k in keys {
						black_box(tree.insert(k, k));
					}
					tree
				},
				BatchSize::SmallInput,
			)
		});

		group.bench_with_input(BenchmarkId::new("btreemap", count), &keys, |b, keys| {
			b.iter_batched(
				BTreeMap::new,
				|mut map| {
					for &k in keys {
						black_box(map.insert(k, k));
					}
					map
				},
				BatchSize::SmallInput,
			)
		});

		group.bench_with_input(BenchmarkId::new("hashmap", count), &keys, |b, keys| {
			b.iter_batched(
				HashMap::new,
				|mut map| {
					for &k in keys {
						black_box(map.insert(k, k));
					}
					map
				},
				BatchSize::SmallInput,
			)
		});
	}
	group.finish();
}

fn bench_insert_sequential(c: &mut Criterion) {
	bench_insert(c, "insert_sequential", sequential_keys);
}

fn bench_insert_random(c: &mut Criterion) {
	bench_insert(c, "insert_random", random_keys);
}

// ============================================================================
// Lookup Benchmarks
// ============================================================================

fn bench_lookup(c: &mut Criterion, name: &str, make_probes: fn(usize) -> Vec<i64>) {
	let mut group = c.benchmark_group(name);

	for count in SIZES {
		let keys = sequential_keys(count);
		let mut probes = make_probes(count);
		probes.shuffle(&mut StdRng::seed_from_u64(SEED));

		let tree = build_tree(&keys);
		let btreemap: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
		let hashmap: HashMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

		group.throughput(Throughput::Elements(count as u64));

		group.bench_function(BenchmarkId::new("avltree", count), |b| {
			b.iter(|| {
				for k in &probes {
					black_box(tree.get(k));
				}
			})
		});

		group.bench_function(BenchmarkId::new("btreemap", count), |b| {
			b.iter(|| {
				for k in &probes {
					black_box(btreemap.get(k));
				}
			})
		});

		group.bench_function(BenchmarkId::new("hashmap", count), |b| {
			b.iter(|| {
				for k in &probes {
					black_box(hashmap.get(k));
				}
			})
		});
	}
	group.finish();
}

fn bench_lookup_hit(c: &mut Criterion) {
	bench_lookup(c, "lookup_hit", sequential_keys);
}

fn bench_lookup_miss(c: &mut Criterion) {
	bench_lookup(c, "lookup_miss", missing_keys);
}

// ============================================================================
// Remove Benchmarks
// ============================================================================

fn bench_remove(c: &mut Criterion) {
	let mut group = c.benchmark_group("remove");

	for count in SIZES {
		let keys = sequential_keys(count);
		// Remove a random 10% of entries
		let mut remove_keys = keys.clone();
		remove_keys.shuffle(&mut StdRng::seed_from_u64(SEED));
		remove_keys.truncate(count / 10);

		group.throughput(Throughput::Elements(remove_keys.len() as u64));

		group.bench_with_input(BenchmarkId::new("avltree", count), &remove_keys, |b, remove_keys| {
			b.iter_batched(
				|| build_tree(&keys),
				|mut tree| {
					for k in remove_keys {
						black_box(tree.remove(k));
					}
					tree
				},
				BatchSize::SmallInput,
			)
		});

		group.bench_with_input(BenchmarkId::new("btreemap", count), &remove_keys, |b, remove_keys| {
			b.iter_batched(
				|| keys.iter().map(|&k| (k, k)).collect::<BTreeMap<_, _>>(),
				|mut map| {
					for k in remove_keys {
						black_box(map.remove(k));
					}
					map
				},
				BatchSize::SmallInput,
			)
		});

		group.bench_with_input(BenchmarkId::new("hashmap", count), &remove_keys, |b, remove_keys| {
			b.iter_batched(
				|| keys.iter().map(|&k| (k, k)).collect::<HashMap<_, _>>(),
				|mut map| {
					for k in remove_keys {
						black_box(map.remove(k));
					}
					map
				},
				BatchSize::SmallInput,
			)
		});
	}
	group.finish();
}

// ============================================================================
// Mixed Workload Benchmarks
// ============================================================================

fn bench_mixed(c: &mut Criterion) {
	let mut group = c.benchmark_group("mixed");
	let ops = 10_000;

	// (is_insert, key) pairs over a small key space so removals hit
	let mut rng = StdRng::seed_from_u64(SEED);
	let script: Vec<(bool, i64)> = (0..ops).map(|_| (rng.random_bool(0.5), rng.random_range(0..4096))).collect();

	group.throughput(Throughput::Elements(ops as u64));

	group.bench_function("avltree", |b| {
		b.iter_batched(
			Tree::new,
			|mut tree| {
				for &(insert, k) in &script {
					if insert {
						black_box(tree.insert(k, k));
					} else {
						black_box(tree.remove(&k));
					}
				}
				tree
			},
			BatchSize::SmallInput,
		)
	});

	group.bench_function("btreemap", |b| {
		b.iter_batched(
			BTreeMap::new,
			|mut map| {
				for &(insert, k) in &script {
					if insert {
						black_box(map.insert(k, k));
					} else {
						black_box(map.remove(&k));
					}
				}
				map
			},
			BatchSize::SmallInput,
		)
	});

	group.finish();
}

// ============================================================================
// Ordered Traversal Benchmarks (ordered maps only)
// ============================================================================

fn bench_range(c: &mut Criterion) {
	let mut group = c.benchmark_group("range");

	for count in SIZES {
		let keys = sequential_keys(count);
		let tree = build_tree(&keys);
		let btreemap: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

		// Range covers 10% of entries in the middle
		let range_size = count / 10;
		let start = (count / 2 - range_size / 2) as i64;
		let end = start + range_size as i64;

		group.throughput(Throughput::Elements(range_size as u64));

		group.bench_function(BenchmarkId::new("avltree", count), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				let mut iter = tree.raw_iter();
				iter.seek(&start);
				while let Some((k, v)) = iter.next() {
					if *k >= end {
						break;
					}
					sum = sum.wrapping_add(*k).wrapping_add(*v);
				}
				black_box(sum)
			})
		});

		group.bench_function(BenchmarkId::new("btreemap", count), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				for (&k, &v) in btreemap.range(start..end) {
					sum = sum.wrapping_add(k).wrapping_add(v);
				}
				black_box(sum)
			})
		});
	}
	group.finish();
}

fn bench_iter(c: &mut Criterion) {
	let mut group = c.benchmark_group("iterator");

	for count in SIZES {
		let keys = sequential_keys(count);
		let tree = build_tree(&keys);
		let btreemap: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

		group.throughput(Throughput::Elements(count as u64));

		group.bench_function(BenchmarkId::new("avltree", count), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				for (&k, &v) in tree.iter() {
					sum = sum.wrapping_add(k).wrapping_add(v);
				}
				black_box(sum)
			})
		});

		group.bench_function(BenchmarkId::new("avltree_pre_order", count), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				for (&k, &v) in tree.pre_order() {
					sum = sum.wrapping_add(k).wrapping_add(v);
				}
				black_box(sum)
			})
		});

		group.bench_function(BenchmarkId::new("btreemap", count), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				for (&k, &v) in btreemap.iter() {
					sum = sum.wrapping_add(k).wrapping_add(v);
				}
				black_box(sum)
			})
		});
	}
	group.finish();
}

criterion_group!(
	benches,
	bench_insert_sequential,
	bench_insert_random,
	bench_lookup_hit,
	bench_lookup_miss,
	bench_remove,
	bench_mixed,
	bench_range,
	bench_iter,
);

criterion_main!(benches);
