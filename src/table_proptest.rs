#![cfg(test)]

// Property tests kept inside the crate so they can observe the rehash
// counter, which is not part of the public surface.

use crate::config::TableConfig;
use crate::error::TableError;
use crate::hash_code::HashCode;
use crate::index_table::IndexTable;
use crate::strategy::NaturalEq;
use crate::unique_table::UniqueTable;
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum UniqueOp {
    Set(usize, i32),
    Get(usize),
    Update(usize, i32),
    Remove(usize),
    Clear,
}

#[derive(Clone, Debug)]
enum IndexOp {
    Insert(usize, i32),
    Search(usize),
    Remove(usize),
    Clear,
}

fn arb_config() -> impl Strategy<Value = TableConfig> {
    (1usize..=12, 0.2f64..2.0, 2usize..=5).prop_map(|(buckets, lf, factor)| {
        TableConfig::builder()
            .with_initial_buckets(buckets)
            .with_max_load_factor(lf)
            .with_rehashing_factor(factor)
            .build()
            .expect("strategy only yields valid configs")
    })
}

fn arb_pool() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-z]{0,4}", 1..=24)
}

fn arb_unique_ops(n: usize) -> impl Strategy<Value = Vec<UniqueOp>> {
    let op = prop_oneof![
        6 => (0..n, any::<i32>()).prop_map(|(i, v)| UniqueOp::Set(i, v)),
        2 => (0..n).prop_map(UniqueOp::Get),
        2 => (0..n, any::<i32>()).prop_map(|(i, v)| UniqueOp::Update(i, v)),
        2 => (0..n).prop_map(UniqueOp::Remove),
        1 => Just(UniqueOp::Clear),
    ];
    proptest::collection::vec(op, 1..80)
}

fn arb_index_ops(n: usize) -> impl Strategy<Value = Vec<IndexOp>> {
    let op = prop_oneof![
        6 => (0..n, any::<i32>()).prop_map(|(i, v)| IndexOp::Insert(i, v)),
        2 => (0..n).prop_map(IndexOp::Search),
        2 => (0..n).prop_map(IndexOp::Remove),
        1 => Just(IndexOp::Clear),
    ];
    proptest::collection::vec(op, 1..80)
}

fn arb_unique_scenario() -> impl Strategy<Value = (TableConfig, Vec<String>, Vec<UniqueOp>)> {
    (arb_config(), arb_pool()).prop_flat_map(|(config, pool)| {
        let n = pool.len();
        arb_unique_ops(n).prop_map(move |ops| (config, pool.clone(), ops))
    })
}

fn arb_index_scenario() -> impl Strategy<Value = (TableConfig, Vec<String>, Vec<IndexOp>)> {
    (arb_config(), arb_pool()).prop_flat_map(|(config, pool)| {
        let n = pool.len();
        arb_index_ops(n).prop_map(move |ops| (config, pool.clone(), ops))
    })
}

fn expected_buckets(config: &TableConfig, rehashes: usize) -> usize {
    config.initial_buckets() * config.rehashing_factor().pow(rehashes as u32)
}

fn run_unique<H>(
    mut sut: UniqueTable<String, i32, H>,
    pool: &[String],
    ops: Vec<UniqueOp>,
) -> Result<(), TestCaseError>
where
    H: crate::strategy::KeyHasher<String>,
{
    let config = *sut.config();
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        let buckets_before = sut.bucket_count();
        match op {
            UniqueOp::Set(i, v) => {
                let k = pool[i].clone();
                let already = model.contains_key(&k);
                match sut.set(k.clone(), v) {
                    Ok(()) => {
                        prop_assert!(!already, "set must fail on duplicate");
                        model.insert(k, v);
                    }
                    Err(TableError::DuplicateKey) => prop_assert!(already),
                    Err(e) => prop_assert!(false, "unexpected error {:?}", e),
                }
                // Load factor is restored before set returns.
                prop_assert!(sut.load_factor() < config.max_load_factor());
            }
            UniqueOp::Get(i) => {
                let k = &pool[i];
                match model.get(k) {
                    Some(v) => prop_assert_eq!(sut.get(k), Ok(v)),
                    None => prop_assert_eq!(sut.get(k), Err(TableError::KeyNotFound)),
                }
                prop_assert_eq!(sut.find(k), model.contains_key(k));
            }
            UniqueOp::Update(i, v) => {
                let k = &pool[i];
                let updated = sut.update(k, v);
                prop_assert_eq!(updated, model.contains_key(k));
                if let Some(mv) = model.get_mut(k) {
                    *mv = v;
                }
            }
            UniqueOp::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(k).is_some());
                prop_assert!(!sut.find(k));
            }
            UniqueOp::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.bucket_count(), buckets_before, "clear never shrinks");
            }
        }

        prop_assert!(sut.bucket_count() >= buckets_before, "buckets only grow");
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.key_count(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.bucket_count(), expected_buckets(&config, sut.rehash_count()));
        let chained: usize = (0..sut.bucket_count()).map(|b| sut.bucket_size(b).unwrap()).sum();
        prop_assert_eq!(chained, model.len());
    }

    for (k, v) in &model {
        prop_assert_eq!(sut.get(k), Ok(v));
    }
    Ok(())
}

// Property: UniqueTable matches a std HashMap model across random
// set/get/update/remove/clear sequences.
// Invariants exercised after every op:
// - Duplicate `set` is rejected and leaves the first value.
// - `load_factor < max_load_factor` right after each `set`.
// - `bucket_count == initial * factor^rehashes`; buckets never shrink.
// - Bucket sizes sum to `key_count`; `len == key_count`.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_unique_state_machine((config, pool, ops) in arb_unique_scenario()) {
        let sut: UniqueTable<String, i32> = UniqueTable::with_config(config);
        run_unique(sut, &pool, ops)?;
    }

    // Same invariants with every key in one bucket, which leaves equality
    // as the only thing telling entries apart.
    #[test]
    fn prop_unique_state_machine_with_collisions((config, pool, ops) in arb_unique_scenario()) {
        let collide = |_: &String| HashCode::default();
        let sut = UniqueTable::with_parts(config, collide, NaturalEq);
        run_unique(sut, &pool, ops)?;
    }
}

// Property: IndexTable matches a HashMap<K, Vec<V>> model with values kept
// most recent first.
// Invariants exercised after every op:
// - `search` returns the model's sequence (empty when absent).
// - `len` is the total number of values; `key_count` the number of keys.
// - Removing a key drops exactly its values.
// - Load factor and bucket count follow the same rules as unique mode.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_index_state_machine((config, pool, ops) in arb_index_scenario()) {
        let mut sut = IndexTable::with_config(config, |v: &(String, i32)| v.0.clone());
        let mut model: HashMap<String, Vec<i32>> = HashMap::new();

        for op in ops {
            let buckets_before = sut.bucket_count();
            match op {
                IndexOp::Insert(i, v) => {
                    let k = pool[i].clone();
                    sut.insert((k.clone(), v));
                    model.entry(k).or_default().insert(0, v);
                    prop_assert!(sut.load_factor() < config.max_load_factor());
                }
                IndexOp::Search(i) => {
                    let k = &pool[i];
                    let got: Vec<i32> = sut.search(k).map(|(_, v)| *v).collect();
                    let want = model.get(k).cloned().unwrap_or_default();
                    prop_assert_eq!(got, want);
                    prop_assert_eq!(sut.find(k), model.contains_key(k));
                }
                IndexOp::Remove(i) => {
                    let k = &pool[i];
                    let len_before = sut.len();
                    let removed = model.remove(k);
                    prop_assert_eq!(sut.remove(k), removed.is_some());
                    let dropped = removed.map_or(0, |vs| vs.len());
                    prop_assert_eq!(sut.len(), len_before - dropped);
                }
                IndexOp::Clear => {
                    sut.clear();
                    model.clear();
                    prop_assert_eq!(sut.bucket_count(), buckets_before);
                }
            }

            let values: usize = model.values().map(Vec::len).sum();
            prop_assert_eq!(sut.len(), values);
            prop_assert_eq!(sut.key_count(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            prop_assert_eq!(sut.bucket_count(), expected_buckets(&config, sut.rehash_count()));
        }
    }
}
