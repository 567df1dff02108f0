use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use keyed_table::{NaturalEq, Sha256Digest, TableConfig, UniqueTable};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn pick(keys: &[String], count: usize) -> Vec<String> {
    let n = keys.len();
    let mut s = 0x9e3779b97f4a7c15u64;
    (0..count)
        .map(|_| {
            s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
            keys[(s as usize) % n].clone()
        })
        .collect()
}

fn bench_set_fresh_100k(c: &mut Criterion) {
    c.bench_function("unique::set_fresh_100k", |b| {
        b.iter_batched(
            UniqueTable::<String, u64>::new,
            |mut t| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    t.set(key(x), i as u64).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_set_presized_100k(c: &mut Criterion) {
    let config = TableConfig::builder()
        .with_initial_buckets(1 << 18)
        .build()
        .unwrap();
    c.bench_function("unique::set_presized_100k", |b| {
        b.iter_batched(
            || UniqueTable::<String, u64>::with_config(config),
            |mut t| {
                for (i, x) in lcg(3).take(100_000).enumerate() {
                    t.set(key(x), i as u64).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_set_sha256_10k(c: &mut Criterion) {
    c.bench_function("unique::set_sha256_10k", |b| {
        b.iter_batched(
            || UniqueTable::<String, u64, _, _>::with_parts(TableConfig::default(), Sha256Digest, NaturalEq),
            |mut t| {
                for (i, x) in lcg(5).take(10_000).enumerate() {
                    t.set(key(x), i as u64).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit_10k(c: &mut Criterion) {
    c.bench_function("unique::get_hit_10k_on_100k", |b| {
        let mut t = UniqueTable::new();
        let keys: Vec<_> = lcg(7).take(100_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            t.set(k.clone(), i as u64).unwrap();
        }
        let queries = pick(&keys, 10_000);
        b.iter(|| {
            for k in &queries {
                black_box(t.get(k).ok());
            }
        })
    });
}

fn bench_find_miss_10k(c: &mut Criterion) {
    c.bench_function("unique::find_miss_10k_on_100k", |b| {
        let mut t = UniqueTable::new();
        for (i, x) in lcg(11).take(100_000).enumerate() {
            t.set(key(x), i as u64).unwrap();
        }
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for _ in 0..10_000 {
                let k = key(miss.next().unwrap());
                black_box(t.find(&k));
            }
        })
    });
}

fn bench_remove_random_10k(c: &mut Criterion) {
    c.bench_function("unique::remove_random_10k_of_110k", |b| {
        b.iter_batched(
            || {
                let mut t = UniqueTable::new();
                let keys: Vec<_> = lcg(13).take(110_000).map(key).collect();
                for (i, k) in keys.iter().enumerate() {
                    t.set(k.clone(), i as u64).unwrap();
                }
                let to_remove = pick(&keys, 10_000);
                (t, to_remove)
            },
            |(mut t, to_remove)| {
                for k in &to_remove {
                    black_box(t.remove(k));
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_set;
    config = bench_config();
    targets = bench_set_fresh_100k, bench_set_presized_100k, bench_set_sha256_10k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_get_hit_10k,
              bench_find_miss_10k,
              bench_remove_random_10k
}
criterion_main!(benches_set, benches_ops);
