use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use balanced_map::BalancedMap;

const N: usize = 100_000;

pub fn benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let values: Vec<i32> = (1..=N).map(|_| rng.gen()).collect();

    c.bench_function("map_insert", |b| {
        b.iter(|| {
            let mut map = BalancedMap::new();
            for value in &values {
                map.insert(*value, *value);
            }
            map
        })
    });

    c.bench_function("map_insert_sorted", |b| {
        b.iter(|| {
            let mut map = BalancedMap::new();
            for value in 0..N {
                map.insert(value, ());
            }
            map
        })
    });

    let map: BalancedMap<i32, i32> = values.iter().map(|value| (*value, *value)).collect();

    c.bench_function("map_find", |b| {
        b.iter(|| {
            for value in &values {
                black_box(map.find(value).ok());
            }
        })
    });

    c.bench_function("map_iter", |b| {
        b.iter(|| {
            for (k, v) in &map {
                black_box((k, v));
            }
        })
    });

    c.bench_function("map_in_order", |b| b.iter(|| black_box(map.in_order())));

    c.bench_function("map_pre_order", |b| b.iter(|| black_box(map.pre_order())));
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
