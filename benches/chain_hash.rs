use core::hint::black_box;

use chain_hash::BuildHasherIndex;
use chain_hash::HashMap as ChainHashMap;
use chain_hash::StringHash;
use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownHashMap;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use siphasher::sip::SipHasher;

#[derive(Default, Clone)]
struct SipBuilder;

impl core::hash::BuildHasher for SipBuilder {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new()
    }
}

const SIZES: [usize; 5] = [1 << 6, 1 << 9, 1 << 12, 1 << 15, 1 << 17];

fn keys(count: usize) -> Vec<String> {
    let mut rng = SmallRng::seed_from_u64(0xC4A1);
    (0..count)
        .map(|_| format!("key_{:016X}", rng.random::<u64>()))
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        let keys = keys(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("string_hash/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = ChainHashMap::with_hasher(StringHash);
                    for (i, key) in keys.into_iter().enumerate() {
                        map.set(key, i).unwrap();
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("sip_index/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = ChainHashMap::with_hasher(BuildHasherIndex::new(SipBuilder));
                    for (i, key) in keys.into_iter().enumerate() {
                        map.set(key, i).unwrap();
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = HashbrownHashMap::with_hasher(SipBuilder);
                    for (i, key) in keys.into_iter().enumerate() {
                        map.insert(key, i);
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_hit");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        let keys = keys(size);
        let mut lookups = keys.clone();
        lookups.shuffle(&mut SmallRng::seed_from_u64(1));
        group.throughput(Throughput::Elements(size as u64));

        let mut chained = ChainHashMap::with_hasher(StringHash);
        let mut hashbrown = HashbrownHashMap::with_hasher(SipBuilder);
        for (i, key) in keys.iter().enumerate() {
            chained.set(key.clone(), i).unwrap();
            hashbrown.insert(key.clone(), i);
        }

        group.bench_function(format!("string_hash/{size}"), |b| {
            b.iter(|| {
                for key in &lookups {
                    black_box(chained.get(key).unwrap());
                }
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in &lookups {
                    black_box(hashbrown.get(key));
                }
            })
        });
    }

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        let keys = keys(size);
        group.throughput(Throughput::Elements(size as u64));

        let mut chained = ChainHashMap::with_hasher(StringHash);
        for (i, key) in keys.iter().enumerate() {
            chained.set(key.clone(), i).unwrap();
        }

        group.bench_function(format!("string_hash/{size}"), |b| {
            b.iter_batched(
                || chained.clone(),
                |mut map| {
                    for key in &keys {
                        black_box(map.remove(key).unwrap());
                    }
                    black_box(map)
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("iteration");

    for size in SIZES {
        let mut chained = ChainHashMap::with_hasher(StringHash);
        for (i, key) in keys(size).into_iter().enumerate() {
            chained.set(key, i).unwrap();
        }
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("iter/{size}"), |b| {
            b.iter(|| black_box(chained.iter().map(|(_, v)| *v).sum::<usize>()))
        });

        group.bench_function(format!("entries/{size}"), |b| {
            b.iter(|| black_box(chained.entries()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_find_hit, bench_remove, bench_iteration);

criterion_main!(benches);
