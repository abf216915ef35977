use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lazyseq::{ArraySource, OpaqueSource, OrderedView, Pipeline, Sequence, count_where, materialize};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn values(n: usize) -> Vec<u64> {
    let mut state = 0x9e37_79b9_7f4a_7c15_u64;
    (0..n)
        .map(|_| {
            state ^= state << 7;
            state ^= state >> 9;
            state % 10_000
        })
        .collect()
}

fn benchmark_fused_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline/filter_project_chain");
    for n in SIZES {
        let source = ArraySource::from(values(n));

        group.bench_with_input(BenchmarkId::new("fused", n), &source, |b, source| {
            b.iter(|| {
                let stage =
                    source.clone().filter(|x| x % 2 == 0).project(|x| x * 3).filter(|x| *x > 100).project(|x| x + 1);
                black_box(stage.iter().fold(0u64, u64::wrapping_add))
            });
        });

        // each layer walks the previous one through the generic cursor protocol
        group.bench_with_input(BenchmarkId::new("layered", n), &source, |b, source| {
            b.iter(|| {
                let s1 = source.clone().filter(|x| x % 2 == 0);
                let s2 = OpaqueSource::from_sequence(s1).project(|x| x * 3);
                let s3 = OpaqueSource::from_sequence(s2).filter(|x| *x > 100);
                let s4 = OpaqueSource::from_sequence(s3).project(|x| x + 1);
                black_box(s4.iter().fold(0u64, u64::wrapping_add))
            });
        });

        group.bench_with_input(BenchmarkId::new("std_iter", n), &source, |b, source| {
            b.iter(|| {
                let sum = source
                    .as_slice()
                    .iter()
                    .copied()
                    .filter(|x| x % 2 == 0)
                    .map(|x| x * 3)
                    .filter(|x| *x > 100)
                    .map(|x| x + 1)
                    .fold(0u64, u64::wrapping_add);
                black_box(sum)
            });
        });
    }
    group.finish();
}

fn benchmark_materialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize");
    for n in SIZES {
        let array = ArraySource::from(values(n));
        let opaque = {
            let data = values(n);
            OpaqueSource::from_iter_fn(move || data.clone())
        };
        group.bench_with_input(BenchmarkId::new("bulk_copy", n), &array, |b, source| {
            b.iter(|| black_box(materialize(source)));
        });
        group.bench_with_input(BenchmarkId::new("incremental", n), &opaque, |b, source| {
            b.iter(|| black_box(materialize(source)));
        });
    }
    group.finish();
}

fn benchmark_ordered(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordered_view");
    for n in SIZES {
        let source = ArraySource::from(values(n));
        group.bench_with_input(BenchmarkId::new("two_keys", n), &source, |b, source| {
            b.iter(|| {
                let view = OrderedView::order_by(source.clone(), |x: &u64| x % 100).then_by(|x: &u64| x / 100);
                black_box(count_where(Some(&view), Some(|x: &u64| *x > 5_000)))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_fused_chain, benchmark_materialize, benchmark_ordered);
criterion_main!(benches);
