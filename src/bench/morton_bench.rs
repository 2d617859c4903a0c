use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use morton_matmul::matrix::naive_ijk::matmul_naive_ijk;
use morton_matmul::matrix::random::{CilkRand, random_matrix};
use morton_matmul::morton::{MortonBuffer, QuadrantOrder};
use morton_matmul::{LEAF_SIZE, LeafKernel, MultiplyOptions, Schedule, multiply_morton, multiply_with};

const SIZES: &[usize] = &[64, 128, 256, 512];

fn inputs(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut rng = CilkRand::default();
    let a = random_matrix(n, &mut rng);
    let b = random_matrix(n, &mut rng);
    (a, b)
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply");
    for &n in SIZES {
        group.throughput(Throughput::Elements((n as u64).pow(3)));
        let (a, b) = inputs(n);
        let mut out = vec![0.0; n * n];

        for (label, schedule) in [("parallel", Schedule::Parallel), ("sequential", Schedule::Sequential)] {
            let options = MultiplyOptions {
                schedule,
                ..Default::default()
            };
            group.bench_function(BenchmarkId::new(label, n), |bench| {
                bench.iter(|| {
                    multiply_with(black_box(&a), black_box(&b), black_box(&mut out), n, &options)
                        .unwrap();
                });
            });
        }

        if n <= 256 {
            group.bench_function(BenchmarkId::new("naive", n), |bench| {
                bench.iter(|| matmul_naive_ijk(black_box(&a), black_box(&b), black_box(&mut out), n));
            });
        }
    }
    group.finish();
}

/// Multiply alone, layout conversion excluded.
fn bench_morton_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply_morton");
    for &n in SIZES {
        group.throughput(Throughput::Elements((n as u64).pow(3)));
        let (a, b) = inputs(n);
        let am = MortonBuffer::from_row_major(&a, n, LEAF_SIZE, QuadrantOrder::RowFirst).unwrap();
        let bm = MortonBuffer::from_row_major(&b, n, LEAF_SIZE, QuadrantOrder::ColumnFirst).unwrap();
        let mut cm = MortonBuffer::zeroed(n, LEAF_SIZE, QuadrantOrder::RowFirst).unwrap();

        for kernel in [LeafKernel::Scalar, LeafKernel::detect(LEAF_SIZE)] {
            group.bench_function(BenchmarkId::new(format!("{kernel:?}"), n), |bench| {
                bench.iter(|| {
                    cm.fill(0.0);
                    multiply_morton(&am, &bm, &mut cm, kernel, Schedule::Parallel).unwrap();
                    black_box(cm.as_slice()[0]);
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_end_to_end, bench_morton_only);
criterion_main!(benches);
