use morton_matmul::config::Config;
use morton_matmul::driver::{Verification, run};
use morton_matmul::kernels::LeafKernel;
use morton_matmul::matrix::compare::{EPSILON, compare, first_mismatch};
use morton_matmul::matrix::naive_ijk::matmul_naive_ijk;
use morton_matmul::matrix::random::{CilkRand, random_matrix};
use morton_matmul::morton::{MortonBuffer, QuadrantOrder};
use morton_matmul::{
    LEAF_SIZE, MatmulError, MultiplyOptions, Schedule, multiply, multiply_morton, multiply_with,
};
use proptest::prelude::*;

fn assert_matrices_equal(expected: &[f64], actual: &[f64], name: &str) {
    assert_eq!(expected.len(), actual.len(), "{}: length mismatch", name);
    for i in 0..expected.len() {
        let tol = 1e-9 * expected[i].abs().max(1.0);
        assert!(
            (expected[i] - actual[i]).abs() <= tol,
            "{}: mismatch at index {}: expected {}, got {}",
            name,
            i,
            expected[i],
            actual[i]
        );
    }
}

fn naive(a: &[f64], b: &[f64], n: usize) -> Vec<f64> {
    let mut c = vec![0.0; n * n];
    matmul_naive_ijk(a, b, &mut c, n);
    c
}

// ============================================================
// Layout round trip
// ============================================================

#[test]
fn test_round_trip_is_bitwise() {
    let mut rng = CilkRand::new(7);
    for (n, leaf) in [(8, 8), (16, 8), (64, 8), (32, 4), (16, 1)] {
        let m = random_matrix(n, &mut rng);
        for order in [QuadrantOrder::RowFirst, QuadrantOrder::ColumnFirst] {
            let z = MortonBuffer::from_row_major(&m, n, leaf, order).unwrap();
            let mut back = vec![f64::NAN; n * n];
            z.write_row_major(&mut back).unwrap();
            assert_eq!(back, m, "n={n} leaf={leaf} {order:?}");
        }
    }
}

// ============================================================
// Equivalence with the naive reference
// ============================================================

#[test]
fn test_matches_naive_across_sizes() {
    for n in [8, 16, 32, 64, 128] {
        let a: Vec<f64> = (0..n * n).map(|i| (i % 17) as f64).collect();
        let b: Vec<f64> = (0..n * n).map(|i| (i % 13) as f64).collect();

        let mut c = vec![0.0; n * n];
        multiply(&a, &b, &mut c, n).unwrap();

        assert_matrices_equal(&naive(&a, &b, n), &c, &format!("size_{}", n));
    }
}

#[test]
fn test_matches_naive_across_leaf_sizes() {
    let n = 64;
    let a: Vec<f64> = (0..n * n).map(|i| ((i * 31) % 19) as f64 - 9.0).collect();
    let b: Vec<f64> = (0..n * n).map(|i| ((i * 7) % 23) as f64 * 0.25).collect();
    let expected = naive(&a, &b, n);

    for leaf_size in [1, 2, 4, 8, 16, 32, 64] {
        let options = MultiplyOptions {
            leaf_size,
            ..MultiplyOptions::default()
        };
        let mut c = vec![0.0; n * n];
        multiply_with(&a, &b, &mut c, n, &options).unwrap();
        assert_matrices_equal(&expected, &c, &format!("leaf_{}", leaf_size));
    }
}

#[test]
fn test_leaf_sized_input_needs_no_recursion() {
    let n = LEAF_SIZE;
    let mut rng = CilkRand::default();
    let a = random_matrix(n, &mut rng);
    let b = random_matrix(n, &mut rng);

    let mut c = vec![0.0; n * n];
    multiply(&a, &b, &mut c, n).unwrap();

    assert!(compare(&naive(&a, &b, n), &c, n, EPSILON));
}

#[test]
fn test_seeded_16x16_scenario() {
    let n = 16;
    let run = || {
        let mut rng = CilkRand::default();
        let a = random_matrix(n, &mut rng);
        let b = random_matrix(n, &mut rng);
        let mut c = vec![0.0; n * n];
        multiply(&a, &b, &mut c, n).unwrap();
        (a, b, c)
    };

    let (a, b, c) = run();
    assert_eq!(first_mismatch(&naive(&a, &b, n), &c, n, EPSILON), None);

    let (a2, b2, c2) = run();
    assert_eq!(a, a2);
    assert_eq!(b, b2);
    assert_eq!(c, c2);
}

#[test]
fn test_output_is_overwritten() {
    let n = 16;
    let a = vec![1.0; n * n];
    let b = vec![1.0; n * n];
    let mut c = vec![123.0; n * n];
    multiply(&a, &b, &mut c, n).unwrap();
    assert!(c.iter().all(|&x| x == n as f64));
}

// ============================================================
// Accumulation contract
// ============================================================

#[test]
fn test_unzeroed_destination_is_polluted() {
    let n = 32;
    let leaf = 8;
    let a: Vec<f64> = (0..n * n).map(|i| (i % 10) as f64).collect();
    let b: Vec<f64> = (0..n * n).map(|i| (i % 10) as f64).collect();
    let expected = naive(&a, &b, n);

    let am = MortonBuffer::from_row_major(&a, n, leaf, QuadrantOrder::RowFirst).unwrap();
    let bm = MortonBuffer::from_row_major(&b, n, leaf, QuadrantOrder::ColumnFirst).unwrap();

    // pollute only the bottom-right quadrant of C
    let mut cm = MortonBuffer::zeroed(n, leaf, QuadrantOrder::RowFirst).unwrap();
    let [_, _, _, mut br] = cm.view_mut().into_quadrants();
    br.as_mut_slice().fill(5.0);

    multiply_morton(&am, &bm, &mut cm, LeafKernel::Scalar, Schedule::Parallel).unwrap();
    let mut c = vec![0.0; n * n];
    cm.write_row_major(&mut c).unwrap();

    for i in 0..n {
        for j in 0..n {
            let idx = i * n + j;
            if i >= n / 2 && j >= n / 2 {
                assert_eq!(c[idx], expected[idx] + 5.0, "({i}, {j})");
            } else {
                assert_eq!(c[idx], expected[idx], "({i}, {j})");
            }
        }
    }
}

// ============================================================
// Schedules and kernels
// ============================================================

#[test]
fn test_sequential_and_parallel_identical() {
    let n = 128;
    let mut rng = CilkRand::new(99);
    let a = random_matrix(n, &mut rng);
    let b = random_matrix(n, &mut rng);

    let mut par = vec![0.0; n * n];
    let mut seq = vec![0.0; n * n];
    let kernel = Some(LeafKernel::Scalar);
    multiply_with(&a, &b, &mut par, n, &MultiplyOptions { kernel, ..Default::default() }).unwrap();
    multiply_with(
        &a,
        &b,
        &mut seq,
        n,
        &MultiplyOptions {
            kernel,
            schedule: Schedule::Sequential,
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(par, seq);
}

#[test]
fn test_parallel_on_small_pool_matches() {
    let n = 64;
    let a: Vec<f64> = (0..n * n).map(|i| (i % 11) as f64).collect();
    let b: Vec<f64> = (0..n * n).map(|i| (i % 3) as f64).collect();

    for threads in [1, 2, 4] {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
        let mut c = vec![0.0; n * n];
        pool.install(|| multiply(&a, &b, &mut c, n)).unwrap();
        assert_matrices_equal(&naive(&a, &b, n), &c, &format!("threads_{}", threads));
    }
}

#[test]
fn test_detected_kernel_matches_scalar() {
    let n = 64;
    let mut rng = CilkRand::new(3);
    let a = random_matrix(n, &mut rng);
    let b = random_matrix(n, &mut rng);

    let mut scalar = vec![0.0; n * n];
    let mut detected = vec![0.0; n * n];
    let forced = MultiplyOptions {
        kernel: Some(LeafKernel::Scalar),
        ..Default::default()
    };
    multiply_with(&a, &b, &mut scalar, n, &forced).unwrap();
    multiply_with(&a, &b, &mut detected, n, &MultiplyOptions::default()).unwrap();

    assert!(compare(&scalar, &detected, n, EPSILON));
}

// ============================================================
// Precondition checks
// ============================================================

#[test]
fn test_rejects_invalid_sizes() {
    let mut c = vec![0.0; 144];
    assert!(matches!(
        multiply(&[0.0; 144], &[0.0; 144], &mut c, 12),
        Err(MatmulError::NotPowerOfTwo { n: 12 })
    ));

    let mut c = vec![0.0; 16];
    assert!(matches!(
        multiply(&[0.0; 16], &[0.0; 16], &mut c, 4),
        Err(MatmulError::SmallerThanLeaf { n: 4, leaf: 8 })
    ));
}

#[test]
fn test_rejects_short_buffers() {
    let n = 16;
    let mut c = vec![0.0; n * n];
    let err = multiply(&vec![0.0; n * n], &vec![0.0; n * n - 1], &mut c, n).unwrap_err();
    assert!(matches!(
        err,
        MatmulError::LengthMismatch {
            operand: "B",
            expected: 256,
            got: 255
        }
    ));
}

#[cfg(target_arch = "x86_64")]
#[test]
fn test_forced_avx2_on_narrow_leaf_is_rejected() {
    let n = 4;
    let mut rng = CilkRand::new(11);
    let a = random_matrix(n, &mut rng);
    let b = random_matrix(n, &mut rng);

    for leaf_size in [1, 2] {
        let mut c = vec![-1.0; n * n];
        let forced = MultiplyOptions {
            leaf_size,
            kernel: Some(LeafKernel::Avx2),
            ..Default::default()
        };
        let err = multiply_with(&a, &b, &mut c, n, &forced).unwrap_err();
        assert!(matches!(
            err,
            MatmulError::UnsupportedKernel { kernel: LeafKernel::Avx2, leaf } if leaf == leaf_size
        ));
        // nothing was written
        assert!(c.iter().all(|&x| x == -1.0));

        // the portable kernel handles the same leaf size
        let scalar = MultiplyOptions {
            leaf_size,
            kernel: Some(LeafKernel::Scalar),
            ..Default::default()
        };
        multiply_with(&a, &b, &mut c, n, &scalar).unwrap();
        assert_matrices_equal(&naive(&a, &b, n), &c, &format!("scalar_leaf_{}", leaf_size));
    }
}

// ============================================================
// Driver
// ============================================================

#[test]
#[ignore = "n = 2048 with verification; run with --release -- --ignored"]
fn test_default_size_run_verifies() {
    let config = Config {
        n: 2048,
        verify: true,
        ..Default::default()
    };
    let report = run(&config).unwrap();

    assert_eq!(report.n, 2048);
    assert_eq!(report.verification, Verification::Passed);
    assert_eq!(report.exit_code(false), 0);
    assert_eq!(report.exit_code(true), 0);
    assert!(!report.summary().contains("WRONG RESULT"));
}

// ============================================================
// Properties
// ============================================================

fn matrix_strategy() -> impl Strategy<Value = (usize, usize, Vec<f64>, Vec<f64>)> {
    (0u32..4, 0u32..3).prop_flat_map(|(log_n, log_leaf)| {
        let leaf = 1usize << log_leaf;
        let n = leaf << log_n;
        let elems = prop::collection::vec(-100i32..100, n * n)
            .prop_map(|v| v.into_iter().map(f64::from).collect::<Vec<_>>());
        (Just(n), Just(leaf), elems.clone(), elems)
    })
}

proptest! {
    /// FromMorton(ToMorton(M)) == M for both quadrant orders.
    #[test]
    fn prop_round_trip((n, leaf, m, _) in matrix_strategy()) {
        for order in [QuadrantOrder::RowFirst, QuadrantOrder::ColumnFirst] {
            let z = MortonBuffer::from_row_major(&m, n, leaf, order).unwrap();
            let mut back = vec![0.0; n * n];
            z.write_row_major(&mut back).unwrap();
            prop_assert_eq!(&back, &m);
        }
    }

    /// Small integer inputs keep every partial sum exact, so the Morton
    /// product equals the naive one exactly.
    #[test]
    fn prop_equals_naive((n, leaf, a, b) in matrix_strategy()) {
        let options = MultiplyOptions { leaf_size: leaf, ..Default::default() };
        let mut c = vec![0.0; n * n];
        multiply_with(&a, &b, &mut c, n, &options).unwrap();
        prop_assert_eq!(c, naive(&a, &b, n));
    }
}
