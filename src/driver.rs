//! One end-to-end run: generate, multiply, time, optionally verify.

use crate::config::Config;
use crate::error::{Result, validate_len, validate_size};
use crate::kernels::LeafKernel;
use crate::matrix::compare::{Mismatch, first_mismatch};
use crate::matrix::naive_ijk::matmul_naive_ijk;
use crate::matrix::random::{CilkRand, random_matrix};
use crate::morton::{MortonBuffer, QuadrantOrder};
use crate::threaded::{Schedule, multiply_morton};
use crate::timing::{ClockMark, diff_sec};

/// Outcome of the correctness check.
#[derive(Debug, Clone, PartialEq)]
pub enum Verification {
    Skipped,
    Passed,
    Failed(Mismatch),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub n: usize,
    pub workers: usize,
    /// Seconds spent in the Morton multiply alone.
    pub elapsed_secs: f64,
    pub verification: Verification,
    /// Row-major product.
    pub product: Vec<f64>,
}

impl Report {
    /// Process exit status for this run. A failed verification is only an
    /// error in strict mode.
    pub fn exit_code(&self, strict: bool) -> i32 {
        match self.verification {
            Verification::Failed(_) if strict => 2,
            _ => 0,
        }
    }

    /// Closing lines for stdout: `WRONG RESULT!` after a failed check,
    /// otherwise the example banner.
    pub fn summary(&self) -> String {
        match self.verification {
            Verification::Failed(_) => "WRONG RESULT!\n".to_string(),
            _ => format!(
                "\nMorton Z-order example: matrix multiplication\nOptions: n = {}\n\n",
                self.n
            ),
        }
    }
}

/// Runs the whole pipeline on a dedicated rayon pool of
/// `config.threads` workers.
pub fn run(config: &Config) -> Result<Report> {
    validate_size(config.n, config.leaf_size)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    let workers = pool.current_num_threads();
    println!("numWorkers={workers}");

    pool.install(|| run_on_current_pool(config, workers))
}

fn run_on_current_pool(config: &Config, workers: usize) -> Result<Report> {
    let n = config.n;
    let leaf = config.leaf_size;

    let mut rng = CilkRand::default();
    let a = random_matrix(n, &mut rng);
    let b = random_matrix(n, &mut rng);
    let mut c = vec![0.0; n * n];

    let a_morton = MortonBuffer::from_row_major(&a, n, leaf, QuadrantOrder::RowFirst)?;
    let b_morton = MortonBuffer::from_row_major(&b, n, leaf, QuadrantOrder::ColumnFirst)?;
    let mut c_morton = MortonBuffer::zeroed(n, leaf, QuadrantOrder::RowFirst)?;
    let kernel = LeafKernel::detect(leaf);
    log::info!("n={n}, leaf={leaf}, kernel={kernel:?}, workers={workers}");

    let begin = ClockMark::now();
    multiply_morton(&a_morton, &b_morton, &mut c_morton, kernel, Schedule::Parallel)?;
    let end = ClockMark::now();

    let elapsed_secs = diff_sec(&begin, &end);
    println!("Elapsed time in seconds: {elapsed_secs:.6}");

    c_morton.write_row_major(&mut c)?;

    let verification = if config.verify {
        println!("Checking results ... ");
        verify(&a, &b, &c, n, config.epsilon)?
    } else {
        Verification::Skipped
    };

    Ok(Report {
        n,
        workers,
        elapsed_secs,
        verification,
        product: c,
    })
}

/// Recomputes A × B with the naive loop and compares `c` against it.
pub fn verify(a: &[f64], b: &[f64], c: &[f64], n: usize, epsilon: f64) -> Result<Verification> {
    validate_len("C", c, n)?;
    let mut reference = vec![0.0; n * n];
    matmul_naive_ijk(a, b, &mut reference, n);

    Ok(match first_mismatch(&reference, c, n, epsilon) {
        Some(m) => {
            log::error!(
                "mismatch at ({}, {}): expected {}, got {} (relative error {:e})",
                m.row,
                m.col,
                m.expected,
                m.actual,
                m.relative_error
            );
            Verification::Failed(m)
        }
        None => Verification::Passed,
    })
}
