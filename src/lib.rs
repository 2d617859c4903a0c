//! Square matrix multiplication by recursive divide-and-conquer over a
//! Morton (Z-order) layout, run with fork-join parallelism.
//!
//! The row-major inputs are rearranged so that every quadrant of every
//! block is contiguous. The multiply then recurses on quadrants, forking
//! four independent products per round onto rayon's work-stealing pool,
//! until it reaches a small dense leaf. The result is rearranged back into
//! row-major order.
//!
//! ## Usage
//!
//! ```
//! use morton_matmul::multiply;
//!
//! let n = 64;
//! let a = vec![1.0f64; n * n];
//! let b = vec![2.0f64; n * n];
//! let mut c = vec![0.0f64; n * n];
//!
//! multiply(&a, &b, &mut c, n).unwrap();
//! assert!(c.iter().all(|&x| x == 128.0));
//! ```
//!
//! Sizes must be powers of two and at least [`LEAF_SIZE`]:
//!
//! ```
//! use morton_matmul::{MatmulError, multiply};
//!
//! let mut c = vec![0.0; 100];
//! let err = multiply(&[0.0; 100], &[0.0; 100], &mut c, 10).unwrap_err();
//! assert!(matches!(err, MatmulError::NotPowerOfTwo { n: 10 }));
//! ```
//!
//! ## What's inside
//!
//! - `morton`: Morton buffers, views and the recursive layout transforms
//! - `kernels`: scalar and AVX2 leaf kernels
//! - `threaded`: the two-round fork-join recursion
//! - `matrix`: naive reference multiply, relative-error check, input generator

pub mod config;
pub mod driver;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod morton;
pub mod options;
pub mod threaded;
pub mod timing;

pub use error::{MatmulError, Result};
pub use kernels::LeafKernel;
pub use matrix::compare::{EPSILON, compare};
pub use matrix::naive_ijk::matmul_naive_ijk;
pub use morton::{MortonBuffer, QuadrantOrder};
pub use threaded::{Schedule, multiply_morton};

use error::{validate_len, validate_size};

/// Side of a Morton leaf block.
pub const LEAF_SIZE: usize = 8;

/// Knobs for [`multiply_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiplyOptions {
    pub leaf_size: usize,
    pub schedule: Schedule,
    /// `None` picks the fastest kernel the CPU supports.
    pub kernel: Option<LeafKernel>,
}

impl Default for MultiplyOptions {
    fn default() -> Self {
        Self {
            leaf_size: LEAF_SIZE,
            schedule: Schedule::Parallel,
            kernel: None,
        }
    }
}

/// Matrix multiply: C = A × B
///
/// All three are `n × n`, row-major. `n` must be a power of two and at
/// least [`LEAF_SIZE`]. Runs on the current rayon pool.
pub fn multiply(a: &[f64], b: &[f64], c: &mut [f64], n: usize) -> Result<()> {
    multiply_with(a, b, c, n, &MultiplyOptions::default())
}

/// Same as [`multiply`] with explicit leaf size, schedule and kernel.
///
/// A forced kernel that can't run the chosen leaf size on this CPU is
/// rejected with [`MatmulError::UnsupportedKernel`].
///
/// Allocates three Morton buffers of `n²` elements, converts A and B,
/// multiplies into a zeroed C buffer and writes the product into `c`,
/// overwriting whatever was there.
pub fn multiply_with(
    a: &[f64],
    b: &[f64],
    c: &mut [f64],
    n: usize,
    options: &MultiplyOptions,
) -> Result<()> {
    let leaf = options.leaf_size;
    validate_size(n, leaf)?;
    validate_len("A", a, n)?;
    validate_len("B", b, n)?;
    validate_len("C", c, n)?;

    let kernel = options.kernel.unwrap_or_else(|| LeafKernel::detect(leaf));
    if !kernel.supports(leaf) {
        return Err(MatmulError::UnsupportedKernel { kernel, leaf });
    }

    let a_morton = MortonBuffer::from_row_major(a, n, leaf, QuadrantOrder::RowFirst)?;
    let b_morton = MortonBuffer::from_row_major(b, n, leaf, QuadrantOrder::ColumnFirst)?;
    let mut c_morton = MortonBuffer::zeroed(n, leaf, QuadrantOrder::RowFirst)?;

    multiply_morton(&a_morton, &b_morton, &mut c_morton, kernel, options.schedule)?;

    c_morton.write_row_major(c)
}
