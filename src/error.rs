use thiserror::Error;

use crate::kernels::LeafKernel;
use crate::morton::QuadrantOrder;

#[derive(Error, Debug)]
pub enum MatmulError {
    #[error("matrix size {n} is not a power of two")]
    NotPowerOfTwo { n: usize },
    #[error("leaf size {leaf} must be a non-zero power of two")]
    InvalidLeafSize { leaf: usize },
    #[error("matrix size {n} is smaller than the leaf size {leaf}")]
    SmallerThanLeaf { n: usize, leaf: usize },
    #[error("{operand}: expected {expected} elements, got {got}")]
    LengthMismatch {
        operand: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{operand}: expected {expected:?} quadrant order, got {got:?}")]
    OrderMismatch {
        operand: &'static str,
        expected: QuadrantOrder,
        got: QuadrantOrder,
    },
    #[error("{operand}: expected {expected}x{expected} with leaf {leaf}, got {got}x{got} with leaf {got_leaf}")]
    ShapeMismatch {
        operand: &'static str,
        expected: usize,
        leaf: usize,
        got: usize,
        got_leaf: usize,
    },
    #[error("{kernel:?} kernel cannot run {leaf}x{leaf} leaves on this CPU")]
    UnsupportedKernel { kernel: LeafKernel, leaf: usize },
    #[error("matrix size {n} overflows the address space")]
    SizeOverflow { n: usize },
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("invalid value for {flag}: {value}")]
    InvalidArgument { flag: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, MatmulError>;

/// Checks the size preconditions shared by every entry point: `n` and
/// `leaf` are powers of two and `n >= leaf` (which makes `n` a multiple of
/// `leaf`).
pub fn validate_size(n: usize, leaf: usize) -> Result<()> {
    if leaf == 0 || !leaf.is_power_of_two() {
        return Err(MatmulError::InvalidLeafSize { leaf });
    }
    if !n.is_power_of_two() {
        return Err(MatmulError::NotPowerOfTwo { n });
    }
    if n < leaf {
        return Err(MatmulError::SmallerThanLeaf { n, leaf });
    }
    element_count(n)?;
    Ok(())
}

/// `n * n`, or `SizeOverflow` when that doesn't fit in a `usize`.
pub fn element_count(n: usize) -> Result<usize> {
    n.checked_mul(n).ok_or(MatmulError::SizeOverflow { n })
}

pub fn validate_len(operand: &'static str, buf: &[f64], n: usize) -> Result<()> {
    let expected = element_count(n)?;
    if buf.len() != expected {
        return Err(MatmulError::LengthMismatch {
            operand,
            expected,
            got: buf.len(),
        });
    }
    Ok(())
}
