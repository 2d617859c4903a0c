//! Elementwise relative-error comparison.

/// Largest relative error tolerated by [`compare`].
pub const EPSILON: f64 = 1.0e-6;

/// First element where two matrices disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub row: usize,
    pub col: usize,
    pub expected: f64,
    pub actual: f64,
    pub relative_error: f64,
}

/// `|expected - actual| / expected`.
///
/// The division is not guarded. A zero `expected` gives NaN when `actual`
/// is also zero (which never exceeds a tolerance) and infinity otherwise.
#[inline]
pub fn relative_error(expected: f64, actual: f64) -> f64 {
    (expected - actual).abs() / expected
}

/// Scans `n × n` row-major matrices for the first element whose relative
/// error exceeds `epsilon`.
pub fn first_mismatch(expected: &[f64], actual: &[f64], n: usize, epsilon: f64) -> Option<Mismatch> {
    let mut zero_refs = 0usize;
    let mut found = None;

    'rows: for i in 0..n {
        for j in 0..n {
            let e = expected[i * n + j];
            let a = actual[i * n + j];
            if e == 0.0 {
                zero_refs += 1;
            }
            let err = relative_error(e, a);
            if err > epsilon {
                found = Some(Mismatch {
                    row: i,
                    col: j,
                    expected: e,
                    actual: a,
                    relative_error: err,
                });
                break 'rows;
            }
        }
    }

    if zero_refs > 0 {
        log::warn!("compare: {zero_refs} reference element(s) are zero; relative error is undefined there");
    }
    found
}

/// True when every element of `actual` is within `epsilon` relative error
/// of `expected`.
pub fn compare(expected: &[f64], actual: &[f64], n: usize, epsilon: f64) -> bool {
    first_mismatch(expected, actual, n, epsilon).is_none()
}
