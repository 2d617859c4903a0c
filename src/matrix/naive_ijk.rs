/// Reference matrix multiplication using i-j-k loop order: C = A × B.
///
/// The textbook triple loop over `n × n` row-major matrices. The inner
/// loop walks B with stride `n`, so this is slow on large inputs; it only
/// exists to check the Morton multiply against.
///
/// Unlike the Morton path this assigns C rather than accumulating into it.
///
/// # Arguments
///
/// * `a` - Matrix A (n × n), row-major
/// * `b` - Matrix B (n × n), row-major
/// * `c` - Matrix C (n × n), row-major, overwritten with A × B
/// * `n` - Side length
pub fn matmul_naive_ijk(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    for i in 0..n {
        for j in 0..n {
            let mut s = 0.0;
            for k in 0..n {
                s += a[i * n + k] * b[k * n + j];
            }
            c[i * n + j] = s;
        }
    }
}
