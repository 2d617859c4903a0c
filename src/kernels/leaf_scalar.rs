//! Portable leaf kernel.

/// Computes one leaf: C += A × B for `width × width` blocks in Morton
/// leaf layout.
///
/// `a` and `c` are row-major leaves, `b` is a column-major leaf, so row `i`
/// of A is `a[i*width..][..width]` and column `j` of B is
/// `b[j*width..][..width]`. Both inner-product operands are walked with
/// stride 1.
///
/// C is accumulated into, never cleared.
pub fn multiply_accumulate_leaf(c: &mut [f64], a: &[f64], b: &[f64], width: usize) {
    debug_assert_eq!(a.len(), width * width);
    debug_assert_eq!(b.len(), width * width);
    debug_assert_eq!(c.len(), width * width);

    for (a_row, c_row) in a.chunks_exact(width).zip(c.chunks_exact_mut(width)) {
        for (b_col, c_ij) in b.chunks_exact(width).zip(c_row.iter_mut()) {
            let mut s = 0.0;
            for k in 0..width {
                s += a_row[k] * b_col[k];
            }
            *c_ij += s;
        }
    }
}
