//! AVX2 leaf kernel.

/// AVX2 version of [`multiply_accumulate_leaf`](super::leaf_scalar::multiply_accumulate_leaf).
///
/// Each inner product keeps a 4-lane FMA accumulator running down the
/// contiguous A row and B column, then reduces it horizontally. The
/// summation order differs from the scalar kernel, so results agree only
/// to rounding.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2 and FMA (checked via `#[target_feature]`)
/// - `width` is a multiple of 4
/// - `a`, `b` and `c` each hold `width * width` elements
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2,fma")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn multiply_accumulate_leaf_avx2(c: &mut [f64], a: &[f64], b: &[f64], width: usize) {
    use std::arch::x86_64::*;

    debug_assert_eq!(width % 4, 0);
    debug_assert_eq!(a.len(), width * width);
    debug_assert_eq!(b.len(), width * width);
    debug_assert_eq!(c.len(), width * width);

    let mut lanes = [0.0f64; 4];

    for i in 0..width {
        let a_row = a.as_ptr().add(i * width);
        for j in 0..width {
            let b_col = b.as_ptr().add(j * width);

            let mut acc = _mm256_setzero_pd();
            for p in (0..width).step_by(4) {
                let a_vec = _mm256_loadu_pd(a_row.add(p));
                let b_vec = _mm256_loadu_pd(b_col.add(p));
                acc = _mm256_fmadd_pd(a_vec, b_vec, acc);
            }

            _mm256_storeu_pd(lanes.as_mut_ptr(), acc);
            c[i * width + j] += (lanes[0] + lanes[1]) + (lanes[2] + lanes[3]);
        }
    }
}
