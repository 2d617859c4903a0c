//! Leaf kernels for the recursive multiply.
//!
//! The recursion bottoms out in one of these: a dense C += A × B over a
//! single Morton leaf, where A's rows and B's columns are contiguous.
//!
//! Available kernels:
//! - `leaf_scalar`: portable, any leaf width
//! - `leaf_avx2`: AVX2 + FMA, leaf width a multiple of 4

pub mod leaf_avx2;
pub mod leaf_scalar;

pub use leaf_scalar::multiply_accumulate_leaf;

/// Which leaf kernel the recursion calls.
///
/// Picked once per top-level multiply so the leaves don't repeat feature
/// detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKernel {
    Scalar,
    #[cfg(target_arch = "x86_64")]
    Avx2,
}

impl LeafKernel {
    /// Fastest kernel this CPU supports for leaves of side `leaf`.
    pub fn detect(leaf: usize) -> Self {
        #[cfg(target_arch = "x86_64")]
        if LeafKernel::Avx2.supports(leaf) {
            return LeafKernel::Avx2;
        }
        let _ = leaf;
        LeafKernel::Scalar
    }

    /// Whether this kernel can run leaves of side `leaf` on this CPU.
    pub fn supports(self, leaf: usize) -> bool {
        match self {
            LeafKernel::Scalar => true,
            #[cfg(target_arch = "x86_64")]
            LeafKernel::Avx2 => {
                leaf % 4 == 0 && is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma")
            }
        }
    }

    /// C += A × B on one leaf of side `width`.
    ///
    /// Falls back to the scalar kernel when this kernel can't run `width`
    /// or the slices are shorter than a full leaf.
    #[inline]
    pub fn run(self, c: &mut [f64], a: &[f64], b: &[f64], width: usize) {
        match self {
            #[cfg(target_arch = "x86_64")]
            LeafKernel::Avx2 if self.supports(width) && fits_leaf(c, a, b, width) => unsafe {
                leaf_avx2::multiply_accumulate_leaf_avx2(c, a, b, width)
            },
            _ => multiply_accumulate_leaf(c, a, b, width),
        }
    }
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn fits_leaf(c: &[f64], a: &[f64], b: &[f64], width: usize) -> bool {
    let len = width * width;
    a.len() == len && b.len() == len && c.len() == len
}
