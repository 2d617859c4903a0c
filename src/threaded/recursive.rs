//! Recursive divide-and-conquer multiply over Morton views.

use crate::error::{MatmulError, Result};
use crate::kernels::LeafKernel;
use crate::morton::{MortonBuffer, MortonView, MortonViewMut, QuadrantOrder};

use super::Schedule;

/// C += A × B over Morton views of equal width.
///
/// `a` and `c` must be row-first views, `b` a column-first view. At a leaf
/// the kernel runs directly. Otherwise each operand is cut into logical
/// quadrants and the 2×2 block identity
///
/// ```text
/// C1 = A1·B1 + A2·B3    C2 = A1·B2 + A2·B4
/// C3 = A3·B1 + A4·B3    C4 = A3·B2 + A4·B4
/// ```
///
/// is evaluated in two rounds. Each round is four independent products
/// writing to four different C quadrants; the join after round one keeps
/// round two from accumulating into a quadrant that is still being
/// written.
pub fn multiply_recursive(
    a: MortonView<'_>,
    b: MortonView<'_>,
    mut c: MortonViewMut<'_>,
    leaf: usize,
    kernel: LeafKernel,
    schedule: Schedule,
) {
    let n = a.width();
    debug_assert_eq!(b.width(), n);
    debug_assert_eq!(c.width(), n);

    if n <= leaf {
        kernel.run(c.as_mut_slice(), a.as_slice(), b.as_slice(), n);
        return;
    }

    log::trace!("multiply_recursive: n={n}");

    let [a1, a2, a3, a4] = a.quadrants();
    let [b1, b2, b3, b4] = b.quadrants();
    let [mut c1, mut c2, mut c3, mut c4] = c.into_quadrants();

    schedule.join4(
        || multiply_recursive(a1, b1, c1.reborrow(), leaf, kernel, schedule),
        || multiply_recursive(a1, b2, c2.reborrow(), leaf, kernel, schedule),
        || multiply_recursive(a3, b1, c3.reborrow(), leaf, kernel, schedule),
        || multiply_recursive(a3, b2, c4.reborrow(), leaf, kernel, schedule),
    );

    schedule.join4(
        || multiply_recursive(a2, b3, c1, leaf, kernel, schedule),
        || multiply_recursive(a2, b4, c2, leaf, kernel, schedule),
        || multiply_recursive(a4, b3, c3, leaf, kernel, schedule),
        || multiply_recursive(a4, b4, c4, leaf, kernel, schedule),
    );
}

/// C += A × B on whole Morton buffers.
///
/// Checks that A and C are row-first, B is column-first, and all three
/// share width and leaf size, and that `kernel` can run the leaf size.
/// C is not cleared: start from
/// [`MortonBuffer::zeroed`] to get a plain product.
pub fn multiply_morton(
    a: &MortonBuffer,
    b: &MortonBuffer,
    c: &mut MortonBuffer,
    kernel: LeafKernel,
    schedule: Schedule,
) -> Result<()> {
    let n = a.width();
    let leaf = a.leaf_size();
    a.expect_role("A", QuadrantOrder::RowFirst, n, leaf)?;
    b.expect_role("B", QuadrantOrder::ColumnFirst, n, leaf)?;
    c.expect_role("C", QuadrantOrder::RowFirst, n, leaf)?;
    if !kernel.supports(leaf) {
        return Err(MatmulError::UnsupportedKernel { kernel, leaf });
    }

    log::debug!("multiply_morton: n={n}, leaf={leaf}, kernel={kernel:?}, schedule={schedule:?}");
    multiply_recursive(a.view(), b.view(), c.view_mut(), leaf, kernel, schedule);
    Ok(())
}
