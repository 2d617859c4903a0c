//! Recursive row-major <-> Morton conversion.

use super::QuadrantOrder;

/// A square window of a row-major matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub row: usize,
    pub col: usize,
    pub width: usize,
}

impl Region {
    pub fn whole(width: usize) -> Self {
        Self {
            row: 0,
            col: 0,
            width,
        }
    }

    fn quarters(self, order: QuadrantOrder) -> [Region; 4] {
        let half = self.width / 2;
        order.storage_order().map(|q| {
            let (dr, dc) = q.offset(half);
            Region {
                row: self.row + dr,
                col: self.col + dc,
                width: half,
            }
        })
    }
}

fn split_quarters(z: &mut [f64]) -> [&mut [f64]; 4] {
    let fourth = z.len() / 4;
    let (lo, hi) = z.split_at_mut(2 * fourth);
    let (q0, q1) = lo.split_at_mut(fourth);
    let (q2, q3) = hi.split_at_mut(fourth);
    [q0, q1, q2, q3]
}

/// Copies `region` of the row-major matrix `src` (row stride `stride`) into
/// the Morton block `z_dest`.
///
/// `z_dest` must hold exactly `region.width²` elements. Quarters are filled
/// in `order`'s storage order until the region shrinks to `leaf`, where the
/// leaf is copied densely (row by row for `RowFirst`, column by column for
/// `ColumnFirst`).
pub fn to_morton(
    src: &[f64],
    stride: usize,
    z_dest: &mut [f64],
    region: Region,
    leaf: usize,
    order: QuadrantOrder,
) {
    debug_assert_eq!(z_dest.len(), region.width * region.width);

    if region.width == leaf {
        for r in 0..leaf {
            let src_row = &src[(region.row + r) * stride + region.col..][..leaf];
            for (c, &value) in src_row.iter().enumerate() {
                z_dest[order.leaf_index(r, c, leaf)] = value;
            }
        }
        return;
    }

    for (quarter, sub) in split_quarters(z_dest)
        .into_iter()
        .zip(region.quarters(order))
    {
        to_morton(src, stride, quarter, sub, leaf, order);
    }
}

/// Inverse of [`to_morton`]: copies the Morton block `z_src` back into
/// `region` of the row-major matrix `dst`.
pub fn from_morton(
    z_src: &[f64],
    dst: &mut [f64],
    stride: usize,
    region: Region,
    leaf: usize,
    order: QuadrantOrder,
) {
    debug_assert_eq!(z_src.len(), region.width * region.width);

    if region.width == leaf {
        for r in 0..leaf {
            let dst_row = &mut dst[(region.row + r) * stride + region.col..][..leaf];
            for (c, slot) in dst_row.iter_mut().enumerate() {
                *slot = z_src[order.leaf_index(r, c, leaf)];
            }
        }
        return;
    }

    let fourth = z_src.len() / 4;
    for (quarter, sub) in z_src.chunks_exact(fourth).zip(region.quarters(order)) {
        from_morton(quarter, dst, stride, sub, leaf, order);
    }
}
