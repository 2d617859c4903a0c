//! Morton (Z-order) storage for square matrices.
//!
//! A `width × width` block is stored as four contiguous quarters, each a
//! `width/2 × width/2` block stored the same way, down to `leaf × leaf`
//! blocks that are stored densely. The order the quarters are laid out in,
//! and the order inside a leaf, depends on the role of the operand:
//!
//! - [`QuadrantOrder::RowFirst`]: TL, TR, BL, BR with row-major leaves.
//!   Used for the left operand and the result.
//! - [`QuadrantOrder::ColumnFirst`]: TL, BL, TR, BR with column-major
//!   leaves. Used for the right operand.
//!
//! With this pairing a row of an A leaf and a column of a B leaf are both
//! contiguous, so the leaf kernel walks both with stride 1.

pub mod layout;

use crate::error::{MatmulError, Result, validate_len, validate_size};
pub use layout::{Region, from_morton, to_morton};

/// Storage order of the four quarters of every block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadrantOrder {
    RowFirst,
    ColumnFirst,
}

/// One of the four logical sub-blocks of a square block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// Row and column offset of this quadrant inside a block whose
    /// quadrants have side `half`.
    pub fn offset(self, half: usize) -> (usize, usize) {
        match self {
            Quadrant::TopLeft => (0, 0),
            Quadrant::TopRight => (0, half),
            Quadrant::BottomLeft => (half, 0),
            Quadrant::BottomRight => (half, half),
        }
    }
}

impl QuadrantOrder {
    /// Quadrants in the order their quarters appear in storage.
    pub fn storage_order(self) -> [Quadrant; 4] {
        use Quadrant::*;
        match self {
            QuadrantOrder::RowFirst => [TopLeft, TopRight, BottomLeft, BottomRight],
            QuadrantOrder::ColumnFirst => [TopLeft, BottomLeft, TopRight, BottomRight],
        }
    }

    /// Offset of element (row, col) inside a dense leaf of side `leaf`.
    #[inline]
    pub fn leaf_index(self, row: usize, col: usize, leaf: usize) -> usize {
        match self {
            QuadrantOrder::RowFirst => row * leaf + col,
            QuadrantOrder::ColumnFirst => col * leaf + row,
        }
    }

    /// Reorders quarters given in storage order into logical TL, TR, BL, BR.
    #[inline]
    fn to_logical<T>(self, [q0, q1, q2, q3]: [T; 4]) -> [T; 4] {
        match self {
            QuadrantOrder::RowFirst => [q0, q1, q2, q3],
            QuadrantOrder::ColumnFirst => [q0, q2, q1, q3],
        }
    }
}

/// An `n × n` matrix held in Morton order.
///
/// Owns its storage. Allocated once per top-level multiply and dropped
/// with it.
#[derive(Debug, Clone, PartialEq)]
pub struct MortonBuffer {
    data: Vec<f64>,
    width: usize,
    leaf: usize,
    order: QuadrantOrder,
}

impl MortonBuffer {
    /// All-zero buffer, ready to accumulate into.
    pub fn zeroed(width: usize, leaf: usize, order: QuadrantOrder) -> Result<Self> {
        validate_size(width, leaf)?;
        Ok(Self {
            data: vec![0.0; width * width],
            width,
            leaf,
            order,
        })
    }

    /// Converts a row-major `width × width` matrix into Morton order.
    pub fn from_row_major(
        src: &[f64],
        width: usize,
        leaf: usize,
        order: QuadrantOrder,
    ) -> Result<Self> {
        validate_size(width, leaf)?;
        validate_len("source", src, width)?;

        let mut data = vec![0.0; width * width];
        to_morton(src, width, &mut data, Region::whole(width), leaf, order);
        log::debug!("to_morton: width={width}, leaf={leaf}, order={order:?}");

        Ok(Self {
            data,
            width,
            leaf,
            order,
        })
    }

    /// Writes the matrix back out in row-major order into `dst`.
    pub fn write_row_major(&self, dst: &mut [f64]) -> Result<()> {
        validate_len("destination", dst, self.width)?;
        from_morton(
            &self.data,
            dst,
            self.width,
            Region::whole(self.width),
            self.leaf,
            self.order,
        );
        log::debug!("from_morton: width={}, order={:?}", self.width, self.order);
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn leaf_size(&self) -> usize {
        self.leaf
    }

    pub fn order(&self) -> QuadrantOrder {
        self.order
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    pub fn view(&self) -> MortonView<'_> {
        MortonView {
            data: &self.data,
            width: self.width,
            order: self.order,
        }
    }

    pub fn view_mut(&mut self) -> MortonViewMut<'_> {
        MortonViewMut {
            data: &mut self.data,
            width: self.width,
            order: self.order,
        }
    }

    /// Checks that this buffer can play `operand` in an `n × n` multiply
    /// with the given leaf size.
    pub(crate) fn expect_role(
        &self,
        operand: &'static str,
        order: QuadrantOrder,
        width: usize,
        leaf: usize,
    ) -> Result<()> {
        if self.order != order {
            return Err(MatmulError::OrderMismatch {
                operand,
                expected: order,
                got: self.order,
            });
        }
        if self.width != width || self.leaf != leaf {
            return Err(MatmulError::ShapeMismatch {
                operand,
                expected: width,
                leaf,
                got: self.width,
                got_leaf: self.leaf,
            });
        }
        Ok(())
    }
}

/// Read-only view of one square block inside a Morton buffer.
///
/// The slice is the (offset, extent) window of the block within the
/// backing buffer: a block of side `w` is always exactly `w * w`
/// contiguous elements.
#[derive(Debug, Clone, Copy)]
pub struct MortonView<'a> {
    data: &'a [f64],
    width: usize,
    order: QuadrantOrder,
}

impl<'a> MortonView<'a> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    /// The four sub-blocks in logical order TL, TR, BL, BR.
    pub fn quadrants(self) -> [MortonView<'a>; 4] {
        let fourth = self.data.len() / 4;
        let (lo, hi) = self.data.split_at(2 * fourth);
        let (q0, q1) = lo.split_at(fourth);
        let (q2, q3) = hi.split_at(fourth);

        let half = self.width / 2;
        let order = self.order;
        order
            .to_logical([q0, q1, q2, q3])
            .map(|data| MortonView { data, width: half, order })
    }
}

/// Mutable view of one square block inside a Morton buffer.
///
/// Quadrants are carved out with `split_at_mut`, so two views handed to
/// concurrent tasks can never overlap.
#[derive(Debug)]
pub struct MortonViewMut<'a> {
    data: &'a mut [f64],
    width: usize,
    order: QuadrantOrder,
}

impl<'a> MortonViewMut<'a> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut *self.data
    }

    /// Shorter-lived view of the same block.
    pub fn reborrow(&mut self) -> MortonViewMut<'_> {
        MortonViewMut {
            data: &mut *self.data,
            width: self.width,
            order: self.order,
        }
    }

    /// The four sub-blocks in logical order TL, TR, BL, BR.
    pub fn into_quadrants(self) -> [MortonViewMut<'a>; 4] {
        let fourth = self.data.len() / 4;
        let (lo, hi) = self.data.split_at_mut(2 * fourth);
        let (q0, q1) = lo.split_at_mut(fourth);
        let (q2, q3) = hi.split_at_mut(fourth);

        let half = self.width / 2;
        let order = self.order;
        order
            .to_logical([q0, q1, q2, q3])
            .map(|data| MortonViewMut { data, width: half, order })
    }
}
