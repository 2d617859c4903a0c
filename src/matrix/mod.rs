//! Row-major helpers: the naive reference multiply, the relative-error
//! check and the deterministic input generator.
//!
//! None of this is on the fast path. It exists to produce inputs and to
//! verify the Morton multiply against a product that is obviously right.

pub mod compare;
pub mod naive_ijk;
pub mod random;
