//! Fork-join execution of the recursive Morton multiply.
//!
//! Every recursion level forks four independent quadrant products, joins,
//! forks the next four and joins again. The forks go to rayon's
//! work-stealing pool (whichever pool the caller is running in); the C
//! quadrants handed to one round are disjoint `&mut` slices, so no locking
//! is needed.

pub mod recursive;

pub use recursive::{multiply_morton, multiply_recursive};

/// How the four tasks of a round are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schedule {
    /// Fork on the current rayon pool and join.
    #[default]
    Parallel,
    /// Run the tasks one after another on the calling thread.
    Sequential,
}

impl Schedule {
    /// Runs four tasks and returns once all of them have finished.
    pub fn join4<A, B, C, D>(self, a: A, b: B, c: C, d: D)
    where
        A: FnOnce() + Send,
        B: FnOnce() + Send,
        C: FnOnce() + Send,
        D: FnOnce() + Send,
    {
        match self {
            Schedule::Parallel => {
                rayon::join(|| rayon::join(a, b), || rayon::join(c, d));
            }
            Schedule::Sequential => {
                a();
                b();
                c();
                d();
            }
        }
    }
}
