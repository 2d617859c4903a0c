//! Deterministic input generator.
//!
//! A 64-bit linear congruential generator with the classic
//! `1103515245 / 12345` constants. Same seed, same matrices, on every
//! platform.

/// Largest value [`CilkRand::next_value`] returns.
pub const RAND_MAX: u64 = 2_147_483_647;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CilkRand {
    state: u64,
}

impl CilkRand {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next value in `0..=RAND_MAX`.
    pub fn next_value(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (self.state >> 16) % (RAND_MAX + 1)
    }
}

/// Fills an `n × n` row-major matrix from `rng`, row by row.
pub fn fill_random(m: &mut [f64], n: usize, rng: &mut CilkRand) {
    for slot in m[..n * n].iter_mut() {
        *slot = rng.next_value() as f64;
    }
}

/// A freshly allocated `n × n` matrix filled by [`fill_random`].
pub fn random_matrix(n: usize, rng: &mut CilkRand) -> Vec<f64> {
    let mut m = vec![0.0; n * n];
    fill_random(&mut m, n, rng);
    m
}
