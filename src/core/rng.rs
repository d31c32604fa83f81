//! RNG module - deterministic seeded randomness
//!
//! A simple LCG (Numerical Recipes constants) drives refill colors,
//! promotion placement, and row/column orientation choices. Seeding it
//! from the level config makes whole games reproducible, which the tests
//! lean on heavily.

/// Simple LCG (Linear Congruential Generator) RNG.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32.
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod 2^32, a=1664525, c=1013904223
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max).
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Uniformly random index into a slice of the given length.
    /// Length must be nonzero.
    pub fn pick_index(&mut self, len: usize) -> usize {
        self.next_range(len as u32) as usize
    }

    /// Current internal state (for restarting with the same sequence).
    pub fn state(&self) -> u32 {
        self.state
    }
}
