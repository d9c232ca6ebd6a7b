//! RNG module - color bag generation
//!
//! Implements a "bag" randomizer for pair colors: each bag contains every
//! primary color twice, shuffled. Draws come from the bag until it is empty,
//! then a new bag is shuffled.
//!
//! Also provides a simple LCG used for every other deterministic roll
//! (special assignment, encounter generation, particle lifetimes).

use crate::types::CellColor;

/// Colors per bag (each primary color twice)
pub const BAG_SIZE: usize = CellColor::PRIMARY.len() * 2;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }

    /// Generate a float uniformly in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits fit the f32 mantissa exactly.
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Generate a float uniformly in [lo, hi)
    pub fn next_f32_in(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// Pick an index according to integer weights. Returns 0 for an empty or all-zero table.
    pub fn pick_weighted(&mut self, weights: &[u32]) -> usize {
        let total: u32 = weights.iter().sum();
        if total == 0 {
            return 0;
        }
        let mut roll = self.next_range(total);
        for (i, &w) in weights.iter().enumerate() {
            if roll < w {
                return i;
            }
            roll -= w;
        }
        weights.len() - 1
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state (usable as a seed to reproduce the sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Color bag: every primary color twice per bag
#[derive(Debug, Clone)]
pub struct ColorBag {
    bag: [CellColor; BAG_SIZE],
    bag_index: usize,
    rng: SimpleRng,
}

impl ColorBag {
    /// Create a new bag with the given seed
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            bag: [CellColor::Empty; BAG_SIZE],
            bag_index: 0,
            rng: SimpleRng::new(seed),
        };
        bag.refill();
        bag
    }

    fn fresh_bag() -> [CellColor; BAG_SIZE] {
        let mut out = [CellColor::Empty; BAG_SIZE];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = CellColor::PRIMARY[i % CellColor::PRIMARY.len()];
        }
        out
    }

    /// Generate a new shuffled bag
    fn refill(&mut self) {
        self.bag = Self::fresh_bag();
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Draw the next color
    pub fn draw(&mut self) -> CellColor {
        if self.bag_index >= BAG_SIZE {
            self.refill();
        }

        let color = self.bag[self.bag_index];
        self.bag_index += 1;
        color
    }

    /// Colors still left in the current bag
    pub fn remaining(&self) -> &[CellColor] {
        &self.bag[self.bag_index..]
    }

    /// Get the current RNG state (for restarting with the same sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state
    }
}

impl Default for ColorBag {
    fn default() -> Self {
        Self::new(1)
    }
}
