/*

    Responsible for creating a struct that represents
    ranges from a to b and functionality to check if
    x is in range [a,b].

    See also associated constants of Interval class:
    - EMPTY: (inf, -inf)
    - UNIVERSE: (-inf, inf)

    @author: Bartu
    @date: Sept 2025

*/

use crate::numeric::{Float};

#[derive(Debug, Clone, Copy)]
pub struct Interval {
    pub min: Float,
    pub max: Float,
}

impl Interval {

    pub const EMPTY: Self = Self {
        min: Float::INFINITY,
        max: Float::NEG_INFINITY,
    };

    pub const UNIVERSE: Self = Self {
        min: Float::NEG_INFINITY,
        max: Float::INFINITY,
    };

    pub fn validate(&self) -> bool {
        self.max >= self.min
    }

    pub fn new(min: Float, max: Float) -> Self {
        Self {
            min,
            max,
        }
    }

    pub fn size(&self) -> Float {
        self.max - self.min
    }

    pub fn contains(&self, x: Float) -> bool {
        self.min <= x && x <= self.max
    }

    pub fn expand(&mut self, x: Float) {
        if x < self.min { self.min = x; }
        if x > self.max { self.max = x; }
    }

    /// Shrink self to the overlap with other. The result may be
    /// invalid (max < min), which callers check via validate().
    pub fn clip(&mut self, other: &Interval) {
        if other.min > self.min { self.min = other.min; }
        if other.max < self.max { self.max = other.max; }
    }

}
