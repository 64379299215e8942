
pub mod axis;
pub mod bbox;
pub mod clipping;
pub mod error;
pub mod geometry;
pub mod interval;
pub mod kdtree;
pub mod numeric;
pub mod prelude;
pub mod ray;
pub mod shapes;
pub mod acceleration;
pub mod sah;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::acceleration::{Accelerator, build_median, build_sah, nearest_brute_force};
pub use crate::{kdtree::KdTree, sah::SahTree};
