//! Probability machinery over the three-move simplex.

mod density;
mod dist;

pub use density::*;
pub use dist::*;
