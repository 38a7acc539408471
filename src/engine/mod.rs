//! The decision engine: gathers forecasts from the predictor set,
//! blends them into one opponent distribution, adjusts payoffs for
//! threat, and commits a move under the exploration and defensive
//! policies. one cyclic pass per turn.

mod blend;
mod config;
mod decision;
mod engine;
mod phase;
mod risk;

pub use blend::*;
pub use config::*;
pub use decision::*;
pub use engine::*;
pub use phase::*;
pub use risk::*;
