//! Patterns one level above individual turns: behavioral chains across
//! completed episodes, and mutual-adaptation loops inside the recent
//! turn window.

mod adaptation;
mod episodes;

pub use adaptation::*;
pub use episodes::*;
