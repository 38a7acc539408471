//! Best-effort persistence of opponent profiles to local disk. always
//! out-of-band: a missing or unwritable stash never blocks a decision.

mod stash;

pub use stash::*;
