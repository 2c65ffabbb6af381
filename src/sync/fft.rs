//! Superseded by the crate-wide [`crate::fft`] plan cache; kept as a thin
//! re-export until the final trim pass removes this module entirely.

pub use crate::fft::*;
