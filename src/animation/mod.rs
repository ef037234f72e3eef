//! Frame timing for the spinning tree
//!
//! Turns per-frame deltas (or raw animation-frame timestamps) into the single
//! global rotation angle applied at the root of the hierarchy.

mod clock;

pub use clock::{FrameClock, SPIN_RATE, TIMESTAMP_SCALE};
