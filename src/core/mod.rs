//! Core deterministic primitives.
//!
//! Everything here is free of wall-clock time and OS randomness, so a battle
//! driven through these types can be replayed exactly.

pub mod rng;
pub mod hash;
pub mod schedule;

// Re-export core types
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash};
pub use schedule::{Epoch, Scheduler};
