//! # Quiz Battle Engine
//!
//! Timed multiple-choice battles against simulated opponents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      QUIZ BATTLE                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/              - Deterministic primitives               │
//! │  ├── rng.rs         - Deterministic Xorshift128+ PRNG        │
//! │  ├── hash.rs        - State hashing for verification         │
//! │  └── schedule.rs    - Virtual-time event queue with epochs   │
//! │                                                              │
//! │  battle/            - Battle logic (deterministic)           │
//! │  ├── question.rs    - Quiz items and question bank           │
//! │  ├── config.rs      - Battle config and settings             │
//! │  ├── state.rs       - Participants and battle state          │
//! │  ├── timer.rs       - Whole-second countdowns                │
//! │  ├── feed.rs        - Opponent behaviour                     │
//! │  ├── scoring.rs     - Points, accuracy, ranking              │
//! │  ├── session.rs     - Per-question state machine             │
//! │  ├── waiting_room.rs- Pre-battle lobby                       │
//! │  ├── results.rs     - End-of-battle report                   │
//! │  ├── flow.rs        - Screen sequencing                      │
//! │  └── replay.rs      - Transcripts and replay                 │
//! │                                                              │
//! │  runtime/           - Wall-clock driving (non-deterministic) │
//! │  ├── driver.rs      - Frame loop and command handling        │
//! │  └── protocol.rs    - Commands and view updates              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `battle/` modules never read the system clock:
//! - Time only moves when the owner calls `advance`
//! - All randomness from seeded Xorshift128+
//! - Every phase runs under an epoch; work from an older epoch is dropped
//!
//! Given the same seed and the same answer times, a battle produces
//! **identical results** and an identical state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod battle;
pub mod runtime;

// Re-export commonly used types
pub use core::rng::DeterministicRng;
pub use battle::flow::{BattleFlow, Screen};
pub use battle::session::{BattleSession, BattlePhase};
pub use battle::config::{BattleConfig, BattleSettings};
pub use battle::question::QuestionBank;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
