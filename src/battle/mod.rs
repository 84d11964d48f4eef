//! Battle Logic Module
//!
//! Everything that decides what happens in a battle. Driven by virtual time,
//! so the same inputs always produce the same battle.
//!
//! ## Module Structure
//!
//! - `question`: Quiz items and the question bank
//! - `config`: Battle config and tunable settings
//! - `state`: Participants and the battle aggregate
//! - `timer`: Whole-second countdowns
//! - `feed`: Opponent behaviour
//! - `scoring`: Points, accuracy and ranking
//! - `session`: Per-question state machine
//! - `waiting_room`: Pre-battle lobby
//! - `results`: End-of-battle report
//! - `flow`: Screen sequencing
//! - `replay`: Transcripts and deterministic replay
//! - `events`: Events for the rendering layer

pub mod question;
pub mod config;
pub mod state;
pub mod timer;
pub mod feed;
pub mod scoring;
pub mod session;
pub mod waiting_room;
pub mod results;
pub mod flow;
pub mod replay;
pub mod events;

// Re-export key types
pub use question::{QuestionBank, QuizItem, Subject};
pub use config::{BattleConfig, BattleSettings, BattleMode, ArenaType, ConfigError};
pub use state::{BattleState, Participant, ParticipantId};
pub use feed::{ParticipantFeed, RandomFeed, ScriptedFeed, FeedTuning};
pub use session::{BattleSession, BattlePhase, BattleId, SubmitOutcome};
pub use waiting_room::{WaitingRoom, ReadinessSnapshot};
pub use results::{BattleResults, OutcomeTier};
pub use flow::{BattleFlow, Screen, FlowError};
pub use replay::{BattleTranscript, ReplayError};
pub use events::{BattleEvent, BattleEventData};
