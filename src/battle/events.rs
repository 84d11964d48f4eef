//! Battle Events
//!
//! Everything the rendering layer needs to animate, in the order it
//! happened. Sessions and waiting rooms buffer these until drained with
//! `take_events()`.

use serde::{Serialize, Deserialize};

use crate::battle::session::BattlePhase;
use crate::battle::state::ParticipantId;

/// Event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleEventData {
    /// A participant became ready in the waiting room.
    ParticipantReady {
        /// Who.
        participant_id: ParticipantId,
    },

    /// Waiting-room countdown second.
    WaitingCountdown {
        /// Seconds left.
        remaining: u32,
    },

    /// Waiting-room countdown reached zero.
    WaitingCountdownExpired,

    /// Everyone is ready; the battle starts after the start delay.
    AllReady,

    /// Waiting room closed and the battle begins.
    BattleBegins,

    /// Waiting room was abandoned.
    WaitingCancelled,

    /// Session phase changed.
    PhaseChanged {
        /// Previous phase.
        from: BattlePhase,
        /// New phase.
        to: BattlePhase,
    },

    /// A question opened.
    QuestionStarted {
        /// Question index.
        question_index: usize,
        /// Seconds on the clock.
        time_limit: u32,
    },

    /// Question countdown second.
    TimerTick {
        /// Seconds left.
        remaining: u32,
    },

    /// The question was answered or timed out.
    AnswerResolved {
        /// Question index.
        question_index: usize,
        /// Option picked, `None` on timeout.
        selected: Option<usize>,
        /// Index of the right option.
        correct_index: usize,
        /// Whether the pick was right.
        correct: bool,
        /// Points awarded.
        points: u32,
        /// Score after this question.
        score: u32,
    },

    /// A participant moved along the race track.
    ParticipantProgressed {
        /// Who.
        participant_id: ParticipantId,
        /// New progress.
        progress: u32,
    },

    /// The last question was resolved and opponent scores are in.
    BattleCompleted {
        /// Final human score.
        score: u32,
        /// Correct answers.
        correct_count: usize,
    },
}

/// An event stamped with the virtual time it happened at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleEvent {
    /// Virtual time (ms) on the emitting component's clock.
    pub at_ms: u64,
    /// Event data.
    pub data: BattleEventData,
}

impl BattleEvent {
    /// Create a new event.
    pub fn new(at_ms: u64, data: BattleEventData) -> Self {
        Self { at_ms, data }
    }
}
