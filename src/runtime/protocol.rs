//! Protocol Messages
//!
//! What a front end sends to the runtime and what it gets back.
//! All messages are serialized as JSON.

use serde::{Serialize, Deserialize};

use crate::battle::config::BattleConfig;
use crate::battle::events::BattleEvent;
use crate::battle::flow::{BattleFlow, Screen};
use crate::battle::results::BattleResults;
use crate::battle::session::BattlePhase;
use crate::battle::state::Participant;
use crate::battle::waiting_room::ReadinessSnapshot;

// =============================================================================
// FRONT END -> RUNTIME
// =============================================================================

/// Commands from the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerCommand {
    /// Go to the setup screen.
    OpenSetup,

    /// Confirm setup.
    StartBattle {
        /// Battle to start.
        config: BattleConfig,
    },

    /// Ready in the waiting room.
    MarkReady,

    /// Leave the waiting room.
    CancelWaiting,

    /// Answer the open question.
    SubmitAnswer {
        /// Option picked.
        index: usize,
    },

    /// Play again with the same config.
    Rematch,

    /// Back to the hub.
    Home,
}

impl PlayerCommand {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

// =============================================================================
// RUNTIME -> FRONT END
// =============================================================================

/// The battle screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleView {
    /// Session phase.
    pub phase: BattlePhase,
    /// 0-based index of the current question.
    pub question_index: usize,
    /// Questions in the battle.
    pub question_count: usize,
    /// Question text, absent once complete.
    pub question: Option<String>,
    /// Answer options.
    pub options: Vec<String>,
    /// Seconds left.
    pub time_remaining: u32,
    /// Human score.
    pub score: u32,
    /// Per-question correctness so far.
    pub answers: Vec<bool>,
    /// Race track.
    pub participants: Vec<Participant>,
}

/// Snapshot pushed to the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewUpdate {
    /// Screen to show.
    pub screen: Screen,
    /// Battle screen contents.
    pub battle: Option<BattleView>,
    /// Lobby contents.
    pub waiting: Option<ReadinessSnapshot>,
    /// Results screen contents.
    pub results: Option<BattleResults>,
    /// Events since the previous update.
    pub events: Vec<BattleEvent>,
    /// Why the last command was refused.
    pub error: Option<String>,
}

impl ViewUpdate {
    /// Snapshot `flow`, draining its events.
    pub fn capture(flow: &mut BattleFlow) -> Self {
        let screen = flow.screen();

        let battle = match screen {
            Screen::Battle => flow.session().map(|session| {
                let state = session.state();
                let question = session.current_question();
                BattleView {
                    phase: session.phase(),
                    question_index: state.current_question_index(),
                    question_count: session.question_count(),
                    question: question.map(|q| q.question.clone()),
                    options: question.map(|q| q.options.to_vec()).unwrap_or_default(),
                    time_remaining: session.time_remaining(),
                    score: state.score(),
                    answers: state.answers().to_vec(),
                    participants: state.participants().to_vec(),
                }
            }),
            _ => None,
        };

        let waiting = match screen {
            Screen::WaitingRoom => flow.room().map(|room| room.readiness()),
            _ => None,
        };

        let results = match screen {
            Screen::Results => flow.results(),
            _ => None,
        };

        Self {
            screen,
            battle,
            waiting,
            results,
            events: flow.take_events(),
            error: None,
        }
    }

    /// Attach a refusal reason.
    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Whether anything worth sending changed.
    pub fn has_news(&self) -> bool {
        !self.events.is_empty() || self.error.is_some()
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
