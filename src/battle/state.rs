//! Battle State Definitions
//!
//! `BattleState` is the single mutable aggregate of a battle. Its fields are
//! readable by anyone holding a reference, but only the session controller
//! can change them, through the crate-private transitions below.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::battle::config::BattleConfig;
use crate::core::hash::{compute_state_hash, StateHash};

// =============================================================================
// PARTICIPANT ID
// =============================================================================

/// Identifier of a participant. The human player is always `"you"`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    /// Id of the human player.
    pub const HUMAN: &'static str = "you";

    /// The human player's id.
    pub fn human() -> Self {
        Self(Self::HUMAN.to_string())
    }

    /// Whether this is the human player.
    pub fn is_human(&self) -> bool {
        self.0 == Self::HUMAN
    }

    /// Borrow as str.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// PARTICIPANT
// =============================================================================

/// Friends list the setup screen picks opponents from: (id, name, avatar, online).
const FRIENDS: [(&str, &str, &str, bool); 6] = [
    ("1", "Budi", "👦", true),
    ("2", "Siti", "👧", true),
    ("3", "Andi", "🧑", false),
    ("4", "Dewi", "👩", true),
    ("5", "Rudi", "👨", true),
    ("6", "Maya", "👧", false),
];

/// Avatar for ids missing from the friends list.
const UNKNOWN_AVATAR: &str = "🙂";

/// Someone taking part in a battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Identifier.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Avatar glyph.
    pub avatar: String,
    /// Ready in the waiting room.
    pub ready: bool,
    /// Questions answered correctly so far (race track position).
    pub progress: u32,
}

impl Participant {
    /// The human player.
    pub fn human() -> Self {
        Self {
            id: ParticipantId::human(),
            name: "You".to_string(),
            avatar: "😊".to_string(),
            ready: false,
            progress: 0,
        }
    }

    /// A simulated opponent, named from the friends list when known.
    pub fn opponent(id: &str) -> Self {
        let (name, avatar) = FRIENDS.iter()
            .find(|(fid, ..)| *fid == id)
            .map(|(_, name, avatar, _)| (name.to_string(), avatar.to_string()))
            .unwrap_or_else(|| (id.to_string(), UNKNOWN_AVATAR.to_string()));

        Self {
            id: ParticipantId::from(id),
            name,
            avatar,
            ready: false,
            progress: 0,
        }
    }

    /// Whether this is the human player.
    pub fn is_human(&self) -> bool {
        self.id.is_human()
    }

    /// Whether `id` can be picked as an opponent. Ids outside the friends
    /// list are always available.
    pub fn is_available(id: &str) -> bool {
        FRIENDS.iter()
            .find(|(fid, ..)| *fid == id)
            .map_or(true, |(.., online)| *online)
    }

    /// Human first, then opponents in config order.
    pub fn roster(config: &BattleConfig) -> Vec<Participant> {
        std::iter::once(Participant::human())
            .chain(config.opponents.iter().map(|id| Participant::opponent(id)))
            .collect()
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// How one question was resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Question index.
    pub question_index: usize,
    /// Option picked, `None` on timeout.
    pub selected: Option<usize>,
    /// Whether the pick was right.
    pub correct: bool,
    /// Points awarded.
    pub points: u32,
    /// Seconds left on the clock when resolved.
    pub time_remaining: u32,
}

/// An opponent's score once the battle is over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentScore {
    /// Identifier.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Avatar glyph.
    pub avatar: String,
    /// Final score.
    pub score: u32,
}

// =============================================================================
// BATTLE STATE
// =============================================================================

/// Mutable aggregate of a running battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BattleState {
    config: BattleConfig,
    current_question_index: usize,
    score: u32,
    answers: Vec<bool>,
    opponent_final_scores: Vec<OpponentScore>,
    participants: Vec<Participant>,
    records: Vec<AnswerRecord>,
}

impl BattleState {
    /// Fresh state for a battle about to start.
    pub(crate) fn new(config: BattleConfig) -> Self {
        let participants = Participant::roster(&config);
        Self {
            config,
            current_question_index: 0,
            score: 0,
            answers: Vec::new(),
            opponent_final_scores: Vec::new(),
            participants,
            records: Vec::new(),
        }
    }

    /// Config in effect.
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// 0-based index of the current question.
    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    /// Human score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// One entry per resolved question.
    pub fn answers(&self) -> &[bool] {
        &self.answers
    }

    /// Opponent scores, empty until the battle completes.
    pub fn opponent_final_scores(&self) -> &[OpponentScore] {
        &self.opponent_final_scores
    }

    /// Human first, then opponents.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Detail of each resolved question.
    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    /// Number of correct answers.
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| **a).count()
    }

    /// Opponent ids in config order.
    pub fn opponent_ids(&self) -> Vec<ParticipantId> {
        self.participants.iter()
            .filter(|p| !p.is_human())
            .map(|p| p.id.clone())
            .collect()
    }

    /// Look up a participant.
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    pub(crate) fn record_answer(&mut self, record: AnswerRecord) {
        self.score += record.points;
        self.answers.push(record.correct);
        self.records.push(record);
    }

    pub(crate) fn advance_index(&mut self) {
        self.current_question_index += 1;
    }

    /// Returns the new progress, `None` for an unknown participant.
    pub(crate) fn bump_progress(&mut self, id: &ParticipantId) -> Option<u32> {
        let participant = self.participants.iter_mut().find(|p| &p.id == id)?;
        participant.progress += 1;
        Some(participant.progress)
    }

    pub(crate) fn set_opponent_scores(&mut self, scores: Vec<(ParticipantId, u32)>) {
        self.opponent_final_scores = scores.into_iter()
            .filter_map(|(id, score)| {
                let p = self.participant(&id)?;
                Some(OpponentScore {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    avatar: p.avatar.clone(),
                    score,
                })
            })
            .collect();
    }

    /// Compute hash of current state for replay verification.
    pub fn compute_hash(&self, now_ms: u64, seed: u64) -> StateHash {
        compute_state_hash(now_ms, seed, |hasher| {
            hasher.update_u32(self.current_question_index as u32);
            hasher.update_u32(self.score);

            hasher.update_u32(self.answers.len() as u32);
            for answer in &self.answers {
                hasher.update_bool(*answer);
            }

            for record in &self.records {
                hasher.update_u32(record.question_index as u32);
                hasher.update_u8(record.selected.map_or(u8::MAX, |s| s as u8));
                hasher.update_u32(record.points);
                hasher.update_u32(record.time_remaining);
            }

            for p in &self.participants {
                hasher.update_str(p.id.as_str());
                hasher.update_u32(p.progress);
            }

            for s in &self.opponent_final_scores {
                hasher.update_str(s.id.as_str());
                hasher.update_u32(s.score);
            }
        })
    }
}
