//! Scoring Engine
//!
//! Points per answer, end-of-battle accuracy and the final ranking.

use serde::{Serialize, Deserialize};

use crate::battle::state::{AnswerRecord, ParticipantId};

/// Base points per difficulty level.
pub const POINTS_PER_DIFFICULTY: u32 = 10;

/// Bonus for answering with the full time left.
pub const MAX_TIME_BONUS: u32 = 10;

/// Points awarded for one question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerScore {
    /// Whether the answer was right.
    pub correct: bool,
    /// Points awarded.
    pub points: u32,
}

impl AnswerScore {
    /// Wrong answer or timeout.
    pub const MISS: AnswerScore = AnswerScore { correct: false, points: 0 };
}

/// Score an answer.
///
/// `selected` is `None` when the question timed out. A correct answer earns
/// `difficulty * 10` plus `floor(time_remaining / time_limit * 10)`.
pub fn score_answer(
    selected: Option<usize>,
    correct_index: usize,
    difficulty: u8,
    time_remaining: u32,
    time_limit: u32,
) -> AnswerScore {
    match selected {
        Some(index) if index == correct_index => AnswerScore {
            correct: true,
            points: difficulty as u32 * POINTS_PER_DIFFICULTY + time_bonus(time_remaining, time_limit),
        },
        _ => AnswerScore::MISS,
    }
}

/// `floor(time_remaining / time_limit * 10)`, in integer arithmetic.
pub fn time_bonus(time_remaining: u32, time_limit: u32) -> u32 {
    if time_limit == 0 {
        return 0;
    }
    let remaining = time_remaining.min(time_limit) as u64;
    (remaining * MAX_TIME_BONUS as u64 / time_limit as u64) as u32
}

/// `round(correct / total * 100)`, halves rounding up.
pub fn accuracy_percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct * 200 + total) / (total * 2)) as u32
}

/// Star rating shown on the results screen.
pub fn star_rating(accuracy_percent: u32) -> u8 {
    match accuracy_percent {
        90.. => 5,
        75..=89 => 4,
        60..=74 => 3,
        40..=59 => 2,
        _ => 1,
    }
}

/// Mean seconds spent per resolved question.
pub fn average_answer_secs(records: &[AnswerRecord], time_limit: u32) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let spent: u32 = records.iter()
        .map(|r| time_limit.saturating_sub(r.time_remaining))
        .sum();
    Some(spent as f64 / records.len() as f64)
}

// =============================================================================
// RANKING
// =============================================================================

/// A participant's final score, as input to ranking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Identifier.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Avatar glyph.
    pub avatar: String,
    /// Final score.
    pub score: u32,
}

/// A ranked participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based place.
    pub rank: usize,
    /// Identifier.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Avatar glyph.
    pub avatar: String,
    /// Final score.
    pub score: u32,
}

/// Rank entries by descending score.
///
/// Equal scores keep their input order, so whoever is listed first wins the
/// tie. Places are positional: a tie does not share a rank.
pub fn rank_standings(entries: Vec<ScoreEntry>) -> Vec<Standing> {
    let mut indexed: Vec<(usize, ScoreEntry)> = entries.into_iter().enumerate().collect();

    indexed.sort_by(|(ia, a), (ib, b)| b.score.cmp(&a.score).then(ia.cmp(ib)));

    indexed.into_iter()
        .enumerate()
        .map(|(place, (_, e))| Standing {
            rank: place + 1,
            id: e.id,
            name: e.name,
            avatar: e.avatar,
            score: e.score,
        })
        .collect()
}
