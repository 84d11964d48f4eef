//! End-of-battle report.

use serde::{Serialize, Deserialize};

use crate::battle::scoring::{
    accuracy_percent, average_answer_secs, rank_standings, star_rating, ScoreEntry, Standing,
};
use crate::battle::state::BattleState;

/// Headline on the results screen, by the human's place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeTier {
    /// First place.
    Victory,
    /// Second place.
    GreatJob,
    /// Third place.
    GoodEffort,
    /// Anything lower.
    KeepTrying,
}

impl OutcomeTier {
    /// Tier for a 1-based place.
    pub fn from_rank(rank: usize) -> Self {
        match rank {
            1 => OutcomeTier::Victory,
            2 => OutcomeTier::GreatJob,
            3 => OutcomeTier::GoodEffort,
            _ => OutcomeTier::KeepTrying,
        }
    }

    /// Display text.
    pub fn headline(&self) -> &'static str {
        match self {
            OutcomeTier::Victory => "Victory!",
            OutcomeTier::GreatJob => "Great Job!",
            OutcomeTier::GoodEffort => "Good Effort!",
            OutcomeTier::KeepTrying => "Keep Trying!",
        }
    }
}

/// Final numbers for a finished battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleResults {
    /// Human score.
    pub score: u32,
    /// Correct answers.
    pub correct_count: usize,
    /// Questions in the battle.
    pub total_questions: usize,
    /// Rounded percentage of correct answers.
    pub accuracy_percent: u32,
    /// Mean seconds per question.
    pub average_answer_secs: Option<f64>,
    /// Everyone, best first.
    pub standings: Vec<Standing>,
    /// The human's place.
    pub your_rank: usize,
    /// 1 to 5.
    pub stars: u8,
    /// Headline.
    pub outcome: OutcomeTier,
}

impl BattleResults {
    /// Build the report from a completed battle's state.
    pub fn from_state(state: &BattleState, total_questions: usize, time_limit: u32) -> Self {
        let human = state.participants().iter().find(|p| p.is_human());

        // Human listed first so it wins ties
        let entries: Vec<ScoreEntry> = human
            .map(|p| ScoreEntry {
                id: p.id.clone(),
                name: p.name.clone(),
                avatar: p.avatar.clone(),
                score: state.score(),
            })
            .into_iter()
            .chain(state.opponent_final_scores().iter().map(|s| ScoreEntry {
                id: s.id.clone(),
                name: s.name.clone(),
                avatar: s.avatar.clone(),
                score: s.score,
            }))
            .collect();

        let standings = rank_standings(entries);
        let your_rank = standings.iter()
            .find(|s| s.id.is_human())
            .map_or(standings.len(), |s| s.rank);

        let correct_count = state.correct_count();
        let accuracy = accuracy_percent(correct_count, total_questions);

        Self {
            score: state.score(),
            correct_count,
            total_questions,
            accuracy_percent: accuracy,
            average_answer_secs: average_answer_secs(state.records(), time_limit),
            standings,
            your_rank,
            stars: star_rating(accuracy),
            outcome: OutcomeTier::from_rank(your_rank),
        }
    }

    /// Whether the human came first.
    pub fn is_winner(&self) -> bool {
        self.your_rank == 1
    }

    /// Standings without the human.
    pub fn opponents(&self) -> impl Iterator<Item = &Standing> {
        self.standings.iter().filter(|s| !s.id.is_human())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::config::{ArenaType, BattleConfig, BattleMode};
    use crate::battle::state::{AnswerRecord, ParticipantId};

    fn finished(answers: &[(bool, u32, u32)], opponents: Vec<(&str, u32)>) -> BattleState {
        let mut config = BattleConfig::new(BattleMode::Multiplayer, ArenaType::Friends);
        for (id, _) in &opponents {
            config = config.with_opponent(id);
        }
        let mut state = BattleState::new(config);
        for (i, (correct, points, remaining)) in answers.iter().enumerate() {
            state.record_answer(AnswerRecord {
                question_index: i,
                selected: Some(0),
                correct: *correct,
                points: *points,
                time_remaining: *remaining,
            });
        }
        state.set_opponent_scores(
            opponents.into_iter().map(|(id, s)| (ParticipantId::from(id), s)).collect(),
        );
        state
    }

    #[test]
    fn test_tie_with_opponent_goes_to_human() {
        let state = finished(&[(true, 500, 30)], vec![("1", 500), ("2", 400)]);
        let results = BattleResults::from_state(&state, 1, 30);

        let names: Vec<&str> = results.standings.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["You", "Budi", "Siti"]);
        assert!(results.is_winner());
        assert_eq!(results.outcome, OutcomeTier::Victory);
        assert_eq!(results.opponents().count(), 2);
    }

    #[test]
    fn test_accuracy_and_stars() {
        let answers = [
            (true, 30, 30), (true, 20, 30), (false, 0, 10), (true, 20, 25),
        ];
        let state = finished(&answers, vec![("1", 650)]);
        let results = BattleResults::from_state(&state, 4, 30);

        assert_eq!(results.correct_count, 3);
        assert_eq!(results.accuracy_percent, 75);
        assert_eq!(results.stars, 4);
        assert_eq!(results.your_rank, 2);
        assert_eq!(results.outcome, OutcomeTier::GreatJob);
        // (0 + 0 + 20 + 5) / 4
        assert_eq!(results.average_answer_secs, Some(6.25));
    }

    #[test]
    fn test_last_place_keeps_trying() {
        let state = finished(&[(false, 0, 0)], vec![("1", 600), ("2", 500), ("4", 10)]);
        let results = BattleResults::from_state(&state, 1, 30);
        assert_eq!(results.your_rank, 4);
        assert_eq!(results.outcome, OutcomeTier::KeepTrying);
        assert_eq!(results.outcome.headline(), "Keep Trying!");
        assert_eq!(results.stars, 1);
    }
}
