//! Opponent Simulation
//!
//! Non-human participants are driven through the [`ParticipantFeed`]
//! trait. The session only ever asks a feed *when* something should happen;
//! scheduling and cancellation stay with the session, so a feed cannot
//! reach into a phase that has already ended.
//!
//! - [`ScriptedFeed`]: fixed delays and scores, for tests and demos.
//! - [`RandomFeed`]: seeded jitter, the shipped behaviour.
//!
//! A networked feed would implement the same trait.

use serde::{Serialize, Deserialize};

use crate::battle::state::ParticipantId;
use crate::core::rng::DeterministicRng;

/// Source of opponent behaviour.
pub trait ParticipantFeed: Send {
    /// Delay (ms after the question opens) at which each opponent makes
    /// progress on question `question_index`.
    fn progress_delays(
        &mut self,
        question_index: usize,
        opponents: &[ParticipantId],
    ) -> Vec<(ParticipantId, u64)>;

    /// Delay (ms after the waiting room opens) at which each opponent
    /// becomes ready.
    fn ready_delays(&mut self, opponents: &[ParticipantId]) -> Vec<(ParticipantId, u64)>;

    /// Final score of each opponent once the battle is over.
    fn final_scores(&mut self, opponents: &[ParticipantId]) -> Vec<(ParticipantId, u32)>;
}

/// Tuning for [`RandomFeed`].
///
/// The score bands are stand-ins for a real scoring source and carry no
/// game rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedTuning {
    /// Earliest progress event for the first opponent (ms).
    pub progress_base_ms: u64,
    /// Added to the base for each later opponent (ms).
    pub progress_step_ms: u64,
    /// Random window added on top of the base (ms).
    pub progress_jitter_ms: u32,
    /// Readiness delay step: opponent `i` is ready at `(i + 1) * step` (ms).
    pub ready_step_ms: u64,
    /// Lower bound of the first opponent's score band.
    pub score_floor: u32,
    /// Width of each score band.
    pub score_band_width: u32,
    /// How much lower each later opponent's band starts.
    pub score_band_step: u32,
}

impl Default for FeedTuning {
    fn default() -> Self {
        Self {
            progress_base_ms: 1000,
            progress_step_ms: 500,
            progress_jitter_ms: 3000,
            ready_step_ms: 2000,
            score_floor: 500,
            score_band_width: 200,
            score_band_step: 100,
        }
    }
}

/// Seeded, jittered opponents.
pub struct RandomFeed {
    rng: DeterministicRng,
    tuning: FeedTuning,
}

impl RandomFeed {
    /// Create a feed from a battle seed.
    pub fn new(seed: u64, tuning: FeedTuning) -> Self {
        Self {
            rng: DeterministicRng::new(seed),
            tuning,
        }
    }
}

impl ParticipantFeed for RandomFeed {
    fn progress_delays(
        &mut self,
        _question_index: usize,
        opponents: &[ParticipantId],
    ) -> Vec<(ParticipantId, u64)> {
        opponents.iter()
            .enumerate()
            .map(|(i, id)| {
                let base = self.tuning.progress_base_ms
                    .saturating_add(self.tuning.progress_step_ms.saturating_mul(i as u64));
                (id.clone(), self.rng.next_delay_ms(base, self.tuning.progress_jitter_ms))
            })
            .collect()
    }

    // Readiness is deterministic and draws nothing from the rng, so a battle
    // replays identically no matter how long the waiting room lasted.
    fn ready_delays(&mut self, opponents: &[ParticipantId]) -> Vec<(ParticipantId, u64)> {
        opponents.iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), self.tuning.ready_step_ms.saturating_mul(i as u64 + 1)))
            .collect()
    }

    fn final_scores(&mut self, opponents: &[ParticipantId]) -> Vec<(ParticipantId, u32)> {
        opponents.iter()
            .enumerate()
            .map(|(i, id)| {
                let floor = self.tuning.score_floor
                    .saturating_sub(self.tuning.score_band_step.saturating_mul(i as u32));
                let ceil = floor.saturating_add(self.tuning.score_band_width.saturating_sub(1));
                (id.clone(), self.rng.next_int_range(floor, ceil))
            })
            .collect()
    }
}

/// Fixed, per-opponent behaviour. Opponent `i` uses entry `i` of each list.
///
/// An opponent without a progress entry never progresses, one without a
/// ready entry never becomes ready, one without a score finishes on 0.
#[derive(Clone, Debug, Default)]
pub struct ScriptedFeed {
    progress_ms: Vec<u64>,
    ready_ms: Vec<u64>,
    scores: Vec<u32>,
}

impl ScriptedFeed {
    /// Feed with no scripted behaviour.
    pub fn new() -> Self {
        Self::default()
    }

    /// Progress delays, the same for every question.
    pub fn progress_after(mut self, delays_ms: Vec<u64>) -> Self {
        self.progress_ms = delays_ms;
        self
    }

    /// Readiness delays.
    pub fn ready_after(mut self, delays_ms: Vec<u64>) -> Self {
        self.ready_ms = delays_ms;
        self
    }

    /// Final scores.
    pub fn scoring(mut self, scores: Vec<u32>) -> Self {
        self.scores = scores;
        self
    }
}

impl ParticipantFeed for ScriptedFeed {
    fn progress_delays(
        &mut self,
        _question_index: usize,
        opponents: &[ParticipantId],
    ) -> Vec<(ParticipantId, u64)> {
        opponents.iter()
            .zip(self.progress_ms.iter())
            .map(|(id, ms)| (id.clone(), *ms))
            .collect()
    }

    fn ready_delays(&mut self, opponents: &[ParticipantId]) -> Vec<(ParticipantId, u64)> {
        opponents.iter()
            .zip(self.ready_ms.iter())
            .map(|(id, ms)| (id.clone(), *ms))
            .collect()
    }

    fn final_scores(&mut self, opponents: &[ParticipantId]) -> Vec<(ParticipantId, u32)> {
        opponents.iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), self.scores.get(i).copied().unwrap_or(0)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<ParticipantId> {
        vec![ParticipantId::from("1"), ParticipantId::from("2")]
    }

    #[test]
    fn test_random_progress_windows() {
        let mut feed = RandomFeed::new(7, FeedTuning::default());

        for q in 0..50 {
            let delays = feed.progress_delays(q, &roster());
            assert_eq!(delays.len(), 2);
            assert!((1000..4000).contains(&delays[0].1));
            assert!((1500..4500).contains(&delays[1].1));
        }
    }

    #[test]
    fn test_random_ready_is_fixed() {
        let mut feed = RandomFeed::new(7, FeedTuning::default());
        let delays = feed.ready_delays(&roster());
        assert_eq!(delays, vec![
            (ParticipantId::from("1"), 2000),
            (ParticipantId::from("2"), 4000),
        ]);
    }

    #[test]
    fn test_extreme_tuning_saturates() {
        let tuning = FeedTuning {
            progress_base_ms: u64::MAX,
            progress_step_ms: u64::MAX,
            progress_jitter_ms: u32::MAX,
            ready_step_ms: u64::MAX,
            score_floor: u32::MAX,
            score_band_width: u32::MAX,
            score_band_step: 0,
        };
        let mut feed = RandomFeed::new(7, tuning);

        let progress = feed.progress_delays(0, &roster());
        assert!(progress.iter().all(|(_, ms)| *ms == u64::MAX));
        let ready = feed.ready_delays(&roster());
        assert!(ready.iter().all(|(_, ms)| *ms == u64::MAX));
        let scores = feed.final_scores(&roster());
        assert!(scores.iter().all(|(_, score)| *score == u32::MAX));

        let mut feed = RandomFeed::new(7, FeedTuning { score_floor: 0, score_band_width: u32::MAX, ..FeedTuning::default() });
        assert_eq!(feed.final_scores(&roster()).len(), 2);
    }

    #[test]
    fn test_random_score_bands() {
        for seed in 0..200 {
            let mut feed = RandomFeed::new(seed, FeedTuning::default());
            let scores = feed.final_scores(&roster());
            assert!((500..700).contains(&scores[0].1));
            assert!((400..600).contains(&scores[1].1));
        }
    }

    #[test]
    fn test_random_feed_is_seeded() {
        let mut a = RandomFeed::new(99, FeedTuning::default());
        let mut b = RandomFeed::new(99, FeedTuning::default());

        assert_eq!(a.progress_delays(0, &roster()), b.progress_delays(0, &roster()));
        assert_eq!(a.final_scores(&roster()), b.final_scores(&roster()));
    }

    #[test]
    fn test_scripted_feed_gaps() {
        let mut feed = ScriptedFeed::new()
            .progress_after(vec![1200])
            .scoring(vec![550]);

        let progress = feed.progress_delays(3, &roster());
        assert_eq!(progress, vec![(ParticipantId::from("1"), 1200)]);

        assert!(feed.ready_delays(&roster()).is_empty());

        let scores = feed.final_scores(&roster());
        assert_eq!(scores[0].1, 550);
        assert_eq!(scores[1].1, 0);
    }
}
