//! Battle Session State Machine
//!
//! Drives one battle from the first question to the final ranking.
//!
//! ```text
//!   AwaitingAnswer ──submit / timer expired──▶ Resolved
//!         ▲                                       │ feedback delay
//!         │                                       ▼
//!         └────────── next question ─────── Advancing ──last question──▶ Complete
//! ```
//!
//! Time is virtual: nothing happens until the owner calls [`BattleSession::advance`].
//! Each question runs under its own [`Epoch`]. Resolving a question cancels
//! everything that epoch scheduled (the countdown and any pending opponent
//! progress) before the next question schedules anything, and a task that
//! still arrives with an old epoch is dropped.

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::battle::config::{BattleConfig, BattleSettings, ConfigError};
use crate::battle::events::{BattleEvent, BattleEventData};
use crate::battle::feed::ParticipantFeed;
use crate::battle::question::{QuestionBank, QuizItem, OPTION_COUNT};
use crate::battle::replay::RecordedInput;
use crate::battle::results::BattleResults;
use crate::battle::scoring::{score_answer, AnswerScore};
use crate::battle::state::{AnswerRecord, BattleState, ParticipantId};
use crate::battle::timer::{TimerEngine, TimerHandle, TimerSignal};
use crate::core::hash::StateHash;
use crate::core::schedule::{Epoch, Scheduled, Scheduler};

/// Unique battle identifier.
pub type BattleId = [u8; 16];

const SECOND_MS: u64 = 1000;

/// Session phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    /// Question open, clock running, nothing picked.
    AwaitingAnswer,
    /// Answer (or timeout) recorded, feedback showing.
    Resolved,
    /// Moving on to the next question or the results.
    Advancing,
    /// Battle over.
    Complete,
}

/// Why an answer was not taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoredInput {
    /// The question is not open for answers.
    NotAwaitingAnswer(BattlePhase),
    /// No such option.
    OutOfRange {
        /// Index submitted.
        index: usize,
        /// Options available.
        option_count: usize,
    },
}

/// Result of [`BattleSession::submit_answer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Answer recorded.
    Accepted(AnswerScore),
    /// Input dropped without touching state.
    Ignored(IgnoredInput),
}

impl SubmitOutcome {
    /// Whether the answer was recorded.
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted(_))
    }
}

/// Scheduled work.
#[derive(Clone, Debug)]
enum SessionTask {
    TimerSecond(TimerHandle),
    OpponentProgress(ParticipantId),
    Advance,
}

/// A running battle.
pub struct BattleSession {
    /// Unique battle identifier.
    id: BattleId,
    /// Seed the feed was built from, kept for replay.
    seed: u64,
    settings: BattleSettings,
    /// Questions for this battle, already filtered and truncated.
    questions: QuestionBank,
    state: BattleState,
    phase: BattlePhase,
    /// Epoch of the live phase.
    epoch: Epoch,
    scheduler: Scheduler<SessionTask>,
    timer: TimerEngine,
    feed: Box<dyn ParticipantFeed>,
    events: Vec<BattleEvent>,
    /// Accepted human inputs.
    inputs: Vec<RecordedInput>,
    /// Tasks discarded for carrying an old epoch or timer handle.
    stale_dropped: u64,
}

impl BattleSession {
    /// Start a battle. The first question opens immediately.
    pub fn start(
        id: BattleId,
        seed: u64,
        config: BattleConfig,
        bank: &QuestionBank,
        settings: BattleSettings,
        feed: Box<dyn ParticipantFeed>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        settings.validate()?;

        let questions = bank
            .filtered(config.subject, config.chapter.as_deref())
            .truncated(settings.question_count);
        if questions.is_empty() {
            return Err(ConfigError::NoQuestions);
        }

        info!(
            "Battle {} starting: {} questions, {} opponents",
            hex::encode(&id[..4]),
            questions.len(),
            config.opponents.len()
        );

        let mut session = Self {
            id,
            seed,
            settings,
            questions,
            state: BattleState::new(config),
            phase: BattlePhase::AwaitingAnswer,
            epoch: Epoch::default(),
            scheduler: Scheduler::new(),
            timer: TimerEngine::new(),
            feed,
            events: Vec::new(),
            inputs: Vec::new(),
            stale_dropped: 0,
        };
        session.open_question();

        Ok(session)
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Answer the open question with option `index`.
    ///
    /// Only the first answer per question counts; anything after it, or an
    /// index past the options, is ignored.
    pub fn submit_answer(&mut self, index: usize) -> SubmitOutcome {
        if self.phase != BattlePhase::AwaitingAnswer {
            debug!("Ignoring answer {} in phase {:?}", index, self.phase);
            return SubmitOutcome::Ignored(IgnoredInput::NotAwaitingAnswer(self.phase));
        }

        if index >= OPTION_COUNT {
            debug!("Ignoring out-of-range answer {}", index);
            return SubmitOutcome::Ignored(IgnoredInput::OutOfRange {
                index,
                option_count: OPTION_COUNT,
            });
        }

        self.inputs.push(RecordedInput {
            at_ms: self.now_ms(),
            selection: index,
        });

        SubmitOutcome::Accepted(self.resolve(Some(index)))
    }

    /// Let `elapsed_ms` of virtual time pass, running everything that falls due.
    pub fn advance(&mut self, elapsed_ms: u64) {
        let target = self.scheduler.now_ms() + elapsed_ms;
        self.advance_to(target);
    }

    /// Run the clock forward to `now_ms`.
    pub fn advance_to(&mut self, now_ms: u64) {
        while let Some(task) = self.scheduler.pop_due(now_ms) {
            self.handle_task(task);
        }
        self.scheduler.advance_clock(now_ms);
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    fn open_question(&mut self) {
        self.epoch = self.epoch.next();

        let question_index = self.state.current_question_index();
        debug_assert_eq!(self.state.answers().len(), question_index);

        let time_limit = self.settings.question_time_secs;
        let handle = self.timer.start(time_limit, self.epoch);
        self.scheduler.schedule_in(SECOND_MS, self.epoch, SessionTask::TimerSecond(handle));

        let opponents = self.state.opponent_ids();
        for (id, delay_ms) in self.feed.progress_delays(question_index, &opponents) {
            self.scheduler.schedule_in(delay_ms, self.epoch, SessionTask::OpponentProgress(id));
        }

        self.set_phase(BattlePhase::AwaitingAnswer);
        self.emit(BattleEventData::QuestionStarted { question_index, time_limit });
    }

    fn timer_expired(&mut self) {
        if self.phase != BattlePhase::AwaitingAnswer {
            return;
        }
        debug!("Question {} timed out", self.state.current_question_index());
        self.resolve(None);
    }

    /// Record the outcome of the open question. `None` means timeout.
    fn resolve(&mut self, selected: Option<usize>) -> AnswerScore {
        let question_index = self.state.current_question_index();
        let (correct_index, difficulty) = match self.questions.get(question_index) {
            Some(item) => (item.correct, item.difficulty),
            None => return AnswerScore::MISS,
        };

        let timed_out = selected.is_none();
        let time_remaining = if timed_out { 0 } else { self.timer.remaining() };

        // Stop everything tied to this question before anything new is scheduled
        if let Some(handle) = self.timer.handle() {
            self.timer.cancel(handle);
        }
        let cancelled = self.scheduler.cancel_epoch(self.epoch);
        self.epoch = self.epoch.next();

        let time_limit = self.settings.question_time_secs;
        let score = score_answer(selected, correct_index, difficulty, time_remaining, time_limit);

        self.state.record_answer(AnswerRecord {
            question_index,
            selected,
            correct: score.correct,
            points: score.points,
            time_remaining,
        });

        self.set_phase(BattlePhase::Resolved);
        self.emit(BattleEventData::AnswerResolved {
            question_index,
            selected,
            correct_index,
            correct: score.correct,
            points: score.points,
            score: self.state.score(),
        });

        if score.correct {
            let human = ParticipantId::human();
            if let Some(progress) = self.state.bump_progress(&human) {
                self.emit(BattleEventData::ParticipantProgressed { participant_id: human, progress });
            }
        }

        debug!(
            "Question {} resolved: correct={} points={} ({} pending tasks cancelled)",
            question_index, score.correct, score.points, cancelled
        );

        let delay_ms = if timed_out {
            self.settings.timeout_delay_ms
        } else {
            self.settings.answered_delay_ms
        };
        self.scheduler.schedule_in(delay_ms, self.epoch, SessionTask::Advance);

        score
    }

    fn advance_question(&mut self) {
        if self.phase != BattlePhase::Resolved {
            return;
        }
        self.set_phase(BattlePhase::Advancing);

        if self.state.current_question_index() + 1 >= self.questions.len() {
            self.finish();
        } else {
            self.state.advance_index();
            self.open_question();
        }
    }

    fn finish(&mut self) {
        let opponents = self.state.opponent_ids();
        let scores = self.feed.final_scores(&opponents);
        self.state.set_opponent_scores(scores);

        self.scheduler.clear();
        self.set_phase(BattlePhase::Complete);

        let score = self.state.score();
        let correct_count = self.state.correct_count();
        self.emit(BattleEventData::BattleCompleted { score, correct_count });

        info!(
            "Battle {} complete: score {}, {}/{} correct",
            hex::encode(&self.id[..4]),
            score,
            correct_count,
            self.questions.len()
        );
    }

    fn handle_task(&mut self, task: Scheduled<SessionTask>) {
        if task.epoch != self.epoch {
            self.stale_dropped += 1;
            debug!("Dropping stale task from epoch {:?}", task.epoch);
            return;
        }

        match task.event {
            SessionTask::TimerSecond(handle) => match self.timer.on_second(handle) {
                Some(TimerSignal::Tick { remaining }) => {
                    self.emit(BattleEventData::TimerTick { remaining });
                    self.scheduler.schedule_in(SECOND_MS, self.epoch, SessionTask::TimerSecond(handle));
                }
                Some(TimerSignal::Expired) => {
                    self.emit(BattleEventData::TimerTick { remaining: 0 });
                    self.timer_expired();
                }
                None => {
                    self.stale_dropped += 1;
                    debug!("Dropping tick from stale timer");
                }
            },
            SessionTask::OpponentProgress(participant_id) => {
                if self.phase != BattlePhase::AwaitingAnswer {
                    return;
                }
                if let Some(progress) = self.state.bump_progress(&participant_id) {
                    self.emit(BattleEventData::ParticipantProgressed { participant_id, progress });
                }
            }
            SessionTask::Advance => self.advance_question(),
        }
    }

    fn set_phase(&mut self, to: BattlePhase) {
        if self.phase == to {
            return;
        }
        let from = self.phase;
        self.phase = to;
        self.emit(BattleEventData::PhaseChanged { from, to });
    }

    fn emit(&mut self, data: BattleEventData) {
        let at_ms = self.scheduler.now_ms();
        self.events.push(BattleEvent::new(at_ms, data));
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Battle identifier.
    pub fn id(&self) -> BattleId {
        self.id
    }

    /// Seed the feed was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current phase.
    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Read-only view of the battle state.
    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// Settings in effect.
    pub fn settings(&self) -> &BattleSettings {
        &self.settings
    }

    /// Questions in this battle.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// The question being asked or just resolved. `None` once complete.
    pub fn current_question(&self) -> Option<&QuizItem> {
        if self.phase == BattlePhase::Complete {
            return None;
        }
        self.questions.get(self.state.current_question_index())
    }

    /// Seconds left on the question clock.
    pub fn time_remaining(&self) -> u32 {
        self.timer.remaining()
    }

    /// Virtual time since the battle started (ms).
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Whether the battle is over.
    pub fn is_complete(&self) -> bool {
        self.phase == BattlePhase::Complete
    }

    /// Accepted human inputs so far.
    pub fn inputs(&self) -> &[RecordedInput] {
        &self.inputs
    }

    /// Tasks dropped as stale so far.
    pub fn stale_dropped(&self) -> u64 {
        self.stale_dropped
    }

    /// Drain buffered events.
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Final results, once complete.
    pub fn results(&self) -> Option<BattleResults> {
        if !self.is_complete() {
            return None;
        }
        Some(BattleResults::from_state(
            &self.state,
            self.questions.len(),
            self.settings.question_time_secs,
        ))
    }

    /// Hash of the battle state for replay verification.
    pub fn compute_hash(&self) -> StateHash {
        self.state.compute_hash(self.now_ms(), self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::config::{ArenaType, BattleMode};
    use crate::battle::feed::ScriptedFeed;
    use crate::battle::question::Subject;

    fn duel() -> BattleConfig {
        BattleConfig::new(BattleMode::OneVOne, ArenaType::Friends).with_opponent("1")
    }

    fn trio() -> BattleConfig {
        BattleConfig::new(BattleMode::Multiplayer, ArenaType::Friends)
            .with_opponent("1")
            .with_opponent("2")
    }

    fn start(config: BattleConfig, feed: ScriptedFeed) -> BattleSession {
        BattleSession::start(
            [7; 16],
            42,
            config,
            &QuestionBank::standard(),
            BattleSettings::default(),
            Box::new(feed),
        )
        .unwrap()
    }

    fn correct_index(session: &BattleSession) -> usize {
        session.current_question().unwrap().correct
    }

    fn wrong_index(session: &BattleSession) -> usize {
        (correct_index(session) + 1) % OPTION_COUNT
    }

    fn count_events(events: &[BattleEvent], pred: impl Fn(&BattleEventData) -> bool) -> usize {
        events.iter().filter(|e| pred(&e.data)).count()
    }

    #[test]
    fn test_initial_state() {
        let mut session = start(duel(), ScriptedFeed::new());

        assert_eq!(session.phase(), BattlePhase::AwaitingAnswer);
        assert_eq!(session.state().current_question_index(), 0);
        assert_eq!(session.time_remaining(), 30);
        assert!(session.state().answers().is_empty());
        assert_eq!(session.question_count(), 10);

        let events = session.take_events();
        assert_eq!(events[0].data, BattleEventData::QuestionStarted { question_index: 0, time_limit: 30 });
    }

    #[test]
    fn test_second_submit_is_noop() {
        let mut session = start(duel(), ScriptedFeed::new());
        let right = correct_index(&session);

        assert!(session.submit_answer(right).is_accepted());
        let score = session.state().score();
        let answers = session.state().answers().to_vec();

        let second = session.submit_answer(wrong_index(&session));
        assert_eq!(second, SubmitOutcome::Ignored(IgnoredInput::NotAwaitingAnswer(BattlePhase::Resolved)));
        assert_eq!(session.state().score(), score);
        assert_eq!(session.state().answers(), answers.as_slice());
    }

    #[test]
    fn test_out_of_range_selection_ignored() {
        let mut session = start(duel(), ScriptedFeed::new());

        let outcome = session.submit_answer(4);
        assert_eq!(outcome, SubmitOutcome::Ignored(IgnoredInput::OutOfRange { index: 4, option_count: 4 }));
        assert_eq!(session.phase(), BattlePhase::AwaitingAnswer);
        assert!(session.state().answers().is_empty());
        assert!(session.inputs().is_empty());
    }

    #[test]
    fn test_full_time_answer_gets_full_bonus() {
        let mut session = start(duel(), ScriptedFeed::new());
        // Question 0 has difficulty 2
        let outcome = session.submit_answer(correct_index(&session));
        assert_eq!(outcome, SubmitOutcome::Accepted(AnswerScore { correct: true, points: 30 }));
        assert_eq!(session.state().participants()[0].progress, 1);
    }

    #[test]
    fn test_bonus_shrinks_with_time() {
        let mut session = start(duel(), ScriptedFeed::new());
        session.advance(10_000);
        assert_eq!(session.time_remaining(), 20);

        // 20 + floor(20/30 * 10) = 26
        let outcome = session.submit_answer(correct_index(&session));
        assert_eq!(outcome, SubmitOutcome::Accepted(AnswerScore { correct: true, points: 26 }));
        assert_eq!(session.state().records()[0].time_remaining, 20);
    }

    #[test]
    fn test_wrong_answer() {
        let mut session = start(duel(), ScriptedFeed::new());
        let outcome = session.submit_answer(wrong_index(&session));
        assert_eq!(outcome, SubmitOutcome::Accepted(AnswerScore::MISS));
        assert_eq!(session.state().answers(), &[false]);
        assert_eq!(session.state().score(), 0);
        assert_eq!(session.state().participants()[0].progress, 0);
    }

    #[test]
    fn test_timeout_resolves_once_and_advances_once() {
        let mut session = start(duel(), ScriptedFeed::new());
        session.take_events();

        session.advance(29_999);
        assert_eq!(session.phase(), BattlePhase::AwaitingAnswer);
        assert_eq!(session.time_remaining(), 1);

        session.advance(1);
        assert_eq!(session.phase(), BattlePhase::Resolved);
        assert_eq!(session.state().answers(), &[false]);
        assert_eq!(session.state().score(), 0);
        assert_eq!(session.state().records()[0].selected, None);

        // Timeout feedback lasts 2.0 s
        session.advance(1_999);
        assert_eq!(session.phase(), BattlePhase::Resolved);
        session.advance(1);
        assert_eq!(session.phase(), BattlePhase::AwaitingAnswer);
        assert_eq!(session.state().current_question_index(), 1);

        session.advance(5_000);
        assert_eq!(session.state().current_question_index(), 1);
        assert_eq!(session.state().answers().len(), 1);

        let events = session.take_events();
        assert_eq!(count_events(&events, |d| matches!(d, BattleEventData::AnswerResolved { .. })), 1);
        assert_eq!(count_events(&events, |d| matches!(d, BattleEventData::PhaseChanged { to: BattlePhase::Advancing, .. })), 1);
        assert_eq!(count_events(&events, |d| matches!(d, BattleEventData::QuestionStarted { .. })), 1);
    }

    #[test]
    fn test_answered_delay_is_longer() {
        let mut session = start(duel(), ScriptedFeed::new());
        session.submit_answer(0);

        session.advance(2_499);
        assert_eq!(session.phase(), BattlePhase::Resolved);
        session.advance(1);
        assert_eq!(session.state().current_question_index(), 1);
    }

    #[test]
    fn test_perfect_battle_scores_300() {
        let mut session = start(duel(), ScriptedFeed::new().scoring(vec![250]));

        for question in 0..10 {
            assert_eq!(session.phase(), BattlePhase::AwaitingAnswer);
            assert_eq!(session.state().current_question_index(), question);
            assert_eq!(session.state().answers().len(), question);

            let right = correct_index(&session);
            assert!(session.submit_answer(right).is_accepted());
            session.advance(2_500);
        }

        assert!(session.is_complete());
        assert_eq!(session.state().score(), 300);
        assert_eq!(session.state().answers().len(), 10);
        assert_eq!(session.state().current_question_index(), 9);

        let events = session.take_events();
        assert_eq!(count_events(&events, |d| matches!(d, BattleEventData::BattleCompleted { .. })), 1);
        assert_eq!(count_events(&events, |d| matches!(d, BattleEventData::PhaseChanged { to: BattlePhase::Complete, .. })), 1);
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut session = start(duel(), ScriptedFeed::new().scoring(vec![610]));
        for _ in 0..10 {
            session.submit_answer(0);
            session.advance(2_500);
        }
        assert!(session.is_complete());
        let hash = session.compute_hash();

        assert!(!session.submit_answer(0).is_accepted());
        session.advance(60_000);
        assert_eq!(session.state().answers().len(), 10);
        assert!(session.current_question().is_none());

        let final_scores = session.state().opponent_final_scores();
        assert_eq!(final_scores.len(), 1);
        assert_eq!(final_scores[0].name, "Budi");
        assert_eq!(final_scores[0].score, 610);

        // Only the clock moved
        assert_ne!(hash, session.compute_hash());
        assert_eq!(session.state().compute_hash(session.now_ms() - 60_000, session.seed()), hash);
    }

    #[test]
    fn test_opponents_progress_during_question() {
        let mut session = start(trio(), ScriptedFeed::new().progress_after(vec![1_500, 3_000]));

        session.advance(3_000);
        let progress: Vec<u32> = session.state().participants().iter().map(|p| p.progress).collect();
        assert_eq!(progress, vec![0, 1, 1]);
    }

    #[test]
    fn test_answer_cancels_pending_opponent_progress() {
        let mut session = start(trio(), ScriptedFeed::new().progress_after(vec![1_500, 3_000]));

        session.advance(2_000);
        session.submit_answer(0);

        // Siti's 3.0 s event belonged to question 0 and must not land
        session.advance(2_500);
        assert_eq!(session.state().current_question_index(), 1);
        session.advance(1_000);

        let siti = session.state().participant(&ParticipantId::from("2")).unwrap();
        assert_eq!(siti.progress, 0);
        let budi = session.state().participant(&ParticipantId::from("1")).unwrap();
        assert_eq!(budi.progress, 1);
    }

    #[test]
    fn test_stale_timer_callbacks_are_dropped() {
        let mut session = start(duel(), ScriptedFeed::new());
        let old_handle = session.timer.handle().unwrap();
        let old_epoch = session.epoch;

        session.advance(4_000);
        session.submit_answer(0);
        session.advance(2_500);
        assert_eq!(session.state().current_question_index(), 1);
        assert_eq!(session.time_remaining(), 30);

        // A late tick from question 0, once under its own epoch and once
        // smuggled in under the live epoch
        session.scheduler.schedule_in(0, old_epoch, SessionTask::TimerSecond(old_handle));
        session.scheduler.schedule_in(0, session.epoch, SessionTask::TimerSecond(old_handle));
        session.advance(0);

        assert_eq!(session.time_remaining(), 30);
        assert_eq!(session.phase(), BattlePhase::AwaitingAnswer);
        assert_eq!(session.stale_dropped(), 2);

        session.advance(1_000);
        assert_eq!(session.time_remaining(), 29);
    }

    #[test]
    fn test_results_after_completion() {
        let mut session = start(trio(), ScriptedFeed::new().scoring(vec![30, 400]));
        assert!(session.results().is_none());

        for q in 0..10 {
            // Right on even questions, wrong on odd ones
            let pick = if q % 2 == 0 { correct_index(&session) } else { wrong_index(&session) };
            session.submit_answer(pick);
            session.advance(2_500);
        }

        let results = session.results().unwrap();
        assert_eq!(results.correct_count, 5);
        assert_eq!(results.accuracy_percent, 50);
        let names: Vec<&str> = results.standings.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names[0], "Siti");
    }

    #[test]
    fn test_configuration_errors_block_start() {
        let empty = BattleConfig::new(BattleMode::OneVOne, ArenaType::World);
        let err = BattleSession::start(
            [0; 16], 0, empty, &QuestionBank::standard(), BattleSettings::default(), Box::new(ScriptedFeed::new()),
        ).err();
        assert_eq!(err, Some(ConfigError::NoOpponents));

        let nothing = duel().with_subject(Subject::Math).with_chapter("trigonometry");
        let err = BattleSession::start(
            [0; 16], 0, nothing, &QuestionBank::standard(), BattleSettings::default(), Box::new(ScriptedFeed::new()),
        ).err();
        assert_eq!(err, Some(ConfigError::NoQuestions));
    }

    #[test]
    fn test_subject_filter_shortens_battle() {
        let mut session = start(duel().with_subject(Subject::Science), ScriptedFeed::new());
        assert_eq!(session.question_count(), 3);

        for _ in 0..3 {
            assert_eq!(session.current_question().unwrap().subject, Subject::Science);
            session.submit_answer(0);
            session.advance(2_500);
        }
        assert!(session.is_complete());
        assert_eq!(session.state().answers().len(), 3);
    }

    #[test]
    fn test_inputs_are_recorded_with_time() {
        let mut session = start(duel(), ScriptedFeed::new());
        session.advance(1_250);
        session.submit_answer(2);
        session.submit_answer(3);

        assert_eq!(session.inputs(), &[RecordedInput { at_ms: 1_250, selection: 2 }]);
    }
}
