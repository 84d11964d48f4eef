//! Battle Configuration
//!
//! `BattleConfig` is what the setup screen hands over when the player
//! confirms a battle. `BattleSettings` holds the timing and size knobs,
//! all defaulting to the values of the shipped game.

use std::collections::BTreeSet;
use serde::{Serialize, Deserialize};

use crate::battle::feed::FeedTuning;
use crate::battle::question::Subject;
use crate::battle::state::Participant;

/// Battle mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleMode {
    /// Head to head.
    #[default]
    OneVOne,
    /// Up to four opponents.
    Multiplayer,
}

impl BattleMode {
    /// Largest opponent list the mode accepts.
    pub fn max_opponents(&self) -> usize {
        match self {
            BattleMode::OneVOne => 1,
            BattleMode::Multiplayer => 4,
        }
    }
}

/// Where opponents come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArenaType {
    /// Matched with strangers.
    #[default]
    World,
    /// Invited friends.
    Friends,
}

/// Configuration of one battle, read-only once the battle starts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Battle mode.
    pub mode: BattleMode,
    /// Arena type.
    pub arena: ArenaType,
    /// Opponent identifiers in invitation order.
    pub opponents: Vec<String>,
    /// Only ask questions from this subject.
    pub subject: Option<Subject>,
    /// Only ask questions from this chapter of `subject`.
    pub chapter: Option<String>,
}

impl BattleConfig {
    /// Create an empty config.
    pub fn new(mode: BattleMode, arena: ArenaType) -> Self {
        Self {
            mode,
            arena,
            ..Default::default()
        }
    }

    /// Append an opponent.
    pub fn with_opponent(mut self, id: &str) -> Self {
        self.opponents.push(id.to_string());
        self
    }

    /// Restrict to a subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Restrict to a chapter.
    pub fn with_chapter(mut self, chapter: &str) -> Self {
        self.chapter = Some(chapter.to_string());
        self
    }

    /// Check the config can start a battle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.opponents.is_empty() {
            return Err(ConfigError::NoOpponents);
        }

        let max = self.mode.max_opponents();
        if self.opponents.len() > max {
            return Err(ConfigError::TooManyOpponents {
                mode: self.mode,
                max,
                got: self.opponents.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for id in &self.opponents {
            if !seen.insert(id.as_str()) {
                return Err(ConfigError::DuplicateOpponent(id.clone()));
            }
            if !Participant::is_available(id) {
                return Err(ConfigError::OpponentOffline(id.clone()));
            }
        }

        if self.chapter.is_some() && self.subject.is_none() {
            return Err(ConfigError::ChapterWithoutSubject);
        }

        Ok(())
    }
}

/// Timing and size parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleSettings {
    /// Questions per battle.
    pub question_count: usize,
    /// Seconds allowed per question.
    pub question_time_secs: u32,
    /// Feedback pause after an answer (ms).
    pub answered_delay_ms: u64,
    /// Feedback pause after a timeout (ms).
    pub timeout_delay_ms: u64,
    /// Waiting-room countdown (seconds).
    pub waiting_countdown_secs: u32,
    /// Pause between everyone being ready and the battle starting (ms).
    pub start_delay_ms: u64,
    /// Opponent simulation tuning.
    pub feed: FeedTuning,
}

impl Default for BattleSettings {
    fn default() -> Self {
        Self {
            question_count: 10,
            question_time_secs: 30,
            answered_delay_ms: 2500,
            timeout_delay_ms: 2000,
            waiting_countdown_secs: 30,
            start_delay_ms: 2000,
            feed: FeedTuning::default(),
        }
    }
}

impl BattleSettings {
    /// Parse settings from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: BattleSettings = serde_json::from_str(json)
            .map_err(|e| ConfigError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.question_count == 0 {
            return Err(ConfigError::InvalidSettings("question_count must be positive".into()));
        }
        if self.question_time_secs == 0 {
            return Err(ConfigError::InvalidSettings("question_time_secs must be positive".into()));
        }
        Ok(())
    }
}

/// Reasons a battle cannot start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No opponent was picked.
    #[error("Pick at least one opponent")]
    NoOpponents,

    /// More opponents than the mode allows.
    #[error("{mode:?} allows at most {max} opponents, got {got}")]
    TooManyOpponents {
        /// Mode in effect.
        mode: BattleMode,
        /// Mode limit.
        max: usize,
        /// Opponents supplied.
        got: usize,
    },

    /// Same opponent listed twice.
    #[error("Opponent {0} listed twice")]
    DuplicateOpponent(String),

    /// Opponent is offline and cannot be challenged.
    #[error("Opponent {0} is offline")]
    OpponentOffline(String),

    /// Chapter filter without a subject filter.
    #[error("A chapter filter needs a subject filter")]
    ChapterWithoutSubject,

    /// The filters left nothing to ask.
    #[error("No questions match the selected filters")]
    NoQuestions,

    /// Malformed bank entry.
    #[error("Question {index} is invalid: {reason}")]
    InvalidQuestion {
        /// Position in the bank.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// Unusable settings.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_an_opponent() {
        let config = BattleConfig::new(BattleMode::OneVOne, ArenaType::Friends);
        assert_eq!(config.validate(), Err(ConfigError::NoOpponents));
    }

    #[test]
    fn test_mode_limits() {
        let one = BattleConfig::new(BattleMode::OneVOne, ArenaType::Friends)
            .with_opponent("1")
            .with_opponent("2");
        assert!(matches!(
            one.validate(),
            Err(ConfigError::TooManyOpponents { max: 1, got: 2, .. })
        ));

        let multi = ["1", "2", "4", "5"].iter()
            .fold(BattleConfig::new(BattleMode::Multiplayer, ArenaType::Friends), |c, id| c.with_opponent(id));
        assert!(multi.validate().is_ok());

        let too_many = multi.with_opponent("7");
        assert!(matches!(
            too_many.validate(),
            Err(ConfigError::TooManyOpponents { max: 4, got: 5, .. })
        ));
    }

    #[test]
    fn test_duplicate_opponent() {
        let config = BattleConfig::new(BattleMode::Multiplayer, ArenaType::Friends)
            .with_opponent("1")
            .with_opponent("1");
        assert_eq!(config.validate(), Err(ConfigError::DuplicateOpponent("1".into())));
    }

    #[test]
    fn test_offline_friends_cannot_be_picked() {
        for offline in ["3", "6"] {
            let config = BattleConfig::new(BattleMode::OneVOne, ArenaType::Friends)
                .with_opponent(offline);
            assert_eq!(config.validate(), Err(ConfigError::OpponentOffline(offline.into())));
        }

        let stranger = BattleConfig::new(BattleMode::OneVOne, ArenaType::World)
            .with_opponent("42");
        assert!(stranger.validate().is_ok());
    }

    #[test]
    fn test_chapter_needs_subject() {
        let config = BattleConfig::new(BattleMode::OneVOne, ArenaType::Friends)
            .with_opponent("1")
            .with_chapter("algebra");
        assert_eq!(config.validate(), Err(ConfigError::ChapterWithoutSubject));

        let config = config.with_subject(Subject::Math);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_settings_defaults() {
        let settings = BattleSettings::default();
        assert_eq!(settings.question_count, 10);
        assert_eq!(settings.question_time_secs, 30);
        assert_eq!(settings.answered_delay_ms, 2500);
        assert_eq!(settings.timeout_delay_ms, 2000);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_partial_json() {
        let settings = BattleSettings::from_json(r#"{ "question_count": 5 }"#).unwrap();
        assert_eq!(settings.question_count, 5);
        assert_eq!(settings.question_time_secs, 30);

        let err = BattleSettings::from_json(r#"{ "question_time_secs": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSettings(_)));

        assert!(BattleSettings::from_json("not json").is_err());
    }
}
