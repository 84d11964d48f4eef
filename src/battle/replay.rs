//! Battle Replay
//!
//! A battle is fully determined by its seed, config, settings, and the
//! time and choice of every human answer. A [`BattleTranscript`] records
//! exactly that plus the final state hash, so anyone holding the same
//! question bank can replay the battle and check the outcome.

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use crate::battle::config::{BattleConfig, BattleSettings, ConfigError};
use crate::battle::feed::RandomFeed;
use crate::battle::question::QuestionBank;
use crate::battle::session::{BattleId, BattleSession};
use crate::core::hash::StateHash;

/// Current transcript version.
pub const TRANSCRIPT_VERSION: u8 = 1;

/// One accepted human answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedInput {
    /// Session time of the answer (ms).
    pub at_ms: u64,
    /// Option picked.
    pub selection: usize,
}

/// Everything needed to replay a finished battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleTranscript {
    /// Version for forward compatibility.
    pub version: u8,
    /// Battle identifier.
    pub battle_id: BattleId,
    /// Seed for the opponent feed.
    pub seed: u64,
    /// Wall-clock time the transcript was taken.
    pub recorded_at: DateTime<Utc>,
    /// Battle config.
    pub config: BattleConfig,
    /// Settings in effect.
    pub settings: BattleSettings,
    /// Human answers in order.
    pub inputs: Vec<RecordedInput>,
    /// Session time when the transcript was taken (ms).
    pub ended_at_ms: u64,
    /// State hash when the transcript was taken.
    pub final_hash: StateHash,
}

impl BattleTranscript {
    /// Take a transcript of a completed session.
    pub fn from_session(session: &BattleSession) -> Result<Self, ReplayError> {
        if !session.is_complete() {
            return Err(ReplayError::Incomplete);
        }

        Ok(Self {
            version: TRANSCRIPT_VERSION,
            battle_id: session.id(),
            seed: session.seed(),
            recorded_at: Utc::now(),
            config: session.state().config().clone(),
            settings: session.settings().clone(),
            inputs: session.inputs().to_vec(),
            ended_at_ms: session.now_ms(),
            final_hash: session.compute_hash(),
        })
    }

    /// Serialize to bytes using bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplayError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ReplayError> {
        let transcript: Self = bincode::deserialize(data)?;
        if transcript.version != TRANSCRIPT_VERSION {
            return Err(ReplayError::VersionMismatch {
                expected: TRANSCRIPT_VERSION,
                got: transcript.version,
            });
        }
        Ok(transcript)
    }
}

/// Rebuild a battle from its transcript.
///
/// Opponents are driven by a [`RandomFeed`] seeded from the transcript, so
/// only battles played against that feed replay faithfully.
pub fn replay(transcript: &BattleTranscript, bank: &QuestionBank) -> Result<BattleSession, ReplayError> {
    let feed = RandomFeed::new(transcript.seed, transcript.settings.feed.clone());
    let mut session = BattleSession::start(
        transcript.battle_id,
        transcript.seed,
        transcript.config.clone(),
        bank,
        transcript.settings.clone(),
        Box::new(feed),
    )?;

    for (i, input) in transcript.inputs.iter().enumerate() {
        session.advance_to(input.at_ms);
        if !session.submit_answer(input.selection).is_accepted() {
            warn!("Replay input {} at {}ms was rejected", i, input.at_ms);
            return Err(ReplayError::Diverged { input: i });
        }
    }
    session.advance_to(transcript.ended_at_ms);

    if !session.is_complete() {
        return Err(ReplayError::Incomplete);
    }

    debug!("Replayed battle {} with {} inputs", hex::encode(&transcript.battle_id[..4]), transcript.inputs.len());
    Ok(session)
}

/// Replay and compare the final hash.
pub fn verify(transcript: &BattleTranscript, bank: &QuestionBank) -> Result<bool, ReplayError> {
    let session = replay(transcript, bank)?;
    Ok(session.compute_hash() == transcript.final_hash)
}

/// Errors that can occur with transcripts.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// The recorded battle cannot be restarted.
    #[error("invalid battle config: {0}")]
    Config(#[from] ConfigError),

    /// Bytes are not a transcript.
    #[error("transcript encoding failed: {0}")]
    Encoding(#[from] bincode::Error),

    /// Written by another transcript version.
    #[error("version mismatch: expected {expected}, got {got}")]
    VersionMismatch {
        /// Version this build reads.
        expected: u8,
        /// Version found.
        got: u8,
    },

    /// Battle not finished.
    #[error("battle is not complete")]
    Incomplete,

    /// A recorded answer was not accepted on replay.
    #[error("replay diverged at input {input}")]
    Diverged {
        /// Index of the rejected input.
        input: usize,
    },
}
