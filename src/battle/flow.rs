//! Screen Flow
//!
//! Hub → setup → waiting room → battle → results, with rematch and home
//! exits. [`BattleFlow`] owns whichever waiting room or session is live and
//! routes commands and elapsed time to it.

use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::battle::config::{BattleConfig, BattleSettings, ConfigError};
use crate::battle::events::BattleEvent;
use crate::battle::feed::{FeedTuning, ParticipantFeed, RandomFeed};
use crate::battle::question::QuestionBank;
use crate::battle::results::BattleResults;
use crate::battle::session::{BattleId, BattleSession, SubmitOutcome};
use crate::battle::waiting_room::WaitingRoom;
use crate::core::rng::derive_battle_seed;

/// Screen the player is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Home.
    Hub,
    /// Picking mode, opponents and filters.
    Setup,
    /// Lobby.
    WaitingRoom,
    /// Answering questions.
    Battle,
    /// Final ranking.
    Results,
}

/// Builds the opponent feed for a battle from its seed.
pub type FeedFactory = Box<dyn FnMut(u64, &FeedTuning) -> Box<dyn ParticipantFeed> + Send>;

/// Errors from flow commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// The battle could not be set up.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Command not available on this screen.
    #[error("{action} is not available on the {screen:?} screen")]
    WrongScreen {
        /// Command attempted.
        action: &'static str,
        /// Screen at the time.
        screen: Screen,
    },
}

/// A battle between setup and its first question.
struct PendingBattle {
    id: BattleId,
    seed: u64,
    config: BattleConfig,
    feed: Box<dyn ParticipantFeed>,
}

/// Drives the player through the screens.
pub struct BattleFlow {
    bank: QuestionBank,
    settings: BattleSettings,
    feed_factory: FeedFactory,
    screen: Screen,
    pending: Option<PendingBattle>,
    room: Option<WaitingRoom>,
    session: Option<BattleSession>,
    last_config: Option<BattleConfig>,
    events: Vec<BattleEvent>,
}

impl BattleFlow {
    /// Flow starting on the hub.
    pub fn new(bank: QuestionBank, settings: BattleSettings, feed_factory: FeedFactory) -> Self {
        Self {
            bank,
            settings,
            feed_factory,
            screen: Screen::Hub,
            pending: None,
            room: None,
            session: None,
            last_config: None,
            events: Vec::new(),
        }
    }

    /// Flow whose opponents are seeded [`RandomFeed`]s.
    pub fn with_random_feeds(bank: QuestionBank, settings: BattleSettings) -> Self {
        Self::new(
            bank,
            settings,
            Box::new(|seed: u64, tuning: &FeedTuning| {
                Box::new(RandomFeed::new(seed, tuning.clone())) as Box<dyn ParticipantFeed>
            }),
        )
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Hub → setup.
    pub fn open_setup(&mut self) -> Result<(), FlowError> {
        self.expect_screen("open_setup", &[Screen::Hub])?;
        self.go(Screen::Setup);
        Ok(())
    }

    /// Confirm setup and open the waiting room under a fresh battle id.
    pub fn start_battle(&mut self, config: BattleConfig) -> Result<BattleId, FlowError> {
        self.start_battle_with_id(Uuid::new_v4().into_bytes(), config)
    }

    /// Confirm setup with a caller-chosen battle id.
    pub fn start_battle_with_id(&mut self, id: BattleId, config: BattleConfig) -> Result<BattleId, FlowError> {
        self.expect_screen("start_battle", &[Screen::Setup])?;
        self.open_room(id, config)?;
        Ok(id)
    }

    /// The human is ready.
    pub fn mark_ready(&mut self) -> Result<bool, FlowError> {
        self.expect_screen("mark_ready", &[Screen::WaitingRoom])?;
        let changed = self.room.as_mut().map_or(false, |room| room.mark_human_ready());
        self.collect_events();
        Ok(changed)
    }

    /// Leave the waiting room for the hub.
    pub fn cancel_waiting(&mut self) -> Result<(), FlowError> {
        self.expect_screen("cancel_waiting", &[Screen::WaitingRoom])?;
        self.close_room();
        self.go(Screen::Hub);
        Ok(())
    }

    /// Answer the open question.
    pub fn submit_answer(&mut self, index: usize) -> Result<SubmitOutcome, FlowError> {
        self.expect_screen("submit_answer", &[Screen::Battle])?;
        let session = match self.session.as_mut() {
            Some(session) => session,
            None => return Err(FlowError::WrongScreen { action: "submit_answer", screen: self.screen }),
        };
        let outcome = session.submit_answer(index);
        self.collect_events();
        Ok(outcome)
    }

    /// Same config, new battle id, straight to the waiting room.
    pub fn rematch(&mut self) -> Result<BattleId, FlowError> {
        self.expect_screen("rematch", &[Screen::Results])?;
        let config = match self.last_config.clone() {
            Some(config) => config,
            None => return Err(FlowError::WrongScreen { action: "rematch", screen: self.screen }),
        };
        let id = Uuid::new_v4().into_bytes();
        self.open_room(id, config)?;
        self.session = None;
        Ok(id)
    }

    /// Back to the hub from anywhere, abandoning whatever is live.
    pub fn home(&mut self) {
        self.close_room();
        self.session = None;
        self.go(Screen::Hub);
    }

    /// Let `elapsed_ms` of time pass on the live screen.
    ///
    /// Time left over when the waiting room hands off carries into the battle.
    pub fn advance(&mut self, elapsed_ms: u64) -> Result<(), FlowError> {
        match self.screen {
            Screen::WaitingRoom => {
                let leftover = match self.room.as_mut() {
                    Some(room) => {
                        room.advance(elapsed_ms);
                        room.begun_at_ms().map(|at| room.now_ms() - at)
                    }
                    None => None,
                };
                self.collect_events();

                if let Some(leftover) = leftover {
                    self.begin_battle()?;
                    self.advance_session(leftover);
                }
            }
            Screen::Battle => self.advance_session(elapsed_ms),
            _ => {}
        }
        Ok(())
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    fn open_room(&mut self, id: BattleId, config: BattleConfig) -> Result<(), FlowError> {
        self.settings.validate()?;
        config.validate()?;
        if self.bank.filtered(config.subject, config.chapter.as_deref()).is_empty() {
            return Err(ConfigError::NoQuestions.into());
        }

        let seed = derive_battle_seed(&id, &config.opponents);
        let mut feed = (self.feed_factory)(seed, &self.settings.feed);
        let room = WaitingRoom::open(config.clone(), &self.settings, feed.as_mut())?;

        info!("Battle {} set up, seed {}", hex::encode(&id[..4]), seed);

        self.last_config = Some(config.clone());
        self.pending = Some(PendingBattle { id, seed, config, feed });
        self.room = Some(room);
        self.collect_events();
        self.go(Screen::WaitingRoom);
        Ok(())
    }

    /// Hand the room off to a session. On failure the flow falls back to
    /// setup, so it never sits on a screen with nothing live.
    fn begin_battle(&mut self) -> Result<(), FlowError> {
        self.room = None;
        let pending = match self.pending.take() {
            Some(pending) => pending,
            None => {
                let err = FlowError::WrongScreen { action: "begin_battle", screen: self.screen };
                self.go(Screen::Setup);
                return Err(err);
            }
        };

        let session = match BattleSession::start(
            pending.id,
            pending.seed,
            pending.config,
            &self.bank,
            self.settings.clone(),
            pending.feed,
        ) {
            Ok(session) => session,
            Err(err) => {
                warn!("Battle {} failed to start: {}", hex::encode(&pending.id[..4]), err);
                self.go(Screen::Setup);
                return Err(err.into());
            }
        };
        self.session = Some(session);
        self.collect_events();
        self.go(Screen::Battle);
        Ok(())
    }

    fn advance_session(&mut self, elapsed_ms: u64) {
        let complete = match self.session.as_mut() {
            Some(session) => {
                session.advance(elapsed_ms);
                session.is_complete()
            }
            None => false,
        };
        self.collect_events();
        if complete {
            self.go(Screen::Results);
        }
    }

    fn close_room(&mut self) {
        if let Some(room) = self.room.as_mut() {
            room.cancel();
        }
        self.collect_events();
        self.room = None;
        self.pending = None;
    }

    fn go(&mut self, to: Screen) {
        if self.screen != to {
            debug!("Screen {:?} -> {:?}", self.screen, to);
            self.screen = to;
        }
    }

    fn expect_screen(&self, action: &'static str, allowed: &[Screen]) -> Result<(), FlowError> {
        if allowed.contains(&self.screen) {
            Ok(())
        } else {
            Err(FlowError::WrongScreen { action, screen: self.screen })
        }
    }

    fn collect_events(&mut self) {
        if let Some(room) = self.room.as_mut() {
            self.events.extend(room.take_events());
        }
        if let Some(session) = self.session.as_mut() {
            self.events.extend(session.take_events());
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Live or finished battle.
    pub fn session(&self) -> Option<&BattleSession> {
        self.session.as_ref()
    }

    /// Live waiting room.
    pub fn room(&self) -> Option<&WaitingRoom> {
        self.room.as_ref()
    }

    /// Results of the finished battle.
    pub fn results(&self) -> Option<BattleResults> {
        self.session.as_ref().and_then(|s| s.results())
    }

    /// Config of the most recent battle.
    pub fn last_config(&self) -> Option<&BattleConfig> {
        self.last_config.as_ref()
    }

    /// Settings in effect.
    pub fn settings(&self) -> &BattleSettings {
        &self.settings
    }

    /// Question bank battles draw from.
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Drain events from the waiting room and battle.
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }
}
