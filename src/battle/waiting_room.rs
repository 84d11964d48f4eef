//! Waiting Room
//!
//! Pre-battle lobby. Opponents turn ready on the feed's schedule, the human
//! turns ready on command, and once everyone is ready the room begins the
//! battle after a short delay. A countdown runs alongside for display; it
//! reaching zero changes nothing.

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::battle::config::{BattleConfig, BattleSettings, ConfigError};
use crate::battle::events::{BattleEvent, BattleEventData};
use crate::battle::feed::ParticipantFeed;
use crate::battle::state::{Participant, ParticipantId};
use crate::battle::timer::{TimerEngine, TimerHandle, TimerSignal};
use crate::core::schedule::{Epoch, Scheduled, Scheduler};

const SECOND_MS: u64 = 1000;

/// Room lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitingStatus {
    /// Waiting for participants.
    Waiting,
    /// Everyone is ready; the battle begins after the start delay.
    Starting,
    /// The battle has begun. Terminal.
    Begun,
    /// Abandoned. Terminal.
    Cancelled,
}

impl WaitingStatus {
    /// Whether the room is still open.
    pub fn is_open(&self) -> bool {
        matches!(self, WaitingStatus::Waiting | WaitingStatus::Starting)
    }
}

#[derive(Clone, Debug)]
enum RoomTask {
    CountdownSecond(TimerHandle),
    OpponentReady(ParticipantId),
    Begin,
}

/// What the lobby screen shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessSnapshot {
    /// Participants ready so far.
    pub ready_count: usize,
    /// Participants in the room.
    pub total: usize,
    /// Human first, then opponents.
    pub participants: Vec<Participant>,
    /// Seconds left on the lobby countdown.
    pub countdown_remaining: u32,
    /// Room lifecycle.
    pub status: WaitingStatus,
}

/// A pre-battle lobby.
pub struct WaitingRoom {
    config: BattleConfig,
    start_delay_ms: u64,
    participants: Vec<Participant>,
    status: WaitingStatus,
    epoch: Epoch,
    scheduler: Scheduler<RoomTask>,
    countdown: TimerEngine,
    events: Vec<BattleEvent>,
    begun_at_ms: Option<u64>,
}

impl WaitingRoom {
    /// Open a room for `config`, scheduling opponent readiness from `feed`.
    pub fn open(
        config: BattleConfig,
        settings: &BattleSettings,
        feed: &mut dyn ParticipantFeed,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let participants = Participant::roster(&config);
        let epoch = Epoch::default().next();

        let mut room = Self {
            config,
            start_delay_ms: settings.start_delay_ms,
            participants,
            status: WaitingStatus::Waiting,
            epoch,
            scheduler: Scheduler::new(),
            countdown: TimerEngine::new(),
            events: Vec::new(),
            begun_at_ms: None,
        };

        let handle = room.countdown.start(settings.waiting_countdown_secs, epoch);
        room.scheduler.schedule_in(SECOND_MS, epoch, RoomTask::CountdownSecond(handle));

        let opponents: Vec<ParticipantId> = room.participants.iter()
            .filter(|p| !p.is_human())
            .map(|p| p.id.clone())
            .collect();
        for (id, delay_ms) in feed.ready_delays(&opponents) {
            room.scheduler.schedule_in(delay_ms, epoch, RoomTask::OpponentReady(id));
        }

        info!("Waiting room opened with {} opponents", opponents.len());

        Ok(room)
    }

    /// The human is ready. Returns false if nothing changed.
    pub fn mark_human_ready(&mut self) -> bool {
        if self.status != WaitingStatus::Waiting {
            return false;
        }
        self.mark_ready(&ParticipantId::human())
    }

    /// Abandon the room. Pending readiness and the countdown are dropped.
    pub fn cancel(&mut self) -> bool {
        if !self.status.is_open() {
            return false;
        }
        self.stop();
        self.status = WaitingStatus::Cancelled;
        self.emit(BattleEventData::WaitingCancelled);
        debug!("Waiting room cancelled");
        true
    }

    /// Let `elapsed_ms` of virtual time pass.
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

    fn handle_task(&mut self, task: Scheduled<RoomTask>) {
        if task.epoch != self.epoch {
            debug!("Dropping stale room task");
            return;
        }

        match task.event {
            RoomTask::CountdownSecond(handle) => match self.countdown.on_second(handle) {
                Some(TimerSignal::Tick { remaining }) => {
                    self.emit(BattleEventData::WaitingCountdown { remaining });
                    self.scheduler.schedule_in(SECOND_MS, self.epoch, RoomTask::CountdownSecond(handle));
                }
                Some(TimerSignal::Expired) => {
                    self.emit(BattleEventData::WaitingCountdown { remaining: 0 });
                    self.emit(BattleEventData::WaitingCountdownExpired);
                }
                None => {}
            },
            RoomTask::OpponentReady(id) => {
                if self.status == WaitingStatus::Waiting {
                    self.mark_ready(&id);
                }
            }
            RoomTask::Begin => self.begin(),
        }
    }

    fn mark_ready(&mut self, id: &ParticipantId) -> bool {
        let participant = match self.participants.iter_mut().find(|p| &p.id == id) {
            Some(p) if !p.ready => p,
            _ => return false,
        };
        participant.ready = true;

        self.emit(BattleEventData::ParticipantReady { participant_id: id.clone() });
        debug!("{} ready ({}/{})", id, self.ready_count(), self.participants.len());

        if self.all_ready() {
            self.status = WaitingStatus::Starting;
            self.emit(BattleEventData::AllReady);
            self.scheduler.schedule_in(self.start_delay_ms, self.epoch, RoomTask::Begin);
        }
        true
    }

    fn begin(&mut self) {
        if self.status != WaitingStatus::Starting {
            return;
        }
        self.stop();
        self.status = WaitingStatus::Begun;
        self.begun_at_ms = Some(self.scheduler.now_ms());
        self.emit(BattleEventData::BattleBegins);
        info!("Waiting room closed, battle begins");
    }

    fn stop(&mut self) {
        if let Some(handle) = self.countdown.handle() {
            self.countdown.cancel(handle);
        }
        self.scheduler.clear();
        self.epoch = self.epoch.next();
    }

    fn emit(&mut self, data: BattleEventData) {
        let at_ms = self.scheduler.now_ms();
        self.events.push(BattleEvent::new(at_ms, data));
    }

    fn ready_count(&self) -> usize {
        self.participants.iter().filter(|p| p.ready).count()
    }

    /// Config the room was opened for.
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Whether every participant is ready.
    pub fn all_ready(&self) -> bool {
        self.participants.iter().all(|p| p.ready)
    }

    /// Room lifecycle.
    pub fn status(&self) -> WaitingStatus {
        self.status
    }

    /// Whether the battle has begun.
    pub fn has_begun(&self) -> bool {
        self.status == WaitingStatus::Begun
    }

    /// Room time at which the battle began.
    pub fn begun_at_ms(&self) -> Option<u64> {
        self.begun_at_ms
    }

    /// Seconds left on the lobby countdown.
    pub fn countdown_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    /// Virtual time since the room opened (ms).
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Current readiness.
    pub fn readiness(&self) -> ReadinessSnapshot {
        ReadinessSnapshot {
            ready_count: self.ready_count(),
            total: self.participants.len(),
            participants: self.participants.clone(),
            countdown_remaining: self.countdown_remaining(),
            status: self.status,
        }
    }

    /// Drain buffered events.
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::config::{ArenaType, BattleMode};
    use crate::battle::feed::{FeedTuning, RandomFeed, ScriptedFeed};

    fn trio() -> BattleConfig {
        BattleConfig::new(BattleMode::Multiplayer, ArenaType::Friends)
            .with_opponent("1")
            .with_opponent("2")
    }

    fn open_trio() -> WaitingRoom {
        let mut feed = RandomFeed::new(9, FeedTuning::default());
        WaitingRoom::open(trio(), &BattleSettings::default(), &mut feed).unwrap()
    }

    fn begins(events: &[BattleEvent]) -> usize {
        events.iter().filter(|e| e.data == BattleEventData::BattleBegins).count()
    }

    #[test]
    fn test_opponents_ready_on_schedule() {
        let mut room = open_trio();
        assert_eq!(room.readiness().ready_count, 0);
        assert_eq!(room.readiness().total, 3);

        room.advance(1_999);
        assert_eq!(room.readiness().ready_count, 0);
        room.advance(1);
        assert!(room.readiness().participants[1].ready);
        room.advance(2_000);
        assert!(room.readiness().participants[2].ready);
        assert_eq!(room.status(), WaitingStatus::Waiting);
    }

    #[test]
    fn test_begins_once_after_everyone_ready() {
        let mut room = open_trio();
        assert!(room.mark_human_ready());
        assert!(!room.mark_human_ready());

        room.advance(4_000);
        assert_eq!(room.status(), WaitingStatus::Starting);

        room.advance(1_999);
        assert!(!room.has_begun());
        room.advance(1);
        assert!(room.has_begun());
        assert_eq!(room.begun_at_ms(), Some(6_000));

        room.advance(60_000);
        assert_eq!(begins(&room.take_events()), 1);
        assert!(!room.mark_human_ready());
    }

    #[test]
    fn test_human_last_to_ready() {
        let mut room = open_trio();
        room.advance(10_000);
        assert_eq!(room.status(), WaitingStatus::Waiting);
        assert_eq!(room.countdown_remaining(), 20);

        room.mark_human_ready();
        room.advance(2_000);
        assert!(room.has_begun());
        assert_eq!(room.begun_at_ms(), Some(12_000));
    }

    #[test]
    fn test_countdown_expiry_is_inert() {
        let mut room = open_trio();
        room.advance(30_000);

        let events = room.take_events();
        assert!(events.iter().any(|e| e.data == BattleEventData::WaitingCountdownExpired));
        assert_eq!(room.status(), WaitingStatus::Waiting);
        assert_eq!(room.countdown_remaining(), 0);

        room.mark_human_ready();
        room.advance(2_000);
        assert!(room.has_begun());
    }

    #[test]
    fn test_cancel_suppresses_pending_readiness() {
        let mut room = open_trio();
        room.advance(2_500);
        assert!(room.cancel());
        assert!(!room.cancel());

        room.advance(10_000);
        let snapshot = room.readiness();
        assert_eq!(snapshot.ready_count, 1);
        assert_eq!(snapshot.status, WaitingStatus::Cancelled);
        assert_eq!(begins(&room.take_events()), 0);
    }

    #[test]
    fn test_opponent_without_ready_script_blocks_start() {
        let mut feed = ScriptedFeed::new().ready_after(vec![500]);
        let mut room = WaitingRoom::open(trio(), &BattleSettings::default(), &mut feed).unwrap();
        room.mark_human_ready();
        room.advance(60_000);
        assert_eq!(room.readiness().ready_count, 2);
        assert!(!room.has_begun());
    }

    #[test]
    fn test_rejects_empty_roster() {
        let config = BattleConfig::new(BattleMode::OneVOne, ArenaType::World);
        let mut feed = ScriptedFeed::new();
        let result = WaitingRoom::open(config, &BattleSettings::default(), &mut feed);
        assert_eq!(result.err(), Some(ConfigError::NoOpponents));
    }
}
