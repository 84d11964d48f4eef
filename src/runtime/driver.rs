//! Real-Time Driver
//!
//! Runs a [`BattleFlow`] against the wall clock: a fixed-rate frame feeds
//! elapsed time into the flow, player commands arrive on a channel, and a
//! [`ViewUpdate`] goes out whenever something happened.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::battle::flow::{BattleFlow, FlowError};
use crate::runtime::protocol::{PlayerCommand, ViewUpdate};

/// Driver configuration.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Time between frames.
    pub frame: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            frame: Duration::from_millis(100),
        }
    }
}

/// Drive `flow` until the command channel closes, then hand it back.
#[instrument(skip_all)]
pub async fn run_flow(
    mut flow: BattleFlow,
    mut commands: mpsc::Receiver<PlayerCommand>,
    updates: broadcast::Sender<ViewUpdate>,
    config: DriverConfig,
) -> BattleFlow {
    let mut frame = interval(config.frame);
    frame.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut clock = Instant::now();
    info!("Driver started, frame {:?}", config.frame);

    loop {
        tokio::select! {
            _ = frame.tick() => {
                let outcome = catch_up(&mut flow, &mut clock);
                publish(&mut flow, &updates, outcome, false);
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    break;
                };
                debug!("Command {:?}", command);

                // Commands land at the current instant, not the last frame
                let outcome = catch_up(&mut flow, &mut clock)
                    .and_then(|_| apply_command(&mut flow, command));
                publish(&mut flow, &updates, outcome, true);
            }
        }
    }

    info!("Command channel closed, driver stopping");
    flow
}

/// Feed the time since `clock` into the flow, in whole milliseconds.
fn catch_up(flow: &mut BattleFlow, clock: &mut Instant) -> Result<(), FlowError> {
    let elapsed_ms = clock.elapsed().as_millis() as u64;
    if elapsed_ms == 0 {
        return Ok(());
    }
    *clock += Duration::from_millis(elapsed_ms);
    flow.advance(elapsed_ms)
}

fn apply_command(flow: &mut BattleFlow, command: PlayerCommand) -> Result<(), FlowError> {
    match command {
        PlayerCommand::OpenSetup => flow.open_setup(),
        PlayerCommand::StartBattle { config } => flow.start_battle(config).map(|_| ()),
        PlayerCommand::MarkReady => flow.mark_ready().map(|_| ()),
        PlayerCommand::CancelWaiting => flow.cancel_waiting(),
        PlayerCommand::SubmitAnswer { index } => flow.submit_answer(index).map(|_| ()),
        PlayerCommand::Rematch => flow.rematch().map(|_| ()),
        PlayerCommand::Home => {
            flow.home();
            Ok(())
        }
    }
}

fn publish(
    flow: &mut BattleFlow,
    updates: &broadcast::Sender<ViewUpdate>,
    outcome: Result<(), FlowError>,
    always: bool,
) {
    let mut update = ViewUpdate::capture(flow);
    if let Err(e) = outcome {
        warn!("Command refused: {}", e);
        update = update.with_error(e);
    }

    if always || update.has_news() {
        // No subscribers is fine
        let _ = updates.send(update);
    }
}
