//! Quiz Battle Demo
//!
//! Plays a bot through a full battle in virtual time, then replays it from
//! its transcript and checks the state hashes match. `--live` also plays a
//! battle against the wall clock through the runtime driver.
//!
//! Usage: `quiz-battle [settings.json] [--live]`

use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use quiz_battle::{
    VERSION, DeterministicRng,
    battle::{
        ArenaType, BattleConfig, BattleEventData, BattleFlow, BattleMode, BattleSettings,
        BattleTranscript, QuestionBank, Screen,
        replay::verify,
    },
    runtime::{run_flow, DriverConfig, PlayerCommand},
};

/// Virtual frame length for the offline demo (ms).
const FRAME_MS: u64 = 100;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let live = args.iter().any(|a| a == "--live");
    let settings = match args.iter().find(|a| !a.starts_with("--")) {
        Some(path) => load_settings(path)?,
        None => BattleSettings::default(),
    };

    info!("Quiz Battle v{}", VERSION);
    info!(
        "{} questions, {} s each",
        settings.question_count, settings.question_time_secs
    );

    demo_battle(&settings)?;

    if live {
        demo_live(settings)?;
    }

    Ok(())
}

fn load_settings(path: &str) -> Result<BattleSettings> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path))?;
    let settings = BattleSettings::from_json(&json)
        .with_context(|| format!("parsing settings from {}", path))?;
    info!("Loaded settings from {}", path);
    Ok(settings)
}

fn demo_config() -> BattleConfig {
    BattleConfig::new(BattleMode::Multiplayer, ArenaType::Friends)
        .with_opponent("1")
        .with_opponent("2")
}

/// Play a battle in virtual time with a bot that answers after a few seconds
/// and is right about two times in three.
fn demo_battle(settings: &BattleSettings) -> Result<()> {
    info!("=== Starting Demo Battle ===");

    let mut flow = BattleFlow::with_random_feeds(QuestionBank::standard(), settings.clone());
    let mut bot = DeterministicRng::new(2024);

    flow.open_setup()?;
    let battle_id = flow.start_battle(demo_config())?;
    info!("Battle ID: {}", hex::encode(battle_id));
    flow.mark_ready()?;

    let mut answer_at_ms: Option<u64> = None;
    while flow.screen() != Screen::Results {
        flow.advance(FRAME_MS)?;

        for event in flow.take_events() {
            match event.data {
                BattleEventData::BattleBegins => info!("Battle begins"),
                BattleEventData::QuestionStarted { question_index, .. } => {
                    let think_ms = bot.next_delay_ms(1_000, 8_000);
                    answer_at_ms = Some(event.at_ms + think_ms);
                    info!("Question {} opened", question_index + 1);
                }
                BattleEventData::AnswerResolved { question_index, selected, correct, points, score, .. } => {
                    info!(
                        "Question {}: {} (+{}, total {})",
                        question_index + 1,
                        match (selected, correct) {
                            (None, _) => "timed out",
                            (Some(_), true) => "correct",
                            (Some(_), false) => "wrong",
                        },
                        points,
                        score
                    );
                }
                _ => {}
            }
        }

        let session = match flow.session() {
            Some(session) => session,
            None => continue,
        };
        if let Some(due) = answer_at_ms {
            if session.now_ms() >= due {
                answer_at_ms = None;
                let pick = match session.current_question() {
                    Some(q) if bot.next_int(3) < 2 => q.correct,
                    Some(q) => (q.correct + 1) % q.options.len(),
                    None => continue,
                };
                flow.submit_answer(pick)?;
            }
        }
    }

    // Print final results
    info!("=== Battle Results ===");
    let results = match flow.results() {
        Some(results) => results,
        None => bail!("battle finished without results"),
    };
    for standing in &results.standings {
        info!("#{}: {} {} - Score: {}", standing.rank, standing.avatar, standing.name, standing.score);
    }
    info!(
        "{} | {}/{} correct, accuracy {}%, {} stars",
        results.outcome.headline(),
        results.correct_count,
        results.total_questions,
        results.accuracy_percent,
        results.stars
    );

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let session = match flow.session() {
        Some(session) => session,
        None => bail!("battle finished without a session"),
    };
    let transcript = BattleTranscript::from_session(session)?;
    let bytes = transcript.to_bytes()?;
    info!("Transcript: {} inputs, {} bytes", transcript.inputs.len(), bytes.len());
    info!("Final State Hash: {}", hex::encode(transcript.final_hash));

    let decoded = BattleTranscript::from_bytes(&bytes)?;
    if verify(&decoded, flow.bank())? {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
    }

    Ok(())
}

/// Play a battle against the wall clock, answering every question at once.
fn demo_live(settings: BattleSettings) -> Result<()> {
    info!("=== Starting Live Battle ===");

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    runtime.block_on(async move {
        let flow = BattleFlow::with_random_feeds(QuestionBank::standard(), settings);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (update_tx, mut update_rx) = broadcast::channel(256);
        let driver = tokio::spawn(run_flow(flow, cmd_rx, update_tx, DriverConfig::default()));

        cmd_tx.send(PlayerCommand::OpenSetup).await?;
        cmd_tx.send(PlayerCommand::StartBattle { config: demo_config() }).await?;
        cmd_tx.send(PlayerCommand::MarkReady).await?;

        loop {
            let update = match update_rx.recv().await {
                Ok(update) => update,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Skipped {} updates", n);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            if update.events.iter().any(|e| matches!(e.data, BattleEventData::QuestionStarted { .. })) {
                tokio::time::sleep(Duration::from_millis(500)).await;
                cmd_tx.send(PlayerCommand::SubmitAnswer { index: 0 }).await?;
            }

            if update.screen == Screen::Results {
                info!("Live battle finished: {}", update.to_json()?);
                break;
            }
        }

        drop(cmd_tx);
        driver.await?;
        Ok::<(), anyhow::Error>(())
    })
}
