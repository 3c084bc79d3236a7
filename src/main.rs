//! Headless memory-match runner (default binary).
//!
//! By default a perfect-memory player clears a seeded board on simulated time
//! and the final statistics are printed as JSON. With `--stdin` the session
//! runs in real time instead, reading commands (`flip:3`, `pause`, `resume`,
//! `reset`) line by line and printing a JSON snapshot after every change.

use anyhow::{anyhow, Result};
use clap::Parser;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use memory_match::content::CatalogProvider;
use memory_match::engine::{
    spawn_session, AutoPlayer, EngineConfig, GameDriver, ManualClock, TokioClock,
};
use memory_match::types::{CardCount, Command, ConfigError, Difficulty, GameConfig, GameMode};

#[derive(Parser)]
#[command(name = "memory-match")]
#[command(author, version, about = "Headless memory-matching game", long_about = None)]
struct Cli {
    /// Game mode: classic, timed or endless
    #[arg(short, long, default_value = "classic")]
    mode: String,

    /// Number of cards: 4, 6, 8, 12 or 16
    #[arg(short, long, default_value_t = 8)]
    cards: u32,

    /// Requested time limit in seconds (informational; the countdown follows the card count)
    #[arg(long)]
    time_limit: Option<u32>,

    /// Difficulty label (defaults to the one implied by the card count)
    #[arg(long)]
    difficulty: Option<String>,

    /// Seed for dealing and item selection (overrides MEMORY_MATCH_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Rounds to autoplay in endless mode
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// Simulated think time before every autoplayed flip, in milliseconds
    #[arg(long, default_value_t = 250)]
    think_ms: u64,

    /// Read commands from stdin and play in real time
    #[arg(long)]
    stdin: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig, ConfigError> {
        let mode = GameMode::from_str(&self.mode)
            .ok_or_else(|| ConfigError::UnknownMode(self.mode.clone()))?;
        let card_count = CardCount::try_from(self.cards)?;

        let mut config = GameConfig::new(mode, card_count);
        if let Some(raw) = &self.difficulty {
            config.difficulty = Difficulty::from_str(raw)
                .ok_or_else(|| ConfigError::UnknownDifficulty(raw.clone()))?;
        }
        if let Some(secs) = self.time_limit {
            config = config.with_time_limit(secs)?;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let game = cli.game_config()?;

    let mut engine = EngineConfig::from_env();
    if cli.seed.is_some() {
        engine.seed = cli.seed;
    }
    let provider = engine.catalog_provider().await?;

    info!(
        mode = game.mode.as_str(),
        cards = game.card_count.cards(),
        difficulty = game.difficulty.as_str(),
        seed = ?engine.seed,
        "starting"
    );

    if cli.stdin {
        run_commands(game, &engine, provider).await
    } else {
        autoplay(game, &engine, provider, &cli).await
    }
}

async fn autoplay(
    game: GameConfig,
    engine: &EngineConfig,
    provider: CatalogProvider,
    cli: &Cli,
) -> Result<()> {
    let mut driver = GameDriver::from_config(game, engine, provider, ManualClock::new(0));
    let rounds = AutoPlayer::new(cli.think_ms)
        .play(&mut driver, cli.rounds.max(1))
        .await;

    if let Some(warning) = driver.last_warning() {
        warn!(%warning, "board was degraded");
    }
    if rounds.is_empty() {
        return Err(anyhow!("no content available; the board could not be played"));
    }

    let session = driver.session();
    let summary = json!({
        "config": game,
        "outcome": session.outcome(),
        "round": session.round(),
        "carriedScore": session.carried_score(),
        "rounds": rounds,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn run_commands(
    game: GameConfig,
    engine: &EngineConfig,
    provider: CatalogProvider,
) -> Result<()> {
    let driver = GameDriver::from_config(game, engine, provider, TokioClock::new());
    let handle = spawn_session(driver);

    let mut snapshots = handle.subscribe();
    let printer = tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let line = serde_json::to_string(&*snapshots.borrow_and_update());
            match line {
                Ok(line) => println!("{line}"),
                Err(err) => warn!(error = %err, "failed to encode snapshot"),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match Command::from_str(line) {
            Some(command) => handle.send(command).await?,
            None => warn!(input = line, "unknown command"),
        }
    }

    handle.shutdown().await?;
    printer.await?;
    Ok(())
}
