mod render;
mod study;

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use services::{DeckService, SessionLoopService};
use storage::repository::{DeckRecord, Storage};
use study_core::model::{CardOrder, CardSide, DeckId, MaxCycles, SessionConfig};

#[derive(Parser)]
#[command(name = "study", about = "Multi-cycle flashcard study sessions", version)]
struct Cli {
    /// Directory holding `<deck-id>.json` deck files
    #[arg(long, global = true, env = "STUDY_DECKS_DIR", default_value = "decks")]
    decks: PathBuf,

    /// SQLite URL (e.g. `sqlite:study.sqlite3?mode=rwc`); used instead of --decks when set
    #[arg(long, global = true, env = "STUDY_DB_URL")]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available decks
    List,

    /// Study a deck interactively
    Study {
        /// Deck id, as shown by `list`
        deck_id: DeckId,
        /// Face shown first; the other face is revealed before judging
        #[arg(long, env = "STUDY_START_SIDE", default_value = "front")]
        start_side: CardSide,
        /// Retry passes allowed, 1 to 6
        #[arg(long, env = "STUDY_MAX_CYCLES", default_value = "3", value_parser = parse_max_cycles)]
        max_cycles: MaxCycles,
        /// Order of the first pass: original or random
        #[arg(long, env = "STUDY_ORDER", default_value = "original")]
        order: CardOrder,
        /// Seed for a reproducible random order
        #[arg(long, env = "STUDY_SEED")]
        seed: Option<u64>,
    },

    /// Validate a deck file and add it without overwriting existing decks
    Import {
        /// Path to a deck JSON file
        file: PathBuf,
    },
}

fn parse_max_cycles(raw: &str) -> Result<MaxCycles, String> {
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("expected a whole number, got {raw:?}"))?;
    MaxCycles::new(value).map_err(|e| e.to_string())
}

async fn open_storage(cli: &Cli) -> anyhow::Result<Storage> {
    match &cli.db {
        Some(url) => {
            log::debug!("using SQLite storage at {url}");
            Storage::sqlite(url)
                .await
                .with_context(|| format!("cannot open database {url}"))
        }
        None => {
            log::debug!("using deck directory {}", cli.decks.display());
            Ok(Storage::json(cli.decks.clone()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let storage = open_storage(&cli).await?;

    match cli.command {
        Command::List => {
            let decks = DeckService::new(storage.decks).list_decks().await?;
            render::deck_list(&mut io::stdout().lock(), &decks)?;
        }
        Command::Study {
            deck_id,
            start_side,
            max_cycles,
            order,
            seed,
        } => {
            let config = SessionConfig::new(start_side, max_cycles, order);
            let loop_svc = SessionLoopService::new(storage.decks).with_shuffle_seed(seed);
            let mut session = loop_svc.start_session(&deck_id, config).await?;

            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut output = io::stdout().lock();
            let exit = study::run(&loop_svc, &mut session, &mut input, &mut output)?;
            if exit == study::Exit::Quit {
                log::info!("session on deck {} left before the end", session.deck_id());
            }
            render::report(&mut output, &session.report())?;
        }
        Command::Import { file } => {
            let raw = tokio::fs::read(&file)
                .await
                .with_context(|| format!("cannot read {}", file.display()))?;
            let record: DeckRecord = serde_json::from_slice(&raw)
                .with_context(|| format!("{} is not a valid deck file", file.display()))?;
            let deck_id = DeckService::new(storage.decks).create_deck(record).await?;
            println!("imported deck {deck_id}");
        }
    }

    Ok(())
}
