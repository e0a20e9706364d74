use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use skybot::config::{self, SkybotConfig};
use skybot::session::{Session, TurnOutcome};
use skybot::store::FileStore;

#[derive(Parser)]
#[command(name = "skybot")]
#[command(about = "A tiny chatbot that learns facts and babbles from memory")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "SKYBOT_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat interactively on stdin/stdout
    Chat,

    /// Send a single utterance and print the reply
    Say {
        /// What to say
        utterance: String,
    },

    /// Show what the bot currently remembers
    Status,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Chat => chat(&config),
        Commands::Say { utterance } => {
            let mut session = open_session(&config)?;
            if let Some(text) = report(session.turn(&utterance)) {
                println!("{text}");
            }
            Ok(())
        }
        Commands::Status => status(&config),
    }
}

fn open_session(config: &SkybotConfig) -> anyhow::Result<Session<FileStore>> {
    let store = FileStore::from_config(&config.storage);
    Ok(Session::open(config, store, StdRng::from_entropy())?)
}

/// Print a persistence warning if there is one and hand back the reply text.
fn report(outcome: TurnOutcome) -> Option<String> {
    match outcome {
        TurnOutcome::Exit => None,
        TurnOutcome::Reply {
            reply,
            persist_error,
        } => {
            if let Some(err) = persist_error {
                eprintln!("warning: {err}");
            }
            Some(reply.text)
        }
    }
}

fn chat(config: &SkybotConfig) -> anyhow::Result<()> {
    let mut session = open_session(config)?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("Bot: {}", session.greeting());

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match report(session.turn(&line)) {
            Some(text) => println!("Bot: {text}"),
            None => break,
        }
        stdout.flush()?;
    }

    Ok(())
}

fn status(config: &SkybotConfig) -> anyhow::Result<()> {
    let session = open_session(config)?;
    let store = session.store();
    let memory = session.memory();

    println!("skybot v{}", env!("CARGO_PKG_VERSION"));
    println!("conversation: {}", store.conversation_path().display());
    println!("diary: {}", store.diary_path().display());
    if let Some(path) = store.facts_path() {
        println!("facts: {}", path.display());
    }
    println!("memory: {}/{}", memory.log.len(), memory.log.max_size());

    if memory.facts.is_empty() {
        println!("known facts: none");
    } else {
        println!("known facts:");
        for (kind, fact) in memory.facts.iter() {
            println!(
                "  {}: {} (learned {})",
                kind.as_str(),
                fact.value,
                fact.learned_at.format("%Y-%m-%d %H:%M")
            );
        }
    }
    Ok(())
}
