//! revpackd — placement strategy daemon.
//!
//! Resolves a placement strategy by name, initializes it, and answers
//! placement requests from the host scheduler.
//!
//! # Usage
//!
//! ```text
//! revpackd --config revpack.toml serve
//! revpackd place --input request.json
//! revpackd strategies
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use revpack_core::{PlacementEnvelope, PlacementReply, RevpackConfig};
use revpack_placement::{Evaluation, StrategyRegistry, container_to_request, evaluate_hosts};
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

mod serve;

#[derive(Parser)]
#[command(
    name = "revpackd",
    about = "Reverse bin-pack placement strategy for container schedulers",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to revpack.toml. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Strategy name, overriding [strategy].name from the config.
    #[arg(short, long, global = true)]
    strategy: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer placement requests read line by line from stdin.
    Serve,
    /// Decide a single placement request.
    Place {
        /// JSON request file, or `-` for stdin.
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
        /// Also print the ranked hosts with their scores and the excluded
        /// hosts with the reason.
        #[arg(long)]
        explain: bool,
    },
    /// List registered strategies.
    Strategies,
}

#[derive(Serialize)]
struct Explained<'a> {
    reply: &'a PlacementReply,
    #[serde(flatten)]
    evaluation: Evaluation<'a>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RevpackConfig::from_file(path)?,
        None => RevpackConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.log.filter))
                .with_context(|| format!("invalid log filter: {}", config.log.filter))?,
        )
        .with_writer(std::io::stderr)
        .init();

    let mut registry = StrategyRegistry::with_defaults();
    let name = cli.strategy.unwrap_or(config.strategy.name);

    match cli.command {
        Command::Strategies => {
            for name in registry.names() {
                println!("{name}");
            }
            Ok(())
        }
        Command::Serve => {
            let strategy = registry.activate(&name)?;
            serve::run(strategy.as_ref()).await
        }
        Command::Place { input, explain } => {
            let strategy = registry.activate(&name)?;
            let envelope = read_envelope(&input).await?;
            let reply = serve::handle_envelope(strategy.as_ref(), &envelope);

            if explain {
                let request = container_to_request(&envelope.container);
                // An invalid request has nothing meaningful to rank.
                let evaluation = evaluate_hosts(&request, &envelope.hosts).unwrap_or_default();
                let explained = Explained {
                    reply: &reply,
                    evaluation,
                };
                println!("{}", serde_json::to_string_pretty(&explained)?);
            } else {
                println!("{}", serde_json::to_string(&reply)?);
            }

            if let PlacementReply::Error(msg) = &reply {
                anyhow::bail!("placement failed: {msg}");
            }
            Ok(())
        }
    }
}

async fn read_envelope(input: &Path) -> anyhow::Result<PlacementEnvelope> {
    let content = if input == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("failed to read request from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("failed to read {}", input.display()))?
    };
    serde_json::from_str(&content).context("malformed placement request")
}
