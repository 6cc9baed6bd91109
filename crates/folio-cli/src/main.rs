//! folio — replay editor intent logs against a page.
//!
//! Usage:
//!   # Replay a log and persist to the configured remote store
//!   folio replay --page page.json --events session.jsonl
//!
//!   # Same, but keep writes in memory
//!   folio replay --page page.json --events session.jsonl --dry-run
//!
//!   # List a page's blocks with their display positions
//!   folio show --page page.json
//!
//! `RUST_LOG` controls log output (stderr); `FOLIO_API` overrides the remote
//! store base URL.

mod replay;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folio_editor::{ControllerConfig, PageController, RecordedFocus};
use folio_store::index_to_display;
use folio_sync::{spawn_sync_agent, HttpRemoteStore, MemoryRemoteStore, RemoteStore, SyncConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Block editor core: replay intents, persist pages")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hydrate a page, apply an intent log, flush persistence, print the result
    Replay {
        /// Page JSON file ({ "id": ..., "blocks": [...] })
        #[arg(long)]
        page: PathBuf,

        /// Intent log, one JSON event per line
        #[arg(long)]
        events: PathBuf,

        /// Persist to an in-memory store instead of the remote API
        #[arg(long)]
        dry_run: bool,

        /// Sync config file (RON); defaults to the user config dir
        #[arg(long)]
        config: Option<PathBuf>,

        /// Allow deleting the last block on the page
        #[arg(long)]
        allow_empty: bool,

        /// Give up waiting for persistence after this many seconds
        #[arg(long, default_value_t = 30)]
        flush_timeout: u64,
    },
    /// Print a page's blocks with 1-based display positions
    Show {
        #[arg(long)]
        page: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let result = match args.command {
        Command::Replay {
            page,
            events,
            dry_run,
            config,
            allow_empty,
            flush_timeout,
        } => {
            cmd_replay(ReplayArgs {
                page,
                events,
                dry_run,
                config,
                allow_empty,
                flush_timeout: Duration::from_secs(flush_timeout),
            })
            .await
        }
        Command::Show { page } => cmd_show(&page),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

struct ReplayArgs {
    page: PathBuf,
    events: PathBuf,
    dry_run: bool,
    config: Option<PathBuf>,
    allow_empty: bool,
    flush_timeout: Duration,
}

async fn cmd_replay(args: ReplayArgs) -> Result<()> {
    let page = replay::read_page(&args.page)?;
    let events = replay::read_events(&args.events)?;

    let memory = Arc::new(MemoryRemoteStore::new());
    let remote: Arc<dyn RemoteStore> = if args.dry_run {
        tracing::info!("Dry run, writes stay in memory");
        memory.clone()
    } else {
        let config = SyncConfig::discover(args.config.as_deref()).context("loading sync config")?;
        tracing::info!(api = %config.api_base, "Persisting to remote store");
        Arc::new(HttpRemoteStore::new(&config)?)
    };

    let (sync, task) = spawn_sync_agent(remote);
    let config = ControllerConfig {
        keep_last_block: !args.allow_empty,
    };
    let mut controller = PageController::with_config(page, config, sync.clone(), RecordedFocus::default())
        .context("hydrating page")?;

    let total = events.len();
    let stats = replay::replay(&mut controller, events);
    tracing::info!(
        page = %controller.page_id(),
        total,
        applied = stats.applied,
        rejected = stats.rejected,
        focus_moves = controller.focus_target().requests.len(),
        "Replayed intent log"
    );

    if tokio::time::timeout(args.flush_timeout, sync.flush()).await.is_err() {
        tracing::warn!("Timed out waiting for persistence, exiting with writes pending");
    }
    sync.shutdown();
    task.await.context("sync worker panicked")?;

    let status = sync.status();
    tracing::info!(
        issued = status.latest_issued(),
        acked = ?status.last_acked(),
        superseded = status.superseded(),
        failures = status.failures(),
        "Persistence finished"
    );
    if args.dry_run {
        tracing::info!(writes = memory.call_count(), "Dry-run writes");
    }

    println!("{}", serde_json::to_string_pretty(&controller.page())?);
    Ok(())
}

fn cmd_show(path: &Path) -> Result<()> {
    let page = replay::read_page(path)?;
    println!("page {} ({} blocks)", page.id, page.block_count());
    for (index, block) in page.blocks.iter().enumerate() {
        println!(
            "{:>4}  {:<3} {:<10} {}",
            index_to_display(index).to_string(),
            block.tag.as_str(),
            block.id.short(),
            block.content
        );
    }
    Ok(())
}
