use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use list_toolbar::{
    ListProfile, ListQuery, ListToolbar, MissingResourceLookup, ProfileKind, ResourceLookup,
    Viewport,
};
use shared::domain::ParentRef;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod fixture;

use commands::{execute, parse_line, Flow};
use fixture::{FixtureLookup, LoggingExecutor};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileArg {
    Address,
    AddressSpace,
}

impl From<ProfileArg> for ProfileKind {
    fn from(value: ProfileArg) -> Self {
        match value {
            ProfileArg::Address => ProfileKind::Address,
            ProfileArg::AddressSpace => ProfileKind::AddressSpace,
        }
    }
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, value_enum, default_value = "address")]
    profile: ProfileArg,
    /// Parent address space name.
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    namespace: Option<String>,
    /// JSON map of `namespace/name` to lookup responses.
    #[arg(long)]
    fixture: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    lookup_delay_ms: u64,
    #[arg(long, default_value = "toolbar.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let settings = config::load_settings(&args.config)?;

    let delay = Duration::from_millis(args.lookup_delay_ms);
    let lookup: Arc<dyn ResourceLookup> = match &args.fixture {
        Some(path) => Arc::new(FixtureLookup::load(path, delay).await?),
        None => Arc::new(MissingResourceLookup),
    };

    let viewport = Viewport::new(settings.viewport_width);
    let mut toolbar = ListToolbar::new(
        ListProfile::for_kind(args.profile.into()),
        settings.toolbar_options(),
        ParentRef::from_parts(args.name.as_deref(), args.namespace.as_deref()),
        lookup,
        Arc::new(LoggingExecutor),
        viewport.subscribe(),
    );
    tokio::spawn(log_refetches(toolbar.filters().subscribe()));
    info!(profile = ?args.profile, "console: ready");

    print_snapshot(&toolbar)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let resolving = toolbar.wizard().is_resolving();
        tokio::select! {
            _ = toolbar.wizard_mut().settle(), if resolving => {
                print_snapshot(&toolbar)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let command = match parse_line(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(err) => {
                        eprintln!("{err}");
                        continue;
                    }
                };
                match execute(&mut toolbar, &viewport, command).await {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => print_snapshot(&toolbar)?,
                    Err(err) => warn!("console: command failed: {err:#}"),
                }
            }
        }
    }

    Ok(())
}

/// Stands in for the list data fetcher: one log line per distinct query.
async fn log_refetches(mut queries: watch::Receiver<ListQuery>) {
    while queries.changed().await.is_ok() {
        let query = queries.borrow_and_update().clone();
        match serde_json::to_string(&query) {
            Ok(json) => info!(query = %json, "fetch: list query changed"),
            Err(err) => warn!("fetch: failed to encode query: {err}"),
        }
    }
}

fn print_snapshot(toolbar: &ListToolbar) -> Result<()> {
    println!("{}", serde_json::to_string(&toolbar.snapshot())?);
    Ok(())
}
