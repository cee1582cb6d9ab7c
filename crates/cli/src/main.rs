use crate::{
    config::{ConfigOverrides, RefresherConfig},
    env::EnvManager,
    error::CliError,
};
use clap::Parser;
use commands::Commands;
use connectors::{chain::rpc::JsonRpcProvider, indexer::opensea::OpenSeaClient};
use engine_core::{event_bus::EventBus, pacing::Pacer};
use engine_runtime::execution::{
    driver::RefreshDriver, executor, resolver::CollectionResolver,
};
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod env;
mod error;
mod output;

const DEFAULT_ENV_FILE: &str = ".env";
const EVENT_BUFFER: usize = 1024;

#[derive(Parser)]
#[command(
    name = "nft-refresh",
    version,
    about = "Refresh the metadata of an NFT collection on OpenSea"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        long,
        global = true,
        help = "Load environment variables from this file (defaults to .env when present)"
    )]
    env_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Ethereum JSON-RPC endpoint, overrides RPC_URL and ALCHEMY_API_KEY"
    )]
    rpc_url: Option<String>,

    #[arg(long, global = true, help = "Indexer base URL, overrides INDEXER_BASE_URL")]
    indexer_url: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Delay between refresh requests in milliseconds, overrides REFRESH_DELAY_MS"
    )]
    delay_ms: Option<u64>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(message) = failure_message(&err) {
                eprintln!("{message}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Line to print for `err`, or `None` when the user has already seen it.
fn failure_message(err: &CliError) -> Option<String> {
    match err {
        CliError::RefreshAborted(_) => None,
        err => Some(format!("Error: {err}")),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let env = load_env(cli.env_file.as_deref())?;
    let overrides = ConfigOverrides {
        rpc_url: cli.rpc_url,
        indexer_url: cli.indexer_url,
        delay_ms: cli.delay_ms,
    };
    let config = RefresherConfig::from_env(&env, &overrides)?;

    match cli.command {
        Commands::Refresh {
            contract,
            offset,
            output,
            json_events,
        } => {
            refresh(&config, &contract, offset, output.as_deref(), json_events).await?;
        }
        Commands::Resolve { contract, output } => {
            let resolver = build_resolver(&config, http_client(&config)?)?;
            let descriptor = resolver.resolve(&contract).await?;
            output::write_json(&descriptor, output.as_deref()).await?;
        }
        Commands::CheckConfig => output::print_config(&config),
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so that stdout carries only results.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_env(env_file: Option<&Path>) -> Result<EnvManager, CliError> {
    let mut env = EnvManager::new();
    match env_file {
        Some(path) => env.load_from_file(path)?,
        None if Path::new(DEFAULT_ENV_FILE).is_file() => env.load_from_file(DEFAULT_ENV_FILE)?,
        None => {}
    }
    Ok(env)
}

fn http_client(config: &RefresherConfig) -> Result<reqwest::Client, CliError> {
    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .user_agent(concat!("nft-refresh/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

fn build_resolver(
    config: &RefresherConfig,
    client: reqwest::Client,
) -> Result<CollectionResolver, CliError> {
    let provider = JsonRpcProvider::with_client(client, config.rpc_url()?);
    Ok(CollectionResolver::new(Arc::new(provider)))
}

async fn refresh(
    config: &RefresherConfig,
    contract: &str,
    offset: u64,
    output: Option<&str>,
    json_events: bool,
) -> Result<(), CliError> {
    let client = http_client(config)?;
    let resolver = build_resolver(config, client.clone())?;
    let indexer = OpenSeaClient::with_client(client, config.indexer_base_url.clone());

    let events = EventBus::new();
    let (_subscription, receiver) = events.subscribe(EVENT_BUFFER).await;
    let renderer = tokio::spawn(output::render_events(receiver, json_events));

    let driver = RefreshDriver::new(
        Arc::new(indexer),
        Pacer::new(config.refresh_delay),
        events.clone(),
    );
    info!(contract, offset, "Refreshing collection metadata");
    let result = executor::run(&resolver, &driver, contract, offset).await;

    // Ends the renderer's stream once everything published has been printed.
    events.clear().await;
    renderer.await?;

    let report = result.map_err(CliError::RefreshAborted)?;
    if !json_events {
        output::print_summary(&report);
    }
    if !report.all_refreshed() {
        warn!(
            skipped = report.skipped.len(),
            "Some tokens could not be refreshed"
        );
    }
    if let Some(path) = output {
        output::write_json(&report, Some(path)).await?;
        info!(path, "Wrote run report");
    }

    Ok(())
}
