//! Command-line address resolver.
//!
//! Resolves the addresses given as arguments, or one per line on stdin, and
//! prints one JSON object per address to stdout in input order.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hkaddress::{BatchOptions, Config, Language, Resolution, Resolver, Source, Strategy};

#[derive(Parser, Debug)]
#[command(name = "resolve")]
#[command(about = "Resolve Hong Kong addresses via OGCIO and the Lands Department")]
struct Args {
    /// Addresses to resolve (reads stdin, one per line, when omitted)
    addresses: Vec<String>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum concurrent resolutions
    #[arg(long)]
    concurrency: Option<usize>,

    /// Number of OGCIO suggestions to request
    #[arg(long)]
    limit: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Output language for formatted addresses (eng or chi)
    #[arg(long, default_value = "chi")]
    lang: Language,

    /// Only print the best candidate per address
    #[arg(long)]
    best: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    query: &'a str,
    strategy: Strategy,
    results: Vec<OutputRow>,
}

#[derive(Serialize)]
struct OutputRow {
    source: Source,
    address: String,
    lat: f64,
    lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_km: Option<f64>,
}

fn to_output<'a>(query: &'a str, resolution: &Resolution, lang: Language, best: bool) -> Output<'a> {
    let take = if best { 1 } else { resolution.len() };
    Output {
        query,
        strategy: resolution.strategy,
        results: resolution
            .candidates
            .iter()
            .take(take)
            .map(|c| OutputRow {
                source: c.address.source(),
                address: c.address.full_address(lang),
                lat: c.address.coordinate().lat,
                lon: c.address.coordinate().lon,
                score: c.address.score(),
                distance_km: c.distance,
            })
            .collect(),
    }
}

fn read_stdin() -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays JSON
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(concurrency) = args.concurrency {
        config.batch.concurrency_limit = concurrency;
    }
    if let Some(limit) = args.limit {
        config.ogcio.limit = limit;
    }
    if let Some(timeout) = args.timeout {
        config.http.timeout_secs = timeout;
    }

    let addresses = if args.addresses.is_empty() {
        read_stdin()?
    } else {
        args.addresses.clone()
    };

    if addresses.is_empty() {
        anyhow::bail!("No addresses given");
    }

    let resolver = Arc::new(
        Resolver::from_config(&config).context("Failed to build provider clients")?,
    );

    info!("OGCIO endpoint: {}", config.ogcio.endpoint);
    info!("Land endpoint: {}", config.land.endpoint);

    let results = resolver
        .resolve_many(&addresses, BatchOptions::from(&config.batch))
        .await
        .context("Address resolution failed")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (query, resolution) in addresses.iter().zip(&results) {
        let output = to_output(query, resolution, args.lang, args.best);
        serde_json::to_writer(&mut out, &output)?;
        writeln!(out)?;
    }

    Ok(())
}
