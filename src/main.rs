// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission Gate demo
//!
//! Submits a document several times through a rate limited gate and prints
//! each result as it arrives.
//!
//! ## Configuration
//!
//! Defaults come from the environment (see `Config::from_env`):
//!
//! - `GATE_LIMIT`, `GATE_WINDOW`, `GATE_WINDOW_MS`
//! - `SUBMIT_URL`, `SUBMIT_AUTH_HEADER`, `SUBMIT_AUTH_TOKEN`
//!
//! Command-line flags override them.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use prometheus::{Encoder, Registry, TextEncoder};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use submission_gate::{
    config::Config,
    document::Document,
    transport::{BlockingHttpSubmitter, DetachedHttpSubmitter, HttpSubmitter},
    BlockingGate, GateMetrics, RateLimitedGate, WindowUnit,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Await each response body
    Await,
    /// Fire requests and return an acknowledgement immediately
    Detached,
    /// Blocking client on plain threads
    Blocking,
}

#[derive(Parser)]
#[command(
    name = "submission-gate",
    about = "Rate limited document submission demo"
)]
struct Args {
    /// Submissions allowed per window
    #[arg(long)]
    limit: Option<u32>,

    /// Window length: second, minute or hour
    #[arg(long)]
    window: Option<WindowUnit>,

    /// Window length in milliseconds (overrides --window)
    #[arg(long)]
    window_ms: Option<u64>,

    /// Transport variant
    #[arg(long, value_enum, default_value = "await")]
    mode: Mode,

    /// How many times to submit the document
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// JSON document to submit (default: built-in sample)
    #[arg(long)]
    document: Option<PathBuf>,

    /// Endpoint URL
    #[arg(long)]
    url: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print Prometheus metrics after the run
    #[arg(long)]
    print_metrics: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    let config = load_config(&args)?;
    let document = match &args.document {
        Some(path) => read_document(path)?,
        None => Document::sample(),
    };

    info!(
        limit = config.gate.limit,
        window = ?config.gate.window_duration(),
        url = %config.endpoint.url,
        mode = ?args.mode,
        count = args.count,
        "Starting submission gate"
    );

    let registry = Registry::new();
    let metrics = GateMetrics::register(&registry)?;

    match args.mode {
        Mode::Blocking => run_blocking(&config, metrics, document, args.count)?,
        mode => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(run_async(&config, mode, metrics, document, args.count))?,
    }

    if args.print_metrics {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
        print!("{}", String::from_utf8(buffer)?);
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

/// Environment first, then command-line overrides.
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = Config::from_env()?;

    if let Some(limit) = args.limit {
        config.gate.limit = limit;
    }
    if let Some(unit) = args.window {
        config.gate.window = unit;
        config.gate.window_ms = None;
    }
    if let Some(ms) = args.window_ms {
        config.gate.window_ms = Some(ms);
    }
    if let Some(url) = &args.url {
        config.endpoint.url = url.clone();
    }

    config.validate()?;
    Ok(config)
}

fn read_document(path: &Path) -> anyhow::Result<Document> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading document {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing document {}", path.display()))
}

async fn run_async(
    config: &Config,
    mode: Mode,
    metrics: GateMetrics,
    document: Document,
    count: usize,
) -> anyhow::Result<()> {
    let http = HttpSubmitter::new(config.endpoint.clone());

    match mode {
        Mode::Detached => {
            let (tx, mut deliveries) = mpsc::unbounded_channel();
            let submitter = DetachedHttpSubmitter::new(http).with_delivery(tx);
            let gate = RateLimitedGate::from_config(&config.gate, submitter)?.with_metrics(metrics);
            submit_all(Arc::new(gate), document, count).await;

            for n in 1..=count {
                match deliveries.recv().await {
                    Some(delivery) => match delivery.result {
                        Ok(body) => println!("delivery {n}: {body}"),
                        Err(e) => println!("delivery {n} failed: {e}"),
                    },
                    None => break,
                }
            }
        }
        _ => {
            let gate = RateLimitedGate::from_config(&config.gate, http)?.with_metrics(metrics);
            submit_all(Arc::new(gate), document, count).await;
        }
    }

    Ok(())
}

async fn submit_all<S>(gate: Arc<RateLimitedGate<S>>, document: Document, count: usize)
where
    S: submission_gate::Submitter<Document, Output = String> + 'static,
    S::Error: std::fmt::Display,
{
    let mut tasks = JoinSet::new();
    for n in 1..=count {
        let gate = gate.clone();
        let document = document.clone();
        tasks.spawn(async move { (n, gate.submit(document).await) });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((n, Ok(body))) => println!("submission {n}: {body}"),
            Ok((n, Err(e))) => println!("submission {n} failed: {e}"),
            Err(e) => warn!(error = %e, "Submission task panicked"),
        }
    }
}

fn run_blocking(
    config: &Config,
    metrics: GateMetrics,
    document: Document,
    count: usize,
) -> anyhow::Result<()> {
    let submitter = BlockingHttpSubmitter::new(config.endpoint.clone());
    let gate = Arc::new(BlockingGate::from_config(&config.gate, submitter)?.with_metrics(metrics));

    let handles: Vec<_> = (1..=count)
        .map(|n| {
            let gate = gate.clone();
            let document = document.clone();
            thread::spawn(move || (n, gate.submit(document)))
        })
        .collect();

    for handle in handles {
        match handle.join() {
            Ok((n, Ok(body))) => println!("submission {n}: {body}"),
            Ok((n, Err(e))) => println!("submission {n} failed: {e}"),
            Err(_) => warn!("Submission thread panicked"),
        }
    }

    Ok(())
}
