//! prom-report: push test outcomes from libtest JSON output to a Pushgateway.
//!
//! Reads newline-delimited libtest JSON events (as produced by
//! `cargo test -- -Z unstable-options --format json`) from stdin or a file,
//! accumulates pass/fail/skip outcomes, and pushes them as gauge metrics in
//! one batch when the input ends.
//!
//! Example:
//!
//! ```text
//! cargo test -- -Z unstable-options --format json \
//!     | prom-report --pushgateway-url http://gw:9091 \
//!                   --metric-prefix myapp_ \
//!                   --extra-label branch=main \
//!                   --job-name ci
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use prom_report::{parse_event_line, PushArgs, PushConfig, ResultCollector};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "prom-report",
    about = "Push per-test outcomes from libtest JSON output to a Prometheus Pushgateway"
)]
struct Cli {
    #[command(flatten)]
    push: PushArgs,

    /// Read events from a file instead of stdin
    #[arg(long)]
    input: Option<PathBuf>,

    /// Print the accumulated outcomes as JSON to stdout before pushing
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Embedded in a host runner a missing option just leaves the reporter
    // inert; for the standalone binary there is nothing else to do, so it
    // is a usage error.
    let config = match PushConfig::resolve(&cli.push)? {
        Some(config) => config,
        None => {
            eprintln!("error: both --pushgateway-url and --metric-prefix are required");
            std::process::exit(2);
        }
    };

    let mut collector = ResultCollector::new(config);

    let recorded = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            feed_events(BufReader::new(file), &mut collector)?
        }
        None => feed_events(std::io::stdin().lock(), &mut collector)?,
    };

    if cli.dump {
        println!("{}", serde_json::to_string_pretty(collector.outcomes())?);
    }

    eprintln!("{}", collector.summary_notice());
    collector
        .finish()
        .context("failed to push metrics to the gateway")?;
    eprintln!("pushed {} test outcome(s)", recorded);

    Ok(())
}

/// Feed every recognizable event line into the collector.
///
/// Returns the number of outcomes recorded; unrecognized lines are skipped.
fn feed_events(reader: impl BufRead, collector: &mut ResultCollector) -> Result<usize> {
    let mut recorded = 0;
    for line in reader.lines() {
        let line = line.context("failed to read event line")?;
        if let Some(event) = parse_event_line(&line) {
            collector.record(&event);
            recorded += 1;
        }
    }
    Ok(recorded)
}
