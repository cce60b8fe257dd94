//! Configuration surface for the reporter.
//!
//! The four options mirror the host runner's option table: gateway URL and
//! metric prefix gate activation, extra labels decorate every metric, and the
//! job name becomes the push grouping key. [`PushArgs`] is a plain clap
//! derive struct so a host CLI can `#[command(flatten)]` it into its own
//! argument set.

use clap::Parser;
use std::collections::BTreeMap;
use thiserror::Error;

/// Job name used when `--job-name` is not given.
pub const DEFAULT_JOB_NAME: &str = "test-run";

/// Command-line options for the metrics push.
#[derive(Debug, Clone, Default, Parser)]
pub struct PushArgs {
    /// Pushgateway URL to send metrics to (required for activation)
    #[arg(long)]
    pub pushgateway_url: Option<String>,

    /// Prefix prepended to every generated metric name (required for activation)
    #[arg(long)]
    pub metric_prefix: Option<String>,

    /// Extra label attached to every metric, as key=value (repeatable)
    #[arg(long = "extra-label", value_name = "KEY=VALUE")]
    pub extra_labels: Vec<String>,

    /// Value for the "job" grouping key of the push
    #[arg(long)]
    pub job_name: Option<String>,
}

/// Error raised while resolving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An `--extra-label` entry had no `=` separator.
    #[error("malformed extra label '{entry}': expected key=value")]
    MalformedLabel { entry: String },

    /// An `--extra-label` entry had an empty key.
    #[error("extra label '{entry}' has an empty key")]
    EmptyLabelKey { entry: String },
}

/// Resolved, immutable configuration for one session.
///
/// Only produced when both the gateway URL and the metric prefix are present;
/// otherwise the reporter stays inert for the whole run.
#[derive(Debug, Clone)]
pub struct PushConfig {
    /// Prefix for every generated metric name.
    pub prefix: String,
    /// Target Pushgateway endpoint.
    pub gateway_url: String,
    /// Grouping key for the push.
    pub job_name: String,
    /// Extra labels applied to every metric instance. Sorted by key, so
    /// label-name ordering is deterministic; a key given twice keeps its
    /// last value.
    pub extra_labels: BTreeMap<String, String>,
}

impl PushConfig {
    /// Resolve configuration from parsed arguments, with environment
    /// fallbacks for unset options.
    ///
    /// Supported variables:
    /// - `PROM_PUSHGATEWAY_URL`: gateway endpoint
    /// - `PROM_METRIC_PREFIX`: metric name prefix
    /// - `PROM_JOB_NAME`: push grouping key
    /// - `PROM_EXTRA_LABELS`: comma-separated key=value pairs
    ///
    /// Returns `Ok(None)` when either the URL or the prefix is missing: the
    /// reporter is simply not activated, and the remaining options are
    /// ignored. Malformed label entries are a hard error.
    pub fn resolve(args: &PushArgs) -> Result<Option<Self>, ConfigError> {
        let url = args
            .pushgateway_url
            .clone()
            .or_else(|| std::env::var("PROM_PUSHGATEWAY_URL").ok());
        let prefix = args
            .metric_prefix
            .clone()
            .or_else(|| std::env::var("PROM_METRIC_PREFIX").ok());

        let (gateway_url, prefix) = match (url, prefix) {
            (Some(u), Some(p)) => (u, p),
            _ => return Ok(None),
        };

        let job_name = args
            .job_name
            .clone()
            .or_else(|| std::env::var("PROM_JOB_NAME").ok())
            .unwrap_or_else(|| DEFAULT_JOB_NAME.to_string());

        // Environment labels first so explicit CLI entries win on key clashes.
        let mut entries: Vec<String> = Vec::new();
        if let Ok(env_labels) = std::env::var("PROM_EXTRA_LABELS") {
            entries.extend(
                env_labels
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
            );
        }
        entries.extend(args.extra_labels.iter().cloned());

        let extra_labels = parse_labels(&entries)?;

        Ok(Some(Self {
            prefix,
            gateway_url,
            job_name,
            extra_labels,
        }))
    }
}

/// Parse `key=value` entries into a label map.
///
/// Each entry is split on the first `=`; later entries overwrite earlier ones
/// with the same key.
pub fn parse_labels<S: AsRef<str>>(entries: &[S]) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut labels = BTreeMap::new();
    for entry in entries {
        let entry = entry.as_ref();
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| ConfigError::MalformedLabel {
                entry: entry.to_string(),
            })?;
        if key.is_empty() {
            return Err(ConfigError::EmptyLabelKey {
                entry: entry.to_string(),
            });
        }
        labels.insert(key.to_string(), value.to_string());
    }
    Ok(labels)
}
