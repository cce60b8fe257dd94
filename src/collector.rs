//! Session-scoped result collector.

use crate::config::PushConfig;
use crate::event::{OutcomeLog, Phase, TestEvent};
use crate::gateway::{build_families, push_families, PushError};
use crate::sanitize::sanitize_metric_name;
use prometheus::proto::MetricFamily;

/// Accumulates per-test outcomes for one session and pushes them as gauge
/// metrics when the session finishes.
///
/// Lifecycle: construct once at session start, feed it every [`TestEvent`]
/// via [`record`](Self::record), then call [`finish`](Self::finish) exactly
/// once at session end. `finish` takes the collector by value, so recording
/// after the push (or pushing twice) is ruled out by ownership.
#[derive(Debug)]
pub struct ResultCollector {
    config: PushConfig,
    log: OutcomeLog,
}

impl ResultCollector {
    /// Create a collector for one session.
    pub fn new(config: PushConfig) -> Self {
        Self {
            config,
            log: OutcomeLog::new(),
        }
    }

    /// Record one test outcome.
    ///
    /// Events from setup or teardown phases are ignored; only the call phase
    /// classifies the test. Purely in-memory, no external side effect.
    pub fn record(&mut self, event: &TestEvent) {
        if event.phase != Phase::Call {
            return;
        }
        let sanitized = sanitize_metric_name(&event.name);
        tracing::debug!(test = %sanitized, outcome = ?event.outcome, "recorded outcome");
        self.log.append(event.outcome, sanitized);
    }

    /// The resolved configuration this collector was built with.
    pub fn config(&self) -> &PushConfig {
        &self.config
    }

    /// Outcomes recorded so far.
    pub fn outcomes(&self) -> &OutcomeLog {
        &self.log
    }

    /// Assemble the gauge families the push would transmit.
    ///
    /// Exposed separately from [`finish`](Self::finish) so the batch can be
    /// inspected without a live gateway.
    pub fn metric_families(&self) -> Result<Vec<MetricFamily>, PushError> {
        build_families(&self.config, &self.log)
    }

    /// Build the metric batch and push it to the gateway.
    ///
    /// One synchronous push per session; a gateway failure propagates to the
    /// caller untouched.
    pub fn finish(self) -> Result<(), PushError> {
        let families = self.metric_families()?;
        push_families(&self.config, families)
    }

    /// One-line notice for the run's textual summary, naming the gateway the
    /// metrics go to.
    pub fn summary_notice(&self) -> String {
        format!(
            "test metrics pushed to {} (job={})",
            self.config.gateway_url, self.config.job_name
        )
    }
}
