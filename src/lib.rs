//! # prom-report
//!
//! A small test-result reporter that accumulates per-test pass/fail/skip
//! outcomes during a run and pushes them as labeled gauge metrics to a
//! Prometheus Pushgateway when the run finishes.
//!
//! The reporter only activates when both a gateway URL and a metric prefix
//! are configured; otherwise it is never constructed and the run proceeds
//! untouched. Metric names are sanitized to the Prometheus alphabet, every
//! instance is labeled with the test name plus any configured extra labels,
//! and exactly one push happens per session.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prom_report::{PushArgs, PushConfig, ResultCollector, TestEvent, Outcome};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Typically flattened into the host runner's own clap CLI.
//! let args = PushArgs {
//!     pushgateway_url: Some("http://gw:9091".into()),
//!     metric_prefix: Some("myapp_".into()),
//!     extra_labels: vec!["branch=main".into()],
//!     job_name: Some("ci".into()),
//! };
//!
//! if let Some(config) = PushConfig::resolve(&args)? {
//!     let mut collector = ResultCollector::new(config);
//!
//!     collector.record(&TestEvent::call("test_a", Outcome::Passed));
//!     collector.record(&TestEvent::call("test_b", Outcome::Failed));
//!
//!     eprintln!("{}", collector.summary_notice());
//!     collector.finish()?;
//! }
//! # Ok(())
//! # }
//! ```

mod collector;
mod config;
mod event;
mod gateway;
mod libtest;
mod sanitize;

pub use collector::ResultCollector;
pub use config::{parse_labels, ConfigError, PushArgs, PushConfig, DEFAULT_JOB_NAME};
pub use event::{Outcome, OutcomeLog, Phase, TestEvent};
pub use gateway::{PushError, TESTNAME_LABEL};
pub use libtest::parse_event_line;
pub use sanitize::sanitize_metric_name;
