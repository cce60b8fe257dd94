//! Gauge-family assembly and the Pushgateway transmission.
//!
//! Families are built on a registry created for the single push and dropped
//! as soon as the call returns; nothing is retained between sessions. Wire
//! format and transport belong to the `prometheus` crate.

use crate::config::PushConfig;
use crate::event::{Outcome, OutcomeLog};
use crate::sanitize::sanitize_metric_name;
use prometheus::proto::MetricFamily;
use prometheus::{GaugeVec, Opts, Registry};
use std::collections::HashMap;
use thiserror::Error;

/// Error raised while building or transmitting the metric batch.
#[derive(Debug, Error)]
pub enum PushError {
    /// Family registration or label-instance lookup failed.
    #[error("failed to build metric family: {0}")]
    Label(#[source] prometheus::Error),

    /// The push to the gateway failed.
    #[error("failed to push metrics to gateway: {0}")]
    Gateway(#[source] prometheus::Error),
}

/// Label name carrying the sanitized test name on every per-test instance.
pub const TESTNAME_LABEL: &str = "testname";

const CATEGORIES: [Outcome; 3] = [Outcome::Passed, Outcome::Failed, Outcome::Skipped];

/// Build one gauge family per non-empty outcome category.
///
/// The family name is `sanitize(prefix + category)`. Label names are the
/// extra-label keys in sorted order with `testname` appended last; instance
/// values are aligned positionally against that list, and the cardinality is
/// re-checked on every lookup. Each recorded test contributes a unit
/// increment, so a name recurring across parametrized runs accumulates a
/// count instead of a flag.
pub fn build_families(
    config: &PushConfig,
    log: &OutcomeLog,
) -> Result<Vec<MetricFamily>, PushError> {
    let registry = Registry::new();

    let mut label_names: Vec<&str> = config.extra_labels.keys().map(String::as_str).collect();
    label_names.push(TESTNAME_LABEL);

    let extra_values: Vec<&str> = config.extra_labels.values().map(String::as_str).collect();

    for category in CATEGORIES {
        let names = log.names(category);
        if names.is_empty() {
            continue;
        }

        let family_name = sanitize_metric_name(&format!("{}{}", config.prefix, category.suffix()));
        let gauge = GaugeVec::new(Opts::new(family_name, category.help()), &label_names)
            .map_err(PushError::Label)?;
        registry
            .register(Box::new(gauge.clone()))
            .map_err(PushError::Label)?;

        for name in names {
            let mut values = extra_values.clone();
            values.push(name.as_str());
            gauge
                .get_metric_with_label_values(&values)
                .map_err(PushError::Label)?
                .inc();
        }
    }

    Ok(registry.gather())
}

/// Transmit one batch of metric families to the configured gateway.
///
/// Single synchronous call, no retry; a failure propagates to the caller.
pub fn push_families(config: &PushConfig, families: Vec<MetricFamily>) -> Result<(), PushError> {
    tracing::info!(
        gateway = %config.gateway_url,
        job = %config.job_name,
        families = families.len(),
        "pushing test metrics"
    );
    prometheus::push_metrics(
        &config.job_name,
        HashMap::new(),
        &config.gateway_url,
        families,
        None,
    )
    .map_err(PushError::Gateway)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config(extra: &[(&str, &str)]) -> PushConfig {
        PushConfig {
            prefix: "myapp_".to_string(),
            gateway_url: "http://gw:9091".to_string(),
            job_name: "ci".to_string(),
            extra_labels: extra
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn family<'a>(families: &'a [MetricFamily], name: &str) -> Option<&'a MetricFamily> {
        families.iter().find(|f| f.get_name() == name)
    }

    fn label_value(metric: &prometheus::proto::Metric, name: &str) -> Option<String> {
        metric
            .get_label()
            .iter()
            .find(|l| l.get_name() == name)
            .map(|l| l.get_value().to_string())
    }

    #[test]
    fn should_build_one_family_per_nonempty_category() {
        let mut log = OutcomeLog::new();
        log.append(Outcome::Passed, "test_a".to_string());
        log.append(Outcome::Failed, "test_b".to_string());
        log.append(Outcome::Passed, "test_c".to_string());

        let families = build_families(&config(&[("branch", "main")]), &log).unwrap();

        let passed = family(&families, "myapp_passed").unwrap();
        assert_eq!(passed.get_metric().len(), 2);
        let failed = family(&families, "myapp_failed").unwrap();
        assert_eq!(failed.get_metric().len(), 1);
        assert!(family(&families, "myapp_skipped").is_none());
    }

    #[test]
    fn should_label_every_instance_with_extras_and_testname() {
        let mut log = OutcomeLog::new();
        log.append(Outcome::Failed, "test_b".to_string());

        let families = build_families(&config(&[("branch", "main")]), &log).unwrap();
        let failed = family(&families, "myapp_failed").unwrap();
        let metric = &failed.get_metric()[0];

        assert_eq!(label_value(metric, "branch").as_deref(), Some("main"));
        assert_eq!(label_value(metric, TESTNAME_LABEL).as_deref(), Some("test_b"));
    }

    #[test]
    fn should_include_all_extra_label_keys_on_every_family() {
        let mut log = OutcomeLog::new();
        log.append(Outcome::Passed, "test_a".to_string());
        log.append(Outcome::Skipped, "test_s".to_string());

        let cfg = config(&[("branch", "main"), ("env", "ci")]);
        let families = build_families(&cfg, &log).unwrap();

        for fam in &families {
            for metric in fam.get_metric() {
                for key in cfg.extra_labels.keys() {
                    assert!(
                        label_value(metric, key).is_some(),
                        "family {} missing label {}",
                        fam.get_name(),
                        key
                    );
                }
            }
        }
    }

    #[test]
    fn should_accumulate_repeated_test_names_as_counts() {
        let mut log = OutcomeLog::new();
        for _ in 0..3 {
            log.append(Outcome::Passed, "test_param".to_string());
        }
        log.append(Outcome::Passed, "test_other".to_string());

        let families = build_families(&config(&[]), &log).unwrap();
        let passed = family(&families, "myapp_passed").unwrap();

        // Two instances: test_param at 3, test_other at 1; total equals
        // the number of recorded outcomes.
        assert_eq!(passed.get_metric().len(), 2);
        let total: f64 = passed
            .get_metric()
            .iter()
            .map(|m| m.get_gauge().value())
            .sum();
        assert_eq!(total, 4.0);

        let param = passed
            .get_metric()
            .iter()
            .find(|m| label_value(m, TESTNAME_LABEL).as_deref() == Some("test_param"))
            .unwrap();
        assert_eq!(param.get_gauge().value(), 3.0);
    }

    #[test]
    fn should_sanitize_the_family_name() {
        let mut log = OutcomeLog::new();
        log.append(Outcome::Passed, "test_a".to_string());

        let mut cfg = config(&[]);
        cfg.prefix = "my-app.".to_string();
        let families = build_families(&cfg, &log).unwrap();

        assert!(family(&families, "my_app_passed").is_some());
    }

    #[test]
    fn should_build_empty_batch_from_empty_log() {
        let families = build_families(&config(&[]), &OutcomeLog::new()).unwrap();
        assert!(families.is_empty());
    }
}
