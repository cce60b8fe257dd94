//! Metric-name sanitization.

/// Replace every character outside `[A-Za-z0-9_]` with an underscore.
///
/// Prometheus restricts metric names to a fixed alphanumeric-plus-underscore
/// alphabet; test names routinely carry `::` paths, brackets and dashes from
/// parametrized cases. The mapping is deterministic and idempotent: a name
/// that is already clean passes through unchanged.
pub fn sanitize_metric_name(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
