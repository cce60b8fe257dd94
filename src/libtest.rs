//! Parsing of libtest JSON event lines.
//!
//! `cargo test -- -Z unstable-options --format json` emits one JSON object
//! per line. Only completed `test` records carry an outcome; `suite` records
//! and `started` events are bookkeeping and produce no metric.

use crate::event::{Outcome, TestEvent};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct LibtestRecord {
    #[serde(rename = "type")]
    kind: String,
    event: String,
    #[serde(default)]
    name: Option<String>,
}

/// Map one libtest JSON line to a call-phase [`TestEvent`].
///
/// Returns `None` for suite records, `started` events, lines that are not
/// JSON at all (test binaries may interleave plain output), and events with
/// no test name.
pub fn parse_event_line(line: &str) -> Option<TestEvent> {
    let record: LibtestRecord = serde_json::from_str(line.trim()).ok()?;
    if record.kind != "test" {
        return None;
    }
    let outcome = match record.event.as_str() {
        "ok" => Outcome::Passed,
        "failed" => Outcome::Failed,
        "ignored" => Outcome::Skipped,
        _ => return None,
    };
    Some(TestEvent::call(record.name?, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Phase;

    #[test]
    fn should_map_completed_test_events() {
        let ok = parse_event_line(r#"{"type":"test","event":"ok","name":"tests::a"}"#).unwrap();
        assert_eq!(ok.name, "tests::a");
        assert_eq!(ok.phase, Phase::Call);
        assert_eq!(ok.outcome, Outcome::Passed);

        let failed =
            parse_event_line(r#"{"type":"test","event":"failed","name":"tests::b","stdout":"boom"}"#)
                .unwrap();
        assert_eq!(failed.outcome, Outcome::Failed);

        let ignored =
            parse_event_line(r#"{"type":"test","event":"ignored","name":"tests::c"}"#).unwrap();
        assert_eq!(ignored.outcome, Outcome::Skipped);
    }

    #[test]
    fn should_skip_suite_and_started_records() {
        assert!(parse_event_line(r#"{"type":"suite","event":"started","test_count":3}"#).is_none());
        assert!(parse_event_line(r#"{"type":"test","event":"started","name":"tests::a"}"#).is_none());
        assert!(parse_event_line(r#"{"type":"suite","event":"ok","passed":3}"#).is_none());
    }

    #[test]
    fn should_skip_non_json_lines() {
        assert!(parse_event_line("running 3 tests").is_none());
        assert!(parse_event_line("").is_none());
    }
}
