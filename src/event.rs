//! Test outcome event types and the in-memory accumulator.

use serde::{Deserialize, Serialize};

/// Execution phase a test event was reported from.
///
/// Only the [`Phase::Call`] phase produces a metric; setup and teardown
/// events are delivered by some host runners but carry no outcome of their
/// own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Call,
    Teardown,
}

/// Outcome category of a completed test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
}

impl Outcome {
    /// Metric-name suffix for this category ("passed", "failed", "skipped").
    pub fn suffix(self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::Skipped => "skipped",
        }
    }

    /// Help text attached to this category's gauge family.
    pub(crate) fn help(self) -> &'static str {
        match self {
            Outcome::Passed => "Number of passed test executions",
            Outcome::Failed => "Number of failed test executions",
            Outcome::Skipped => "Number of skipped test executions",
        }
    }
}

/// One per-test report delivered by the host runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEvent {
    /// Raw test name as the runner knows it (may contain arbitrary characters).
    pub name: String,
    /// Phase the report belongs to.
    pub phase: Phase,
    /// Result of the execution.
    pub outcome: Outcome,
}

impl TestEvent {
    /// Convenience constructor for a call-phase event.
    pub fn call(name: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            name: name.into(),
            phase: Phase::Call,
            outcome,
        }
    }
}

/// Append-only accumulator of sanitized test names, one sequence per
/// outcome category.
///
/// Owned exclusively by the collector; there is one log per session and it
/// is never reset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutcomeLog {
    pub passed: Vec<String>,
    pub failed: Vec<String>,
    pub skipped: Vec<String>,
}

impl OutcomeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sanitized test name under its category.
    pub fn append(&mut self, outcome: Outcome, sanitized_name: String) {
        self.names_mut(outcome).push(sanitized_name);
    }

    /// Recorded names for one category, in arrival order.
    pub fn names(&self, outcome: Outcome) -> &[String] {
        match outcome {
            Outcome::Passed => &self.passed,
            Outcome::Failed => &self.failed,
            Outcome::Skipped => &self.skipped,
        }
    }

    fn names_mut(&mut self, outcome: Outcome) -> &mut Vec<String> {
        match outcome {
            Outcome::Passed => &mut self.passed,
            Outcome::Failed => &mut self.failed,
            Outcome::Skipped => &mut self.skipped,
        }
    }

    /// Total number of recorded outcomes across all categories.
    pub fn len(&self) -> usize {
        self.passed.len() + self.failed.len() + self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
