use crate::errors::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use tracing::{error, info, warn};

/// One human-readable line in the step log. The log is append-only and is a
/// pure diagnostics side channel; nothing in the suite reads it back.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct StepLog {
    entries: Vec<LogEntry>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.entries.push(LogEntry {
            at: Utc::now(),
            message,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Passed,
    Failed(String),
    /// An earlier step in the dependency chain failed, so this one never ran.
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub name: String,
    pub outcome: StepOutcome,
}

#[derive(Debug, Serialize)]
pub struct SuiteReport {
    pub started_at: DateTime<Utc>,
    pub steps: Vec<StepResult>,
    pub log: Vec<LogEntry>,
}

impl SuiteReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            steps: Vec::new(),
            log: Vec::new(),
        }
    }

    pub fn record(&mut self, name: impl Into<String>, outcome: StepOutcome) {
        let name = name.into();
        match &outcome {
            StepOutcome::Passed => info!(step = %name, "step passed"),
            StepOutcome::Failed(reason) => error!(step = %name, %reason, "step failed"),
            StepOutcome::Skipped => warn!(step = %name, "step skipped"),
        }
        self.steps.push(StepResult { name, outcome });
    }

    /// True when every recorded step passed (and at least one ran).
    pub fn passed(&self) -> bool {
        !self.steps.is_empty()
            && self
                .steps
                .iter()
                .all(|step| step.outcome == StepOutcome::Passed)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            let line = match &step.outcome {
                StepOutcome::Passed => format!("PASS  {}", step.name),
                StepOutcome::Failed(reason) => format!("FAIL  {}: {}", step.name, reason),
                StepOutcome::Skipped => format!("SKIP  {}", step.name),
            };
            let _ = writeln!(out, "{line}");
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for SuiteReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_passes_only_when_every_step_passed() {
        let mut report = SuiteReport::new();
        assert!(!report.passed());

        report.record("open image feed", StepOutcome::Passed);
        assert!(report.passed());

        report.record(
            "lazy-load scroll",
            StepOutcome::Failed("no new thumbnails".to_string()),
        );
        report.record("keyword search [cat]", StepOutcome::Skipped);
        assert!(!report.passed());
    }

    #[test]
    fn render_marks_each_outcome() {
        let mut report = SuiteReport::new();
        report.record("open image feed", StepOutcome::Passed);
        report.record(
            "lazy-load scroll",
            StepOutcome::Failed("no new thumbnails".to_string()),
        );
        report.record("keyword search [cat]", StepOutcome::Skipped);
        let rendered = report.render();
        assert!(rendered.contains("PASS  open image feed"));
        assert!(rendered.contains("FAIL  lazy-load scroll: no new thumbnails"));
        assert!(rendered.contains("SKIP  keyword search [cat]"));
        assert!(rendered.is_ascii());
    }

    #[test]
    fn json_export_carries_step_outcomes() {
        let mut report = SuiteReport::new();
        report.record(
            "reverse-image match count",
            StepOutcome::Failed("only 3 thumbnails".to_string()),
        );
        let json = report.to_json().unwrap();
        assert!(json.contains("reverse-image match count"));
        assert!(json.contains("only 3 thumbnails"));
    }

    #[test]
    fn step_log_is_append_only() {
        let mut log = StepLog::new();
        log.log("open main page");
        log.log("click the images link");
        let messages: Vec<_> = log.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["open main page", "click the images link"]);
    }
}
