//! Audit trail collected during one generation run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{HardConstraintId, SoftGoalId};
use crate::grid::Cell;
use crate::passes::PassId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub id: HardConstraintId,
    pub severity: IssueSeverity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<Cell>,
}

impl ValidationIssue {
    pub fn error(id: HardConstraintId, message: impl Into<String>) -> Self {
        Self { id, severity: IssueSeverity::Error, message: message.into(), cells: Vec::new() }
    }

    pub fn with_cells(mut self, cells: Vec<Cell>) -> Self {
        self.cells = cells;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairActionRecord {
    pub id: String,
    pub description: String,
    pub applied: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoftGoalScore {
    pub id: SoftGoalId,
    pub score: f64,
    pub weight: f64,
    pub weighted_score: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationDiagnostics {
    pub warnings: Vec<String>,
    pub pass_durations_ms: BTreeMap<PassId, f64>,
    pub hard_constraint_issues: Vec<ValidationIssue>,
    pub soft_goal_scores: Vec<SoftGoalScore>,
    pub applied_repairs: Vec<RepairActionRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DiagnosticsSummary {
    pub warning_count: usize,
    pub major_issue_count: usize,
    pub pass_count: usize,
    pub total_pass_duration_ms: f64,
    pub slowest_pass: Option<(PassId, f64)>,
}

impl GenerationDiagnostics {
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn summary(&self) -> DiagnosticsSummary {
        let mut total_pass_duration_ms = 0.0;
        let mut slowest_pass: Option<(PassId, f64)> = None;
        for (&pass, &duration_ms) in &self.pass_durations_ms {
            total_pass_duration_ms += duration_ms;
            let slowest_ms = slowest_pass.map_or(0.0, |(_, ms)| ms);
            if duration_ms > slowest_ms {
                slowest_pass = Some((pass, duration_ms));
            }
        }

        DiagnosticsSummary {
            warning_count: self.warnings.len(),
            major_issue_count: self
                .hard_constraint_issues
                .iter()
                .filter(|issue| issue.severity == IssueSeverity::Error)
                .count(),
            pass_count: self.pass_durations_ms.len(),
            total_pass_duration_ms,
            slowest_pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_errors_and_finds_the_slowest_pass() {
        let mut diagnostics = GenerationDiagnostics::default();
        diagnostics.warn("first");
        diagnostics.pass_durations_ms.insert(PassId::CarvePrimaryPaths, 1.5);
        diagnostics.pass_durations_ms.insert(PassId::Balance, 4.0);
        diagnostics.pass_durations_ms.insert(PassId::Repair, 4.0);
        diagnostics
            .hard_constraint_issues
            .push(ValidationIssue::error(HardConstraintId::SpawnSafety, "blocked"));
        diagnostics.hard_constraint_issues.push(ValidationIssue {
            severity: IssueSeverity::Warning,
            ..ValidationIssue::error(HardConstraintId::BoundedMap, "soft")
        });

        let summary = diagnostics.summary();
        assert_eq!(summary.warning_count, 1);
        assert_eq!(summary.major_issue_count, 1);
        assert_eq!(summary.pass_count, 3);
        assert_eq!(summary.total_pass_duration_ms, 9.5);
        assert_eq!(summary.slowest_pass, Some((PassId::Balance, 4.0)));
    }

    #[test]
    fn empty_diagnostics_have_no_slowest_pass() {
        let summary = GenerationDiagnostics::default().summary();
        assert_eq!(summary.pass_count, 0);
        assert_eq!(summary.slowest_pass, None);
    }
}
