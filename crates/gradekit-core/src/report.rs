//! Grade report types with JSON persistence.
//!
//! A report captures one grading run: the summary, the matched outcome
//! rule (if any), and enough quiz metadata to read the report on its own.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::ScoreSummary;
use crate::model::Rule;
use crate::rules::resolve_matching_rule;

/// A complete grading report for one quiz attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the graded quiz.
    pub quiz: QuizSummary,
    /// The computed scores.
    pub summary: ScoreSummary,
    /// The matched outcome rule, if any rule matched the total score.
    pub outcome: Option<Outcome>,
}

/// Summary of the quiz a report was graded against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub title: String,
    pub question_count: usize,
}

/// The feedback resolved from the dashboard rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub condition_text: String,
    pub message: String,
}

impl GradeReport {
    /// Build a report from a computed summary, resolving the outcome
    /// against the given rules.
    pub fn new(title: String, question_count: usize, summary: ScoreSummary, rules: &[Rule]) -> Self {
        let outcome = resolve_matching_rule(summary.total_score, rules).map(|rule| Outcome {
            condition_text: rule.condition_text.clone(),
            message: rule.message.clone(),
        });

        GradeReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            quiz: QuizSummary {
                title,
                question_count,
            },
            summary,
            outcome,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradeReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::AnswerSheet;
    use crate::engine::compute_quiz_scores;
    use crate::normalize::normalize_questions;
    use serde_json::json;

    fn summary_for(points: i64) -> ScoreSummary {
        let questions = normalize_questions(&json!([{
            "id": "q1",
            "type": "single_choice",
            "stage": "A",
            "choices": [{"id": "c1", "points": points}]
        }]));
        let answers: AnswerSheet =
            serde_json::from_str(r#"{"q1": "c1"}"#).unwrap();
        compute_quiz_scores(&questions, &answers)
    }

    fn sample_rules() -> Vec<Rule> {
        serde_json::from_str(
            r#"[
                {"condition_text": "Ready", "logic": {"operator": "gte", "value": 50}, "message": "Go"},
                {"condition_text": "Not ready", "logic": {"operator": "lt", "value": 50}, "message": "Wait"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn report_resolves_outcome_from_rules() {
        let report = GradeReport::new("Test".into(), 1, summary_for(60), &sample_rules());
        let outcome = report.outcome.unwrap();
        assert_eq!(outcome.condition_text, "Ready");
        assert_eq!(outcome.message, "Go");

        let report = GradeReport::new("Test".into(), 1, summary_for(10), &sample_rules());
        assert_eq!(report.outcome.unwrap().condition_text, "Not ready");
    }

    #[test]
    fn report_without_matching_rule_has_no_outcome() {
        let report = GradeReport::new("Test".into(), 1, summary_for(10), &[]);
        assert!(report.outcome.is_none());
    }

    #[test]
    fn json_roundtrip() {
        let report = GradeReport::new("Readiness".into(), 1, summary_for(60), &sample_rules());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        report.save_json(&path).unwrap();
        let loaded = GradeReport::load_json(&path).unwrap();

        assert_eq!(loaded.quiz.title, "Readiness");
        assert_eq!(loaded.summary.total_score, 60);
        assert_eq!(loaded.outcome.unwrap().condition_text, "Ready");
    }
}
