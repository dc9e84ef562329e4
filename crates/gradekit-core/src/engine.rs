//! Quiz-level score aggregation.
//!
//! Folds per-question scores into stage groups, a running total, and the
//! below-threshold flagging pass. Grading is a pure function of
//! `(questions, answers)`; every invocation allocates a fresh
//! [`ScoreSummary`] and nothing is cached or mutated across calls.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::answer::AnswerSheet;
use crate::grader::{grade_question, QuestionScore};
use crate::model::Question;

/// Stages scoring below this percentage of their maximum are flagged.
pub const FLAG_THRESHOLD_PCT: i64 = 40;

/// Feedback message attached to a flagged stage.
const BELOW_THRESHOLD_MESSAGE: &str = "Stage performance is below threshold.";

/// Score of the legacy four-band "Flag" choice.
const LEGACY_FLAG_SCORE: f64 = -5.0;

/// How a question counts toward its stage's flag counter.
///
/// The richer engine flags any negative score; the legacy four-band
/// display flagged only the exact −5 "Flag" band. Callers migrating off
/// the four-band convention pick the policy explicitly via
/// [`compute_quiz_scores_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagPolicy {
    /// Flag every question scoring strictly below zero.
    #[default]
    NegativeScore,
    /// Flag only questions scoring exactly −5 (the four-band "Flag").
    LegacyFourBand,
}

impl FlagPolicy {
    fn is_flagged(self, score: f64) -> bool {
        match self {
            FlagPolicy::NegativeScore => score < 0.0,
            FlagPolicy::LegacyFourBand => score == LEGACY_FLAG_SCORE,
        }
    }
}

/// One question's line in a stage breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageItem {
    pub id: String,
    pub label: String,
    pub score: f64,
    pub max: f64,
}

/// Aggregated scores for one stage.
///
/// Stages appear in the order they are first encountered while iterating
/// the questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageScore {
    pub stage: String,
    pub total: f64,
    pub max: f64,
    /// Number of flagged questions in this stage.
    pub flags: u32,
    pub items: Vec<StageItem>,
}

impl StageScore {
    /// Stage score as a rounded percentage of its maximum. The
    /// denominator is floored at 1 so an all-zero stage reads as 0%.
    pub fn percent(&self) -> i64 {
        rounded_percent(self.total, self.max)
    }
}

/// A stage whose score fell below the flagging threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggedStage {
    pub stage: String,
    /// Stage score as a rounded percentage.
    pub percent: i64,
    pub message: String,
}

/// The complete result of grading one quiz attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Sum of all question scores, rounded to the nearest integer.
    pub total_score: i64,
    /// Sum of all question maxima, floored at 0, rounded.
    pub max_score: i64,
    /// Per-stage breakdowns in first-encounter order.
    pub stages: Vec<StageScore>,
    /// Stages scoring below [`FLAG_THRESHOLD_PCT`].
    pub flagged: Vec<FlaggedStage>,
    /// Per-question `{score, max}` keyed by question id.
    pub question_scores: BTreeMap<String, QuestionScore>,
}

impl ScoreSummary {
    /// Overall score as a rounded percentage of the maximum.
    pub fn overall_percent(&self) -> i64 {
        rounded_percent(self.total_score as f64, self.max_score as f64)
    }

    /// Looks up a stage breakdown by name.
    pub fn stage(&self, name: &str) -> Option<&StageScore> {
        self.stages.iter().find(|s| s.stage == name)
    }
}

/// Grade a full quiz with the default flag policy.
pub fn compute_quiz_scores(questions: &[Question], answers: &AnswerSheet) -> ScoreSummary {
    compute_quiz_scores_with(questions, answers, FlagPolicy::default())
}

/// Grade a full quiz, counting stage flags under the given policy.
pub fn compute_quiz_scores_with(
    questions: &[Question],
    answers: &AnswerSheet,
    policy: FlagPolicy,
) -> ScoreSummary {
    let mut total = 0.0f64;
    let mut max = 0.0f64;
    let mut stages: Vec<StageScore> = Vec::new();
    let mut question_scores = BTreeMap::new();

    for question in questions {
        let graded = grade_question(question, answers.get(&question.id));
        total += graded.score;
        max += graded.max;

        let index = match stages.iter().position(|s| s.stage == question.stage) {
            Some(index) => index,
            None => {
                stages.push(StageScore {
                    stage: question.stage.clone(),
                    total: 0.0,
                    max: 0.0,
                    flags: 0,
                    items: Vec::new(),
                });
                stages.len() - 1
            }
        };
        let stage = &mut stages[index];

        stage.total += graded.score;
        stage.max += graded.max;
        if policy.is_flagged(graded.score) {
            stage.flags += 1;
        }
        stage.items.push(StageItem {
            id: question.id.clone(),
            label: question.report_label().to_string(),
            score: graded.score,
            max: graded.max,
        });

        question_scores.insert(question.id.clone(), graded);
    }

    let flagged = stages
        .iter()
        .filter(|stage| stage.percent() < FLAG_THRESHOLD_PCT)
        .map(|stage| FlaggedStage {
            stage: stage.stage.clone(),
            percent: stage.percent(),
            message: BELOW_THRESHOLD_MESSAGE.to_string(),
        })
        .collect();

    ScoreSummary {
        total_score: total.round() as i64,
        max_score: max.max(0.0).round() as i64,
        stages,
        flagged,
        question_scores,
    }
}

fn rounded_percent(total: f64, max: f64) -> i64 {
    (100.0 * total / max.max(1.0)).round() as i64
}
