//! Canonical data model for quiz questions, grading config, and dashboard rules.
//!
//! These are the schema-v2 shapes the grading engine operates on. Legacy
//! question payloads are migrated onto this model by [`crate::normalize`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of gradable question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultiSelect,
    Numeric,
    Ranking,
    Matching,
    MatrixTrueFalse,
    ShortText,
    DateMonth,
}

impl QuestionType {
    /// Whether the engine can score this type automatically.
    pub fn is_auto_gradable(self) -> bool {
        !matches!(self, QuestionType::ShortText | QuestionType::DateMonth)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionType::SingleChoice => "single_choice",
            QuestionType::MultiSelect => "multi_select",
            QuestionType::Numeric => "numeric",
            QuestionType::Ranking => "ranking",
            QuestionType::Matching => "matching",
            QuestionType::MatrixTrueFalse => "matrix_true_false",
            QuestionType::ShortText => "short_text",
            QuestionType::DateMonth => "date_month",
        };
        write!(f, "{name}")
    }
}

impl FromStr for QuestionType {
    type Err = ();

    /// Parses a type string, folding the legacy aliases onto their
    /// canonical types. Unknown or empty strings fall back to
    /// `short_text`, so parsing never fails.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "single_choice" | "select" | "scorable" => QuestionType::SingleChoice,
            "multi_select" => QuestionType::MultiSelect,
            "numeric" => QuestionType::Numeric,
            "ranking" => QuestionType::Ranking,
            "matching" => QuestionType::Matching,
            "matrix_true_false" => QuestionType::MatrixTrueFalse,
            "date_month" | "date" => QuestionType::DateMonth,
            _ => QuestionType::ShortText,
        })
    }
}

/// One selectable option within a choice-based question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    /// Stable identifier, unique within the question.
    pub id: String,
    /// Display label. Answers may reference a choice by id or by label.
    #[serde(default)]
    pub label: String,
    /// Point value awarded when this choice is selected. May be negative.
    #[serde(default)]
    pub points: f64,
}

/// How a question's score is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradingMode {
    /// Scored by the engine from the type-specific config.
    #[default]
    Auto,
    /// Scored by a reviewer; the engine treats it like auto-gradable data.
    Manual,
    /// Never scored: always contributes `{score: 0, max: 0}`.
    None,
}

impl FromStr for GradingMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "none" => GradingMode::None,
            "manual" => GradingMode::Manual,
            _ => GradingMode::Auto,
        })
    }
}

/// Per-question scoring bounds.
///
/// All bounds are optional; the grader applies type-specific defaults when
/// a bound is absent. `cap_points` keeps a presence-vs-value distinction:
/// `Some(0.0)` is a legitimate cap that zeroes a multi-select question,
/// while `None` means uncapped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Grading {
    #[serde(default)]
    pub mode: GradingMode,
    #[serde(default)]
    pub max_points: Option<f64>,
    #[serde(default)]
    pub min_points: Option<f64>,
    #[serde(default)]
    pub cap_points: Option<f64>,
}

/// Config for `numeric` questions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NumericSpec {
    /// The expected value.
    #[serde(default)]
    pub correct_value: f64,
    /// Accepted absolute deviation from the expected value.
    #[serde(default)]
    pub tolerance: f64,
}

/// Scoring mode for `ranking` questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankMode {
    /// Partial credit per correctly-placed item.
    #[default]
    Position,
    /// Full credit only for the exact correct order.
    Exact,
}

/// One orderable item within a ranking question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankItem {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

/// Config for `ranking` questions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingSpec {
    #[serde(default)]
    pub mode: RankMode,
    #[serde(default)]
    pub items: Vec<RankItem>,
    /// Item ids in the correct order.
    #[serde(default)]
    pub correct_order: Vec<String>,
}

/// One left/right pairing within a matching question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchPair {
    pub id: String,
    #[serde(default)]
    pub left: String,
    /// The right-hand value that must be submitted for this pair.
    #[serde(default)]
    pub right: String,
}

/// Config for `matching` questions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingSpec {
    #[serde(default)]
    pub pairs: Vec<MatchPair>,
}

/// One true/false statement within a matrix question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub id: String,
    #[serde(default)]
    pub text: String,
    /// The correct truth value for this statement.
    #[serde(default)]
    pub correct: bool,
    /// Points awarded for a matching answer.
    #[serde(default = "default_statement_points")]
    pub points_correct: f64,
    /// Points awarded for a non-matching answer. Often negative.
    #[serde(default)]
    pub points_incorrect: f64,
}

fn default_statement_points() -> f64 {
    1.0
}

/// Config for `matrix_true_false` questions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatrixSpec {
    #[serde(default)]
    pub statements: Vec<Statement>,
}

/// A single normalized assessment item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, unique within a quiz.
    pub id: String,
    /// Question type, normalized from any legacy alias.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Grouping label for staged sub-scores.
    #[serde(default = "default_stage")]
    pub stage: String,
    /// Optional short display label used in reports.
    #[serde(default)]
    pub indicator: String,
    /// The question text shown to the respondent.
    #[serde(default)]
    pub text: String,
    /// Choices for `single_choice` / `multi_select` questions.
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Scoring bounds and mode.
    #[serde(default)]
    pub grading: Grading,
    #[serde(default)]
    pub numeric: NumericSpec,
    #[serde(default)]
    pub ranking: RankingSpec,
    #[serde(default)]
    pub matching: MatchingSpec,
    #[serde(default)]
    pub matrix: MatrixSpec,
}

pub(crate) fn default_stage() -> String {
    "Other".to_string()
}

impl Question {
    /// Label used for this question in stage breakdowns: the indicator if
    /// set, else the question text, else the id.
    pub fn report_label(&self) -> &str {
        if !self.indicator.is_empty() {
            &self.indicator
        } else if !self.text.is_empty() {
            &self.text
        } else {
            &self.id
        }
    }
}

/// Comparison operator of a dashboard rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleOperator {
    Gt,
    Lt,
    Gte,
    Lte,
    Eq,
    Between,
    /// Any operator this engine does not recognize. Never matches.
    #[serde(other)]
    Unknown,
}

impl Default for RuleOperator {
    fn default() -> Self {
        RuleOperator::Unknown
    }
}

/// The predicate of a dashboard rule, evaluated against the total score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleLogic {
    #[serde(default)]
    pub operator: RuleOperator,
    /// Threshold for the single-value operators.
    #[serde(default)]
    pub value: f64,
    /// Inclusive lower bound for `between`.
    #[serde(default)]
    pub min: f64,
    /// Inclusive upper bound for `between`.
    #[serde(default)]
    pub max: f64,
}

/// Presentation hints attached to a rule. Not scoring-relevant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleStyle {
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
}

/// One configured outcome rule mapping a total-score range to feedback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rule {
    /// Display label for the matched condition.
    #[serde(default)]
    pub condition_text: String,
    #[serde(default)]
    pub logic: RuleLogic,
    /// Feedback text shown when the rule matches.
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub style: RuleStyle,
}
