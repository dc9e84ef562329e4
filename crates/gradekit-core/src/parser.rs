//! JSON definition-file loading and validation.
//!
//! Quiz definitions are exported from the CMS in a handful of envelope
//! shapes; the loaders here accept any of them and route everything
//! through the normalizer, so legacy payloads load the same as current
//! ones. Individual malformed entries are skipped with a warning rather
//! than failing the whole file.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::answer::{Answer, AnswerSheet};
use crate::error::DefinitionError;
use crate::model::{Question, QuestionType, Rule, RuleOperator};
use crate::normalize::normalize_questions;

/// A loaded quiz definition.
#[derive(Debug, Clone)]
pub struct QuizDefinition {
    /// Quiz title, when the envelope carries one.
    pub title: String,
    pub questions: Vec<Question>,
}

fn read_json(path: &Path) -> Result<Value, DefinitionError> {
    let content = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DefinitionError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a quiz definition file.
///
/// Accepts a bare question array, `{"questions": [...]}`, or the CMS
/// export envelope `{"meta": {"_smc_quiz_questions": [...]}}`.
pub fn load_quiz(path: &Path) -> Result<QuizDefinition, DefinitionError> {
    let root = read_json(path)?;

    let raw_questions = if root.is_array() {
        Some(&root)
    } else {
        root.get("questions").or_else(|| {
            root.get("meta")
                .and_then(|meta| meta.get("_smc_quiz_questions"))
        })
    };

    let questions = raw_questions
        .map(normalize_questions)
        .unwrap_or_default();
    if questions.is_empty() {
        tracing::warn!("no questions found in {}", path.display());
    }

    Ok(QuizDefinition {
        title: root
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        questions,
    })
}

/// Load an answer sheet file: a JSON object keyed by question id, or
/// `{"answers": {...}}`. Entries whose value has no usable shape are
/// skipped.
pub fn load_answers(path: &Path) -> Result<AnswerSheet, DefinitionError> {
    let root = read_json(path)?;
    let raw = root.get("answers").unwrap_or(&root);

    let Some(entries) = raw.as_object() else {
        tracing::warn!("answer sheet {} is not a JSON object", path.display());
        return Ok(AnswerSheet::new());
    };

    let mut sheet = BTreeMap::new();
    for (id, value) in entries {
        match serde_json::from_value::<Answer>(value.clone()) {
            Ok(answer) => {
                sheet.insert(id.clone(), answer);
            }
            Err(_) => {
                tracing::warn!("skipping unusable answer for question '{id}'");
            }
        }
    }
    Ok(sheet)
}

/// Load dashboard rules: a bare rule array, `{"rules": [...]}`, or the
/// CMS envelope `{"dashboard_config": {"rules": [...]}}`. Entries that do
/// not decode as rules are skipped.
pub fn load_rules(path: &Path) -> Result<Vec<Rule>, DefinitionError> {
    let root = read_json(path)?;

    let raw = if root.is_array() {
        Some(&root)
    } else {
        root.get("rules").or_else(|| {
            root.get("dashboard_config")
                .and_then(|config| config.get("rules"))
        })
    };

    let Some(entries) = raw.and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let mut rules = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match serde_json::from_value::<Rule>(entry.clone()) {
            Ok(rule) => rules.push(rule),
            Err(e) => {
                tracing::warn!("skipping rule at index {index}: {e}");
            }
        }
    }
    Ok(rules)
}

/// A warning from quiz/rule validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a normalized question set for common definition mistakes.
///
/// None of these stop grading (the engine degrades to zero scores); they
/// exist so quiz authors hear about a broken definition before it quietly
/// under-scores respondents.
pub fn validate_quiz(questions: &[Question]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = std::collections::HashSet::new();
    for question in questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question id: {}", question.id),
            });
        }
    }

    for question in questions {
        let warn = |message: String| ValidationWarning {
            question_id: Some(question.id.clone()),
            message,
        };

        match question.question_type {
            QuestionType::SingleChoice | QuestionType::MultiSelect => {
                if question.choices.is_empty() {
                    warnings.push(warn(format!(
                        "{} question has no choices and will always score 0",
                        question.question_type
                    )));
                }
            }
            QuestionType::Ranking => {
                if question.ranking.correct_order.is_empty() {
                    warnings.push(warn(
                        "ranking question has no correct order and will always score 0".into(),
                    ));
                }
            }
            QuestionType::Matching => {
                if question.matching.pairs.is_empty() {
                    warnings.push(warn(
                        "matching question has no pairs and will always score 0".into(),
                    ));
                }
            }
            QuestionType::MatrixTrueFalse => {
                if question.matrix.statements.is_empty() {
                    warnings.push(warn(
                        "matrix question has no statements and will always score 0".into(),
                    ));
                }
            }
            QuestionType::Numeric | QuestionType::ShortText | QuestionType::DateMonth => {}
        }
    }

    warnings
}

/// Validate dashboard rules.
pub fn validate_rules(rules: &[Rule]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (index, rule) in rules.iter().enumerate() {
        if rule.logic.operator == RuleOperator::Unknown {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("rule {} has an unrecognized operator and will never match", index + 1),
            });
        }
        if rule.logic.operator == RuleOperator::Between && rule.logic.min > rule.logic.max {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!(
                    "rule {} has min {} greater than max {} and will never match",
                    index + 1,
                    rule.logic.min,
                    rule.logic.max
                ),
            });
        }
    }

    warnings
}
