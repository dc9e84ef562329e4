//! Legacy question-shape normalization.
//!
//! Quiz definitions live in CMS meta fields and arrive in several
//! generations of shapes: the current schema with typed `choices`, and
//! legacy payloads using `options` (plain strings or `{label, score}`
//! objects) and alias type names. This module migrates any of them onto
//! the canonical [`Question`] model. Normalization is a pure transform
//! and never fails; malformed entries degrade to empty or zero values.

use serde_json::Value;

use crate::model::{
    Choice, Grading, GradingMode, MatchPair, MatchingSpec, MatrixSpec, NumericSpec, Question,
    QuestionType, RankItem, RankMode, RankingSpec, Statement,
};

/// Default choice band for legacy `scorable` questions that carry no
/// options of their own: Great/Good/Borderline/Flag.
const FOUR_BAND: [(&str, f64); 4] = [
    ("Great", 15.0),
    ("Good", 10.0),
    ("Borderline", 5.0),
    ("Flag", -5.0),
];

/// Normalize a raw questions payload into canonical questions.
///
/// Anything that is not an array yields an empty list; entries that are
/// not objects are skipped.
pub fn normalize_questions(raw: &Value) -> Vec<Question> {
    let Some(entries) = raw.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let question = normalize_question(entry, index);
            if question.is_none() {
                tracing::warn!("skipping non-object question entry at index {index}");
            }
            question
        })
        .collect()
}

/// Normalize a single raw question. Returns `None` only when the entry is
/// not a JSON object.
pub fn normalize_question(raw: &Value, index: usize) -> Option<Question> {
    let obj = raw.as_object()?;

    let raw_type = obj.get("type").and_then(Value::as_str).unwrap_or("");
    let legacy_scorable = raw_type.trim() == "scorable";
    // FromStr folds aliases and never fails.
    let question_type: QuestionType = raw_type.parse().unwrap_or(QuestionType::ShortText);

    let id = normalize_id(obj.get("id"), index);
    let stage = read_text(obj.get("stage"))
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(crate::model::default_stage);
    let indicator = read_text(obj.get("indicator")).unwrap_or_default();
    let text = read_text(obj.get("text")).unwrap_or_default();

    let mut choices = Vec::new();
    if matches!(
        question_type,
        QuestionType::SingleChoice | QuestionType::MultiSelect
    ) {
        choices = normalize_choices(obj.get("choices").or_else(|| obj.get("options")));
        if choices.is_empty() && legacy_scorable {
            choices = FOUR_BAND
                .iter()
                .enumerate()
                .map(|(i, (label, points))| Choice {
                    id: format!("choice_{}", i + 1),
                    label: (*label).to_string(),
                    points: *points,
                })
                .collect();
        }
    }

    Some(Question {
        id,
        question_type,
        stage,
        indicator,
        text,
        grading: normalize_grading(obj.get("grading"), question_type),
        numeric: normalize_numeric(obj.get("numeric")),
        ranking: normalize_ranking(obj.get("ranking")),
        matching: normalize_matching(obj.get("matching")),
        matrix: normalize_matrix(obj.get("matrix")),
        choices,
    })
}

fn normalize_id(raw: Option<&Value>, index: usize) -> String {
    match raw {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => format!("q_{}", index + 1),
    }
}

/// Derive canonical choices from a `choices` or legacy `options` array.
fn normalize_choices(raw: Option<&Value>) -> Vec<Choice> {
    let Some(entries) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut choices = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let generated_id = format!("choice_{}", index + 1);
        match entry {
            Value::String(label) => choices.push(Choice {
                id: generated_id,
                label: label.clone(),
                points: 0.0,
            }),
            Value::Object(obj) => {
                let id = read_text(obj.get("id"))
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or(generated_id);
                let label = read_text(obj.get("label"))
                    .or_else(|| read_text(obj.get("text")))
                    .unwrap_or_default();
                // Legacy payloads carried the point value as `score`.
                let points = read_number(obj.get("points"))
                    .or_else(|| read_number(obj.get("score")))
                    .unwrap_or(0.0);
                choices.push(Choice { id, label, points });
            }
            _ => {}
        }
    }
    choices
}

fn normalize_grading(raw: Option<&Value>, question_type: QuestionType) -> Grading {
    let obj = raw.and_then(Value::as_object);

    let mode_raw = obj
        .and_then(|o| read_text(o.get("mode")))
        .unwrap_or_default();
    let mut mode: GradingMode = mode_raw.parse().unwrap_or(GradingMode::Auto);
    // Free-text and date answers are never auto-scored.
    if !question_type.is_auto_gradable() {
        mode = GradingMode::None;
    }

    let max_points = obj.and_then(|o| read_number(o.get("max_points")));
    let min_points = obj.and_then(|o| read_number(o.get("min_points")));

    // A cap only applies to multi-select. Presence matters: an explicit 0
    // is a real cap, while absent/empty/negative means uncapped.
    let cap_points = if question_type == QuestionType::MultiSelect {
        obj.and_then(|o| read_number(o.get("cap_points")))
            .filter(|cap| *cap >= 0.0)
    } else {
        None
    };

    Grading {
        mode,
        max_points,
        min_points,
        cap_points,
    }
}

fn normalize_numeric(raw: Option<&Value>) -> NumericSpec {
    let obj = raw.and_then(Value::as_object);
    NumericSpec {
        correct_value: obj
            .and_then(|o| read_number(o.get("correct_value")))
            .unwrap_or(0.0),
        tolerance: obj
            .and_then(|o| read_number(o.get("tolerance")))
            .unwrap_or(0.0)
            .abs(),
    }
}

fn normalize_ranking(raw: Option<&Value>) -> RankingSpec {
    let obj = raw.and_then(Value::as_object);

    let mode = obj
        .and_then(|o| read_text(o.get("mode")))
        .map(|m| {
            if m.trim() == "exact" {
                RankMode::Exact
            } else {
                RankMode::Position
            }
        })
        .unwrap_or_default();

    let mut items = Vec::new();
    if let Some(entries) = obj.and_then(|o| o.get("items")).and_then(Value::as_array) {
        for (index, entry) in entries.iter().enumerate() {
            let generated_id = format!("rank_{}", index + 1);
            match entry {
                Value::String(label) => items.push(RankItem {
                    id: generated_id,
                    label: label.clone(),
                }),
                Value::Object(item) => items.push(RankItem {
                    id: read_text(item.get("id"))
                        .filter(|s| !s.trim().is_empty())
                        .unwrap_or(generated_id),
                    label: read_text(item.get("label")).unwrap_or_default(),
                }),
                _ => {}
            }
        }
    }

    let mut correct_order: Vec<String> = obj
        .and_then(|o| o.get("correct_order"))
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(read_key).collect())
        .unwrap_or_default();
    if correct_order.is_empty() {
        correct_order = items.iter().map(|item| item.id.clone()).collect();
    }

    RankingSpec {
        mode,
        items,
        correct_order,
    }
}

fn normalize_matching(raw: Option<&Value>) -> MatchingSpec {
    let entries = raw
        .and_then(Value::as_object)
        .and_then(|o| o.get("pairs"))
        .and_then(Value::as_array);

    let mut pairs = Vec::new();
    if let Some(entries) = entries {
        for (index, entry) in entries.iter().enumerate() {
            let Some(pair) = entry.as_object() else {
                continue;
            };
            pairs.push(MatchPair {
                id: read_text(pair.get("id"))
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| format!("pair_{}", index + 1)),
                left: read_text(pair.get("left")).unwrap_or_default(),
                right: read_text(pair.get("right")).unwrap_or_default(),
            });
        }
    }

    MatchingSpec { pairs }
}

fn normalize_matrix(raw: Option<&Value>) -> MatrixSpec {
    let entries = raw
        .and_then(Value::as_object)
        .and_then(|o| o.get("statements"))
        .and_then(Value::as_array);

    let mut statements = Vec::new();
    if let Some(entries) = entries {
        for (index, entry) in entries.iter().enumerate() {
            let Some(statement) = entry.as_object() else {
                continue;
            };
            statements.push(Statement {
                id: read_text(statement.get("id"))
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| format!("stmt_{}", index + 1)),
                text: read_text(statement.get("text")).unwrap_or_default(),
                correct: statement
                    .get("correct")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                points_correct: read_number(statement.get("points_correct")).unwrap_or(1.0),
                points_incorrect: read_number(statement.get("points_incorrect")).unwrap_or(0.0),
            });
        }
    }

    MatrixSpec { statements }
}

/// Reads a string field, stringifying numbers the way the form layer does.
fn read_text(raw: Option<&Value>) -> Option<String> {
    match raw {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a comparison key: like [`read_text`] but integral floats render
/// without a fraction.
fn read_key(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            let f = n.as_f64()?;
            if f.fract() == 0.0 && f.abs() < 9.0e15 {
                Some(format!("{}", f as i64))
            } else {
                Some(format!("{f}"))
            }
        }
        _ => None,
    }
}

/// Reads a numeric field, accepting numeric strings. Empty or
/// non-numeric strings read as absent.
fn read_number(raw: Option<&Value>) -> Option<f64> {
    match raw {
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}
