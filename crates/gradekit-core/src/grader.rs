//! Per-question grading.
//!
//! [`grade_question`] turns one normalized question plus its submitted
//! answer into a `{score, max}` pair. There are no error paths: a
//! malformed or missing answer resolves to the type's zero-score default,
//! never a panic or a `Result`. A broken question definition must only
//! ever under-score, not crash a grading run.

use serde::{Deserialize, Serialize};

use crate::answer::Answer;
use crate::model::{Choice, GradingMode, Question, QuestionType, RankMode};

/// Score earned and maximum attainable for one question.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestionScore {
    pub score: f64,
    pub max: f64,
}

impl QuestionScore {
    pub const ZERO: QuestionScore = QuestionScore {
        score: 0.0,
        max: 0.0,
    };

    fn new(score: f64, max: f64) -> Self {
        Self { score, max }
    }
}

/// Grade a single question against its submitted answer (if any).
pub fn grade_question(question: &Question, answer: Option<&Answer>) -> QuestionScore {
    if question.grading.mode == GradingMode::None {
        return QuestionScore::ZERO;
    }

    match question.question_type {
        QuestionType::SingleChoice => grade_single_choice(question, answer),
        QuestionType::MultiSelect => grade_multi_select(question, answer),
        QuestionType::Numeric => grade_numeric(question, answer),
        QuestionType::Ranking => grade_ranking(question, answer),
        QuestionType::Matching => grade_matching(question, answer),
        QuestionType::MatrixTrueFalse => grade_matrix(question, answer),
        QuestionType::ShortText | QuestionType::DateMonth => QuestionScore::ZERO,
    }
}

fn grade_single_choice(question: &Question, answer: Option<&Answer>) -> QuestionScore {
    let max = max_positive_choice_points(&question.choices);

    let Some(key) = answer.and_then(Answer::scalar_key) else {
        return QuestionScore::new(0.0, max);
    };

    let score = question
        .choices
        .iter()
        .find(|choice| key == choice.id || key == choice.label)
        .map(|choice| choice.points)
        .unwrap_or(0.0);

    QuestionScore::new(score, max)
}

fn grade_multi_select(question: &Question, answer: Option<&Answer>) -> QuestionScore {
    let uncapped_max = sum_positive_choice_points(&question.choices);
    let cap = question
        .grading
        .cap_points
        .filter(|cap| cap.is_finite() && *cap >= 0.0);
    let max = cap.unwrap_or(uncapped_max);

    let Some(selected) = answer.and_then(Answer::list_keys) else {
        return QuestionScore::new(0.0, max);
    };

    let mut score: f64 = question
        .choices
        .iter()
        .filter(|choice| {
            selected.iter().any(|key| *key == choice.id) || selected.contains(&choice.label)
        })
        .map(|choice| choice.points)
        .sum();

    let floor = question.grading.min_points.unwrap_or(0.0);
    if score < floor {
        score = floor;
    }
    if let Some(cap) = cap {
        if score > cap {
            score = cap;
        }
    }

    QuestionScore::new(score, max)
}

fn grade_numeric(question: &Question, answer: Option<&Answer>) -> QuestionScore {
    let max = question.grading.max_points.unwrap_or(1.0);

    let value = match answer {
        Some(Answer::Value(scalar)) => scalar.as_number(),
        _ => None,
    };
    let Some(value) = value else {
        return QuestionScore::new(0.0, max);
    };

    let spec = &question.numeric;
    if (value - spec.correct_value).abs() <= spec.tolerance.abs() {
        QuestionScore::new(max, max)
    } else {
        QuestionScore::new(0.0, max)
    }
}

fn grade_ranking(question: &Question, answer: Option<&Answer>) -> QuestionScore {
    let max = question.grading.max_points.unwrap_or(1.0);
    let correct = &question.ranking.correct_order;
    let order = normalize_order(answer);

    if order.is_empty() || correct.is_empty() {
        return QuestionScore::new(0.0, max);
    }

    if question.ranking.mode == RankMode::Exact {
        let score = if order == *correct { max } else { 0.0 };
        return QuestionScore::new(score, max);
    }

    let compared = order.len().min(correct.len());
    let correct_positions = order
        .iter()
        .zip(correct.iter())
        .filter(|(submitted, expected)| submitted == expected)
        .count();

    QuestionScore::new(max * correct_positions as f64 / compared as f64, max)
}

/// Reads a submitted ranking order: either an ordered list of item ids, or
/// a map from item id to numeric position (sorted ascending to derive the
/// order; entries with non-numeric positions are dropped).
fn normalize_order(answer: Option<&Answer>) -> Vec<String> {
    match answer {
        Some(Answer::List(_)) => answer.and_then(Answer::list_keys).unwrap_or_default(),
        Some(Answer::Map(positions)) => {
            let mut ranked: Vec<(&String, f64)> = positions
                .iter()
                .filter_map(|(id, position)| position.as_number().map(|p| (id, p)))
                .collect();
            ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
            ranked.into_iter().map(|(id, _)| id.clone()).collect()
        }
        _ => Vec::new(),
    }
}

fn grade_matching(question: &Question, answer: Option<&Answer>) -> QuestionScore {
    let pairs = &question.matching.pairs;
    let max = question
        .grading
        .max_points
        .unwrap_or_else(|| pairs.len().max(1) as f64);

    let Some(submitted) = answer.and_then(Answer::as_map) else {
        return QuestionScore::new(0.0, max);
    };
    if pairs.is_empty() {
        return QuestionScore::new(0.0, max);
    }

    let correct = pairs
        .iter()
        .filter(|pair| {
            submitted
                .get(&pair.id)
                .map(|value| value.key())
                .is_some_and(|right| !right.is_empty() && right == pair.right)
        })
        .count();

    QuestionScore::new(max * correct as f64 / pairs.len() as f64, max)
}

fn grade_matrix(question: &Question, answer: Option<&Answer>) -> QuestionScore {
    let statements = &question.matrix.statements;
    if statements.is_empty() {
        return QuestionScore::ZERO;
    }

    let max: f64 = statements
        .iter()
        .map(|statement| statement.points_correct.max(0.0))
        .sum();

    let Some(submitted) = answer.and_then(Answer::as_map) else {
        return QuestionScore::new(0.0, max);
    };

    let mut score = 0.0;
    for statement in statements {
        // An absent or unrecognized answer contributes nothing, rather
        // than counting as "false".
        let Some(answered) = submitted
            .get(&statement.id)
            .and_then(|value| value.as_bool_lenient())
        else {
            continue;
        };
        score += if answered == statement.correct {
            statement.points_correct
        } else {
            statement.points_incorrect
        };
    }

    QuestionScore::new(score, max)
}

fn max_positive_choice_points(choices: &[Choice]) -> f64 {
    choices
        .iter()
        .map(|choice| choice.points)
        .fold(0.0, f64::max)
}

fn sum_positive_choice_points(choices: &[Choice]) -> f64 {
    choices
        .iter()
        .map(|choice| choice.points)
        .filter(|points| *points > 0.0)
        .sum()
}
