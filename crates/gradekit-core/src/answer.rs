//! Submitted-answer shapes.
//!
//! Answers arrive from the form layer as loosely-typed JSON: a scalar for
//! single-choice and numeric questions, an array for multi-select and
//! ranking, an object keyed by sub-item id for matching and matrix
//! questions. The engine never rejects an answer; a shape it cannot use
//! for a given question type simply scores as unanswered.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Map from question id to the submitted answer.
pub type AnswerSheet = BTreeMap<String, Answer>;

/// A single scalar answer value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Renders the value for string comparison against choice ids and
    /// labels. Integral numbers render without a fraction, so a submitted
    /// `3` matches a choice id `"3"`.
    pub fn key(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 9.0e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Scalar::Text(s) => s.clone(),
        }
    }

    /// Reads the value as a number, accepting numeric strings.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Bool(_) => None,
            Scalar::Number(n) => n.is_finite().then_some(*n),
            Scalar::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    /// Lenient truthiness coercion for matrix true/false answers.
    ///
    /// Accepts booleans, `"true"`/`"false"`, `"yes"`/`"no"`, `"1"`/`"0"`
    /// (trimmed, case-insensitive), and numbers where exactly 1 reads as
    /// true. Returns `None` for anything unrecognized so that an absent or
    /// garbled answer is never mistaken for `false`.
    pub fn as_bool_lenient(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            Scalar::Number(n) => Some(*n == 1.0),
            Scalar::Text(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            },
        }
    }
}

/// One submitted answer, in any of the shapes the form layer produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Scalar answer: a selected choice, a number, a free-text value.
    Value(Scalar),
    /// Ordered list: multi-select selections or a ranking order.
    List(Vec<Scalar>),
    /// Sub-item answers keyed by pair/statement/rank-item id.
    Map(BTreeMap<String, Scalar>),
}

impl Answer {
    /// The scalar comparison key, when the answer is scalar-shaped.
    pub fn scalar_key(&self) -> Option<String> {
        match self {
            Answer::Value(s) => Some(s.key()),
            _ => None,
        }
    }

    /// Comparison keys of a list-shaped answer, in submitted order.
    pub fn list_keys(&self) -> Option<Vec<String>> {
        match self {
            Answer::List(values) => Some(values.iter().map(Scalar::key).collect()),
            _ => None,
        }
    }

    /// The map of sub-item answers, when the answer is object-shaped.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Scalar>> {
        match self {
            Answer::Map(m) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_decoding_picks_the_right_shape() {
        let sheet: AnswerSheet = serde_json::from_str(
            r#"{
                "q1": "c2",
                "q2": 42.5,
                "q3": ["a", "b", 3],
                "q4": {"s1": true, "s2": "no"},
                "q5": {"rank_a": 2, "rank_b": 1}
            }"#,
        )
        .unwrap();

        assert_eq!(sheet["q1"].scalar_key().as_deref(), Some("c2"));
        assert_eq!(sheet["q2"], Answer::Value(Scalar::Number(42.5)));
        assert_eq!(
            sheet["q3"].list_keys().unwrap(),
            vec!["a".to_string(), "b".to_string(), "3".to_string()]
        );
        assert!(sheet["q4"].as_map().is_some());
        assert!(sheet["q5"].list_keys().is_none());
    }

    #[test]
    fn scalar_key_renders_integral_numbers_without_fraction() {
        assert_eq!(Scalar::Number(3.0).key(), "3");
        assert_eq!(Scalar::Number(-5.0).key(), "-5");
        assert_eq!(Scalar::Number(3.5).key(), "3.5");
        assert_eq!(Scalar::Bool(true).key(), "true");
    }

    #[test]
    fn as_number_accepts_numeric_strings() {
        assert_eq!(Scalar::Text(" 12.5 ".into()).as_number(), Some(12.5));
        assert_eq!(Scalar::Number(7.0).as_number(), Some(7.0));
        assert_eq!(Scalar::Text("abc".into()).as_number(), None);
        assert_eq!(Scalar::Text("".into()).as_number(), None);
        assert_eq!(Scalar::Bool(true).as_number(), None);
    }

    #[test]
    fn bool_coercion_recognizes_common_forms() {
        assert_eq!(Scalar::Bool(true).as_bool_lenient(), Some(true));
        assert_eq!(Scalar::Text("TRUE".into()).as_bool_lenient(), Some(true));
        assert_eq!(Scalar::Text(" yes ".into()).as_bool_lenient(), Some(true));
        assert_eq!(Scalar::Text("0".into()).as_bool_lenient(), Some(false));
        assert_eq!(Scalar::Text("no".into()).as_bool_lenient(), Some(false));
        assert_eq!(Scalar::Number(1.0).as_bool_lenient(), Some(true));
        assert_eq!(Scalar::Number(0.0).as_bool_lenient(), Some(false));
    }

    #[test]
    fn bool_coercion_rejects_ambiguous_values() {
        assert_eq!(Scalar::Text("maybe".into()).as_bool_lenient(), None);
        assert_eq!(Scalar::Text("".into()).as_bool_lenient(), None);
    }
}
