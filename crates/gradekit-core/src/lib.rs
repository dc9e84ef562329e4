//! gradekit-core — Quiz grading engine for staged business assessments.
//!
//! This crate defines the canonical question/rule data model, the
//! normalizer that migrates legacy question shapes onto it, and the pure
//! scoring functions that turn submitted answers into per-question,
//! per-stage, and total scores.

pub mod answer;
pub mod engine;
pub mod error;
pub mod grader;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod report;
pub mod rules;
