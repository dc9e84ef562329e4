//! The `gradekit validate` command.

use std::path::PathBuf;

use anyhow::Result;

use gradekit_core::parser::{load_quiz, load_rules, validate_quiz, validate_rules};

pub fn execute(quiz_path: PathBuf, rules_path: Option<PathBuf>) -> Result<()> {
    let quiz = load_quiz(&quiz_path)?;
    println!(
        "Quiz: {} ({} questions)",
        if quiz.title.is_empty() {
            quiz_path.display().to_string()
        } else {
            quiz.title.clone()
        },
        quiz.questions.len()
    );

    let mut warnings = validate_quiz(&quiz.questions);

    if let Some(path) = rules_path {
        let rules = load_rules(&path)?;
        println!("Rules: {} loaded", rules.len());
        warnings.extend(validate_rules(&rules));
    }

    for w in &warnings {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("[{id}] "))
            .unwrap_or_default();
        println!("  {prefix}WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Quiz definition valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
