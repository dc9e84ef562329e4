//! The `gradekit grade` command.

use std::path::PathBuf;

use anyhow::Result;

use gradekit_core::engine::{compute_quiz_scores_with, FlagPolicy, ScoreSummary};
use gradekit_core::parser::{load_answers, load_quiz, load_rules};
use gradekit_core::report::GradeReport;

pub fn execute(
    quiz_path: PathBuf,
    answers_path: PathBuf,
    rules_path: Option<PathBuf>,
    output: Option<PathBuf>,
    legacy_flags: bool,
    json: bool,
) -> Result<()> {
    let quiz = load_quiz(&quiz_path)?;
    let answers = load_answers(&answers_path)?;
    let rules = match &rules_path {
        Some(path) => load_rules(path)?,
        None => Vec::new(),
    };

    let policy = if legacy_flags {
        FlagPolicy::LegacyFourBand
    } else {
        FlagPolicy::NegativeScore
    };
    let summary = compute_quiz_scores_with(&quiz.questions, &answers, policy);

    let title = if quiz.title.is_empty() {
        quiz_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "quiz".to_string())
    } else {
        quiz.title.clone()
    };

    let report = GradeReport::new(title.clone(), quiz.questions.len(), summary, &rules);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&title, &report.summary);
        if let Some(outcome) = &report.outcome {
            println!("Outcome: {} — {}", outcome.condition_text, outcome.message);
        } else if !rules.is_empty() {
            println!("Outcome: no rule matched.");
        }
    }

    if let Some(dir) = output {
        let path = dir.join(format!("grade-{}.json", report.id));
        report.save_json(&path)?;
        // Keep stdout machine-readable in JSON mode.
        if json {
            eprintln!("Report written to {}", path.display());
        } else {
            println!("Report written to {}", path.display());
        }
    }

    Ok(())
}

fn print_summary(title: &str, summary: &ScoreSummary) {
    use comfy_table::{Cell, Table};

    println!("Quiz: {title}");

    let mut table = Table::new();
    table.set_header(vec!["Stage", "Score", "Max", "%", "Flags"]);

    for stage in &summary.stages {
        table.add_row(vec![
            Cell::new(&stage.stage),
            Cell::new(format!("{:.1}", stage.total)),
            Cell::new(format!("{:.1}", stage.max)),
            Cell::new(format!("{}%", stage.percent())),
            Cell::new(stage.flags),
        ]);
    }

    println!("{table}");
    println!(
        "Total: {} / {} ({}%)",
        summary.total_score,
        summary.max_score,
        summary.overall_percent()
    );

    if summary.flagged.is_empty() {
        println!("No stages below threshold.");
    } else {
        for flagged in &summary.flagged {
            println!(
                "FLAGGED: {} at {}% — {}",
                flagged.stage, flagged.percent, flagged.message
            );
        }
    }
}
