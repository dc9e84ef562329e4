//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gradekit() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("gradekit").unwrap()
}

#[test]
fn grade_readiness_sample() {
    gradekit()
        .arg("grade")
        .arg("--quiz")
        .arg("../../samples/readiness.quiz.json")
        .arg("--answers")
        .arg("../../samples/readiness.answers.json")
        .arg("--rules")
        .arg("../../samples/readiness.rules.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("Business Readiness Assessment"))
        .stdout(predicate::str::contains("Total: 41 / 50 (82%)"))
        .stdout(predicate::str::contains("Ready to scale"))
        .stdout(predicate::str::contains("No stages below threshold."));
}

#[test]
fn grade_without_rules_prints_no_outcome() {
    gradekit()
        .arg("grade")
        .arg("--quiz")
        .arg("../../samples/readiness.quiz.json")
        .arg("--answers")
        .arg("../../samples/readiness.answers.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 41 / 50 (82%)"))
        .stdout(predicate::str::contains("Outcome:").not());
}

#[test]
fn grade_flags_weak_stages() {
    let dir = TempDir::new().unwrap();
    let quiz = dir.path().join("quiz.json");
    let answers = dir.path().join("answers.json");
    std::fs::write(
        &quiz,
        r#"[{"id": "q1", "type": "scorable", "stage": "Finance"}]"#,
    )
    .unwrap();
    std::fs::write(&answers, r#"{"q1": "Flag"}"#).unwrap();

    gradekit()
        .arg("grade")
        .arg("--quiz")
        .arg(&quiz)
        .arg("--answers")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: -5 / 15"))
        .stdout(predicate::str::contains("FLAGGED: Finance"));
}

#[test]
fn grade_writes_report_json() {
    let dir = TempDir::new().unwrap();

    gradekit()
        .arg("grade")
        .arg("--quiz")
        .arg("../../samples/readiness.quiz.json")
        .arg("--answers")
        .arg("../../samples/readiness.answers.json")
        .arg("--rules")
        .arg("../../samples/readiness.rules.json")
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let reports: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(reports.len(), 1);
}

#[test]
fn grade_legacy_flags_mode_runs() {
    gradekit()
        .arg("grade")
        .arg("--quiz")
        .arg("../../samples/readiness.quiz.json")
        .arg("--answers")
        .arg("../../samples/readiness.answers.json")
        .arg("--legacy-flags")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 41 / 50 (82%)"));
}

#[test]
fn grade_json_output_prints_report() {
    gradekit()
        .arg("grade")
        .arg("--quiz")
        .arg("../../samples/readiness.quiz.json")
        .arg("--answers")
        .arg("../../samples/readiness.answers.json")
        .arg("--rules")
        .arg("../../samples/readiness.rules.json")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_score\": 41"))
        .stdout(predicate::str::contains("\"condition_text\": \"Ready to scale\""))
        .stdout(predicate::str::contains("Total:").not());
}

#[test]
fn validate_readiness_sample() {
    gradekit()
        .arg("validate")
        .arg("--quiz")
        .arg("../../samples/readiness.quiz.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("8 questions"))
        .stdout(predicate::str::contains("Quiz definition valid."));
}

#[test]
fn validate_with_rules() {
    gradekit()
        .arg("validate")
        .arg("--quiz")
        .arg("../../samples/readiness.quiz.json")
        .arg("--rules")
        .arg("../../samples/readiness.rules.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rules: 3 loaded"));
}

#[test]
fn validate_reports_definition_warnings() {
    let dir = TempDir::new().unwrap();
    let quiz = dir.path().join("quiz.json");
    std::fs::write(
        &quiz,
        r#"[
            {"id": "q1", "type": "single_choice"},
            {"id": "q1", "type": "matching"}
        ]"#,
    )
    .unwrap();

    gradekit()
        .arg("validate")
        .arg("--quiz")
        .arg(&quiz)
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate question id"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn validate_rule_warnings_align_with_question_warnings() {
    let dir = TempDir::new().unwrap();
    let quiz = dir.path().join("quiz.json");
    let rules = dir.path().join("rules.json");
    std::fs::write(
        &quiz,
        r#"[
            {"id": "q1", "type": "single_choice"},
            {"id": "q1", "type": "numeric"}
        ]"#,
    )
    .unwrap();
    std::fs::write(
        &rules,
        r#"[{"logic": {"operator": "between", "min": 60, "max": 40}}]"#,
    )
    .unwrap();

    gradekit()
        .arg("validate")
        .arg("--quiz")
        .arg(&quiz)
        .arg("--rules")
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  [q1] WARNING: duplicate"))
        .stdout(predicate::str::contains("\n  WARNING: rule 1"))
        .stdout(predicate::str::contains("   WARNING").not());
}

#[test]
fn grade_nonexistent_quiz_fails() {
    gradekit()
        .arg("grade")
        .arg("--quiz")
        .arg("/nonexistent/quiz.json")
        .arg("--answers")
        .arg("/nonexistent/answers.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}
