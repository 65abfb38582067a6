use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Isolated config: heuristic backend, no artificial delay.
fn config(dir: &Path) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(
        &path,
        "[predictor]\nbackend = \"heuristic\"\nsimulated_delay_ms = 0\n",
    )
    .expect("write config");
    path
}

fn heart_risk(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("heart-risk").expect("binary");
    cmd.arg("--config").arg(config(dir)).env_remove("RUST_LOG");
    cmd
}

fn write_answers(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("answers.json");
    fs::write(&path, body).expect("write answers");
    path
}

#[test]
fn tips_are_printed_in_arabic() {
    let temp = TempDir::new().expect("tempdir");
    heart_risk(temp.path())
        .args(["--locale", "ar", "tips"])
        .assert()
        .success()
        .stdout(predicate::str::contains("نصائح صحية"))
        .stdout(predicate::str::contains("التدخين"));
}

#[test]
fn predict_json_is_within_contract() {
    let temp = TempDir::new().expect("tempdir");
    let answers = write_answers(
        temp.path(),
        r#"{"Age": "45", "Sex": 0, "Diabetes": 1, "FamilyHistory": 0, "Smoking": 0, "PhysicalActivity": 3}"#,
    );
    let output = heart_risk(temp.path())
        .args(["--locale", "en", "predict", "--json", "--answers"])
        .arg(&answers)
        .output()
        .expect("run");
    assert!(output.status.success());

    let result: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert!(matches!(result["risk_level"].as_str(), Some("low" | "high")));
    let probability = result["probability"].as_f64().expect("probability");
    assert!((0.5..=1.0).contains(&probability));
}

#[test]
fn predict_text_output_is_localized() {
    let temp = TempDir::new().expect("tempdir");
    let answers = write_answers(
        temp.path(),
        r#"{"Age": 45, "Sex": 0, "Diabetes": 1, "FamilyHistory": 0, "Smoking": 0, "PhysicalActivity": 3}"#,
    );
    heart_risk(temp.path())
        .args(["--locale", "en", "predict", "--answers"])
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Low risk of heart attack"))
        .stdout(predicate::str::contains("Probability: 0.89"));
}

#[test]
fn predict_rejects_out_of_range_answers() {
    let temp = TempDir::new().expect("tempdir");
    let answers = write_answers(
        temp.path(),
        r#"{"Age": 45, "Sex": 0, "Diabetes": 1, "FamilyHistory": 0, "Smoking": 0, "PhysicalActivity": 9}"#,
    );
    heart_risk(temp.path())
        .args(["--locale", "en", "predict", "--answers"])
        .arg(&answers)
        .assert()
        .failure()
        .stderr(predicate::str::contains("PhysicalActivity"))
        .stderr(predicate::str::contains("between 0 and 7"));
}

#[test]
fn predict_reports_unreachable_service() {
    let temp = TempDir::new().expect("tempdir");
    let answers = write_answers(
        temp.path(),
        r#"{"Age": 60, "Sex": 1, "Diabetes": 0, "FamilyHistory": 1, "Smoking": 1, "PhysicalActivity": 1}"#,
    );
    heart_risk(temp.path())
        .args([
            "--locale",
            "en",
            "--predictor",
            "http",
            "--endpoint",
            "http://127.0.0.1:9/predict",
            "--timeout-ms",
            "2000",
            "predict",
            "--answers",
        ])
        .arg(&answers)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Prediction unavailable"));
}

#[test]
fn interactive_run_writes_answers() {
    let temp = TempDir::new().expect("tempdir");
    let out = temp.path().join("collected.json");
    heart_risk(temp.path())
        .args(["--locale", "en", "run", "--answers-out"])
        .arg(&out)
        .write_stdin("45\nMale\n2\n1\n1\n3\n:tips\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 6 of 6"))
        .stdout(predicate::str::contains("Probability:"))
        .stdout(predicate::str::contains("Health Tips"));

    let saved: Value = serde_json::from_str(&fs::read_to_string(&out).expect("saved")).expect("json");
    assert_eq!(saved["form_id"], "heart-risk");
    assert_eq!(saved["answers"]["Age"], "45");
    assert_eq!(saved["answers"]["Sex"], 0);
    assert_eq!(saved["answers"]["Diabetes"], 1);
    assert!(saved["meta"]["created_at"].is_string());
}

#[test]
fn schema_describes_answers_and_prediction() {
    let temp = TempDir::new().expect("tempdir");
    let output = heart_risk(temp.path())
        .args(["--locale", "en", "schema"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let schema: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(schema["answers"]["properties"]["Age"]["maximum"], 120);
    assert!(schema["prediction"]["request"].is_object());
}

#[test]
fn missing_config_file_fails() {
    let temp = TempDir::new().expect("tempdir");
    Command::cargo_bin("heart-risk")
        .expect("binary")
        .args(["--config"])
        .arg(temp.path().join("absent.toml"))
        .arg("tips")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config"));
}
