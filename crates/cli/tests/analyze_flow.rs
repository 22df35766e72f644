use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn viability_cmd(state_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("viability").expect("binary");
    cmd.env("VIABILITY_STATE_DIR", state_dir)
        .env("VIABILITY_ENGINE_LATENCY_MS", "0")
        .env("VIABILITY_SCORING_SEED", "7");
    cmd
}

const FULL_FLAGS: [&str; 20] = [
    "--cep",
    "01310-100",
    "--street",
    "Avenida Paulista",
    "--number",
    "1578",
    "--neighborhood",
    "Bela Vista",
    "--city",
    "São Paulo",
    "--uf",
    "SP",
    "--cnae",
    "4781-4/00",
    "--capital",
    "60000",
    "--legal-nature",
    "LTDA",
    "--responsible",
    "Administrador",
];

fn analyze_json(state_dir: &Path) -> (bool, Value) {
    let output = viability_cmd(state_dir)
        .arg("analyze")
        .args(FULL_FLAGS)
        .arg("--json")
        .output()
        .expect("command run");
    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    (output.status.success(), body)
}

fn assert_verdict_is_consistent(body: &Value) {
    let category = body["category"].as_str().expect("category");
    match category {
        "positive" => {
            let score = body["score"].as_u64().expect("positive verdicts carry a score");
            assert!((60..=95).contains(&score), "positive score {score}");
        }
        "negative" => {
            let score = body["score"].as_u64().expect("negative verdicts carry a score");
            assert!((25..=59).contains(&score), "negative score {score}");
        }
        "inadequate_use" => assert!(body["score"].is_null()),
        other => panic!("unexpected fresh-run category {other}"),
    }
}

#[test]
fn analyze_produces_verdict_and_persists_state() {
    let temp = tempdir().unwrap();
    let (ok, body) = analyze_json(temp.path());
    assert!(ok, "analyze failed: {body}");

    let id = body["analysis_id"].as_str().expect("analysis id");
    assert!(id.starts_with("analysis_"));
    assert_eq!(body["attempts_used"], 1);
    assert_eq!(body["attempts_max"], 2);
    assert_eq!(body["company"]["cidade"], "São Paulo");
    assert_verdict_is_consistent(&body);

    for file in ["analyses.json", "payloads.json", "draft.json", "usage.json"] {
        assert!(temp.path().join(file).exists(), "missing {file}");
    }
    assert!(
        !temp.path().join("current.json").exists(),
        "completed runs must release the session pointer"
    );

    let output = viability_cmd(temp.path())
        .args(["status", "--json"])
        .output()
        .expect("status run");
    let status: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(status["records"], 1);
    assert!(status["current_id"].is_null());
    assert_eq!(status["draft_present"], true);
    assert_eq!(status["attempts_used"], 1);
    assert_eq!(status["limit_reached"], false);
}

#[test]
fn analyze_rejects_invalid_payload_without_consuming_attempts() {
    let temp = tempdir().unwrap();
    let output = viability_cmd(temp.path())
        .args(["analyze", "--cep", "123", "--json"])
        .output()
        .expect("command run");
    assert!(!output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["error"], "validation");
    let issues = body["issues"].as_array().expect("issues array");
    assert!(issues.len() >= 2, "issues: {issues:?}");
    assert!(issues.iter().any(|issue| issue["field"] == "cep"));

    assert!(
        !temp.path().join("usage.json").exists(),
        "validation failures must not consume attempts"
    );
    assert!(!temp.path().join("analyses.json").exists());
}

#[test]
fn seeded_runs_are_reproducible() {
    let first_dir = tempdir().unwrap();
    let second_dir = tempdir().unwrap();
    let (ok_first, first) = analyze_json(first_dir.path());
    let (ok_second, second) = analyze_json(second_dir.path());
    assert!(ok_first && ok_second);

    assert_eq!(first["category"], second["category"]);
    assert_eq!(first["score"], second["score"]);
}

#[test]
fn human_output_names_the_attempt() {
    let temp = tempdir().unwrap();
    viability_cmd(temp.path())
        .arg("analyze")
        .args(FULL_FLAGS)
        .assert()
        .success()
        .stdout(predicates::str::contains("Attempt 1 of 2"));
}
