use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_voice_cli"))
}

fn scratch() -> TempDir {
    tempfile::tempdir().expect("create scratch dir")
}

fn synth(dir: &TempDir, pattern: &str, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    let output = cli()
        .args(["synth", "--pattern", pattern, "--output"])
        .arg(&path)
        .output()
        .expect("run synth");
    assert!(
        output.status.success(),
        "synth exited with {:?}",
        output.status.code()
    );
    path
}

#[test]
fn classify_tone_prints_response() {
    let dir = scratch();
    let input = synth(&dir, "sine", "tone.wav");
    let output = cli()
        .args(["classify", "--input"])
        .arg(&input)
        .output()
        .expect("run classify");

    assert!(
        output.status.success(),
        "classify exited with {:?}",
        output.status.code()
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let json: Value = serde_json::from_str(stdout.trim()).expect("response JSON payload");
    assert_eq!(json["classification"], "AI_GENERATED");
    assert!(json["details"]["pitch_score"].is_number());
}

#[test]
fn classify_writes_output_file() {
    let dir = scratch();
    let input = synth(&dir, "jittered_voice", "voice.wav");
    let report = dir.path().join("voice-report.json");
    let output = cli()
        .args(["classify", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&report)
        .output()
        .expect("run classify");

    assert!(output.status.success());
    let data = std::fs::read_to_string(&report).expect("report written to disk");
    let json: Value = serde_json::from_str(&data).expect("valid JSON report");
    assert_eq!(json["classification"], "HUMAN");
}

#[test]
fn classify_reads_mp3() {
    let input = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/steady_tone.mp3");
    let output = cli()
        .args(["classify", "--expect", "AI_GENERATED", "--input"])
        .arg(&input)
        .output()
        .expect("run classify");

    assert!(
        output.status.success(),
        "classify exited with {:?}",
        output.status.code()
    );
    let json: Value = serde_json::from_slice(&output.stdout).expect("response JSON payload");
    assert_eq!(json["classification"], "AI_GENERATED");
}

#[test]
fn scratch_files_are_removed() {
    let dir = scratch();
    let input = synth(&dir, "sine", "tone-cleanup.wav");
    assert!(input.exists());

    let root = dir.path().to_path_buf();
    drop(dir);
    assert!(!input.exists());
    assert!(!root.exists());
}

#[test]
fn classify_expectation_mismatch_exits_two() {
    let dir = scratch();
    let input = synth(&dir, "sine", "tone-expect.wav");
    let output = cli()
        .args(["classify", "--expect", "HUMAN", "--input"])
        .arg(&input)
        .output()
        .expect("run classify");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn features_prints_vector() {
    let dir = scratch();
    let input = synth(&dir, "sine", "tone-features.wav");
    let output = cli()
        .args(["features", "--input"])
        .arg(&input)
        .output()
        .expect("run features");

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("feature JSON payload");
    assert!(json["features"]["pitch_variability"].is_number());
    assert_eq!(json["features"]["frame_count"], 298);
}

#[test]
fn silent_input_fails() {
    let dir = scratch();
    let input = synth(&dir, "silence", "silence.wav");
    let output = cli()
        .args(["classify", "--input"])
        .arg(&input)
        .output()
        .expect("run classify");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("too silent"), "stderr: {stderr}");
}

#[test]
fn invalid_config_fails() {
    let dir = scratch();
    let input = synth(&dir, "sine", "tone-config.wav");
    let config = dir.path().join("bad-config.json");
    std::fs::write(
        &config,
        r#"{ "classifier": { "pitch": { "low": 8.0, "high": 35.0, "weight": 0.9 } } }"#,
    )
    .expect("write config");

    let output = cli()
        .args(["classify", "--config"])
        .arg(&config)
        .arg("--input")
        .arg(&input)
        .output()
        .expect("run classify");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn missing_input_fails() {
    let output = cli()
        .args(["classify", "--input", "/nonexistent/clip.mp3"])
        .output()
        .expect("run classify");
    assert_eq!(output.status.code(), Some(1));
}
