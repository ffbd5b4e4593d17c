use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create tempdir");
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents).expect("write input");
    }
    dir
}

fn json_addition(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("json-addition").expect("binary json-addition should be built");
    cmd.current_dir(dir);
    cmd
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("stdout is JSON")
}

#[test]
fn help_succeeds() {
    let dir = workspace(&[]);
    json_addition(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Add or subtract JSON documents"));
}

#[test]
fn version_banner() {
    let dir = workspace(&[]);
    json_addition(dir.path())
        .arg("-version")
        .assert()
        .success()
        .stdout(predicate::str::contains("json-addition version"));
}

#[test]
fn adds_files_to_stdout() {
    let dir = workspace(&[
        ("input-1.json", r#"{"a": 1, "b": "10 seconds", "c": [1], "d": true}"#),
        ("input-2.json", r#"{"a": 2, "b": "5 seconds", "c": [2], "d": false, "e": "new"}"#),
    ]);
    let assert = json_addition(dir.path()).arg("--input-files=input-*.json").assert().success();
    let expected: Value = serde_json::from_str(
        r#"{"a": 3, "b": "15 seconds", "c": [1, 2], "d": true, "e": "new"}"#,
    )
    .unwrap();
    assert_eq!(stdout_json(&assert.get_output().stdout), expected);
}

#[test]
fn stdout_is_two_space_indented_in_input_order() {
    let dir = workspace(&[("x.json", r#"{"z": 1, "a": 2}"#), ("y.json", r#"{"a": 1}"#)]);
    json_addition(dir.path())
        .args(["--inputFiles", "x.json y.json"])
        .assert()
        .success()
        .stdout("{\n  \"z\": 1,\n  \"a\": 3\n}\n");
}

#[test]
fn writes_output_file() {
    let dir = workspace(&[("1.json", r#"{"n": 4}"#), ("2.json", r#"{"n": 6}"#)]);
    json_addition(dir.path())
        .args(["--input-files=1.json 2.json", "--output-file=out.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Output successfully written to file: out.json"));
    let written = fs::read_to_string(dir.path().join("out.json")).expect("output written");
    assert_eq!(written, "{\n  \"n\": 10\n}");
}

#[test]
fn subtract_flag_subtracts_following_documents() {
    let dir = workspace(&[
        ("3.json", r#"{"e": 30, "f": "30 seconds", "l": [1, 2, 3], "only": 1}"#),
        ("2.json", r#"{"e": 20, "f": "20 seconds", "l": [2], "other": 1}"#),
    ]);
    let assert = json_addition(dir.path())
        .args(["--input-files=3.json 2.json", "--subtract"])
        .assert()
        .success();
    let expected: Value =
        serde_json::from_str(r#"{"e": 10, "f": "10 seconds", "l": [1, 3], "only": 1}"#).unwrap();
    assert_eq!(stdout_json(&assert.get_output().stdout), expected);
}

#[test]
fn rules_file_and_flags_layer() {
    let dir = workspace(&[
        ("1.json", r#"{"tags": ["b", "a"], "ok": true, "list": [2, 1]}"#),
        ("2.json", r#"{"tags": ["a", "c"], "ok": false, "list": [1]}"#),
        (
            "rules.json",
            r#"{"specificAdditionRules": {"tags": {"sort": true, "unique": true}}}"#,
        ),
    ]);
    let assert = json_addition(dir.path())
        .args(["--input-files=1.json 2.json", "--rules=rules.json", "--rule-binary-operation=AND"])
        .assert()
        .success();
    let expected: Value =
        serde_json::from_str(r#"{"tags": ["a", "b", "c"], "ok": false, "list": [2, 1, 1]}"#)
            .unwrap();
    assert_eq!(stdout_json(&assert.get_output().stdout), expected);
}

#[test]
fn ignore_errors_flag_joins_unmergeable_values() {
    let dir = workspace(&[("1.json", r#"{"a": 5}"#), ("2.json", r#"{"a": false}"#)]);
    let assert = json_addition(dir.path())
        .args(["--input-files=1.json 2.json", "--ruleIgnoreErrors"])
        .assert()
        .success();
    assert_eq!(stdout_json(&assert.get_output().stdout), serde_json::json!({"a": "5, false"}));
}

#[test]
fn invalid_binary_operation_exits_1() {
    let dir = workspace(&[("1.json", "{}")]);
    json_addition(dir.path())
        .args(["--input-files=1.json", "--rule-binary-operation=XOR"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--rule-binary-operation"));
}

#[test]
fn missing_input_files_exits_1() {
    let dir = workspace(&[]);
    json_addition(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--input-files"));
}

#[test]
fn unmatched_pattern_exits_1() {
    let dir = workspace(&[]);
    json_addition(dir.path()).arg("--input-files=nothing-*.json").assert().code(1);
}

#[test]
fn shape_mismatch_exits_1() {
    let dir = workspace(&[("1.json", "{}"), ("2.json", "[]")]);
    json_addition(dir.path())
        .arg("--input-files=1.json 2.json")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("2.json"));
}

#[test]
fn unmergeable_values_exit_1() {
    let dir = workspace(&[("1.json", r#"{"a": {"b": 5}}"#), ("2.json", r#"{"a": {"b": "x"}}"#)]);
    json_addition(dir.path())
        .arg("--input-files=1.json 2.json")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("a.b"));
}

#[test]
fn missing_rules_file_exits_1() {
    let dir = workspace(&[("1.json", "{}")]);
    json_addition(dir.path())
        .args(["--input-files=1.json", "--rules=absent.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not find a valid JSON file at: absent.json"));
}

#[test]
fn default_log_level_hides_fold_progress() {
    let dir = workspace(&[("1.json", r#"{"n": 1}"#)]);
    json_addition(dir.path())
        .env_remove("RUST_LOG")
        .arg("--input-files=1.json")
        .assert()
        .success()
        .stderr(predicate::str::contains("folding document").not());
}

#[test]
fn later_subtrahends_add_new_fields() {
    let dir = workspace(&[
        ("1.json", r#"{"a": 5}"#),
        ("2.json", r#"{"a": 1, "c": 3}"#),
        ("3.json", r#"{"a": 1, "b": 2}"#),
    ]);
    let assert = json_addition(dir.path())
        .args(["--input-files=1.json 2.json 3.json", "--subtract"])
        .assert()
        .success();
    assert_eq!(stdout_json(&assert.get_output().stdout), serde_json::json!({"a": 3, "b": 2}));
}

#[test]
fn silent_suppresses_output() {
    let dir = workspace(&[("1.json", r#"{"n": 1}"#)]);
    json_addition(dir.path())
        .args(["--input-files=1.json", "--output-file=out.json", "-s"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert!(!dir.path().join("out.json").exists());
}

#[test]
fn verbose_overrides_silent() {
    let dir = workspace(&[("1.json", r#"{"n": 1}"#)]);
    let assert = json_addition(dir.path())
        .env_remove("RUST_LOG")
        .args(["--input-files=1.json", "--silent", "--verbose"])
        .assert()
        .success()
        .stderr(predicate::str::contains("working on these files"))
        .stderr(predicate::str::contains("folding document"));
    assert_eq!(stdout_json(&assert.get_output().stdout), serde_json::json!({"n": 1}));
}
