//! End-to-end tests of the `linewise` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn linewise(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_linewise"))
        .args(args)
        .current_dir(dir)
        .env("LINEWISE_CONFIG_DIR", dir.join("no-global"))
        .env_remove("LINEWISE_CONFIG")
        .output()
        .expect("failed to run linewise")
}

fn project(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (name, content) in files {
        let path = tmp.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    tmp
}

#[test]
fn clean_project_exits_zero() {
    let tmp = project(&[("lib/ok.rb", "class A\n  def b\n    c { 1 }\n  end\nend\n")]);
    let output = linewise(tmp.path(), &["check", "--format", "compact"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn problems_exit_one_with_compact_lines() {
    let tmp = project(&[("lib/bad.rb", "def a\n    b\nend\n")]);
    let output = linewise(tmp.path(), &["check", "--format", "compact"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        "lib/bad.rb:2:4: error [LW001] Line is indented to 4, but should be at 2"
    );
}

#[test]
fn explicit_paths_replace_selectors() {
    let tmp = project(&[
        ("lib/bad.rb", "def a\n    b\nend\n"),
        ("scripts/ok.rb", "x = 1\n"),
    ]);
    let output = linewise(tmp.path(), &["check", "scripts", "--format", "json"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["files_checked"], 1);
}

#[test]
fn project_config_is_picked_up() {
    let tmp = project(&[
        ("lib/wide.rb", "def a\n    b\nend\n"),
        (
            "linewise.toml",
            "[[file_set]]\n[file_set.style]\nindentation_spaces = 4\n",
        ),
    ]);
    let output = linewise(tmp.path(), &["check"]);
    assert!(output.status.success());
}

#[test]
fn init_writes_config_once() {
    let tmp = TempDir::new().unwrap();
    assert!(linewise(tmp.path(), &["init"]).status.success());
    assert!(tmp.path().join("linewise.toml").is_file());
    assert!(!linewise(tmp.path(), &["init"]).status.success());
    assert!(linewise(tmp.path(), &["init", "--force"]).status.success());
}

#[test]
fn list_rules_names_every_rule() {
    let tmp = TempDir::new().unwrap();
    let output = linewise(tmp.path(), &["list-rules"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    for code in ["LW001", "LW002", "LW003", "LW004", "LW005", "LW006", "LW007"] {
        assert!(stdout.contains(code), "missing {code}");
    }
}
