//! CLI contract tests
//!
//! Runs the built binary against temp directories and checks text output,
//! JSON output, manual overrides and exit codes.

use std::path::Path;
use std::process::Command;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_indent-detective")
}

fn setup_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("spaces.py"),
        r#"
def handler(event):
    """
	Docstring lines indented with a tab must not count.
    """
    if event:
        return True
    return False
"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("tabs.go"),
        "package main\n\n// comment\nfunc main() {\n\tprintln(\"hi\")\n}\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("README.md"), "# not source\n").unwrap();
    dir
}

fn run(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(bin())
        .arg(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run indent-detective");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn json_files(stdout: &str) -> Vec<serde_json::Value> {
    let v: serde_json::Value = serde_json::from_str(stdout).expect("Invalid JSON");
    v["files"].as_array().expect("files array").clone()
}

#[test]
fn test_default_command_prints_each_file() {
    let dir = setup_repo();
    let (code, stdout, _) = run(dir.path(), &[]);
    assert_eq!(code, 0);
    assert!(stdout.contains("spaces.py"));
    assert!(stdout.contains("4 Spaces"));
    assert!(stdout.contains("tabs.go"));
    assert!(stdout.contains("Tabs"));
    assert!(!stdout.contains("README.md"));
}

#[test]
fn test_json_output() {
    let dir = setup_repo();
    let (code, stdout, _) = run(dir.path(), &["detect", "--format", "json"]);
    assert_eq!(code, 0);
    let files = json_files(&stdout);
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["path"], "spaces.py");
    assert_eq!(files[0]["decision"]["kind"], "spaces");
    assert_eq!(files[0]["decision"]["width"], 4);
    assert_eq!(files[0]["language"], "Python");
    assert_eq!(files[1]["decision"]["kind"], "tab");
}

#[test]
fn test_manual_override_flag() {
    let dir = setup_repo();
    let target = dir.path().join("spaces.py");
    let set = format!("{}=2", target.display());
    let (code, stdout, _) = run(dir.path(), &["detect", "--format", "json", "--set", &set]);
    assert_eq!(code, 0);
    let files = json_files(&stdout);
    assert_eq!(files[0]["manual"], true);
    assert_eq!(files[0]["status"], "2 Spaces");
    assert!(files[0]["decision"].is_null());
}

#[test]
fn test_fail_on_mixed() {
    let dir = setup_repo();
    let (code, _, stderr) = run(dir.path(), &["detect", "--fail-on-mixed"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("--fail-on-mixed"));

    std::fs::remove_file(dir.path().join("tabs.go")).unwrap();
    let (code, _, _) = run(dir.path(), &["detect", "--fail-on-mixed"]);
    assert_eq!(code, 0);
}

#[test]
fn test_indentations_flag_limits_choices() {
    let dir = setup_repo();
    let (code, stdout, _) = run(dir.path(), &["choices", "--indentations", "2,4"]);
    assert_eq!(code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["Automatic", "2 Spaces", "4 Spaces", "Tabs"]);
}

#[test]
fn test_project_config_is_used() {
    let dir = setup_repo();
    std::fs::write(
        dir.path().join("indent-detective.toml"),
        "possible_indentations = [\"2\", \"8\"]\n",
    )
    .unwrap();
    let (_, stdout, _) = run(dir.path(), &["detect", "--format", "json"]);
    let files = json_files(&stdout);
    // 4 is no longer admissible
    assert_eq!(files[0]["decision"]["kind"], "undetermined");
}

#[test]
fn test_debug_flag_logs_votes() {
    let dir = setup_repo();
    let (code, _, stderr) = run(&dir.path().join("spaces.py"), &["--debug"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("indent report"));
}

#[test]
fn test_config_debug_messages_log_votes() {
    let dir = setup_repo();
    std::fs::write(
        dir.path().join("indent-detective.toml"),
        "enable_debug_messages = true\n",
    )
    .unwrap();
    let (code, _, stderr) = run(dir.path(), &[]);
    assert_eq!(code, 0);
    assert!(stderr.contains("indent report"));

    // without the setting the default level stays quiet
    std::fs::remove_file(dir.path().join("indent-detective.toml")).unwrap();
    let (_, _, stderr) = run(dir.path(), &[]);
    assert!(!stderr.contains("indent report"));
}

#[test]
fn test_init_creates_config() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run(dir.path(), &["init"]);
    assert_eq!(code, 0);
    assert!(dir.path().join("indent-detective.toml").exists());
}

#[test]
fn test_missing_path_fails() {
    let (code, _, _) = run(Path::new("/no/such/dir/anywhere"), &["detect"]);
    assert_ne!(code, 0);
}
