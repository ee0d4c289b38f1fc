use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

const RECORDING: &str = r#"{"width": 10, "height": 2, "duration": 2.0, "title": "cli", "stdout": [[0.5, "$ \u001b[32mls\u001b[0m"], [1.0, "\r\nok"]]}"#;

fn run_castsvg(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_castsvg"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("CASTSVG_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("run castsvg");
    // The process may exit before reading stdin (parse errors, --version).
    if let Some(mut pipe) = child.stdin.take() {
        let _ = pipe.write_all(stdin.as_bytes());
    }
    child.wait_with_output().expect("wait castsvg")
}

fn describe(output: &Output) -> String {
    format!(
        "stdout={}\nstderr={}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn cli_renders_stdin_to_stdout() {
    let output = run_castsvg(&["1"], RECORDING);
    assert!(output.status.success(), "{}", describe(&output));
    assert!(output.stderr.is_empty(), "{}", describe(&output));

    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(stdout.contains(">ls<"));
    assert!(!stdout.contains(">ok<"));
    assert!(stdout.contains(">cli<"));
}

#[test]
fn cli_unparseable_time_renders_the_end() {
    let output = run_castsvg(&["later"], RECORDING);
    assert!(output.status.success(), "{}", describe(&output));
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.contains(">ok<"));
}

#[test]
fn cli_animate_outputs_keyframes() {
    let output = run_castsvg(&["--animate"], RECORDING);
    assert!(output.status.success(), "{}", describe(&output));
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.contains("@keyframes frame-0"));
    assert!(stdout.contains("@keyframes frame-1"));
    assert!(stdout.contains("infinite"));
}

#[test]
fn cli_reads_file_and_config() {
    let root = temp_dir("cli-file");
    let recording = root.join("rec.json");
    let config = root.join("castsvg.toml");
    fs::write(&recording, RECORDING).expect("write recording");
    fs::write(&config, "[render]\nstrategy = \"viewport\"\n").expect("write config");

    let output = run_castsvg(
        &[
            "--animate",
            "--file",
            recording.to_str().expect("utf8 path"),
            "--config",
            config.to_str().expect("utf8 path"),
        ],
        "",
    );
    assert!(output.status.success(), "{}", describe(&output));
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.contains("class=\"strip\""));
}

#[test]
fn cli_empty_input_is_usage_error() {
    let output = run_castsvg(&[], "");
    assert_eq!(output.status.code(), Some(1), "{}", describe(&output));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("[error] Invalid recording"));
    assert!(stderr.contains("USAGE:"));
    assert!(!stderr.contains('\u{1b}'));
}

#[test]
fn cli_parse_error_exits_two_with_usage() {
    let output = run_castsvg(&["--strategy", "slideshow"], RECORDING);
    assert_eq!(output.status.code(), Some(2), "{}", describe(&output));
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("Invalid command arguments"));
    assert!(stderr.contains("slideshow"));
    assert!(stderr.contains("USAGE:"));
}

#[test]
fn cli_bad_config_exits_one_without_usage() {
    let root = temp_dir("cli-bad-config");
    let config = root.join("castsvg.toml");
    fs::write(&config, "[render]\nfont_size = -2.0\n").expect("write config");

    let output = run_castsvg(&["--config", config.to_str().expect("utf8 path")], RECORDING);
    assert_eq!(output.status.code(), Some(1), "{}", describe(&output));
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("Invalid config"));
    assert!(!stderr.contains("USAGE:"));
}

#[test]
fn cli_strategy_without_animate_warns_on_stderr() {
    let output = run_castsvg(&["--strategy", "viewport"], RECORDING);
    assert!(output.status.success(), "{}", describe(&output));
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("warn: --strategy viewport only applies with --animate"));
}

#[test]
fn cli_version_prints_to_stdout() {
    let output = run_castsvg(&["--version"], "");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert_eq!(stdout.trim(), format!("castsvg {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_help_prints_usage() {
    let output = run_castsvg(&["--help"], "");
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("castsvg [TIME]"));
}

fn temp_dir(name: &str) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let root = std::env::temp_dir().join(format!("castsvg-{name}-{ts}"));
    fs::create_dir_all(&root).expect("mkdir temp dir");
    root
}
