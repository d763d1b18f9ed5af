use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const PATTERN: &str = "%d{HH:mm:ss,SSS} %-5p [%c] (%t) %s%E%n";

const SERVER_LOG: &str = "\
12:00:00,000 INFO  [org.app] (main) started
12:00:01,000 WARN  [org.app] (main) low disk
java.lang.IllegalStateException: boom
12:00:02,000 ERROR [org.app] (worker-1) failed
";

fn log_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SERVER_LOG.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn logpattern() -> Command {
    Command::cargo_bin("logpattern").unwrap()
}

#[test]
fn test_line_output_from_file() {
    let file = log_file();
    logpattern()
        .args(["-p", PATTERN, "-i"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(
            "Count: 001 [0001]: 12:00:00,000 INFO  [org.app] (main) started\n\
             Count: 002 [0002]: 12:00:01,000 WARN  [org.app] (main) low disk\n\
             Count: 003 [0004]: 12:00:02,000 ERROR [org.app] (worker-1) failed\n",
        );
}

#[test]
fn test_reads_stdin() {
    logpattern()
        .args(["-p", PATTERN])
        .write_stdin(SERVER_LOG)
        .assert()
        .success()
        .stdout(predicate::str::contains("Count: 003 [0004]"));
}

#[test]
fn test_level_filter() {
    logpattern()
        .args(["-p", PATTERN, "--level", "warn"])
        .write_stdin(SERVER_LOG)
        .assert()
        .success()
        .stdout(predicate::str::contains("[0002]"))
        .stdout(predicate::str::contains("[0004]"))
        .stdout(predicate::str::contains("[0001]").not());
}

#[test]
fn test_exclusive_level_filter() {
    logpattern()
        .args(["-p", PATTERN, "-l", "WARN", "--exclusive"])
        .write_stdin(SERVER_LOG)
        .assert()
        .success()
        .stdout("Count: 001 [0002]: 12:00:01,000 WARN  [org.app] (main) low disk\n");
}

#[test]
fn test_exclusive_requires_level() {
    logpattern()
        .args(["-p", PATTERN, "--exclusive"])
        .write_stdin(SERVER_LOG)
        .assert()
        .failure();
}

#[test]
fn test_time_range() {
    logpattern()
        .args(["-p", PATTERN])
        .args(["--from", "2024-05-20 12:00:01", "--to", "2024-05-20 12:00:01"])
        .write_stdin(SERVER_LOG)
        .assert()
        .success()
        .stdout("Count: 001 [0002]: 12:00:01,000 WARN  [org.app] (main) low disk\n");
}

#[test]
fn test_invalid_time_bound() {
    logpattern()
        .args(["-p", PATTERN, "--from", "not a time"])
        .write_stdin(SERVER_LOG)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid time 'not a time'"));
}

#[test]
fn test_max_results_keeps_last() {
    logpattern()
        .args(["-p", PATTERN, "-n", "1"])
        .write_stdin(SERVER_LOG)
        .assert()
        .success()
        .stdout("Count: 001 [0004]: 12:00:02,000 ERROR [org.app] (worker-1) failed\n");
}

#[test]
fn test_no_results_exit_code() {
    logpattern()
        .args(["-p", PATTERN, "-l", "FATAL"])
        .write_stdin(SERVER_LOG)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_invalid_pattern() {
    logpattern()
        .args(["-p", "%d %Q"])
        .write_stdin(SERVER_LOG)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid format character 'Q'"));
}

#[test]
fn test_missing_input_file() {
    logpattern()
        .args(["-p", PATTERN, "-i", "/nonexistent/logpattern/server.log"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse"));
}

#[test]
fn test_jsonl_output() {
    let output = logpattern()
        .args(["-p", PATTERN, "-F", "jsonl", "-l", "ERROR"])
        .write_stdin(SERVER_LOG)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let record: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(record["line_number"], 4);
    assert_eq!(record["fields"][1]["format_type"], "level");
    assert_eq!(record["fields"][1]["value"], "ERROR");
    assert_eq!(record["fields"][3]["value"], "worker-1");
}

#[test]
fn test_logfmt_output_without_color() {
    logpattern()
        .args(["-p", PATTERN, "-F", "logfmt", "--color", "never", "-l", "WARN", "--exclusive"])
        .write_stdin(SERVER_LOG)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "line=2 date=12:00:01,000 level=WARN category=org.app thread=main simple_message=\"low disk\"",
        ))
        .stdout(predicate::str::contains("\x1b[").not());
}

#[test]
fn test_logfmt_output_with_color() {
    logpattern()
        .args(["-p", PATTERN, "-F", "logfmt", "--color", "always"])
        .write_stdin(SERVER_LOG)
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b["));
}

#[test]
fn test_zero_buffer_size_rejected() {
    let file = log_file();
    logpattern()
        .args(["-p", PATTERN, "--buffer-size", "0", "-i"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--buffer-size"));
}

#[test]
fn test_small_buffer_size() {
    let file = log_file();
    logpattern()
        .args(["-p", PATTERN, "--buffer-size", "1", "-i"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Count: 003 [0004]"));
}

#[test]
fn test_invalid_utf8_input() {
    logpattern()
        .args(["-p", PATTERN, "-l", "WARN"])
        .write_stdin(&b"12:00:01,000 WARN  [org.app] (main) caf\xe9\n12:00:02,000 ERROR [org.app] (main) down\n"[..])
        .assert()
        .success()
        .stdout(predicate::str::contains("[0001]: 12:00:01,000 WARN  [org.app] (main) caf\u{FFFD}"))
        .stdout(predicate::str::contains("[0002]"));
}
