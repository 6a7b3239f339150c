//! Binary-level tests: run the `vbm` executable and check what it prints.
//!
//! Every run passes `-f` (or an explicit rc file) so a `.vbmrc` in the
//! developer's home or working directory cannot change the output.

use std::io::Write;
use std::process::{Command, Output};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn vbm_binary() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_vbm"))
}

fn run(args: &[&str]) -> Output {
    Command::new(vbm_binary())
        .args(args)
        .env_remove("VBM_LOG")
        .output()
        .expect("failed to run vbm binary")
}

fn stdout_lines(out: &Output) -> Vec<String> {
    String::from_utf8_lossy(&out.stdout).lines().map(str::to_owned).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn stack_heap_quiet() {
    let out = run(&["-f", "-q", "stack-heap"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        stdout_lines(&out),
        [
            "John John Doe",
            "{ name: 'John Wick', age: 40 } { name: 'John Wick', age: 40 }",
        ]
    );
}

#[test]
fn headers_precede_each_lesson() {
    let out = run(&["-f", "stack-heap", "operators"]);
    assert!(out.status.success());
    let lines = stdout_lines(&out);
    assert_eq!(lines[0], "── Stack and heap ──");
    assert!(lines.contains(&"── Operators ──".to_owned()));
    assert_eq!(lines.last().map(String::as_str), Some("true"));
}

#[test]
fn list_lessons() {
    let out = run(&["-f", "-l"]);
    assert!(out.status.success());
    let names: Vec<String> = stdout_lines(&out)
        .iter()
        .filter_map(|l| l.split_whitespace().next().map(str::to_owned))
        .collect();
    assert_eq!(names, ["variables", "data-types", "stack-heap", "operators"]);
}

#[test]
fn unknown_lesson_fails() {
    let out = run(&["-f", "closures"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown lesson 'closures'"));
}

#[test]
fn unknown_flag_prints_usage() {
    let out = run(&["-z"]);
    assert_eq!(out.status.code(), Some(1));
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("unknown option: -z"));
    assert!(err.contains("Usage: vbm"));
}

#[test]
fn rc_file_sets_options() {
    let mut rc = tempfile::NamedTempFile::new().unwrap();
    writeln!(rc, "; test rc\n/set headers=0\n/set depth=0").unwrap();
    let flag = format!("-f{}", rc.path().display());
    let out = run(&[&flag, "variables"]);
    assert!(out.status.success());
    let lines = stdout_lines(&out);
    assert_eq!(lines[0], "30");
    assert!(lines.contains(&"[ 1, 2, 3, 4, 5 ]".to_owned()));
}

#[test]
fn bad_rc_lines_warn_but_run() {
    let mut rc = tempfile::NamedTempFile::new().unwrap();
    writeln!(rc, "/set depth=lots").unwrap();
    let flag = format!("-f{}", rc.path().display());
    let out = run(&[&flag, "-q", "stack-heap"]);
    assert!(out.status.success());
    assert_eq!(stdout_lines(&out).len(), 2);
    assert!(String::from_utf8_lossy(&out.stderr).contains("depth"));
}
