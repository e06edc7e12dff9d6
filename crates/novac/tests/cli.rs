//! End-to-end tests for the `novac` binary: exit codes, checker output,
//! scaffolding, and formatting.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn novac(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_novac"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run novac")
}

fn write_source(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn check_clean_file_exits_zero() {
    let tmp = TempDir::new().unwrap();
    let file = write_source(
        &tmp,
        "ok.nova",
        "module demo.core\nfun identity(x: Number): Number = x\nfun pipeline(): Number = 1 |> identity\n",
    );
    let output = novac(&["check", "--skip-codegen", &file], tmp.path());
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nova-check: ok (0 warnings)"), "{stdout}");
}

#[test]
fn check_semantic_error_exits_one() {
    let tmp = TempDir::new().unwrap();
    let file = write_source(&tmp, "bad.nova", "module m\nlet x = missing\n");
    let output = novac(&["check", "--skip-codegen", &file], tmp.path());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("undefined identifier"), "{stderr}");
}

#[test]
fn check_parse_error_exits_one() {
    let tmp = TempDir::new().unwrap();
    let file = write_source(&tmp, "broken.nova", "module m\nfun broken( = 1\n");
    let output = novac(&["check", "--skip-codegen", &file], tmp.path());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn warnings_pass_unless_strict() {
    let tmp = TempDir::new().unwrap();
    let file = write_source(
        &tmp,
        "warn.nova",
        "module m\ntype Flag = Yes | No\nfun f(v: Flag): Number = match v { Yes -> 1 }\n",
    );

    let output = novac(&["check", "--skip-codegen", &file], tmp.path());
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nova-check: ok (1 warnings)"), "{stdout}");

    let strict = novac(&["check", "--strict", "--skip-codegen", &file], tmp.path());
    assert_eq!(strict.status.code(), Some(1));
}

#[test]
fn missing_file_argument_is_a_usage_error() {
    let tmp = TempDir::new().unwrap();
    let output = novac(&["check"], tmp.path());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let tmp = TempDir::new().unwrap();
    let output = novac(&["check", "--frobnicate", "x.nova"], tmp.path());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unreadable_file_exits_one() {
    let tmp = TempDir::new().unwrap();
    let output = novac(&["check", "--skip-codegen", "does-not-exist.nova"], tmp.path());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn new_scaffolds_a_checkable_project() {
    let tmp = TempDir::new().unwrap();
    let project = tmp.path().join("demo");
    let output = novac(&["new", project.to_str().unwrap()], tmp.path());
    assert!(output.status.success(), "{output:?}");
    assert!(project.join("nova.toml").exists());

    let main_nova = project.join("src/main.nova");
    assert!(main_nova.exists());

    // The generated program must check cleanly.
    let check = novac(
        &["check", "--skip-codegen", main_nova.to_str().unwrap()],
        tmp.path(),
    );
    assert!(check.status.success(), "{check:?}");
    let stdout = String::from_utf8_lossy(&check.stdout);
    assert!(stdout.contains("nova-check: ok (0 warnings)"), "{stdout}");
}

#[test]
fn fmt_formats_to_stdout() {
    let tmp = TempDir::new().unwrap();
    let file = write_source(&tmp, "f.nova", "module m\nfun f(): Number = { 1; 2 }\n");
    let output = novac(&["fmt", &file], tmp.path());
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "module m fun f ( ) : Number =\n{\n    1;\n    2\n}\n");
}

#[test]
fn fmt_rejects_broken_source() {
    let tmp = TempDir::new().unwrap();
    let file = write_source(&tmp, "bad.nova", "module m\nfun broken( = 1\n");
    let output = novac(&["fmt", &file], tmp.path());
    assert_eq!(output.status.code(), Some(1));
}
