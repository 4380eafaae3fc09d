//! End-to-end tests of the md2jira binary.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;

fn md2jira() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_md2jira"));
    command.env_remove("RUST_LOG");
    command
}

fn markdown_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_converts_file_to_stdout() {
    let file = markdown_file("# Hi\n\nSome *text* with [a link](https://example.com).\n");
    let output = md2jira().arg(file.path()).output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "h1. Hi\n\nSome _text_ with [a link|https://example.com].\n"
    );
}

#[test]
fn test_reads_standard_input() {
    let mut child = md2jira()
        .arg("-")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"- one\n- two\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "* one\n* two");
}

#[test]
fn test_missing_argument_fails() {
    let output = md2jira().output().unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_unreadable_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.md");
    let output = md2jira().arg(&missing).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(
        stderr(&output).contains("ERROR - cannot read file"),
        "stderr: {}",
        stderr(&output)
    );
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let mut file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
    file.write_all(b"caf\xe9 *ok*\n").unwrap();
    let output = md2jira().arg(file.path()).output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "caf\u{FFFD} _ok_\n");
}

#[test]
fn test_unsupported_construct_fails() {
    let file = markdown_file("| a |\n|---|\n| b |\n");
    let output = md2jira().arg("--gfm").arg(file.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains(
            "ERROR - cannot convert document : no render function for node kind 'Table(100)'"
        ),
        "stderr: {}",
        stderr(&output)
    );
}

#[test]
fn test_tables_are_paragraphs_without_gfm() {
    let file = markdown_file("| a |\n|---|\n| b |\n");
    let output = md2jira().arg(file.path()).output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "| a | |---| | b |\n");
}
