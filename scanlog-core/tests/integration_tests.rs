// Core integration tests
// Archives are written to a temp dir, loaded, and driven through the shell

use scanlog_core::*;
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn write_zip(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    let mut writer = ZipWriter::new(file);
    for (entry, content) in entries {
        writer.start_file(*entry, SimpleFileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    path
}

fn exchange(method: &str, path: &str, status: u16, size: u64) -> String {
    format!(
        r#"{{"method":"{}","url":"https://api.example.com{}","status_code":{},"size":{},"requester":"oracle","coverage":"covered"}}"#,
        method, path, status, size
    )
}

/// The three-record archive: GET 200, POST 500, GET 200.
fn scenario_archive() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let first = exchange("GET", "/users/1", 200, 120);
    let second = exchange("POST", "/users", 500, 40);
    let third = exchange("GET", "/users/2", 200, 900);
    let path = write_zip(
        dir.path(),
        "scan.zip",
        &[
            ("exchanges/0001.json", &first),
            ("exchanges/0002.json", &second),
            ("exchanges/0003.json", &third),
        ],
    );
    (dir, path)
}

fn run(shell: &mut Shell, line: &str) -> String {
    let mut out = Vec::new();
    shell.execute(line, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn scenario_shell() -> (TempDir, Shell) {
    let (dir, path) = scenario_archive();
    let session = Session::load(&path, &LoaderSection::default()).unwrap();
    (dir, Shell::new(session, Config::default()))
}

fn first_column(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(2)
        .filter(|line| line.contains(" | "))
        .map(|line| line.split(" | ").next().unwrap_or("").trim().to_string())
        .collect()
}

#[test]
fn test_load_assigns_sequence_in_archive_order() {
    let (_dir, path) = scenario_archive();
    let session = Session::load(&path, &LoaderSection::default()).unwrap();
    let names: Vec<(usize, &str)> = session
        .records()
        .iter()
        .map(|r| (r.seq, r.filename.as_str()))
        .collect();
    assert_eq!(
        names,
        vec![
            (1, "exchanges/0001.json"),
            (2, "exchanges/0002.json"),
            (3, "exchanges/0003.json"),
        ]
    );
}

#[test]
fn test_list_renders_every_record_ascending() {
    let (_dir, mut shell) = scenario_shell();
    let output = run(&mut shell, "list");
    assert_eq!(first_column(&output), vec!["1", "2", "3"]);
}

#[test]
fn test_list_method_filter() {
    let (_dir, mut shell) = scenario_shell();
    let output = run(&mut shell, "list method=GET");
    assert_eq!(first_column(&output), vec!["1", "3"]);
    assert!(output.contains("Showing 2 of 3 requests"));
}

#[test]
fn test_count_negated_status() {
    let (_dir, mut shell) = scenario_shell();
    let output = run(&mut shell, "count status_code=!200");
    assert!(output.contains("Matching records: 1"));
}

#[test]
fn test_count_matches_filter_definition() {
    let (_dir, mut shell) = scenario_shell();
    let records = shell.session().records().to_vec();
    for tokens in [
        vec!["size=100-1000"],
        vec!["size=!100-1000"],
        vec!["method=GET", "status_code=200"],
        vec!["url=/users/"],
        vec!["endpoint=/users/{id}"],
    ] {
        let filters = FilterSet::parse(&tokens).unwrap();
        let expected = records.iter().filter(|r| filters.matches(r)).count();
        let output = run(&mut shell, &format!("count {}", tokens.join(" ")));
        assert!(
            output.contains(&format!("Matching records: {}", expected)),
            "count {:?} gave {}",
            tokens,
            output
        );
    }
}

#[test]
fn test_summary_counts_sum_to_total() {
    let (_dir, mut shell) = scenario_shell();
    let output = run(&mut shell, "summary");
    let total: usize = output
        .lines()
        .skip(2)
        .filter(|line| line.contains(" | "))
        .filter_map(|line| line.rsplit(" | ").next())
        .map(|count| count.trim().parse::<usize>().unwrap())
        .sum();
    assert_eq!(total, 3);
}

#[test]
fn test_info_unknown_number() {
    let (_dir, mut shell) = scenario_shell();
    assert_eq!(run(&mut shell, "info 99"), "Record '99' not found\n");
}

#[test]
fn test_zero_valid_records_is_load_error() {
    let dir = TempDir::new().unwrap();
    let path = write_zip(
        dir.path(),
        "broken.zip",
        &[("a.json", "{not json"), ("b.json", r#"{"url":"/x"}"#), ("notes.txt", "hi")],
    );
    match Session::load(&path, &LoaderSection::default()) {
        Err(LoadError::NoValidRecords { failed, .. }) => assert_eq!(failed, 2),
        other => panic!("expected NoValidRecords, got {:?}", other.map(|s| s.len())),
    }
}

#[test]
fn test_bad_entries_are_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    let good = exchange("GET", "/health", 200, 2);
    let path = write_zip(
        dir.path(),
        "mixed.zip",
        &[("bad.json", "[]"), ("good.json", &good)],
    );
    let session = Session::load(&path, &LoaderSection::default()).unwrap();
    assert_eq!(session.len(), 1);
    assert_eq!(session.records()[0].seq, 1);

    let mut shell = Shell::new(session, Config::default());
    let output = run(&mut shell, "errors");
    assert!(output.contains("bad.json"));
}

#[test]
fn test_load_command_replaces_session() {
    let (dir, mut shell) = scenario_shell();
    let other = exchange("DELETE", "/sessions/9", 204, 0);
    let path = write_zip(dir.path(), "other.zip", &[("only.json", &other)]);

    let output = run(&mut shell, &format!("load {}", path.display()));
    assert!(output.starts_with("Loaded 1 records from"));
    assert_eq!(shell.session().len(), 1);
    assert_eq!(shell.session().archive_path(), path.as_path());
}

#[test]
fn test_script_session() {
    let (_dir, mut shell) = scenario_shell();
    let script = "list method=POST\nparams 1\nbogus\nquit\nlist\n";
    let mut source = ScriptSource::new(Cursor::new(script));
    let mut out = Vec::new();
    shell.run(&mut source, &mut out).unwrap();
    let output = String::from_utf8(out).unwrap();

    assert!(output.contains("Showing 1 of 3 requests"));
    assert!(output.contains("Request parameters - record #1"));
    assert!(output.contains("Command not recognized: bogus"));
    assert!(output.ends_with("Goodbye!\n"));
    assert_eq!(shell.state(), ShellState::Terminated);
}
