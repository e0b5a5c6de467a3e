// `summary`: matching records grouped by endpoint

use super::table::{Align, Table};
use crate::config::DisplaySection;
use crate::endpoint::split_url;
use crate::filter::FilterSet;
use crate::record::LogRecord;
use crate::session::Session;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

/// Grouping key. `method` and `status` are only set in full mode.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct GroupKey {
    endpoint: String,
    method: Option<String>,
    status: Option<u16>,
}

impl GroupKey {
    fn of(record: &LogRecord, full: bool) -> Self {
        Self {
            endpoint: record.endpoint.clone(),
            method: full.then(|| record.method.clone()),
            status: full.then_some(record.status_code),
        }
    }
}

#[derive(Debug, Default)]
struct Group {
    paths: BTreeSet<String>,
    methods: BTreeSet<String>,
    status_codes: BTreeSet<u16>,
    inferred_status_codes: BTreeSet<u16>,
    count: usize,
}

impl Group {
    fn add(&mut self, record: &LogRecord) {
        self.paths.insert(split_url(&record.url).path.to_string());
        self.methods.insert(record.method.clone());
        self.status_codes.insert(record.status_code);
        if let Some(code) = record.inferred_status_code {
            self.inferred_status_codes.insert(code);
        }
        self.count += 1;
    }
}

fn group<'r>(records: impl IntoIterator<Item = &'r LogRecord>, full: bool) -> BTreeMap<GroupKey, Group> {
    let mut groups: BTreeMap<GroupKey, Group> = BTreeMap::new();
    for record in records {
        groups.entry(GroupKey::of(record, full)).or_default().add(record);
    }
    groups
}

/// Spreadsheet style label: 0 -> A, 25 -> Z, 26 -> AA, 27 -> AB.
pub(super) fn group_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    loop {
        letters.push(char::from(b'A' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn join<T: ToString>(values: &BTreeSet<T>) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

fn shorten_paths(paths: String, display: &DisplaySection) -> String {
    if paths.chars().count() <= display.max_endpoint_width {
        return paths;
    }
    let mut cut: String = paths.chars().take(display.truncated_endpoint_width).collect();
    cut.push_str("...");
    cut
}

pub(super) fn render(
    session: &Session,
    full: bool,
    filters: &FilterSet,
    display: &DisplaySection,
    out: &mut dyn Write,
) -> io::Result<()> {
    // Labels come from the unfiltered grouping so they stay put across filters
    let all_groups = group(session.records(), full);
    let labels: BTreeMap<&GroupKey, String> = all_groups
        .keys()
        .enumerate()
        .map(|(index, key)| (key, group_label(index)))
        .collect();

    let groups = group(filters.apply(session.records()), full);

    let mut table = Table::new(&[
        "ID",
        "Endpoint",
        "Paths",
        "Methods",
        "Status Codes",
        "Inferred Status",
        "Requests",
    ])
    .align(6, Align::Right);
    if !full {
        table = table.max_width(display.max_column_width);
    }

    for (key, stats) in &groups {
        let paths = join(&stats.paths);
        table.add_row(vec![
            labels.get(key).cloned().unwrap_or_default(),
            key.endpoint.clone(),
            if full { paths } else { shorten_paths(paths, display) },
            join(&stats.methods),
            join(&stats.status_codes),
            join(&stats.inferred_status_codes),
            stats.count.to_string(),
        ]);
    }
    table.render(out)?;

    if !full {
        writeln!(out, "Tip: Use 'summary full' to split groups by method and status")?;
    }
    if !filters.is_empty() {
        writeln!(
            out,
            "Showing summary for {} of {} groups",
            groups.len(),
            all_groups.len()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(method: &str, url: &str, status: u16) -> LogRecord {
        let text = format!(
            r#"{{"method":"{}","url":"{}","status_code":{}}}"#,
            method, url, status
        );
        LogRecord::parse(0, "x.json", &text).unwrap()
    }

    fn session() -> Session {
        Session::from_records(
            "scan.zip",
            vec![
                record("GET", "https://api.test/users/1", 200),
                record("POST", "https://api.test/login", 500),
                record("GET", "https://api.test/users/2", 200),
            ],
        )
    }

    fn summary(full: bool, filters: &[&str]) -> Vec<String> {
        let mut out = Vec::new();
        render(
            &session(),
            full,
            &FilterSet::parse(filters).unwrap(),
            &DisplaySection::default(),
            &mut out,
        )
        .unwrap();
        String::from_utf8(out).unwrap().lines().map(str::to_string).collect()
    }

    fn rows(lines: &[String]) -> Vec<Vec<String>> {
        lines
            .iter()
            .skip(2)
            .filter(|line| line.contains(" | "))
            .map(|line| line.split(" | ").map(|cell| cell.trim().to_string()).collect())
            .collect()
    }

    #[test]
    fn test_group_labels() {
        assert_eq!(group_label(0), "A");
        assert_eq!(group_label(25), "Z");
        assert_eq!(group_label(26), "AA");
        assert_eq!(group_label(27), "AB");
        assert_eq!(group_label(701), "ZZ");
        assert_eq!(group_label(702), "AAA");
    }

    #[test]
    fn test_counts_sum_to_total() {
        let rows = rows(&summary(false, &[]));
        assert_eq!(rows.len(), 2);
        let total: usize = rows.iter().map(|row| row[6].parse::<usize>().unwrap()).sum();
        assert_eq!(total, 3);

        assert_eq!(rows[0][0], "A");
        assert_eq!(rows[0][1], "/login");
        assert_eq!(rows[1][0], "B");
        assert_eq!(rows[1][1], "/users/{id}");
        assert_eq!(rows[1][2], "/users/1, /users/2");
    }

    #[test]
    fn test_labels_are_stable_under_filters() {
        let lines = summary(false, &["method=GET"]);
        let rows = rows(&lines);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "B");
        assert_eq!(lines.last().unwrap(), "Showing summary for 1 of 2 groups");
    }

    #[test]
    fn test_full_splits_by_method_and_status() {
        let session = Session::from_records(
            "scan.zip",
            vec![
                record("GET", "https://api.test/users/1", 200),
                record("GET", "https://api.test/users/2", 404),
                record("DELETE", "https://api.test/users/3", 204),
            ],
        );
        let mut out = Vec::new();
        render(&session, true, &FilterSet::default(), &DisplaySection::default(), &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        let lines: Vec<String> = output.lines().map(str::to_string).collect();
        assert_eq!(rows(&lines).len(), 3);
        assert!(!output.contains("Tip:"));
    }

    #[test]
    fn test_long_path_lists_are_shortened() {
        let display = DisplaySection {
            max_endpoint_width: 12,
            truncated_endpoint_width: 9,
            ..DisplaySection::default()
        };
        assert_eq!(shorten_paths("/a, /b".to_string(), &display), "/a, /b");
        assert_eq!(
            shorten_paths("/users/1, /users/2".to_string(), &display),
            "/users/1,..."
        );
    }
}
