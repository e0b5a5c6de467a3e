// `list`: one row per matching record, in sequence order

use super::table::{Align, Table};
use crate::config::DisplaySection;
use crate::filter::FilterSet;
use crate::session::Session;
use std::io::{self, Write};

const HEADERS: [&str; 7] = ["#", "Method", "Status", "Size (bytes)", "Coverage", "Requester", "URL"];

pub(super) fn render(
    session: &Session,
    filters: &FilterSet,
    display: &DisplaySection,
    out: &mut dyn Write,
) -> io::Result<()> {
    let matching = filters.apply(session.records());

    let mut table = Table::new(&HEADERS)
        .align(0, Align::Right)
        .align(3, Align::Right)
        .max_width(display.max_column_width);
    for record in &matching {
        table.add_row(vec![
            record.seq.to_string(),
            record.method.clone(),
            record.status_code.to_string(),
            record.size.to_string(),
            record.coverage.clone(),
            record.requester.clone(),
            record.url.clone(),
        ]);
    }
    table.render(out)?;

    if !filters.is_empty() {
        writeln!(out, "Showing {} of {} requests", matching.len(), session.len())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LogRecord;

    fn session() -> Session {
        let records = [("GET", 200, 10), ("POST", 500, 2048), ("GET", 200, 0)]
            .iter()
            .enumerate()
            .map(|(i, (method, status, size))| {
                let text = format!(
                    r#"{{"method":"{}","url":"https://api.test/items/{}","status_code":{},"size":{},"requester":"oracle"}}"#,
                    method, i, status, size
                );
                LogRecord::parse(0, &format!("{}.json", i), &text).unwrap()
            })
            .collect();
        Session::from_records("scan.zip", records)
    }

    fn list(filters: &[&str]) -> Vec<String> {
        let mut out = Vec::new();
        render(
            &session(),
            &FilterSet::parse(filters).unwrap(),
            &DisplaySection::default(),
            &mut out,
        )
        .unwrap();
        String::from_utf8(out).unwrap().lines().map(str::to_string).collect()
    }

    fn seq_column(lines: &[String]) -> Vec<String> {
        lines
            .iter()
            .skip(2)
            .filter(|line| line.contains(" | "))
            .map(|line| line.split(" | ").next().unwrap_or("").trim().to_string())
            .collect()
    }

    #[test]
    fn test_all_records_ascending() {
        let lines = list(&[]);
        assert!(lines[0].starts_with("# | Method | Status | Size (bytes)"));
        assert_eq!(seq_column(&lines), vec!["1", "2", "3"]);
        assert!(!lines.iter().any(|line| line.starts_with("Showing")));
    }

    #[test]
    fn test_filtered_by_method() {
        let lines = list(&["method=GET"]);
        assert_eq!(seq_column(&lines), vec!["1", "3"]);
        assert_eq!(lines.last().unwrap(), "Showing 2 of 3 requests");
    }

    #[test]
    fn test_no_matches() {
        let lines = list(&["method=DELETE"]);
        assert_eq!(lines[0], "(no results)");
        assert_eq!(lines[1], "Showing 0 of 3 requests");
    }

    #[test]
    fn test_size_range() {
        let lines = list(&["size=1-100"]);
        assert_eq!(seq_column(&lines), vec!["1"]);
    }
}
