// `params`: request parameters of individual records

use super::table::Table;
use crate::config::DisplaySection;
use crate::error::ResolutionError;
use crate::filter::FilterSet;
use crate::params::extract_parameters;
use crate::session::Session;
use std::io::{self, Write};

pub(super) fn render(
    session: &Session,
    identifiers: &[String],
    filters: &FilterSet,
    display: &DisplaySection,
    out: &mut dyn Write,
) -> io::Result<()> {
    for identifier in identifiers {
        let record = match session.resolve(identifier) {
            Ok(record) if filters.matches(record) => record,
            Ok(record) => {
                writeln!(out, "{}", ResolutionError::FilteredOut(record.filename.clone()))?;
                continue;
            }
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        writeln!(
            out,
            "Request parameters - record #{} ({})",
            record.seq, record.filename
        )?;
        let mut table =
            Table::new(&["Location", "Parameter", "Value"]).max_width(display.max_column_width);
        for param in extract_parameters(record) {
            table.add_row(vec![param.location.to_string(), param.name, param.value]);
        }
        table.render(out)?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LogRecord;

    fn session() -> Session {
        Session::from_records(
            "scan.zip",
            vec![
                LogRecord::parse(
                    0,
                    "users.json",
                    r#"{"method":"PUT","url":"https://api.test/users/42?notify=true","status_code":200,
                        "request_body":"{\"name\":\"bob\",\"tags\":[\"a\"]}"}"#,
                )
                .unwrap(),
                LogRecord::parse(
                    0,
                    "ping.json",
                    r#"{"method":"GET","url":"/ping","status_code":200}"#,
                )
                .unwrap(),
            ],
        )
    }

    fn params(identifiers: &[&str], filters: &[&str]) -> String {
        let identifiers: Vec<String> = identifiers.iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        render(
            &session(),
            &identifiers,
            &FilterSet::parse(filters).unwrap(),
            &DisplaySection::default(),
            &mut out,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parameters_table() {
        let output = params(&["1"], &[]);
        assert!(output.starts_with("Request parameters - record #1 (users.json)"));
        assert!(output.contains("path     | users"));
        assert!(output.contains("query    | notify"));
        assert!(output.contains("body     | name"));
        assert!(output.contains("tags[0]"));
    }

    #[test]
    fn test_record_without_parameters() {
        let output = params(&["ping.json"], &[]);
        assert!(output.contains("(no results)"));
    }

    #[test]
    fn test_filtered_out_and_missing() {
        let output = params(&["1", "7"], &["method=GET"]);
        assert!(output.contains("Record 'users.json' does not match the specified filters"));
        assert!(output.contains("Record '7' not found"));
    }
}
