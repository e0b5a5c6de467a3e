// `info`: full detail of individual records

use crate::endpoint::split_url;
use crate::error::ResolutionError;
use crate::filter::FilterSet;
use crate::params::parse_form_pairs;
use crate::record::{bytes_to_kb, Header, LogRecord};
use crate::session::Session;
use std::io::{self, Write};

/// Render every identifier in turn. Identifiers that do not resolve, or
/// whose record is filtered out, get a one-line notice instead.
pub(super) fn render(
    session: &Session,
    identifiers: &[String],
    filters: &FilterSet,
    show_bodies: bool,
    out: &mut dyn Write,
) -> io::Result<()> {
    for identifier in identifiers {
        match session.resolve(identifier) {
            Err(e) => writeln!(out, "{}", e)?,
            Ok(record) if !filters.matches(record) => {
                writeln!(out, "{}", ResolutionError::FilteredOut(record.filename.clone()))?
            }
            Ok(record) => render_record(record, show_bodies, out)?,
        }
    }
    Ok(())
}

fn render_record(record: &LogRecord, show_bodies: bool, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "== {} (record #{}) ==", record.filename, record.seq)?;

    writeln!(out, "Request")?;
    writeln!(out, "  URL:       {}", record.url)?;
    writeln!(out, "  Method:    {}", record.method)?;
    writeln!(out, "  Requester: {}", record.requester)?;
    writeln!(out, "  Endpoint:  {}", record.endpoint)?;
    if !record.operation.is_empty() {
        writeln!(out, "  Operation: {}", record.operation)?;
    }
    writeln!(out, "  Coverage:  {}", record.coverage)?;
    writeln!(out, "  In schema: {}", record.in_schema)?;
    if let Some(user) = &record.user {
        writeln!(out, "  User:      {}", user)?;
    }

    if let Some(query) = split_url(&record.url).query {
        let pairs = parse_form_pairs(query);
        if !pairs.is_empty() {
            writeln!(out, "  URL Parameters:")?;
            for (name, value) in pairs {
                writeln!(out, "    {}: {}", name, value)?;
            }
        }
    }
    write_headers("Request Headers", &record.request_headers, out)?;

    if show_bodies {
        if let Some(body) = &record.request_body {
            write_body("Request Body", body, out)?;
        }
    }

    writeln!(out, "Response")?;
    writeln!(
        out,
        "  Status Code: {} ({})",
        record.status_code,
        record.status_reason()
    )?;
    if let Some(inferred) = record.inferred_status_code {
        writeln!(out, "  Inferred Status Code: {}", inferred)?;
    }
    if let Some(duration) = record.duration {
        writeln!(out, "  Duration: {:.3} s", duration)?;
    }
    writeln!(out, "  Content Type: {}", record.content_type)?;
    writeln!(out, "  Size: {} ({} bytes)", bytes_to_kb(record.size), record.size)?;
    write_headers("Response Headers", &record.response_headers, out)?;

    if !record.inferred_scalars.is_empty() {
        writeln!(out, "  Inferred Scalars:")?;
        for scalar in &record.inferred_scalars {
            writeln!(
                out,
                "    {} ({}, confidence {:.2})",
                scalar.name, scalar.kind, scalar.confidence
            )?;
        }
    }

    if show_bodies {
        if let Some(body) = &record.response_body {
            write_body("Response Body", body, out)?;
        }
    }

    writeln!(out)
}

fn write_headers(title: &str, headers: &[Header], out: &mut dyn Write) -> io::Result<()> {
    if headers.iter().all(|h| h.values.is_empty()) {
        return Ok(());
    }
    writeln!(out, "  {}:", title)?;
    for header in headers {
        if let Some(value) = header.values.first() {
            writeln!(out, "    {}: {}", header.name, value)?;
        }
    }
    Ok(())
}

/// JSON bodies are pretty printed; anything else is shown verbatim.
fn write_body(title: &str, body: &str, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}:", title)?;
    let pretty = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok());
    for line in pretty.as_deref().unwrap_or(body).lines() {
        writeln!(out, "  {}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let detailed = r#"{
            "method": "post",
            "url": "https://api.test/login?next=%2Fhome&lang=en",
            "statusCode": 201,
            "requester": "oracle",
            "duration": 0.25,
            "requestHeaders": [{"name": "Accept", "values": ["application/json"]}],
            "responseHeaders": [{"name": "Content-Type", "values": ["application/json; charset=utf-8"]}],
            "requestBody": "{\"user\":\"alice\"}",
            "responseBody": "{\"token\":\"abc\"}"
        }"#;
        Session::from_records(
            "scan.zip",
            vec![
                LogRecord::parse(0, "exchanges/login.json", detailed).unwrap(),
                LogRecord::parse(
                    0,
                    "exchanges/ping.json",
                    r#"{"method":"GET","url":"/ping","status_code":200}"#,
                )
                .unwrap(),
                LogRecord::parse(
                    0,
                    "exchanges/health.json",
                    r#"{"method":"GET","url":"/health","status_code":503}"#,
                )
                .unwrap(),
            ],
        )
    }

    fn info(identifiers: &[&str], filters: &[&str], show_bodies: bool) -> String {
        let identifiers: Vec<String> = identifiers.iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        render(
            &session(),
            &identifiers,
            &FilterSet::parse(filters).unwrap(),
            show_bodies,
            &mut out,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_unknown_number_only_reports_not_found() {
        assert_eq!(info(&["99"], &[], true), "Record '99' not found\n");
    }

    #[test]
    fn test_full_record() {
        let output = info(&["1"], &[], true);
        assert!(output.starts_with("== exchanges/login.json (record #1) =="));
        assert!(output.contains("  Method:    POST"));
        assert!(output.contains("    next: /home"));
        assert!(output.contains("    Accept: application/json"));
        assert!(output.contains("  Status Code: 201 (Created)"));
        assert!(output.contains("  Duration: 0.250 s"));
        assert!(output.contains("  Content Type: application/json"));
        assert!(output.contains("Request Body:\n  {\n    \"user\": \"alice\"\n  }"));
        assert!(output.contains("Response Body:"));
    }

    #[test]
    fn test_no_body_hides_bodies() {
        let output = info(&["login"], &[], false);
        assert!(output.contains("== exchanges/login.json"));
        assert!(!output.contains("Request Body:"));
        assert!(!output.contains("Response Body:"));
    }

    #[test]
    fn test_filters_apply_per_item() {
        let output = info(&["1", "2", "3"], &["method=GET"], true);
        assert!(output.starts_with("Record 'exchanges/login.json' does not match the specified filters\n"));
        assert!(output.contains("== exchanges/ping.json (record #2) =="));
        assert!(output.contains("== exchanges/health.json (record #3) =="));
        assert!(output.contains("  Status Code: 503 (Service Unavailable)"));
    }

    #[test]
    fn test_ambiguous_substring_lists_candidates() {
        let output = info(&["exchanges"], &[], true);
        assert!(output.contains("exchanges/login.json"));
        assert!(!output.contains("== "));
    }
}
