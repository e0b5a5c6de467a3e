// Request parameter extraction for the `params` view

use crate::endpoint::{is_id_segment, split_url};
use crate::record::{header_value, LogRecord};
use percent_encoding::percent_decode_str;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Body,
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamLocation::Path => write!(f, "path"),
            ParamLocation::Query => write!(f, "query"),
            ParamLocation::Header => write!(f, "header"),
            ParamLocation::Body => write!(f, "body"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParameter {
    pub location: ParamLocation,
    pub name: String,
    pub value: String,
}

impl RequestParameter {
    fn new(location: ParamLocation, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            location,
            name: name.into(),
            value: value.into(),
        }
    }
}

/// All parameters the request carried, grouped path, query, header, body.
pub fn extract_parameters(record: &LogRecord) -> Vec<RequestParameter> {
    let parts = split_url(&record.url);

    let mut params = path_parameters(parts.path);
    if let Some(query) = parts.query {
        params.extend(
            parse_form_pairs(query)
                .into_iter()
                .map(|(name, value)| RequestParameter::new(ParamLocation::Query, name, value)),
        );
    }

    for header in &record.request_headers {
        params.push(RequestParameter::new(
            ParamLocation::Header,
            header.name.clone(),
            header.values.join(", "),
        ));
    }

    if let Some(body) = record.request_body.as_deref() {
        params.extend(body_parameters(record, body));
    }

    params
}

/// Identifier segments, named after the segment in front of them
/// (`/users/42` gives `users = 42`).
fn path_parameters(path: &str) -> Vec<RequestParameter> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    segments
        .iter()
        .enumerate()
        .filter(|(_, segment)| is_id_segment(segment))
        .map(|(index, segment)| {
            let name = index
                .checked_sub(1)
                .map(|prev| segments[prev])
                .filter(|prev| !is_id_segment(prev))
                .map(str::to_string)
                .unwrap_or_else(|| format!("segment{}", index + 1));
            RequestParameter::new(ParamLocation::Path, name, decode_component(segment))
        })
        .collect()
}

fn body_parameters(record: &LogRecord, body: &str) -> Vec<RequestParameter> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let mut flat = Vec::new();
        flatten_json("", &value, &mut flat);
        return flat
            .into_iter()
            .map(|(name, value)| RequestParameter::new(ParamLocation::Body, name, value))
            .collect();
    }

    let is_form = header_value(&record.request_headers, "content-type")
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);
    if is_form {
        return parse_form_pairs(body)
            .into_iter()
            .map(|(name, value)| RequestParameter::new(ParamLocation::Body, name, value))
            .collect();
    }

    vec![RequestParameter::new(
        ParamLocation::Body,
        "(raw)",
        format!("{} bytes", body.len()),
    )]
}

/// `a=1&b=two%20words` style pairs. A key without `=` gets an empty value.
pub fn parse_form_pairs(input: &str) -> Vec<(String, String)> {
    input
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Dotted paths for objects, `[i]` for arrays, scalars rendered as JSON
/// except strings which are shown bare.
fn flatten_json(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_json(&path, child, out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                flatten_json(&format!("{}[{}]", prefix, index), child, out);
            }
        }
        Value::String(s) => out.push((prefix_or_root(prefix), s.clone())),
        other => out.push((prefix_or_root(prefix), other.to_string())),
    }
}

fn prefix_or_root(prefix: &str) -> String {
    if prefix.is_empty() {
        "(root)".to_string()
    } else {
        prefix.to_string()
    }
}
