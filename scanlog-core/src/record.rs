// Record model: one captured HTTP exchange per archive entry

use crate::endpoint::endpoint_for_url;
use crate::error::EntryParseError;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Header {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InferredScalar {
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub confidence: f64,
}

/// Wire shape of a single archive entry.
///
/// Accepts both the flat snake_case layout and the camelCase capture layout
/// written by the scanner. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawExchange {
    pub method: String,
    pub url: String,
    #[serde(alias = "statusCode", alias = "responseStatusCode")]
    pub status_code: u16,
    #[serde(default, alias = "contentType")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub requester: Option<String>,
    #[serde(default, alias = "operationName")]
    pub operation: Option<String>,
    #[serde(default, alias = "name")]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub coverage: Option<String>,
    #[serde(default, alias = "inSchema")]
    pub in_schema: Option<bool>,
    #[serde(default, alias = "requestBody")]
    pub request_body: Option<String>,
    #[serde(default, alias = "responseBody")]
    pub response_body: Option<String>,
    #[serde(default, alias = "requestHeaders")]
    pub request_headers: Vec<Header>,
    #[serde(default, alias = "responseHeaders")]
    pub response_headers: Vec<Header>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default, alias = "scanId")]
    pub scan_id: Option<String>,
    #[serde(default, alias = "exchangeId")]
    pub exchange_id: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default, alias = "inferredStatusCode")]
    pub inferred_status_code: Option<u16>,
    #[serde(default, alias = "inferredScalars")]
    pub inferred_scalars: Option<Vec<InferredScalar>>,
}

/// One HTTP transaction loaded from the archive. Never mutated after load.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// 1-based position among the parsed records, in archive order.
    pub seq: usize,
    pub filename: String,
    pub method: String,
    pub url: String,
    pub status_code: u16,
    pub content_type: String,
    /// Response size in bytes.
    pub size: u64,
    pub requester: String,
    pub operation: String,
    pub endpoint: String,
    pub coverage: String,
    pub in_schema: bool,
    pub request_body: Option<String>,
    pub response_body: Option<String>,
    pub request_headers: Vec<Header>,
    pub response_headers: Vec<Header>,
    pub duration: Option<f64>,
    pub scan_id: Option<String>,
    pub exchange_id: Option<String>,
    pub user: Option<String>,
    pub inferred_status_code: Option<u16>,
    pub inferred_scalars: Vec<InferredScalar>,
}

impl LogRecord {
    /// Parse the text of one archive entry.
    pub fn parse(seq: usize, filename: &str, text: &str) -> Result<Self, EntryParseError> {
        let raw: RawExchange =
            serde_json::from_str(text).map_err(|e| EntryParseError::Json(e.to_string()))?;
        Self::from_raw(seq, filename, raw)
    }

    pub fn from_raw(seq: usize, filename: &str, raw: RawExchange) -> Result<Self, EntryParseError> {
        let method = normalize_method(&raw.method)?;

        if raw.url.trim().is_empty() {
            return Err(EntryParseError::InvalidField {
                field: "url",
                reason: "must not be empty".to_string(),
            });
        }

        let request_body = raw.request_body.filter(|body| !body.is_empty());
        let response_body = raw.response_body.filter(|body| !body.is_empty());

        let content_type = raw
            .content_type
            .or_else(|| header_value(&raw.response_headers, "content-type").map(str::to_string))
            .map(|ct| clean_content_type(&ct))
            .unwrap_or_else(|| "unknown".to_string());

        let size = raw
            .size
            .unwrap_or_else(|| response_body.as_ref().map_or(0, |body| body.len() as u64));

        let operation = raw
            .operation
            .or_else(|| request_body.as_deref().and_then(graphql_operation_name))
            .unwrap_or_default();

        let endpoint = raw
            .endpoint
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| endpoint_for_url(&raw.url));

        Ok(Self {
            seq,
            filename: filename.to_string(),
            method,
            url: raw.url,
            status_code: raw.status_code,
            content_type,
            size,
            requester: raw.requester.unwrap_or_default(),
            operation,
            endpoint,
            coverage: raw.coverage.unwrap_or_default(),
            in_schema: raw.in_schema.unwrap_or(false),
            request_body,
            response_body,
            request_headers: raw.request_headers,
            response_headers: raw.response_headers,
            duration: raw.duration,
            scan_id: raw.scan_id,
            exchange_id: raw.exchange_id,
            user: raw.user,
            inferred_status_code: raw.inferred_status_code,
            inferred_scalars: raw.inferred_scalars.unwrap_or_default(),
        })
    }

    /// Human readable reason phrase for the status code.
    pub fn status_reason(&self) -> &'static str {
        http::StatusCode::from_u16(self.status_code)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Unknown")
    }

    pub fn size_kb(&self) -> String {
        bytes_to_kb(self.size)
    }
}

fn normalize_method(method: &str) -> Result<String, EntryParseError> {
    let upper = method.trim().to_uppercase();
    if upper.is_empty() {
        return Err(EntryParseError::InvalidField {
            field: "method",
            reason: "must not be empty".to_string(),
        });
    }
    http::Method::from_bytes(upper.as_bytes())
        .map(|m| m.as_str().to_string())
        .map_err(|e| EntryParseError::InvalidField {
            field: "method",
            reason: e.to_string(),
        })
}

/// First value of a header, matched case-insensitively.
pub fn header_value<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .and_then(|h| h.values.first())
        .map(String::as_str)
}

/// `application/json; charset=utf-8` and friends all count as
/// `application/json`. Other types are kept verbatim.
pub fn clean_content_type(content_type: &str) -> String {
    let trimmed = content_type.trim();
    if trimmed.starts_with("application/json") {
        "application/json".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn bytes_to_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

fn graphql_operation_name(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("operationName")
        .and_then(|name| name.as_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
