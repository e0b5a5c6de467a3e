// URL helpers: path/query splitting and endpoint derivation

use regex::Regex;
use std::sync::LazyLock;

/// Placeholder used for path segments that look like identifiers.
pub const ID_PLACEHOLDER: &str = "{id}";

// Compile regexes once at startup for performance
static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("Failed to compile UUID regex")
});

static NUMERIC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("Failed to compile numeric regex"));

// Object ids, hashes and similar opaque tokens
static HEX_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{16,}$").expect("Failed to compile hex token regex")
});

/// The pieces of a captured request URL that the shell cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlParts<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
}

/// Split a URL into its path and query, dropping scheme, authority and
/// fragment. Relative URLs (`/users?id=1`) are accepted as-is.
pub fn split_url(url: &str) -> UrlParts<'_> {
    let without_fragment = url.split_once('#').map_or(url, |(head, _)| head);

    let after_authority = match without_fragment.find("://") {
        Some(scheme_end) => {
            let rest = &without_fragment[scheme_end + 3..];
            match rest.find(|c: char| c == '/' || c == '?') {
                Some(path_start) => &rest[path_start..],
                None => "",
            }
        }
        None => without_fragment,
    };

    let (path, query) = match after_authority.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (after_authority, None),
    };

    UrlParts {
        path: if path.is_empty() { "/" } else { path },
        query,
    }
}

/// Whether a single path segment is an identifier rather than part of the
/// route.
pub fn is_id_segment(segment: &str) -> bool {
    NUMERIC_REGEX.is_match(segment)
        || UUID_REGEX.is_match(segment)
        || HEX_TOKEN_REGEX.is_match(segment)
}

/// Collapse identifier segments so that `/users/42` and `/users/7` land in
/// the same endpoint.
pub fn normalize_path(path: &str) -> String {
    let normalized: Vec<&str> = path
        .split('/')
        .map(|segment| {
            if is_id_segment(segment) {
                ID_PLACEHOLDER
            } else {
                segment
            }
        })
        .collect();

    let joined = normalized.join("/");
    // Trailing slashes do not make a different route
    if joined.len() > 1 {
        joined.trim_end_matches('/').to_string()
    } else {
        joined
    }
}

/// Endpoint for a record whose capture did not name one.
pub fn endpoint_for_url(url: &str) -> String {
    normalize_path(split_url(url).path)
}
