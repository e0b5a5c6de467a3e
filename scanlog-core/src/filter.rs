// Filter engine: `key=value`, `key=!value` and `size=low-high` clauses

use crate::error::FilterError;
use crate::record::LogRecord;
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

/// Keys accepted on the left side of a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Method,
    StatusCode,
    ContentType,
    Requester,
    Size,
    Url,
    Operation,
    Coverage,
    Endpoint,
    InSchema,
}

impl FilterKey {
    pub const ALL: [FilterKey; 10] = [
        FilterKey::Method,
        FilterKey::StatusCode,
        FilterKey::ContentType,
        FilterKey::Requester,
        FilterKey::Size,
        FilterKey::Url,
        FilterKey::Operation,
        FilterKey::Coverage,
        FilterKey::Endpoint,
        FilterKey::InSchema,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Method => "method",
            FilterKey::StatusCode => "status_code",
            FilterKey::ContentType => "content_type",
            FilterKey::Requester => "requester",
            FilterKey::Size => "size",
            FilterKey::Url => "url",
            FilterKey::Operation => "operation",
            FilterKey::Coverage => "coverage",
            FilterKey::Endpoint => "endpoint",
            FilterKey::InSchema => "in_schema",
        }
    }

    /// The record attribute this key compares against, coerced to a string.
    pub fn value_of<'r>(&self, record: &'r LogRecord) -> Cow<'r, str> {
        match self {
            FilterKey::Method => Cow::Borrowed(record.method.as_str()),
            FilterKey::StatusCode => Cow::Owned(record.status_code.to_string()),
            FilterKey::ContentType => Cow::Borrowed(record.content_type.as_str()),
            FilterKey::Requester => Cow::Borrowed(record.requester.as_str()),
            FilterKey::Size => Cow::Owned(record.size.to_string()),
            FilterKey::Url => Cow::Borrowed(record.url.as_str()),
            FilterKey::Operation => Cow::Borrowed(record.operation.as_str()),
            FilterKey::Coverage => Cow::Borrowed(record.coverage.as_str()),
            FilterKey::Endpoint => Cow::Borrowed(record.endpoint.as_str()),
            FilterKey::InSchema => Cow::Borrowed(if record.in_schema { "true" } else { "false" }),
        }
    }

    fn expected_keys() -> String {
        Self::ALL
            .iter()
            .map(FilterKey::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::str::FromStr for FilterKey {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| FilterError::UnknownKey {
                key: s.to_string(),
                expected: Self::expected_keys(),
            })
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Scalar(String),
    /// Closed interval, both ends included.
    Range { low: u64, high: u64 },
}

/// One parsed `key=value` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub key: FilterKey,
    pub value: FilterValue,
    pub negated: bool,
}

impl FilterClause {
    /// Parse a single `key=value` token. The caller decides which tokens are
    /// filters; a token without `=` is treated as a key with an empty value.
    pub fn parse(token: &str) -> Result<Self, FilterError> {
        let (raw_key, raw_value) = token.split_once('=').unwrap_or((token, ""));
        let key: FilterKey = raw_key.parse()?;

        let (negated, value) = match raw_value.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw_value),
        };

        let value = if key == FilterKey::Size && value.contains('-') {
            parse_range(key, value)?
        } else {
            FilterValue::Scalar(value.to_string())
        };

        Ok(Self {
            key,
            value,
            negated,
        })
    }

    pub fn matches(&self, record: &LogRecord) -> bool {
        let matched = match &self.value {
            FilterValue::Range { low, high } => (*low..=*high).contains(&record.size),
            FilterValue::Scalar(expected) => {
                let actual = self.key.value_of(record);
                if self.key == FilterKey::Url {
                    actual.contains(expected.as_str())
                } else {
                    actual == expected.as_str()
                }
            }
        };
        matched != self.negated
    }
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bang = if self.negated { "!" } else { "" };
        match &self.value {
            FilterValue::Scalar(value) => write!(f, "{}={}{}", self.key, bang, value),
            FilterValue::Range { low, high } => {
                write!(f, "{}={}{}-{}", self.key, bang, low, high)
            }
        }
    }
}

fn parse_range(key: FilterKey, value: &str) -> Result<FilterValue, FilterError> {
    let malformed = |reason: &str| FilterError::MalformedRange {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let (low, high) = value
        .split_once('-')
        .ok_or_else(|| malformed("expected <low>-<high>"))?;
    let low: u64 = low
        .trim()
        .parse()
        .map_err(|_| malformed("lower bound is not a non-negative integer"))?;
    let high: u64 = high
        .trim()
        .parse()
        .map_err(|_| malformed("upper bound is not a non-negative integer"))?;

    Ok(FilterValue::Range { low, high })
}

/// Conjunction of clauses. An empty set matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    clauses: Vec<FilterClause>,
}

impl FilterSet {
    pub fn new(clauses: Vec<FilterClause>) -> Self {
        Self { clauses }
    }

    /// Parse every token as a clause, stopping at the first bad one.
    pub fn parse<I, S>(tokens: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let clauses = tokens
            .into_iter()
            .map(|token| FilterClause::parse(token.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Parsed {} filter clause(s)", clauses.len());
        Ok(Self { clauses })
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, record: &LogRecord) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }

    /// Matching records, in the order they were given.
    pub fn apply<'r, I>(&self, records: I) -> Vec<&'r LogRecord>
    where
        I: IntoIterator<Item = &'r LogRecord>,
    {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }

    pub fn count<'r, I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = &'r LogRecord>,
    {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .count()
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.clauses.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join(" "))
    }
}
