use std::path::PathBuf;
use thiserror::Error;

/// Fatal archive problems. These stop the shell from starting and keep the
/// previous session alive when raised by `load`.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Archive not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("File must be a zip file: {}", .0.display())]
    NotZip(PathBuf),
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to open archive {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("No valid records found in {} ({failed} entries failed to parse)", .path.display())]
    NoValidRecords { path: PathBuf, failed: usize },
}

/// A single archive entry that could not be turned into a record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntryParseError {
    #[error("failed to read entry: {0}")]
    Read(String),
    #[error("entry is {size} bytes, over the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },
    #[error("invalid JSON: {0}")]
    Json(String),
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown filter key '{key}' (expected one of: {expected})")]
    UnknownKey { key: String, expected: String },
    #[error("Malformed range '{value}' for '{key}': {reason}")]
    MalformedRange {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Record '{0}' not found")]
    NotFound(String),
    #[error("Record '{identifier}' is ambiguous, it matches: {}", .candidates.join(", "))]
    Ambiguous {
        identifier: String,
        candidates: Vec<String>,
    },
    #[error("Record '{0}' does not match the specified filters")]
    FilteredOut(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Command not recognized: {0}")]
    Unknown(String),
    #[error("{command}: {what} is required")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("{command}: unexpected argument '{arg}'")]
    UnexpectedArgument { command: &'static str, arg: String },
    #[error("{command}: unknown option '{option}'")]
    UnknownOption {
        command: &'static str,
        option: String,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Everything a single shell command can fail with. All of these are
/// rendered as a one-line diagnostic and the shell keeps running.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
