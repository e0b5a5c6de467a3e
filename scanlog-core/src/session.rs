// Session: the records of one loaded archive

use crate::archive::{load_archive, EntryFailure, LoadReport};
use crate::config::LoaderSection;
use crate::error::{LoadError, ResolutionError};
use crate::record::LogRecord;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// How many candidates an ambiguous identifier reports.
const MAX_CANDIDATES: usize = 5;

#[derive(Debug, Clone)]
pub struct Session {
    archive_path: PathBuf,
    records: Vec<LogRecord>,
    failures: Vec<EntryFailure>,
    skipped: usize,
    loaded_at: DateTime<Utc>,
}

impl Session {
    pub fn load(path: &Path, options: &LoaderSection) -> Result<Self, LoadError> {
        let report = load_archive(path, options)?;
        Ok(Self::from_report(path, report))
    }

    pub fn from_report(path: &Path, report: LoadReport) -> Self {
        Self {
            archive_path: path.to_path_buf(),
            records: report.records,
            failures: report.failures,
            skipped: report.skipped,
            loaded_at: Utc::now(),
        }
    }

    /// Build a session straight from records, renumbering them 1..=N.
    pub fn from_records(path: impl Into<PathBuf>, records: Vec<LogRecord>) -> Self {
        let records = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| LogRecord {
                seq: index + 1,
                ..record
            })
            .collect();
        Self {
            archive_path: path.into(),
            records,
            failures: Vec::new(),
            skipped: 0,
            loaded_at: Utc::now(),
        }
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// Records in ascending sequence order.
    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn failures(&self) -> &[EntryFailure] {
        &self.failures
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, seq: usize) -> Option<&LogRecord> {
        seq.checked_sub(1).and_then(|index| self.records.get(index))
    }

    /// Resolve a user supplied identifier.
    ///
    /// All-digit identifiers are sequence numbers. Anything else is tried as
    /// an exact filename, then as a filename substring that must be unique.
    pub fn resolve(&self, identifier: &str) -> Result<&LogRecord, ResolutionError> {
        if !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit()) {
            return identifier
                .parse::<usize>()
                .ok()
                .and_then(|seq| self.get(seq))
                .ok_or_else(|| ResolutionError::NotFound(identifier.to_string()));
        }

        if let Some(record) = self.records.iter().find(|r| r.filename == identifier) {
            return Ok(record);
        }

        let matches: Vec<&LogRecord> = self
            .records
            .iter()
            .filter(|r| r.filename.contains(identifier))
            .collect();

        match matches.as_slice() {
            [] => Err(ResolutionError::NotFound(identifier.to_string())),
            [record] => Ok(*record),
            many => Err(ResolutionError::Ambiguous {
                identifier: identifier.to_string(),
                candidates: many
                    .iter()
                    .take(MAX_CANDIDATES)
                    .map(|r| r.filename.clone())
                    .collect(),
            }),
        }
    }
}
