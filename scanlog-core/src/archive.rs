// Archive loader: zip file in, ordered records plus per-entry failures out

use crate::config::LoaderSection;
use crate::error::{EntryParseError, LoadError};
use crate::input::decode_entry;
use crate::record::LogRecord;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// An archive entry that was skipped because it could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFailure {
    pub entry: String,
    pub error: EntryParseError,
}

/// Result of a successful load. Loading succeeds as long as one entry parses.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub records: Vec<LogRecord>,
    pub failures: Vec<EntryFailure>,
    /// Directories and non-JSON files.
    pub skipped: usize,
}

/// Open `path` and parse every JSON entry into a record.
pub fn load_archive(path: &Path, options: &LoaderSection) -> Result<LoadReport, LoadError> {
    info!("Loading archive: {}", path.display());

    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let is_zip = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);
    if !is_zip {
        return Err(LoadError::NotZip(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    read_archive(BufReader::new(file), path, options)
}

/// Parse an already opened archive. `path` is only used in messages.
pub fn read_archive<R: Read + Seek>(
    reader: R,
    path: &Path,
    options: &LoaderSection,
) -> Result<LoadReport, LoadError> {
    let mut archive = ZipArchive::new(reader).map_err(|source| LoadError::Archive {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    let mut failures = Vec::new();
    let mut skipped = 0;

    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                let name = format!("entry #{}", index + 1);
                warn!("Error processing {}: {}", name, e);
                failures.push(EntryFailure {
                    entry: name,
                    error: EntryParseError::Read(e.to_string()),
                });
                continue;
            }
        };

        let name = entry.name().to_string();
        if entry.is_dir() || !is_json_entry(&name) {
            debug!("Skipping entry {}", name);
            skipped += 1;
            continue;
        }

        let parsed = read_entry(&mut entry, options.max_entry_bytes)
            .and_then(|text| LogRecord::parse(records.len() + 1, &name, &text));

        match parsed {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!("Error processing {}: {}", name, error);
                failures.push(EntryFailure { entry: name, error });
            }
        }
    }

    if records.is_empty() {
        return Err(LoadError::NoValidRecords {
            path: PathBuf::from(path),
            failed: failures.len(),
        });
    }

    info!(
        "Loaded {} records from {} ({} failed, {} skipped)",
        records.len(),
        path.display(),
        failures.len(),
        skipped
    );

    Ok(LoadReport {
        records,
        failures,
        skipped,
    })
}

fn is_json_entry(name: &str) -> bool {
    let base = name.rsplit('/').next().unwrap_or(name);
    // macOS resource forks and dotfiles are never captures
    !name.starts_with("__MACOSX/")
        && !base.starts_with('.')
        && base.to_ascii_lowercase().ends_with(".json")
}

fn read_entry<R: Read>(entry: &mut R, limit: u64) -> Result<String, EntryParseError> {
    let mut data = Vec::new();
    // Read one byte past the limit to tell "exactly at limit" from "over"
    entry
        .take(limit.saturating_add(1))
        .read_to_end(&mut data)
        .map_err(|e| EntryParseError::Read(e.to_string()))?;

    if data.len() as u64 > limit {
        return Err(EntryParseError::TooLarge {
            size: data.len() as u64,
            limit,
        });
    }

    Ok(decode_entry(&data).into_owned())
}
