// Command line parsing: verb, positional arguments, options and filters

use crate::error::{CommandError, ShellError};
use crate::filter::FilterSet;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List {
        filters: FilterSet,
    },
    Info {
        identifiers: Vec<String>,
        filters: FilterSet,
        show_bodies: bool,
    },
    Count {
        filters: FilterSet,
    },
    Summary {
        full: bool,
        filters: FilterSet,
    },
    Params {
        identifiers: Vec<String>,
        filters: FilterSet,
    },
    Load {
        path: PathBuf,
    },
    Errors,
    Help,
    Quit,
}

/// A command line split into its parts. Tokens containing `=` are filter
/// clauses, tokens starting with `--` are options, the rest are positional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine<'a> {
    pub verb: &'a str,
    pub positionals: Vec<&'a str>,
    pub options: Vec<&'a str>,
    pub filters: Vec<&'a str>,
}

impl<'a> CommandLine<'a> {
    /// `None` for a blank line.
    pub fn split(line: &'a str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next()?;

        let mut positionals = Vec::new();
        let mut options = Vec::new();
        let mut filters = Vec::new();
        for token in tokens {
            if token.starts_with("--") {
                options.push(token);
            } else if token.contains('=') {
                filters.push(token);
            } else {
                positionals.push(token);
            }
        }

        Some(Self {
            verb,
            positionals,
            options,
            filters,
        })
    }
}

impl Command {
    /// Parse one line of input. Blank lines give `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let trimmed = line.trim();
        let Some(parts) = CommandLine::split(trimmed) else {
            return Ok(None);
        };
        debug!("Dispatching '{}' with {} filter token(s)", parts.verb, parts.filters.len());

        let verb = parts.verb.to_ascii_lowercase();
        let command = match verb.as_str() {
            "list" => {
                reject_extras("list", &parts, &[])?;
                Command::List {
                    filters: FilterSet::parse(&parts.filters)?,
                }
            }
            "count" => {
                reject_extras("count", &parts, &[])?;
                Command::Count {
                    filters: FilterSet::parse(&parts.filters)?,
                }
            }
            "summary" => {
                let mut full = false;
                for arg in &parts.positionals {
                    if arg.eq_ignore_ascii_case("full") && !full {
                        full = true;
                    } else {
                        return Err(CommandError::UnexpectedArgument {
                            command: "summary",
                            arg: arg.to_string(),
                        }
                        .into());
                    }
                }
                reject_options("summary", &parts, &[])?;
                Command::Summary {
                    full,
                    filters: FilterSet::parse(&parts.filters)?,
                }
            }
            "info" => {
                reject_options("info", &parts, &["--no-body"])?;
                Command::Info {
                    identifiers: require_identifiers("info", &parts)?,
                    filters: FilterSet::parse(&parts.filters)?,
                    show_bodies: !parts.options.contains(&"--no-body"),
                }
            }
            "params" => {
                reject_options("params", &parts, &[])?;
                Command::Params {
                    identifiers: require_identifiers("params", &parts)?,
                    filters: FilterSet::parse(&parts.filters)?,
                }
            }
            "load" => {
                // Paths may contain spaces or '=', so take the raw remainder
                let rest = trimmed[parts.verb.len()..].trim();
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "load",
                        what: "an archive path",
                    }
                    .into());
                }
                Command::Load {
                    path: PathBuf::from(rest),
                }
            }
            "errors" => Command::Errors,
            "help" | "?" => Command::Help,
            "quit" | "q" => Command::Quit,
            _ => return Err(CommandError::Unknown(parts.verb.to_string()).into()),
        };

        Ok(Some(command))
    }
}

fn require_identifiers(command: &'static str, parts: &CommandLine<'_>) -> Result<Vec<String>, CommandError> {
    if parts.positionals.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            what: "a record number or filename",
        });
    }
    Ok(parts.positionals.iter().map(|p| p.to_string()).collect())
}

fn reject_extras(command: &'static str, parts: &CommandLine<'_>, allowed: &[&str]) -> Result<(), CommandError> {
    if let Some(arg) = parts.positionals.first() {
        return Err(CommandError::UnexpectedArgument {
            command,
            arg: arg.to_string(),
        });
    }
    reject_options(command, parts, allowed)
}

fn reject_options(command: &'static str, parts: &CommandLine<'_>, allowed: &[&str]) -> Result<(), CommandError> {
    match parts.options.iter().find(|option| !allowed.contains(option)) {
        Some(option) => Err(CommandError::UnknownOption {
            command,
            option: option.to_string(),
        }),
        None => Ok(()),
    }
}
