//! Interactive command shell over a loaded [`Session`].
//!
//! The shell owns the session and writes every view to a caller supplied
//! `io::Write`. Lines come from a [`LineSource`]; the binary provides a line
//! editor, tests and scripts use [`ScriptSource`].

pub mod command;
mod count;
mod failures;
mod help;
mod info;
mod list;
mod params;
mod summary;
pub mod table;

pub use command::{Command, CommandLine};

use crate::config::Config;
use crate::error::{CommandError, ShellError};
use crate::session::Session;
use encoding_rs::UTF_8;
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Running,
    Terminated,
}

/// Where the shell reads its input lines from.
pub trait LineSource {
    /// Next line without its terminator, or `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn add_history(&mut self, _line: &str) {}
}

/// Reads lines from any buffered reader. Prompts are not echoed. Bytes that
/// are not valid UTF-8 become U+FFFD, so a bad line fails as a command
/// instead of ending the session.
pub struct ScriptSource<R: BufRead> {
    reader: R,
}

impl<R: BufRead> ScriptSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ScriptSource<R> {
    fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let (line, had_errors) = UTF_8.decode_without_bom_handling(&buf);
        if had_errors {
            debug!("Replaced invalid UTF-8 in input line");
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

pub struct Shell {
    session: Session,
    config: Config,
    state: ShellState,
}

impl Shell {
    pub fn new(session: Session, config: Config) -> Self {
        Self {
            session,
            config,
            state: ShellState::Running,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    /// Startup banner: load summary, then the help text when configured.
    pub fn greet(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Welcome to the scanlog analyzer!")?;
        write_load_summary(&self.session, out)?;
        if self.config.shell.show_help_on_start {
            writeln!(out)?;
            help::render(out)?;
        }
        Ok(())
    }

    /// Read and execute lines until `quit` or end of input.
    pub fn run<S: LineSource + ?Sized>(&mut self, source: &mut S, out: &mut dyn Write) -> io::Result<()> {
        while self.state == ShellState::Running {
            out.flush()?;
            let Some(line) = source.read_line(&self.config.shell.prompt)? else {
                writeln!(out, "Goodbye!")?;
                self.state = ShellState::Terminated;
                break;
            };
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                source.add_history(trimmed);
            }
            self.execute(trimmed, out)?;
        }
        out.flush()
    }

    /// Execute one input line. Command failures are reported on `out` and
    /// leave the shell running; only write failures are returned.
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> io::Result<ShellState> {
        if self.state == ShellState::Terminated {
            return Ok(self.state);
        }

        let result = Command::parse(line).and_then(|command| match command {
            Some(command) => self.dispatch(command, out),
            None => Ok(()),
        });

        match result {
            Ok(()) => {}
            Err(ShellError::Io(e)) => return Err(e),
            Err(e @ ShellError::Command(CommandError::Unknown(_))) => {
                writeln!(out, "Error: {}", e)?;
                writeln!(out, "Type 'help' for available commands")?;
            }
            Err(e) => writeln!(out, "Error: {}", e)?,
        }
        Ok(self.state)
    }

    fn dispatch(&mut self, command: Command, out: &mut dyn Write) -> Result<(), ShellError> {
        debug!("Executing {:?}", command);
        let display = &self.config.display;
        match command {
            Command::List { filters } => list::render(&self.session, &filters, display, out)?,
            Command::Count { filters } => count::render(&self.session, &filters, out)?,
            Command::Summary { full, filters } => {
                summary::render(&self.session, full, &filters, display, out)?
            }
            Command::Info {
                identifiers,
                filters,
                show_bodies,
            } => info::render(&self.session, &identifiers, &filters, show_bodies, out)?,
            Command::Params { identifiers, filters } => {
                params::render(&self.session, &identifiers, &filters, display, out)?
            }
            Command::Errors => failures::render(&self.session, display, out)?,
            Command::Help => help::render(out)?,
            Command::Load { path } => {
                let session = Session::load(&path, &self.config.loader)?;
                info!("Replaced session with {}", path.display());
                self.session = session;
                write_load_summary(&self.session, out)?;
            }
            Command::Quit => {
                writeln!(out, "Goodbye!")?;
                self.state = ShellState::Terminated;
            }
        }
        Ok(())
    }
}

fn write_load_summary(session: &Session, out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        "Loaded {} records from {} ({})",
        session.len(),
        session.archive_path().display(),
        session.loaded_at().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    let failed = session.failures().len();
    if failed > 0 {
        writeln!(
            out,
            "{} entries could not be parsed (type 'errors' for details)",
            failed
        )?;
    }
    Ok(())
}
