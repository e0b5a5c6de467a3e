// Line editor input for interactive sessions

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use scanlog_core::LineSource;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct EditorSource {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl EditorSource {
    /// Create an editor, loading previous history from `history_path` when
    /// one is given.
    pub fn new(history_path: Option<PathBuf>) -> rustyline::Result<Self> {
        let mut editor = DefaultEditor::new()?;
        if let Some(path) = &history_path {
            if let Err(e) = editor.load_history(path) {
                debug!("No history loaded from {}: {}", path.display(), e);
            }
        }
        Ok(Self {
            editor,
            history_path,
        })
    }

    pub fn save_history(&mut self) {
        let Some(path) = &self.history_path else {
            return;
        };
        if let Err(e) = self.editor.save_history(path) {
            warn!("Failed to save history to {}: {}", path.display(), e);
        }
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            // Ctrl-C abandons the current line only
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            debug!("Could not add history entry: {}", e);
        }
    }
}
