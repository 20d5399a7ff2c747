use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::ShellError;

/// Where the REPL loop gets its lines from.
///
/// Lines are returned without their line terminator. `Ok(None)` means the
/// input is exhausted.
pub trait LineSource {
    fn next_line(&mut self) -> Result<Option<String>>;
}

/// Terminal input through a line editor, with prompt and history.
pub struct Interactive {
    editor: DefaultEditor,
    prompt: String,
}

impl Interactive {
    pub fn new(prompt: impl Into<String>) -> Result<Self> {
        let editor = DefaultEditor::new().context("cannot initialize line editor")?;
        Ok(Self {
            editor,
            prompt: prompt.into(),
        })
    }
}

impl LineSource for Interactive {
    fn next_line(&mut self) -> Result<Option<String>> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            // Ctrl-C drops the current line; the loop prompts again.
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err).context("cannot read from terminal"),
        }
    }
}

/// Commands read from a file (or any buffered reader), without prompting.
pub struct Batch<R> {
    reader: R,
}

impl Batch<BufReader<File>> {
    /// Open the batch file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ShellError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ShellError::Stream {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Batch<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for Batch<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut buf)
            .context("cannot read batch input")?;
        if read == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}
