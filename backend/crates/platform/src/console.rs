//! Console input utilities
//!
//! Line-oriented reading for the interactive shell. Generic over [`BufRead`]
//! so the shell can be driven from a byte slice in tests.

use std::io::BufRead;

/// Error while reading console input
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Input stream is closed
    #[error("No more input available")]
    EndOfInput,

    /// Line was empty or whitespace only
    #[error("Input must not be blank")]
    Blank,

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads user answers one line at a time
#[derive(Debug)]
pub struct InputReader<R> {
    reader: R,
}

impl<R: BufRead> InputReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read one line without its trailing newline
    ///
    /// Malformed UTF-8 is replaced with `U+FFFD`, so a garbled line reaches
    /// the caller as ordinary (invalid) text instead of an I/O error.
    pub fn read_line(&mut self) -> Result<String, ConsoleError> {
        let mut buf = Vec::new();
        let read = self.reader.read_until(b'\n', &mut buf)?;
        if read == 0 {
            return Err(ConsoleError::EndOfInput);
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Read a numeric menu selection
    ///
    /// ## Returns
    /// * `Ok(Some(n))` - a number was entered
    /// * `Ok(None)` - the line was not a number (caller shows the menu again)
    /// * `Err(ConsoleError::EndOfInput)` - stdin closed
    pub fn read_selection(&mut self) -> Result<Option<u32>, ConsoleError> {
        let line = self.read_line()?;
        Ok(line.trim().parse().ok())
    }

    /// Read a line that must contain something other than whitespace
    pub fn read_non_blank(&mut self) -> Result<String, ConsoleError> {
        let line = self.read_line()?;
        if line.trim().is_empty() {
            return Err(ConsoleError::Blank);
        }
        Ok(line)
    }
}
