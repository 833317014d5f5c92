use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crossterm::clipboard::CopyToClipboard;

/// Destination for copied turn content
pub trait Clipboard: Send {
    fn copy(&mut self, text: &str) -> io::Result<()>;
}

/// Copies through the terminal with an OSC 52 escape sequence
///
/// Works over SSH and inside multiplexers that forward OSC 52, without a
/// platform clipboard library.
pub struct Osc52Clipboard<W: Write + Send> {
    out: W,
}

impl Osc52Clipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        crossterm::execute!(self.out, CopyToClipboard::to_clipboard_from(text))
    }
}

/// In-memory clipboard shared with the caller, used in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Vec<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent copy, if any
    pub fn last(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.last().cloned())
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        let mut contents = self.contents.lock().map_err(|e| io::Error::other(e.to_string()))?;
        contents.push(text.to_string());
        Ok(())
    }
}
