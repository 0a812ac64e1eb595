use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Destination for the copy action.
pub trait Clipboard: Send {
    fn write_text(&mut self, text: &str) -> io::Result<()>;
}

/// OSC 52 escape sequence that asks the terminal to set the system clipboard.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

/// Sets the clipboard through the terminal with OSC 52.
/// Works over SSH as long as the terminal emulator honours the sequence.
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

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(osc52_sequence(text).as_bytes())?;
        self.out.flush()
    }
}

/// In-memory clipboard for tests. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    writes: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose writes always fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "clipboard unavailable",
            ));
        }
        self.writes
            .lock()
            .map_err(|_| io::Error::other("clipboard lock poisoned"))?
            .push(text.to_string());
        Ok(())
    }
}
