//! Destinations for command output.
//!
//! Commands and the dispatcher only see [`OutputSink`]; the binary writes to
//! stdout while tests and embedders collect into a [`BufferSink`].

use std::io::{self, Write};

/// Where command output goes. Output may be buffered until `flush`.
pub trait OutputSink: Send {
    /// Appends raw bytes.
    fn write(&mut self, data: &[u8]);

    /// Makes everything written so far visible.
    fn flush(&mut self);

    /// Appends text.
    fn write_str(&mut self, text: &str) {
        self.write(text.as_bytes());
    }
}

/// Writes to the process stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write(&mut self, data: &[u8]) {
        if let Err(e) = io::stdout().lock().write_all(data) {
            tracing::warn!("Failed to write command output: {e}");
        }
    }

    fn flush(&mut self) {
        if let Err(e) = io::stdout().lock().flush() {
            tracing::warn!("Failed to flush command output: {e}");
        }
    }
}

/// Collects output in memory.
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    buffer: Vec<u8>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer).into_owned()
    }

    /// Takes the collected output, leaving the sink empty.
    pub fn take(&mut self) -> String {
        let bytes = std::mem::take(&mut self.buffer);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl OutputSink for BufferSink {
    fn write(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    fn flush(&mut self) {}
}
