//! Lock-guarded output streams
//!
//! Console sinks and the local error stream write whole lines while holding
//! the lock, so two threads sharing a writer never interleave bytes within a
//! line.

use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Clone)]
pub struct SharedWriter {
    name: &'static str,
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl SharedWriter {
    pub fn new<W: Write + Send + 'static>(name: &'static str, writer: W) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new("stdout", io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new("stderr", io::stderr())
    }

    /// Writer backed by an in-memory buffer
    pub fn memory(buffer: &MemoryBuffer) -> Self {
        Self::new("memory", buffer.clone())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Write `text` as one unit and flush it
    pub fn write_str(&self, text: &str) -> io::Result<()> {
        let mut writer = self.inner.lock();
        writer.write_all(text.as_bytes())?;
        writer.flush()
    }

    /// Write `text` followed by a newline as one unit
    pub fn write_line(&self, text: &str) -> io::Result<()> {
        let mut writer = self.inner.lock();
        writer.write_all(text.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()
    }

    pub fn flush(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

impl fmt::Debug for SharedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedWriter").field("name", &self.name).finish()
    }
}

/// Growable in-memory byte buffer, cloneable handle
#[derive(Clone, Default)]
pub struct MemoryBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl MemoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer contents decoded lossily as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }

    pub fn clear(&self) {
        self.bytes.lock().clear();
    }
}

impl Write for MemoryBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for MemoryBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBuffer")
            .field("len", &self.bytes.lock().len())
            .finish()
    }
}
