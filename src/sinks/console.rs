//! Console sink implementation

use crate::core::{
    LoggerError, Outcome, Result, Severity, SharedWriter, Sink, SinkKind, SinkPayload,
};

/// Writes pre-rendered header lines to a console stream.
///
/// Event payloads are ignored; the dispatcher hands console sinks the
/// rendered line instead.
///
/// # Example
///
/// ```
/// use fanout_logger::{ConsoleSink, MemoryBuffer, SharedWriter};
///
/// let buffer = MemoryBuffer::new();
/// let sink = ConsoleSink::with_writer("captured", SharedWriter::memory(&buffer));
/// ```
pub struct ConsoleSink {
    name: String,
    writer: SharedWriter,
    use_colors: bool,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::with_writer("stdout", SharedWriter::stdout())
    }

    pub fn stderr() -> Self {
        Self::with_writer("stderr", SharedWriter::stderr())
    }

    pub fn with_writer(name: impl Into<String>, writer: SharedWriter) -> Self {
        Self {
            name: name.into(),
            writer,
            use_colors: false,
        }
    }

    /// Colour each line by severity. Has no effect without the `console` feature.
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn writer(&self) -> &SharedWriter {
        &self.writer
    }
}

impl Sink for ConsoleSink {
    fn send(&self, severity: Severity, payload: SinkPayload<'_>) -> Result<Outcome> {
        let SinkPayload::Line(line) = payload else {
            return Ok(Outcome::Ignored);
        };

        let written = if self.use_colors {
            self.writer.write_str(&paint(severity, line))
        } else {
            self.writer.write_str(line)
        };
        written.map_err(|e| LoggerError::io_operation("writing console line", e))?;
        Ok(Outcome::Delivered)
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Console
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn flush(&self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| LoggerError::io_operation("flushing console", e))
    }
}

#[cfg(feature = "console")]
fn paint(severity: Severity, line: &str) -> String {
    use colored::Colorize;
    let body = line.trim_end_matches('\n');
    format!("{}\n", body.color(severity.color_code()))
}

#[cfg(not(feature = "console"))]
fn paint(_severity: Severity, line: &str) -> String {
    line.to_string()
}
