//! Leveled trace output.
//!
//! A [`Trace`] is an ordinary value: create one, hand references to the code
//! that should write to it, and drop it to flush. Messages are formatted into
//! a bounded buffer, prefixed with their level whenever they start a new
//! line, written to the trace's writer and mirrored as `tracing` events.

use crate::{
    error::Error,
    fmt::{FixedBuf, DEFAULT_MESSAGE_BUFFER_SIZE},
};
use parking_lot::Mutex;
use std::{
    fmt,
    io::{self, Write},
    str::FromStr,
    sync::atomic::{AtomicU8, Ordering},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum TraceLevel {
    Debug = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
}

impl TraceLevel {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Debug,
            1 => Self::Info,
            2 => Self::Warning,
            _ => Self::Error,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraceLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(Error::InvalidLevel(s.to_owned())),
        }
    }
}

struct Sink {
    writer: Box<dyn Write + Send>,
    last_level: TraceLevel,
    new_line: bool,
}

pub struct Trace {
    level: AtomicU8,
    sink: Mutex<Sink>,
}

impl fmt::Debug for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trace").field("level", &self.level()).finish()
    }
}

impl Trace {
    pub fn new(level: TraceLevel, writer: impl Write + Send + 'static) -> Self {
        Self {
            level: AtomicU8::new(level as u8),
            sink: Mutex::new(Sink {
                writer: Box::new(writer),
                last_level: level,
                new_line: true,
            }),
        }
    }

    pub fn stdout(level: TraceLevel) -> Self {
        Self::new(level, io::stdout())
    }

    /// A trace which drops everything written to it.
    pub fn sink() -> Self {
        Self::new(TraceLevel::Error, io::sink())
    }

    pub fn level(&self) -> TraceLevel {
        TraceLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: TraceLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    pub fn enabled(&self, level: TraceLevel) -> bool {
        level >= self.level()
    }

    /// Write a message at `level`.
    ///
    /// Messages below the current level are dropped. Text longer than
    /// [`DEFAULT_MESSAGE_BUFFER_SIZE`] bytes is truncated.
    pub fn output(&self, level: TraceLevel, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }

        let text = FixedBuf::<DEFAULT_MESSAGE_BUFFER_SIZE>::format(args);
        match level {
            TraceLevel::Debug => tracing::debug!(target: "syncevent::trace", "{}", text.trim_end()),
            TraceLevel::Info => tracing::info!(target: "syncevent::trace", "{}", text.trim_end()),
            TraceLevel::Warning => tracing::warn!(target: "syncevent::trace", "{}", text.trim_end()),
            TraceLevel::Error => tracing::error!(target: "syncevent::trace", "{}", text.trim_end()),
        }

        let mut sink = self.sink.lock();
        if let Err(err) = sink.write(level, &text) {
            tracing::warn!(%err, "trace output failed");
        }
    }

    pub fn flush(&self) -> io::Result<()> {
        self.sink.lock().writer.flush()
    }
}

impl Sink {
    fn write(&mut self, level: TraceLevel, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        // a level change in the middle of a line starts a fresh one
        if level != self.last_level && !self.new_line {
            self.writer.write_all(b"\n")?;
            self.new_line = true;
        }

        if self.new_line {
            write!(self.writer, "[{}] ", level)?;
        }

        self.writer.write_all(text.as_bytes())?;
        self.last_level = level;
        self.new_line = text.ends_with('\n');
        Ok(())
    }
}

impl Drop for Trace {
    fn drop(&mut self) {
        let _ = self.sink.get_mut().writer.flush();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub(crate) struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        pub(crate) fn text(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn parse_levels() {
        assert_eq!("debug".parse::<TraceLevel>().unwrap(), TraceLevel::Debug);
        assert_eq!("WARN".parse::<TraceLevel>().unwrap(), TraceLevel::Warning);
        assert_eq!(" error ".parse::<TraceLevel>().unwrap(), TraceLevel::Error);
        assert!(matches!(
            "loud".parse::<TraceLevel>(),
            Err(Error::InvalidLevel(level)) if level == "loud"
        ));
    }

    #[test]
    fn filters_by_level() {
        let out = Captured::default();
        let trace = Trace::new(TraceLevel::Warning, out.clone());

        crate::trace_out!(trace, TraceLevel::Info, "hidden\n");
        crate::trace_out!(trace, TraceLevel::Error, "shown {}\n", 1);
        assert_eq!(out.text(), "[ERROR] shown 1\n");

        trace.set_level(TraceLevel::Debug);
        assert_eq!(trace.level(), TraceLevel::Debug);
        crate::trace_out!(trace, TraceLevel::Debug, "now shown\n");
        assert_eq!(out.text(), "[ERROR] shown 1\n[DEBUG] now shown\n");
    }

    #[test]
    fn prefixes_only_new_lines() {
        let out = Captured::default();
        let trace = Trace::new(TraceLevel::Debug, out.clone());

        crate::trace_out!(trace, TraceLevel::Info, "part one, ");
        crate::trace_out!(trace, TraceLevel::Info, "part two\n");
        crate::trace_out!(trace, TraceLevel::Info, "next\n");
        assert_eq!(out.text(), "[INFO] part one, part two\n[INFO] next\n");
    }

    #[test]
    fn level_change_breaks_line() {
        let out = Captured::default();
        let trace = Trace::new(TraceLevel::Debug, out.clone());

        crate::trace_out!(trace, TraceLevel::Info, "partial");
        crate::trace_out!(trace, TraceLevel::Error, "failure\n");
        assert_eq!(out.text(), "[INFO] partial\n[ERROR] failure\n");
    }

    #[test]
    fn truncates_long_messages() {
        let out = Captured::default();
        let trace = Trace::new(TraceLevel::Debug, out.clone());

        let long = "y".repeat(DEFAULT_MESSAGE_BUFFER_SIZE * 2);
        crate::trace_out!(trace, TraceLevel::Info, "{}", long);
        assert_eq!(out.text().len(), "[INFO] ".len() + DEFAULT_MESSAGE_BUFFER_SIZE);
    }
}
