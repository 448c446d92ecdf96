use crate::Formatter;
use crate::event::LogEvent;

use std::io::{self, Write};

/// A destination that durably records rendered log lines.
/// The logger dispatches every event to each registered sink in turn.
pub trait Sink: Send + Sync {
    fn emit(&self, event: &LogEvent) -> io::Result<()>;

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Compact, optionally colorized lines on stdout.
pub struct ConsoleSink {
    formatter: Formatter,
}

impl ConsoleSink {
    pub fn new(colored: bool) -> Self {
        Self {
            formatter: Formatter::console(colored),
        }
    }
}

impl Sink for ConsoleSink {
    fn emit(&self, event: &LogEvent) -> io::Result<()> {
        let line = self.formatter.format(event);
        io::stdout().lock().write_all(line.as_bytes())
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().lock().flush()
    }
}
