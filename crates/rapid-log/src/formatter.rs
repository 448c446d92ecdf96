use crate::event::{Context, LogEvent, UNKNOWN_ID};

use std::path::Path;

use fern::colors::{Color, ColoredLevelConfig};

/// Context keys worth showing on the console; everything else is file-only.
const CONSOLE_CONTEXT_KEYS: [&str; 4] = ["error", "path", "method", "status_code"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy)]
enum Mode {
    Console,
    File,
}

/// Renders one event into one line, console or file flavored.
pub struct Formatter {
    mode: Mode,
    colors: Option<ColoredLevelConfig>,
}

impl Formatter {
    /// Compact console rendering, optionally colorized.
    pub fn console(colored: bool) -> Self {
        Self {
            mode: Mode::Console,
            colors: colored.then(level_colors),
        }
    }

    /// Verbose file rendering: full context plus request/trace suffixes.
    pub fn file() -> Self {
        Self {
            mode: Mode::File,
            colors: None,
        }
    }

    /// Render the event as a single line terminated by a line break.
    /// Never fails: unserializable context falls back to a raw rendering.
    pub fn format(&self, event: &LogEvent) -> String {
        let timestamp = event.timestamp.format(TIMESTAMP_FORMAT);

        let mut line = match &self.colors {
            Some(colors) => {
                let color = colors.get_color(&event.level.as_log_level());
                format!(
                    "[{timestamp}] [\x1B[{}m{}\x1B[0m] {}",
                    color.to_fg_str(),
                    event.level,
                    event.message
                )
            }
            None => format!("[{timestamp}] [{}] {}", event.level, event.message),
        };

        match self.mode {
            Mode::Console => {
                let filtered: Context = event
                    .context
                    .iter()
                    .filter(|(key, _)| CONSOLE_CONTEXT_KEYS.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();

                if !filtered.is_empty() {
                    line.push(' ');
                    line.push_str(&compact_json(&filtered));
                }
            }
            Mode::File => {
                if !event.context.is_empty() {
                    line.push(' ');
                    line.push_str(&compact_json(&event.context));
                }

                if let Some(caller) = event.caller {
                    let file = Path::new(caller.file)
                        .file_name()
                        .map(|name| name.to_string_lossy())
                        .unwrap_or_else(|| caller.file.into());
                    line.push_str(&format!(" [{file}:{}]", caller.line));
                }

                if event.request_id != UNKNOWN_ID {
                    line.push_str(&format!(" [REQ:{}]", event.request_id));
                }
                if event.trace_id != UNKNOWN_ID {
                    line.push_str(&format!(" [TRACE:{}]", event.trace_id));
                }
            }
        }

        line.push('\n');
        line
    }
}

/// Fixed level/color mapping for the console sink.
fn level_colors() -> ColoredLevelConfig {
    ColoredLevelConfig::new()
        .trace(Color::Cyan)
        .debug(Color::Cyan)
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red)
}

fn compact_json(context: &Context) -> String {
    serde_json::to_string(context).unwrap_or_else(|_| format!("{context:?}"))
}
