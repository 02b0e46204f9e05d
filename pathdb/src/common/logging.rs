use log::{Level, LevelFilter};
use std::fmt::Arguments;

/// A named logger with its own minimum level.
///
/// Records go through the `log` facade with the logger name as target, so any
/// installed backend sees them. The level lives on the instance instead of in
/// process-wide state, which lets two database handles log at different
/// levels. `LevelFilter::Off` silences the logger.
#[derive(Debug, Clone)]
pub struct Logger {
    name: String,
    level: LevelFilter,
}

impl Logger {
    pub fn new(name: impl Into<String>, level: LevelFilter) -> Self {
        Logger {
            name: name.into(),
            level,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    pub fn debug(&self, args: Arguments<'_>) {
        self.print(Level::Debug, args);
    }

    pub fn info(&self, args: Arguments<'_>) {
        self.print(Level::Info, args);
    }

    pub fn warn(&self, args: Arguments<'_>) {
        self.print(Level::Warn, args);
    }

    pub fn error(&self, args: Arguments<'_>) {
        self.print(Level::Error, args);
    }

    fn print(&self, level: Level, args: Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        log::log!(target: self.name.as_str(), level, "{}", args);
    }
}

/// Parses the level names `DEBUG`, `INFO`, `WARN`, `ERROR` and `SILENT`
/// (case-insensitive). `SILENT` maps to `LevelFilter::Off`.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_ascii_uppercase().as_str() {
        "DEBUG" => Some(LevelFilter::Debug),
        "INFO" => Some(LevelFilter::Info),
        "WARN" => Some(LevelFilter::Warn),
        "ERROR" => Some(LevelFilter::Error),
        "SILENT" => Some(LevelFilter::Off),
        _ => None,
    }
}
