// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

pub use log::Level;

use log::{Metadata, Record, SetLoggerError};

/// Logs an error and terminates the process with a non-zero exit code.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
        log::Log::flush(log::logger());
        std::process::exit(1);
    }};
}

/// Writes each record to stdout as `<timestamp> <LEVEL> [<label>] <message>`.
/// Debug and trace records carry their module path instead of the label.
pub struct SimpleLogger {
    label: String,
    level: Level,
}

impl SimpleLogger {
    fn format(&self, record: &Record) -> String {
        let target = if record.level() >= Level::Debug {
            record.target()
        } else {
            self.label.as_str()
        };
        format!(
            "{} {:<5} [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level().to_string(),
            target,
            record.args()
        )
    }
}

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}", self.format(record));
        }
    }

    fn flush(&self) {}
}

/// Builder which installs a `SimpleLogger` as the global logger
pub struct Logger {
    label: String,
    level: Level,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    pub fn new() -> Self {
        Self {
            label: crate::config::NAME.to_owned(),
            level: Level::Info,
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Maps a stacked `-v` count onto a level: none is info, one is debug,
    /// more is trace.
    pub fn verbosity(self, count: u64) -> Self {
        let level = match count {
            0 => Level::Info,
            1 => Level::Debug,
            _ => Level::Trace,
        };
        self.level(level)
    }

    pub fn init(self) -> Result<(), SetLoggerError> {
        let filter = self.level.to_level_filter();
        log::set_boxed_logger(Box::new(SimpleLogger {
            label: self.label,
            level: self.level,
        }))
        .map(|()| log::set_max_level(filter))
    }
}
