use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use time::OffsetDateTime;
use time::macros::format_description;

pub enum LogOutput {
    Stdout,
    Stderr,
}

/// `log` backend writing to a standard stream and optionally a file
pub struct Logger {
    pub write_to_std: Option<LogOutput>,
    pub severity: Level,
    pub file: Option<Mutex<File>>,
    pub enable_colors: bool,
}

impl Logger {
    pub fn new(
        file_path: Option<PathBuf>,
        severity: Option<Level>,
        write_to_std: Option<LogOutput>,
        enable_colors: bool,
    ) -> Self {
        let file = file_path.and_then(|path| {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            OpenOptions::new().create(true).append(true).open(path).ok().map(Mutex::new)
        });

        Logger {
            write_to_std,
            severity: severity.unwrap_or(Level::Info),
            file,
            enable_colors,
        }
    }

    fn timestamp() -> String {
        let format = format_description!("[hour]:[minute]:[second]");
        OffsetDateTime::now_utc()
            .format(&format)
            .unwrap_or_else(|_| "--:--:--".to_string())
    }

    fn color(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[36m",
            Level::Debug => "\x1b[35m",
            Level::Trace => "\x1b[37m",
        }
    }

    /// Install the logger, configured from the environment.
    ///
    /// `NOTEPAD_LOG` (or `RUST_LOG`) sets the level, `NOTEPAD_LOG_FILE` names a
    /// file to append to, and `NO_COLOR` turns off colours.
    pub fn init() -> Result<(), log::SetLoggerError> {
        let severity = std::env::var("NOTEPAD_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string())
            .parse::<Level>()
            .unwrap_or(Level::Info);
        let file_path = std::env::var("NOTEPAD_LOG_FILE").ok().map(PathBuf::from);
        let enable_colors = std::env::var("NO_COLOR").is_err();

        let logger = Logger::new(file_path, Some(severity), Some(LogOutput::Stderr), enable_colors);
        log::set_max_level(LevelFilter::Trace);
        log::set_logger(Box::leak(Box::new(logger)))?;
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.severity
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Self::timestamp();
        let level_str = record.level().as_str();
        let args = record.args();

        let formatted = if self.enable_colors {
            let color = Self::color(record.level());
            format!("{color}[{timestamp}] {level_str}\x1b[0m {args}\n")
        } else {
            format!("[{timestamp}] {level_str} {args}\n")
        };

        match &self.write_to_std {
            Some(LogOutput::Stdout) => {
                let _ = std::io::stdout().write_all(formatted.as_bytes());
            }
            Some(LogOutput::Stderr) => {
                let _ = std::io::stderr().write_all(formatted.as_bytes());
            }
            None => {}
        }

        // File output never carries colour codes
        if let Some(file) = &self.file {
            if let Ok(mut guard) = file.lock() {
                let _ = writeln!(guard, "[{timestamp}] {level_str} {args}");
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
        if let Some(file) = &self.file {
            if let Ok(mut guard) = file.lock() {
                let _ = guard.flush();
            }
        }
    }
}
