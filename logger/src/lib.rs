use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Severity of a log line. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    fn to_ansi_code(self) -> &'static str {
        match self {
            Level::Debug => "\x1b[36m", // Cyan
            Level::Info => "\x1b[32m",  // Green
            Level::Warn => "\x1b[93m",  // Bright Yellow
            Level::Error => "\x1b[91m", // Bright Red
        }
    }

    /// Parses a level name such as `"info"` or `"WARN"`.
    pub fn from_name(name: &str) -> Option<Level> {
        match name.to_lowercase().as_str() {
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            _ => None,
        }
    }
}

/// Appends leveled, timestamped lines to a per-session log file, optionally
/// echoing them to the console with colors.
#[derive(Debug, Clone)]
pub struct Logger {
    log_file: PathBuf,
    min_level: Level,
    to_console: bool,
}

impl Logger {
    /// Creates a new `Logger` writing to `flight_sim_<session>.log` inside `log_dir`.
    ///
    /// # Parameters
    /// - `log_dir`: Existing directory where the log file is created.
    /// - `session`: Name used to tell log files of different runs apart.
    ///
    /// # Returns
    /// A new `Logger` with `Info` as the minimum level and console echo disabled.
    pub fn new(log_dir: &Path, session: &str) -> Result<Self, LoggerError> {
        if !log_dir.is_dir() {
            return Err(LoggerError::InvalidPath(format!(
                "{} is not a directory",
                log_dir.display()
            )));
        }

        let sanitized: String = session
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let log_file = log_dir.join(format!("flight_sim_{}.log", sanitized));

        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&log_file)?;

        Ok(Logger {
            log_file,
            min_level: Level::Info,
            to_console: false,
        })
    }

    /// Sets the minimum level that gets written.
    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Echoes every written line to stdout as well.
    pub fn with_console(mut self, to_console: bool) -> Self {
        self.to_console = to_console;
        self
    }

    pub fn path(&self) -> &Path {
        &self.log_file
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn log(&self, level: Level, message: &str) -> Result<(), LoggerError> {
        if !self.enabled(level) {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let line = format!("[{}] [{}]: {}\n", level.tag(), timestamp, message);

        if self.to_console {
            print!("{}", colorize(level, &line));
            io::stdout().flush()?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    pub fn debug(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Level::Debug, message)
    }

    pub fn info(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Level::Info, message)
    }

    pub fn warn(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Level::Warn, message)
    }

    pub fn error(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Level::Error, message)
    }
}

/// Wraps a line in the ANSI color of its level.
fn colorize(level: Level, line: &str) -> String {
    format!("{}{}\x1b[0m", level.to_ansi_code(), line)
}

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}
