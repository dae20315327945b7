// Author: Dustin Pilgrim
// License: MIT

use std::fmt::Arguments;
use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Local;
use once_cell::sync::Lazy;

const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024; // 5 MiB
const DEFAULT_KEEP_BACKUPS: u32 = 5;

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum LogLevel {
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl LogLevel {
    /// ANSI color for the console bullet
    fn color(&self) -> &'static str {
        match self {
            LogLevel::Error => "\x1b[31m", // Red
            LogLevel::Warn => "\x1b[33m",  // Yellow
            LogLevel::Info => "\x1b[36m",  // Cyan
            LogLevel::Debug => "\x1b[90m", // Gray
        }
    }

    fn short(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERR",
            LogLevel::Warn => "WRN",
            LogLevel::Info => "INF",
            LogLevel::Debug => "DBG",
        }
    }
}

const RESET_COLOR: &str = "\x1b[0m";

pub struct Config {
    pub level: LogLevel,
    pub use_colors: bool,
    pub console: bool,
    pub file: Option<PathBuf>,
}

pub static GLOBAL_CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| {
    Mutex::new(Config {
        level: LogLevel::Info,
        use_colors: io::stdout().is_terminal(),
        console: false,
        file: None,
    })
});

fn config() -> MutexGuard<'static, Config> {
    GLOBAL_CONFIG.lock().unwrap_or_else(|p| p.into_inner())
}

/// Debug level plus console mirroring.
pub fn set_verbose(enabled: bool) {
    let mut cfg = config();
    cfg.level = if enabled { LogLevel::Debug } else { LogLevel::Info };
    cfg.console = enabled;
}

/// Rotates `path` if needed, writes the run header and sends all further lines there.
pub fn enable_file_output(path: &Path, policy: LogPolicy) -> io::Result<()> {
    let needs_blank = prepare_log_file(path, &policy)?;
    if needs_blank {
        write_raw_line(path, "")?;
    }
    write_raw_line(path, &run_header())?;

    config().file = Some(path.to_path_buf());
    Ok(())
}

/// Core logging function
pub fn log_message(level: LogLevel, prefix: &str, args: Arguments) {
    let cfg = config();

    if level > cfg.level {
        return;
    }

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let file_line = format!("[{}][{}][{}] {}", timestamp, level.short(), prefix, args);

    if let Some(path) = &cfg.file {
        if let Err(e) = write_raw_line(path, &file_line) {
            eprintln!("dayflow: failed to write log: {e}");
        }
    }

    if cfg.console || level == LogLevel::Error {
        let console_line = if cfg.use_colors {
            format!("{}●{} [{}][{}] {}", level.color(), RESET_COLOR, timestamp, prefix, args)
        } else {
            file_line
        };

        match level {
            LogLevel::Error => eprintln!("{}", console_line),
            _ => println!("{}", console_line),
        }
    }
}

#[macro_export]
macro_rules! dlog {
    ($level:expr, $prefix:expr, $($arg:tt)*) => {
        $crate::log::log_message($level, $prefix, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! dinfo {
    ($prefix:expr, $($arg:tt)*) => { $crate::dlog!($crate::log::LogLevel::Info, $prefix, $($arg)*) };
}

#[macro_export]
macro_rules! dwarn {
    ($prefix:expr, $($arg:tt)*) => { $crate::dlog!($crate::log::LogLevel::Warn, $prefix, $($arg)*) };
}

#[macro_export]
macro_rules! derror {
    ($prefix:expr, $($arg:tt)*) => { $crate::dlog!($crate::log::LogLevel::Error, $prefix, $($arg)*) };
}

#[macro_export]
macro_rules! ddebug {
    ($prefix:expr, $($arg:tt)*) => { $crate::dlog!($crate::log::LogLevel::Debug, $prefix, $($arg)*) };
}

// ---------------- file handling ----------------

pub struct LogPolicy {
    pub max_bytes: u64,
    pub keep_backups: u32,
}

impl Default for LogPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            keep_backups: DEFAULT_KEEP_BACKUPS,
        }
    }
}

pub fn default_log_path() -> PathBuf {
    let mut path = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);
    path.push("dayflow");
    path.push("dayflow.log");
    path
}

/// Ensures the parent exists and rotates the file if it is too big.
/// Returns whether a blank separator line should precede the next run header.
pub fn prepare_log_file(path: &Path, policy: &LogPolicy) -> io::Result<bool> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    if meta.len() == 0 {
        return Ok(false);
    }

    if meta.len() >= policy.max_bytes {
        rotate(path, policy.keep_backups)?;
        return Ok(false);
    }

    Ok(true)
}

pub fn run_header() -> String {
    let pid = std::process::id();
    format!("==================== dayflow daemon run start (pid={pid}) ====================")
}

fn write_raw_line(path: &Path, line: &str) -> io::Result<()> {
    let mut f = OpenOptions::new().create(true).append(true).open(path)?;
    f.write_all(line.as_bytes())?;
    f.write_all(b"\n")?;
    f.flush()?;
    Ok(())
}

fn rotate(path: &Path, keep_backups: u32) -> io::Result<()> {
    if keep_backups == 0 {
        let _ = fs::remove_file(path);
        return Ok(());
    }

    for i in (1..keep_backups).rev() {
        let from = rotated_name(path, i);
        let to = rotated_name(path, i + 1);
        if from.exists() {
            let _ = fs::rename(from, to);
        }
    }

    let _ = fs::rename(path, rotated_name(path, 1));
    Ok(())
}

fn rotated_name(base: &Path, n: u32) -> PathBuf {
    PathBuf::from(format!("{}.{}", base.display(), n))
}
