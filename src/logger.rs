use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use chrono::Local;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Appends timestamped lines to a file. The terminal is in raw mode while
/// playing, so nothing goes to stdout.
pub struct Logger {
    prefix: Option<String>,
    file: Mutex<File>,
}

impl Logger {
    fn new(file: File, prefix: Option<String>) -> Self {
        Self { prefix, file: Mutex::new(file) }
    }

    pub fn log(&self, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = if let Some(ref prefix) = self.prefix {
            format!("[{}][{}] {}", timestamp, prefix, message)
        } else {
            format!("[{}] {}", timestamp, message)
        };

        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", line);
        }
    }
}

pub fn init_logger(path: &Path, prefix: Option<String>) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    LOGGER.get_or_init(|| Logger::new(file, prefix));
    Ok(())
}

/// Dropped silently when no log file was configured.
pub fn log(message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(message);
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(&format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_appends_prefixed_lines() {
        let mut path = std::env::temp_dir();
        let random_number: u32 = rand::random();
        path.push(format!("temp_snake_trail_log_{}.log", random_number));

        let file = OpenOptions::new().create(true).append(true).open(&path).unwrap();
        let logger = Logger::new(file, Some("Test".to_string()));
        logger.log("first");
        logger.log("second");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[Test] first"));
        assert!(lines[1].ends_with("[Test] second"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_log_without_init_is_silent() {
        log("nobody is listening");
    }
}
