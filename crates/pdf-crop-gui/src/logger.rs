use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Metadata, Record};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Log targets that belong to this application; everything else is a dependency
const APP_TARGETS: &[&str] = &["croppdf", "pdf_crop"];

/// One captured log line
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<5} [{}] {}",
            self.timestamp.format("%H:%M:%S"),
            self.level,
            self.target,
            self.message
        )
    }
}

/// In-memory log sink shown in the Log window.
///
/// Application messages are kept down to the chosen level. Dependencies
/// (egui, wgpu, pdfium bindings) only get through with warnings and errors.
/// The oldest lines are dropped once `capacity` is reached.
#[derive(Clone)]
pub struct AppLogger {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
    level: LevelFilter,
}

impl AppLogger {
    pub fn new(capacity: usize, level: LevelFilter) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
            level,
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let max = self.level.max(LevelFilter::Warn);
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max);
        Ok(())
    }

    // Entries stay readable after a panic on another thread
    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get_entries(&self) -> Vec<LogEntry> {
        self.lock().iter().cloned().collect()
    }

    /// Warnings and errors currently held
    pub fn problem_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|e| e.level <= Level::Warn)
            .count()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

fn is_app_target(target: &str) -> bool {
    APP_TARGETS.iter().any(|prefix| target.starts_with(prefix))
}

impl log::Log for AppLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if is_app_target(metadata.target()) {
            metadata.level() <= self.level
        } else {
            metadata.level() <= Level::Warn
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) || self.capacity == 0 {
            return;
        }
        let entry = LogEntry {
            timestamp: Local::now(),
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };

        let mut entries = self.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    fn emit(logger: &AppLogger, level: Level, target: &str, message: &str) {
        logger.log(
            &Record::builder()
                .args(format_args!("{message}"))
                .level(level)
                .target(target)
                .build(),
        );
    }

    fn messages(logger: &AppLogger) -> Vec<String> {
        logger.get_entries().into_iter().map(|e| e.message).collect()
    }

    #[test]
    fn test_oldest_entries_dropped_at_capacity() {
        let logger = AppLogger::new(2, LevelFilter::Info);
        emit(&logger, Level::Info, "croppdf::app", "opened");
        emit(&logger, Level::Info, "croppdf::app", "cropped");
        emit(&logger, Level::Info, "croppdf::app", "saved");

        assert_eq!(messages(&logger), vec!["cropped", "saved"]);
    }

    #[test]
    fn test_dependencies_limited_to_warnings() {
        let logger = AppLogger::new(10, LevelFilter::Debug);
        emit(&logger, Level::Debug, "pdf_crop::apply", "mapped rect");
        emit(&logger, Level::Info, "wgpu_core::device", "adapter chosen");
        emit(&logger, Level::Warn, "eframe", "vsync unavailable");

        assert_eq!(messages(&logger), vec!["mapped rect", "vsync unavailable"]);
    }

    #[test]
    fn test_app_level_respected() {
        let logger = AppLogger::new(10, LevelFilter::Info);
        emit(&logger, Level::Debug, "croppdf::worker", "coalesced");
        emit(&logger, Level::Error, "croppdf::worker", "save failed");

        assert_eq!(messages(&logger), vec!["save failed"]);
        assert_eq!(logger.problem_count(), 1);
    }

    #[test]
    fn test_clear_empties_log() {
        let logger = AppLogger::new(10, LevelFilter::Info);
        emit(&logger, Level::Warn, "croppdf::app", "no pages selected");
        logger.clear();

        assert!(logger.get_entries().is_empty());
        assert_eq!(logger.problem_count(), 0);
    }

    #[test]
    fn test_entry_line_format() {
        let logger = AppLogger::new(1, LevelFilter::Info);
        emit(&logger, Level::Warn, "croppdf::app", "no pages selected");

        let line = logger.get_entries()[0].to_string();
        assert!(line.ends_with(" WARN  [croppdf::app] no pages selected"), "{line}");
    }
}
