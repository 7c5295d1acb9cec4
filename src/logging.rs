use crate::error::AppError;
use log::{Level, Metadata, Record};
use once_cell::sync::OnceCell;
use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug)]
struct SimpleLogger {
    log_file: PathBuf,
    level: Level,
}

static LOGGER: OnceCell<SimpleLogger> = OnceCell::new();

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let log_entry = format!("{} - {}\n", record.level(), record.args());
            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_file)
            {
                let _ = file.write_all(log_entry.as_bytes());
            }
        }
    }

    fn flush(&self) {}
}

pub fn level_for(debug: bool) -> Level {
    if debug { Level::Debug } else { Level::Info }
}

// Appends log lines to `<log_dir>/log.txt`. The terminal belongs to the UI, so nothing goes to stdout.
pub fn init(log_dir: PathBuf, debug: bool) -> Result<(), AppError> {
    create_dir_all(&log_dir)?;
    let level = level_for(debug);
    let logger = LOGGER.get_or_init(|| SimpleLogger {
        log_file: log_dir.join("log.txt"),
        level,
    });
    log::set_logger(logger)?;
    log::set_max_level(logger.level.to_level_filter());
    Ok(())
}
