//! Routes `log` records from the `shared` engine to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};

static LOGGER: ConsoleLogger = ConsoleLogger;

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record);
        if record.level() <= Level::Warn {
            zoon::eprintln!("{line}");
        } else {
            zoon::println!("{line}");
        }
    }

    fn flush(&self) {}
}

fn max_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

fn format_record(record: &Record) -> String {
    format!("[{}] {}: {}", record.level(), record.target(), record.args())
}

/// Install the console logger. A second call keeps the first logger.
pub fn init() {
    match log::set_logger(&LOGGER) {
        Ok(()) => log::set_max_level(max_level()),
        Err(error) => zoon::eprintln!("Logger already installed: {error}"),
    }
}
