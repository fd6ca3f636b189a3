//! `log` backend that writes to the browser console.
//!
//! Records from `pixkit-core` go through the `log` facade; this logger maps
//! each level to the matching `console` method so browser devtools can
//! filter them. Off the wasm32 target the lines go to stderr instead.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        write_line(record.level(), &format_record(record));
    }

    fn flush(&self) {}
}

fn format_record(record: &Record) -> String {
    format!("[{}] {}: {}", record.level(), record.target(), record.args())
}

#[cfg(target_arch = "wasm32")]
fn write_line(level: Level, line: &str) {
    use wasm_bindgen::JsValue;
    use web_sys::console;

    let msg = JsValue::from_str(line);
    match level {
        Level::Error => console::error_1(&msg),
        Level::Warn => console::warn_1(&msg),
        Level::Info => console::info_1(&msg),
        Level::Debug => console::debug_1(&msg),
        Level::Trace => console::log_1(&msg),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_line(_level: Level, line: &str) {
    eprintln!("{}", line);
}

/// Install the console logger and set the global max level.
///
/// Safe to call repeatedly; only the first call installs the logger, later
/// calls just adjust the level.
pub fn install(level: LevelFilter) {
    // Err means a logger is already installed
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
