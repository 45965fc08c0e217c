//! # Startup Logging
//!
//! Where the log goes (and at which level) is itself configuration, so the
//! file logger can only be built after the config file has been read. Until
//! then records are held in memory. [`attach`] replays them into the real
//! logger and forwards everything after that.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use simplelog::SharedLogger;

struct Buffered {
    level: Level,
    target: String,
    message: String,
}

enum Sink {
    Buffering(Vec<Buffered>),
    Attached(Box<dyn SharedLogger>),
    Closed,
}

pub struct DeferredLogger {
    sink: Mutex<Sink>,
}

static LOGGER: DeferredLogger = DeferredLogger::new();

/// Install the global logger in buffering mode.
pub fn init() -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}

/// Hand the global logger its destination. `None` discards the buffer and
/// turns logging off.
pub fn attach(logger: Option<Box<dyn SharedLogger>>) {
    let level = logger.as_ref().map_or(LevelFilter::Off, |l| l.level());
    LOGGER.attach(logger);
    log::set_max_level(level);
}

impl DeferredLogger {
    pub const fn new() -> Self {
        Self {
            sink: Mutex::new(Sink::Buffering(Vec::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sink> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn attach(&self, logger: Option<Box<dyn SharedLogger>>) {
        let mut sink = self.lock();
        let previous = std::mem::replace(&mut *sink, Sink::Closed);
        let Some(logger) = logger else {
            return;
        };
        if let Sink::Buffering(records) = previous {
            for record in records {
                logger.log(
                    &Record::builder()
                        .level(record.level)
                        .target(&record.target)
                        .args(format_args!("{}", record.message))
                        .build(),
                );
            }
        }
        *sink = Sink::Attached(logger);
    }

    /// Records held while waiting for [`DeferredLogger::attach`].
    pub fn buffered_len(&self) -> usize {
        match &*self.lock() {
            Sink::Buffering(records) => records.len(),
            _ => 0,
        }
    }
}

impl Default for DeferredLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for DeferredLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        match &*self.lock() {
            Sink::Buffering(_) => true,
            Sink::Attached(logger) => logger.enabled(metadata),
            Sink::Closed => false,
        }
    }

    fn log(&self, record: &Record<'_>) {
        match &mut *self.lock() {
            Sink::Buffering(records) => records.push(Buffered {
                level: record.level(),
                target: record.target().to_string(),
                message: record.args().to_string(),
            }),
            Sink::Attached(logger) => logger.log(record),
            Sink::Closed => {}
        }
    }

    fn flush(&self) {
        if let Sink::Attached(logger) = &*self.lock() {
            logger.flush();
        }
    }
}
