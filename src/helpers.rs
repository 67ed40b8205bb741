//! Process-wide default logger and helpers to carry a logger in a context.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::context::Context;
use crate::logger::Logger;
use crate::types::{Key, Level, Result};

/// Logs to standard output, drops debug messages, uses the background
/// context. Never modified after initialization.
static DEFAULT_LOGGER: Lazy<Logger> = Lazy::new(Logger::default);

/// Private type behind the context key used by [`context_with_logger`].
struct LoggerKey;

/// Return the process-wide default logger.
///
/// Derive from it to configure a logger without touching the default:
///
/// ```
/// let logger = jsonlog::default_logger().with_level(jsonlog::Level::Debug);
/// assert_eq!(jsonlog::default_logger().threshold(), jsonlog::Level::Info);
/// assert_eq!(logger.threshold(), jsonlog::Level::Debug);
/// ```
pub fn default_logger() -> &'static Logger {
    &DEFAULT_LOGGER
}

// ---------------------------------------------------------------------------
// Free-standing logging functions
// ---------------------------------------------------------------------------

/// Log a message at `level` on the default logger.
pub fn log(level: Level, message: &str) -> Result<()> {
    DEFAULT_LOGGER.log(level, message)
}

/// Log a message at `level` with a data payload on the default logger.
pub fn log_with<T: Serialize + ?Sized>(level: Level, message: &str, data: &T) -> Result<()> {
    DEFAULT_LOGGER.log_with(level, message, data)
}

/// Log a message at the DEBUG level on the default logger.
pub fn debug(message: &str) -> Result<()> {
    DEFAULT_LOGGER.debug(message)
}

/// Log a message at the DEBUG level with a data payload on the default logger.
pub fn debug_with<T: Serialize + ?Sized>(message: &str, data: &T) -> Result<()> {
    DEFAULT_LOGGER.debug_with(message, data)
}

/// Log a message at the INFO level on the default logger.
pub fn info(message: &str) -> Result<()> {
    DEFAULT_LOGGER.info(message)
}

/// Log a message at the INFO level with a data payload on the default logger.
pub fn info_with<T: Serialize + ?Sized>(message: &str, data: &T) -> Result<()> {
    DEFAULT_LOGGER.info_with(message, data)
}

/// Log a message at the WARNING level on the default logger.
pub fn warning(message: &str) -> Result<()> {
    DEFAULT_LOGGER.warning(message)
}

/// Log a message at the WARNING level with a data payload on the default logger.
pub fn warning_with<T: Serialize + ?Sized>(message: &str, data: &T) -> Result<()> {
    DEFAULT_LOGGER.warning_with(message, data)
}

/// Log a message at the ERROR level on the default logger.
pub fn error(message: &str) -> Result<()> {
    DEFAULT_LOGGER.error(message)
}

/// Log a message at the ERROR level with a data payload on the default logger.
pub fn error_with<T: Serialize + ?Sized>(message: &str, data: &T) -> Result<()> {
    DEFAULT_LOGGER.error_with(message, data)
}

// ---------------------------------------------------------------------------
// Logger embedding
// ---------------------------------------------------------------------------

/// Return a context derived from `ctx` that carries `logger`.
///
/// The logger is stored under a key no other code can build, and is never
/// rendered into log records. Retrieve it with
/// [`logger_from_context_or_default`].
pub fn context_with_logger(ctx: &Context, logger: Logger) -> Context {
    ctx.with_extension(Key::of::<LoggerKey>(), logger)
}

/// Return the logger carried by `ctx`, or the default logger if there is none.
pub fn logger_from_context_or_default(ctx: &Context) -> Logger {
    match ctx.extension::<Logger>(&Key::of::<LoggerKey>()) {
        Some(logger) => logger.clone(),
        None => default_logger().clone(),
    }
}
