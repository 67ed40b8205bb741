//! JSON line logger.
//!
//! A [`Logger`] is an immutable value. Every `with_*` method returns a new
//! logger and leaves the receiver untouched; the sink, the context and the
//! field map are shared between the two by reference.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io;
use std::sync::Arc;

use chrono::{Local, SecondsFormat};
use serde::Serialize;
use serde_json::value::RawValue;

use crate::context::Context;
use crate::sink::Sink;
use crate::types::{Key, Level, LogError, Record, Result};

/// Writes messages as JSON lines to a [`Sink`], optionally copying values out
/// of its [`Context`].
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn Sink>,
    threshold: Level,
    fields: Arc<HashMap<Key, String>>,
    context: Context,
}

impl Logger {
    /// Create a logger writing to `sink`, with the default threshold
    /// ([`Level::Info`]), an empty context and no context keys.
    pub fn new<S: Sink + 'static>(sink: S) -> Self {
        Self {
            sink: Arc::new(sink),
            threshold: Level::default(),
            fields: Arc::default(),
            context: Context::background(),
        }
    }

    // -----------------------------------------------------------------------
    // Derivation
    // -----------------------------------------------------------------------

    /// Return a logger writing to `sink`.
    ///
    /// Pass an `Arc` to share one sink between several independently built
    /// loggers.
    pub fn with_writer<S: Sink + 'static>(&self, sink: S) -> Self {
        Self {
            sink: Arc::new(sink),
            threshold: self.threshold,
            fields: Arc::clone(&self.fields),
            context: self.context.clone(),
        }
    }

    /// Return a logger that drops messages below `threshold`.
    pub fn with_level(&self, threshold: Level) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            threshold,
            fields: Arc::clone(&self.fields),
            context: self.context.clone(),
        }
    }

    /// Return a logger extracting values from `ctx`.
    pub fn with_context(&self, ctx: Context) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            threshold: self.threshold,
            fields: Arc::clone(&self.fields),
            context: ctx,
        }
    }

    /// Return a logger that copies the context value found at `key` into the
    /// `field` entry of the record's `context` object.
    ///
    /// The field map is copied before the new entry is added, so loggers
    /// sharing an ancestor never see each other's keys. Registering a key a
    /// second time replaces its field name. Mapping two keys to the same field
    /// is a caller error: which value ends up in the record is unspecified.
    pub fn with_context_key(&self, key: impl Into<Key>, field: impl Into<String>) -> Self {
        let mut fields = Arc::clone(&self.fields);
        Arc::make_mut(&mut fields).insert(key.into(), field.into());
        Self {
            sink: Arc::clone(&self.sink),
            threshold: self.threshold,
            fields,
            context: self.context.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The minimum level this logger emits.
    pub fn threshold(&self) -> Level {
        self.threshold
    }

    /// The context values are extracted from.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// The field name registered for `key`, if any.
    pub fn context_field(&self, key: &Key) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Return true if a message at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.threshold
    }

    // -----------------------------------------------------------------------
    // Emission
    // -----------------------------------------------------------------------

    /// Log `message` at `level` without a data payload.
    ///
    /// Messages below the threshold are dropped before any formatting and the
    /// call succeeds.
    pub fn log(&self, level: Level, message: &str) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }
        self.emit(level, message, None)
    }

    /// Log `message` at `level` with `data` in the `data` field.
    ///
    /// The payload is always written, even when it serializes to `null`.
    pub fn log_with<T>(&self, level: Level, message: &str, data: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        if !self.enabled(level) {
            return Ok(());
        }
        let data = serde_json::value::to_raw_value(data).map_err(LogError::Data)?;
        self.emit(level, message, Some(data))
    }

    /// Log a message at the DEBUG level.
    pub fn debug(&self, message: &str) -> Result<()> {
        self.log(Level::Debug, message)
    }

    /// Log a message at the DEBUG level with a data payload.
    pub fn debug_with<T: Serialize + ?Sized>(&self, message: &str, data: &T) -> Result<()> {
        self.log_with(Level::Debug, message, data)
    }

    /// Log a message at the INFO level.
    pub fn info(&self, message: &str) -> Result<()> {
        self.log(Level::Info, message)
    }

    /// Log a message at the INFO level with a data payload.
    pub fn info_with<T: Serialize + ?Sized>(&self, message: &str, data: &T) -> Result<()> {
        self.log_with(Level::Info, message, data)
    }

    /// Log a message at the WARNING level.
    pub fn warning(&self, message: &str) -> Result<()> {
        self.log(Level::Warning, message)
    }

    /// Log a message at the WARNING level with a data payload.
    pub fn warning_with<T: Serialize + ?Sized>(&self, message: &str, data: &T) -> Result<()> {
        self.log_with(Level::Warning, message, data)
    }

    /// Log a message at the ERROR level.
    pub fn error(&self, message: &str) -> Result<()> {
        self.log(Level::Error, message)
    }

    /// Log a message at the ERROR level with a data payload.
    pub fn error_with<T: Serialize + ?Sized>(&self, message: &str, data: &T) -> Result<()> {
        self.log_with(Level::Error, message, data)
    }

    fn emit(&self, level: Level, message: &str, data: Option<Box<RawValue>>) -> Result<()> {
        let record = Record {
            level,
            time: Local::now().to_rfc3339_opts(SecondsFormat::Nanos, false),
            message,
            data,
            context: self.context_values()?,
        };
        self.sink.write_record(&record.to_line()?)?;
        Ok(())
    }

    /// Collect the registered context values. Keys absent from the context
    /// are skipped.
    fn context_values(&self) -> Result<BTreeMap<&str, Box<RawValue>>> {
        let mut values = BTreeMap::new();
        for (key, field) in self.fields.iter() {
            let Some(value) = self.context.value(key) else {
                continue;
            };
            let value = value.to_json().map_err(|source| LogError::ContextValue {
                field: field.clone(),
                source,
            })?;
            values.insert(field.as_str(), value);
        }
        Ok(values)
    }
}

impl Default for Logger {
    /// Standard output, [`Level::Info`], background context, no context keys.
    fn default() -> Self {
        Self::new(io::stdout())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("threshold", &self.threshold)
            .field("fields", &self.fields)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
