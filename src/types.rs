//! Core types shared by the logger, the context and the wire format.
//!
//! [`Level`] is the ordered severity used for filtering, [`Key`] identifies a
//! value stored in a [`Context`](crate::Context), and `Record` is the JSON
//! object written for every emitted message.

use std::any::TypeId;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Severity of a log message.
///
/// Levels are totally ordered, `Debug < Info < Warning < Error`, and a
/// [`Logger`](crate::Logger) only emits messages whose level is greater than or
/// equal to its threshold.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl Level {
    /// Every level, from the least to the most severe.
    pub const ALL: [Level; 4] = [Self::Debug, Self::Info, Self::Warning, Self::Error];

    /// The label written in the `level` field of a record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Parse an exact label as produced by [`as_str`](Self::as_str).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Level {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Returned when a string does not name a [`Level`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0:?} is not a valid log level")]
pub struct ParseLevelError(pub String);

/// Lenient parsing used for configuration values: case-insensitive, and
/// `warn` is accepted for [`Level::Warning`].
impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "warn" => Ok(Self::Warning),
            other => Self::parse(other).ok_or_else(|| ParseLevelError(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Identifies a value stored in a [`Context`](crate::Context).
///
/// Keys are heterogeneous: a name, a numeric id, or the identity of a Rust
/// type. Two keys are equal only when they have the same variant and the same
/// payload, so `Key::from("1")` and `Key::from(1)` are distinct.
///
/// Type keys are collision-proof when the type is private to a module: no
/// other code can name it, hence no other code can build the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(Cow<'static, str>),
    Id(i64),
    Type(TypeId),
}

impl Key {
    /// Build a key from the identity of the type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type(TypeId::of::<T>())
    }
}

impl From<&'static str> for Key {
    fn from(name: &'static str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::Name(Cow::Owned(name))
    }
}

impl From<i64> for Key {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<i32> for Key {
    fn from(id: i32) -> Self {
        Self::Id(id.into())
    }
}

impl From<u32> for Key {
    fn from(id: u32) -> Self {
        Self::Id(id.into())
    }
}

// ---------------------------------------------------------------------------
// LogError
// ---------------------------------------------------------------------------

/// Failure of a single log call. Nothing is retried or buffered.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("the data payload could not be serialized: {0}")]
    Data(#[source] serde_json::Error),
    #[error("the context value for {field:?} could not be serialized: {source}")]
    ContextValue {
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("the log record could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("the log record could not be written: {0}")]
    Write(#[from] std::io::Error),
}

/// Result alias used by every logging call.
pub type Result<T> = std::result::Result<T, LogError>;

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// One log line. Field order is `level, time, message, data, context`.
///
/// `data` is skipped only when the caller supplied no payload; a payload that
/// serializes to `null`, `0` or `""` is still written. Payload and context
/// values are already encoded, so struct field order and integers wider than
/// 64 bits come out exactly as their `Serialize` impl wrote them.
#[derive(Debug, Serialize)]
pub(crate) struct Record<'a> {
    pub level: Level,
    pub time: String,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<&'a str, Box<RawValue>>,
}

impl Record<'_> {
    /// Encode as a single JSON line, newline included.
    pub fn to_line(&self) -> Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self).map_err(LogError::Encode)?;
        line.push(b'\n');
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
        let mut sorted = Level::ALL;
        sorted.sort();
        assert_eq!(sorted, Level::ALL);
    }

    #[test]
    fn labels_round_trip() {
        for level in Level::ALL {
            assert_eq!(Level::parse(level.as_str()), Some(level));
            assert_eq!(level.to_string(), level.as_str());
        }
        assert_eq!(Level::parse("Info"), None);
        assert_eq!(Level::parse("warn"), None);
    }

    #[test]
    fn from_str_is_lenient() {
        assert_eq!("WARN".parse::<Level>(), Ok(Level::Warning));
        assert_eq!(" Debug ".parse::<Level>(), Ok(Level::Debug));
        assert_eq!("error".parse::<Level>(), Ok(Level::Error));
        assert_eq!(
            "verbose".parse::<Level>(),
            Err(ParseLevelError("verbose".to_string()))
        );
    }

    #[test]
    fn parse_error_names_the_rejected_value() {
        let err = "loud".parse::<Level>().unwrap_err();
        assert_eq!(err.to_string(), "\"loud\" is not a valid log level");
    }

    #[test]
    fn level_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Level::Warning).unwrap(), "\"warning\"");
    }

    #[test]
    fn keys_compare_by_variant_and_payload() {
        assert_eq!(Key::from("request"), Key::from("request".to_string()));
        assert_eq!(Key::from(7i32), Key::from(7i64));
        assert_ne!(Key::from("1"), Key::from(1i32));
        assert_eq!(Key::of::<String>(), Key::of::<String>());
        assert_ne!(Key::of::<String>(), Key::of::<u8>());
    }

    #[test]
    fn record_omits_absent_fields() {
        let record = Record {
            level: Level::Info,
            time: "2024-01-01T00:00:00.000000000+00:00".to_string(),
            message: "hello",
            data: None,
            context: BTreeMap::new(),
        };
        let line = record.to_line().unwrap();
        assert_eq!(
            String::from_utf8(line).unwrap(),
            "{\"level\":\"info\",\"time\":\"2024-01-01T00:00:00.000000000+00:00\",\"message\":\"hello\"}\n"
        );
    }

    #[test]
    fn record_keeps_null_payload() {
        let record = Record {
            level: Level::Error,
            time: String::new(),
            message: "",
            data: Some(RawValue::from_string("null".to_string()).unwrap()),
            context: BTreeMap::new(),
        };
        let line = String::from_utf8(record.to_line().unwrap()).unwrap();
        assert!(line.contains("\"data\":null"));
        assert!(!line.contains("context"));
    }
}
