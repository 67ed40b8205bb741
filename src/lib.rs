//! Structured JSON logging with arbitrary data and values extracted from a
//! context.
//!
//! Every emitted message becomes one JSON object on its own line:
//!
//! ```text
//! {"level":"info","time":"2024-05-01T12:00:00.123456789+02:00","message":"shown","data":{"x":1},"context":{"request":"r-42"}}
//! ```
//!
//! `data` is present only when a payload was given, `context` only when at
//! least one registered context key had a value.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use jsonlog::{Context, Level, Logger};
//!
//! let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
//! let ctx = Context::background().with_value("request_id", "r-42");
//!
//! let logger = Logger::new(buffer.clone())
//!     .with_level(Level::Debug)
//!     .with_context(ctx)
//!     .with_context_key("request_id", "request");
//!
//! logger.info_with("shown", &serde_json::json!({ "x": 1 }))?;
//!
//! let line = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
//! assert!(line.contains(r#""context":{"request":"r-42"}"#));
//! # Ok::<(), jsonlog::LogError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! +----------+  with_value   +---------+  with_context_key  +--------+  write_record  +------+
//! | caller   | ------------> | Context | -----------------> | Logger | -------------> | Sink |
//! +----------+               +---------+                    +--------+                +------+
//! ```
//!
//! [`Logger`] and [`Context`] are immutable values; deriving a new one never
//! changes the original, so both can be shared freely between threads. The
//! only shared mutable resource is the [`Sink`], which is responsible for its
//! own synchronization.

pub mod config;
pub mod context;
pub mod helpers;
pub mod logger;
pub mod sink;
pub mod types;

// Re-export the most commonly used items at the crate root.
pub use config::Config;
pub use context::{Context, ContextValue};
pub use helpers::*;
pub use logger::Logger;
pub use sink::Sink;
pub use types::*;
