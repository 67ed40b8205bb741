//! Immutable key/value context threaded through a call chain.
//!
//! A [`Context`] is a persistent chain of bindings. [`Context::with_value`]
//! and [`Context::with_extension`] never modify the receiver; they return a
//! new context whose newest binding shadows any older binding of the same key.
//! Cloning a context only bumps a reference count, so contexts are cheap to
//! pass by value and can be shared between threads.
//!
//! Two kinds of values are stored:
//!
//! - *values*, anything implementing [`serde::Serialize`], which a
//!   [`Logger`](crate::Logger) can copy into the `context` object of a record;
//! - *extensions*, arbitrary typed values that are never rendered, such as an
//!   embedded [`Logger`](crate::Logger) (see
//!   [`context_with_logger`](crate::context_with_logger)).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::value::RawValue;

use crate::types::Key;

// ---------------------------------------------------------------------------
// ContextValue
// ---------------------------------------------------------------------------

/// A value stored in a [`Context`] that can be rendered as JSON.
///
/// Implemented for every `Serialize + Send + Sync` type. Rendering happens at
/// log time, so a value that cannot be represented as JSON only fails the log
/// calls that try to extract it.
pub trait ContextValue: Send + Sync {
    /// Encode the value as JSON text, exactly as its `Serialize` impl writes it.
    fn to_json(&self) -> serde_json::Result<Box<RawValue>>;
}

impl<T> ContextValue for T
where
    T: Serialize + Send + Sync,
{
    fn to_json(&self) -> serde_json::Result<Box<RawValue>> {
        serde_json::value::to_raw_value(self)
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum Entry {
    Value(Arc<dyn ContextValue>),
    Extension(Arc<dyn Any + Send + Sync>),
}

struct Node {
    key: Key,
    entry: Entry,
    parent: Option<Arc<Node>>,
}

/// Immutable point-in-time key/value lookup structure.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self { head: None }
    }

    /// The empty root context, used when no request or task context exists.
    pub fn background() -> Self {
        Self::new()
    }

    /// Return a new context binding `key` to a serializable `value`.
    pub fn with_value<V>(&self, key: impl Into<Key>, value: V) -> Self
    where
        V: Serialize + Send + Sync + 'static,
    {
        self.bind(key.into(), Entry::Value(Arc::new(value)))
    }

    /// Return a new context binding `key` to a typed value that is never
    /// rendered into log records.
    pub fn with_extension<T>(&self, key: impl Into<Key>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.bind(key.into(), Entry::Extension(Arc::new(value)))
    }

    /// Look up the serializable value bound to `key`.
    ///
    /// Returns `None` when the key is unbound or when its newest binding is an
    /// extension.
    pub fn value(&self, key: &Key) -> Option<&dyn ContextValue> {
        match self.lookup(key)? {
            Entry::Value(value) => Some(value.as_ref()),
            Entry::Extension(_) => None,
        }
    }

    /// Look up the extension bound to `key`, if it has type `T`.
    pub fn extension<T: Any>(&self, key: &Key) -> Option<&T> {
        match self.lookup(key)? {
            Entry::Extension(ext) => ext.downcast_ref::<T>(),
            Entry::Value(_) => None,
        }
    }

    /// Return true if nothing has been bound in this context.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn bind(&self, key: Key, entry: Entry) -> Self {
        Self {
            head: Some(Arc::new(Node {
                key,
                entry,
                parent: self.head.clone(),
            })),
        }
    }

    fn lookup(&self, key: &Key) -> Option<&Entry> {
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            if n.key == *key {
                return Some(&n.entry);
            }
            node = n.parent.as_deref();
        }
        None
    }

    fn keys(&self) -> impl Iterator<Item = &Key> {
        std::iter::successors(self.head.as_deref(), |n| n.parent.as_deref()).map(|n| &n.key)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}
