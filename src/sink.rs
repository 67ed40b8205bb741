//! The `Sink` trait every log destination implements.

use std::fs::File;
use std::io::{self, Stderr, Stdout, Write};
use std::sync::{Arc, Mutex};

/// Destination of encoded log records.
///
/// A [`Logger`](crate::Logger) calls [`write_record`](Sink::write_record) once
/// per emitted message with a complete, newline-terminated JSON line. Loggers
/// derived from each other share their sink, so implementations must be safe
/// to call from several threads at once; how concurrent writes are ordered or
/// interleaved is up to the implementation.
pub trait Sink: Send + Sync {
    /// Write one encoded record.
    fn write_record(&self, line: &[u8]) -> io::Result<()>;
}

impl Sink for Stdout {
    fn write_record(&self, line: &[u8]) -> io::Result<()> {
        self.lock().write_all(line)
    }
}

impl Sink for Stderr {
    fn write_record(&self, line: &[u8]) -> io::Result<()> {
        self.lock().write_all(line)
    }
}

impl Sink for File {
    fn write_record(&self, line: &[u8]) -> io::Result<()> {
        let mut file = self;
        file.write_all(line)
    }
}

/// Serializes writes to any [`Write`] implementation, e.g. a
/// `Mutex<Vec<u8>>` or a `Mutex<BufWriter<TcpStream>>`.
impl<W> Sink for Mutex<W>
where
    W: Write + Send,
{
    fn write_record(&self, line: &[u8]) -> io::Result<()> {
        let mut writer = self
            .lock()
            .map_err(|_| io::Error::other("log sink mutex poisoned"))?;
        writer.write_all(line)
    }
}

impl<S> Sink for Arc<S>
where
    S: Sink + ?Sized,
{
    fn write_record(&self, line: &[u8]) -> io::Result<()> {
        (**self).write_record(line)
    }
}
