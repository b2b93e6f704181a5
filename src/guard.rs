//! Timeout-bounded pass-through copy.
//!
//! A [`CopyGuard`] reads a source to completion on a dedicated thread and
//! races that read against a timer. If the read wins, the bytes are written
//! to the sink in one go; if the timer wins, the sink is never touched and
//! [`CopyError::Timeout`] is returned.
//!
//! Blocking reads cannot be interrupted in general, so a reader that loses
//! the race is detached rather than cancelled. It keeps its thread until the
//! source returns, which for a stream that never yields is the lifetime of
//! the process.

use std::io::{self, Read, Write};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{after, bounded, select};
use tracing::{debug, warn};

use crate::error::CopyError;
use crate::parser::ParserConfig;

/// Outcome of one race between the reader and the timer.
enum Race {
    /// The reader finished first, successfully or not.
    Completed(io::Result<Vec<u8>>),
    /// The timer fired first.
    Expired,
}

/// Copies a source into a sink, giving up after a fixed wait.
#[derive(Debug, Clone, Copy)]
pub struct CopyGuard {
    timeout: Duration,
}

impl Default for CopyGuard {
    fn default() -> Self {
        Self::new(ParserConfig::default().read_timeout)
    }
}

impl CopyGuard {
    /// Create a guard that waits at most `timeout` for the source.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Create a guard using [`ParserConfig::read_timeout`].
    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(config.read_timeout)
    }

    /// The configured wait.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Read `source` to the end and write the bytes to `sink`.
    ///
    /// Returns the copied bytes. A source that closes without data counts as
    /// a completed read and yields an empty copy.
    ///
    /// # Errors
    ///
    /// - [`CopyError::Timeout`] if the read did not finish in time; `sink` is
    ///   not called.
    /// - [`CopyError::Read`] if the source failed first; `sink` is not called.
    /// - [`CopyError::Write`] if writing to `sink` failed.
    pub fn copy<R, W>(&self, source: R, sink: &mut W) -> Result<Vec<u8>, CopyError>
    where
        R: Read + Send + 'static,
        W: Write + ?Sized,
    {
        let bytes = match self.race(source)? {
            Race::Completed(Ok(bytes)) => bytes,
            Race::Completed(Err(e)) => return Err(CopyError::Read(e)),
            Race::Expired => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "input read timed out");
                return Err(CopyError::Timeout);
            }
        };

        sink.write_all(&bytes).map_err(CopyError::Write)?;
        sink.flush().map_err(CopyError::Write)?;
        debug!(len = bytes.len(), "copied input");
        Ok(bytes)
    }

    fn race<R>(&self, mut source: R) -> Result<Race, CopyError>
    where
        R: Read + Send + 'static,
    {
        // Single slot: the reader never blocks on send, even after the
        // caller has stopped listening.
        let (tx, rx) = bounded(1);
        thread::Builder::new()
            .name("reqscript-read".into())
            .spawn(move || {
                let mut buf = Vec::new();
                let result = source.read_to_end(&mut buf).map(|_| buf);
                let _ = tx.send(result);
            })
            .map_err(CopyError::Read)?;

        let timer = after(self.timeout);
        let race = select! {
            recv(rx) -> msg => match msg {
                Ok(result) => Race::Completed(result),
                Err(_) => Race::Completed(Err(io::Error::other("reader thread exited without a result"))),
            },
            recv(timer) -> _ => Race::Expired,
        };
        Ok(race)
    }
}

/// Copy `source` into `sink` with the default timeout.
///
/// See [`CopyGuard::copy`].
///
/// ```rust
/// use reqscript::try_parse_async;
///
/// let mut out = Vec::new();
/// let copied = try_parse_async(&b"POST /foo/bar\n{}"[..], &mut out).unwrap();
/// assert_eq!(out, copied);
/// ```
///
/// # Errors
///
/// Same as [`CopyGuard::copy`].
pub fn try_parse_async<R, W>(source: R, sink: &mut W) -> Result<Vec<u8>, CopyError>
where
    R: Read + Send + 'static,
    W: Write + ?Sized,
{
    CopyGuard::default().copy(source, sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn read_error_is_not_timeout() {
        let mut sink = Vec::new();
        let err = CopyGuard::new(Duration::from_secs(5))
            .copy(FailingReader, &mut sink)
            .unwrap_err();
        assert!(matches!(err, CopyError::Read(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
        assert!(sink.is_empty());
    }

    #[test]
    fn panicking_reader_reports_read_error() {
        struct PanicReader;
        impl Read for PanicReader {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                panic!("reader blew up");
            }
        }

        let mut sink = Vec::new();
        let err = CopyGuard::new(Duration::from_secs(5))
            .copy(PanicReader, &mut sink)
            .unwrap_err();
        assert!(matches!(err, CopyError::Read(_)));
    }
}
