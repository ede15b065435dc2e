//! Read chat lines like a boss.
//!
//! This library provides [`LineReader`], which turns an async byte stream
//! into a sequence of complete, newline-terminated messages.  The transport
//! may deliver any mix of partial lines and line batches per read; bytes are
//! accumulated per connection and only whole lines come out.

use memchr::memchr;
use std::io;
use std::mem;
use tokio::io::{AsyncRead, AsyncReadExt};

/// How many octets a single transport read may return at most.
pub const READ_CHUNK: usize = 1024;

/// Buffered reader that yields one message line at a time.
///
/// Lines are terminated by `\n`; an optional `\r` before the terminator is
/// stripped.  Bytes that do not form valid UTF-8 are replaced rather than
/// failing the stream.
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(inner: R) -> LineReader<R> {
        LineReader {
            inner,
            buf: Vec::new(),
        }
    }

    /// Returns the next complete line, without its terminator.
    ///
    /// Returns `Ok(None)` when the peer has closed the stream.  Buffered
    /// bytes that were never terminated are discarded at that point.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(pos) = memchr(b'\n', &self.buf) {
                let rest = self.buf.split_off(pos + 1);
                let mut line = mem::replace(&mut self.buf, rest);
                line.pop();
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }
            let mut chunk = [0; READ_CHUNK];
            let n = self.inner.read(&mut chunk).await?;
            if n == 0 {
                return Ok(None);
            }
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }
}
