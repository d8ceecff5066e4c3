//! Chunked line streaming.
//!
//! Input is read in fixed-size byte chunks and cut into lines as they
//! arrive, so large files never sit in memory whole. Partial lines and
//! partial UTF-8 sequences carry over to the next chunk.

use std::io::Read;
use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::core::types::Result;

/// Bytes read per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 20_000;

/// Receives decoded lines, then exactly one completion call.
pub trait LineSink {
    fn on_line(&mut self, line: &str);

    fn on_complete(&mut self) {}
}

impl<F> LineSink for F
where
    F: FnMut(&str),
{
    fn on_line(&mut self, line: &str) {
        self(line)
    }
}

/// Splits a byte stream into lines across chunk boundaries.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
    lines: usize,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk; every completed line goes to `sink`.
    pub fn feed<S: LineSink + ?Sized>(&mut self, chunk: &[u8], sink: &mut S) {
        let mut rest = chunk;
        // '\n' never occurs inside a multi-byte UTF-8 sequence
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            if self.pending.is_empty() {
                emit(&rest[..pos], sink);
            } else {
                self.pending.extend_from_slice(&rest[..pos]);
                emit(&self.pending, sink);
                self.pending.clear();
            }
            self.lines += 1;
            rest = &rest[pos + 1..];
        }
        self.pending.extend_from_slice(rest);
    }

    /// Flush the unterminated tail, signal completion, and return the
    /// number of lines delivered.
    pub fn finish<S: LineSink + ?Sized>(mut self, sink: &mut S) -> usize {
        if !self.pending.is_empty() {
            emit(&self.pending, sink);
            self.lines += 1;
            self.pending.clear();
        }
        sink.on_complete();
        self.lines
    }
}

fn emit<S: LineSink + ?Sized>(bytes: &[u8], sink: &mut S) {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    sink.on_line(&String::from_utf8_lossy(bytes));
}

/// Stream every line of `reader` into `sink`. Returns the line count.
pub fn read_lines<R: Read, S: LineSink + ?Sized>(mut reader: R, chunk_size: usize, sink: &mut S) -> Result<usize> {
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut splitter = LineSplitter::new();
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        splitter.feed(&buf[..n], sink);
    }
    Ok(splitter.finish(sink))
}

/// Async counterpart of [`read_lines`].
pub async fn read_lines_async<R, S>(mut reader: R, chunk_size: usize, sink: &mut S) -> Result<usize>
where
    R: AsyncRead + Unpin,
    S: LineSink + ?Sized,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut splitter = LineSplitter::new();
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        splitter.feed(&buf[..n], sink);
    }
    Ok(splitter.finish(sink))
}

/// Stream the lines of a file.
pub fn read_file_lines<S: LineSink + ?Sized>(path: &Path, chunk_size: usize, sink: &mut S) -> Result<usize> {
    let file = std::fs::File::open(path)?;
    read_lines(file, chunk_size, sink)
}

/// Stream the lines of a file without blocking the runtime.
pub async fn read_file_lines_async<S: LineSink + ?Sized>(path: &Path, chunk_size: usize, sink: &mut S) -> Result<usize> {
    let file = tokio::fs::File::open(path).await?;
    read_lines_async(file, chunk_size, sink).await
}
