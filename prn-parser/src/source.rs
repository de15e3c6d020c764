//! Forward-only byte cursor over a spool stream

use std::io::{self, BufRead, BufReader, Read};

/// Buffered byte-at-a-time reader that tracks its position
#[derive(Debug)]
pub struct ByteSource<R> {
    inner: BufReader<R>,
    position: u64,
}

impl<R: Read> ByteSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            position: 0,
        }
    }

    /// Number of bytes consumed so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read one byte, or `None` at end of stream
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = loop {
            match self.inner.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(buf) => break buf[0],
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        self.inner.consume(1);
        self.position += 1;
        Ok(Some(byte))
    }

    /// Read at most `len` bytes; fewer only at end of stream
    pub fn read_up_to(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(len);
        self.inner.by_ref().take(len as u64).read_to_end(&mut buf)?;
        self.position += buf.len() as u64;
        Ok(buf)
    }

    /// Drain the rest of the stream into `buf`
    pub fn read_to_end(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        let n = self.inner.read_to_end(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}
