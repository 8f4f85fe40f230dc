//! Length-prefixed record framing.

use std::io::{self, Read, Write};
use symtest_core::{CoreError, CoreResult};

/// Size of the length prefix
pub const HEADER_LEN: usize = 4;

/// Frame reader over a byte stream
///
/// Yields record payloads until the stream ends. A short header or a
/// payload shorter than its declared length ends the sequence; the reader
/// then stays finished and never reads again.
pub struct FrameReader<R> {
    reader: R,
    finished: bool,
    frames_read: usize,
}

impl<R: Read> FrameReader<R> {
    /// Create a new frame reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            finished: false,
            frames_read: 0,
        }
    }

    /// Read the next payload
    ///
    /// # Errors
    ///
    /// Returns `Io` on an underlying read failure (not on truncation)
    pub fn next_frame(&mut self) -> CoreResult<Option<Vec<u8>>> {
        if self.finished {
            return Ok(None);
        }

        let mut header = [0u8; HEADER_LEN];
        let n = self.fill(&mut header)?;
        if n < HEADER_LEN {
            if n > 0 {
                tracing::debug!(bytes = n, "Truncated record header, stopping");
            }
            self.finished = true;
            return Ok(None);
        }

        let len = u32::from_le_bytes(header) as usize;
        let mut payload = Vec::new();
        let read = match (&mut self.reader).take(len as u64).read_to_end(&mut payload) {
            Ok(n) => n,
            Err(e) => {
                self.finished = true;
                return Err(e.into());
            }
        };

        if read < len {
            tracing::debug!(declared = len, available = read, "Truncated record payload, stopping");
            self.finished = true;
            return Ok(None);
        }

        self.frames_read += 1;
        Ok(Some(payload))
    }

    /// Number of complete frames read so far
    #[must_use]
    pub fn frames_read(&self) -> usize {
        self.frames_read
    }

    /// Check whether the end of the stream was reached
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consume and return the inner reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self, buf: &mut [u8]) -> CoreResult<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Err(e.into());
                }
            }
        }
        Ok(filled)
    }
}

/// Frame writer
pub struct FrameWriter<W> {
    writer: W,
}

impl<W: Write> FrameWriter<W> {
    /// Create a new frame writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write one payload with its length prefix
    ///
    /// # Errors
    ///
    /// Returns `Io` on write failure or `Decoding` if the payload does not
    /// fit a 32-bit length
    pub fn write_frame(&mut self, payload: &[u8]) -> CoreResult<()> {
        let len = u32::try_from(payload.len())
            .map_err(|_| CoreError::decoding("record payload exceeds u32 length"))?;
        self.writer.write_all(&len.to_le_bytes())?;
        self.writer.write_all(payload)?;
        Ok(())
    }

    /// Flush the writer
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume and return the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}
