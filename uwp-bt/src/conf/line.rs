//! Line reader over an [`embedded_io::Read`] file handle.

use embedded_io::{Error as _, Read};

use super::MAX_LINE_LEN;

/// Reads newline-terminated lines into a fixed buffer, one byte at a time.
///
/// Lines longer than [`MAX_LINE_LEN`] are cut; the tail comes back as the
/// next line. A final line without a newline is still returned.
pub struct LineReader<R> {
    reader: R,
    buf: [u8; MAX_LINE_LEN + 1],
}

impl<R: Read> LineReader<R> {
    /// Wrap an open file.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: [0; MAX_LINE_LEN + 1],
        }
    }

    /// Read the next line, newline included if there was one.
    ///
    /// Returns `None` when nothing could be read: end of file, or a read error
    /// before the first byte. A read error later in the line ends the line.
    pub fn next_line(&mut self) -> Option<&str> {
        let mut len = 0;

        while len < MAX_LINE_LEN {
            let mut byte = [0u8; 1];
            match self.reader.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    self.buf[len] = byte[0];
                    len += 1;
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                Err(e) => {
                    warn!("conf read error after {} bytes: {:?}", len, e.kind());
                    break;
                }
            }
        }

        if len == 0 {
            return None;
        }
        if len == MAX_LINE_LEN && self.buf[len - 1] != b'\n' {
            debug!("conf line truncated at {} bytes", MAX_LINE_LEN);
        }

        let line = &self.buf[..len];
        match core::str::from_utf8(line) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!("conf line is not UTF-8, keeping first {} bytes", e.valid_up_to());
                core::str::from_utf8(&line[..e.valid_up_to()]).ok()
            }
        }
    }
}
