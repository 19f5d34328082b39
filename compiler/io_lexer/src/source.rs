//! Character sources the lexer reads from.
//!
//! A source yields one character at a time and signals either end of input
//! or a hard read error. String input uses `std::str::Chars` directly;
//! byte streams go through [`ReaderSource`], which decodes UTF-8.

use std::io::{BufRead, ErrorKind};

/// Error reading from a character source.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The underlying reader failed.
    #[error("read error: {0}")]
    Io(String),
    /// The byte stream is not valid UTF-8.
    #[error("invalid UTF-8 at byte {offset}")]
    InvalidUtf8 { offset: u64 },
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Io(err.to_string())
    }
}

/// Something the lexer can read characters from.
pub trait CharSource {
    /// Read the next character.
    ///
    /// `Ok(None)` is end of input. After an error or end of input the
    /// lexer does not call this again.
    fn next_char(&mut self) -> Result<Option<char>, SourceError>;
}

impl CharSource for std::str::Chars<'_> {
    #[inline]
    fn next_char(&mut self) -> Result<Option<char>, SourceError> {
        Ok(self.next())
    }
}

/// UTF-8 decoding adapter over any buffered reader.
pub struct ReaderSource<R> {
    inner: R,
    offset: u64,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        ReaderSource { inner, offset: 0 }
    }

    fn read_byte(&mut self) -> Result<Option<u8>, SourceError> {
        loop {
            let byte = match self.inner.fill_buf() {
                Ok(buf) => buf.first().copied(),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if byte.is_some() {
                self.inner.consume(1);
                self.offset += 1;
            }
            return Ok(byte);
        }
    }
}

/// Total length of a UTF-8 sequence from its leading byte.
fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

impl<R: BufRead> CharSource for ReaderSource<R> {
    fn next_char(&mut self) -> Result<Option<char>, SourceError> {
        let start = self.offset;
        let Some(lead) = self.read_byte()? else {
            return Ok(None);
        };
        let invalid = || SourceError::InvalidUtf8 { offset: start };
        let width = utf8_width(lead).ok_or_else(invalid)?;

        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            *slot = self.read_byte()?.ok_or_else(invalid)?;
        }
        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn drain(mut source: impl CharSource) -> Result<String, SourceError> {
        let mut out = String::new();
        while let Some(c) = source.next_char()? {
            out.push(c);
        }
        Ok(out)
    }

    #[test]
    fn reader_decodes_multibyte() {
        let text = "añ€😀";
        let source = ReaderSource::new(Cursor::new(text.as_bytes().to_vec()));
        assert_eq!(drain(source), Ok(text.to_string()));
    }

    #[test]
    fn reader_reports_invalid_utf8_offset() {
        let source = ReaderSource::new(Cursor::new(vec![b'a', b'b', 0xFF]));
        assert_eq!(drain(source), Err(SourceError::InvalidUtf8 { offset: 2 }));
    }

    #[test]
    fn reader_reports_truncated_sequence() {
        let source = ReaderSource::new(Cursor::new(vec![0xE2, 0x82]));
        assert_eq!(drain(source), Err(SourceError::InvalidUtf8 { offset: 0 }));
    }

    #[test]
    fn chars_is_a_source() {
        assert_eq!(drain("x y".chars()), Ok("x y".to_string()));
    }
}
