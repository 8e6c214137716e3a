//! IRC line codec
//!
//! Frames a byte stream into command lines on `\r\n` and terminates
//! outgoing replies with `\r\n`. Bytes after the last `\r\n` stay in the
//! read buffer until the next read completes the line, so a command split
//! across reads is reassembled before it is decoded.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::message::Reply;

/// Maximum length of a pending line, excluding `\r\n`
pub const MAX_LINE_LENGTH: usize = 8191;

/// Codec error: an oversized line or an I/O error.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("line exceeds maximum length ({MAX_LINE_LENGTH} bytes)")]
    LineTooLong,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A tokio codec that frames IRC lines on `\r\n` boundaries.
///
/// Decoded lines are text with invalid UTF-8 sequences dropped. Lines
/// are not trimmed or filtered here; blank lines are the parser's call.
#[derive(Debug, Default)]
pub struct LineCodec {
    /// Offset from which to resume the `\r\n` scan
    next_index: usize,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Decode bytes as UTF-8, silently dropping invalid sequences
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let crlf_pos = src[self.next_index..]
            .windows(2)
            .position(|w| w == b"\r\n")
            .map(|pos| pos + self.next_index);

        match crlf_pos {
            Some(pos) => {
                self.next_index = 0;
                if pos > MAX_LINE_LENGTH {
                    return Err(CodecError::LineTooLong);
                }
                let line = src.split_to(pos);
                src.advance(2);
                Ok(Some(decode_lossy(&line)))
            }
            None => {
                // A trailing '\r' may be completed by the next read.
                if src.len() > MAX_LINE_LENGTH + usize::from(src.ends_with(b"\r")) {
                    return Err(CodecError::LineTooLong);
                }
                self.next_index = src.len().saturating_sub(1);
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None if src.is_empty() => Ok(None),
            None => {
                // Unterminated final fragment: still a command.
                self.next_index = 0;
                let line = src.split();
                Ok(Some(decode_lossy(&line)))
            }
        }
    }
}

impl Encoder<Reply> for LineCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Reply, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let wire = item.to_string();
        dst.reserve(wire.len() + 2);
        dst.put_slice(wire.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}
