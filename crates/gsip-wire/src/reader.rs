//! Blocking message reader over any `Read` stream.

use std::io::{ErrorKind, Read};

use crate::decoder::{DecoderConfig, DecoderStats, FrameDecoder};
use crate::error::{Result, WireError};
use crate::message::Message;

const READ_CHUNK_SIZE: usize = 256;

/// Reads complete messages from any `Read` stream.
///
/// Partial frames and wire noise are handled internally by the embedded
/// [`FrameDecoder`] — callers always get complete, checksum-verified
/// messages.
pub struct MessageReader<T> {
    inner: T,
    decoder: FrameDecoder,
    pending: Vec<Message>,
}

impl<T: Read> MessageReader<T> {
    /// Create a message reader with default decoder configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, DecoderConfig::default())
    }

    /// Create a message reader with explicit decoder configuration.
    pub fn with_config(inner: T, config: DecoderConfig) -> Self {
        Self {
            inner,
            decoder: FrameDecoder::with_config(config),
            pending: Vec::new(),
        }
    }

    /// Read the next complete message (blocking).
    ///
    /// Returns `Err(WireError::LinkClosed)` when EOF is reached.
    pub fn read_message(&mut self) -> Result<Message> {
        loop {
            if !self.pending.is_empty() {
                return Ok(self.pending.remove(0));
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(WireError::Io(err)),
            };

            if read == 0 {
                return Err(WireError::LinkClosed);
            }

            self.pending = self.decoder.feed_slice(&chunk[..read]);
        }
    }

    /// Decoder drop/delivery counters.
    pub fn stats(&self) -> DecoderStats {
        self.decoder.stats()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::message::{MessageClass, Payload};
    use crate::ops::{command, telemetry};

    #[test]
    fn read_single_message() {
        let msg = Message::command(command::READ_VERSION).unwrap();
        let mut reader = MessageReader::new(Cursor::new(msg.encode_to_vec().unwrap()));
        assert_eq!(reader.read_message().unwrap(), msg);
    }

    #[test]
    fn read_multiple_messages() {
        let first = Message::new(
            MessageClass::Telemetry,
            telemetry::FREQUENCY,
            Payload::U32(10_000_001),
        )
        .unwrap();
        let second =
            Message::new(MessageClass::Telemetry, telemetry::FILTER_ENABLED, Payload::U8(1))
                .unwrap();

        let mut wire = first.encode_to_vec().unwrap();
        wire.extend_from_slice(&second.encode_to_vec().unwrap());

        let mut reader = MessageReader::new(Cursor::new(wire));
        assert_eq!(reader.read_message().unwrap(), first);
        assert_eq!(reader.read_message().unwrap(), second);
        assert!(matches!(
            reader.read_message().unwrap_err(),
            WireError::LinkClosed
        ));
    }

    #[test]
    fn byte_by_byte_source() {
        let msg = Message::command(command::READ_COUNTER).unwrap();
        let source = ByteByByteReader {
            bytes: msg.encode_to_vec().unwrap(),
            pos: 0,
        };
        let mut reader = MessageReader::new(source);
        assert_eq!(reader.read_message().unwrap(), msg);
    }

    #[test]
    fn eof_with_partial_frame_is_link_closed() {
        let msg = Message::command(command::READ_FREQUENCY).unwrap();
        let mut wire = msg.encode_to_vec().unwrap();
        wire.truncate(wire.len() - 2);

        let mut reader = MessageReader::new(Cursor::new(wire));
        assert!(matches!(
            reader.read_message().unwrap_err(),
            WireError::LinkClosed
        ));
    }

    #[test]
    fn interrupted_read_retries() {
        let msg = Message::command(command::READ_VERSION).unwrap();
        let source = InterruptedThenData {
            interrupted: false,
            bytes: msg.encode_to_vec().unwrap(),
            pos: 0,
        };
        let mut reader = MessageReader::new(source);
        assert_eq!(reader.read_message().unwrap(), msg);
    }

    #[test]
    fn noise_between_frames_is_absorbed() {
        let msg = Message::command(command::READ_VERSION).unwrap();
        let mut wire = vec![0xDE, 0xAD];
        wire.extend_from_slice(&msg.encode_to_vec().unwrap());
        wire.extend_from_slice(&[0xBE, 0xEF]);
        wire.extend_from_slice(&msg.encode_to_vec().unwrap());

        let mut reader = MessageReader::new(Cursor::new(wire));
        assert_eq!(reader.read_message().unwrap(), msg);
        assert_eq!(reader.read_message().unwrap(), msg);
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedThenData {
        interrupted: bool,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let n = (self.bytes.len() - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }
}
