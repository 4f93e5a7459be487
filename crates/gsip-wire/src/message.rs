//! The message model shared by the decoder and encoder.

use serde::Serialize;

use crate::crc::crc7;
use crate::error::{Result, WireError};
use crate::ops;

/// Whether a message is a request/control frame or a data-report frame.
///
/// The operation-code space is reused per class; see [`crate::ops`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MessageClass {
    /// Host → device request or control message.
    Command,
    /// Device → host data report.
    Telemetry,
}

impl MessageClass {
    /// The byte this class is encoded as on the wire.
    pub fn wire_byte(self) -> u8 {
        match self {
            MessageClass::Command => 0x00,
            MessageClass::Telemetry => 0x01,
        }
    }

    /// Parse a wire class byte. Anything but 0x00/0x01 is not a class.
    pub fn from_wire(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(MessageClass::Command),
            0x01 => Some(MessageClass::Telemetry),
            _ => None,
        }
    }
}

/// The wire shape of a payload: byte count and interpretation.
///
/// Determined solely by the (class, operation) pair, never carried
/// explicitly in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PayloadShape {
    /// No payload bytes.
    Empty,
    /// One byte, unsigned.
    U8,
    /// Two bytes, unsigned, MSB first on the wire.
    U16,
    /// Four bytes, unsigned, MSB first on the wire.
    U32,
    /// Four bytes, IEEE-754 single, MSB first on the wire.
    F32,
    /// UTF-8 text of variable length (firmware version reports).
    Text,
}

impl PayloadShape {
    /// Fixed wire length in bytes, or `None` for [`PayloadShape::Text`].
    pub fn wire_len(self) -> Option<usize> {
        match self {
            PayloadShape::Empty => Some(0),
            PayloadShape::U8 => Some(1),
            PayloadShape::U16 => Some(2),
            PayloadShape::U32 | PayloadShape::F32 => Some(4),
            PayloadShape::Text => None,
        }
    }
}

/// A message payload, sized to a fixed 4-byte maximum on the device side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Payload {
    None,
    U8(u8),
    U16(u16),
    U32(u32),
    F32(f32),
    Text(String),
}

impl Payload {
    /// The shape this payload value has.
    pub fn shape(&self) -> PayloadShape {
        match self {
            Payload::None => PayloadShape::Empty,
            Payload::U8(_) => PayloadShape::U8,
            Payload::U16(_) => PayloadShape::U16,
            Payload::U32(_) => PayloadShape::U32,
            Payload::F32(_) => PayloadShape::F32,
            Payload::Text(_) => PayloadShape::Text,
        }
    }

    /// Payload bytes in transmission order (most-significant byte first
    /// for the numeric variants, raw UTF-8 for text).
    pub fn wire_bytes(&self) -> Vec<u8> {
        match self {
            Payload::None => Vec::new(),
            Payload::U8(v) => vec![*v],
            Payload::U16(v) => v.to_be_bytes().to_vec(),
            Payload::U32(v) => v.to_be_bytes().to_vec(),
            Payload::F32(v) => v.to_be_bytes().to_vec(),
            Payload::Text(s) => s.as_bytes().to_vec(),
        }
    }
}

/// One complete GSIP message.
///
/// `checksum` always holds the CRC7 over the class byte, operation byte,
/// and payload bytes in transmission order: [`Message::new`] computes it
/// and the decoder only emits frames whose recovered checksum matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub class: MessageClass,
    pub operation: u8,
    pub payload: Payload,
    pub checksum: u8,
}

impl Message {
    /// Build a message, validating the payload against the shape table
    /// and computing its checksum.
    ///
    /// Fails with [`WireError::InvalidOperation`] for an operation code
    /// outside the table and [`WireError::PayloadShapeMismatch`] when the
    /// payload variant disagrees with the declared shape.
    pub fn new(class: MessageClass, operation: u8, payload: Payload) -> Result<Self> {
        let expected = ops::shape(class, operation)
            .ok_or(WireError::InvalidOperation { class, operation })?;
        if payload.shape() != expected {
            return Err(WireError::PayloadShapeMismatch {
                expected,
                got: payload.shape(),
            });
        }
        Ok(Self::assemble(class, operation, payload))
    }

    /// A command with no payload (every `Read*` operation).
    pub fn command(operation: u8) -> Result<Self> {
        Self::new(MessageClass::Command, operation, Payload::None)
    }

    /// Build a message from already-validated parts, computing the checksum.
    ///
    /// Used by the decoder for operation codes outside the table, which
    /// are still delivered to the dispatch boundary.
    pub(crate) fn assemble(class: MessageClass, operation: u8, payload: Payload) -> Self {
        let mut field_bytes = vec![class.wire_byte(), operation];
        field_bytes.extend_from_slice(&payload.wire_bytes());
        let checksum = crc7(&field_bytes);
        Self {
            class,
            operation,
            payload,
            checksum,
        }
    }

    /// Human-readable operation name, or `"Unknown"`.
    pub fn operation_name(&self) -> &'static str {
        ops::name(self.class, self.operation)
    }

    /// Encode this message into a fresh byte vector.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let mut buf = bytes::BytesMut::new();
        crate::encoder::encode_message(self, &mut buf)?;
        Ok(buf.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_wire_bytes_roundtrip() {
        for class in [MessageClass::Command, MessageClass::Telemetry] {
            assert_eq!(MessageClass::from_wire(class.wire_byte()), Some(class));
        }
        assert_eq!(MessageClass::from_wire(0x02), None);
        assert_eq!(MessageClass::from_wire(b'|'), None);
    }

    #[test]
    fn numeric_payloads_are_msb_first() {
        assert_eq!(Payload::U32(0x1234_5678).wire_bytes(), [0x12, 0x34, 0x56, 0x78]);
        assert_eq!(Payload::U16(0xBEEF).wire_bytes(), [0xBE, 0xEF]);
        assert_eq!(Payload::U8(0x7F).wire_bytes(), [0x7F]);
        assert_eq!(Payload::None.wire_bytes(), Vec::<u8>::new());
    }

    #[test]
    fn new_rejects_unknown_operation() {
        let err = Message::new(MessageClass::Command, 0x40, Payload::None).unwrap_err();
        assert!(matches!(err, WireError::InvalidOperation { operation: 0x40, .. }));
    }

    #[test]
    fn new_rejects_shape_mismatch() {
        let err = Message::new(
            MessageClass::Command,
            crate::ops::command::WRITE_FREQUENCY,
            Payload::U16(7),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            WireError::PayloadShapeMismatch {
                expected: PayloadShape::U32,
                got: PayloadShape::U16,
            }
        ));
    }

    #[test]
    fn checksum_covers_fields_in_transmission_order() {
        let msg = Message::command(crate::ops::command::READ_FREQUENCY).unwrap();
        assert_eq!(msg.checksum, crate::crc::crc7(&[0x00, 0x01]));

        let msg = Message::new(
            MessageClass::Command,
            crate::ops::command::WRITE_FREQUENCY,
            Payload::U32(10_000_000),
        )
        .unwrap();
        let mut bytes = vec![0x00, 0x02];
        bytes.extend_from_slice(&10_000_000u32.to_be_bytes());
        assert_eq!(msg.checksum, crate::crc::crc7(&bytes));
    }
}
