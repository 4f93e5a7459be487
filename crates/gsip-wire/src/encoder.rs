//! Frame encoder: serialize a [`Message`] into the exact byte layout the
//! decoder expects.

use bytes::{BufMut, BytesMut};

use crate::crc::crc7;
use crate::error::{Result, WireError};
use crate::message::Message;
use crate::ops;

/// Frame header bytes, in transmission order.
pub const HEADER: [u8; 4] = [0x55, 0x55, 0xAA, 0xAA];

/// Field delimiter byte (`|`).
pub const DELIMITER: u8 = 0x7C;

/// Wire overhead around the payload: header, four delimiters around the
/// class/operation/payload fields, class, operation, and checksum bytes.
pub const FRAME_OVERHEAD: usize = HEADER.len() + 4 + 3;

/// Encode a message into the wire format.
///
/// Wire format:
/// ```text
/// 55 55 AA AA | <class:1> | <op:1> | <payload:0..n, MSB first> | <crc7:1>
/// ```
/// with `|` the literal byte 0x7C and no delimiter after the checksum.
/// The checksum is the CRC7 over class byte, operation byte, and payload
/// bytes, in that order, delimiters excluded.
///
/// Unlike the decode path, failures here are deterministic application
/// input and are surfaced: unknown operation codes, payloads that disagree
/// with the shape table, and payload bytes that collide with the delimiter
/// (the format has no escaping) are all rejected.
pub fn encode_message(msg: &Message, dst: &mut BytesMut) -> Result<()> {
    let expected = ops::shape(msg.class, msg.operation).ok_or(WireError::InvalidOperation {
        class: msg.class,
        operation: msg.operation,
    })?;
    if msg.payload.shape() != expected {
        return Err(WireError::PayloadShapeMismatch {
            expected,
            got: msg.payload.shape(),
        });
    }

    let payload = msg.payload.wire_bytes();
    if let Some(offset) = payload.iter().position(|&b| b == DELIMITER) {
        return Err(WireError::DelimiterInPayload { offset });
    }

    let class = msg.class.wire_byte();
    let mut field_bytes = Vec::with_capacity(2 + payload.len());
    field_bytes.push(class);
    field_bytes.push(msg.operation);
    field_bytes.extend_from_slice(&payload);

    dst.reserve(FRAME_OVERHEAD + payload.len());
    dst.put_slice(&HEADER);
    dst.put_u8(DELIMITER);
    dst.put_u8(class);
    dst.put_u8(DELIMITER);
    dst.put_u8(msg.operation);
    dst.put_u8(DELIMITER);
    dst.put_slice(&payload);
    dst.put_u8(DELIMITER);
    dst.put_u8(crc7(&field_bytes));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MessageClass, Payload};
    use crate::ops::{command, telemetry};

    #[test]
    fn empty_payload_frame_layout() {
        let msg = Message::command(command::READ_FREQUENCY).unwrap();
        let mut buf = BytesMut::new();
        encode_message(&msg, &mut buf).unwrap();

        assert_eq!(
            buf.as_ref(),
            [
                0x55, 0x55, 0xAA, 0xAA, // header
                0x7C, 0x00, // class
                0x7C, 0x01, // operation
                0x7C, // empty payload
                0x7C, crc7(&[0x00, 0x01]), // checksum, no trailing delimiter
            ]
        );
    }

    #[test]
    fn u32_payload_is_msb_first() {
        let msg = Message::new(
            MessageClass::Command,
            command::WRITE_FREQUENCY,
            Payload::U32(0x0098_9680), // 10 MHz
        )
        .unwrap();
        let mut buf = BytesMut::new();
        encode_message(&msg, &mut buf).unwrap();

        // Payload sits between the third and fourth delimiters.
        assert_eq!(&buf[9..13], [0x00, 0x98, 0x96, 0x80]);
        assert_eq!(buf[13], DELIMITER);
        assert_eq!(buf.len(), FRAME_OVERHEAD + 4);
    }

    #[test]
    fn text_payload_is_raw_utf8() {
        let version = "GPSDO-Alpha Ver. [1.2.3]";
        let msg = Message::new(
            MessageClass::Telemetry,
            telemetry::FIRMWARE_VERSION,
            Payload::Text(version.to_string()),
        )
        .unwrap();
        let buf = msg.encode_to_vec().unwrap();

        assert_eq!(&buf[9..9 + version.len()], version.as_bytes());
        assert_eq!(buf.len(), FRAME_OVERHEAD + version.len());
    }

    #[test]
    fn unknown_operation_is_surfaced() {
        // Bypass Message::new validation by assembling directly.
        let msg = Message::assemble(MessageClass::Command, 0x7F, Payload::None);
        let mut buf = BytesMut::new();
        let err = encode_message(&msg, &mut buf).unwrap_err();
        assert!(matches!(err, WireError::InvalidOperation { operation: 0x7F, .. }));
        assert!(buf.is_empty());
    }

    #[test]
    fn delimiter_collision_is_rejected() {
        // 0x0098967C has 0x7C as its least-significant byte.
        let msg = Message::new(
            MessageClass::Command,
            command::WRITE_FREQUENCY,
            Payload::U32(0x0098_967C),
        )
        .unwrap();
        let err = msg.encode_to_vec().unwrap_err();
        assert!(matches!(err, WireError::DelimiterInPayload { offset: 3 }));
    }
}
