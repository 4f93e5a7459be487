//! Incremental, resynchronizing frame decoder.
//!
//! The decoder consumes one byte at a time with O(1) work per byte and no
//! look-ahead. Malformed input never surfaces as an error: the decoder
//! drops the partial frame, re-scans for the header, and keeps going. This
//! is deliberate — GSIP runs over a lossy serial line where noise is
//! normal — so the only externally visible effects of bad input are the
//! per-category drop counters in [`DecoderStats`].

use tracing::{debug, trace};

use crate::crc::crc7;
use crate::encoder::{DELIMITER, HEADER};
use crate::message::{Message, MessageClass, Payload, PayloadShape};
use crate::ops;

/// Fixed maximum payload length on the device side.
pub const MAX_NUMERIC_PAYLOAD: usize = 4;

/// Decoder tuning knobs.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Maximum accepted length for text-shaped payloads (firmware version
    /// reports, host side only). Longer payloads drop the frame.
    pub max_text_payload: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_text_payload: 64,
        }
    }
}

/// Drop and delivery counters, split by failure category.
///
/// Framing and checksum failures behave identically (silent frame drop);
/// they are distinguished here purely for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// Complete messages emitted.
    pub messages: u64,
    /// Frames dropped for header/field/length violations.
    pub framing_errors: u64,
    /// Frames dropped because the recovered CRC7 did not match.
    pub checksum_errors: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Scanning the raw stream for the 4-byte header.
    Seeking,
    /// Between header and class byte.
    Class { awaiting_value: bool },
    /// Between class and operation byte.
    Operation { awaiting_value: bool },
    /// Between operation and the checksum delimiter.
    Payload { awaiting_value: bool },
    /// The next byte is the checksum.
    Checksum,
}

/// Stateful frame parser: byte in, optional [`Message`] out.
///
/// One instance per link; feeding a single instance from multiple threads
/// requires external serialization. Feeding bytes one at a time or in
/// bursts produces identical output.
#[derive(Debug)]
pub struct FrameDecoder {
    state: State,
    /// Sliding window over the last four raw bytes while seeking. A frame
    /// starts whenever the window equals [`HEADER`], so a new header is
    /// found even when it begins on the byte that broke a previous
    /// candidate match.
    window: [u8; 4],
    class: MessageClass,
    operation: u8,
    shape: Option<PayloadShape>,
    /// Numeric payload slots, filled from the highest index downward:
    /// bytes arrive most-significant first, so the filled suffix of this
    /// buffer is the value in little-endian order.
    numeric_buf: [u8; MAX_NUMERIC_PAYLOAD],
    numeric_len: usize,
    text_buf: Vec<u8>,
    config: DecoderConfig,
    stats: DecoderStats,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a decoder with default configuration.
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Create a decoder with explicit configuration.
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            state: State::Seeking,
            window: [0; 4],
            class: MessageClass::Command,
            operation: 0,
            shape: None,
            numeric_buf: [0; MAX_NUMERIC_PAYLOAD],
            numeric_len: 0,
            text_buf: Vec::new(),
            config,
            stats: DecoderStats::default(),
        }
    }

    /// Drop counters and delivery count so far.
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Discard any partial frame and return to header search.
    pub fn reset(&mut self) {
        self.state = State::Seeking;
        self.window = [0; 4];
        self.numeric_buf = [0; MAX_NUMERIC_PAYLOAD];
        self.numeric_len = 0;
        self.text_buf.clear();
        self.shape = None;
    }

    /// Consume one byte; returns a message when it completes a frame.
    pub fn feed(&mut self, byte: u8) -> Option<Message> {
        match self.state {
            State::Seeking => {
                self.push_window(byte);
                None
            }
            State::Class { awaiting_value: false } => {
                self.expect_delimiter(byte, State::Class { awaiting_value: true })
            }
            State::Class { awaiting_value: true } => match MessageClass::from_wire(byte) {
                Some(class) => {
                    self.class = class;
                    self.state = State::Operation { awaiting_value: false };
                    None
                }
                None => self.drop_frame(byte, "invalid class byte"),
            },
            State::Operation { awaiting_value: false } => {
                self.expect_delimiter(byte, State::Operation { awaiting_value: true })
            }
            State::Operation { awaiting_value: true } => {
                self.operation = byte;
                self.shape = ops::shape(self.class, byte);
                self.state = State::Payload { awaiting_value: false };
                None
            }
            State::Payload { awaiting_value: false } => {
                self.expect_delimiter(byte, State::Payload { awaiting_value: true })
            }
            State::Payload { awaiting_value: true } => {
                if byte == DELIMITER {
                    self.state = State::Checksum;
                    return None;
                }
                self.accumulate_payload(byte)
            }
            State::Checksum => {
                let message = self.complete(byte);
                self.reset();
                message
            }
        }
    }

    /// Feed a burst of bytes, collecting every completed message.
    ///
    /// Exactly equivalent to calling [`FrameDecoder::feed`] per byte.
    pub fn feed_slice(&mut self, bytes: &[u8]) -> Vec<Message> {
        bytes.iter().filter_map(|&b| self.feed(b)).collect()
    }

    fn push_window(&mut self, byte: u8) {
        self.window.rotate_left(1);
        self.window[3] = byte;
        if self.window == HEADER {
            self.window = [0; 4];
            self.state = State::Class { awaiting_value: false };
        }
    }

    fn expect_delimiter(&mut self, byte: u8, next: State) -> Option<Message> {
        if byte == DELIMITER {
            self.state = next;
            None
        } else {
            self.drop_frame(byte, "expected field delimiter")
        }
    }

    fn accumulate_payload(&mut self, byte: u8) -> Option<Message> {
        if self.shape == Some(PayloadShape::Text) {
            if self.text_buf.len() >= self.config.max_text_payload {
                return self.drop_frame(byte, "text payload too long");
            }
            self.text_buf.push(byte);
            return None;
        }
        if self.numeric_len == MAX_NUMERIC_PAYLOAD {
            return self.drop_frame(byte, "payload exceeds 4 bytes");
        }
        // First wire byte lands in the last slot: MSB-first transmission
        // leaves the buffer suffix little-endian.
        self.numeric_buf[MAX_NUMERIC_PAYLOAD - 1 - self.numeric_len] = byte;
        self.numeric_len += 1;
        None
    }

    /// Discard the partial frame and re-examine `byte` as a potential
    /// start of header, so a frame beginning on the offending byte is not
    /// missed.
    fn drop_frame(&mut self, byte: u8, reason: &'static str) -> Option<Message> {
        trace!(reason, byte, "dropping partial frame");
        self.stats.framing_errors += 1;
        self.reset();
        self.push_window(byte);
        None
    }

    fn complete(&mut self, received_crc: u8) -> Option<Message> {
        let mut field_bytes = vec![self.class.wire_byte(), self.operation];
        if self.shape == Some(PayloadShape::Text) {
            field_bytes.extend_from_slice(&self.text_buf);
        } else {
            // Transmission order is the reverse of the buffer fill order.
            for i in 0..self.numeric_len {
                field_bytes.push(self.numeric_buf[MAX_NUMERIC_PAYLOAD - 1 - i]);
            }
        }

        let computed = crc7(&field_bytes);
        if computed != received_crc {
            debug!(
                computed,
                received = received_crc,
                operation = self.operation,
                "checksum mismatch, frame dropped"
            );
            self.stats.checksum_errors += 1;
            return None;
        }

        let payload = match self.decode_payload() {
            Some(payload) => payload,
            None => {
                debug!(
                    operation = self.operation,
                    len = self.numeric_len,
                    "payload length does not fit any shape, frame dropped"
                );
                self.stats.framing_errors += 1;
                return None;
            }
        };

        self.stats.messages += 1;
        Some(Message::assemble(self.class, self.operation, payload))
    }

    fn decode_payload(&self) -> Option<Payload> {
        let shape = match self.shape {
            Some(shape) => shape,
            // Unknown operations are still delivered (the dispatch boundary
            // decides what to do with them); type the payload by its
            // received width.
            None => match self.numeric_len {
                0 => PayloadShape::Empty,
                1 => PayloadShape::U8,
                2 => PayloadShape::U16,
                4 => PayloadShape::U32,
                _ => return None,
            },
        };

        if let Some(expected_len) = shape.wire_len() {
            if expected_len != self.numeric_len {
                return None;
            }
        }

        let buf = &self.numeric_buf;
        Some(match shape {
            PayloadShape::Empty => Payload::None,
            PayloadShape::U8 => Payload::U8(buf[3]),
            PayloadShape::U16 => Payload::U16(u16::from_le_bytes([buf[2], buf[3]])),
            PayloadShape::U32 => Payload::U32(u32::from_le_bytes(*buf)),
            PayloadShape::F32 => Payload::F32(f32::from_le_bytes(*buf)),
            PayloadShape::Text => {
                Payload::Text(String::from_utf8(self.text_buf.clone()).ok()?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Payload;
    use crate::ops::{command, telemetry};

    fn frame(msg: &Message) -> Vec<u8> {
        msg.encode_to_vec().unwrap()
    }

    #[test]
    fn roundtrip_empty_payload() {
        let msg = Message::command(command::READ_FREQUENCY).unwrap();
        let mut dec = FrameDecoder::new();
        let out = dec.feed_slice(&frame(&msg));
        assert_eq!(out, vec![msg]);
    }

    #[test]
    fn roundtrip_all_shapes() {
        let messages = [
            Message::new(MessageClass::Command, command::WRITE_FREQUENCY, Payload::U32(9_999_999))
                .unwrap(),
            Message::new(
                MessageClass::Command,
                command::WRITE_PROPORTIONAL_GAIN,
                Payload::F32(0.25),
            )
            .unwrap(),
            Message::new(MessageClass::Command, command::WRITE_FILTER_WINDOW, Payload::U16(512))
                .unwrap(),
            Message::new(MessageClass::Command, command::WRITE_FILTER_ENABLED, Payload::U8(1))
                .unwrap(),
            Message::new(
                MessageClass::Telemetry,
                telemetry::FIRMWARE_VERSION,
                Payload::Text("GPSDO-Alpha Ver. [0.9.1]".to_string()),
            )
            .unwrap(),
        ];

        let mut dec = FrameDecoder::new();
        for msg in &messages {
            assert_eq!(dec.feed_slice(&frame(msg)), vec![msg.clone()]);
        }
        assert_eq!(dec.stats().messages, messages.len() as u64);
        assert_eq!(dec.stats().framing_errors, 0);
    }

    #[test]
    fn byte_at_a_time_matches_burst() {
        let msg =
            Message::new(MessageClass::Telemetry, telemetry::COUNTER, Payload::U32(86_400)).unwrap();

        // Exercise the window and mid-frame state across feed boundaries:
        // noise, a header candidate that breaks on its last byte, a frame,
        // a frame that breaks after its operation byte, and a final clean
        // frame.
        let mut wire = vec![0xDE, 0xAD, 0x55, 0x55, 0xAA, 0x00];
        wire.extend_from_slice(&frame(&msg));
        wire.extend_from_slice(&[0x55, 0x55, 0xAA, 0xAA, DELIMITER, 0x00, DELIMITER, 0x01, 0xFF]);
        wire.extend_from_slice(&frame(&msg));

        let mut burst = FrameDecoder::new();
        let from_burst = burst.feed_slice(&wire);

        let mut trickle = FrameDecoder::new();
        let mut from_trickle = Vec::new();
        for &b in &wire {
            from_trickle.extend(trickle.feed(b));
        }

        assert_eq!(from_burst, from_trickle);
        assert_eq!(burst.stats(), trickle.stats());
        assert_eq!(from_burst.len(), 2);
        assert_eq!(burst.stats().framing_errors, 1);
    }

    #[test]
    fn resync_past_corrupted_header_prefix() {
        let msg = Message::command(command::READ_VERSION).unwrap();
        // A failed header candidate immediately followed by the real one.
        let mut wire = vec![0x55, 0xAA];
        wire.extend_from_slice(&frame(&msg));

        let mut dec = FrameDecoder::new();
        assert_eq!(dec.feed_slice(&wire), vec![msg]);
    }

    #[test]
    fn resync_through_a_run_of_header_bytes() {
        let msg = Message::command(command::READ_COUNTER).unwrap();
        // 55 55 55 AA AA ... : the header starts one byte into the run.
        let mut wire = vec![0x55];
        wire.extend_from_slice(&frame(&msg));

        let mut dec = FrameDecoder::new();
        assert_eq!(dec.feed_slice(&wire), vec![msg]);
    }

    #[test]
    fn header_restart_inside_broken_frame() {
        let good = Message::command(command::READ_FREQUENCY).unwrap();
        // Header, then garbage where the class delimiter belongs, then a
        // complete frame starting at the byte that caused the reset.
        let mut wire = vec![0x55, 0x55, 0xAA, 0xAA];
        wire.extend_from_slice(&frame(&good));

        let mut dec = FrameDecoder::new();
        let out = dec.feed_slice(&wire);
        assert_eq!(out, vec![good]);
        assert_eq!(dec.stats().framing_errors, 1);
    }

    #[test]
    fn payload_overflow_drops_frame_and_recovers() {
        let mut wire = vec![0x55, 0x55, 0xAA, 0xAA, DELIMITER, 0x00, DELIMITER, 0x02, DELIMITER];
        wire.extend_from_slice(&[1, 2, 3, 4, 5]); // five raw payload bytes
        let good = Message::command(command::READ_FREQUENCY).unwrap();
        wire.extend_from_slice(&frame(&good));

        let mut dec = FrameDecoder::new();
        let out = dec.feed_slice(&wire);
        assert_eq!(out, vec![good]);
        assert_eq!(dec.stats().framing_errors, 1);
    }

    #[test]
    fn checksum_mismatch_drops_frame() {
        let msg = Message::new(
            MessageClass::Command,
            command::WRITE_DAC,
            Payload::U32(0x0102_0304),
        )
        .unwrap();
        let mut wire = frame(&msg);
        let last = wire.len() - 1;
        wire[last] ^= 0x01;

        let mut dec = FrameDecoder::new();
        assert!(dec.feed_slice(&wire).is_empty());
        assert_eq!(dec.stats().checksum_errors, 1);

        // The decoder stays usable.
        assert_eq!(dec.feed_slice(&frame(&msg)), vec![msg]);
    }

    #[test]
    fn two_back_to_back_frames() {
        let first = Message::new(
            MessageClass::Command,
            command::WRITE_FREQUENCY,
            Payload::U32(10_000_000),
        )
        .unwrap();
        let second = Message::command(command::READ_COUNTER).unwrap();

        let mut wire = frame(&first);
        wire.extend_from_slice(&frame(&second));

        let mut dec = FrameDecoder::new();
        assert_eq!(dec.feed_slice(&wire), vec![first, second]);
    }

    #[test]
    fn leading_noise_is_skipped_silently() {
        let msg = Message::command(command::READ_VERSION).unwrap();
        let mut wire = vec![0x00, 0xFF, 0x13, 0x37, 0xAA, 0x55];
        wire.extend_from_slice(&frame(&msg));

        let mut dec = FrameDecoder::new();
        assert_eq!(dec.feed_slice(&wire), vec![msg]);
        // Noise before any header match is not a framing error.
        assert_eq!(dec.stats().framing_errors, 0);
    }

    #[test]
    fn unknown_operation_is_still_delivered() {
        // 0x30 is outside the command table; two payload bytes arrive.
        let fields = [0x00, 0x30, 0xBE, 0xEF];
        let mut wire = vec![0x55, 0x55, 0xAA, 0xAA, DELIMITER, 0x00, DELIMITER, 0x30, DELIMITER];
        wire.extend_from_slice(&[0xBE, 0xEF]);
        wire.push(DELIMITER);
        wire.push(crc7(&fields));

        let mut dec = FrameDecoder::new();
        let out = dec.feed_slice(&wire);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].operation, 0x30);
        assert_eq!(out[0].operation_name(), "Unknown");
        // MSB first on the wire: 0xBE then 0xEF.
        assert_eq!(out[0].payload, Payload::U16(0xBEEF));
    }

    #[test]
    fn known_operation_with_wrong_payload_length_is_dropped() {
        // WriteFrequency declares a 4-byte payload; send two bytes with a
        // valid checksum so only the length check can reject it.
        let fields = [0x00, command::WRITE_FREQUENCY, 0x01, 0x02];
        let mut wire = vec![
            0x55,
            0x55,
            0xAA,
            0xAA,
            DELIMITER,
            0x00,
            DELIMITER,
            command::WRITE_FREQUENCY,
            DELIMITER,
        ];
        wire.extend_from_slice(&[0x01, 0x02]);
        wire.push(DELIMITER);
        wire.push(crc7(&fields));

        let mut dec = FrameDecoder::new();
        assert!(dec.feed_slice(&wire).is_empty());
        assert_eq!(dec.stats().framing_errors, 1);
    }

    #[test]
    fn oversized_text_payload_is_dropped() {
        let long = "v".repeat(65);
        let msg = Message::new(
            MessageClass::Telemetry,
            telemetry::FIRMWARE_VERSION,
            Payload::Text(long),
        )
        .unwrap();

        let mut dec = FrameDecoder::new();
        assert!(dec.feed_slice(&frame(&msg)).is_empty());
        assert_eq!(dec.stats().framing_errors, 1);

        let short = Message::new(
            MessageClass::Telemetry,
            telemetry::FIRMWARE_VERSION,
            Payload::Text("GPSDO-Alpha Ver. [1.0.0]".to_string()),
        )
        .unwrap();
        assert_eq!(dec.feed_slice(&frame(&short)), vec![short]);
    }

    #[test]
    fn decoded_checksum_matches_crc_of_fields() {
        let msg = Message::command(command::READ_FREQUENCY).unwrap();
        let mut dec = FrameDecoder::new();
        let out = dec.feed_slice(&frame(&msg));
        assert_eq!(out[0].checksum, crc7(&[0x00, command::READ_FREQUENCY]));
    }
}
