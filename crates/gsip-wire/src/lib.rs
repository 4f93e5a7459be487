//! GSIP wire protocol: framing, checksum, and the shared message model.
//!
//! GSIP carries commands and telemetry between a host and a GPSDO
//! (GPS-disciplined oscillator) controller over an asynchronous serial
//! link. Every message is framed as:
//!
//! ```text
//! 55 55 AA AA | <class:1> | <op:1> | <payload:0..4, MSB first> | <crc7:1>
//! ```
//!
//! where `|` is the literal byte 0x7C. The payload byte count and
//! interpretation are not carried on the wire; both ends derive them from
//! the `(class, operation)` pair via the table in [`ops`].
//!
//! The decoder is incremental and resynchronizing: it consumes one byte at
//! a time, never looks ahead, and silently re-scans for the header past any
//! malformed or corrupted data.

pub mod crc;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod message;
pub mod ops;
pub mod reader;
pub mod writer;

pub use crc::crc7;
pub use decoder::{DecoderConfig, DecoderStats, FrameDecoder};
pub use encoder::{encode_message, DELIMITER, HEADER};
pub use error::{Result, WireError};
pub use message::{Message, MessageClass, Payload, PayloadShape};
pub use reader::MessageReader;
pub use writer::MessageWriter;
