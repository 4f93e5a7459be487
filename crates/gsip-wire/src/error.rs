/// Errors that can occur while encoding or reading GSIP messages.
///
/// Decode-side framing and checksum failures are deliberately absent: the
/// decoder recovers from wire noise by resynchronizing and never surfaces
/// it (see [`crate::decoder::DecoderStats`] for the counters).
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The (class, operation) pair is not in the payload-shape table.
    #[error("unknown operation 0x{operation:02X} for class {class:?}")]
    InvalidOperation {
        class: crate::message::MessageClass,
        operation: u8,
    },

    /// The payload variant does not match the shape the table declares.
    #[error("payload {got:?} does not match declared shape {expected:?}")]
    PayloadShapeMismatch {
        expected: crate::message::PayloadShape,
        got: crate::message::PayloadShape,
    },

    /// A payload wire byte equals the field delimiter 0x7C.
    ///
    /// The wire format has no escaping, so such a frame could not be
    /// decoded back; encoding refuses to produce it.
    #[error("payload contains the field delimiter byte 0x7C at offset {offset}")]
    DelimiterInPayload { offset: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("wire I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The byte source ended before a complete frame was recovered.
    #[error("link closed (incomplete frame)")]
    LinkClosed,
}

pub type Result<T> = std::result::Result<T, WireError>;
