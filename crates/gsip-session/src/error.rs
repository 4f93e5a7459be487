/// Errors that can occur while pumping a session.
///
/// Only deterministic failures surface here: link I/O trouble and
/// encode-time rejections of outbound messages. Inbound wire noise is
/// handled silently by the decoder.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Link-level error.
    #[error("link error: {0}")]
    Link(#[from] gsip_link::LinkError),

    /// Encode-side wire error.
    #[error("wire error: {0}")]
    Wire(#[from] gsip_wire::WireError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
