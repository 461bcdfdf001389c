/// Errors that can occur while encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Not enough bytes where a mandatory field or region was expected.
    #[error("truncated message (need {needed} bytes, have {available})")]
    Truncated { needed: usize, available: usize },

    /// A field's value is outside its legal domain.
    #[error("invalid {field}: {value}")]
    InvalidField { field: &'static str, value: u64 },

    /// The header's type field matches no known payload codec.
    ///
    /// Not fatal to a stream: callers skip or log the message and move on.
    #[error("unknown message type {0}")]
    UnknownMessageType(u16),
}

pub type Result<T> = std::result::Result<T, WireError>;

/// Check that `buf` holds at least `needed` bytes.
pub(crate) fn ensure(buf: &[u8], needed: usize) -> Result<()> {
    if buf.len() < needed {
        return Err(WireError::Truncated {
            needed,
            available: buf.len(),
        });
    }
    Ok(())
}
