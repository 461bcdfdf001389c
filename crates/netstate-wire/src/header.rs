//! Fixed outer header framing.

use bytes::{BufMut, BytesMut};

use crate::error::{ensure, Result};

/// Outer header: length (4) + type (2) + flags (2) + sequence (4) + port id (4).
pub const HEADER_SIZE: usize = 16;

/// Messages in a stream are aligned to 4-byte boundaries.
pub const ALIGN: usize = 4;

/// Round a message length up to the wire alignment unit.
pub const fn align_length(length: usize) -> usize {
    (length + ALIGN - 1) & !(ALIGN - 1)
}

/// The fixed header preceding every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    /// Total message length in bytes, header included.
    pub total_length: u32,
    /// Payload type; the dispatch layer routes on this.
    pub message_type: u16,
    /// Request/response flags.
    pub flags: u16,
    /// Sequence number, echoed back by the kernel in replies.
    pub sequence: u32,
    /// Port id of the destination socket (0 addresses the kernel).
    pub port_id: u32,
}

impl MessageHeader {
    /// Parse a header off the front of `buf`, returning it together with the
    /// bytes that follow it.
    pub fn parse(buf: &[u8]) -> Result<(MessageHeader, &[u8])> {
        ensure(buf, HEADER_SIZE)?;
        let header = MessageHeader {
            total_length: u32::from_le_bytes(buf[0..4].try_into().unwrap()),
            message_type: u16::from_le_bytes(buf[4..6].try_into().unwrap()),
            flags: u16::from_le_bytes(buf[6..8].try_into().unwrap()),
            sequence: u32::from_le_bytes(buf[8..12].try_into().unwrap()),
            port_id: u32::from_le_bytes(buf[12..16].try_into().unwrap()),
        };
        Ok((header, &buf[HEADER_SIZE..]))
    }

    /// Serialize into the fixed 16-byte wire form.
    pub fn serialize(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.total_length.to_le_bytes());
        out[4..6].copy_from_slice(&self.message_type.to_le_bytes());
        out[6..8].copy_from_slice(&self.flags.to_le_bytes());
        out[8..12].copy_from_slice(&self.sequence.to_le_bytes());
        out[12..16].copy_from_slice(&self.port_id.to_le_bytes());
        out
    }

    /// Append the serialized header to `dst`.
    pub fn put(&self, dst: &mut BytesMut) {
        dst.put_u32_le(self.total_length);
        dst.put_u16_le(self.message_type);
        dst.put_u16_le(self.flags);
        dst.put_u32_le(self.sequence);
        dst.put_u32_le(self.port_id);
    }

    /// Number of stream bytes this message occupies, alignment padding included.
    pub fn aligned_length(&self) -> usize {
        align_length(self.total_length as usize)
    }
}
