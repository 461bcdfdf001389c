//! Socket diagnostic request and response codecs.
//!
//! The request is a pure encoder (the kernel never sends one back to us);
//! the response is a pure decoder. Both share the fixed 48-byte socket
//! identity block.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use bytes::{BufMut, Bytes, BytesMut};

use crate::consts::{AF_INET, SOCK_DIAG_BY_FAMILY};
use crate::error::{ensure, Result};
use crate::header::{MessageHeader, HEADER_SIZE};

/// Wire size of the socket identity block.
pub const IDENTITY_SIZE: usize = 48;

/// Wire size of a diagnostic request payload.
pub const REQUEST_PAYLOAD_SIZE: usize = 56;

/// Wire size of an encoded request, header included.
pub const REQUEST_SIZE: usize = HEADER_SIZE + REQUEST_PAYLOAD_SIZE;

/// Wire size of a diagnostic response payload.
pub const RESPONSE_PAYLOAD_SIZE: usize = 72;

/// Cookie value meaning "no cookie assigned".
pub const NO_COOKIE: u64 = u64::MAX;

/// The 4-tuple (plus kernel cookie) identifying one socket.
///
/// Addresses live in fixed 16-byte slots regardless of family. The padding
/// convention for 4-byte addresses differs by direction: requests place the
/// address in the leading bytes and zero the rest, while responses may carry
/// it in v4-in-v6 mapped form. Both interpretations are available through
/// the accessors; callers pick the one matching the message's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketIdentity {
    /// Source (local) port.
    pub source_port: u16,
    /// Destination (remote) port.
    pub dest_port: u16,
    /// Source address in its fixed 16-byte slot.
    pub source_addr: [u8; 16],
    /// Destination address in its fixed 16-byte slot.
    pub dest_addr: [u8; 16],
    /// Bound interface index, 0 when unbound.
    pub interface_index: u32,
    /// Kernel socket cookie; [`NO_COOKIE`] when none was assigned.
    pub cookie: u64,
}

impl SocketIdentity {
    /// The identity matching any socket: every field zero, including the
    /// cookie (not the no-cookie sentinel).
    pub const ANY: SocketIdentity = SocketIdentity {
        source_port: 0,
        dest_port: 0,
        source_addr: [0; 16],
        dest_addr: [0; 16],
        interface_index: 0,
        cookie: 0,
    };

    /// Build an identity from a local/remote endpoint pair.
    ///
    /// Returns `None` when the endpoints disagree on address family. Callers
    /// wanting "match any socket" pass no identity at all instead; supplying
    /// only one endpoint half is a precondition violation the request
    /// builder rejects before reaching this codec.
    pub fn from_endpoints(local: SocketAddr, remote: SocketAddr) -> Option<SocketIdentity> {
        if local.is_ipv4() != remote.is_ipv4() {
            return None;
        }
        Some(SocketIdentity {
            source_port: local.port(),
            dest_port: remote.port(),
            source_addr: pad_address(local.ip()),
            dest_addr: pad_address(remote.ip()),
            interface_index: 0,
            cookie: NO_COOKIE,
        })
    }

    /// The kernel cookie, or `None` when the no-cookie sentinel is set.
    pub fn cookie(&self) -> Option<u64> {
        (self.cookie != NO_COOKIE).then_some(self.cookie)
    }

    /// Source address read as `family` dictates: the leading 4 bytes for a
    /// v4 family (the request-side padding rule), all 16 otherwise.
    pub fn source_ip(&self, family: u8) -> IpAddr {
        slot_ip(&self.source_addr, family)
    }

    /// Destination address read as `family` dictates.
    pub fn dest_ip(&self, family: u8) -> IpAddr {
        slot_ip(&self.dest_addr, family)
    }

    /// Source address read as a v6 slot, unwrapping v4-in-v6 mapped form
    /// (the response-side padding rule).
    pub fn source_ip_mapped(&self) -> IpAddr {
        mapped_ip(&self.source_addr)
    }

    /// Destination address read as a v6 slot, unwrapping mapped form.
    pub fn dest_ip_mapped(&self) -> IpAddr {
        mapped_ip(&self.dest_addr)
    }

    fn put(&self, dst: &mut BytesMut) {
        dst.put_u16_le(self.source_port);
        dst.put_u16_le(self.dest_port);
        dst.put_slice(&self.source_addr);
        dst.put_slice(&self.dest_addr);
        dst.put_u32_le(self.interface_index);
        dst.put_u64_le(self.cookie);
    }

    /// Caller guarantees `buf` holds [`IDENTITY_SIZE`] bytes.
    fn parse(buf: &[u8]) -> SocketIdentity {
        SocketIdentity {
            source_port: u16::from_le_bytes(buf[0..2].try_into().unwrap()),
            dest_port: u16::from_le_bytes(buf[2..4].try_into().unwrap()),
            source_addr: buf[4..20].try_into().unwrap(),
            dest_addr: buf[20..36].try_into().unwrap(),
            interface_index: u32::from_le_bytes(buf[36..40].try_into().unwrap()),
            cookie: u64::from_le_bytes(buf[40..48].try_into().unwrap()),
        }
    }
}

/// Pad an address into the fixed 16-byte slot; a v4 address occupies the
/// leading bytes with the remainder zeroed.
fn pad_address(ip: IpAddr) -> [u8; 16] {
    let mut slot = [0u8; 16];
    match ip {
        IpAddr::V4(v4) => slot[..4].copy_from_slice(&v4.octets()),
        IpAddr::V6(v6) => slot = v6.octets(),
    }
    slot
}

fn slot_ip(slot: &[u8; 16], family: u8) -> IpAddr {
    if family == AF_INET {
        IpAddr::V4(Ipv4Addr::new(slot[0], slot[1], slot[2], slot[3]))
    } else {
        IpAddr::V6(Ipv6Addr::from(*slot))
    }
}

fn mapped_ip(slot: &[u8; 16]) -> IpAddr {
    let v6 = Ipv6Addr::from(*slot);
    match v6.to_ipv4_mapped() {
        Some(v4) => IpAddr::V4(v4),
        None => IpAddr::V6(v6),
    }
}

/// A socket diagnostic query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagRequest {
    /// Address family the query is keyed on.
    pub family: u8,
    /// Transport protocol to query.
    pub protocol: u8,
    /// Bitmask of extension record kinds the kernel should attach.
    pub extension_mask: u8,
    /// Bitmask of socket states to report, one bit per state number.
    pub state_mask: u32,
    /// Socket to match, or `None` to match any socket.
    pub identity: Option<SocketIdentity>,
}

impl DiagRequest {
    /// Encode the request into a complete wire message with sequence 0.
    pub fn encode(&self, flags: u16) -> Bytes {
        self.encode_with_sequence(flags, 0)
    }

    /// Encode the request into a complete wire message.
    ///
    /// Never fails: an absent identity encodes as the all-zero "match any
    /// socket" identity.
    pub fn encode_with_sequence(&self, flags: u16, sequence: u32) -> Bytes {
        let mut buf = BytesMut::with_capacity(REQUEST_SIZE);
        let header = MessageHeader {
            total_length: REQUEST_SIZE as u32,
            message_type: SOCK_DIAG_BY_FAMILY,
            flags,
            sequence,
            port_id: 0,
        };
        header.put(&mut buf);
        buf.put_u8(self.family);
        buf.put_u8(self.protocol);
        buf.put_u8(self.extension_mask);
        buf.put_u8(0); // reserved
        buf.put_u32_le(self.state_mask);
        self.identity.unwrap_or(SocketIdentity::ANY).put(&mut buf);
        debug_assert_eq!(buf.len(), REQUEST_SIZE);
        buf.freeze()
    }
}

/// One socket's diagnostic record as reported by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagResponse {
    /// Address family of the socket.
    pub family: u8,
    /// Socket state number.
    pub state: u8,
    /// Running timer kind.
    pub timer: u8,
    /// Retransmit count for the running timer.
    pub retransmits: u8,
    /// The socket's identity.
    pub identity: SocketIdentity,
    /// Milliseconds until the running timer expires.
    pub expires: u32,
    /// Receive queue byte count.
    pub recv_queue: u32,
    /// Send queue byte count.
    pub send_queue: u32,
    /// Owning user id.
    pub uid: u32,
    /// Socket inode number.
    pub inode: u32,
}

impl DiagResponse {
    /// Decode a diagnostic response payload.
    pub fn decode(header: &MessageHeader, payload: &[u8]) -> Result<DiagResponse> {
        tracing::trace!(
            sequence = header.sequence,
            len = payload.len(),
            "decoding socket diagnostic response"
        );
        ensure(payload, RESPONSE_PAYLOAD_SIZE)?;
        Ok(DiagResponse {
            family: payload[0],
            state: payload[1],
            timer: payload[2],
            retransmits: payload[3],
            identity: SocketIdentity::parse(&payload[4..4 + IDENTITY_SIZE]),
            expires: u32::from_le_bytes(payload[52..56].try_into().unwrap()),
            recv_queue: u32::from_le_bytes(payload[56..60].try_into().unwrap()),
            send_queue: u32::from_le_bytes(payload[60..64].try_into().unwrap()),
            uid: u32::from_le_bytes(payload[64..68].try_into().unwrap()),
            inode: u32::from_le_bytes(payload[68..72].try_into().unwrap()),
        })
    }
}
