//! Neighbor discovery user option notification decoding.
//!
//! The kernel forwards router-advertisement options it does not consume
//! itself as a notification: a fixed leading struct, a bounded option
//! region, and one trailing attribute carrying the advertising router's
//! source address.

use std::net::Ipv6Addr;

use crate::error::{ensure, Result, WireError};
use crate::header::MessageHeader;
use crate::options::{parse_leading_option, NdOption};

/// Fixed leading struct: family (1) + pad (1) + option region length (2) +
/// interface index (4) + ICMP type (1) + ICMP code (1) + 6 reserved bytes.
pub const FIXED_SIZE: usize = 16;

/// Attribute sub-header: length (2) + type (2).
pub const ATTR_HEADER_SIZE: usize = 4;

/// Attribute type carrying the advertising router's source address.
pub const ATTR_SOURCE_ADDRESS: u16 = 1;

/// Total wire size of the source-address attribute, sub-header included.
pub const SOURCE_ADDRESS_ATTR_SIZE: usize = ATTR_HEADER_SIZE + 16;

/// A received neighbor discovery user option notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdUserOption {
    /// Address family of the originating message.
    pub family: u8,
    /// Index of the interface the advertisement arrived on.
    pub interface_index: u32,
    /// ICMP type of the originating message (134 for router advertisements).
    pub icmp_type: u8,
    /// ICMP code of the originating message.
    pub icmp_code: u8,
    /// The leading option of the region, or `None` when the region held no
    /// decodable option.
    pub option: Option<NdOption>,
    /// The advertising router's source address.
    pub source_address: Ipv6Addr,
}

impl NdUserOption {
    /// Decode the payload of a user option notification.
    ///
    /// Any shortfall in the leading struct, option region bounds or trailing
    /// attribute fails the whole message; an undecodable option region alone
    /// does not (the message decodes with `option: None`).
    pub fn decode(header: &MessageHeader, payload: &[u8]) -> Result<NdUserOption> {
        tracing::trace!(
            sequence = header.sequence,
            len = payload.len(),
            "decoding ND user option notification"
        );
        ensure(payload, FIXED_SIZE)?;
        let family = payload[0];
        let opts_len = usize::from(u16::from_le_bytes(payload[2..4].try_into().unwrap()));
        let interface_index = u32::from_le_bytes(payload[4..8].try_into().unwrap());
        let icmp_type = payload[8];
        let icmp_code = payload[9];

        // The declared region must be fully present before any of it is
        // interpreted.
        ensure(payload, FIXED_SIZE + opts_len)?;
        let region = &payload[FIXED_SIZE..FIXED_SIZE + opts_len];
        let option = parse_leading_option(region).map(|(option, _)| option);

        let rest = &payload[FIXED_SIZE + opts_len..];
        ensure(rest, SOURCE_ADDRESS_ATTR_SIZE)?;
        let attr_len = usize::from(u16::from_le_bytes(rest[0..2].try_into().unwrap()));
        let attr_type = u16::from_le_bytes(rest[2..4].try_into().unwrap());
        if attr_len != SOURCE_ADDRESS_ATTR_SIZE {
            return Err(WireError::InvalidField {
                field: "source address attribute length",
                value: attr_len as u64,
            });
        }
        if attr_type != ATTR_SOURCE_ADDRESS {
            return Err(WireError::InvalidField {
                field: "source address attribute type",
                value: u64::from(attr_type),
            });
        }
        let octets: [u8; 16] = rest[ATTR_HEADER_SIZE..SOURCE_ADDRESS_ATTR_SIZE]
            .try_into()
            .unwrap();

        Ok(NdUserOption {
            family,
            interface_index,
            icmp_type,
            icmp_code,
            option,
            source_address: Ipv6Addr::from(octets),
        })
    }

    /// Scope qualifier for the source address: link-local addresses are only
    /// meaningful together with the interface they arrived on.
    pub fn source_scope(&self) -> Option<u32> {
        if (self.source_address.segments()[0] & 0xFFC0) == 0xFE80 {
            Some(self.interface_index)
        } else {
            None
        }
    }
}
