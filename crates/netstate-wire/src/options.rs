//! Neighbor discovery option region parsing.
//!
//! Options are type/length tagged, with the length declared in units of
//! 8 bytes. Only the leading entry of a region is interpreted; the carrying
//! message consumes the full declared region either way.

use std::net::Ipv6Addr;

use tracing::debug;

use crate::error::{Result, WireError};
use crate::pref64;

/// Option type advertising a NAT64 prefix.
pub const OPTION_PREF64: u8 = 38;

/// Option lengths are declared in units of 8 bytes.
pub const OPTION_LENGTH_UNIT: usize = 8;

/// Fixed wire size of a PREF64 option (length code 2).
pub const PREF64_SIZE: usize = 16;

/// One decoded neighbor discovery option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NdOption {
    /// NAT64 prefix advertisement.
    Pref64 {
        /// Advertised prefix; bits beyond `prefix_length` are zero.
        prefix: Ipv6Addr,
        /// Prefix length in bits, one of 32, 40, 48, 56, 64 or 96.
        prefix_length: u8,
        /// Remaining lifetime in seconds, always a multiple of 8.
        lifetime: u32,
    },
    /// An option with a self-consistent length but an unrecognized type.
    Unknown {
        /// The option's type byte.
        option_type: u8,
    },
}

/// Parse the leading option of a bounded option region.
///
/// Returns the option and the number of region bytes it occupies. `None`
/// means the region holds no decodable option: it is empty, its declared
/// length is zero or overruns the region, or a known option type is
/// malformed. The caller treats the whole region as consumed either way.
pub fn parse_leading_option(region: &[u8]) -> Option<(NdOption, usize)> {
    if region.len() < 2 {
        return None;
    }
    let option_type = region[0];
    let declared = usize::from(region[1]) * OPTION_LENGTH_UNIT;
    if declared == 0 || declared > region.len() {
        debug!(
            option_type,
            declared,
            region = region.len(),
            "option length out of bounds, dropping option region"
        );
        return None;
    }
    match option_type {
        OPTION_PREF64 => match decode_pref64(&region[..declared]) {
            Ok(option) => Some((option, PREF64_SIZE)),
            Err(err) => {
                debug!(error = %err, "malformed PREF64 option, dropping option region");
                None
            }
        },
        _ => {
            debug!(option_type, declared, "unrecognized option type");
            Some((NdOption::Unknown { option_type }, declared))
        }
    }
}

/// Encode a PREF64 option into its fixed 16-byte wire form.
///
/// The prefix is truncated to `prefix_length` bits and the lifetime rounded
/// down to a multiple of 8 seconds; an unsupported prefix length or a
/// lifetime above [`pref64::MAX_LIFETIME`] fails.
pub fn encode_pref64(prefix: Ipv6Addr, prefix_length: u8, lifetime: u32) -> Result<[u8; PREF64_SIZE]> {
    let code = pref64::prefix_length_to_code(prefix_length)?;
    let packed = pref64::pack_lifetime_and_code(lifetime, code)?;
    let mut out = [0u8; PREF64_SIZE];
    out[0] = OPTION_PREF64;
    out[1] = (PREF64_SIZE / OPTION_LENGTH_UNIT) as u8;
    out[2..4].copy_from_slice(&packed.to_le_bytes());
    out[4..16].copy_from_slice(&pref64::truncate_prefix(prefix, prefix_length).octets()[..12]);
    Ok(out)
}

fn decode_pref64(buf: &[u8]) -> Result<NdOption> {
    if buf.len() != PREF64_SIZE {
        return Err(WireError::InvalidField {
            field: "PREF64 option length",
            value: buf.len() as u64,
        });
    }
    let packed = u16::from_le_bytes(buf[2..4].try_into().unwrap());
    let (lifetime, code) = pref64::unpack_lifetime_and_code(packed);
    let prefix_length = pref64::code_to_prefix_length(code)?;
    let mut octets = [0u8; 16];
    octets[..12].copy_from_slice(&buf[4..16]);
    // Bits beyond the prefix length are zero by protocol contract; truncate
    // defensively anyway.
    let prefix = pref64::truncate_prefix(Ipv6Addr::from(octets), prefix_length);
    Ok(NdOption::Pref64 {
        prefix,
        prefix_length,
        lifetime,
    })
}
