//! Scaled-lifetime packing for the PREF64 option.
//!
//! A PREF64 option carries its NAT64 prefix length as a 3-bit code and its
//! lifetime scaled down by a factor of 8, both packed into a single 16-bit
//! field: the upper 13 bits hold `lifetime / 8`, the low 3 bits the code.

use std::net::Ipv6Addr;

use crate::error::{Result, WireError};

/// Prefix bit-lengths representable by a prefix-length code, indexed by code.
/// Codes 6 and 7 are reserved.
const PREFIX_LENGTHS: [u8; 6] = [96, 64, 56, 48, 40, 32];

/// Largest lifetime representable in the 13-bit scaled field, in seconds.
pub const MAX_LIFETIME: u32 = 65528;

/// Map a prefix bit-length to its 3-bit code.
pub fn prefix_length_to_code(length: u8) -> Result<u8> {
    PREFIX_LENGTHS
        .iter()
        .position(|&candidate| candidate == length)
        .map(|code| code as u8)
        .ok_or(WireError::InvalidField {
            field: "prefix length",
            value: u64::from(length),
        })
}

/// Map a 3-bit code back to its prefix bit-length.
pub fn code_to_prefix_length(code: u8) -> Result<u8> {
    PREFIX_LENGTHS
        .get(usize::from(code))
        .copied()
        .ok_or(WireError::InvalidField {
            field: "prefix length code",
            value: u64::from(code),
        })
}

/// Pack a lifetime and a prefix-length code into the 16-bit scaled field.
///
/// The lifetime is rounded down to the nearest multiple of 8 seconds; values
/// above [`MAX_LIFETIME`] (after rounding) do not fit the field and fail.
pub fn pack_lifetime_and_code(lifetime: u32, code: u8) -> Result<u16> {
    let scaled = lifetime / 8;
    if scaled > 0x1FFF {
        return Err(WireError::InvalidField {
            field: "lifetime",
            value: u64::from(lifetime),
        });
    }
    Ok(((scaled as u16) << 3) | u16::from(code & 0x07))
}

/// Unpack the 16-bit scaled field into `(lifetime_seconds, code)`.
pub fn unpack_lifetime_and_code(field: u16) -> (u32, u8) {
    (u32::from(field >> 3) * 8, (field & 0x07) as u8)
}

/// Zero every bit of `addr` beyond `bit_length`.
pub fn truncate_prefix(addr: Ipv6Addr, bit_length: u8) -> Ipv6Addr {
    if bit_length >= 128 {
        return addr;
    }
    let mask = if bit_length == 0 {
        0
    } else {
        u128::MAX << (128 - u32::from(bit_length))
    };
    Ipv6Addr::from(u128::from(addr) & mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_table_roundtrip() {
        for code in 0..=5u8 {
            let length = code_to_prefix_length(code).unwrap();
            assert_eq!(prefix_length_to_code(length).unwrap(), code);
        }
    }

    #[test]
    fn known_code_assignments() {
        assert_eq!(prefix_length_to_code(96).unwrap(), 0);
        assert_eq!(prefix_length_to_code(64).unwrap(), 1);
        assert_eq!(prefix_length_to_code(56).unwrap(), 2);
        assert_eq!(prefix_length_to_code(48).unwrap(), 3);
        assert_eq!(prefix_length_to_code(40).unwrap(), 4);
        assert_eq!(prefix_length_to_code(32).unwrap(), 5);
    }

    #[test]
    fn reserved_codes_rejected() {
        assert!(matches!(
            code_to_prefix_length(6),
            Err(WireError::InvalidField { value: 6, .. })
        ));
        assert!(matches!(
            code_to_prefix_length(7),
            Err(WireError::InvalidField { value: 7, .. })
        ));
    }

    #[test]
    fn unsupported_prefix_lengths_rejected() {
        for length in [0u8, 8, 31, 33, 65, 95, 97, 128] {
            assert!(prefix_length_to_code(length).is_err());
        }
    }

    #[test]
    fn pack_unpack_roundtrip() {
        for lifetime in [0u32, 8, 296, 10064, MAX_LIFETIME] {
            for code in 0..=5u8 {
                let field = pack_lifetime_and_code(lifetime, code).unwrap();
                assert_eq!(unpack_lifetime_and_code(field), (lifetime, code));
            }
        }
    }

    #[test]
    fn lifetime_rounds_down_to_multiple_of_eight() {
        let field = pack_lifetime_and_code(300, 1).unwrap();
        let (lifetime, code) = unpack_lifetime_and_code(field);
        assert_eq!(lifetime, 296);
        assert_eq!(code, 1);
    }

    #[test]
    fn lifetime_overflow_rejected() {
        // 65529..=65535 still truncate into the field; 65536 is the first
        // value whose scaled form needs a 14th bit.
        assert_eq!(
            unpack_lifetime_and_code(pack_lifetime_and_code(65535, 0).unwrap()).0,
            MAX_LIFETIME
        );
        assert!(matches!(
            pack_lifetime_and_code(65536, 0),
            Err(WireError::InvalidField { field: "lifetime", .. })
        ));
        assert!(pack_lifetime_and_code(u32::MAX, 0).is_err());
    }

    #[test]
    fn truncate_clears_bits_beyond_length() {
        let addr: Ipv6Addr = "2001:db8:aaaa:bbbb:cccc:dddd:eeee:ffff".parse().unwrap();
        assert_eq!(
            truncate_prefix(addr, 96),
            "2001:db8:aaaa:bbbb:cccc:dddd::".parse::<Ipv6Addr>().unwrap()
        );
        assert_eq!(
            truncate_prefix(addr, 32),
            "2001:db8::".parse::<Ipv6Addr>().unwrap()
        );
        assert_eq!(truncate_prefix(addr, 0), Ipv6Addr::UNSPECIFIED);
        assert_eq!(truncate_prefix(addr, 128), addr);
    }

    #[test]
    fn truncate_is_idempotent() {
        let addr: Ipv6Addr = "64:ff9b::1".parse().unwrap();
        let once = truncate_prefix(addr, 96);
        assert_eq!(truncate_prefix(once, 96), once);
    }
}
