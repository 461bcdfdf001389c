//! Protocol constant tables.
//!
//! Every value here is fixed by the kernel interface; nothing is negotiated
//! or registered at runtime.

/// IPv4 address family (`AF_INET`).
pub const AF_INET: u8 = 2;

/// IPv6 address family (`AF_INET6`).
pub const AF_INET6: u8 = 10;

/// TCP transport protocol (`IPPROTO_TCP`).
pub const IPPROTO_TCP: u8 = 6;

/// UDP transport protocol (`IPPROTO_UDP`).
pub const IPPROTO_UDP: u8 = 17;

/// Message flag: this message is a request.
pub const NLM_F_REQUEST: u16 = 0x0001;

/// Message flag: part of a multipart reply, more messages follow.
pub const NLM_F_MULTI: u16 = 0x0002;

/// Message flag: return the complete table instead of a single entry.
pub const NLM_F_ROOT: u16 = 0x0100;

/// Message flag: return all entries matching the request criteria.
pub const NLM_F_MATCH: u16 = 0x0200;

/// Message flag: dump every matching entry (`ROOT | MATCH`).
pub const NLM_F_DUMP: u16 = NLM_F_ROOT | NLM_F_MATCH;

/// Socket diagnostic query/response keyed by address family.
pub const SOCK_DIAG_BY_FAMILY: u16 = 20;

/// Notification carrying a neighbor discovery user option.
pub const RTM_NEWNDUSEROPT: u16 = 68;

// Socket states as numbered by the diagnostic interface. A request's state
// mask selects states by bit position, e.g. `state_bit(TCP_ESTABLISHED)`.

/// Fully established connection.
pub const TCP_ESTABLISHED: u8 = 1;
/// Active open in progress, SYN sent.
pub const TCP_SYN_SENT: u8 = 2;
/// Passive open in progress, SYN received.
pub const TCP_SYN_RECV: u8 = 3;
/// FIN sent, waiting for the peer's ACK or FIN.
pub const TCP_FIN_WAIT1: u8 = 4;
/// Our FIN acknowledged, waiting for the peer's FIN.
pub const TCP_FIN_WAIT2: u8 = 5;
/// Both sides closed, lingering for stray segments.
pub const TCP_TIME_WAIT: u8 = 6;
/// Fully closed.
pub const TCP_CLOSE: u8 = 7;
/// Peer's FIN received, waiting for local close.
pub const TCP_CLOSE_WAIT: u8 = 8;
/// Local close done, waiting for the final ACK.
pub const TCP_LAST_ACK: u8 = 9;
/// Passive listener.
pub const TCP_LISTEN: u8 = 10;
/// Simultaneous close in progress.
pub const TCP_CLOSING: u8 = 11;

/// State mask selecting every socket state.
pub const ALL_SOCKET_STATES: u32 = 0xFFFF_FFFF;

/// Returns the state-mask bit for one socket state.
pub const fn state_bit(state: u8) -> u32 {
    1 << state
}

/// Returns a human-readable name for a message type.
pub fn message_type_name(message_type: u16) -> &'static str {
    match message_type {
        SOCK_DIAG_BY_FAMILY => "SOCK_DIAG_BY_FAMILY",
        RTM_NEWNDUSEROPT => "RTM_NEWNDUSEROPT",
        _ => "UNKNOWN",
    }
}
