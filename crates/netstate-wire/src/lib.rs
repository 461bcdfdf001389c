//! Wire codecs for the kernel's socket diagnostic queries and neighbor
//! discovery user option notifications.
//!
//! Every codec here is a pure function over byte buffers: decoding borrows
//! its input and produces value types, encoding produces an owned buffer.
//! Socket handling lives elsewhere — a transport owns the privileged socket,
//! feeds received messages to [`DecodedMessage::parse`] and sends out
//! requests built with [`DiagRequest::encode`].
//!
//! All multi-byte fields use the kernel interface's fixed little-endian
//! order; nothing is negotiated.

pub mod consts;
pub mod diag;
pub mod error;
pub mod header;
pub mod message;
pub mod nduseropt;
pub mod options;
pub mod pref64;

pub use diag::{DiagRequest, DiagResponse, SocketIdentity, NO_COOKIE};
pub use error::{Result, WireError};
pub use header::{MessageHeader, ALIGN, HEADER_SIZE};
pub use message::DecodedMessage;
pub use nduseropt::NdUserOption;
pub use options::NdOption;
