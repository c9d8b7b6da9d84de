// Licensed under the Apache-2.0 license

//! SE response codes

use core::fmt;
use num_enum::{FromPrimitive, IntoPrimitive};

/// Bits of a status word that carry the response code.
pub const RESPONSE_MASK: u32 = 0x000F_0000;

/// Response code reported by the SE, or synthesized by the transport.
///
/// Codes the SE defines but this layer does not name are kept verbatim in
/// [`SeResponse::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[repr(u32)]
pub enum SeResponse {
    Ok = 0x0000_0000,
    InvalidCommand = 0x0001_0000,
    AuthorizationError = 0x0002_0000,
    InvalidSignature = 0x0003_0000,
    BusError = 0x0004_0000,
    InternalError = 0x0005_0000,
    CryptoError = 0x0006_0000,
    InvalidParameter = 0x0007_0000,
    SecureBootError = 0x0009_0000,
    SelfTestError = 0x000A_0000,
    NotInitialized = 0x000B_0000,
    /// The shared-RAM mailbox holds no trustworthy answer.
    MailboxInvalid = 0x00FE_0000,
    Abort = 0x00FF_0000,
    /// Magic word of a valid shared-RAM mailbox.
    MailboxValid = 0xE5EC_C0DE,
    #[num_enum(catch_all)]
    Other(u32),
}

impl SeResponse {
    /// Decode the response field of a status or RX header word.
    pub fn from_status(word: u32) -> Self {
        Self::from_primitive(word & RESPONSE_MASK)
    }

    pub fn is_ok(self) -> bool {
        self == SeResponse::Ok
    }

    pub fn code(self) -> u32 {
        u32::from(self)
    }
}

impl fmt::Display for SeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeResponse::Other(raw) => write!(f, "SE response {:#010x}", raw),
            known => write!(f, "{:?}", known),
        }
    }
}
