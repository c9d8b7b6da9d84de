// Licensed under the Apache-2.0 license

//! Mailbox error types

use crate::response::SeResponse;
use core::fmt;

pub type MailboxResult<T> = Result<T, MailboxError>;

/// Why a shared-RAM region was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// The region does not lie inside the expected RAM window.
    AddressOutOfRange,
    /// The magic word does not match.
    BadMagic,
    /// The length field exceeds the region's capacity.
    LengthOutOfRange,
    /// The XOR checksum does not match; the region is torn, stale or consumed.
    ChecksumMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxError {
    /// More parameters than the command structure holds.
    TooManyParameters { max: usize },

    /// More descriptors than one side of a command holds.
    TooManyDataTransfers { max: usize },

    /// Buffer longer than a descriptor's length field can express.
    TransferTooLong { len: usize },

    /// Flag bits not allowed on this kind of descriptor.
    InvalidTransferFlags(u32),

    /// Parameters plus input data do not fit the shared-RAM input region.
    InputRegionOverflow { words: usize, capacity: usize },

    /// A response from the previous command has not been read yet.
    ResponsePending,

    /// The shared-RAM output region failed validation.
    MailboxInvalid(InvalidReason),

    /// The output region is valid but the command has not completed.
    CommandNotDone,

    /// The caller's output list cannot take all output words.
    OutputBufferTooSmall {
        required_words: usize,
        available_words: usize,
    },
}

impl MailboxError {
    /// Response code reported to callers that only compare codes.
    pub fn response(&self) -> SeResponse {
        match self {
            MailboxError::MailboxInvalid(_)
            | MailboxError::CommandNotDone
            | MailboxError::ResponsePending => SeResponse::MailboxInvalid,
            MailboxError::TooManyParameters { .. }
            | MailboxError::TooManyDataTransfers { .. }
            | MailboxError::TransferTooLong { .. }
            | MailboxError::InvalidTransferFlags(_)
            | MailboxError::InputRegionOverflow { .. }
            | MailboxError::OutputBufferTooSmall { .. } => SeResponse::InvalidParameter,
        }
    }
}

impl From<MailboxError> for SeResponse {
    fn from(err: MailboxError) -> Self {
        err.response()
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::AddressOutOfRange => write!(f, "address outside RAM window"),
            InvalidReason::BadMagic => write!(f, "bad magic word"),
            InvalidReason::LengthOutOfRange => write!(f, "length exceeds region"),
            InvalidReason::ChecksumMismatch => write!(f, "checksum mismatch"),
        }
    }
}

impl fmt::Display for MailboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailboxError::TooManyParameters { max } => {
                write!(f, "Too many parameters (max {})", max)
            }
            MailboxError::TooManyDataTransfers { max } => {
                write!(f, "Too many data transfers (max {})", max)
            }
            MailboxError::TransferTooLong { len } => {
                write!(f, "Data transfer too long: {} bytes", len)
            }
            MailboxError::InvalidTransferFlags(flags) => {
                write!(f, "Invalid data transfer flags: {:#010x}", flags)
            }
            MailboxError::InputRegionOverflow { words, capacity } => write!(
                f,
                "Input region overflow: {} words, capacity {}",
                words, capacity
            ),
            MailboxError::ResponsePending => write!(f, "Previous response not read"),
            MailboxError::MailboxInvalid(reason) => write!(f, "Mailbox invalid: {}", reason),
            MailboxError::CommandNotDone => write!(f, "Command not done"),
            MailboxError::OutputBufferTooSmall {
                required_words,
                available_words,
            } => write!(
                f,
                "Output buffer too small: {} words required, {} available",
                required_words, available_words
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MailboxError {}
