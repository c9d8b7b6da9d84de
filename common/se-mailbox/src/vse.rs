// Licensed under the Apache-2.0 license

//! VSE root mailbox frame format
//!
//! Two fixed-size RAM regions carry a command to the virtual SE root routine,
//! which only runs early in boot, and carry its answer back to the next
//! application boot.
//!
//! Input:  `[magic][command][length][parameters..][input data..][checksum]`
//! Output: `[magic][version][status][command][length][output data..][checksum]`
//!
//! The checksum is the XOR of every preceding word of the frame. A region whose
//! magic, length or checksum does not check out holds no answer at all; a
//! consumed output region has its checksum inverted so it reads as invalid.

use crate::command::MailboxCommand;
use crate::error::{InvalidReason, MailboxError, MailboxResult};
use crate::response::SeResponse;
use arrayvec::ArrayVec;
use bitfield::bitfield;
use core::mem::size_of;
use zerocopy::{FromBytes, Immutable, IntoBytes};

/// Size of each root mailbox region in bytes.
pub const VSE_MAILBOX_SIZE: usize = 512;
pub const VSE_MAILBOX_WORDS: usize = VSE_MAILBOX_SIZE / size_of::<u32>();

/// Magic word of a valid region.
pub const VSE_MAGIC: u32 = 0xE5EC_C0DE;

pub const VSE_INPUT_HEADER_WORDS: usize = size_of::<VseInputHeader>() / size_of::<u32>();
pub const VSE_OUTPUT_HEADER_WORDS: usize = size_of::<VseOutputHeader>() / size_of::<u32>();

/// Data words that fit in the input region after header and checksum.
pub const VSE_INPUT_DATA_WORDS: usize = VSE_MAILBOX_WORDS - VSE_INPUT_HEADER_WORDS - 1;
/// Data words that fit in the output region after header and checksum.
pub const VSE_OUTPUT_DATA_WORDS: usize = VSE_MAILBOX_WORDS - VSE_OUTPUT_HEADER_WORDS - 1;

pub const VSE_LENGTH_DATA_MASK: u32 = 0x00FF_FFFF;
pub const VSE_LENGTH_PARAM_SHIFT: u32 = 24;

/// XOR of all words.
pub fn xor_checksum(words: &[u32]) -> u32 {
    words.iter().fold(0, |acc, w| acc ^ w)
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable)]
pub struct VseInputHeader {
    pub magic: u32,
    pub command: u32,
    /// Input data word count in the low bits, parameter count from bit 24.
    pub length: u32,
}

impl VseInputHeader {
    pub const fn pack_length(data_words: usize, parameters: usize) -> u32 {
        (data_words as u32 & VSE_LENGTH_DATA_MASK) | ((parameters as u32) << VSE_LENGTH_PARAM_SHIFT)
    }

    pub fn data_words(&self) -> usize {
        (self.length & VSE_LENGTH_DATA_MASK) as usize
    }

    pub fn parameter_count(&self) -> usize {
        (self.length >> VSE_LENGTH_PARAM_SHIFT) as usize
    }
}

bitfield! {
    /// Status word of the output region.
    /// Bits 19:16: response code
    /// Bits 22:20: configuration status (bit 21 flags a valid OTP version)
    /// Bit 23:     command done
    /// Bits 31:24: OTP version
    #[repr(C)]
    #[derive(Copy, Clone, FromBytes, IntoBytes, Immutable, PartialEq, Eq, Default)]
    pub struct VseStatus(u32);
    impl Debug;
    pub u32, response_bits, set_response_bits: 19, 16;
    pub u32, config_status, set_config_status: 22, 20;
    pub debug_locked, set_debug_locked: 20;
    pub otp_version_present, set_otp_version_present: 21;
    pub secure_boot_enabled, set_secure_boot_enabled: 22;
    pub done, set_done: 23;
    pub u32, otp_version, set_otp_version: 31, 24;
}

impl VseStatus {
    pub fn response(&self) -> SeResponse {
        SeResponse::from_status(self.0)
    }

    pub fn set_response(&mut self, response: SeResponse) {
        self.set_response_bits(response.code() >> 16);
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable)]
pub struct VseOutputHeader {
    pub magic: u32,
    pub version: u32,
    pub status: VseStatus,
    /// Opcode of the command that produced this output.
    pub command: u32,
    /// Output data word count.
    pub length: u32,
}

/// Serialized input region, checksum included.
#[derive(Debug, Clone)]
pub struct VseInputFrame {
    words: ArrayVec<u32, VSE_MAILBOX_WORDS>,
}

impl VseInputFrame {
    /// Flatten `command` into an input region: parameters first, then every
    /// input buffer in list order, copied by value.
    pub fn serialize(command: &MailboxCommand<'_>) -> MailboxResult<Self> {
        let parameters = command.parameters();
        let input_words: usize = command.data_in().iter().map(|t| t.word_len()).sum();
        let data_words = parameters.len() + input_words;
        if data_words > VSE_INPUT_DATA_WORDS {
            return Err(MailboxError::InputRegionOverflow {
                words: data_words,
                capacity: VSE_INPUT_DATA_WORDS,
            });
        }

        let header = VseInputHeader {
            magic: VSE_MAGIC,
            command: command.command(),
            length: VseInputHeader::pack_length(input_words, parameters.len()),
        };
        let header_words: [u32; VSE_INPUT_HEADER_WORDS] = zerocopy::transmute!(header);

        let mut words = ArrayVec::new();
        words.extend(header_words);
        words.extend(parameters.iter().copied());
        for transfer in command.data_in().iter() {
            words.extend(transfer.words());
        }
        let checksum = xor_checksum(&words);
        words.push(checksum);
        Ok(Self { words })
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.words.as_slice().as_bytes()
    }

    pub fn checksum(&self) -> u32 {
        self.words.last().copied().unwrap_or_default()
    }
}

/// A validated input region, as seen by the root routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedInputFrame<'a> {
    pub command: u32,
    pub parameters: &'a [u32],
    pub data: &'a [u32],
}

impl<'a> ParsedInputFrame<'a> {
    pub fn parse(words: &'a [u32]) -> Result<Self, InvalidReason> {
        let (header, _) =
            VseInputHeader::read_from_prefix(words.as_bytes()).map_err(|_| InvalidReason::LengthOutOfRange)?;
        if header.magic != VSE_MAGIC {
            return Err(InvalidReason::BadMagic);
        }
        let parameters = header.parameter_count();
        let data_words = header.data_words();
        let total = parameters + data_words;
        if total > VSE_INPUT_DATA_WORDS || words.len() < VSE_INPUT_HEADER_WORDS + total + 1 {
            return Err(InvalidReason::LengthOutOfRange);
        }
        let end = VSE_INPUT_HEADER_WORDS + total;
        if xor_checksum(&words[..end]) != words[end] {
            return Err(InvalidReason::ChecksumMismatch);
        }
        let body = &words[VSE_INPUT_HEADER_WORDS..end];
        Ok(Self {
            command: header.command,
            parameters: &body[..parameters],
            data: &body[parameters..],
        })
    }
}

/// A validated output region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedOutputFrame<'a> {
    pub header: VseOutputHeader,
    pub data: &'a [u32],
}

impl<'a> ParsedOutputFrame<'a> {
    pub fn parse(words: &'a [u32]) -> Result<Self, InvalidReason> {
        let (header, _) = VseOutputHeader::read_from_prefix(words.as_bytes())
            .map_err(|_| InvalidReason::LengthOutOfRange)?;
        if header.magic != VSE_MAGIC {
            return Err(InvalidReason::BadMagic);
        }
        let len = header.length as usize;
        if len > VSE_OUTPUT_DATA_WORDS || words.len() < VSE_OUTPUT_HEADER_WORDS + len + 1 {
            return Err(InvalidReason::LengthOutOfRange);
        }
        let end = VSE_OUTPUT_HEADER_WORDS + len;
        if xor_checksum(&words[..end]) != words[end] {
            return Err(InvalidReason::ChecksumMismatch);
        }
        Ok(Self {
            header,
            data: &words[VSE_OUTPUT_HEADER_WORDS..end],
        })
    }

    /// Word offset of the checksum inside the region.
    pub fn checksum_index(&self) -> usize {
        VSE_OUTPUT_HEADER_WORDS + self.data.len()
    }
}

/// Serialize an output region the way the root routine writes it.
pub fn build_output_frame(
    version: u32,
    status: VseStatus,
    command: u32,
    data: &[u32],
) -> MailboxResult<ArrayVec<u32, VSE_MAILBOX_WORDS>> {
    if data.len() > VSE_OUTPUT_DATA_WORDS {
        return Err(MailboxError::OutputBufferTooSmall {
            required_words: data.len(),
            available_words: VSE_OUTPUT_DATA_WORDS,
        });
    }
    let header = VseOutputHeader {
        magic: VSE_MAGIC,
        version,
        status,
        command,
        length: data.len() as u32,
    };
    let header_words: [u32; VSE_OUTPUT_HEADER_WORDS] = zerocopy::transmute!(header);

    let mut words = ArrayVec::new();
    words.extend(header_words);
    words.extend(data.iter().copied());
    let checksum = xor_checksum(&words);
    words.push(checksum);
    Ok(words)
}
