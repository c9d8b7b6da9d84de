/*++

Licensed under the Apache-2.0 license.

File Name:

    vse_handler.rs

Abstract:

    Command handling for the emulated VSE root routine.

--*/

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use se_mailbox_common::opcodes;
use se_mailbox_common::vse::VSE_OUTPUT_DATA_WORDS;
use se_mailbox_common::SeResponse;
use sha2::{Digest, Sha256};

/// Answer produced by the root routine for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VseReply {
    pub response: SeResponse,
    pub data: Vec<u32>,
}

impl VseReply {
    pub fn ok(data: Vec<u32>) -> Self {
        Self {
            response: SeResponse::Ok,
            data,
        }
    }

    pub fn error(response: SeResponse) -> Self {
        Self {
            response,
            data: Vec::new(),
        }
    }
}

pub trait VseRootHandler {
    fn handle(&mut self, command: u32, parameters: &[u32], data: &[u32]) -> VseReply;
}

impl<F: FnMut(u32, &[u32], &[u32]) -> VseReply> VseRootHandler for F {
    fn handle(&mut self, command: u32, parameters: &[u32], data: &[u32]) -> VseReply {
        self(command, parameters, data)
    }
}

fn words_to_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

fn bytes_to_words(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks(4)
        .map(|chunk| {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            u32::from_le_bytes(word)
        })
        .collect()
}

/// A small VSE command set: status, SHA-256, random numbers and OTP reads.
pub struct DefaultVseHandler {
    rng: StdRng,
    otp: Vec<u32>,
}

impl DefaultVseHandler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            otp: Vec::new(),
        }
    }

    pub fn with_otp(mut self, otp: Vec<u32>) -> Self {
        self.otp = otp;
        self
    }

    /// Parameter 0 is the message length in bytes; without it the whole
    /// padded input is hashed.
    fn hash(&self, parameters: &[u32], data: &[u32]) -> VseReply {
        let bytes = words_to_bytes(data);
        let len = parameters.first().map_or(bytes.len(), |&len| len as usize);
        if len > bytes.len() {
            return VseReply::error(SeResponse::InvalidParameter);
        }
        VseReply::ok(bytes_to_words(&Sha256::digest(&bytes[..len])))
    }

    fn random(&mut self, parameters: &[u32]) -> VseReply {
        let Some(&len) = parameters.first() else {
            return VseReply::error(SeResponse::InvalidParameter);
        };
        if len as usize > VSE_OUTPUT_DATA_WORDS * 4 {
            return VseReply::error(SeResponse::InvalidParameter);
        }
        let mut bytes = vec![0u8; len as usize];
        self.rng.fill(&mut bytes[..]);
        VseReply::ok(bytes_to_words(&bytes))
    }

    fn read_otp(&self, parameters: &[u32]) -> VseReply {
        let (offset, count) = match parameters {
            [offset, count, ..] => (*offset as usize, *count as usize),
            _ => return VseReply::error(SeResponse::InvalidParameter),
        };
        match self.otp.get(offset..offset.saturating_add(count)) {
            Some(words) => VseReply::ok(words.to_vec()),
            None => VseReply::error(SeResponse::InvalidParameter),
        }
    }
}

impl VseRootHandler for DefaultVseHandler {
    fn handle(&mut self, command: u32, parameters: &[u32], data: &[u32]) -> VseReply {
        match opcodes::operation(command) {
            opcodes::GET_STATUS => VseReply::ok(Vec::new()),
            opcodes::HASH if command & opcodes::MODE_MASK == opcodes::HASH_MODE_SHA256 => {
                self.hash(parameters, data)
            }
            opcodes::HASH => VseReply::error(SeResponse::InvalidParameter),
            opcodes::TRNG_GET_RANDOM => self.random(parameters),
            opcodes::READ_OTP => self.read_otp(parameters),
            _ => VseReply::error(SeResponse::InvalidCommand),
        }
    }
}
