// Licensed under the Apache-2.0 license

//! SE command opcodes
//!
//! The upper half of a command word selects the operation, the lower half
//! carries mode bits (algorithm, key slot type and so on).

pub const MODE_MASK: u32 = 0x0000_FFFF;

/// Combine an operation with its mode bits.
pub const fn with_mode(command: u32, mode: u32) -> u32 {
    (command & !MODE_MASK) | (mode & MODE_MASK)
}

pub const fn operation(command: u32) -> u32 {
    command & !MODE_MASK
}

// Key management
pub const WRAP_KEY: u32 = 0x0100_0000;
pub const UNWRAP_KEY: u32 = 0x0102_0000;
pub const DELETE_KEY: u32 = 0x0105_0000;
pub const TRANSFER_KEY: u32 = 0x0106_0000;
pub const CREATE_KEY: u32 = 0x0200_0000;
pub const READ_PUBKEY: u32 = 0x0201_0000;

// Hashing
pub const HASH: u32 = 0x0300_0000;
pub const HASH_UPDATE: u32 = 0x0301_0000;
pub const HMAC: u32 = 0x0302_0000;
pub const HASH_FINISH: u32 = 0x0303_0000;

pub const HASH_MODE_SHA1: u32 = 0x0002;
pub const HASH_MODE_SHA224: u32 = 0x0003;
pub const HASH_MODE_SHA256: u32 = 0x0004;
pub const HASH_MODE_SHA384: u32 = 0x0005;
pub const HASH_MODE_SHA512: u32 = 0x0006;

// Symmetric ciphers
pub const AES_ENCRYPT: u32 = 0x0400_0000;
pub const AES_DECRYPT: u32 = 0x0401_0000;
pub const AES_GCM_ENCRYPT: u32 = 0x0402_0000;
pub const AES_GCM_DECRYPT: u32 = 0x0403_0000;
pub const AES_CMAC: u32 = 0x0404_0000;
pub const AES_CCM_ENCRYPT: u32 = 0x0405_0000;
pub const AES_CCM_DECRYPT: u32 = 0x0406_0000;

// Signatures and key agreement
pub const ECDSA_SIGN: u32 = 0x0600_0000;
pub const ECDSA_VERIFY: u32 = 0x0601_0000;
pub const EDDSA_SIGN: u32 = 0x0602_0000;
pub const EDDSA_VERIFY: u32 = 0x0603_0000;
pub const ECDH: u32 = 0x0800_0000;

// Random numbers and attestation
pub const TRNG_GET_RANDOM: u32 = 0x0700_0000;
pub const ATTEST_PSA_IAT: u32 = 0x0A03_0000;
pub const ATTEST_CONFIG: u32 = 0x0A04_0000;

// Device management
pub const CHECK_HOST_IMAGE: u32 = 0x4306_0000;
pub const DBG_LOCK_APPLY: u32 = 0x430C_0000;
pub const ERASE_DEVICE: u32 = 0x430F_0000;
pub const READ_USER_DATA: u32 = 0x4380_0000;
pub const WRITE_USER_DATA: u32 = 0x4381_0000;
pub const ERASE_USER_DATA: u32 = 0x4382_0000;
pub const READ_OTP: u32 = 0xFE00_0000;
pub const GET_STATUS: u32 = 0xFE01_0000;
pub const INIT_OTP: u32 = 0xFF00_0000;
