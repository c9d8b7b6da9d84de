// Licensed under the Apache-2.0 license

#[cfg(test)]
pub mod test {
    use crate::test::init_logger;
    use se_emulator_periph::{fixed_reply, DefaultVseHandler, EmulatedVseDevice, VseReply};
    use se_mailbox_common::vse::{VSE_MAGIC, VSE_MAILBOX_SIZE, VSE_OUTPUT_HEADER_WORDS};
    use se_mailbox_common::{
        opcodes, InputTransfer, InvalidReason, MailboxCommand, MailboxError, OutputTransfer,
        SeResponse,
    };
    use se_mailbox_config::platforms::EMULATOR_MEMORY_MAP;
    use se_mailbox_config::VseMemoryMap;
    use semailbox_driver::{OutputState, VseMailbox, VsePlatform};
    use sha2::{Digest, Sha256};

    const MAP: VseMemoryMap = EMULATOR_MEMORY_MAP.vse;

    fn vse_mailbox(device: EmulatedVseDevice) -> VseMailbox<EmulatedVseDevice> {
        init_logger();
        VseMailbox::new(device, MAP)
    }

    fn default_device() -> EmulatedVseDevice {
        EmulatedVseDevice::new(
            MAP,
            Box::new(DefaultVseHandler::new(7).with_otp(vec![0xA0, 0xA1, 0xA2, 0xA3])),
        )
    }

    #[test]
    pub fn test_vse_sha256_round_trip() {
        let mut mailbox = vse_mailbox(default_device());
        let message = b"the quick brown fox jumps over the lazy dog";

        let command = {
            let mut command = MailboxCommand::new(opcodes::with_mode(
                opcodes::HASH,
                opcodes::HASH_MODE_SHA256,
            ));
            command.add_parameter(message.len() as u32).unwrap();
            command.add_input(InputTransfer::new(message).unwrap()).unwrap();
            command
        };
        mailbox.execute(&command).unwrap();
        assert_eq!(mailbox.platform().reset_requests(), 1);
        assert_eq!(
            mailbox.platform().root_data(),
            (mailbox.input_base(), mailbox.output_base())
        );
        assert_eq!(mailbox.output_state(), OutputState::Invalid(InvalidReason::BadMagic));

        assert_eq!(mailbox.platform_mut().boot(), Some(SeResponse::Ok));
        assert_eq!(mailbox.output_state(), OutputState::Done);
        assert_eq!(mailbox.read_executed_command(), Ok(command.command()));

        let mut digest = [0u8; 32];
        let mut ack = MailboxCommand::new(command.command());
        ack.add_output(OutputTransfer::new(&mut digest).unwrap()).unwrap();
        assert_eq!(mailbox.ack_command(&mut ack), Ok(SeResponse::Ok));
        drop(ack);
        assert_eq!(digest.as_slice(), Sha256::digest(message).as_slice());
    }

    #[test]
    pub fn test_vse_validity_is_idempotent() {
        let mut mailbox = vse_mailbox(default_device());
        mailbox.execute(&MailboxCommand::new(opcodes::GET_STATUS)).unwrap();
        mailbox.platform_mut().boot();

        for _ in 0..3 {
            assert!(mailbox.is_output_valid());
            assert_eq!(mailbox.read_response(), Ok(SeResponse::Ok));
        }
    }

    #[test]
    pub fn test_vse_ack_is_single_use() {
        let mut mailbox = vse_mailbox(default_device());
        mailbox.execute(&MailboxCommand::new(opcodes::GET_STATUS)).unwrap();
        mailbox.platform_mut().boot();

        let mut ack = MailboxCommand::new(opcodes::GET_STATUS);
        assert_eq!(mailbox.ack_command(&mut ack), Ok(SeResponse::Ok));
        assert!(!mailbox.is_output_valid());
        assert_eq!(
            mailbox.ack_command(&mut ack),
            Err(MailboxError::MailboxInvalid(InvalidReason::ChecksumMismatch))
        );
    }

    #[test]
    pub fn test_vse_otp_read_into_scattered_buffers() {
        let mut mailbox = vse_mailbox(default_device());
        let mut command = MailboxCommand::new(opcodes::READ_OTP);
        command.add_parameter(1).unwrap();
        command.add_parameter(3).unwrap();
        mailbox.execute(&command).unwrap();
        mailbox.platform_mut().boot();

        let mut head = [0u8; 4];
        let mut tail = [0xFFu8; 10];
        {
            let mut ack = MailboxCommand::new(opcodes::READ_OTP);
            ack.add_output(OutputTransfer::new(&mut head).unwrap()).unwrap();
            ack.add_output(OutputTransfer::new(&mut tail).unwrap()).unwrap();
            assert_eq!(mailbox.ack_command(&mut ack), Ok(SeResponse::Ok));
        }
        assert_eq!(u32::from_le_bytes(head), 0xA1);
        assert_eq!(&tail[..8], &[0xA2, 0, 0, 0, 0xA3, 0, 0, 0]);
        assert_eq!(&tail[8..], &[0xFF, 0xFF]);
    }

    #[test]
    pub fn test_vse_undersized_output_reports_invalid_parameter() {
        let mut mailbox = vse_mailbox(default_device());
        let mut command = MailboxCommand::new(opcodes::TRNG_GET_RANDOM);
        command.add_parameter(16).unwrap();
        mailbox.execute(&command).unwrap();
        mailbox.platform_mut().boot();

        let mut small = [0u8; 12];
        {
            let mut ack = MailboxCommand::new(opcodes::TRNG_GET_RANDOM);
            ack.add_output(OutputTransfer::new(&mut small).unwrap()).unwrap();
            let err = mailbox.ack_command(&mut ack).unwrap_err();
            assert_eq!(err.response(), SeResponse::InvalidParameter);
            assert_eq!(
                err,
                MailboxError::OutputBufferTooSmall {
                    required_words: 4,
                    available_words: 3
                }
            );
        }
        assert_eq!(small, [0u8; 12]);
        assert!(mailbox.is_output_valid());

        let mut random = [0u8; 16];
        let mut ack = MailboxCommand::new(opcodes::TRNG_GET_RANDOM);
        ack.add_output(OutputTransfer::new(&mut random).unwrap()).unwrap();
        assert_eq!(mailbox.ack_command(&mut ack), Ok(SeResponse::Ok));
    }

    #[test]
    pub fn test_vse_random_request_larger_than_output_region() {
        let mut mailbox = vse_mailbox(default_device());
        let mut command = MailboxCommand::new(opcodes::TRNG_GET_RANDOM);
        command.add_parameter(u32::MAX).unwrap();
        mailbox.execute(&command).unwrap();

        assert_eq!(
            mailbox.platform_mut().boot(),
            Some(SeResponse::InvalidParameter)
        );
        let mut ack = MailboxCommand::new(opcodes::TRNG_GET_RANDOM);
        assert_eq!(mailbox.ack_command(&mut ack), Ok(SeResponse::InvalidParameter));
    }

    #[test]
    pub fn test_vse_status_fields() {
        let mut device = EmulatedVseDevice::new(MAP, fixed_reply(VseReply::error(SeResponse::CryptoError)));
        device.set_version(0x0002_0001);
        device.set_secure_boot_enabled(true);
        device.set_otp_version(Some(0x42));
        let mut mailbox = vse_mailbox(device);

        mailbox.execute(&MailboxCommand::new(opcodes::ECDSA_SIGN)).unwrap();
        mailbox.platform_mut().boot();
        assert_eq!(mailbox.read_response(), Ok(SeResponse::CryptoError));
        assert_eq!(mailbox.get_version(), Ok(0x0002_0001));
        assert_eq!(mailbox.get_config_status(), Ok(0b110));
        assert_eq!(mailbox.get_otp_version(), Ok(Some(0x42)));
        assert_eq!(mailbox.read_executed_command(), Ok(opcodes::ECDSA_SIGN));
    }

    #[test]
    pub fn test_vse_unknown_command() {
        let mut mailbox = vse_mailbox(default_device());
        mailbox.execute(&MailboxCommand::new(opcodes::AES_GCM_ENCRYPT)).unwrap();
        assert_eq!(mailbox.platform_mut().boot(), Some(SeResponse::InvalidCommand));
        assert_eq!(mailbox.read_response(), Ok(SeResponse::InvalidCommand));
    }

    #[test]
    pub fn test_vse_good_magic_bad_checksum() {
        let mut mailbox = vse_mailbox(default_device());
        mailbox.execute(&MailboxCommand::new(opcodes::GET_STATUS)).unwrap();
        mailbox.platform_mut().boot();

        let output = mailbox.output_base();
        assert_eq!(mailbox.platform().read_word(output), VSE_MAGIC);
        let checksum = output + (VSE_OUTPUT_HEADER_WORDS as u32) * 4;
        mailbox.platform_mut().corrupt_word(checksum, 1 << 5);
        assert_eq!(mailbox.platform().read_word(output), VSE_MAGIC);
        assert_eq!(
            mailbox.output_state(),
            OutputState::Invalid(InvalidReason::ChecksumMismatch)
        );
        assert_eq!(
            mailbox.read_response(),
            Err(MailboxError::MailboxInvalid(InvalidReason::ChecksumMismatch))
        );
    }

    #[test]
    pub fn test_vse_corrupted_input_is_not_executed() {
        let mut mailbox = vse_mailbox(default_device());
        let mut command = MailboxCommand::new(opcodes::GET_STATUS);
        command.add_parameter(5).unwrap();
        mailbox.execute(&command).unwrap();
        let input = mailbox.input_base();
        mailbox.platform_mut().corrupt_word(input + 12, 0x8000_0000);
        assert_eq!(mailbox.platform_mut().boot(), None);
        assert!(!mailbox.is_output_valid());
    }

    #[test]
    pub fn test_vse_region_outside_window() {
        let mut device = default_device();
        device.set_ram_size(MAP.ram_window_size + VSE_MAILBOX_SIZE as u32);
        let mut mailbox = vse_mailbox(device);
        assert_eq!(
            mailbox.output_state(),
            OutputState::Invalid(InvalidReason::AddressOutOfRange)
        );
        assert_eq!(
            mailbox.execute(&MailboxCommand::new(opcodes::GET_STATUS)),
            Err(MailboxError::MailboxInvalid(InvalidReason::AddressOutOfRange))
        );
        assert_eq!(mailbox.platform().reset_requests(), 0);

        let mut device = default_device();
        device.set_ram_size(VSE_MAILBOX_SIZE as u32);
        let mailbox = vse_mailbox(device);
        assert!(mailbox.output_base() >= MAP.window_start());
        assert!(mailbox.input_base() < MAP.window_start());
        assert_eq!(mailbox.output_state(), OutputState::Invalid(InvalidReason::BadMagic));
    }

    #[test]
    pub fn test_vse_input_overflow() {
        let mut mailbox = vse_mailbox(default_device());
        let data = [0u8; 4 * 121];
        let mut command = MailboxCommand::new(opcodes::HASH);
        command.add_parameter(1).unwrap();
        command.add_parameter(2).unwrap();
        command.add_parameter(3).unwrap();
        command.add_input(InputTransfer::new(&data).unwrap()).unwrap();
        assert!(mailbox.execute(&command).is_ok());

        command.add_parameter(4).unwrap();
        assert_eq!(
            mailbox.execute(&command),
            Err(MailboxError::InputRegionOverflow {
                words: 125,
                capacity: 124
            })
        );
        assert_eq!(mailbox.platform().reset_requests(), 1);
    }
}
