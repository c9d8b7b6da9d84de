// Licensed under the Apache-2.0 license

#[cfg(test)]
pub mod test {
    use crate::test::init_logger;
    use se_emulator_periph::{EmulatedSemailbox, ReceivedCommand};
    use se_mailbox_common::{opcodes, InputTransfer, MailboxCommand, MailboxError, OutputTransfer, SeResponse};
    use se_mailbox_config::platforms::{HSE_V1_FIFO_CONFIG, HSE_V2_FIFO_CONFIG};
    use semailbox_driver::{FifoMailbox, InterruptMask, SemailboxFifo};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    pub fn test_fifo_message_layout() {
        init_logger();
        let fifo = EmulatedSemailbox::new(HSE_V1_FIFO_CONFIG);
        let mut mailbox = FifoMailbox::new(&fifo, HSE_V1_FIFO_CONFIG);

        let input = [0x11u8; 32];
        let mut output = [0u8; 32];
        let opcode = opcodes::with_mode(opcodes::AES_ENCRYPT, 0x0001);
        let mut command = MailboxCommand::new(opcode);
        command.add_parameter(0xCAFE).unwrap();
        command.add_parameter(0xF00D).unwrap();
        command.add_input(InputTransfer::new(&input).unwrap()).unwrap();
        command.add_output(OutputTransfer::new(&mut output).unwrap()).unwrap();

        let pending = mailbox.execute(&mut command).unwrap();
        let received = fifo.last_command().unwrap();
        let chains = pending.mailbox();
        assert_eq!(
            received,
            ReceivedCommand {
                size: (4 + 2) * 4,
                handle: None,
                command: opcode,
                data_in: chains.input_chain().head() as u32,
                data_out: chains.output_chain().head() as u32,
                parameters: vec![0xCAFE, 0xF00D],
            }
        );
        assert_eq!(chains.input_chain().descriptors()[0].data, input.as_ptr() as usize);
        assert_eq!(chains.input_chain().descriptors()[0].length, 32);
        assert_eq!(pending.read_response(), SeResponse::Ok);
    }

    #[test]
    pub fn test_fifo_handle_variant() {
        init_logger();
        let fifo = EmulatedSemailbox::new(HSE_V2_FIFO_CONFIG);
        let mut mailbox = FifoMailbox::new(&fifo, HSE_V2_FIFO_CONFIG);
        let mut command = MailboxCommand::new(opcodes::GET_STATUS);
        command.add_parameter(1).unwrap();
        command.add_parameter(2).unwrap();

        mailbox.execute(&mut command).unwrap().read_response();
        let received = fifo.last_command().unwrap();
        assert_eq!(received.size, (5 + 2) * 4);
        assert_eq!(received.handle, Some(0));
        assert_eq!(fifo.fifo_words(), vec![0, opcodes::GET_STATUS, 0, 0, 1, 2]);
    }

    #[test]
    pub fn test_fifo_responder_codes() {
        init_logger();
        let fifo = EmulatedSemailbox::new(HSE_V1_FIFO_CONFIG);
        fifo.set_latency(3);
        fifo.set_responder(Box::new(|cmd: &ReceivedCommand| match cmd.command {
            opcodes::GET_STATUS => SeResponse::Ok.code(),
            opcodes::ECDSA_VERIFY => SeResponse::InvalidSignature.code() | 0x12,
            _ => SeResponse::InvalidCommand.code(),
        }));
        let mut mailbox = FifoMailbox::new(&fifo, HSE_V1_FIFO_CONFIG);

        for (opcode, expected) in [
            (opcodes::GET_STATUS, SeResponse::Ok),
            (opcodes::ECDSA_VERIFY, SeResponse::InvalidSignature),
            (opcodes::ERASE_DEVICE, SeResponse::InvalidCommand),
        ] {
            let mut command = MailboxCommand::new(opcode);
            let mut pending = mailbox.execute(&mut command).unwrap();
            let mut polls = 0;
            let response = loop {
                match pending.try_read_response() {
                    Ok(response) => break response,
                    Err(still_pending) => {
                        polls += 1;
                        pending = still_pending;
                    }
                }
            };
            assert_eq!(response, expected);
            assert_eq!(polls, 3);
        }
        assert_eq!(fifo.received().len(), 3);
        assert_eq!(fifo.rx_reads(), 3);
    }

    #[test]
    pub fn test_fifo_unread_response_is_drained() {
        init_logger();
        let fifo = EmulatedSemailbox::new(HSE_V1_FIFO_CONFIG);
        let calls = Rc::new(Cell::new(0u32));
        let counter = calls.clone();
        fifo.set_responder(Box::new(move |_: &ReceivedCommand| {
            counter.set(counter.get() + 1);
            counter.get() << 16
        }));
        let mut mailbox = FifoMailbox::new(&fifo, HSE_V1_FIFO_CONFIG);
        let mut command = MailboxCommand::new(opcodes::GET_STATUS);

        // First response (InvalidCommand) is never read explicitly.
        let _ = mailbox.execute(&mut command).unwrap();
        assert_eq!(fifo.rx_reads(), 1);
        assert!(!fifo.rx_interrupt());

        let response = mailbox.execute(&mut command).unwrap().read_response();
        assert_eq!(response, SeResponse::AuthorizationError);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    pub fn test_fifo_leaked_token_blocks_execute() {
        init_logger();
        let fifo = EmulatedSemailbox::new(HSE_V1_FIFO_CONFIG);
        let mut mailbox = FifoMailbox::new(&fifo, HSE_V1_FIFO_CONFIG);
        let mut command = MailboxCommand::new(opcodes::GET_STATUS);

        std::mem::forget(mailbox.execute(&mut command).unwrap());
        assert!(matches!(
            mailbox.execute(&mut command),
            Err(MailboxError::ResponsePending)
        ));
        assert_eq!(fifo.received().len(), 1);

        assert_eq!(mailbox.drain_response(), Some(SeResponse::Ok));
        assert_eq!(mailbox.drain_response(), None);
        assert_eq!(
            mailbox.execute(&mut command).unwrap().read_response(),
            SeResponse::Ok
        );
    }

    #[test]
    pub fn test_fifo_parameter_limit() {
        let mut command = MailboxCommand::new(opcodes::HMAC);
        for i in 0..4 {
            command.add_parameter(i).unwrap();
        }
        assert_eq!(
            command.add_parameter(4),
            Err(MailboxError::TooManyParameters { max: 4 })
        );
        assert_eq!(command.parameters(), &[0, 1, 2, 3]);
    }

    #[test]
    pub fn test_fifo_interrupts() {
        let fifo = EmulatedSemailbox::new(HSE_V1_FIFO_CONFIG);
        let mailbox = FifoMailbox::new(&fifo, HSE_V1_FIFO_CONFIG);
        mailbox.enable_interrupts(InterruptMask::ALL);
        assert_eq!(mailbox.regs().configuration(), 0b11);
        mailbox.disable_interrupts(InterruptMask::TX);
        assert_eq!(mailbox.regs().configuration(), 0b10);
    }
}
