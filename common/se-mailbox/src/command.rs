// Licensed under the Apache-2.0 license

//! Mailbox command structure

use crate::datatransfer::{DataTransferList, InputTransfer, OutputTransfer};
use crate::error::{MailboxError, MailboxResult};
use arrayvec::ArrayVec;

/// Word slots in the SEMAILBOX FIFO.
pub const SEMAILBOX_FIFO_WORDS: usize = 16;

/// Largest FIFO message overhead: header, handle, command, input and output heads.
pub const FIFO_MAX_OVERHEAD_WORDS: usize = 5;

/// Parameter words that fit in the FIFO after the overhead.
pub const FIFO_PARAMETER_SLOTS: usize = SEMAILBOX_FIFO_WORDS - FIFO_MAX_OVERHEAD_WORDS;

/// Maximum number of parameter words in one command.
pub const MAX_PARAMETERS: usize = 4;

const _: () = assert!(MAX_PARAMETERS <= FIFO_PARAMETER_SLOTS);

/// One pending SE operation: opcode, parameter words and the descriptor lists
/// for the data the SE reads and writes.
///
/// A command is consumed by exactly one `execute`; build a fresh one to retry.
#[derive(Debug)]
pub struct MailboxCommand<'a> {
    command: u32,
    data_in: DataTransferList<InputTransfer<'a>>,
    data_out: DataTransferList<OutputTransfer<'a>>,
    parameters: ArrayVec<u32, MAX_PARAMETERS>,
}

impl<'a> MailboxCommand<'a> {
    pub const fn new(command: u32) -> Self {
        Self {
            command,
            data_in: DataTransferList::new(),
            data_out: DataTransferList::new(),
            parameters: ArrayVec::new_const(),
        }
    }

    /// Start over with a new opcode, dropping parameters and descriptors.
    pub fn reset(&mut self, command: u32) {
        self.command = command;
        self.data_in.clear();
        self.data_out.clear();
        self.parameters.clear();
    }

    pub fn command(&self) -> u32 {
        self.command
    }

    pub fn add_parameter(&mut self, value: u32) -> MailboxResult<()> {
        self.parameters
            .try_push(value)
            .map_err(|_| MailboxError::TooManyParameters {
                max: MAX_PARAMETERS,
            })
    }

    pub fn add_input(&mut self, transfer: InputTransfer<'a>) -> MailboxResult<()> {
        self.data_in.push(transfer)
    }

    pub fn add_output(&mut self, transfer: OutputTransfer<'a>) -> MailboxResult<()> {
        self.data_out.push(transfer)
    }

    pub fn parameters(&self) -> &[u32] {
        &self.parameters
    }

    pub fn data_in(&self) -> &DataTransferList<InputTransfer<'a>> {
        &self.data_in
    }

    pub fn data_out(&self) -> &DataTransferList<OutputTransfer<'a>> {
        &self.data_out
    }

    pub fn data_out_mut(&mut self) -> &mut DataTransferList<OutputTransfer<'a>> {
        &mut self.data_out
    }
}
