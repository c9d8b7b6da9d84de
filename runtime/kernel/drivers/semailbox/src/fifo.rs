// Licensed under the Apache-2.0 license

//! FIFO transport for the hardware SE.
//!
//! A command is one TX message: a size header, an optional handle word, the
//! opcode, the heads of the input and output descriptor chains, then the
//! parameters. The SE reads and writes the caller's buffers directly and
//! answers with a single RX header word carrying the response code.

use crate::regs::bits::{Configuration, RxStatus, TxStatus};
use crate::regs::regs::SemailboxHost;
use crate::{InterruptMask, StaticRef};
use core::marker::PhantomData;
use log::{debug, trace, warn};
use se_mailbox_common::command::FIFO_MAX_OVERHEAD_WORDS;
use se_mailbox_common::{MailboxCommand, MailboxError, MailboxResult, RawDataTransferChain, SeResponse};
use se_mailbox_config::{FifoConfig, SeMemoryMap};
use tock_registers::interfaces::{Readable, Writeable};

/// Register-level access to the SEMAILBOX host block.
pub trait SemailboxFifo {
    /// The TX FIFO can accept a new message.
    fn tx_ready(&self) -> bool;
    fn write_tx_header(&self, size: u32);
    fn write_fifo(&self, word: u32);
    /// A response header is waiting in RX.
    fn rx_ready(&self) -> bool;
    /// Read the response header. Hardware clears the RX interrupt on read.
    fn read_rx_header(&self) -> u32;
    fn configuration(&self) -> u32;
    fn set_configuration(&self, value: u32);
}

impl<T: SemailboxFifo + ?Sized> SemailboxFifo for &T {
    fn tx_ready(&self) -> bool {
        (**self).tx_ready()
    }
    fn write_tx_header(&self, size: u32) {
        (**self).write_tx_header(size)
    }
    fn write_fifo(&self, word: u32) {
        (**self).write_fifo(word)
    }
    fn rx_ready(&self) -> bool {
        (**self).rx_ready()
    }
    fn read_rx_header(&self) -> u32 {
        (**self).read_rx_header()
    }
    fn configuration(&self) -> u32 {
        (**self).configuration()
    }
    fn set_configuration(&self, value: u32) {
        (**self).set_configuration(value)
    }
}

impl SemailboxFifo for StaticRef<SemailboxHost> {
    fn tx_ready(&self) -> bool {
        self.tx_status.is_set(TxStatus::TXINT)
    }

    fn write_tx_header(&self, size: u32) {
        self.tx_header.set(size);
    }

    fn write_fifo(&self, word: u32) {
        // Every FIFO slot address maps onto the same queue.
        self.fifo[0].set(word);
    }

    fn rx_ready(&self) -> bool {
        self.rx_status.is_set(RxStatus::RXINT)
    }

    fn read_rx_header(&self) -> u32 {
        self.rx_header.get()
    }

    fn configuration(&self) -> u32 {
        self.configuration.get()
    }

    fn set_configuration(&self, value: u32) {
        self.configuration.set(value);
    }
}

/// Address of a descriptor chain head as written into the FIFO.
///
/// The SE bus is 32 bits wide. On hosts with wider pointers only the low word
/// is sent, which only an emulated peer can make sense of.
pub(crate) const fn bus_address(addr: usize) -> u32 {
    (addr & u32::MAX as usize) as u32
}

/// Size in bytes of a TX message carrying `parameters` parameter words.
pub const fn message_size(config: &FifoConfig, parameters: usize) -> u32 {
    let overhead = if config.command_handle.is_some() {
        FIFO_MAX_OVERHEAD_WORDS
    } else {
        FIFO_MAX_OVERHEAD_WORDS - 1
    };
    ((overhead + parameters) * core::mem::size_of::<u32>()) as u32
}

pub struct FifoMailbox<R: SemailboxFifo> {
    regs: R,
    config: FifoConfig,
    data_in: RawDataTransferChain,
    data_out: RawDataTransferChain,
    response_pending: bool,
}

impl FifoMailbox<StaticRef<SemailboxHost>> {
    /// Mailbox over the SEMAILBOX host block described by `map`.
    ///
    /// # Safety
    ///
    /// `map.semailbox_host_offset` must address the SEMAILBOX host registers
    /// of the running device.
    pub const unsafe fn mmio(map: &SeMemoryMap, config: FifoConfig) -> Self {
        Self::new(
            StaticRef::new(map.semailbox_host_offset as usize as *const SemailboxHost),
            config,
        )
    }
}

impl<R: SemailboxFifo> FifoMailbox<R> {
    pub const fn new(regs: R, config: FifoConfig) -> Self {
        Self {
            regs,
            config,
            data_in: RawDataTransferChain::new(),
            data_out: RawDataTransferChain::new(),
            response_pending: false,
        }
    }

    pub fn regs(&self) -> &R {
        &self.regs
    }

    pub fn config(&self) -> &FifoConfig {
        &self.config
    }

    /// Hardware descriptors built for the last command's input list.
    pub fn input_chain(&self) -> &RawDataTransferChain {
        &self.data_in
    }

    pub fn output_chain(&self) -> &RawDataTransferChain {
        &self.data_out
    }

    /// Hand `command` to the SE.
    ///
    /// The returned token keeps the command, and with it every buffer the SE
    /// may still touch, borrowed until the response has been read.
    pub fn execute<'m, 'c, 'a>(
        &'m mut self,
        command: &'c mut MailboxCommand<'a>,
    ) -> MailboxResult<PendingResponse<'m, 'c, R>> {
        if self.response_pending {
            return Err(MailboxError::ResponsePending);
        }

        let data_in = bus_address(self.data_in.link(command.data_in()));
        let data_out = bus_address(self.data_out.link(command.data_out()));
        let parameters = command.parameters();

        while !self.regs.tx_ready() {
            core::hint::spin_loop();
        }

        self.regs
            .write_tx_header(message_size(&self.config, parameters.len()));
        if let Some(handle) = self.config.command_handle {
            self.regs.write_fifo(handle);
        }
        self.regs.write_fifo(command.command());
        self.regs.write_fifo(data_in);
        self.regs.write_fifo(data_out);
        for parameter in parameters {
            self.regs.write_fifo(*parameter);
        }
        self.response_pending = true;

        debug!(
            "semailbox: sent command {:#010x} with {} parameters, {} in, {} out",
            command.command(),
            parameters.len(),
            command.data_in().len(),
            command.data_out().len()
        );

        Ok(PendingResponse {
            mailbox: self,
            consumed: false,
            _command: PhantomData,
        })
    }

    /// Collect a response still owed for a command whose token was leaked.
    pub fn drain_response(&mut self) -> Option<SeResponse> {
        if !self.response_pending {
            return None;
        }
        while !self.regs.rx_ready() {
            core::hint::spin_loop();
        }
        Some(self.take_response())
    }

    pub fn enable_interrupts(&self, mask: InterruptMask) {
        let value = self.regs.configuration() | Self::config_bits(mask);
        self.regs.set_configuration(value);
    }

    pub fn disable_interrupts(&self, mask: InterruptMask) {
        let value = self.regs.configuration() & !Self::config_bits(mask);
        self.regs.set_configuration(value);
    }

    fn config_bits(mask: InterruptMask) -> u32 {
        let mut bits = 0;
        if mask.bits() & InterruptMask::TX.bits() != 0 {
            bits |= Configuration::TXINTEN::SET.value;
        }
        if mask.bits() & InterruptMask::RX.bits() != 0 {
            bits |= Configuration::RXINTEN::SET.value;
        }
        bits
    }

    fn take_response(&mut self) -> SeResponse {
        let header = self.regs.read_rx_header();
        self.response_pending = false;
        let response = SeResponse::from_status(header);
        trace!("semailbox: rx header {:#010x} ({})", header, response);
        response
    }
}

/// The single response owed for an executed command.
#[must_use = "the response must be read before the mailbox can be reused"]
pub struct PendingResponse<'m, 'c, R: SemailboxFifo> {
    mailbox: &'m mut FifoMailbox<R>,
    consumed: bool,
    _command: PhantomData<&'c mut ()>,
}

impl<R: SemailboxFifo> PendingResponse<'_, '_, R> {
    pub fn mailbox(&self) -> &FifoMailbox<R> {
        self.mailbox
    }

    pub fn is_ready(&self) -> bool {
        self.mailbox.regs.rx_ready()
    }

    /// Block until the SE answers, then decode the response code.
    pub fn read_response(mut self) -> SeResponse {
        self.wait_and_take()
    }

    /// Decode the response if it has arrived, otherwise hand the token back.
    pub fn try_read_response(mut self) -> Result<SeResponse, Self> {
        if !self.is_ready() {
            return Err(self);
        }
        self.consumed = true;
        Ok(self.mailbox.take_response())
    }

    fn wait_and_take(&mut self) -> SeResponse {
        while !self.is_ready() {
            core::hint::spin_loop();
        }
        self.consumed = true;
        self.mailbox.take_response()
    }
}

impl<R: SemailboxFifo> Drop for PendingResponse<'_, '_, R> {
    fn drop(&mut self) {
        if !self.consumed {
            let response = self.wait_and_take();
            warn!("semailbox: discarded unread response {}", response);
        }
    }
}
