// Licensed under the Apache-2.0 license

//! Shared-RAM transport for the virtual SE.
//!
//! The application writes an input region at the top of RAM, records both
//! region addresses in ROOTDATA0/1 and resets. The root routine runs during
//! the next boot, answers in the output region, and the application reads
//! the answer once it is running again.

use crate::regs::bits::{MemSize, SwReset};
use crate::regs::regs::{DevInfo, ResetCtrl, SysCfg};
use crate::{InterruptMask, StaticRef};
use log::{debug, warn};
use se_mailbox_common::vse::{ParsedOutputFrame, VseInputFrame, VSE_MAILBOX_SIZE, VSE_MAILBOX_WORDS};
use se_mailbox_common::{InvalidReason, MailboxCommand, MailboxError, MailboxResult, SeResponse};
use se_mailbox_config::{SeMemoryMap, VseMemoryMap};
use tock_registers::interfaces::{Readable, Writeable};

/// Memory and system access needed by the VSE transport.
pub trait VsePlatform {
    fn read_word(&self, addr: u32) -> u32;
    fn write_word(&mut self, addr: u32, value: u32);
    /// Size of RAM in bytes.
    fn ram_size(&self) -> u32;
    /// Record the input and output region addresses for the root routine.
    fn set_root_data(&mut self, input: u32, output: u32);
    /// Reset the device. Hardware never returns from this call.
    fn request_reset(&mut self);
}

pub struct MmioVsePlatform {
    syscfg: StaticRef<SysCfg>,
    devinfo: StaticRef<DevInfo>,
    reset: StaticRef<ResetCtrl>,
}

impl MmioVsePlatform {
    /// # Safety
    ///
    /// `map` must describe the peripherals of the running device, and the VSE
    /// RAM window must be readable and writable for the program duration.
    pub const unsafe fn new(map: &SeMemoryMap) -> Self {
        Self {
            syscfg: StaticRef::new(map.syscfg_offset as usize as *const SysCfg),
            devinfo: StaticRef::new(map.devinfo_offset as usize as *const DevInfo),
            reset: StaticRef::new(map.reset_ctrl_offset as usize as *const ResetCtrl),
        }
    }
}

impl VsePlatform for MmioVsePlatform {
    fn read_word(&self, addr: u32) -> u32 {
        // SAFETY: callers only pass addresses inside the RAM window.
        unsafe { core::ptr::read_volatile(addr as usize as *const u32) }
    }

    fn write_word(&mut self, addr: u32, value: u32) {
        // SAFETY: callers only pass addresses inside the RAM window.
        unsafe { core::ptr::write_volatile(addr as usize as *mut u32, value) }
    }

    fn ram_size(&self) -> u32 {
        self.devinfo.msize.read(MemSize::SRAM) * 1024
    }

    fn set_root_data(&mut self, input: u32, output: u32) {
        self.syscfg.root_data0.set(input);
        self.syscfg.root_data1.set(output);
    }

    fn request_reset(&mut self) {
        self.reset.sw_reset.write(SwReset::KEY::Reset);
        loop {
            core::hint::spin_loop();
        }
    }
}

/// What the output region currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputState {
    Invalid(InvalidReason),
    /// Valid region, command not finished.
    Pending,
    Done,
}

/// Snapshot of the output region.
struct OutputRegion {
    base: u32,
    words: [u32; VSE_MAILBOX_WORDS],
}

impl OutputRegion {
    fn parse(&self) -> MailboxResult<ParsedOutputFrame<'_>> {
        ParsedOutputFrame::parse(&self.words).map_err(MailboxError::MailboxInvalid)
    }
}

pub struct VseMailbox<P: VsePlatform> {
    platform: P,
    map: VseMemoryMap,
}

impl<P: VsePlatform> VseMailbox<P> {
    pub const fn new(platform: P, map: VseMemoryMap) -> Self {
        Self { platform, map }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn output_base(&self) -> u32 {
        self.map
            .ram_start
            .wrapping_add(self.platform.ram_size())
            .wrapping_sub(VSE_MAILBOX_SIZE as u32)
            .wrapping_add(self.map.alias_offset())
    }

    pub fn input_base(&self) -> u32 {
        self.output_base().wrapping_sub(VSE_MAILBOX_SIZE as u32)
    }

    /// Serialize `command` into the input region and reset into the root
    /// routine. Returns only where the platform reset returns.
    pub fn execute(&mut self, command: &MailboxCommand<'_>) -> MailboxResult<()> {
        let frame = VseInputFrame::serialize(command)?;
        critical_section::with(|_| {
            let input = self.input_base();
            let output = self.output_base();
            if !self.map.contains(input, 2 * VSE_MAILBOX_SIZE as u32) {
                return Err(MailboxError::MailboxInvalid(InvalidReason::AddressOutOfRange));
            }
            for (i, word) in frame.words().iter().enumerate() {
                self.platform.write_word(input + (i * 4) as u32, *word);
            }
            self.platform.set_root_data(input, output);
            debug!(
                "vse: command {:#010x}, {} words at {:#010x}, resetting",
                command.command(),
                frame.words().len(),
                input
            );
            self.platform.request_reset();
            Ok(())
        })
    }

    fn read_output(&self) -> MailboxResult<OutputRegion> {
        let base = self.output_base();
        if !self.map.contains(base, VSE_MAILBOX_SIZE as u32) {
            return Err(MailboxError::MailboxInvalid(InvalidReason::AddressOutOfRange));
        }
        let mut words = [0u32; VSE_MAILBOX_WORDS];
        for (i, word) in words.iter_mut().enumerate() {
            *word = self.platform.read_word(base + (i * 4) as u32);
        }
        Ok(OutputRegion { base, words })
    }

    pub fn output_state(&self) -> OutputState {
        let region = match self.read_output() {
            Ok(region) => region,
            Err(MailboxError::MailboxInvalid(reason)) => return OutputState::Invalid(reason),
            Err(_) => return OutputState::Invalid(InvalidReason::AddressOutOfRange),
        };
        match ParsedOutputFrame::parse(&region.words) {
            Ok(frame) if frame.header.status.done() => OutputState::Done,
            Ok(_) => OutputState::Pending,
            Err(reason) => OutputState::Invalid(reason),
        }
    }

    pub fn is_output_valid(&self) -> bool {
        !matches!(self.output_state(), OutputState::Invalid(_))
    }

    /// Response code of the last command. Does not consume the output.
    pub fn read_response(&self) -> MailboxResult<SeResponse> {
        let region = self.read_output()?;
        let frame = region.parse()?;
        if !frame.header.status.done() {
            return Err(MailboxError::CommandNotDone);
        }
        Ok(frame.header.status.response())
    }

    /// Consume the output region: invalidate it, then copy its data into the
    /// output buffers of `command` in list order.
    pub fn ack_command(&mut self, command: &mut MailboxCommand<'_>) -> MailboxResult<SeResponse> {
        let region = self.read_output()?;
        let frame = region.parse()?;
        if !frame.header.status.done() {
            return Err(MailboxError::CommandNotDone);
        }

        let required = frame.data.len();
        let available = command.data_out().word_capacity();
        if required > available {
            warn!("vse: {} output words do not fit in {}", required, available);
            return Err(MailboxError::OutputBufferTooSmall {
                required_words: required,
                available_words: available,
            });
        }

        let index = frame.checksum_index();
        self.platform
            .write_word(region.base + (index * 4) as u32, !region.words[index]);

        let mut remaining = frame.data;
        for transfer in command.data_out_mut().iter_mut() {
            if remaining.is_empty() {
                break;
            }
            let (chunk, rest) = remaining.split_at(transfer.word_capacity().min(remaining.len()));
            if let Some(buf) = transfer.data_mut() {
                for (dst, word) in buf.chunks_exact_mut(4).zip(chunk) {
                    dst.copy_from_slice(&word.to_le_bytes());
                }
            }
            remaining = rest;
        }

        let response = frame.header.status.response();
        debug!(
            "vse: acked command {:#010x}, {} words, {}",
            frame.header.command, required, response
        );
        Ok(response)
    }

    pub fn get_version(&self) -> MailboxResult<u32> {
        let region = self.read_output()?;
        Ok(region.parse()?.header.version)
    }

    /// Configuration status bits 22..20 of the status word, shifted down.
    pub fn get_config_status(&self) -> MailboxResult<u32> {
        let region = self.read_output()?;
        Ok(region.parse()?.header.status.config_status())
    }

    pub fn get_otp_version(&self) -> MailboxResult<Option<u32>> {
        let region = self.read_output()?;
        let status = region.parse()?.header.status;
        Ok(status.otp_version_present().then(|| status.otp_version()))
    }

    pub fn read_executed_command(&self) -> MailboxResult<u32> {
        let region = self.read_output()?;
        Ok(region.parse()?.header.command)
    }

    /// The VSE raises no interrupts.
    pub fn enable_interrupts(&self, _mask: InterruptMask) {}

    pub fn disable_interrupts(&self, _mask: InterruptMask) {}
}
