/*++

Licensed under the Apache-2.0 license.

File Name:

    vse_device.rs

Abstract:

    Emulated virtual SE: a RAM window, the ROOTDATA registers, a reset line
    and the root routine that runs on the next boot.

--*/

use crate::vse_handler::{VseReply, VseRootHandler};
use log::{debug, warn};
use se_mailbox_common::vse::{
    build_output_frame, ParsedInputFrame, VseStatus, VSE_INPUT_HEADER_WORDS, VSE_MAILBOX_SIZE,
    VSE_MAILBOX_WORDS,
};
use se_mailbox_common::SeResponse;
use se_mailbox_config::VseMemoryMap;
use semailbox_driver::VsePlatform;

pub struct EmulatedVseDevice {
    map: VseMemoryMap,
    ram: Vec<u32>,
    ram_size: u32,
    root_data: (u32, u32),
    reset_requests: usize,
    version: u32,
    config: VseStatus,
    handler: Box<dyn VseRootHandler>,
}

impl EmulatedVseDevice {
    /// Create a device whose RAM fills the whole window of `map`.
    ///
    /// # Arguments
    ///
    /// * `map` - RAM window layout
    /// * `handler` - Command handler run by the root routine
    pub fn new(map: VseMemoryMap, handler: Box<dyn VseRootHandler>) -> Self {
        Self {
            map,
            ram: vec![0; map.ram_window_size as usize / 4],
            ram_size: map.ram_window_size,
            root_data: (0, 0),
            reset_requests: 0,
            version: 0x0001_0000,
            config: VseStatus::default(),
            handler,
        }
    }

    pub fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    /// Override the RAM size reported by the device information page.
    pub fn set_ram_size(&mut self, ram_size: u32) {
        self.ram_size = ram_size;
    }

    pub fn set_debug_locked(&mut self, locked: bool) {
        self.config.set_debug_locked(locked);
    }

    pub fn set_secure_boot_enabled(&mut self, enabled: bool) {
        self.config.set_secure_boot_enabled(enabled);
    }

    pub fn set_otp_version(&mut self, version: Option<u8>) {
        self.config.set_otp_version_present(version.is_some());
        self.config.set_otp_version(version.unwrap_or_default().into());
    }

    pub fn reset_requests(&self) -> usize {
        self.reset_requests
    }

    /// Input and output region addresses recorded before the last reset.
    pub fn root_data(&self) -> (u32, u32) {
        self.root_data
    }

    fn index(&self, addr: u32) -> Option<usize> {
        if addr % 4 != 0 || !self.map.contains(addr, 4) {
            return None;
        }
        Some(((addr - self.map.window_start()) / 4) as usize)
    }

    /// Region of up to one mailbox starting at `base`, clipped to the window.
    pub fn region(&self, base: u32) -> Vec<u32> {
        (0..VSE_MAILBOX_WORDS)
            .map_while(|i| self.index(base.wrapping_add((i * 4) as u32)))
            .map(|i| self.ram[i])
            .collect()
    }

    /// Flip bits of one RAM word.
    pub fn corrupt_word(&mut self, addr: u32, mask: u32) {
        if let Some(i) = self.index(addr) {
            self.ram[i] ^= mask;
        }
    }

    /// Run the root routine: answer a valid input region, then consume it.
    ///
    /// Returns the response written, or `None` when no valid command was found.
    pub fn boot(&mut self) -> Option<SeResponse> {
        let (input, output) = self.root_data;
        if !self.map.contains(input, VSE_MAILBOX_SIZE as u32)
            || !self.map.contains(output, VSE_MAILBOX_SIZE as u32)
        {
            debug!("emulated vse: no mailbox recorded");
            return None;
        }

        let words = self.region(input);
        let (command, reply, checksum_index) = match ParsedInputFrame::parse(&words) {
            Ok(frame) => (
                frame.command,
                self.handler.handle(frame.command, frame.parameters, frame.data),
                VSE_INPUT_HEADER_WORDS + frame.parameters.len() + frame.data.len(),
            ),
            Err(reason) => {
                debug!("emulated vse: input region invalid: {}", reason);
                return None;
            }
        };

        let mut status = self.config;
        status.set_done(true);
        status.set_response(reply.response);
        let frame = match build_output_frame(self.version, status, command, &reply.data) {
            Ok(frame) => frame,
            Err(err) => {
                warn!("emulated vse: reply does not fit: {}", err);
                status.set_response(SeResponse::InternalError);
                build_output_frame(self.version, status, command, &[]).ok()?
            }
        };
        for (i, word) in frame.iter().enumerate() {
            self.write_word(output + (i * 4) as u32, *word);
        }

        // Consume the command so a later reset does not replay it.
        self.corrupt_word(input + (checksum_index * 4) as u32, u32::MAX);
        debug!(
            "emulated vse: command {:#010x} answered {}",
            command,
            status.response()
        );
        Some(status.response())
    }
}

impl VsePlatform for EmulatedVseDevice {
    fn read_word(&self, addr: u32) -> u32 {
        match self.index(addr) {
            Some(i) => self.ram[i],
            None => {
                warn!("emulated vse: read outside RAM at {:#010x}", addr);
                0
            }
        }
    }

    fn write_word(&mut self, addr: u32, value: u32) {
        match self.index(addr) {
            Some(i) => self.ram[i] = value,
            None => warn!("emulated vse: write outside RAM at {:#010x}", addr),
        }
    }

    fn ram_size(&self) -> u32 {
        self.ram_size
    }

    fn set_root_data(&mut self, input: u32, output: u32) {
        self.root_data = (input, output);
    }

    fn request_reset(&mut self) {
        self.reset_requests += 1;
    }
}

/// Handler that answers every command with the given reply.
pub fn fixed_reply(reply: VseReply) -> Box<dyn VseRootHandler> {
    Box::new(move |_: u32, _: &[u32], _: &[u32]| reply.clone())
}
