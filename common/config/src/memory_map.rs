// Licensed under the Apache-2.0 license

/// Peripheral and RAM layout used by the mailbox drivers.
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub struct SeMemoryMap {
    pub semailbox_host_offset: u32, // SEMAILBOX_HOST register block
    pub syscfg_offset: u32,         // system configuration block (ROOTDATA0/1)
    pub devinfo_offset: u32,        // device information page (RAM size)
    pub reset_ctrl_offset: u32,     // software reset request register
    pub vse: VseMemoryMap,
}

/// RAM window that holds the VSE root mailboxes.
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub struct VseMemoryMap {
    pub ram_start: u32,               // first byte of RAM as seen by the secure alias
    pub ram_window_size: u32,         // size of the RAM window in bytes
    pub non_secure_alias_offset: u32, // distance from the secure to the non-secure alias
    pub non_secure: bool,             // the application runs from the non-secure alias
}

impl VseMemoryMap {
    /// Offset added to every secure-alias RAM address for this build.
    pub const fn alias_offset(&self) -> u32 {
        if self.non_secure {
            self.non_secure_alias_offset
        } else {
            0
        }
    }

    /// First address of the RAM window in the alias this build runs from.
    pub const fn window_start(&self) -> u32 {
        self.ram_start.wrapping_add(self.alias_offset())
    }

    /// One past the last address of the RAM window, widened so a window that
    /// ends at the top of the address space does not wrap.
    pub const fn window_end(&self) -> u64 {
        self.window_start() as u64 + self.ram_window_size as u64
    }

    /// Whether `[addr, addr + len)` lies entirely inside the RAM window.
    pub const fn contains(&self, addr: u32, len: u32) -> bool {
        addr >= self.window_start() && (addr as u64 + len as u64) <= self.window_end()
    }
}

/// Settings for the FIFO (hardware SEMAILBOX) transport.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default)]
pub struct FifoConfig {
    /// Handle word written ahead of the command on SE generations that reserve one.
    pub command_handle: Option<u32>,
}
