// Licensed under the Apache-2.0 license

//! Memory maps for the supported platforms.

use crate::{FifoConfig, SeMemoryMap, VseMemoryMap};

/// Handle word used by SE generations whose FIFO protocol starts with a handle.
pub const DEFAULT_COMMAND_HANDLE: u32 = 0;

/// Series-2 parts with a hardware Secure Element.
pub const HSE_MEMORY_MAP: SeMemoryMap = SeMemoryMap {
    semailbox_host_offset: 0x4C00_0000,
    syscfg_offset: 0x5007_C000,
    devinfo_offset: 0x0FE0_8000,
    reset_ctrl_offset: 0x5000_4000,
    vse: VseMemoryMap {
        ram_start: 0x2000_0000,
        ram_window_size: 96 * 1024,
        non_secure_alias_offset: 0x1000_0000,
        non_secure: false,
    },
};

/// First-generation SE: no handle word in the FIFO message.
pub const HSE_V1_FIFO_CONFIG: FifoConfig = FifoConfig {
    command_handle: None,
};

/// Later SE generations reserve a leading handle word.
pub const HSE_V2_FIFO_CONFIG: FifoConfig = FifoConfig {
    command_handle: Some(DEFAULT_COMMAND_HANDLE),
};

/// Parts with only the virtual SE root routine, running non-secure.
pub const VSE_MEMORY_MAP: SeMemoryMap = SeMemoryMap {
    semailbox_host_offset: 0,
    syscfg_offset: 0x5007_C000,
    devinfo_offset: 0x0FE0_8000,
    reset_ctrl_offset: 0x5000_4000,
    vse: VseMemoryMap {
        ram_start: 0x2000_0000,
        ram_window_size: 64 * 1024,
        non_secure_alias_offset: 0x1000_0000,
        non_secure: true,
    },
};

/// Host emulator layout; a small RAM window keeps the emulated memory cheap.
pub const EMULATOR_MEMORY_MAP: SeMemoryMap = SeMemoryMap {
    semailbox_host_offset: 0x1000_0000,
    syscfg_offset: 0x1000_1000,
    devinfo_offset: 0x1000_2000,
    reset_ctrl_offset: 0x1000_3000,
    vse: VseMemoryMap {
        ram_start: 0x4000_0000,
        ram_window_size: 16 * 1024,
        non_secure_alias_offset: 0,
        non_secure: false,
    },
};
