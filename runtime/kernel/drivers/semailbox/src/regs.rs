// Licensed under the Apache-2.0 license

//! Register blocks used by the SE mailbox transports.

pub mod bits {
    use tock_registers::register_bitfields;

    register_bitfields! {
        u32,

        pub TxStatus [
            REMBYTES OFFSET(0) NUMBITS(16) [],
            MSGINFO OFFSET(16) NUMBITS(4) [],
            TXINT OFFSET(20) NUMBITS(1) [],
            TXFULL OFFSET(21) NUMBITS(1) [],
            TXERROR OFFSET(23) NUMBITS(1) [],
        ],

        pub RxStatus [
            REMBYTES OFFSET(0) NUMBITS(16) [],
            MSGINFO OFFSET(16) NUMBITS(4) [],
            RXINT OFFSET(20) NUMBITS(1) [],
            RXEMPTY OFFSET(21) NUMBITS(1) [],
            RXERROR OFFSET(23) NUMBITS(1) [],
        ],

        pub Configuration [
            TXINTEN OFFSET(0) NUMBITS(1) [],
            RXINTEN OFFSET(1) NUMBITS(1) [],
        ],

        pub MemSize [
            FLASH OFFSET(0) NUMBITS(16) [],
            SRAM OFFSET(16) NUMBITS(11) [],
        ],

        pub SwReset [
            KEY OFFSET(0) NUMBITS(32) [
                Reset = 0x05FA_0004,
            ],
        ],
    }
}

pub mod regs {
    use super::bits;
    use tock_registers::register_structs;
    use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};

    register_structs! {
        /// Host side of the hardware SE mailbox.
        pub SemailboxHost {
            (0x000 => pub fifo: [WriteOnly<u32>; 16]),
            (0x040 => pub tx_status: ReadOnly<u32, bits::TxStatus::Register>),
            (0x044 => pub rx_status: ReadOnly<u32, bits::RxStatus::Register>),
            (0x048 => pub tx_prot: ReadOnly<u32>),
            (0x04C => pub rx_prot: ReadOnly<u32>),
            (0x050 => pub tx_header: WriteOnly<u32>),
            (0x054 => pub rx_header: ReadOnly<u32>),
            (0x058 => pub configuration: ReadWrite<u32, bits::Configuration::Register>),
            (0x05C => @END),
        }
    }

    register_structs! {
        /// System configuration block; ROOTDATA0/1 survive a software reset.
        pub SysCfg {
            (0x000 => _reserved0),
            (0x600 => pub root_data0: ReadWrite<u32>),
            (0x604 => pub root_data1: ReadWrite<u32>),
            (0x608 => @END),
        }
    }

    register_structs! {
        /// Device information page.
        pub DevInfo {
            (0x000 => _reserved0),
            (0x00C => pub msize: ReadOnly<u32, bits::MemSize::Register>),
            (0x010 => @END),
        }
    }

    register_structs! {
        pub ResetCtrl {
            (0x000 => pub sw_reset: WriteOnly<u32, bits::SwReset::Register>),
            (0x004 => @END),
        }
    }
}
