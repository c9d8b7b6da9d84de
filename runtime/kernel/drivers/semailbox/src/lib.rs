// Licensed under the Apache-2.0 license

//! Host-side drivers for the Secure Element mailbox.
//!
//! `FifoMailbox` talks to the hardware SE over the SEMAILBOX register FIFO.
//! `VseMailbox` talks to the virtual SE through two RAM regions and a reset.

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "fifo")]
pub mod fifo;
pub mod regs;
mod static_ref;
#[cfg(feature = "vse")]
pub mod vse;

pub use static_ref::StaticRef;

#[cfg(feature = "fifo")]
pub use fifo::{FifoMailbox, PendingResponse, SemailboxFifo};
#[cfg(feature = "vse")]
pub use vse::{MmioVsePlatform, OutputState, VseMailbox, VsePlatform};

/// Mailbox interrupt sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptMask(u32);

impl InterruptMask {
    pub const TX: Self = Self(1 << 0);
    pub const RX: Self = Self(1 << 1);
    pub const ALL: Self = Self(Self::TX.0 | Self::RX.0);

    pub const fn bits(self) -> u32 {
        self.0
    }
}
