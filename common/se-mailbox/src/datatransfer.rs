// Licensed under the Apache-2.0 license

//! Scatter-gather buffer descriptors
//!
//! A command carries two ordered descriptor lists, one for the data the SE
//! reads and one for the buffers it writes. Descriptors borrow the caller's
//! buffers, so a buffer cannot be released while a command that references it
//! is still alive. The hardware FIFO transport turns a list into a chain of
//! [`RawDataTransfer`] descriptors whose `next` field links to the following
//! descriptor and whose last `next` holds [`DATATRANSFER_STOP`].

use crate::error::{MailboxError, MailboxResult};
use arrayvec::ArrayVec;
use core::ops::BitOr;

/// `next` value of the last descriptor in a chain.
pub const DATATRANSFER_STOP: usize = 0x0000_0001;
pub const DATATRANSFER_DISCARD: u32 = 0x4000_0000;
pub const DATATRANSFER_REALIGN: u32 = 0x2000_0000;
pub const DATATRANSFER_CONST_ADDRESS: u32 = 0x1000_0000;
pub const DATATRANSFER_LENGTH_MASK: u32 = 0x0FFF_FFFF;

/// Maximum number of descriptors on one side of a command.
pub const MAX_DATATRANSFERS: usize = 8;

/// Flag bits packed above the length in a descriptor's length word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferFlags(u32);

impl TransferFlags {
    pub const NONE: Self = Self(0);
    pub const DISCARD: Self = Self(DATATRANSFER_DISCARD);
    pub const REALIGN: Self = Self(DATATRANSFER_REALIGN);
    pub const CONST_ADDRESS: Self = Self(DATATRANSFER_CONST_ADDRESS);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    const fn is_valid(self) -> bool {
        self.0 & !(DATATRANSFER_DISCARD | DATATRANSFER_REALIGN | DATATRANSFER_CONST_ADDRESS) == 0
    }
}

impl BitOr for TransferFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

fn check_length(len: usize) -> MailboxResult<()> {
    if len > DATATRANSFER_LENGTH_MASK as usize {
        return Err(MailboxError::TransferTooLong { len });
    }
    Ok(())
}

/// Fields every descriptor exposes to the transports.
pub trait Transfer {
    /// Bus address of the buffer, 0 when there is none.
    fn address(&self) -> usize;

    /// Length in bytes, without flags.
    fn len(&self) -> usize;

    fn flags(&self) -> TransferFlags;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length word as the SE expects it: byte count with the flag bits on top.
    fn length_word(&self) -> u32 {
        (self.len() as u32 & DATATRANSFER_LENGTH_MASK) | self.flags().bits()
    }
}

/// Buffer the SE reads from.
#[derive(Debug, Clone, Copy)]
pub struct InputTransfer<'a> {
    data: &'a [u8],
    flags: TransferFlags,
}

impl<'a> InputTransfer<'a> {
    pub fn new(data: &'a [u8]) -> MailboxResult<Self> {
        Self::with_flags(data, TransferFlags::NONE)
    }

    pub fn with_flags(data: &'a [u8], flags: TransferFlags) -> MailboxResult<Self> {
        check_length(data.len())?;
        if !flags.is_valid() || flags.contains(TransferFlags::DISCARD) {
            return Err(MailboxError::InvalidTransferFlags(flags.bits()));
        }
        Ok(Self { data, flags })
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Number of 32-bit words needed to carry the buffer.
    pub fn word_len(&self) -> usize {
        self.data.len().div_ceil(4)
    }

    /// The buffer as little-endian words, the last one zero padded.
    pub fn words(&self) -> impl Iterator<Item = u32> + 'a {
        self.data.chunks(4).map(|chunk| {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            u32::from_le_bytes(word)
        })
    }
}

impl Transfer for InputTransfer<'_> {
    fn address(&self) -> usize {
        self.data.as_ptr() as usize
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn flags(&self) -> TransferFlags {
        self.flags
    }
}

/// Buffer the SE writes to, or a discard descriptor that drops that many
/// output bytes.
#[derive(Debug)]
pub struct OutputTransfer<'a> {
    data: Option<&'a mut [u8]>,
    len: usize,
    flags: TransferFlags,
}

impl<'a> OutputTransfer<'a> {
    pub fn new(data: &'a mut [u8]) -> MailboxResult<Self> {
        Self::with_flags(data, TransferFlags::NONE)
    }

    pub fn with_flags(data: &'a mut [u8], flags: TransferFlags) -> MailboxResult<Self> {
        check_length(data.len())?;
        if !flags.is_valid() || flags.contains(TransferFlags::DISCARD) {
            return Err(MailboxError::InvalidTransferFlags(flags.bits()));
        }
        Ok(Self {
            len: data.len(),
            data: Some(data),
            flags,
        })
    }

    pub fn discard(len: usize) -> MailboxResult<Self> {
        check_length(len)?;
        Ok(Self {
            data: None,
            len,
            flags: TransferFlags::DISCARD,
        })
    }

    pub fn is_discard(&self) -> bool {
        self.data.is_none()
    }

    /// Whole words this descriptor can take.
    pub fn word_capacity(&self) -> usize {
        self.len / 4
    }

    pub fn data_mut(&mut self) -> Option<&mut [u8]> {
        self.data.as_deref_mut()
    }
}

impl Transfer for OutputTransfer<'_> {
    fn address(&self) -> usize {
        self.data.as_deref().map_or(0, |d| d.as_ptr() as usize)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn flags(&self) -> TransferFlags {
        self.flags
    }
}

/// Ordered, append-only descriptor list.
#[derive(Debug)]
pub struct DataTransferList<T> {
    entries: ArrayVec<T, MAX_DATATRANSFERS>,
}

impl<T> Default for DataTransferList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DataTransferList<T> {
    pub const fn new() -> Self {
        Self {
            entries: ArrayVec::new_const(),
        }
    }

    /// Append a descriptor after the current tail.
    pub fn push(&mut self, transfer: T) -> MailboxResult<()> {
        self.entries
            .try_push(transfer)
            .map_err(|_| MailboxError::TooManyDataTransfers {
                max: MAX_DATATRANSFERS,
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.entries.iter_mut()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Transfer> DataTransferList<T> {
    /// Sum of the byte lengths of all descriptors.
    pub fn total_len(&self) -> usize {
        self.entries.iter().map(Transfer::len).sum()
    }
}

impl DataTransferList<OutputTransfer<'_>> {
    /// Whole words the list can take, discard descriptors included.
    pub fn word_capacity(&self) -> usize {
        self.entries.iter().map(OutputTransfer::word_capacity).sum()
    }
}

/// Descriptor layout read by the SE DMA engine.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDataTransfer {
    pub data: usize,
    pub next: usize,
    pub length: u32,
}

impl RawDataTransfer {
    pub const EMPTY: Self = Self {
        data: 0,
        next: DATATRANSFER_STOP,
        length: 0,
    };
}

/// Storage for one materialized descriptor chain.
///
/// The chain links to its own elements, so it must stay in place for as long
/// as the SE may walk it.
#[derive(Debug)]
pub struct RawDataTransferChain {
    descriptors: [RawDataTransfer; MAX_DATATRANSFERS],
    len: usize,
}

impl Default for RawDataTransferChain {
    fn default() -> Self {
        Self::new()
    }
}

impl RawDataTransferChain {
    pub const fn new() -> Self {
        Self {
            descriptors: [RawDataTransfer::EMPTY; MAX_DATATRANSFERS],
            len: 0,
        }
    }

    /// Rebuild the chain from `list` and return the head address (0 if empty).
    pub fn link<T: Transfer>(&mut self, list: &DataTransferList<T>) -> usize {
        self.len = list.len();
        for (slot, transfer) in self.descriptors.iter_mut().zip(list.iter()) {
            *slot = RawDataTransfer {
                data: transfer.address(),
                next: DATATRANSFER_STOP,
                length: transfer.length_word(),
            };
        }
        for i in 1..self.len {
            let next = &self.descriptors[i] as *const RawDataTransfer as usize;
            self.descriptors[i - 1].next = next;
        }
        self.head()
    }

    pub fn head(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            self.descriptors.as_ptr() as usize
        }
    }

    pub fn descriptors(&self) -> &[RawDataTransfer] {
        &self.descriptors[..self.len]
    }
}
