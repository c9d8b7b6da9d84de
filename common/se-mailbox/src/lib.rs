// Licensed under the Apache-2.0 license

//! Secure Element mailbox protocol types
//!
//! Command structures, scatter-gather descriptors, response codes and the
//! shared-RAM frame format used to talk to the SE (hardware FIFO) or the
//! virtual SE root routine (RAM mailbox handed over across a reset).

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

pub mod command;
pub mod datatransfer;
pub mod error;
pub mod opcodes;
pub mod response;
pub mod vse;

pub use command::{MailboxCommand, FIFO_PARAMETER_SLOTS, MAX_PARAMETERS, SEMAILBOX_FIFO_WORDS};
pub use datatransfer::{
    DataTransferList, InputTransfer, OutputTransfer, RawDataTransfer, RawDataTransferChain,
    Transfer, TransferFlags, DATATRANSFER_STOP, MAX_DATATRANSFERS,
};
pub use error::{InvalidReason, MailboxError, MailboxResult};
pub use response::{SeResponse, RESPONSE_MASK};
