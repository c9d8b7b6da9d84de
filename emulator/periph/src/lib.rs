/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Host models of the Secure Element peers used to exercise the mailbox
    drivers without hardware.

--*/

mod semailbox;
mod vse_device;
mod vse_handler;

pub use semailbox::{EmulatedSemailbox, ReceivedCommand, Responder};
pub use vse_device::{fixed_reply, EmulatedVseDevice};
pub use vse_handler::{DefaultVseHandler, VseReply, VseRootHandler};
