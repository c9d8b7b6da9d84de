/*++

Licensed under the Apache-2.0 license.

File Name:

    semailbox.rs

Abstract:

    Register-level model of the SEMAILBOX host block.

--*/

use log::{debug, warn};
use se_mailbox_common::SeResponse;
use se_mailbox_config::FifoConfig;
use semailbox_driver::SemailboxFifo;
use std::cell::RefCell;

/// A complete TX message as decoded by the emulated SE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedCommand {
    /// Message size in bytes from the TX header.
    pub size: u32,
    pub handle: Option<u32>,
    pub command: u32,
    /// Head of the input descriptor chain as a bus address.
    pub data_in: u32,
    pub data_out: u32,
    pub parameters: Vec<u32>,
}

/// Computes the RX header for a received command.
pub type Responder = Box<dyn FnMut(&ReceivedCommand) -> u32>;

#[derive(Default)]
struct State {
    tx_size: u32,
    words: Vec<u32>,
    received: Vec<ReceivedCommand>,
    responder: Option<Responder>,
    response: Option<u32>,
    polls_left: u32,
    latency: u32,
    rx_int: bool,
    rx_reads: usize,
    configuration: u32,
}

/// Emulated SEMAILBOX host registers.
///
/// Once a TX message is complete it is decoded, handed to the responder, and
/// the answer becomes visible in RX after `latency` polls of the RX status.
/// Reading the RX header clears the interrupt.
pub struct EmulatedSemailbox {
    config: FifoConfig,
    state: RefCell<State>,
}

impl EmulatedSemailbox {
    pub fn new(config: FifoConfig) -> Self {
        Self {
            config,
            state: RefCell::new(State::default()),
        }
    }

    /// Replace the responder. Without one every command answers OK.
    pub fn set_responder(&self, responder: Responder) {
        self.state.borrow_mut().responder = Some(responder);
    }

    /// Number of RX status polls that report "not ready" before a response.
    pub fn set_latency(&self, polls: u32) {
        self.state.borrow_mut().latency = polls;
    }

    pub fn received(&self) -> Vec<ReceivedCommand> {
        self.state.borrow().received.clone()
    }

    pub fn last_command(&self) -> Option<ReceivedCommand> {
        self.state.borrow().received.last().cloned()
    }

    /// Raw words pushed into the FIFO for the message in flight or just completed.
    pub fn fifo_words(&self) -> Vec<u32> {
        self.state.borrow().words.clone()
    }

    pub fn rx_reads(&self) -> usize {
        self.state.borrow().rx_reads
    }

    pub fn rx_interrupt(&self) -> bool {
        self.state.borrow().rx_int
    }

    fn complete(&self, state: &mut State) {
        let mut words = state.words.iter().copied();
        let handle = if self.config.command_handle.is_some() {
            words.next()
        } else {
            None
        };
        let received = ReceivedCommand {
            size: state.tx_size,
            handle,
            command: words.next().unwrap_or_default(),
            data_in: words.next().unwrap_or_default(),
            data_out: words.next().unwrap_or_default(),
            parameters: words.collect(),
        };
        let response = match state.responder.as_mut() {
            Some(responder) => responder(&received),
            None => SeResponse::Ok.code(),
        };
        debug!(
            "emulated semailbox: command {:#010x} -> {:#010x}",
            received.command, response
        );
        state.received.push(received);
        state.response = Some(response);
        state.polls_left = state.latency;
    }
}

impl SemailboxFifo for EmulatedSemailbox {
    fn tx_ready(&self) -> bool {
        true
    }

    fn write_tx_header(&self, size: u32) {
        let mut state = self.state.borrow_mut();
        if state.response.is_some() || state.rx_int {
            warn!("emulated semailbox: new message while a response is unread");
        }
        state.tx_size = size;
        state.words.clear();
    }

    fn write_fifo(&self, word: u32) {
        let mut state = self.state.borrow_mut();
        state.words.push(word);
        // The header word counts towards the message size.
        if (state.words.len() + 1) * 4 == state.tx_size as usize {
            self.complete(&mut state);
        }
    }

    fn rx_ready(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.rx_int && state.response.is_some() {
            if state.polls_left == 0 {
                state.rx_int = true;
            } else {
                state.polls_left -= 1;
            }
        }
        state.rx_int
    }

    fn read_rx_header(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.rx_reads += 1;
        if !state.rx_int {
            warn!("emulated semailbox: RX header read with no response");
            return SeResponse::MailboxInvalid.code();
        }
        state.rx_int = false;
        state.response.take().unwrap_or_default()
    }

    fn configuration(&self) -> u32 {
        self.state.borrow().configuration
    }

    fn set_configuration(&self, value: u32) {
        self.state.borrow_mut().configuration = value;
    }
}
