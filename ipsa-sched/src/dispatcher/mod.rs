/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The single consumer of the message queue.
//!
//! State machine with one non-terminal state:
//!
//! ```text
//!            ┌──────────────────────────────┐
//!            ▼                              │
//!   WaitingForMessage ──receive(Forever)──► dispatch(tag) ──► handler
//! ```
//!
//! The loop leaves `WaitingForMessage` only when the kernel is cancelled or
//! every sender is gone.  Between messages the dispatcher keeps no state, so
//! restarting it needs no recovery.

pub mod handlers;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::console::ConsoleSink;
use crate::kernel::Kernel;
use crate::message::{Message, Tag};
use crate::queue::{QueueReceiver, Wait};

use handlers::{
    binary_search, fahrenheit_to_celsius, wide_multiply, FAHRENHEIT_INPUT, MULTIPLICAND,
    MULTIPLIER, SEARCH_TABLE, SEARCH_TARGET,
};

// ── Console lines ─────────────────────────────────────────────────────────────

/// Printed for every Task1 message.
pub const WORKING_LINE: &str = "Working";

/// Printed for every hyperperiod timer tick.
pub const HYPERPERIOD_LINE: &str = "HyperPeriod reached";

/// Prefix of the line printed for an unrecognised tag.
pub const UNEXPECTED_LINE: &str = "Unexpected message";

// ── Dispatch outcome ──────────────────────────────────────────────────────────

/// What [`Dispatcher::dispatch`] did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// A known tag was routed to its handler.
    Handled(Tag),
    /// The tag was not recognised; the defensive line was written.
    Unrecognized(u32),
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

/// Routes each message to its handler and writes the result to the console.
pub struct Dispatcher {
    console: Arc<dyn ConsoleSink>,
}

impl Dispatcher {
    pub fn new(console: Arc<dyn ConsoleSink>) -> Self {
        Self { console }
    }

    /// Run exactly one handler for `msg`.
    pub fn dispatch(&self, msg: Message) -> Dispatched {
        debug!(tag = %msg.tag, value = msg.value, "dispatching");

        match msg.tag {
            Tag::Task1 => self.console.write_line(WORKING_LINE),
            Tag::Task2 => {
                let conversion = fahrenheit_to_celsius(FAHRENHEIT_INPUT);
                self.console.write_line(&conversion.to_string());
            }
            Tag::Task3 => {
                let product = wide_multiply(MULTIPLICAND, MULTIPLIER);
                self.console.write_line(&product.to_string());
            }
            Tag::Task4 => {
                let result = binary_search(&SEARCH_TABLE, SEARCH_TARGET);
                self.console.write_line(&result.to_string());
            }
            Tag::TimerTick => self.console.write_line(HYPERPERIOD_LINE),
            Tag::Unrecognized(value) => {
                warn!(value, "unexpected message");
                self.console
                    .write_line(&format!("{UNEXPECTED_LINE} (value = {value})"));
                return Dispatched::Unrecognized(value);
            }
        }

        Dispatched::Handled(msg.tag)
    }

    /// The dispatcher's task body: block for the next message, dispatch it,
    /// repeat.
    pub async fn run(self, kernel: Arc<dyn Kernel>, mut queue: QueueReceiver) {
        let cancel = kernel.cancellation();
        info!("dispatcher waiting for messages");

        loop {
            let msg = tokio::select! {
                _ = cancel.cancelled() => break,
                msg = queue.receive(Wait::Forever) => msg,
            };

            match msg {
                Some(msg) => {
                    self.dispatch(msg);
                }
                None => {
                    warn!("all senders dropped, dispatcher stopping");
                    break;
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
