/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Fixed-capacity FIFO of [`Message`]s – the only shared mutable state in the
//! workload.
//!
//! Built on `tokio::sync::mpsc`'s bounded channel: the channel owns all of the
//! synchronisation, so no caller ever takes a separate lock.  Senders are
//! cheap clones handed to every producer and to the timer callback; the single
//! [`QueueReceiver`] is moved into the dispatcher.
//!
//! | Operation | Blocking behaviour |
//! |---|---|
//! | [`QueueSender::try_send`] | never waits – drop on full (producers, timer) |
//! | [`QueueSender::send`] | waits according to [`Wait`] |
//! | [`QueueReceiver::receive`] | waits according to [`Wait`] (dispatcher: `Forever`) |

use std::mem::size_of;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

use crate::error::QueueError;
use crate::message::Message;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Capacity used by the default workload.
pub const DEFAULT_QUEUE_CAPACITY: usize = 5;

/// Largest backing store the queue will try to reserve.
pub const MAX_QUEUE_CAPACITY: usize = 4096;

// ── Wait policy ───────────────────────────────────────────────────────────────

/// How long a send or receive may wait for the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// Do not wait at all.
    Immediate,
    /// Wait at most this long.
    For(Duration),
    /// Wait until the operation completes.
    Forever,
}

// ── Statistics ────────────────────────────────────────────────────────────────

/// Counters shared by every handle of one queue.
#[derive(Debug, Default)]
pub struct QueueStats {
    sent: AtomicU64,
    dropped: AtomicU64,
    received: AtomicU64,
}

impl QueueStats {
    /// Messages successfully enqueued.
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Messages discarded because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Messages removed by the receiver.
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }
}

// ── BoundedMessageQueue ───────────────────────────────────────────────────────

/// A freshly created queue: one sender and the one receiver.
///
/// Call [`split`](Self::split) to hand the halves to their owners.
#[derive(Debug)]
pub struct BoundedMessageQueue {
    sender: QueueSender,
    receiver: QueueReceiver,
}

impl BoundedMessageQueue {
    /// Reserve a queue of `capacity` elements of `size_of::<Message>()` bytes.
    ///
    /// # Errors
    /// * [`QueueError::ZeroCapacity`] – `capacity == 0`.
    /// * [`QueueError::CapacityTooLarge`] – above [`MAX_QUEUE_CAPACITY`].
    pub fn create(capacity: usize) -> Result<Self, QueueError> {
        let element_size = size_of::<Message>();

        if capacity == 0 {
            return Err(QueueError::ZeroCapacity);
        }
        if capacity > MAX_QUEUE_CAPACITY {
            return Err(QueueError::CapacityTooLarge {
                capacity,
                element_size,
                max: MAX_QUEUE_CAPACITY,
            });
        }

        let (tx, rx) = mpsc::channel(capacity);
        let stats = Arc::new(QueueStats::default());

        info!(capacity, element_size, "message queue created");

        Ok(Self {
            sender: QueueSender {
                tx,
                stats: Arc::clone(&stats),
            },
            receiver: QueueReceiver { rx, stats },
        })
    }

    /// A new sender handle for the same queue.
    pub fn sender(&self) -> QueueSender {
        self.sender.clone()
    }

    /// Shared counters for this queue.
    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.sender.stats)
    }

    /// Separate the sender and receiver halves.
    pub fn split(self) -> (QueueSender, QueueReceiver) {
        (self.sender, self.receiver)
    }
}

// ── QueueSender ───────────────────────────────────────────────────────────────

/// Cloneable sending half.  Safe to use from any number of tasks at once.
#[derive(Debug, Clone)]
pub struct QueueSender {
    tx: mpsc::Sender<Message>,
    stats: Arc<QueueStats>,
}

impl QueueSender {
    /// Enqueue now or never.
    ///
    /// Returns `false` when the queue is full (the message is discarded and
    /// counted as dropped) or when the receiver is gone.  Never waits.
    pub fn try_send(&self, msg: Message) -> bool {
        match self.tx.try_send(msg) {
            Ok(()) => {
                self.stats.sent.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(TrySendError::Full(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(tag = %msg.tag, "receiver closed, message discarded");
                false
            }
        }
    }

    /// Enqueue, waiting for space according to `wait`.
    ///
    /// A send that times out is counted as dropped, like a full
    /// [`try_send`](Self::try_send).
    pub async fn send(&self, msg: Message, wait: Wait) -> bool {
        let result = match wait {
            Wait::Immediate => return self.try_send(msg),
            Wait::For(timeout) => match self.tx.send_timeout(msg, timeout).await {
                Ok(()) => Ok(()),
                Err(mpsc::error::SendTimeoutError::Timeout(_)) => {
                    self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                    return false;
                }
                Err(mpsc::error::SendTimeoutError::Closed(_)) => Err(()),
            },
            Wait::Forever => self.tx.send(msg).await.map_err(|_| ()),
        };

        match result {
            Ok(()) => {
                self.stats.sent.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(()) => {
                warn!(tag = %msg.tag, "receiver closed, message discarded");
                false
            }
        }
    }

    /// Number of messages currently waiting in the queue.
    pub fn pending(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Shared counters for this queue.
    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }
}

// ── QueueReceiver ─────────────────────────────────────────────────────────────

/// The single receiving half, owned by the dispatcher.
#[derive(Debug)]
pub struct QueueReceiver {
    rx: mpsc::Receiver<Message>,
    stats: Arc<QueueStats>,
}

impl QueueReceiver {
    /// Remove and return the oldest message, waiting according to `wait`.
    ///
    /// Returns `None` when the wait elapses with the queue still empty, or
    /// when the queue is empty and every sender has been dropped.
    pub async fn receive(&mut self, wait: Wait) -> Option<Message> {
        let msg = match wait {
            Wait::Immediate => self.rx.try_recv().ok(),
            Wait::For(timeout) => tokio::time::timeout(timeout, self.rx.recv())
                .await
                .ok()
                .flatten(),
            Wait::Forever => self.rx.recv().await,
        }?;

        self.stats.received.fetch_add(1, Ordering::Relaxed);
        Some(msg)
    }

    /// Number of messages currently waiting in the queue.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
