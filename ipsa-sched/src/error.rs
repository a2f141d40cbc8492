/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the periodic workload.
//!
//! Three enums model the three failure layers:
//!
//! * [`QueueError`] – the bounded queue could not reserve its backing store.
//! * [`KernelError`] – the kernel refused to create a task or a timer.
//! * [`WorkloadError`] – top-level failure returned from
//!   [`workload::start()`](crate::workload::start).
//!
//! Load shedding (a full queue) and unrecognised tags are deliberately **not**
//! errors: both are handled where they occur and only counted or logged.

use thiserror::Error;

// ── Queue ─────────────────────────────────────────────────────────────────────

/// Reasons why [`BoundedMessageQueue::create`](crate::queue::BoundedMessageQueue::create)
/// refused to build a queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// A queue with no slots can never hold a message.
    #[error("queue capacity must be at least 1")]
    ZeroCapacity,

    /// The backing store for `capacity` elements cannot be reserved.
    #[error(
        "cannot reserve {capacity} slots of {element_size} bytes (maximum is {max} slots)"
    )]
    CapacityTooLarge {
        capacity: usize,
        element_size: usize,
        max: usize,
    },
}

// ── Kernel ────────────────────────────────────────────────────────────────────

/// Errors surfaced by a [`Kernel`](crate::kernel::Kernel) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// The kernel has been shut down; no new task may be created.
    #[error("kernel is shut down, cannot create task '{task}'")]
    ShutDown { task: String },

    /// A software timer was requested with a zero period.
    #[error("timer '{timer}' has a zero period")]
    InvalidTimerPeriod { timer: String },

    /// `start()` was called on a timer that is already running.
    #[error("timer '{timer}' is already running")]
    TimerAlreadyRunning { timer: String },
}

// ── Workload ──────────────────────────────────────────────────────────────────

/// Top-level error type returned by [`workload::start()`](crate::workload::start).
///
/// Every variant is fatal for the workload: the binary logs it and exits with
/// a non-zero status.  Timer creation failure is not listed here because it
/// only degrades the workload (see [`workload::start()`](crate::workload::start)).
#[derive(Debug, Error)]
pub enum WorkloadError {
    /// The configuration describes a workload that cannot run.
    #[error("invalid workload configuration: {0}")]
    InvalidConfig(String),

    /// The shared message queue could not be created.
    #[error("failed to create the message queue: {0}")]
    QueueCreation(#[from] QueueError),

    /// The kernel refused to create one of the application tasks.
    #[error("failed to create task '{name}': {source}")]
    TaskSpawn {
        name: String,
        #[source]
        source: KernelError,
    },
}
