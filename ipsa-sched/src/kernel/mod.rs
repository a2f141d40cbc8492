/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Scheduler abstraction the workload runs on.
//!
//! The workload never talks to a concrete runtime directly.  Everything it
//! needs from the kernel goes through the [`Kernel`] trait:
//!
//! | Need | Trait method |
//! |---|---|
//! | Create a task | [`Kernel::spawn`] |
//! | Read the tick count | [`Kernel::now`] |
//! | Absolute-time sleep | [`Kernel::sleep_until`] |
//! | Stop everything (tests, host exit) | [`Kernel::cancellation`] |
//!
//! Software timers ([`timer::SoftwareTimer`]) are built on top of these
//! primitives and run as one more kernel task, the timer service.
//!
//! [`TokioKernel`] is the production implementation.  Tokio is cooperative,
//! not preemptive, so [`Priority`] is recorded and logged with every task but
//! not enforced; see `DESIGN.md` for why the workload still behaves correctly.

pub mod timer;

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::KernelError;

// ── Task description ──────────────────────────────────────────────────────────

/// A boxed, sendable task body.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Fixed task priority.  Higher value means more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Priority(pub u8);

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Priority of the kernel's own timer-service task.
pub const TIMER_SERVICE_PRIORITY: Priority = Priority(6);

/// Name and priority of a task handed to [`Kernel::spawn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: String,
    pub priority: Priority,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>, priority: Priority) -> Self {
        Self {
            name: name.into(),
            priority,
        }
    }
}

// ── Kernel trait ──────────────────────────────────────────────────────────────

/// The primitives the workload needs from a scheduler.
pub trait Kernel: Send + Sync + 'static {
    /// Current monotonic time.
    fn now(&self) -> Instant;

    /// A future that completes once `deadline` has been reached.
    ///
    /// This is an absolute-time sleep: a deadline already in the past
    /// completes immediately.
    fn sleep_until(&self, deadline: Instant) -> BoxFuture;

    /// Create a task running `entry` until it returns or the kernel is shut
    /// down.
    ///
    /// # Errors
    /// [`KernelError::ShutDown`] if the kernel no longer accepts tasks.
    fn spawn(&self, spec: TaskSpec, entry: BoxFuture) -> Result<(), KernelError>;

    /// Token cancelled when the kernel shuts down.  Long-running loops check it
    /// at every suspension point.
    fn cancellation(&self) -> CancellationToken;
}

// ── TokioKernel ───────────────────────────────────────────────────────────────

/// Bookkeeping for one spawned task.
#[derive(Debug)]
struct TaskEntry {
    spec: TaskSpec,
    handle: JoinHandle<()>,
}

/// [`Kernel`] backed by the Tokio runtime the caller is running in.
///
/// Every spawned task is wrapped in a `select!` against the kernel's
/// cancellation token, so [`shutdown`](Self::shutdown) stops all of them at
/// their next suspension point.
#[derive(Debug)]
pub struct TokioKernel {
    runtime: Handle,
    cancel: CancellationToken,
    tasks: Mutex<Vec<TaskEntry>>,
}

impl TokioKernel {
    /// Bind to the current Tokio runtime.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime (see `Handle::current`).
    pub fn new() -> Arc<Self> {
        Self::with_handle(Handle::current())
    }

    /// Bind to an explicit runtime handle.
    pub fn with_handle(runtime: Handle) -> Arc<Self> {
        Arc::new(Self {
            runtime,
            cancel: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Names and priorities of every task created so far, in creation order.
    pub fn tasks(&self) -> Vec<TaskSpec> {
        self.lock_tasks().iter().map(|t| t.spec.clone()).collect()
    }

    /// Number of tasks that have not finished yet.
    pub fn live_tasks(&self) -> usize {
        self.lock_tasks()
            .iter()
            .filter(|t| !t.handle.is_finished())
            .count()
    }

    /// Cancel every task and wait for them to stop.
    pub async fn shutdown(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        info!("kernel shutting down");
        self.cancel.cancel();

        let entries: Vec<TaskEntry> = std::mem::take(&mut *self.lock_tasks());
        for entry in entries {
            if let Err(e) = entry.handle.await {
                warn!(task = %entry.spec.name, error = %e, "task ended abnormally");
            }
        }
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, Vec<TaskEntry>> {
        // Poisoning only happens if a panic escaped while the lock was held;
        // the Vec itself is still consistent.
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Kernel for TokioKernel {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep_until(&self, deadline: Instant) -> BoxFuture {
        Box::pin(tokio::time::sleep_until(deadline))
    }

    fn spawn(&self, spec: TaskSpec, entry: BoxFuture) -> Result<(), KernelError> {
        if self.cancel.is_cancelled() {
            return Err(KernelError::ShutDown { task: spec.name });
        }

        let cancel = self.cancel.clone();
        let name = spec.name.clone();
        let handle = self.runtime.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => debug!(task = %name, "task cancelled"),
                _ = entry => debug!(task = %name, "task returned"),
            }
        });

        info!(task = %spec.name, priority = %spec.priority, "task created");
        self.lock_tasks().push(TaskEntry { spec, handle });
        Ok(())
    }

    fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
