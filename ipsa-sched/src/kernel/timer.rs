/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Software timers run by the kernel's timer service.
//!
//! A timer is created stopped, holding its callback.  [`SoftwareTimer::start`]
//! moves the callback into a timer-service task that sleeps to absolute
//! expiry times (`start + n × period`), so an auto-reload timer does not drift
//! however long its callback takes.  Callbacks run in the timer-service
//! context and must not block.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::{Kernel, TaskSpec, TIMER_SERVICE_PRIORITY};
use crate::error::KernelError;

/// Function invoked on every expiry.
pub type TimerCallback = Box<dyn FnMut() + Send + 'static>;

/// A one-shot or auto-reloading timer.
pub struct SoftwareTimer {
    name: String,
    period: Duration,
    auto_reload: bool,
    kernel: Arc<dyn Kernel>,
    /// `Some` until [`start`](Self::start) moves it into the timer service.
    callback: Option<TimerCallback>,
    running: bool,
    expiries: Arc<AtomicU64>,
}

impl std::fmt::Debug for SoftwareTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareTimer")
            .field("name", &self.name)
            .field("period", &self.period)
            .field("auto_reload", &self.auto_reload)
            .field("running", &self.is_running())
            .field("expiries", &self.expiries())
            .finish()
    }
}

impl SoftwareTimer {
    /// Create a stopped timer.
    ///
    /// # Errors
    /// [`KernelError::InvalidTimerPeriod`] when `period` is zero.
    pub fn create(
        kernel: Arc<dyn Kernel>,
        name: impl Into<String>,
        period: Duration,
        auto_reload: bool,
        callback: TimerCallback,
    ) -> Result<Self, KernelError> {
        let name = name.into();
        if period.is_zero() {
            return Err(KernelError::InvalidTimerPeriod { timer: name });
        }

        debug!(timer = %name, period_ms = period.as_millis() as u64, auto_reload, "timer created");

        Ok(Self {
            name,
            period,
            auto_reload,
            kernel,
            callback: Some(callback),
            running: false,
            expiries: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Arm the timer.  The first expiry is one period from now.
    ///
    /// The callback is handed to the timer service even if the kernel then
    /// refuses the task, so a timer whose start failed cannot be started again.
    ///
    /// # Errors
    /// * [`KernelError::TimerAlreadyRunning`] – `start` was already called.
    /// * [`KernelError::ShutDown`] – the kernel refused the timer-service task.
    pub fn start(&mut self) -> Result<(), KernelError> {
        let Some(mut callback) = self.callback.take() else {
            return Err(KernelError::TimerAlreadyRunning {
                timer: self.name.clone(),
            });
        };

        let kernel = Arc::clone(&self.kernel);
        let cancel = kernel.cancellation();
        let expiries = Arc::clone(&self.expiries);
        let period = self.period;
        let auto_reload = self.auto_reload;
        let name = self.name.clone();

        let service = async move {
            let mut next_expiry = kernel.now();
            loop {
                next_expiry += period;
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = kernel.sleep_until(next_expiry) => {}
                }
                callback();
                let n = expiries.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(timer = %name, expiry = n, "timer expired");
                if !auto_reload {
                    break;
                }
            }
        };

        self.kernel.spawn(
            TaskSpec::new(format!("Tmr Svc:{}", self.name), TIMER_SERVICE_PRIORITY),
            Box::pin(service),
        )?;
        self.running = true;

        info!(
            timer = %self.name,
            period_ms = self.period.as_millis() as u64,
            auto_reload = self.auto_reload,
            "timer started"
        );
        Ok(())
    }

    /// `true` once [`start`](Self::start) has succeeded.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of expiries so far.
    pub fn expiries(&self) -> u64 {
        self.expiries.load(Ordering::Relaxed)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
