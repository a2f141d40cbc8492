/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Workload start-up.
//!
//! [`start`] is the single entry point.  It owns the only queue and hands out
//! its halves: a sender clone to every producer and to the timer callback, the
//! receiver to the dispatcher.  Nothing is global.
//!
//! Start-up order:
//! 1. validate the configuration and create the queue (either failure is
//!    fatal and returned),
//! 2. create the dispatcher and the producers,
//! 3. create and start the hyperperiod timer (failure only degrades),
//! 4. return a [`RunningWorkload`] for diagnostics.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::WorkloadConfig;
use crate::console::ConsoleSink;
use crate::dispatcher::Dispatcher;
use crate::error::WorkloadError;
use crate::hyperperiod::{self, DEFAULT_HYPERPERIOD_LIMIT_MS};
use crate::kernel::timer::SoftwareTimer;
use crate::kernel::{Kernel, Priority, TaskSpec};
use crate::producer::ProducerStats;
use crate::queue::{BoundedMessageQueue, QueueStats};
use crate::timer_event;

// ── RunningWorkload ───────────────────────────────────────────────────────────

/// Diagnostic handle on a started workload.
///
/// Dropping it does not stop anything; the tasks live as long as the kernel.
#[derive(Debug)]
pub struct RunningWorkload {
    queue_stats: Arc<QueueStats>,
    producers: Vec<(String, Arc<ProducerStats>)>,
    timer: Option<SoftwareTimer>,
}

impl RunningWorkload {
    /// Sent / dropped / received counters of the shared queue.
    pub fn queue_stats(&self) -> &QueueStats {
        &self.queue_stats
    }

    /// Counters of the producer called `name`.
    pub fn producer_stats(&self, name: &str) -> Option<&ProducerStats> {
        self.producers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.as_ref())
    }

    /// The hyperperiod timer, or `None` if it could not be created or started.
    pub fn timer(&self) -> Option<&SoftwareTimer> {
        self.timer.as_ref()
    }

    /// Log a one-line summary per producer plus the queue totals.
    pub fn log_summary(&self) {
        for (name, stats) in &self.producers {
            info!(
                producer = %name,
                releases = stats.releases(),
                dropped = stats.dropped(),
                "producer summary"
            );
        }
        info!(
            sent = self.queue_stats.sent(),
            dropped = self.queue_stats.dropped(),
            received = self.queue_stats.received(),
            timer_expiries = self.timer.as_ref().map(|t| t.expiries()),
            "queue summary"
        );
    }
}

// ── start ─────────────────────────────────────────────────────────────────────

/// Create the queue, start the dispatcher and producers, then create and
/// start the hyperperiod timer.
///
/// # Errors
/// * [`WorkloadError::InvalidConfig`] – [`WorkloadConfig::validate`] rejected
///   `config`; no task has been started.
/// * [`WorkloadError::QueueCreation`] – the queue could not be reserved; no
///   task has been started.
/// * [`WorkloadError::TaskSpawn`] – the kernel refused a task.
pub fn start(
    config: &WorkloadConfig,
    kernel: Arc<dyn Kernel>,
    console: Arc<dyn ConsoleSink>,
) -> Result<RunningWorkload, WorkloadError> {
    info!(
        producers = config.producers.len(),
        capacity = config.queue.capacity,
        timer_period_ms = config.timer.period_ms,
        "=== starting workload ==="
    );

    config.validate().map_err(|e| {
        let reason = format!("{e:#}");
        error!(error = %reason, "workload configuration rejected");
        WorkloadError::InvalidConfig(reason)
    })?;

    let queue = BoundedMessageQueue::create(config.queue.capacity).map_err(|e| {
        error!(capacity = config.queue.capacity, error = %e, "queue creation failed");
        WorkloadError::from(e)
    })?;
    let queue_stats = queue.stats();
    let timer_sender = queue.sender();
    let (sender, receiver) = queue.split();

    let producers = config.producers();
    match hyperperiod::analyse(
        &producers,
        Some(config.timer.period_ms),
        DEFAULT_HYPERPERIOD_LIMIT_MS,
    ) {
        Ok(info) => hyperperiod::log_report(&info),
        Err(e) => warn!(error = %e, "hyperperiod analysis failed"),
    }

    // ── Dispatcher ────────────────────────────────────────────────────────────
    let dispatcher = Dispatcher::new(console);
    let spec = TaskSpec::new(
        config.dispatcher.name.clone(),
        Priority(config.dispatcher.priority),
    );
    kernel
        .spawn(spec, Box::pin(dispatcher.run(Arc::clone(&kernel), receiver)))
        .map_err(|source| WorkloadError::TaskSpawn {
            name: config.dispatcher.name.clone(),
            source,
        })?;

    // ── Producers ─────────────────────────────────────────────────────────────
    let mut producer_stats = Vec::with_capacity(producers.len());
    for producer in producers {
        let name = producer.name.clone();
        producer_stats.push((name.clone(), producer.stats()));
        kernel
            .spawn(
                producer.task_spec(),
                Box::pin(producer.run(Arc::clone(&kernel), sender.clone())),
            )
            .map_err(|source| WorkloadError::TaskSpawn { name, source })?;
    }
    drop(sender);

    // ── Hyperperiod timer ─────────────────────────────────────────────────────
    let timer = match timer_event::create(Arc::clone(&kernel), &config.timer, timer_sender) {
        Ok(mut timer) => match timer.start() {
            Ok(()) => Some(timer),
            Err(e) => {
                warn!(timer = %config.timer.name, error = %e, "timer not started, continuing without it");
                None
            }
        },
        Err(e) => {
            warn!(timer = %config.timer.name, error = %e, "timer not created, continuing without it");
            None
        }
    };

    info!("=== workload running ===");

    Ok(RunningWorkload {
        queue_stats,
        producers: producer_stats,
        timer,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
