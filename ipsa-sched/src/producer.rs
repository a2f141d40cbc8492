/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Periodic producers.
//!
//! Every producer runs the same loop, parameterised by period and payload tag:
//!
//! ```text
//! next_wake = now
//! loop {
//!     next_wake += period          // running sum of absolute deadlines
//!     sleep_until(next_wake)       // absolute, not relative
//!     try_send(payload)            // drop on full, never block
//! }
//! ```
//!
//! Because the deadline is a running sum rather than `now + period`, time spent
//! after waking (or a late wake-up) does not push later releases back: the
//! n-th release always targets `t0 + n × period`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::kernel::{Kernel, Priority, TaskSpec};
use crate::message::{Message, Tag};
use crate::queue::QueueSender;

// ── WakeSchedule ──────────────────────────────────────────────────────────────

/// Drift-free release times for one periodic task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeSchedule {
    next_wake: Instant,
    period: Duration,
}

impl WakeSchedule {
    /// Start a schedule whose first release is one period after `start`.
    pub fn new(start: Instant, period: Duration) -> Self {
        Self {
            next_wake: start,
            period,
        }
    }

    /// Move to the next release and return it.
    ///
    /// Depends only on the previous deadline, never on the current time.
    pub fn advance(&mut self) -> Instant {
        self.next_wake += self.period;
        self.next_wake
    }
}

// ── PeriodicProducer ──────────────────────────────────────────────────────────

/// Counters for one producer.
#[derive(Debug, Default)]
pub struct ProducerStats {
    releases: AtomicU64,
    dropped: AtomicU64,
}

impl ProducerStats {
    /// Number of times the producer woke and attempted a send.
    pub fn releases(&self) -> u64 {
        self.releases.load(Ordering::Relaxed)
    }

    /// Number of those sends that found the queue full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// One periodic producer: a name, a period, a fixed payload and a priority.
#[derive(Debug, Clone)]
pub struct PeriodicProducer {
    pub name: String,
    pub period: Duration,
    pub tag: Tag,
    pub priority: Priority,
    stats: Arc<ProducerStats>,
}

impl PeriodicProducer {
    pub fn new(name: impl Into<String>, period: Duration, tag: Tag, priority: Priority) -> Self {
        Self {
            name: name.into(),
            period,
            tag,
            priority,
            stats: Arc::new(ProducerStats::default()),
        }
    }

    pub fn task_spec(&self) -> TaskSpec {
        TaskSpec::new(self.name.clone(), self.priority)
    }

    pub fn stats(&self) -> Arc<ProducerStats> {
        Arc::clone(&self.stats)
    }

    /// The producer's task body.  Runs until the kernel's cancellation token
    /// fires.
    pub async fn run(self, kernel: Arc<dyn Kernel>, queue: QueueSender) {
        let cancel = kernel.cancellation();
        let msg = Message::new(self.tag);
        let mut schedule = WakeSchedule::new(kernel.now(), self.period);

        debug!(
            producer = %self.name,
            period_ms = self.period.as_millis() as u64,
            tag = %self.tag,
            "producer started"
        );

        loop {
            let deadline = schedule.advance();
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = kernel.sleep_until(deadline) => {}
            }

            self.stats.releases.fetch_add(1, Ordering::Relaxed);
            if !queue.try_send(msg) {
                let dropped = self.stats.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(
                    producer = %self.name,
                    tag = %self.tag,
                    dropped,
                    "queue full, message dropped"
                );
            }
        }

        debug!(producer = %self.name, releases = self.stats.releases(), "producer stopped");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KernelError;
    use crate::kernel::{BoxFuture, TokioKernel};
    use crate::queue::{BoundedMessageQueue, Wait};
    use std::sync::atomic::AtomicU32;
    use tokio_util::sync::CancellationToken;

    // ── WakeSchedule ──────────────────────────────────────────────────────────

    #[test]
    fn wake_schedule_is_a_running_sum_of_periods() {
        let t0 = Instant::now();
        let period = Duration::from_millis(350);
        let mut s = WakeSchedule::new(t0, period);
        for n in 1..=100u32 {
            assert_eq!(s.advance(), t0 + period * n);
        }
    }

    #[test]
    fn wake_schedule_ignores_how_late_advance_is_called() {
        // Calling advance "late" (after long processing) must not shift the
        // deadlines: they are computed from the previous deadline only.
        let t0 = Instant::now();
        let mut s = WakeSchedule::new(t0, Duration::from_millis(600));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(s.advance(), t0 + Duration::from_millis(600));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(s.advance(), t0 + Duration::from_millis(1_200));
    }

    // ── run ───────────────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn producer_releases_at_multiples_of_its_period() {
        let kernel = TokioKernel::new();
        let (tx, mut rx) = BoundedMessageQueue::create(5).unwrap().split();
        let producer =
            PeriodicProducer::new("T3X", Duration::from_millis(600), Tag::Task3, Priority(3));

        let t0 = Instant::now();
        kernel
            .spawn(producer.task_spec(), Box::pin(producer.clone().run(kernel.clone(), tx)))
            .unwrap();

        for n in 1..=10u32 {
            let msg = rx.receive(Wait::Forever).await.unwrap();
            assert_eq!(msg, Message::new(Tag::Task3));
            let elapsed = Instant::now() - t0;
            let expected = Duration::from_millis(600) * n;
            assert!(elapsed >= expected && elapsed - expected < Duration::from_millis(1));
        }
        assert_eq!(producer.stats().dropped(), 0);
        kernel.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn producer_sheds_load_when_nobody_receives() {
        let kernel = TokioKernel::new();
        let queue = BoundedMessageQueue::create(5).unwrap();
        let stats = queue.stats();
        let (tx, _rx) = queue.split();
        let producer =
            PeriodicProducer::new("T1X", Duration::from_millis(350), Tag::Task1, Priority(1));
        kernel
            .spawn(producer.task_spec(), Box::pin(producer.clone().run(kernel.clone(), tx)))
            .unwrap();

        tokio::time::sleep(Duration::from_millis(350 * 8 + 10)).await;
        assert_eq!(producer.stats().releases(), 8);
        assert_eq!(producer.stats().dropped(), 3);
        assert_eq!(stats.sent(), 5);
        assert_eq!(stats.dropped(), 3);
        kernel.shutdown().await;
    }

    /// Kernel whose wake-ups are late by a varying amount, standing in for
    /// scheduler jitter and long handler execution.
    struct LateWakeKernel {
        inner: Arc<TokioKernel>,
        wakes: AtomicU32,
    }

    impl Kernel for LateWakeKernel {
        fn now(&self) -> Instant {
            self.inner.now()
        }

        fn sleep_until(&self, deadline: Instant) -> BoxFuture {
            let n = self.wakes.fetch_add(1, Ordering::Relaxed);
            let late = Duration::from_millis(u64::from(n % 4) * 70);
            self.inner.sleep_until(deadline + late)
        }

        fn spawn(&self, spec: TaskSpec, entry: BoxFuture) -> Result<(), KernelError> {
            self.inner.spawn(spec, entry)
        }

        fn cancellation(&self) -> CancellationToken {
            self.inner.cancellation()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn late_wakeups_do_not_accumulate() {
        let inner = TokioKernel::new();
        let kernel: Arc<dyn Kernel> = Arc::new(LateWakeKernel {
            inner: inner.clone(),
            wakes: AtomicU32::new(0),
        });
        let (tx, mut rx) = BoundedMessageQueue::create(5).unwrap().split();
        let producer =
            PeriodicProducer::new("T2X", Duration::from_millis(350), Tag::Task2, Priority(2));

        let t0 = Instant::now();
        kernel
            .spawn(producer.task_spec(), Box::pin(producer.run(kernel.clone(), tx)))
            .unwrap();

        for n in 1..=12u32 {
            rx.receive(Wait::Forever).await.unwrap();
            let nominal = Duration::from_millis(350) * n;
            let late = Duration::from_millis(u64::from((n - 1) % 4) * 70);
            let elapsed = Instant::now() - t0;
            // Each wake is late by its own jitter only; nothing carries over.
            assert!(elapsed >= nominal + late);
            assert!(elapsed - (nominal + late) < Duration::from_millis(1));
        }
        inner.shutdown().await;
    }
}
