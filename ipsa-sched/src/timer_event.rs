/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The recurring "hyperperiod" timer.
//!
//! A [`SoftwareTimer`] whose callback performs one zero-wait send of
//! [`Tag::TimerTick`] into the shared queue.  The callback runs in the
//! timer-service context, so it never waits for space: a full queue drops the
//! tick exactly like a producer's send.

use std::sync::Arc;

use tracing::warn;

use crate::config::TimerConfig;
use crate::error::KernelError;
use crate::kernel::timer::SoftwareTimer;
use crate::kernel::Kernel;
use crate::message::{Message, Tag};
use crate::queue::QueueSender;

/// Create the hyperperiod timer in the stopped state.
///
/// # Errors
/// [`KernelError::InvalidTimerPeriod`] when the configured period is zero.
pub fn create(
    kernel: Arc<dyn Kernel>,
    config: &TimerConfig,
    queue: QueueSender,
) -> Result<SoftwareTimer, KernelError> {
    let name = config.name.clone();
    let tick = Message::new(Tag::TimerTick);

    let callback = Box::new(move || {
        if !queue.try_send(tick) {
            warn!(timer = %name, "queue full, hyperperiod tick dropped");
        }
    });

    SoftwareTimer::create(
        kernel,
        config.name.clone(),
        config.period(),
        config.auto_reload,
        callback,
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::TokioKernel;
    use crate::queue::{BoundedMessageQueue, Wait};
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn timer_injects_ticks_every_period() {
        let kernel = TokioKernel::new();
        let (tx, mut rx) = BoundedMessageQueue::create(5).unwrap().split();
        let mut timer = create(kernel.clone(), &TimerConfig::default(), tx).unwrap();
        assert!(!timer.is_running());

        let t0 = Instant::now();
        timer.start().unwrap();

        for n in 1..=3u32 {
            let msg = rx.receive(Wait::Forever).await.unwrap();
            assert_eq!(msg, Message::new(Tag::TimerTick));
            let elapsed = Instant::now() - t0;
            let expected = Duration::from_millis(2_400) * n;
            assert!(elapsed >= expected && elapsed - expected < Duration::from_millis(1));
        }
        kernel.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_are_dropped_when_the_queue_is_full() {
        let kernel = TokioKernel::new();
        let queue = BoundedMessageQueue::create(1).unwrap();
        let stats = queue.stats();
        let (tx, _rx) = queue.split();
        let config = TimerConfig {
            period_ms: 100,
            ..TimerConfig::default()
        };
        let mut timer = create(kernel.clone(), &config, tx).unwrap();
        timer.start().unwrap();

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(timer.expiries(), 3);
        assert_eq!(stats.sent(), 1);
        assert_eq!(stats.dropped(), 2);
        kernel.shutdown().await;
    }

    #[tokio::test]
    async fn zero_period_fails_creation() {
        let kernel = TokioKernel::new();
        let (tx, _rx) = BoundedMessageQueue::create(1).unwrap().split();
        let config = TimerConfig {
            period_ms: 0,
            ..TimerConfig::default()
        };
        assert!(matches!(
            create(kernel, &config, tx),
            Err(KernelError::InvalidTimerPeriod { .. })
        ));
    }
}
