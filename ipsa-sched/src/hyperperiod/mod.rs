//! Hyperperiod analysis of the periodic workload.
//!
//! The hyperperiod of a set of periodic producers is the Least Common Multiple
//! (LCM) of their periods: the smallest window after which every release
//! pattern repeats.  The workload's recurring timer marks "hyperperiod
//! reached" on its own fixed period, which may or may not line up with the
//! true LCM.  [`analyse`] computes both so the mismatch is visible at start-up.
//!
//! For the default workload:
//!
//! | Producer | Period | Releases per hyperperiod |
//! |---|---|---|
//! | T1X | 350 ms | 204 |
//! | T2X | 350 ms | 204 |
//! | T3X | 600 ms | 119 |
//! | T4X | 850 ms | 84 |
//!
//! LCM = 71 400 ms, and the 2 400 ms timer does not divide it.

pub mod math;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::producer::PeriodicProducer;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Upper limit on a sensible hyperperiod (1 hour in milliseconds).
pub const DEFAULT_HYPERPERIOD_LIMIT_MS: u64 = 3_600_000;

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors that can occur during hyperperiod calculation.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum HyperperiodError {
    /// No producer had a non-zero period.
    #[error("no producer with a valid (non-zero) period")]
    NoValidPeriods,

    /// Extending the common window overflowed `u64`.
    #[error("hyperperiod overflow extending {window_ms}ms to cover a {period_ms}ms period")]
    Overflow { window_ms: u64, period_ms: u64 },

    /// The calculated hyperperiod exceeded the configured limit.
    #[error("hyperperiod {value_ms}ms exceeds limit {limit_ms}ms")]
    TooLarge { value_ms: u64, limit_ms: u64 },
}

// ── HyperperiodInfo ───────────────────────────────────────────────────────────

/// Releases of one producer within a hyperperiod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerReleases {
    pub name: String,
    pub period_ms: u64,
    pub releases: u64,
}

/// Result of [`analyse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperperiodInfo {
    /// LCM of all producer periods, in milliseconds.
    pub hyperperiod_ms: u64,

    /// Unique producer periods (sorted, deduplicated).
    pub unique_periods: Vec<u64>,

    /// Per-producer release count within one hyperperiod, in producer order.
    pub releases: Vec<ProducerReleases>,

    /// Period of the hyperperiod timer, if one is configured.
    pub timer_period_ms: Option<u64>,
}

impl HyperperiodInfo {
    /// `true` when the timer fires on every hyperperiod boundary, i.e. its
    /// period divides the hyperperiod.  `false` without a timer.
    pub fn timer_aligned(&self) -> bool {
        match self.timer_period_ms {
            Some(t) if t > 0 => self.hyperperiod_ms % t == 0,
            _ => false,
        }
    }
}

// ── analyse ───────────────────────────────────────────────────────────────────

/// Compute the hyperperiod of `producers` and relate it to the timer period.
///
/// # Errors
/// * [`HyperperiodError::NoValidPeriods`] – no producer had a non-zero period.
/// * [`HyperperiodError::Overflow`] – the common window exceeded `u64`.
/// * [`HyperperiodError::TooLarge`] – result exceeds `limit_ms`.
pub fn analyse(
    producers: &[PeriodicProducer],
    timer_period_ms: Option<u64>,
    limit_ms: u64,
) -> Result<HyperperiodInfo, HyperperiodError> {
    let periods: Vec<(&str, u64)> = producers
        .iter()
        .map(|p| (p.name.as_str(), p.period.as_millis() as u64))
        .filter(|&(_, ms)| ms > 0)
        .collect();

    let unique_periods: Vec<u64> = {
        let mut v: Vec<u64> = periods.iter().map(|&(_, ms)| ms).collect();
        v.sort_unstable();
        v.dedup();
        v
    };

    let Some(hyperperiod_ms) = math::hyperperiod_ms(unique_periods.iter().copied())? else {
        warn!("No producers with valid periods found");
        return Err(HyperperiodError::NoValidPeriods);
    };

    if hyperperiod_ms > limit_ms {
        warn!(hyperperiod_ms, limit_ms, "Hyperperiod exceeds configured limit");
        return Err(HyperperiodError::TooLarge {
            value_ms: hyperperiod_ms,
            limit_ms,
        });
    }

    let releases = periods
        .iter()
        .map(|&(name, period_ms)| ProducerReleases {
            name: name.to_string(),
            period_ms,
            releases: hyperperiod_ms / period_ms,
        })
        .collect();

    Ok(HyperperiodInfo {
        hyperperiod_ms,
        unique_periods,
        releases,
        timer_period_ms,
    })
}

/// Log an analysis result the way start-up reports it.
pub fn log_report(info: &HyperperiodInfo) {
    info!(
        hyperperiod_ms = info.hyperperiod_ms,
        unique_count = info.unique_periods.len(),
        "Calculated hyperperiod"
    );
    for r in &info.releases {
        debug!(
            producer = %r.name,
            period_ms = r.period_ms,
            releases = r.releases,
            "  releases per hyperperiod"
        );
    }

    match info.timer_period_ms {
        Some(t) if info.timer_aligned() => info!(
            timer_period_ms = t,
            ticks = info.hyperperiod_ms / t,
            "timer is aligned with the hyperperiod"
        ),
        Some(t) => warn!(
            timer_period_ms = t,
            hyperperiod_ms = info.hyperperiod_ms,
            "timer period does not divide the hyperperiod; \"HyperPeriod reached\" marks timer expiries only"
        ),
        None => debug!("no hyperperiod timer configured"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
