/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Period arithmetic for the start-up analysis.
//!
//! All values are periods in milliseconds.  A zero period never releases, so
//! it contributes nothing to a common window.

use super::HyperperiodError;

/// Largest period both `a_ms` and `b_ms` are whole multiples of.
pub fn gcd(a_ms: u64, b_ms: u64) -> u64 {
    if b_ms == 0 {
        a_ms
    } else {
        gcd(b_ms, a_ms % b_ms)
    }
}

/// Extend `window_ms` so it also spans a whole number of `period_ms`.
///
/// A zero on either side leaves the other unchanged.
pub fn extend_window(window_ms: u64, period_ms: u64) -> Result<u64, HyperperiodError> {
    if window_ms == 0 || period_ms == 0 {
        return Ok(window_ms.max(period_ms));
    }
    (window_ms / gcd(window_ms, period_ms))
        .checked_mul(period_ms)
        .ok_or(HyperperiodError::Overflow {
            window_ms,
            period_ms,
        })
}

/// Smallest window after which every period in `periods_ms` repeats.
///
/// `Ok(None)` when no period is non-zero.
pub fn hyperperiod_ms<I>(periods_ms: I) -> Result<Option<u64>, HyperperiodError>
where
    I: IntoIterator<Item = u64>,
{
    let window = periods_ms.into_iter().try_fold(0, extend_window)?;
    Ok((window > 0).then_some(window))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
