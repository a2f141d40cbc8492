/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! ipsa-sched – fixed-priority periodic workload
//!
//! Four periodic producers and a recurring hyperperiod timer feed tagged
//! messages through one bounded queue to a single dispatcher.
//!
//! ```text
//! lib.rs
//! ├── message       – Tag / Message carried through the queue
//! ├── queue         – bounded FIFO, the only shared state
//! ├── kernel/       – scheduler abstraction, Tokio backend, software timers
//! ├── producer      – drift-free periodic producers
//! ├── timer_event   – hyperperiod timer feeding the queue
//! ├── dispatcher/   – consumer state machine + per-tag handlers
//! ├── console       – fire-and-forget output sink
//! ├── hyperperiod/  – LCM analysis of producer periods
//! ├── config/       – YAML workload configuration
//! ├── error         – structured error enums
//! └── workload      – start-up entry point
//! ```

pub mod config;
pub mod console;
pub mod dispatcher;
pub mod error;
pub mod hyperperiod;
pub mod kernel;
pub mod message;
pub mod producer;
pub mod queue;
pub mod timer_event;
pub mod workload;
