/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Tagged messages carried through the bounded queue.
//!
//! ```text
//! PeriodicProducer ──┐
//! PeriodicProducer ──┼──(Message)──►  BoundedMessageQueue  ──(Message)──►  Dispatcher
//! SoftwareTimer    ──┘                 capacity 5, FIFO                     match on Tag
//! ```
//!
//! A [`Message`] is a small `Copy` value: it is moved into the queue by value
//! and moved back out by the dispatcher, so no sender ever shares memory with
//! the consumer.

use serde::Deserialize;

// ── Wire values ───────────────────────────────────────────────────────────────

/// Raw value sent by the first producer.
pub const VALUE_TASK1: u32 = 100;
/// Raw value sent by the second producer.
pub const VALUE_TASK2: u32 = 200;
/// Raw value sent by the third producer.
pub const VALUE_TASK3: u32 = 300;
/// Raw value sent by the fourth producer.
pub const VALUE_TASK4: u32 = 400;
/// Raw value sent by the hyperperiod timer.
pub const VALUE_TIMER_TICK: u32 = 10;

// ── Tag ───────────────────────────────────────────────────────────────────────

/// Discriminator that selects which dispatcher handler runs for a message.
///
/// `Unrecognized` carries any raw value that does not map to a known tag.  It
/// cannot appear in a configuration file (`serde(skip_deserializing)`) but the dispatcher
/// must still handle it, which keeps the `match` in the dispatcher honest
/// about forward compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// "Working" log line.
    Task1,
    /// Fahrenheit → Celsius conversion.
    Task2,
    /// Wide (64-bit) multiplication.
    Task3,
    /// Binary search in a fixed table.
    Task4,
    /// Hyperperiod boundary injected by the software timer.
    TimerTick,
    /// Any raw value the dispatcher does not know about.
    #[serde(skip_deserializing)]
    Unrecognized(u32),
}

impl Tag {
    /// Decode a raw wire value.  Unknown values map to
    /// [`Tag::Unrecognized`] rather than failing.
    pub fn from_value(v: u32) -> Self {
        match v {
            VALUE_TASK1 => Tag::Task1,
            VALUE_TASK2 => Tag::Task2,
            VALUE_TASK3 => Tag::Task3,
            VALUE_TASK4 => Tag::Task4,
            VALUE_TIMER_TICK => Tag::TimerTick,
            other => Tag::Unrecognized(other),
        }
    }

    /// The raw value carried on the wire for this tag.
    pub fn value(self) -> u32 {
        match self {
            Tag::Task1 => VALUE_TASK1,
            Tag::Task2 => VALUE_TASK2,
            Tag::Task3 => VALUE_TASK3,
            Tag::Task4 => VALUE_TASK4,
            Tag::TimerTick => VALUE_TIMER_TICK,
            Tag::Unrecognized(v) => v,
        }
    }

    /// Short human-readable label used in log fields.
    pub fn label(self) -> &'static str {
        match self {
            Tag::Task1 => "task1",
            Tag::Task2 => "task2",
            Tag::Task3 => "task3",
            Tag::Task4 => "task4",
            Tag::TimerTick => "timer_tick",
            Tag::Unrecognized(_) => "unrecognized",
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tag::Unrecognized(v) => write!(f, "unrecognized({v})"),
            other => f.write_str(other.label()),
        }
    }
}

// ── Message ───────────────────────────────────────────────────────────────────

/// Fixed-size element stored in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub tag: Tag,
    pub value: u32,
}

impl Message {
    /// Build the message a sender emits for `tag`.
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            value: tag.value(),
        }
    }

    /// Decode a raw value as received from an untyped source.
    pub fn from_value(value: u32) -> Self {
        Self {
            tag: Tag::from_value(value),
            value,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values_decode_to_their_tags() {
        assert_eq!(Tag::from_value(100), Tag::Task1);
        assert_eq!(Tag::from_value(200), Tag::Task2);
        assert_eq!(Tag::from_value(300), Tag::Task3);
        assert_eq!(Tag::from_value(400), Tag::Task4);
        assert_eq!(Tag::from_value(10), Tag::TimerTick);
    }

    #[test]
    fn unknown_value_decodes_to_unrecognized() {
        assert_eq!(Tag::from_value(0), Tag::Unrecognized(0));
        assert_eq!(Tag::from_value(999), Tag::Unrecognized(999));
    }

    #[test]
    fn message_new_carries_the_tag_value() {
        let msg = Message::new(Tag::Task3);
        assert_eq!(msg.value, 300);
        assert_eq!(Message::from_value(msg.value), msg);
    }

    #[test]
    fn tag_deserializes_from_snake_case() {
        let tag: Tag = serde_yaml::from_str("timer_tick").unwrap();
        assert_eq!(tag, Tag::TimerTick);
        let tag: Tag = serde_yaml::from_str("task4").unwrap();
        assert_eq!(tag, Tag::Task4);
    }

    #[test]
    fn unrecognized_display_includes_raw_value() {
        assert_eq!(Tag::Unrecognized(7).to_string(), "unrecognized(7)");
        assert_eq!(Tag::Task2.to_string(), "task2");
    }
}
