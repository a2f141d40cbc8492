/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Pure per-tag computations.
//!
//! Each handler works on fixed inputs and returns a small result value; the
//! dispatcher formats it for the console.  Nothing here touches shared state
//! or blocks.

use std::fmt;

// ── Fixed inputs ──────────────────────────────────────────────────────────────

/// Fahrenheit temperature converted by the Task2 handler.
pub const FAHRENHEIT_INPUT: f64 = 86.0;

/// First operand of the Task3 multiplication.
pub const MULTIPLICAND: u64 = 642_837_192;

/// Second operand of the Task3 multiplication.
pub const MULTIPLIER: u64 = 313_193_871;

/// Value searched for by the Task4 handler.
pub const SEARCH_TARGET: u32 = 37;

/// Ascending table searched by the Task4 handler: `1..=51`.
pub const SEARCH_TABLE: [u32; 51] = {
    let mut table = [0u32; 51];
    let mut i = 0;
    while i < table.len() {
        table[i] = i as u32 + 1;
        i += 1;
    }
    table
};

// ── Task2: unit conversion ────────────────────────────────────────────────────

/// A Fahrenheit reading and its Celsius equivalent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub fahrenheit: f64,
    pub celsius: f64,
}

/// `C = (F − 32) / 1.8`
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> Conversion {
    Conversion {
        fahrenheit,
        celsius: (fahrenheit - 32.0) / 1.8,
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Task 2 : The Conversion of {:.6} (Fahrenheit) in (celsius) is {:.6}",
            self.fahrenheit, self.celsius
        )
    }
}

// ── Task3: wide multiplication ────────────────────────────────────────────────

/// Two operands and their full-width product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    pub a: u64,
    pub b: u64,
    /// `None` if the product does not fit in 64 bits.
    pub product: Option<u64>,
}

/// Multiply in 64 bits.  The fixed operands need 58 bits, so the product is
/// always `Some` for them; other inputs report overflow instead of wrapping.
pub fn wide_multiply(a: u64, b: u64) -> Product {
    Product {
        a,
        b,
        product: a.checked_mul(b),
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.product {
            Some(p) => write!(f, "Task 3 : Multiplication of {} with {} = {}", self.a, self.b, p),
            None => write!(
                f,
                "Task 3 : Multiplication of {} with {} overflows 64 bits",
                self.a, self.b
            ),
        }
    }
}

// ── Task4: binary search ──────────────────────────────────────────────────────

/// Outcome of searching a table for one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub target: u32,
    /// 0-based index of `target`, or `None` if absent.
    pub index: Option<usize>,
}

impl SearchResult {
    pub fn found(&self) -> bool {
        self.index.is_some()
    }
}

/// Binary search of an ascending `table`.
pub fn binary_search(table: &[u32], target: u32) -> SearchResult {
    let mut low = 0usize;
    let mut high = table.len();

    // Half-open [low, high) so the bounds never underflow.
    while low < high {
        let mid = low + (high - low) / 2;
        match table[mid].cmp(&target) {
            std::cmp::Ordering::Equal => {
                return SearchResult {
                    target,
                    index: Some(mid),
                }
            }
            std::cmp::Ordering::Less => low = mid + 1,
            std::cmp::Ordering::Greater => high = mid,
        }
    }

    SearchResult {
        target,
        index: None,
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "Task 4 : value {} found at index {}", self.target, i),
            None => write!(f, "Task 4 : value {} is not in the table", self.target),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_one_to_fifty_one() {
        assert_eq!(SEARCH_TABLE.len(), 51);
        assert_eq!(SEARCH_TABLE[0], 1);
        assert_eq!(SEARCH_TABLE[50], 51);
        assert!(SEARCH_TABLE.windows(2).all(|w| w[1] == w[0] + 1));
    }

    // ── Task2 ─────────────────────────────────────────────────────────────────

    #[test]
    fn eighty_six_fahrenheit_is_thirty_celsius() {
        let c = fahrenheit_to_celsius(FAHRENHEIT_INPUT);
        assert_eq!(c.fahrenheit, 86.0);
        assert!((c.celsius - 30.0).abs() < 1e-9, "got {}", c.celsius);
    }

    #[test]
    fn freezing_point_converts_to_zero() {
        assert!(fahrenheit_to_celsius(32.0).celsius.abs() < 1e-12);
    }

    #[test]
    fn conversion_line_has_both_values() {
        let line = fahrenheit_to_celsius(FAHRENHEIT_INPUT).to_string();
        assert!(line.contains("86.000000"), "{line}");
        assert!(line.contains("30.000000"), "{line}");
    }

    // ── Task3 ─────────────────────────────────────────────────────────────────

    #[test]
    fn fixed_operands_multiply_without_overflow() {
        let p = wide_multiply(MULTIPLICAND, MULTIPLIER);
        assert_eq!(p.product, Some(201_332_668_585_250_232));
        // Would not fit the 32-bit accumulator.
        assert!(p.product.unwrap() > u64::from(u32::MAX));
    }

    #[test]
    fn product_line_has_operands_and_exact_product() {
        let line = wide_multiply(MULTIPLICAND, MULTIPLIER).to_string();
        assert_eq!(
            line,
            "Task 3 : Multiplication of 642837192 with 313193871 = 201332668585250232"
        );
    }

    #[test]
    fn overflowing_product_is_reported_not_wrapped() {
        let p = wide_multiply(u64::MAX, 2);
        assert_eq!(p.product, None);
        assert!(p.to_string().contains("overflows"));
    }

    // ── Task4 ─────────────────────────────────────────────────────────────────

    #[test]
    fn finds_thirty_seven_at_index_thirty_six() {
        let r = binary_search(&SEARCH_TABLE, SEARCH_TARGET);
        assert!(r.found());
        assert_eq!(r.index, Some(36));
        assert_eq!(r.to_string(), "Task 4 : value 37 found at index 36");
    }

    #[test]
    fn every_table_value_is_found_at_its_position() {
        for (i, &v) in SEARCH_TABLE.iter().enumerate() {
            assert_eq!(binary_search(&SEARCH_TABLE, v).index, Some(i));
        }
    }

    #[test]
    fn values_outside_the_table_are_not_found() {
        for v in [0, 52, 100, u32::MAX] {
            let r = binary_search(&SEARCH_TABLE, v);
            assert!(!r.found(), "{v} should not be found");
        }
        assert!(binary_search(&SEARCH_TABLE, 0)
            .to_string()
            .contains("not in the table"));
    }

    #[test]
    fn empty_table_finds_nothing() {
        assert_eq!(binary_search(&[], 1).index, None);
    }
}
