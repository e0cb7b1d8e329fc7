use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

/// One statement row keyed by lower-cased, trimmed column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a row from `(column, value)` pairs. The first occurrence of a column wins.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut row = Self::new();
        for (k, v) in pairs {
            row.insert(k.as_ref(), v);
        }
        row
    }

    pub fn insert(&mut self, column: &str, value: impl Into<String>) {
        self.cells
            .entry(normalize_header(column))
            .or_insert_with(|| value.into());
    }

    /// Case- and whitespace-insensitive column lookup.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(&normalize_header(column)).map(String::as_str)
    }

    /// True when every cell is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }
}

pub(crate) fn normalize_header(column: &str) -> String {
    column.trim().to_lowercase()
}

/// Direction of funds relative to the tracked account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Funds added to the tracked account (payments, refunds).
    Incoming,
    /// Funds leaving the tracked account (purchases, charges).
    Outgoing,
}

/// How the sign of a raw amount maps onto [`Direction`].
///
/// Card issuers usually report purchases as positive and payments/refunds as
/// negative (`NegativeIsIncoming`). Bank accounts often do the opposite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignConvention {
    #[default]
    NegativeIsIncoming,
    NegativeIsOutgoing,
}

impl SignConvention {
    pub fn direction(self, negative: bool) -> Direction {
        match (self, negative) {
            (SignConvention::NegativeIsIncoming, true) => Direction::Incoming,
            (SignConvention::NegativeIsIncoming, false) => Direction::Outgoing,
            (SignConvention::NegativeIsOutgoing, true) => Direction::Outgoing,
            (SignConvention::NegativeIsOutgoing, false) => Direction::Incoming,
        }
    }
}

/// Preferred reading of an ambiguous `NN/NN/YYYY` date.
///
/// The preferred order is tried first; if it does not produce a valid
/// calendar date the other order is tried, so `31/01/2024` parses either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    #[default]
    MonthFirst,
    DayFirst,
}

/// Knobs for [`crate::normalize_row`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub sign_convention: SignConvention,
    pub date_order: DateOrder,
    pub description_max_len: usize,
    pub account_name_max_len: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            sign_convention: SignConvention::default(),
            date_order: DateOrder::default(),
            description_max_len: 255,
            account_name_max_len: 100,
        }
    }
}

/// Normalized output of a statement row (bank-agnostic).
///
/// Account names are not assigned here; they depend on the tracked account
/// and on [`Direction`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub date: Option<NaiveDate>,
    pub description: String,
    /// Description shortened for use as the counterparty account name.
    pub counterparty: String,
    pub direction: Direction,
    /// Magnitude, always >= 0 with scale 2.
    pub amount: Decimal,
    pub category_name: Option<String>,
    pub external_id: Option<String>,
}
