//! RawRow -> NormalizedRow.

use crate::amount::{AmountRangeError, parse_amount, split_sign};
use crate::columns::{
    AMOUNT_ALIASES, CATEGORY_ALIASES, DATE_ALIASES, DESCRIPTION_ALIASES, REFERENCE_ALIASES,
    first_present,
};
use crate::date::{DateParseError, parse_date};
use crate::types::{NormalizeOptions, NormalizedRow, RawRow};

pub const NO_DESCRIPTION: &str = "(no description)";

/// A normalized row plus the date defect, if any.
///
/// An unparseable date does not drop the row: `row.date` is `None` and the
/// error is handed back so the caller can report it.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub row: NormalizedRow,
    pub date_error: Option<DateParseError>,
}

/// Fails only when the amount cannot be represented with two decimals; such a
/// row cannot be booked at all.
pub fn normalize_row(raw: &RawRow, opts: &NormalizeOptions) -> Result<Normalized, AmountRangeError> {
    let (date, date_error) = match first_present(raw, DATE_ALIASES) {
        Some(text) => match parse_date(text, opts.date_order) {
            Ok(d) => (Some(d), None),
            Err(e) => (None, Some(e)),
        },
        None => (None, None),
    };

    let amount_text = first_present(raw, AMOUNT_ALIASES).unwrap_or("");
    let signed = parse_amount(amount_text)?;
    let (amount, direction) =
        split_sign(signed, opts.sign_convention).ok_or_else(|| AmountRangeError {
            raw: amount_text.to_string(),
        })?;

    let description = first_present(raw, DESCRIPTION_ALIASES)
        .map(str::trim)
        .unwrap_or(NO_DESCRIPTION);

    Ok(Normalized {
        row: NormalizedRow {
            date,
            description: truncate_chars(description, opts.description_max_len),
            counterparty: truncate_chars(description, opts.account_name_max_len),
            direction,
            amount,
            category_name: first_present(raw, CATEGORY_ALIASES).map(str::to_string),
            external_id: first_present(raw, REFERENCE_ALIASES).map(str::to_string),
        },
        date_error,
    })
}

/// First `max` characters of `s` (never splits a code point).
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DateOrder, Direction, SignConvention};
    use chrono::NaiveDate;

    #[test]
    fn test_purchase_row() {
        let raw = RawRow::from_pairs([
            ("Transaction Date", "31/01/2024"),
            ("Details", "  AMAZON PAY  "),
            ("Amt", "₹1,200.00"),
            ("Category", "Shopping"),
            ("Reference", "REF123"),
        ]);
        let out = normalize_row(&raw, &NormalizeOptions::default()).unwrap();
        assert!(out.date_error.is_none());

        let row = out.row;
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(row.description, "AMAZON PAY");
        assert_eq!(row.counterparty, "AMAZON PAY");
        assert_eq!(row.direction, Direction::Outgoing);
        assert_eq!(row.amount.to_string(), "1200.00");
        assert_eq!(row.category_name.as_deref(), Some("Shopping"));
        assert_eq!(row.external_id.as_deref(), Some("REF123"));
    }

    #[test]
    fn test_refund_row_is_incoming() {
        let raw = RawRow::from_pairs([("date", "2024-02-01"), ("amount", "-500.00")]);
        let row = normalize_row(&raw, &NormalizeOptions::default()).unwrap().row;
        assert_eq!(row.direction, Direction::Incoming);
        assert_eq!(row.amount.to_string(), "500.00");
    }

    #[test]
    fn test_inverted_sign_convention() {
        let raw = RawRow::from_pairs([("amount", "-500.00")]);
        let opts = NormalizeOptions {
            sign_convention: SignConvention::NegativeIsOutgoing,
            ..NormalizeOptions::default()
        };
        assert_eq!(normalize_row(&raw, &opts).unwrap().row.direction, Direction::Outgoing);
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let raw = RawRow::from_pairs([("description", "   ")]);
        let out = normalize_row(&raw, &NormalizeOptions::default()).unwrap();
        assert!(out.date_error.is_none());
        assert_eq!(out.row.date, None);
        assert_eq!(out.row.description, NO_DESCRIPTION);
        assert_eq!(out.row.counterparty, NO_DESCRIPTION);
        assert_eq!(out.row.amount.to_string(), "0.00");
        assert_eq!(out.row.category_name, None);
        assert_eq!(out.row.external_id, None);
    }

    #[test]
    fn test_bad_date_is_reported_but_row_survives() {
        let raw = RawRow::from_pairs([("date", "someday"), ("amount", "10"), ("merchant", "CAFE")]);
        let out = normalize_row(&raw, &NormalizeOptions::default()).unwrap();
        assert_eq!(out.date_error.map(|e| e.raw), Some("someday".to_string()));
        assert_eq!(out.row.date, None);
        assert_eq!(out.row.description, "CAFE");
    }

    #[test]
    fn test_day_first_option() {
        let raw = RawRow::from_pairs([("date", "01/02/2024")]);
        let opts = NormalizeOptions {
            date_order: DateOrder::DayFirst,
            ..NormalizeOptions::default()
        };
        assert_eq!(
            normalize_row(&raw, &opts).unwrap().row.date,
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
    }

    #[test]
    fn test_amount_without_room_for_cents_rejects_row() {
        for amount in ["1000000000000000000000000000", "100000000000000000000000000000"] {
            let raw = RawRow::from_pairs([("date", "2024-01-31"), ("amount", amount)]);
            let err = normalize_row(&raw, &NormalizeOptions::default()).unwrap_err();
            assert_eq!(err.raw, amount);
        }
    }

    #[test]
    fn test_truncation_limits() {
        let long = "X".repeat(300);
        let raw = RawRow::from_pairs([("description", long.as_str())]);
        let row = normalize_row(&raw, &NormalizeOptions::default()).unwrap().row;
        assert_eq!(row.description.chars().count(), 255);
        assert_eq!(row.counterparty.chars().count(), 100);
    }

    #[test]
    fn test_truncate_chars_respects_code_points() {
        assert_eq!(truncate_chars("₹₹₹₹", 2), "₹₹");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
