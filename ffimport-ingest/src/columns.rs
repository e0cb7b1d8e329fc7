//! Header aliases accepted for each logical field.
//!
//! Lookup walks each list in order and takes the first column whose trimmed
//! value is non-empty. Adding a bank layout means extending these lists.

use crate::types::RawRow;

pub const DATE_ALIASES: &[&str] = &["date", "transaction date", "txn date", "posted date"];
pub const AMOUNT_ALIASES: &[&str] = &["amount", "amt"];
pub const DESCRIPTION_ALIASES: &[&str] = &["description", "details", "narration", "merchant"];
pub const CATEGORY_ALIASES: &[&str] = &["category"];
pub const REFERENCE_ALIASES: &[&str] = &["reference"];

/// First alias present in `row` with a non-blank value. The value is returned untrimmed.
pub fn first_present<'a>(row: &'a RawRow, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|alias| row.get(alias))
        .find(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_order_wins() {
        let row = RawRow::from_pairs([("Posted Date", "2024-02-01"), ("Date", "2024-01-31")]);
        assert_eq!(first_present(&row, DATE_ALIASES), Some("2024-01-31"));
    }

    #[test]
    fn test_blank_alias_is_skipped() {
        let row = RawRow::from_pairs([("description", "  "), ("narration", "UPI/1234/SWIGGY")]);
        assert_eq!(first_present(&row, DESCRIPTION_ALIASES), Some("UPI/1234/SWIGGY"));
    }

    #[test]
    fn test_missing_field() {
        let row = RawRow::from_pairs([("amount", "1")]);
        assert_eq!(first_present(&row, CATEGORY_ALIASES), None);
    }
}
