//! Firefly III transaction payloads.

use chrono::NaiveDate;
use ffimport_ingest::{Direction, NormalizedRow};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Card issuers label every bill payment with this text. It says nothing about
/// the payer, so such credits are booked against [`PAYMENT_RECEIVED_ACCOUNT`].
pub const PAYMENT_RECEIVED_PREFIX: &str = "PAYMENT RECEIVED. THANK YOU";
pub const PAYMENT_RECEIVED_ACCOUNT: &str = "UPI";

/// One split of a Firefly III transaction group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerTransaction {
    #[serde(rename = "type", serialize_with = "serialize_direction")]
    pub direction: Direction,
    /// `YYYY-MM-DD`, or null when the statement date was unreadable.
    pub date: Option<NaiveDate>,
    /// Magnitude with two decimals, serialized as a string.
    pub amount: Decimal,
    pub description: String,
    #[serde(rename = "currency_code")]
    pub currency: String,
    pub source_name: String,
    pub destination_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl LedgerTransaction {
    /// Assign source/destination around the tracked account.
    ///
    /// Outgoing money leaves `tracked_account` for the merchant; incoming money
    /// arrives in `tracked_account` from the payer.
    pub fn from_row(row: NormalizedRow, tracked_account: &str, currency: &str) -> Self {
        let (source_name, destination_name) = match row.direction {
            Direction::Outgoing => (tracked_account.to_string(), row.counterparty),
            Direction::Incoming => {
                let payer = if row.description.starts_with(PAYMENT_RECEIVED_PREFIX) {
                    PAYMENT_RECEIVED_ACCOUNT.to_string()
                } else {
                    row.counterparty
                };
                (payer, tracked_account.to_string())
            }
        };

        Self {
            direction: row.direction,
            date: row.date,
            amount: row.amount,
            description: row.description,
            currency: currency.to_string(),
            source_name,
            destination_name,
            category_name: row.category_name,
            external_id: row.external_id,
        }
    }
}

fn serialize_direction<S: Serializer>(direction: &Direction, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(match direction {
        Direction::Incoming => "deposit",
        Direction::Outgoing => "withdrawal",
    })
}

/// Body of `POST /api/v1/transactions`.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionGroupRequest<'a> {
    pub apply_rules: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_title: Option<&'a str>,
    pub transactions: &'a [LedgerTransaction],
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(direction: Direction, description: &str) -> NormalizedRow {
        NormalizedRow {
            date: NaiveDate::from_ymd_opt(2024, 2, 1),
            description: description.to_string(),
            counterparty: description.chars().take(100).collect(),
            direction,
            amount: Decimal::new(50000, 2),
            category_name: None,
            external_id: None,
        }
    }

    #[test]
    fn test_outgoing_pays_merchant() {
        let tx = LedgerTransaction::from_row(row(Direction::Outgoing, "AMAZON"), "HDFC Card", "INR");
        assert_eq!(tx.source_name, "HDFC Card");
        assert_eq!(tx.destination_name, "AMAZON");
    }

    #[test]
    fn test_incoming_from_payer() {
        let tx = LedgerTransaction::from_row(row(Direction::Incoming, "REFUND FLIPKART"), "HDFC Card", "INR");
        assert_eq!(tx.source_name, "REFUND FLIPKART");
        assert_eq!(tx.destination_name, "HDFC Card");
    }

    #[test]
    fn test_card_payment_credit_comes_from_upi() {
        for desc in [
            "PAYMENT RECEIVED. THANK YOU",
            "PAYMENT RECEIVED. THANK YOU - VISA",
            "PAYMENT RECEIVED. THANK YOU 8812391",
        ] {
            let tx = LedgerTransaction::from_row(row(Direction::Incoming, desc), "HDFC Card", "INR");
            assert_eq!(tx.source_name, "UPI");
            assert_eq!(tx.destination_name, "HDFC Card");
        }
    }

    #[test]
    fn test_payment_prefix_ignored_for_outgoing_and_other_case() {
        let tx = LedgerTransaction::from_row(
            row(Direction::Outgoing, "PAYMENT RECEIVED. THANK YOU"),
            "HDFC Card",
            "INR",
        );
        assert_eq!(tx.destination_name, "PAYMENT RECEIVED. THANK YOU");

        let tx = LedgerTransaction::from_row(
            row(Direction::Incoming, "payment received. thank you"),
            "HDFC Card",
            "INR",
        );
        assert_eq!(tx.source_name, "payment received. thank you");
    }

    #[test]
    fn test_wire_format() {
        let mut r = row(Direction::Incoming, "REFUND");
        r.external_id = Some("REF9".to_string());
        let tx = LedgerTransaction::from_row(r, "HDFC Card", "INR");
        let body = TransactionGroupRequest {
            apply_rules: true,
            group_title: Some("Jan 2024"),
            transactions: std::slice::from_ref(&tx),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "apply_rules": true,
                "group_title": "Jan 2024",
                "transactions": [{
                    "type": "deposit",
                    "date": "2024-02-01",
                    "amount": "500.00",
                    "description": "REFUND",
                    "currency_code": "INR",
                    "source_name": "REFUND",
                    "destination_name": "HDFC Card",
                    "external_id": "REF9"
                }]
            })
        );
    }

    #[test]
    fn test_null_date_and_no_group_title() {
        let mut r = row(Direction::Outgoing, "CAFE");
        r.date = None;
        let tx = LedgerTransaction::from_row(r, "HDFC Card", "INR");
        let body = TransactionGroupRequest {
            apply_rules: false,
            group_title: None,
            transactions: std::slice::from_ref(&tx),
        };
        let v = serde_json::to_value(&body).unwrap();
        assert!(v.get("group_title").is_none());
        assert_eq!(v["transactions"][0]["type"], "withdrawal");
        assert!(v["transactions"][0]["date"].is_null());
    }
}
