//! Text projection of transactions for embedding and prompt context.
//!
//! High-salience fields (counterparty, category, type, signed amount) are
//! emitted twice so they dominate the embedding; status and notes appear once.
//! Projection is pure: the same transaction always renders the same string.

use std::fmt::Write as _;

use serde_json::Value;

use ledgerpilot_types::transaction::Transaction;

use crate::ledger::normalize::normalize;

/// Render a transaction as a single retrieval document.
pub fn project(txn: &Transaction) -> String {
    let amount = txn.amount.map(|a| a.to_string()).unwrap_or_default();
    let recurring = match txn.recurring {
        Some(true) => "yes",
        Some(false) => "no",
        None => "",
    };

    let mut out = String::with_capacity(256);
    // Writing into a String cannot fail.
    let _ = write!(out, "Transaction {}. Date: {}. ", txn.id, txn.date);
    for _ in 0..2 {
        let _ = write!(out, "Merchant: {}. ", txn.counterparty);
    }
    for _ in 0..2 {
        let _ = write!(out, "Category: {}. ", txn.category);
    }
    for _ in 0..2 {
        let _ = write!(out, "Type: {}. ", txn.kind);
    }
    for _ in 0..2 {
        let _ = write!(out, "Amount: {} {}. ", amount, txn.currency);
    }
    let _ = write!(
        out,
        "Status: {}. Recurring: {}. Notes: {}.",
        txn.status, recurring, txn.notes
    );
    out
}

/// Normalize a raw record of any recognised schema, then project it.
pub fn project_value(raw: &Value) -> String {
    project(&normalize(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_flat_record() {
        let doc = project_value(&json!({
            "id": "T1", "date": "2023-05-01", "merchant": "Shell",
            "category": "Fuel", "type": "PURCHASE", "amount": 42.10
        }));
        assert_eq!(
            doc,
            "Transaction T1. Date: 2023-05-01. Merchant: Shell. Merchant: Shell. \
             Category: Fuel. Category: Fuel. Type: PURCHASE. Type: PURCHASE. \
             Amount: 42.1 USD. Amount: 42.1 USD. Status: . Recurring: . Notes: ."
        );
    }

    #[test]
    fn test_high_salience_fields_repeated() {
        let txn = Transaction {
            id: "T9".to_string(),
            counterparty: "Netflix".to_string(),
            category: "Entertainment".to_string(),
            kind: "SUBSCRIPTION".to_string(),
            amount: Some(-15.49),
            currency: "USD".to_string(),
            status: "POSTED".to_string(),
            notes: "monthly plan".to_string(),
            recurring: Some(true),
            ..Default::default()
        };
        let doc = project(&txn);
        assert_eq!(doc.matches("Netflix").count(), 2);
        assert_eq!(doc.matches("Entertainment").count(), 2);
        assert_eq!(doc.matches("SUBSCRIPTION").count(), 2);
        assert_eq!(doc.matches("-15.49 USD").count(), 2);
        assert_eq!(doc.matches("POSTED").count(), 1);
        assert_eq!(doc.matches("monthly plan").count(), 1);
        assert!(doc.contains("Recurring: yes."));
    }

    #[test]
    fn test_bank_core_projects_signed_amount() {
        let doc = project_value(&json!({
            "transaction_id": "B1", "booking_date": "2024-03-02",
            "magnitude": "80.00", "direction": "outflow",
            "counterparty_name": "City Power"
        }));
        assert!(doc.contains("Amount: -80 USD."));
        assert!(doc.contains("Merchant: City Power."));
    }

    #[test]
    fn test_projection_is_total() {
        for raw in [json!({}), json!(null), json!("x"), json!({"amount": []})] {
            let doc = project_value(&raw);
            assert!(doc.starts_with("Transaction ."));
        }
    }

    #[test]
    fn test_projection_is_stable() {
        let raw = json!({"id": "T2", "merchant": "Cafe", "amount": -3.5, "recurring": false});
        assert_eq!(project_value(&raw), project_value(&raw));
        assert!(project_value(&raw).contains("Recurring: no."));
    }
}
