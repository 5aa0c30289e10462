//! Schema normalization for raw transaction records.
//!
//! Datasets arrive in more than one shape: a flat schema carrying a signed
//! `amount`, and a bank-core schema carrying an unsigned magnitude plus a
//! separate debit/credit indicator. Each shape has a [`SchemaAdapter`]; the
//! first adapter whose capability check accepts a record converts it into a
//! canonical [`Transaction`]. The flat adapter accepts anything, so
//! normalization is total: missing or malformed fields become empty values,
//! never errors.

use serde_json::{Map, Value};

use ledgerpilot_types::transaction::Transaction;

/// Currency assumed when a record does not name one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Which adapter accepted a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Flat,
    BankCore,
}

/// Converts one recognised record shape into a [`Transaction`].
pub trait SchemaAdapter: Send + Sync {
    fn kind(&self) -> SchemaKind;

    /// Whether this adapter understands the record.
    fn accepts(&self, record: &Map<String, Value>) -> bool;

    fn adapt(&self, record: &Map<String, Value>, default_currency: &str) -> Transaction;
}

const SIGN_KEYS: &[&str] = &[
    "sign",
    "credit_debit_indicator",
    "debit_credit_indicator",
    "direction",
    "dc_flag",
];
const MAGNITUDE_KEYS: &[&str] = &["transaction_amount", "magnitude", "amount_abs", "amount"];
const CURRENCY_KEYS: &[&str] = &["currency", "currency_code", "ccy"];
const RECURRING_KEYS: &[&str] = &["recurring", "is_recurring", "recurrence"];

/// Core-banking export: unsigned magnitude + sign indicator.
pub struct BankCoreAdapter;

impl SchemaAdapter for BankCoreAdapter {
    fn kind(&self) -> SchemaKind {
        SchemaKind::BankCore
    }

    fn accepts(&self, record: &Map<String, Value>) -> bool {
        has_any(record, SIGN_KEYS) || has_any(record, &["transaction_amount", "magnitude", "amount_abs"])
    }

    fn adapt(&self, record: &Map<String, Value>, default_currency: &str) -> Transaction {
        let magnitude = number_field(record, MAGNITUDE_KEYS).map(f64::abs);
        let sign = first_value(record, SIGN_KEYS).map(resolve_sign).unwrap_or(1.0);

        Transaction {
            id: text_field(record, &["transaction_id", "txn_id", "id", "reference"]),
            date: text_field(record, &["booking_date", "value_date", "timestamp", "date"]),
            amount: magnitude.map(|m| m * sign),
            currency: currency_field(record, default_currency),
            counterparty: text_field(
                record,
                &["counterparty_name", "counterparty", "payee", "merchant_name", "merchant"],
            ),
            category: text_field(record, &["category", "mcc_category", "merchant_category"]),
            kind: text_field(record, &["transaction_type", "txn_type", "type"]),
            status: text_field(record, &["status", "state"]),
            recurring: first_value(record, RECURRING_KEYS).and_then(parse_flag),
            notes: text_field(
                record,
                &["narrative", "memo", "remittance_info", "notes", "description"],
            ),
        }
    }
}

/// Simple flat schema with a signed `amount`. Accepts every record.
pub struct FlatAdapter;

impl SchemaAdapter for FlatAdapter {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Flat
    }

    fn accepts(&self, _record: &Map<String, Value>) -> bool {
        true
    }

    fn adapt(&self, record: &Map<String, Value>, default_currency: &str) -> Transaction {
        Transaction {
            id: text_field(record, &["id", "transaction_id"]),
            date: text_field(record, &["date", "timestamp", "posted_at"]),
            amount: number_field(record, &["amount"]),
            currency: currency_field(record, default_currency),
            counterparty: text_field(record, &["merchant", "counterparty", "payee"]),
            category: text_field(record, &["category"]),
            kind: text_field(record, &["type", "transaction_type"]),
            status: text_field(record, &["status"]),
            recurring: first_value(record, RECURRING_KEYS).and_then(parse_flag),
            notes: text_field(record, &["notes", "memo", "description"]),
        }
    }
}

static ADAPTERS: &[&dyn SchemaAdapter] = &[&BankCoreAdapter, &FlatAdapter];

/// Normalize a raw record assuming [`DEFAULT_CURRENCY`].
pub fn normalize(raw: &Value) -> Transaction {
    normalize_with_currency(raw, DEFAULT_CURRENCY).0
}

/// Normalize a raw record, reporting which schema accepted it.
///
/// Non-object input yields an empty transaction tagged [`SchemaKind::Flat`].
pub fn normalize_with_currency(raw: &Value, default_currency: &str) -> (Transaction, SchemaKind) {
    let Some(record) = raw.as_object() else {
        tracing::warn!(kind = json_kind(raw), "transaction record is not an object");
        return (
            Transaction {
                currency: default_currency.to_string(),
                ..Default::default()
            },
            SchemaKind::Flat,
        );
    };

    let adapter = ADAPTERS
        .iter()
        .find(|a| a.accepts(record))
        .copied()
        .unwrap_or(&FlatAdapter);
    (adapter.adapt(record, default_currency), adapter.kind())
}

/// Interpret a debit/credit indicator as a sign multiplier.
///
/// Unrecognised indicators resolve to `+1.0`.
pub fn resolve_sign(indicator: &Value) -> f64 {
    match indicator {
        Value::Number(n) => match n.as_f64() {
            Some(x) if x < 0.0 => -1.0,
            Some(x) if x > 0.0 => 1.0,
            _ => {
                tracing::warn!(indicator = %n, "unresolvable sign indicator; assuming positive");
                1.0
            }
        },
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "-1" | "-" | "debit" | "dbit" | "dr" | "d" | "outflow" | "out" | "decrease"
            | "withdrawal" => -1.0,
            "1" | "+1" | "+" | "credit" | "crdt" | "cr" | "c" | "inflow" | "in" | "increase"
            | "deposit" => 1.0,
            other => {
                tracing::warn!(indicator = other, "unresolvable sign indicator; assuming positive");
                1.0
            }
        },
        other => {
            tracing::warn!(kind = json_kind(other), "unresolvable sign indicator; assuming positive");
            1.0
        }
    }
}

fn has_any(record: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().any(|k| record.get(*k).is_some_and(|v| !v.is_null()))
}

fn first_value<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .find(|v| !v.is_null())
}

fn text_field(record: &Map<String, Value>, keys: &[&str]) -> String {
    match first_value(record, keys) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn number_field(record: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    match first_value(record, keys)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, ',' | '$' | ' '))
                .collect();
            match cleaned.parse::<f64>() {
                Ok(x) if x.is_finite() => Some(x),
                _ => {
                    tracing::debug!(value = %s, "non-numeric amount; leaving empty");
                    None
                }
            }
        }
        _ => None,
    }
}

fn currency_field(record: &Map<String, Value>, default_currency: &str) -> String {
    let code = text_field(record, CURRENCY_KEYS);
    let code = code.trim();
    if code.is_empty() {
        default_currency.to_string()
    } else {
        code.to_uppercase()
    }
}

fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|x| x != 0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
