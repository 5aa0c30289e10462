//! Query rewriting ahead of embedding.
//!
//! Two append-only rules bring free-text questions closer to how projected
//! transactions read:
//!
//! - `last N months` appends an explicit ` (Date between START and END)`
//!   clause, with a month taken as 30 days.
//! - `$123` becomes `123 USD` (in the configured currency), matching the
//!   projector's `Amount: 123 USD` rendering.
//!
//! Rewriting is not idempotent; run it once per query.

use std::sync::LazyLock;

use chrono::{Days, Local, NaiveDate};
use regex::{Captures, Regex};

const DAYS_PER_MONTH: u64 = 30;

static LAST_MONTHS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\blast\s+(\d+)\s+months?\b").ok());

static DOLLAR_AMOUNT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\$(\d{1,3}(?:,\d{3})+|\d+)(\.\d+)?").ok());

#[derive(Debug, Clone)]
pub struct QueryRewriter {
    currency: String,
}

impl Default for QueryRewriter {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl QueryRewriter {
    /// `currency` replaces the `$` sign in amount shorthand.
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Rewrite relative to today's local date.
    pub fn rewrite(&self, query: &str) -> String {
        self.rewrite_on(query, Local::now().date_naive())
    }

    /// Rewrite relative to `today`.
    pub fn rewrite_on(&self, query: &str, today: NaiveDate) -> String {
        let mut rewritten = query.to_string();

        if let Some((start, end)) = date_window(query, today) {
            rewritten.push_str(&format!(
                " (Date between {} and {})",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ));
        }

        if let Some(re) = DOLLAR_AMOUNT.as_ref() {
            rewritten = re
                .replace_all(&rewritten, |caps: &Captures<'_>| {
                    let fraction = caps.get(2).map_or("", |m| m.as_str());
                    format!("{}{fraction} {}", caps[1].replace(',', ""), self.currency)
                })
                .into_owned();
        }

        if rewritten != query {
            tracing::debug!(original = query, rewritten = %rewritten, "query rewritten");
        }
        rewritten
    }
}

/// `[today - 30N days, today]` for the first `last N months` phrase.
fn date_window(query: &str, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let caps = LAST_MONTHS.as_ref()?.captures(query)?;
    let start = caps[1]
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(DAYS_PER_MONTH))
        .and_then(|days| today.checked_sub_days(Days::new(days)));
    match start {
        Some(start) => Some((start, today)),
        None => {
            tracing::warn!(months = &caps[1], "relative date window out of range; not rewriting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_last_three_months_spans_ninety_days() {
        let today = day(2024, 6, 30);
        let out = QueryRewriter::default().rewrite_on("show me purchases in the last 3 months", today);
        assert_eq!(
            out,
            "show me purchases in the last 3 months (Date between 2024-04-01 and 2024-06-30)"
        );
        assert_eq!((today - day(2024, 4, 1)).num_days(), 90);
    }

    #[test]
    fn test_date_rule_case_and_whitespace_insensitive() {
        let out = QueryRewriter::default().rewrite_on("Fuel in the LAST\t2   Months", day(2024, 3, 1));
        assert!(out.ends_with("(Date between 2024-01-01 and 2024-03-01)"));
    }

    #[test]
    fn test_only_first_window_is_appended() {
        let out = QueryRewriter::default()
            .rewrite_on("last 1 months vs last 6 months", day(2024, 3, 1));
        assert_eq!(out.matches("Date between").count(), 1);
        assert!(out.contains("2024-01-31 and 2024-03-01"));
    }

    #[test]
    fn test_dollar_shorthand() {
        let rw = QueryRewriter::default();
        let today = day(2024, 1, 1);
        assert_eq!(rw.rewrite_on("over $123", today), "over 123 USD");
        assert_eq!(rw.rewrite_on("exactly $45.50 at Shell", today), "exactly 45.50 USD at Shell");
        assert_eq!(rw.rewrite_on("more than $1,200", today), "more than 1200 USD");
        assert_eq!(rw.rewrite_on("$5 and $10", today), "5 USD and 10 USD");
    }

    #[test]
    fn test_dollar_shorthand_keeps_list_punctuation() {
        let rw = QueryRewriter::default();
        let today = day(2024, 1, 1);
        assert_eq!(
            rw.rewrite_on("did I spend $45, $50 or $60?", today),
            "did I spend 45 USD, 50 USD or 60 USD?"
        );
        assert_eq!(
            rw.rewrite_on("between $1,200,000.75, then $3", today),
            "between 1200000.75 USD, then 3 USD"
        );
        assert_eq!(rw.rewrite_on("under $1200.", today), "under 1200 USD.");
    }

    #[test]
    fn test_configured_currency() {
        let out = QueryRewriter::new("EUR").rewrite_on("rent above $900", day(2024, 1, 1));
        assert_eq!(out, "rent above 900 EUR");
    }

    #[test]
    fn test_both_rules_apply() {
        let out = QueryRewriter::default().rewrite_on("Shell over $40 in the last 1 months", day(2024, 5, 31));
        assert_eq!(
            out,
            "Shell over 40 USD in the last 1 months (Date between 2024-05-01 and 2024-05-31)"
        );
    }

    #[test]
    fn test_plain_query_unchanged() {
        let q = "How much did I spend at Shell?";
        assert_eq!(QueryRewriter::default().rewrite_on(q, day(2024, 1, 1)), q);
        assert_eq!(QueryRewriter::default().rewrite_on("costs $ a lot", day(2024, 1, 1)), "costs $ a lot");
    }

    #[test]
    fn test_absurd_window_is_skipped() {
        let q = "last 99999999999999999999 months";
        assert_eq!(QueryRewriter::default().rewrite_on(q, day(2024, 1, 1)), q);
        let q = "last 900000000 months";
        assert_eq!(QueryRewriter::default().rewrite_on(q, day(2024, 1, 1)), q);
    }

    #[test]
    fn test_rewrite_uses_today() {
        let out = QueryRewriter::default().rewrite("the last 1 months");
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert!(out.ends_with(&format!("and {today})")));
    }
}
