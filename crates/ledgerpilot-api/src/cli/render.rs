//! Shared terminal rendering for retrieved transactions.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};

use ledgerpilot_core::copilot::RetrievedTransaction;

/// Render retrieved transactions as a ranked table.
pub fn hits_table(hits: &[RetrievedTransaction]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Score").fg(Color::White),
        Cell::new("ID").fg(Color::White),
        Cell::new("Date").fg(Color::White),
        Cell::new("Merchant").fg(Color::White),
        Cell::new("Category").fg(Color::White),
        Cell::new("Amount").fg(Color::White),
    ]);

    for (rank, hit) in hits.iter().enumerate() {
        let txn = &hit.transaction;
        let amount_color = match txn.amount {
            Some(a) if a < 0.0 => Color::Red,
            Some(_) => Color::Green,
            None => Color::DarkGrey,
        };

        table.add_row(vec![
            Cell::new(rank + 1).fg(Color::DarkGrey),
            Cell::new(format!("{:.4}", hit.score)).fg(score_color(hit.score)),
            Cell::new(hit.key.as_str()).fg(Color::Cyan),
            Cell::new(&txn.date),
            Cell::new(truncate(&txn.counterparty, 32)).fg(Color::White),
            Cell::new(&txn.category).fg(Color::Magenta),
            Cell::new(format_amount(txn.amount, &txn.currency)).fg(amount_color),
        ]);
    }

    table
}

/// Color-code a cosine similarity score.
pub fn score_color(score: f32) -> Color {
    if score >= 0.7 {
        Color::Green
    } else if score >= 0.4 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn format_amount(amount: Option<f64>, currency: &str) -> String {
    match amount {
        Some(a) => format!("{a:.2} {currency}"),
        None => "-".to_string(),
    }
}

/// Shorten to at most `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerpilot_types::transaction::{Transaction, TransactionKey};

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Some(-42.1), "USD"), "-42.10 USD");
        assert_eq!(format_amount(None, "USD"), "-");
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Shell", 32), "Shell");
        assert_eq!(truncate("Café Crème Boulangerie", 8), "Café ...");
    }

    #[test]
    fn test_score_color_bands() {
        assert_eq!(score_color(0.91), Color::Green);
        assert_eq!(score_color(0.5), Color::Yellow);
        assert_eq!(score_color(0.1), Color::Red);
    }

    #[test]
    fn test_hits_table_has_row_per_hit() {
        let hits = vec![RetrievedTransaction {
            key: TransactionKey::from("T1"),
            score: 0.83,
            transaction: Transaction {
                id: "T1".to_string(),
                date: "2023-05-01".to_string(),
                amount: Some(-42.1),
                currency: "USD".to_string(),
                counterparty: "Shell".to_string(),
                category: "Fuel".to_string(),
                ..Default::default()
            },
        }];
        let rendered = hits_table(&hits).to_string();
        assert!(rendered.contains("Shell"));
        assert!(rendered.contains("-42.10 USD"));
        assert!(rendered.contains("0.8300"));
    }
}
