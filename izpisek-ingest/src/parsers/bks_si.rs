//! BKS Bank (Slovenian layout) statement parser (text)
//!
//! Expected extracted-text rows:
//!   12.03.2024 0038630600820 ERIK H.;sladoled 2,00 9,93
//!   MOJCA H. ID trans. 4401934838
//!   11.03.2024 35001-0001864446 BESTERO*SLASCICARNA OH 6,00 3,93
//!
//! A transaction is anchored by a leading DD.MM.YYYY date. Amounts use a
//! comma decimal separator; the last amount token on the anchor line is the
//! running balance and the one before it the transaction amount. The line
//! after an anchor usually carries the counterparty name.

use anyhow::Result;
use chrono::NaiveDate;
use regex::Regex;

use izpisek_core::{Transaction, TxnKind};

/// Incoming transfers arrive from accounts with this prefix; card payments
/// and other outgoing entries book against the own 35001-... account.
const INCOME_ACCOUNT_PREFIX: &str = "0038";

/// Internal reference marker. "ID trans. ..." tails are stripped from
/// descriptions and counterparty lines.
const REFERENCE_MARKER: &str = "ID trans";

/// Lines opening with one of these are layout boilerplate (reference rows,
/// column headers, account-holder names), not counterparty lines.
const NON_COUNTERPARTY_PREFIXES: [&str; 4] =
    [REFERENCE_MARKER, "/", "MALE BRASLOV", "HOSTNIK"];

/// Counts of lines the parser looked at but dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Total lines scanned.
    pub lines: usize,
    /// Date-anchored lines rejected for an invalid date or missing amounts.
    pub rejected_anchors: usize,
}

/// Parse extracted BKS statement text into transactions, newest first.
///
/// Lines that fail the grammar are dropped silently; PDF text extraction is
/// lossy and stray fragments are expected. Use
/// [`parse_bks_si_text_with_stats`] to observe how many were dropped.
pub fn parse_bks_si_text(text: &str) -> Result<Vec<Transaction>> {
    parse_bks_si_text_with_stats(text).map(|(txns, _)| txns)
}

/// Like [`parse_bks_si_text`], also reporting rejected-line diagnostics.
pub fn parse_bks_si_text_with_stats(text: &str) -> Result<(Vec<Transaction>, ParseStats)> {
    let anchor_re = Regex::new(r"^(?P<date>\d{2}\.\d{2}\.\d{4})\s+(?P<rest>.+)$")?;
    let date_prefix_re = Regex::new(r"^\d{2}\.\d{2}\.\d{4}")?;
    let amount_re = Regex::new(r"\d+,\d{2}")?;
    let reference_suffix_re = Regex::new(&format!(r"\s*{REFERENCE_MARKER}\..*"))?;

    let lines: Vec<&str> = text.lines().collect();
    let mut stats = ParseStats {
        lines: lines.len(),
        ..ParseStats::default()
    };
    let mut out = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let Some(caps) = anchor_re.captures(line) else {
            continue;
        };
        let date_text = &caps["date"];
        let rest = &caps["rest"];

        let Ok(date) = NaiveDate::parse_from_str(date_text, "%d.%m.%Y") else {
            stats.rejected_anchors += 1;
            continue;
        };

        let amounts: Vec<&str> = amount_re.find_iter(rest).map(|m| m.as_str()).collect();
        if amounts.len() < 2 {
            // One lone number cannot resolve balance vs. amount.
            stats.rejected_anchors += 1;
            continue;
        }

        // The layout prints the running balance last and the transaction
        // amount right before it; earlier numeric tokens belong to the
        // description.
        let balance = parse_comma_decimal(amounts[amounts.len() - 1]);
        let amount = parse_comma_decimal(amounts[amounts.len() - 2]);

        // Strip each matched amount once to leave the account + description
        // residue, then peel the account off at the first whitespace run.
        let mut residue = rest.to_string();
        for amt in &amounts {
            residue = residue.replacen(*amt, "", 1);
        }
        let residue = residue.trim();
        let (account, raw_desc) = match residue.split_once(char::is_whitespace) {
            Some((account, tail)) => (account, tail.trim()),
            None => (residue, ""),
        };

        let kind = if account.starts_with(INCOME_ACCOUNT_PREFIX) {
            TxnKind::Income
        } else {
            TxnKind::Expense
        };

        // The counterparty usually sits on the following line, unless that
        // line starts the next transaction or is layout boilerplate.
        let mut payer_payee = String::new();
        if let Some(next) = lines.get(i + 1) {
            let next = next.trim();
            if !date_prefix_re.is_match(next)
                && !NON_COUNTERPARTY_PREFIXES.iter().any(|p| next.starts_with(p))
            {
                payer_payee = reference_suffix_re.replace(next, "").trim().to_string();
            }
        }

        let mut description = reference_suffix_re
            .replace(raw_desc, "")
            .trim()
            .trim_end_matches(';')
            .trim()
            .to_string();

        // Incoming transfers pack "NAME;note" into the description column;
        // the name wins over whatever the lookahead found.
        if kind == TxnKind::Income {
            if let Some((name, note)) = raw_desc.split_once(';') {
                payer_payee = name.trim().to_string();
                let note = note.trim();
                description = if note.is_empty() {
                    format!("Transfer from {payer_payee}")
                } else {
                    note.to_string()
                };
            }
        }
        if description.is_empty() {
            description = if payer_payee.is_empty() {
                raw_desc.to_string()
            } else {
                payer_payee.clone()
            };
        }

        // Line index keeps textually identical repeats distinguishable.
        let id = format!("{date_text}_{description}_{amount:.2}_{i}")
            .replace(char::is_whitespace, "_");

        let payer_payee = if payer_payee.is_empty() {
            account.to_string()
        } else {
            payer_payee
        };

        let (debit, credit) = match kind {
            TxnKind::Income => (0.0, amount),
            TxnKind::Expense => (amount, 0.0),
        };

        out.push(Transaction {
            id,
            date,
            account: account.to_string(),
            payer_payee,
            description,
            debit,
            credit,
            balance,
            kind,
            amount,
            category: None,
        });
    }

    // Newest first; the stable sort keeps appearance order within a day.
    out.sort_by(|a, b| b.date.cmp(&a.date));

    Ok((out, stats))
}

fn parse_comma_decimal(s: &str) -> f64 {
    s.replace(',', ".").parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_expense_row() {
        let text = "11.03.2024 35001-0001864446 BESTERO*SLASCICARNA OH 6,00 3,93";
        let txns = parse_bks_si_text(text).unwrap();
        assert_eq!(txns.len(), 1);

        let t = &txns[0];
        assert_eq!(t.amount, 6.00);
        assert_eq!(t.balance, 3.93);
        assert_eq!(t.account, "35001-0001864446");
        assert_eq!(t.description, "BESTERO*SLASCICARNA OH");
        assert_eq!(t.kind, TxnKind::Expense);
        assert_eq!(t.debit, 6.00);
        assert_eq!(t.credit, 0.0);
        // no counterparty line, so the account stands in
        assert_eq!(t.payer_payee, "35001-0001864446");
    }

    #[test]
    fn test_income_composite_split() {
        let text = "12.03.2024 0038630600820 ERIK H.;sladoled 2,00 9,93";
        let txns = parse_bks_si_text(text).unwrap();
        assert_eq!(txns.len(), 1);

        let t = &txns[0];
        assert_eq!(t.kind, TxnKind::Income);
        assert_eq!(t.credit, 2.00);
        assert_eq!(t.debit, 0.0);
        assert_eq!(t.payer_payee, "ERIK H.");
        assert_eq!(t.description, "sladoled");
    }

    #[test]
    fn test_income_empty_note_synthesizes_description() {
        let text = "12.03.2024 0038630600820 ERIK H.; 2,00 9,93";
        let txns = parse_bks_si_text(text).unwrap();
        assert_eq!(txns[0].payer_payee, "ERIK H.");
        assert_eq!(txns[0].description, "Transfer from ERIK H.");
    }

    #[test]
    fn test_counterparty_from_next_line() {
        let text = "\
11.03.2024 35001-0001864446 BESTERO*SLASCICARNA OH 6,00 3,93
MOJCA H. ID trans. 4401934838";
        let txns = parse_bks_si_text(text).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].payer_payee, "MOJCA H.");
    }

    #[test]
    fn test_next_anchor_not_consumed_as_counterparty() {
        let text = "\
11.03.2024 35001-0001864446 BESTERO*SLASCICARNA OH 6,00 3,93
10.03.2024 35001-0001864446 SPAR LJUBLJANA 4,50 9,93";
        let txns = parse_bks_si_text(text).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].payer_payee, "35001-0001864446");
    }

    #[test]
    fn test_boilerplate_lines_rejected_as_counterparty() {
        for boilerplate in [
            "ID trans. 4401934838",
            "/SI56 0202 1025 5555 123",
            "MALE BRASLOVCE 19",
            "HOSTNIK d.o.o.",
        ] {
            let text = format!(
                "11.03.2024 35001-0001864446 BESTERO*SLASCICARNA OH 6,00 3,93\n{boilerplate}"
            );
            let txns = parse_bks_si_text(&text).unwrap();
            assert_eq!(
                txns[0].payer_payee, "35001-0001864446",
                "{boilerplate:?} should not become the counterparty"
            );
        }
    }

    #[test]
    fn test_description_reference_tail_and_semicolon_stripped() {
        let text = "11.03.2024 35001-0001864446 BANKART; ID trans. 991123 6,00 3,93";
        let txns = parse_bks_si_text(text).unwrap();
        assert_eq!(txns[0].description, "BANKART");
    }

    #[test]
    fn test_rejects_non_anchor_and_short_lines() {
        let text = "\
Promet v dobro 2,00 9,93
11.03.2024 only one amount 6,00
hello";
        let (txns, stats) = parse_bks_si_text_with_stats(text).unwrap();
        assert!(txns.is_empty());
        assert_eq!(stats.lines, 3);
        // only the date-anchored line counts as a rejected candidate
        assert_eq!(stats.rejected_anchors, 1);
    }

    #[test]
    fn test_rejects_impossible_date() {
        let (txns, stats) =
            parse_bks_si_text_with_stats("31.02.2024 35001-1 SHOP 6,00 3,93").unwrap();
        assert!(txns.is_empty());
        assert_eq!(stats.rejected_anchors, 1);
    }

    #[test]
    fn test_three_amount_tokens_use_last_two() {
        let text = "10.03.2024 35001-0001864446 SHOP NOTE 1,00 2,00 3,00";
        let txns = parse_bks_si_text(text).unwrap();
        assert_eq!(txns[0].amount, 2.00);
        assert_eq!(txns[0].balance, 3.00);
        assert_eq!(txns[0].description, "SHOP NOTE");
    }

    #[test]
    fn test_sorts_newest_first() {
        let text = "\
01.02.2024 35001-0001864446 FEBRUARY BUY 1,00 8,00
15.03.2024 35001-0001864446 MARCH BUY 2,00 6,00
10.03.2024 35001-0001864446 EARLIER MARCH BUY 3,00 9,00";
        let txns = parse_bks_si_text(text).unwrap();
        let dates: Vec<String> = txns.iter().map(|t| t.date.to_string()).collect();
        assert_eq!(dates, ["2024-03-15", "2024-03-10", "2024-02-01"]);
    }

    #[test]
    fn test_same_day_keeps_appearance_order() {
        let text = "\
15.03.2024 35001-0001864446 FIRST BUY 2,00 6,00
15.03.2024 35001-0001864446 SECOND BUY 3,00 3,00";
        let txns = parse_bks_si_text(text).unwrap();
        assert_eq!(txns[0].description, "FIRST BUY");
        assert_eq!(txns[1].description, "SECOND BUY");
    }

    #[test]
    fn test_identical_lines_get_distinct_ids() {
        let text = "\
15.03.2024 35001-0001864446 COFFEE 2,00 6,00
15.03.2024 35001-0001864446 COFFEE 2,00 6,00";
        let txns = parse_bks_si_text(text).unwrap();
        assert_eq!(txns.len(), 2);
        assert_ne!(txns[0].id, txns[1].id);
    }

    #[test]
    fn test_idempotent_parse() {
        let text = "\
12.03.2024 0038630600820 ERIK H.;sladoled 2,00 9,93
MOJCA H. ID trans. 4401934838
11.03.2024 35001-0001864446 BESTERO*SLASCICARNA OH 6,00 3,93";
        let first = parse_bks_si_text(text).unwrap();
        let second = parse_bks_si_text(text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_debit_credit_amount_invariant() {
        let text = "\
12.03.2024 0038630600820 ERIK H.;sladoled 2,00 9,93
11.03.2024 35001-0001864446 BESTERO*SLASCICARNA OH 6,00 3,93
10.03.2024 35001-0001864446 SPAR LJUBLJANA 4,50 9,93";
        for t in parse_bks_si_text(text).unwrap() {
            assert_eq!(t.debit + t.credit, t.amount);
            assert!(t.debit == 0.0 || t.credit == 0.0);
        }
    }
}
