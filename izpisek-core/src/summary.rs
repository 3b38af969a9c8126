//! Combining parsed statements: dedup, totals, per-month breakdown.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::transaction::{Transaction, TxnKind};

/// Sums of all debits and credits over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub expenses: f64,
    pub income: f64,
}

pub fn totals(txns: &[Transaction]) -> Totals {
    Totals {
        expenses: txns.iter().map(|t| t.debit).sum(),
        income: txns.iter().map(|t| t.credit).sum(),
    }
}

/// Income/expense sums for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// Human label, e.g. "March 2024"
    pub month: String,
    /// Sort key, e.g. "2024-03"
    pub month_key: String,
    pub income: f64,
    pub expenses: f64,
}

/// Drop repeats of the same transaction id; the first occurrence wins and
/// input order is preserved. Overlapping statements (the same document
/// ingested twice) collapse here, not in the parser.
pub fn dedupe_by_id(txns: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    txns.into_iter().filter(|t| seen.insert(t.id.clone())).collect()
}

/// Bucket transactions by calendar month, newest month first.
pub fn monthly_summary(txns: &[Transaction]) -> Vec<MonthlySummary> {
    let mut buckets: HashMap<String, MonthlySummary> = HashMap::new();

    for t in txns {
        let month_key = t.date.format("%Y-%m").to_string();
        let entry = buckets.entry(month_key.clone()).or_insert_with(|| MonthlySummary {
            month: t.date.format("%B %Y").to_string(),
            month_key,
            income: 0.0,
            expenses: 0.0,
        });
        match t.kind {
            TxnKind::Income => entry.income += t.amount,
            TxnKind::Expense => entry.expenses += t.amount,
        }
    }

    let mut months: Vec<MonthlySummary> = buckets.into_values().collect();
    months.sort_by(|a, b| b.month_key.cmp(&a.month_key));
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(id: &str, date: (i32, u32, u32), kind: TxnKind, amount: f64) -> Transaction {
        let (debit, credit) = match kind {
            TxnKind::Income => (0.0, amount),
            TxnKind::Expense => (amount, 0.0),
        };
        Transaction {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            account: "35001-0001864446".to_string(),
            payer_payee: String::new(),
            description: "TEST".to_string(),
            debit,
            credit,
            balance: 0.0,
            kind,
            amount,
            category: None,
        }
    }

    #[test]
    fn test_totals_split_by_direction() {
        let txns = vec![
            txn("a", (2024, 3, 11), TxnKind::Expense, 6.0),
            txn("b", (2024, 3, 12), TxnKind::Income, 2.0),
            txn("c", (2024, 3, 13), TxnKind::Expense, 1.5),
        ];
        let t = totals(&txns);
        assert_eq!(t.expenses, 7.5);
        assert_eq!(t.income, 2.0);
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let txns = vec![
            txn("a", (2024, 3, 11), TxnKind::Expense, 6.0),
            txn("b", (2024, 3, 12), TxnKind::Income, 2.0),
            txn("a", (2024, 3, 11), TxnKind::Expense, 6.0),
        ];
        let unique = dedupe_by_id(txns);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].id, "a");
        assert_eq!(unique[1].id, "b");
    }

    #[test]
    fn test_monthly_summary_buckets_and_orders() {
        let txns = vec![
            txn("a", (2024, 2, 1), TxnKind::Expense, 10.0),
            txn("b", (2024, 3, 12), TxnKind::Income, 2.0),
            txn("c", (2024, 3, 15), TxnKind::Expense, 6.0),
        ];
        let months = monthly_summary(&txns);
        assert_eq!(months.len(), 2);

        assert_eq!(months[0].month_key, "2024-03");
        assert_eq!(months[0].month, "March 2024");
        assert_eq!(months[0].income, 2.0);
        assert_eq!(months[0].expenses, 6.0);

        assert_eq!(months[1].month_key, "2024-02");
        assert_eq!(months[1].expenses, 10.0);
        assert_eq!(months[1].income, 0.0);
    }
}
