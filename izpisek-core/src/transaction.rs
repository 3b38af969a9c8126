//! Transaction records recovered from statement text

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a transaction, derived from the account-token prefix
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TxnKind {
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "expense")]
    Expense,
}

impl TxnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnKind::Income => "income",
            TxnKind::Expense => "expense",
        }
    }
}

/// One statement transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Deterministic id built from date, cleaned description, amount and
    /// source line index; stable across repeated parses of the same text
    pub id: String,
    /// Booking date as printed on the statement (DD.MM.YYYY)
    pub date: NaiveDate,
    /// Account token following the date on the anchor line
    pub account: String,
    /// Counterparty name
    pub payer_payee: String,
    /// Cleaned description
    pub description: String,
    /// Outgoing amount; zero for income
    pub debit: f64,
    /// Incoming amount; zero for expenses
    pub credit: f64,
    /// Running balance after the transaction, as stated on the same line
    pub balance: f64,
    #[serde(rename = "type")]
    pub kind: TxnKind,
    /// Absolute value of the single nonzero debit/credit leg
    pub amount: f64,
    /// Category attached by downstream matching; never set by the parser
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Transaction {
    /// Returns true if money came into the account
    pub fn is_income(&self) -> bool {
        self.kind == TxnKind::Income
    }

    /// Returns true if money left the account
    pub fn is_expense(&self) -> bool {
        self.kind == TxnKind::Expense
    }
}
