//! Receipt scan collaborator output
//!
//! The host application runs OCR over receipt images/PDFs outside this crate
//! and hands back a best-effort structured guess. This core only uses it to
//! pre-fill a new transaction; the confidence score is carried for display and
//! never validated or trusted here.

use serde::{Deserialize, Serialize};

use super::transaction::{Transaction, TransactionType};

/// Best-effort structured data extracted from a scanned receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptScan {
    /// Detected total, if any
    pub amount: Option<f64>,

    /// Detected purchase date as a display string, if any
    pub date: Option<String>,

    /// Detected time of day, unused by this core
    pub time: Option<String>,

    /// Detected merchant name, if any
    pub company_name: Option<String>,

    /// Scanner's own confidence in the extraction, 0.0..=1.0
    pub confidence: f64,
}

impl ReceiptScan {
    /// Pre-fill a new expense from this scan
    ///
    /// Missing fields fall back to an empty name, zero amount, and the
    /// supplied date string. The result is an ordinary one-time transaction;
    /// the user edits it at the UI boundary before it is persisted.
    pub fn prefill_transaction(&self, fallback_date: impl Into<String>) -> Transaction {
        Transaction::new(
            self.company_name.clone().unwrap_or_default(),
            self.amount.unwrap_or(0.0),
            TransactionType::Expense,
            self.date.clone().unwrap_or_else(|| fallback_date.into()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefill_uses_scan_fields() {
        let scan = ReceiptScan {
            amount: Some(12.99),
            date: Some("Dec 8, 2025".into()),
            time: Some("14:32".into()),
            company_name: Some("Corner Market".into()),
            confidence: 0.87,
        };

        let txn = scan.prefill_transaction("Jan 1, 2026");
        assert_eq!(txn.name, "Corner Market");
        assert_eq!(txn.amount, 12.99);
        assert_eq!(txn.date, "Dec 8, 2025");
        assert_eq!(txn.kind, TransactionType::Expense);
    }

    #[test]
    fn test_prefill_falls_back_when_empty() {
        let scan = ReceiptScan {
            amount: None,
            date: None,
            time: None,
            company_name: None,
            confidence: 0.1,
        };

        let txn = scan.prefill_transaction("Jan 1, 2026");
        assert_eq!(txn.name, "");
        assert_eq!(txn.amount, 0.0);
        assert_eq!(txn.date, "Jan 1, 2026");
    }
}
