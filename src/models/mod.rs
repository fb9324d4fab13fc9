//! Core data models for flowvault
//!
//! Transactions (with their subscription recurrence state) and the
//! receipt-scan collaborator struct used to pre-fill them.

pub mod receipt;
pub mod transaction;

pub use receipt::ReceiptScan;
pub use transaction::{PriceTier, Recurrence, Transaction, TransactionType};
