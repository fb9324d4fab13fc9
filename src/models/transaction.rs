//! Transaction model
//!
//! Represents income/expense transactions with optional subscription
//! recurrence state (billing period counter, next due date, scheduled price
//! tiers). Field names serialize in camelCase so records written by earlier
//! versions of the host application deserialize unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::dates;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in
    Income,
    /// Money going out
    #[default]
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// Billing interval of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    /// A one-time transaction; none of the subscription fields apply
    #[default]
    Once,
    /// Repeats every calendar day
    Daily,
    /// Repeats every calendar month
    Monthly,
    /// Repeats every calendar year
    Yearly,
}

impl Recurrence {
    /// Check if this transaction repeats at all
    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::Once)
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Once => write!(f, "once"),
            Self::Daily => write!(f, "daily"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

/// A scheduled price change effective from a given billing period onward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTier {
    /// 1-based billing period the new amount takes effect
    pub period_number: u32,

    /// The charge for that period and onward, until a later tier applies
    pub amount: f64,
}

/// A financial transaction, possibly recurring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier, assigned at creation and never reused
    pub id: String,

    /// Display name (merchant, subscription, payee)
    pub name: String,

    /// Category key
    #[serde(default)]
    pub category: String,

    /// Current period's charge in the base currency, non-negative
    pub amount: f64,

    /// Income or expense
    #[serde(rename = "type", default)]
    pub kind: TransactionType,

    /// Origination date as a localized display string ("Dec 8, 2025"),
    /// always parseable by [`dates::parse`]
    pub date: String,

    /// Billing interval; `Once` means the subscription fields are unused
    #[serde(default)]
    pub recurrence: Recurrence,

    /// Scheduled price changes, unique per period, sparse
    #[serde(default)]
    pub price_tiers: Vec<PriceTier>,

    /// 1-based count of elapsed billing periods (1 = first charge)
    #[serde(default = "default_period")]
    pub current_period: u32,

    /// Next due date as ISO `YYYY-MM-DD`, never localized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_billing_date: Option<String>,

    /// False once the recurrence has been terminated; an inactive
    /// transaction never advances and never appears in projections
    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Inclusive ISO end date after which the subscription is over
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

fn default_period() -> u32 {
    1
}

fn default_active() -> bool {
    true
}

impl Transaction {
    /// Create a new one-time transaction
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        kind: TransactionType,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            category: String::new(),
            amount,
            kind,
            date: date.into(),
            recurrence: Recurrence::Once,
            price_tiers: Vec::new(),
            current_period: 1,
            next_billing_date: None,
            is_active: true,
            end_date: None,
        }
    }

    /// Turn this into a recurring transaction with a first due date
    pub fn with_recurrence(mut self, recurrence: Recurrence, next_billing_date: NaiveDate) -> Self {
        self.recurrence = recurrence;
        self.next_billing_date = Some(dates::format_iso(next_billing_date));
        self
    }

    /// Set an inclusive end date for the recurrence
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(dates::format_iso(end_date));
        self
    }

    /// Schedule a price change, replacing any tier already set for that period
    pub fn add_price_tier(&mut self, period_number: u32, amount: f64) {
        self.price_tiers.retain(|t| t.period_number != period_number);
        self.price_tiers.push(PriceTier {
            period_number,
            amount,
        });
        self.price_tiers.sort_by_key(|t| t.period_number);
    }

    /// Find the tier effective exactly at the given period, if any
    pub fn tier_for(&self, period: u32) -> Option<&PriceTier> {
        self.price_tiers.iter().find(|t| t.period_number == period)
    }

    /// The origination date as a calendar date, if parseable
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        dates::parse(&self.date)
    }

    /// The next due date as a calendar date, if set and parseable
    pub fn parsed_next_billing(&self) -> Option<NaiveDate> {
        self.next_billing_date.as_deref().and_then(dates::parse)
    }

    /// The end date as a calendar date, if set and parseable
    pub fn parsed_end_date(&self) -> Option<NaiveDate> {
        self.end_date.as_deref().and_then(dates::parse)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:.2}", self.date, self.name, self.amount)
    }
}
