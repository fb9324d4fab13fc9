//! Subscription recurrence engine
//!
//! Advances recurring transactions through billing periods as real time
//! passes. Everything here is a pure function over its inputs: callers get
//! new transaction values back and decide what to persist; nothing is mutated
//! in place.
//!
//! A transaction moves between three states: waiting (due date today or
//! later), due (due date strictly in the past), and inactive (terminated by
//! its end date or by the user). Each evaluation applies at most one period
//! advance per transaction; catching up after a long gap takes repeated
//! evaluations, which keeps the step itself trivially auditable.

use chrono::{Days, Months, NaiveDate};

use crate::dates;
use crate::models::{Recurrence, Transaction};

/// Result of one evaluation pass over a transaction list
#[derive(Debug, Clone, PartialEq)]
pub struct Advanced {
    /// The full list, with advanced transactions replaced by new values
    pub transactions: Vec<Transaction>,
    /// True iff at least one transaction changed; callers should only
    /// rewrite storage when set, to avoid needless re-encryption
    pub has_changes: bool,
}

/// Add one recurrence interval to a date
///
/// Calendar-aware: one month after Jan 31 is Feb 28/29. Returns `None` for
/// one-time transactions or if the result would leave the supported range.
pub fn next_interval_date(date: NaiveDate, recurrence: Recurrence) -> Option<NaiveDate> {
    match recurrence {
        Recurrence::Once => None,
        Recurrence::Daily => date.checked_add_days(Days::new(1)),
        Recurrence::Monthly => date.checked_add_months(Months::new(1)),
        Recurrence::Yearly => date.checked_add_months(Months::new(12)),
    }
}

/// Apply the single-step transition to one transaction
///
/// Returns the replacement value if anything changed, `None` otherwise.
/// Ordering of the checks:
///
/// 1. One-time or already inactive: never changes.
/// 2. Past its inclusive end date: deactivated, regardless of due state.
///    Only explicit user action reactivates it.
/// 3. No parseable due date: treated as not yet due, never an error.
/// 4. Due date strictly before today: advance exactly one period. Same-day
///    is not due, so a charge landing today still shows as upcoming all day.
///
/// On an advance the period counter increments, a price tier scheduled for
/// exactly the new period replaces the amount (otherwise the amount carries
/// forward), and the new due date is one interval after the previous due
/// date, not after today. That keeps the billing anchor stable (always the
/// 5th of the month) even if the app sat unopened for several periods.
pub fn advance(txn: &Transaction, today: NaiveDate) -> Option<Transaction> {
    if !txn.recurrence.is_recurring() || !txn.is_active {
        return None;
    }

    if let Some(end) = txn.parsed_end_date() {
        if today > end {
            let mut ended = txn.clone();
            ended.is_active = false;
            return Some(ended);
        }
    }

    let due = txn.parsed_next_billing()?;
    if today <= due {
        return None;
    }

    let new_due = next_interval_date(due, txn.recurrence)?;
    let new_period = txn.current_period + 1;

    let mut advanced = txn.clone();
    advanced.current_period = new_period;
    if let Some(tier) = txn.tier_for(new_period) {
        advanced.amount = tier.amount;
    }
    advanced.next_billing_date = Some(dates::format_iso(new_due));
    Some(advanced)
}

/// Apply the single-step transition to every transaction in a list
pub fn process_all(transactions: &[Transaction], today: NaiveDate) -> Advanced {
    let mut has_changes = false;
    let transactions = transactions
        .iter()
        .map(|txn| match advance(txn, today) {
            Some(updated) => {
                has_changes = true;
                updated
            }
            None => txn.clone(),
        })
        .collect();

    Advanced {
        transactions,
        has_changes,
    }
}

/// Repeat [`process_all`] until no transaction is due anymore
///
/// Every step moves a due date at least one day forward, so this terminates.
pub fn process_to_current(transactions: &[Transaction], today: NaiveDate) -> Advanced {
    let mut current = process_all(transactions, today);
    let had_changes = current.has_changes;

    while current.has_changes {
        current = process_all(&current.transactions, today);
    }

    Advanced {
        transactions: current.transactions,
        has_changes: had_changes,
    }
}
