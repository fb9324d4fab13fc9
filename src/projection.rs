//! Upcoming-transaction projection
//!
//! Builds the read-only "upcoming" view: future one-time transactions plus
//! the next occurrence of each live subscription, sorted by date and
//! deduplicated. The output is derived display data; it is never written back
//! to storage.

use chrono::NaiveDate;

use crate::dates;
use crate::models::Transaction;

/// Derive the sorted list of upcoming transaction occurrences
///
/// For each active transaction:
/// - its own origination date, if strictly in the future, is included once
///   as-is (future one-time charges, and the first occurrence of a
///   subscription that has not started yet);
/// - a live subscription's next billing date, if strictly in the future, is
///   included as a copy with `date` overridden to that ISO date — unless the
///   subscription is already past its end date, its next billing would fall
///   beyond the end date, or the copy would land on the same calendar day as
///   the origination entry above (no double listing).
///
/// Inactive transactions never appear, regardless of their dates.
pub fn upcoming(transactions: &[Transaction], today: NaiveDate) -> Vec<Transaction> {
    let mut result = Vec::new();

    for txn in transactions {
        if !txn.is_active {
            continue;
        }

        let mut included_date = None;
        if let Some(origin) = txn.parsed_date() {
            if origin > today {
                result.push(txn.clone());
                included_date = Some(origin);
            }
        }

        if !txn.recurrence.is_recurring() {
            continue;
        }
        let Some(next) = txn.parsed_next_billing() else {
            continue;
        };

        if let Some(end) = txn.parsed_end_date() {
            if end < today || next > end {
                continue;
            }
        }

        if next > today && included_date != Some(next) {
            let mut occurrence = txn.clone();
            occurrence.date = dates::format_iso(next);
            result.push(occurrence);
        }
    }

    result.sort_by_key(|t| t.parsed_date());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Recurrence, TransactionType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 6, 15)
    }

    fn one_time(name: &str, on: &str) -> Transaction {
        Transaction::new(name, 10.0, TransactionType::Expense, on)
    }

    fn subscription(name: &str, origin: &str, next: NaiveDate) -> Transaction {
        Transaction::new(name, 10.0, TransactionType::Expense, origin)
            .with_recurrence(Recurrence::Monthly, next)
    }

    #[test]
    fn test_future_one_time_included_past_excluded() {
        let future = one_time("Concert", "Jul 1, 2025");
        let past = one_time("Groceries", "Jun 1, 2025");
        let same_day = one_time("Lunch", "Jun 15, 2025");

        let result = upcoming(&[future.clone(), past, same_day], today());
        assert_eq!(result, vec![future]);
    }

    #[test]
    fn test_subscription_next_occurrence_uses_billing_date() {
        let sub = subscription("Streaming", "Jan 5, 2025", date(2025, 7, 5));

        let result = upcoming(&[sub], today());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].date, "2025-07-05");
    }

    #[test]
    fn test_inactive_never_appears() {
        let mut sub = subscription("Cancelled", "Jul 1, 2025", date(2025, 7, 1));
        sub.is_active = false;

        assert!(upcoming(&[sub], today()).is_empty());
    }

    #[test]
    fn test_same_day_origin_and_billing_deduplicated() {
        // A subscription created today for the future: origination date and
        // next billing date parse to the identical calendar day
        let sub = subscription("New sub", "Jul 5, 2025", date(2025, 7, 5));

        let result = upcoming(&[sub], today());
        assert_eq!(result.len(), 1);
        // The origination entry is kept as-is, localized date intact
        assert_eq!(result[0].date, "Jul 5, 2025");
    }

    #[test]
    fn test_not_yet_started_subscription_lists_both_occurrences() {
        let sub = subscription("Starting soon", "Jul 1, 2025", date(2025, 8, 1));

        let result = upcoming(&[sub], today());
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].date, "Jul 1, 2025");
        assert_eq!(result[1].date, "2025-08-01");
    }

    #[test]
    fn test_end_date_excludes_billing_copy() {
        // End date already past
        let expired = subscription("Expired", "Jan 1, 2025", date(2025, 7, 1))
            .with_end_date(date(2025, 5, 1));
        // Next billing beyond the end date
        let last_period = subscription("Final month", "Jan 1, 2025", date(2025, 8, 1))
            .with_end_date(date(2025, 7, 15));
        // Still inside its end date
        let live = subscription("Live", "Jan 1, 2025", date(2025, 7, 1))
            .with_end_date(date(2026, 1, 1));

        let result = upcoming(&[expired, last_period, live], today());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Live");
    }

    #[test]
    fn test_sorted_ascending_across_formats() {
        let august = one_time("August", "Aug 1, 2025");
        let july_sub = subscription("July sub", "Jan 1, 2025", date(2025, 7, 1));
        let june = one_time("June", "20 Haz 2025");

        let result = upcoming(&[august, july_sub, june], today());
        let names: Vec<_> = result.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["June", "July sub", "August"]);
    }

    #[test]
    fn test_output_does_not_alter_input() {
        let sub = subscription("Streaming", "Jan 5, 2025", date(2025, 7, 5));
        let input = vec![sub.clone()];

        let _ = upcoming(&input, today());
        assert_eq!(input[0], sub);
    }

    #[test]
    fn test_missing_billing_date_only_origin_considered() {
        let mut sub = subscription("Odd", "Jul 1, 2025", date(2025, 8, 1));
        sub.next_billing_date = None;

        let result = upcoming(&[sub], today());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].date, "Jul 1, 2025");
    }
}
