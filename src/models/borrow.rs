//! Borrow (loan) model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::book::BookShort;
use super::user::UserShort;

/// Borrow model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrow {
    pub id: i32,
    pub user_id: i32,
    pub borrow_status_id: i16,
    pub created_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Borrow status reference row (joined for display)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowStatusShort {
    pub id: i16,
    pub name: String,
}

/// Borrow with eager-loaded relations for display.
///
/// Which relations are populated depends on the endpoint: the staff listing
/// carries user, books and status; the member listing carries books only;
/// the detail view carries books and status. `penalty_fee` is transient and
/// never persisted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BorrowDetails {
    pub id: i32,
    pub user_id: i32,
    pub borrow_status_id: i16,
    pub created_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserShort>,
    pub books: Vec<BookShort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BorrowStatusShort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty_fee: Option<Decimal>,
}

/// Create borrow request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBorrowRequest {
    /// Borrowing user ID
    pub user_id: i32,
    /// Books covered by this borrow, at least one
    #[validate(length(min = 1, message = "At least one book is required"))]
    pub book_ids: Vec<i32>,
    /// Due date; defaults to now + configured loan duration
    pub due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Update borrow request.
///
/// Narrow administrative override: only these fields are applied, and no
/// availability or status-transition checks are performed.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBorrowRequest {
    pub due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    #[validate(range(min = 1, max = 2, message = "Unknown borrow status"))]
    pub borrow_status_id: Option<i16>,
}

/// Borrow listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BorrowFilter {
    pub user_id: Option<i32>,
    pub status_id: Option<i16>,
    #[serde(rename = "startDate")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(rename = "endDate")]
    pub end_date: Option<DateTime<Utc>>,
}

impl BorrowFilter {
    /// Resolve the creation-date constraint.
    ///
    /// Both bounds given: inclusive range between them as-is. Only a start
    /// bound: that whole calendar day (00:00:00 through 23:59:59), whatever
    /// time-of-day the bound carried. No start bound: no constraint.
    pub fn created_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            (Some(start), None) => {
                let day = start.date_naive();
                let from = day.and_hms_opt(0, 0, 0)?.and_utc();
                let to = day.and_hms_opt(23, 59, 59)?.and_utc();
                Some((from, to))
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Penalty calculation
// ---------------------------------------------------------------------------

/// Compute the late fee owed for a borrow: ceil(days late) x daily rate.
///
/// Lateness is measured from the due date to the returned date when set,
/// otherwise to `now`. Pure and idempotent; callable for any status, and
/// yields zero for on-time or not-yet-due borrows.
pub fn penalty_fee(
    due_date: DateTime<Utc>,
    returned_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    daily_penalty: Decimal,
) -> Decimal {
    let reference = returned_date.unwrap_or(now);
    let late = reference - due_date;
    let late_secs = late.num_seconds();
    if late_secs <= 0 {
        return Decimal::ZERO;
    }
    // Any started day counts as a full late day
    let days = (late_secs + 86_399) / 86_400;
    Decimal::from(days) * daily_penalty
}

impl Borrow {
    /// Transient late fee for this borrow, never persisted here
    pub fn penalty_fee(&self, now: DateTime<Utc>, daily_penalty: Decimal) -> Decimal {
        penalty_fee(self.due_date, self.returned_date, now, daily_penalty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn fee_is_zero_before_due_date() {
        let due = at(2026, 3, 10, 12, 0, 0);
        let now = at(2026, 3, 8, 12, 0, 0);
        assert_eq!(penalty_fee(due, None, now, dec!(0.50)), Decimal::ZERO);
    }

    #[test]
    fn fee_is_zero_at_exact_due_date() {
        let due = at(2026, 3, 10, 12, 0, 0);
        assert_eq!(penalty_fee(due, None, due, dec!(0.50)), Decimal::ZERO);
    }

    #[test]
    fn partial_late_day_counts_as_one() {
        let due = at(2026, 3, 10, 12, 0, 0);
        let now = due + Duration::hours(3);
        assert_eq!(penalty_fee(due, None, now, dec!(0.50)), dec!(0.50));
    }

    #[test]
    fn fee_grows_per_started_day() {
        let due = at(2026, 3, 10, 12, 0, 0);
        let now = due + Duration::days(2) + Duration::minutes(1);
        assert_eq!(penalty_fee(due, None, now, dec!(0.50)), dec!(1.50));
    }

    #[test]
    fn returned_date_takes_precedence_over_now() {
        let due = at(2026, 3, 10, 12, 0, 0);
        let returned = due + Duration::days(1);
        // "now" is far past; the fee is frozen at the return moment
        let now = due + Duration::days(30);
        assert_eq!(
            penalty_fee(due, Some(returned), now, dec!(0.50)),
            dec!(0.50)
        );
    }

    #[test]
    fn returned_on_time_yields_zero_forever() {
        let due = at(2026, 3, 10, 12, 0, 0);
        let returned = due - Duration::days(1);
        let now = due + Duration::days(30);
        assert_eq!(
            penalty_fee(due, Some(returned), now, dec!(0.50)),
            Decimal::ZERO
        );
    }

    #[test]
    fn fee_is_idempotent() {
        let due = at(2026, 3, 10, 12, 0, 0);
        let now = due + Duration::days(5);
        let a = penalty_fee(due, None, now, dec!(0.25));
        let b = penalty_fee(due, None, now, dec!(0.25));
        assert_eq!(a, b);
    }

    #[test]
    fn both_bounds_pass_through_unchanged() {
        let filter = BorrowFilter {
            start_date: Some(at(2026, 1, 5, 8, 30, 0)),
            end_date: Some(at(2026, 1, 9, 17, 0, 0)),
            ..Default::default()
        };
        let (from, to) = filter.created_range().unwrap();
        assert_eq!(from, at(2026, 1, 5, 8, 30, 0));
        assert_eq!(to, at(2026, 1, 9, 17, 0, 0));
    }

    #[test]
    fn single_start_date_expands_to_whole_day() {
        let filter = BorrowFilter {
            start_date: Some(at(2026, 1, 5, 14, 45, 12)),
            ..Default::default()
        };
        let (from, to) = filter.created_range().unwrap();
        assert_eq!(from, at(2026, 1, 5, 0, 0, 0));
        assert_eq!(to, at(2026, 1, 5, 23, 59, 59));
    }

    #[test]
    fn end_date_alone_is_ignored() {
        let filter = BorrowFilter {
            end_date: Some(at(2026, 1, 9, 0, 0, 0)),
            ..Default::default()
        };
        assert!(filter.created_range().is_none());
    }
}
