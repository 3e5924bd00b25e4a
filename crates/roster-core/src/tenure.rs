//! Tenure: how many days an employee has worked at their current café.
//!
//! Only the current assignment row is consulted. Under [`Retention::Delete`]
//! no history exists, so tenure resets on every transfer.
//!
//! [`Retention::Delete`]: crate::assignment::Retention::Delete

use chrono::{DateTime, TimeDelta, Utc};

use crate::assignment::Assignment;

/// Days worked under `assignment` as of `now`.
///
/// Returns 0 for a missing or inactive assignment. Otherwise the elapsed
/// time is rounded *up* to whole days, so any partial day counts and an
/// assignment made today reports 1.
pub fn days_worked(assignment: Option<&Assignment>, now: DateTime<Utc>) -> i64 {
  let Some(assignment) = assignment.filter(|a| a.is_active) else {
    return 0;
  };

  let elapsed = now - assignment.assigned_date;
  let whole = elapsed.num_days();
  let partial = i64::from(elapsed > TimeDelta::days(whole));

  (whole + partial).max(1)
}

#[cfg(test)]
mod tests {
  use chrono::Duration;
  use uuid::Uuid;

  use super::*;
  use crate::entity::EmployeeId;

  fn assignment(assigned_date: DateTime<Utc>, is_active: bool) -> Assignment {
    Assignment {
      id: Uuid::new_v4(),
      employee_id: EmployeeId::parse("UI0000001").unwrap(),
      cafe_id: Uuid::new_v4(),
      assigned_date,
      is_active,
    }
  }

  #[test]
  fn thirty_days_exactly() {
    let now = Utc::now();
    let a = assignment(now - Duration::days(30), true);
    assert_eq!(days_worked(Some(&a), now), 30);
  }

  #[test]
  fn partial_day_rounds_up() {
    let now = Utc::now();
    let a = assignment(now - Duration::days(2) - Duration::minutes(1), true);
    assert_eq!(days_worked(Some(&a), now), 3);
  }

  #[test]
  fn sub_millisecond_remainder_rounds_up() {
    let now = Utc::now();
    let a = assignment(now - Duration::days(30) - Duration::microseconds(300), true);
    assert_eq!(days_worked(Some(&a), now), 31);
  }

  #[test]
  fn same_instant_counts_as_one_day() {
    let now = Utc::now();
    let a = assignment(now, true);
    assert_eq!(days_worked(Some(&a), now), 1);
  }

  #[test]
  fn inactive_or_missing_is_zero() {
    let now = Utc::now();
    let a = assignment(now - Duration::days(10), false);
    assert_eq!(days_worked(Some(&a), now), 0);
    assert_eq!(days_worked(None, now), 0);
  }
}
