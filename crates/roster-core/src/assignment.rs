//! Assignment records — the employee ↔ café relation over time.
//!
//! At most one assignment per employee is active at any observable instant.
//! Inactive rows are only ever produced by the soft-deactivation path or by
//! [`Retention::Archive`]; inactive duplicates for one employee are allowed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::EmployeeId;

// ─── Assignment ──────────────────────────────────────────────────────────────

/// A persisted assignment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
  pub id:            Uuid,
  pub employee_id:   EmployeeId,
  pub cafe_id:       Uuid,
  /// When the employee started at this café. Never in the future at creation.
  pub assigned_date: DateTime<Utc>,
  pub is_active:     bool,
}

/// Input to [`crate::store::AssignmentStore::create`]. The id is generated
/// and `is_active` set by the store.
#[derive(Debug, Clone)]
pub struct NewAssignment {
  pub employee_id:   EmployeeId,
  pub cafe_id:       Uuid,
  pub assigned_date: DateTime<Utc>,
}

/// Full-row replacement for [`crate::store::AssignmentStore::update`].
#[derive(Debug, Clone)]
pub struct AssignmentUpdate {
  pub employee_id:   EmployeeId,
  pub cafe_id:       Uuid,
  pub is_active:     bool,
  pub assigned_date: DateTime<Utc>,
}

impl AssignmentUpdate {
  /// Start from the current state of `row`.
  pub fn from_row(row: &Assignment) -> Self {
    Self {
      employee_id:   row.employee_id.clone(),
      cafe_id:       row.cafe_id,
      is_active:     row.is_active,
      assigned_date: row.assigned_date,
    }
  }
}

// ─── Retention ───────────────────────────────────────────────────────────────

/// What happens to an assignment row when the employee leaves the café.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Retention {
  /// Hard-delete the row; history is lost.
  #[default]
  Delete,
  /// Keep the row, flagged inactive.
  Archive,
}

// ─── Transfer outcome ────────────────────────────────────────────────────────

/// The three-way result of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransferOutcome {
  /// The employee already worked at the target café; nothing changed.
  Unchanged(Assignment),
  /// The previous assignment was released and a new one created.
  Moved {
    previous: Assignment,
    current:  Assignment,
  },
  /// The employee had no active assignment; a new one was created.
  Assigned(Assignment),
}

impl TransferOutcome {
  /// The employee's active assignment after the transfer.
  pub fn current(&self) -> &Assignment {
    match self {
      Self::Unchanged(a) | Self::Assigned(a) => a,
      Self::Moved { current, .. } => current,
    }
  }

  pub fn changed(&self) -> bool { !matches!(self, Self::Unchanged(_)) }
}

// ─── Read view ───────────────────────────────────────────────────────────────

/// An assignment paired with its tenure, computed at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentView {
  #[serde(flatten)]
  pub assignment:  Assignment,
  pub days_worked: i64,
  pub as_of:       DateTime<Utc>,
}
