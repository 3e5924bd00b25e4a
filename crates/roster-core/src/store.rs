//! The `EntityStore` and `AssignmentStore` traits.
//!
//! Implemented by storage backends (e.g. `roster-store-sqlite`). The service
//! and guard in this crate depend on these abstractions, not on any concrete
//! backend.
//!
//! Every multi-step method here (`create`, `update`, `transfer`, the
//! conditioned removals) must execute atomically in the backend: either in a
//! single transaction or behind a constraint equivalent to "one active row
//! per employee".

use std::future::Future;

use uuid::Uuid;

use crate::{
  assignment::{Assignment, AssignmentUpdate, NewAssignment, Retention, TransferOutcome},
  entity::{Cafe, Employee, EmployeeId, NewCafe, Removal},
};

// ─── Entities ────────────────────────────────────────────────────────────────

/// Storage for employees and cafés.
///
/// The assignment subsystem only reads through this trait. Registration and
/// the conditioned removals exist for the (external) entity management flows.
pub trait EntityStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new employee. Fails if the id or email is already taken.
  fn add_employee(
    &self,
    employee: Employee,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + '_;

  /// Persist a new café with a generated UUID. Fails if the name is already
  /// taken (case-insensitively).
  fn add_cafe(
    &self,
    cafe: NewCafe,
  ) -> impl Future<Output = Result<Cafe, Self::Error>> + Send + '_;

  fn get_employee<'a>(
    &'a self,
    id: &'a EmployeeId,
  ) -> impl Future<Output = Result<Option<Employee>, Self::Error>> + Send + 'a;

  fn get_cafe(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Cafe>, Self::Error>> + Send + '_;

  fn employee_exists<'a>(
    &'a self,
    id: &'a EmployeeId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn cafe_exists(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete the employee unless an active assignment references it. The
  /// check and the delete are one atomic step.
  fn remove_employee_if_unassigned<'a>(
    &'a self,
    id: &'a EmployeeId,
  ) -> impl Future<Output = Result<Removal, Self::Error>> + Send + 'a;

  /// Delete the café unless an active assignment references it. The check
  /// and the delete are one atomic step.
  fn remove_cafe_if_unused(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Removal, Self::Error>> + Send + '_;
}

// ─── Assignments ─────────────────────────────────────────────────────────────

/// Durable storage for assignment rows.
///
/// A subtrait of [`EntityStore`] so that reference checks can run in the
/// same transaction as the write they guard.
pub trait AssignmentStore: EntityStore {
  /// Create an active assignment.
  ///
  /// Fails if the employee or café does not exist, or if the employee
  /// already has an active assignment. Any other "current" semantics are the
  /// caller's concern.
  fn create(
    &self,
    input: NewAssignment,
  ) -> impl Future<Output = Result<Assignment, Self::Error>> + Send + '_;

  fn find_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + '_;

  /// The employee's single active assignment, if any.
  ///
  /// Observing more than one active row is a fatal consistency error and
  /// must be reported as such, never resolved by picking one.
  fn find_active_by_employee<'a>(
    &'a self,
    employee_id: &'a EmployeeId,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + 'a;

  /// All rows, active and inactive, referencing the café.
  fn find_by_cafe(
    &self,
    cafe_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  /// Full-row replace. Returns `None` if the row does not exist.
  fn update(
    &self,
    id: Uuid,
    update: AssignmentUpdate,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + '_;

  /// Hard-remove the row. Returns `false` if it did not exist.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Flip an active row to inactive, keeping it. Returns `false` if the row
  /// does not exist or is already inactive.
  fn deactivate(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn has_active_for_employee<'a>(
    &'a self,
    employee_id: &'a EmployeeId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn has_active_for_cafe(
    &self,
    cafe_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Move the employee to `input.cafe_id` as one atomic step.
  ///
  /// Reads the current active row; if it already targets the café nothing
  /// changes. Otherwise the current row (if any) is released according to
  /// `retention` and a new active row is created.
  fn transfer(
    &self,
    input: NewAssignment,
    retention: Retention,
  ) -> impl Future<Output = Result<TransferOutcome, Self::Error>> + Send + '_;
}
