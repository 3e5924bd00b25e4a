//! [`AssignmentService`] — the only write path to assignment state.
//!
//! Each employee is either unassigned or assigned to exactly one café since a
//! given date. `assign`, `unassign`, `transfer` and `update` move between
//! those states; the backend's atomicity guarantees (see [`crate::store`])
//! keep at most one active assignment per employee under concurrent calls.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  assignment::{
    Assignment, AssignmentUpdate, AssignmentView, NewAssignment, Retention, TransferOutcome,
  },
  clock::{Clock, SystemClock},
  entity::{Cafe, Employee, EmployeeId, NewCafe},
  guard::DeletionGuard,
  store::{AssignmentStore, EntityStore},
  tenure, Error, Result,
};

pub struct AssignmentService<S, C = SystemClock> {
  store:     Arc<S>,
  clock:     C,
  retention: Retention,
}

impl<S> AssignmentService<S, SystemClock> {
  /// A service using wall-clock time and [`Retention::Delete`].
  pub fn with_system_clock(store: Arc<S>) -> Self {
    Self { store, clock: SystemClock, retention: Retention::default() }
  }
}

impl<S, C> AssignmentService<S, C> {
  pub fn new(store: Arc<S>, clock: C) -> Self {
    Self { store, clock, retention: Retention::default() }
  }

  /// Set what happens to a row when its employee leaves the café.
  pub fn with_retention(mut self, retention: Retention) -> Self {
    self.retention = retention;
    self
  }

  pub fn retention(&self) -> Retention { self.retention }
}

impl<S, C> AssignmentService<S, C>
where
  S: AssignmentStore,
  C: Clock,
  Error: From<S::Error>,
{
  pub fn now(&self) -> DateTime<Utc> { self.clock.now() }

  /// A deletion guard over the same store.
  pub fn guard(&self) -> DeletionGuard<S> { DeletionGuard::new(Arc::clone(&self.store)) }

  fn ensure_not_future(&self, assigned_date: DateTime<Utc>) -> Result<()> {
    let now = self.clock.now();
    if assigned_date > now {
      return Err(Error::Validation(format!(
        "assigned date {assigned_date} is in the future (now {now})"
      )));
    }
    Ok(())
  }

  // ── Entity registration ─────────────────────────────────────────────────

  /// Register an employee. Fails with [`Error::Duplicate`] if the id or
  /// email is taken.
  pub async fn register_employee(&self, employee: Employee) -> Result<Employee> {
    let employee = self.store.add_employee(employee).await?;
    tracing::info!(employee_id = %employee.id, "employee registered");
    Ok(employee)
  }

  /// Register a café. Names are unique regardless of case.
  pub async fn register_cafe(&self, cafe: NewCafe) -> Result<Cafe> {
    let cafe = self.store.add_cafe(cafe).await?;
    tracing::info!(cafe_id = %cafe.id, name = %cafe.name, "cafe registered");
    Ok(cafe)
  }

  // ── Writes ──────────────────────────────────────────────────────────────

  /// Assign an unassigned employee to a café.
  ///
  /// Fails with [`Error::Reference`] if either entity is missing,
  /// [`Error::Validation`] if the date is in the future, and
  /// [`Error::Conflict`] if the employee is already assigned somewhere.
  pub async fn assign(
    &self,
    employee_id: &EmployeeId,
    cafe_id: Uuid,
    assigned_date: DateTime<Utc>,
  ) -> Result<Assignment> {
    self.ensure_not_future(assigned_date)?;

    let input = NewAssignment { employee_id: employee_id.clone(), cafe_id, assigned_date };
    let assignment = self.store.create(input).await.map_err(|e| {
      let err = Error::from(e);
      if err.is_retryable() {
        tracing::warn!(%employee_id, %cafe_id, "assign conflicted with an active assignment");
      }
      err
    })?;

    tracing::info!(
      %employee_id,
      %cafe_id,
      assignment_id = %assignment.id,
      "employee assigned"
    );
    Ok(assignment)
  }

  /// Release an assignment. Returns `false` if it was already gone, which
  /// callers treat as "already unassigned".
  pub async fn unassign(&self, assignment_id: Uuid) -> Result<bool> {
    let released = match self.retention {
      Retention::Delete => self.store.delete(assignment_id).await?,
      Retention::Archive => self.store.deactivate(assignment_id).await?,
    };

    if released {
      tracing::info!(%assignment_id, retention = ?self.retention, "assignment released");
    } else {
      tracing::debug!(%assignment_id, "unassign of missing assignment; nothing to do");
    }
    Ok(released)
  }

  /// Move an employee to `new_cafe_id`, atomically.
  ///
  /// No-op if the employee already works there; otherwise the current
  /// assignment (if any) is released and a new one created, resetting
  /// tenure to `assigned_date`.
  pub async fn transfer(
    &self,
    employee_id: &EmployeeId,
    new_cafe_id: Uuid,
    assigned_date: DateTime<Utc>,
  ) -> Result<TransferOutcome> {
    self.ensure_not_future(assigned_date)?;

    let input = NewAssignment {
      employee_id: employee_id.clone(),
      cafe_id: new_cafe_id,
      assigned_date,
    };
    let outcome = self.store.transfer(input, self.retention).await.map_err(|e| {
      let err = Error::from(e);
      if err.is_retryable() {
        tracing::warn!(%employee_id, %new_cafe_id, "transfer raced with another write");
      } else if matches!(err, Error::Consistency(_)) {
        tracing::error!(%employee_id, error = %err, "multiple active assignments observed");
      }
      err
    })?;

    match &outcome {
      TransferOutcome::Unchanged(current) => {
        tracing::debug!(%employee_id, cafe_id = %current.cafe_id, "transfer to current cafe; unchanged");
      }
      TransferOutcome::Moved { previous, current } => {
        tracing::info!(
          %employee_id,
          from = %previous.cafe_id,
          to = %current.cafe_id,
          "employee transferred"
        );
      }
      TransferOutcome::Assigned(current) => {
        tracing::info!(%employee_id, cafe_id = %current.cafe_id, "employee assigned by transfer");
      }
    }
    Ok(outcome)
  }

  /// The generic full-row replace, used for soft deactivation.
  ///
  /// Fails with [`Error::NotFound`] for an unknown id. Reactivating a row
  /// while the employee has another active one is a [`Error::Conflict`].
  pub async fn update(&self, assignment_id: Uuid, update: AssignmentUpdate) -> Result<Assignment> {
    self.ensure_not_future(update.assigned_date)?;

    let updated = self
      .store
      .update(assignment_id, update)
      .await?
      .ok_or(Error::NotFound(assignment_id))?;

    tracing::info!(
      %assignment_id,
      employee_id = %updated.employee_id,
      cafe_id = %updated.cafe_id,
      is_active = updated.is_active,
      "assignment updated"
    );
    Ok(updated)
  }

  // ── Reads ───────────────────────────────────────────────────────────────

  pub async fn get_assignment(&self, assignment_id: Uuid) -> Result<Assignment> {
    self
      .store
      .find_by_id(assignment_id)
      .await?
      .ok_or(Error::NotFound(assignment_id))
  }

  pub async fn get_current_assignment(&self, employee_id: &EmployeeId) -> Result<Option<Assignment>> {
    let current = self.store.find_active_by_employee(employee_id).await.map_err(|e| {
      let err = Error::from(e);
      if matches!(err, Error::Consistency(_)) {
        tracing::error!(%employee_id, error = %err, "multiple active assignments observed");
      }
      err
    })?;
    tracing::debug!(%employee_id, assigned = current.is_some(), "fetched current assignment");
    Ok(current)
  }

  /// All assignments, active and inactive, referencing the café.
  pub async fn get_assignments_by_cafe(&self, cafe_id: Uuid) -> Result<Vec<Assignment>> {
    Ok(self.store.find_by_cafe(cafe_id).await?)
  }

  /// True iff the employee's active assignment is at `cafe_id`.
  pub async fn is_assigned(&self, employee_id: &EmployeeId, cafe_id: Uuid) -> Result<bool> {
    Ok(
      self
        .get_current_assignment(employee_id)
        .await?
        .is_some_and(|a| a.cafe_id == cafe_id),
    )
  }

  /// The employee's current assignment with its tenure.
  pub async fn current_tenure(&self, employee_id: &EmployeeId) -> Result<Option<AssignmentView>> {
    let now = self.clock.now();
    Ok(
      self
        .get_current_assignment(employee_id)
        .await?
        .map(|assignment| view(assignment, now)),
    )
  }

  /// Active assignments at the café, longest-serving first.
  pub async fn cafe_roster(&self, cafe_id: Uuid) -> Result<Vec<AssignmentView>> {
    let now = self.clock.now();
    let mut roster: Vec<AssignmentView> = self
      .store
      .find_by_cafe(cafe_id)
      .await?
      .into_iter()
      .filter(|a| a.is_active)
      .map(|a| view(a, now))
      .collect();

    roster.sort_by(|a, b| {
      b.days_worked
        .cmp(&a.days_worked)
        .then_with(|| a.assignment.employee_id.cmp(&b.assignment.employee_id))
    });
    Ok(roster)
  }

  pub async fn can_delete_employee(&self, employee_id: &EmployeeId) -> Result<bool> {
    self.guard().can_delete_employee(employee_id).await
  }

  pub async fn can_delete_cafe(&self, cafe_id: Uuid) -> Result<bool> {
    self.guard().can_delete_cafe(cafe_id).await
  }
}

fn view(assignment: Assignment, as_of: DateTime<Utc>) -> AssignmentView {
  let days_worked = tenure::days_worked(Some(&assignment), as_of);
  AssignmentView { assignment, days_worked, as_of }
}
