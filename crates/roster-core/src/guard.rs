//! [`DeletionGuard`] — decides whether an employee or café may be removed.
//!
//! An entity referenced by an active assignment is "in use". Deletion flows
//! must go through [`DeletionGuard::delete_employee`] /
//! [`DeletionGuard::delete_cafe`], which condition the delete on the same
//! predicate atomically; the `can_delete_*` checks are advisory reads.
//! Cascading foreign keys in the backend only ever clean up inactive rows.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  entity::{EmployeeId, Removal},
  error::EntityKind,
  store::AssignmentStore,
  Error, Result,
};

pub struct DeletionGuard<S> {
  store: Arc<S>,
}

impl<S> Clone for DeletionGuard<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S> DeletionGuard<S>
where
  S: AssignmentStore,
  Error: From<S::Error>,
{
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// True iff no active assignment references the employee.
  pub async fn can_delete_employee(&self, employee_id: &EmployeeId) -> Result<bool> {
    let in_use = self.store.has_active_for_employee(employee_id).await?;
    tracing::debug!(%employee_id, in_use, "checked employee deletion");
    Ok(!in_use)
  }

  /// True iff no active assignment references the café.
  pub async fn can_delete_cafe(&self, cafe_id: Uuid) -> Result<bool> {
    let in_use = self.store.has_active_for_cafe(cafe_id).await?;
    tracing::debug!(%cafe_id, in_use, "checked cafe deletion");
    Ok(!in_use)
  }

  /// Remove the employee, refusing with [`Error::InUse`] while an active
  /// assignment references it.
  pub async fn delete_employee(&self, employee_id: &EmployeeId) -> Result<()> {
    match self.store.remove_employee_if_unassigned(employee_id).await? {
      Removal::Removed => {
        tracing::info!(%employee_id, "employee removed");
        Ok(())
      }
      Removal::InUse => {
        tracing::warn!(%employee_id, "refused to remove employee with active assignment");
        Err(Error::InUse {
          entity: EntityKind::Employee,
          id:     employee_id.to_string(),
        })
      }
      Removal::NotFound => Err(Error::missing_employee(employee_id)),
    }
  }

  /// Remove the café, refusing with [`Error::InUse`] while an active
  /// assignment references it.
  pub async fn delete_cafe(&self, cafe_id: Uuid) -> Result<()> {
    match self.store.remove_cafe_if_unused(cafe_id).await? {
      Removal::Removed => {
        tracing::info!(%cafe_id, "cafe removed");
        Ok(())
      }
      Removal::InUse => {
        tracing::warn!(%cafe_id, "refused to remove cafe with active assignment");
        Err(Error::InUse { entity: EntityKind::Cafe, id: cafe_id.to_string() })
      }
      Removal::NotFound => Err(Error::missing_cafe(cafe_id)),
    }
  }
}
