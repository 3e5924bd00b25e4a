//! Error types for `roster-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::entity::EmployeeId;

/// The kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
  Employee,
  Cafe,
}

impl std::fmt::Display for EntityKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Employee => f.write_str("employee"),
      Self::Cafe => f.write_str("cafe"),
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// An operation referenced an employee or café that does not exist.
  #[error("{entity} not found: {id}")]
  Reference { entity: EntityKind, id: String },

  /// Malformed identifier or an assigned date in the future.
  #[error("validation error: {0}")]
  Validation(String),

  /// The employee already has an active assignment; safe to retry after
  /// re-reading the current assignment.
  #[error("employee {0} already has an active assignment")]
  Conflict(EmployeeId),

  /// A unique entity attribute (id, email, café name) is already taken.
  #[error("already exists: {0}")]
  Duplicate(String),

  /// The entity is referenced by an active assignment and may not be removed.
  #[error("{entity} {id} is in use by an active assignment")]
  InUse { entity: EntityKind, id: String },

  #[error("assignment not found: {0}")]
  NotFound(Uuid),

  /// Storage returned a state that breaks an invariant. Never resolved
  /// silently.
  #[error("consistency violation: {0}")]
  Consistency(String),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn missing_employee(id: &EmployeeId) -> Self {
    Self::Reference { entity: EntityKind::Employee, id: id.to_string() }
  }

  pub fn missing_cafe(id: Uuid) -> Self {
    Self::Reference { entity: EntityKind::Cafe, id: id.to_string() }
  }

  /// Whether re-running the operation may succeed without caller changes.
  pub fn is_retryable(&self) -> bool { matches!(self, Self::Conflict(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
