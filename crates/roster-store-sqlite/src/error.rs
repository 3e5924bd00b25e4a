//! Error type for `roster-store-sqlite`.

use roster_core::{entity::EmployeeId, error::EntityKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] roster_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unexpected column value: {0}")]
  Decode(String),

  #[error("employee not found: {0}")]
  EmployeeNotFound(EmployeeId),

  #[error("cafe not found: {0}")]
  CafeNotFound(uuid::Uuid),

  /// The one-active-assignment-per-employee rule would be broken.
  #[error("employee {0} already has an active assignment")]
  ActiveAssignmentExists(EmployeeId),

  /// More than one active row was read back for one employee.
  #[error("employee {employee_id} has {count} active assignments")]
  MultipleActive { employee_id: EmployeeId, count: usize },

  #[error("already exists: {0}")]
  Duplicate(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for roster_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(e) => e,
      Error::EmployeeNotFound(id) => {
        Self::Reference { entity: EntityKind::Employee, id: id.to_string() }
      }
      Error::CafeNotFound(id) => {
        Self::Reference { entity: EntityKind::Cafe, id: id.to_string() }
      }
      Error::ActiveAssignmentExists(id) => Self::Conflict(id),
      e @ Error::MultipleActive { .. } => Self::Consistency(e.to_string()),
      Error::Duplicate(what) => Self::Duplicate(what),
      e => Self::Storage(Box::new(e)),
    }
  }
}
