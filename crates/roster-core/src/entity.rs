//! Employees and cafés — the two entities an assignment links.
//!
//! Neither is owned by the assignment subsystem; assignments reference them
//! by id only.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── EmployeeId ──────────────────────────────────────────────────────────────

/// Longest accepted employee id.
pub const EMPLOYEE_ID_MAX_LEN: usize = 32;

/// An opaque, short, immutable employee identifier.
///
/// Accepts 1 to [`EMPLOYEE_ID_MAX_LEN`] ASCII alphanumeric characters, `-`
/// or `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmployeeId(String);

impl EmployeeId {
  pub fn parse(raw: impl Into<String>) -> Result<Self> {
    let raw = raw.into();
    if raw.is_empty() || raw.len() > EMPLOYEE_ID_MAX_LEN {
      return Err(Error::Validation(format!(
        "employee id must be 1-{EMPLOYEE_ID_MAX_LEN} characters, got {}",
        raw.len()
      )));
    }
    if let Some(bad) = raw
      .chars()
      .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
      return Err(Error::Validation(format!(
        "employee id {raw:?} contains invalid character {bad:?}"
      )));
    }
    Ok(Self(raw))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for EmployeeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl FromStr for EmployeeId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl TryFrom<String> for EmployeeId {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { Self::parse(s) }
}

impl From<EmployeeId> for String {
  fn from(id: EmployeeId) -> Self { id.0 }
}

/// Parse a café (or assignment) UUID from text, mapping failure to a
/// validation error.
pub fn parse_uuid(raw: &str) -> Result<Uuid> {
  Uuid::parse_str(raw.trim())
    .map_err(|e| Error::Validation(format!("malformed identifier {raw:?}: {e}")))
}

// ─── Employee ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
}

/// An employee. The email address is unique across all employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
  pub id:     EmployeeId,
  pub name:   String,
  pub email:  String,
  pub phone:  String,
  pub gender: Gender,
}

// ─── Café ────────────────────────────────────────────────────────────────────

/// A café. Names are unique, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cafe {
  pub id:          Uuid,
  pub name:        String,
  pub description: String,
  /// Opaque reference to a stored logo; the file itself lives elsewhere.
  pub logo:        Option<String>,
  pub location:    String,
}

/// Input to [`crate::store::EntityStore::add_cafe`]. The id is generated by
/// the store.
#[derive(Debug, Clone)]
pub struct NewCafe {
  pub name:        String,
  pub description: String,
  pub logo:        Option<String>,
  pub location:    String,
}

impl NewCafe {
  pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
    Self {
      name:        name.into(),
      description: String::new(),
      logo:        None,
      location:    location.into(),
    }
  }
}

/// Result of a conditioned entity removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
  Removed,
  /// An active assignment references the entity; nothing was deleted.
  InUse,
  NotFound,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn employee_id_accepts_short_alphanumeric() {
    let id = EmployeeId::parse("UI1a2B3c4").unwrap();
    assert_eq!(id.as_str(), "UI1a2B3c4");
    assert!(EmployeeId::parse("emp_01-x").is_ok());
  }

  #[test]
  fn employee_id_rejects_malformed() {
    assert!(matches!(EmployeeId::parse(""), Err(Error::Validation(_))));
    assert!(matches!(EmployeeId::parse("has space"), Err(Error::Validation(_))));
    assert!(matches!(
      EmployeeId::parse("x".repeat(EMPLOYEE_ID_MAX_LEN + 1)),
      Err(Error::Validation(_))
    ));
  }

  #[test]
  fn parse_uuid_maps_to_validation() {
    assert!(matches!(parse_uuid("not-a-uuid"), Err(Error::Validation(_))));
    let id = Uuid::new_v4();
    assert_eq!(parse_uuid(&id.to_string()).unwrap(), id);
  }
}
