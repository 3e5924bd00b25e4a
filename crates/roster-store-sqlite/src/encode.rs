//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings, and
//! `is_active` a 0/1 integer.

use chrono::{DateTime, Utc};
use roster_core::{
  assignment::Assignment,
  entity::{Cafe, Employee, EmployeeId, Gender},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Gender ──────────────────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> &'static str {
  match g {
    Gender::Male => "male",
    Gender::Female => "female",
  }
}

pub fn decode_gender(s: &str) -> Result<Gender> {
  match s {
    "male" => Ok(Gender::Male),
    "female" => Ok(Gender::Female),
    other => Err(Error::Decode(format!("unknown gender: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawAssignment::from_row`].
pub const ASSIGNMENT_COLUMNS: &str =
  "assignment_id, employee_id, cafe_id, assigned_date, is_active";

/// An `assignments` row as stored.
#[derive(Debug, Clone)]
pub struct RawAssignment {
  pub assignment_id: String,
  pub employee_id:   String,
  pub cafe_id:       String,
  pub assigned_date: String,
  pub is_active:     bool,
}

impl RawAssignment {
  pub fn encode(a: &Assignment) -> Self {
    Self {
      assignment_id: encode_uuid(a.id),
      employee_id:   a.employee_id.to_string(),
      cafe_id:       encode_uuid(a.cafe_id),
      assigned_date: encode_dt(a.assigned_date),
      is_active:     a.is_active,
    }
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      assignment_id: row.get(0)?,
      employee_id:   row.get(1)?,
      cafe_id:       row.get(2)?,
      assigned_date: row.get(3)?,
      is_active:     row.get(4)?,
    })
  }

  pub fn into_assignment(self) -> Result<Assignment> {
    Ok(Assignment {
      id:            decode_uuid(&self.assignment_id)?,
      employee_id:   EmployeeId::parse(self.employee_id)?,
      cafe_id:       decode_uuid(&self.cafe_id)?,
      assigned_date: decode_dt(&self.assigned_date)?,
      is_active:     self.is_active,
    })
  }
}

/// An `employees` row as stored.
pub struct RawEmployee {
  pub employee_id: String,
  pub name:        String,
  pub email:       String,
  pub phone:       String,
  pub gender:      String,
}

impl RawEmployee {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      employee_id: row.get(0)?,
      name:        row.get(1)?,
      email:       row.get(2)?,
      phone:       row.get(3)?,
      gender:      row.get(4)?,
    })
  }

  pub fn into_employee(self) -> Result<Employee> {
    Ok(Employee {
      id:     EmployeeId::parse(self.employee_id)?,
      name:   self.name,
      email:  self.email,
      phone:  self.phone,
      gender: decode_gender(&self.gender)?,
    })
  }
}

/// A `cafes` row as stored.
pub struct RawCafe {
  pub cafe_id:     String,
  pub name:        String,
  pub description: String,
  pub logo:        Option<String>,
  pub location:    String,
}

impl RawCafe {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      cafe_id:     row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
      logo:        row.get(3)?,
      location:    row.get(4)?,
    })
  }

  pub fn into_cafe(self) -> Result<Cafe> {
    Ok(Cafe {
      id:          decode_uuid(&self.cafe_id)?,
      name:        self.name,
      description: self.description,
      logo:        self.logo,
      location:    self.location,
    })
  }
}
