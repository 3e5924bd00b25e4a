//! [`SqliteStore`] — the SQLite implementation of [`EntityStore`] and
//! [`AssignmentStore`].

use std::path::Path;

use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior, ffi, params};
use uuid::Uuid;

use roster_core::{
  assignment::{Assignment, AssignmentUpdate, NewAssignment, Retention, TransferOutcome},
  entity::{Cafe, Employee, EmployeeId, NewCafe, Removal},
  store::{AssignmentStore, EntityStore},
};

use crate::{
  encode::{
    ASSIGNMENT_COLUMNS, RawAssignment, RawCafe, RawEmployee, encode_gender, encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A roster store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// are serialised on the connection's thread.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened roster store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Transaction helpers ─────────────────────────────────────────────────────

/// Why a write inside a transaction was refused. Carried out of the
/// connection closure and turned into an [`Error`] by the caller.
#[derive(Debug, Clone, Copy)]
enum Refusal {
  MissingEmployee,
  MissingCafe,
  ActiveExists,
  MultipleActive(usize),
}

impl Refusal {
  fn into_error(self, employee_id: &EmployeeId, cafe_id: Uuid) -> Error {
    match self {
      Self::MissingEmployee => Error::EmployeeNotFound(employee_id.clone()),
      Self::MissingCafe => Error::CafeNotFound(cafe_id),
      Self::ActiveExists => Error::ActiveAssignmentExists(employee_id.clone()),
      Self::MultipleActive(count) => {
        Error::MultipleActive { employee_id: employee_id.clone(), count }
      }
    }
  }
}

/// Café names collide when they match after Unicode lowercasing, so "Café"
/// and "CAFÉ" are the same name.
fn cafe_name_key(name: &str) -> String { name.trim().to_lowercase() }

fn is_constraint_violation(err: &rusqlite::Error, extended: i32) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _) if e.extended_code == extended
  )
}

fn employee_row_exists(conn: &Connection, employee_id: &str) -> rusqlite::Result<bool> {
  conn.query_row(
    "SELECT EXISTS (SELECT 1 FROM employees WHERE employee_id = ?1)",
    params![employee_id],
    |r| r.get(0),
  )
}

fn cafe_row_exists(conn: &Connection, cafe_id: &str) -> rusqlite::Result<bool> {
  conn.query_row(
    "SELECT EXISTS (SELECT 1 FROM cafes WHERE cafe_id = ?1)",
    params![cafe_id],
    |r| r.get(0),
  )
}

fn check_references(
  conn: &Connection,
  employee_id: &str,
  cafe_id: &str,
) -> rusqlite::Result<Option<Refusal>> {
  if !employee_row_exists(conn, employee_id)? {
    return Ok(Some(Refusal::MissingEmployee));
  }
  if !cafe_row_exists(conn, cafe_id)? {
    return Ok(Some(Refusal::MissingCafe));
  }
  Ok(None)
}

fn active_for_employee(
  conn: &Connection,
  employee_id: &str,
) -> rusqlite::Result<Vec<RawAssignment>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {ASSIGNMENT_COLUMNS} FROM assignments
     WHERE employee_id = ?1 AND is_active = 1"
  ))?;
  let rows = stmt
    .query_map(params![employee_id], RawAssignment::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn any_active(conn: &Connection, column: &str, id: &str) -> rusqlite::Result<bool> {
  conn.query_row(
    &format!(
      "SELECT EXISTS (SELECT 1 FROM assignments WHERE {column} = ?1 AND is_active = 1)"
    ),
    params![id],
    |r| r.get(0),
  )
}

/// Insert an active row, reporting a unique-index hit as a refusal.
fn insert_assignment(
  conn: &Connection,
  row: &RawAssignment,
) -> rusqlite::Result<Option<Refusal>> {
  let inserted = conn.execute(
    &format!("INSERT INTO assignments ({ASSIGNMENT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
    params![
      row.assignment_id,
      row.employee_id,
      row.cafe_id,
      row.assigned_date,
      row.is_active,
    ],
  );
  match inserted {
    Ok(_) => Ok(None),
    Err(e) if is_constraint_violation(&e, ffi::SQLITE_CONSTRAINT_UNIQUE) => {
      Ok(Some(Refusal::ActiveExists))
    }
    Err(e) => Err(e),
  }
}

/// Release a row according to `retention`. Returns whether a row changed.
fn release(
  conn: &Connection,
  assignment_id: &str,
  retention: Retention,
) -> rusqlite::Result<bool> {
  let changed = match retention {
    Retention::Delete => conn.execute(
      "DELETE FROM assignments WHERE assignment_id = ?1",
      params![assignment_id],
    )?,
    Retention::Archive => conn.execute(
      "UPDATE assignments SET is_active = 0
       WHERE assignment_id = ?1 AND is_active = 1",
      params![assignment_id],
    )?,
  };
  Ok(changed > 0)
}

/// What a transfer transaction did.
enum TransferTx {
  Unchanged(RawAssignment),
  Moved(RawAssignment),
  Assigned,
}

// ─── EntityStore impl ────────────────────────────────────────────────────────

impl EntityStore for SqliteStore {
  type Error = Error;

  async fn add_employee(&self, employee: Employee) -> Result<Employee> {
    let id_str     = employee.id.to_string();
    let name       = employee.name.clone();
    let email      = employee.email.clone();
    let phone      = employee.phone.clone();
    let gender_str = encode_gender(employee.gender).to_owned();

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let res = conn.execute(
          "INSERT INTO employees (employee_id, name, email, phone, gender)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          params![id_str, name, email, phone, gender_str],
        );
        match res {
          Ok(_) => Ok(true),
          Err(e)
            if is_constraint_violation(&e, ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
              || is_constraint_violation(&e, ffi::SQLITE_CONSTRAINT_UNIQUE) =>
          {
            Ok(false)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if !inserted {
      return Err(Error::Duplicate(format!(
        "employee {} or email {}",
        employee.id, employee.email
      )));
    }
    Ok(employee)
  }

  async fn add_cafe(&self, input: NewCafe) -> Result<Cafe> {
    let cafe = Cafe {
      id:          Uuid::new_v4(),
      name:        input.name,
      description: input.description,
      logo:        input.logo,
      location:    input.location,
    };

    let id_str      = encode_uuid(cafe.id);
    let name        = cafe.name.clone();
    let name_key    = cafe_name_key(&cafe.name);
    let description = cafe.description.clone();
    let logo        = cafe.logo.clone();
    let location    = cafe.location.clone();

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let res = conn.execute(
          "INSERT INTO cafes (cafe_id, name, name_key, description, logo, location)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          params![id_str, name, name_key, description, logo, location],
        );
        match res {
          Ok(_) => Ok(true),
          Err(e) if is_constraint_violation(&e, ffi::SQLITE_CONSTRAINT_UNIQUE) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if !inserted {
      return Err(Error::Duplicate(format!("cafe named {:?}", cafe.name)));
    }
    Ok(cafe)
  }

  async fn get_employee(&self, id: &EmployeeId) -> Result<Option<Employee>> {
    let id_str = id.to_string();

    let raw: Option<RawEmployee> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT employee_id, name, email, phone, gender
             FROM employees WHERE employee_id = ?1",
            params![id_str],
            RawEmployee::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawEmployee::into_employee).transpose()
  }

  async fn get_cafe(&self, id: Uuid) -> Result<Option<Cafe>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCafe> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT cafe_id, name, description, logo, location
             FROM cafes WHERE cafe_id = ?1",
            params![id_str],
            RawCafe::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCafe::into_cafe).transpose()
  }

  async fn employee_exists(&self, id: &EmployeeId) -> Result<bool> {
    let id_str = id.to_string();
    Ok(self.conn.call(move |conn| Ok(employee_row_exists(conn, &id_str)?)).await?)
  }

  async fn cafe_exists(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    Ok(self.conn.call(move |conn| Ok(cafe_row_exists(conn, &id_str)?)).await?)
  }

  async fn remove_employee_if_unassigned(&self, id: &EmployeeId) -> Result<Removal> {
    let id_str = id.to_string();

    let removal = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !employee_row_exists(&tx, &id_str)? {
          return Ok(Removal::NotFound);
        }
        if any_active(&tx, "employee_id", &id_str)? {
          return Ok(Removal::InUse);
        }
        tx.execute("DELETE FROM employees WHERE employee_id = ?1", params![id_str])?;
        tx.commit()?;
        Ok(Removal::Removed)
      })
      .await?;

    Ok(removal)
  }

  async fn remove_cafe_if_unused(&self, id: Uuid) -> Result<Removal> {
    let id_str = encode_uuid(id);

    let removal = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !cafe_row_exists(&tx, &id_str)? {
          return Ok(Removal::NotFound);
        }
        if any_active(&tx, "cafe_id", &id_str)? {
          return Ok(Removal::InUse);
        }
        tx.execute("DELETE FROM cafes WHERE cafe_id = ?1", params![id_str])?;
        tx.commit()?;
        Ok(Removal::Removed)
      })
      .await?;

    Ok(removal)
  }
}

// ─── AssignmentStore impl ────────────────────────────────────────────────────

impl AssignmentStore for SqliteStore {
  async fn create(&self, input: NewAssignment) -> Result<Assignment> {
    let assignment = Assignment {
      id:            Uuid::new_v4(),
      employee_id:   input.employee_id,
      cafe_id:       input.cafe_id,
      assigned_date: input.assigned_date,
      is_active:     true,
    };
    let row = RawAssignment::encode(&assignment);

    let refusal: Option<Refusal> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if let Some(refusal) = check_references(&tx, &row.employee_id, &row.cafe_id)? {
          return Ok(Some(refusal));
        }
        if any_active(&tx, "employee_id", &row.employee_id)? {
          return Ok(Some(Refusal::ActiveExists));
        }
        if let Some(refusal) = insert_assignment(&tx, &row)? {
          return Ok(Some(refusal));
        }
        tx.commit()?;
        Ok(None)
      })
      .await?;

    match refusal {
      Some(r) => Err(r.into_error(&assignment.employee_id, assignment.cafe_id)),
      None => Ok(assignment),
    }
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Assignment>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAssignment> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE assignment_id = ?1"),
            params![id_str],
            RawAssignment::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAssignment::into_assignment).transpose()
  }

  async fn find_active_by_employee(
    &self,
    employee_id: &EmployeeId,
  ) -> Result<Option<Assignment>> {
    let id_str = employee_id.to_string();

    let mut raws: Vec<RawAssignment> = self
      .conn
      .call(move |conn| Ok(active_for_employee(conn, &id_str)?))
      .await?;

    if raws.len() > 1 {
      return Err(Error::MultipleActive {
        employee_id: employee_id.clone(),
        count:       raws.len(),
      });
    }
    raws.pop().map(RawAssignment::into_assignment).transpose()
  }

  async fn find_by_cafe(&self, cafe_id: Uuid) -> Result<Vec<Assignment>> {
    let id_str = encode_uuid(cafe_id);

    let raws: Vec<RawAssignment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ASSIGNMENT_COLUMNS} FROM assignments
           WHERE cafe_id = ?1
           ORDER BY assigned_date, assignment_id"
        ))?;
        let rows = stmt
          .query_map(params![id_str], RawAssignment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssignment::into_assignment).collect()
  }

  async fn update(&self, id: Uuid, update: AssignmentUpdate) -> Result<Option<Assignment>> {
    let assignment = Assignment {
      id,
      employee_id:   update.employee_id,
      cafe_id:       update.cafe_id,
      assigned_date: update.assigned_date,
      is_active:     update.is_active,
    };
    let row = RawAssignment::encode(&assignment);

    let outcome: Result<bool, Refusal> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let found: bool = tx.query_row(
          "SELECT EXISTS (SELECT 1 FROM assignments WHERE assignment_id = ?1)",
          params![row.assignment_id],
          |r| r.get(0),
        )?;
        if !found {
          return Ok(Ok(false));
        }
        if let Some(refusal) = check_references(&tx, &row.employee_id, &row.cafe_id)? {
          return Ok(Err(refusal));
        }

        let res = tx.execute(
          "UPDATE assignments
           SET employee_id = ?2, cafe_id = ?3, assigned_date = ?4, is_active = ?5
           WHERE assignment_id = ?1",
          params![
            row.assignment_id,
            row.employee_id,
            row.cafe_id,
            row.assigned_date,
            row.is_active,
          ],
        );
        match res {
          Ok(_) => {}
          Err(e) if is_constraint_violation(&e, ffi::SQLITE_CONSTRAINT_UNIQUE) => {
            return Ok(Err(Refusal::ActiveExists));
          }
          Err(e) => return Err(e.into()),
        }
        tx.commit()?;
        Ok(Ok(true))
      })
      .await?;

    match outcome {
      Ok(true) => Ok(Some(assignment)),
      Ok(false) => Ok(None),
      Err(r) => Err(r.into_error(&assignment.employee_id, assignment.cafe_id)),
    }
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    Ok(
      self
        .conn
        .call(move |conn| Ok(release(conn, &id_str, Retention::Delete)?))
        .await?,
    )
  }

  async fn deactivate(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    Ok(
      self
        .conn
        .call(move |conn| Ok(release(conn, &id_str, Retention::Archive)?))
        .await?,
    )
  }

  async fn has_active_for_employee(&self, employee_id: &EmployeeId) -> Result<bool> {
    let id_str = employee_id.to_string();
    Ok(
      self
        .conn
        .call(move |conn| Ok(any_active(conn, "employee_id", &id_str)?))
        .await?,
    )
  }

  async fn has_active_for_cafe(&self, cafe_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(cafe_id);
    Ok(
      self
        .conn
        .call(move |conn| Ok(any_active(conn, "cafe_id", &id_str)?))
        .await?,
    )
  }

  async fn transfer(
    &self,
    input: NewAssignment,
    retention: Retention,
  ) -> Result<TransferOutcome> {
    let assignment = Assignment {
      id:            Uuid::new_v4(),
      employee_id:   input.employee_id,
      cafe_id:       input.cafe_id,
      assigned_date: input.assigned_date,
      is_active:     true,
    };
    let row = RawAssignment::encode(&assignment);

    let outcome: Result<TransferTx, Refusal> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if let Some(refusal) = check_references(&tx, &row.employee_id, &row.cafe_id)? {
          return Ok(Err(refusal));
        }

        let mut active = active_for_employee(&tx, &row.employee_id)?;
        if active.len() > 1 {
          return Ok(Err(Refusal::MultipleActive(active.len())));
        }

        let previous = active.pop();
        if let Some(current) = &previous {
          if current.cafe_id == row.cafe_id {
            return Ok(Ok(TransferTx::Unchanged(current.clone())));
          }
          release(&tx, &current.assignment_id, retention)?;
        }

        if let Some(refusal) = insert_assignment(&tx, &row)? {
          return Ok(Err(refusal));
        }
        tx.commit()?;

        Ok(Ok(match previous {
          Some(previous) => TransferTx::Moved(previous),
          None => TransferTx::Assigned,
        }))
      })
      .await?;

    match outcome {
      Ok(TransferTx::Unchanged(current)) => {
        Ok(TransferOutcome::Unchanged(current.into_assignment()?))
      }
      Ok(TransferTx::Moved(previous)) => Ok(TransferOutcome::Moved {
        previous: previous.into_assignment()?,
        current:  assignment,
      }),
      Ok(TransferTx::Assigned) => Ok(TransferOutcome::Assigned(assignment)),
      Err(r) => Err(r.into_error(&assignment.employee_id, assignment.cafe_id)),
    }
  }
}
