//! Dispatch of parsed commands onto the assignment service.
//!
//! Every command produces a JSON value, printed by `main`.

use chrono::{DateTime, Utc};
use roster_core::{
  Error as CoreError,
  assignment::AssignmentUpdate,
  entity::{Employee, EmployeeId, NewCafe, parse_uuid},
  service::AssignmentService,
};
use roster_store_sqlite::SqliteStore;
use serde_json::{Value, json};

use crate::cli::{CafeCommand, Command, EmployeeCommand, Target};

pub type Service = AssignmentService<SqliteStore>;

/// Parse an RFC 3339 date, defaulting to the service clock's now.
fn parse_date(raw: Option<&str>, service: &Service) -> Result<DateTime<Utc>, CoreError> {
  match raw {
    None => Ok(service.now()),
    Some(raw) => DateTime::parse_from_rfc3339(raw)
      .map(|dt| dt.with_timezone(&Utc))
      .map_err(|e| CoreError::Validation(format!("invalid date {raw:?}: {e}"))),
  }
}

pub async fn run(command: Command, service: &Service) -> anyhow::Result<Value> {
  let value = match command {
    Command::Employee(EmployeeCommand::Add { id, name, email, phone, gender }) => {
      let employee = Employee {
        id: EmployeeId::parse(id)?,
        name,
        email,
        phone,
        gender: gender.into(),
      };
      serde_json::to_value(service.register_employee(employee).await?)?
    }

    Command::Employee(EmployeeCommand::Remove { id }) => {
      let id = EmployeeId::parse(id)?;
      service.guard().delete_employee(&id).await?;
      json!({ "removed": id })
    }

    Command::Cafe(CafeCommand::Add { name, location, description, logo }) => {
      let input = NewCafe { name, description, logo, location };
      serde_json::to_value(service.register_cafe(input).await?)?
    }

    Command::Cafe(CafeCommand::Remove { id }) => {
      let id = parse_uuid(&id)?;
      service.guard().delete_cafe(id).await?;
      json!({ "removed": id })
    }

    Command::Assign { employee, cafe, date } => {
      let employee = EmployeeId::parse(employee)?;
      let cafe = parse_uuid(&cafe)?;
      let date = parse_date(date.as_deref(), service)?;
      serde_json::to_value(service.assign(&employee, cafe, date).await?)?
    }

    Command::Unassign { assignment } => {
      let id = parse_uuid(&assignment)?;
      let unassigned = service.unassign(id).await?;
      json!({ "assignment_id": id, "unassigned": unassigned })
    }

    Command::Transfer { employee, cafe, date } => {
      let employee = EmployeeId::parse(employee)?;
      let cafe = parse_uuid(&cafe)?;
      let date = parse_date(date.as_deref(), service)?;
      serde_json::to_value(service.transfer(&employee, cafe, date).await?)?
    }

    Command::Current { employee } => {
      let employee = EmployeeId::parse(employee)?;
      serde_json::to_value(service.current_tenure(&employee).await?)?
    }

    Command::Roster { cafe, all } => {
      let cafe = parse_uuid(&cafe)?;
      if all {
        serde_json::to_value(service.get_assignments_by_cafe(cafe).await?)?
      } else {
        serde_json::to_value(service.cafe_roster(cafe).await?)?
      }
    }

    Command::Update { assignment, cafe, date, inactive, active } => {
      let id = parse_uuid(&assignment)?;
      let row = service.get_assignment(id).await?;

      let mut update = AssignmentUpdate::from_row(&row);
      if let Some(cafe) = cafe {
        update.cafe_id = parse_uuid(&cafe)?;
      }
      if date.is_some() {
        update.assigned_date = parse_date(date.as_deref(), service)?;
      }
      if inactive {
        update.is_active = false;
      } else if active {
        update.is_active = true;
      }
      serde_json::to_value(service.update(id, update).await?)?
    }

    Command::CanDelete(Target::Employee { id }) => {
      let id = EmployeeId::parse(id)?;
      let can_delete = service.can_delete_employee(&id).await?;
      json!({ "employee_id": id, "can_delete": can_delete })
    }

    Command::CanDelete(Target::Cafe { id }) => {
      let id = parse_uuid(&id)?;
      let can_delete = service.can_delete_cafe(id).await?;
      json!({ "cafe_id": id, "can_delete": can_delete })
    }
  };
  Ok(value)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::cli::GenderArg;

  async fn service() -> Service {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AssignmentService::with_system_clock(Arc::new(store))
  }

  #[tokio::test]
  async fn register_assign_and_report() {
    let service = service().await;

    run(
      Command::Employee(EmployeeCommand::Add {
        id:     "UI0000001".into(),
        name:   "Ada".into(),
        email:  "ada@example.com".into(),
        phone:  "91234567".into(),
        gender: GenderArg::Female,
      }),
      &service,
    )
    .await
    .unwrap();

    let cafe = run(
      Command::Cafe(CafeCommand::Add {
        name:        "Brew Lab".into(),
        location:    "Orchard".into(),
        description: String::new(),
        logo:        None,
      }),
      &service,
    )
    .await
    .unwrap();
    let cafe_id = cafe["id"].as_str().unwrap().to_owned();

    run(
      Command::Assign { employee: "UI0000001".into(), cafe: cafe_id.clone(), date: None },
      &service,
    )
    .await
    .unwrap();

    let current = run(Command::Current { employee: "UI0000001".into() }, &service)
      .await
      .unwrap();
    assert_eq!(current["cafe_id"], cafe_id);
    assert_eq!(current["days_worked"], 1);

    let check = run(Command::CanDelete(Target::Cafe { id: cafe_id.clone() }), &service)
      .await
      .unwrap();
    assert_eq!(check["can_delete"], false);

    let err = run(Command::Cafe(CafeCommand::Remove { id: cafe_id }), &service)
      .await
      .unwrap_err();
    assert!(matches!(err.downcast_ref::<CoreError>(), Some(CoreError::InUse { .. })));
  }

  #[tokio::test]
  async fn malformed_ids_are_validation_errors() {
    let service = service().await;
    let err = run(Command::Unassign { assignment: "nope".into() }, &service)
      .await
      .unwrap_err();
    assert!(matches!(err.downcast_ref::<CoreError>(), Some(CoreError::Validation(_))));
  }
}
