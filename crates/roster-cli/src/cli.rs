//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use roster_core::entity::Gender;

#[derive(Parser, Debug)]
#[command(author, version, about = "Track which employee works at which café")]
pub struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "roster.toml")]
  pub config: PathBuf,

  /// SQLite database file; overrides `database_path` from the config.
  #[arg(long, value_name = "FILE")]
  pub database: Option<PathBuf>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Register or remove employees.
  #[command(subcommand)]
  Employee(EmployeeCommand),

  /// Register or remove cafés.
  #[command(subcommand)]
  Cafe(CafeCommand),

  /// Assign an unassigned employee to a café.
  Assign {
    employee: String,
    cafe:     String,
    /// Start date (RFC 3339); defaults to now.
    #[arg(long)]
    date:     Option<String>,
  },

  /// Release an assignment by id.
  Unassign { assignment: String },

  /// Move an employee to a café, assigning them if unassigned.
  Transfer {
    employee: String,
    cafe:     String,
    /// Start date at the new café (RFC 3339); defaults to now.
    #[arg(long)]
    date:     Option<String>,
  },

  /// Show an employee's current assignment and days worked.
  Current { employee: String },

  /// List the employees working at a café, longest-serving first.
  Roster {
    cafe: String,
    /// List every assignment row for the café, including inactive ones.
    #[arg(long)]
    all:  bool,
  },

  /// Replace fields of an assignment row.
  Update {
    assignment: String,
    #[arg(long)]
    cafe:       Option<String>,
    #[arg(long)]
    date:       Option<String>,
    /// Mark the row inactive without deleting it.
    #[arg(long, conflicts_with = "active")]
    inactive:   bool,
    #[arg(long)]
    active:     bool,
  },

  /// Check whether an entity may be removed.
  #[command(subcommand)]
  CanDelete(Target),
}

#[derive(Subcommand, Debug)]
pub enum EmployeeCommand {
  Add {
    id:     String,
    #[arg(long)]
    name:   String,
    #[arg(long)]
    email:  String,
    #[arg(long)]
    phone:  String,
    #[arg(long, value_enum)]
    gender: GenderArg,
  },
  /// Remove an employee; refused while they are assigned.
  Remove { id: String },
}

#[derive(Subcommand, Debug)]
pub enum CafeCommand {
  Add {
    name:        String,
    #[arg(long)]
    location:    String,
    #[arg(long, default_value = "")]
    description: String,
    /// Reference to an already-stored logo.
    #[arg(long)]
    logo:        Option<String>,
  },
  /// Remove a café; refused while anyone is assigned to it.
  Remove { id: String },
}

#[derive(Subcommand, Debug)]
pub enum Target {
  Employee { id: String },
  Cafe { id: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum GenderArg {
  Male,
  Female,
}

impl From<GenderArg> for Gender {
  fn from(g: GenderArg) -> Self {
    match g {
      GenderArg::Male => Gender::Male,
      GenderArg::Female => Gender::Female,
    }
  }
}
