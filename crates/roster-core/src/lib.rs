//! Core types and trait definitions for the café roster.
//!
//! Tracks which employee currently works at which café and for how long.
//! This crate is free of database and I/O dependencies; storage backends
//! implement [`store::EntityStore`] and [`store::AssignmentStore`], and
//! everything that mutates assignment state goes through
//! [`service::AssignmentService`].

pub mod assignment;
pub mod clock;
pub mod entity;
pub mod error;
pub mod guard;
pub mod service;
pub mod store;
pub mod tenure;

pub use error::{Error, Result};
