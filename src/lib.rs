//! # `casa_gestao`
//!
//! Management core for the Casa do Estudante Universitário board: task
//! tracking with recurring-task visibility, SQLite persistence with schema
//! capability negotiation, CSV export, and AI-assisted planning.

pub mod ai;
pub mod auth;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod tasks;
pub mod templates;
pub mod testing;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
