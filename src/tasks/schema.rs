//! Schema capability negotiation.
//!
//! Older deployments of the board database predate the recurrence columns.
//! Rather than failing against them, the dashboard probes once per session
//! whether `tasks.is_recurring` exists and adapts reads and writes to the
//! answer. The result is an explicit value handed to the store operations,
//! never a process-wide global, so sessions (and tests) cannot interfere.

use crate::error::{Error, Result};
use crate::tasks::store::TaskStore;

/// Whether the backing store has been migrated with the recurrence columns.
///
/// Starts as `Unknown`, is settled by a single probe after authentication,
/// and never transitions back within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaCapability {
    /// Not yet probed.
    #[default]
    Unknown,
    /// The recurrence columns exist.
    Supported,
    /// The recurrence columns are missing; reads and writes fall back to the
    /// base column set.
    Unsupported,
}

impl SchemaCapability {
    /// Whether the recurrence columns are known to exist.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Supported)
    }

    /// Whether the store is known to lack the recurrence columns.
    #[must_use]
    pub const fn is_unsupported(self) -> bool {
        matches!(self, Self::Unsupported)
    }
}

/// Error-message fragments that identify a missing-column failure.
///
/// SQLite reports `no such column: ...`; PostgreSQL-backed stores report
/// `column ... does not exist`. Nothing else is recognized.
const MISSING_COLUMN_SIGNATURES: [&str; 2] = ["no such column", "does not exist"];

/// Whether an error message carries the missing-column signature.
///
/// This is the single place the backend's error text is inspected; if a
/// backend changes its wording, only this predicate needs updating.
#[must_use]
pub fn is_missing_column_signature(message: &str) -> bool {
    let message = message.to_lowercase();
    MISSING_COLUMN_SIGNATURES.iter().any(|sig| message.contains(sig))
}

/// Map a probe outcome to a capability.
///
/// Only the recognized missing-column signature yields `Unsupported`. Any
/// other failure — including network or permission errors — is treated as
/// `Supported`, matching the dashboard's historical behavior: the session
/// proceeds optimistically and the read path surfaces the real error.
#[must_use]
pub fn capability_from_probe(outcome: &Result<()>) -> SchemaCapability {
    match outcome {
        Ok(()) => SchemaCapability::Supported,
        Err(err) if is_missing_column_signature(&err.to_string()) => SchemaCapability::Unsupported,
        Err(_) => SchemaCapability::Supported,
    }
}

/// Probe the store once and settle the session's capability.
///
/// Runs after authentication succeeds and before the first task fetch.
#[must_use]
pub fn negotiate(store: &dyn TaskStore) -> SchemaCapability {
    capability_from_probe(&store.probe_recurrence_columns())
}

/// Migration statement that upgrades a base-schema store with the recurrence
/// columns. Offered verbatim to the operator in the advisory banner.
pub const REMEDIATION_SQL: &str = "\
ALTER TABLE tasks ADD COLUMN is_recurring INTEGER NOT NULL DEFAULT 0;
ALTER TABLE tasks ADD COLUMN recurring_day INTEGER;
ALTER TABLE tasks ADD COLUMN lead_days INTEGER;";

/// Banner text shown while the store lacks the recurrence columns.
#[must_use]
pub fn advisory() -> String {
    format!(
        "O banco de dados ainda não suporta tarefas recorrentes. \
         Peça ao administrador para executar:\n{REMEDIATION_SQL}"
    )
}
