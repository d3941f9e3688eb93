//! Task store trait and `SQLite` implementation.
//!
//! Reads and writes adapt to the negotiated [`SchemaCapability`]: against an
//! un-migrated store only the base column set is touched, and a recurring
//! draft quietly loses its recurrence fields on the way out (the save still
//! succeeds as a plain dated task).

use crate::error::Result;
use crate::tasks::models::{
    BoardRole, Priority, Schedule, Status, Task, TaskDraft,
};
use crate::tasks::schema::{SchemaCapability, REMEDIATION_SQL};
use rusqlite::{params, Connection};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Columns every deployment of the task table has, in read order.
pub const BASE_COLUMNS: [&str; 8] =
    ["id", "status", "priority", "deadline", "assignee", "role", "task", "notes"];

/// Columns added by the recurrence migration, in read order.
pub const RECURRENCE_COLUMNS: [&str; 3] = ["is_recurring", "recurring_day", "lead_days"];

/// The column set to request for the given capability.
///
/// While the store is known to lack the recurrence columns, only the base set
/// is selected; otherwise (including the un-probed state) all columns are.
#[must_use]
pub fn read_columns(capability: SchemaCapability) -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = BASE_COLUMNS.to_vec();
    if !capability.is_unsupported() {
        columns.extend(RECURRENCE_COLUMNS);
    }
    columns
}

/// Shape the outgoing record for a save.
///
/// The base fields are always present. The three recurrence keys are added
/// only when the store supports them AND the draft is actually recurring; a
/// recurring draft saved against an un-migrated store therefore produces a
/// payload with no recurrence keys at all.
#[must_use]
pub fn write_payload(
    draft: &TaskDraft,
    capability: SchemaCapability,
    owner: &str,
) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("task".to_string(), Value::String(draft.title.clone()));
    payload.insert("assignee".to_string(), Value::String(draft.assignee.clone()));
    payload.insert("role".to_string(), Value::String(draft.role.as_str().to_string()));
    payload.insert("status".to_string(), Value::String(draft.status.as_str().to_string()));
    payload.insert("priority".to_string(), Value::String(draft.priority.as_str().to_string()));
    payload.insert(
        "deadline".to_string(),
        draft
            .deadline
            .map_or(Value::Null, |d| Value::String(d.format("%Y-%m-%d").to_string())),
    );
    payload.insert("notes".to_string(), Value::String(draft.notes.clone()));
    payload.insert("user_id".to_string(), Value::String(owner.to_string()));

    if capability.is_supported() && draft.is_recurring {
        payload.insert("is_recurring".to_string(), Value::Bool(true));
        payload
            .insert("recurring_day".to_string(), draft.recurring_day.map_or(Value::Null, Value::from));
        payload.insert("lead_days".to_string(), draft.lead_days.map_or(Value::Null, Value::from));
    }

    payload
}

/// Trait for task storage operations.
///
/// All methods return a `Result` and may fail with database errors. The
/// capability value negotiated at session start is passed in explicitly.
#[allow(clippy::missing_errors_doc)]
pub trait TaskStore {
    /// List all tasks, ordered by deadline ascending.
    fn list_tasks(&self, capability: SchemaCapability) -> Result<Vec<Task>>;

    /// Insert (draft without id) or update (draft with id) a task.
    ///
    /// Callers re-fetch afterwards rather than patching local state.
    fn save_task(&self, draft: &TaskDraft, capability: SchemaCapability, owner: &str)
        -> Result<()>;

    /// Delete a task permanently. Returns whether a row was removed.
    fn delete_task(&self, id: i64) -> Result<bool>;

    /// Minimal read referencing a recurrence column, used by the negotiator.
    fn probe_recurrence_columns(&self) -> Result<()>;
}

/// SQLite-based task store.
#[derive(Debug, Clone)]
pub struct SqliteTaskStore {
    db_path: PathBuf,
}

impl SqliteTaskStore {
    /// Create a new `SQLite` task store at the given database path.
    ///
    /// Initializes the base schema only — the recurrence columns arrive via
    /// [`Self::apply_recurrence_migration`], which keeps both negotiation
    /// outcomes reachable against real databases.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let store = Self { db_path: db_path.as_ref().to_path_buf() };
        store.init_schema()?;
        Ok(store)
    }

    /// Get the database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection to the database.
    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;")?;
        Ok(conn)
    }

    /// Initialize the base database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.open()?;
        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task TEXT NOT NULL,
                assignee TEXT NOT NULL DEFAULT '',
                role TEXT NOT NULL DEFAULT 'Presidência',
                status TEXT NOT NULL DEFAULT 'Pendente',
                priority TEXT NOT NULL DEFAULT 'Média',
                deadline TEXT,
                notes TEXT NOT NULL DEFAULT '',
                user_id TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_deadline ON tasks(deadline);
            CREATE INDEX IF NOT EXISTS idx_tasks_role ON tasks(role);
            ",
        )?;
        Ok(())
    }

    /// Apply the recurrence migration this crate advertises to operators.
    ///
    /// # Errors
    ///
    /// Returns an error if the columns already exist or the statement fails.
    pub fn apply_recurrence_migration(&self) -> Result<()> {
        let conn = self.open()?;
        conn.execute_batch(REMEDIATION_SQL)?;
        Ok(())
    }

    /// Parse a task from a row selected with [`read_columns`].
    fn parse_task(row: &rusqlite::Row, with_recurrence: bool) -> rusqlite::Result<Task> {
        let status_str: String = row.get(1)?;
        let priority_str: String = row.get(2)?;
        let deadline_str: Option<String> = row.get(3)?;
        let role_str: String = row.get(5)?;

        let recurrence = if with_recurrence {
            let is_recurring: Option<bool> = row.get(8)?;
            let day: Option<i64> = row.get(9)?;
            let lead_days: Option<i64> = row.get(10)?;
            (is_recurring.unwrap_or(false), day, lead_days)
        } else {
            (false, None, None)
        };

        // A row is recurring only when the flag and both fields are present;
        // anything else falls back to the fixed deadline.
        let schedule = match recurrence {
            (true, Some(day), Some(lead_days)) => Schedule::Recurring { day, lead_days },
            _ => Schedule::Fixed {
                deadline: deadline_str
                    .and_then(|d| chrono::NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok())
                    .unwrap_or_default(),
            },
        };

        Ok(Task {
            id: row.get(0)?,
            status: Status::from_str(&status_str).unwrap_or_default(),
            priority: Priority::from_str(&priority_str).unwrap_or_default(),
            schedule,
            assignee: row.get(4)?,
            role: BoardRole::from_str(&role_str).unwrap_or_default(),
            title: row.get(6)?,
            notes: row.get(7)?,
        })
    }

    /// Convert a payload value to a SQL parameter.
    fn to_sql_value(value: &Value) -> Box<dyn rusqlite::ToSql> {
        match value {
            Value::Bool(b) => Box::new(i64::from(*b)),
            Value::Number(n) => Box::new(n.as_i64()),
            Value::String(s) => Box::new(s.clone()),
            _ => Box::new(None::<String>),
        }
    }
}

impl TaskStore for SqliteTaskStore {
    fn list_tasks(&self, capability: SchemaCapability) -> Result<Vec<Task>> {
        let conn = self.open()?;
        let columns = read_columns(capability);
        let with_recurrence = !capability.is_unsupported();

        let sql = format!(
            "SELECT {} FROM tasks ORDER BY deadline ASC",
            columns.join(", ")
        );
        let mut stmt = conn.prepare(&sql)?;
        let tasks = stmt
            .query_map([], |row| Self::parse_task(row, with_recurrence))?
            .collect::<rusqlite::Result<Vec<Task>>>()?;
        Ok(tasks)
    }

    fn save_task(
        &self,
        draft: &TaskDraft,
        capability: SchemaCapability,
        owner: &str,
    ) -> Result<()> {
        let conn = self.open()?;
        let payload = write_payload(draft, capability, owner);

        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(id) = draft.id {
            // Build dynamic UPDATE statement from the payload keys.
            let mut assignments = vec!["updated_at = datetime('now')".to_string()];
            for (key, value) in &payload {
                assignments.push(format!("{key} = ?"));
                values.push(Self::to_sql_value(value));
            }
            values.push(Box::new(id));

            let sql = format!("UPDATE tasks SET {} WHERE id = ?", assignments.join(", "));
            let params: Vec<&dyn rusqlite::ToSql> = values.iter().map(AsRef::as_ref).collect();
            conn.execute(&sql, params.as_slice())?;
        } else {
            let mut columns = Vec::new();
            let mut placeholders = Vec::new();
            for (key, value) in &payload {
                columns.push(key.as_str());
                placeholders.push("?");
                values.push(Self::to_sql_value(value));
            }

            let sql = format!(
                "INSERT INTO tasks ({}) VALUES ({})",
                columns.join(", "),
                placeholders.join(", ")
            );
            let params: Vec<&dyn rusqlite::ToSql> = values.iter().map(AsRef::as_ref).collect();
            conn.execute(&sql, params.as_slice())?;
        }

        Ok(())
    }

    fn delete_task(&self, id: i64) -> Result<bool> {
        let conn = self.open()?;
        let rows = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn probe_recurrence_columns(&self) -> Result<()> {
        let conn = self.open()?;
        // Preparing is enough to learn whether the column exists; no rows
        // are needed.
        conn.prepare("SELECT is_recurring FROM tasks LIMIT 1")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::schema::{negotiate, SchemaCapability};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn store() -> (TempDir, SqliteTaskStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteTaskStore::new(dir.path().join("board.sqlite3")).unwrap();
        (dir, store)
    }

    fn fixed_draft(title: &str, deadline: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            assignee: "Ana Silva".to_string(),
            role: BoardRole::Presidency,
            status: Status::Pending,
            priority: Priority::High,
            deadline: Some(date(deadline)),
            notes: "Precisa ir na prefeitura".to_string(),
            ..TaskDraft::default()
        }
    }

    fn recurring_draft(title: &str, day: i64, lead_days: i64) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            assignee: "Carlos Souza".to_string(),
            role: BoardRole::Treasury,
            deadline: Some(date("2025-05-20")),
            is_recurring: true,
            recurring_day: Some(day),
            lead_days: Some(lead_days),
            ..TaskDraft::default()
        }
    }

    #[test]
    fn test_read_columns_shrink_when_unsupported() {
        let reduced = read_columns(SchemaCapability::Unsupported);
        assert_eq!(reduced, BASE_COLUMNS.to_vec());

        let full = read_columns(SchemaCapability::Supported);
        assert!(full.contains(&"is_recurring"));
        assert!(full.contains(&"recurring_day"));
        assert!(full.contains(&"lead_days"));
    }

    #[test]
    fn test_write_payload_drops_recurrence_when_unsupported() {
        let draft = recurring_draft("Fechar caixa", 10, 3);
        let payload = write_payload(&draft, SchemaCapability::Unsupported, "user-1");
        assert!(!payload.contains_key("is_recurring"));
        assert!(!payload.contains_key("recurring_day"));
        assert!(!payload.contains_key("lead_days"));
        assert_eq!(payload["task"], "Fechar caixa");
        assert_eq!(payload["user_id"], "user-1");
    }

    #[test]
    fn test_write_payload_keeps_recurrence_when_supported() {
        let draft = recurring_draft("Fechar caixa", 10, 3);
        let payload = write_payload(&draft, SchemaCapability::Supported, "user-1");
        assert_eq!(payload["is_recurring"], true);
        assert_eq!(payload["recurring_day"], 10);
        assert_eq!(payload["lead_days"], 3);
    }

    #[test]
    fn test_write_payload_omits_recurrence_for_fixed_drafts() {
        let draft = fixed_draft("Renovar alvará", "2025-05-15");
        let payload = write_payload(&draft, SchemaCapability::Supported, "user-1");
        assert!(!payload.contains_key("is_recurring"));
        assert_eq!(payload["deadline"], "2025-05-15");
    }

    #[test]
    fn test_fresh_store_probes_unsupported() {
        let (_dir, store) = store();
        assert_eq!(negotiate(&store), SchemaCapability::Unsupported);
    }

    #[test]
    fn test_migrated_store_probes_supported() {
        let (_dir, store) = store();
        store.apply_recurrence_migration().unwrap();
        assert_eq!(negotiate(&store), SchemaCapability::Supported);
    }

    #[test]
    fn test_recurring_save_degrades_on_unmigrated_store() {
        let (_dir, store) = store();
        let capability = negotiate(&store);
        assert!(capability.is_unsupported());

        store.save_task(&recurring_draft("Fechar caixa", 10, 3), capability, "u").unwrap();
        let tasks = store.list_tasks(capability).unwrap();
        assert_eq!(tasks.len(), 1);
        // The record survived, but as a plain dated task.
        assert_eq!(tasks[0].schedule, Schedule::Fixed { deadline: date("2025-05-20") });
    }

    #[test]
    fn test_recurring_round_trip_after_migration() {
        let (_dir, store) = store();
        store.apply_recurrence_migration().unwrap();
        let capability = negotiate(&store);

        store.save_task(&recurring_draft("Fechar caixa", 15, 2), capability, "u").unwrap();
        let tasks = store.list_tasks(capability).unwrap();
        assert_eq!(tasks[0].schedule, Schedule::Recurring { day: 15, lead_days: 2 });
    }

    #[test]
    fn test_list_orders_by_deadline_ascending() {
        let (_dir, store) = store();
        let capability = negotiate(&store);
        store.save_task(&fixed_draft("depois", "2025-06-01"), capability, "u").unwrap();
        store.save_task(&fixed_draft("antes", "2025-05-10"), capability, "u").unwrap();

        let tasks = store.list_tasks(capability).unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["antes", "depois"]);
    }

    #[test]
    fn test_save_with_id_updates_in_place() {
        let (_dir, store) = store();
        let capability = negotiate(&store);
        store.save_task(&fixed_draft("Renovar alvará", "2025-05-15"), capability, "u").unwrap();

        let tasks = store.list_tasks(capability).unwrap();
        let mut draft = TaskDraft::from_task(&tasks[0]);
        draft.status = Status::Completed;
        draft.notes = "Alvará renovado".to_string();
        store.save_task(&draft, capability, "u").unwrap();

        let tasks = store.list_tasks(capability).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, Status::Completed);
        assert_eq!(tasks[0].notes, "Alvará renovado");
    }

    #[test]
    fn test_delete_task() {
        let (_dir, store) = store();
        let capability = negotiate(&store);
        store.save_task(&fixed_draft("a", "2025-05-15"), capability, "u").unwrap();
        let id = store.list_tasks(capability).unwrap()[0].id;

        assert!(store.delete_task(id).unwrap());
        assert!(!store.delete_task(id).unwrap());
        assert!(store.list_tasks(capability).unwrap().is_empty());
    }

    #[test]
    fn test_half_filled_recurrence_row_reads_as_fixed() {
        let (_dir, store) = store();
        store.apply_recurrence_migration().unwrap();
        let capability = negotiate(&store);

        let mut draft = recurring_draft("incompleta", 10, 3);
        draft.lead_days = None;
        store.save_task(&draft, capability, "u").unwrap();

        let tasks = store.list_tasks(capability).unwrap();
        assert!(matches!(tasks[0].schedule, Schedule::Fixed { .. }));
    }
}
