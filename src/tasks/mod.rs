//! Task management: domain model, visibility filtering, storage, schema
//! capability negotiation, and CSV export.

pub mod export;
pub mod filter;
pub mod models;
pub mod schema;
pub mod store;

pub use export::export_csv;
pub use filter::visible_tasks;
pub use models::{BoardRole, BoardStats, Priority, RoleFilter, Schedule, Status, Task, TaskDraft};
pub use schema::{negotiate, SchemaCapability, REMEDIATION_SQL};
pub use store::{SqliteTaskStore, TaskStore};
