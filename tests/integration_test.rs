//! Integration tests for `casa_gestao`.
//!
//! Exercises the full lifecycle against a real SQLite file: account creation,
//! schema negotiation before and after the recurrence migration, the
//! visibility window, and CSV export.

use casa_gestao::auth::SqliteAuth;
use casa_gestao::dashboard::Dashboard;
use casa_gestao::tasks::models::{BoardRole, Priority, Schedule, Status, TaskDraft};
use casa_gestao::tasks::schema::SchemaCapability;
use casa_gestao::tasks::store::SqliteTaskStore;
use casa_gestao::testing::MockTextGenerator;
use casa_gestao::VERSION;
use chrono::NaiveDate;
use tempfile::TempDir;

#[test]
fn test_version_exists() {
    assert!(!VERSION.is_empty());
}

fn dashboard_at(dir: &TempDir) -> Dashboard {
    let db = dir.path().join("board.sqlite3");
    Dashboard::new(
        Box::new(SqliteTaskStore::new(&db).unwrap()),
        Box::new(SqliteAuth::new(&db).unwrap()),
        Box::new(MockTextGenerator::replying("1. Começar pelo orçamento")),
    )
}

fn recurring_draft() -> TaskDraft {
    TaskDraft {
        title: "Limpeza da caixa d'água".to_string(),
        assignee: "Pedro Costa".to_string(),
        role: BoardRole::Patrimony,
        status: Status::Pending,
        priority: Priority::Medium,
        is_recurring: true,
        recurring_day: Some(10),
        lead_days: Some(3),
        ..TaskDraft::default()
    }
}

#[test]
fn test_full_board_lifecycle() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("board.sqlite3");
    let mut dash = dashboard_at(&dir);

    // A fresh database ships without the recurrence columns.
    dash.sign_up("ana@casa.org", "segredo", "Ana Silva").unwrap();
    assert_eq!(dash.capability(), SchemaCapability::Unsupported);
    assert!(dash.schema_advisory().is_some());

    // Saving a recurring task degrades it to a fixed (undated) one.
    dash.save_task(&recurring_draft()).unwrap();
    assert!(matches!(dash.tasks()[0].schedule, Schedule::Fixed { .. }));

    // Run the migration out of band, then start a new session to re-probe.
    SqliteTaskStore::new(&db).unwrap().apply_recurrence_migration().unwrap();
    dash.sign_out();
    dash.sign_in("ana@casa.org", "segredo").unwrap();
    assert_eq!(dash.capability(), SchemaCapability::Supported);
    assert_eq!(dash.schema_advisory(), None);

    // Now the recurrence round-trips and drives visibility.
    dash.save_task(&recurring_draft()).unwrap();
    let recurring_id = dash
        .tasks()
        .iter()
        .find(|t| t.schedule.is_recurring())
        .map(|t| t.id)
        .expect("recurring task saved");
    assert!(dash.visible(7).iter().any(|t| t.id == recurring_id));
    assert!(dash.visible(10).iter().any(|t| t.id == recurring_id));
    assert!(!dash.visible(6).iter().any(|t| t.id == recurring_id));
    assert!(!dash.visible(11).iter().any(|t| t.id == recurring_id));

    // Export covers both tasks and includes the recurrence column.
    let csv = dash.export_csv();
    assert!(csv.starts_with('\u{feff}'));
    assert!(csv.lines().next().unwrap().contains("Recorrente"));
    assert!(csv.contains("Todo dia 10"));
    assert_eq!(csv.lines().count(), 3);
}

#[test]
fn test_fixed_tasks_survive_updates() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard_at(&dir);
    dash.sign_up("julia@casa.org", "segredo", "Julia Santos").unwrap();

    let draft = TaskDraft {
        title: "Organizar festa junina".to_string(),
        assignee: "Julia Santos".to_string(),
        role: BoardRole::Social,
        status: Status::Pending,
        priority: Priority::Low,
        deadline: NaiveDate::from_ymd_opt(2025, 6, 20),
        ..TaskDraft::default()
    };
    dash.save_task(&draft).unwrap();
    let task = dash.tasks()[0].clone();

    let mut update = TaskDraft::from_task(&task);
    update.status = Status::Completed;
    dash.save_task(&update).unwrap();

    assert_eq!(dash.tasks().len(), 1);
    assert_eq!(dash.tasks()[0].status, Status::Completed);
    assert_eq!(dash.stats().completed, 1);
}
