//! CSV export of the task list.
//!
//! Output is UTF-8 with a leading byte-order mark so spreadsheet apps pick up
//! the accented headers correctly. The `Recorrente` column only appears when
//! the export schema carries recurrence (capability `Supported`).

use crate::tasks::models::{Schedule, Task};
use crate::tasks::schema::SchemaCapability;
use chrono::NaiveDate;

/// Byte-order mark prefixed to the generated text.
pub const BOM: &str = "\u{feff}";

const BASE_HEADER: &str = "Status,Prioridade,Prazo,Responsável,Diretoria,Tarefa,Observações";
const RECURRENCE_HEADER: &str =
    "Status,Prioridade,Recorrente,Prazo,Responsável,Diretoria,Tarefa,Observações";

/// Quote a free-text field, doubling internal quotes.
fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// A task's due description: the deadline date, or `Todo dia {n}` for
/// recurring tasks when the export schema includes recurrence.
fn due_description(task: &Task, with_recurrence: bool) -> String {
    match task.schedule {
        Schedule::Recurring { day, .. } if with_recurrence => format!("Todo dia {day}"),
        Schedule::Recurring { .. } => String::new(),
        Schedule::Fixed { deadline } => deadline.format("%Y-%m-%d").to_string(),
    }
}

/// Render the task list as CSV text, one row per task.
#[must_use]
pub fn export_csv(tasks: &[Task], capability: SchemaCapability) -> String {
    let with_recurrence = capability.is_supported();
    let header = if with_recurrence { RECURRENCE_HEADER } else { BASE_HEADER };

    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push(header.to_string());

    for task in tasks {
        let mut fields = vec![task.status.as_str().to_string(), task.priority.as_str().to_string()];
        if with_recurrence {
            let recurring = if task.schedule.is_recurring() { "Sim" } else { "Não" };
            fields.push(recurring.to_string());
        }
        fields.push(due_description(task, with_recurrence));
        fields.push(task.assignee.clone());
        fields.push(task.role.as_str().to_string());
        fields.push(quoted(&task.title));
        fields.push(quoted(&task.notes));
        lines.push(fields.join(","));
    }

    format!("{BOM}{}", lines.join("\n"))
}

/// Suggested filename for a CSV export generated on the given date.
#[must_use]
pub fn export_filename(date: NaiveDate) -> String {
    format!("Gestao_Casa_Estudante_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::models::{BoardRole, Priority, Status};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(title: &str, notes: &str, schedule: Schedule) -> Task {
        Task {
            id: 1,
            status: Status::Pending,
            priority: Priority::High,
            schedule,
            assignee: "Ana Silva".to_string(),
            role: BoardRole::Presidency,
            title: title.to_string(),
            notes: notes.to_string(),
        }
    }

    #[test]
    fn test_starts_with_bom_and_header() {
        let csv = export_csv(&[], SchemaCapability::Unsupported);
        assert!(csv.starts_with(BOM));
        assert_eq!(csv.trim_start_matches(BOM), BASE_HEADER);
    }

    #[test]
    fn test_one_row_per_task() {
        let tasks = vec![
            task("a", "", Schedule::Fixed { deadline: date("2025-05-15") }),
            task("b", "", Schedule::Fixed { deadline: date("2025-05-20") }),
        ];
        let csv = export_csv(&tasks, SchemaCapability::Unsupported);
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_quotes_are_doubled() {
        let tasks = vec![task("He said \"hi\"", "", Schedule::Fixed { deadline: date("2025-05-15") })];
        let csv = export_csv(&tasks, SchemaCapability::Unsupported);
        assert!(csv.contains("\"He said \"\"hi\"\"\""));
    }

    #[test]
    fn test_recurrence_column_follows_capability() {
        let tasks = vec![task("a", "", Schedule::Recurring { day: 10, lead_days: 3 })];

        let full = export_csv(&tasks, SchemaCapability::Supported);
        assert!(full.contains(RECURRENCE_HEADER));
        assert!(full.contains("Sim"));
        assert!(full.contains("Todo dia 10"));

        let base = export_csv(&tasks, SchemaCapability::Unsupported);
        assert!(base.contains(BASE_HEADER));
        assert!(!base.contains("Recorrente"));
        assert!(!base.contains("Todo dia"));
    }

    #[test]
    fn test_fixed_task_renders_deadline() {
        let tasks = vec![task("a", "obs", Schedule::Fixed { deadline: date("2025-05-15") })];
        let csv = export_csv(&tasks, SchemaCapability::Supported);
        assert!(csv.contains("Não,2025-05-15,Ana Silva,Presidência,\"a\",\"obs\""));
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename(date("2025-05-15")), "Gestao_Casa_Estudante_2025-05-15.csv");
    }
}
