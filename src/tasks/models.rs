//! Domain model for the board's task list.
//!
//! Wire strings are the Portuguese labels the dashboard has always stored
//! (`Pendente`, `Alta`, `Tesouraria`, ...), so records written by older
//! deployments keep round-tripping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    /// Task has not been started.
    #[default]
    #[serde(rename = "Pendente")]
    Pending,
    /// Task is being worked on.
    #[serde(rename = "Em Andamento")]
    InProgress,
    /// Task is done.
    #[serde(rename = "Concluído")]
    Completed,
}

impl Status {
    /// Parse a status from its stored label.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid status.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, InvalidStatus> {
        match s.trim().to_lowercase().as_str() {
            "pendente" => Ok(Self::Pending),
            "em andamento" => Ok(Self::InProgress),
            "concluído" | "concluido" => Ok(Self::Completed),
            _ => Err(InvalidStatus(s.to_string())),
        }
    }

    /// Get the stored label for the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::InProgress => "Em Andamento",
            Self::Completed => "Concluído",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid status string is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatus(pub String);

impl std::fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid status: '{}' (must be one of: Pendente, Em Andamento, Concluído)",
            self.0
        )
    }
}

impl std::error::Error for InvalidStatus {}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Priority {
    /// Low priority.
    #[serde(rename = "Baixa")]
    Low,
    /// Medium priority (default).
    #[default]
    #[serde(rename = "Média")]
    Medium,
    /// High priority.
    #[serde(rename = "Alta")]
    High,
}

impl Priority {
    /// Parse a priority from its stored label.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid priority.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, InvalidPriority> {
        match s.trim().to_lowercase().as_str() {
            "baixa" => Ok(Self::Low),
            "média" | "media" => Ok(Self::Medium),
            "alta" => Ok(Self::High),
            _ => Err(InvalidPriority(s.to_string())),
        }
    }

    /// Get the stored label for the priority.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Baixa",
            Self::Medium => "Média",
            Self::High => "Alta",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid priority string is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPriority(pub String);

impl std::fmt::Display for InvalidPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid priority: '{}' (must be one of: Baixa, Média, Alta)", self.0)
    }
}

impl std::error::Error for InvalidPriority {}

/// One of the five fixed organizational roles a task is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoardRole {
    /// Presidency.
    #[default]
    #[serde(rename = "Presidência")]
    Presidency,
    /// Treasury.
    #[serde(rename = "Tesouraria")]
    Treasury,
    /// Patrimony and maintenance.
    #[serde(rename = "Patrimônio")]
    Patrimony,
    /// Social and events.
    #[serde(rename = "Social/Eventos")]
    Social,
    /// Secretariat.
    #[serde(rename = "Secretaria")]
    Secretariat,
}

impl BoardRole {
    /// All board roles, in presentation order.
    pub const ALL: [Self; 5] =
        [Self::Presidency, Self::Treasury, Self::Patrimony, Self::Social, Self::Secretariat];

    /// Parse a role from its stored label.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid role.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, InvalidRole> {
        match s.trim().to_lowercase().as_str() {
            "presidência" | "presidencia" => Ok(Self::Presidency),
            "tesouraria" => Ok(Self::Treasury),
            "patrimônio" | "patrimonio" => Ok(Self::Patrimony),
            "social/eventos" | "social" => Ok(Self::Social),
            "secretaria" => Ok(Self::Secretariat),
            _ => Err(InvalidRole(s.to_string())),
        }
    }

    /// Get the stored label for the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Presidency => "Presidência",
            Self::Treasury => "Tesouraria",
            Self::Patrimony => "Patrimônio",
            Self::Social => "Social/Eventos",
            Self::Secretariat => "Secretaria",
        }
    }
}

impl std::fmt::Display for BoardRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid role string is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRole(pub String);

impl std::fmt::Display for InvalidRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid role: '{}' (must be one of: Presidência, Tesouraria, Patrimônio, Social/Eventos, Secretaria)",
            self.0
        )
    }
}

impl std::error::Error for InvalidRole {}

/// Role selection for the list filter.
///
/// `All` (`Todos`) is a synthetic filter value only; it is never stored on a
/// task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    /// Match tasks of every role.
    #[default]
    All,
    /// Match only tasks of the given role.
    Only(BoardRole),
}

impl RoleFilter {
    /// Whether a task with the given role passes this filter.
    #[must_use]
    pub fn matches(self, role: BoardRole) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == role,
        }
    }

    /// Parse a filter value: `Todos` or any role label.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is neither `Todos` nor a valid role.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, InvalidRole> {
        if s.trim().eq_ignore_ascii_case("todos") {
            return Ok(Self::All);
        }
        BoardRole::from_str(s).map(Self::Only)
    }

    /// Get the filter's label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "Todos",
            Self::Only(role) => role.as_str(),
        }
    }
}

/// When a task is due.
///
/// The store keeps a deadline column and three optional recurrence columns on
/// every row; this tagged form exists only in memory. A row maps to
/// `Recurring` exactly when `is_recurring` is set and both recurrence fields
/// are present — anything else, including a half-filled recurrence, falls back
/// to `Fixed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Schedule {
    /// Due on a single calendar date.
    Fixed {
        /// The due date.
        deadline: NaiveDate,
    },
    /// Due every month on a fixed day.
    Recurring {
        /// Day of the month the task is due (1-31 as entered; not validated).
        day: i64,
        /// How many days before `day` the task becomes visible.
        lead_days: i64,
    },
}

impl Schedule {
    /// Whether this schedule recurs monthly.
    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        matches!(self, Self::Recurring { .. })
    }
}

/// A unit of work on the board's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned by the store on creation.
    pub id: i64,
    /// Current status.
    pub status: Status,
    /// Priority level.
    pub priority: Priority,
    /// When the task is due.
    pub schedule: Schedule,
    /// Name of the member responsible for the task.
    pub assignee: String,
    /// Board role the task belongs to.
    pub role: BoardRole,
    /// Short title describing the task.
    pub title: String,
    /// Free-text detail; may be empty.
    pub notes: String,
}

impl Task {
    /// The fixed deadline, if the task is not recurring.
    #[must_use]
    pub const fn deadline(&self) -> Option<NaiveDate> {
        match self.schedule {
            Schedule::Fixed { deadline } => Some(deadline),
            Schedule::Recurring { .. } => None,
        }
    }
}

/// Input to the save operation: either a new task (`id` unset) or an edit of
/// an existing one (`id` set).
///
/// Unlike [`Task`], a draft carries the raw deadline and recurrence fields
/// side by side, the way the edit form does — the store decides which of them
/// actually reach a row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    /// Identifier of the task being edited; `None` creates a new task.
    pub id: Option<i64>,
    /// Short title describing the task.
    pub title: String,
    /// Name of the member responsible for the task.
    pub assignee: String,
    /// Board role the task belongs to.
    pub role: BoardRole,
    /// Current status.
    pub status: Status,
    /// Priority level.
    pub priority: Priority,
    /// Calendar deadline; used for display only while the task is recurring.
    pub deadline: Option<NaiveDate>,
    /// Free-text detail.
    pub notes: String,
    /// Whether the task recurs monthly.
    pub is_recurring: bool,
    /// Day of the month a recurring task is due.
    pub recurring_day: Option<i64>,
    /// Days before `recurring_day` the task becomes visible.
    pub lead_days: Option<i64>,
}

impl TaskDraft {
    /// Build a draft pre-filled from an existing task, for editing.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        let (is_recurring, recurring_day, lead_days) = match task.schedule {
            Schedule::Fixed { .. } => (false, None, None),
            Schedule::Recurring { day, lead_days } => (true, Some(day), Some(lead_days)),
        };
        Self {
            id: Some(task.id),
            title: task.title.clone(),
            assignee: task.assignee.clone(),
            role: task.role,
            status: task.status,
            priority: task.priority,
            deadline: task.deadline(),
            notes: task.notes.clone(),
            is_recurring,
            recurring_day,
            lead_days,
        }
    }
}

/// Aggregate counts shown on the dashboard's stat cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardStats {
    /// Total number of tasks.
    pub total: usize,
    /// Tasks still pending.
    pub pending: usize,
    /// Tasks in progress.
    pub in_progress: usize,
    /// Tasks completed.
    pub completed: usize,
}

impl BoardStats {
    /// Compute counts over a task list.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            total: tasks.len(),
            pending: tasks.iter().filter(|t| t.status == Status::Pending).count(),
            in_progress: tasks.iter().filter(|t| t.status == Status::InProgress).count(),
            completed: tasks.iter().filter(|t| t.status == Status::Completed).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn fixed_task(id: i64, status: Status) -> Task {
        Task {
            id,
            status,
            priority: Priority::Medium,
            schedule: Schedule::Fixed { deadline: date("2025-05-15") },
            assignee: "Ana Silva".to_string(),
            role: BoardRole::Presidency,
            title: "Renovar alvará de funcionamento".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [Status::Pending, Status::InProgress, Status::Completed] {
            assert_eq!(Status::from_str(status.as_str()).unwrap(), status);
        }
        assert_eq!(Status::from_str("concluido").unwrap(), Status::Completed);
        assert!(Status::from_str("done").is_err());
    }

    #[test]
    fn test_priority_round_trip_and_order() {
        for priority in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(Priority::from_str(priority.as_str()).unwrap(), priority);
        }
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert!(Priority::from_str("urgente").is_err());
    }

    #[test]
    fn test_role_round_trip() {
        for role in BoardRole::ALL {
            assert_eq!(BoardRole::from_str(role.as_str()).unwrap(), role);
        }
        assert_eq!(BoardRole::from_str("patrimonio").unwrap(), BoardRole::Patrimony);
        assert!(BoardRole::from_str("Todos").is_err());
    }

    #[test]
    fn test_role_filter_all_sentinel() {
        assert_eq!(RoleFilter::from_str("Todos").unwrap(), RoleFilter::All);
        assert_eq!(
            RoleFilter::from_str("Tesouraria").unwrap(),
            RoleFilter::Only(BoardRole::Treasury)
        );
        for role in BoardRole::ALL {
            assert!(RoleFilter::All.matches(role));
        }
        assert!(RoleFilter::Only(BoardRole::Social).matches(BoardRole::Social));
        assert!(!RoleFilter::Only(BoardRole::Social).matches(BoardRole::Treasury));
    }

    #[test]
    fn test_status_wire_format_is_portuguese() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"Em Andamento\"");
        let parsed: Status = serde_json::from_str("\"Concluído\"").unwrap();
        assert_eq!(parsed, Status::Completed);
    }

    #[test]
    fn test_draft_from_fixed_task() {
        let task = fixed_task(7, Status::Pending);
        let draft = TaskDraft::from_task(&task);
        assert_eq!(draft.id, Some(7));
        assert_eq!(draft.deadline, Some(date("2025-05-15")));
        assert!(!draft.is_recurring);
        assert_eq!(draft.recurring_day, None);
        assert_eq!(draft.lead_days, None);
    }

    #[test]
    fn test_draft_from_recurring_task() {
        let mut task = fixed_task(3, Status::Pending);
        task.schedule = Schedule::Recurring { day: 10, lead_days: 3 };
        let draft = TaskDraft::from_task(&task);
        assert!(draft.is_recurring);
        assert_eq!(draft.recurring_day, Some(10));
        assert_eq!(draft.lead_days, Some(3));
        assert_eq!(draft.deadline, None);
    }

    #[test]
    fn test_board_stats() {
        let tasks = vec![
            fixed_task(1, Status::Pending),
            fixed_task(2, Status::Pending),
            fixed_task(3, Status::InProgress),
            fixed_task(4, Status::Completed),
        ];
        let stats = BoardStats::from_tasks(&tasks);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.completed, 1);
    }

    #[test]
    fn test_task_serialization_round_trip() {
        let task = fixed_task(1, Status::Pending);
        let json = serde_json::to_string(&task).unwrap();
        let parsed: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, task);
    }
}
