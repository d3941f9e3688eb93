//! List visibility: search, role filter, and the recurrence window.

use crate::tasks::models::{RoleFilter, Schedule, Task};

/// Whether a task's schedule makes it visible on the given day of the month.
///
/// A recurring task is shown from `day - lead_days` through `day`, inclusive.
/// The window deliberately does not wrap around month boundaries: with
/// `day = 3` and `lead_days = 5` the start lands at `-2`, so the task is
/// simply visible on every day from the 1st through the 3rd. No modular
/// arithmetic, no clamping — the historical behavior is part of the contract.
/// Fixed-deadline tasks are always visible.
#[must_use]
pub const fn in_recurrence_window(schedule: &Schedule, today: i64) -> bool {
    match *schedule {
        Schedule::Fixed { .. } => true,
        Schedule::Recurring { day, lead_days } => {
            let start = day - lead_days;
            start <= today && today <= day
        }
    }
}

/// Whether a task matches the free-text search term.
///
/// Case-insensitive substring match against the title or the assignee name.
/// An empty term matches everything.
#[must_use]
pub fn matches_search(task: &Task, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    task.title.to_lowercase().contains(&needle) || task.assignee.to_lowercase().contains(&needle)
}

/// Whether a task passes all three display filters.
#[must_use]
pub fn is_visible(task: &Task, search: &str, role: RoleFilter, today: i64) -> bool {
    matches_search(task, search)
        && role.matches(task.role)
        && in_recurrence_window(&task.schedule, today)
}

/// Select the tasks to display, preserving input order.
///
/// `today` is the current day of the month (1-31). Filtering is pure and
/// total: malformed recurrence values are consumed as given, never validated
/// here.
#[must_use]
pub fn visible_tasks<'a>(
    tasks: &'a [Task],
    search: &str,
    role: RoleFilter,
    today: i64,
) -> Vec<&'a Task> {
    tasks.iter().filter(|t| is_visible(t, search, role, today)).collect()
}
