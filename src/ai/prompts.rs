//! Prompt builders for the three AI actions.

use crate::error::Result;
use crate::tasks::models::Task;
use crate::templates;

/// Render the action-plan prompt for a task.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn action_plan(task: &Task) -> Result<String> {
    templates::render("prompts/action_plan.tera", &task_context(task))
}

/// Render the communication-draft prompt for a task.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn communication_draft(task: &Task) -> Result<String> {
    templates::render("prompts/communication_draft.tera", &task_context(task))
}

/// Render the management-summary prompt over the whole task list.
///
/// Each task contributes one `- [status] title (role)` line.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn smart_summary(tasks: &[Task]) -> Result<String> {
    let task_lines = tasks
        .iter()
        .map(|t| format!("- [{}] {} ({})", t.status, t.title, t.role))
        .collect::<Vec<_>>()
        .join("\n");

    let mut context = templates::context();
    context.insert("task_lines", &task_lines);
    templates::render("prompts/smart_summary.tera", &context)
}

fn task_context(task: &Task) -> tera::Context {
    let mut context = templates::context();
    context.insert("title", &task.title);
    context.insert("assignee", &task.assignee);
    context.insert("role", task.role.as_str());
    context.insert("notes", &task.notes);
    context
}
