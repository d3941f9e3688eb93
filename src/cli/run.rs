//! Command execution for the CLI.
//!
//! This module handles running CLI commands and producing output.

use crate::ai::{GeminiClient, GeminiConfig, TextGenerator};
use crate::auth::SqliteAuth;
use crate::cli::{Cli, Command};
use crate::config::{self, AppConfig};
use crate::dashboard::{AiRequestKind, Dashboard};
use crate::error::{Error, Result};
use crate::logging;
use crate::tasks::export::export_filename;
use crate::tasks::models::{BoardRole, Priority, RoleFilter, Schedule, Status, Task, TaskDraft};
use crate::tasks::store::SqliteTaskStore;
use chrono::{Datelike, Local};
use std::process::ExitCode;

/// Output from running the CLI, with separate stdout and stderr messages.
#[derive(Debug)]
pub struct CliOutput {
    /// Exit code for the process.
    pub exit_code: ExitCode,
    /// Messages to print to stdout.
    pub stdout: Vec<String>,
    /// Messages to print to stderr.
    pub stderr: Vec<String>,
}

impl CliOutput {
    fn success(stdout: Vec<String>, stderr: Vec<String>) -> Self {
        Self { exit_code: ExitCode::SUCCESS, stdout, stderr }
    }

    fn failure(message: String) -> Self {
        Self { exit_code: ExitCode::from(1), stdout: vec![], stderr: vec![message] }
    }
}

/// Generator used when no API key is configured. Requests fail with the same
/// message a network failure produces.
struct OfflineGenerator;

impl TextGenerator for OfflineGenerator {
    fn generate(&self, _prompt: &str) -> Result<String> {
        logging::log("AI request without a configured GEMINI_API_KEY");
        Err(Error::AiUnavailable)
    }
}

/// Run a parsed CLI invocation.
#[must_use]
pub fn run(cli: Cli) -> CliOutput {
    match execute(cli) {
        Ok(output) => output,
        Err(e) => CliOutput::failure(format!("Erro: {e}")),
    }
}

fn execute(cli: Cli) -> Result<CliOutput> {
    if matches!(cli.command, Command::Version) {
        return Ok(CliOutput::success(vec![], vec![format!("casa-gestao v{}", crate::VERSION)]));
    }

    let data_dir = cli.data_dir.clone().unwrap_or_else(config::default_data_dir);
    let _ = logging::init(&data_dir);
    let app_config = AppConfig::load_from(&data_dir)?;
    let db_path = app_config.db_path(&data_dir);

    let store = SqliteTaskStore::new(&db_path)?;

    if matches!(cli.command, Command::Migrate) {
        store.apply_recurrence_migration()?;
        return Ok(CliOutput::success(
            vec![],
            vec!["Colunas de recorrência adicionadas ao banco de dados.".to_string()],
        ));
    }

    let auth = SqliteAuth::new(&db_path)?;
    let generator: Box<dyn TextGenerator> = match app_config.gemini_api_key() {
        Some(key) => Box::new(GeminiClient::new(
            GeminiConfig::new(key).with_model(app_config.gemini_model()),
        )?),
        None => Box::new(OfflineGenerator),
    };
    let mut dashboard = Dashboard::new(Box::new(store), Box::new(auth), generator);

    let email = cli.email.as_deref().ok_or_else(|| Error::Auth("informe --email".into()))?;
    let password =
        cli.password.as_deref().ok_or_else(|| Error::Auth("informe --password".into()))?;

    if let Command::Signup { name } = &cli.command {
        dashboard.sign_up(email, password, name)?;
        let mut messages = vec![format!("Conta criada para {name}.")];
        if let Some(advisory) = dashboard.schema_advisory() {
            messages.push(advisory);
        }
        return Ok(CliOutput::success(vec![], messages));
    }

    dashboard.sign_in(email, password)?;

    match cli.command {
        Command::List { search, role, day } => run_list(&mut dashboard, search, role, day),
        Command::Add {
            title,
            assignee,
            role,
            status,
            priority,
            deadline,
            notes,
            recurring_day,
            lead_days,
        } => {
            let draft = build_draft(
                title,
                assignee,
                &role,
                status.as_deref(),
                priority.as_deref(),
                deadline.as_deref(),
                notes,
                recurring_day,
                lead_days,
            )?;
            dashboard.save_task(&draft)?;
            let mut messages = vec!["Tarefa salva.".to_string()];
            if draft.is_recurring && dashboard.capability().is_unsupported() {
                messages.push(
                    "Aviso: a recorrência foi descartada; rode `casa-gestao migrate`.".to_string(),
                );
            }
            Ok(CliOutput::success(vec![], messages))
        }
        Command::Done { id } => {
            let task = dashboard
                .tasks()
                .iter()
                .find(|t| t.id == id)
                .ok_or_else(|| Error::Task(format!("tarefa {id} não encontrada").into()))?;
            let mut draft = TaskDraft::from_task(task);
            draft.status = Status::Completed;
            dashboard.save_task(&draft)?;
            Ok(CliOutput::success(vec![], vec![format!("Tarefa {id} concluída.")]))
        }
        Command::Delete { id, yes } => {
            if !yes {
                return Ok(CliOutput::failure(format!(
                    "A exclusão é permanente. Rode novamente com --yes para excluir a tarefa {id}."
                )));
            }
            if dashboard.delete_task(id)? {
                Ok(CliOutput::success(vec![], vec![format!("Tarefa {id} excluída.")]))
            } else {
                Ok(CliOutput::failure(format!("Tarefa {id} não encontrada.")))
            }
        }
        Command::Export { output } => {
            let path =
                output.unwrap_or_else(|| export_filename(Local::now().date_naive()).into());
            std::fs::write(&path, dashboard.export_csv())?;
            Ok(CliOutput::success(vec![], vec![format!("Exportado para {}.", path.display())]))
        }
        Command::Plan { id } => run_ai(&mut dashboard, AiRequestKind::ActionPlan, Some(id)),
        Command::Draft { id } => run_ai(&mut dashboard, AiRequestKind::CommunicationDraft, Some(id)),
        Command::Summary => run_ai(&mut dashboard, AiRequestKind::SmartSummary, None),
        Command::Status => run_status(&dashboard),
        Command::Signup { .. } | Command::Migrate | Command::Version => unreachable!(),
    }
}

fn run_list(
    dashboard: &mut Dashboard,
    search: Option<String>,
    role: Option<String>,
    day: Option<i64>,
) -> Result<CliOutput> {
    if let Some(search) = search {
        dashboard.search = search;
    }
    if let Some(role) = role {
        dashboard.role_filter = RoleFilter::from_str(&role).map_err(|e| Error::Task(Box::new(e)))?;
    }
    let today = day.unwrap_or_else(|| i64::from(Local::now().day()));

    let mut stdout: Vec<String> =
        dashboard.visible(today).into_iter().map(format_task).collect();
    if stdout.is_empty() {
        stdout.push("Nenhuma tarefa visível hoje.".to_string());
    }

    let mut stderr = Vec::new();
    if let Some(advisory) = dashboard.schema_advisory() {
        stderr.push(advisory);
    }
    Ok(CliOutput::success(stdout, stderr))
}

fn format_task(task: &Task) -> String {
    let due = match task.schedule {
        Schedule::Fixed { deadline } => deadline.format("%d/%m/%Y").to_string(),
        Schedule::Recurring { day, .. } => format!("Todo dia {day}"),
    };
    format!(
        "#{} [{}] [{}] {} — {} ({}) — {}",
        task.id, task.status, task.priority, task.title, task.assignee, task.role, due
    )
}

#[allow(clippy::too_many_arguments)]
fn build_draft(
    title: String,
    assignee: String,
    role: &str,
    status: Option<&str>,
    priority: Option<&str>,
    deadline: Option<&str>,
    notes: String,
    recurring_day: Option<i64>,
    lead_days: Option<i64>,
) -> Result<TaskDraft> {
    let role = BoardRole::from_str(role).map_err(|e| Error::Task(Box::new(e)))?;
    let status = match status {
        Some(s) => Status::from_str(s).map_err(|e| Error::Task(Box::new(e)))?,
        None => Status::default(),
    };
    let priority = match priority {
        Some(p) => Priority::from_str(p).map_err(|e| Error::Task(Box::new(e)))?,
        None => Priority::default(),
    };
    let deadline = match deadline {
        Some(d) => Some(
            chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|e| Error::Task(format!("data inválida {d:?}: {e}").into()))?,
        ),
        None => None,
    };

    Ok(TaskDraft {
        id: None,
        title,
        assignee,
        role,
        status,
        priority,
        deadline,
        notes,
        is_recurring: recurring_day.is_some(),
        recurring_day,
        lead_days: recurring_day.is_some().then(|| lead_days.unwrap_or(3)),
    })
}

fn run_ai(
    dashboard: &mut Dashboard,
    kind: AiRequestKind,
    task_id: Option<i64>,
) -> Result<CliOutput> {
    dashboard.request_ai(kind, task_id)?;
    Ok(CliOutput::success(
        vec![dashboard.ai_panel.content.clone()],
        vec![dashboard.ai_panel.title.clone()],
    ))
}

fn run_status(dashboard: &Dashboard) -> Result<CliOutput> {
    let session = dashboard.session().ok_or(Error::NotSignedIn)?;
    let stats = dashboard.stats();
    let mut messages = vec![
        format!("Sessão: {} <{}>", session.display_name, session.email),
        format!(
            "Tarefas: {} no total ({} pendentes, {} em andamento, {} concluídas)",
            stats.total, stats.pending, stats.in_progress, stats.completed
        ),
    ];
    match dashboard.schema_advisory() {
        Some(advisory) => messages.push(advisory),
        None => messages.push("Recorrência: suportada pelo banco de dados.".to_string()),
    }
    Ok(CliOutput::success(vec![], messages))
}
