//! Session orchestration: authentication, schema negotiation, the cached
//! task list, and the AI panel.
//!
//! One [`Dashboard`] corresponds to one user session. The schema capability
//! is negotiated exactly once per session, right after authentication and
//! before the first fetch, and then handed explicitly to every store call.
//! Mutations never patch the local list — each save or delete re-fetches, so
//! the list always reflects the store's authoritative state.

use crate::ai::{AiAssistant, TextGenerator};
use crate::auth::{AuthProvider, Session};
use crate::error::{Error, Result};
use crate::logging;
use crate::tasks::export::export_csv;
use crate::tasks::filter::visible_tasks;
use crate::tasks::models::{BoardStats, RoleFilter, Task, TaskDraft};
use crate::tasks::schema::{self, SchemaCapability};
use crate::tasks::store::TaskStore;

/// The three AI actions a user can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiRequestKind {
    /// Step-by-step plan for one task.
    ActionPlan,
    /// Formal message draft for one task.
    CommunicationDraft,
    /// Status summary over the whole list.
    SmartSummary,
}

impl AiRequestKind {
    /// Modal title for the request.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::ActionPlan => "✨ Plano de Ação Sugerido",
            Self::CommunicationDraft => "✉️ Rascunho de Comunicado",
            Self::SmartSummary => "📊 Resumo Inteligente da Gestão",
        }
    }
}

/// Token identifying one in-flight AI request.
///
/// Responses are applied only while their token is still the panel's newest;
/// anything older is discarded, so a reply that arrives after the user has
/// already started another request cannot clobber it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// State backing the AI result modal.
#[derive(Debug, Default)]
pub struct AiPanel {
    /// Whether the modal is shown.
    pub open: bool,
    /// Modal title.
    pub title: String,
    /// Result text, or the failure message.
    pub content: String,
    /// Whether a request is outstanding.
    pub loading: bool,
    next_token: u64,
    current: Option<u64>,
}

impl AiPanel {
    /// Open the panel for a new request and mint its token.
    pub fn begin(&mut self, kind: AiRequestKind) -> RequestToken {
        self.open = true;
        self.title = kind.title().to_string();
        self.content.clear();
        self.loading = true;
        self.next_token += 1;
        self.current = Some(self.next_token);
        RequestToken(self.next_token)
    }

    /// Apply a finished request. Returns whether the outcome was accepted;
    /// stale tokens are dropped without touching the panel.
    pub fn apply(&mut self, token: RequestToken, outcome: Result<String>) -> bool {
        if self.current != Some(token.0) {
            return false;
        }
        self.content = match outcome {
            Ok(text) => text,
            Err(err) => err.to_string(),
        };
        self.loading = false;
        true
    }

    /// Hide the modal. The content (and any outstanding token) survives, so
    /// reopening shows whatever last arrived.
    pub fn close(&mut self) {
        self.open = false;
    }
}

/// One authenticated dashboard session.
pub struct Dashboard {
    store: Box<dyn TaskStore>,
    auth: Box<dyn AuthProvider>,
    generator: Box<dyn TextGenerator>,
    session: Option<Session>,
    capability: SchemaCapability,
    tasks: Vec<Task>,
    /// Current free-text search term.
    pub search: String,
    /// Current role filter.
    pub role_filter: RoleFilter,
    /// State of the AI result modal.
    pub ai_panel: AiPanel,
}

impl Dashboard {
    /// Wire a dashboard over its three collaborators.
    #[must_use]
    pub fn new(
        store: Box<dyn TaskStore>,
        auth: Box<dyn AuthProvider>,
        generator: Box<dyn TextGenerator>,
    ) -> Self {
        Self {
            store,
            auth,
            generator,
            session: None,
            capability: SchemaCapability::Unknown,
            tasks: Vec::new(),
            search: String::new(),
            role_filter: RoleFilter::All,
            ai_panel: AiPanel::default(),
        }
    }

    /// The current session, if signed in.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The capability negotiated for this session.
    #[must_use]
    pub const fn capability(&self) -> SchemaCapability {
        self.capability
    }

    /// The cached task list, as last fetched.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Register a new member and start a session.
    ///
    /// # Errors
    ///
    /// Returns an error if sign-up fails; the dashboard stays signed out.
    pub fn sign_up(&mut self, email: &str, password: &str, display_name: &str) -> Result<()> {
        let session = self.auth.sign_up(email, password, display_name)?;
        self.start_session(session);
        Ok(())
    }

    /// Sign in and start a session.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails; the dashboard stays signed
    /// out and the caller shows the message inline.
    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<()> {
        let session = self.auth.sign_in_with_password(email, password)?;
        self.start_session(session);
        Ok(())
    }

    /// Resume an existing session, if the auth provider has one.
    pub fn resume(&mut self) -> bool {
        if let Some(session) = self.auth.get_session() {
            self.start_session(session);
            true
        } else {
            false
        }
    }

    /// Sign out and drop all session state. A future session re-probes.
    pub fn sign_out(&mut self) {
        self.auth.sign_out();
        self.session = None;
        self.capability = SchemaCapability::Unknown;
        self.tasks.clear();
    }

    /// Probe once, then run the first fetch.
    fn start_session(&mut self, session: Session) {
        self.session = Some(session);
        self.capability = schema::negotiate(self.store.as_ref());
        self.refresh();
    }

    /// Re-fetch the task list from the store.
    ///
    /// Read failures are logged and leave the previous list in place; the
    /// session stays usable.
    pub fn refresh(&mut self) {
        match self.store.list_tasks(self.capability) {
            Ok(tasks) => self.tasks = tasks,
            Err(err) => logging::log(&format!("erro ao buscar tarefas: {err}")),
        }
    }

    /// Save a draft (create or update), then re-fetch.
    ///
    /// # Errors
    ///
    /// Returns an error when not signed in or when the write fails; write
    /// failures are surfaced to the user rather than logged away.
    pub fn save_task(&mut self, draft: &TaskDraft) -> Result<()> {
        let owner = self.session.as_ref().ok_or(Error::NotSignedIn)?.user_id.clone();
        self.store.save_task(draft, self.capability, &owner)?;
        self.refresh();
        Ok(())
    }

    /// Permanently delete a task, then re-fetch. The caller is responsible
    /// for having confirmed the deletion with the user.
    ///
    /// # Errors
    ///
    /// Returns an error when not signed in or when the delete fails.
    pub fn delete_task(&mut self, id: i64) -> Result<bool> {
        if self.session.is_none() {
            return Err(Error::NotSignedIn);
        }
        let removed = self.store.delete_task(id)?;
        self.refresh();
        Ok(removed)
    }

    /// The tasks to display for the given day of the month, applying search,
    /// role filter, and the recurrence window.
    #[must_use]
    pub fn visible(&self, today: i64) -> Vec<&Task> {
        visible_tasks(&self.tasks, &self.search, self.role_filter, today)
    }

    /// Stat-card counts over the full (unfiltered) list.
    #[must_use]
    pub fn stats(&self) -> BoardStats {
        BoardStats::from_tasks(&self.tasks)
    }

    /// CSV text for the full (unfiltered) list.
    #[must_use]
    pub fn export_csv(&self) -> String {
        export_csv(&self.tasks, self.capability)
    }

    /// Advisory banner text while the store lacks the recurrence columns.
    #[must_use]
    pub fn schema_advisory(&self) -> Option<String> {
        self.capability.is_unsupported().then(schema::advisory)
    }

    fn required_id(task_id: Option<i64>) -> Result<i64> {
        task_id.ok_or_else(|| Error::Task("nenhuma tarefa selecionada".into()))
    }

    fn find_task(&self, id: i64) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::Task(format!("tarefa {id} não encontrada").into()))
    }

    /// Run an AI request end to end, routing the outcome through the panel's
    /// token check. The panel ends up showing either the generated text or
    /// the generic failure message.
    ///
    /// # Errors
    ///
    /// Returns an error only when the referenced task does not exist; AI
    /// failures land in the panel content instead.
    pub fn request_ai(&mut self, kind: AiRequestKind, task_id: Option<i64>) -> Result<()> {
        // Resolve the target before opening the modal, so a bad id never
        // leaves the panel stuck on loading.
        let task = match kind {
            AiRequestKind::SmartSummary => None,
            AiRequestKind::ActionPlan | AiRequestKind::CommunicationDraft => {
                Some(self.find_task(Self::required_id(task_id)?)?.clone())
            }
        };

        let token = self.ai_panel.begin(kind);
        let assistant = AiAssistant::new(self.generator.as_ref());
        let outcome = match (kind, &task) {
            (AiRequestKind::ActionPlan, Some(task)) => assistant.action_plan(task),
            (AiRequestKind::CommunicationDraft, Some(task)) => {
                assistant.communication_draft(task)
            }
            _ => assistant.smart_summary(&self.tasks),
        };
        self.ai_panel.apply(token, outcome);
        Ok(())
    }
}
