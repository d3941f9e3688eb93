//! Command-line interface for the board dashboard.
//!
//! Each invocation signs in, runs one command against the SQLite store, and
//! exits; the AI commands additionally call the hosted generator.

mod run;

pub use run::{run, CliOutput};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Casa do Estudante board management.
///
/// Most commands require an account; pass credentials with
/// `--email`/`--password` (create one first with `signup`).
#[derive(Parser, Debug)]
#[command(name = "casa-gestao")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory for the database, config, and log. Defaults to the
    /// platform data dir.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Account e-mail.
    #[arg(long, global = true)]
    pub email: Option<String>,

    /// Account password.
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and sign in.
    Signup {
        /// Display name shown on the dashboard.
        #[arg(long)]
        name: String,
    },

    /// List the tasks visible today.
    ///
    /// Applies the same search, role filter, and recurring-task window the
    /// dashboard uses: a recurring task appears only from `lead_days` before
    /// its day of the month through the day itself.
    List {
        /// Free-text search over title and assignee.
        #[arg(long)]
        search: Option<String>,

        /// Restrict to one role ("Tesouraria", ...); "Todos" for all.
        #[arg(long)]
        role: Option<String>,

        /// Day of the month to evaluate recurrence against (default: today).
        #[arg(long)]
        day: Option<i64>,
    },

    /// Add a new task.
    Add {
        /// Task title.
        #[arg(long)]
        title: String,

        /// Person responsible.
        #[arg(long)]
        assignee: String,

        /// Board role ("Presidência", "Tesouraria", ...).
        #[arg(long)]
        role: String,

        /// Status (default "Pendente").
        #[arg(long)]
        status: Option<String>,

        /// Priority (default "Média").
        #[arg(long)]
        priority: Option<String>,

        /// Due date, YYYY-MM-DD. Ignored for recurring tasks.
        #[arg(long)]
        deadline: Option<String>,

        /// Free-form notes.
        #[arg(long, default_value = "")]
        notes: String,

        /// Repeat monthly on this day (1-31) instead of a fixed date.
        #[arg(long)]
        recurring_day: Option<i64>,

        /// Days of advance visibility for a recurring task (default 3).
        #[arg(long)]
        lead_days: Option<i64>,
    },

    /// Mark a task as completed.
    Done {
        /// Task id (see `list`).
        id: i64,
    },

    /// Permanently delete a task.
    Delete {
        /// Task id (see `list`).
        id: i64,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Export every task to a CSV file.
    Export {
        /// Output path (default: `Gestao_Casa_Estudante_<date>.csv`).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Generate an action plan for a task.
    Plan {
        /// Task id (see `list`).
        id: i64,
    },

    /// Generate a communication draft for a task.
    Draft {
        /// Task id (see `list`).
        id: i64,
    },

    /// Generate a management summary over every task.
    Summary,

    /// Show session, schema, and task-count status.
    Status,

    /// Add the recurring-task columns to the database.
    Migrate,

    /// Show version information.
    Version,
}

impl Command {
    /// Whether the command needs a signed-in session.
    #[must_use]
    pub const fn needs_session(&self) -> bool {
        !matches!(self, Self::Signup { .. } | Self::Migrate | Self::Version)
    }
}
