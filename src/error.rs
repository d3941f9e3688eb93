//! Error types for `casa_gestao`.

use std::path::PathBuf;

/// Errors that can occur in the board dashboard core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A `SQLite` database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An HTTP transport error occurred.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A template error occurred.
    #[error("Template error: {0}")]
    Template(String),

    /// A file was not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// An authentication attempt failed. Shown inline on the login form,
    /// never fatal.
    #[error("{0}")]
    Auth(String),

    /// The AI collaborator could not be reached or returned garbage.
    /// Rendered as the modal's content text.
    #[error("Falha ao conectar com a inteligência artificial.")]
    AiUnavailable,

    /// No authenticated session where one is required.
    #[error("Nenhuma sessão ativa. Faça login primeiro.")]
    NotSignedIn,

    /// A task-related error occurred.
    #[error("{0}")]
    Task(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
