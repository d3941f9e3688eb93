//! Board-member authentication.
//!
//! The dashboard only needs the narrow surface of a hosted auth service:
//! look up the current session, sign up, sign in with a password, sign out.
//! [`AuthProvider`] captures that surface; [`SqliteAuth`] implements it
//! against the local database for self-hosted deployments. Auth failures are
//! recoverable by design — they surface inline on the login form and never
//! abort the process.

use crate::error::{Error, Result};
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// An authenticated board member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Stable identifier used as the owner reference on saved tasks.
    pub user_id: String,
    /// Sign-in e-mail.
    pub email: String,
    /// Full name shown in the header.
    pub display_name: String,
}

/// Trait for the authentication collaborator.
#[allow(clippy::missing_errors_doc)]
pub trait AuthProvider {
    /// The current session, if any.
    fn get_session(&self) -> Option<Session>;

    /// Register a new member and open a session.
    fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<Session>;

    /// Open a session with e-mail and password.
    fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;

    /// Close the current session.
    fn sign_out(&self);
}

/// SQLite-backed auth provider with salted SHA-256 password digests.
#[derive(Debug)]
pub struct SqliteAuth {
    db_path: PathBuf,
    current: RefCell<Option<Session>>,
}

impl SqliteAuth {
    /// Create an auth provider over the given database path.
    ///
    /// # Errors
    ///
    /// Returns an error if the users table cannot be initialized.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let auth =
            Self { db_path: db_path.as_ref().to_path_buf(), current: RefCell::new(None) };
        auth.init_schema()?;
        Ok(auth)
    }

    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;")?;
        Ok(conn)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.open()?;
        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                display_name TEXT NOT NULL DEFAULT '',
                password_salt TEXT NOT NULL,
                password_digest TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
        )?;
        Ok(())
    }
}

/// Generate a random hex salt.
///
/// `RandomState` gives per-process entropy without a dedicated crate; mixed
/// with the clock it is plenty for a salt.
fn generate_salt() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let state = RandomState::new();
    let mut hasher = state.build_hasher();
    hasher.write_u128(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos()),
    );
    format!("{:016x}", hasher.finish())
}

/// Salted SHA-256 digest, hex-encoded.
fn digest_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().iter().map(|b| format!("{b:02x}")).collect()
}

impl AuthProvider for SqliteAuth {
    fn get_session(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<Session> {
        let conn = self.open()?;
        let email = email.trim().to_lowercase();

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
            params![&email],
            |row| row.get(0),
        )?;
        if exists {
            return Err(Error::Auth("E-mail já cadastrado.".to_string()));
        }

        let salt = generate_salt();
        let digest = digest_password(&salt, password);
        conn.execute(
            "INSERT INTO users (email, display_name, password_salt, password_digest)
             VALUES (?1, ?2, ?3, ?4)",
            params![&email, display_name, &salt, &digest],
        )?;
        let id = conn.last_insert_rowid();

        let session =
            Session { user_id: id.to_string(), email, display_name: display_name.to_string() };
        *self.current.borrow_mut() = Some(session.clone());
        Ok(session)
    }

    fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let conn = self.open()?;
        let email = email.trim().to_lowercase();

        let row: Option<(i64, String, String, String)> = conn
            .query_row(
                "SELECT id, display_name, password_salt, password_digest
                 FROM users WHERE email = ?1",
                params![&email],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        let Some((id, display_name, salt, digest)) = row else {
            return Err(Error::Auth("E-mail ou senha inválidos.".to_string()));
        };
        if digest_password(&salt, password) != digest {
            return Err(Error::Auth("E-mail ou senha inválidos.".to_string()));
        }

        let session = Session { user_id: id.to_string(), email, display_name };
        *self.current.borrow_mut() = Some(session.clone());
        Ok(session)
    }

    fn sign_out(&self) {
        *self.current.borrow_mut() = None;
    }
}
