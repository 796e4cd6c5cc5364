//! SQLite store handle.
//!
//! [`Database`] is a cheap, cloneable handle that knows *where* the store lives. It never keeps
//! a connection open between operations: every service call acquires its own connection with
//! [`Database::connect`] and drops it on return, whether that return is a success, a domain
//! error or a store failure.

use crate::config::CoreConfig;
use crate::{EmrError, EmrResult};
use rusqlite::Connection;
use std::sync::Arc;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS diagnosis_codes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    code        TEXT    NOT NULL UNIQUE,
    description TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS consultations (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_name      TEXT    NOT NULL,
    diagnosis_codes   TEXT    NOT NULL DEFAULT '[]',
    treatment_notes   TEXT    NOT NULL,
    consultation_date TEXT    NOT NULL,
    created_at        TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_consultations_consultation_date
    ON consultations (consultation_date);
CREATE INDEX IF NOT EXISTS idx_consultations_patient_name
    ON consultations (patient_name);
";

#[derive(Clone, Debug)]
pub struct Database {
    cfg: Arc<CoreConfig>,
}

impl Database {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Creates the tables and indexes if they do not exist yet.
    ///
    /// Safe to call on every startup; existing rows are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `EmrError::DatabaseOpen` if the file cannot be opened and
    /// `EmrError::SchemaInit` if the DDL fails.
    pub fn initialise(&self) -> EmrResult<()> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA).map_err(EmrError::SchemaInit)?;
        tracing::debug!(path = %self.cfg.database_path().display(), "database schema ready");
        Ok(())
    }

    /// Opens a fresh connection scoped to a single operation.
    ///
    /// # Errors
    ///
    /// Returns `EmrError::DatabaseOpen` if SQLite cannot open the configured file.
    pub fn connect(&self) -> EmrResult<Connection> {
        let path = self.cfg.database_path();
        let conn = Connection::open(path).map_err(|source| EmrError::DatabaseOpen {
            path: path.to_path_buf(),
            source,
        })?;
        conn.busy_timeout(self.cfg.busy_timeout())?;
        Ok(conn)
    }
}
