//! Constants used throughout the EMR core crate.
//!
//! Limits, defaults and table names live here so that the store, the validation layer and the
//! API agree on them.

/// Default SQLite database file when no explicit path is configured.
pub const DEFAULT_DATABASE_PATH: &str = "emr.db";

/// Default time SQLite waits on a locked database before reporting `SQLITE_BUSY`.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Maximum number of diagnosis codes returned by a catalog search.
pub const SEARCH_RESULT_LIMIT: usize = 20;

/// Default page size for consultation listings.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Largest page size a caller may request for consultation listings.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Maximum length of a patient name, in characters.
pub const PATIENT_NAME_MAX_CHARS: usize = 255;

