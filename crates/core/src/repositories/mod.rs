//! Table-scoped data access.
//!
//! Each repository borrows a `rusqlite::Connection` (a `Transaction` derefs to one), leaving
//! transaction boundaries to the caller. The catalog is read-only outside the seed procedure;
//! the consultation store owns its table.

pub mod catalog;
pub mod consultations;
