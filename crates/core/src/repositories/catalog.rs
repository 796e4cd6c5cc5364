//! Diagnosis code catalog.
//!
//! The catalog is reference data: it is filled by the seed procedure and only read afterwards.
//! [`DiagnosisCatalog`] borrows a connection (or a transaction, via deref) so that callers
//! decide the transaction scope.

use crate::constants::SEARCH_RESULT_LIMIT;
use crate::EmrResult;
use rusqlite::{params, Connection};

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisCode {
    pub id: i64,
    pub code: String,
    pub description: String,
}

pub struct DiagnosisCatalog<'c> {
    conn: &'c Connection,
}

impl<'c> DiagnosisCatalog<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Searches codes and descriptions.
    ///
    /// A missing or blank `term` lists the first [`SEARCH_RESULT_LIMIT`] codes. Otherwise the
    /// trimmed term is matched case-insensitively as a literal substring of either the code or
    /// the description. Results are ordered by code and capped at [`SEARCH_RESULT_LIMIT`];
    /// no match yields an empty list.
    pub fn search(&self, term: Option<&str>) -> EmrResult<Vec<DiagnosisCode>> {
        let term = term.map(str::trim).filter(|t| !t.is_empty());
        let limit = SEARCH_RESULT_LIMIT as i64;

        let codes = match term {
            None => self.first(SEARCH_RESULT_LIMIT)?,
            Some(term) => {
                let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
                let mut stmt = self.conn.prepare(
                    r"SELECT id, code, description FROM diagnosis_codes
                      WHERE lower(code) LIKE ?1 ESCAPE '\'
                         OR lower(description) LIKE ?1 ESCAPE '\'
                      ORDER BY code ASC
                      LIMIT ?2",
                )?;
                let rows = stmt.query_map(params![pattern, limit], diagnosis_code_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(codes)
    }

    /// Exact, case-sensitive lookup.
    pub fn exists(&self, code: &str) -> EmrResult<bool> {
        let found: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM diagnosis_codes WHERE code = ?1)",
            params![code],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    pub fn count(&self) -> EmrResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM diagnosis_codes", [], |row| row.get(0))?;
        Ok(count)
    }

    /// The first `n` codes in code order.
    pub fn first(&self, n: usize) -> EmrResult<Vec<DiagnosisCode>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, code, description FROM diagnosis_codes ORDER BY code ASC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![n as i64], diagnosis_code_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Deletes every entry and inserts `entries` in their place.
    ///
    /// Run this inside a transaction; on its own each statement commits separately. Returns the
    /// number of rows removed.
    pub fn replace_all(&self, entries: &[(&str, &str)]) -> EmrResult<usize> {
        let removed = self.conn.execute("DELETE FROM diagnosis_codes", [])?;

        let mut insert = self
            .conn
            .prepare("INSERT INTO diagnosis_codes (code, description) VALUES (?1, ?2)")?;
        for (code, description) in entries {
            insert.execute(params![code, description])?;
        }

        Ok(removed)
    }
}

fn diagnosis_code_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DiagnosisCode> {
    Ok(DiagnosisCode {
        id: row.get(0)?,
        code: row.get(1)?,
        description: row.get(2)?,
    })
}

/// Escapes `LIKE` wildcards so the term matches literally. Pairs with `ESCAPE '\'`.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
