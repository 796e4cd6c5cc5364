//! Consultation store.
//!
//! Rows in `consultations` are owned exclusively by this module. Timestamps are stored as
//! fixed-width RFC 3339 UTC text with microsecond precision, so ordering the text column orders
//! the instants. The diagnosis code list is stored through [`DiagnosisCodes::to_column`].

use crate::codes::DiagnosisCodes;
use crate::validation::Pagination;
use crate::{EmrError, EmrResult};
use chrono::{DateTime, SecondsFormat, Utc};
use emr_types::NonEmptyText;
use rusqlite::{params, Connection, OptionalExtension};

/// A persisted patient consultation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consultation {
    pub id: i64,
    pub patient_name: String,
    pub diagnosis_codes: DiagnosisCodes,
    pub treatment_notes: String,
    pub consultation_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A consultation ready to be inserted. Every field has already been validated.
#[derive(Debug, Clone)]
pub struct NewConsultation {
    pub patient_name: NonEmptyText,
    pub diagnosis_codes: DiagnosisCodes,
    pub treatment_notes: NonEmptyText,
    pub consultation_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// One page of consultations plus the size of the whole table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultationPage {
    pub consultations: Vec<Consultation>,
    pub total: i64,
}

pub struct ConsultationStore<'c> {
    conn: &'c Connection,
}

impl<'c> ConsultationStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Inserts one row and returns it as stored.
    pub fn create(&self, new: &NewConsultation) -> EmrResult<Consultation> {
        let codes = new.diagnosis_codes.to_column()?;
        self.conn.execute(
            "INSERT INTO consultations
                (patient_name, diagnosis_codes, treatment_notes, consultation_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.patient_name.as_str(),
                codes,
                new.treatment_notes.as_str(),
                timestamp_to_column(&new.consultation_date),
                timestamp_to_column(&new.created_at),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get(id)
    }

    /// Returns the requested page, newest consultation date first, plus the total row count.
    ///
    /// Call this on a transaction to read the page and the total from one snapshot.
    pub fn list(&self, page: Pagination) -> EmrResult<ConsultationPage> {
        let total = self.count()?;

        let mut stmt = self.conn.prepare(
            "SELECT id, patient_name, diagnosis_codes, treatment_notes, consultation_date, created_at
             FROM consultations
             ORDER BY consultation_date DESC, id DESC
             LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt.query_map(params![page.limit(), page.skip()], ConsultationRow::read)?;

        let mut consultations = Vec::new();
        for row in rows {
            consultations.push(row?.into_consultation()?);
        }

        Ok(ConsultationPage {
            consultations,
            total,
        })
    }

    pub fn count(&self) -> EmrResult<i64> {
        let total = self
            .conn
            .query_row("SELECT COUNT(*) FROM consultations", [], |row| row.get(0))?;
        Ok(total)
    }

    pub fn find(&self, id: i64) -> EmrResult<Option<Consultation>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, patient_name, diagnosis_codes, treatment_notes, consultation_date, created_at
                 FROM consultations WHERE id = ?1",
                params![id],
                ConsultationRow::read,
            )
            .optional()?;

        row.map(ConsultationRow::into_consultation).transpose()
    }

    /// # Errors
    ///
    /// Returns `EmrError::ConsultationNotFound` when no row has this id.
    pub fn get(&self, id: i64) -> EmrResult<Consultation> {
        self.find(id)?.ok_or(EmrError::ConsultationNotFound(id))
    }

    /// Permanently removes one row.
    ///
    /// # Errors
    ///
    /// Returns `EmrError::ConsultationNotFound` when no row has this id.
    pub fn delete(&self, id: i64) -> EmrResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM consultations WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(EmrError::ConsultationNotFound(id));
        }
        Ok(())
    }
}

// Raw column values, converted outside the rusqlite row callback so that JSON and timestamp
// failures surface as `EmrError` rather than `rusqlite::Error`.
struct ConsultationRow {
    id: i64,
    patient_name: String,
    diagnosis_codes: String,
    treatment_notes: String,
    consultation_date: String,
    created_at: String,
}

impl ConsultationRow {
    fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_name: row.get(1)?,
            diagnosis_codes: row.get(2)?,
            treatment_notes: row.get(3)?,
            consultation_date: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn into_consultation(self) -> EmrResult<Consultation> {
        Ok(Consultation {
            id: self.id,
            patient_name: self.patient_name,
            diagnosis_codes: DiagnosisCodes::from_column(&self.diagnosis_codes)?,
            treatment_notes: self.treatment_notes,
            consultation_date: timestamp_from_column(&self.consultation_date)?,
            created_at: timestamp_from_column(&self.created_at)?,
        })
    }
}

pub(crate) fn timestamp_to_column(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn timestamp_from_column(value: &str) -> EmrResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| EmrError::InvalidTimestamp(value.to_owned()))
}
