//! Validation and orchestration layer.
//!
//! [`EmrService`] is the only entry point the API crates use. It is stateless between calls:
//! each operation opens its own connection, runs at most one transaction and drops both before
//! returning. Domain failures (validation, unknown diagnosis code, missing consultation) come
//! back as distinct [`EmrError`] variants so callers never have to guess them from store errors.

use crate::config::CoreConfig;
use crate::db::Database;
use crate::repositories::catalog::{DiagnosisCatalog, DiagnosisCode};
use crate::repositories::consultations::{
    Consultation, ConsultationPage, ConsultationStore, NewConsultation,
};
use crate::validation::{validate_consultation, ConsultationDraft, Pagination};
use crate::{EmrError, EmrResult};
use chrono::{DateTime, Utc};
use rusqlite::TransactionBehavior;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct EmrService {
    db: Database,
}

impl EmrService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            db: Database::new(cfg),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Searches the diagnosis catalog. See [`DiagnosisCatalog::search`].
    pub fn search_diagnosis_codes(&self, term: Option<&str>) -> EmrResult<Vec<DiagnosisCode>> {
        let conn = self.db.connect()?;
        DiagnosisCatalog::new(&conn).search(term)
    }

    /// Validates and stores a new consultation.
    ///
    /// Field checks run first and touch nothing. The catalog check and the insert then share
    /// one immediate write transaction: if any code is unknown the transaction is dropped
    /// without commit, so no row is written.
    ///
    /// # Errors
    ///
    /// - `EmrError::Validation` for empty or overlong fields.
    /// - `EmrError::InvalidDiagnosisCode` naming the first code missing from the catalog.
    /// - Store errors for anything else.
    pub fn create_consultation(&self, draft: ConsultationDraft) -> EmrResult<Consultation> {
        self.create_consultation_at(draft, Utc::now())
    }

    fn create_consultation_at(
        &self,
        draft: ConsultationDraft,
        now: DateTime<Utc>,
    ) -> EmrResult<Consultation> {
        let valid = validate_consultation(draft).map_err(|errors| {
            tracing::warn!(
                fields = ?errors.fields().collect::<Vec<_>>(),
                "consultation rejected by field validation"
            );
            EmrError::from(errors)
        })?;

        let mut conn = self.db.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let catalog = DiagnosisCatalog::new(&tx);
        for code in valid.diagnosis_codes.iter() {
            if !catalog.exists(code)? {
                tracing::warn!(code, "consultation rejected: unknown diagnosis code");
                return Err(EmrError::InvalidDiagnosisCode(code.to_owned()));
            }
        }

        let new = NewConsultation {
            patient_name: valid.patient_name,
            diagnosis_codes: valid.diagnosis_codes,
            treatment_notes: valid.treatment_notes,
            consultation_date: valid.consultation_date.unwrap_or(now),
            created_at: now,
        };
        let consultation = ConsultationStore::new(&tx).create(&new)?;
        tx.commit()?;

        tracing::info!(id = consultation.id, "consultation created");
        Ok(consultation)
    }

    /// Lists consultations, newest consultation date first, with the total count.
    pub fn list_consultations(&self, page: Pagination) -> EmrResult<ConsultationPage> {
        let mut conn = self.db.connect()?;
        let tx = conn.transaction()?;
        let page = ConsultationStore::new(&tx).list(page)?;
        tx.commit()?;
        Ok(page)
    }

    /// # Errors
    ///
    /// Returns `EmrError::ConsultationNotFound` when the id does not exist.
    pub fn get_consultation(&self, id: i64) -> EmrResult<Consultation> {
        let conn = self.db.connect()?;
        ConsultationStore::new(&conn).get(id)
    }

    /// Permanently deletes a consultation.
    ///
    /// # Errors
    ///
    /// Returns `EmrError::ConsultationNotFound` when the id does not exist, including when it
    /// was deleted by an earlier call.
    pub fn delete_consultation(&self, id: i64) -> EmrResult<()> {
        let mut conn = self.db.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let store = ConsultationStore::new(&tx);
        store.get(id)?;
        store.delete(id)?;
        tx.commit()?;

        tracing::info!(id, "consultation deleted");
        Ok(())
    }
}
