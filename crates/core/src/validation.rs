//! Precondition checks that run before anything touches the store.
//!
//! [`validate_consultation`] is pure: it inspects a [`ConsultationDraft`] and either returns a
//! [`ValidConsultation`] or every field error it found, in a fixed order (`patient_name`,
//! `treatment_notes`, `diagnosis_codes`). Catalog lookups are not done here; the orchestration
//! layer performs them afterwards inside the write transaction.

use crate::codes::DiagnosisCodes;
use crate::constants::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT, PATIENT_NAME_MAX_CHARS};
use crate::{EmrError, EmrResult};
use chrono::{DateTime, Utc};
use emr_types::{NonEmptyText, TextError};
use std::fmt;

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Non-empty list of field errors from one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.field)
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Unvalidated consultation input as supplied by a caller.
#[derive(Debug, Clone, Default)]
pub struct ConsultationDraft {
    pub patient_name: String,
    pub diagnosis_codes: Vec<String>,
    pub treatment_notes: String,
    pub consultation_date: Option<DateTime<Utc>>,
}

/// Consultation input that passed every field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidConsultation {
    pub patient_name: NonEmptyText,
    pub diagnosis_codes: DiagnosisCodes,
    pub treatment_notes: NonEmptyText,
    pub consultation_date: Option<DateTime<Utc>>,
}

/// Runs the field checks for a new consultation.
///
/// # Errors
///
/// Returns every failed check, in field order.
pub fn validate_consultation(draft: ConsultationDraft) -> Result<ValidConsultation, ValidationErrors> {
    let mut errors = Vec::new();

    let patient_name =
        match NonEmptyText::with_max_chars(&draft.patient_name, PATIENT_NAME_MAX_CHARS) {
            Ok(name) => Some(name),
            Err(TextError::Empty) => {
                errors.push(FieldError::new("patient_name", "Patient name is required"));
                None
            }
            Err(TextError::TooLong { max }) => {
                errors.push(FieldError::new(
                    "patient_name",
                    format!("Patient name must be at most {max} characters"),
                ));
                None
            }
        };

    let treatment_notes = match NonEmptyText::new(&draft.treatment_notes) {
        Ok(notes) => Some(notes),
        Err(_) => {
            errors.push(FieldError::new(
                "treatment_notes",
                "Treatment notes are required",
            ));
            None
        }
    };

    let diagnosis_codes = DiagnosisCodes::from_input(&draft.diagnosis_codes);
    if diagnosis_codes.is_empty() {
        errors.push(FieldError::new(
            "diagnosis_codes",
            "At least one diagnosis code is required",
        ));
    }

    match (patient_name, treatment_notes) {
        (Some(patient_name), Some(treatment_notes)) if errors.is_empty() => Ok(ValidConsultation {
            patient_name,
            diagnosis_codes,
            treatment_notes,
            consultation_date: draft.consultation_date,
        }),
        _ => Err(ValidationErrors(errors)),
    }
}

/// Validated `skip`/`limit` pair for consultation listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    skip: i64,
    limit: i64,
}

impl Pagination {
    /// Builds a page request, applying defaults for missing values.
    ///
    /// # Errors
    ///
    /// Returns `EmrError::InvalidPagination` when `skip` is negative or `limit` falls outside
    /// `1..=MAX_LIST_LIMIT`.
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> EmrResult<Self> {
        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);

        if skip < 0 {
            return Err(EmrError::InvalidPagination(format!(
                "skip must be greater than or equal to 0, got {skip}"
            )));
        }
        if !(1..=MAX_LIST_LIMIT).contains(&limit) {
            return Err(EmrError::InvalidPagination(format!(
                "limit must be between 1 and {MAX_LIST_LIMIT}, got {limit}"
            )));
        }

        Ok(Self { skip, limit })
    }

    pub fn skip(&self) -> i64 {
        self.skip
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ConsultationDraft {
        ConsultationDraft {
            patient_name: "Jane Doe".into(),
            diagnosis_codes: vec!["I10".into()],
            treatment_notes: "Monitor BP".into(),
            consultation_date: None,
        }
    }

    #[test]
    fn valid_draft_is_trimmed() {
        let valid = validate_consultation(ConsultationDraft {
            patient_name: "  Jane Doe ".into(),
            diagnosis_codes: vec![" I10 ".into(), " ".into(), "E11.9".into()],
            treatment_notes: "\tMonitor BP\n".into(),
            consultation_date: None,
        })
        .expect("draft should validate");

        assert_eq!(valid.patient_name.as_str(), "Jane Doe");
        assert_eq!(valid.treatment_notes.as_str(), "Monitor BP");
        assert_eq!(valid.diagnosis_codes.as_slice(), ["I10", "E11.9"]);
    }

    #[test]
    fn blank_patient_name_is_rejected() {
        let err = validate_consultation(ConsultationDraft {
            patient_name: "   ".into(),
            ..draft()
        })
        .unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), ["patient_name"]);
        assert_eq!(err.errors()[0].message, "Patient name is required");
    }

    #[test]
    fn overlong_patient_name_is_rejected() {
        let err = validate_consultation(ConsultationDraft {
            patient_name: "x".repeat(PATIENT_NAME_MAX_CHARS + 1),
            ..draft()
        })
        .unwrap_err();
        assert!(err.errors()[0].message.contains("at most 255"));
    }

    #[test]
    fn codes_that_are_all_blank_count_as_missing() {
        let err = validate_consultation(ConsultationDraft {
            diagnosis_codes: vec!["".into(), "  ".into()],
            ..draft()
        })
        .unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), ["diagnosis_codes"]);
    }

    #[test]
    fn every_failure_is_reported_in_field_order() {
        let err = validate_consultation(ConsultationDraft::default()).unwrap_err();
        assert_eq!(
            err.fields().collect::<Vec<_>>(),
            ["patient_name", "treatment_notes", "diagnosis_codes"]
        );
        assert_eq!(
            err.to_string(),
            "patient_name: Patient name is required; \
             treatment_notes: Treatment notes are required; \
             diagnosis_codes: At least one diagnosis code is required"
        );
    }

    #[test]
    fn pagination_defaults_and_bounds() {
        let page = Pagination::new(None, None).unwrap();
        assert_eq!((page.skip(), page.limit()), (0, DEFAULT_LIST_LIMIT));
        assert_eq!(page, Pagination::default());

        assert!(Pagination::new(Some(10), Some(1)).is_ok());
        assert!(Pagination::new(Some(0), Some(MAX_LIST_LIMIT)).is_ok());

        assert!(matches!(
            Pagination::new(Some(-1), None),
            Err(EmrError::InvalidPagination(msg)) if msg.contains("skip")
        ));
        assert!(matches!(
            Pagination::new(None, Some(0)),
            Err(EmrError::InvalidPagination(msg)) if msg.contains("limit")
        ));
        assert!(matches!(
            Pagination::new(None, Some(MAX_LIST_LIMIT + 1)),
            Err(EmrError::InvalidPagination(_))
        ));
    }
}
