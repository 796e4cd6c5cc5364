//! The ordered list of diagnosis codes attached to a consultation.
//!
//! In the `consultations` table the list is a single TEXT column holding a JSON array of
//! strings. [`DiagnosisCodes`] is the typed view of that column; conversion in both directions
//! goes through [`DiagnosisCodes::to_column`] and [`DiagnosisCodes::from_column`] only.

use crate::{EmrError, EmrResult};
use serde::{Deserialize, Serialize};

/// Ordered sequence of diagnosis code strings. Order and duplicates are preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosisCodes(Vec<String>);

impl DiagnosisCodes {
    /// Trims every entry and drops the ones that end up blank.
    pub fn from_input<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            codes
                .into_iter()
                .map(|c| c.as_ref().trim().to_owned())
                .filter(|c| !c.is_empty())
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Serializes the list into its column representation.
    ///
    /// # Errors
    ///
    /// Returns `EmrError::Serialization` if JSON encoding fails.
    pub fn to_column(&self) -> EmrResult<String> {
        serde_json::to_string(self).map_err(EmrError::Serialization)
    }

    /// Parses the column representation back into a list.
    ///
    /// # Errors
    ///
    /// Returns `EmrError::Deserialization` if the column is not a JSON array of strings.
    pub fn from_column(column: &str) -> EmrResult<Self> {
        serde_json::from_str::<Self>(column).map_err(EmrError::Deserialization)
    }
}

impl From<Vec<String>> for DiagnosisCodes {
    fn from(codes: Vec<String>) -> Self {
        Self(codes)
    }
}
