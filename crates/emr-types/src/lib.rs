//! Validated text primitives shared across the EMR crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The trimmed input is longer than the permitted number of characters
    #[error("Text must be at most {max} characters")]
    TooLong { max: usize },
}

/// A string type that guarantees non-empty, trimmed content.
///
/// Leading and trailing whitespace is removed during construction, so a value such as
/// `"  Jane Doe "` is stored as `"Jane Doe"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Creates a new `NonEmptyText` whose trimmed length is at most `max` characters.
    ///
    /// Length is counted in Unicode scalar values, not bytes.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` for blank input and `TextError::TooLong` when the trimmed
    /// input exceeds `max` characters.
    pub fn with_max_chars(input: impl AsRef<str>, max: usize) -> Result<Self, TextError> {
        let text = Self::new(input)?;
        if text.0.chars().count() > max {
            return Err(TextError::TooLong { max });
        }
        Ok(text)
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_surrounding_whitespace() {
        let text = NonEmptyText::new("  Jane Doe \n").unwrap();
        assert_eq!(text.as_str(), "Jane Doe");
    }

    #[test]
    fn new_rejects_whitespace_only() {
        assert_eq!(NonEmptyText::new(" \t ").unwrap_err(), TextError::Empty);
        assert_eq!(NonEmptyText::new("").unwrap_err(), TextError::Empty);
    }

    #[test]
    fn with_max_chars_counts_characters_after_trimming() {
        assert!(NonEmptyText::with_max_chars("  abc  ", 3).is_ok());
        assert_eq!(
            NonEmptyText::with_max_chars("abcd", 3).unwrap_err(),
            TextError::TooLong { max: 3 }
        );
        // Multi-byte characters count once each.
        assert!(NonEmptyText::with_max_chars("éé", 2).is_ok());
    }
}
