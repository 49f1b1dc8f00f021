//! # Uhura Types
//!
//! Validated text newtypes shared by the Uhura crates.
//!
//! Values are trimmed on construction and their length (in characters, not bytes) is checked
//! against compile-time bounds, so a constructed value is always valid for its field.

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
    /// The trimmed input is shorter than the lower bound
    #[error("text must be at least {min} characters (got {len})")]
    TooShort { min: usize, len: usize },
    /// The trimmed input is longer than the upper bound
    #[error("text must be at most {max} characters (got {len})")]
    TooLong { max: usize, len: usize },
}

/// A trimmed string whose character count lies within `MIN..=MAX`.
///
/// `MIN` of zero permits the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundedText<const MIN: usize, const MAX: usize>(String);

/// A string type that guarantees non-empty content, with no practical upper bound.
pub type NonEmptyText = BoundedText<1, { usize::MAX }>;

impl<const MIN: usize, const MAX: usize> BoundedText<MIN, MAX> {
    /// Creates a new `BoundedText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace before its length is checked.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if a non-empty value is required and the trimmed input is
    /// empty, `TextError::TooShort` or `TextError::TooLong` if it falls outside the bounds.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        let len = trimmed.chars().count();

        if len == 0 && MIN > 0 {
            return Err(TextError::Empty);
        }
        if len < MIN {
            return Err(TextError::TooShort { min: MIN, len });
        }
        if len > MAX {
            return Err(TextError::TooLong { max: MAX, len });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const MIN: usize, const MAX: usize> std::fmt::Display for BoundedText<MIN, MAX> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<const MIN: usize, const MAX: usize> AsRef<str> for BoundedText<MIN, MAX> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<const MIN: usize, const MAX: usize> std::str::FromStr for BoundedText<MIN, MAX> {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<const MIN: usize, const MAX: usize> serde::Serialize for BoundedText<MIN, MAX> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de, const MIN: usize, const MAX: usize> serde::Deserialize<'de> for BoundedText<MIN, MAX> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Short = BoundedText<3, 5>;
    type Optional = BoundedText<0, 4>;

    #[test]
    fn trims_before_measuring() {
        let text = Short::new("  abcd  ").expect("within bounds after trim");
        assert_eq!(text.as_str(), "abcd");
    }

    #[test]
    fn rejects_blank_input_as_empty() {
        assert_eq!(Short::new("   "), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn rejects_out_of_bounds_lengths() {
        assert_eq!(Short::new("ab"), Err(TextError::TooShort { min: 3, len: 2 }));
        assert_eq!(
            Short::new("abcdef"),
            Err(TextError::TooLong { max: 5, len: 6 })
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        // five characters, ten bytes
        assert!(Short::new("ééééé").is_ok());
    }

    #[test]
    fn zero_minimum_accepts_empty() {
        let text = Optional::new("").expect("empty allowed");
        assert!(text.is_empty());
    }

    #[test]
    fn deserialize_applies_validation() {
        let ok: Short = serde_json::from_str("\"abc\"").expect("valid");
        assert_eq!(ok.to_string(), "abc");

        let err = serde_json::from_str::<Short>("\"a\"").expect_err("too short");
        assert!(err.to_string().contains("at least 3"));
    }
}
