//! Validation at construction
//!
//! User input is checked when the domain value is built. Invalid input
//! returns `ValidationError`, never a panic.

use std::fmt;

/// Validation error for domain values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty (after trimming) when it shouldn't be
    Empty { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Todo text, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TodoText(String);

impl TodoText {
    /// Trim surrounding whitespace and reject what is left if empty.
    ///
    /// # Example
    /// ```
    /// use todoapp_core::TodoText;
    ///
    /// assert_eq!(TodoText::new("  Buy milk ").unwrap().as_str(), "Buy milk");
    /// assert!(TodoText::new(" \t ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "text" });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let text = TodoText::new("\n  Buy bread\t").unwrap();
        assert_eq!(text.as_str(), "Buy bread");
    }

    #[test]
    fn keeps_inner_whitespace() {
        let text = TodoText::new(" Buy  eggs ").unwrap();
        assert_eq!(text.into_string(), "Buy  eggs");
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(
            TodoText::new("   ").unwrap_err(),
            ValidationError::Empty { field: "text" }
        );
        assert!(TodoText::new("").is_err());
    }

    #[test]
    fn error_display() {
        let err = ValidationError::Empty { field: "text" };
        assert_eq!(err.to_string(), "text cannot be empty");
    }
}
