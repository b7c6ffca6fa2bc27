//! Schema validation shared by stage inputs, stage outputs and domain aggregates

use thiserror::Error;

/// A declared constraint was violated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed for '{field}': {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `quiz_questions[2].options`)
    pub field: String,

    /// Human-readable description of the violated constraint
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Prefix the field path, used when validating nested values
    pub fn within(mut self, parent: &str) -> Self {
        self.field = format!("{}.{}", parent, self.field);
        self
    }

    /// Prefix the field path with an indexed parent (`parent[idx].field`)
    pub fn at(mut self, parent: &str, idx: usize) -> Self {
        self.field = format!("{}[{}].{}", parent, idx, self.field);
        self
    }
}

/// Types whose values carry constraints beyond what the type system expresses
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Require a string with at least one non-whitespace character
pub fn non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

/// Require `min <= len <= max` for a list field
pub fn len_between(field: &str, len: usize, min: usize, max: usize) -> Result<(), ValidationError> {
    if len < min || len > max {
        return Err(ValidationError::new(
            field,
            format!("expected between {} and {} items, got {}", min, max, len),
        ));
    }
    Ok(())
}

/// Require at least `min` items in a list field
pub fn len_at_least(field: &str, len: usize, min: usize) -> Result<(), ValidationError> {
    if len < min {
        return Err(ValidationError::new(
            field,
            format!("expected at least {} items, got {}", min, len),
        ));
    }
    Ok(())
}

/// Require `min <= value <= max` for a numeric field
pub fn in_range<T>(field: &str, value: T, min: T, max: T) -> Result<(), ValidationError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(ValidationError::new(
            field,
            format!("expected a value between {} and {}, got {}", min, max, value),
        ));
    }
    Ok(())
}

/// Validate every element of a list, reporting the index of the first failure
pub fn each<T: Validate>(field: &str, items: &[T]) -> Result<(), ValidationError> {
    for (idx, item) in items.iter().enumerate() {
        item.validate().map_err(|e| e.at(field, idx))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert!(non_empty("topic", "Rust").is_ok());
        let err = non_empty("topic", "   ").unwrap_err();
        assert_eq!(err.field, "topic");
    }

    #[test]
    fn test_len_between_bounds_are_inclusive() {
        assert!(len_between("options", 3, 3, 5).is_ok());
        assert!(len_between("options", 5, 3, 5).is_ok());
        assert!(len_between("options", 2, 3, 5).is_err());
        assert!(len_between("options", 6, 3, 5).is_err());
    }

    #[test]
    fn test_in_range() {
        assert!(in_range("minutes", 5, 5, 120).is_ok());
        let err = in_range("minutes", 121, 5, 120).unwrap_err();
        assert!(err.message.contains("121"));
    }

    #[test]
    fn test_nested_field_paths() {
        let err = ValidationError::new("options", "bad").at("quiz_questions", 2);
        assert_eq!(err.field, "quiz_questions[2].options");
        let err = ValidationError::new("title", "bad").within("lesson");
        assert_eq!(err.field, "lesson.title");
        assert_eq!(
            err.to_string(),
            "validation failed for 'lesson.title': bad"
        );
    }
}
